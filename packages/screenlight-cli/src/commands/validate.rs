use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use screenlight_rs::{FixtureCatalog, ShowConfig};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ValidateOutput {
    config: String,
    name: Option<String>,
    entries: usize,
    placed: usize,
    problems: Vec<String>,
    error: Option<String>,
}

pub fn execute(args: ValidateArgs) -> i32 {
    let config = match ShowConfig::from_file(Path::new(&args.config)) {
        Ok(config) => config,
        Err(e) => {
            let result = ValidateOutput {
                config: args.config.clone(),
                name: None,
                entries: 0,
                placed: 0,
                problems: Vec::new(),
                error: Some(e.to_string()),
            };
            emit(&args, &result);
            return exit_codes::INPUT_ERROR;
        }
    };

    let catalog = FixtureCatalog::builtin();
    let (show, problems) = config.resolve(&catalog);

    let result = ValidateOutput {
        config: args.config.clone(),
        name: config.name.clone(),
        entries: config.fixtures.len(),
        placed: show.len(),
        problems: problems.iter().map(|p| p.to_string()).collect(),
        error: None,
    };
    emit(&args, &result);

    if problems.is_empty() {
        exit_codes::SUCCESS
    } else {
        exit_codes::INPUT_ERROR
    }
}

fn emit(args: &ValidateArgs, result: &ValidateOutput) {
    if args.json {
        if let Err(e) = output::print_json(result) {
            eprintln!("Error: {}", e);
        }
        return;
    }

    if let Some(ref err) = result.error {
        eprintln!("Error: {}", err);
        return;
    }

    for problem in &result.problems {
        eprintln!("Problem: {}", problem);
    }
    println!(
        "Show '{}': {} of {} fixtures placed",
        result.name.as_deref().unwrap_or("unnamed"),
        result.placed,
        result.entries
    );
}

use std::path::Path;

use crate::cli::{self, ColorArgs};
use crate::exit_codes;
use screenlight_rs::{
    build_manual_universe, create_transport, FixtureCatalog, ShowConfig,
};

pub fn execute(args: ColorArgs) -> i32 {
    let transport_config = match cli::parse_transport(&args.transport) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let show_config = match ShowConfig::from_file(Path::new(&args.config)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
    };
    let catalog = FixtureCatalog::builtin();
    let (show, problems) = show_config.resolve(&catalog);
    for problem in &problems {
        eprintln!("Warning: {}", problem);
    }
    if show.is_empty() {
        eprintln!("Error: show config placed no fixtures");
        return exit_codes::INPUT_ERROR;
    }

    let mut transport = match create_transport(transport_config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    if let Err(e) = transport.open(args.device) {
        eprintln!("Error: {}", e);
        return exit_codes::DEVICE_ERROR;
    }

    let buffer = build_manual_universe(&show, args.red, args.green, args.blue);
    if let Err(e) = transport
        .set_channel_range(1, &buffer)
        .and_then(|_| transport.flush())
    {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }

    println!(
        "Wrote color ({}, {}, {}) to {} fixtures",
        args.red,
        args.green,
        args.blue,
        show.len()
    );

    exit_codes::SUCCESS
}

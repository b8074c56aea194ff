use crate::cli::CatalogArgs;
use crate::exit_codes;
use crate::output;
use screenlight_rs::{ColorMode, FixtureCatalog};
use serde::Serialize;

#[derive(Serialize)]
struct TemplateInfo {
    name: String,
    color_mode: String,
    footprint: u16,
    channels: Vec<String>,
}

pub fn execute(args: CatalogArgs) -> i32 {
    let catalog = FixtureCatalog::builtin();
    let templates: Vec<TemplateInfo> = catalog
        .templates()
        .iter()
        .map(|t| {
            let mut channels: Vec<(u16, &'static str)> = t
                .channels
                .iter()
                .map(|(role, &offset)| (offset, role.as_str()))
                .collect();
            channels.sort();
            TemplateInfo {
                name: t.name.clone(),
                color_mode: match t.color_mode {
                    ColorMode::Global => "global".to_string(),
                    ColorMode::Partitioned => "partitioned".to_string(),
                },
                footprint: t.footprint(),
                channels: channels
                    .into_iter()
                    .map(|(offset, role)| format!("{}:{}", offset, role))
                    .collect(),
            }
        })
        .collect();

    if args.json {
        if let Err(e) = output::print_json(&templates) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    } else {
        println!("Built-in fixture templates:\n");
        println!(
            "  {:<14} {:<13} {:<6} {:<32}",
            "Name", "Mode", "Width", "Channels (offset:role)"
        );
        println!("  {}", "-".repeat(68));
        for t in &templates {
            println!(
                "  {:<14} {:<13} {:<6} {:<32}",
                t.name,
                t.color_mode,
                t.footprint,
                t.channels.join(" ")
            );
        }
        println!();
        println!("Partitioned templates also need a grid position in the show config:");
        println!(r#"  {{ "fixture": "tile-wash", "starting_address": 10,"#);
        println!(r#"    "position": {{ "column": 0, "row": 0 }} }}"#);
    }

    exit_codes::SUCCESS
}

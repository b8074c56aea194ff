use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;

use crate::cli::{self, RunArgs};
use crate::exit_codes;
use screenlight_rs::{
    create_source, create_transport, EngineConfig, FixtureCatalog, GridSize, RenderEngine,
    ShowConfig,
};

pub async fn execute(args: RunArgs) -> i32 {
    let capture_config = match cli::parse_source(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };
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

    let source = match create_source(capture_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    let transport = match create_transport(transport_config) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if !args.quiet {
        eprintln!(
            "Rendering '{}' ({} fixtures) from source '{}'...",
            show_config.name.as_deref().unwrap_or("unnamed"),
            show.len(),
            args.source
        );
        eprintln!(
            "  Grid: {}x{}, delay: {}ms, sensitivity: {}",
            args.columns, args.rows, args.delay_ms, args.sensitivity
        );
    }

    let mut engine = RenderEngine::new(
        Arc::new(RwLock::new(show)),
        source,
        transport,
        EngineConfig {
            device_index: args.device,
            delay_ms: args.delay_ms,
            sensitivity: args.sensitivity,
            grid: GridSize::new(args.columns, args.rows),
        },
    );

    if let Err(e) = engine.start().await {
        eprintln!("Error: {}", e);
        return exit_codes::DEVICE_ERROR;
    }

    match args.frames {
        Some(budget) => {
            // Scripted run: stop once the frame budget is rendered. Capture
            // failures count too so an exhausted frame file ends the run.
            // Checks are paced by the inter-frame delay, so the counters are
            // read about once per cycle.
            let mut ticker = tokio::time::interval(Duration::from_millis(args.delay_ms.max(1)));
            loop {
                ticker.tick().await;
                let stats = engine.stats();
                if !engine.is_running() || stats.frames_rendered + stats.failed_captures >= budget {
                    break;
                }
            }
        }
        None => {
            if !args.quiet {
                eprintln!("Press Ctrl-C to stop");
            }
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Error waiting for Ctrl-C: {}", e);
            }
        }
    }

    if let Err(e) = engine.stop().await {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }

    let stats = engine.stats();
    if !args.quiet {
        eprintln!(
            "Stopped: {} frames rendered, {} failed captures, {} failed transmits",
            stats.frames_rendered, stats.failed_captures, stats.failed_transmits
        );
    }

    exit_codes::SUCCESS
}

use clap::{Args, Parser, Subcommand};

use screenlight_rs::{CaptureConfig, TransportConfig};

#[derive(Parser)]
#[command(
    name = "screenlight",
    version,
    about = "Screen-color-driven DMX lighting tool",
    long_about = "Drive DMX lighting fixtures from sampled screen colors.\n\
                  Fixtures are placed by a JSON show config resolved against the\n\
                  built-in catalog (see `screenlight catalog`)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the render loop against a show config
    Run(RunArgs),
    /// List the built-in fixture templates
    Catalog(CatalogArgs),
    /// Validate a show config file
    Validate(ValidateArgs),
    /// Write one flat color to every fixture in a show
    Color(ColorArgs),
}

#[derive(Args)]
pub struct RunArgs {
    /// Show config file path (JSON)
    #[arg(long)]
    pub config: String,

    /// Frame source: pattern, solid, raw-file
    #[arg(long, default_value = "pattern")]
    pub source: String,

    /// Frame width for synthetic sources
    #[arg(long, default_value_t = 640)]
    pub width: u32,

    /// Frame height for synthetic sources
    #[arg(long, default_value_t = 480)]
    pub height: u32,

    /// Solid-source color as "r,g,b"
    #[arg(long, default_value = "255,255,255")]
    pub color: String,

    /// Raw BGR frame dump path (for --source raw-file)
    #[arg(long)]
    pub frame_file: Option<String>,

    /// Restart a raw frame file from the beginning when exhausted
    #[arg(long, default_value_t = false)]
    pub loop_playback: bool,

    /// DMX transport: console, memory
    #[arg(long, default_value = "console")]
    pub transport: String,

    /// DMX device index handed to the transport
    #[arg(long, env = "SCREENLIGHT_DEVICE", default_value_t = 0)]
    pub device: u32,

    /// Inter-frame delay in milliseconds
    #[arg(long, default_value_t = 50)]
    pub delay_ms: u64,

    /// Sensitivity threshold 0-255 (regions at or below render black)
    #[arg(long, default_value_t = 0)]
    pub sensitivity: u8,

    /// Sampling grid columns
    #[arg(long, default_value_t = 4)]
    pub columns: u32,

    /// Sampling grid rows
    #[arg(long, default_value_t = 3)]
    pub rows: u32,

    /// Stop after this many rendered frames (default: run until Ctrl-C)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct CatalogArgs {
    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Show config file path (JSON)
    #[arg(long)]
    pub config: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ColorArgs {
    /// Show config file path (JSON)
    #[arg(long)]
    pub config: String,

    /// Red 0-255
    #[arg(long)]
    pub red: u8,

    /// Green 0-255
    #[arg(long)]
    pub green: u8,

    /// Blue 0-255
    #[arg(long)]
    pub blue: u8,

    /// DMX transport: console, memory
    #[arg(long, default_value = "console")]
    pub transport: String,

    /// DMX device index handed to the transport
    #[arg(long, env = "SCREENLIGHT_DEVICE", default_value_t = 0)]
    pub device: u32,
}

/// Parse a color string "r,g,b" into three bytes.
pub fn parse_color(s: &str) -> Result<(u8, u8, u8), String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!(
            "Invalid color '{}': expected 'r,g,b' with values 0-255",
            s
        ));
    }
    let mut bytes = [0u8; 3];
    for (slot, part) in bytes.iter_mut().zip(&parts) {
        *slot = part
            .trim()
            .parse::<u8>()
            .map_err(|_| format!("Invalid color '{}': '{}' is not a byte value", s, part))?;
    }
    Ok((bytes[0], bytes[1], bytes[2]))
}

/// Build a capture config from run arguments.
pub fn parse_source(args: &RunArgs) -> Result<CaptureConfig, String> {
    match args.source.as_str() {
        "pattern" => Ok(CaptureConfig::Pattern {
            width: args.width,
            height: args.height,
        }),
        "solid" => {
            let (red, green, blue) = parse_color(&args.color)?;
            Ok(CaptureConfig::Solid {
                width: args.width,
                height: args.height,
                red,
                green,
                blue,
            })
        }
        "raw-file" => {
            let path = args
                .frame_file
                .as_ref()
                .ok_or("--source raw-file requires --frame-file")?;
            Ok(CaptureConfig::RawFile {
                path: path.clone(),
                width: args.width,
                height: args.height,
                loop_playback: args.loop_playback,
            })
        }
        other => Err(format!(
            "Unknown source '{}': expected pattern, solid, or raw-file",
            other
        )),
    }
}

/// Parse a transport name into its config.
pub fn parse_transport(name: &str) -> Result<TransportConfig, String> {
    match name {
        "console" => Ok(TransportConfig::Console),
        "memory" => Ok(TransportConfig::Memory),
        other => Err(format!(
            "Unknown transport '{}': expected console or memory",
            other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_valid() {
        assert_eq!(parse_color("0,0,0").unwrap(), (0, 0, 0));
        assert_eq!(parse_color("255, 128, 1").unwrap(), (255, 128, 1));
    }

    #[test]
    fn test_parse_color_invalid() {
        assert!(parse_color("256,0,0").is_err());
        assert!(parse_color("1,2").is_err());
        assert!(parse_color("1,2,3,4").is_err());
        assert!(parse_color("r,g,b").is_err());
    }

    #[test]
    fn test_parse_transport() {
        assert!(matches!(
            parse_transport("console"),
            Ok(TransportConfig::Console)
        ));
        assert!(matches!(
            parse_transport("memory"),
            Ok(TransportConfig::Memory)
        ));
        assert!(parse_transport("artnet").is_err());
    }

    #[test]
    fn test_parse_source_raw_file_requires_path() {
        let mut args = run_args_for_source("raw-file");
        assert!(parse_source(&args).is_err());
        args.frame_file = Some("frames.bgr".to_string());
        assert!(matches!(
            parse_source(&args),
            Ok(CaptureConfig::RawFile { .. })
        ));
    }

    #[test]
    fn test_parse_source_unknown() {
        let args = run_args_for_source("screen");
        assert!(parse_source(&args).unwrap_err().contains("Unknown source"));
    }

    fn run_args_for_source(source: &str) -> RunArgs {
        RunArgs {
            config: "show.json".to_string(),
            source: source.to_string(),
            width: 4,
            height: 4,
            color: "1,2,3".to_string(),
            frame_file: None,
            loop_playback: false,
            transport: "memory".to_string(),
            device: 0,
            delay_ms: 0,
            sensitivity: 0,
            columns: 2,
            rows: 2,
            frames: None,
            quiet: true,
        }
    }
}

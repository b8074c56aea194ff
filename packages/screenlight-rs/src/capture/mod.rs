// Pluggable frame capture sources.
//
// `FrameSource` is the seam between the render loop and whatever produces
// pixels. New sources can be added by:
// 1. Implementing the FrameSource trait
// 2. Adding a variant to CaptureConfig
// 3. Registering it in the factory function
//
// Current implementations:
// - Pattern: fixed quadrant test pattern, no capture hardware needed
// - Solid: one flat color every frame
// - RawFile: replays a raw BGR frame dump from disk

mod pattern;
mod raw_file;
mod solid;

use serde::{Deserialize, Serialize};

use crate::error::CaptureError;
use crate::sampler::Frame;

pub use pattern::PatternSource;
pub use raw_file::RawFileSource;
pub use solid::SolidSource;

/// Configuration for the available capture source types.
///
/// Tagged so source selection reads cleanly from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CaptureConfig {
    /// Quadrant test pattern
    #[serde(rename = "pattern")]
    Pattern { width: u32, height: u32 },

    /// One flat color on every frame
    #[serde(rename = "solid")]
    Solid {
        width: u32,
        height: u32,
        red: u8,
        green: u8,
        blue: u8,
    },

    /// Raw BGR frame dump on disk (headerless, frames back to back)
    #[serde(rename = "raw_file")]
    RawFile {
        path: String,
        width: u32,
        height: u32,
        /// Restart from the first frame when the file is exhausted
        #[serde(default)]
        loop_playback: bool,
    },
}

/// Trait for all frame capture sources.
///
/// Capture is a synchronous, CPU-bound step; the render loop invokes it from
/// a blocking context once per cycle. Implementations return a tightly packed
/// B,G,R frame or a `CaptureError`.
pub trait FrameSource: Send + Sync {
    /// Capture the next frame.
    fn capture_frame(&mut self) -> Result<Frame, CaptureError>;
}

/// Factory function to create a FrameSource from configuration.
///
/// This is where new source types are registered: implement the trait, add a
/// `CaptureConfig` variant, and add a match arm here.
pub fn create_source(config: CaptureConfig) -> Result<Box<dyn FrameSource>, CaptureError> {
    match config {
        CaptureConfig::Pattern { width, height } => Ok(Box::new(PatternSource::new(width, height))),

        CaptureConfig::Solid {
            width,
            height,
            red,
            green,
            blue,
        } => Ok(Box::new(SolidSource::new(width, height, red, green, blue))),

        CaptureConfig::RawFile {
            path,
            width,
            height,
            loop_playback,
        } => Ok(Box::new(RawFileSource::new(
            path,
            width,
            height,
            loop_playback,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_source_from_json_config() {
        let config: CaptureConfig = serde_json::from_str(
            r#"{ "type": "solid", "width": 2, "height": 1, "red": 9, "green": 8, "blue": 7 }"#,
        )
        .unwrap();
        let mut source = create_source(config).unwrap();
        let frame = source.capture_frame().unwrap();
        assert_eq!(frame.width, 2);
        assert_eq!(frame.data, vec![7, 8, 9, 7, 8, 9]);
    }

    #[test]
    fn test_raw_file_config_defaults() {
        let config: CaptureConfig = serde_json::from_str(
            r#"{ "type": "raw_file", "path": "frames.bgr", "width": 4, "height": 4 }"#,
        )
        .unwrap();
        match config {
            CaptureConfig::RawFile { loop_playback, .. } => assert!(!loop_playback),
            other => panic!("unexpected config: {:?}", other),
        }
    }
}

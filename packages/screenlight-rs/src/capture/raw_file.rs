// Raw frame file source: replays a BGR frame dump from disk.
//
// The file is a headerless concatenation of frames, each holding
// width*height*3 bytes of B,G,R pixels. Useful for replaying recorded
// sessions and for driving the engine without capture hardware.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::path::PathBuf;

use log::info;

use super::FrameSource;
use crate::error::CaptureError;
use crate::sampler::Frame;

pub struct RawFileSource {
    path: PathBuf,
    width: u32,
    height: u32,
    loop_playback: bool,
    file: Option<File>,
}

impl RawFileSource {
    pub fn new(path: String, width: u32, height: u32, loop_playback: bool) -> Self {
        Self {
            path: PathBuf::from(path),
            width,
            height,
            loop_playback,
            file: None,
        }
    }

    /// Open the dump and check that it holds a whole number of frames.
    fn open_validated(&self) -> Result<File, CaptureError> {
        let file = File::open(&self.path)?;
        let frame_len = Frame::expected_len(self.width, self.height) as u64;
        let file_len = file.metadata()?.len();
        if frame_len == 0 || file_len < frame_len || file_len % frame_len != 0 {
            return Err(CaptureError::Geometry {
                expected: frame_len as usize,
                actual: file_len as usize,
            });
        }
        info!(
            "Opened frame file {} ({} frames of {}x{})",
            self.path.display(),
            file_len / frame_len,
            self.width,
            self.height
        );
        Ok(file)
    }
}

impl FrameSource for RawFileSource {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        let mut file = match self.file.take() {
            Some(f) => f,
            None => self.open_validated()?,
        };

        let mut data = vec![0u8; Frame::expected_len(self.width, self.height)];
        match file.read_exact(&mut data) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
                // The file holds whole frames, so EOF only occurs at a frame
                // boundary.
                if !self.loop_playback {
                    self.file = Some(file);
                    return Err(CaptureError::Unavailable(format!(
                        "end of frame file {}",
                        self.path.display()
                    )));
                }
                file.seek(SeekFrom::Start(0))?;
                file.read_exact(&mut data)?;
            }
            Err(e) => return Err(e.into()),
        }

        self.file = Some(file);
        Ok(Frame::new(self.width, self.height, data))
    }
}

// Flat-color source: every captured frame is one uniform color.
//
// Handy for demos and for tests that need a known whole-frame average.

use super::FrameSource;
use crate::error::CaptureError;
use crate::sampler::Frame;

pub struct SolidSource {
    width: u32,
    height: u32,
    red: u8,
    green: u8,
    blue: u8,
}

impl SolidSource {
    pub fn new(width: u32, height: u32, red: u8, green: u8, blue: u8) -> Self {
        Self {
            width,
            height,
            red,
            green,
            blue,
        }
    }
}

impl FrameSource for SolidSource {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        let pixels = self.width as usize * self.height as usize;
        let mut data = Vec::with_capacity(Frame::expected_len(self.width, self.height));
        for _ in 0..pixels {
            data.extend_from_slice(&[self.blue, self.green, self.red]);
        }
        Ok(Frame::new(self.width, self.height, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_frame_is_uniform() {
        let mut source = SolidSource::new(3, 2, 100, 50, 25);
        let frame = source.capture_frame().unwrap();
        assert_eq!(frame.data.len(), Frame::expected_len(3, 2));
        for px in frame.data.chunks_exact(3) {
            assert_eq!(px, [25, 50, 100]);
        }
    }
}

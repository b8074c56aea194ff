// Quadrant test pattern source.
//
// Yields a fixed frame split into four colored quadrants (red, green, blue,
// white), so partitioned fixtures on a 2x2 grid each see a distinct solid
// color without any capture hardware.

use super::FrameSource;
use crate::error::CaptureError;
use crate::sampler::Frame;

pub struct PatternSource {
    width: u32,
    height: u32,
}

impl PatternSource {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl FrameSource for PatternSource {
    fn capture_frame(&mut self) -> Result<Frame, CaptureError> {
        let mut data = Vec::with_capacity(Frame::expected_len(self.width, self.height));
        for y in 0..self.height {
            for x in 0..self.width {
                let right = x >= self.width / 2;
                let bottom = y >= self.height / 2;
                let (r, g, b) = match (right, bottom) {
                    (false, false) => (255, 0, 0),
                    (true, false) => (0, 255, 0),
                    (false, true) => (0, 0, 255),
                    (true, true) => (255, 255, 255),
                };
                data.extend_from_slice(&[b, g, r]);
            }
        }
        Ok(Frame::new(self.width, self.height, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 3] {
        let start = (y * frame.width + x) as usize * 3;
        [frame.data[start], frame.data[start + 1], frame.data[start + 2]]
    }

    #[test]
    fn test_quadrant_colors() {
        let mut source = PatternSource::new(4, 4);
        let frame = source.capture_frame().unwrap();
        assert_eq!(frame.data.len(), Frame::expected_len(4, 4));
        // B,G,R byte order.
        assert_eq!(pixel(&frame, 0, 0), [0, 0, 255]); // red
        assert_eq!(pixel(&frame, 3, 0), [0, 255, 0]); // green
        assert_eq!(pixel(&frame, 0, 3), [255, 0, 0]); // blue
        assert_eq!(pixel(&frame, 3, 3), [255, 255, 255]); // white
    }

    #[test]
    fn test_repeated_captures_are_identical() {
        let mut source = PatternSource::new(6, 2);
        let first = source.capture_frame().unwrap();
        let second = source.capture_frame().unwrap();
        assert_eq!(first.data, second.data);
    }
}

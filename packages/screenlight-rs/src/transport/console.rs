// Console transport: prints each flushed universe to stdout.
//
// Lets an operator watch channel values scroll by without any DMX interface
// attached. Trailing zero channels are trimmed from the printout.

use super::{check_channel_range, DmxTransport};
use crate::error::TransportError;
use crate::fixture::DMX_ADDRESS_MAX;

pub struct ConsoleTransport {
    open: bool,
    channels: Vec<u8>,
}

impl Default for ConsoleTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleTransport {
    pub fn new() -> Self {
        Self {
            open: false,
            channels: vec![0; DMX_ADDRESS_MAX as usize],
        }
    }

    fn preview(&self) -> String {
        let last = self
            .channels
            .iter()
            .rposition(|&v| v != 0)
            .map_or(0, |i| i + 1);
        self.channels[..last]
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl DmxTransport for ConsoleTransport {
    fn open(&mut self, _device_index: u32) -> Result<(), TransportError> {
        self.open = true;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn set_channel_range(&mut self, start_address: u16, data: &[u8]) -> Result<(), TransportError> {
        check_channel_range(start_address, data.len())?;
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        let start = start_address as usize - 1;
        self.channels[start..start + data.len()].copy_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        if !self.open {
            return Err(TransportError::NotOpen);
        }
        println!("Writing: {}", self.preview());
        Ok(())
    }
}

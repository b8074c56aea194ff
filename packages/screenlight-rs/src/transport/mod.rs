// DMX transport sinks.
//
// `DmxTransport` is the seam to lighting hardware. The render loop stages a
// universe with `set_channel_range` and pushes it out with `flush` once per
// cycle. New transports can be added by:
// 1. Implementing the DmxTransport trait
// 2. Adding a variant to TransportConfig
// 3. Registering it in the factory function
//
// Current implementations:
// - Memory: records writes for inspection, no hardware needed
// - Console: prints flushed channel values to stdout

mod console;
mod memory;

use serde::{Deserialize, Serialize};

use crate::error::TransportError;
use crate::fixture::DMX_ADDRESS_MAX;

pub use console::ConsoleTransport;
pub use memory::{MemoryTransport, TransportProbe, TransportSnapshot};

/// Trait for all DMX transports.
///
/// Channel addresses are 1-based on the wire; `set_channel_range(1, buf)`
/// stages `buf[0]` at address 1. `flush` blocks until the staged frame has
/// been handed to the device.
pub trait DmxTransport: Send + Sync {
    /// Open the device with the given index.
    fn open(&mut self, device_index: u32) -> Result<(), TransportError>;

    /// Whether the device is currently open.
    fn is_open(&self) -> bool;

    /// Stage `data` starting at the 1-based `start_address`.
    fn set_channel_range(&mut self, start_address: u16, data: &[u8]) -> Result<(), TransportError>;

    /// Push the staged channels out to the device.
    fn flush(&mut self) -> Result<(), TransportError>;
}

/// Validate a staged write against the 512-address DMX space.
pub(crate) fn check_channel_range(start_address: u16, len: usize) -> Result<(), TransportError> {
    let start = start_address as usize;
    if start == 0 || start - 1 + len > DMX_ADDRESS_MAX as usize {
        return Err(TransportError::ChannelRange {
            start: start_address,
            len,
        });
    }
    Ok(())
}

/// Configuration for the available transport types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TransportConfig {
    /// In-memory recorder
    #[serde(rename = "memory")]
    Memory,

    /// Channel preview on stdout
    #[serde(rename = "console")]
    Console,
}

/// Factory function to create a DmxTransport from configuration.
pub fn create_transport(config: TransportConfig) -> Result<Box<dyn DmxTransport>, TransportError> {
    match config {
        TransportConfig::Memory => Ok(Box::new(MemoryTransport::new())),
        TransportConfig::Console => Ok(Box::new(ConsoleTransport::new())),
    }
}

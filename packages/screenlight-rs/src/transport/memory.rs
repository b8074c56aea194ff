// In-memory transport that records every write and flush.
//
// The probe handle stays usable after the transport itself is boxed and
// handed to the engine, so tests and diagnostics can watch what reached the
// "wire" from the outside.

use std::sync::Arc;

use parking_lot::Mutex;

use super::{check_channel_range, DmxTransport};
use crate::error::TransportError;
use crate::fixture::DMX_ADDRESS_MAX;

#[derive(Debug)]
struct MemoryState {
    open_device: Option<u32>,
    channels: Vec<u8>,
    writes: u64,
    flushes: u64,
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            open_device: None,
            channels: vec![0; DMX_ADDRESS_MAX as usize],
            writes: 0,
            flushes: 0,
        }
    }
}

/// Point-in-time copy of the recorded transport state.
#[derive(Debug, Clone)]
pub struct TransportSnapshot {
    pub open_device: Option<u32>,
    /// Full 512-slot channel space; index 0 holds address 1.
    pub channels: Vec<u8>,
    pub writes: u64,
    pub flushes: u64,
}

/// Read-only handle onto a `MemoryTransport`'s recorded state.
#[derive(Debug, Clone)]
pub struct TransportProbe {
    state: Arc<Mutex<MemoryState>>,
}

impl TransportProbe {
    pub fn snapshot(&self) -> TransportSnapshot {
        let state = self.state.lock();
        TransportSnapshot {
            open_device: state.open_device,
            channels: state.channels.clone(),
            writes: state.writes,
            flushes: state.flushes,
        }
    }

    /// Value currently staged at a 1-based address, 0 when out of range.
    pub fn channel(&self, address: u16) -> u8 {
        let state = self.state.lock();
        match address {
            0 => 0,
            a => state.channels.get(a as usize - 1).copied().unwrap_or(0),
        }
    }

    pub fn flushes(&self) -> u64 {
        self.state.lock().flushes
    }
}

pub struct MemoryTransport {
    state: Arc<Mutex<MemoryState>>,
    fail_open: bool,
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_open: false,
        }
    }

    /// Transport whose `open` always fails, for exercising startup errors.
    pub fn failing() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
            fail_open: true,
        }
    }

    /// Handle for inspecting the recorded state after the transport is boxed.
    pub fn probe(&self) -> TransportProbe {
        TransportProbe {
            state: Arc::clone(&self.state),
        }
    }
}

impl DmxTransport for MemoryTransport {
    fn open(&mut self, device_index: u32) -> Result<(), TransportError> {
        if self.fail_open {
            return Err(TransportError::OpenFailed(
                device_index,
                "device not present".to_string(),
            ));
        }
        self.state.lock().open_device = Some(device_index);
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state.lock().open_device.is_some()
    }

    fn set_channel_range(&mut self, start_address: u16, data: &[u8]) -> Result<(), TransportError> {
        check_channel_range(start_address, data.len())?;
        let mut state = self.state.lock();
        if state.open_device.is_none() {
            return Err(TransportError::NotOpen);
        }
        let start = start_address as usize - 1;
        state.channels[start..start + data.len()].copy_from_slice(data);
        state.writes += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        let mut state = self.state.lock();
        if state.open_device.is_none() {
            return Err(TransportError::NotOpen);
        }
        state.flushes += 1;
        Ok(())
    }
}

// Render engine - drives the capture/sample/build/transmit cycle
//
// The engine manages:
// - Transport lifecycle (opened once on start, surfaced as a start error)
// - One background render task per session
// - Live knobs (delay, sensitivity, grid) shared with the control surface
// - Task cancellation via CancellationToken for graceful shutdown
// - Blackout on stop so fixtures go dark instead of holding the last frame

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use log::{info, warn};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tokio_util::sync::CancellationToken;

use crate::capture::FrameSource;
use crate::error::{CaptureError, EngineError, Result, TransportError};
use crate::sampler::{sample_frame, GridSize};
use crate::show::Show;
use crate::transport::DmxTransport;
use crate::universe::{build_manual_universe, build_universe, UniverseBuffer, UNIVERSE_CHANNELS};

/// Live render knobs, shared between the control surface and the render task.
///
/// Cloning the handle shares the same underlying values; changes apply from
/// the next cycle onward.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    inner: Arc<SettingsInner>,
}

#[derive(Debug)]
struct SettingsInner {
    delay_ms: AtomicU64,
    sensitivity: AtomicU8,
    grid: RwLock<GridSize>,
}

impl RenderSettings {
    pub fn new(delay_ms: u64, sensitivity: u8, grid: GridSize) -> Self {
        Self {
            inner: Arc::new(SettingsInner {
                delay_ms: AtomicU64::new(delay_ms),
                sensitivity: AtomicU8::new(sensitivity),
                grid: RwLock::new(grid),
            }),
        }
    }

    /// Inter-frame delay in milliseconds.
    pub fn set_delay(&self, ms: u64) {
        self.inner.delay_ms.store(ms, Ordering::Relaxed);
    }

    pub fn delay(&self) -> u64 {
        self.inner.delay_ms.load(Ordering::Relaxed)
    }

    /// Minimum combined average brightness below which a region renders black.
    pub fn set_sensitivity(&self, threshold: u8) {
        self.inner.sensitivity.store(threshold, Ordering::Relaxed);
    }

    pub fn sensitivity(&self) -> u8 {
        self.inner.sensitivity.load(Ordering::Relaxed)
    }

    /// Sampling grid dimensions, clamped to at least 1x1.
    pub fn set_grid_size(&self, columns: u32, rows: u32) {
        *self.inner.grid.write() = GridSize::new(columns, rows);
    }

    pub fn grid(&self) -> GridSize {
        *self.inner.grid.read()
    }
}

/// Render engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Device index handed to the transport's `open`.
    pub device_index: u32,
    pub delay_ms: u64,
    pub sensitivity: u8,
    pub grid: GridSize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            delay_ms: 0,
            sensitivity: 0,
            grid: GridSize::default(),
        }
    }
}

/// Statistics about a render session.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RenderStats {
    pub frames_rendered: u64,
    pub failed_captures: u64,
    pub failed_transmits: u64,
}

#[derive(Debug, Default)]
struct StatsCounters {
    frames_rendered: AtomicU64,
    failed_captures: AtomicU64,
    failed_transmits: AtomicU64,
}

/// Main render engine.
pub struct RenderEngine {
    show: Arc<RwLock<Show>>,
    settings: RenderSettings,
    source: Arc<Mutex<Box<dyn FrameSource>>>,
    transport: Arc<Mutex<Box<dyn DmxTransport>>>,
    device_index: u32,
    is_running: Arc<AtomicBool>,
    cancel_token: CancellationToken,
    render_task: Option<JoinHandle<()>>,
    stats: Arc<StatsCounters>,
}

impl RenderEngine {
    /// Create an engine over a shared show and boxed collaborators.
    pub fn new(
        show: Arc<RwLock<Show>>,
        source: Box<dyn FrameSource>,
        transport: Box<dyn DmxTransport>,
        config: EngineConfig,
    ) -> Self {
        Self {
            show,
            settings: RenderSettings::new(config.delay_ms, config.sensitivity, config.grid),
            source: Arc::new(Mutex::new(source)),
            transport: Arc::new(Mutex::new(transport)),
            device_index: config.device_index,
            is_running: Arc::new(AtomicBool::new(false)),
            cancel_token: CancellationToken::new(),
            render_task: None,
            stats: Arc::new(StatsCounters::default()),
        }
    }

    /// Start the render loop. A no-op when already running.
    ///
    /// The transport is opened here if it is not open yet, so a dead device
    /// surfaces to the caller instead of failing inside the loop.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running.load(Ordering::Relaxed) {
            log::debug!("Render engine already running");
            return Ok(());
        }

        {
            let mut transport = self.transport.lock();
            if !transport.is_open() {
                transport.open(self.device_index)?;
            }
        }

        info!("Starting render engine on device {}", self.device_index);

        // Fresh token per session so a restart is not born cancelled.
        self.cancel_token = CancellationToken::new();
        self.is_running.store(true, Ordering::Relaxed);

        let show = Arc::clone(&self.show);
        let source = Arc::clone(&self.source);
        let transport = Arc::clone(&self.transport);
        let settings = self.settings.clone();
        let stats = Arc::clone(&self.stats);
        let is_running = Arc::clone(&self.is_running);
        let cancel = self.cancel_token.clone();

        let task = tokio::spawn(async move {
            info!("Render loop started");

            loop {
                // One full cycle runs as a blocking task: capture, sample,
                // and build are CPU-bound, and flush may block on hardware.
                let cycle_source = Arc::clone(&source);
                let cycle_transport = Arc::clone(&transport);
                let cycle_show = Arc::clone(&show);
                let cycle_settings = settings.clone();
                let cycle_stats = Arc::clone(&stats);

                let outcome = tokio::task::spawn_blocking(move || {
                    let buffer = {
                        let mut source = cycle_source.lock();
                        match render_once(source.as_mut(), &cycle_show, &cycle_settings) {
                            Ok(buffer) => buffer,
                            Err(e) => {
                                warn!("Frame capture failed: {}", e);
                                cycle_stats.failed_captures.fetch_add(1, Ordering::Relaxed);
                                return;
                            }
                        }
                    };

                    let mut transport = cycle_transport.lock();
                    match transmit(transport.as_mut(), &buffer) {
                        Ok(()) => {
                            cycle_stats.frames_rendered.fetch_add(1, Ordering::Relaxed);
                        }
                        Err(e) => {
                            warn!("DMX transmit failed: {}", e);
                            cycle_stats.failed_transmits.fetch_add(1, Ordering::Relaxed);
                        }
                    }
                })
                .await;

                if let Err(e) = outcome {
                    log::error!("Render cycle task failed: {}", e);
                }

                let delay_ms = settings.delay();
                tokio::select! {
                    biased;

                    _ = cancel.cancelled() => {
                        info!("Render loop cancelled");
                        break;
                    }

                    _ = sleep(Duration::from_millis(delay_ms)) => {}
                }
            }

            // Loop exited: black out the universe so fixtures go dark.
            {
                let mut transport = transport.lock();
                let blackout = [0u8; UNIVERSE_CHANNELS];
                if let Err(e) = transmit(transport.as_mut(), &blackout) {
                    warn!("Blackout after stop failed: {}", e);
                }
            }

            is_running.store(false, Ordering::Relaxed);
            info!("Render loop stopped");
        });

        self.render_task = Some(task);
        Ok(())
    }

    /// Stop the render loop and wait for the blackout to go out.
    ///
    /// Idempotent: stopping an idle engine is a no-op. Cancellation is
    /// cooperative; an in-flight cycle finishes before the loop exits.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(task) = self.render_task.take() else {
            return Ok(());
        };

        info!("Stopping render engine");
        self.cancel_token.cancel();
        task.await.map_err(|e| EngineError::Join(e.to_string()))?;
        self.is_running.store(false, Ordering::Relaxed);

        Ok(())
    }

    /// One-shot manual override: drive every fixture with one flat color.
    ///
    /// Builds and transmits a single universe without engaging the render
    /// loop. Opens the transport first if needed.
    pub fn write_global_color(&self, red: u8, green: u8, blue: u8) -> Result<()> {
        let buffer = {
            let show = self.show.read();
            build_manual_universe(&show, red, green, blue)
        };

        let mut transport = self.transport.lock();
        if !transport.is_open() {
            transport.open(self.device_index)?;
        }
        transmit(transport.as_mut(), &buffer).map_err(EngineError::Transport)
    }

    pub fn set_delay(&self, ms: u64) {
        self.settings.set_delay(ms);
    }

    pub fn set_sensitivity(&self, threshold: u8) {
        self.settings.set_sensitivity(threshold);
    }

    pub fn set_grid_size(&self, columns: u32, rows: u32) {
        self.settings.set_grid_size(columns, rows);
    }

    /// Handle onto the live knobs, usable from another task.
    pub fn settings(&self) -> RenderSettings {
        self.settings.clone()
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Snapshot of the session counters.
    pub fn stats(&self) -> RenderStats {
        RenderStats {
            frames_rendered: self.stats.frames_rendered.load(Ordering::Relaxed),
            failed_captures: self.stats.failed_captures.load(Ordering::Relaxed),
            failed_transmits: self.stats.failed_transmits.load(Ordering::Relaxed),
        }
    }
}

impl Drop for RenderEngine {
    fn drop(&mut self) {
        // Ensure the loop winds down even when stop() was never awaited.
        self.cancel_token.cancel();
    }
}

/// Capture one frame and build the universe for it.
fn render_once(
    source: &mut dyn FrameSource,
    show: &RwLock<Show>,
    settings: &RenderSettings,
) -> std::result::Result<UniverseBuffer, CaptureError> {
    let frame = source.capture_frame()?;
    let aggregates = sample_frame(&frame, settings.grid());
    let show = show.read();
    Ok(build_universe(&show, &aggregates, settings.sensitivity()))
}

/// Stage a full universe at address 1 and push it out.
fn transmit(
    transport: &mut dyn DmxTransport,
    buffer: &UniverseBuffer,
) -> std::result::Result<(), TransportError> {
    transport.set_channel_range(1, buffer)?;
    transport.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SolidSource;
    use crate::catalog::FixtureCatalog;
    use crate::transport::MemoryTransport;

    fn demo_show() -> Show {
        let catalog = FixtureCatalog::builtin();
        let mut show = Show::new();
        show.place(catalog.get("rgb-par").unwrap(), 1, None).unwrap();
        show
    }

    #[test]
    fn test_settings_handle_is_shared() {
        let settings = RenderSettings::new(0, 0, GridSize::default());
        let clone = settings.clone();
        clone.set_delay(25);
        clone.set_sensitivity(40);
        clone.set_grid_size(2, 2);
        assert_eq!(settings.delay(), 25);
        assert_eq!(settings.sensitivity(), 40);
        assert_eq!(settings.grid(), GridSize::new(2, 2));
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.device_index, 0);
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.sensitivity, 0);
        assert_eq!(config.grid, GridSize::new(4, 3));
    }

    #[test]
    fn test_write_global_color_opens_transport() {
        let transport = MemoryTransport::new();
        let probe = transport.probe();
        let engine = RenderEngine::new(
            Arc::new(RwLock::new(demo_show())),
            Box::new(SolidSource::new(2, 2, 0, 0, 0)),
            Box::new(transport),
            EngineConfig::default(),
        );

        engine.write_global_color(10, 20, 30).unwrap();

        assert_eq!(probe.channel(1), 10);
        assert_eq!(probe.channel(2), 20);
        assert_eq!(probe.channel(3), 30);
        assert_eq!(probe.flushes(), 1);
        assert_eq!(probe.snapshot().open_device, Some(0));
        assert!(!engine.is_running());
    }
}

pub mod fixture;
pub mod catalog;
pub mod show;
pub mod sampler;
pub mod universe;
pub mod capture;
pub mod transport;
pub mod engine;
pub mod error;

pub use capture::{create_source, CaptureConfig, FrameSource};
pub use catalog::FixtureCatalog;
pub use engine::{EngineConfig, RenderEngine, RenderSettings, RenderStats};
pub use error::{CaptureError, ConfigError, EngineError, Result, TransportError};
pub use fixture::{ChannelRole, ColorMode, Fixture, FixtureTemplate, GridPosition};
pub use sampler::{sample_frame, Frame, FrameAggregates, GridSize, RegionAggregate};
pub use show::{PlacementConfig, Show, ShowConfig};
pub use transport::{create_transport, DmxTransport, TransportConfig};
pub use universe::{build_manual_universe, build_universe, ChannelLevels, UniverseBuffer, UNIVERSE_CHANNELS};

//! Fixture data model: channel roles, templates, and placed fixtures.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Lowest patchable DMX starting address.
pub const DMX_ADDRESS_MIN: u16 = 1;

/// Highest patchable DMX starting address.
pub const DMX_ADDRESS_MAX: u16 = 512;

/// Role a single DMX channel plays within a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRole {
    Intensity,
    Red,
    Green,
    Blue,
    Indigo,
    Lime,
    Strobe,
    Zoom,
    Fan,
}

impl ChannelRole {
    /// All roles in declaration order.
    pub const ALL: [ChannelRole; 9] = [
        Self::Intensity,
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Indigo,
        Self::Lime,
        Self::Strobe,
        Self::Zoom,
        Self::Fan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intensity => "intensity",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Indigo => "indigo",
            Self::Lime => "lime",
            Self::Strobe => "strobe",
            Self::Zoom => "zoom",
            Self::Fan => "fan",
        }
    }
}

/// How a fixture consumes screen color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
    /// Fixture follows the whole-frame average.
    Global,
    /// Fixture follows the average of one grid tile.
    Partitioned,
}

/// Column/row coordinate of a tile in the sampling grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub column: u32,
    pub row: u32,
}

impl GridPosition {
    pub fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }
}

/// Reusable fixture definition: name, channel layout, and color mode.
///
/// Templates live in the catalog and are never patched directly. Placing one
/// into a show copies the layout, so later template edits do not leak into
/// existing shows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTemplate {
    pub name: String,
    /// Channel role to zero-based offset from the starting address.
    pub channels: HashMap<ChannelRole, u16>,
    pub color_mode: ColorMode,
}

impl FixtureTemplate {
    pub fn new(name: &str, channels: HashMap<ChannelRole, u16>, color_mode: ColorMode) -> Self {
        Self {
            name: name.to_string(),
            channels,
            color_mode,
        }
    }

    /// Number of consecutive channels the fixture spans (highest offset + 1).
    pub fn footprint(&self) -> u16 {
        self.channels.values().map(|&o| o + 1).max().unwrap_or(0)
    }
}

/// A template placed into a show at a concrete universe address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub channels: HashMap<ChannelRole, u16>,
    pub color_mode: ColorMode,
    /// One-based DMX starting address, 1-512.
    pub starting_address: u16,
    /// Grid tile this fixture follows. Only meaningful for partitioned
    /// fixtures; a partitioned fixture without a position renders nothing.
    pub position: Option<GridPosition>,
}

impl Fixture {
    /// Place a template at `starting_address`, copying its channel layout.
    pub fn place(
        template: &FixtureTemplate,
        starting_address: u16,
        position: Option<GridPosition>,
    ) -> Result<Self, ConfigError> {
        if !(DMX_ADDRESS_MIN..=DMX_ADDRESS_MAX).contains(&starting_address) {
            return Err(ConfigError::AddressOutOfRange(starting_address));
        }
        Ok(Self {
            name: template.name.clone(),
            channels: template.channels.clone(),
            color_mode: template.color_mode,
            starting_address,
            position,
        })
    }
}

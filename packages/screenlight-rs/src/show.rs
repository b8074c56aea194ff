//! Show model and JSON show-config loading.

use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::catalog::FixtureCatalog;
use crate::error::ConfigError;
use crate::fixture::{Fixture, FixtureTemplate, GridPosition};

/// Ordered set of placed fixtures driving one universe.
///
/// Placement order matters: fixtures are rendered first to last, so when two
/// fixtures map the same channel the later placement wins.
#[derive(Debug, Clone, Default)]
pub struct Show {
    fixtures: Vec<Fixture>,
}

impl Show {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show over an already-placed fixture sequence, order preserved.
    pub fn from_fixtures(fixtures: Vec<Fixture>) -> Self {
        Self { fixtures }
    }

    /// Place a template into the show at `starting_address`.
    pub fn place(
        &mut self,
        template: &FixtureTemplate,
        starting_address: u16,
        position: Option<GridPosition>,
    ) -> Result<(), ConfigError> {
        let fixture = Fixture::place(template, starting_address, position)?;
        self.fixtures.push(fixture);
        Ok(())
    }

    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Drop every placed fixture, e.g. before loading a new configuration.
    pub fn clear(&mut self) {
        self.fixtures.clear();
    }

    pub fn len(&self) -> usize {
        self.fixtures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixtures.is_empty()
    }
}

/// One placement record in a show config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacementConfig {
    /// Catalog template name.
    pub fixture: String,
    pub starting_address: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<GridPosition>,
}

/// On-disk show description.
///
/// ```json
/// {
///   "name": "club-rig",
///   "fixtures": [
///     { "fixture": "rgb-par", "starting_address": 1 },
///     { "fixture": "tile-wash", "starting_address": 10,
///       "position": { "column": 0, "row": 0 } }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub fixtures: Vec<PlacementConfig>,
}

impl ShowConfig {
    /// Load a show config from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Resolve placement records against a catalog.
    ///
    /// Bad records (unknown template, address out of range) are skipped with
    /// a warning rather than failing the whole show; the problems are
    /// returned alongside the resolved show so callers can report them.
    pub fn resolve(&self, catalog: &FixtureCatalog) -> (Show, Vec<ConfigError>) {
        let mut show = Show::new();
        let mut problems = Vec::new();

        for record in &self.fixtures {
            let Some(template) = catalog.get(&record.fixture) else {
                warn!("Skipping unknown fixture template '{}'", record.fixture);
                problems.push(ConfigError::UnknownTemplate(record.fixture.clone()));
                continue;
            };
            if let Err(e) = show.place(template, record.starting_address, record.position) {
                warn!("Skipping fixture '{}': {}", record.fixture, e);
                problems.push(e);
            }
        }

        (show, problems)
    }
}

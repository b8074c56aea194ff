//! Catalog of named fixture templates.

use std::collections::HashMap;

use crate::fixture::{ChannelRole, ColorMode, FixtureTemplate};

/// Named collection of fixture templates a show can place from.
#[derive(Debug, Clone, Default)]
pub struct FixtureCatalog {
    templates: Vec<FixtureTemplate>,
}

impl FixtureCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog seeded with the stock fixture templates.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.add(FixtureTemplate::new(
            "rgb-par",
            HashMap::from([
                (ChannelRole::Red, 0),
                (ChannelRole::Green, 1),
                (ChannelRole::Blue, 2),
            ]),
            ColorMode::Global,
        ));
        catalog.add(FixtureTemplate::new(
            "rgbi-par",
            HashMap::from([
                (ChannelRole::Intensity, 0),
                (ChannelRole::Red, 1),
                (ChannelRole::Green, 2),
                (ChannelRole::Blue, 3),
            ]),
            ColorMode::Global,
        ));
        catalog.add(FixtureTemplate::new(
            "hex-wash",
            HashMap::from([
                (ChannelRole::Intensity, 0),
                (ChannelRole::Red, 1),
                (ChannelRole::Green, 2),
                (ChannelRole::Blue, 3),
                (ChannelRole::Indigo, 4),
                (ChannelRole::Lime, 5),
            ]),
            ColorMode::Global,
        ));
        catalog.add(FixtureTemplate::new(
            "tile-wash",
            HashMap::from([
                (ChannelRole::Intensity, 0),
                (ChannelRole::Red, 1),
                (ChannelRole::Green, 2),
                (ChannelRole::Blue, 3),
            ]),
            ColorMode::Partitioned,
        ));
        catalog.add(FixtureTemplate::new(
            "moving-head",
            HashMap::from([
                (ChannelRole::Intensity, 0),
                (ChannelRole::Red, 1),
                (ChannelRole::Green, 2),
                (ChannelRole::Blue, 3),
                (ChannelRole::Strobe, 4),
                (ChannelRole::Zoom, 5),
                (ChannelRole::Fan, 6),
            ]),
            ColorMode::Global,
        ));
        catalog
    }

    /// Add a template, replacing any existing template with the same name.
    pub fn add(&mut self, template: FixtureTemplate) {
        if let Some(existing) = self.templates.iter_mut().find(|t| t.name == template.name) {
            *existing = template;
        } else {
            self.templates.push(template);
        }
    }

    /// Look up a template by name.
    pub fn get(&self, name: &str) -> Option<&FixtureTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    /// All templates in insertion order.
    pub fn templates(&self) -> &[FixtureTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

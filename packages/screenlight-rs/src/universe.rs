//! Channel derivation and universe buffer building.

use crate::fixture::{ChannelRole, ColorMode, Fixture};
use crate::sampler::{FrameAggregates, RegionAggregate};
use crate::show::Show;

/// Number of channels carried in one universe buffer.
///
/// DMX addresses 1-512 are patchable, but the transmitted frame spans
/// addresses 1-511 only; a fixture patched at 512 resolves past the end of
/// the buffer and all of its writes are dropped by the bounds check.
pub const UNIVERSE_CHANNELS: usize = 511;

/// One full universe of channel values. Index 0 holds address 1.
pub type UniverseBuffer = [u8; UNIVERSE_CHANNELS];

/// Byte values derived from one region's color averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelLevels {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub intensity: u8,
    pub indigo: u8,
    pub lime: u8,
}

impl ChannelLevels {
    /// Derive levels from a region aggregate, applying the sensitivity gate.
    ///
    /// Averages use floor division. A region whose combined average
    /// brightness is at or below the threshold is treated as black; the
    /// zeroed averages then flow into every derived value. An empty region
    /// (zero pixels) is black as well.
    pub fn from_region(aggregate: &RegionAggregate, sensitivity: u8) -> Self {
        let (mut red, mut green, mut blue) = if aggregate.pixel_count > 0 {
            (
                (aggregate.sum_red / aggregate.pixel_count).min(255) as u8,
                (aggregate.sum_green / aggregate.pixel_count).min(255) as u8,
                (aggregate.sum_blue / aggregate.pixel_count).min(255) as u8,
            )
        } else {
            (0, 0, 0)
        };

        if red as u32 + green as u32 + blue as u32 <= sensitivity as u32 {
            red = 0;
            green = 0;
            blue = 0;
        }

        Self::from_color(red, green, blue)
    }

    /// Derive levels from one flat color.
    ///
    /// Intensity is the brightest of the three averages. Indigo and lime are
    /// weighted blends matching the emitters of multi-color wash fixtures,
    /// truncated and capped at 255.
    pub fn from_color(red: u8, green: u8, blue: u8) -> Self {
        let intensity = red.max(green).max(blue);
        let indigo = (0.1 * red as f64 + 0.5 * blue as f64).min(255.0) as u8;
        let lime = (0.1 * red as f64 + 0.9 * green as f64 + 0.1 * blue as f64).min(255.0) as u8;
        Self {
            red,
            green,
            blue,
            intensity,
            indigo,
            lime,
        }
    }

    /// Value a channel role receives from these levels.
    ///
    /// Roles never derived from color (strobe, zoom, fan) are driven to 0 so
    /// a mapped effect channel rests dark instead of holding stale data.
    pub fn value(&self, role: ChannelRole) -> u8 {
        match role {
            ChannelRole::Intensity => self.intensity,
            ChannelRole::Red => self.red,
            ChannelRole::Green => self.green,
            ChannelRole::Blue => self.blue,
            ChannelRole::Indigo => self.indigo,
            ChannelRole::Lime => self.lime,
            ChannelRole::Strobe | ChannelRole::Zoom | ChannelRole::Fan => 0,
        }
    }
}

/// Aggregate a fixture follows, per its color mode.
///
/// A partitioned fixture with no position, or a position outside the current
/// grid, follows nothing and is skipped for the frame.
fn fixture_aggregate<'a>(
    fixture: &Fixture,
    aggregates: &'a FrameAggregates,
) -> Option<&'a RegionAggregate> {
    match fixture.color_mode {
        ColorMode::Global => Some(&aggregates.whole),
        ColorMode::Partitioned => fixture.position.and_then(|p| aggregates.tile(p)),
    }
}

/// Write one fixture's channels into the buffer.
///
/// The absolute offset of a role is `starting_address - 1 + mapped offset`
/// (addresses are 1-based, the buffer 0-based). Offsets past the end of the
/// buffer are silently dropped.
fn apply_fixture(buffer: &mut UniverseBuffer, fixture: &Fixture, levels: ChannelLevels) {
    for (&role, &offset) in &fixture.channels {
        let index = fixture.starting_address.saturating_sub(1) as usize + offset as usize;
        if index < UNIVERSE_CHANNELS {
            buffer[index] = levels.value(role);
        }
    }
}

/// Build a universe buffer for one sampled frame.
///
/// Fixtures apply in show order over a zeroed buffer; when two fixtures map
/// the same absolute offset, the later placement wins.
pub fn build_universe(show: &Show, aggregates: &FrameAggregates, sensitivity: u8) -> UniverseBuffer {
    let mut buffer = [0u8; UNIVERSE_CHANNELS];
    for fixture in show.fixtures() {
        if let Some(aggregate) = fixture_aggregate(fixture, aggregates) {
            let levels = ChannelLevels::from_region(aggregate, sensitivity);
            apply_fixture(&mut buffer, fixture, levels);
        }
    }
    buffer
}

/// Build a universe holding one flat color on every fixture in the show,
/// independent of any captured frame.
pub fn build_manual_universe(show: &Show, red: u8, green: u8, blue: u8) -> UniverseBuffer {
    let levels = ChannelLevels::from_color(red, green, blue);
    let mut buffer = [0u8; UNIVERSE_CHANNELS];
    for fixture in show.fixtures() {
        apply_fixture(&mut buffer, fixture, levels);
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{FixtureTemplate, GridPosition};
    use crate::sampler::{sample_frame, Frame, GridSize};

    fn template(name: &str, channels: &[(ChannelRole, u16)], mode: ColorMode) -> FixtureTemplate {
        FixtureTemplate::new(name, channels.iter().copied().collect(), mode)
    }

    fn solid_frame(width: u32, height: u32, r: u8, g: u8, b: u8) -> Frame {
        let mut data = Vec::with_capacity(Frame::expected_len(width, height));
        for _ in 0..width * height {
            data.extend_from_slice(&[b, g, r]);
        }
        Frame::new(width, height, data)
    }

    #[test]
    fn test_average_uses_floor_division() {
        let aggregate = RegionAggregate {
            sum_red: 7,
            sum_green: 5,
            sum_blue: 3,
            pixel_count: 2,
        };
        let levels = ChannelLevels::from_region(&aggregate, 0);
        assert_eq!((levels.red, levels.green, levels.blue), (3, 2, 1));
    }

    #[test]
    fn test_empty_region_is_black() {
        let levels = ChannelLevels::from_region(&RegionAggregate::default(), 0);
        assert_eq!(levels, ChannelLevels::default());
    }

    #[test]
    fn test_sensitivity_gate_is_inclusive() {
        let aggregate = RegionAggregate {
            sum_red: 10,
            sum_green: 10,
            sum_blue: 10,
            pixel_count: 1,
        };
        // Combined average brightness is exactly 30.
        let gated = ChannelLevels::from_region(&aggregate, 30);
        assert_eq!(gated, ChannelLevels::default());
        assert_eq!(gated.intensity, 0);
        assert_eq!(gated.indigo, 0);
        assert_eq!(gated.lime, 0);

        let passed = ChannelLevels::from_region(&aggregate, 29);
        assert_eq!(passed.red, 10);
        assert_eq!(passed.intensity, 10);
    }

    #[test]
    fn test_derived_channel_formulas() {
        let levels = ChannelLevels::from_color(100, 50, 25);
        assert_eq!(levels.intensity, 100);
        // 0.1*100 + 0.5*25 = 22.5, truncated.
        assert_eq!(levels.indigo, 22);
        // 0.1*100 + 0.9*50 + 0.1*25 = 57.5, truncated.
        assert_eq!(levels.lime, 57);

        let saturated = ChannelLevels::from_color(255, 255, 255);
        assert_eq!(saturated.indigo, 153);
        assert_eq!(saturated.lime, 255);
    }

    #[test]
    fn test_effect_roles_drive_zero() {
        let levels = ChannelLevels::from_color(200, 200, 200);
        assert_eq!(levels.value(ChannelRole::Strobe), 0);
        assert_eq!(levels.value(ChannelRole::Zoom), 0);
        assert_eq!(levels.value(ChannelRole::Fan), 0);
        assert_eq!(levels.value(ChannelRole::Red), 200);
    }

    #[test]
    fn test_partitioned_fixture_end_to_end() {
        let frame = solid_frame(4, 4, 100, 50, 25);
        let aggregates = sample_frame(&frame, GridSize::new(2, 2));

        let mut show = Show::new();
        show.place(
            &template(
                "corner",
                &[(ChannelRole::Intensity, 0), (ChannelRole::Red, 1)],
                ColorMode::Partitioned,
            ),
            10,
            Some(GridPosition::new(0, 0)),
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert_eq!(buffer[9], 100); // intensity = max(100, 50, 25)
        assert_eq!(buffer[10], 100); // red average
        for (i, &value) in buffer.iter().enumerate() {
            if i != 9 && i != 10 {
                assert_eq!(value, 0, "unexpected write at index {}", i);
            }
        }
    }

    #[test]
    fn test_global_fixture_uses_whole_frame() {
        let frame = solid_frame(4, 4, 100, 50, 25);
        let aggregates = sample_frame(&frame, GridSize::new(2, 2));

        let mut show = Show::new();
        show.place(
            &template("wide", &[(ChannelRole::Red, 0)], ColorMode::Global),
            1,
            None,
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert_eq!(buffer[0], 100);
    }

    #[test]
    fn test_partitioned_without_position_renders_nothing() {
        let frame = solid_frame(4, 4, 200, 200, 200);
        let aggregates = sample_frame(&frame, GridSize::new(2, 2));

        let mut show = Show::new();
        show.place(
            &template("stray", &[(ChannelRole::Red, 0)], ColorMode::Partitioned),
            1,
            None,
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert!(buffer.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_position_outside_grid_renders_nothing() {
        let frame = solid_frame(4, 4, 200, 200, 200);
        let aggregates = sample_frame(&frame, GridSize::new(2, 2));

        let mut show = Show::new();
        show.place(
            &template("ghost", &[(ChannelRole::Red, 0)], ColorMode::Partitioned),
            1,
            Some(GridPosition::new(7, 7)),
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert!(buffer.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_out_of_bounds_offsets_dropped() {
        let frame = solid_frame(2, 2, 255, 255, 255);
        let aggregates = sample_frame(&frame, GridSize::new(1, 1));

        // Address 511 + offset 5 lands past the buffer; offset 0 still fits.
        let mut show = Show::new();
        show.place(
            &template(
                "edge",
                &[(ChannelRole::Red, 0), (ChannelRole::Green, 5)],
                ColorMode::Global,
            ),
            511,
            None,
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert_eq!(buffer[510], 255);
        assert!(buffer[..510].iter().all(|&v| v == 0));
    }

    #[test]
    fn test_address_512_is_patchable_but_unreachable() {
        let frame = solid_frame(2, 2, 255, 255, 255);
        let aggregates = sample_frame(&frame, GridSize::new(1, 1));

        let mut show = Show::new();
        show.place(
            &template("last", &[(ChannelRole::Red, 0)], ColorMode::Global),
            512,
            None,
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert!(buffer.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_overlapping_fixtures_last_placed_wins() {
        let frame = solid_frame(2, 2, 80, 160, 240);
        let aggregates = sample_frame(&frame, GridSize::new(1, 1));

        let mut show = Show::new();
        show.place(
            &template("under", &[(ChannelRole::Red, 0)], ColorMode::Global),
            5,
            None,
        )
        .unwrap();
        show.place(
            &template("over", &[(ChannelRole::Blue, 0)], ColorMode::Global),
            5,
            None,
        )
        .unwrap();

        let buffer = build_universe(&show, &aggregates, 0);
        assert_eq!(buffer[4], 240);
    }

    #[test]
    fn test_manual_universe_repeats_pattern() {
        let channels = [
            (ChannelRole::Red, 0),
            (ChannelRole::Green, 1),
            (ChannelRole::Blue, 2),
            (ChannelRole::Intensity, 3),
        ];
        let mut show = Show::new();
        for address in [1, 21, 41] {
            show.place(
                &template("block", &channels, ColorMode::Global),
                address,
                None,
            )
            .unwrap();
        }

        let buffer = build_manual_universe(&show, 10, 20, 30);
        for base in [0usize, 20, 40] {
            assert_eq!(buffer[base], 10);
            assert_eq!(buffer[base + 1], 20);
            assert_eq!(buffer[base + 2], 30);
            assert_eq!(buffer[base + 3], 30); // intensity = max(10, 20, 30)
        }
    }

    #[test]
    fn test_manual_universe_covers_partitioned_fixtures() {
        let mut show = Show::new();
        show.place(
            &template("tile", &[(ChannelRole::Green, 0)], ColorMode::Partitioned),
            7,
            None,
        )
        .unwrap();

        let buffer = build_manual_universe(&show, 0, 128, 0);
        assert_eq!(buffer[6], 128);
    }
}

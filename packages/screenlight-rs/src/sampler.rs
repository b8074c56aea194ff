//! Region sampler: tiles a captured frame and sums color per tile.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::fixture::GridPosition;

/// Bytes per pixel in captured frames (B, G, R).
pub const BYTES_PER_PIXEL: usize = 3;

/// A captured frame: tightly packed rows of 3-byte B,G,R pixels.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Byte length a well-formed `width` x `height` frame must have.
    pub fn expected_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * BYTES_PER_PIXEL
    }
}

/// Sampling grid dimensions. Either axis below 1 clamps to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    pub fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn tile_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

/// Color sums over one pixel region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionAggregate {
    pub sum_red: u64,
    pub sum_green: u64,
    pub sum_blue: u64,
    pub pixel_count: u64,
}

impl RegionAggregate {
    pub fn merge(self, other: Self) -> Self {
        Self {
            sum_red: self.sum_red + other.sum_red,
            sum_green: self.sum_green + other.sum_green,
            sum_blue: self.sum_blue + other.sum_blue,
            pixel_count: self.pixel_count + other.pixel_count,
        }
    }
}

/// Sampler output: per-tile aggregates plus the whole-frame aggregate.
#[derive(Debug, Clone, Default)]
pub struct FrameAggregates {
    pub tiles: HashMap<GridPosition, RegionAggregate>,
    pub whole: RegionAggregate,
}

impl FrameAggregates {
    pub fn tile(&self, position: GridPosition) -> Option<&RegionAggregate> {
        self.tiles.get(&position)
    }
}

/// Pixel rectangle covered by one grid tile.
#[derive(Debug, Clone, Copy)]
struct TileRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Tile geometry for a frame: every tile spans `floor(W/cols)` by
/// `floor(H/rows)` pixels, except the last column/row on each axis, which
/// extends to the frame edge and absorbs the division remainder. The tiles
/// cover every pixel exactly once.
fn tile_rects(width: u32, height: u32, grid: GridSize) -> Vec<(GridPosition, TileRect)> {
    let tile_width = width / grid.columns();
    let tile_height = height / grid.rows();

    let mut rects = Vec::with_capacity(grid.tile_count());
    for row in 0..grid.rows() {
        for column in 0..grid.columns() {
            let x = column * tile_width;
            let y = row * tile_height;
            let w = if column == grid.columns() - 1 {
                width - x
            } else {
                tile_width
            };
            let h = if row == grid.rows() - 1 {
                height - y
            } else {
                tile_height
            };
            rects.push((
                GridPosition::new(column, row),
                TileRect {
                    x,
                    y,
                    width: w,
                    height: h,
                },
            ));
        }
    }
    rects
}

/// Sum the B,G,R bytes of one tile, rows in parallel.
fn sample_tile(frame: &Frame, rect: &TileRect) -> RegionAggregate {
    let stride = frame.width as usize * BYTES_PER_PIXEL;

    (rect.y..rect.y + rect.height)
        .into_par_iter()
        .map(|row| {
            let mut acc = RegionAggregate {
                pixel_count: rect.width as u64,
                ..Default::default()
            };
            let start = row as usize * stride + rect.x as usize * BYTES_PER_PIXEL;
            let end = start + rect.width as usize * BYTES_PER_PIXEL;
            for px in frame.data[start..end].chunks_exact(BYTES_PER_PIXEL) {
                acc.sum_blue += px[0] as u64;
                acc.sum_green += px[1] as u64;
                acc.sum_red += px[2] as u64;
            }
            acc
        })
        .reduce(RegionAggregate::default, RegionAggregate::merge)
}

/// Tile the frame and aggregate color sums per tile and for the whole frame.
///
/// The whole-frame aggregate is formed by summing the tile aggregates; since
/// the tiling covers each pixel exactly once this equals a full-frame pass.
pub fn sample_frame(frame: &Frame, grid: GridSize) -> FrameAggregates {
    let rects = tile_rects(frame.width, frame.height, grid);

    let tiles: HashMap<GridPosition, RegionAggregate> = rects
        .par_iter()
        .map(|(position, rect)| (*position, sample_tile(frame, rect)))
        .collect();

    let whole = tiles
        .values()
        .fold(RegionAggregate::default(), |acc, tile| acc.merge(*tile));

    FrameAggregates { tiles, whole }
}

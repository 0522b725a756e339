use serde::{Deserialize, Serialize};

use crate::*;

/// The region around the player that gets presented, with a margin of padding cells.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: LatLng,
    half_extent: u16,
    padding: u16,
}

impl Viewport {
    pub fn new(center: LatLng, config: ViewportConfig) -> Self {
        Self {
            center,
            half_extent: config.half_extent,
            padding: config.padding,
        }
    }

    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn recenter(&mut self, center: LatLng) {
        self.center = center;
    }

    /// Visible rectangle without padding.
    pub fn bounds(&self, mapper: &GridMapper) -> CellBounds {
        let reach = f64::from(self.half_extent) * mapper.cell_size();
        CellBounds::new(
            self.center.offset(-reach, -reach),
            self.center.offset(reach, reach),
        )
    }

    pub fn padded_bounds(&self, mapper: &GridMapper) -> CellBounds {
        let pad = f64::from(self.padding) * mapper.cell_size();
        self.bounds(mapper).padded(pad, pad)
    }

    /// Cells to present, and the cells whose overrides survive eviction.
    pub fn visible_cells(&self, mapper: &GridMapper) -> CellRange {
        mapper.cells_in(self.padded_bounds(mapper))
    }
}

use serde::{Deserialize, Serialize};

use crate::*;

/// Axis-aligned rectangle in continuous coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellBounds {
    pub min: LatLng,
    pub max: LatLng,
}

impl CellBounds {
    pub const fn new(min: LatLng, max: LatLng) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lng + self.max.lng) / 2.0,
        )
    }

    /// Half-open containment, matching how positions are floored into cells.
    pub fn contains(&self, pos: LatLng) -> bool {
        pos.lat >= self.min.lat
            && pos.lat < self.max.lat
            && pos.lng >= self.min.lng
            && pos.lng < self.max.lng
    }

    /// Grows every side by `lat` and `lng` degrees.
    pub fn padded(&self, lat: f64, lng: f64) -> Self {
        Self {
            min: self.min.offset(-lat, -lng),
            max: self.max.offset(lat, lng),
        }
    }
}

/// Smallest cell size, in degrees, for which every offset between two points on the globe
/// (at most 360 degrees) still fits an `i32` cell index.
pub const MIN_CELL_SIZE: f64 = 360.0 / i32::MAX as f64;

/// Quantizes the continuous plane into square cells of `cell_size` degrees anchored at `origin`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridMapper {
    origin: LatLng,
    cell_size: f64,
}

impl GridMapper {
    pub fn new(origin: LatLng, cell_size: f64) -> Result<Self> {
        if !origin.is_on_globe() {
            return Err(GameError::InvalidConfig("origin must be a point on the globe"));
        }
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GameError::InvalidConfig("cell size must be positive"));
        }
        if cell_size < MIN_CELL_SIZE {
            return Err(GameError::InvalidConfig("cell size is too small to index the globe"));
        }
        Ok(Self { origin, cell_size })
    }

    pub const fn origin(&self) -> LatLng {
        self.origin
    }

    pub const fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn to_cell(&self, pos: LatLng) -> Coord2 {
        (
            saturate_index(self.axis_offset(pos.lat, self.origin.lat).floor()),
            saturate_index(self.axis_offset(pos.lng, self.origin.lng).floor()),
        )
    }

    pub fn cell_bounds(&self, (i, j): Coord2) -> CellBounds {
        let size = self.cell_size;
        let min = LatLng::new(
            self.origin.lat + f64::from(i) * size,
            self.origin.lng + f64::from(j) * size,
        );
        CellBounds::new(min, min.offset(size, size))
    }

    pub fn cell_center(&self, cell: Coord2) -> LatLng {
        self.cell_bounds(cell).center()
    }

    /// Every cell whose rectangle intersects `bounds`.
    pub fn cells_in(&self, bounds: CellBounds) -> CellRange {
        let lower = |pos: f64, origin: f64| saturate_index(self.axis_offset(pos, origin).floor());
        let upper = |pos: f64, origin: f64, low: Coord| {
            saturate_index(self.axis_offset(pos, origin).ceil())
                .saturating_sub(1)
                .max(low)
        };

        if bounds.min.lat > bounds.max.lat || bounds.min.lng > bounds.max.lng {
            log::warn!("Inverted bounds {:?}, no cells selected", bounds);
            return CellRange::new((1, 1), (0, 0));
        }

        let min_i = lower(bounds.min.lat, self.origin.lat);
        let min_j = lower(bounds.min.lng, self.origin.lng);
        let max_i = upper(bounds.max.lat, self.origin.lat, min_i);
        let max_j = upper(bounds.max.lng, self.origin.lng, min_j);
        CellRange::new((min_i, min_j), (max_i, max_j))
    }

    fn axis_offset(&self, pos: f64, origin: f64) -> f64 {
        (pos - origin) / self.cell_size
    }
}

use serde::{Deserialize, Serialize};

/// Single cell index along one axis. Unbounded in both directions.
pub type Coord = i32;

/// Cell coordinates `(i, j)`: `i` along latitude, `j` along longitude.
pub type Coord2 = (Coord, Coord);

/// Token value of a cell; `0` is empty, every other legal value is a power of two.
pub type TokenValue = u32;

/// Largest value a merge can produce before doubling saturates.
pub const MAX_TOKEN: TokenValue = 1 << (TokenValue::BITS - 1);

/// Continuous position in degrees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Whether the position lies on the globe: latitude in `[-90, 90]`, longitude in `[-180, 180]`.
    pub fn is_on_globe(self) -> bool {
        self.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    pub fn offset(self, dlat: f64, dlng: f64) -> Self {
        Self::new(self.lat + dlat, self.lng + dlng)
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::new(lat, lng)
    }
}

impl core::fmt::Display for LatLng {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lng)
    }
}

pub trait TokenValueExt {
    fn is_token(self) -> bool;
    fn doubled(self) -> Self;
}

impl TokenValueExt for TokenValue {
    /// Non-zero power of two.
    fn is_token(self) -> bool {
        self.is_power_of_two()
    }

    fn doubled(self) -> Self {
        self.saturating_mul(2).min(MAX_TOKEN)
    }
}

/// Chebyshev distance between two cells, `max(|Δi|, |Δj|)`.
pub const fn chebyshev(a: Coord2, b: Coord2) -> u32 {
    let di = a.0.abs_diff(b.0);
    let dj = a.1.abs_diff(b.1);
    if di > dj { di } else { dj }
}

/// Saturating conversion of an already floored cell index.
pub(crate) fn saturate_index(value: f64) -> Coord {
    // `as` saturates on overflow and maps NaN to 0
    value as Coord
}

/// Inclusive rectangular range of cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRange {
    pub min: Coord2,
    pub max: Coord2,
}

impl CellRange {
    pub const fn new(min: Coord2, max: Coord2) -> Self {
        Self { min, max }
    }

    /// Range of all cells within `radius` steps of `center`.
    pub const fn around(center: Coord2, radius: Coord) -> Self {
        Self {
            min: (
                center.0.saturating_sub(radius),
                center.1.saturating_sub(radius),
            ),
            max: (
                center.0.saturating_add(radius),
                center.1.saturating_add(radius),
            ),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.min.0 > self.max.0 || self.min.1 > self.max.1
    }

    pub const fn contains(&self, (i, j): Coord2) -> bool {
        i >= self.min.0 && i <= self.max.0 && j >= self.min.1 && j <= self.max.1
    }

    pub fn rows(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.min.0.abs_diff(self.max.0)) + 1
        }
    }

    pub fn columns(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            u64::from(self.min.1.abs_diff(self.max.1)) + 1
        }
    }

    pub fn len(&self) -> u64 {
        self.rows() * self.columns()
    }

    /// Row-major iteration, northernmost row (highest `i`) first.
    pub fn iter(&self) -> CellIter {
        CellIter::new(*self)
    }
}

impl IntoIterator for CellRange {
    type Item = Coord2;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        CellIter::new(self)
    }
}

impl IntoIterator for &CellRange {
    type Item = Coord2;
    type IntoIter = CellIter;

    fn into_iter(self) -> Self::IntoIter {
        CellIter::new(*self)
    }
}

#[derive(Debug)]
pub struct CellIter {
    range: CellRange,
    next: Option<Coord2>,
}

impl CellIter {
    fn new(range: CellRange) -> Self {
        let next = (!range.is_empty()).then_some((range.max.0, range.min.1));
        Self { range, next }
    }
}

impl Iterator for CellIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        let (i, j) = current;

        self.next = if j < self.range.max.1 {
            Some((i, j + 1))
        } else if i > self.range.min.0 {
            Some((i - 1, self.range.min.1))
        } else {
            None
        };

        Some(current)
    }
}

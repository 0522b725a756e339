use crate::*;
pub use spawn::*;

mod spawn;

/// Source of the base token value of every cell.
///
/// Implementations must be pure: the same cell always yields the same value, in this process and
/// any other.
pub trait TokenGenerator {
    fn generate(&self, cell: Coord2) -> TokenValue;
}

impl<F> TokenGenerator for F
where
    F: Fn(Coord2) -> TokenValue,
{
    fn generate(&self, cell: Coord2) -> TokenValue {
        self(cell)
    }
}

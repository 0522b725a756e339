use std::collections::HashMap;

use crate::*;

/// Sparse record of every cell whose value diverged from its generated default.
///
/// A stored `0` means the cell was emptied and must not fall back to the generator.
#[derive(Clone, Debug)]
pub struct Overlay<G> {
    generator: G,
    cells: HashMap<Coord2, TokenValue>,
}

impl<G: TokenGenerator> Overlay<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            cells: HashMap::new(),
        }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn effective_value(&self, cell: Coord2) -> TokenValue {
        match self.cells.get(&cell) {
            Some(&value) => value,
            None => self.generator.generate(cell),
        }
    }

    pub fn set_value(&mut self, cell: Coord2, value: TokenValue) {
        self.cells.insert(cell, value);
    }

    pub fn is_overridden(&self, cell: Coord2) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Drops every override outside `visible`, returning how many were dropped.
    pub fn evict_outside(&mut self, visible: &CellRange) -> usize {
        let before = self.cells.len();
        self.cells.retain(|&cell, _| visible.contains(cell));
        let evicted = before - self.cells.len();
        if evicted > 0 {
            log::trace!("evicted {} overrides outside {:?}", evicted, visible);
        }
        evicted
    }

    pub fn overrides(&self) -> impl Iterator<Item = (Coord2, TokenValue)> + '_ {
        self.cells.iter().map(|(&cell, &value)| (cell, value))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagonal((i, j): Coord2) -> TokenValue {
        if i == j { 2 } else { 0 }
    }

    #[test]
    fn falls_back_to_generator() {
        let overlay = Overlay::new(diagonal);

        assert_eq!(overlay.effective_value((3, 3)), 2);
        assert_eq!(overlay.effective_value((3, 4)), 0);
        assert!(overlay.is_empty());
    }

    #[test]
    fn stored_zero_overrides_generated_value() {
        let mut overlay = Overlay::new(diagonal);

        overlay.set_value((1, 1), 0);

        assert_eq!(overlay.effective_value((1, 1)), 0);
        assert!(overlay.is_overridden((1, 1)));
    }

    #[test]
    fn set_value_upserts() {
        let mut overlay = Overlay::new(diagonal);

        overlay.set_value((0, 5), 4);
        overlay.set_value((0, 5), 8);

        assert_eq!(overlay.effective_value((0, 5)), 8);
        assert_eq!(overlay.len(), 1);
    }

    #[test]
    fn eviction_reverts_to_generated_values() {
        let mut overlay = Overlay::new(diagonal);
        overlay.set_value((0, 0), 0);
        overlay.set_value((10, 10), 16);
        overlay.set_value((-4, 2), 4);

        let evicted = overlay.evict_outside(&CellRange::around((0, 0), 5));

        assert_eq!(evicted, 1);
        assert_eq!(overlay.effective_value((10, 10)), 2);
        assert_eq!(overlay.effective_value((0, 0)), 0);
        assert_eq!(overlay.effective_value((-4, 2)), 4);

        let mut remaining: Vec<_> = overlay.overrides().collect();
        remaining.sort_unstable();
        assert_eq!(remaining, vec![((-4, 2), 4), ((0, 0), 0)]);
    }
}

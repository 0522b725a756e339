use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use super::*;

/// One density band: rolls below `below` (and above the previous band) spawn `value`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnBand {
    pub below: f64,
    pub value: TokenValue,
}

impl SpawnBand {
    pub const fn new(below: f64, value: TokenValue) -> Self {
        Self { below, value }
    }
}

/// Maps a roll in `[0, 1)` to a token value. Rolls past the last band are empty cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SpawnTable {
    pub salt: String,
    pub bands: Vec<SpawnBand>,
}

impl Default for SpawnTable {
    fn default() -> Self {
        Self {
            salt: String::from("spawn"),
            bands: vec![
                SpawnBand::new(0.15, 2),
                SpawnBand::new(0.20, 4),
                SpawnBand::new(0.22, 8),
            ],
        }
    }
}

impl SpawnTable {
    pub fn validate(&self) -> Result<()> {
        let mut previous = 0.0;
        for band in &self.bands {
            if !(band.below > previous && band.below <= 1.0) {
                return Err(GameError::InvalidConfig(
                    "spawn bands must be increasing and within (0, 1]",
                ));
            }
            if !band.value.is_token() {
                return Err(GameError::InvalidConfig(
                    "spawn values must be non-zero powers of two",
                ));
            }
            previous = band.below;
        }
        Ok(())
    }

    pub fn value_for(&self, roll: f64) -> TokenValue {
        self.bands
            .iter()
            .find(|band| roll < band.below)
            .map_or(0, |band| band.value)
    }

    /// Probability of each band's value, in band order.
    pub fn probabilities(&self) -> impl Iterator<Item = (TokenValue, f64)> + '_ {
        let lower_bounds = std::iter::once(0.0).chain(self.bands.iter().map(|band| band.below));
        self.bands
            .iter()
            .zip(lower_bounds)
            .map(|(band, lower)| (band.value, band.below - lower))
    }

    /// Probability that a cell spawns any token at all.
    pub fn density(&self) -> f64 {
        self.bands.last().map_or(0.0, |band| band.below)
    }
}

/// Seeded-hash generator: hashes `"<salt>:<i>,<j>"` with xxh3, seeds a PCG stream with it and
/// rolls once.
#[derive(Clone, Debug, PartialEq)]
pub struct SpawnGenerator {
    table: SpawnTable,
}

impl SpawnGenerator {
    pub fn new(table: SpawnTable) -> Result<Self> {
        table.validate()?;
        Ok(Self { table })
    }

    pub fn table(&self) -> &SpawnTable {
        &self.table
    }

    /// The roll in `[0, 1)` behind a cell's value.
    pub fn roll(&self, cell: Coord2) -> f64 {
        let key = self.cell_key(cell);
        let mut rng = Pcg32::seed_from_u64(xxh3_64(key.as_bytes()));
        rng.random::<f64>()
    }

    /// The string hashed for `cell`; the salt keeps layouts of different tables apart.
    pub fn cell_key(&self, (i, j): Coord2) -> String {
        format!("{}:{},{}", self.table.salt, i, j)
    }
}

impl Default for SpawnGenerator {
    fn default() -> Self {
        Self {
            table: SpawnTable::default(),
        }
    }
}

impl TokenGenerator for SpawnGenerator {
    fn generate(&self, cell: Coord2) -> TokenValue {
        self.table.value_for(self.roll(cell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_spells_salt_and_cell() {
        let generator = SpawnGenerator::default();

        assert_eq!(generator.cell_key((0, 0)), "spawn:0,0");
        assert_eq!(generator.cell_key((-12, 345)), "spawn:-12,345");
    }

    #[test]
    fn roll_is_seeded_from_the_key_hash() {
        let generator = SpawnGenerator::default();
        let cell = (7, -3);
        let seed = xxh3_64(generator.cell_key(cell).as_bytes());

        let expected = Pcg32::seed_from_u64(seed).random::<f64>();
        assert_eq!(generator.roll(cell), expected);
    }

    #[test]
    fn generation_is_repeatable() {
        let first = SpawnGenerator::default();
        let second = SpawnGenerator::default();

        for cell in CellRange::around((0, 0), 20) {
            assert_eq!(first.generate(cell), first.generate(cell));
            assert_eq!(first.generate(cell), second.generate(cell));
        }
    }

    #[test]
    fn rolls_stay_in_unit_interval() {
        let generator = SpawnGenerator::default();

        for cell in CellRange::around((-400, 1_000), 15) {
            let roll = generator.roll(cell);
            assert!((0.0..1.0).contains(&roll), "{roll} for {cell:?}");
        }
    }

    #[test]
    fn salt_changes_layout() {
        let plain = SpawnGenerator::default();
        let salted = SpawnGenerator::new(SpawnTable {
            salt: String::from("other"),
            ..SpawnTable::default()
        })
        .unwrap();

        let differing = CellRange::around((0, 0), 10)
            .iter()
            .filter(|&cell| plain.roll(cell) != salted.roll(cell))
            .count();
        assert!(differing > 400);
    }

    #[test]
    fn value_for_follows_bands() {
        let table = SpawnTable::default();

        assert_eq!(table.value_for(0.0), 2);
        assert_eq!(table.value_for(0.1499), 2);
        assert_eq!(table.value_for(0.15), 4);
        assert_eq!(table.value_for(0.2), 8);
        assert_eq!(table.value_for(0.2199), 8);
        assert_eq!(table.value_for(0.22), 0);
        assert_eq!(table.value_for(0.9999), 0);
    }

    #[test]
    fn frequencies_match_band_widths() {
        let generator = SpawnGenerator::default();
        let sample = CellRange::around((123, -456), 100);
        let total = sample.len() as f64;

        let mut counts = [0u32; 4];
        for cell in sample {
            match generator.generate(cell) {
                0 => counts[0] += 1,
                2 => counts[1] += 1,
                4 => counts[2] += 1,
                8 => counts[3] += 1,
                other => panic!("unexpected spawn {other}"),
            }
        }

        let expected: Vec<_> = generator.table().probabilities().collect();
        assert_eq!(expected.len(), 3);
        for ((_, probability), &count) in expected.iter().zip(&counts[1..]) {
            let observed = f64::from(count) / total;
            assert!(
                (observed - probability).abs() < 0.01,
                "observed {observed}, expected {probability}"
            );
        }
        let empty = f64::from(counts[0]) / total;
        assert!((empty - (1.0 - generator.table().density())).abs() < 0.015);
    }

    #[test]
    fn rejects_bad_tables() {
        let unordered = SpawnTable {
            bands: vec![SpawnBand::new(0.5, 2), SpawnBand::new(0.4, 4)],
            ..SpawnTable::default()
        };
        let not_power = SpawnTable {
            bands: vec![SpawnBand::new(0.5, 3)],
            ..SpawnTable::default()
        };
        let past_one = SpawnTable {
            bands: vec![SpawnBand::new(1.5, 2)],
            ..SpawnTable::default()
        };

        assert!(SpawnGenerator::new(unordered).is_err());
        assert!(SpawnGenerator::new(not_power).is_err());
        assert!(SpawnGenerator::new(past_one).is_err());
        assert!(SpawnGenerator::new(SpawnTable::default()).is_ok());
    }
}

use ndarray::Array2;
use rand::prelude::*;
use rand_pcg::Pcg32;

use super::*;

/// Reproducible generator: the layout of a level depends only on its number and the seed prefix, so retrying a
/// level shows the same grid again.
#[derive(Clone, Debug, PartialEq)]
pub struct SeededLevelGenerator {
    size: Coord2,
    policy: DemonPolicy,
    seed_prefix: String,
}

impl SeededLevelGenerator {
    pub fn new((width, height): Coord2, policy: DemonPolicy, seed_prefix: impl Into<String>) -> Self {
        Self {
            size: (width.max(1), height.max(1)),
            policy,
            seed_prefix: seed_prefix.into(),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.size(),
            DemonPolicy::new(config.max_demons),
            config.seed_prefix.clone(),
        )
    }

    pub fn seed_for_level(&self, level: u32) -> u64 {
        fnv1a(format!("{} {}", self.seed_prefix, level).as_bytes())
    }
}

impl LevelGenerator for SeededLevelGenerator {
    fn generate(&self, level: u32) -> Grid {
        let level = level.max(1);
        let (width, height) = self.size;
        let total_cells = mult(width, height);
        let demons = self.policy.demons_for_level(level, total_cells);
        let seed = self.seed_for_level(level);
        let mut rng = Pcg32::seed_from_u64(seed);

        let mut cells = Array2::from_elem(self.size.to_nd_index(), Cell::Demon);
        let mut demons_left = demons;
        let mut scanned: CellCount = 0;
        for x in 0..width {
            for y in 0..height {
                // each cell takes a demon with probability demons_left / remaining, so the count is always exact
                let remaining = total_cells - scanned;
                let is_demon = demons_left > 0 && rng.random_range(0..remaining) < demons_left;
                cells[(x, y).to_nd_index()] = if is_demon {
                    demons_left -= 1;
                    Cell::Demon
                } else {
                    Cell::Rune(Rune::new_unchecked(rng.random_range(1..=RUNE_KINDS)))
                };
                scanned += 1;
            }
        }

        let grid = Grid::new_unchecked(cells);
        log::debug!(
            "Generated level {} with {} demons (seed {:#018x})",
            level,
            demons,
            seed
        );
        log::trace!("Level {} layout:\n{}", level, grid);
        grid
    }
}

/// 64-bit FNV-1a, stable across platforms and toolchains unlike `DefaultHasher`.
const fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    let mut hash = OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(PRIME);
        i += 1;
    }
    hash
}

use crate::*;

/// Converts every demon flanked by two `rune` cells into `rune`, scanning rows first, then columns.
///
/// Conversions are applied as they are found, so a later match can rely on an earlier one. The scan stops at the
/// grid edges and never matches across the toroidal seam. Returns the converted cells in the order they were found.
pub fn summon(grid: &mut Grid, rune: Rune) -> Vec<Coord2> {
    let (width, height) = grid.size();
    let target = Cell::Rune(rune);
    let mut matches = Vec::new();

    for x in 0..width.saturating_sub(2) {
        for y in 0..height {
            if grid[(x, y)] == target && grid[(x + 1, y)].is_demon() && grid[(x + 2, y)] == target {
                convert(grid, (x + 1, y), target, &mut matches);
            }
        }
    }

    for x in 0..width {
        for y in 0..height.saturating_sub(2) {
            if grid[(x, y)] == target && grid[(x, y + 1)].is_demon() && grid[(x, y + 2)] == target {
                convert(grid, (x, y + 1), target, &mut matches);
            }
        }
    }

    log::debug!(
        "Summoned rune {}: {} demons converted, {} left",
        rune,
        matches.len(),
        grid.demon_count()
    );
    matches
}

fn convert(grid: &mut Grid, coords: Coord2, target: Cell, matches: &mut Vec<Coord2>) {
    log::trace!("Demon at {:?} overwhelmed", coords);
    if grid.set(coords, target).is_ok() {
        matches.push(coords);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(columns: &[&[u8]]) -> Grid {
        Grid::from_columns(columns.iter().map(|column| column.to_vec()).collect()).unwrap()
    }

    fn rune(kind: u8) -> Rune {
        Rune::new(kind).unwrap()
    }

    #[test]
    fn converts_flanked_demon_and_clears_grid() {
        let mut g = grid(&[&[1, 0, 1], &[2, 2, 2], &[3, 3, 3]]);

        let matches = summon(&mut g, rune(1));

        assert_eq!(matches, [(0, 1)]);
        assert_eq!(g[(0, 1)], Cell::Rune(rune(1)));
        assert_eq!(g.demon_count(), 0);
        assert!(g.is_cleared());
    }

    #[test]
    fn horizontal_matches_come_before_vertical() {
        // demon at (1, 0) flanked horizontally, demon at (0, 2) flanked vertically
        let mut g = grid(&[&[4, 4, 0, 4], &[0, 2, 2, 2], &[4, 3, 3, 3]]);

        let matches = summon(&mut g, rune(4));

        assert_eq!(matches, [(1, 0), (0, 2)]);
        assert!(g.is_cleared());
    }

    #[test]
    fn no_match_leaves_grid_untouched() {
        let original = grid(&[&[1, 0, 2], &[2, 2, 2], &[3, 3, 3]]);
        let mut g = original.clone();

        assert!(summon(&mut g, rune(1)).is_empty());
        assert!(summon(&mut g, rune(6)).is_empty());
        assert_eq!(g, original);
    }

    #[test]
    fn scan_does_not_wrap_across_the_seam() {
        // row reads 0 1 2 1, the demon is only flanked by rune 1 through the wraparound
        let mut g = grid(&[&[0], &[1], &[2], &[1]]);
        assert!(summon(&mut g, rune(1)).is_empty());
        assert_eq!(g.demon_count(), 1);
    }

    #[test]
    fn adjacent_demons_need_both_flanks() {
        let mut g = grid(&[&[5], &[0], &[0], &[5]]);
        assert!(summon(&mut g, rune(5)).is_empty());
        assert_eq!(g.demon_count(), 2);
    }

    #[test]
    fn vertical_scan_sees_horizontal_conversions() {
        // (1, 1) is converted by the row scan, which completes the column pattern around (1, 2)
        let mut g = grid(&[&[2, 3, 2, 2], &[3, 0, 0, 3], &[2, 3, 2, 2]]);

        let matches = summon(&mut g, rune(3));

        assert_eq!(matches, [(1, 1), (1, 2)]);
        assert!(g.is_cleared());
    }

    #[test]
    fn summon_never_adds_demons() {
        let generator = SeededLevelGenerator::from_config(&GameConfig::default());
        for level in 1..=25 {
            let mut g = generator.generate(level);
            for kind in Rune::all() {
                let before = g.demon_count();
                let matches = summon(&mut g, kind);
                assert_eq!(g.demon_count() as usize, before as usize - matches.len());
            }
        }
    }

    #[test]
    fn small_grids_skip_short_axes() {
        let mut g = grid(&[&[0, 1]]);
        assert!(summon(&mut g, rune(1)).is_empty());
    }
}

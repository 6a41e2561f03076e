use std::fmt::Write;

use runes_core::{Axis, GridView, LineLayout, Phase, Tile};

pub(crate) fn glyph(tile: Tile) -> char {
    match tile {
        Tile::Hidden => '.',
        Tile::Demon => 'X',
        Tile::Rune(rune) => char::from(b'0' + rune.get()),
    }
}

/// Grid as text, one row per line under a header of column indices.
pub(crate) fn grid(view: &GridView) -> String {
    let (width, height) = view.size();
    let mut out = String::from("   ");
    for x in 0..width {
        let _ = write!(out, " {x}");
    }
    for y in 0..height {
        let _ = write!(out, "\n{y:>2} ");
        for x in 0..width {
            let _ = write!(out, " {}", glyph(view.tile_at((x, y))));
        }
    }
    out
}

/// The dragged line as it sits mid-gesture, cells ordered by where they are drawn.
pub(crate) fn line_preview(layout: &LineLayout, view: &GridView) -> String {
    let mut cells: Vec<(f32, Tile)> = layout
        .positions
        .iter()
        .enumerate()
        .map(|(i, &position)| {
            let coords = match layout.axis {
                Axis::Horizontal => (i as u8, layout.index),
                Axis::Vertical => (layout.index, i as u8),
            };
            (position, view.tile_at(coords))
        })
        .collect();
    cells.sort_by(|a, b| a.0.total_cmp(&b.0));

    let name = if layout.axis.is_horizontal() { "row" } else { "column" };
    let glyphs: String = cells.iter().map(|&(_, tile)| glyph(tile)).collect();
    format!("{name} {} -> {glyphs}", layout.index)
}

pub(crate) fn banner(phase: Phase, level: u32, reveal_secs: u32) -> String {
    match phase {
        Phase::PreGame => format!("Level {level}. Prepare to show all runes."),
        Phase::ShowAll => format!("Look at runes positions before they hide. ({reveal_secs}s)"),
        Phase::MoveAndSummon => "Move rows and columns to overwhelm evils.".to_string(),
        Phase::Retry => "You lost.".to_string(),
        Phase::NextLevel => "You have won.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use runes_core::{Grid, ViewFilter};

    use super::*;

    fn sample() -> Grid {
        Grid::from_columns(vec![vec![1, 2, 3], vec![4, 0, 5], vec![6, 2, 1]]).unwrap()
    }

    #[test]
    fn full_view_shows_every_code() {
        let text = grid(&sample().view(ViewFilter::All));
        assert_eq!(text, "    0 1 2\n 0  1 4 6\n 1  2 X 2\n 2  3 5 1");
    }

    #[test]
    fn demon_view_hides_runes() {
        let text = grid(&sample().view(ViewFilter::DemonsOnly));
        assert_eq!(text, "    0 1 2\n 0  . . .\n 1  . X .\n 2  . . .");
    }

    #[test]
    fn preview_orders_cells_by_position() {
        let layout = LineLayout {
            axis: Axis::Horizontal,
            index: 0,
            positions: vec![82.0, 164.0, 0.0],
        };
        let view = sample().view(ViewFilter::All);
        assert_eq!(line_preview(&layout, &view), "row 0 -> 614");
    }

    #[test]
    fn banners_follow_phase() {
        assert_eq!(banner(Phase::Retry, 3, 56), "You lost.");
        assert!(banner(Phase::PreGame, 3, 56).starts_with("Level 3."));
        assert!(banner(Phase::ShowAll, 3, 56).ends_with("(56s)"));
    }
}

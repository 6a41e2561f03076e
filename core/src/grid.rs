use core::fmt;
use core::ops::Index;
use ndarray::{Array2, ArrayViewMut1, Axis as NdAxis};
use serde::{Deserialize, Serialize};

use crate::*;

/// Toroidal grid of cells, indexed `[x, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    cells: Array2<Cell>,
}

impl Grid {
    pub(crate) fn new_unchecked(cells: Array2<Cell>) -> Self {
        Self { cells }
    }

    pub fn from_cells(cells: Array2<Cell>) -> Result<Self> {
        let (width, height) = cells.dim();
        if width == 0 || height == 0 {
            return Err(GameError::InvalidBoardShape);
        }
        if Coord::try_from(width).is_err() || Coord::try_from(height).is_err() {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self { cells })
    }

    /// Builds a grid from numeric cell codes, one inner vector per column.
    pub fn from_columns(columns: Vec<Vec<u8>>) -> Result<Self> {
        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if columns.iter().any(|column| column.len() != height) {
            return Err(GameError::InvalidBoardShape);
        }

        let codes: Vec<u8> = columns.into_iter().flatten().collect();
        let cells = codes
            .into_iter()
            .map(Cell::from_code)
            .collect::<Result<Vec<_>>>()?;
        let cells = Array2::from_shape_vec((width, height), cells)
            .map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_cells(cells)
    }

    pub fn size(&self) -> Coord2 {
        let (width, height) = self.cells.dim();
        (width as Coord, height as Coord)
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (width, height) = self.size();
        mult(width, height)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size.0 && coords.1 < size.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self.cells[coords.to_nd_index()])
    }

    pub fn set(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self.cells[coords.to_nd_index()] = cell;
        Ok(())
    }

    /// Cell at any signed position, reduced modulo the grid dimensions.
    pub fn wrapped(&self, x: i32, y: i32) -> Cell {
        let (width, height) = self.size();
        let x = x.rem_euclid(width.into()) as usize;
        let y = y.rem_euclid(height.into()) as usize;
        self.cells[[x, y]]
    }

    pub fn row(&self, y: Coord) -> Result<Vec<Cell>> {
        self.validate_coords((0, y))?;
        Ok(self.cells.index_axis(NdAxis(1), y.into()).to_vec())
    }

    pub fn column(&self, x: Coord) -> Result<Vec<Cell>> {
        self.validate_coords((x, 0))?;
        Ok(self.cells.index_axis(NdAxis(0), x.into()).to_vec())
    }

    /// Rotates row `y` so that `cell[x] = old[(x - delta) mod width]`.
    pub fn shift_row(&mut self, y: Coord, delta: i32) -> Result<()> {
        self.validate_coords((0, y))?;
        rotate_line(self.cells.index_axis_mut(NdAxis(1), y.into()), delta);
        Ok(())
    }

    /// Rotates column `x` so that `cell[y] = old[(y - delta) mod height]`.
    pub fn shift_column(&mut self, x: Coord, delta: i32) -> Result<()> {
        self.validate_coords((x, 0))?;
        rotate_line(self.cells.index_axis_mut(NdAxis(0), x.into()), delta);
        Ok(())
    }

    pub fn shift(&mut self, axis: Axis, index: Coord, delta: i32) -> Result<()> {
        match axis {
            Axis::Horizontal => self.shift_row(index, delta),
            Axis::Vertical => self.shift_column(index, delta),
        }
    }

    pub fn count_of(&self, cell: Cell) -> CellCount {
        self.cells
            .iter()
            .filter(|&&other| other == cell)
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }

    pub fn demon_count(&self) -> CellCount {
        self.count_of(Cell::Demon)
    }

    /// Whether every demon has been converted.
    pub fn is_cleared(&self) -> bool {
        !self.cells.iter().any(|cell| cell.is_demon())
    }

    /// Cells with their coordinates, x outer and y inner.
    pub fn iter(&self) -> impl Iterator<Item = (Coord2, Cell)> + '_ {
        self.cells
            .indexed_iter()
            .map(|((x, y), &cell)| ((x as Coord, y as Coord), cell))
    }

    pub fn view(&self, filter: ViewFilter) -> GridView {
        GridView {
            tiles: self.cells.map(|&cell| {
                if filter.shows(cell) {
                    cell.into()
                } else {
                    Tile::Hidden
                }
            }),
        }
    }
}

fn rotate_line(mut line: ArrayViewMut1<'_, Cell>, delta: i32) {
    let len = line.len();
    let shift = i64::from(delta).rem_euclid(len as i64) as usize;
    if shift == 0 {
        return;
    }

    let mut values = line.to_vec();
    values.rotate_right(shift);
    for (slot, value) in line.iter_mut().zip(values) {
        *slot = value;
    }
}

impl Index<Coord2> for Grid {
    type Output = Cell;

    fn index(&self, (x, y): Coord2) -> &Self::Output {
        &self.cells[(x as usize, y as usize)]
    }
}

/// Rows of cell codes, top to bottom.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (width, height) = self.size();
        for y in 0..height {
            for x in 0..width {
                if x > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", self[(x, y)].code())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Which cells a projection keeps visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewFilter {
    All,
    DemonsOnly,
    DemonsAnd(Rune),
}

impl ViewFilter {
    pub fn shows(self, cell: Cell) -> bool {
        match (self, cell) {
            (Self::All, _) => true,
            (_, Cell::Demon) => true,
            (Self::DemonsOnly, Cell::Rune(_)) => false,
            (Self::DemonsAnd(shown), Cell::Rune(rune)) => shown == rune,
        }
    }
}

/// Filtered snapshot of a grid, what the renderer is allowed to draw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridView {
    tiles: Array2<Tile>,
}

impl GridView {
    pub fn size(&self) -> Coord2 {
        let (width, height) = self.tiles.dim();
        (width as Coord, height as Coord)
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn codes(&self) -> Array2<u8> {
        self.tiles.map(|tile| tile.code())
    }

    pub fn hidden_count(&self) -> CellCount {
        self.tiles
            .iter()
            .filter(|tile| tile.is_hidden())
            .count()
            .try_into()
            .unwrap_or(CellCount::MAX)
    }
}

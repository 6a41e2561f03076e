use serde::{Deserialize, Serialize};

use crate::*;

/// Screen placement of the grid: top-left corner, cell side and dimensions in cells.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub origin: Point,
    pub cell_size: f32,
    pub size: Coord2,
}

impl Viewport {
    pub const fn new(origin: Point, cell_size: f32, size: Coord2) -> Self {
        Self {
            origin,
            cell_size,
            size,
        }
    }

    /// Viewport with the grid centered on `center`.
    pub fn centered(center: Point, cell_size: f32, size: Coord2) -> Self {
        let origin = Point::new(
            center.x - f32::from(size.0) * cell_size / 2.0,
            center.y - f32::from(size.1) * cell_size / 2.0,
        );
        Self::new(origin, cell_size, size)
    }

    /// Cell under `pos`, if any.
    pub fn cell_at(&self, pos: Point) -> Option<Coord2> {
        let x = ((pos.x - self.origin.x) / self.cell_size).floor();
        let y = ((pos.y - self.origin.y) / self.cell_size).floor();
        let (width, height) = self.size;
        let in_range = |value: f32, len: Coord| value >= 0.0 && value < f32::from(len);
        if in_range(x, width) && in_range(y, height) {
            Some((x as Coord, y as Coord))
        } else {
            None
        }
    }

    /// Number of cells in a line dragged along `axis`.
    pub const fn line_len(&self, axis: Axis) -> Coord {
        match axis {
            Axis::Horizontal => self.size.0,
            Axis::Vertical => self.size.1,
        }
    }

    /// Length in pixels of a line dragged along `axis`.
    pub fn extent(&self, axis: Axis) -> f32 {
        f32::from(self.line_len(axis)) * self.cell_size
    }
}

/// Ephemeral state of one pointer drag.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DragGesture {
    start_cell: Coord2,
    start: Point,
    lock: Option<Axis>,
    last: f32,
    offset: f32,
}

impl DragGesture {
    fn new(start_cell: Coord2, start: Point) -> Self {
        Self {
            start_cell,
            start,
            lock: None,
            last: 0.0,
            offset: 0.0,
        }
    }

    pub fn start_cell(&self) -> Coord2 {
        self.start_cell
    }

    pub fn axis(&self) -> Option<Axis> {
        self.lock
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    /// Pixels travelled along the locked axis, zero before the lock.
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Row or column being dragged, once the axis is known.
    pub fn line_index(&self) -> Option<Coord> {
        self.lock.map(|axis| match axis {
            Axis::Horizontal => self.start_cell.1,
            Axis::Vertical => self.start_cell.0,
        })
    }
}

/// Display positions of the dragged line's cells, along the locked axis and relative to the viewport origin.
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    pub axis: Axis,
    pub index: Coord,
    /// `positions[i]` is where the cell at line index `i` is drawn.
    pub positions: Vec<f32>,
}

/// Duplicate of the cell that straddles an edge of the viewport, drawn at the opposite edge while dragging.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SeamCell {
    pub coords: Coord2,
    pub position: f32,
    pub cell: Cell,
}

/// Turns pointer motion over the grid into whole-cell row and column shifts.
#[derive(Clone, Debug, PartialEq)]
pub struct DragShiftController {
    viewport: Viewport,
    dead_zone: f32,
    enabled: bool,
    gesture: Option<DragGesture>,
}

impl DragShiftController {
    pub fn new(viewport: Viewport, dead_zone: f32) -> Self {
        Self {
            viewport,
            dead_zone,
            enabled: false,
            gesture: None,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turning the controller off also drops a gesture in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.gesture = None;
        }
    }

    pub fn gesture(&self) -> Option<&DragGesture> {
        self.gesture.as_ref()
    }

    pub fn handle(&mut self, event: PointerEvent, grid: &mut Grid) -> Result<Option<GridChanged>> {
        match event {
            PointerEvent::Down(pos) => self.drag_start(pos).map(|()| None),
            PointerEvent::Move(pos) => {
                self.drag_move(pos);
                Ok(None)
            }
            PointerEvent::Up(pos) => self.drag_end(pos, grid),
        }
    }

    pub fn drag_start(&mut self, pos: Point) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        self.gesture = None;
        let start_cell = self
            .viewport
            .cell_at(pos)
            .ok_or(GameError::InvalidCoords)?;
        log::trace!("Drag started on cell {:?}", start_cell);
        self.gesture = Some(DragGesture::new(start_cell, pos));
        Ok(())
    }

    pub fn drag_move(&mut self, pos: Point) {
        if !self.enabled {
            return;
        }
        let dead_zone = self.dead_zone;
        let Some(gesture) = self.gesture.as_mut() else {
            return;
        };

        match gesture.lock {
            Some(axis) => {
                let along = pos.along(axis);
                gesture.offset += along - gesture.last;
                gesture.last = along;
            }
            None => {
                let dx = pos.x - gesture.start.x;
                let dy = pos.y - gesture.start.y;
                if dx.abs().max(dy.abs()) <= dead_zone {
                    return;
                }
                let axis = if dx.abs() > dy.abs() {
                    Axis::Horizontal
                } else {
                    Axis::Vertical
                };
                gesture.lock = Some(axis);
                gesture.last = pos.along(axis);
                gesture.offset = gesture.last - gesture.start.along(axis);
                log::trace!("Drag locked {:?} after ({}, {})", axis, dx, dy);
            }
        }
    }

    /// Finishes the gesture, shifting the dragged line by the nearest whole number of cells.
    ///
    /// Gestures that never left the dead zone change nothing and return `None`.
    pub fn drag_end(&mut self, pos: Point, grid: &mut Grid) -> Result<Option<GridChanged>> {
        if !self.enabled {
            return Ok(None);
        }
        self.drag_move(pos);

        let Some(gesture) = self.gesture.take() else {
            return Ok(None);
        };
        let (Some(axis), Some(index)) = (gesture.axis(), gesture.line_index()) else {
            log::trace!("Drag ended inside the dead zone");
            return Ok(None);
        };

        let delta_cells = (gesture.offset / self.viewport.cell_size).round() as i32;
        grid.shift(axis, index, delta_cells)?;
        log::debug!(
            "Shifted {} {} by {}",
            if axis.is_horizontal() { "row" } else { "column" },
            index,
            delta_cells
        );
        Ok(Some(GridChanged {
            axis,
            index,
            delta_cells,
        }))
    }

    /// Where each cell of the dragged line is drawn right now, wrapped into the viewport.
    pub fn line_layout(&self) -> Option<LineLayout> {
        let gesture = self.gesture.as_ref()?;
        let axis = gesture.axis()?;
        let index = gesture.line_index()?;
        let cell_size = self.viewport.cell_size;
        let positions = (0..self.viewport.line_len(axis))
            .map(|i| self.wrap(axis, f32::from(i) * cell_size + gesture.offset))
            .collect();
        Some(LineLayout {
            axis,
            index,
            positions,
        })
    }

    /// The cell to duplicate at the seam so the dragged line shows no gap.
    pub fn seam_cell(&self, grid: &Grid) -> Option<SeamCell> {
        let layout = self.line_layout()?;
        let cell_size = self.viewport.cell_size;
        let extent = self.viewport.extent(layout.axis);

        layout
            .positions
            .iter()
            .enumerate()
            .find_map(|(i, &position)| {
                let twin = if position < 0.0 {
                    position + extent
                } else if position > extent - cell_size {
                    position - extent
                } else {
                    return None;
                };
                let coords = line_coords(layout.axis, layout.index, i as Coord);
                Some(SeamCell {
                    coords,
                    position: twin,
                    cell: grid[coords],
                })
            })
    }

    /// Cell shown at `along` pixels into the dragged line, including positions outside the viewport.
    pub fn cell_at_position(&self, grid: &Grid, along: f32) -> Option<Cell> {
        let gesture = self.gesture.as_ref()?;
        let axis = gesture.axis()?;
        let index = i32::from(gesture.line_index()?);
        let source = ((along - gesture.offset) / self.viewport.cell_size).floor() as i32;
        Some(match axis {
            Axis::Horizontal => grid.wrapped(source, index),
            Axis::Vertical => grid.wrapped(index, source),
        })
    }

    fn wrap(&self, axis: Axis, position: f32) -> f32 {
        let half = self.viewport.cell_size / 2.0;
        (position + half).rem_euclid(self.viewport.extent(axis)) - half
    }
}

fn line_coords(axis: Axis, index: Coord, i: Coord) -> Coord2 {
    match axis {
        Axis::Horizontal => (i, index),
        Axis::Vertical => (index, i),
    }
}

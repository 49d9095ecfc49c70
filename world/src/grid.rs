//! Square tile grid and the slide/merge transition applied by shifts.

use tile_merge_core::{
    is_tile_value, merged_value, BoardView, CellCoord, Direction, InvalidArgument, MoveOutcome,
    PlacementError, MAX_GRID_SIDE, MIN_GRID_SIDE,
};

/// Authoritative tile matrix and score of a single game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    side: usize,
    cells: Vec<u32>,
    score: u64,
}

impl Grid {
    /// Creates an empty grid with the provided side length and a zero score.
    pub fn new(side: usize) -> Result<Self, InvalidArgument> {
        validate_side(side)?;
        Ok(Self::blank(side))
    }

    /// Restores a grid from row-major cell values and a score.
    ///
    /// Every non-zero cell must hold a tile value, a power of two from 2 up to
    /// [`tile_merge_core::MAX_TILE_VALUE`].
    pub fn from_cells(side: usize, cells: Vec<u32>, score: u64) -> Result<Self, InvalidArgument> {
        validate_side(side)?;
        let expected = side * side;
        if cells.len() != expected {
            return Err(InvalidArgument::CellCount {
                expected,
                actual: cells.len(),
            });
        }

        if let Some((index, value)) = cells
            .iter()
            .copied()
            .enumerate()
            .find(|(_, value)| *value != 0 && !is_tile_value(*value))
        {
            return Err(InvalidArgument::TileValue {
                value,
                cell: CellCoord::new((index % side) as u32, (index / side) as u32),
            });
        }

        Ok(Self { side, cells, score })
    }

    pub(crate) fn blank(side: usize) -> Self {
        Self {
            side,
            cells: vec![0; side * side],
            score: 0,
        }
    }

    /// Side length of the grid.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Row-major cell values, zero marking empty cells.
    #[must_use]
    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// Score accumulated by merges.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Captures a read-only view of the grid.
    #[must_use]
    pub fn view(&self) -> BoardView<'_> {
        BoardView::new(&self.cells, self.side, self.score)
    }

    /// Slides every line toward the wall named by `direction`, merging equal
    /// neighbours at most once per tile, and adds the merged values to the score.
    pub fn shift(&mut self, direction: Direction) -> MoveOutcome {
        let side = self.side;
        let mut outcome = MoveOutcome::default();

        for line in 0..side {
            let line_outcome = shift_line(&mut self.cells, side, |position| {
                line_slot(side, direction, line, position)
            });
            outcome.moved |= line_outcome.moved;
            outcome.score_gained += line_outcome.score_gained;
        }

        self.score += outcome.score_gained;
        outcome
    }

    /// Writes a tile into an empty cell.
    pub fn place(&mut self, cell: CellCoord, value: u32) -> Result<(), PlacementError> {
        if !is_tile_value(value) {
            return Err(PlacementError::InvalidValue);
        }

        let index = self.index(cell).ok_or(PlacementError::OutOfBounds)?;
        let slot = &mut self.cells[index];
        if *slot != 0 {
            return Err(PlacementError::Occupied);
        }

        *slot = value;
        Ok(())
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        if column < self.side && row < self.side {
            Some(row * self.side + column)
        } else {
            None
        }
    }
}

fn validate_side(side: usize) -> Result<(), InvalidArgument> {
    if (MIN_GRID_SIDE..=MAX_GRID_SIDE).contains(&side) {
        Ok(())
    } else {
        Err(InvalidArgument::GridSide(side))
    }
}

/// Maps a position along a line onto a row-major cell index.
///
/// Position zero touches the wall the tiles travel toward.
fn line_slot(side: usize, direction: Direction, line: usize, position: usize) -> usize {
    let far = side - 1 - position;
    match direction {
        Direction::Left => line * side + position,
        Direction::Right => line * side + far,
        Direction::Up => position * side + line,
        Direction::Down => far * side + line,
    }
}

/// Compacts one line toward its wall.
///
/// `boundary` is the first position a sliding tile may still enter. It starts at
/// the wall and moves one past every merge result, so a merged tile can never
/// absorb a third tile during the same shift.
fn shift_line<F>(cells: &mut [u32], side: usize, slot: F) -> MoveOutcome
where
    F: Fn(usize) -> usize,
{
    let mut outcome = MoveOutcome::default();
    let mut boundary = 0;

    for position in 1..side {
        let value = cells[slot(position)];
        if value == 0 {
            continue;
        }

        let mut at = position;
        while at > boundary {
            let here = slot(at);
            let ahead = slot(at - 1);

            if cells[ahead] == 0 {
                cells[ahead] = value;
                cells[here] = 0;
                at -= 1;
                outcome.moved = true;
            } else if let Some(merged) = merged_value(value).filter(|_| cells[ahead] == value) {
                cells[ahead] = merged;
                cells[here] = 0;
                outcome.score_gained += u64::from(merged);
                outcome.moved = true;
                boundary = at;
                break;
            } else {
                break;
            }
        }
    }

    outcome
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Status system that classifies the board after every productive shift.

use tile_merge_core::{merged_value, BoardView, Command, DifficultySettings, Event, GameStatus};

/// Classifies `board` as won, still playable, or over.
///
/// The win rule fires only while `has_announced_win` is false; afterwards the
/// board is judged purely on whether a shift can still change it.
#[must_use]
pub fn evaluate(board: BoardView<'_>, win_tile: u32, has_announced_win: bool) -> GameStatus {
    if !has_announced_win && board.contains(win_tile) {
        return GameStatus::Won;
    }

    if board.has_empty_cell() || has_adjacent_pair(board) {
        GameStatus::Playing
    } else {
        GameStatus::Over
    }
}

/// Reports whether two orthogonally adjacent cells hold the same tile and
/// can still merge.
///
/// Adjacency is symmetric, so looking right and down from every cell covers all pairs.
#[must_use]
pub fn has_adjacent_pair(board: BoardView<'_>) -> bool {
    let side = board.side();
    let cells = board.cells();

    (0..side).any(|row| {
        (0..side).any(|column| {
            let value = cells[row * side + column];
            if merged_value(value).is_none() {
                return false;
            }
            let right = column + 1 < side && cells[row * side + column + 1] == value;
            let below = row + 1 < side && cells[(row + 1) * side + column] == value;
            right || below
        })
    })
}

/// Pure system that evaluates the board once the tiles of a turn have settled.
#[derive(Debug, Default)]
pub struct StatusEvaluator;

impl StatusEvaluator {
    /// Creates a new status evaluator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes the events of a whole turn and emits the resulting status.
    ///
    /// Turns without a productive shift are ignored. A playing board produces
    /// no command.
    pub fn handle(
        &self,
        turn_events: &[Event],
        board: BoardView<'_>,
        settings: DifficultySettings,
        has_announced_win: bool,
        out: &mut Vec<Command>,
    ) {
        let shifted = turn_events
            .iter()
            .any(|event| matches!(event, Event::TilesShifted { .. }));
        if !shifted {
            return;
        }

        let status = evaluate(board, settings.win_tile(), has_announced_win);
        log::debug!("board evaluated as {status:?}");
        if status != GameStatus::Playing {
            out.push(Command::DeclareStatus { status });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_board_is_over() {
        let cells = [2, 4, 2, 4, 2, 4, 2, 4, 2];
        let board = BoardView::new(&cells, 3, 0);
        assert_eq!(evaluate(board, 2048, false), GameStatus::Over);
    }

    #[test]
    fn single_vertical_pair_keeps_game_alive() {
        let cells = [2, 4, 2, 4, 2, 8, 2, 4, 8];
        let board = BoardView::new(&cells, 3, 0);
        assert!(has_adjacent_pair(board));
        assert_eq!(evaluate(board, 2048, false), GameStatus::Playing);
    }

    #[test]
    fn single_horizontal_pair_keeps_game_alive() {
        let cells = [2, 4, 2, 4, 2, 4, 8, 8, 2];
        let board = BoardView::new(&cells, 3, 0);
        assert!(has_adjacent_pair(board));
        assert_eq!(evaluate(board, 2048, false), GameStatus::Playing);
    }

    #[test]
    fn pair_of_largest_tiles_cannot_keep_game_alive() {
        let largest = tile_merge_core::MAX_TILE_VALUE;
        let cells = [largest, largest, 4, 2];
        let board = BoardView::new(&cells, 2, 0);
        assert!(!has_adjacent_pair(board));
        assert_eq!(evaluate(board, 2048, true), GameStatus::Over);
    }

    #[test]
    fn empty_cell_keeps_game_alive() {
        let cells = [2, 4, 4, 0];
        let board = BoardView::new(&cells, 2, 0);
        assert_eq!(evaluate(board, 2048, false), GameStatus::Playing);
    }

    #[test]
    fn win_is_reported_only_before_announcement() {
        let cells = [1024, 2, 4, 8];
        let board = BoardView::new(&cells, 2, 0);
        assert_eq!(evaluate(board, 1024, false), GameStatus::Won);
        assert_eq!(evaluate(board, 1024, true), GameStatus::Over);
    }

    #[test]
    fn win_takes_priority_over_stalemate() {
        let cells = [2048, 4, 8, 16];
        let board = BoardView::new(&cells, 2, 0);
        assert_eq!(evaluate(board, 2048, false), GameStatus::Won);
    }
}

use tile_merge_core::{Command, Difficulty, Direction, Event, ShiftRejection};
use tile_merge_world::{self as world, query, Grid, World};

fn grid(cells: [u32; 16]) -> Grid {
    Grid::from_cells(4, cells.to_vec(), 0).expect("valid grid")
}

fn shift(world: &mut World, direction: Direction) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Shift { direction }, &mut events);
    events
}

#[test]
fn compacted_boards_never_move_in_their_compaction_direction() {
    // Checkerboard-like layout: no empty cells, no equal neighbours anywhere.
    let locked = [
        2, 4, 2, 4, //
        4, 2, 4, 2, //
        2, 4, 2, 4, //
        4, 2, 4, 2,
    ];

    for direction in Direction::ALL {
        let mut board = grid(locked);
        let before = board.clone();
        let outcome = board.shift(direction);
        assert!(!outcome.moved, "{direction} should not move a locked board");
        assert_eq!(outcome.score_gained, 0);
        assert_eq!(board, before, "{direction} changed a locked board");
    }
}

#[test]
fn tiles_pressed_against_a_wall_stay_put() {
    let cases = [
        (
            Direction::Left,
            [
                2, 4, 0, 0, //
                8, 0, 0, 0, //
                0, 0, 0, 0, //
                16, 2, 16, 0,
            ],
        ),
        (
            Direction::Right,
            [
                0, 0, 2, 4, //
                0, 0, 0, 8, //
                0, 0, 0, 0, //
                0, 16, 2, 16,
            ],
        ),
        (
            Direction::Up,
            [
                2, 8, 0, 16, //
                4, 0, 0, 2, //
                0, 0, 0, 16, //
                0, 0, 0, 0,
            ],
        ),
        (
            Direction::Down,
            [
                0, 0, 0, 0, //
                2, 0, 0, 16, //
                4, 0, 0, 2, //
                8, 16, 0, 16,
            ],
        ),
    ];

    for (direction, cells) in cases {
        let mut board = grid(cells);
        let outcome = board.shift(direction);
        assert!(!outcome.moved, "{direction} moved an already compacted board");
        assert_eq!(board.cells(), cells);
    }
}

#[test]
fn merging_pair_scores_its_result_in_every_direction() {
    for value in [2_u32, 64, 1024] {
        for direction in Direction::ALL {
            let mut cells = [0; 16];
            // A vertical and a horizontal pair sharing no line with each other.
            cells[0] = value;
            cells[1] = value;
            cells[10] = value;
            cells[14] = value;
            let mut board = grid(cells);
            let outcome = board.shift(direction);

            let expected = u64::from(value) * 2;
            assert!(outcome.moved);
            assert_eq!(
                outcome.score_gained, expected,
                "{direction} with {value} tiles"
            );
            assert_eq!(board.score(), expected);
        }
    }
}

#[test]
fn merged_tiles_wait_for_the_next_shift() {
    let mut world = World::from_grid(
        grid([
            2, 2, 2, 2, //
            0, 0, 0, 0, //
            0, 0, 0, 0, //
            0, 0, 0, 0,
        ]),
        Difficulty::Easy,
    );

    let events = shift(&mut world, Direction::Left);
    assert_eq!(
        events,
        vec![Event::TilesShifted {
            direction: Direction::Left,
            score_gained: 8,
            score: 8,
        }]
    );
    assert_eq!(&query::board_view(&world).cells()[..4], [4, 4, 0, 0]);

    let events = shift(&mut world, Direction::Left);
    assert_eq!(
        events,
        vec![Event::TilesShifted {
            direction: Direction::Left,
            score_gained: 8,
            score: 16,
        }]
    );
    assert_eq!(&query::board_view(&world).cells()[..4], [8, 0, 0, 0]);

    let events = shift(&mut world, Direction::Left);
    assert_eq!(
        events,
        vec![Event::ShiftRejected {
            direction: Direction::Left,
            reason: ShiftRejection::NoMovement,
        }]
    );
}

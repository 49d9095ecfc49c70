use rand::Rng;
use tile_merge_core::{Command, Difficulty, Event, InvalidArgument, ShiftRejection};
use tile_merge_rendering::{Banner, FrameInput, LeaderboardPresentation, NameRequest, Scene};
use tile_merge_system_leaderboard::{KeyValueStore, Leaderboard};
use tile_merge_system_spawning::{Config, Spawning};
use tile_merge_system_status::StatusEvaluator;
use tile_merge_world::{self as world, query, World};

/// Prefix of the name offered when asking for a leaderboard entry.
const SUGGESTED_NAME_PREFIX: &str = "Player";

/// Game session wiring the world, its systems and the leaderboard together.
///
/// Every input runs the whole pipeline before returning, so the exclusive
/// borrow held by [`GameSession::handle_input`] is the only re-entrancy guard.
#[derive(Debug)]
pub(crate) struct GameSession<S> {
    world: World,
    spawning: Spawning,
    status: StatusEvaluator,
    leaderboard: Leaderboard<S>,
    banner: Option<Banner>,
    name_request: Option<NameRequest>,
    shown_leaderboard: Option<Difficulty>,
    notice: Option<String>,
    exit_requested: bool,
}

impl<S: KeyValueStore> GameSession<S> {
    /// Starts a fresh game on an empty board of `side` cells.
    pub(crate) fn new(
        side: usize,
        difficulty: Difficulty,
        seed: u64,
        leaderboard: Leaderboard<S>,
    ) -> Result<Self, InvalidArgument> {
        let mut session = Self::with_world(World::with_side(side)?, seed, leaderboard);
        session.start(difficulty);
        Ok(session)
    }

    fn with_world(world: World, seed: u64, leaderboard: Leaderboard<S>) -> Self {
        Self {
            world,
            spawning: Spawning::new(Config::new(seed)),
            status: StatusEvaluator::new(),
            leaderboard,
            banner: None,
            name_request: None,
            shown_leaderboard: None,
            notice: None,
            exit_requested: false,
        }
    }

    /// Restarts the game on `difficulty`, keeping the board size.
    pub(crate) fn start(&mut self, difficulty: Difficulty) {
        self.banner = None;
        self.name_request = None;
        let _ = self.submit(Command::NewGame { difficulty });
    }

    /// Runs `command` through the world and every system, returning the turn's events.
    pub(crate) fn submit(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        let mut commands = Vec::new();
        self.spawning.handle(
            &events,
            query::board_view(&self.world),
            query::settings(&self.world),
            &mut commands,
        );
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }

        self.status.handle(
            &events,
            query::board_view(&self.world),
            query::settings(&self.world),
            query::has_announced_win(&self.world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        for event in &events {
            self.observe(*event);
        }
        events
    }

    fn observe(&mut self, event: Event) {
        match event {
            Event::TilesShifted { score, .. } => {
                if self.leaderboard.observe_score(score) {
                    log::debug!("new best score {score}");
                }
            }
            Event::ShiftRejected {
                reason: ShiftRejection::GameOver,
                ..
            } => {
                self.notice = Some("The game is over. Type 'new' to play again.".to_owned());
            }
            Event::GameWon { score } => {
                self.banner = Some(Banner::Won);
                self.request_name(score);
            }
            Event::GameOver { score } => {
                self.banner = Some(Banner::Over);
                self.request_name(score);
            }
            _ => {}
        }
    }

    fn request_name(&mut self, score: u64) {
        let suggested = format!(
            "{SUGGESTED_NAME_PREFIX}{}",
            rand::thread_rng().gen_range(0..1000)
        );
        self.name_request = Some(NameRequest {
            score,
            difficulty: query::difficulty(&self.world),
            suggested,
        });
    }

    /// Applies one frame of player input.
    pub(crate) fn handle_input(&mut self, input: FrameInput) {
        self.notice = None;

        if let Some(name) = input.name_entry {
            self.answer_name_request(&name);
        }
        if let Some(difficulty) = input.difficulty {
            self.start(difficulty);
        } else if input.new_game {
            self.start(query::difficulty(&self.world));
        }
        if let Some(direction) = input.direction {
            let _ = self.submit(Command::Shift { direction });
        }
        if input.show_leaderboard.is_some() {
            self.shown_leaderboard = input.show_leaderboard;
        }
        if input.quit {
            self.exit_requested = true;
        }
    }

    fn answer_name_request(&mut self, name: &str) {
        let Some(request) = self.name_request.take() else {
            log::debug!("ignoring name entry without a pending request");
            return;
        };

        let name = name.trim();
        if name.is_empty() {
            log::debug!("player declined to record {} points", request.score);
            return;
        }

        self.shown_leaderboard = Some(request.difficulty);
        self.notice = Some(
            match self
                .leaderboard
                .add_score(request.difficulty, name, request.score)
            {
                Some(rank) => format!("{name} placed #{rank} on {}", request.difficulty),
                None => format!("{} points did not reach the top scores", request.score),
            },
        );
    }

    /// Builds the scene describing the current session.
    pub(crate) fn scene(&self) -> Scene {
        let mut scene = Scene::new(
            query::board_view(&self.world),
            self.leaderboard.best_score(),
            query::difficulty(&self.world),
        );
        scene.banner = self.banner;
        scene.leaderboard = self.shown_leaderboard.map(|difficulty| {
            LeaderboardPresentation::from_entries(difficulty, self.leaderboard.list(difficulty))
        });
        scene.name_request = self.name_request.clone();
        scene.notice = self.notice.clone();
        scene.exit_requested = self.exit_requested;
        scene
    }

    /// Frame callback for rendering backends.
    pub(crate) fn update_scene(&mut self, input: FrameInput, scene: &mut Scene) {
        self.handle_input(input);
        *scene = self.scene();
    }
}

use std::{
    fmt,
    io::{BufRead, Write},
    str::FromStr,
};

use anyhow::{Context, Result as AnyResult};
use crossterm::style::{Color as TermColor, Stylize};
use glam::Vec2;
use tile_merge_core::{Difficulty, Direction};
use tile_merge_rendering::{
    direction_for_key, resolve_swipe, tile_color, Color, FrameInput, LeaderboardRow, NameRequest,
    Presentation, RenderingBackend, Scene, NO_RECORDS,
};

/// Width reserved for a single tile value.
const CELL_WIDTH: usize = 6;

/// Marker typed at the name prompt to skip the leaderboard entry.
const DECLINE_NAME: &str = "-";

const HELP: &str = "\
moves:  up | down | left | right  (or w a s d, ArrowUp ...)
swipe:  swipe <dx> <dy>  (screen units, y grows downwards)
game:   new | easy | medium | hard
scores: scores [easy|medium|hard]
other:  help | quit";

/// Line-oriented backend that draws scenes as text and reads commands per line.
#[derive(Debug)]
pub(crate) struct TerminalBackend<R, W> {
    input: R,
    output: W,
    color: bool,
}

impl<R: BufRead, W: Write> TerminalBackend<R, W> {
    /// Creates a backend reading from `input` and drawing to `output`.
    ///
    /// `color` enables 24-bit ANSI backgrounds for tiles.
    pub(crate) fn new(input: R, output: W, color: bool) -> Self {
        Self {
            input,
            output,
            color,
        }
    }

    fn read_line(&mut self) -> AnyResult<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("failed to read from the terminal")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn next_frame(&mut self, scene: &Scene) -> AnyResult<Option<FrameInput>> {
        if let Some(request) = &scene.name_request {
            return self.ask_name(request);
        }

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;
            let Some(line) = self.read_line()? else {
                return Ok(None);
            };
            match parse_line(&line, scene.difficulty) {
                Ok(input) => return Ok(Some(input)),
                Err(message) => writeln!(self.output, "{message}")?,
            }
        }
    }

    fn ask_name(&mut self, request: &NameRequest) -> AnyResult<Option<FrameInput>> {
        write!(
            self.output,
            "Name for {} points on {} [{}] ('{DECLINE_NAME}' to skip): ",
            request.score, request.difficulty, request.suggested
        )?;
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            return Ok(None);
        };
        let name = match line.as_str() {
            "" => request.suggested.clone(),
            DECLINE_NAME => String::new(),
            _ => line,
        };
        Ok(Some(FrameInput {
            name_entry: Some(name),
            ..FrameInput::default()
        }))
    }

    fn draw(&mut self, scene: &Scene, background: Color) -> AnyResult<()> {
        let frame = render_scene(scene, self.color.then_some(background))
            .context("failed to format the board")?;
        self.output
            .write_all(frame.as_bytes())
            .context("failed to draw the board")?;
        self.output.flush()?;
        Ok(())
    }
}

impl<R: BufRead, W: Write> RenderingBackend for TerminalBackend<R, W> {
    fn run<F>(mut self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(FrameInput, &mut Scene),
    {
        let Presentation {
            window_title,
            clear_color,
            mut scene,
        } = presentation;

        writeln!(self.output, "{window_title}")?;
        writeln!(self.output, "{HELP}")?;
        self.draw(&scene, clear_color)?;

        while !scene.exit_requested {
            let Some(input) = self.next_frame(&scene)? else {
                log::debug!("input closed");
                break;
            };
            update_scene(input, &mut scene);
            self.draw(&scene, clear_color)?;
        }

        Ok(())
    }
}

/// Translates one line of terminal input into a frame.
///
/// `current` is the difficulty shown when `scores` names none. Unknown input
/// yields the text to show instead.
pub(crate) fn parse_line(line: &str, current: Difficulty) -> Result<FrameInput, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(FrameInput::default());
    };

    if let Some(direction) =
        direction_for_key(command).or_else(|| Direction::from_str(command).ok())
    {
        return Ok(FrameInput::shift(direction));
    }
    if let Ok(difficulty) = Difficulty::from_str(command) {
        return Ok(FrameInput {
            difficulty: Some(difficulty),
            ..FrameInput::default()
        });
    }

    let mut input = FrameInput::default();
    match command.to_ascii_lowercase().as_str() {
        "swipe" => input.direction = parse_swipe(words)?,
        "new" | "restart" => input.new_game = true,
        "scores" | "leaderboard" => {
            let difficulty = match words.next() {
                Some(word) => Difficulty::from_str(word).map_err(|error| error.to_string())?,
                None => current,
            };
            input.show_leaderboard = Some(difficulty);
        }
        "quit" | "exit" | "q" => input.quit = true,
        "help" | "?" => return Err(HELP.to_owned()),
        _ => return Err(format!("unknown command '{command}'; type 'help'")),
    }
    Ok(input)
}

/// Reads the drag offset of a `swipe` command.
///
/// Drags too short to count as a swipe produce no direction.
fn parse_swipe<'a>(
    mut words: impl Iterator<Item = &'a str>,
) -> Result<Option<Direction>, String> {
    let mut offset = || -> Result<f32, String> {
        let word = words
            .next()
            .ok_or_else(|| "swipe needs an offset such as 'swipe 40 0'".to_owned())?;
        word.parse::<f32>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| format!("'{word}' is not a swipe offset"))
    };
    let delta = Vec2::new(offset()?, offset()?);
    Ok(resolve_swipe(Vec2::ZERO, delta))
}

/// Renders the scene as text; `background` enables 24-bit terminal colors.
pub(crate) fn render_scene(
    scene: &Scene,
    background: Option<Color>,
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_scene(&mut out, scene, background)?;
    Ok(out)
}

fn write_scene(
    out: &mut impl fmt::Write,
    scene: &Scene,
    background: Option<Color>,
) -> fmt::Result {
    writeln!(
        out,
        "\n{}  score {}  best {}",
        scene.difficulty, scene.score, scene.best_score
    )?;

    let border = format!(
        "+{}",
        format!("{}+", "-".repeat(CELL_WIDTH)).repeat(scene.side)
    );

    write_painted(out, &border, background)?;
    writeln!(out)?;
    for row in scene.rows() {
        out.write_char('|')?;
        for value in row {
            let text = if *value == 0 {
                " ".repeat(CELL_WIDTH)
            } else {
                format!("{value:>width$}", width = CELL_WIDTH)
            };
            write_painted(out, &text, background.map(|_| tile_color(*value)))?;
            out.write_char('|')?;
        }
        writeln!(out)?;
        write_painted(out, &border, background)?;
        writeln!(out)?;
    }

    if let Some(banner) = scene.banner {
        writeln!(out, "*** {} ***", banner.message())?;
    }
    if let Some(leaderboard) = &scene.leaderboard {
        writeln!(out, "Top scores ({})", leaderboard.difficulty)?;
        for row in &leaderboard.rows {
            match row {
                LeaderboardRow::Placeholder => writeln!(out, "  {NO_RECORDS}")?,
                LeaderboardRow::Ranked { rank, entry } => writeln!(
                    out,
                    "  {rank:>2}. {:<16} {:>8}  {}",
                    entry.name, entry.score, entry.date
                )?,
            }
        }
    }
    if let Some(notice) = &scene.notice {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}

/// Writes `text`, on the `color` background when one is given.
fn write_painted(out: &mut impl fmt::Write, text: &str, color: Option<Color>) -> fmt::Result {
    match color {
        Some(color) => write!(out, "{}", text.on(terminal_color(color))),
        None => out.write_str(text),
    }
}

fn terminal_color(color: Color) -> TermColor {
    let [r, g, b] = color.to_rgb_u8();
    TermColor::Rgb { r, g, b }
}

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use runes_core::{Axis, Game, GameEvent, Phase, Point, PointerEvent, Session};

use crate::command::{Command, HELP};
use crate::settings::ProgressStore;

mod command;
mod render;
mod settings;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file overriding grid size, timings and demon limits
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Force a seed prefix instead of the configured one
    #[arg(short, long)]
    seed: Option<String>,

    /// Level to start at
    #[arg(short, long)]
    level: Option<u32>,

    /// JSON file to load progress from and save it to
    #[arg(short, long)]
    progress: Option<PathBuf>,

    /// Keep the runes visible until told to hide them
    #[arg(long)]
    no_countdown: bool,

    /// Pause between converted demons, in milliseconds
    #[arg(long, default_value_t = 1000)]
    reveal_delay_ms: u64,
}

/// What the loop does after a command.
enum Flow {
    Continue,
    Quit,
}

struct Frontend {
    store: Option<ProgressStore>,
    saved: Session,
    countdown: bool,
    reveal_delay: Duration,
    deadline: Option<Instant>,
}

impl Frontend {
    fn present(&mut self, game: &Game, events: Vec<GameEvent>) -> anyhow::Result<()> {
        for event in events {
            match event {
                GameEvent::PhaseChanged(phase) => {
                    println!("\n{}", render::banner(phase, game.level(), game.reveal_countdown()));
                    self.deadline = (phase == Phase::ShowAll && self.countdown)
                        .then(|| Instant::now() + Duration::from_secs(game.reveal_countdown().into()));
                }
                GameEvent::Render(view) => println!("{}", render::grid(&view)),
                GameEvent::GridChanged(changed) => {
                    let name = if changed.axis.is_horizontal() { "Row" } else { "Column" };
                    println!("{name} {} moved by {}", changed.index, changed.delta_cells);
                }
                GameEvent::SummonMatch((x, y)) => {
                    thread::sleep(self.reveal_delay);
                    println!("Demon at ({x}, {y}) overwhelmed");
                }
                GameEvent::LevelResult { level, won } => {
                    log::info!("Level {level} {}", if won { "cleared" } else { "failed" });
                }
            }
        }
        self.save(game.session())
    }

    fn save(&mut self, session: &Session) -> anyhow::Result<()> {
        if *session == self.saved {
            return Ok(());
        }
        if let Some(store) = &self.store {
            store.save(session)?;
        }
        self.saved = *session;
        Ok(())
    }

    /// Next input line, or `None` once the reveal runs out. Reports the seconds left now and then.
    fn next_line(&mut self, lines: &Receiver<String>) -> anyhow::Result<Option<String>> {
        let Some(deadline) = self.deadline else {
            return Ok(Some(lines.recv()?));
        };
        loop {
            let left = deadline.saturating_duration_since(Instant::now());
            if left.is_zero() {
                self.deadline = None;
                return Ok(None);
            }
            match lines.recv_timeout(left.min(Duration::from_secs(1))) {
                Ok(line) => return Ok(Some(line)),
                Err(RecvTimeoutError::Timeout) => {
                    let secs = deadline.saturating_duration_since(Instant::now()).as_secs_f32().round() as u32;
                    if secs > 0 && (secs <= 5 || secs % 10 == 0) {
                        println!("{secs}s");
                    }
                }
                Err(RecvTimeoutError::Disconnected) => anyhow::bail!("input closed"),
            }
        }
    }
}

/// Presses on the middle of a cell and releases `cells` cells further along `axis`.
fn shift_gesture(game: &Game, axis: Axis, index: u8, cells: i32) -> (Point, Point) {
    let cell = game.config().cell_size;
    let middle = (f32::from(index) + 0.5) * cell;
    let travel = cells as f32 * cell;
    match axis {
        Axis::Horizontal => (Point::new(cell / 2.0, middle), Point::new(cell / 2.0 + travel, middle)),
        Axis::Vertical => (Point::new(middle, cell / 2.0), Point::new(middle, cell / 2.0 + travel)),
    }
}

fn drag(game: &mut Game, frontend: &mut Frontend, from: Point, to: Point) -> anyhow::Result<()> {
    if game.phase() != Phase::MoveAndSummon {
        println!("Rows and columns only move once the runes are hidden");
        return Ok(());
    }

    game.pointer(PointerEvent::Down(from))?;
    game.pointer(PointerEvent::Move(to))?;
    match game.drag().line_layout() {
        Some(layout) => println!("{}", render::line_preview(&layout, &game.view())),
        None => println!("Too short to drag"),
    }
    let events = game.pointer(PointerEvent::Up(to))?;
    frontend.present(game, events)
}

fn execute(game: &mut Game, frontend: &mut Frontend, command: Command) -> anyhow::Result<Flow> {
    match command {
        Command::Advance => {
            let events = game.advance()?;
            frontend.present(game, events)?;
        }
        Command::Shift { axis, index, delta } => {
            let (from, to) = shift_gesture(game, axis, index, delta);
            drag(game, frontend, from, to)?;
        }
        Command::Drag { from, to } => drag(game, frontend, from, to)?,
        Command::Summon(rune) => {
            let events = game.summon(rune)?;
            frontend.present(game, events)?;
        }
        Command::Restart => {
            let events = game.restart();
            frontend.present(game, events)?;
        }
        Command::Level(level) => {
            let events = game.jump_to_level(level);
            frontend.present(game, events)?;
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn spawn_input() -> Receiver<String> {
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let mut config = settings::load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed_prefix = seed;
    }
    log::debug!("seed prefix: {:?}", config.seed_prefix);

    let store = args.progress.map(ProgressStore::new);
    let mut session = match &store {
        Some(store) => store.load()?,
        None => Session::default(),
    };
    if let Some(level) = args.level {
        session.jump_to(level);
    }

    let mut game = Game::new(config, session)?;
    let mut frontend = Frontend {
        store,
        saved: session,
        countdown: !args.no_countdown,
        reveal_delay: Duration::from_millis(args.reveal_delay_ms),
        deadline: None,
    };
    frontend.save(game.session())?;

    println!("{}", render::banner(game.phase(), game.level(), game.reveal_countdown()));
    println!("{}", render::grid(&game.view()));
    println!("Press enter to reveal the runes, `help` for commands.");

    let lines = spawn_input();
    loop {
        let command = match frontend.next_line(&lines) {
            Ok(Some(line)) => match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    eprintln!("{err:#}");
                    continue;
                }
            },
            // Reveal ran out
            Ok(None) => Command::Advance,
            Err(_) => break,
        };

        match execute(&mut game, &mut frontend, command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("{err:#}"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use runes_core::GameConfig;

    use super::*;

    #[test]
    fn args_parse_with_defaults() {
        let args = Args::try_parse_from(["runes", "-l", "4", "--no-countdown"]).unwrap();
        assert_eq!(args.level, Some(4));
        assert!(args.no_countdown);
        assert_eq!(args.reveal_delay_ms, 1000);
    }

    #[test]
    fn shift_gesture_spans_whole_cells() {
        let game = Game::new(GameConfig::default(), Session::default()).unwrap();
        let (from, to) = shift_gesture(&game, Axis::Vertical, 2, -3);
        assert_eq!(from, Point::new(205.0, 41.0));
        assert_eq!(to, Point::new(205.0, 41.0 - 246.0));
    }
}

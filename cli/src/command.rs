use std::str::FromStr;

use anyhow::{Context, bail};
use runes_core::{Axis, Coord, Point, Rune};

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    /// Start the reveal, end it early, retry or move on, depending on the phase
    Advance,
    /// Drag a whole row or column by a number of cells
    Shift { axis: Axis, index: Coord, delta: i32 },
    /// Raw pointer drag in grid pixels
    Drag { from: Point, to: Point },
    Summon(Rune),
    Restart,
    Level(u32),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(Self::Advance);
        };
        let args: Vec<&str> = words.collect();

        let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("go" | "start" | "ready" | "next" | "retry", []) => Self::Advance,
            ("row" | "r", [index, delta]) => Self::Shift {
                axis: Axis::Horizontal,
                index: parse(index, "row")?,
                delta: parse(delta, "shift")?,
            },
            ("col" | "column" | "c", [index, delta]) => Self::Shift {
                axis: Axis::Vertical,
                index: parse(index, "column")?,
                delta: parse(delta, "shift")?,
            },
            ("drag", [x0, y0, x1, y1]) => Self::Drag {
                from: Point::new(parse(x0, "x")?, parse(y0, "y")?),
                to: Point::new(parse(x1, "x")?, parse(y1, "y")?),
            },
            ("summon" | "s", [kind]) => {
                let kind: u8 = parse(kind, "rune")?;
                Self::Summon(Rune::new(kind).with_context(|| format!("no rune {kind}"))?)
            }
            ("restart" | "back", []) => Self::Restart,
            ("level", [level]) => Self::Level(parse(level, "level")?),
            ("help" | "h" | "?", []) => Self::Help,
            ("quit" | "exit" | "q", []) => Self::Quit,
            _ => bail!("unknown command {:?}, type `help` for the list", line.trim()),
        };
        Ok(command)
    }
}

fn parse<T>(word: &str, what: &str) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    word.trim_start_matches('+')
        .parse()
        .with_context(|| format!("invalid {what} {word:?}"))
}

pub(crate) const HELP: &str = "\
commands:
  <enter> | go        start the reveal, hide the runes, retry or go to the next level
  row <y> <cells>     drag row y sideways (positive moves right)
  col <x> <cells>     drag column x vertically (positive moves down)
  drag <x0> <y0> <x1> <y1>
                      raw drag in grid pixels
  summon <1-6>        summon a rune type and settle the level
  level <n>           jump to level n
  restart             back to level 1
  quit";

use anyhow::{Context, bail};
use geomerge_core::{Coord2, Direction, LatLng, MovementMode};

pub(crate) const HELP: &str = "\
commands:
  n | s | e | w        step one cell (step mode)
  click <i> <j>        interact with cell (i, j)
  near <di> <dj>       interact with the cell offset from yours
  mode step|feed       switch movement source
  tick                 deliver the next fix from the track (feed mode)
  fix <lat> <lng>      deliver a fix by hand (feed mode)
  status               redraw and show the HUD
  help                 this text
  quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Step(Direction),
    Click(Coord2),
    Near(Coord2),
    Mode(MovementMode),
    Tick,
    Fix(LatLng),
    Status,
    Help,
    Quit,
}

impl core::str::FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            bail!("empty command");
        };
        let args: Vec<&str> = words.collect();

        let command = match (head.to_ascii_lowercase().as_str(), args.as_slice()) {
            ("n" | "north" | "up", []) => Self::Step(Direction::North),
            ("s" | "south" | "down", []) => Self::Step(Direction::South),
            ("e" | "east" | "right", []) => Self::Step(Direction::East),
            ("w" | "west" | "left", []) => Self::Step(Direction::West),
            ("c" | "click", [i, j]) => Self::Click((parse_index(i)?, parse_index(j)?)),
            ("near", [di, dj]) => Self::Near((parse_index(di)?, parse_index(dj)?)),
            ("mode", [mode]) => Self::Mode(
                mode.parse::<MovementMode>()
                    .with_context(|| format!("unknown movement mode {mode:?}"))?,
            ),
            ("tick", []) => Self::Tick,
            ("fix", [lat, lng]) => {
                Self::Fix(LatLng::new(parse_degrees(lat)?, parse_degrees(lng)?))
            }
            ("status", []) => Self::Status,
            ("help" | "?", []) => Self::Help,
            ("q" | "quit" | "exit", []) => Self::Quit,
            (other, _) => bail!(
                "cannot understand {other:?} with {} argument(s), try `help`",
                args.len()
            ),
        };
        Ok(command)
    }
}

fn parse_index(word: &str) -> anyhow::Result<i32> {
    word.parse().with_context(|| format!("{word:?} is not a cell index"))
}

fn parse_degrees(word: &str) -> anyhow::Result<f64> {
    word.parse().with_context(|| format!("{word:?} is not a coordinate"))
}

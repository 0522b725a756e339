use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geomerge_core::{GameError, MovementMode, PositionFeed, Session, SpawnGenerator};

use crate::command::{Command, HELP};
use crate::render::{Format, TermPresenter};
use crate::settings::Scheme;
use crate::track::TrackFeed;

mod command;
mod render;
mod settings;
mod track;

type GameSession = Session<SpawnGenerator, TrackFeed, TermPresenter<std::io::Stdout>>;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Game config file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the origin scheme from the config
    #[arg(long, value_enum)]
    scheme: Option<Scheme>,

    /// Recorded `lat,lng` track used as the position feed
    #[arg(long)]
    track: Option<PathBuf>,

    /// How scenes are printed
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .format_timestamp(None)
        .init();

    let config = settings::load(args.config.as_deref(), args.scheme)?;
    let feed = match &args.track {
        Some(path) => TrackFeed::from_path(path)?,
        None => TrackFeed::unavailable(),
    };
    let generator = SpawnGenerator::new(config.spawn.clone()).context("invalid spawn table")?;
    let presenter = TermPresenter::new(std::io::stdout(), args.format);
    let mut session = Session::new(&config, generator, feed, presenter)?;

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("reading command")?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                eprintln!("{err:#}");
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(err) = run(&mut session, command) {
            log::warn!("{}", err);
        }
    }

    session.stop_movement();
    log::info!(
        "leaving with {} merges, best token {}",
        session.engine().merges(),
        session.engine().best_value()
    );
    Ok(())
}

fn run(session: &mut GameSession, command: Command) -> Result<(), GameError> {
    match command {
        Command::Step(direction) => {
            if !session.on_direction(direction)? {
                eprintln!("step controls are off, try `mode step`");
            }
        }
        Command::Click(cell) => {
            session.interact(cell);
        }
        Command::Near(offset) => {
            session.interact_relative(offset);
        }
        Command::Mode(mode) => session.switch_mode(mode)?,
        Command::Tick => match session.feed_mut().next_fix() {
            Some(fix) => {
                log::debug!("{} fixes left on the track", session.feed_mut().remaining());
                session.on_position_fix(fix)?;
            }
            None if !session.feed_mut().is_available() => {
                eprintln!("no track loaded, pass --track")
            }
            None if session.mode() != Some(MovementMode::Feed) => {
                eprintln!("the position feed is off, try `mode feed`")
            }
            None => eprintln!("end of track"),
        },
        Command::Fix(fix) => {
            if !session.on_position_fix(fix)? {
                eprintln!("the position feed is off, try `mode feed`");
            }
        }
        Command::Status => session.redraw(),
        Command::Help => eprintln!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

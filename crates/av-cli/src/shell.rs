//! The read-eval-print loop.

use std::io;

use av_device::DeviceBackend;
use av_fiction::{GameSession, LineReader, Narrator, Outcome};
use colored::Colorize;
use tracing::{info, warn};

use crate::config::PlayConfig;
use crate::console::{Prompt, Typewriter};

const TITLE: &str = r"
     _         _   _                    _
    / \  _   _| |_| |____   _____ _ __ | |_ _   _ _ __ ___
   / _ \| | | | __| '_ \ \ / / _ \ '_ \| __| | | | '__/ _ \
  / ___ \ |_| | |_| | | \ V /  __/ | | | |_| |_| | | |  __/
 /_/   \_\__,_|\__|_| |_|\_/ \___|_| |_|\__|\__,_|_|  \___|
";

const STRANGE_FORCE: &str = "A strange force prevents you from doing that.";

/// Play until the player quits or input runs out.
pub fn run(config: &PlayConfig, devices: Box<dyn DeviceBackend>) -> Result<(), String> {
    let mut narrator = Typewriter::new(io::stdout(), config.type_delay, config.uppercase);
    let mut input = Prompt::new(io::stdin().lock(), io::stdout());
    let mut game = GameSession::new(devices);

    println!("{}", TITLE.bold());
    info!("game started");
    step(&mut game, "look", &mut narrator, &mut input);

    while let Some(line) = input.read_line() {
        println!();
        if step(&mut game, &line, &mut narrator, &mut input) == Outcome::Quit {
            info!("player quit");
            return Ok(());
        }
    }

    info!("input closed");
    println!();
    Ok(())
}

/// Run one command, reporting device failures in character.
fn step(
    game: &mut GameSession,
    line: &str,
    narrator: &mut dyn Narrator,
    input: &mut dyn LineReader,
) -> Outcome {
    match game.process(line, narrator, input) {
        Ok(outcome) => outcome,
        Err(err) => {
            warn!(error = %err, "command failed");
            narrator.emit(STRANGE_FORCE);
            Outcome::Continue
        }
    }
}

//! Command dispatch over the current location.

use av_device::DeviceBackend;
use tracing::debug;

use crate::error::FictionResult;
use crate::location::{Context, Location, Road};
use crate::narrator::{LineReader, Narrator, format_code};
use crate::parser::{Command, Verb, parse_command};
use crate::state::SessionState;

const NOT_UNDERSTOOD: &str = "I don't understand what you mean.";

const HELP: &str = "\
look [thing]   - look around, or at something
go <place>     - head somewhere
take <thing>   - pick something up
drop <thing>   - put something down
inventory      - check your pockets
quit           - leave the game";

/// Whether the game goes on after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Wait for the next command.
    Continue,
    /// The player has left.
    Quit,
}

/// One game: the devices, what the player carries and where they stand.
#[derive(Debug)]
pub struct GameSession {
    devices: Box<dyn DeviceBackend>,
    state: SessionState,
    location: Location,
}

impl GameSession {
    /// Start a game at the end of the road with empty pockets.
    pub fn new(devices: Box<dyn DeviceBackend>) -> Self {
        Self {
            devices,
            state: SessionState::new(),
            location: Location::Road(Road::new()),
        }
    }

    /// What the player carries.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Where the player stands.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Parse and run one line of input.
    pub fn process(
        &mut self,
        input: &str,
        narrator: &mut dyn Narrator,
        reader: &mut dyn LineReader,
    ) -> FictionResult<Outcome> {
        self.execute(parse_command(input), narrator, reader)
    }

    /// Run a parsed command to completion.
    ///
    /// Device failures propagate; if one happens while moving, the player
    /// stays where they were.
    pub fn execute(
        &mut self,
        command: Command,
        narrator: &mut dyn Narrator,
        reader: &mut dyn LineReader,
    ) -> FictionResult<Outcome> {
        let mut ctx = Context {
            state: &mut self.state,
            devices: self.devices.as_ref(),
            narrator,
            input: reader,
        };

        match command {
            Command::Look { target: None } => {
                let text = self.location.describe(&mut ctx)?;
                ctx.say(text);
            }
            Command::Look {
                target: Some(target),
            } => self.location.look_at(&target, &mut ctx)?,
            Command::Go { direction } => {
                if let Some(next) = self.location.go_to(&direction, &mut ctx)? {
                    debug!(from = ?self.location.place(), to = ?next.place(), "moving");
                    self.location = next;
                    let text = self.location.describe(&mut ctx)?;
                    ctx.say(text);
                }
            }
            Command::Action { verb, argument } => match self.location.item_actions() {
                Some(actions) => match verb {
                    Verb::Take => actions.take(&argument, &mut ctx)?,
                    Verb::Drop => actions.drop_item(&argument, &mut ctx)?,
                },
                None => {
                    debug!(verb = verb.name(), "verb not offered here");
                    ctx.say(NOT_UNDERSTOOD);
                }
            },
            Command::Inventory => match ctx.state.held_token() {
                Some(token) => ctx.say(format!("You have a YubiKey marked with the number {token}.")),
                None => ctx.say("Your pockets are empty, except for some lint."),
            },
            Command::Oath { code } => match format_code(&code) {
                Some(spoken) => ctx.say(spoken),
                None => ctx.say(NOT_UNDERSTOOD),
            },
            Command::Help => ctx.say(HELP),
            Command::Quit => {
                ctx.say("Are you sure you want to quit?");
                ctx.pause();
                let confirmed = ctx.ask().is_none_or(|answer| {
                    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y" | "quit")
                });
                if confirmed {
                    return Ok(Outcome::Quit);
                }
            }
            Command::Unknown { input } => {
                debug!(%input, "unrecognized command");
                ctx.say(NOT_UNDERSTOOD);
            }
        }

        Ok(Outcome::Continue)
    }
}

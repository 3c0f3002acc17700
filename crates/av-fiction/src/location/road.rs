//! The end of the road.

use tracing::debug;

use super::{Context, Location, Place, Room, default_go, default_look};
use crate::error::FictionResult;

const DESCRIPTION: &str = "\
You are standing at the end of a road before a small brick building.
Around you is a forest.
A small stream flows out of the building and down a gully.
To the east is a large cave.";

const KNIGHT: &str =
    "As you approach the cave you see a knight standing guard beside the entrance.";

const KNIGHT_PROCEED: &str = "\"It's dangerous to go alone! I can sense you have what it takes \
                              to make it. Proceed.\"";

const KNIGHT_REFUSE: &str = "\"It's dangerous to go alone! \
                             I cannot let you pass without a YubiKey for protection.\"";

const ENTER_CAVE: &str =
    "You walk past the knight and enter the cave. Up ahead a large cavern opens up before you.";

/// Where the game starts: a building to one side, a guarded cave to the east.
#[derive(Debug, Default)]
pub struct Road;

impl Road {
    /// Create the road.
    pub fn new() -> Self {
        Self
    }
}

impl Room for Road {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn look_at(&mut self, target: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        match target {
            "house" | "building" => ctx.say("It looks like a brick building."),
            "cave" => ctx.say("You see the entrance to the cave. A figure stands nearby."),
            _ => return default_look(target, ctx),
        }
        Ok(())
    }

    fn go_to(&mut self, direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
        match direction {
            "house" | "building" => Location::open(Place::Building, ctx).map(Some),
            "cave" => {
                ctx.say(KNIGHT);
                ctx.pause();
                if ctx.state.has_token() {
                    ctx.say(KNIGHT_PROCEED);
                    ctx.pause();
                    ctx.say(ENTER_CAVE);
                    Location::open(Place::Guardian, ctx).map(Some)
                } else {
                    debug!("knight refused entry without a token");
                    ctx.say(KNIGHT_REFUSE);
                    Ok(None)
                }
            }
            _ => default_go(ctx),
        }
    }
}

//! The cavern behind the knight.

use super::{Context, Location, Place, Room, default_go};
use crate::error::FictionResult;

const DESCRIPTION: &str = "\
You stand in the middle of a large cavern.
Tunnels branch out from here leading in different directions.
In the center sits a robed man.
Seemingly oblivious to your presence, he mutters to himself, incoherently.";

/// A large cavern with a robed man at its center.
#[derive(Debug, Default)]
pub struct Cave;

impl Cave {
    /// Create the cavern.
    pub fn new() -> Self {
        Self
    }
}

impl Room for Cave {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn go_to(&mut self, direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
        match direction {
            "out" | "outside" | "road" => Location::open(Place::Road, ctx).map(Some),
            "tunnel" | "tunnels" | "deeper" => {
                ctx.say("You look down a tunnel and see that it is pitch black.");
                ctx.say("Fearing being eaten by a grue, you decide to stay here.");
                Ok(None)
            }
            "man" | "center" => Location::open(Place::Guardian, ctx).map(Some),
            _ => default_go(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use av_device::{SimulatedBackend, SimulatedDevice, TokenId};

    use super::*;
    use crate::location::testing::Harness;

    #[test]
    fn tunnels_are_a_dead_end() {
        let mut h = Harness::new(SimulatedBackend::new());
        let next = Cave::new().go_to("deeper", &mut h.ctx()).unwrap();
        assert!(next.is_none());
        assert!(h.narrator.contains("grue"));
    }

    #[test]
    fn back_to_the_road() {
        let mut h = Harness::new(SimulatedBackend::new());
        let next = Cave::new().go_to("out", &mut h.ctx()).unwrap();
        assert_eq!(next.map(|l| l.place()), Some(Place::Road));
        assert!(h.narrator.lines().is_empty());
    }

    #[test]
    fn approach_the_man() {
        let devices = SimulatedBackend::new();
        devices.plug(SimulatedDevice::new(TokenId(5), "YubiKey"));
        let mut h = Harness::new(devices);
        h.state.take(TokenId(5));
        let next = Cave::new().go_to("center", &mut h.ctx()).unwrap();
        assert_eq!(next.map(|l| l.place()), Some(Place::Guardian));
    }

    #[test]
    fn describe_is_static() {
        let mut h = Harness::new(SimulatedBackend::new());
        let text = Cave::new().describe(&mut h.ctx()).unwrap();
        assert!(text.starts_with("You stand in the middle of a large cavern."));
        assert!(text.contains("robed man"));
    }
}

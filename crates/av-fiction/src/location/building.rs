//! The well house, where the tokens lie.

use av_device::{DeviceBackend, TokenId, TopologyFingerprint};
use tracing::debug;

use super::{
    Context, ItemActions, Location, Place, Room, default_go, default_look, is_token_word,
};
use crate::error::FictionResult;
use crate::narrator::count_word;

const DESCRIPTION: &str = "You are standing inside a building, a well house for a large spring.";

const UNPLUGGED: &str = "There are no YubiKeys here. You feel a bit unplugged.";

const POCKETED: &str = "You take the YubiKey, and place it in your pocket.";

const ALREADY_HELD: &str = "You already have a YubiKey in your pocket.";

/// The inside of the well house.
///
/// Every attached device is a token lying on the floor, except the one in the
/// player's pocket. The device list is only re-read when the attached set
/// has changed since the last look.
#[derive(Debug, Default)]
pub struct Building {
    fingerprint: Option<TopologyFingerprint>,
    tokens: Vec<TokenId>,
}

impl Building {
    /// Create the well house with nothing enumerated yet.
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh(&mut self, devices: &dyn DeviceBackend) -> FictionResult<()> {
        let current = devices.fingerprint()?;
        if self.fingerprint != Some(current) {
            let scan = devices.enumerate()?;
            debug!(count = scan.devices.len(), "device topology changed");
            self.tokens = scan.tokens();
            self.fingerprint = Some(scan.fingerprint);
        }
        Ok(())
    }

    /// Tokens on the floor: every attached device but the held one.
    fn on_ground(&self, held: Option<TokenId>) -> Vec<TokenId> {
        self.tokens
            .iter()
            .copied()
            .filter(|t| Some(*t) != held)
            .collect()
    }
}

impl Room for Building {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn describe(&mut self, ctx: &mut Context<'_>) -> FictionResult<String> {
        self.refresh(ctx.devices)?;
        let held = ctx.state.held_token();
        let detail = match self.on_ground(held).len() {
            0 if held.is_some() => "You see an imprint in the dust from where a YubiKey once was.",
            0 => {
                "You feel like something is missing, but you can't quite make the connection.\n\
                 You feel a bit unplugged."
            }
            1 => "There is a YubiKey on the ground here.",
            _ => "There are some YubiKeys on the ground here.",
        };
        Ok(format!("{DESCRIPTION}\n\n{detail}"))
    }

    fn look_at(&mut self, target: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        if !is_token_word(target) {
            return default_look(target, ctx);
        }

        self.refresh(ctx.devices)?;
        match self.on_ground(ctx.state.held_token()).as_slice() {
            [] => ctx.say(UNPLUGGED),
            [token] => ctx.say(format!("The YubiKey is marked with the number {token}.")),
            tokens => {
                ctx.say(format!(
                    "There are {} YubiKeys on the ground, covered with strange markings.",
                    count_word(tokens.len())
                ));
                for token in tokens {
                    ctx.say(format!("One YubiKey is marked with the number {token}."));
                }
            }
        }
        Ok(())
    }

    fn go_to(&mut self, direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
        match direction {
            "out" | "outside" | "road" => Location::open(Place::Road, ctx).map(Some),
            _ => default_go(ctx),
        }
    }
}

impl ItemActions for Building {
    fn take(&mut self, what: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        self.refresh(ctx.devices)?;

        if is_token_word(what) {
            if ctx.state.has_token() {
                ctx.say(ALREADY_HELD);
                return Ok(());
            }
            match self.on_ground(None).as_slice() {
                [] => ctx.say(UNPLUGGED),
                [token] => {
                    ctx.state.take(*token);
                    debug!(%token, "token taken");
                    ctx.say(POCKETED);
                }
                tokens => ctx.say(format!(
                    "There are {} YubiKeys, don't be greedy.",
                    count_word(tokens.len())
                )),
            }
            return Ok(());
        }

        let Ok(token) = what.parse::<TokenId>() else {
            ctx.say("You can't take that.");
            return Ok(());
        };
        if ctx.state.has_token() {
            ctx.say(ALREADY_HELD);
        } else if self.tokens.contains(&token) {
            ctx.state.take(token);
            debug!(%token, "token taken by number");
            ctx.say(POCKETED);
        } else {
            ctx.say(format!("You don't see anything with the number {token} here."));
        }
        Ok(())
    }

    fn drop_item(&mut self, what: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        if !is_token_word(what) {
            ctx.say("You cannot drop that.");
            return Ok(());
        }
        match ctx.state.drop_token() {
            Some(token) => {
                debug!(%token, "token dropped");
                ctx.say("You take the YubiKey from your pocket, and drop it on the ground.");
            }
            None => ctx.say("You don't have a YubiKey to drop."),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use av_device::{SimulatedBackend, SimulatedDevice};

    use super::*;
    use crate::location::testing::Harness;

    fn backend_with(serials: &[u32]) -> SimulatedBackend {
        let backend = SimulatedBackend::new();
        for serial in serials {
            backend.plug(SimulatedDevice::new(TokenId(*serial), "YubiKey"));
        }
        backend
    }

    #[test]
    fn no_tokens_feels_unplugged() {
        let mut h = Harness::new(SimulatedBackend::new());
        let mut building = Building::new();
        let text = building.describe(&mut h.ctx()).unwrap();
        assert!(text.starts_with(DESCRIPTION));
        assert!(text.ends_with("You feel a bit unplugged."));

        building.take("key", &mut h.ctx()).unwrap();
        assert_eq!(h.narrator.lines(), [UNPLUGGED]);
        assert!(!h.state.has_token());
    }

    #[test]
    fn one_token_on_the_ground() {
        let mut h = Harness::new(backend_with(&[1234]));
        let text = Building::new().describe(&mut h.ctx()).unwrap();
        insta::assert_snapshot!(text, @r"
        You are standing inside a building, a well house for a large spring.

        There is a YubiKey on the ground here.
        ");
    }

    #[test]
    fn take_single_token_then_imprint() {
        let mut h = Harness::new(backend_with(&[1234]));
        let mut building = Building::new();
        building.take("yubikey", &mut h.ctx()).unwrap();
        assert_eq!(h.state.held_token(), Some(TokenId(1234)));
        assert_eq!(h.narrator.lines(), [POCKETED]);

        let text = building.describe(&mut h.ctx()).unwrap();
        assert!(text.ends_with("You see an imprint in the dust from where a YubiKey once was."));

        building.take("key", &mut h.ctx()).unwrap();
        assert!(h.narrator.contains(ALREADY_HELD));
    }

    #[test]
    fn two_tokens_are_not_auto_resolved() {
        let mut h = Harness::new(backend_with(&[11, 22]));
        let mut building = Building::new();
        let text = building.describe(&mut h.ctx()).unwrap();
        assert!(text.ends_with("There are some YubiKeys on the ground here."));

        building.take("keys", &mut h.ctx()).unwrap();
        assert_eq!(h.narrator.lines(), ["There are two YubiKeys, don't be greedy."]);
        assert!(!h.state.has_token());
    }

    #[test]
    fn take_by_number() {
        let mut h = Harness::new(backend_with(&[11, 22]));
        let mut building = Building::new();
        building.take("33", &mut h.ctx()).unwrap();
        assert!(!h.state.has_token());
        building.take("22", &mut h.ctx()).unwrap();
        assert_eq!(h.state.held_token(), Some(TokenId(22)));
        building.take("11", &mut h.ctx()).unwrap();
        assert_eq!(h.state.held_token(), Some(TokenId(22)));
        assert_eq!(
            h.narrator.lines(),
            [
                "You don't see anything with the number 33 here.",
                POCKETED,
                ALREADY_HELD,
            ]
        );

        let text = building.describe(&mut h.ctx()).unwrap();
        assert!(text.ends_with("There is a YubiKey on the ground here."));
    }

    #[test]
    fn take_nonsense() {
        let mut h = Harness::new(backend_with(&[11]));
        Building::new().take("spring", &mut h.ctx()).unwrap();
        assert_eq!(h.narrator.lines(), ["You can't take that."]);
    }

    #[test]
    fn drop_rules() {
        let mut h = Harness::new(backend_with(&[11]));
        let mut building = Building::new();
        building.drop_item("key", &mut h.ctx()).unwrap();
        assert_eq!(h.state, crate::state::SessionState::new());

        building.take("key", &mut h.ctx()).unwrap();
        building.drop_item("bucket", &mut h.ctx()).unwrap();
        assert!(h.state.has_token());
        building.drop_item("key", &mut h.ctx()).unwrap();
        assert!(!h.state.has_token());

        assert_eq!(
            h.narrator.lines(),
            [
                "You don't have a YubiKey to drop.",
                POCKETED,
                "You cannot drop that.",
                "You take the YubiKey from your pocket, and drop it on the ground.",
            ]
        );
    }

    #[test]
    fn look_at_tokens_lists_numbers() {
        let mut h = Harness::new(backend_with(&[11, 22]));
        Building::new().look_at("keys", &mut h.ctx()).unwrap();
        assert_eq!(
            h.narrator.lines(),
            [
                "There are two YubiKeys on the ground, covered with strange markings.",
                "One YubiKey is marked with the number 11.",
                "One YubiKey is marked with the number 22.",
            ]
        );
    }

    #[test]
    fn look_at_other_things() {
        let mut h = Harness::new(SimulatedBackend::new());
        let mut building = Building::new();
        building.look_at("key", &mut h.ctx()).unwrap();
        building.look_at("spring", &mut h.ctx()).unwrap();
        assert_eq!(h.narrator.lines(), [UNPLUGGED, "I see no spring here."]);
    }

    #[test]
    fn enumerates_only_when_topology_changes() {
        let devices = backend_with(&[11]);
        let mut h = Harness::new(devices.clone());
        let mut building = Building::new();
        building.describe(&mut h.ctx()).unwrap();
        building.describe(&mut h.ctx()).unwrap();
        building.look_at("key", &mut h.ctx()).unwrap();
        assert_eq!(devices.enumerate_calls(), 1);

        devices.plug(SimulatedDevice::new(TokenId(22), "YubiKey"));
        let text = building.describe(&mut h.ctx()).unwrap();
        assert_eq!(devices.enumerate_calls(), 2);
        assert!(text.ends_with("There are some YubiKeys on the ground here."));
    }

    #[test]
    fn leave_for_the_road() {
        let mut h = Harness::new(SimulatedBackend::new());
        let next = Building::new().go_to("outside", &mut h.ctx()).unwrap();
        assert_eq!(next.map(|l| l.place()), Some(Place::Road));
    }
}

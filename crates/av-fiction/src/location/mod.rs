//! Locations and the per-command context they act on.
//!
//! Every location implements [`Room`], overriding only the verbs it has
//! something special to say about. [`Location`] is the closed set of them
//! and is what the dispatcher holds. A fresh location is built on every move
//! through [`Location::open`]; none is ever reused.

mod building;
mod cave;
mod guardian;
mod road;

use av_device::DeviceBackend;

pub use building::Building;
pub use cave::Cave;
pub use guardian::Guardian;
pub use road::Road;

use crate::error::FictionResult;
use crate::narrator::{LineReader, Narrator};
use crate::state::SessionState;

/// Words the player may use for a token.
pub const TOKEN_WORDS: &[&str] = &["yubikeys", "keys", "yubikey", "key"];

/// Whether `word` names a token.
pub fn is_token_word(word: &str) -> bool {
    TOKEN_WORDS.contains(&word.to_lowercase().as_str())
}

/// Mutable context passed to a location while it handles one command.
pub struct Context<'a> {
    /// What the player carries.
    pub state: &'a mut SessionState,
    /// Attached devices.
    pub devices: &'a dyn DeviceBackend,
    /// Where narration goes.
    pub narrator: &'a mut dyn Narrator,
    /// Where answers come from.
    pub input: &'a mut dyn LineReader,
}

impl Context<'_> {
    /// Narrate a block of text.
    pub fn say(&mut self, text: impl AsRef<str>) {
        self.narrator.emit(text.as_ref());
    }

    /// Narrate an empty line.
    pub fn pause(&mut self) {
        self.narrator.emit("");
    }

    /// Wait for the player's answer. `None` if input is closed.
    pub fn ask(&mut self) -> Option<String> {
        self.input.read_line()
    }
}

/// What every location can do.
///
/// The provided methods are the behavior of a location with nothing special
/// to say.
pub trait Room {
    /// Fixed description of the location.
    fn description(&self) -> &'static str;

    /// Describe the location on arrival or on `look`.
    ///
    /// Intermediate narration may be emitted through the context; the
    /// returned text is the final word of the visit.
    fn describe(&mut self, _ctx: &mut Context<'_>) -> FictionResult<String> {
        Ok(self.description().to_string())
    }

    /// Look at something in the location.
    fn look_at(&mut self, target: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        default_look(target, ctx)
    }

    /// Try to leave in `direction`. `None` means the player stays put.
    fn go_to(&mut self, _direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
        default_go(ctx)
    }
}

/// Look at something a location knows nothing about.
pub fn default_look(target: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
    ctx.say(format!("I see no {target} here."));
    Ok(())
}

/// Head in a direction that leads nowhere.
pub fn default_go(ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
    ctx.say("Go somewhere else!");
    Ok(None)
}

/// The take and drop verbs, offered by locations that have things lying around.
pub trait ItemActions {
    /// Pick something up.
    fn take(&mut self, what: &str, ctx: &mut Context<'_>) -> FictionResult<()>;

    /// Put something down.
    fn drop_item(&mut self, what: &str, ctx: &mut Context<'_>) -> FictionResult<()>;
}

/// The kinds of location, used to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Place {
    /// The end of the road, where the game starts.
    Road,
    /// The well house where the tokens lie.
    Building,
    /// The cavern behind the knight.
    Cave,
    /// The robed man at the center of the cavern.
    Guardian,
}

/// A location the player can be in.
#[derive(Debug)]
pub enum Location {
    /// See [`Road`].
    Road(Road),
    /// See [`Building`].
    Building(Building),
    /// See [`Cave`].
    Cave(Cave),
    /// See [`Guardian`].
    Guardian(Guardian),
}

impl Location {
    /// Build a fresh location.
    ///
    /// Opening the guardian opens a credential session on the held token and
    /// fails if the device cannot be reached.
    pub fn open(place: Place, ctx: &mut Context<'_>) -> FictionResult<Self> {
        Ok(match place {
            Place::Road => Self::Road(Road::new()),
            Place::Building => Self::Building(Building::new()),
            Place::Cave => Self::Cave(Cave::new()),
            Place::Guardian => Self::Guardian(Guardian::open(ctx)?),
        })
    }

    /// Which kind of location this is.
    pub fn place(&self) -> Place {
        match self {
            Self::Road(_) => Place::Road,
            Self::Building(_) => Place::Building,
            Self::Cave(_) => Place::Cave,
            Self::Guardian(_) => Place::Guardian,
        }
    }

    /// Describe the location. See [`Room::describe`].
    pub fn describe(&mut self, ctx: &mut Context<'_>) -> FictionResult<String> {
        self.room().describe(ctx)
    }

    /// Look at something. See [`Room::look_at`].
    pub fn look_at(&mut self, target: &str, ctx: &mut Context<'_>) -> FictionResult<()> {
        self.room().look_at(target, ctx)
    }

    /// Try to leave. See [`Room::go_to`].
    pub fn go_to(&mut self, direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Self>> {
        self.room().go_to(direction, ctx)
    }

    /// The take and drop verbs, if this location offers them.
    pub fn item_actions(&mut self) -> Option<&mut dyn ItemActions> {
        match self {
            Self::Building(building) => Some(building),
            _ => None,
        }
    }

    fn room(&mut self) -> &mut dyn Room {
        match self {
            Self::Road(room) => room,
            Self::Building(room) => room,
            Self::Cave(room) => room,
            Self::Guardian(room) => room,
        }
    }
}


#[cfg(test)]
mod tests {
    use av_device::SimulatedBackend;

    use super::testing::Harness;
    use super::*;

    #[test]
    fn token_vocabulary() {
        for word in ["key", "keys", "YubiKey", "YUBIKEYS"] {
            assert!(is_token_word(word), "{word}");
        }
        assert!(!is_token_word("token"));
        assert!(!is_token_word("1234"));
    }

    #[test]
    fn unknown_targets_and_directions_fall_back_everywhere() {
        for place in [Place::Road, Place::Building, Place::Cave] {
            let mut h = Harness::new(SimulatedBackend::new());
            let mut location = Location::open(place, &mut h.ctx()).unwrap();
            location.look_at("dragon", &mut h.ctx()).unwrap();
            let next = location.go_to("north", &mut h.ctx()).unwrap();
            assert!(next.is_none(), "{place:?}");
            assert_eq!(
                h.narrator.lines(),
                ["I see no dragon here.", "Go somewhere else!"],
                "{place:?}"
            );
        }
    }

    #[test]
    fn only_the_building_offers_item_actions() {
        let mut h = Harness::new(SimulatedBackend::new());
        for place in [Place::Road, Place::Cave] {
            let mut location = Location::open(place, &mut h.ctx()).unwrap();
            assert!(location.item_actions().is_none());
        }
        let mut building = Location::open(Place::Building, &mut h.ctx()).unwrap();
        assert!(building.item_actions().is_some());
        assert_eq!(building.place(), Place::Building);
    }
}

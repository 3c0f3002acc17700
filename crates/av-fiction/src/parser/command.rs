//! Command parsing for player input.

/// A verb only some locations know how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    /// Pick something up.
    Take,
    /// Put something down.
    Drop,
}

impl Verb {
    /// The verb as typed.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Take => "take",
            Self::Drop => "drop",
        }
    }
}

/// A parsed player command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Describe the current location, or look at something in it.
    Look {
        /// Optional thing to look at.
        target: Option<String>,
    },
    /// Head somewhere.
    Go {
        /// Where to go. May be empty.
        direction: String,
    },
    /// A location-specific verb with exactly one argument.
    Action {
        /// The verb.
        verb: Verb,
        /// Its single argument.
        argument: String,
    },
    /// Check the player's pockets.
    Inventory,
    /// Read a code out loud.
    Oath {
        /// The digits to read.
        code: String,
    },
    /// List the commands.
    Help,
    /// Leave the game.
    Quit,
    /// Anything else.
    Unknown {
        /// The input as typed.
        input: String,
    },
}

const LOOK_VERBS: &[&str] = &["look", "l", "examine", "x"];
const GO_VERBS: &[&str] = &["go", "walk", "move"];
const TAKE_VERBS: &[&str] = &["take", "get", "grab"];
const DROP_VERBS: &[&str] = &["drop", "discard"];
const INVENTORY_VERBS: &[&str] = &["inventory", "inv", "i"];
const HELP_VERBS: &[&str] = &["help", "?"];
const QUIT_VERBS: &[&str] = &["quit", "q", "exit"];

/// Parse a line of player input.
///
/// Input is matched case-insensitively and all arguments come back lower-case.
/// An empty line is a plain `look`.
pub fn parse_command(input: &str) -> Command {
    let lowered = input.trim().to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    let Some((&verb, rest)) = words.split_first() else {
        return Command::Look { target: None };
    };

    if LOOK_VERBS.contains(&verb) {
        return parse_look(rest);
    }
    if GO_VERBS.contains(&verb) {
        return Command::Go {
            direction: rest.join(" "),
        };
    }
    if TAKE_VERBS.contains(&verb) {
        return parse_action(Verb::Take, rest, &lowered);
    }
    if DROP_VERBS.contains(&verb) {
        return parse_action(Verb::Drop, rest, &lowered);
    }
    if INVENTORY_VERBS.contains(&verb) {
        return Command::Inventory;
    }
    if HELP_VERBS.contains(&verb) {
        return Command::Help;
    }
    if QUIT_VERBS.contains(&verb) {
        return Command::Quit;
    }
    if let ("oath", [code]) = (verb, rest) {
        return Command::Oath {
            code: (*code).to_string(),
        };
    }

    Command::Unknown { input: lowered }
}

fn parse_look(rest: &[&str]) -> Command {
    // "look at the cave" reads the same as "look the cave"
    let target = match rest {
        [] => return Command::Look { target: None },
        ["at", tail @ ..] if !tail.is_empty() => tail,
        _ => rest,
    };
    Command::Look {
        target: Some(target.join(" ")),
    }
}

fn parse_action(verb: Verb, rest: &[&str], input: &str) -> Command {
    match rest {
        [argument] => Command::Action {
            verb,
            argument: (*argument).to_string(),
        },
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

//! Session state shared by every location.

use av_device::TokenId;

/// What the player carries for the lifetime of one game.
///
/// Holds at most one token. Whether a token is held is the only thing that
/// decides if the knight lets the player into the cave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    held_token: Option<TokenId>,
}

impl SessionState {
    /// Create an empty session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// The token in the player's pocket, if any.
    pub fn held_token(&self) -> Option<TokenId> {
        self.held_token
    }

    /// Check whether a token is held.
    pub fn has_token(&self) -> bool {
        self.held_token.is_some()
    }

    /// Pocket a token. Returns `false` and changes nothing if one is already held.
    pub fn take(&mut self, token: TokenId) -> bool {
        if self.held_token.is_some() {
            return false;
        }
        self.held_token = Some(token);
        true
    }

    /// Empty the pocket, returning what was held.
    pub fn drop_token(&mut self) -> Option<TokenId> {
        self.held_token.take()
    }
}

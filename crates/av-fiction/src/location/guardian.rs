//! The robed man and the oath he swore.
//!
//! Every visit runs the whole exchange from the top: unlock the device if it
//! is locked, pick a credential from the scroll, confirm with a touch if the
//! credential asks for one, and hear the code read out loud. Each way the
//! exchange can fall short ends the visit with its own line of narration;
//! the player can always walk back in and try again.

use std::collections::BTreeMap;

use av_device::{Credential, CredentialId, CredentialSession, OneTimeCode};
use tracing::{debug, info, warn};

use super::{Context, Location, Place, Room, default_go};
use crate::error::{FictionError, FictionResult};
use crate::narrator::format_code;

const DESCRIPTION: &str = "\
The robed man notices you and looks up. His eyes light up and he smiles broadly.

\"Welcome, stranger! I've been alone for so long...\".

He pauses, and in the flash of an instant his smile is replaced with a stern look.";

const PASSWORD_REQUEST: &str = "\
\"Ah, but, I cannot share with you my secrets unless you can give me the
password. I swore an oath!\".
His harsh demeanor drops slightly, as he looks at you with a glint of
hope in his eyes. He looks at you expectantly as he continues:
\"You DO know the password, do you not? Tell me, what is it?\".";

const PASSWORD_ACCEPTED: &str =
    "The smile returns. \"I knew it! Welcome, friend, let me share with you my secrets!\".";

const DISMISSAL: &str = "\
The man looks at you with great disappointment in his eyes.
\"No, no, no... That isn't it. Go away! Leave me be!\"";

const SCROLL: &str = "\
He pulls out an old tattered scroll and unravels it.
\"Which secret shall I share?\", he asks, as he extends a bony arm
toward you, beckoning you to read.";

const EMPTY_SCROLL: &str = "\
You look at the scroll, but it is empty. The man notices your
confusion, and looks at the blank page himself.

\"I... I don't understand. There are no secrets here. Surely you
must have secrets to keep?!?\".

The man is noticeably upset, and you deem it wise to not disturb
him further.";

const SCOLDING: &str = "\
\"What? I don't understand you. Speak up!\"
The man looks at you, expectantly.";

const CHOSEN: &str = "Ahhh, of course! I knew you would choose that one!";

const RING_OFFER: &str = "\
\"In that case, there's just one more thing I must ask of you...\"
As he speaks he reaches into his pocket, grasping for something.
As he pulls his hand back out you see a glimmer, something small
and metallic is clenched in his fist.
He slowly opens his hand for you to see a golden ring laying
across his palm.

\"Are you ready?\", he asks.";

const REFUSAL: &str = "Then go away!";

const RING_GLOWS: &str = "\
Without a word, the golden ring starts to pulse with a
bright green glow. You feel compelled to reach out and touch
it with your fingers.";

const RING_TOUCHED: &str = "\
As soon as you touch the gold ring it immediately stops
pulsing. The man pulls it close to his eyes, as if
struggling to read an inscription. Strange, you think to
yourself, you could have sworn there was nothing there a
moment ago.";

const COWARDICE: &str = "\
The man looks at you disapprovingly.

\"Those who are too cowardly to act, will never amount to
anything.\", he mutters as he puts the ring back into his pocket.";

const RING_READ: &str = "\
The man reaches into his pocket, grasping for something.
As he pulls his hand back out you see a glimmer, something small
and metallic is clenched in his fist.
He slowly opens his hand for you to see a golden ring laying
across his palm. He holds the ring up close to his face, and
squints, and you realize he is reading an inscription.";

const READ_ALOUD: &str = "The man reads the inscription out loud:";

/// The robed man, holding an open credential session on the player's token.
#[derive(Debug)]
pub struct Guardian {
    session: Box<dyn CredentialSession>,
}

impl Guardian {
    /// Approach the man, opening a credential session on the held token.
    ///
    /// Fails if no token is held or its device cannot be reached.
    pub fn open(ctx: &mut Context<'_>) -> FictionResult<Self> {
        let token = ctx.state.held_token().ok_or(FictionError::TokenNotHeld)?;
        let session = ctx.devices.open_session(token)?;
        debug!(%token, locked = session.is_locked(), "credential session opened");
        Ok(Self { session })
    }

    /// Ask for the password and try it. `false` ends the visit.
    fn unlock(&mut self, ctx: &mut Context<'_>) -> bool {
        ctx.say(PASSWORD_REQUEST);
        let Some(password) = ctx.ask() else {
            debug!("input closed at the password prompt");
            return false;
        };
        ctx.pause();

        let key = self.session.derive_key(&password);
        match self.session.validate(&key) {
            Ok(()) => {
                ctx.say(PASSWORD_ACCEPTED);
                true
            }
            Err(err) if err.is_validation_failure() => {
                info!(error = %err, "unlock rejected");
                false
            }
            Err(err) => {
                warn!(error = %err, "device failed during unlock");
                false
            }
        }
    }

    /// Read names until one matches a credential exactly. `None` if input closed.
    fn choose<'c>(
        credentials: &'c BTreeMap<CredentialId, Credential>,
        ctx: &mut Context<'_>,
    ) -> Option<&'c Credential> {
        loop {
            let answer = ctx.ask()?;
            if let Some(credential) = credentials.get(&CredentialId(answer.into_bytes())) {
                return Some(credential);
            }
            ctx.say(SCOLDING);
        }
    }

    /// Calculate the code for `credential`, or the line that ends the visit.
    fn calculate(
        &mut self,
        credential: &Credential,
        ctx: &mut Context<'_>,
    ) -> FictionResult<Result<OneTimeCode, &'static str>> {
        if !credential.touch_required {
            ctx.say(RING_READ);
            return Ok(Ok(self.session.calculate_code(credential)?));
        }

        ctx.say(RING_OFFER);
        let ready = ctx.ask().is_some_and(|answer| is_affirmative(&answer));
        if !ready {
            return Ok(Err(REFUSAL));
        }

        ctx.pause();
        ctx.say(RING_GLOWS);
        ctx.pause();
        match self.session.calculate_code(credential) {
            Ok(code) => {
                ctx.say(RING_TOUCHED);
                Ok(Ok(code))
            }
            Err(err) if err.is_validation_failure() => {
                info!(error = %err, "touch confirmation failed");
                Ok(Err(COWARDICE))
            }
            Err(err) => {
                warn!(error = %err, "device failed during touch confirmation");
                Ok(Err(COWARDICE))
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y")
}

impl Room for Guardian {
    fn description(&self) -> &'static str {
        DESCRIPTION
    }

    fn describe(&mut self, ctx: &mut Context<'_>) -> FictionResult<String> {
        ctx.say(DESCRIPTION);

        if self.session.is_locked() && !self.unlock(ctx) {
            return Ok(DISMISSAL.to_string());
        }

        let credentials = self.session.list_credentials()?;
        ctx.say(SCROLL);
        ctx.pause();
        if credentials.is_empty() {
            return Ok(EMPTY_SCROLL.to_string());
        }

        for id in credentials.keys() {
            ctx.narrator.verbatim(&id.to_string());
        }
        let Some(credential) = Self::choose(&credentials, ctx) else {
            return Ok(REFUSAL.to_string());
        };
        debug!(credential = %credential.id, touch = credential.touch_required, "credential chosen");

        ctx.pause();
        ctx.say(CHOSEN);
        ctx.pause();

        let code = match self.calculate(credential, ctx)? {
            Ok(code) => code,
            Err(ending) => return Ok(ending.to_string()),
        };

        ctx.say(READ_ALOUD);
        ctx.pause();
        Ok(format_code(&code.value).unwrap_or(code.value))
    }

    fn go_to(&mut self, direction: &str, ctx: &mut Context<'_>) -> FictionResult<Option<Location>> {
        match direction {
            "back" | "cave" | "away" => Location::open(Place::Cave, ctx).map(Some),
            _ => default_go(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use av_device::{
        Clock, SimulatedBackend, SimulatedCredential, SimulatedDevice, TokenId, TouchResponse,
    };

    use super::*;
    use crate::location::testing::Harness;
    use crate::narrator::LineReader;

    const SERIAL: TokenId = TokenId(1234);
    const SECRET: &[u8] = b"12345678901234567890123456789012";

    fn device() -> SimulatedDevice {
        SimulatedDevice::new(SERIAL, "YubiKey 5 NFC")
    }

    fn harness(device: SimulatedDevice) -> Harness {
        let backend = SimulatedBackend::new()
            .with_clock(Clock::Fixed(59))
            .with_touch_timeout(Duration::ZERO);
        backend.plug(device);
        let mut h = Harness::new(backend);
        h.state.take(SERIAL);
        h
    }

    /// Answers in order, pulling the device out right after giving `trigger`.
    struct UnplugAfter {
        devices: SimulatedBackend,
        trigger: &'static str,
        answers: Vec<&'static str>,
    }

    impl LineReader for UnplugAfter {
        fn read_line(&mut self) -> Option<String> {
            if self.answers.is_empty() {
                return None;
            }
            let answer = self.answers.remove(0);
            if answer == self.trigger {
                self.devices.unplug(SERIAL);
            }
            Some(answer.to_string())
        }
    }

    fn visit_unplugging(h: &mut Harness, trigger: &'static str, answers: &[&'static str]) -> String {
        let mut input = UnplugAfter {
            devices: h.devices.clone(),
            trigger,
            answers: answers.to_vec(),
        };
        let mut guardian = Guardian::open(&mut h.ctx()).unwrap();
        let mut ctx = Context {
            state: &mut h.state,
            devices: &h.devices,
            narrator: &mut h.narrator,
            input: &mut input,
        };
        guardian.describe(&mut ctx).unwrap()
    }

    fn visit(h: &mut Harness) -> String {
        let mut guardian = Guardian::open(&mut h.ctx()).unwrap();
        guardian.describe(&mut h.ctx()).unwrap()
    }

    #[test]
    fn open_requires_a_token() {
        let mut h = Harness::new(SimulatedBackend::new());
        let err = Guardian::open(&mut h.ctx()).unwrap_err();
        assert!(matches!(err, FictionError::TokenNotHeld));
    }

    #[test]
    fn reads_out_an_eight_digit_code() {
        let mut h = harness(
            device().with_credential(SimulatedCredential::totp("example", SECRET).with_digits(8)),
        )
        .answering(["example"]);
        let ending = visit(&mut h);
        assert_eq!(ending, "Four, six, one, one... Nine, two, four, six.");
        assert!(h.narrator.contains(RING_READ));
        assert!(h.narrator.contains(READ_ALOUD));
        assert!(!h.narrator.contains("password"));
    }

    #[test]
    fn wrong_password_dismisses_and_retry_asks_again() {
        let mut h = harness(
            device()
                .with_password("hunter2")
                .with_credential(SimulatedCredential::totp("example", SECRET)),
        )
        .answering(["swordfish", "hunter2", "example"]);

        assert_eq!(visit(&mut h), DISMISSAL);
        assert!(h.narrator.contains(PASSWORD_REQUEST));
        assert!(!h.narrator.contains(SCROLL));

        h.narrator.drain();
        let ending = visit(&mut h);
        assert!(h.narrator.contains(PASSWORD_REQUEST));
        assert!(h.narrator.contains(PASSWORD_ACCEPTED));
        assert_eq!(ending, format_code(&av_device::oath::totp(SECRET, 59, 30, 6).unwrap()).unwrap());
    }

    #[test]
    fn closed_input_at_password_dismisses() {
        let mut h = harness(device().with_password("hunter2"));
        assert_eq!(visit(&mut h), DISMISSAL);
    }

    #[test]
    fn empty_scroll() {
        let mut h = harness(device());
        assert_eq!(visit(&mut h), EMPTY_SCROLL);
        assert!(h.narrator.contains(SCROLL));
        assert_eq!(h.devices.calculate_calls(), 0);
    }

    #[test]
    fn scolds_until_an_exact_match() {
        let mut h = harness(
            device()
                .with_credential(SimulatedCredential::totp("GitHub", SECRET))
                .with_credential(SimulatedCredential::totp("bank", SECRET)),
        )
        .answering(["github", "bank ", "GitHub"]);
        visit(&mut h);

        let scoldings = h.narrator.lines().iter().filter(|l| *l == SCOLDING).count();
        assert_eq!(scoldings, 2);
        assert!(h.narrator.lines().iter().any(|l| l == "GitHub"));
        assert!(h.narrator.lines().iter().any(|l| l == "bank"));
        assert!(h.narrator.contains(CHOSEN));
        assert_eq!(h.input.remaining(), 0);
    }

    #[test]
    fn closed_input_while_choosing() {
        let mut h = harness(device().with_credential(SimulatedCredential::totp("a", SECRET)))
            .answering(["b"]);
        assert_eq!(visit(&mut h), REFUSAL);
        assert_eq!(h.input.reads(), 2);
        assert_eq!(h.devices.calculate_calls(), 0);
    }

    #[test]
    fn declined_touch_never_calculates() {
        let mut h = harness(
            device().with_credential(SimulatedCredential::hotp("vpn", SECRET).with_touch(true)),
        )
        .answering(["vpn", "no"]);
        assert_eq!(visit(&mut h), REFUSAL);
        assert!(h.narrator.contains(RING_OFFER));
        assert!(!h.narrator.contains(RING_GLOWS));
        assert_eq!(h.devices.calculate_calls(), 0);
    }

    #[test]
    fn confirmed_touch_reads_the_code() {
        let mut h = harness(
            device().with_credential(SimulatedCredential::hotp("vpn", SECRET).with_touch(true)),
        )
        .answering(["vpn", "Y"]);
        let ending = visit(&mut h);
        assert_eq!(ending, format_code(&av_device::oath::hotp(SECRET, 0, 6).unwrap()).unwrap());
        assert!(h.narrator.contains(RING_GLOWS));
        assert!(h.narrator.contains(RING_TOUCHED));
        assert_eq!(h.devices.calculate_calls(), 1);
    }

    #[test]
    fn touch_timeout_is_cowardice() {
        let mut h = harness(
            device()
                .with_touch(TouchResponse::Ignore)
                .with_credential(SimulatedCredential::totp("vpn", SECRET).with_touch(true)),
        )
        .answering(["vpn", "yes"]);
        assert_eq!(visit(&mut h), COWARDICE);
        assert!(!h.narrator.contains(READ_ALOUD));
        assert_eq!(h.devices.calculate_calls(), 1);
    }

    #[test]
    fn device_removed_during_unlock_dismisses() {
        let mut h = harness(
            device()
                .with_password("hunter2")
                .with_credential(SimulatedCredential::totp("a", SECRET)),
        );
        assert_eq!(visit_unplugging(&mut h, "hunter2", &["hunter2"]), DISMISSAL);
        assert!(!h.narrator.contains(PASSWORD_ACCEPTED));
    }

    #[test]
    fn device_removed_before_touch_is_cowardice() {
        let mut h = harness(
            device().with_credential(SimulatedCredential::hotp("vpn", SECRET).with_touch(true)),
        );
        assert_eq!(visit_unplugging(&mut h, "yes", &["vpn", "yes"]), COWARDICE);
        assert!(h.narrator.contains(RING_GLOWS));
        assert!(!h.narrator.contains(RING_TOUCHED));
        assert!(!h.narrator.contains(READ_ALOUD));
        assert_eq!(h.devices.calculate_calls(), 1);
    }

    #[test]
    fn device_removed_before_listing_propagates() {
        let mut h = harness(device().with_credential(SimulatedCredential::totp("a", SECRET)));
        let mut guardian = Guardian::open(&mut h.ctx()).unwrap();
        h.devices.unplug(SERIAL);
        let err = guardian.describe(&mut h.ctx()).unwrap_err();
        assert!(matches!(err, FictionError::Device(_)));
    }

    #[test]
    fn walk_back_to_the_cave() {
        let mut h = harness(device());
        let mut guardian = Guardian::open(&mut h.ctx()).unwrap();
        let next = guardian.go_to("away", &mut h.ctx()).unwrap();
        assert_eq!(next.map(|l| l.place()), Some(Place::Cave));
    }
}

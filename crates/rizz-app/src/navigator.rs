use rizz_core::{CoreError, Screen};
use serde::Serialize;

/// What the navigator needs to know before moving forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preconditions {
    pub authenticated: bool,
    pub contact_selected: bool,
    pub result_ready: bool,
}

/// Finite state machine over [`Screen`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Navigator {
    screen: Screen,
}

impl Navigator {
    #[must_use]
    pub const fn screen(self) -> Screen {
        self.screen
    }

    /// Move forward to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidTransition`] if `next` is not reachable
    /// from the current screen or its precondition is unmet. The screen is
    /// left unchanged.
    pub fn advance(&mut self, next: Screen, ready: Preconditions) -> Result<(), CoreError> {
        if !self.screen.can_transition_to(next) {
            return Err(CoreError::transition("screen", self.screen, next));
        }
        let unmet = match next {
            Screen::Login => None,
            Screen::Directory => (!ready.authenticated).then_some("not authenticated"),
            Screen::Analysis if !ready.authenticated => Some("not authenticated"),
            Screen::Analysis => (!ready.contact_selected).then_some("no contact selected"),
            Screen::Results => (!ready.result_ready).then_some("no analysis result"),
        };
        if let Some(reason) = unmet {
            return Err(CoreError::transition(
                &format!("screen ({reason})"),
                self.screen,
                next,
            ));
        }
        self.screen = next;
        Ok(())
    }

    /// Go back one screen and return the new screen.
    pub fn back(&mut self) -> Screen {
        self.screen = self.screen.previous();
        self.screen
    }
}

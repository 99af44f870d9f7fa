//! Auth-session state and its transition machine.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route guards and user-aware components read this state; the auth
//! provider mutates it from the backend's auth-event stream. The previous
//! and next user are read inside one `apply_auth_change` call on the owned
//! state, so no mutable capture is shared across async callbacks.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::{Session, SessionRecord, User};

/// Tracking work a state transition asks the caller to dispatch.
///
/// Dispatch is fire-and-forget except during sign-out, where the caller
/// awaits the session close before the backend sign-out request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrackingAction {
    /// Record a session start for the user id.
    StartSession(String),
    /// Refresh the history list for the user id.
    FetchHistory(String),
    /// Close the newest open session row for the user id.
    EndSession(String),
}

/// Authentication state: current user/session, first-resolution flag, and
/// the mirrored session history.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<Session>,
    /// True only until the very first session resolution completes.
    pub loading: bool,
    /// Session rows for the current user, newest first.
    pub history: Vec<SessionRecord>,
    pub loading_history: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            session: None,
            loading: true,
            history: Vec::new(),
            loading_history: false,
        }
    }
}

impl AuthState {
    /// Apply one auth-stream event (or the initial resolution) and return
    /// the tracking work it implies.
    ///
    /// Entering the signed-in state asks for a session start plus a history
    /// refresh; duplicate signed-in events repeat both, mirroring the
    /// backend stream's semantics. Leaving it asks for a session end for
    /// the previous user and clears the local history.
    pub fn apply_auth_change(&mut self, next: Option<Session>) -> Vec<TrackingAction> {
        let previous_user_id = self.user.as_ref().map(|user| user.id.clone());

        self.user = next.as_ref().map(|session| session.user.clone());
        self.session = next;
        self.loading = false;

        match &self.user {
            Some(user) => vec![
                TrackingAction::StartSession(user.id.clone()),
                TrackingAction::FetchHistory(user.id.clone()),
            ],
            None => {
                self.history.clear();
                previous_user_id.map(TrackingAction::EndSession).into_iter().collect()
            }
        }
    }
}

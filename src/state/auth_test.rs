use super::*;

fn user(id: &str) -> User {
    User {
        id: id.to_owned(),
        email: Some(format!("{id}@example.com")),
        full_name: None,
        avatar_url: None,
    }
}

fn session(user_id: &str) -> Session {
    Session {
        access_token: format!("token-{user_id}"),
        refresh_token: None,
        expires_at: None,
        user: user(user_id),
    }
}

fn record(id: &str) -> SessionRecord {
    SessionRecord {
        id: id.to_owned(),
        user_id: "u-1".to_owned(),
        session_start: "2026-07-01T10:00:00.000Z".to_owned(),
        session_end: None,
        ip_address: None,
        user_agent: None,
        created_at: None,
    }
}

#[test]
fn default_state_is_resolving() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(state.user.is_none());
    assert!(state.history.is_empty());
}

#[test]
fn initial_resolution_without_session_just_clears_loading() {
    let mut state = AuthState::default();
    let actions = state.apply_auth_change(None);

    assert!(actions.is_empty());
    assert!(!state.loading);
    assert!(state.user.is_none());
}

#[test]
fn initial_resolution_with_session_starts_tracking_once() {
    let mut state = AuthState::default();
    let actions = state.apply_auth_change(Some(session("u-1")));

    assert_eq!(
        actions,
        vec![
            TrackingAction::StartSession("u-1".to_owned()),
            TrackingAction::FetchHistory("u-1".to_owned()),
        ]
    );
    assert!(!state.loading);
    assert_eq!(state.user.as_ref().map(|user| user.id.as_str()), Some("u-1"));
    assert!(state.session.is_some());
}

#[test]
fn loading_flips_false_exactly_once_and_stays_false() {
    let mut state = AuthState::default();
    state.apply_auth_change(None);
    assert!(!state.loading);

    state.apply_auth_change(Some(session("u-1")));
    assert!(!state.loading);

    state.apply_auth_change(None);
    assert!(!state.loading);
}

#[test]
fn sign_out_ends_previous_user_and_clears_history() {
    let mut state = AuthState::default();
    state.apply_auth_change(Some(session("u-1")));
    state.history = vec![record("rec-1"), record("rec-2")];

    let actions = state.apply_auth_change(None);

    assert_eq!(actions, vec![TrackingAction::EndSession("u-1".to_owned())]);
    assert!(state.user.is_none());
    assert!(state.session.is_none());
    assert!(state.history.is_empty());
}

#[test]
fn sign_out_while_signed_out_is_a_no_op() {
    let mut state = AuthState::default();
    state.apply_auth_change(None);

    let actions = state.apply_auth_change(None);
    assert!(actions.is_empty());
}

#[test]
fn user_switch_tracks_the_new_user() {
    let mut state = AuthState::default();
    state.apply_auth_change(Some(session("u-1")));

    // A direct switch to another user starts tracking for the new user;
    // the old user's open row stays open until their next sign-out.
    let actions = state.apply_auth_change(Some(session("u-2")));
    assert_eq!(
        actions,
        vec![
            TrackingAction::StartSession("u-2".to_owned()),
            TrackingAction::FetchHistory("u-2".to_owned()),
        ]
    );
    assert_eq!(state.user.as_ref().map(|user| user.id.as_str()), Some("u-2"));
}

#[test]
fn duplicate_signed_in_events_repeat_tracking() {
    let mut state = AuthState::default();
    let first = state.apply_auth_change(Some(session("u-1")));
    let second = state.apply_auth_change(Some(session("u-1")));
    assert_eq!(first, second);
}

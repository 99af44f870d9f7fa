use super::*;
use crate::net::types::User;

fn signed_in(loading: bool) -> AuthState {
    AuthState {
        user: Some(User {
            id: "u-1".to_owned(),
            email: None,
            full_name: None,
            avatar_url: None,
        }),
        loading,
        ..AuthState::default()
    }
}

#[test]
fn no_redirect_while_resolving() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!redirect_needed(&state));
}

#[test]
fn redirect_once_resolved_without_user() {
    let state = AuthState {
        loading: false,
        ..AuthState::default()
    };
    assert!(redirect_needed(&state));
}

#[test]
fn no_redirect_when_authenticated() {
    assert!(!redirect_needed(&signed_in(false)));
}

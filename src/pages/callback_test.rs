use super::*;
use crate::net::types::User;

fn routes() -> RouteConfig {
    crate::config::reset();
    crate::config::get().routes
}

fn session() -> Session {
    Session {
        access_token: "token".to_owned(),
        refresh_token: None,
        expires_at: None,
        user: User {
            id: "u-1".to_owned(),
            email: None,
            full_name: None,
            avatar_url: None,
        },
    }
}

#[test]
fn session_present_routes_to_dashboard() {
    assert_eq!(callback_destination(Ok(Some(session())), &routes()), "/dashboard");
}

#[test]
fn no_session_routes_to_login() {
    assert_eq!(callback_destination(Ok(None), &routes()), "/login");
}

#[test]
fn errors_fail_closed_to_login() {
    assert_eq!(
        callback_destination(Err("backend unreachable".to_owned()), &routes()),
        "/login"
    );
}

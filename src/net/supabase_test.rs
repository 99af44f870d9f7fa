use super::*;

// =============================================================
// URL and payload helpers
// =============================================================

#[test]
fn authorize_url_encodes_redirect_target() {
    let url = authorize_url(
        "https://proj.supabase.co/",
        OAuthProvider::Google,
        "https://app.example.com/auth/callback",
    );
    assert_eq!(
        url,
        "https://proj.supabase.co/auth/v1/authorize?provider=google&redirect_to=https%3A%2F%2Fapp.example.com%2Fauth%2Fcallback"
    );
}

#[test]
fn parse_token_fragment_reads_all_fields() {
    let tokens = parse_token_fragment("#access_token=at-1&refresh_token=rt-1&expires_in=3600&token_type=bearer")
        .expect("tokens");
    assert_eq!(tokens.access_token, "at-1");
    assert_eq!(tokens.refresh_token.as_deref(), Some("rt-1"));
    assert_eq!(tokens.expires_in, Some(3600.0));
}

#[test]
fn parse_token_fragment_requires_access_token() {
    assert_eq!(parse_token_fragment("#refresh_token=rt-1"), None);
    assert_eq!(parse_token_fragment("#access_token="), None);
    assert_eq!(parse_token_fragment(""), None);
}

#[test]
fn parse_token_fragment_tolerates_missing_optionals() {
    let tokens = parse_token_fragment("access_token=at-1").expect("tokens");
    assert_eq!(tokens.refresh_token, None);
    assert_eq!(tokens.expires_in, None);
}

#[test]
fn parse_user_projects_profile_metadata() {
    let body = serde_json::json!({
        "id": "u-1",
        "email": "a@b.com",
        "user_metadata": { "full_name": "Ada Lovelace", "avatar_url": "https://img/a.png" }
    });
    let user = parse_user(&body).expect("user");
    assert_eq!(user.id, "u-1");
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert_eq!(user.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(user.avatar_url.as_deref(), Some("https://img/a.png"));
}

#[test]
fn parse_user_falls_back_to_metadata_name() {
    let body = serde_json::json!({
        "id": "u-1",
        "user_metadata": { "name": "Ada" }
    });
    let user = parse_user(&body).expect("user");
    assert_eq!(user.full_name.as_deref(), Some("Ada"));
    assert_eq!(user.email, None);
}

#[test]
fn parse_user_requires_id() {
    assert_eq!(parse_user(&serde_json::json!({ "email": "a@b.com" })), None);
}

#[test]
fn request_failure_messages_format_status() {
    assert_eq!(row_request_failed_message("select", 401), "row select failed: 401");
    assert_eq!(user_request_failed_message(403), "user request failed: 403");
}

// =============================================================
// Listener registry
// =============================================================

#[cfg(not(feature = "csr"))]
mod native {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn settings() -> SupabaseConfig {
        SupabaseConfig {
            url: "https://proj.supabase.co".to_owned(),
            anon_key: "anon-key".to_owned(),
        }
    }

    fn drain<T: Clone>(sink: &Arc<Mutex<Vec<T>>>) -> Vec<T> {
        sink.lock().expect("sink lock").clone()
    }

    #[test]
    fn sign_out_notifies_listeners_with_cleared_session() {
        let client = SupabaseClient::new(&settings());
        let seen: Arc<Mutex<Vec<(AuthEvent, bool)>>> = Arc::default();
        let sink = seen.clone();
        let _subscription = client.on_auth_state_change(move |event, session| {
            sink.lock().expect("sink lock").push((event, session.is_some()));
        });

        futures::executor::block_on(client.sign_out()).expect("sign out");

        assert_eq!(drain(&seen), vec![(AuthEvent::SignedOut, false)]);
    }

    #[test]
    fn unsubscribe_stops_event_delivery() {
        let client = SupabaseClient::new(&settings());
        let seen: Arc<Mutex<Vec<AuthEvent>>> = Arc::default();
        let sink = seen.clone();
        let subscription = client.on_auth_state_change(move |event, _session| {
            sink.lock().expect("sink lock").push(event);
        });

        subscription.unsubscribe();
        futures::executor::block_on(client.sign_out()).expect("sign out");

        assert!(drain(&seen).is_empty());
    }

    #[test]
    fn reset_drops_listeners_and_session() {
        let client = SupabaseClient::new(&settings());
        let seen: Arc<Mutex<Vec<AuthEvent>>> = Arc::default();
        let sink = seen.clone();
        let _subscription = client.on_auth_state_change(move |event, _session| {
            sink.lock().expect("sink lock").push(event);
        });

        client.reset();
        futures::executor::block_on(client.sign_out()).expect("sign out");

        assert!(drain(&seen).is_empty());
        let session = futures::executor::block_on(client.get_session()).expect("session lookup");
        assert!(session.is_none());
        let _ = take_journal();
    }

    #[test]
    fn row_operations_record_call_journal() {
        let client = SupabaseClient::new(&settings());
        let _ = take_journal();

        let query = TableQuery::new().eq("user_id", "u-1").limit(2);
        let rows = futures::executor::block_on(client.select_rows("session_history", &query))
            .expect("select");
        assert!(rows.is_empty());
        futures::executor::block_on(
            client.update_row_by_id("session_history", "rec-1", &serde_json::json!({ "x": 1 })),
        )
        .expect("update");

        let journal = take_journal();
        assert_eq!(journal.len(), 2);
        assert_eq!(journal[0], "rest.select:session_history?user_id=eq.u-1&limit=2");
        assert!(journal[1].starts_with("rest.update:session_history:rec-1:"));
    }
}

use super::*;

// =============================================================
// Query and payload building
// =============================================================

#[test]
fn open_session_query_targets_newest_open_row() {
    assert_eq!(
        open_session_query("u-1").query_string(),
        "select=id&user_id=eq.u-1&session_end=is.null&order=session_start.desc&limit=1"
    );
}

#[test]
fn history_query_orders_newest_first_and_caps_rows() {
    assert_eq!(
        history_query("u-1", 50).query_string(),
        "select=*&user_id=eq.u-1&order=session_start.desc&limit=50"
    );
}

#[test]
fn session_start_row_includes_optional_captures() {
    let row = session_start_row(
        "u-1",
        "2026-07-01T10:00:00.000Z",
        Some("203.0.113.9"),
        Some("Mozilla/5.0"),
    );
    assert_eq!(
        row,
        serde_json::json!({
            "user_id": "u-1",
            "session_start": "2026-07-01T10:00:00.000Z",
            "ip_address": "203.0.113.9",
            "user_agent": "Mozilla/5.0",
        })
    );
}

#[test]
fn session_start_row_nulls_disabled_captures() {
    let row = session_start_row("u-1", "2026-07-01T10:00:00.000Z", None, None);
    assert!(row.get("ip_address").expect("ip column").is_null());
    assert!(row.get("user_agent").expect("agent column").is_null());
}

// =============================================================
// Row handling
// =============================================================

#[test]
fn newest_open_session_id_is_none_without_rows() {
    assert_eq!(newest_open_session_id(&[]), None);
}

#[test]
fn newest_open_session_id_picks_first_row_only() {
    let rows = vec![
        serde_json::json!({ "id": "rec-newest" }),
        serde_json::json!({ "id": "rec-older" }),
    ];
    assert_eq!(newest_open_session_id(&rows), Some("rec-newest"));
}

#[test]
fn newest_open_session_id_ignores_malformed_row() {
    let rows = vec![serde_json::json!({ "no_id": true })];
    assert_eq!(newest_open_session_id(&rows), None);
}

#[test]
fn parse_ip_body_reads_ip_field() {
    assert_eq!(
        parse_ip_body(&serde_json::json!({ "ip": "203.0.113.9" })).as_deref(),
        Some("203.0.113.9")
    );
    assert_eq!(parse_ip_body(&serde_json::json!({ "ip": "" })), None);
    assert_eq!(parse_ip_body(&serde_json::json!({})), None);
}

#[test]
fn parse_history_rows_skips_malformed_rows() {
    let rows = vec![
        serde_json::json!({
            "id": "rec-1",
            "user_id": "u-1",
            "session_start": "2026-07-01T10:00:00.000Z",
            "session_end": "2026-07-01T11:30:00.000Z"
        }),
        serde_json::json!({ "id": "rec-2" }),
    ];
    let records = parse_history_rows(rows);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "rec-1");
    assert_eq!(records[0].session_end.as_deref(), Some("2026-07-01T11:30:00.000Z"));
}

// =============================================================
// End-session orchestration (native stub backend)
// =============================================================

#[cfg(not(feature = "csr"))]
mod native {
    use super::*;
    use crate::config::SupabaseConfig;
    use crate::net::supabase::take_journal;

    fn backend() -> SupabaseClient {
        SupabaseClient::new(&SupabaseConfig {
            url: "https://proj.supabase.co".to_owned(),
            anon_key: "anon-key".to_owned(),
        })
    }

    #[test]
    fn record_session_end_without_open_row_performs_no_update() {
        crate::config::reset();
        let backend = backend();
        let _ = take_journal();

        futures::executor::block_on(record_session_end(&backend, "u-1"));

        let journal = take_journal();
        assert_eq!(
            journal,
            vec!["rest.select:session_history?select=id&user_id=eq.u-1&session_end=is.null&order=session_start.desc&limit=1"]
        );
    }

    #[test]
    fn fetch_session_history_returns_empty_on_no_rows() {
        crate::config::reset();
        let backend = backend();
        let _ = take_journal();

        let records = futures::executor::block_on(fetch_session_history(&backend, "u-1"));
        assert!(records.is_empty());

        let journal = take_journal();
        assert_eq!(
            journal,
            vec!["rest.select:session_history?select=*&user_id=eq.u-1&order=session_start.desc&limit=50"]
        );
    }

    #[test]
    fn record_session_start_inserts_one_open_row() {
        crate::config::reset();
        let backend = backend();
        let _ = take_journal();

        futures::executor::block_on(record_session_start(&backend, "u-1"));

        let journal = take_journal();
        assert_eq!(journal.len(), 1);
        assert!(journal[0].starts_with("rest.insert:session_history:"));
        assert!(journal[0].contains("\"user_id\":\"u-1\""));
        assert!(journal[0].contains("\"session_start\""));
    }
}

use super::*;

fn record(session_end: Option<&str>) -> SessionRecord {
    SessionRecord {
        id: "rec-1".to_owned(),
        user_id: "u-1".to_owned(),
        session_start: "2026-07-01T10:00:00.000Z".to_owned(),
        session_end: session_end.map(str::to_owned),
        ip_address: None,
        user_agent: None,
        created_at: None,
    }
}

#[test]
fn open_row_reads_active() {
    assert_eq!(status_text(&record(None)), "Active");
}

#[test]
fn closed_row_reads_ended() {
    assert_eq!(status_text(&record(Some("2026-07-01T11:30:00.000Z"))), "Ended");
}

use super::*;

#[test]
fn empty_query_renders_bare_url() {
    let query = TableQuery::new();
    assert_eq!(query.query_string(), "");
    assert_eq!(
        rest_url("https://proj.supabase.co", "session_history", &query),
        "https://proj.supabase.co/rest/v1/session_history"
    );
}

#[test]
fn filters_render_in_insertion_order() {
    let query = TableQuery::new()
        .select("id")
        .eq("user_id", "u-1")
        .is_null("session_end")
        .order_desc("session_start")
        .limit(1);
    assert_eq!(
        query.query_string(),
        "select=id&user_id=eq.u-1&session_end=is.null&order=session_start.desc&limit=1"
    );
}

#[test]
fn rest_url_joins_query_and_trims_trailing_slash() {
    let query = TableQuery::new().eq("user_id", "u-1").limit(50);
    assert_eq!(
        rest_url("https://proj.supabase.co/", "session_history", &query),
        "https://proj.supabase.co/rest/v1/session_history?user_id=eq.u-1&limit=50"
    );
}

//! Session-history bookkeeping against the backend row store.
//!
//! SYSTEM CONTEXT
//! ==============
//! Invoked by the auth layer on sign-in/sign-out transitions and by page
//! teardown. Every operation here is best-effort: failures are logged and
//! swallowed so a tracking outage never degrades auth or navigation.

#[cfg(test)]
#[path = "tracking_test.rs"]
mod tracking_test;

use crate::config;
use crate::net::postgrest::TableQuery;
use crate::net::supabase::SupabaseClient;
use crate::net::types::SessionRecord;

/// Record a session start for `user_id`.
///
/// Resolves the public IP and captures the user agent when the respective
/// toggles are on, then inserts one open row (`session_end` absent). An IP
/// lookup failure yields a null IP, not an error.
pub async fn record_session_start(backend: &SupabaseClient, user_id: &str) {
    let tracking = config::get().session_tracking;

    let ip_address = if tracking.enable_ip_tracking {
        lookup_ip(&tracking.ip_service_url).await
    } else {
        None
    };
    let user_agent = if tracking.enable_user_agent_tracking {
        browser_user_agent()
    } else {
        None
    };

    let row = session_start_row(user_id, &now_iso(), ip_address.as_deref(), user_agent.as_deref());
    if let Err(error) = backend.insert_row(&tracking.table_name, &row).await {
        log::error!("failed to record session start: {error}");
    }
}

/// Close the newest open session row for `user_id`, if any.
///
/// Silent no-op when no open row exists (tracking disabled at start time,
/// or the row was already closed). When several rows are open, only the
/// newest by `session_start` is closed; the rest are accepted drift.
pub async fn record_session_end(backend: &SupabaseClient, user_id: &str) {
    let tracking = config::get().session_tracking;

    let rows = match backend.select_rows(&tracking.table_name, &open_session_query(user_id)).await {
        Ok(rows) => rows,
        Err(error) => {
            log::error!("failed to look up open session: {error}");
            return;
        }
    };
    let Some(id) = newest_open_session_id(&rows) else {
        return;
    };

    let patch = serde_json::json!({ "session_end": now_iso() });
    if let Err(error) = backend.update_row_by_id(&tracking.table_name, id, &patch).await {
        log::error!("failed to record session end: {error}");
    }
}

/// Fetch the user's session rows, newest first, capped at the configured
/// limit. Returns an empty list on error.
pub async fn fetch_session_history(backend: &SupabaseClient, user_id: &str) -> Vec<SessionRecord> {
    let tracking = config::get().session_tracking;

    match backend
        .select_rows(&tracking.table_name, &history_query(user_id, tracking.max_history_limit))
        .await
    {
        Ok(rows) => parse_history_rows(rows),
        Err(error) => {
            log::error!("failed to fetch session history: {error}");
            Vec::new()
        }
    }
}

/// Newest open row for a user: `session_end` absent, newest `session_start`.
pub(crate) fn open_session_query(user_id: &str) -> TableQuery {
    TableQuery::new()
        .select("id")
        .eq("user_id", user_id)
        .is_null("session_end")
        .order_desc("session_start")
        .limit(1)
}

/// All of a user's rows, newest first, capped.
pub(crate) fn history_query(user_id: &str, limit: usize) -> TableQuery {
    TableQuery::new()
        .select("*")
        .eq("user_id", user_id)
        .order_desc("session_start")
        .limit(limit)
}

/// The insert payload for a new open session row.
pub(crate) fn session_start_row(
    user_id: &str,
    started_at: &str,
    ip_address: Option<&str>,
    user_agent: Option<&str>,
) -> serde_json::Value {
    serde_json::json!({
        "user_id": user_id,
        "session_start": started_at,
        "ip_address": ip_address,
        "user_agent": user_agent,
    })
}

/// Id of the single newest open row, if any.
pub(crate) fn newest_open_session_id(rows: &[serde_json::Value]) -> Option<&str> {
    rows.first()?.get("id")?.as_str()
}

/// Pull the `ip` field out of the lookup service's JSON body.
pub(crate) fn parse_ip_body(body: &serde_json::Value) -> Option<String> {
    body.get("ip")
        .and_then(|value| value.as_str())
        .filter(|ip| !ip.is_empty())
        .map(str::to_owned)
}

/// Deserialize history rows, skipping malformed ones.
pub(crate) fn parse_history_rows(rows: Vec<serde_json::Value>) -> Vec<SessionRecord> {
    rows.into_iter()
        .filter_map(|row| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(error) => {
                log::warn!("skipping malformed session row: {error}");
                None
            }
        })
        .collect()
}

/// Resolve the caller's public IP via the configured lookup URL.
async fn lookup_ip(url: &str) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        let response = match gloo_net::http::Request::get(url).send().await {
            Ok(response) => response,
            Err(error) => {
                log::error!("ip lookup failed: {error}");
                return None;
            }
        };
        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                log::error!("ip lookup returned an unreadable body: {error}");
                return None;
            }
        };
        parse_ip_body(&body)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = url;
        None
    }
}

/// The browser's user-agent string, when available and non-empty.
fn browser_user_agent() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        web_sys::window()?
            .navigator()
            .user_agent()
            .ok()
            .filter(|agent| !agent.is_empty())
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Current wall-clock time as an ISO-8601 string.
fn now_iso() -> String {
    #[cfg(feature = "csr")]
    {
        js_sys::Date::new_0().to_iso_string().into()
    }
    #[cfg(not(feature = "csr"))]
    {
        "1970-01-01T00:00:00.000Z".to_owned()
    }
}

//! Formatting helpers for the session-history list.
//!
//! Durations are computed from millisecond differences and rendered as the
//! most significant non-zero unit pair (`2d 3h`, `1h 30m`, `45m`).
//! Timestamp parsing/locale formatting needs the browser's `Date`; native
//! builds fall back to the raw string so tests can target the pure parts.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Render a millisecond duration as its two most significant units.
pub fn format_duration(duration_ms: i64) -> String {
    let minutes = duration_ms / 60_000;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{days}d {}h", hours % 24)
    } else if hours > 0 {
        format!("{hours}h {}m", minutes % 60)
    } else {
        format!("{}m", minutes.max(0))
    }
}

/// Duration label for one session row: `Active` while the session is open,
/// otherwise the formatted start→end difference. An unparseable timestamp
/// yields an empty label rather than a bogus number.
pub fn duration_text(session_start: &str, session_end: Option<&str>) -> String {
    let Some(session_end) = session_end else {
        return "Active".to_owned();
    };
    match (parse_ms(session_start), parse_ms(session_end)) {
        #[allow(clippy::cast_possible_truncation)]
        (Some(start), Some(end)) => format_duration((end - start) as i64),
        _ => String::new(),
    }
}

/// Parse an ISO-8601 timestamp to epoch milliseconds.
pub fn parse_ms(timestamp: &str) -> Option<f64> {
    #[cfg(feature = "csr")]
    {
        let parsed = js_sys::Date::parse(timestamp);
        if parsed.is_nan() { None } else { Some(parsed) }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = timestamp;
        None
    }
}

/// Locale-formatted timestamp for display; the raw string outside the
/// browser.
pub fn format_timestamp(timestamp: &str) -> String {
    #[cfg(feature = "csr")]
    {
        let date = js_sys::Date::new(&wasm_bindgen::JsValue::from_str(timestamp));
        if date.get_time().is_nan() {
            return timestamp.to_owned();
        }
        String::from(date.to_locale_string("en-US", &wasm_bindgen::JsValue::UNDEFINED))
    }
    #[cfg(not(feature = "csr"))]
    {
        timestamp.to_owned()
    }
}

/// Coarse browser family derived from a user-agent string.
pub fn browser_label(user_agent: Option<&str>) -> &'static str {
    let Some(user_agent) = user_agent else {
        return "Unknown";
    };
    if user_agent.contains("Chrome") {
        "Chrome"
    } else if user_agent.contains("Firefox") {
        "Firefox"
    } else if user_agent.contains("Safari") {
        "Safari"
    } else if user_agent.contains("Edge") {
        "Edge"
    } else {
        "Other"
    }
}

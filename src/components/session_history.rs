//! Session-history list for the dashboard.
//!
//! Renders the mirrored rows newest first with a status indicator, a
//! duration label, formatted timestamps, the browser family, and the IP
//! when recorded.

#[cfg(test)]
#[path = "session_history_test.rs"]
mod session_history_test;

use leptos::prelude::*;

use crate::app::AuthContext;
use crate::net::types::SessionRecord;
use crate::util::format::{browser_label, duration_text, format_timestamp};

/// Status label for one row: open rows are `Active`.
pub(crate) fn status_text(record: &SessionRecord) -> &'static str {
    if record.session_end.is_some() { "Ended" } else { "Active" }
}

#[component]
pub fn SessionHistoryList() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state();

    view! {
        <div class="session-history">
            <Show
                when=move || !state.get().loading_history
                fallback=|| view! { <p class="session-history__loading">"Loading session history..."</p> }
            >
                <Show
                    when=move || !state.get().history.is_empty()
                    fallback=|| view! { <p class="session-history__empty">"No session history available"</p> }
                >
                    <h2 class="session-history__title">"Session History"</h2>
                    <ul class="session-history__list">
                        {move || {
                            state
                                .get()
                                .history
                                .into_iter()
                                .map(|record| view! { <SessionHistoryItem record=record/> })
                                .collect::<Vec<_>>()
                        }}
                    </ul>
                </Show>
            </Show>
        </div>
    }
}

#[component]
fn SessionHistoryItem(record: SessionRecord) -> impl IntoView {
    let status = status_text(&record);
    let indicator_class = if record.session_end.is_some() {
        "session-item__indicator session-item__indicator--inactive"
    } else {
        "session-item__indicator session-item__indicator--active"
    };
    let duration = duration_text(&record.session_start, record.session_end.as_deref());
    let started = format_timestamp(&record.session_start);
    let ended = record.session_end.as_deref().map(format_timestamp);
    let browser = browser_label(record.user_agent.as_deref());

    view! {
        <li class="session-item">
            <div class="session-item__header">
                <span class=indicator_class></span>
                <span class="session-item__status">{status}</span>
                <span class="session-item__duration">{duration}</span>
            </div>
            <div class="session-item__details">
                <div class="session-item__row">
                    <span class="session-item__label">"Started:"</span>
                    <span class="session-item__value">{started}</span>
                </div>
                {ended
                    .map(|ended| {
                        view! {
                            <div class="session-item__row">
                                <span class="session-item__label">"Ended:"</span>
                                <span class="session-item__value">{ended}</span>
                            </div>
                        }
                    })}
                <div class="session-item__row">
                    <span class="session-item__label">"Browser:"</span>
                    <span class="session-item__value">{browser}</span>
                </div>
                {record
                    .ip_address
                    .clone()
                    .map(|ip_address| {
                        view! {
                            <div class="session-item__row">
                                <span class="session-item__label">"IP Address:"</span>
                                <span class="session-item__value">{ip_address}</span>
                            </div>
                        }
                    })}
            </div>
        </li>
    }
}

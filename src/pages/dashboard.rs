//! Dashboard page: the authenticated landing route.
//!
//! SYSTEM CONTEXT
//! ==============
//! Reached only through the route guard, so a user is normally present;
//! rendering still degrades to placeholders if state is cleared mid-view.

use leptos::prelude::*;

use crate::app::AuthContext;
use crate::components::session_history::SessionHistoryList;
use crate::config;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state();

    let dashboard_title = config::get().ui.dashboard_title;

    let display_name = move || {
        state
            .get()
            .user
            .map(|user| user.display_name().to_owned())
            .unwrap_or_else(|| "User".to_owned())
    };
    let email = move || state.get().user.and_then(|user| user.email).unwrap_or_default();
    let avatar_url = move || state.get().user.and_then(|user| user.avatar_url);

    let on_sign_out = move |_ev: leptos::ev::MouseEvent| {
        #[cfg(feature = "csr")]
        {
            let auth = auth.clone();
            leptos::task::spawn_local(async move {
                auth.sign_out().await;
            });
        }
    };

    view! {
        <div class="dashboard-page">
            <header class="dashboard-page__header">
                <h1 class="dashboard-page__title">{dashboard_title}</h1>
                <div class="dashboard-page__user">
                    {move || {
                        avatar_url()
                            .map(|url| {
                                view! { <img class="dashboard-page__avatar" src=url alt="Profile"/> }
                            })
                    }}
                    <div class="dashboard-page__identity">
                        <span class="dashboard-page__name">{display_name}</span>
                        <span class="dashboard-page__email">{email}</span>
                    </div>
                    <button class="dashboard-page__sign-out" on:click=on_sign_out>
                        "Sign Out"
                    </button>
                </div>
            </header>

            <main class="dashboard-page__main">
                <SessionHistoryList/>
            </main>
        </div>
    }
}

//! Login page offering the configured OAuth provider.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::app::AuthContext;
use crate::config;

/// Message shown when the OAuth flow could not be started.
pub(crate) fn sign_in_failed_message(provider_label: &str, error: &str) -> String {
    format!("Sign-in with {provider_label} failed: {error}")
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let busy = RwSignal::new(false);
    let message = RwSignal::new(String::new());

    let config = config::get();
    let login_title = config.ui.login_title;
    let login_subtitle = config.ui.login_subtitle;
    let provider_label = config.auth.provider.label();

    let on_sign_in = move |_ev: leptos::ev::MouseEvent| {
        if busy.get() {
            return;
        }
        busy.set(true);
        message.set(String::new());

        #[cfg(feature = "csr")]
        {
            let auth = auth.clone();
            leptos::task::spawn_local(async move {
                if let Err(error) = auth.sign_in().await {
                    message.set(sign_in_failed_message(provider_label, &error));
                    busy.set(false);
                }
                // On success the browser is already navigating to the provider.
            });
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = &auth;
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>{login_title}</h1>
                <p class="login-card__subtitle">{login_subtitle}</p>
                <button class="login-button" disabled=move || busy.get() on:click=on_sign_in>
                    {format!("Sign in with {provider_label}")}
                </button>
                <Show when=move || !message.get().is_empty()>
                    <p class="login-message">{move || message.get()}</p>
                </Show>
            </div>
        </div>
    }
}

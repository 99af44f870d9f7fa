//! OAuth callback landing: resolves the session and routes onward.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use leptos::prelude::*;

use crate::config::RouteConfig;
use crate::net::types::Session;

/// Where the callback ends up: dashboard with a session, login without one,
/// and login again on any error (fail closed).
pub(crate) fn callback_destination(
    result: Result<Option<Session>, String>,
    routes: &RouteConfig,
) -> String {
    match result {
        Ok(Some(_)) => routes.dashboard.clone(),
        Ok(None) => routes.login.clone(),
        Err(error) => {
            log::error!("auth callback session check failed: {error}");
            routes.login.clone()
        }
    }
}

#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    #[cfg(feature = "csr")]
    {
        let backend = expect_context::<crate::net::supabase::SupabaseClient>();
        let navigate = leptos_router::hooks::use_navigate();
        leptos::task::spawn_local(async move {
            let routes = crate::config::get().routes;
            let destination = callback_destination(backend.get_session().await, &routes);
            navigate(&destination, leptos_router::NavigateOptions::default());
        });
    }

    view! {
        <div class="auth-callback">
            <div class="auth-callback__spinner"></div>
            <p>"Completing sign in..."</p>
        </div>
    }
}

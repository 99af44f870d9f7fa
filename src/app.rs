//! Root application component, routing, and the auth context.
//!
//! ARCHITECTURE
//! ============
//! `AuthProvider` owns the backend client handle and the reactive auth
//! state, wires the backend's auth-event stream into the session-tracking
//! layer, and provides both as contexts. Route components below it consume
//! `AuthContext` for sign-in/sign-out and guarded rendering.
//!
//! Tracking dispatch is fire-and-forget except inside `sign_out`, which
//! awaits the session close so the row update still runs under the
//! outgoing user's session. Teardown-time closes (page unload, unmount)
//! are best-effort network calls racing the page's death and may be lost.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use leptos::prelude::*;
use leptos_meta::{Title, provide_meta_context};
use leptos_router::StaticSegment;
use leptos_router::components::{Route, Router, Routes};

use crate::components::protected_route::ProtectedRoute;
use crate::config::{self, AppConfig};
use crate::net::supabase::SupabaseClient;
use crate::net::tracking;
use crate::pages::callback::AuthCallbackPage;
use crate::pages::dashboard::DashboardPage;
use crate::pages::login::LoginPage;
use crate::state::auth::{AuthState, TrackingAction};

#[cfg(feature = "csr")]
use wasm_bindgen::JsCast;
#[cfg(feature = "csr")]
use wasm_bindgen::closure::Closure;

/// Auth operations and state, provided via context by [`AuthProvider`].
#[derive(Clone)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    backend: SupabaseClient,
}

impl AuthContext {
    pub fn new(backend: SupabaseClient) -> Self {
        Self {
            state: RwSignal::new(AuthState::default()),
            backend,
        }
    }

    /// The reactive auth state signal.
    pub fn state(&self) -> RwSignal<AuthState> {
        self.state
    }

    pub fn backend(&self) -> &SupabaseClient {
        &self.backend
    }

    /// Apply one auth-stream event (or the initial resolution) and dispatch
    /// the tracking work it implies.
    pub fn handle_auth_change(&self, session: Option<crate::net::types::Session>) {
        let mut actions = Vec::new();
        self.state.update(|state| actions = state.apply_auth_change(session));
        self.dispatch(actions);
    }

    /// Start the OAuth flow. The error propagates so the login view can
    /// surface it.
    pub async fn sign_in(&self) -> Result<(), String> {
        let config = config::get();
        let redirect_to = sign_in_redirect(&config, current_origin().as_deref());
        self.backend
            .sign_in_with_oauth(config.auth.provider, &redirect_to)
            .await
            .map_err(|error| {
                log::error!("sign-in with {} failed: {error}", config.auth.provider.as_str());
                error
            })
    }

    /// Close the current user's open session row, then sign out of the
    /// backend. The close is awaited first so it still runs under the
    /// outgoing session.
    pub async fn sign_out(&self) {
        let user_id = self.state.get_untracked().user.map(|user| user.id);
        close_then_sign_out(&self.backend, user_id.as_deref()).await;
    }

    fn dispatch(&self, actions: Vec<TrackingAction>) {
        #[cfg(feature = "csr")]
        for action in actions {
            match action {
                TrackingAction::StartSession(user_id) => {
                    let backend = self.backend.clone();
                    leptos::task::spawn_local(async move {
                        tracking::record_session_start(&backend, &user_id).await;
                    });
                }
                TrackingAction::FetchHistory(user_id) => {
                    let backend = self.backend.clone();
                    let state = self.state;
                    leptos::task::spawn_local(async move {
                        state.update(|state| state.loading_history = true);
                        let records = tracking::fetch_session_history(&backend, &user_id).await;
                        state.update(|state| {
                            state.history = records;
                            state.loading_history = false;
                        });
                    });
                }
                TrackingAction::EndSession(user_id) => {
                    let backend = self.backend.clone();
                    leptos::task::spawn_local(async move {
                        tracking::record_session_end(&backend, &user_id).await;
                    });
                }
            }
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = actions;
        }
    }
}

/// Await the session close for `user_id` (when present), then the backend
/// sign-out. Ordering matters: the row update must use the still-valid
/// session before the resulting auth event clears it.
pub(crate) async fn close_then_sign_out(backend: &SupabaseClient, user_id: Option<&str>) {
    if let Some(user_id) = user_id {
        tracking::record_session_end(backend, user_id).await;
    }
    if let Err(error) = backend.sign_out().await {
        log::error!("sign-out request failed: {error}");
    }
}

/// Redirect URL for the OAuth flow: the configured override, or the current
/// origin joined with the callback route.
pub(crate) fn sign_in_redirect(config: &AppConfig, origin: Option<&str>) -> String {
    if let Some(redirect_to) = &config.auth.redirect_to {
        return redirect_to.clone();
    }
    format!("{}{}", origin.unwrap_or_default(), config.routes.auth_callback)
}

fn current_origin() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Owns the backend client and auth state; resolves the initial session,
/// subscribes to the auth-event stream, and best-effort closes the session
/// on unmount and page teardown.
#[component]
pub fn AuthProvider(children: Children) -> impl IntoView {
    let backend = SupabaseClient::from_config();
    let auth = AuthContext::new(backend.clone());
    provide_context(backend.clone());
    provide_context(auth.clone());

    #[cfg(feature = "csr")]
    {
        // Initial session resolution; a failed lookup resolves to signed-out.
        let context = auth.clone();
        leptos::task::spawn_local(async move {
            match context.backend().get_session().await {
                Ok(session) => context.handle_auth_change(session),
                Err(error) => {
                    log::error!("initial session lookup failed: {error}");
                    context.handle_auth_change(None);
                }
            }
        });

        let context = auth.clone();
        let subscription = backend.on_auth_state_change(move |_event, session| {
            context.handle_auth_change(session);
        });

        // Best-effort close racing page teardown.
        let state = auth.state();
        let unload_backend = backend.clone();
        let unload: Closure<dyn FnMut(web_sys::Event)> = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Some(user) = state.get_untracked().user {
                let backend = unload_backend.clone();
                leptos::task::spawn_local(async move {
                    tracking::record_session_end(&backend, &user.id).await;
                });
            }
        }));
        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("beforeunload", unload.as_ref().unchecked_ref());
        }

        let state = auth.state();
        let cleanup_backend = backend.clone();
        on_cleanup(move || {
            subscription.unsubscribe();
            if let Some(window) = web_sys::window() {
                let _ = window.remove_event_listener_with_callback(
                    "beforeunload",
                    unload.as_ref().unchecked_ref(),
                );
            }
            if let Some(user) = state.get_untracked().user {
                let backend = cleanup_backend.clone();
                leptos::task::spawn_local(async move {
                    tracking::record_session_end(&backend, &user.id).await;
                });
            }
        });
    }

    children()
}

/// Root application component: contexts plus client-side routing.
///
/// The route table is registered at the default paths; navigation targets
/// (guard redirects, callback routing, the sign-in redirect URL) always
/// follow the current `routes` configuration.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let app_name = config::get().ui.app_name;

    view! {
        <Title text=app_name/>

        <AuthProvider>
            <Router>
                <Routes fallback=|| "Page not found.".into_view()>
                    <Route path=StaticSegment("login") view=LoginPage/>
                    <Route
                        path=(StaticSegment("auth"), StaticSegment("callback"))
                        view=AuthCallbackPage
                    />
                    <Route
                        path=StaticSegment("dashboard")
                        view=|| {
                            view! {
                                <ProtectedRoute>
                                    <DashboardPage/>
                                </ProtectedRoute>
                            }
                        }
                    />
                    <Route path=StaticSegment("") view=HomeRedirect/>
                </Routes>
            </Router>
        </AuthProvider>
    }
}

/// The home route immediately forwards to the configured dashboard route.
#[component]
fn HomeRedirect() -> impl IntoView {
    let navigate = leptos_router::hooks::use_navigate();
    Effect::new(move || {
        let dashboard = config::get().routes.dashboard;
        navigate(
            &dashboard,
            leptos_router::NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    });

    view! { <div class="home-redirect"></div> }
}

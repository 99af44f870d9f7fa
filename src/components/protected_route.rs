//! Route guard rendering children only for authenticated users.
//!
//! A pure function of auth state: while resolving it shows a placeholder,
//! once resolved without a user it redirects to the login route, otherwise
//! it renders its children. No state of its own.

use leptos::prelude::*;

use crate::app::AuthContext;
use crate::config;
use crate::util::auth::install_unauth_redirect;

#[component]
pub fn ProtectedRoute(
    children: ChildrenFn,
    /// Overrides the configured login route as the redirect target.
    #[prop(optional)]
    redirect_to: Option<String>,
) -> impl IntoView {
    let auth = expect_context::<AuthContext>();
    let state = auth.state();
    let login_route = redirect_to.unwrap_or_else(|| config::get().routes.login);
    let navigate = leptos_router::hooks::use_navigate();
    install_unauth_redirect(state, login_route, navigate);

    view! {
        <Show
            when=move || !state.get().loading && state.get().user.is_some()
            fallback=move || {
                view! {
                    <div class="route-guard">
                        <p>
                            {move || {
                                if state.get().loading { "Loading..." } else { "Redirecting to login..." }
                            }}
                        </p>
                    </div>
                }
            }
        >
            {children()}
        </Show>
    }
}

//! Process-wide application configuration.
//!
//! DESIGN
//! ======
//! A single mutable settings record read by every other module. `set` merges
//! a partial override section by section so callers can tweak one field
//! without restating its siblings; `reset` restores the compiled-in
//! defaults. The store is a `thread_local!` cell — the app is
//! single-threaded in the browser, and test threads get isolated copies.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::cell::RefCell;

/// Backend endpoint and credential settings.
///
/// Blank values are tolerated; the backend client logs a warning rather
/// than failing construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

/// Client-side route paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteConfig {
    pub login: String,
    pub dashboard: String,
    pub auth_callback: String,
    pub home: String,
}

/// Session-tracking toggles and limits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionTrackingConfig {
    /// Backend table holding session rows.
    pub table_name: String,
    /// GET endpoint returning a JSON body with an `ip` field.
    pub ip_service_url: String,
    /// Cap on rows fetched for the history view.
    pub max_history_limit: usize,
    pub enable_ip_tracking: bool,
    pub enable_user_agent_tracking: bool,
}

/// User-facing text strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiConfig {
    pub app_name: String,
    pub login_title: String,
    pub login_subtitle: String,
    pub dashboard_title: String,
}

/// OAuth provider selection and optional redirect override.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthConfig {
    pub provider: OAuthProvider,
    /// Overrides the redirect URL built from the current origin plus the
    /// callback route when set.
    pub redirect_to: Option<String>,
}

/// Supported OAuth providers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OAuthProvider {
    #[default]
    Google,
    Github,
    Facebook,
    Twitter,
}

impl OAuthProvider {
    /// Wire identifier sent to the backend authorize endpoint.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
            Self::Facebook => "facebook",
            Self::Twitter => "twitter",
        }
    }

    /// Display label for the sign-in button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Github => "GitHub",
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
        }
    }
}

/// Full application configuration; always fully populated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub supabase: SupabaseConfig,
    pub routes: RouteConfig,
    pub session_tracking: SessionTrackingConfig,
    pub ui: UiConfig,
    pub auth: AuthConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase: SupabaseConfig {
                url: option_env!("SESSIONDASH_SUPABASE_URL").unwrap_or("").to_owned(),
                anon_key: option_env!("SESSIONDASH_SUPABASE_ANON_KEY").unwrap_or("").to_owned(),
            },
            routes: RouteConfig {
                login: "/login".to_owned(),
                dashboard: "/dashboard".to_owned(),
                auth_callback: "/auth/callback".to_owned(),
                home: "/".to_owned(),
            },
            session_tracking: SessionTrackingConfig {
                table_name: "session_history".to_owned(),
                ip_service_url: "https://api.ipify.org?format=json".to_owned(),
                max_history_limit: 50,
                enable_ip_tracking: true,
                enable_user_agent_tracking: true,
            },
            ui: UiConfig {
                app_name: "BD Project".to_owned(),
                login_title: "Welcome".to_owned(),
                login_subtitle: "Sign in to continue".to_owned(),
                dashboard_title: "Dashboard".to_owned(),
            },
            auth: AuthConfig {
                provider: OAuthProvider::Google,
                redirect_to: None,
            },
        }
    }
}

/// Partial override for [`SupabaseConfig`].
#[derive(Clone, Debug, Default)]
pub struct SupabasePatch {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

/// Partial override for [`RouteConfig`].
#[derive(Clone, Debug, Default)]
pub struct RoutesPatch {
    pub login: Option<String>,
    pub dashboard: Option<String>,
    pub auth_callback: Option<String>,
    pub home: Option<String>,
}

/// Partial override for [`SessionTrackingConfig`].
#[derive(Clone, Debug, Default)]
pub struct SessionTrackingPatch {
    pub table_name: Option<String>,
    pub ip_service_url: Option<String>,
    pub max_history_limit: Option<usize>,
    pub enable_ip_tracking: Option<bool>,
    pub enable_user_agent_tracking: Option<bool>,
}

/// Partial override for [`UiConfig`].
#[derive(Clone, Debug, Default)]
pub struct UiPatch {
    pub app_name: Option<String>,
    pub login_title: Option<String>,
    pub login_subtitle: Option<String>,
    pub dashboard_title: Option<String>,
}

/// Partial override for [`AuthConfig`].
#[derive(Clone, Debug, Default)]
pub struct AuthPatch {
    pub provider: Option<OAuthProvider>,
    pub redirect_to: Option<Option<String>>,
}

/// Partial configuration override; absent sections are left untouched.
#[derive(Clone, Debug, Default)]
pub struct ConfigPatch {
    pub supabase: Option<SupabasePatch>,
    pub routes: Option<RoutesPatch>,
    pub session_tracking: Option<SessionTrackingPatch>,
    pub ui: Option<UiPatch>,
    pub auth: Option<AuthPatch>,
}

impl SupabaseConfig {
    fn apply(&mut self, patch: SupabasePatch) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(anon_key) = patch.anon_key {
            self.anon_key = anon_key;
        }
    }
}

impl RouteConfig {
    fn apply(&mut self, patch: RoutesPatch) {
        if let Some(login) = patch.login {
            self.login = login;
        }
        if let Some(dashboard) = patch.dashboard {
            self.dashboard = dashboard;
        }
        if let Some(auth_callback) = patch.auth_callback {
            self.auth_callback = auth_callback;
        }
        if let Some(home) = patch.home {
            self.home = home;
        }
    }
}

impl SessionTrackingConfig {
    fn apply(&mut self, patch: SessionTrackingPatch) {
        if let Some(table_name) = patch.table_name {
            self.table_name = table_name;
        }
        if let Some(ip_service_url) = patch.ip_service_url {
            self.ip_service_url = ip_service_url;
        }
        if let Some(max_history_limit) = patch.max_history_limit {
            self.max_history_limit = max_history_limit;
        }
        if let Some(enable_ip_tracking) = patch.enable_ip_tracking {
            self.enable_ip_tracking = enable_ip_tracking;
        }
        if let Some(enable_user_agent_tracking) = patch.enable_user_agent_tracking {
            self.enable_user_agent_tracking = enable_user_agent_tracking;
        }
    }
}

impl UiConfig {
    fn apply(&mut self, patch: UiPatch) {
        if let Some(app_name) = patch.app_name {
            self.app_name = app_name;
        }
        if let Some(login_title) = patch.login_title {
            self.login_title = login_title;
        }
        if let Some(login_subtitle) = patch.login_subtitle {
            self.login_subtitle = login_subtitle;
        }
        if let Some(dashboard_title) = patch.dashboard_title {
            self.dashboard_title = dashboard_title;
        }
    }
}

impl AuthConfig {
    fn apply(&mut self, patch: AuthPatch) {
        if let Some(provider) = patch.provider {
            self.provider = provider;
        }
        if let Some(redirect_to) = patch.redirect_to {
            self.redirect_to = redirect_to;
        }
    }
}

thread_local! {
    static CONFIG: RefCell<AppConfig> = RefCell::new(AppConfig::default());
}

/// Return the current full configuration.
pub fn get() -> AppConfig {
    CONFIG.with(|config| config.borrow().clone())
}

/// Merge a partial override into the current configuration.
///
/// Each section present in the patch is merged field-wise over the existing
/// section in one call; sections absent from the patch are untouched.
pub fn set(patch: ConfigPatch) {
    CONFIG.with(|config| {
        let mut config = config.borrow_mut();
        if let Some(supabase) = patch.supabase {
            config.supabase.apply(supabase);
        }
        if let Some(routes) = patch.routes {
            config.routes.apply(routes);
        }
        if let Some(session_tracking) = patch.session_tracking {
            config.session_tracking.apply(session_tracking);
        }
        if let Some(ui) = patch.ui {
            config.ui.apply(ui);
        }
        if let Some(auth) = patch.auth {
            config.auth.apply(auth);
        }
    });
}

/// Restore the compiled-in defaults.
pub fn reset() {
    CONFIG.with(|config| *config.borrow_mut() = AppConfig::default());
}

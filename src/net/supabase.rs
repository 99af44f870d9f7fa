//! Client handle for the hosted auth + row-storage backend.
//!
//! Owns the current session, the auth-event listener registry, session
//! persistence in `localStorage`, token extraction from the OAuth redirect
//! URL, and the token auto-refresh loop. Constructed once at app boot and
//! passed to consumers through Leptos context rather than a hidden global;
//! [`SupabaseClient::reset`] rebuilds it from current configuration for
//! test isolation and config changes.
//!
//! Browser-side (`csr`): real HTTP calls via `gloo-net`.
//! Native: stubs that record a call journal for orchestration tests.
//!
//! ERROR HANDLING
//! ==============
//! Row and logout calls return `Result<_, String>` and callers degrade;
//! only the OAuth sign-in error is meant to reach the UI.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "supabase_test.rs"]
mod supabase_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use uuid::Uuid;

use crate::config::{self, OAuthProvider, SupabaseConfig};
use crate::net::postgrest::TableQuery;
#[cfg(feature = "csr")]
use crate::net::postgrest::rest_url;
use crate::net::types::Session;
#[cfg(any(test, feature = "csr"))]
use crate::net::types::User;

#[cfg(feature = "csr")]
use wasm_bindgen::JsValue;

/// `localStorage` key holding the persisted session JSON.
#[cfg(feature = "csr")]
const STORAGE_KEY: &str = "sessiondash_auth";

/// Seconds before expiry at which the refresh loop renews the token.
#[cfg(feature = "csr")]
const REFRESH_MARGIN_SECS: f64 = 60.0;

/// Auth-stream event kinds; consumers mostly collapse these to
/// "has session" / "has no session".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

type Listener = Arc<dyn Fn(AuthEvent, Option<Session>) + Send + Sync>;

struct Inner {
    url: String,
    anon_key: String,
    session: Option<Session>,
    listeners: Vec<(Uuid, Listener)>,
    /// True while one caller is restoring/extracting a session; other
    /// `get_session` callers wait instead of racing the URL fragment.
    resolving: bool,
    /// Bumped whenever the session is replaced or cleared, cancelling any
    /// refresh task scheduled against an older value.
    refresh_epoch: u64,
}

impl Inner {
    fn from_settings(settings: &SupabaseConfig, refresh_epoch: u64) -> Self {
        Self {
            url: settings.url.trim_end_matches('/').to_owned(),
            anon_key: settings.anon_key.clone(),
            session: None,
            listeners: Vec::new(),
            resolving: false,
            refresh_epoch,
        }
    }
}

/// Handle to an auth-event subscription; call [`AuthSubscription::unsubscribe`]
/// when the listener's owner goes away.
pub struct AuthSubscription {
    id: Uuid,
    inner: Weak<Mutex<Inner>>,
}

impl AuthSubscription {
    pub fn unsubscribe(self) {
        if let Some(inner) = self.inner.upgrade() {
            lock(&inner).listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

/// Cheap-clone client handle; all clones share one session and listener set.
#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<Mutex<Inner>>,
}

/// The app is single-threaded; a poisoned lock can only follow a panic that
/// already aborted the browser task, so keep the data.
fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SupabaseClient {
    /// Build a client from the current configuration.
    pub fn from_config() -> Self {
        Self::new(&config::get().supabase)
    }

    pub fn new(settings: &SupabaseConfig) -> Self {
        if settings.url.is_empty() || settings.anon_key.is_empty() {
            log::warn!(
                "missing backend credentials; set SESSIONDASH_SUPABASE_URL and SESSIONDASH_SUPABASE_ANON_KEY"
            );
        }
        Self {
            inner: Arc::new(Mutex::new(Inner::from_settings(settings, 0))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// Rebuild from the current configuration, dropping the session and all
    /// listeners. The handle itself stays valid.
    pub fn reset(&self) {
        let settings = config::get().supabase;
        let mut inner = self.lock();
        let epoch = inner.refresh_epoch + 1;
        *inner = Inner::from_settings(&settings, epoch);
    }

    /// Register a listener on the auth-event stream.
    pub fn on_auth_state_change(
        &self,
        listener: impl Fn(AuthEvent, Option<Session>) + Send + Sync + 'static,
    ) -> AuthSubscription {
        let id = Uuid::new_v4();
        self.lock().listeners.push((id, Arc::new(listener)));
        AuthSubscription {
            id,
            inner: Arc::downgrade(&self.inner),
        }
    }

    fn emit(&self, event: AuthEvent) {
        // Snapshot listeners first so a callback may (un)subscribe freely.
        let (listeners, session) = {
            let inner = self.lock();
            let listeners: Vec<Listener> =
                inner.listeners.iter().map(|(_, listener)| listener.clone()).collect();
            (listeners, inner.session.clone())
        };
        for listener in listeners {
            listener(event, session.clone());
        }
    }

    /// Return the current session, restoring a persisted one or extracting
    /// tokens from the OAuth redirect URL on first call.
    ///
    /// Concurrent callers (the provider's initial resolution and the OAuth
    /// callback page land here together) are serialized: whoever arrives
    /// while another caller is mid-extraction waits for that result instead
    /// of re-reading the already-stripped URL fragment.
    pub async fn get_session(&self) -> Result<Option<Session>, String> {
        #[cfg(feature = "csr")]
        {
            loop {
                {
                    let mut inner = self.lock();
                    if let Some(session) = inner.session.clone() {
                        return Ok(Some(session));
                    }
                    if !inner.resolving {
                        inner.resolving = true;
                        break;
                    }
                }
                gloo_timers::future::sleep(std::time::Duration::from_millis(25)).await;
            }

            let result = self.resolve_session().await;
            self.lock().resolving = false;
            result
        }
        #[cfg(not(feature = "csr"))]
        {
            journal("auth.get_session");
            Ok(self.lock().session.clone())
        }
    }

    /// One restore-or-extract attempt; runs with the `resolving` flag held.
    #[cfg(feature = "csr")]
    async fn resolve_session(&self) -> Result<Option<Session>, String> {
        if let Some(session) = restore_persisted_session() {
            self.lock().session = Some(session.clone());
            self.schedule_refresh();
            return Ok(Some(session));
        }

        let Some(tokens) = take_fragment_tokens() else {
            return Ok(None);
        };
        let user = self.fetch_user(&tokens.access_token).await?;
        let session = Session {
            access_token: tokens.access_token,
            refresh_token: tokens.refresh_token,
            expires_at: tokens.expires_in.map(|secs| now_epoch_secs() + secs),
            user,
        };
        persist_session(&session);
        self.lock().session = Some(session.clone());
        self.schedule_refresh();
        self.emit(AuthEvent::SignedIn);
        Ok(Some(session))
    }

    /// Start the OAuth flow by navigating the browser to the provider's
    /// authorize endpoint. This is the one operation whose error the caller
    /// must surface.
    pub async fn sign_in_with_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> Result<(), String> {
        #[cfg(feature = "csr")]
        {
            let url = {
                let inner = self.lock();
                authorize_url(&inner.url, provider, redirect_to)
            };
            let window = web_sys::window().ok_or_else(|| "no browser window".to_owned())?;
            window
                .location()
                .set_href(&url)
                .map_err(|_| "navigation to the sign-in provider failed".to_owned())
        }
        #[cfg(not(feature = "csr"))]
        {
            journal(format!("auth.sign_in:{}:{redirect_to}", provider.as_str()));
            Err("not available outside the browser".to_owned())
        }
    }

    /// Best-effort remote logout, then always clear the local session and
    /// emit `SignedOut`.
    pub async fn sign_out(&self) -> Result<(), String> {
        #[cfg(feature = "csr")]
        {
            let (url, anon_key, access_token) = {
                let inner = self.lock();
                (
                    inner.url.clone(),
                    inner.anon_key.clone(),
                    inner.session.as_ref().map(|session| session.access_token.clone()),
                )
            };
            if let Some(access_token) = access_token {
                let result = gloo_net::http::Request::post(&auth_logout_endpoint(&url))
                    .header("apikey", &anon_key)
                    .header("Authorization", &format!("Bearer {access_token}"))
                    .send()
                    .await;
                if let Err(error) = result {
                    // The local session is cleared regardless.
                    log::warn!("logout request failed: {error}");
                }
            }
            self.clear_session();
            self.emit(AuthEvent::SignedOut);
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            journal("auth.sign_out");
            {
                let mut inner = self.lock();
                inner.session = None;
                inner.refresh_epoch += 1;
            }
            self.emit(AuthEvent::SignedOut);
            Ok(())
        }
    }

    /// Select rows from `table` with the given filters.
    pub async fn select_rows(
        &self,
        table: &str,
        query: &TableQuery,
    ) -> Result<Vec<serde_json::Value>, String> {
        #[cfg(feature = "csr")]
        {
            let url = {
                let inner = self.lock();
                rest_url(&inner.url, table, query)
            };
            let response = gloo_net::http::Request::get(&url)
                .header("apikey", &self.anon_key())
                .header("Authorization", &format!("Bearer {}", self.bearer_token()))
                .send()
                .await
                .map_err(|error| error.to_string())?;
            if !response.ok() {
                return Err(row_request_failed_message("select", response.status()));
            }
            response
                .json::<Vec<serde_json::Value>>()
                .await
                .map_err(|error| error.to_string())
        }
        #[cfg(not(feature = "csr"))]
        {
            journal(format!("rest.select:{table}?{}", query.query_string()));
            Ok(Vec::new())
        }
    }

    /// Insert a single row into `table`.
    pub async fn insert_row(&self, table: &str, row: &serde_json::Value) -> Result<(), String> {
        #[cfg(feature = "csr")]
        {
            let url = {
                let inner = self.lock();
                rest_url(&inner.url, table, &TableQuery::new())
            };
            let response = gloo_net::http::Request::post(&url)
                .header("apikey", &self.anon_key())
                .header("Authorization", &format!("Bearer {}", self.bearer_token()))
                .header("Prefer", "return=minimal")
                .json(row)
                .map_err(|error| error.to_string())?
                .send()
                .await
                .map_err(|error| error.to_string())?;
            if !response.ok() {
                return Err(row_request_failed_message("insert", response.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            journal(format!("rest.insert:{table}:{row}"));
            Ok(())
        }
    }

    /// Patch the row in `table` whose `id` column matches `id`.
    pub async fn update_row_by_id(
        &self,
        table: &str,
        id: &str,
        patch: &serde_json::Value,
    ) -> Result<(), String> {
        #[cfg(feature = "csr")]
        {
            let url = {
                let inner = self.lock();
                rest_url(&inner.url, table, &TableQuery::new().eq("id", id))
            };
            let response = gloo_net::http::Request::patch(&url)
                .header("apikey", &self.anon_key())
                .header("Authorization", &format!("Bearer {}", self.bearer_token()))
                .header("Prefer", "return=minimal")
                .json(patch)
                .map_err(|error| error.to_string())?
                .send()
                .await
                .map_err(|error| error.to_string())?;
            if !response.ok() {
                return Err(row_request_failed_message("update", response.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            journal(format!("rest.update:{table}:{id}:{patch}"));
            Ok(())
        }
    }

    #[cfg(feature = "csr")]
    fn anon_key(&self) -> String {
        self.lock().anon_key.clone()
    }

    /// Session access token when signed in, anon key otherwise.
    #[cfg(feature = "csr")]
    fn bearer_token(&self) -> String {
        let inner = self.lock();
        inner
            .session
            .as_ref()
            .map(|session| session.access_token.clone())
            .unwrap_or_else(|| inner.anon_key.clone())
    }

    #[cfg(feature = "csr")]
    fn clear_session(&self) {
        {
            let mut inner = self.lock();
            inner.session = None;
            inner.refresh_epoch += 1;
        }
        remove_persisted_session();
    }

    /// Fetch the user record behind an access token.
    #[cfg(feature = "csr")]
    async fn fetch_user(&self, access_token: &str) -> Result<User, String> {
        let (url, anon_key) = {
            let inner = self.lock();
            (inner.url.clone(), inner.anon_key.clone())
        };
        let response = gloo_net::http::Request::get(&auth_user_endpoint(&url))
            .header("apikey", &anon_key)
            .header("Authorization", &format!("Bearer {access_token}"))
            .send()
            .await
            .map_err(|error| error.to_string())?;
        if !response.ok() {
            return Err(user_request_failed_message(response.status()));
        }
        let body: serde_json::Value = response.json().await.map_err(|error| error.to_string())?;
        parse_user(&body).ok_or_else(|| "malformed user payload".to_owned())
    }

    /// Spawn the auto-refresh task for the current session.
    ///
    /// The task sleeps until shortly before expiry, renews the token, emits
    /// `TokenRefreshed`, and loops. It exits when the epoch moves on (the
    /// session was replaced or cleared) or a renewal fails, in which case
    /// the session is dropped and `SignedOut` is emitted.
    #[cfg(feature = "csr")]
    fn schedule_refresh(&self) {
        let epoch = {
            let mut inner = self.lock();
            inner.refresh_epoch += 1;
            inner.refresh_epoch
        };
        let client = self.clone();
        leptos::task::spawn_local(async move {
            loop {
                let delay_secs = {
                    let inner = client.lock();
                    if inner.refresh_epoch != epoch {
                        return;
                    }
                    match inner.session.as_ref().and_then(|session| session.expires_at) {
                        Some(expires_at) => (expires_at - now_epoch_secs() - REFRESH_MARGIN_SECS).max(0.0),
                        // No expiry information: nothing to keep fresh.
                        None => return,
                    }
                };
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let delay_ms = (delay_secs * 1000.0) as u64;
                gloo_timers::future::sleep(std::time::Duration::from_millis(delay_ms)).await;
                if client.lock().refresh_epoch != epoch {
                    return;
                }
                if !client.refresh_session().await {
                    client.clear_session();
                    client.emit(AuthEvent::SignedOut);
                    return;
                }
                client.emit(AuthEvent::TokenRefreshed);
            }
        });
    }

    /// Renew the session via the refresh-token grant. Returns false when no
    /// refresh token is held or the request fails.
    #[cfg(feature = "csr")]
    async fn refresh_session(&self) -> bool {
        let (url, anon_key, refresh_token, user) = {
            let inner = self.lock();
            let Some(session) = inner.session.as_ref() else {
                return false;
            };
            let Some(refresh_token) = session.refresh_token.clone() else {
                return false;
            };
            (inner.url.clone(), inner.anon_key.clone(), refresh_token, session.user.clone())
        };

        let body = serde_json::json!({ "refresh_token": refresh_token });
        let request = match gloo_net::http::Request::post(&auth_refresh_endpoint(&url))
            .header("apikey", &anon_key)
            .json(&body)
        {
            Ok(request) => request,
            Err(error) => {
                log::error!("token refresh request build failed: {error}");
                return false;
            }
        };
        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                log::error!("token refresh request failed: {error}");
                return false;
            }
        };
        if !response.ok() {
            log::error!("token refresh rejected: {}", response.status());
            return false;
        }
        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(error) => {
                log::error!("token refresh payload unreadable: {error}");
                return false;
            }
        };

        let Some(access_token) = body.get("access_token").and_then(|value| value.as_str()) else {
            log::error!("token refresh payload missing access_token");
            return false;
        };
        let session = Session {
            access_token: access_token.to_owned(),
            refresh_token: body
                .get("refresh_token")
                .and_then(|value| value.as_str())
                .map(str::to_owned),
            expires_at: body
                .get("expires_in")
                .and_then(serde_json::Value::as_f64)
                .map(|secs| now_epoch_secs() + secs),
            user: body.get("user").and_then(parse_user).unwrap_or(user),
        };
        persist_session(&session);
        self.lock().session = Some(session);
        true
    }
}

/// Tokens extracted from the OAuth redirect URL fragment.
#[cfg(any(test, feature = "csr"))]
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FragmentTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<f64>,
}

/// Parse `#access_token=…&refresh_token=…&expires_in=…` from a URL fragment.
/// Returns `None` unless an access token is present.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn parse_token_fragment(fragment: &str) -> Option<FragmentTokens> {
    let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
    let mut access_token = None;
    let mut refresh_token = None;
    let mut expires_in = None;
    for pair in fragment.split('&') {
        let mut parts = pair.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some("access_token"), Some(value)) if !value.is_empty() => {
                access_token = Some(value.to_owned());
            }
            (Some("refresh_token"), Some(value)) if !value.is_empty() => {
                refresh_token = Some(value.to_owned());
            }
            (Some("expires_in"), Some(value)) => expires_in = value.parse().ok(),
            _ => {}
        }
    }
    access_token.map(|access_token| FragmentTokens {
        access_token,
        refresh_token,
        expires_in,
    })
}

/// Project a user out of the auth service's user payload.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn parse_user(body: &serde_json::Value) -> Option<User> {
    let id = body.get("id")?.as_str()?.to_owned();
    let metadata = body.get("user_metadata");
    let metadata_str = |key: &str| {
        metadata
            .and_then(|metadata| metadata.get(key))
            .and_then(|value| value.as_str())
            .map(str::to_owned)
    };
    Some(User {
        id,
        email: body.get("email").and_then(|value| value.as_str()).map(str::to_owned),
        full_name: metadata_str("full_name").or_else(|| metadata_str("name")),
        avatar_url: metadata_str("avatar_url"),
    })
}

/// Authorize endpoint with provider and encoded redirect target.
#[cfg(any(test, feature = "csr"))]
pub(crate) fn authorize_url(base: &str, provider: OAuthProvider, redirect_to: &str) -> String {
    format!(
        "{}/auth/v1/authorize?provider={}&redirect_to={}",
        base.trim_end_matches('/'),
        provider.as_str(),
        urlencoding::encode(redirect_to)
    )
}

#[cfg(feature = "csr")]
fn auth_user_endpoint(base: &str) -> String {
    format!("{}/auth/v1/user", base.trim_end_matches('/'))
}

#[cfg(feature = "csr")]
fn auth_logout_endpoint(base: &str) -> String {
    format!("{}/auth/v1/logout", base.trim_end_matches('/'))
}

#[cfg(feature = "csr")]
fn auth_refresh_endpoint(base: &str) -> String {
    format!("{}/auth/v1/token?grant_type=refresh_token", base.trim_end_matches('/'))
}

#[cfg(any(test, feature = "csr"))]
pub(crate) fn row_request_failed_message(operation: &str, status: u16) -> String {
    format!("row {operation} failed: {status}")
}

#[cfg(any(test, feature = "csr"))]
pub(crate) fn user_request_failed_message(status: u16) -> String {
    format!("user request failed: {status}")
}

#[cfg(feature = "csr")]
fn now_epoch_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

/// Read the redirect fragment tokens and strip them from the address bar.
#[cfg(feature = "csr")]
fn take_fragment_tokens() -> Option<FragmentTokens> {
    let window = web_sys::window()?;
    let location = window.location();
    let hash = location.hash().ok()?;
    let tokens = parse_token_fragment(&hash)?;
    let path = location.pathname().unwrap_or_default();
    let search = location.search().unwrap_or_default();
    if let Ok(history) = window.history() {
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&format!("{path}{search}")));
    }
    Some(tokens)
}

#[cfg(feature = "csr")]
fn persist_session(session: &Session) {
    let Ok(serialized) = serde_json::to_string(session) else {
        return;
    };
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(STORAGE_KEY, &serialized);
    }
}

#[cfg(feature = "csr")]
fn restore_persisted_session() -> Option<Session> {
    let storage = local_storage()?;
    let serialized = storage.get_item(STORAGE_KEY).ok()??;
    match serde_json::from_str(&serialized) {
        Ok(session) => Some(session),
        Err(error) => {
            log::warn!("dropping unreadable persisted session: {error}");
            let _ = storage.remove_item(STORAGE_KEY);
            None
        }
    }
}

#[cfg(feature = "csr")]
fn remove_persisted_session() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(STORAGE_KEY);
    }
}

#[cfg(feature = "csr")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

#[cfg(all(not(feature = "csr"), test))]
thread_local! {
    static CALL_JOURNAL: std::cell::RefCell<Vec<String>> = const { std::cell::RefCell::new(Vec::new()) };
}

#[cfg(all(not(feature = "csr"), test))]
fn journal(entry: impl Into<String>) {
    CALL_JOURNAL.with(|journal| journal.borrow_mut().push(entry.into()));
}

#[cfg(all(not(feature = "csr"), not(test)))]
fn journal(entry: impl Into<String>) {
    let _ = entry.into();
}

/// Drain the native call journal (test observability for call ordering).
#[cfg(all(not(feature = "csr"), test))]
pub(crate) fn take_journal() -> Vec<String> {
    CALL_JOURNAL.with(|journal| journal.borrow_mut().drain(..).collect())
}

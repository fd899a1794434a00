//! API client for communicating with the emotion-tracker REST API.
//!
//! This module provides the `ApiClient` struct, the single gateway every
//! screen uses to talk to the backend. It attaches the bearer token,
//! renews it once through the refresh endpoint when a request comes back
//! 401, and reports failures to the user through the injected `Notifier`.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::{
    Collaborator, CollaboratorSummary, Emotion, EmotionOverview, EmotionType, OrgUnitKind, Page,
    PageRequest, SubmitEmotion, UnitOverview,
};
use crate::notify::{Navigator, Notifier};

use super::request::{ApiRequest, RequestContext};
use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "auth/login/";
const CURRENT_USER_PATH: &str = "auth/me/";
const REFRESH_PATH: &str = "api/token/refresh/";
const EMOTIONS_PATH: &str = "emotions/";
const EMOTION_TYPES_PATH: &str = "emotions/emotion-types/";
const SUBMIT_PATH: &str = "emotions/submit/";
const TODAY_PATH: &str = "emotions/today/";
const OVERVIEW_PATH: &str = "emotion-overview/overview/";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
    #[serde(default)]
    user: Option<Collaborator>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
    #[serde(default)]
    refresh: Option<String>,
}

/// API client for the emotion tracker.
/// Clone is cheap - the HTTP client and injected capabilities are shared.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
    notifier: Arc<dyn Notifier>,
    navigator: Arc<dyn Navigator>,
}

impl ApiClient {
    /// Create a new API client against `config.base_url`
    pub fn new(
        config: &Config,
        session: Arc<dyn SessionStore>,
        notifier: Arc<dyn Notifier>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_root(),
            session,
            notifier,
            navigator,
        })
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    // ===== Request pipeline =====

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send one attempt, with the bearer token if a valid one is stored
    async fn dispatch(&self, req: &ApiRequest, ctx: RequestContext) -> Result<Response, ApiError> {
        let mut builder = self
            .client
            .request(req.method.clone(), self.url(&req.path))
            .header(header::ACCEPT, "application/json");

        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(ref body) = req.body {
            builder = builder.json(body);
        }
        if let Some(token) = self.session.access_token() {
            builder = builder.bearer_auth(token);
        }

        debug!(method = %req.method, path = %req.path, retried = ctx.retried(), "Sending request");
        let response = builder.send().await?;
        Self::check_response(response).await
    }

    /// Send a request, renewing the access token once on 401.
    ///
    /// - Success is returned as is.
    /// - A first 401 triggers one refresh; on success the request is replayed
    ///   once and that outcome is final. If the refresh fails the session is
    ///   cleared, the user is sent to the login screen and the original 401
    ///   is returned.
    /// - Every other failure is reported through the notifier and returned.
    ///
    /// Concurrent requests that hit 401 each refresh on their own; refreshes
    /// are not coalesced across sibling requests.
    pub async fn send(&self, req: &ApiRequest) -> Result<Response, ApiError> {
        let mut ctx = RequestContext::initial();
        loop {
            match self.dispatch(req, ctx).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_unauthorized() && !ctx.retried() => {
                    match self.refresh_access_token().await {
                        Ok(()) => {
                            info!(path = %req.path, "Access token refreshed, replaying request");
                            ctx = ctx.for_retry();
                        }
                        Err(refresh_err) => {
                            warn!(path = %req.path, error = %refresh_err, "Token refresh failed, ending session");
                            self.end_session();
                            return Err(err);
                        }
                    }
                }
                Err(err) => {
                    error!(path = %req.path, retried = ctx.retried(), error = %err, "Request failed");
                    self.report(&err);
                    return Err(err);
                }
            }
        }
    }

    /// Exchange the stored refresh token for a new access token
    async fn refresh_access_token(&self) -> Result<(), ApiError> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or_else(|| ApiError::RefreshFailed("no refresh token stored".to_string()))?;

        let response = self
            .client
            .post(self.url(REFRESH_PATH))
            .header(header::ACCEPT, "application/json")
            .json(&RefreshRequest { refresh: &refresh })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::RefreshFailed(format!(
                "refresh endpoint returned {}",
                response.status()
            )));
        }

        let body: RefreshResponse = response
            .json()
            .await
            .map_err(|e| ApiError::RefreshFailed(format!("unreadable refresh response: {}", e)))?;

        self.session
            .store_refreshed(&body.access, body.refresh.as_deref())
            .map_err(|e| ApiError::RefreshFailed(format!("could not persist token: {}", e)))?;
        Ok(())
    }

    fn end_session(&self) {
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.navigator.redirect_to_login();
    }

    fn report(&self, err: &ApiError) {
        self.notifier.error(&err.user_message());
    }

    async fn decode<T: DeserializeOwned>(&self, response: Response, path: &str) -> Result<T> {
        match response.json::<T>().await {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = ApiError::InvalidResponse(format!("{}: {}", path, e));
                error!(error = %err, "Failed to decode response");
                self.report(&err);
                Err(err.into())
            }
        }
    }

    // ===== Verbs =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = ApiRequest::get(path);
        let response = self.send(&req).await?;
        self.decode(response, path).await
    }

    pub async fn get_page<T: DeserializeOwned>(&self, path: &str, page: PageRequest) -> Result<Page<T>> {
        let req = ApiRequest::get(path).page(page);
        let response = self.send(&req).await?;
        self.decode(response, path).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        let req = ApiRequest::post(path, body);
        let response = self.send(&req).await?;
        self.decode(response, path).await
    }

    pub async fn get_bytes(&self, req: ApiRequest) -> Result<Vec<u8>> {
        let response = self.send(&req).await?;
        match response.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) => {
                let err = ApiError::from(e);
                self.report(&err);
                Err(err.into())
            }
        }
    }

    // ===== Authentication =====

    /// Log in, persist the token pair and return the user's profile
    pub async fn login(&self, username: &str, password: &str) -> Result<Collaborator> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .header(header::ACCEPT, "application/json")
            .json(&LoginRequest { username, password })
            .send()
            .await
            .map_err(ApiError::from)?;

        let response = Self::check_response(response).await?;
        let auth: LoginResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("login: {}", e)))?;

        self.session
            .store_login(&auth.access, &auth.refresh)
            .context("Failed to save session")?;
        info!(username = username, "Logged in");

        match auth.user {
            Some(user) => Ok(user),
            None => self.current_user().await,
        }
    }

    /// Forget the session locally
    pub fn logout(&self) -> Result<()> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    pub async fn current_user(&self) -> Result<Collaborator> {
        self.get(CURRENT_USER_PATH).await
    }

    // ===== Personal emotions =====

    pub async fn emotion_types(&self) -> Result<Vec<EmotionType>> {
        self.get(EMOTION_TYPES_PATH).await
    }

    pub async fn submit_emotion(&self, submission: &SubmitEmotion) -> Result<Emotion> {
        self.post(SUBMIT_PATH, submission).await
    }

    pub async fn today_emotions(&self) -> Result<Vec<Emotion>> {
        self.get(TODAY_PATH).await
    }

    pub async fn emotion_history(&self, page: PageRequest) -> Result<Page<Emotion>> {
        self.get_page(EMOTIONS_PATH, page).await
    }

    pub async fn emotion_overview(&self) -> Result<EmotionOverview> {
        self.get(OVERVIEW_PATH).await
    }

    // ===== Organizational roll-ups =====

    pub async fn unit_overviews(&self, kind: OrgUnitKind) -> Result<Vec<UnitOverview>> {
        self.get(&format!("{}/overview/", kind.endpoint())).await
    }

    pub async fn unit_collaborators(
        &self,
        kind: OrgUnitKind,
        page: PageRequest,
    ) -> Result<Page<CollaboratorSummary>> {
        self.get_page(&format!("{}/collaborators/", kind.endpoint()), page)
            .await
    }

    /// Download the PDF report for one unit
    pub async fn download_report(&self, kind: OrgUnitKind, unit_id: i64) -> Result<Vec<u8>> {
        let req = ApiRequest::get(format!("{}/report/", kind.endpoint())).query("unit", unit_id);
        let bytes = self.get_bytes(req).await?;
        debug!(kind = kind.label(), unit_id, size = bytes.len(), "Report downloaded");
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemorySessionStore;
    use crate::notify::{LoginRedirect, ToastQueue};

    fn client(base_url: &str) -> ApiClient {
        let config = Config {
            base_url: base_url.to_string(),
            ..Config::default()
        };
        ApiClient::new(
            &config,
            Arc::new(MemorySessionStore::new()),
            Arc::new(ToastQueue::default()),
            Arc::new(LoginRedirect::new()),
        )
        .expect("client")
    }

    #[test]
    fn test_url_join() {
        let api = client("https://mood.example.com/api/");
        assert_eq!(api.url("emotions/today/"), "https://mood.example.com/api/emotions/today/");
        assert_eq!(api.url("/auth/me/"), "https://mood.example.com/api/auth/me/");

        let api = client("http://localhost:8000");
        assert_eq!(api.url(REFRESH_PATH), "http://localhost:8000/api/token/refresh/");
    }

    #[test]
    fn test_parse_refresh_response() {
        let body: RefreshResponse = serde_json::from_str(r#"{"access": "a2"}"#).expect("parse");
        assert_eq!(body.access, "a2");
        assert!(body.refresh.is_none());

        let body: RefreshResponse =
            serde_json::from_str(r#"{"access": "a3", "refresh": "r3"}"#).expect("parse");
        assert_eq!(body.refresh.as_deref(), Some("r3"));
    }
}

//! The authenticated API client: bearer attachment, refresh-and-retry, and
//! terminal-failure teardown.

use crate::auth::domain::{AccessToken, ApiRequest, ApiResponse, Session, UserProfile};
use crate::auth::ports::{HttpTransport, Navigator, SessionStore, TransportError};
use crate::auth::services::refresh::{RefreshCoordinator, RefreshError, RefreshTicket};
use crate::auth::services::session::SessionHandle;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Generic user-facing fallback when the server supplies no message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Settle delay before navigating away after a forced teardown.
const REDIRECT_SETTLE_DELAY: Duration = Duration::from_millis(150);

/// Login form payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    /// Login email.
    pub email: String,
    /// Plain password, sent over the transport only.
    pub password: String,
}

/// Registration form payload.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plain password, sent over the transport only.
    pub password: String,
}

/// Errors surfaced by the authenticated client.
#[derive(Debug, Error)]
pub enum ApiClientError {
    /// The transport failed outright.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session expired and could not be refreshed.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// The server reported the account as deactivated or inactive.
    #[error("account deactivated: {0}")]
    AccountDeactivated(String),

    /// An authentication request was rejected.
    #[error("request rejected with status {status}: {message}")]
    Rejected {
        /// HTTP status of the rejection.
        status: u16,
        /// Server-supplied or fallback message.
        message: String,
    },

    /// A success response did not carry the expected payload.
    #[error("malformed response payload: {0}")]
    MalformedPayload(String),
}

/// Result type for client operations.
pub type ApiClientResult<T> = Result<T, ApiClientError>;

/// Issues API requests with bearer tokens attached, transparently recovering
/// from token expiry without losing caller-issued requests.
///
/// Guarantees:
///
/// - at most one refresh call is in flight process-wide; every concurrent
///   401 is served by that single refresh's outcome;
/// - a failed request is retried at most once, and only after a successful
///   refresh;
/// - 401s from auth endpoints and 401s received while no token was held are
///   returned to the caller unmodified;
/// - a 403 alone never tears the session down unless its payload indicates
///   account deactivation.
pub struct AuthenticatedClient<T, S, V>
where
    T: HttpTransport,
    S: SessionStore,
    V: Navigator + 'static,
{
    transport: Arc<T>,
    sessions: SessionHandle<S>,
    navigator: Arc<V>,
    refresh: RefreshCoordinator,
}

impl<T, S, V> AuthenticatedClient<T, S, V>
where
    T: HttpTransport,
    S: SessionStore,
    V: Navigator + 'static,
{
    /// Creates a client over the given transport, session state, and
    /// navigator.
    #[must_use]
    pub fn new(transport: Arc<T>, sessions: SessionHandle<S>, navigator: Arc<V>) -> Self {
        Self {
            transport,
            sessions,
            navigator,
            refresh: RefreshCoordinator::new(),
        }
    }

    /// Returns the shared session state.
    #[must_use]
    pub const fn sessions(&self) -> &SessionHandle<S> {
        &self.sessions
    }

    /// Issues a request with the held bearer token attached.
    ///
    /// Pass-through statuses (including expected 401s on unauthenticated
    /// paths and permission-denied 403s) come back as `Ok`; the caller
    /// extracts the error envelope as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Refresh`] when the session expired and the
    /// refresh failed, [`ApiClientError::AccountDeactivated`] on a
    /// deactivation 403, or [`ApiClientError::Transport`] on connection
    /// failure.
    pub async fn send(&self, request: ApiRequest) -> ApiClientResult<ApiResponse> {
        let bearer = self.sessions.access_token();
        let response = self.transport.execute(&request, bearer.as_ref()).await?;
        match response.status() {
            401 if request.is_auth_endpoint() => Ok(response),
            401 if bearer.is_none() => {
                // Expected unauthenticated access, not a session expiry.
                tracing::debug!(path = request.path(), "unauthenticated 401 passed through");
                Ok(response)
            }
            401 => self.recover_from_expiry(request).await,
            403 if response.indicates_deactivation() => {
                let message = response.error_message_or(GENERIC_ERROR_MESSAGE);
                tracing::warn!(path = request.path(), "account deactivated; tearing down session");
                self.force_logout();
                Err(ApiClientError::AccountDeactivated(message))
            }
            _ => Ok(response),
        }
    }

    /// Authenticates with credentials and establishes the session.
    ///
    /// A 401 here is a credential problem: it surfaces as
    /// [`ApiClientError::Rejected`] and never triggers a refresh or
    /// teardown.
    ///
    /// # Errors
    ///
    /// Returns [`ApiClientError::Rejected`] on a non-success status or
    /// [`ApiClientError::MalformedPayload`] when the success payload lacks
    /// the user or token.
    pub async fn login(&self, credentials: &LoginCredentials) -> ApiClientResult<Session> {
        self.authenticate("/auth/login", credentials).await
    }

    /// Registers a new account and establishes the session.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`AuthenticatedClient::login`].
    pub async fn register(&self, registration: &Registration) -> ApiClientResult<Session> {
        self.authenticate("/auth/register", registration).await
    }

    /// Invalidates the server-side refresh token (best effort) and tears
    /// the session down locally.
    pub async fn logout(&self) {
        if let Err(err) = self.send(ApiRequest::post("/auth/logout")).await {
            tracing::debug!(error = %err, "logout request failed; clearing session anyway");
        }
        self.sessions.clear();
    }

    async fn authenticate(
        &self,
        path: &str,
        payload: &impl Serialize,
    ) -> ApiClientResult<Session> {
        let body = serde_json::to_value(payload)
            .map_err(|err| ApiClientError::MalformedPayload(err.to_string()))?;
        let response = self.send(ApiRequest::post_json(path, body)).await?;
        if !response.is_success() {
            return Err(ApiClientError::Rejected {
                status: response.status(),
                message: response.error_message_or(GENERIC_ERROR_MESSAGE),
            });
        }
        let session = parse_session(&response)?;
        self.sessions.establish(session.clone());
        Ok(session)
    }

    /// Refresh-and-retry protocol for a 401 on a protected endpoint.
    async fn recover_from_expiry(&self, request: ApiRequest) -> ApiClientResult<ApiResponse> {
        let token = match self.refresh.join().await {
            RefreshTicket::Leader => {
                tracing::debug!("access token expired; leading refresh");
                let outcome = self.run_refresh().await;
                match &outcome {
                    Ok(token) => self.sessions.replace_token(token.clone()),
                    Err(err) => {
                        tracing::warn!(error = %err, "token refresh failed; tearing down session");
                        self.force_logout();
                    }
                }
                self.refresh.complete(outcome.clone()).await;
                outcome?
            }
            RefreshTicket::Follower(receiver) => {
                receiver.await.map_err(|_| RefreshError::Interrupted)??
            }
        };
        // Exactly one retry; a second 401 surfaces to the caller as-is.
        Ok(self.transport.execute(&request, Some(&token)).await?)
    }

    /// Calls the refresh endpoint. The known-expired access token is not
    /// attached; the refresh token rides the transport's cookie jar.
    async fn run_refresh(&self) -> Result<AccessToken, RefreshError> {
        let request = ApiRequest::post("/auth/refresh");
        let response = self.transport.execute(&request, None).await?;
        if !response.is_success() {
            return Err(RefreshError::Rejected(response.status()));
        }
        response
            .data()
            .and_then(|data| data.get("accessToken"))
            .and_then(Value::as_str)
            .map(AccessToken::new)
            .ok_or(RefreshError::MalformedPayload)
    }

    /// Tears the session down and, unless already on an auth view,
    /// schedules a non-blocking redirect to login after a short settle
    /// delay.
    fn force_logout(&self) {
        self.sessions.clear();
        if !self.navigator.is_auth_view() {
            let navigator = Arc::clone(&self.navigator);
            tokio::spawn(async move {
                tokio::time::sleep(REDIRECT_SETTLE_DELAY).await;
                navigator.redirect_to_login();
            });
        }
    }
}

/// Extracts `{ user, accessToken }` from a success envelope.
fn parse_session(response: &ApiResponse) -> ApiClientResult<Session> {
    let data = response
        .data()
        .ok_or_else(|| ApiClientError::MalformedPayload("missing data envelope".to_owned()))?;
    let user_value = data
        .get("user")
        .ok_or_else(|| ApiClientError::MalformedPayload("missing user".to_owned()))?;
    let user: UserProfile = serde_json::from_value(user_value.clone())
        .map_err(|err| ApiClientError::MalformedPayload(err.to_string()))?;
    let token = data
        .get("accessToken")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiClientError::MalformedPayload("missing access token".to_owned()))?;
    Ok(Session::new(AccessToken::new(token), user))
}

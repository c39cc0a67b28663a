//! finly client implementation.

use std::sync::{Arc, Mutex};

use finly_types::{FailResponse, TokenPairResponse, UserResponse};
use reqwest::StatusCode;
use serde_json::json;

use crate::coordinator::{JoinOutcome, RefreshGate, RefreshOutcome};
use crate::error::ClientError;
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, Transport};

/// Client for the finly API.
///
/// Owns the stored token pair and the single-flight refresh coordinator.
/// All state is private; callers only see `execute(request) -> result`
/// and a session that silently survives a single access-token expiry.
pub struct FinlyClient {
    transport: Arc<dyn Transport>,
    tokens: Mutex<Option<TokenPairResponse>>,
    gate: RefreshGate,
    on_session_end: Option<Box<dyn Fn() + Send + Sync>>,
}

impl FinlyClient {
    /// Create a client backed by HTTP against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(
            base_url,
        )?)))
    }

    /// Create a client over any transport. Tests use this to script the
    /// API side.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            tokens: Mutex::new(None),
            gate: RefreshGate::new(),
            on_session_end: None,
        }
    }

    /// Hook invoked exactly once when a refresh fails and the session is
    /// over (e.g. to redirect to the login screen).
    pub fn on_session_end(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_session_end = Some(Box::new(hook));
        self
    }

    pub fn set_tokens(&self, pair: TokenPairResponse) {
        *self.tokens.lock().expect("token store lock poisoned") = Some(pair);
    }

    pub fn clear_tokens(&self) {
        *self.tokens.lock().expect("token store lock poisoned") = None;
    }

    pub fn tokens(&self) -> Option<TokenPairResponse> {
        self.tokens.lock().expect("token store lock poisoned").clone()
    }

    fn access_token(&self) -> Option<String> {
        self.tokens().map(|pair| pair.token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens().map(|pair| pair.refresh_token)
    }

    /// Log in and store the returned pair for subsequent requests.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<TokenPairResponse, ClientError> {
        let request = ApiRequest::post(
            "/auth/login",
            json!({ "email": email, "password": password }),
        );
        let response = self.transport.send(&request, None).await?;
        if !response.status.is_success() {
            return Err(api_error(&response));
        }

        let pair: TokenPairResponse = response.json()?;
        self.set_tokens(pair.clone());
        Ok(pair)
    }

    /// Log out server-side and drop the stored pair.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let request = ApiRequest::post("/auth/logout", json!({}));
        let bearer = self.access_token();
        let result = self.transport.send(&request, bearer.as_deref()).await;
        self.clear_tokens();
        result.map(|_| ())
    }

    /// Fetch the authenticated user's public fields.
    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.execute(ApiRequest::get("/auth/me")).await?.json()
    }

    /// Send a request with the stored access token attached.
    ///
    /// On a 401 the request joins the refresh gate: exactly one refresh
    /// call runs no matter how many requests fail concurrently, and each
    /// failed request is replayed exactly once with the renewed token. A
    /// request that fails again after its replay surfaces the failure
    /// directly, so the cycle always terminates.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut retried = false;
        loop {
            let bearer = self.access_token();
            let response = self.transport.send(&request, bearer.as_deref()).await?;

            if response.status != StatusCode::UNAUTHORIZED {
                if response.status.is_success() {
                    return Ok(response);
                }
                // Every non-auth error class passes through untouched.
                return Err(api_error(&response));
            }

            if retried || self.refresh_token().is_none() {
                return Err(api_error(&response));
            }

            self.ensure_fresh(bearer.as_deref()).await?;
            retried = true;
        }
    }

    /// Guarantees the stored access token is newer than `stale`, renewing
    /// it at most once across all concurrent callers.
    async fn ensure_fresh(&self, stale: Option<&str>) -> Result<(), ClientError> {
        // Someone else already rotated the pair between our send and the
        // 401 landing; just replay with the current token.
        if self.access_token().as_deref() != stale {
            return Ok(());
        }

        match self.gate.join() {
            JoinOutcome::Leader => {
                // Re-check under leadership: the previous window may have
                // renewed the token after our first look.
                if self.access_token().as_deref() != stale {
                    self.gate.settle(RefreshOutcome::Renewed);
                    return Ok(());
                }
                let outcome = self.run_refresh().await;
                self.gate.settle(outcome);
                match outcome {
                    RefreshOutcome::Renewed => Ok(()),
                    RefreshOutcome::Failed => Err(ClientError::RefreshFailed),
                }
            }
            JoinOutcome::Follower(receiver) => match receiver.await {
                Ok(RefreshOutcome::Renewed) => Ok(()),
                // A dropped sender counts as failure; the window is over
                // either way.
                Ok(RefreshOutcome::Failed) | Err(_) => Err(ClientError::RefreshFailed),
            },
        }
    }

    /// The one network refresh call of the current window. Failure is
    /// terminal for the session: tokens are cleared and the session-end
    /// hook fires here, once, not per queued request.
    async fn run_refresh(&self) -> RefreshOutcome {
        let Some(refresh) = self.refresh_token() else {
            return self.end_session();
        };

        let request = ApiRequest::post("/auth/refresh-token", json!({}));
        match self.transport.send(&request, Some(&refresh)).await {
            Ok(response) if response.status.is_success() => match response.json() {
                Ok(pair) => {
                    self.set_tokens(pair);
                    RefreshOutcome::Renewed
                }
                Err(_) => self.end_session(),
            },
            // A rejected refresh token or a transport failure (including a
            // timeout) both end the session.
            Ok(_) | Err(_) => self.end_session(),
        }
    }

    fn end_session(&self) -> RefreshOutcome {
        self.clear_tokens();
        if let Some(hook) = &self.on_session_end {
            hook();
        }
        RefreshOutcome::Failed
    }
}

fn api_error(response: &ApiResponse) -> ClientError {
    let message = response
        .json::<FailResponse>()
        .map(|fail| fail.message)
        .unwrap_or_else(|_| {
            response
                .status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });
    ClientError::Api {
        status: response.status.as_u16(),
        message,
    }
}

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::bpm_gateway::{
    auth,
    error::{
        BpmError, BpmErrorKind, incomplete_session, internal_error, no_active_session,
        protocol_violation, transport_error,
    },
    session::{AuthSession, SessionStore},
    types::{
        BpmConfig, CaseId, DEFAULT_PROCESS_PAGE_SIZE, DEFAULT_TASK_PAGE_SIZE, EngineSessionInfo,
        HumanTask, ProcessDefinitionRef,
    },
};

const API_TOKEN_HEADER: &str = "X-Bonita-API-Token";

/// The engine-facing port. One implementation speaks HTTP to a live engine;
/// tests substitute their own.
#[async_trait]
pub trait ProcessEngine: Send + Sync {
    async fn login(
        &self,
        scope: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, BpmError>;

    async fn logout(&self, scope: &str) -> Result<(), BpmError>;

    async fn find_enabled_definitions(
        &self,
        scope: &str,
        process_name: &str,
    ) -> Result<Vec<ProcessDefinitionRef>, BpmError>;

    async fn instantiate(
        &self,
        scope: &str,
        definition_id: &str,
        contract: Option<&Value>,
    ) -> Result<CaseId, BpmError>;

    async fn ready_tasks(&self, scope: &str, case_id: CaseId) -> Result<Vec<HumanTask>, BpmError>;

    /// Assigns the task to the user recorded on the scope's session at login.
    async fn assign_task_to_caller(&self, scope: &str, task_id: &str) -> Result<(), BpmError>;

    async fn execute_task(
        &self,
        scope: &str,
        task_id: &str,
        contract: Option<&Value>,
    ) -> Result<(), BpmError>;
}

pub struct HttpProcessEngine {
    http: Client,
    base_url: String,
    sessions: Arc<dyn SessionStore>,
    request_timeout: Duration,
}

impl HttpProcessEngine {
    pub fn new(config: &BpmConfig, sessions: Arc<dyn SessionStore>) -> Result<Self, BpmError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|err| internal_error(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            sessions,
            request_timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Precondition for every engine call after login: a complete session for
    /// the scope, checked before any request is built.
    fn require_session(&self, scope: &str) -> Result<AuthSession, BpmError> {
        let session = self.sessions.get(scope).ok_or_else(no_active_session)?;
        if !session.has_both_tokens() {
            return Err(incomplete_session(
                "stored engine session is missing one of its tokens",
            ));
        }
        Ok(session)
    }

    fn authed(&self, builder: reqwest::RequestBuilder, session: &AuthSession) -> reqwest::RequestBuilder {
        builder
            .timeout(self.request_timeout)
            .header(
                header::COOKIE,
                cookie_header(&session.session_token, &session.api_token),
            )
            .header(API_TOKEN_HEADER, &session.api_token)
    }

    async fn fetch_session_info(
        &self,
        session_token: &str,
        api_token: &str,
    ) -> Result<EngineSessionInfo, BpmError> {
        let response = self
            .http
            .get(self.url("/API/system/session"))
            .timeout(self.request_timeout)
            .header(header::COOKIE, cookie_header(session_token, api_token))
            .header(API_TOKEN_HEADER, api_token)
            .send()
            .await
            .map_err(|err| transport_error(format!("session descriptor request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::IncompleteSession,
                "session descriptor lookup",
                &body,
            ));
        }

        response
            .json::<EngineSessionInfo>()
            .await
            .map_err(|err| protocol_violation(format!("session descriptor decode failed: {err}")))
    }
}

#[async_trait]
impl ProcessEngine for HttpProcessEngine {
    async fn login(
        &self,
        scope: &str,
        username: &str,
        password: &str,
    ) -> Result<AuthSession, BpmError> {
        let form = [
            ("username", username),
            ("password", password),
            ("redirect", "false"),
        ];

        let response = self
            .http
            .post(self.url("/loginservice"))
            .timeout(self.request_timeout)
            .form(&form)
            .send()
            .await
            .map_err(|err| transport_error(format!("login request failed: {err}")))?;

        let status = response.status();
        let set_cookies = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok().map(str::to_string))
            .collect::<Vec<_>>();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), body = %truncate(&body), "engine rejected login");
            return Err(
                BpmError::new(BpmErrorKind::AuthenticationFailed, "engine rejected the credentials")
                    .with_http_status(status.as_u16()),
            );
        }

        let (session_token, api_token) = auth::tokens_from_login_cookies(&set_cookies)?;

        let info = self.fetch_session_info(&session_token, &api_token).await?;
        if info.user_id.is_empty() {
            return Err(incomplete_session(
                "engine session descriptor carries no user id",
            ));
        }

        let session = auth::build_session(username, session_token, api_token, info.user_id);
        self.sessions.set(scope, session.clone());
        debug!(username, user_id = %session.user_id, "engine session acquired");

        Ok(session)
    }

    async fn logout(&self, scope: &str) -> Result<(), BpmError> {
        if let Some(session) = self.sessions.get(scope) {
            let result = self
                .http
                .get(self.url("/logoutservice"))
                .timeout(self.request_timeout)
                .query(&[("redirect", "false")])
                .header(
                    header::COOKIE,
                    cookie_header(&session.session_token, &session.api_token),
                )
                .header(API_TOKEN_HEADER, &session.api_token)
                .send()
                .await;

            // The local session dies regardless of what the engine says.
            if let Err(err) = result {
                warn!(username = %session.username, "engine logout call failed: {err}");
            }
        }

        self.sessions.clear(scope);
        Ok(())
    }

    async fn find_enabled_definitions(
        &self,
        scope: &str,
        process_name: &str,
    ) -> Result<Vec<ProcessDefinitionRef>, BpmError> {
        let session = self.require_session(scope)?;
        let name_filter = format!("name={process_name}");
        let page_size = DEFAULT_PROCESS_PAGE_SIZE.to_string();

        let response = self
            .authed(self.http.get(self.url("/API/bpm/process")), &session)
            .query(&[
                ("p", "0"),
                ("c", page_size.as_str()),
                ("f", name_filter.as_str()),
                ("f", "activationState=ENABLED"),
            ])
            .send()
            .await
            .map_err(|err| transport_error(format!("process search failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::Protocol,
                "process search",
                &body,
            ));
        }

        response
            .json::<Vec<ProcessDefinitionRef>>()
            .await
            .map_err(|err| protocol_violation(format!("process search decode failed: {err}")))
    }

    async fn instantiate(
        &self,
        scope: &str,
        definition_id: &str,
        contract: Option<&Value>,
    ) -> Result<CaseId, BpmError> {
        let session = self.require_session(scope)?;
        let body = contract.cloned().unwrap_or_else(|| json!({}));

        let response = self
            .authed(
                self.http
                    .post(self.url(&format!("/API/bpm/process/{definition_id}/instantiation"))),
                &session,
            )
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(format!("instantiation request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::Instantiation,
                "instantiation",
                &body,
            ));
        }

        let payload = response.json::<Value>().await.map_err(|err| {
            BpmError::new(
                BpmErrorKind::Instantiation,
                format!("instantiation response decode failed: {err}"),
            )
        })?;

        parse_case_id(&payload)
    }

    async fn ready_tasks(&self, scope: &str, case_id: CaseId) -> Result<Vec<HumanTask>, BpmError> {
        let session = self.require_session(scope)?;
        let case_filter = format!("caseId={case_id}");
        let page_size = DEFAULT_TASK_PAGE_SIZE.to_string();

        let response = self
            .authed(self.http.get(self.url("/API/bpm/humanTask")), &session)
            .query(&[
                ("p", "0"),
                ("c", page_size.as_str()),
                ("f", "state=ready"),
                ("f", case_filter.as_str()),
            ])
            .send()
            .await
            .map_err(|err| transport_error(format!("task search failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::Protocol,
                "task search",
                &body,
            ));
        }

        response
            .json::<Vec<HumanTask>>()
            .await
            .map_err(|err| protocol_violation(format!("task search decode failed: {err}")))
    }

    async fn assign_task_to_caller(&self, scope: &str, task_id: &str) -> Result<(), BpmError> {
        let session = self.require_session(scope)?;

        let response = self
            .authed(
                self.http
                    .put(self.url(&format!("/API/bpm/humanTask/{task_id}"))),
                &session,
            )
            .json(&json!({ "assigned_id": session.user_id }))
            .send()
            .await
            .map_err(|err| transport_error(format!("task assignment failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::TaskAssignment,
                "task assignment",
                &body,
            ));
        }

        Ok(())
    }

    async fn execute_task(
        &self,
        scope: &str,
        task_id: &str,
        contract: Option<&Value>,
    ) -> Result<(), BpmError> {
        let session = self.require_session(scope)?;
        let body = contract.cloned().unwrap_or_else(|| json!({}));

        let response = self
            .authed(
                self.http
                    .post(self.url(&format!("/API/bpm/userTask/{task_id}/execution"))),
                &session,
            )
            .json(&body)
            .send()
            .await
            .map_err(|err| transport_error(format!("task execution failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(engine_status_error(
                status,
                BpmErrorKind::TaskExecution,
                "task execution",
                &body,
            ));
        }

        Ok(())
    }
}

fn cookie_header(session_token: &str, api_token: &str) -> String {
    format!("{}={session_token}; {}={api_token}", auth::SESSION_COOKIE, auth::API_TOKEN_COOKIE)
}

/// Non-success engine status mapped to the failing step's kind. Auth failures
/// keep their own tag so an expired session is distinguishable from a step
/// defect. The raw body is logged, never surfaced in the message.
fn engine_status_error(
    status: StatusCode,
    fallback: BpmErrorKind,
    context: &str,
    body: &str,
) -> BpmError {
    debug!(context, status = status.as_u16(), body = %truncate(body), "engine returned non-success status");

    let kind = match status.as_u16() {
        401 | 403 => BpmErrorKind::AuthenticationFailed,
        _ => fallback,
    };

    BpmError::new(kind, format!("{context} returned status {}", status.as_u16()))
        .with_http_status(status.as_u16())
}

/// The case id is the one field instantiation must yield; the engine has been
/// seen emitting it both as a JSON number and as a string.
pub fn parse_case_id(payload: &Value) -> Result<CaseId, BpmError> {
    match payload.get("caseId") {
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            BpmError::new(
                BpmErrorKind::Instantiation,
                format!("instantiation response caseId is not an integer: {number}"),
            )
        }),
        Some(Value::String(text)) => text.parse::<CaseId>().map_err(|_| {
            BpmError::new(
                BpmErrorKind::Instantiation,
                format!("instantiation response caseId is not numeric: '{text}'"),
            )
        }),
        _ => Err(BpmError::new(
            BpmErrorKind::Instantiation,
            "instantiation response is missing caseId",
        )),
    }
}

fn truncate(body: &str) -> String {
    body.chars().take(240).collect()
}

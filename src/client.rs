//! HTTP client for the leads backend
//!
//! Wraps the four remote operations (login, list, create, delete) and
//! classifies every outcome into [`LeadsError`]. Credentials come from an
//! injected [`SessionStore`]; the client only reads it.
//!
//! Each call issues at most one request and never retries. Calls share one
//! connection pool but are otherwise independent: nothing is de-duplicated or
//! cancelled.

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::auth::{login_fields, token_expired, LoginRequest};
use crate::config::ClientConfig;
use crate::error::{LeadsError, Result};
use crate::models::{Credentials, Lead, LeadDraft, LeadStatus};
use crate::projector::{pin_first, retain_status};
use crate::session::SessionStore;

const EMPLOYEE_ID_HEADER: &str = "employee-id";

const LIST_FAILED: &str = "Failed to fetch leads.";
const CREATE_FAILED: &str = "Failed to create lead.";
const DELETE_FAILED: &str = "Failed to delete lead.";
const LOGIN_FAILED: &str = "Invalid credentials";
const MALFORMED: &str = "malformed response";

#[derive(Clone)]
pub struct LeadsClient {
    http: Client,
    config: ClientConfig,
    session: SessionStore,
}

impl LeadsClient {
    pub fn new(config: ClientConfig, session: SessionStore) -> Self {
        Self::with_http(Client::new(), config, session)
    }

    pub fn with_http(http: Client, config: ClientConfig, session: SessionStore) -> Self {
        Self {
            http,
            config,
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// `POST /user/login`
    ///
    /// Returns the credentials without persisting them; the caller saves them.
    pub async fn login(&self, email: &str, password: &str) -> Result<Credentials> {
        if email.is_empty() {
            return Err(LeadsError::validation("email"));
        }
        if password.is_empty() {
            return Err(LeadsError::validation("password"));
        }

        let url = self.config.url(&["user", "login"]);
        debug!(%url, "login in flight");
        let response = self
            .http
            .post(url)
            .json(&LoginRequest { email, password })
            .send()
            .await?;
        let (status, body) = read_body(response).await?;

        if status == StatusCode::OK {
            if let Some((token, employee_id)) = body.as_ref().and_then(login_fields) {
                debug!(employee_id = %employee_id, "login succeeded");
                return Ok(Credentials { token, employee_id });
            }
        }
        debug!(status = status.as_u16(), "login rejected");
        Err(api_error(status, body.as_ref(), LOGIN_FAILED))
    }

    /// `GET /leads/by-employee/{employee_id}[?status=..]`
    ///
    /// The result holds only leads of `status` (when given), pinned first,
    /// otherwise in response order.
    pub async fn list(&self, employee_id: &str, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        if employee_id.trim().is_empty() {
            return Err(LeadsError::validation("employeeId"));
        }
        let credentials = self.credentials()?;
        self.list_with(&credentials, employee_id, status).await
    }

    /// [`LeadsClient::list`] for the employee of the stored session.
    pub async fn list_own(&self, status: Option<LeadStatus>) -> Result<Vec<Lead>> {
        let credentials = self.credentials()?;
        self.list_with(&credentials, &credentials.employee_id, status).await
    }

    async fn list_with(
        &self,
        credentials: &Credentials,
        employee_id: &str,
        status: Option<LeadStatus>,
    ) -> Result<Vec<Lead>> {
        let url = self.config.url(&["leads", "by-employee", employee_id]);
        let mut request = self.http.get(url.clone());
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        debug!(%url, status = ?status, "list in flight");
        let response = bearer(request, credentials).send().await?;
        let (code, body) = read_body(response).await?;
        check_authenticated(code, body.as_ref(), LIST_FAILED)?;

        let body = body.ok_or_else(|| api_error(code, None, MALFORMED))?;
        let mut leads = normalize_leads(body);
        // The backend does not promise to honour the status query.
        if let Some(status) = status {
            retain_status(&mut leads, status);
        }
        pin_first(&mut leads);
        debug!(count = leads.len(), "list succeeded");
        Ok(leads)
    }

    /// `POST /leads`. The draft is validated before anything is sent.
    pub async fn create(&self, draft: &LeadDraft) -> Result<Lead> {
        draft.validate()?;
        let credentials = self.credentials()?;

        let url = self.config.url(&["leads"]);
        debug!(%url, "create in flight");
        let request = self
            .http
            .post(url)
            .header(EMPLOYEE_ID_HEADER, credentials.employee_id.as_str())
            .json(draft);
        let response = bearer(request, &credentials).send().await?;
        let (code, body) = read_body(response).await?;
        check_authenticated(code, body.as_ref(), CREATE_FAILED)?;

        let lead = body
            .and_then(created_lead)
            .ok_or_else(|| api_error(code, None, MALFORMED))?;
        debug!(id = %lead.id, "create succeeded");
        Ok(lead)
    }

    /// `DELETE /leads/{id}`. Irreversible; confirming is up to the caller.
    pub async fn remove(&self, id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(LeadsError::validation("id"));
        }
        let credentials = self.credentials()?;

        let url = self.config.url(&["leads", id]);
        debug!(%url, "delete in flight");
        let request = self
            .http
            .delete(url)
            .header(EMPLOYEE_ID_HEADER, credentials.employee_id.as_str());
        let response = bearer(request, &credentials).send().await?;
        let (code, body) = read_body(response).await?;
        check_authenticated(code, body.as_ref(), DELETE_FAILED)?;
        debug!(id, "delete succeeded");
        Ok(())
    }

    /// Stored credentials, refusing absent or locally expired sessions.
    fn credentials(&self) -> Result<Credentials> {
        let credentials = self.session.load()?.ok_or(LeadsError::SessionExpired)?;
        if token_expired(&credentials.token, unix_now()) {
            debug!("stored token has expired");
            return Err(LeadsError::SessionExpired);
        }
        Ok(credentials)
    }
}

fn bearer(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    request.header("Authorization", format!("Bearer {}", credentials.token))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Status plus the body parsed as JSON (`None` when empty or not JSON).
async fn read_body(response: Response) -> Result<(StatusCode, Option<Value>)> {
    let status = response.status();
    let bytes = response.bytes().await?;
    let body = serde_json::from_slice(&bytes).ok();
    Ok((status, body))
}

fn check_authenticated(status: StatusCode, body: Option<&Value>, fallback: &str) -> Result<()> {
    if status == StatusCode::UNAUTHORIZED {
        return Err(LeadsError::SessionExpired);
    }
    if !status.is_success() {
        return Err(api_error(status, body, fallback));
    }
    Ok(())
}

/// Backend `message` passed through untouched, else `fallback`.
fn api_error(status: StatusCode, body: Option<&Value>, fallback: &str) -> LeadsError {
    let message = body
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string();
    LeadsError::Api {
        status: status.as_u16(),
        message,
    }
}

/// Accepts `[...]` or `{"leads": [...]}`; any other shape is an empty list.
/// Entries without a usable id (or that are not objects) are dropped.
pub fn normalize_leads(body: Value) -> Vec<Lead> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("leads") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Lead>(item) {
            Ok(lead) => Some(lead),
            Err(e) => {
                debug!(error = %e, "skipping unreadable lead");
                None
            }
        })
        .collect()
}

/// The created lead, either bare or under a `lead` key.
fn created_lead(body: Value) -> Option<Lead> {
    if let Some(inner) = body.get("lead") {
        if let Ok(lead) = serde_json::from_value(inner.clone()) {
            return Some(lead);
        }
    }
    serde_json::from_value(body).ok()
}

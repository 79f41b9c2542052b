//! Client for the hosted backend-as-a-service the application delegates
//! persistence and identity to. Records live in the `mit_tasks` and
//! `mit_sessions` tables behind a row-level-security REST interface; the
//! identity session is persisted in a local JSON file.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde_derive::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::utils::session_file::{self, StoredSession};
use crate::{
    Auth, DayTotals, PinFuture, SessionSummary, Store, StoreError, SummaryId, Task, TaskId,
    UserId,
};

pub use config::SupabaseStoreConfig;

const TASKS_TABLE: &str = "mit_tasks";
const SESSIONS_TABLE: &str = "mit_sessions";

#[derive(Clone)]
pub struct SupabaseBackend {
    inner: Arc<Inner>,
}

struct Inner {
    base_url: String,
    anon_key: String,
    session_path: PathBuf,
    http: reqwest::Client,
    identity_tx: watch::Sender<Option<UserId>>,
}

#[derive(Deserialize)]
struct AuthUser {
    id: String,
}

#[derive(Deserialize)]
struct SessionResponse {
    access_token: String,
    user: AuthUser,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct PasswordChange<'a> {
    password: &'a str,
}

#[derive(Serialize)]
struct NewTaskRow<'a> {
    user_id: &'a str,
    session_date: NaiveDate,
    title: &'a str,
    is_completed: bool,
}

#[derive(Serialize)]
struct TaskPatch {
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct SummaryRow<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    user_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_date: Option<NaiveDate>,
    checkout_at: DateTime<Utc>,
    total_tasks: u32,
    completed_tasks: u32,
    completion_rate: u8,
}

impl SupabaseBackend {
    pub fn try_new(config: &SupabaseStoreConfig) -> eyre::Result<Self> {
        let session_path = config.resolve_session_file()?;

        // Seed the identity channel from the persisted session; the value
        // is re-validated against the provider on every resolve.
        let initial = session_file::read(&session_path)
            .ok()
            .flatten()
            .map(|s| s.user_id);
        let (identity_tx, _) = watch::channel(initial);

        Ok(SupabaseBackend {
            inner: Arc::new(Inner {
                base_url: config.resolve_url()?,
                anon_key: config.resolve_anon_key()?,
                session_path,
                http: reqwest::Client::new(),
                identity_tx,
            }),
        })
    }

    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{endpoint}", self.inner.base_url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.base_url)
    }

    fn session(&self) -> Result<StoredSession, StoreError> {
        session_file::read(&self.inner.session_path)
            .map_err(StoreError::transport)?
            .ok_or(StoreError::NotSignedIn)
    }

    fn store_session(&self, session: &StoredSession) -> Result<(), StoreError> {
        session_file::write(&self.inner.session_path, session).map_err(StoreError::transport)?;
        let _ = self.inner.identity_tx.send(Some(session.user_id.clone()));
        Ok(())
    }

    fn drop_session(&self) -> Result<(), StoreError> {
        session_file::clear(&self.inner.session_path).map_err(StoreError::transport)?;
        let _ = self.inner.identity_tx.send(None);
        Ok(())
    }

    /// Request builder with the platform headers: the public api key plus
    /// the caller's bearer token (the key itself for anonymous auth calls).
    fn request(&self, method: reqwest::Method, url: String, bearer: &str) -> reqwest::RequestBuilder {
        self.inner
            .http
            .request(method, url)
            .header("apikey", self.inner.anon_key.as_str())
            .bearer_auth(bearer)
    }

    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(StoreError::NotSignedIn);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(StoreError::Unavailable(format!("{status}: {body}")))
    }

    /// The identity provider reports sign-up and password problems as 4xx
    /// with a json message; map the known ones onto the auth taxonomy.
    async fn auth_error(resp: reqwest::Response) -> StoreError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("msg")
                    .or_else(|| v.get("message"))
                    .or_else(|| v.get("error_description"))
                    .and_then(|m| m.as_str().map(str::to_owned))
            })
            .unwrap_or(body);

        let lowered = message.to_lowercase();
        if lowered.contains("already") {
            StoreError::DuplicateRegistration
        } else if lowered.contains("password") {
            StoreError::WeakPassword(message)
        } else if status.is_client_error() {
            StoreError::InvalidCredentials
        } else {
            StoreError::Unavailable(format!("{status}: {message}"))
        }
    }
}

impl Auth for SupabaseBackend {
    fn current_identity(&self) -> PinFuture<Result<Option<UserId>, StoreError>> {
        Box::pin(async move {
            let session = match self.session() {
                Ok(session) => session,
                Err(StoreError::NotSignedIn) => return Ok(None),
                Err(err) => return Err(err),
            };

            // Re-validate the persisted session instead of trusting it
            let resp = self
                .request(reqwest::Method::GET, self.auth_url("user"), &session.access_token)
                .send()
                .await
                .map_err(StoreError::transport)?;

            if resp.status() == StatusCode::UNAUTHORIZED || resp.status() == StatusCode::FORBIDDEN {
                self.drop_session()?;
                return Ok(None);
            }

            let user: AuthUser = Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)?;
            Ok(Some(user.id))
        })
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.inner.identity_tx.subscribe()
    }

    fn sign_in(&self, email: String, password: String) -> PinFuture<Result<UserId, StoreError>> {
        Box::pin(async move {
            let resp = self
                .request(
                    reqwest::Method::POST,
                    format!("{}?grant_type=password", self.auth_url("token")),
                    &self.inner.anon_key,
                )
                .json(&Credentials {
                    email: &email,
                    password: &password,
                })
                .send()
                .await
                .map_err(StoreError::transport)?;

            if !resp.status().is_success() {
                if resp.status().is_client_error() {
                    return Err(StoreError::InvalidCredentials);
                }
                return Err(Self::auth_error(resp).await);
            }

            let session: SessionResponse = resp.json().await.map_err(StoreError::transport)?;
            self.store_session(&StoredSession {
                access_token: session.access_token,
                user_id: session.user.id.clone(),
            })?;
            Ok(session.user.id)
        })
    }

    fn sign_up(&self, email: String, password: String) -> PinFuture<Result<UserId, StoreError>> {
        Box::pin(async move {
            let resp = self
                .request(
                    reqwest::Method::POST,
                    self.auth_url("signup"),
                    &self.inner.anon_key,
                )
                .json(&Credentials {
                    email: &email,
                    password: &password,
                })
                .send()
                .await
                .map_err(StoreError::transport)?;

            if !resp.status().is_success() {
                return Err(Self::auth_error(resp).await);
            }

            // Depending on provider settings the response is a session or a
            // bare user
            let body: serde_json::Value = resp.json().await.map_err(StoreError::transport)?;
            if let Ok(session) = serde_json::from_value::<SessionResponse>(body.clone()) {
                self.store_session(&StoredSession {
                    access_token: session.access_token,
                    user_id: session.user.id.clone(),
                })?;
                return Ok(session.user.id);
            }

            let user: AuthUser =
                serde_json::from_value(body).map_err(StoreError::transport)?;
            Ok(user.id)
        })
    }

    fn sign_out(&self) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            if let Ok(session) = self.session() {
                // Best effort: the local session is dropped either way
                let _ = self
                    .request(
                        reqwest::Method::POST,
                        self.auth_url("logout"),
                        &session.access_token,
                    )
                    .send()
                    .await;
            }
            self.drop_session()
        })
    }

    fn update_password(&self, new_password: String) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(
                    reqwest::Method::PUT,
                    self.auth_url("user"),
                    &session.access_token,
                )
                .json(&PasswordChange {
                    password: &new_password,
                })
                .send()
                .await
                .map_err(StoreError::transport)?;

            if !resp.status().is_success() {
                return Err(Self::auth_error(resp).await);
            }
            Ok(())
        })
    }
}

impl Store for SupabaseBackend {
    fn list_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Vec<Task>, StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(reqwest::Method::GET, self.rest_url(TASKS_TABLE), &session.access_token)
                .query(&[
                    ("user_id", format!("eq.{user_id}")),
                    ("session_date", format!("eq.{date}")),
                    ("order", "created_at.asc".to_owned()),
                    ("select", "*".to_owned()),
                ])
                .send()
                .await
                .map_err(StoreError::transport)?;

            Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)
        })
    }

    fn insert_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
        titles: Vec<String>,
    ) -> PinFuture<Result<Vec<Task>, StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let rows: Vec<NewTaskRow> = titles
                .iter()
                .map(|title| NewTaskRow {
                    user_id: &user_id,
                    session_date: date,
                    title,
                    is_completed: false,
                })
                .collect();

            let resp = self
                .request(reqwest::Method::POST, self.rest_url(TASKS_TABLE), &session.access_token)
                .header("Prefer", "return=representation")
                .json(&rows)
                .send()
                .await
                .map_err(StoreError::transport)?;

            Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)
        })
    }

    fn update_task_completion(
        &self,
        task_id: TaskId,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(reqwest::Method::PATCH, self.rest_url(TASKS_TABLE), &session.access_token)
                .query(&[("id", format!("eq.{task_id}"))])
                .json(&TaskPatch {
                    is_completed: completed,
                    completed_at,
                })
                .send()
                .await
                .map_err(StoreError::transport)?;

            Self::check(resp).await?;
            Ok(())
        })
    }

    fn get_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Option<SessionSummary>, StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(
                    reqwest::Method::GET,
                    self.rest_url(SESSIONS_TABLE),
                    &session.access_token,
                )
                .query(&[
                    ("user_id", format!("eq.{user_id}")),
                    ("session_date", format!("eq.{date}")),
                    ("limit", "1".to_owned()),
                ])
                .send()
                .await
                .map_err(StoreError::transport)?;

            let mut rows: Vec<SessionSummary> = Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)?;
            Ok(rows.pop())
        })
    }

    fn upsert_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
        totals: DayTotals,
    ) -> PinFuture<Result<SessionSummary, StoreError>> {
        Box::pin(async move {
            let session = self.session()?;

            // Check-then-act: not atomic against a concurrent checkout from
            // another session of the same user. Accepted, see the state
            // machine's documentation.
            let existing = self
                .get_session_summary(user_id.clone(), date)
                .await?;

            let (method, query) = match &existing {
                Some(summary) => (
                    reqwest::Method::PATCH,
                    vec![("id", format!("eq.{}", summary.id))],
                ),
                None => (reqwest::Method::POST, vec![]),
            };

            let row = SummaryRow {
                user_id: existing.is_none().then_some(user_id.as_str()),
                session_date: existing.is_none().then_some(date),
                checkout_at: Utc::now(),
                total_tasks: totals.total_tasks,
                completed_tasks: totals.completed_tasks,
                completion_rate: totals.completion_rate,
            };

            let resp = self
                .request(method, self.rest_url(SESSIONS_TABLE), &session.access_token)
                .query(&query)
                .header("Prefer", "return=representation")
                .json(&row)
                .send()
                .await
                .map_err(StoreError::transport)?;

            let mut rows: Vec<SessionSummary> = Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)?;
            rows.pop().ok_or(StoreError::NotFound)
        })
    }

    fn list_session_summaries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> PinFuture<Result<Vec<SessionSummary>, StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(
                    reqwest::Method::GET,
                    self.rest_url(SESSIONS_TABLE),
                    &session.access_token,
                )
                .query(&[
                    ("user_id", format!("eq.{user_id}")),
                    ("order", "session_date.desc".to_owned()),
                    ("limit", limit.to_string()),
                ])
                .send()
                .await
                .map_err(StoreError::transport)?;

            Self::check(resp)
                .await?
                .json()
                .await
                .map_err(StoreError::transport)
        })
    }

    fn delete_session_summary(&self, id: SummaryId) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let session = self.session()?;
            let resp = self
                .request(
                    reqwest::Method::DELETE,
                    self.rest_url(SESSIONS_TABLE),
                    &session.access_token,
                )
                .query(&[("id", format!("eq.{id}"))])
                .send()
                .await
                .map_err(StoreError::transport)?;

            Self::check(resp).await?;
            Ok(())
        })
    }
}

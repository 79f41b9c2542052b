use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};
use serde_derive::Deserialize;
use tokio::sync::watch;
use ulid::Ulid;

use crate::{
    Auth, AuthBox, Backend, DayTotals, PinFuture, SessionSummary, Store, StoreBox, StoreConfig,
    StoreError, SummaryId, Task, TaskId, UserId,
};

/// This backend is used for testing and local experimentation, data is not
/// persisted to disk but only present in memory
#[derive(Clone)]
pub struct InMemoryBackend {
    state: Arc<Mutex<State>>,
    identity_tx: Arc<watch::Sender<Option<UserId>>>,
}

#[derive(Default)]
struct State {
    /// email -> (user id, password)
    users: HashMap<String, (UserId, String)>,
    current: Option<UserId>,
    tasks: Vec<Task>,
    summaries: Vec<SessionSummary>,
    write_calls: u32,
    fail_next_write: bool,
    failing_reads: u32,
}

#[derive(Debug, Deserialize, Default)]
pub struct InMemoryStoreConfig {}

impl StoreConfig for InMemoryStoreConfig {
    fn to_backend(self) -> eyre::Result<Backend> {
        let backend = InMemoryBackend::new();
        Ok(Backend {
            store: StoreBox::new(backend.clone()),
            auth: AuthBox::new(backend),
        })
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    pub fn new() -> Self {
        let (identity_tx, _) = watch::channel(None);
        InMemoryBackend {
            state: Arc::new(Mutex::new(State::default())),
            identity_tx: Arc::new(identity_tx),
        }
    }

    /// Number of write operations the store received so far. Lets tests
    /// assert that validation failures never reach persistence.
    pub fn write_call_count(&self) -> u32 {
        self.lock().write_calls
    }

    /// Make the next write operation fail with `StoreError::Unavailable`,
    /// to exercise rollback paths.
    pub fn fail_next_write(&self) {
        self.lock().fail_next_write = true;
    }

    /// Same for reads, to exercise degraded view resolution. Each call
    /// queues one more failing read.
    pub fn fail_next_read(&self) {
        self.lock().failing_reads += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("in-memory store lock poisoned")
    }

    fn record_write(state: &mut State) -> Result<(), StoreError> {
        state.write_calls += 1;
        if state.fail_next_write {
            state.fail_next_write = false;
            return Err(StoreError::Unavailable("injected write failure".into()));
        }
        Ok(())
    }

    fn record_read(state: &mut State) -> Result<(), StoreError> {
        if state.failing_reads > 0 {
            state.failing_reads -= 1;
            return Err(StoreError::Unavailable("injected read failure".into()));
        }
        Ok(())
    }
}

impl Auth for InMemoryBackend {
    fn current_identity(&self) -> PinFuture<Result<Option<UserId>, StoreError>> {
        let current = self.lock().current.clone();
        Box::pin(async move { Ok(current) })
    }

    fn subscribe(&self) -> watch::Receiver<Option<UserId>> {
        self.identity_tx.subscribe()
    }

    fn sign_in(
        &self,
        email: String,
        password: String,
    ) -> PinFuture<Result<UserId, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            let user_id = match state.users.get(&email) {
                Some((id, stored)) if *stored == password => id.clone(),
                _ => return Err(StoreError::InvalidCredentials),
            };
            state.current = Some(user_id.clone());
            drop(state);
            let _ = self.identity_tx.send(Some(user_id.clone()));
            Ok(user_id)
        })
    }

    fn sign_up(
        &self,
        email: String,
        password: String,
    ) -> PinFuture<Result<UserId, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            if state.users.contains_key(&email) {
                return Err(StoreError::DuplicateRegistration);
            }
            let user_id = Ulid::new().to_string();
            state.users.insert(email, (user_id.clone(), password));
            state.current = Some(user_id.clone());
            drop(state);
            let _ = self.identity_tx.send(Some(user_id.clone()));
            Ok(user_id)
        })
    }

    fn sign_out(&self) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            self.lock().current = None;
            let _ = self.identity_tx.send(None);
            Ok(())
        })
    }

    fn update_password(&self, new_password: String) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            let current = state.current.clone().ok_or(StoreError::NotSignedIn)?;
            for (id, stored) in state.users.values_mut() {
                if *id == current {
                    *stored = new_password;
                    return Ok(());
                }
            }
            Err(StoreError::NotFound)
        })
    }
}

impl Store for InMemoryBackend {
    fn list_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Vec<Task>, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_read(&mut state)?;
            // insertion order doubles as creation order
            let tasks = state
                .tasks
                .iter()
                .filter(|t| t.user_id == user_id && t.session_date == date)
                .cloned()
                .collect();
            Ok(tasks)
        })
    }

    fn insert_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
        titles: Vec<String>,
    ) -> PinFuture<Result<Vec<Task>, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_write(&mut state)?;
            let now = Utc::now();
            let inserted: Vec<Task> = titles
                .into_iter()
                .map(|title| Task {
                    id: Ulid::new().to_string(),
                    user_id: user_id.clone(),
                    session_date: date,
                    title,
                    is_completed: false,
                    completed_at: None,
                    created_at: now,
                })
                .collect();
            state.tasks.extend(inserted.iter().cloned());
            Ok(inserted)
        })
    }

    fn update_task_completion(
        &self,
        task_id: TaskId,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_write(&mut state)?;
            let task = state
                .tasks
                .iter_mut()
                .find(|t| t.id == task_id)
                .ok_or(StoreError::NotFound)?;
            task.is_completed = completed;
            task.completed_at = completed_at;
            Ok(())
        })
    }

    fn get_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Option<SessionSummary>, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_read(&mut state)?;
            Ok(state
                .summaries
                .iter()
                .find(|s| s.user_id == user_id && s.session_date == date)
                .cloned())
        })
    }

    fn upsert_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
        totals: DayTotals,
    ) -> PinFuture<Result<SessionSummary, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_write(&mut state)?;
            let now = Utc::now();

            // Atomic under the state lock: the check-then-act race of the
            // hosted backend does not exist here.
            if let Some(existing) = state
                .summaries
                .iter_mut()
                .find(|s| s.user_id == user_id && s.session_date == date)
            {
                existing.checkout_at = now;
                existing.total_tasks = totals.total_tasks;
                existing.completed_tasks = totals.completed_tasks;
                existing.completion_rate = totals.completion_rate;
                return Ok(existing.clone());
            }

            let summary = SessionSummary {
                id: Ulid::new().to_string(),
                user_id,
                session_date: date,
                checkout_at: now,
                total_tasks: totals.total_tasks,
                completed_tasks: totals.completed_tasks,
                completion_rate: totals.completion_rate,
            };
            state.summaries.push(summary.clone());
            Ok(summary)
        })
    }

    fn list_session_summaries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> PinFuture<Result<Vec<SessionSummary>, StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_read(&mut state)?;
            let mut summaries: Vec<SessionSummary> = state
                .summaries
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect();
            summaries.sort_by(|a, b| b.session_date.cmp(&a.session_date));
            summaries.truncate(limit as usize);
            Ok(summaries)
        })
    }

    fn delete_session_summary(&self, id: SummaryId) -> PinFuture<Result<(), StoreError>> {
        Box::pin(async move {
            let mut state = self.lock();
            Self::record_write(&mut state)?;
            let before = state.summaries.len();
            state.summaries.retain(|s| s.id != id);
            if state.summaries.len() == before {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[tokio::test]
    async fn sign_in_rejects_bad_password() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        backend
            .sign_up("ana@acme.example".into(), "secret1".into())
            .await?;
        backend.sign_out().await?;

        let err = backend
            .sign_in("ana@acme.example".into(), "wrong".into())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidCredentials));
        Ok(())
    }

    #[tokio::test]
    async fn identity_watchers_see_sign_in_and_out() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        let mut rx = backend.subscribe();
        assert_eq!(*rx.borrow(), None);

        let user = backend
            .sign_up("ana@acme.example".into(), "secret1".into())
            .await?;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_deref(), Some(user.as_str()));

        backend.sign_out().await?;
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
        Ok(())
    }

    #[tokio::test]
    async fn tasks_are_scoped_to_user_and_date() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        let ana = backend
            .sign_up("ana@acme.example".into(), "secret1".into())
            .await?;
        let bob = backend
            .sign_up("bob@acme.example".into(), "secret1".into())
            .await?;

        backend
            .insert_tasks(ana.clone(), date("2026-08-30"), vec!["a".into(), "b".into()])
            .await?;
        backend
            .insert_tasks(bob.clone(), date("2026-08-30"), vec!["x".into()])
            .await?;
        backend
            .insert_tasks(ana.clone(), date("2026-08-29"), vec!["old".into()])
            .await?;

        let today = backend.list_tasks(ana, date("2026-08-30")).await?;
        assert_eq!(today.len(), 2);
        assert_eq!(today[0].title, "a");
        assert_eq!(today[1].title, "b");
        Ok(())
    }

    #[tokio::test]
    async fn upsert_keeps_one_summary_per_day() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        let user: UserId = "user-1".into();
        let d = date("2026-08-30");

        let first = backend
            .upsert_session_summary(
                user.clone(),
                d,
                DayTotals {
                    total_tasks: 3,
                    completed_tasks: 1,
                    completion_rate: 33,
                },
            )
            .await?;
        let second = backend
            .upsert_session_summary(
                user.clone(),
                d,
                DayTotals {
                    total_tasks: 3,
                    completed_tasks: 3,
                    completion_rate: 100,
                },
            )
            .await?;

        assert_eq!(first.id, second.id);
        let all = backend.list_session_summaries(user, 30).await?;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].completion_rate, 100);
        Ok(())
    }

    #[tokio::test]
    async fn summaries_list_newest_first_and_honor_limit() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        let user: UserId = "user-1".into();
        for day in ["2026-08-27", "2026-08-29", "2026-08-28"] {
            backend
                .upsert_session_summary(user.clone(), date(day), DayTotals::default())
                .await?;
        }

        let all = backend.list_session_summaries(user.clone(), 30).await?;
        assert_eq!(all[0].session_date, date("2026-08-29"));
        assert_eq!(all[2].session_date, date("2026-08-27"));

        let limited = backend.list_session_summaries(user, 2).await?;
        assert_eq!(limited.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_only_the_summary() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        let user: UserId = "user-1".into();
        let d = date("2026-08-30");
        backend
            .insert_tasks(user.clone(), d, vec!["keep me".into()])
            .await?;
        let summary = backend
            .upsert_session_summary(user.clone(), d, DayTotals::default())
            .await?;

        backend.delete_session_summary(summary.id.clone()).await?;

        assert!(backend
            .list_session_summaries(user.clone(), 30)
            .await?
            .is_empty());
        // associated task rows are untouched
        assert_eq!(backend.list_tasks(user, d).await?.len(), 1);

        let err = backend.delete_session_summary(summary.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        Ok(())
    }

    #[tokio::test]
    async fn injected_failure_hits_exactly_one_write() -> eyre::Result<()> {
        let backend = InMemoryBackend::new();
        backend.fail_next_write();

        let err = backend
            .insert_tasks("u".into(), date("2026-08-30"), vec!["t".into()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));

        // subsequent writes succeed again
        backend
            .insert_tasks("u".into(), date("2026-08-30"), vec!["t".into()])
            .await?;
        assert_eq!(backend.write_call_count(), 2);
        Ok(())
    }
}

use chrono::{DateTime, NaiveDate, Utc};
use mit_store::{DayTotals, SessionSummary, Store, Task, TaskId, UserId};
use tracing::warn;

use crate::{validate, Core, ValidationError};

/// What the dashboard shows for one calendar day. Derived on entry from
/// the presence of task and summary rows, never persisted.
#[derive(Debug)]
pub enum ViewState {
    /// No tasks planned yet for this day
    NeedsInput,
    /// Tasks exist and the day has not been checked out
    Active(DaySession),
    /// A summary row exists; carries the stored counts, not recomputed ones
    CheckedOut(SessionSummary),
}

/// The in-memory task list of one open day.
#[derive(Debug, Clone)]
pub struct DaySession {
    date: NaiveDate,
    tasks: Vec<Task>,
}

/// Tentative local phase of a toggle: what changed and what to restore
/// if the persistence call fails.
#[derive(Debug)]
pub struct ToggleAttempt {
    pub task_id: TaskId,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    prior_completed: bool,
    prior_completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Persisted { completed: bool },
    /// The store rejected the write; the local flag was restored
    RolledBack { completed: bool },
}

impl DaySession {
    pub(crate) fn new(date: NaiveDate, tasks: Vec<Task>) -> Self {
        DaySession { date, tasks }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// 1-based position, the way the CLI numbers the day's list
    pub fn task_at(&self, position: usize) -> Option<&Task> {
        position.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    pub fn totals(&self) -> DayTotals {
        let total_tasks = self.tasks.len() as u32;
        let completed_tasks = self.tasks.iter().filter(|t| t.is_completed).count() as u32;
        DayTotals {
            total_tasks,
            completed_tasks,
            completion_rate: validate::completion_rate(completed_tasks, total_tasks),
        }
    }

    /// Phase one of a toggle: flip the flag in memory and remember the
    /// prior values for compensation.
    pub fn toggle_local(&mut self, task_id: &TaskId) -> eyre::Result<ToggleAttempt> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == *task_id)
            .ok_or_else(|| eyre::eyre!("no task '{task_id}' in today's session"))?;

        let attempt = ToggleAttempt {
            task_id: task.id.clone(),
            completed: !task.is_completed,
            completed_at: (!task.is_completed).then(Utc::now),
            prior_completed: task.is_completed,
            prior_completed_at: task.completed_at,
        };

        task.is_completed = attempt.completed;
        task.completed_at = attempt.completed_at;
        Ok(attempt)
    }

    /// Phase two, failure branch: restore the flag the attempt replaced.
    pub fn rollback(&mut self, attempt: &ToggleAttempt) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == attempt.task_id) {
            task.is_completed = attempt.prior_completed;
            task.completed_at = attempt.prior_completed_at;
        }
    }
}

impl Core {
    /// Determination algorithm on dashboard entry: summary row wins, then
    /// task rows, then the input view. Read failures degrade to the input
    /// view instead of blocking the user.
    pub async fn resolve_today(&self, user_id: &UserId) -> ViewState {
        self.resolve_for_date(user_id, Self::today()).await
    }

    pub async fn resolve_for_date(&self, user_id: &UserId, date: NaiveDate) -> ViewState {
        match self
            .store
            .get_session_summary(user_id.clone(), date)
            .await
        {
            Ok(Some(summary)) => return ViewState::CheckedOut(summary),
            Ok(None) => {}
            Err(err) => warn!("could not check for an existing checkout: {err}"),
        }

        match self.store.list_tasks(user_id.clone(), date).await {
            Ok(tasks) if tasks.is_empty() => ViewState::NeedsInput,
            Ok(tasks) => ViewState::Active(DaySession::new(date, tasks)),
            Err(err) => {
                warn!("could not load the day's tasks, falling back to input: {err}");
                ViewState::NeedsInput
            }
        }
    }

    /// First submission of a day's 3-5 tasks. Blank titles are stripped
    /// before the count check; nothing is persisted on validation failure.
    pub async fn submit_tasks(
        &self,
        user_id: &UserId,
        date: NaiveDate,
        titles: Vec<String>,
    ) -> eyre::Result<DaySession> {
        let titles = validate::normalize_titles(titles)?;
        let tasks = self
            .store
            .insert_tasks(user_id.clone(), date, titles)
            .await?;
        Ok(DaySession::new(date, tasks))
    }

    /// Optimistic toggle: the in-memory flag flips first, then the store
    /// write either confirms it or gets compensated. A failed write is
    /// logged and rolled back, not escalated.
    pub async fn toggle_task(
        &self,
        session: &mut DaySession,
        task_id: &TaskId,
    ) -> eyre::Result<ToggleOutcome> {
        let attempt = session.toggle_local(task_id)?;

        match self
            .store
            .update_task_completion(attempt.task_id.clone(), attempt.completed, attempt.completed_at)
            .await
        {
            Ok(()) => Ok(ToggleOutcome::Persisted {
                completed: attempt.completed,
            }),
            Err(err) => {
                warn!("task toggle was not persisted, rolling back: {err}");
                session.rollback(&attempt);
                Ok(ToggleOutcome::RolledBack {
                    completed: attempt.prior_completed,
                })
            }
        }
    }

    /// Finalize the day: compute the totals and upsert the summary row.
    /// Checking out twice for the same day overwrites, never duplicates.
    pub async fn checkout(
        &self,
        user_id: &UserId,
        session: &DaySession,
    ) -> eyre::Result<SessionSummary> {
        let summary = self
            .store
            .upsert_session_summary(user_id.clone(), session.date(), session.totals())
            .await?;
        Ok(summary)
    }

    /// Reopen a checked-out day for edits. Only today's session is
    /// editable; the next checkout overwrites the existing summary row.
    pub async fn edit_session(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> eyre::Result<DaySession> {
        if date != Self::today() {
            return Err(ValidationError::NotToday { date }.into());
        }
        let tasks = self.store.list_tasks(user_id.clone(), date).await?;
        Ok(DaySession::new(date, tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use mit_config::CoreConfig;
    use mit_store::store::in_memory::InMemoryBackend;
    use mit_store::{Auth, AuthBox, Backend, StoreBox};

    async fn signed_in_core() -> (Core, InMemoryBackend, UserId) {
        let backend = InMemoryBackend::new();
        let user_id = backend
            .sign_up("ana@acme.example".into(), "secret1".into())
            .await
            .unwrap();
        let core = Core::with_backend(
            Backend {
                store: StoreBox::new(backend.clone()),
                auth: AuthBox::new(backend.clone()),
            },
            CoreConfig {
                email_domain: "acme.example".to_owned(),
                default_profile_name: None,
            },
        );
        (core, backend, user_id)
    }

    fn titles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn empty_day_needs_input() {
        let (core, _, user) = signed_in_core().await;
        assert!(matches!(
            core.resolve_today(&user).await,
            ViewState::NeedsInput
        ));
    }

    #[tokio::test]
    async fn submission_drops_blanks_and_activates_the_day() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let today = Core::today();

        let session = core
            .submit_tasks(
                &user,
                today,
                titles(&["  Write report ", "", "Call client", "   ", "Review PR"]),
            )
            .await?;
        assert_eq!(session.tasks().len(), 3);
        assert!(session.tasks().iter().all(|t| !t.is_completed));
        assert_eq!(session.tasks()[0].title, "Write report");

        match core.resolve_today(&user).await {
            ViewState::Active(reloaded) => assert_eq!(reloaded.tasks().len(), 3),
            other => panic!("expected active state, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn short_submission_never_reaches_the_store() {
        let (core, backend, user) = signed_in_core().await;

        let err = core
            .submit_tasks(&user, Core::today(), titles(&["only", " one ", "  "]))
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NotEnoughTasks { valid: 2 })
        );
        assert_eq!(backend.write_call_count(), 0);
    }

    #[tokio::test]
    async fn oversized_submission_is_rejected() {
        let (core, backend, user) = signed_in_core().await;

        let err = core
            .submit_tasks(
                &user,
                Core::today(),
                titles(&["a", "b", "c", "d", "e", "f"]),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::TooManyTasks { given: 6 })
        );
        assert_eq!(backend.write_call_count(), 0);
    }

    #[tokio::test]
    async fn plan_toggle_checkout_scenario() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let today = Core::today();

        let mut session = core
            .submit_tasks(
                &user,
                today,
                titles(&["Write report", "Call client", "Review PR"]),
            )
            .await?;

        let call_client = session.tasks()[1].id.clone();
        let outcome = core.toggle_task(&mut session, &call_client).await?;
        assert_eq!(outcome, ToggleOutcome::Persisted { completed: true });
        assert!(session.tasks()[1].completed_at.is_some());

        let summary = core.checkout(&user, &session).await?;
        assert_eq!(summary.total_tasks, 3);
        assert_eq!(summary.completed_tasks, 1);
        assert_eq!(summary.completion_rate, 33);

        assert!(matches!(
            core.resolve_today(&user).await,
            ViewState::CheckedOut(_)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn toggling_back_clears_the_completion_timestamp() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let mut session = core
            .submit_tasks(&user, Core::today(), titles(&["a", "b", "c"]))
            .await?;
        let id = session.tasks()[0].id.clone();

        core.toggle_task(&mut session, &id).await?;
        core.toggle_task(&mut session, &id).await?;

        assert!(!session.tasks()[0].is_completed);
        assert!(session.tasks()[0].completed_at.is_none());

        // the store saw both writes
        match core.resolve_today(&user).await {
            ViewState::Active(reloaded) => {
                assert!(!reloaded.tasks()[0].is_completed);
                assert!(reloaded.tasks()[0].completed_at.is_none());
            }
            other => panic!("expected active state, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn failed_toggle_rolls_back_the_local_flag() -> eyre::Result<()> {
        let (core, backend, user) = signed_in_core().await;
        let mut session = core
            .submit_tasks(&user, Core::today(), titles(&["a", "b", "c"]))
            .await?;
        let id = session.tasks()[0].id.clone();

        backend.fail_next_write();
        let outcome = core.toggle_task(&mut session, &id).await?;
        assert_eq!(outcome, ToggleOutcome::RolledBack { completed: false });
        assert!(!session.tasks()[0].is_completed);
        assert!(session.tasks()[0].completed_at.is_none());

        // retrying works once the store recovers
        let outcome = core.toggle_task(&mut session, &id).await?;
        assert_eq!(outcome, ToggleOutcome::Persisted { completed: true });
        Ok(())
    }

    #[tokio::test]
    async fn double_checkout_keeps_one_overwritten_row() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let mut session = core
            .submit_tasks(&user, Core::today(), titles(&["a", "b", "c", "d"]))
            .await?;

        let first = core.checkout(&user, &session).await?;
        assert_eq!(first.completion_rate, 0);

        for position in [1, 2, 3] {
            let id = session.task_at(position).unwrap().id.clone();
            core.toggle_task(&mut session, &id).await?;
        }
        let second = core.checkout(&user, &session).await?;

        assert_eq!(second.id, first.id);
        assert_eq!(second.total_tasks, 4);
        assert_eq!(second.completed_tasks, 3);
        assert_eq!(second.completion_rate, 75);

        let all = core.history(&user).await?;
        assert_eq!(all.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn checked_out_day_shows_stored_counts() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let today = Core::today();

        let session = core
            .submit_tasks(&user, today, titles(&["a", "b", "c"]))
            .await?;
        core.checkout(&user, &session).await?;

        // mutate a task row out-of-band, after checkout
        let id = session.tasks()[0].id.clone();
        core.get_inner_store()
            .update_task_completion(id, true, Some(Utc::now()))
            .await?;

        match core.resolve_today(&user).await {
            ViewState::CheckedOut(summary) => {
                // stored counts, not recomputed from the mutated rows
                assert_eq!(summary.completed_tasks, 0);
                assert_eq!(summary.completion_rate, 0);
            }
            other => panic!("expected checked-out state, got {other:?}"),
        }
        Ok(())
    }

    #[tokio::test]
    async fn read_failure_degrades_to_input() -> eyre::Result<()> {
        let (core, backend, user) = signed_in_core().await;
        core.submit_tasks(&user, Core::today(), titles(&["a", "b", "c"]))
            .await?;

        // summary lookup fails, then the task read fails too
        backend.fail_next_read();
        backend.fail_next_read();
        assert!(matches!(
            core.resolve_today(&user).await,
            ViewState::NeedsInput
        ));

        // with a healthy store the same day resolves normally again
        assert!(matches!(
            core.resolve_today(&user).await,
            ViewState::Active(_)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn editing_yesterday_is_rejected() -> eyre::Result<()> {
        let (core, backend, user) = signed_in_core().await;
        let session = core
            .submit_tasks(&user, Core::today(), titles(&["a", "b", "c"]))
            .await?;
        core.checkout(&user, &session).await?;
        let writes_before = backend.write_call_count();

        let yesterday = Core::today() - Duration::days(1);
        let err = core.edit_session(&user, yesterday).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NotToday { date: yesterday })
        );
        assert_eq!(backend.write_call_count(), writes_before);
        Ok(())
    }

    #[tokio::test]
    async fn editing_today_reopens_and_recheckout_overwrites() -> eyre::Result<()> {
        let (core, _, user) = signed_in_core().await;
        let today = Core::today();

        let session = core
            .submit_tasks(&user, today, titles(&["a", "b", "c"]))
            .await?;
        let first = core.checkout(&user, &session).await?;

        let mut reopened = core.edit_session(&user, today).await?;
        assert_eq!(reopened.tasks().len(), 3);

        let id = reopened.tasks()[2].id.clone();
        core.toggle_task(&mut reopened, &id).await?;
        let second = core.checkout(&user, &reopened).await?;

        assert_eq!(second.id, first.id);
        assert_eq!(second.completed_tasks, 1);
        assert_eq!(core.history(&user).await?.len(), 1);
        Ok(())
    }
}

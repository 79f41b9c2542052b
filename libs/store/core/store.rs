use chrono::{DateTime, NaiveDate, Utc};
use derive_more::{Deref, DerefMut};

use super::{
    error::StoreError,
    record::{DayTotals, SessionSummary, SummaryId, Task, TaskId, UserId},
};
use crate::PinFuture;

#[derive(Deref, DerefMut)]
#[deref(forward)]
#[deref_mut(forward)]
pub struct StoreBox(Box<dyn Store>);

impl StoreBox {
    pub fn new(store: impl Store + 'static) -> Self {
        Self(Box::new(store))
    }
}

pub trait Store: Send + Sync {
    /// List a user's tasks for one session date, in creation order
    fn list_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Vec<Task>, StoreError>>;

    /// Insert a batch of freshly planned tasks; ids are assigned by the store
    fn insert_tasks(
        &self,
        user_id: UserId,
        date: NaiveDate,
        titles: Vec<String>,
    ) -> PinFuture<Result<Vec<Task>, StoreError>>;

    /// Set or clear the completion flag of a single task
    fn update_task_completion(
        &self,
        task_id: TaskId,
        completed: bool,
        completed_at: Option<DateTime<Utc>>,
    ) -> PinFuture<Result<(), StoreError>>;

    fn get_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
    ) -> PinFuture<Result<Option<SessionSummary>, StoreError>>;

    /// Overwrite the summary row for (user, date) when one exists, insert
    /// otherwise. Backends are free to implement this atomically; the
    /// hosted backend does check-then-act and keeps the documented
    /// concurrent-checkout race.
    fn upsert_session_summary(
        &self,
        user_id: UserId,
        date: NaiveDate,
        totals: DayTotals,
    ) -> PinFuture<Result<SessionSummary, StoreError>>;

    /// Most recent summaries first, by session date
    fn list_session_summaries(
        &self,
        user_id: UserId,
        limit: u32,
    ) -> PinFuture<Result<Vec<SessionSummary>, StoreError>>;

    /// Remove a single summary row; task rows are untouched
    fn delete_session_summary(&self, id: SummaryId) -> PinFuture<Result<(), StoreError>>;
}

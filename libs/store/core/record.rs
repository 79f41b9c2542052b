use chrono::{DateTime, NaiveDate, Utc};
use serde_derive::{Deserialize, Serialize};

pub type UserId = String;
pub type TaskId = String;
pub type SummaryId = String;

/// One priority task for a given (user, session date) pair. Tasks are
/// created in a batch when the user plans their day and are never deleted
/// by the application.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub user_id: UserId,
    pub session_date: NaiveDate,
    pub title: String,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Persisted result of a checkout. At most one row exists per
/// (user, session date); the upsert logic preserves this.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: SummaryId,
    pub user_id: UserId,
    pub session_date: NaiveDate,
    pub checkout_at: DateTime<Utc>,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Integer percentage, 0-100, rounded
    pub completion_rate: u8,
}

/// Checkout payload: the counts a summary row is written from.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct DayTotals {
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub completion_rate: u8,
}

use chrono::NaiveDate;
use thiserror::Error;

pub const MIN_TASKS: usize = 3;
pub const MAX_TASKS: usize = 5;

const MIN_PASSWORD_CHARS: usize = 6;

/// Problems caught before any persistence call; all fully recoverable by
/// re-input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("a day needs at least {MIN_TASKS} tasks, got {valid} non-blank title(s)")]
    NotEnoughTasks { valid: usize },

    #[error("a day holds at most {MAX_TASKS} tasks, got {given}")]
    TooManyTasks { given: usize },

    #[error("password must have at least {MIN_PASSWORD_CHARS} characters")]
    PasswordTooShort,

    #[error("password confirmation does not match")]
    PasswordMismatch,

    #[error("only today's session can be edited, {date} is not today")]
    NotToday { date: NaiveDate },
}

/// Trim titles, drop blank ones and enforce the 3-5 window.
pub(crate) fn normalize_titles(titles: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let valid: Vec<String> = titles
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect();

    if valid.len() < MIN_TASKS {
        return Err(ValidationError::NotEnoughTasks { valid: valid.len() });
    }
    if valid.len() > MAX_TASKS {
        return Err(ValidationError::TooManyTasks { given: valid.len() });
    }
    Ok(valid)
}

pub(crate) fn check_new_password(password: &str, confirm: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ValidationError::PasswordTooShort);
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

/// Integer percentage, rounded; defined as 0 for an empty day.
pub fn completion_rate(completed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

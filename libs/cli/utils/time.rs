use chrono::{Duration, Local, NaiveDate};

pub fn parse_day_string(day_str: &str) -> eyre::Result<NaiveDate> {
    let today = Local::now().date_naive();
    match day_str {
        "today" => Ok(today),
        "yesterday" => Ok(today - Duration::days(1)),
        s => NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| {
            eyre::eyre!("Invalid date format '{}': {}. Use YYYY-MM-DD, today or yesterday.", s, e)
        }),
    }
}

/// Relative label for history listings
pub fn format_session_date(date: NaiveDate) -> String {
    let today = Local::now().date_naive();
    if date == today {
        "Today".to_owned()
    } else if date == today - Duration::days(1) {
        "Yesterday".to_owned()
    } else {
        date.format("%a %Y-%m-%d").to_string()
    }
}

use clap::Args;
use colored::Colorize;
use mit_core::{Core, DaySession, ViewState};
use mit_store::SessionSummary;

use crate::utils::identity;

#[derive(Args, Debug)]
pub struct Command {
    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    let user_id = identity::require_user(core).await?;
    let state = core.resolve_today(&user_id).await;

    if command.json {
        let output = match &state {
            ViewState::NeedsInput => serde_json::json!({ "state": "needs-input" }),
            ViewState::Active(session) => {
                serde_json::json!({ "state": "active", "tasks": session.tasks() })
            }
            ViewState::CheckedOut(summary) => {
                serde_json::json!({ "state": "checked-out", "summary": summary })
            }
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    match state {
        ViewState::NeedsInput => {
            println!("{}", "No tasks planned for today yet.".yellow());
            println!("Plan your day with: mit plan \"first\" \"second\" \"third\"");
        }
        ViewState::Active(session) => {
            println!("{} {}", "❯".blue().bold(), "TODAY".blue().bold());
            print_task_list(&session);
            println!();
            println!("Toggle with 'mit toggle <n>', finish with 'mit checkout'.");
        }
        ViewState::CheckedOut(summary) => print_summary(&summary),
    }

    Ok(())
}

pub(crate) fn print_task_list(session: &DaySession) {
    for (i, task) in session.tasks().iter().enumerate() {
        let mark = if task.is_completed {
            "✔".green().bold()
        } else {
            "○".dimmed()
        };
        let position = format!("{}.", i + 1).dimmed();
        if task.is_completed {
            println!("  {} {} {}", position, mark, task.title.dimmed().strikethrough());
        } else {
            println!("  {} {} {}", position, mark, task.title);
        }
    }
}

pub(crate) fn print_summary(summary: &SessionSummary) {
    println!(
        "{} {} ({})",
        "✔".green().bold(),
        "DAY CHECKED OUT".green(),
        summary.session_date
    );
    let prefix = "  ├─".dimmed();
    println!(
        "{} {}: {}/{}",
        prefix,
        "Done".bold(),
        summary.completed_tasks,
        summary.total_tasks
    );
    println!(
        "{} {}: {}%",
        prefix,
        "Rate".bold(),
        summary.completion_rate
    );
    println!(
        "{} {}: {}",
        "  ╰─".dimmed(),
        "At".bold(),
        summary
            .checkout_at
            .with_timezone(&chrono::Local)
            .format("%H:%M")
            .to_string()
            .dimmed()
    );
}

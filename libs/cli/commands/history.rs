use clap::Args;
use colored::Colorize;
use mit_core::Core;

use crate::utils::{identity, time};

#[derive(Args, Debug)]
pub struct Command {
    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    let user_id = identity::require_user(core).await?;
    let summaries = core.history(&user_id).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!("{}", "No history yet.".yellow());
        println!("Complete your tasks and 'mit checkout' to record a day.");
        return Ok(());
    }

    for summary in summaries.iter() {
        let label = time::format_session_date(summary.session_date);
        let rate = format!("{}%", summary.completion_rate);
        let rate = match summary.completion_rate {
            100 => rate.green().bold(),
            75..=99 => rate.blue(),
            50..=74 => rate.yellow(),
            _ => rate.red(),
        };

        println!("{}", label.cyan().bold());
        println!(
            "  ├─ {}: {}/{} tasks ({})",
            "Done".bold(),
            summary.completed_tasks,
            summary.total_tasks,
            rate
        );
        println!(
            "  ├─ {}: {}",
            "At".bold(),
            summary
                .checkout_at
                .with_timezone(&chrono::Local)
                .format("%H:%M")
        );
        let id_line = format!("  ╰─ {}: {}", "Id".bold(), summary.id.dimmed());
        if Core::is_editable(summary) {
            println!("{id_line} {}", "(editable with 'mit edit')".yellow());
        } else {
            println!("{id_line}");
        }
        println!();
    }

    Ok(())
}

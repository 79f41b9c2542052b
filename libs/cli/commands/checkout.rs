use clap::Args;
use colored::Colorize;
use mit_core::{Core, ViewState};

use crate::commands::status;
use crate::utils::identity;

#[derive(Args, Debug)]
pub struct Command {}

pub async fn handle(_: Command, core: &Core) -> eyre::Result<()> {
    let user_id = identity::require_user(core).await?;

    let session = match core.resolve_today(&user_id).await {
        ViewState::Active(session) => session,
        ViewState::NeedsInput => {
            eyre::bail!("nothing to check out; plan today first with 'mit plan'")
        }
        ViewState::CheckedOut(_) => {
            eyre::bail!("today is already checked out; 'mit edit' reopens it")
        }
    };

    let summary = core.checkout(&user_id, &session).await?;
    status::print_summary(&summary);

    let message = encouragement(summary.completion_rate);
    match summary.completion_rate {
        100 => println!("{}", message.green().bold()),
        75..=99 => println!("{}", message.blue()),
        50..=74 => println!("{}", message.yellow()),
        _ => println!("{message}"),
    }
    Ok(())
}

/// Completion tiers, aligned with the color bands of the history view
fn encouragement(completion_rate: u8) -> &'static str {
    match completion_rate {
        100 => "Excellent! You finished everything you planned today.",
        75..=99 => "Great! Most of the day's tasks are done.",
        50..=74 => "Good effort, more than half the day landed.",
        _ => "Checked out. Tomorrow will be better!",
    }
}

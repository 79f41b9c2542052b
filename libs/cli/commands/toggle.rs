use clap::Args;
use colored::Colorize;
use mit_core::{Core, ToggleOutcome, ViewState};

use crate::commands::status;
use crate::utils::identity;

#[derive(Args, Debug)]
pub struct Command {
    /// Position of the task in today's list (1-based, see 'mit status')
    position: usize,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    let user_id = identity::require_user(core).await?;

    let mut session = match core.resolve_today(&user_id).await {
        ViewState::Active(session) => session,
        ViewState::NeedsInput => {
            eyre::bail!("no tasks planned for today yet; start with 'mit plan'")
        }
        ViewState::CheckedOut(_) => {
            eyre::bail!("today is checked out; reopen it with 'mit edit' before toggling")
        }
    };

    let task_id = session
        .task_at(command.position)
        .map(|task| task.id.clone())
        .ok_or_else(|| {
            eyre::eyre!(
                "no task at position {} (today has {})",
                command.position,
                session.tasks().len()
            )
        })?;

    match core.toggle_task(&mut session, &task_id).await? {
        ToggleOutcome::Persisted { .. } => {}
        ToggleOutcome::RolledBack { completed } => {
            let state = if completed { "done" } else { "open" };
            println!(
                "{}",
                format!("the store rejected the change, task stays {state}").yellow()
            );
        }
    }

    status::print_task_list(&session);
    Ok(())
}

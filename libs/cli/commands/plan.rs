use clap::Args;
use colored::Colorize;
use mit_core::{Core, ViewState};

use crate::commands::status;
use crate::utils::identity;

#[derive(Args, Debug)]
pub struct Command {
    /// 3 to 5 task titles for today
    #[clap(num_args = 1..=5)]
    titles: Vec<String>,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    let user_id = identity::require_user(core).await?;

    match core.resolve_today(&user_id).await {
        ViewState::NeedsInput => {}
        ViewState::Active(_) => {
            eyre::bail!("today is already planned; see 'mit status' or tick tasks with 'mit toggle'")
        }
        ViewState::CheckedOut(_) => {
            eyre::bail!("today is already checked out; reopen it with 'mit edit'")
        }
    }

    let session = core
        .submit_tasks(&user_id, Core::today(), command.titles)
        .await?;

    println!(
        "{} {} task(s) planned for today",
        "⚡️".yellow(),
        session.tasks().len()
    );
    status::print_task_list(&session);
    Ok(())
}

use clap::Args;
use colored::Colorize;
use mit_core::Core;

use crate::utils::{identity, prompt};

#[derive(Args, Debug)]
pub struct Command {
    /// Id of the history entry (see 'mit history')
    id: String,

    /// Skip the confirmation prompt
    #[clap(long)]
    yes: bool,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    identity::require_user(core).await?;

    if !command.yes {
        let question = format!("Delete history entry {}? This cannot be undone.", command.id);
        if !prompt::confirm(&question)? {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
    }

    core.delete_history_entry(command.id).await?;
    println!("{} history entry deleted", "✔".green().bold());
    Ok(())
}

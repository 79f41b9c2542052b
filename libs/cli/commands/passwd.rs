use clap::Args;
use colored::Colorize;
use mit_core::Core;

use crate::utils::{identity, prompt};

#[derive(Args, Debug)]
pub struct Command {}

pub async fn handle(_: Command, core: &Core) -> eyre::Result<()> {
    identity::require_user(core).await?;

    let new_password = prompt::password("New password: ", None)?;
    let confirm = prompt::password("Confirm new password: ", None)?;

    core.gate().change_password(&new_password, &confirm).await?;

    println!("{} password updated", "✔".green().bold());
    Ok(())
}

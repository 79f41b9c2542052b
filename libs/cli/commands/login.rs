use clap::Args;
use colored::Colorize;
use mit_core::Core;

use crate::utils::prompt;

#[derive(Args, Debug)]
pub struct Command {
    /// Login handle (short code) or full email address
    handle: String,

    /// Read the password from this flag instead of prompting
    #[clap(long)]
    password: Option<String>,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    let password = prompt::password("Password: ", command.password)?;
    let gate = core.gate();

    gate.login(&command.handle, &password).await?;

    println!(
        "{} signed in as {}",
        "✔".green().bold(),
        gate.login_email(&command.handle).cyan()
    );
    Ok(())
}

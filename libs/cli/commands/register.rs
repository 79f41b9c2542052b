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
    let (password, confirm) = match command.password {
        Some(password) => (password.clone(), password),
        None => (
            prompt::password("Password: ", None)?,
            prompt::password("Confirm password: ", None)?,
        ),
    };

    let gate = core.gate();
    gate.register(&command.handle, &password, &confirm).await?;

    println!(
        "{} account created for {}",
        "✔".green().bold(),
        gate.login_email(&command.handle).cyan()
    );
    Ok(())
}

use clap::Args;
use colored::Colorize;
use mit_core::{Core, ValidationError};

use crate::commands::status;
use crate::utils::command_error::{self, Error};
use crate::utils::exit_code::ExitCode;
use crate::utils::{identity, time};

#[derive(Args, Debug)]
pub struct Command {
    /// Session date to reopen: today, yesterday or YYYY-MM-DD
    /// (defaults to today; only today is actually editable)
    date: Option<String>,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    let user_id = identity::require_user(core).await?;

    let date = match command.date {
        Some(raw) => time::parse_day_string(&raw)?,
        None => Core::today(),
    };

    let session = match core.edit_session(&user_id, date).await {
        Ok(session) => session,
        Err(err) if err.downcast_ref::<ValidationError>().is_some() => {
            println!("{}", format!("{err}").yellow());
            return Err(Error::Exit(ExitCode::DataError));
        }
        Err(err) => return Err(err.into()),
    };

    println!(
        "{} {} reopened; the next checkout overwrites its summary",
        "⚡️".yellow(),
        session.date()
    );
    status::print_task_list(&session);
    Ok(())
}

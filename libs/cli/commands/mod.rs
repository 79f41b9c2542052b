use clap::Subcommand;
use mit_core::Core;

use crate::utils::command_error;

pub mod checkout;
pub mod delete;
pub mod edit;
pub mod history;
pub mod login;
pub mod logout;
pub mod passwd;
pub mod plan;
pub mod register;
pub mod status;
pub mod toggle;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with your handle or email
    Login(login::Command),
    /// Create an account
    Register(register::Command),
    /// Sign out and clear the local session
    Logout(logout::Command),
    /// Change your password
    Passwd(passwd::Command),
    /// Show today's session
    Status(status::Command),
    /// Plan today's 3-5 most important tasks
    Plan(plan::Command),
    /// Toggle completion of one of today's tasks
    Toggle(toggle::Command),
    /// Finalize today and persist the summary
    Checkout(checkout::Command),
    /// List past sessions, newest first
    History(history::Command),
    /// Delete a history entry
    Delete(delete::Command),
    /// Reopen today's checked-out session for edits
    Edit(edit::Command),
}

impl Command {
    pub async fn execute(self, core: &Core) -> command_error::Result<()> {
        match self {
            Self::Login(o) => login::handle(o, core).await?,
            Self::Register(o) => register::handle(o, core).await?,
            Self::Logout(o) => logout::handle(o, core).await?,
            Self::Passwd(o) => passwd::handle(o, core).await?,
            Self::Status(o) => status::handle(o, core).await?,
            Self::Plan(o) => plan::handle(o, core).await?,
            Self::Toggle(o) => toggle::handle(o, core).await?,
            Self::Checkout(o) => checkout::handle(o, core).await?,
            Self::History(o) => history::handle(o, core).await?,
            Self::Delete(o) => delete::handle(o, core).await?,
            Self::Edit(o) => edit::handle(o, core).await?,
        };

        Ok(())
    }
}

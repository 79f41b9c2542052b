use clap::Args;
use colored::Colorize;
use mit_core::Core;

#[derive(Args, Debug)]
pub struct Command {}

pub async fn handle(_: Command, core: &Core) -> eyre::Result<()> {
    core.gate().logout().await?;
    println!("{}", "Signed out.".yellow());
    Ok(())
}

use clap::Parser;
use mit_store::BuiltinStoreType;

mod commands;
mod tracing;
mod utils;

use utils::command_error::{self, Error};
use utils::exit_code::ExitCode;

// Note: for uniformity, we dont use clap `default_value` or `default_value_t`
// options; defaults are applied in code
#[derive(Parser, Debug)]
#[command(
    name = "mit",
    version,
    long_about = Some("Track your daily Most Important Tasks: plan 3-5 priorities, tick them off, check out your day and review past sessions.")
)]
struct Args {
    /// Path of the configuration file (default: ~/.config/mit/config.toml)
    #[clap(long, global = true)]
    config: Option<String>,

    /// Configuration profile to use
    #[clap(long, global = true)]
    profile: Option<String>,

    /// Store backend: supabase or in-memory (default: supabase)
    #[clap(long, global = true)]
    store: Option<BuiltinStoreType>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
pub async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::Success,
        Err(command_error::Error::Exit(code)) => code,
        Err(command_error::Error::ExitWithError(code, report)) => {
            eprintln!("{report:?}");
            code
        }
    }
}

async fn run() -> command_error::Result<()> {
    color_eyre::install()?;
    tracing::setup()?;

    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => utils::paths::default_config_path()?,
    };
    let store_type = args.store.unwrap_or(BuiltinStoreType::Supabase);

    let core = mit_core::load(store_type, &config_path, args.profile.as_deref())
        .await
        .map_err(|err| Error::with_code(ExitCode::ConfigError, err))?;

    args.command.execute(&core).await
}

use directories_next::ProjectDirs;

pub fn default_config_path() -> eyre::Result<String> {
    let dirs = ProjectDirs::from("", "", "mit")
        .ok_or_else(|| eyre::eyre!("could not determine a home directory for configuration"))?;

    Ok(dirs
        .config_dir()
        .join("config.toml")
        .to_string_lossy()
        .into_owned())
}

use std::path::Path;

use crate::Config;

/// Read the mit configuration file. A missing file is an error here;
/// the caller decides whether running on defaults is acceptable.
pub fn load(config_path: &str) -> eyre::Result<Config> {
    let path = Path::new(config_path);
    if !path.exists() {
        eyre::bail!("no mit configuration found at '{config_path}'");
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)
        .map_err(|err| eyre::eyre!("could not parse mit configuration '{config_path}': {err}"))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_config_file_from_disk() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [core]
            email_domain = "acme.example"

            [profile.default]
            store_type = "supabase"
            "#,
        )?;

        let config = load(path.to_str().unwrap())?;
        assert_eq!(config.core.email_domain, "acme.example");
        assert_eq!(config.get_profile(None)?.store_type, "supabase");
        Ok(())
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let err = load("/definitely/not/mit/config.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/mit/config.toml"));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "not toml [")?;

        let err = load(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("could not parse"));
        Ok(())
    }
}

use std::collections::HashMap;

use serde_derive::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct CoreConfig {
    /// Domain suffix used to map a short login handle to a full
    /// login identifier (handle -> handle@email_domain)
    pub email_domain: String,

    /// Profile used by default when none are specified
    pub default_profile_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProfileConfig {
    /// Type of store (e.g. supabase)
    pub store_type: String,

    // Rest of the store config as a flexible structure
    #[serde(flatten)]
    pub details: toml::Value,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub core: CoreConfig,
    pub profile: HashMap<String, ProfileConfig>,
}

impl Config {
    /// Resolve the requested profile, falling back to the configured
    /// default and then to a profile literally named "default".
    pub fn get_profile(&self, name: Option<&str>) -> eyre::Result<&ProfileConfig> {
        let profile_name = name
            .or(self.core.default_profile_name.as_deref())
            .unwrap_or("default");

        self.profile
            .get(profile_name)
            .ok_or_else(|| eyre::eyre!("profile '{profile_name}' was not found in configuration"))
    }
}

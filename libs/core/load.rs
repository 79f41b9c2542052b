use mit_config::CoreConfig;
use mit_store::store::in_memory::InMemoryStoreConfig;
use mit_store::store::supabase::SupabaseStoreConfig;
use mit_store::{BuiltinStoreType, StoreConfig};

use crate::Core;

pub async fn load(
    store_type: BuiltinStoreType,
    config_path: &str,
    profile_name: Option<&str>,
) -> eyre::Result<Core> {
    match store_type {
        BuiltinStoreType::Supabase => {
            load_core::<SupabaseStoreConfig>(config_path, profile_name).await
        }
        BuiltinStoreType::InMemory => {
            load_core::<InMemoryStoreConfig>(config_path, profile_name).await
        }
    }
}

pub async fn load_core<SC>(config_path: &str, profile_name: Option<&str>) -> eyre::Result<Core>
where
    SC: StoreConfig,
{
    let mut found_config_file = Ok(());

    let (core_config, details) = match mit_config::load(config_path) {
        Ok(config) => {
            let details = config
                .get_profile(profile_name)
                .ok()
                .map(|profile| profile.details.clone());
            (config.core.clone(), details)
        }
        Err(err) => {
            found_config_file = Err(err);
            (default_core_config(), None)
        }
    };

    let store_config: SC = match details {
        // unknown keys (like store_type itself) are ignored by serde
        Some(value) => value.try_into()?,
        None => SC::default(),
    };

    let backend = store_config.to_backend()?;
    let mut core = Core::with_backend(backend, core_config);
    core.found_config_file = found_config_file;
    Ok(core)
}

fn default_core_config() -> CoreConfig {
    CoreConfig {
        email_domain: "localhost".to_owned(),
        default_profile_name: None,
    }
}

use std::path::PathBuf;

use serde_derive::Deserialize;

use crate::{AuthBox, Backend, StoreBox, StoreConfig};

use super::SupabaseBackend;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SupabaseStoreConfig {
    /// Endpoint URL of the hosted backend (falls back to MIT_SUPABASE_URL)
    url: Option<String>,

    /// Public API key (falls back to MIT_SUPABASE_ANON_KEY)
    anon_key: Option<String>,

    /// Path of the persisted identity session
    /// (default to ~/.local/share/mit/session.json)
    session_file: Option<String>,
}

impl SupabaseStoreConfig {
    pub fn resolve_url(&self) -> eyre::Result<String> {
        self.url
            .clone()
            .or_else(|| std::env::var("MIT_SUPABASE_URL").ok())
            .map(|url| url.trim_end_matches('/').to_owned())
            .ok_or_else(|| {
                eyre::eyre!("supabase url is not configured (profile key 'url' or MIT_SUPABASE_URL)")
            })
    }

    pub fn resolve_anon_key(&self) -> eyre::Result<String> {
        self.anon_key
            .clone()
            .or_else(|| std::env::var("MIT_SUPABASE_ANON_KEY").ok())
            .ok_or_else(|| {
                eyre::eyre!(
                    "supabase api key is not configured (profile key 'anon_key' or MIT_SUPABASE_ANON_KEY)"
                )
            })
    }

    pub fn resolve_session_file(&self) -> eyre::Result<PathBuf> {
        let raw = self
            .session_file
            .clone()
            .unwrap_or("~/.local/share/mit/session.json".to_owned());

        Ok(PathBuf::from(shellexpand::full(&raw)?.into_owned()))
    }
}

impl StoreConfig for SupabaseStoreConfig {
    fn to_backend(self) -> eyre::Result<Backend> {
        let backend = SupabaseBackend::try_new(&self)?;
        Ok(Backend {
            store: StoreBox::new(backend.clone()),
            auth: AuthBox::new(backend),
        })
    }
}

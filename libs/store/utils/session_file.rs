use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::UserId;

/// Identity session persisted client side, the CLI counterpart of the
/// platform's own browser storage.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub access_token: String,
    pub user_id: UserId,
}

pub(crate) fn read(path: &Path) -> eyre::Result<Option<StoredSession>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let session: StoredSession = serde_json::from_str(&content)?;
    Ok(Some(session))
}

pub(crate) fn write(path: &Path, session: &StoredSession) -> eyre::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

pub(crate) fn clear(path: &Path) -> eyre::Result<()> {
    if path.exists() {
        std::fs::remove_file(path)?;
    }
    Ok(())
}

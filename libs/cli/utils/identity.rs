use mit_core::Core;
use mit_store::{StoreError, UserId};

/// Entry point of every protected command: resolve the caller's identity
/// or point them at the login flow.
pub async fn require_user(core: &Core) -> eyre::Result<UserId> {
    match core.gate().resolve().await {
        Ok(user_id) => Ok(user_id),
        Err(err) => match err.downcast_ref::<StoreError>() {
            Some(StoreError::NotSignedIn) => Err(eyre::eyre!(
                "you are not signed in; run 'mit login <handle>' first"
            )),
            _ => Err(err),
        },
    }
}

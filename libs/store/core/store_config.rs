use serde::de::DeserializeOwned;

use super::{auth::AuthBox, store::StoreBox};

/// A fully wired data-access backend: the record store plus the identity
/// provider that scopes it.
pub struct Backend {
    pub store: StoreBox,
    pub auth: AuthBox,
}

pub trait StoreConfig: DeserializeOwned + Default {
    fn to_backend(self) -> eyre::Result<Backend>;
}

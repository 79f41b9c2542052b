/// Failures crossing the data-access boundary. Auth variants are surfaced
/// inline by the caller; `Unavailable` covers network or store failures on
/// reads and writes. Nothing here is treated as fatal.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("an account already exists for this login")]
    DuplicateRegistration,

    #[error("password rejected by the identity provider: {0}")]
    WeakPassword(String),

    #[error("no user is currently signed in")]
    NotSignedIn,

    #[error("record not found")]
    NotFound,

    #[error("data store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn transport(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

use mit_store::{Auth, AuthBox, StoreError, UserId};
use tokio::sync::watch;

use crate::validate;

/// Decides whether a caller holds a valid identity before any protected
/// operation runs, and owns the login/register/logout flows around it.
pub struct IdentityGate<'a> {
    auth: &'a AuthBox,
    email_domain: &'a str,
}

impl<'a> IdentityGate<'a> {
    pub(crate) fn new(auth: &'a AuthBox, email_domain: &'a str) -> Self {
        IdentityGate { auth, email_domain }
    }

    /// The identity of the caller, or `StoreError::NotSignedIn`. Always
    /// asks the provider; nothing is cached between calls.
    pub async fn resolve(&self) -> eyre::Result<UserId> {
        match self.auth.current_identity().await? {
            Some(user_id) => Ok(user_id),
            None => Err(StoreError::NotSignedIn.into()),
        }
    }

    /// Re-evaluation channel: flips whenever a sign-in or sign-out happens
    /// anywhere on this backend.
    pub fn watch(&self) -> watch::Receiver<Option<UserId>> {
        self.auth.subscribe()
    }

    /// Map a short login handle onto the configured domain; full addresses
    /// pass through untouched apart from trimming and lowercasing.
    pub fn login_email(&self, handle: &str) -> String {
        let clean = handle.trim().to_lowercase();
        if clean.contains('@') {
            clean
        } else {
            format!("{clean}@{}", self.email_domain)
        }
    }

    pub async fn login(&self, handle: &str, password: &str) -> eyre::Result<UserId> {
        let user_id = self
            .auth
            .sign_in(self.login_email(handle), password.to_owned())
            .await?;
        Ok(user_id)
    }

    pub async fn register(
        &self,
        handle: &str,
        password: &str,
        confirm: &str,
    ) -> eyre::Result<UserId> {
        validate::check_new_password(password, confirm)?;
        let user_id = self
            .auth
            .sign_up(self.login_email(handle), password.to_owned())
            .await?;
        Ok(user_id)
    }

    pub async fn change_password(&self, new_password: &str, confirm: &str) -> eyre::Result<()> {
        validate::check_new_password(new_password, confirm)?;
        self.auth.update_password(new_password.to_owned()).await?;
        Ok(())
    }

    pub async fn logout(&self) -> eyre::Result<()> {
        self.auth.sign_out().await?;
        Ok(())
    }
}

use derive_more::{Deref, DerefMut};
use tokio::sync::watch;

use super::{error::StoreError, record::UserId};
use crate::PinFuture;

#[derive(Deref, DerefMut)]
#[deref(forward)]
#[deref_mut(forward)]
pub struct AuthBox(Box<dyn Auth>);

impl AuthBox {
    pub fn new(auth: impl Auth + 'static) -> Self {
        Self(Box::new(auth))
    }
}

/// Identity side of the data-access contract. Sessions are held by the
/// backend's own persisted state; callers never see credentials beyond
/// the sign-in/sign-up calls.
pub trait Auth: Send + Sync {
    /// The currently authenticated user, if any. Never caches a stale
    /// result: backends re-validate their persisted session.
    fn current_identity(&self) -> PinFuture<Result<Option<UserId>, StoreError>>;

    /// Identity-change notifications (sign-in/out from anywhere).
    /// Dropping the receiver unsubscribes.
    fn subscribe(&self) -> watch::Receiver<Option<UserId>>;

    fn sign_in(&self, email: String, password: String)
        -> PinFuture<Result<UserId, StoreError>>;

    fn sign_up(&self, email: String, password: String)
        -> PinFuture<Result<UserId, StoreError>>;

    fn sign_out(&self) -> PinFuture<Result<(), StoreError>>;

    /// Change the password of the signed-in user
    fn update_password(&self, new_password: String) -> PinFuture<Result<(), StoreError>>;
}

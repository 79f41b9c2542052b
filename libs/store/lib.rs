use std::{future::Future, pin::Pin};

mod core {
    pub(crate) mod auth;
    pub(crate) mod error;
    pub(crate) mod record;
    pub(crate) mod store;
    pub(crate) mod store_config;
}

pub use self::core::{
    auth::{Auth, AuthBox},
    error::StoreError,
    record::{DayTotals, SessionSummary, SummaryId, Task, TaskId, UserId},
    store::{Store, StoreBox},
    store_config::{Backend, StoreConfig},
};

pub mod store {
    pub mod in_memory;
    pub mod supabase;
}

pub mod utils {
    pub(crate) mod session_file;
}

pub type PinFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::EnumString, strum_macros::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BuiltinStoreType {
    Supabase,
    InMemory,
}

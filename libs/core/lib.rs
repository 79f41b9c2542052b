use chrono::{Local, NaiveDate};
use mit_config::CoreConfig;
use mit_store::{AuthBox, Backend, StoreBox};

mod day;
mod gate;
mod history;
mod load;
mod validate;

pub use day::{DaySession, ToggleAttempt, ToggleOutcome, ViewState};
pub use gate::IdentityGate;
pub use history::HISTORY_LIMIT;
pub use load::{load, load_core};
pub use validate::{completion_rate, ValidationError, MAX_TASKS, MIN_TASKS};

pub struct Core {
    store: StoreBox,
    auth: AuthBox,
    config: CoreConfig,
    /// Ok - found | Err - not found with error reason
    found_config_file: Result<(), eyre::Error>,
}

impl Core {
    pub fn with_backend(backend: Backend, config: CoreConfig) -> Self {
        Core {
            store: backend.store,
            auth: backend.auth,
            config,
            found_config_file: Ok(()),
        }
    }

    pub fn gate(&self) -> IdentityGate<'_> {
        IdentityGate::new(&self.auth, &self.config.email_domain)
    }

    /// Session dates follow the user's local day boundary
    pub fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    pub fn get_inner_store(&self) -> &StoreBox {
        &self.store
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn has_found_config_file(&self) -> &Result<(), eyre::Error> {
        &self.found_config_file
    }
}

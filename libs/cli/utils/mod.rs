pub mod command_error;
pub mod exit_code;
pub mod identity;
pub mod paths;
pub mod prompt;
pub mod time;

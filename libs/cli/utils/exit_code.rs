use std::process::Termination;

/// The subset of `<sysexits.h>` codes this CLI reports, returnable
/// straight from `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,

    /// Generic failure
    Error = 1,

    /// User-supplied input was rejected, e.g. a non-editable session
    /// date (EX_DATAERR)
    DataError = 65,

    /// The configuration could not be resolved (EX_CONFIG)
    ConfigError = 78,
}

impl ExitCode {
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl Termination for ExitCode {
    fn report(self) -> std::process::ExitCode {
        self.code().into()
    }
}

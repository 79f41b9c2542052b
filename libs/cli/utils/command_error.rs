use crate::utils::exit_code::ExitCode;

/// How a mit command ends when it does not return `Ok`: either with a
/// printable report, or silently when the command already told the user
/// everything (e.g. a rejected edit date).
pub enum Error {
    ExitWithError(ExitCode, eyre::Report),
    Exit(ExitCode),
}

impl Error {
    /// Attach a specific exit code to a report; the blanket conversion
    /// below reports everything else as a generic failure.
    pub fn with_code(code: ExitCode, error: impl Into<eyre::Report>) -> Self {
        Self::ExitWithError(code, error.into())
    }

    pub fn code(&self) -> ExitCode {
        match self {
            Error::ExitWithError(code, _) | Error::Exit(code) => *code,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl<E> From<E> for Error
where
    E: Into<eyre::Report>,
{
    #[track_caller]
    fn from(error: E) -> Self {
        Self::ExitWithError(ExitCode::Error, error.into())
    }
}

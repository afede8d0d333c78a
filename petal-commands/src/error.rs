use thiserror::Error;

/// Failures answered to the invoker instead of being logged.
///
/// Command bodies return `anyhow::Result`; these are raised through it and
/// recovered by downcasting.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Missing required argument `{0}`.")]
    MissingArgument(&'static str),

    #[error("{0}")]
    BadArgument(String),

    #[error("This command cannot be used in private messages.")]
    NoPrivateMessage,

    #[error("You don't have permission to use this command.")]
    CheckFailure,
}

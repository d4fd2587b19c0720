use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TimewarpError {
    /// The condition never became true before the deadline. Catching this is the
    /// supported way to assert that something did NOT happen within a window.
    #[error("condition not satisfied within {0:?}")]
    Timeout(Duration),

    /// Configuration was attempted after the interrupter's timer had started.
    #[error("interrupter already started; configuration is immutable once armed")]
    AlreadyStarted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TimewarpError>;

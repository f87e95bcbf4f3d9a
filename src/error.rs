use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// None of these is fatal to the control loop: every variant ends up as a
/// status line (`err ...`) or a log entry and the loop keeps ticking.
#[expect(missing_docs, reason = "The variants are self-explanatory.")]
#[derive(Debug, Display, Error, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("unknown command")]
    UnknownCommand,

    #[display("empty command")]
    EmptyCommand,

    #[display("missing argument: {_0}")]
    MissingArgument(#[error(not(source))] &'static str),

    #[display("invalid argument: {_0}")]
    InvalidArgument(#[error(not(source))] &'static str),

    #[display("unexpected argument after command")]
    TrailingArgument,

    #[display("joint {_0} is not configured")]
    InvalidJoint(#[error(not(source))] i32),

    #[display("dur {_0} rejected: must be within 100..=10000 ms")]
    DurationOutOfRange(#[error(not(source))] u64),

    #[display("PWM write failed on channel {_0}")]
    PwmWrite(#[error(not(source))] u8),

    #[display("bus write failed for servo {_0}")]
    BusWrite(#[error(not(source))] u8),
}

#[cfg(any(feature = "pico1", feature = "pico2"))]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}

use std::io;
use std::path::PathBuf;

/// Everything that can go wrong while building, loading or running a Chip-8.
///
/// Load-time errors (`InvalidConfig` through `FontTooLarge`) come from
/// constructing a machine or filling its memory. The rest are faults raised by
/// a single `step`; a faulted step leaves the machine as it was before the
/// step began so the host can inspect it or carry on.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not allocate {size} entries for the {buffer}")]
    AllocationFailure { buffer: &'static str, size: usize },

    #[error("could not open program file {path:?}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read program: {0}")]
    Io(#[from] io::Error),

    #[error("program is too big to load into memory ({size} bytes, room for {max})")]
    ProgramTooLarge { size: usize, max: usize },

    #[error("font is too big to load into memory ({size} bytes, room for {max})")]
    FontTooLarge { size: usize, max: usize },

    #[error("memory access out of bounds at {address:#06X}")]
    OutOfBounds { address: usize },

    #[error("stack overflow: call with {depth} return addresses already on the stack")]
    StackOverflow { depth: usize },

    #[error("stack underflow: return with an empty call stack")]
    StackUnderflow,

    #[error("wait for key press was cancelled")]
    KeyWaitCancelled,
}

pub type Result<T> = std::result::Result<T, Error>;

use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    InvalidDimension { reason: &'static str },
    SizeMismatch { expected: usize, actual: usize },
    OutOfRange { index: usize, len: usize },
    BlockOutOfRange { origin: [usize; 3], span: [usize; 3] },
    ValueOutOfDomain { index: usize, value: u32 },
    DegenerateWorkload { level: usize },
    InvalidDescriptor { level: usize, index: usize },
    WorkerFailed { worker: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDimension { reason } => write!(f, "invalid dimension: {reason}"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::OutOfRange { index, len } => {
                write!(f, "index {index} out of range for grid of {len} cells")
            }
            Self::BlockOutOfRange { origin, span } => {
                write!(f, "block at {origin:?} with span {span:?} leaves the grid")
            }
            Self::ValueOutOfDomain { index, value } => {
                write!(f, "value {value} at index {index} is outside 0..=255")
            }
            Self::DegenerateWorkload { level } => {
                write!(f, "level {level} has no blocks to downsample")
            }
            Self::InvalidDescriptor { level, index } => {
                write!(f, "descriptor for level {level} index {index} does not match its slot")
            }
            Self::WorkerFailed { worker } => write!(f, "worker {worker} panicked"),
        }
    }
}

impl std::error::Error for Error {}

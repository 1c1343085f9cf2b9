pub mod types;
pub mod classification;

pub use types::RelayError;
pub use classification::{ErrorClassification, ErrorKind};

pub mod log_setup;
pub mod parallel;
pub mod serde_format;

pub use parallel::CancelToken;
pub use serde_format::SerdeFormat;

pub use tiller_types::error::{Error, TlResult};
pub use tiller_types::types::Timestamp;

pub use tracing::{debug, error, info, warn};

// vim: ts=4

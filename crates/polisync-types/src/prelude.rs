pub use crate::error::{Error, PsResult};
pub use crate::types::{FlatSettings, Patch, QueryArgs, RevStamp, SettingValue};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4

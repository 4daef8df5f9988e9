pub use polisync_types::prelude::*;

// vim: ts=4

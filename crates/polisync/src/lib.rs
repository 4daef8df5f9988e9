//! Polisync engine. Models a hierarchical access-policy configuration and
//! synchronizes it against a remote authority that exposes it as a flat
//! path-keyed namespace plus a separately-ordered, revision-guarded link list.
//!
//! The engine is transport-agnostic: all remote access goes through the
//! [`polisync_types::policy_store::PolicyStore`] trait, and every operation is
//! a strict sequence of local computation and store calls.

pub mod codec;
pub mod links;
pub mod policy;
pub mod rules;
pub mod settings;

mod prelude;

pub use codec::SettingFault;
pub use policy::{
	PolicyDocument, PolicyDraft, PolicyService, WriteError, WriteReceipt, WriteStage,
};
pub use polisync_types::error::{Error, PsResult};

// vim: ts=4

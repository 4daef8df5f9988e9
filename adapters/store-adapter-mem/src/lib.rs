//! In-memory policy store adapter.
//!
//! Faithful to the remote authority's concurrency contract: every settings
//! document and the global link list carry monotonically issued revision
//! stamps, and a submission presenting a stale stamp is rejected with
//! `ConcurrentModification`. Used by the engine's integration tests and for
//! local development; nothing is persisted.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use polisync::error::{Error, PsResult};
use polisync::link::PolicyLink;
use polisync::policy_store::{
	LinkList, LinkListWrite, PolicyStore, SettingsDocument, SettingsWriteRequest,
};
use polisync::prelude::warn;
use polisync::types::{FlatSettings, QueryArgs, RevStamp};

#[derive(Debug, Default)]
struct DocumentSlot {
	settings: FlatSettings,
	rev: u64,
}

#[derive(Debug, Default)]
struct State {
	documents: HashMap<Box<str>, DocumentSlot>,
	links: Vec<PolicyLink>,
	links_rev: u64,
}

/// Lock-guarded in-memory store state
#[derive(Debug, Default)]
pub struct PolicyStoreMem {
	state: RwLock<State>,
}

impl PolicyStoreMem {
	pub fn new() -> Self {
		Self::default()
	}

	/// Stamps are opaque to callers; internally they are the decimal revision
	fn stamp(rev: u64) -> RevStamp {
		RevStamp(rev.to_string().into())
	}

	/// Seed a settings document directly, bypassing revision checks
	pub fn seed_document(&self, path: &str, settings: FlatSettings) {
		let mut state = self.state.write();
		state.documents.insert(path.into(), DocumentSlot { settings, rev: 1 });
	}

	/// Seed the link list directly, bypassing revision checks
	pub fn seed_links(&self, links: Vec<PolicyLink>) {
		let mut state = self.state.write();
		state.links = links;
		state.links_rev += 1;
	}

	pub fn document_names(&self) -> Vec<Box<str>> {
		let state = self.state.read();
		let mut names: Vec<Box<str>> = state.documents.keys().cloned().collect();
		names.sort();
		names
	}

	pub fn links_snapshot(&self) -> Vec<PolicyLink> {
		self.state.read().links.clone()
	}

	pub fn links_rev_stamp(&self) -> RevStamp {
		Self::stamp(self.state.read().links_rev)
	}
}

#[async_trait]
impl PolicyStore for PolicyStoreMem {
	async fn fetch_settings(&self, name: &str, _args: &QueryArgs) -> PsResult<SettingsDocument> {
		let state = self.state.read();
		let slot = state.documents.get(name).ok_or(Error::NotFound)?;
		Ok(SettingsDocument { settings: slot.settings.clone(), rev_stamp: Self::stamp(slot.rev) })
	}

	async fn submit_settings(
		&self,
		write: &SettingsWriteRequest,
		_args: &QueryArgs,
	) -> PsResult<()> {
		let mut state = self.state.write();
		let policy = &write.policy;

		if let Some(slot) = state.documents.get_mut(policy.path.as_ref()) {
			if policy.new_policy {
				return Err(Error::StoreError(format!("policy {} already exists", policy.path)));
			}
			match &policy.rev_stamp {
				Some(stamp) if *stamp == Self::stamp(slot.rev) => {}
				Some(stamp) => {
					warn!("stale settings stamp {} for {}", stamp, policy.path);
					return Err(Error::ConcurrentModification);
				}
				None => return Err(Error::StoreError("missing revision stamp".into())),
			}
			slot.settings = policy.settings.clone();
			slot.rev += 1;
			return Ok(());
		}

		if !policy.new_policy {
			return Err(Error::NotFound);
		}
		state
			.documents
			.insert(policy.path.clone(), DocumentSlot { settings: policy.settings.clone(), rev: 1 });
		Ok(())
	}

	async fn delete_settings(&self, name: &str, _args: &QueryArgs) -> PsResult<()> {
		let mut state = self.state.write();
		state.documents.remove(name).map(|_| ()).ok_or(Error::NotFound)
	}

	async fn fetch_links(&self, _args: &QueryArgs) -> PsResult<LinkList> {
		let state = self.state.read();
		Ok(LinkList { links: state.links.clone(), rev_stamp: Self::stamp(state.links_rev) })
	}

	async fn submit_links(&self, write: &LinkListWrite, _args: &QueryArgs) -> PsResult<()> {
		let mut state = self.state.write();
		if write.rev_stamp != Self::stamp(state.links_rev) {
			warn!("stale link list stamp {}", write.rev_stamp);
			return Err(Error::ConcurrentModification);
		}
		state.links = write.plinks.clone();
		state.links_rev += 1;
		Ok(())
	}
}

// vim: ts=4

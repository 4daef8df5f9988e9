//! Policy orchestration: sequences validation, the path codec and link
//! reconciliation around the store collaborator.
//!
//! Create and Update each touch two independently versioned remote resources
//! (the settings document and the global link list) with no cross-resource
//! transaction. A succeeded first half is never rolled back when the second
//! half fails; instead every outcome reports exactly which halves were
//! mutated, so callers can recover deliberately.

use std::sync::Arc;

use crate::codec::{self, SettingFault};
use crate::links::LinkReconciler;
use crate::prelude::*;
use crate::rules;
use crate::settings::PolicySettings;
use polisync_types::link::{LinkType, LinkUpdate, PolicyLink};
use polisync_types::policy_store::{PolicyStore, SettingsWrite, SettingsWriteRequest};

/// One policy document as read back from the store
#[derive(Debug, Clone)]
pub struct PolicyDocument {
	pub path: Box<str>,
	/// Stamp of the settings document (not the link list)
	pub rev_stamp: RevStamp,
	pub settings: PolicySettings,
	/// Groups the store returned in a shape the tree cannot hold
	pub faults: Vec<SettingFault>,
	/// This policy's entry in the global ordered link list, if any
	pub link: Option<PolicyLink>,
	/// Zero-based evaluation position of that entry
	pub position: Option<usize>,
}

/// Caller input for creating a policy document plus its link entry
#[derive(Debug, Clone)]
pub struct PolicyDraft {
	/// Path identity of the document; doubles as the link id
	pub path: Box<str>,
	pub settings: PolicySettings,
	pub description: Box<str>,
	pub enable_compliant: bool,
	pub link_type: LinkType,
	pub policy_set: Box<str>,
	pub params: Vec<Box<str>>,
}

/// Which sub-operation of a two-resource write failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
	Validate,
	SubmitSettings,
	ReconcileLinks,
}

impl WriteStage {
	fn as_str(self) -> &'static str {
		match self {
			WriteStage::Validate => "validation",
			WriteStage::SubmitSettings => "settings submission",
			WriteStage::ReconcileLinks => "link reconciliation",
		}
	}
}

/// A write failure, carrying which halves of the two-resource write landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
	pub stage: WriteStage,
	pub settings_written: bool,
	pub links_written: bool,
	pub source: Error,
}

impl WriteError {
	fn at(stage: WriteStage, settings_written: bool, source: Error) -> Self {
		WriteError { stage, settings_written, links_written: false, source }
	}
}

impl std::fmt::Display for WriteError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} failed (settings {}, links {}): {}",
			self.stage.as_str(),
			if self.settings_written { "written" } else { "untouched" },
			if self.links_written { "written" } else { "untouched" },
			self.source
		)
	}
}

impl std::error::Error for WriteError {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.source)
	}
}

/// Receipt of a completed two-resource write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReceipt {
	pub settings_written: bool,
	pub links_written: bool,
}

/// The facade callers use for policy CRUD.
///
/// Stateless between calls: every operation fetches what it needs, computes in
/// memory and submits, with no caching and no background refresh.
#[derive(Debug, Clone)]
pub struct PolicyService {
	store: Arc<dyn PolicyStore>,
	args: QueryArgs,
}

impl PolicyService {
	pub fn new(store: Arc<dyn PolicyStore>) -> Self {
		Self::with_args(store, QueryArgs::default())
	}

	pub fn with_args(store: Arc<dyn PolicyStore>, args: QueryArgs) -> Self {
		Self { store, args }
	}

	/// Read one policy document plus its ordering metadata.
	///
	/// Malformed groups are reported in `faults` alongside the groups that did
	/// decode; the caller decides how strict to be.
	pub async fn read(&self, path: &str) -> PsResult<PolicyDocument> {
		let document = self.store.fetch_settings(path, &self.args).await?;
		let (settings, faults) = codec::unflatten(&document.settings);
		for fault in &faults {
			warn!("reading {}: {}", path, fault);
		}

		let list = self.store.fetch_links(&self.args).await?;
		let position = list.links.iter().position(|l| &*l.id == path);
		let link = position.map(|idx| list.links[idx].clone());

		Ok(PolicyDocument {
			path: path.into(),
			rev_stamp: document.rev_stamp,
			settings,
			faults,
			link,
			position,
		})
	}

	/// Create the settings document, then prepend its link entry.
	pub async fn create(&self, draft: &PolicyDraft) -> Result<WriteReceipt, WriteError> {
		rules::validate(&draft.settings)
			.map_err(|err| WriteError::at(WriteStage::Validate, false, err))?;

		let write = SettingsWriteRequest {
			policy: SettingsWrite {
				path: draft.path.clone(),
				settings: codec::flatten(&draft.settings),
				rev_stamp: None,
				new_policy: true,
			},
		};
		self.store
			.submit_settings(&write, &self.args)
			.await
			.map_err(|err| WriteError::at(WriteStage::SubmitSettings, false, err))?;

		let link = PolicyLink {
			id: draft.path.clone(),
			description: draft.description.clone(),
			enable_compliant: draft.enable_compliant,
			link_type: draft.link_type,
			policy_set: draft.policy_set.clone(),
			params: draft.params.clone(),
		};
		LinkReconciler::new(&*self.store, self.args)
			.insert(link)
			.await
			.map_err(|err| WriteError::at(WriteStage::ReconcileLinks, true, err))?;

		info!("created policy {}", draft.path);
		Ok(WriteReceipt { settings_written: true, links_written: true })
	}

	/// Update the settings document, then replace its link entry in place.
	///
	/// The document's current revision stamp is re-read immediately before the
	/// submission so the store can detect concurrent settings edits.
	pub async fn update(
		&self,
		path: &str,
		settings: &PolicySettings,
		link: &LinkUpdate,
	) -> Result<WriteReceipt, WriteError> {
		rules::validate(settings)
			.map_err(|err| WriteError::at(WriteStage::Validate, false, err))?;

		let current = self
			.store
			.fetch_settings(path, &self.args)
			.await
			.map_err(|err| WriteError::at(WriteStage::SubmitSettings, false, err))?;

		let write = SettingsWriteRequest {
			policy: SettingsWrite {
				path: path.into(),
				settings: codec::flatten(settings),
				rev_stamp: Some(current.rev_stamp),
				new_policy: false,
			},
		};
		self.store
			.submit_settings(&write, &self.args)
			.await
			.map_err(|err| WriteError::at(WriteStage::SubmitSettings, false, err))?;

		if link.is_empty() {
			debug!("updated policy {} without touching its link", path);
			return Ok(WriteReceipt { settings_written: true, links_written: false });
		}

		LinkReconciler::new(&*self.store, self.args)
			.replace(path, link)
			.await
			.map_err(|err| WriteError::at(WriteStage::ReconcileLinks, true, err))?;

		info!("updated policy {}", path);
		Ok(WriteReceipt { settings_written: true, links_written: true })
	}

	/// Remove the settings document by its path identity.
	///
	/// The link entry is independently owned and is NOT removed here; callers
	/// that want the binding gone reorder or clean it up through the link
	/// list's own lifecycle.
	pub async fn delete(&self, path: &str) -> PsResult<()> {
		self.store.delete_settings(path, &self.args).await?;
		info!("deleted policy {} (link entry left in place)", path);
		Ok(())
	}

	/// Reorder the global link list to the caller-supplied id order.
	pub async fn reorder(&self, ids: &[&str]) -> PsResult<()> {
		LinkReconciler::new(&*self.store, self.args).reorder(ids).await
	}
}

// vim: ts=4

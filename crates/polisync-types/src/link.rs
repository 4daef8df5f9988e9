//! Policy-to-principal binding records.
//!
//! Links form one global ordered list per tenant; position encodes evaluation
//! priority (first match wins in the policy engine this configuration drives).

use serde::{Deserialize, Serialize};

use crate::types::Patch;

/// Scope a policy link binds to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkType {
	/// Applies to every principal
	Global,
	/// Applies to the principals holding a role
	Role,
	/// Applies to the members of a collection
	Collection,
	/// Retained in the list but not evaluated
	Inactive,
}

/// One binding of a policy document to a principal scope.
///
/// Identity is `id`, conventionally the policy's path (e.g. `/Policy/<name>`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyLink {
	#[serde(rename = "ID")]
	pub id: Box<str>,
	#[serde(rename = "Description", default)]
	pub description: Box<str>,
	#[serde(rename = "EnableCompliant", default)]
	pub enable_compliant: bool,
	#[serde(rename = "LinkType")]
	pub link_type: LinkType,
	#[serde(rename = "PolicySet", default)]
	pub policy_set: Box<str>,
	#[serde(rename = "Params", default)]
	pub params: Vec<Box<str>>,
}

/// Partial update for a replace-in-place reconciliation.
///
/// Only the fields a caller may change are present; `id` is identity and
/// `enable_compliant` is owned by the compliance subsystem. Undefined fields
/// leave the matched entry byte-for-byte unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkUpdate {
	pub description: Patch<Box<str>>,
	pub link_type: Patch<LinkType>,
	pub policy_set: Patch<Box<str>>,
	pub params: Patch<Vec<Box<str>>>,
}

impl LinkUpdate {
	pub fn is_empty(&self) -> bool {
		self.description.is_undefined()
			&& self.link_type.is_undefined()
			&& self.policy_set.is_undefined()
			&& self.params.is_undefined()
	}

	/// Apply the supplied fields to `link`, leaving the rest untouched
	pub fn apply_to(&self, link: &mut PolicyLink) {
		self.description.apply_to(&mut link.description);
		self.link_type.apply_to(&mut link.link_type);
		self.policy_set.apply_to(&mut link.policy_set);
		self.params.apply_to(&mut link.params);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_update_applies_only_supplied_fields() {
		let mut link = PolicyLink {
			id: "/Policy/a".into(),
			description: "old".into(),
			enable_compliant: true,
			link_type: LinkType::Role,
			policy_set: "default".into(),
			params: vec!["admins".into()],
		};

		let update = LinkUpdate {
			description: Patch::Value("new".into()),
			params: Patch::Value(vec![]),
			..Default::default()
		};
		assert!(!update.is_empty());
		update.apply_to(&mut link);

		assert_eq!(&*link.description, "new");
		assert!(link.params.is_empty());
		// Unsupplied fields keep their values
		assert_eq!(link.link_type, LinkType::Role);
		assert_eq!(&*link.policy_set, "default");
		assert!(link.enable_compliant);
	}

	#[test]
	fn test_default_update_is_empty() {
		assert!(LinkUpdate::default().is_empty());
	}
}

// vim: ts=4

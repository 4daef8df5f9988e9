//! Adapter trait for the remote policy authority, and the wire payloads it speaks.
//!
//! The authority exposes two logically related but independently versioned
//! resources: the flat settings document of each policy, and the single global
//! ordered list of policy links. Each carries its own revision stamp.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::fmt::Debug;

use crate::error::PsResult;
use crate::link::PolicyLink;
use crate::types::{FlatSettings, QueryArgs, RevStamp};

/// Request body for a settings read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsReadRequest {
	#[serde(rename = "name")]
	pub name: Box<str>,
}

/// One policy's settings document as returned by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsDocument {
	#[serde(rename = "Settings")]
	pub settings: FlatSettings,
	#[serde(rename = "RevStamp")]
	pub rev_stamp: RevStamp,
}

/// Inner settings write payload.
///
/// `rev_stamp` is absent for a create (`new_policy: true`) and carries the
/// document's current stamp for an update, so the store can detect concurrent
/// settings edits.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsWrite {
	#[serde(rename = "Path")]
	pub path: Box<str>,
	#[serde(rename = "Settings")]
	pub settings: FlatSettings,
	#[serde(rename = "RevStamp")]
	pub rev_stamp: Option<RevStamp>,
	#[serde(rename = "Newpolicy")]
	pub new_policy: bool,
}

/// Request envelope for a settings write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsWriteRequest {
	#[serde(rename = "policy")]
	pub policy: SettingsWrite,
}

/// One row of the link list response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkRow {
	#[serde(rename = "Row")]
	pub row: PolicyLink,
}

/// Link list read response as it appears on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkListResponse {
	#[serde(rename = "Results")]
	pub results: Vec<LinkRow>,
	#[serde(rename = "RevStamp")]
	pub rev_stamp: RevStamp,
}

/// Decoded link list: the ordered records plus the stamp guarding them
#[derive(Debug, Clone, PartialEq)]
pub struct LinkList {
	pub links: Vec<PolicyLink>,
	pub rev_stamp: RevStamp,
}

impl From<LinkListResponse> for LinkList {
	fn from(response: LinkListResponse) -> Self {
		LinkList {
			links: response.results.into_iter().map(|r| r.row).collect(),
			rev_stamp: response.rev_stamp,
		}
	}
}

impl From<LinkList> for LinkListResponse {
	fn from(list: LinkList) -> Self {
		LinkListResponse {
			results: list.links.into_iter().map(|row| LinkRow { row }).collect(),
			rev_stamp: list.rev_stamp,
		}
	}
}

/// Request body for a link list write; `plinks` is the full desired order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkListWrite {
	#[serde(rename = "Plinks")]
	pub plinks: Vec<PolicyLink>,
	#[serde(rename = "RevStamp")]
	pub rev_stamp: RevStamp,
}

/// Store collaborator holding the remote policy configuration.
///
/// Implementations own transport, authentication, timeouts and cancellation;
/// the engine issues strictly sequential calls and imposes no policy of its
/// own. Submitting with a stale revision stamp must fail with
/// `Error::ConcurrentModification` and must not be retried by the adapter.
#[async_trait]
pub trait PolicyStore: Debug + Send + Sync {
	/// # Settings documents
	async fn fetch_settings(&self, name: &str, args: &QueryArgs) -> PsResult<SettingsDocument>;
	async fn submit_settings(&self, write: &SettingsWriteRequest, args: &QueryArgs) -> PsResult<()>;
	async fn delete_settings(&self, name: &str, args: &QueryArgs) -> PsResult<()>;

	/// # The global ordered link list
	async fn fetch_links(&self, args: &QueryArgs) -> PsResult<LinkList>;
	async fn submit_links(&self, write: &LinkListWrite, args: &QueryArgs) -> PsResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::link::LinkType;
	use serde_json::json;

	#[test]
	fn test_settings_read_request_shape() {
		let request = SettingsReadRequest { name: "/Policy/lab".into() };
		assert_eq!(serde_json::to_value(&request).unwrap(), json!({ "name": "/Policy/lab" }));
	}

	#[test]
	fn test_settings_write_request_shape() {
		let mut settings = FlatSettings::new();
		settings.insert("/Core/Authentication/AllowIwa", true);

		let create = SettingsWriteRequest {
			policy: SettingsWrite {
				path: "/Policy/lab".into(),
				settings: settings.clone(),
				rev_stamp: None,
				new_policy: true,
			},
		};
		// A create carries no stamp at all, not a null one
		assert_eq!(
			serde_json::to_value(&create).unwrap(),
			json!({ "policy": {
				"Path": "/Policy/lab",
				"Settings": { "/Core/Authentication/AllowIwa": true },
				"Newpolicy": true,
			}})
		);

		let update = SettingsWriteRequest {
			policy: SettingsWrite {
				path: "/Policy/lab".into(),
				settings,
				rev_stamp: Some("17".into()),
				new_policy: false,
			},
		};
		assert_eq!(
			serde_json::to_value(&update).unwrap()["policy"]["RevStamp"],
			json!("17")
		);
	}

	#[test]
	fn test_link_list_response_decodes_in_order() {
		let body = json!({
			"Results": [
				{ "Row": { "ID": "/Policy/a", "LinkType": "Global" } },
				{ "Row": { "ID": "/Policy/b", "LinkType": "Collection",
					"Description": "lab", "Params": ["servers"] } },
			],
			"RevStamp": "5",
		});
		let list: LinkList =
			serde_json::from_value::<LinkListResponse>(body).unwrap().into();

		assert_eq!(list.rev_stamp, "5".into());
		assert_eq!(list.links.len(), 2);
		assert_eq!(&*list.links[0].id, "/Policy/a");
		assert_eq!(list.links[1].link_type, LinkType::Collection);
		assert_eq!(&*list.links[1].description, "lab");

		// Re-enveloping preserves order and stamp
		let envelope: LinkListResponse = list.clone().into();
		assert_eq!(envelope.results.len(), 2);
		assert_eq!(&*envelope.results[0].row.id, "/Policy/a");
		assert_eq!(envelope.rev_stamp, list.rev_stamp);
	}

	#[test]
	fn test_link_list_write_shape() {
		let write = LinkListWrite {
			plinks: vec![PolicyLink {
				id: "/Policy/a".into(),
				description: "".into(),
				enable_compliant: true,
				link_type: LinkType::Role,
				policy_set: "default".into(),
				params: vec!["admins".into()],
			}],
			rev_stamp: "9".into(),
		};
		let value = serde_json::to_value(&write).unwrap();
		assert_eq!(value["RevStamp"], json!("9"));
		assert_eq!(value["Plinks"][0]["ID"], json!("/Policy/a"));
		assert_eq!(value["Plinks"][0]["LinkType"], json!("Role"));
		assert_eq!(value["Plinks"][0]["EnableCompliant"], json!(true));
	}
}

// vim: ts=4

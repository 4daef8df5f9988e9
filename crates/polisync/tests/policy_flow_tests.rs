//! End-to-end policy flows against the in-memory store adapter

use async_trait::async_trait;
use std::sync::Arc;

use polisync::policy::{PolicyDraft, PolicyService, WriteStage};
use polisync::settings::{PasswordSettings, PolicySettings, SystemSet};
use polisync::Error;
use polisync_store_adapter_mem::PolicyStoreMem;
use polisync_types::error::PsResult;
use polisync_types::link::{LinkType, LinkUpdate, PolicyLink};
use polisync_types::policy_store::{
	LinkList, LinkListWrite, PolicyStore, SettingsDocument, SettingsWriteRequest,
};
use polisync_types::types::{Patch, QueryArgs};

fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

fn sample_settings() -> PolicySettings {
	PolicySettings {
		password_settings: Some(PasswordSettings {
			min_length: Some(8),
			max_length: Some(64),
			require_digit: Some(true),
			..Default::default()
		}),
		system_set: Some(SystemSet {
			allow_password_rotation: Some(true),
			password_rotate_duration: Some(30),
			..Default::default()
		}),
		..Default::default()
	}
}

fn draft(path: &str) -> PolicyDraft {
	PolicyDraft {
		path: path.into(),
		settings: sample_settings(),
		description: "managed by tests".into(),
		enable_compliant: false,
		link_type: LinkType::Collection,
		policy_set: "default".into(),
		params: vec!["servers".into()],
	}
}

fn link(id: &str, description: &str) -> PolicyLink {
	PolicyLink {
		id: id.into(),
		description: description.into(),
		enable_compliant: false,
		link_type: LinkType::Global,
		policy_set: "".into(),
		params: vec![],
	}
}

fn link_ids(links: &[PolicyLink]) -> Vec<&str> {
	links.iter().map(|l| &*l.id).collect()
}

#[tokio::test]
async fn test_create_writes_settings_and_prepends_link() {
	setup_test_logging();
	let store = Arc::new(PolicyStoreMem::new());
	store.seed_links(vec![link("/Policy/a", "a"), link("/Policy/b", "b")]);
	let service = PolicyService::new(store.clone());

	let receipt = service.create(&draft("/Policy/c")).await.unwrap();
	assert!(receipt.settings_written && receipt.links_written);

	let snapshot = store.links_snapshot();
	assert_eq!(link_ids(&snapshot), ["/Policy/c", "/Policy/a", "/Policy/b"]);

	let names = store.document_names();
	assert_eq!(names.len(), 1);
	assert_eq!(&*names[0], "/Policy/c");
}

#[tokio::test]
async fn test_read_round_trips_settings_and_ordering_metadata() {
	let store = Arc::new(PolicyStoreMem::new());
	let service = PolicyService::new(store.clone());
	service.create(&draft("/Policy/c")).await.unwrap();

	let doc = service.read("/Policy/c").await.unwrap();
	assert!(doc.faults.is_empty());
	assert_eq!(doc.settings, sample_settings());
	assert_eq!(doc.position, Some(0));
	assert_eq!(doc.link.map(|l| l.description), Some("managed by tests".into()));
}

#[tokio::test]
async fn test_update_replaces_only_supplied_link_fields() {
	let store = Arc::new(PolicyStoreMem::new());
	store.seed_links(vec![link("/Policy/b", "b")]);
	let service = PolicyService::new(store.clone());
	service.create(&draft("/Policy/a")).await.unwrap();
	let untouched = store
		.links_snapshot()
		.into_iter()
		.find(|l| &*l.id == "/Policy/b")
		.unwrap();

	let mut settings = sample_settings();
	settings.password_settings = Some(PasswordSettings {
		min_length: Some(12),
		max_length: Some(64),
		..Default::default()
	});
	let update =
		LinkUpdate { description: Patch::Value("tightened".into()), ..Default::default() };
	let receipt = service.update("/Policy/a", &settings, &update).await.unwrap();
	assert!(receipt.settings_written && receipt.links_written);

	let snapshot = store.links_snapshot();
	assert_eq!(link_ids(&snapshot), ["/Policy/a", "/Policy/b"]);
	assert_eq!(&*snapshot[0].description, "tightened");
	// Fields the caller did not supply keep their previous values
	assert_eq!(snapshot[0].link_type, LinkType::Collection);
	// The unrelated entry is byte-for-byte unchanged
	assert_eq!(snapshot[1], untouched);

	let doc = service.read("/Policy/a").await.unwrap();
	assert_eq!(doc.settings, settings);
}

#[tokio::test]
async fn test_update_with_empty_link_update_skips_the_link_list() {
	let store = Arc::new(PolicyStoreMem::new());
	let service = PolicyService::new(store.clone());
	service.create(&draft("/Policy/a")).await.unwrap();
	let before = store.links_rev_stamp();

	let receipt =
		service.update("/Policy/a", &sample_settings(), &LinkUpdate::default()).await.unwrap();
	assert!(receipt.settings_written);
	assert!(!receipt.links_written);
	assert_eq!(store.links_rev_stamp(), before);
}

#[tokio::test]
async fn test_validation_failure_makes_no_store_call() {
	let store = Arc::new(PolicyStoreMem::new());
	let service = PolicyService::new(store.clone());

	let mut bad = draft("/Policy/bad");
	bad.settings.password_settings = Some(PasswordSettings {
		min_length: Some(20),
		max_length: Some(8),
		..Default::default()
	});

	let err = service.create(&bad).await.unwrap_err();
	assert_eq!(err.stage, WriteStage::Validate);
	assert!(!err.settings_written && !err.links_written);
	let msg = err.source.to_string();
	assert!(msg.contains("PasswordSettings") && msg.contains("20") && msg.contains('8'));

	// Neither resource was touched
	assert!(store.document_names().is_empty());
	assert_eq!(&*store.links_rev_stamp().0, "0");
}

#[tokio::test]
async fn test_update_of_unlinked_policy_reports_partial_write() {
	let store = Arc::new(PolicyStoreMem::new());
	// Settings document exists, but no link entry: the link list is owned by
	// the remote authority and is never created implicitly by an update.
	store.seed_document("/Policy/orphan", polisync::codec::flatten(&sample_settings()));
	let service = PolicyService::new(store.clone());

	let update =
		LinkUpdate { description: Patch::Value("nope".into()), ..Default::default() };
	let err = service.update("/Policy/orphan", &sample_settings(), &update).await.unwrap_err();

	assert_eq!(err.stage, WriteStage::ReconcileLinks);
	assert!(err.settings_written, "settings half landed before the link failure");
	assert!(!err.links_written);
	assert_eq!(err.source, Error::LinkNotFound("/Policy/orphan".into()));
	assert!(store.links_snapshot().is_empty());
}

#[tokio::test]
async fn test_delete_leaves_the_link_entry_in_place() {
	let store = Arc::new(PolicyStoreMem::new());
	let service = PolicyService::new(store.clone());
	service.create(&draft("/Policy/a")).await.unwrap();

	service.delete("/Policy/a").await.unwrap();
	assert!(store.document_names().is_empty());
	// The binding is independently owned and must survive the delete
	assert_eq!(link_ids(&store.links_snapshot()), ["/Policy/a"]);
}

#[tokio::test]
async fn test_reorder_applies_caller_order() {
	let store = Arc::new(PolicyStoreMem::new());
	store.seed_links(vec![
		link("/Policy/a", "a"),
		link("/Policy/b", "b"),
		link("/Policy/c", "c"),
	]);
	let service = PolicyService::new(store.clone());

	service.reorder(&["/Policy/b", "/Policy/a", "/Policy/c"]).await.unwrap();
	assert_eq!(link_ids(&store.links_snapshot()), ["/Policy/b", "/Policy/a", "/Policy/c"]);

	let err = service.reorder(&["/Policy/b"]).await.unwrap_err();
	assert_eq!(err, Error::CardinalityMismatch { expected: 3, actual: 1 });
}

/// Wrapper that simulates a concurrent writer landing between the engine's
/// link fetch and its submit: the fetched stamp is stale by the time it is
/// presented back.
#[derive(Debug, Default)]
struct RacingStore {
	inner: PolicyStoreMem,
}

#[async_trait]
impl PolicyStore for RacingStore {
	async fn fetch_settings(&self, name: &str, args: &QueryArgs) -> PsResult<SettingsDocument> {
		self.inner.fetch_settings(name, args).await
	}

	async fn submit_settings(
		&self,
		write: &SettingsWriteRequest,
		args: &QueryArgs,
	) -> PsResult<()> {
		self.inner.submit_settings(write, args).await
	}

	async fn delete_settings(&self, name: &str, args: &QueryArgs) -> PsResult<()> {
		self.inner.delete_settings(name, args).await
	}

	async fn fetch_links(&self, args: &QueryArgs) -> PsResult<LinkList> {
		let list = self.inner.fetch_links(args).await?;
		// The concurrent writer advances the revision right after our fetch
		self.inner.seed_links(list.links.clone());
		Ok(list)
	}

	async fn submit_links(&self, write: &LinkListWrite, args: &QueryArgs) -> PsResult<()> {
		self.inner.submit_links(write, args).await
	}
}

#[tokio::test]
async fn test_lost_race_surfaces_concurrent_modification_without_retry() {
	let store = Arc::new(RacingStore::default());
	store.inner.seed_links(vec![link("/Policy/a", "a")]);
	let service = PolicyService::new(store.clone());

	let err = service.create(&draft("/Policy/c")).await.unwrap_err();
	assert_eq!(err.stage, WriteStage::ReconcileLinks);
	assert!(err.settings_written, "the settings half landed before the race");
	assert_eq!(err.source, Error::ConcurrentModification);

	// No retry happened: the winner's list is untouched by us
	assert_eq!(link_ids(&store.inner.links_snapshot()), ["/Policy/a"]);
}

// vim: ts=4

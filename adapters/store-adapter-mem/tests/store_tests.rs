//! Revision-stamp and CRUD behavior of the in-memory store adapter

use polisync::error::Error;
use polisync::link::{LinkType, PolicyLink};
use polisync::policy_store::{
	LinkListWrite, PolicyStore, SettingsWrite, SettingsWriteRequest,
};
use polisync::types::{FlatSettings, QueryArgs, RevStamp};
use polisync_store_adapter_mem::PolicyStoreMem;

fn args() -> QueryArgs {
	QueryArgs::default()
}

fn sample_settings() -> FlatSettings {
	let mut flat = FlatSettings::new();
	flat.insert("/Core/Authentication/AllowIwa", true);
	flat.insert("/Core/Security/CDS/PasswordPolicy/MinLength", 8i64);
	flat
}

fn write(path: &str, new_policy: bool, rev_stamp: Option<RevStamp>) -> SettingsWriteRequest {
	SettingsWriteRequest {
		policy: SettingsWrite {
			path: path.into(),
			settings: sample_settings(),
			rev_stamp,
			new_policy,
		},
	}
}

fn link(id: &str) -> PolicyLink {
	PolicyLink {
		id: id.into(),
		description: "".into(),
		enable_compliant: false,
		link_type: LinkType::Global,
		policy_set: "".into(),
		params: vec![],
	}
}

#[tokio::test]
async fn test_create_then_fetch() {
	let store = PolicyStoreMem::new();
	store.submit_settings(&write("/Policy/a", true, None), &args()).await.unwrap();

	let doc = store.fetch_settings("/Policy/a", &args()).await.unwrap();
	assert_eq!(doc.settings, sample_settings());

	let names = store.document_names();
	assert_eq!(names.len(), 1);
	assert_eq!(&*names[0], "/Policy/a");
}

#[tokio::test]
async fn test_create_existing_path_fails() {
	let store = PolicyStoreMem::new();
	store.submit_settings(&write("/Policy/a", true, None), &args()).await.unwrap();

	let err = store.submit_settings(&write("/Policy/a", true, None), &args()).await.unwrap_err();
	assert!(matches!(err, Error::StoreError(_)));
}

#[tokio::test]
async fn test_update_requires_fresh_stamp() {
	let store = PolicyStoreMem::new();
	store.submit_settings(&write("/Policy/a", true, None), &args()).await.unwrap();

	let stamp = store.fetch_settings("/Policy/a", &args()).await.unwrap().rev_stamp;
	store.submit_settings(&write("/Policy/a", false, Some(stamp.clone())), &args())
		.await
		.unwrap();

	// The same stamp is now stale
	let err = store
		.submit_settings(&write("/Policy/a", false, Some(stamp)), &args())
		.await
		.unwrap_err();
	assert_eq!(err, Error::ConcurrentModification);
}

#[tokio::test]
async fn test_update_missing_document_fails() {
	let store = PolicyStoreMem::new();
	let err = store
		.submit_settings(&write("/Policy/ghost", false, Some("1".into())), &args())
		.await
		.unwrap_err();
	assert_eq!(err, Error::NotFound);
}

#[tokio::test]
async fn test_delete_unknown_fails() {
	let store = PolicyStoreMem::new();
	assert_eq!(store.delete_settings("/Policy/ghost", &args()).await.unwrap_err(), Error::NotFound);
}

#[tokio::test]
async fn test_stale_link_stamp_is_rejected_and_loser_changes_nothing() {
	let store = PolicyStoreMem::new();
	store.seed_links(vec![link("/Policy/a"), link("/Policy/b")]);

	// Both writers fetch the same revision
	let ours = store.fetch_links(&args()).await.unwrap();
	let theirs = store.fetch_links(&args()).await.unwrap();

	// The concurrent writer lands first
	let winner = LinkListWrite {
		plinks: vec![link("/Policy/b"), link("/Policy/a")],
		rev_stamp: theirs.rev_stamp,
	};
	store.submit_links(&winner, &args()).await.unwrap();

	// Our stamp is now stale; the submission fails and the winner's order stays
	let loser = LinkListWrite { plinks: vec![link("/Policy/a")], rev_stamp: ours.rev_stamp };
	assert_eq!(store.submit_links(&loser, &args()).await.unwrap_err(), Error::ConcurrentModification);

	let snapshot = store.links_snapshot();
	let ids: Vec<&str> = snapshot.iter().map(|l| &*l.id).collect();
	assert_eq!(ids, ["/Policy/b", "/Policy/a"]);
}

// vim: ts=4

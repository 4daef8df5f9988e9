//! Ordered link list reconciliation under optimistic concurrency.
//!
//! Every write is one fetch-then-submit pair: the server's current ordered
//! list and its revision stamp are fetched, the change is merged in memory,
//! and the result is submitted with the SAME stamp. Entries the caller does
//! not know about are preserved, order included. There is deliberately no
//! retry on a stale-stamp rejection: re-running a merge against state that
//! changed underneath could stamp a different order than intended, so the
//! failure is surfaced and the caller restarts from a fresh fetch.

use itertools::Itertools;
use std::collections::HashMap;

use crate::prelude::*;
use polisync_types::link::{LinkUpdate, PolicyLink};
use polisync_types::policy_store::{LinkListWrite, PolicyStore};

pub struct LinkReconciler<'a> {
	store: &'a dyn PolicyStore,
	args: QueryArgs,
}

impl<'a> LinkReconciler<'a> {
	pub fn new(store: &'a dyn PolicyStore, args: QueryArgs) -> Self {
		Self { store, args }
	}

	/// Insert `link` at position 0 of the server list.
	///
	/// New policies outrank previously existing ones by default (evaluation is
	/// most-specific-first); callers wanting another position reorder
	/// afterwards.
	pub async fn insert(&self, link: PolicyLink) -> PsResult<()> {
		let list = self.store.fetch_links(&self.args).await?;
		debug!("link insert: {} -> {} entries", list.links.len(), list.links.len() + 1);
		let write =
			LinkListWrite { plinks: merge_insert(list.links, link), rev_stamp: list.rev_stamp };
		self.store.submit_links(&write, &self.args).await
	}

	/// Replace caller-supplied fields on the entry matching `id`, in place.
	///
	/// The remote authority is the source of truth for existence: a missing id
	/// fails with `LinkNotFound` and is never created implicitly.
	pub async fn replace(&self, id: &str, update: &LinkUpdate) -> PsResult<()> {
		let list = self.store.fetch_links(&self.args).await?;
		let write = LinkListWrite {
			plinks: merge_replace(list.links, id, update)?,
			rev_stamp: list.rev_stamp,
		};
		self.store.submit_links(&write, &self.args).await
	}

	/// Emit the server records in the caller-supplied id order.
	pub async fn reorder(&self, ids: &[&str]) -> PsResult<()> {
		let list = self.store.fetch_links(&self.args).await?;
		let write = LinkListWrite {
			plinks: merge_reorder(list.links, ids)?,
			rev_stamp: list.rev_stamp,
		};
		self.store.submit_links(&write, &self.args).await
	}
}

/// Prepend `link`; every existing entry keeps its relative position
pub fn merge_insert(mut server: Vec<PolicyLink>, link: PolicyLink) -> Vec<PolicyLink> {
	server.insert(0, link);
	server
}

/// Apply `update` to the entry matching `id`; everything else is untouched
pub fn merge_replace(
	mut server: Vec<PolicyLink>,
	id: &str,
	update: &LinkUpdate,
) -> PsResult<Vec<PolicyLink>> {
	let Some(entry) = server.iter_mut().find(|l| &*l.id == id) else {
		return Err(Error::LinkNotFound(id.into()));
	};
	update.apply_to(entry);
	Ok(server)
}

/// Resolve each id against the server list and emit in caller order.
///
/// Order-only: the id set must match the server list exactly in cardinality,
/// with no duplicates and no unknown ids. Inserts and deletes go through their
/// own operations.
pub fn merge_reorder(server: Vec<PolicyLink>, ids: &[&str]) -> PsResult<Vec<PolicyLink>> {
	if ids.len() != server.len() {
		return Err(Error::CardinalityMismatch { expected: server.len(), actual: ids.len() });
	}
	if let Some(dup) = ids.iter().duplicates().next() {
		return Err(Error::ValidationError(format!("duplicate link id {} in reorder", dup)));
	}

	let mut by_id: HashMap<Box<str>, PolicyLink> =
		server.into_iter().map(|l| (l.id.clone(), l)).collect();
	ids.iter()
		.map(|id| by_id.remove(*id).ok_or_else(|| Error::LinkNotFound((*id).into())))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use polisync_types::link::LinkType;

	fn link(id: &str, description: &str) -> PolicyLink {
		PolicyLink {
			id: id.into(),
			description: description.into(),
			enable_compliant: false,
			link_type: LinkType::Collection,
			policy_set: "".into(),
			params: vec![],
		}
	}

	fn ids(links: &[PolicyLink]) -> Vec<&str> {
		links.iter().map(|l| &*l.id).collect()
	}

	#[test]
	fn test_insert_prepends() {
		let server = vec![link("/Policy/a", "a"), link("/Policy/b", "b")];
		let merged = merge_insert(server, link("/Policy/c", "c"));
		assert_eq!(ids(&merged), ["/Policy/c", "/Policy/a", "/Policy/b"]);
	}

	#[test]
	fn test_replace_touches_only_supplied_fields() {
		let server = vec![link("/Policy/a", "x"), link("/Policy/b", "b")];
		let untouched = server[1].clone();

		let update =
			LinkUpdate { description: Patch::Value("y".into()), ..Default::default() };
		let merged = merge_replace(server, "/Policy/a", &update).unwrap();

		assert_eq!(ids(&merged), ["/Policy/a", "/Policy/b"]);
		assert_eq!(&*merged[0].description, "y");
		// Fields the caller did not supply keep their server values
		assert_eq!(merged[0].link_type, LinkType::Collection);
		// The other entry is byte-for-byte the server record
		assert_eq!(merged[1], untouched);
	}

	#[test]
	fn test_replace_unknown_id_fails() {
		let server = vec![link("/Policy/a", "a")];
		let err = merge_replace(server, "/Policy/nope", &LinkUpdate::default()).unwrap_err();
		assert_eq!(err, Error::LinkNotFound("/Policy/nope".into()));
	}

	#[test]
	fn test_reorder_emits_caller_order() {
		let server = vec![link("/Policy/a", "a"), link("/Policy/b", "b"), link("/Policy/c", "c")];
		let merged = merge_reorder(server, &["/Policy/b", "/Policy/c", "/Policy/a"]).unwrap();
		assert_eq!(ids(&merged), ["/Policy/b", "/Policy/c", "/Policy/a"]);
		assert_eq!(&*merged[0].description, "b");
	}

	#[test]
	fn test_reorder_cardinality_mismatch_names_both_counts() {
		let server = vec![link("/Policy/a", "a"), link("/Policy/b", "b")];
		let err = merge_reorder(server, &["/Policy/a"]).unwrap_err();
		assert_eq!(err, Error::CardinalityMismatch { expected: 2, actual: 1 });
		let msg = err.to_string();
		assert!(msg.contains('1') && msg.contains('2'), "counts missing from: {}", msg);
	}

	#[test]
	fn test_reorder_rejects_duplicates_and_unknowns() {
		let server = vec![link("/Policy/a", "a"), link("/Policy/b", "b")];
		let err = merge_reorder(server.clone(), &["/Policy/a", "/Policy/a"]).unwrap_err();
		assert!(matches!(err, Error::ValidationError(_)));

		let err = merge_reorder(server, &["/Policy/a", "/Policy/zz"]).unwrap_err();
		assert_eq!(err, Error::LinkNotFound("/Policy/zz".into()));
	}
}

// vim: ts=4

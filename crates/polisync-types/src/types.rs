//! Common types used throughout the Polisync engine and its adapters.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// RevStamp //
//**********//

/// Opaque optimistic-concurrency token guarding a remote resource.
///
/// The engine never inspects the contents. It presents the freshest stamp it
/// fetched and lets the store reject stale ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RevStamp(pub Box<str>);

impl std::fmt::Display for RevStamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<&str> for RevStamp {
	fn from(s: &str) -> Self {
		RevStamp(s.into())
	}
}

impl Serialize for RevStamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(&self.0)
	}
}

impl<'de> Deserialize<'de> for RevStamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(RevStamp(Box::<str>::deserialize(deserializer)?))
	}
}

// SettingValue //
//**************//

/// One leaf value in the flat path namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)] // No type tag - shape is inferred from the path key on decode
pub enum SettingValue {
	Bool(bool), // Must be before Int to avoid bool -> int coercion
	Int(i64),
	String(String),
	Json(serde_json::Value),
}

impl SettingValue {
	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		match self {
			SettingValue::Bool(_) => "bool",
			SettingValue::Int(_) => "int",
			SettingValue::String(_) => "string",
			SettingValue::Json(_) => "json",
		}
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			SettingValue::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			SettingValue::Int(n) => Some(*n),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_json(&self) -> Option<&serde_json::Value> {
		match self {
			SettingValue::Json(v) => Some(v),
			_ => None,
		}
	}
}

impl From<bool> for SettingValue {
	fn from(v: bool) -> Self {
		SettingValue::Bool(v)
	}
}

impl From<i64> for SettingValue {
	fn from(v: i64) -> Self {
		SettingValue::Int(v)
	}
}

impl From<&str> for SettingValue {
	fn from(v: &str) -> Self {
		SettingValue::String(v.to_string())
	}
}

impl From<serde_json::Value> for SettingValue {
	fn from(v: serde_json::Value) -> Self {
		SettingValue::Json(v)
	}
}

// FlatSettings //
//**************//

/// Flat `path -> value` form of one policy document.
///
/// Path keys are opaque, slash-delimited, case-sensitive strings; the engine
/// composes them from compile-time constants and never parses their segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlatSettings(HashMap<String, SettingValue>);

impl FlatSettings {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, path: impl Into<String>, value: impl Into<SettingValue>) {
		self.0.insert(path.into(), value.into());
	}

	pub fn get(&self, path: &str) -> Option<&SettingValue> {
		self.0.get(path)
	}

	pub fn contains_key(&self, path: &str) -> bool {
		self.0.contains_key(path)
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
		self.0.iter()
	}
}

// Patch //
//*******//

/// Distinguishes "field not supplied" from any supplied value in a partial
/// update, so that absent fields leave the target untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch<T> {
	Undefined,
	Value(T),
}

// Hand-written: the derive would demand T: Default for no reason
impl<T> Default for Patch<T> {
	fn default() -> Self {
		Patch::Undefined
	}
}

impl<T> Patch<T> {
	pub fn is_undefined(&self) -> bool {
		matches!(self, Patch::Undefined)
	}

	/// Overwrite `slot` only when a value was supplied
	pub fn apply_to(&self, slot: &mut T)
	where
		T: Clone,
	{
		if let Patch::Value(v) = self {
			*slot = v.clone();
		}
	}
}

// QueryArgs //
//***********//

/// Store-call arguments threaded explicitly into every `PolicyStore` call.
///
/// Immutable by construction: callers build one value up front instead of
/// mutating shared defaults between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryArgs {
	/// Server-side response caching hint; -1 disables caching
	pub caching: i64,
}

impl Default for QueryArgs {
	fn default() -> Self {
		QueryArgs { caching: -1 }
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_setting_value_keeps_bools_out_of_ints() {
		// Untagged decode: bool must win over int coercion
		let v: SettingValue = serde_json::from_value(json!(true)).unwrap();
		assert_eq!(v, SettingValue::Bool(true));
		let v: SettingValue = serde_json::from_value(json!(42)).unwrap();
		assert_eq!(v, SettingValue::Int(42));
		let v: SettingValue = serde_json::from_value(json!("42")).unwrap();
		assert_eq!(v, SettingValue::String("42".into()));
		let v: SettingValue = serde_json::from_value(json!({ "Enabled": true })).unwrap();
		assert!(matches!(v, SettingValue::Json(_)));
	}

	#[test]
	fn test_flat_settings_round_trips_through_json() {
		let mut flat = FlatSettings::new();
		flat.insert("/Core/Authentication/AllowIwa", false);
		flat.insert("/PAS/SystemSet/DefaultCheckoutTime", 60i64);

		let encoded = serde_json::to_string(&flat).unwrap();
		let decoded: FlatSettings = serde_json::from_str(&encoded).unwrap();
		assert_eq!(decoded, flat);
	}

	#[test]
	fn test_patch_default_is_undefined() {
		let patch: Patch<bool> = Patch::default();
		assert!(patch.is_undefined());

		let mut slot = false;
		patch.apply_to(&mut slot);
		assert!(!slot);
		Patch::Value(true).apply_to(&mut slot);
		assert!(slot);
	}

	#[test]
	fn test_query_args_default_disables_caching() {
		assert_eq!(QueryArgs::default().caching, -1);
	}
}

// vim: ts=4

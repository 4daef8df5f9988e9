//! Challenge rule sets: structured leaf values selecting an authentication
//! profile from ordered match rules.
//!
//! A rule set travels as a single structured value at its path key. Rules and
//! their conditions are ordered sequences; the first matching rule wins, so
//! order must survive every encode/decode round-trip.

use serde::{Deserialize, Serialize};

/// One condition of a challenge rule: a filtered property compared to a value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeCondition {
	/// Property the rule filters on (e.g. "IpAddress", "Browser")
	#[serde(rename = "Prop")]
	pub filter: Box<str>,
	/// Comparison operator (e.g. "OpInCorpIpRange", "OpEqual")
	#[serde(rename = "Op")]
	pub operator: Box<str>,
	#[serde(rename = "Value", default)]
	pub value: Box<str>,
}

/// One ordered rule: all conditions must hold for the profile to be selected
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRule {
	#[serde(rename = "Conditions", default)]
	pub conditions: Vec<ChallengeCondition>,
	/// Authentication profile applied when the rule matches
	#[serde(rename = "ProfileId", default)]
	pub profile_id: Box<str>,
}

/// Ordered rule set with a fallback profile for when no rule matches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChallengeRuleSet {
	#[serde(rename = "Enabled", default)]
	pub enabled: bool,
	#[serde(rename = "DefaultProfileId", default)]
	pub default_profile_id: Box<str>,
	#[serde(rename = "Rules", default)]
	pub rules: Vec<ChallengeRule>,
}

// vim: ts=4

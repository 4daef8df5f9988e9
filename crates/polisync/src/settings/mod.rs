//! The typed, nested settings tree of one policy document.
//!
//! Every leaf is an `Option`: `None` means "not configured" and is excluded
//! from the flat form, while an explicit `Some(false)` or `Some(0)` is a real
//! value the remote side must receive. A group that is `None` is skipped by
//! validation and flattening entirely; partial documents are legal.
//!
//! Most groups map each leaf to its own path key (see `codec`). The two
//! exception groups, [`OathOtp`] and [`SelfService`], are attached to the tree
//! as nested sub-objects whose immediate child keys already ARE path keys;
//! their serde field names carry the full paths and they flatten through the
//! shallow `flatten_one_level` operation, never recursively.

pub mod challenge;

pub use challenge::{ChallengeCondition, ChallengeRule, ChallengeRuleSet};

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// One policy document's configuration groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicySettings {
	pub core_services: Option<CoreServices>,
	pub password_settings: Option<PasswordSettings>,
	pub radius: Option<Radius>,
	pub user_account: Option<UserAccount>,
	pub oath_otp: Option<OathOtp>,
	pub self_service: Option<SelfService>,
	pub system_set: Option<SystemSet>,
	pub database_set: Option<DatabaseSet>,
	pub domain_set: Option<DomainSet>,
	pub mobile: Option<MobileSettings>,
}

impl PolicySettings {
	pub fn is_empty(&self) -> bool {
		self.core_services.is_none()
			&& self.password_settings.is_none()
			&& self.radius.is_none()
			&& self.user_account.is_none()
			&& self.oath_otp.is_none()
			&& self.self_service.is_none()
			&& self.system_set.is_none()
			&& self.database_set.is_none()
			&& self.domain_set.is_none()
			&& self.mobile.is_none()
	}
}

/// Portal authentication services (`/Core/Authentication/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoreServices {
	pub authentication_enabled: Option<bool>,
	/// Fallback authentication profile when no challenge rule matches
	pub default_profile_id: Option<Box<str>>,
	pub challenge_rules: Option<ChallengeRuleSet>,
	pub allow_iwa: Option<bool>,
	pub iwa_set_known_endpoint: Option<bool>,
	pub use_cert_auth: Option<bool>,
	pub session_lifespan_hours: Option<i64>,
	pub allow_session_persist: Option<bool>,
	pub persist_lifespan_hours: Option<i64>,
}

/// Password complexity and ageing (`/Core/Security/CDS/PasswordPolicy/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordSettings {
	pub min_length: Option<i64>,
	pub max_length: Option<i64>,
	pub require_digit: Option<bool>,
	pub require_mix_case: Option<bool>,
	pub require_symbol: Option<bool>,
	/// Days until a password expires
	pub duration_days: Option<i64>,
	/// Days since last change at which soft reminders begin
	pub notify_soft: Option<i64>,
	/// Days since last change at which hard warnings begin
	pub notify_hard: Option<i64>,
	pub history_count: Option<i64>,
}

/// RADIUS relay settings (`/Core/Authentication/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Radius {
	pub allow_radius: Option<bool>,
	pub radius_use_challenges: Option<bool>,
	pub radius_challenge_profile_id: Option<Box<str>>,
	pub send_vendor_attributes: Option<bool>,
}

/// End-user account self-management (`/Core/PasswordChange/...`,
/// `/Core/SecurityQuestions/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAccount {
	pub allow_user_change_password: Option<bool>,
	pub password_change_auth_profile_id: Option<Box<str>>,
	pub configure_security_questions: Option<bool>,
	pub allow_duplicate_answers: Option<bool>,
	pub user_defined_questions: Option<i64>,
	pub admin_defined_questions: Option<i64>,
	pub min_char_in_answer: Option<i64>,
}

/// OATH one-time-passcode settings.
///
/// One-level group: serde field names are the full path keys, and the group
/// flattens shallowly. The challenge rule set stays one structured value.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OathOtp {
	#[serde(rename = "/Core/Authentication/OathOtpAllow")]
	pub allow_otp: Option<bool>,
	#[serde(rename = "/Core/Authentication/OathOtpShowQrCode")]
	pub show_qr_code: Option<bool>,
	#[serde(rename = "/Core/Authentication/OathOtpChallengeRules")]
	pub otp_challenge_rules: Option<ChallengeRuleSet>,
}

/// Self-service password reset.
///
/// One-level group, same contract as [`OathOtp`].
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfService {
	#[serde(rename = "/Core/PasswordReset/AllowReset")]
	pub allow_reset: Option<bool>,
	#[serde(rename = "/Core/PasswordReset/AuthProfileId")]
	pub reset_auth_profile_id: Option<Box<str>>,
	#[serde(rename = "/Core/PasswordReset/MaxAttempts")]
	pub max_reset_attempts: Option<i64>,
	#[serde(rename = "/Core/PasswordReset/ChallengeRules")]
	pub reset_challenge_rules: Option<ChallengeRuleSet>,
}

/// Vaulted system account policy (`/PAS/SystemSet/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemSet {
	/// Checkout lifetime in minutes
	pub default_checkout_time: Option<i64>,
	pub allow_remote_access: Option<bool>,
	pub allow_password_rotation: Option<bool>,
	/// Rotation interval in days; 0 is reserved
	pub password_rotate_duration: Option<i64>,
	pub allow_password_rotation_after_checkin: Option<bool>,
	pub minimum_password_age: Option<i64>,
	pub allow_password_history_cleanup: Option<bool>,
	pub password_history_cleanup_duration: Option<i64>,
	pub checkout_challenge_rules: Option<ChallengeRuleSet>,
}

/// Vaulted database account policy (`/PAS/DatabaseSet/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatabaseSet {
	pub default_checkout_time: Option<i64>,
	pub allow_password_rotation: Option<bool>,
	pub password_rotate_duration: Option<i64>,
	pub minimum_password_age: Option<i64>,
	pub allow_password_history_cleanup: Option<bool>,
	pub password_history_cleanup_duration: Option<i64>,
}

/// Domain account policy (`/PAS/DomainSet/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainSet {
	pub default_checkout_time: Option<i64>,
	pub allow_password_rotation: Option<bool>,
	pub password_rotate_duration: Option<i64>,
	pub minimum_password_age: Option<i64>,
	pub allow_password_history_cleanup: Option<bool>,
	pub password_history_cleanup_duration: Option<i64>,
}

/// Device enrollment security (`/Mobile/Security/...`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MobileSettings {
	pub force_device_pin: Option<bool>,
	pub min_pin_length: Option<i64>,
	pub allow_simple_pin: Option<bool>,
	pub wipe_on_unenroll: Option<bool>,
}

// vim: ts=4

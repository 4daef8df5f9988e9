//! Path codec between the typed settings tree and the flat path namespace.
//!
//! Flatten rules:
//! 1. Only populated (`Some`) leaves are emitted; `None` never reaches the wire
//! 2. Explicit `Some(false)` / `Some(0)` are real values and ARE emitted
//! 3. Direct groups map each leaf through its compile-time path constant
//! 4. One-level groups go through [`flatten_one_level`]: immediate child keys
//!    only, grandchildren stay embedded in their parent value
//!
//! Unflatten extracts each group's known path keys independently; unknown keys
//! are ignored for forward compatibility. A wrong-shaped value aborts
//! population of that group only and is reported as a [`SettingFault`]; every
//! other group still populates.

use serde::Serialize;

use crate::prelude::*;
use crate::settings::{
	ChallengeRuleSet, CoreServices, DatabaseSet, DomainSet, MobileSettings, OathOtp,
	PasswordSettings, PolicySettings, Radius, SelfService, SystemSet, UserAccount,
};

/// Compile-time path tables, one module per settings group.
///
/// Paths are opaque to the engine: composed here, never parsed. The one-level
/// groups repeat their serde rename literals so unflatten can find them; the
/// round-trip tests keep the two in sync.
pub mod path {
	pub mod core_services {
		pub const AUTHENTICATION_ENABLED: &str = "/Core/Authentication/AuthenticationEnabled";
		pub const DEFAULT_PROFILE_ID: &str =
			"/Core/Authentication/AuthenticationRulesDefaultProfileId";
		pub const CHALLENGE_RULES: &str = "/Core/Authentication/AuthenticationRules";
		pub const ALLOW_IWA: &str = "/Core/Authentication/AllowIwa";
		pub const IWA_SET_KNOWN_ENDPOINT: &str = "/Core/Authentication/IwaSetKnownEndpoint";
		pub const USE_CERT_AUTH: &str = "/Core/Authentication/UseCertAuth";
		pub const SESSION_LIFESPAN_HOURS: &str =
			"/Core/Authentication/CookieSessionLifespanHours";
		pub const ALLOW_SESSION_PERSIST: &str = "/Core/Authentication/CookieAllowPersist";
		pub const PERSIST_LIFESPAN_HOURS: &str = "/Core/Authentication/CookiePersistDefaultHours";

		pub const ALL: &[&str] = &[
			AUTHENTICATION_ENABLED,
			DEFAULT_PROFILE_ID,
			CHALLENGE_RULES,
			ALLOW_IWA,
			IWA_SET_KNOWN_ENDPOINT,
			USE_CERT_AUTH,
			SESSION_LIFESPAN_HOURS,
			ALLOW_SESSION_PERSIST,
			PERSIST_LIFESPAN_HOURS,
		];
	}

	pub mod password_settings {
		pub const MIN_LENGTH: &str = "/Core/Security/CDS/PasswordPolicy/MinLength";
		pub const MAX_LENGTH: &str = "/Core/Security/CDS/PasswordPolicy/MaxLength";
		pub const REQUIRE_DIGIT: &str = "/Core/Security/CDS/PasswordPolicy/RequireDigit";
		pub const REQUIRE_MIX_CASE: &str = "/Core/Security/CDS/PasswordPolicy/RequireMixCase";
		pub const REQUIRE_SYMBOL: &str = "/Core/Security/CDS/PasswordPolicy/RequireSymbol";
		pub const DURATION_DAYS: &str = "/Core/Security/CDS/PasswordPolicy/PasswordDurationDays";
		pub const NOTIFY_SOFT: &str = "/Core/Security/CDS/PasswordPolicy/NotifySoftDays";
		pub const NOTIFY_HARD: &str = "/Core/Security/CDS/PasswordPolicy/NotifyHardDays";
		pub const HISTORY_COUNT: &str = "/Core/Security/CDS/PasswordPolicy/History";

		pub const ALL: &[&str] = &[
			MIN_LENGTH,
			MAX_LENGTH,
			REQUIRE_DIGIT,
			REQUIRE_MIX_CASE,
			REQUIRE_SYMBOL,
			DURATION_DAYS,
			NOTIFY_SOFT,
			NOTIFY_HARD,
			HISTORY_COUNT,
		];
	}

	pub mod radius {
		pub const ALLOW_RADIUS: &str = "/Core/Authentication/AllowRadius";
		pub const USE_CHALLENGES: &str = "/Core/Authentication/RadiusUseChallenges";
		pub const CHALLENGE_PROFILE_ID: &str = "/Core/Authentication/RadiusChallengeProfile";
		pub const SEND_VENDOR_ATTRIBUTES: &str =
			"/Core/Authentication/SendRadiusVendorSpecificAttributes";

		pub const ALL: &[&str] =
			&[ALLOW_RADIUS, USE_CHALLENGES, CHALLENGE_PROFILE_ID, SEND_VENDOR_ATTRIBUTES];
	}

	pub mod user_account {
		pub const ALLOW_CHANGE_PASSWORD: &str = "/Core/PasswordChange/AllowChange";
		pub const CHANGE_AUTH_PROFILE_ID: &str = "/Core/PasswordChange/AuthProfileId";
		pub const CONFIGURE_QUESTIONS: &str = "/Core/SecurityQuestions/Configure";
		pub const ALLOW_DUP_ANSWERS: &str = "/Core/SecurityQuestions/AllowDupAnswers";
		pub const USER_QUESTIONS: &str = "/Core/SecurityQuestions/UserQuestions";
		pub const ADMIN_QUESTIONS: &str = "/Core/SecurityQuestions/AdminQuestions";
		pub const MIN_CHAR_IN_ANSWER: &str = "/Core/SecurityQuestions/MinCharInAnswer";

		pub const ALL: &[&str] = &[
			ALLOW_CHANGE_PASSWORD,
			CHANGE_AUTH_PROFILE_ID,
			CONFIGURE_QUESTIONS,
			ALLOW_DUP_ANSWERS,
			USER_QUESTIONS,
			ADMIN_QUESTIONS,
			MIN_CHAR_IN_ANSWER,
		];
	}

	pub mod oath_otp {
		pub const ALLOW: &str = "/Core/Authentication/OathOtpAllow";
		pub const SHOW_QR_CODE: &str = "/Core/Authentication/OathOtpShowQrCode";
		pub const CHALLENGE_RULES: &str = "/Core/Authentication/OathOtpChallengeRules";

		pub const ALL: &[&str] = &[ALLOW, SHOW_QR_CODE, CHALLENGE_RULES];
	}

	pub mod self_service {
		pub const ALLOW_RESET: &str = "/Core/PasswordReset/AllowReset";
		pub const AUTH_PROFILE_ID: &str = "/Core/PasswordReset/AuthProfileId";
		pub const MAX_ATTEMPTS: &str = "/Core/PasswordReset/MaxAttempts";
		pub const CHALLENGE_RULES: &str = "/Core/PasswordReset/ChallengeRules";

		pub const ALL: &[&str] = &[ALLOW_RESET, AUTH_PROFILE_ID, MAX_ATTEMPTS, CHALLENGE_RULES];
	}

	pub mod system_set {
		pub const DEFAULT_CHECKOUT_TIME: &str = "/PAS/SystemSet/DefaultCheckoutTime";
		pub const ALLOW_REMOTE: &str = "/PAS/SystemSet/AllowRemote";
		pub const ALLOW_PASSWORD_ROTATION: &str = "/PAS/SystemSet/AllowPasswordRotation";
		pub const PASSWORD_ROTATE_DURATION: &str = "/PAS/SystemSet/PasswordRotateDuration";
		pub const ALLOW_ROTATION_AFTER_CHECKIN: &str =
			"/PAS/SystemSet/AllowPasswordRotationAfterCheckin";
		pub const MINIMUM_PASSWORD_AGE: &str = "/PAS/SystemSet/MinimumPasswordAge";
		pub const ALLOW_HISTORY_CLEANUP: &str = "/PAS/SystemSet/AllowPasswordHistoryCleanUp";
		pub const HISTORY_CLEANUP_DURATION: &str =
			"/PAS/SystemSet/PasswordHistoryCleanUpDuration";
		pub const CHECKOUT_CHALLENGE_RULES: &str = "/PAS/SystemSet/AccessCheckoutChallengeRules";

		pub const ALL: &[&str] = &[
			DEFAULT_CHECKOUT_TIME,
			ALLOW_REMOTE,
			ALLOW_PASSWORD_ROTATION,
			PASSWORD_ROTATE_DURATION,
			ALLOW_ROTATION_AFTER_CHECKIN,
			MINIMUM_PASSWORD_AGE,
			ALLOW_HISTORY_CLEANUP,
			HISTORY_CLEANUP_DURATION,
			CHECKOUT_CHALLENGE_RULES,
		];
	}

	pub mod database_set {
		pub const DEFAULT_CHECKOUT_TIME: &str = "/PAS/DatabaseSet/DefaultCheckoutTime";
		pub const ALLOW_PASSWORD_ROTATION: &str = "/PAS/DatabaseSet/AllowPasswordRotation";
		pub const PASSWORD_ROTATE_DURATION: &str = "/PAS/DatabaseSet/PasswordRotateDuration";
		pub const MINIMUM_PASSWORD_AGE: &str = "/PAS/DatabaseSet/MinimumPasswordAge";
		pub const ALLOW_HISTORY_CLEANUP: &str = "/PAS/DatabaseSet/AllowPasswordHistoryCleanUp";
		pub const HISTORY_CLEANUP_DURATION: &str =
			"/PAS/DatabaseSet/PasswordHistoryCleanUpDuration";

		pub const ALL: &[&str] = &[
			DEFAULT_CHECKOUT_TIME,
			ALLOW_PASSWORD_ROTATION,
			PASSWORD_ROTATE_DURATION,
			MINIMUM_PASSWORD_AGE,
			ALLOW_HISTORY_CLEANUP,
			HISTORY_CLEANUP_DURATION,
		];
	}

	pub mod domain_set {
		pub const DEFAULT_CHECKOUT_TIME: &str = "/PAS/DomainSet/DefaultCheckoutTime";
		pub const ALLOW_PASSWORD_ROTATION: &str = "/PAS/DomainSet/AllowPasswordRotation";
		pub const PASSWORD_ROTATE_DURATION: &str = "/PAS/DomainSet/PasswordRotateDuration";
		pub const MINIMUM_PASSWORD_AGE: &str = "/PAS/DomainSet/MinimumPasswordAge";
		pub const ALLOW_HISTORY_CLEANUP: &str = "/PAS/DomainSet/AllowPasswordHistoryCleanUp";
		pub const HISTORY_CLEANUP_DURATION: &str =
			"/PAS/DomainSet/PasswordHistoryCleanUpDuration";

		pub const ALL: &[&str] = &[
			DEFAULT_CHECKOUT_TIME,
			ALLOW_PASSWORD_ROTATION,
			PASSWORD_ROTATE_DURATION,
			MINIMUM_PASSWORD_AGE,
			ALLOW_HISTORY_CLEANUP,
			HISTORY_CLEANUP_DURATION,
		];
	}

	pub mod mobile {
		pub const FORCE_DEVICE_PIN: &str = "/Mobile/Security/ForceDevicePin";
		pub const MIN_PIN_LENGTH: &str = "/Mobile/Security/MinPinLength";
		pub const ALLOW_SIMPLE_PIN: &str = "/Mobile/Security/AllowSimplePin";
		pub const WIPE_ON_UNENROLL: &str = "/Mobile/Security/WipeOnUnenroll";

		pub const ALL: &[&str] =
			&[FORCE_DEVICE_PIN, MIN_PIN_LENGTH, ALLOW_SIMPLE_PIN, WIPE_ON_UNENROLL];
	}
}

/// One group that could not be populated from the flat namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingFault {
	pub group: &'static str,
	pub error: Error,
}

impl std::fmt::Display for SettingFault {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}: {}", self.group, self.error)
	}
}

/// Flatten every populated leaf of `tree` into the flat path namespace.
///
/// Single pass; group order follows the tree declaration but the output map is
/// unordered, as the remote namespace is.
pub fn flatten(tree: &PolicySettings) -> FlatSettings {
	let mut flat = FlatSettings::new();

	if let Some(g) = &tree.core_services {
		flatten_core_services(g, &mut flat);
	}
	if let Some(g) = &tree.password_settings {
		flatten_password_settings(g, &mut flat);
	}
	if let Some(g) = &tree.radius {
		flatten_radius(g, &mut flat);
	}
	if let Some(g) = &tree.user_account {
		flatten_user_account(g, &mut flat);
	}
	// The two one-level groups: shallow un-nesting, never recursive
	if let Some(g) = &tree.oath_otp {
		flatten_one_level(g, &mut flat);
	}
	if let Some(g) = &tree.self_service {
		flatten_one_level(g, &mut flat);
	}
	if let Some(g) = &tree.system_set {
		flatten_system_set(g, &mut flat);
	}
	if let Some(g) = &tree.database_set {
		flatten_database_set(g, &mut flat);
	}
	if let Some(g) = &tree.domain_set {
		flatten_domain_set(g, &mut flat);
	}
	if let Some(g) = &tree.mobile {
		flatten_mobile(g, &mut flat);
	}

	flat
}

/// Rebuild the typed tree from the flat namespace.
///
/// Groups populate independently: a malformed value poisons only its own group
/// and is returned as a fault alongside the rest of the tree. Unknown path
/// keys are ignored.
pub fn unflatten(flat: &FlatSettings) -> (PolicySettings, Vec<SettingFault>) {
	let mut tree = PolicySettings::default();
	let mut faults = Vec::new();

	collect(core_services_from_flat(flat), &mut tree.core_services, &mut faults);
	collect(password_settings_from_flat(flat), &mut tree.password_settings, &mut faults);
	collect(radius_from_flat(flat), &mut tree.radius, &mut faults);
	collect(user_account_from_flat(flat), &mut tree.user_account, &mut faults);
	collect(oath_otp_from_flat(flat), &mut tree.oath_otp, &mut faults);
	collect(self_service_from_flat(flat), &mut tree.self_service, &mut faults);
	collect(system_set_from_flat(flat), &mut tree.system_set, &mut faults);
	collect(database_set_from_flat(flat), &mut tree.database_set, &mut faults);
	collect(domain_set_from_flat(flat), &mut tree.domain_set, &mut faults);
	collect(mobile_from_flat(flat), &mut tree.mobile, &mut faults);

	(tree, faults)
}

fn collect<G>(
	result: Result<Option<G>, SettingFault>,
	slot: &mut Option<G>,
	faults: &mut Vec<SettingFault>,
) {
	match result {
		Ok(group) => *slot = group,
		Err(fault) => faults.push(fault),
	}
}

// Flatten helpers //
//*****************//

fn put_bool(flat: &mut FlatSettings, path: &'static str, value: Option<bool>) {
	if let Some(v) = value {
		flat.insert(path, v);
	}
}

fn put_int(flat: &mut FlatSettings, path: &'static str, value: Option<i64>) {
	if let Some(v) = value {
		flat.insert(path, v);
	}
}

fn put_str(flat: &mut FlatSettings, path: &'static str, value: Option<&str>) {
	if let Some(v) = value {
		flat.insert(path, v);
	}
}

fn put_rules(flat: &mut FlatSettings, path: &'static str, value: Option<&ChallengeRuleSet>) {
	let Some(v) = value else { return };
	match serde_json::to_value(v) {
		Ok(json) => flat.insert(path, json),
		Err(err) => warn!("unencodable challenge rule set at {}: {}", path, err),
	}
}

/// The shallow flatten for one-level groups.
///
/// Copies each immediate child key of the group's serialized object into the
/// top-level flat map. Exactly one level: a structured child such as a
/// challenge rule set stays one value under its own key, its children are
/// never promoted. A fully recursive flatten is NOT equivalent here and would
/// silently mis-key the structured values.
fn flatten_one_level<T: Serialize>(group: &T, flat: &mut FlatSettings) {
	match serde_json::to_value(group) {
		Ok(serde_json::Value::Object(children)) => {
			for (key, value) in children {
				flat.insert(key, setting_from_json(value));
			}
		}
		Ok(other) => warn!("one-level group serialized to {:?} instead of an object", other),
		Err(err) => warn!("unencodable one-level group: {}", err),
	}
}

fn setting_from_json(value: serde_json::Value) -> SettingValue {
	match value {
		serde_json::Value::Bool(b) => SettingValue::Bool(b),
		serde_json::Value::Number(n) => match n.as_i64() {
			Some(i) => SettingValue::Int(i),
			None => SettingValue::Json(serde_json::Value::Number(n)),
		},
		serde_json::Value::String(s) => SettingValue::String(s),
		other => SettingValue::Json(other),
	}
}

// Unflatten helpers //
//*******************//

fn malformed(path: &str, expected: &str, found: &str) -> Error {
	Error::MalformedSettings {
		path: path.into(),
		detail: format!("expected {}, found {}", expected, found).into(),
	}
}

fn take_bool(flat: &FlatSettings, path: &str) -> PsResult<Option<bool>> {
	match flat.get(path) {
		None => Ok(None),
		Some(v) => {
			v.as_bool().map(Some).ok_or_else(|| malformed(path, "bool", v.type_name()))
		}
	}
}

fn take_int(flat: &FlatSettings, path: &str) -> PsResult<Option<i64>> {
	match flat.get(path) {
		None => Ok(None),
		Some(v) => v.as_int().map(Some).ok_or_else(|| malformed(path, "int", v.type_name())),
	}
}

fn take_str(flat: &FlatSettings, path: &str) -> PsResult<Option<Box<str>>> {
	match flat.get(path) {
		None => Ok(None),
		Some(v) => v
			.as_str()
			.map(|s| Some(s.into()))
			.ok_or_else(|| malformed(path, "string", v.type_name())),
	}
}

fn take_rules(flat: &FlatSettings, path: &str) -> PsResult<Option<ChallengeRuleSet>> {
	match flat.get(path) {
		None => Ok(None),
		Some(SettingValue::Json(v)) if v.is_object() => serde_json::from_value(v.clone())
			.map(Some)
			.map_err(|err| Error::MalformedSettings {
				path: path.into(),
				detail: err.to_string().into(),
			}),
		Some(v) => Err(malformed(path, "object", v.type_name())),
	}
}

fn contains_any(flat: &FlatSettings, paths: &[&str]) -> bool {
	paths.iter().any(|p| flat.contains_key(p))
}

// Per-group codecs //
//******************//

fn flatten_core_services(g: &CoreServices, flat: &mut FlatSettings) {
	use path::core_services as p;
	put_bool(flat, p::AUTHENTICATION_ENABLED, g.authentication_enabled);
	put_str(flat, p::DEFAULT_PROFILE_ID, g.default_profile_id.as_deref());
	put_rules(flat, p::CHALLENGE_RULES, g.challenge_rules.as_ref());
	put_bool(flat, p::ALLOW_IWA, g.allow_iwa);
	put_bool(flat, p::IWA_SET_KNOWN_ENDPOINT, g.iwa_set_known_endpoint);
	put_bool(flat, p::USE_CERT_AUTH, g.use_cert_auth);
	put_int(flat, p::SESSION_LIFESPAN_HOURS, g.session_lifespan_hours);
	put_bool(flat, p::ALLOW_SESSION_PERSIST, g.allow_session_persist);
	put_int(flat, p::PERSIST_LIFESPAN_HOURS, g.persist_lifespan_hours);
}

fn core_services_from_flat(flat: &FlatSettings) -> Result<Option<CoreServices>, SettingFault> {
	use path::core_services as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<CoreServices> {
		Ok(CoreServices {
			authentication_enabled: take_bool(flat, p::AUTHENTICATION_ENABLED)?,
			default_profile_id: take_str(flat, p::DEFAULT_PROFILE_ID)?,
			challenge_rules: take_rules(flat, p::CHALLENGE_RULES)?,
			allow_iwa: take_bool(flat, p::ALLOW_IWA)?,
			iwa_set_known_endpoint: take_bool(flat, p::IWA_SET_KNOWN_ENDPOINT)?,
			use_cert_auth: take_bool(flat, p::USE_CERT_AUTH)?,
			session_lifespan_hours: take_int(flat, p::SESSION_LIFESPAN_HOURS)?,
			allow_session_persist: take_bool(flat, p::ALLOW_SESSION_PERSIST)?,
			persist_lifespan_hours: take_int(flat, p::PERSIST_LIFESPAN_HOURS)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "CoreServices", error })
}

fn flatten_password_settings(g: &PasswordSettings, flat: &mut FlatSettings) {
	use path::password_settings as p;
	put_int(flat, p::MIN_LENGTH, g.min_length);
	put_int(flat, p::MAX_LENGTH, g.max_length);
	put_bool(flat, p::REQUIRE_DIGIT, g.require_digit);
	put_bool(flat, p::REQUIRE_MIX_CASE, g.require_mix_case);
	put_bool(flat, p::REQUIRE_SYMBOL, g.require_symbol);
	put_int(flat, p::DURATION_DAYS, g.duration_days);
	put_int(flat, p::NOTIFY_SOFT, g.notify_soft);
	put_int(flat, p::NOTIFY_HARD, g.notify_hard);
	put_int(flat, p::HISTORY_COUNT, g.history_count);
}

fn password_settings_from_flat(
	flat: &FlatSettings,
) -> Result<Option<PasswordSettings>, SettingFault> {
	use path::password_settings as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<PasswordSettings> {
		Ok(PasswordSettings {
			min_length: take_int(flat, p::MIN_LENGTH)?,
			max_length: take_int(flat, p::MAX_LENGTH)?,
			require_digit: take_bool(flat, p::REQUIRE_DIGIT)?,
			require_mix_case: take_bool(flat, p::REQUIRE_MIX_CASE)?,
			require_symbol: take_bool(flat, p::REQUIRE_SYMBOL)?,
			duration_days: take_int(flat, p::DURATION_DAYS)?,
			notify_soft: take_int(flat, p::NOTIFY_SOFT)?,
			notify_hard: take_int(flat, p::NOTIFY_HARD)?,
			history_count: take_int(flat, p::HISTORY_COUNT)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "PasswordSettings", error })
}

fn flatten_radius(g: &Radius, flat: &mut FlatSettings) {
	use path::radius as p;
	put_bool(flat, p::ALLOW_RADIUS, g.allow_radius);
	put_bool(flat, p::USE_CHALLENGES, g.radius_use_challenges);
	put_str(flat, p::CHALLENGE_PROFILE_ID, g.radius_challenge_profile_id.as_deref());
	put_bool(flat, p::SEND_VENDOR_ATTRIBUTES, g.send_vendor_attributes);
}

fn radius_from_flat(flat: &FlatSettings) -> Result<Option<Radius>, SettingFault> {
	use path::radius as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<Radius> {
		Ok(Radius {
			allow_radius: take_bool(flat, p::ALLOW_RADIUS)?,
			radius_use_challenges: take_bool(flat, p::USE_CHALLENGES)?,
			radius_challenge_profile_id: take_str(flat, p::CHALLENGE_PROFILE_ID)?,
			send_vendor_attributes: take_bool(flat, p::SEND_VENDOR_ATTRIBUTES)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "Radius", error })
}

fn flatten_user_account(g: &UserAccount, flat: &mut FlatSettings) {
	use path::user_account as p;
	put_bool(flat, p::ALLOW_CHANGE_PASSWORD, g.allow_user_change_password);
	put_str(flat, p::CHANGE_AUTH_PROFILE_ID, g.password_change_auth_profile_id.as_deref());
	put_bool(flat, p::CONFIGURE_QUESTIONS, g.configure_security_questions);
	put_bool(flat, p::ALLOW_DUP_ANSWERS, g.allow_duplicate_answers);
	put_int(flat, p::USER_QUESTIONS, g.user_defined_questions);
	put_int(flat, p::ADMIN_QUESTIONS, g.admin_defined_questions);
	put_int(flat, p::MIN_CHAR_IN_ANSWER, g.min_char_in_answer);
}

fn user_account_from_flat(flat: &FlatSettings) -> Result<Option<UserAccount>, SettingFault> {
	use path::user_account as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<UserAccount> {
		Ok(UserAccount {
			allow_user_change_password: take_bool(flat, p::ALLOW_CHANGE_PASSWORD)?,
			password_change_auth_profile_id: take_str(flat, p::CHANGE_AUTH_PROFILE_ID)?,
			configure_security_questions: take_bool(flat, p::CONFIGURE_QUESTIONS)?,
			allow_duplicate_answers: take_bool(flat, p::ALLOW_DUP_ANSWERS)?,
			user_defined_questions: take_int(flat, p::USER_QUESTIONS)?,
			admin_defined_questions: take_int(flat, p::ADMIN_QUESTIONS)?,
			min_char_in_answer: take_int(flat, p::MIN_CHAR_IN_ANSWER)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "UserAccount", error })
}

fn oath_otp_from_flat(flat: &FlatSettings) -> Result<Option<OathOtp>, SettingFault> {
	use path::oath_otp as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<OathOtp> {
		Ok(OathOtp {
			allow_otp: take_bool(flat, p::ALLOW)?,
			show_qr_code: take_bool(flat, p::SHOW_QR_CODE)?,
			otp_challenge_rules: take_rules(flat, p::CHALLENGE_RULES)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "OathOtp", error })
}

fn self_service_from_flat(flat: &FlatSettings) -> Result<Option<SelfService>, SettingFault> {
	use path::self_service as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<SelfService> {
		Ok(SelfService {
			allow_reset: take_bool(flat, p::ALLOW_RESET)?,
			reset_auth_profile_id: take_str(flat, p::AUTH_PROFILE_ID)?,
			max_reset_attempts: take_int(flat, p::MAX_ATTEMPTS)?,
			reset_challenge_rules: take_rules(flat, p::CHALLENGE_RULES)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "SelfService", error })
}

fn flatten_system_set(g: &SystemSet, flat: &mut FlatSettings) {
	use path::system_set as p;
	put_int(flat, p::DEFAULT_CHECKOUT_TIME, g.default_checkout_time);
	put_bool(flat, p::ALLOW_REMOTE, g.allow_remote_access);
	put_bool(flat, p::ALLOW_PASSWORD_ROTATION, g.allow_password_rotation);
	put_int(flat, p::PASSWORD_ROTATE_DURATION, g.password_rotate_duration);
	put_bool(flat, p::ALLOW_ROTATION_AFTER_CHECKIN, g.allow_password_rotation_after_checkin);
	put_int(flat, p::MINIMUM_PASSWORD_AGE, g.minimum_password_age);
	put_bool(flat, p::ALLOW_HISTORY_CLEANUP, g.allow_password_history_cleanup);
	put_int(flat, p::HISTORY_CLEANUP_DURATION, g.password_history_cleanup_duration);
	put_rules(flat, p::CHECKOUT_CHALLENGE_RULES, g.checkout_challenge_rules.as_ref());
}

fn system_set_from_flat(flat: &FlatSettings) -> Result<Option<SystemSet>, SettingFault> {
	use path::system_set as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<SystemSet> {
		Ok(SystemSet {
			default_checkout_time: take_int(flat, p::DEFAULT_CHECKOUT_TIME)?,
			allow_remote_access: take_bool(flat, p::ALLOW_REMOTE)?,
			allow_password_rotation: take_bool(flat, p::ALLOW_PASSWORD_ROTATION)?,
			password_rotate_duration: take_int(flat, p::PASSWORD_ROTATE_DURATION)?,
			allow_password_rotation_after_checkin: take_bool(
				flat,
				p::ALLOW_ROTATION_AFTER_CHECKIN,
			)?,
			minimum_password_age: take_int(flat, p::MINIMUM_PASSWORD_AGE)?,
			allow_password_history_cleanup: take_bool(flat, p::ALLOW_HISTORY_CLEANUP)?,
			password_history_cleanup_duration: take_int(flat, p::HISTORY_CLEANUP_DURATION)?,
			checkout_challenge_rules: take_rules(flat, p::CHECKOUT_CHALLENGE_RULES)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "SystemSet", error })
}

fn flatten_database_set(g: &DatabaseSet, flat: &mut FlatSettings) {
	use path::database_set as p;
	put_int(flat, p::DEFAULT_CHECKOUT_TIME, g.default_checkout_time);
	put_bool(flat, p::ALLOW_PASSWORD_ROTATION, g.allow_password_rotation);
	put_int(flat, p::PASSWORD_ROTATE_DURATION, g.password_rotate_duration);
	put_int(flat, p::MINIMUM_PASSWORD_AGE, g.minimum_password_age);
	put_bool(flat, p::ALLOW_HISTORY_CLEANUP, g.allow_password_history_cleanup);
	put_int(flat, p::HISTORY_CLEANUP_DURATION, g.password_history_cleanup_duration);
}

fn database_set_from_flat(flat: &FlatSettings) -> Result<Option<DatabaseSet>, SettingFault> {
	use path::database_set as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<DatabaseSet> {
		Ok(DatabaseSet {
			default_checkout_time: take_int(flat, p::DEFAULT_CHECKOUT_TIME)?,
			allow_password_rotation: take_bool(flat, p::ALLOW_PASSWORD_ROTATION)?,
			password_rotate_duration: take_int(flat, p::PASSWORD_ROTATE_DURATION)?,
			minimum_password_age: take_int(flat, p::MINIMUM_PASSWORD_AGE)?,
			allow_password_history_cleanup: take_bool(flat, p::ALLOW_HISTORY_CLEANUP)?,
			password_history_cleanup_duration: take_int(flat, p::HISTORY_CLEANUP_DURATION)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "DatabaseSet", error })
}

fn flatten_domain_set(g: &DomainSet, flat: &mut FlatSettings) {
	use path::domain_set as p;
	put_int(flat, p::DEFAULT_CHECKOUT_TIME, g.default_checkout_time);
	put_bool(flat, p::ALLOW_PASSWORD_ROTATION, g.allow_password_rotation);
	put_int(flat, p::PASSWORD_ROTATE_DURATION, g.password_rotate_duration);
	put_int(flat, p::MINIMUM_PASSWORD_AGE, g.minimum_password_age);
	put_bool(flat, p::ALLOW_HISTORY_CLEANUP, g.allow_password_history_cleanup);
	put_int(flat, p::HISTORY_CLEANUP_DURATION, g.password_history_cleanup_duration);
}

fn domain_set_from_flat(flat: &FlatSettings) -> Result<Option<DomainSet>, SettingFault> {
	use path::domain_set as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<DomainSet> {
		Ok(DomainSet {
			default_checkout_time: take_int(flat, p::DEFAULT_CHECKOUT_TIME)?,
			allow_password_rotation: take_bool(flat, p::ALLOW_PASSWORD_ROTATION)?,
			password_rotate_duration: take_int(flat, p::PASSWORD_ROTATE_DURATION)?,
			minimum_password_age: take_int(flat, p::MINIMUM_PASSWORD_AGE)?,
			allow_password_history_cleanup: take_bool(flat, p::ALLOW_HISTORY_CLEANUP)?,
			password_history_cleanup_duration: take_int(flat, p::HISTORY_CLEANUP_DURATION)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "DomainSet", error })
}

fn flatten_mobile(g: &MobileSettings, flat: &mut FlatSettings) {
	use path::mobile as p;
	put_bool(flat, p::FORCE_DEVICE_PIN, g.force_device_pin);
	put_int(flat, p::MIN_PIN_LENGTH, g.min_pin_length);
	put_bool(flat, p::ALLOW_SIMPLE_PIN, g.allow_simple_pin);
	put_bool(flat, p::WIPE_ON_UNENROLL, g.wipe_on_unenroll);
}

fn mobile_from_flat(flat: &FlatSettings) -> Result<Option<MobileSettings>, SettingFault> {
	use path::mobile as p;
	if !contains_any(flat, p::ALL) {
		return Ok(None);
	}
	let build = || -> PsResult<MobileSettings> {
		Ok(MobileSettings {
			force_device_pin: take_bool(flat, p::FORCE_DEVICE_PIN)?,
			min_pin_length: take_int(flat, p::MIN_PIN_LENGTH)?,
			allow_simple_pin: take_bool(flat, p::ALLOW_SIMPLE_PIN)?,
			wipe_on_unenroll: take_bool(flat, p::WIPE_ON_UNENROLL)?,
		})
	};
	build().map(Some).map_err(|error| SettingFault { group: "MobileSettings", error })
}


// vim: ts=4

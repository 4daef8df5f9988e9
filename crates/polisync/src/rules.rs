//! Cross-field invariants evaluated before any write is attempted.
//!
//! A declarative table of `(group, check)` entries, walked in declaration
//! order. The first failing rule is returned as a `ValidationError` naming the
//! group and the offending values, so callers get one actionable message per
//! attempt. Absent groups are skipped entirely; partial documents are legal.
//! Evaluation is pure: no store call happens before validation passes.

use crate::prelude::*;
use crate::settings::{ChallengeRuleSet, PolicySettings};

pub struct Rule {
	pub group: &'static str,
	check: fn(&PolicySettings) -> Result<(), String>,
}

static RULES: &[Rule] = &[
	Rule { group: "CoreServices", check: core_auth_needs_profile },
	Rule { group: "CoreServices", check: core_iwa_endpoint_needs_iwa },
	Rule { group: "CoreServices", check: core_persist_needs_allow },
	Rule { group: "CoreServices", check: core_challenge_rules_complete },
	Rule { group: "PasswordSettings", check: password_min_below_max },
	Rule { group: "PasswordSettings", check: password_notify_soft_before_hard },
	Rule { group: "PasswordSettings", check: password_notify_needs_expiry },
	Rule { group: "Radius", check: radius_features_need_allow },
	Rule { group: "Radius", check: radius_challenges_need_profile },
	Rule { group: "UserAccount", check: account_questions_fully_configured },
	Rule { group: "UserAccount", check: account_dup_answers_need_questions },
	Rule { group: "OathOtp", check: otp_rules_need_allow },
	Rule { group: "OathOtp", check: otp_challenge_rules_complete },
	Rule { group: "SelfService", check: reset_needs_attempt_cap },
	Rule { group: "SelfService", check: reset_challenge_rules_complete },
	Rule { group: "SystemSet", check: system_rotation_needs_duration },
	Rule { group: "SystemSet", check: system_cleanup_needs_duration },
	Rule { group: "SystemSet", check: system_age_within_rotation },
	Rule { group: "SystemSet", check: system_challenge_rules_complete },
	Rule { group: "DatabaseSet", check: database_rotation_needs_duration },
	Rule { group: "DatabaseSet", check: database_cleanup_needs_duration },
	Rule { group: "DomainSet", check: domain_rotation_needs_duration },
	Rule { group: "DomainSet", check: domain_cleanup_needs_duration },
	Rule { group: "MobileSettings", check: mobile_pin_needs_length },
	Rule { group: "MobileSettings", check: mobile_simple_pin_needs_force },
];

/// Check `settings` against the rule table; first failure wins
pub fn validate(settings: &PolicySettings) -> PsResult<()> {
	for rule in RULES {
		if let Err(msg) = (rule.check)(settings) {
			return Err(Error::ValidationError(format!("{}: {}", rule.group, msg)));
		}
	}
	Ok(())
}

/// Number of entries in the rule table
pub fn rule_count() -> usize {
	RULES.len()
}

// Shared predicates //
//*******************//

fn on(v: Option<bool>) -> bool {
	v == Some(true)
}

fn blank(v: Option<&str>) -> bool {
	v.unwrap_or("").is_empty()
}

fn zeroish(v: Option<i64>) -> bool {
	v.unwrap_or(0) == 0
}

/// Every rule of a challenge rule set must name a target profile and carry at
/// least one condition; an unconditioned rule would shadow everything after it
fn challenge_rules_complete(set: &ChallengeRuleSet) -> Result<(), String> {
	for (idx, rule) in set.rules.iter().enumerate() {
		if rule.profile_id.is_empty() {
			return Err(format!("challenge rule {} has no target profile", idx));
		}
		if rule.conditions.is_empty() {
			return Err(format!("challenge rule {} has no conditions", idx));
		}
	}
	Ok(())
}

// CoreServices //
//**************//

fn core_auth_needs_profile(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.core_services else { return Ok(()) };
	if on(g.authentication_enabled) && blank(g.default_profile_id.as_deref()) {
		return Err("authentication is enabled but no default profile is set".into());
	}
	Ok(())
}

fn core_iwa_endpoint_needs_iwa(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.core_services else { return Ok(()) };
	if on(g.iwa_set_known_endpoint) && !on(g.allow_iwa) {
		return Err("IWA endpoint pinning requires IWA to be allowed".into());
	}
	Ok(())
}

fn core_persist_needs_allow(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.core_services else { return Ok(()) };
	if g.persist_lifespan_hours.is_some() && !on(g.allow_session_persist) {
		return Err("persistent cookie lifespan is set but persistence is not allowed".into());
	}
	Ok(())
}

fn core_challenge_rules_complete(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.core_services else { return Ok(()) };
	g.challenge_rules.as_ref().map_or(Ok(()), challenge_rules_complete)
}

// PasswordSettings //
//******************//

fn password_min_below_max(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.password_settings else { return Ok(()) };
	if let (Some(min), Some(max)) = (g.min_length, g.max_length) {
		if min > max {
			return Err(format!("min_length {} exceeds max_length {}", min, max));
		}
	}
	Ok(())
}

fn password_notify_soft_before_hard(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.password_settings else { return Ok(()) };
	if let (Some(soft), Some(hard)) = (g.notify_soft, g.notify_hard) {
		if soft > hard {
			return Err(format!(
				"soft reminders at {} days begin after hard warnings at {} days",
				soft, hard
			));
		}
	}
	Ok(())
}

fn password_notify_needs_expiry(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.password_settings else { return Ok(()) };
	if (g.notify_soft.is_some() || g.notify_hard.is_some()) && g.duration_days.is_none() {
		return Err("expiry notifications are set but passwords never expire".into());
	}
	Ok(())
}

// Radius //
//********//

fn radius_features_need_allow(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.radius else { return Ok(()) };
	if (on(g.radius_use_challenges) || on(g.send_vendor_attributes)) && !on(g.allow_radius) {
		return Err("challenges or vendor attributes require RADIUS to be allowed".into());
	}
	Ok(())
}

fn radius_challenges_need_profile(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.radius else { return Ok(()) };
	if on(g.radius_use_challenges) && blank(g.radius_challenge_profile_id.as_deref()) {
		return Err("RADIUS challenges require a challenge profile".into());
	}
	Ok(())
}

// UserAccount //
//*************//

fn account_questions_fully_configured(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.user_account else { return Ok(()) };
	if on(g.configure_security_questions)
		&& (zeroish(g.user_defined_questions)
			|| zeroish(g.admin_defined_questions)
			|| zeroish(g.min_char_in_answer))
	{
		return Err(
			"security questions require user count, admin count and minimum answer length"
				.into(),
		);
	}
	Ok(())
}

fn account_dup_answers_need_questions(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.user_account else { return Ok(()) };
	if on(g.allow_duplicate_answers) && !on(g.configure_security_questions) {
		return Err("duplicate answer policy without security questions".into());
	}
	Ok(())
}

// OathOtp //
//*********//

fn otp_rules_need_allow(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.oath_otp else { return Ok(()) };
	if g.otp_challenge_rules.is_some() && !on(g.allow_otp) {
		return Err("OTP challenge rules are set but OTP is not allowed".into());
	}
	Ok(())
}

fn otp_challenge_rules_complete(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.oath_otp else { return Ok(()) };
	g.otp_challenge_rules.as_ref().map_or(Ok(()), challenge_rules_complete)
}

// SelfService //
//*************//

fn reset_needs_attempt_cap(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.self_service else { return Ok(()) };
	if on(g.allow_reset) && zeroish(g.max_reset_attempts) {
		return Err("self-service reset requires a non-zero attempt cap".into());
	}
	Ok(())
}

fn reset_challenge_rules_complete(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.self_service else { return Ok(()) };
	g.reset_challenge_rules.as_ref().map_or(Ok(()), challenge_rules_complete)
}

// SystemSet / DatabaseSet / DomainSet //
//*************************************//

fn rotation_needs_duration(
	allow: Option<bool>,
	duration: Option<i64>,
) -> Result<(), String> {
	if on(allow) && zeroish(duration) {
		return Err("password rotation requires a non-zero rotate duration".into());
	}
	Ok(())
}

fn cleanup_needs_duration(allow: Option<bool>, duration: Option<i64>) -> Result<(), String> {
	if on(allow) && zeroish(duration) {
		return Err("history cleanup requires a non-zero cleanup duration".into());
	}
	Ok(())
}

fn system_rotation_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.system_set else { return Ok(()) };
	rotation_needs_duration(g.allow_password_rotation, g.password_rotate_duration)
}

fn system_cleanup_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.system_set else { return Ok(()) };
	cleanup_needs_duration(g.allow_password_history_cleanup, g.password_history_cleanup_duration)
}

fn system_age_within_rotation(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.system_set else { return Ok(()) };
	if let (Some(age), Some(rotate)) = (g.minimum_password_age, g.password_rotate_duration) {
		if age > rotate {
			return Err(format!(
				"minimum password age {} exceeds rotate duration {}",
				age, rotate
			));
		}
	}
	Ok(())
}

fn system_challenge_rules_complete(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.system_set else { return Ok(()) };
	g.checkout_challenge_rules.as_ref().map_or(Ok(()), challenge_rules_complete)
}

fn database_rotation_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.database_set else { return Ok(()) };
	rotation_needs_duration(g.allow_password_rotation, g.password_rotate_duration)
}

fn database_cleanup_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.database_set else { return Ok(()) };
	cleanup_needs_duration(g.allow_password_history_cleanup, g.password_history_cleanup_duration)
}

fn domain_rotation_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.domain_set else { return Ok(()) };
	rotation_needs_duration(g.allow_password_rotation, g.password_rotate_duration)
}

fn domain_cleanup_needs_duration(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.domain_set else { return Ok(()) };
	cleanup_needs_duration(g.allow_password_history_cleanup, g.password_history_cleanup_duration)
}

// MobileSettings //
//****************//

fn mobile_pin_needs_length(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.mobile else { return Ok(()) };
	if on(g.force_device_pin) && zeroish(g.min_pin_length) {
		return Err("forced device PIN requires a non-zero minimum length".into());
	}
	Ok(())
}

fn mobile_simple_pin_needs_force(s: &PolicySettings) -> Result<(), String> {
	let Some(g) = &s.mobile else { return Ok(()) };
	if on(g.allow_simple_pin) && !on(g.force_device_pin) {
		return Err("simple PIN policy without a forced device PIN".into());
	}
	Ok(())
}


// vim: ts=4

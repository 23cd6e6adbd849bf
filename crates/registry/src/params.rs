//! Selection conditions from a generic resolution parameter map.
//!
//! Recognized keys:
//!
//! | key | type | meaning |
//! |---|---|---|
//! | `version` | string | [`SelectionCondition::AppliesForVersion`] |
//! | `appliesFrom`, `appliesTo` | string | [`SelectionCondition::FallsInVersionRange`] bounds |
//! | `appliesFromExclusive`, `appliesToExclusive` | bool | bound exclusivity |
//! | `community` | bool or null | edition filter; null matches any edition |
//! | `conditions` | map or array of maps | nested conditions, all of which must match |
//!
//! Without a `community` key the filter is the authority's current edition.
//! Values of the wrong type are ignored, except under `conditions`.

use scriptenv_version::VersionNumber;
use serde_json::Value;

use crate::{Edition, EditionAuthority, ResolveError, SelectionCondition};

/// Resolution parameters as passed alongside a location string.
pub type Parameters = serde_json::Map<String, Value>;

pub const VERSION: &str = "version";
pub const APPLIES_FROM: &str = "appliesFrom";
pub const APPLIES_TO: &str = "appliesTo";
pub const APPLIES_FROM_EXCLUSIVE: &str = "appliesFromExclusive";
pub const APPLIES_TO_EXCLUSIVE: &str = "appliesToExclusive";
pub const COMMUNITY: &str = "community";
pub const CONDITIONS: &str = "conditions";

/// Builds the condition described by `params`, if any.
///
/// Nested, single-version and range conditions are gathered in that order;
/// several collapse into a composite.
///
/// # Errors
///
/// Malformed versions, an exclusive flag on an absent range bound, and
/// `conditions` values that are not maps or arrays of maps.
pub fn extract_condition(
	params: &Parameters,
	authority: &dyn EditionAuthority,
) -> Result<Option<SelectionCondition>, ResolveError> {
	let mut conditions = Vec::with_capacity(3);
	conditions.extend(nested_condition(params, authority)?);
	conditions.extend(version_condition(params, authority)?);
	conditions.extend(range_condition(params, authority)?);
	Ok(collapse(conditions))
}

fn collapse(mut conditions: Vec<SelectionCondition>) -> Option<SelectionCondition> {
	match conditions.len() {
		0 => None,
		1 => conditions.pop(),
		_ => Some(SelectionCondition::all(conditions)),
	}
}

fn nested_condition(
	params: &Parameters,
	authority: &dyn EditionAuthority,
) -> Result<Option<SelectionCondition>, ResolveError> {
	match params.get(CONDITIONS) {
		None => Ok(None),
		Some(Value::Object(nested)) => extract_condition(nested, authority),
		Some(Value::Array(elements)) => {
			let mut conditions = Vec::with_capacity(elements.len());
			for element in elements {
				let Value::Object(nested) = element else {
					return Err(ResolveError::UnsupportedConditionElement(element.to_string()));
				};
				if let Some(condition) = extract_condition(nested, authority)?
					&& !conditions.contains(&condition)
				{
					conditions.push(condition);
				}
			}
			Ok(collapse(conditions))
		}
		Some(other) => Err(ResolveError::UnsupportedConditions(other.to_string())),
	}
}

fn version_condition(
	params: &Parameters,
	authority: &dyn EditionAuthority,
) -> Result<Option<SelectionCondition>, ResolveError> {
	let Some(Value::String(raw)) = params.get(VERSION) else {
		return Ok(None);
	};
	let version = parse_version(VERSION, raw)?;
	Ok(Some(SelectionCondition::applies_for_version(
		version,
		edition_filter(params, authority),
	)))
}

fn range_condition(
	params: &Parameters,
	authority: &dyn EditionAuthority,
) -> Result<Option<SelectionCondition>, ResolveError> {
	let from = params.get(APPLIES_FROM).and_then(Value::as_str);
	let to = params.get(APPLIES_TO).and_then(Value::as_str);
	if from.is_none() && to.is_none() {
		return Ok(None);
	}

	let from = from.map(|raw| parse_version(APPLIES_FROM, raw)).transpose()?;
	let to = to.map(|raw| parse_version(APPLIES_TO, raw)).transpose()?;
	let condition = SelectionCondition::falls_in_version_range(
		from,
		flag(params, APPLIES_FROM_EXCLUSIVE),
		to,
		flag(params, APPLIES_TO_EXCLUSIVE),
		edition_filter(params, authority),
	)?;
	Ok(Some(condition))
}

fn parse_version(key: &'static str, raw: &str) -> Result<VersionNumber, ResolveError> {
	VersionNumber::parse(raw).map_err(|source| ResolveError::InvalidVersion { key, source })
}

/// Absent key: current edition. Null: any edition. Otherwise true means
/// community and false enterprise.
fn edition_filter(params: &Parameters, authority: &dyn EditionAuthority) -> Option<Edition> {
	match params.get(COMMUNITY) {
		None => Some(authority.current_edition()),
		Some(Value::Null) => None,
		Some(value) if to_bool(value) => Some(Edition::Community),
		Some(_) => Some(Edition::Enterprise),
	}
}

fn flag(params: &Parameters, key: &str) -> bool {
	params.get(key).is_some_and(to_bool)
}

/// JSON `true`, or a string spelling `true` in any case.
fn to_bool(value: &Value) -> bool {
	match value {
		Value::Bool(b) => *b,
		Value::String(s) => s.eq_ignore_ascii_case("true"),
		_ => false,
	}
}

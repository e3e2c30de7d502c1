//! Untyped request parameters and their conversion to typed requests.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::spectral::{CmfError, CmfResult, DomainParams, Flags, ObserverParams, StandardField};

/// A single request parameter as it arrives from JavaScript, JSON or the
/// command line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Boolean(bool),
    Integer(i64),
    Number(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Integer(_) => "integer",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

/// Named request parameters.
pub type ParamMap = BTreeMap<String, ParamValue>;

/// Case-insensitive lookups on a [`ParamMap`].
pub trait ParamLookupExt {
    fn get_normalized(&self, key: &str) -> Option<&ParamValue>;
}

impl ParamLookupExt for ParamMap {
    fn get_normalized(&self, key: &str) -> Option<&ParamValue> {
        if let Some(value) = self.get(key) {
            return Some(value);
        }
        self.iter()
            .find(|(name, _)| normalize_key(name) == key)
            .map(|(_, value)| value)
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase().replace('-', "_")
}

/// Defaults for the optional domain parameters.
pub struct Defaults;

impl Defaults {
    pub const MIN: f64 = 390.0;
    pub const MAX: f64 = 830.0;
    pub const STEP: f64 = 1.0;
}

const DOMAIN_KEYS: [&str; 3] = ["min", "max", "step_size"];
const OBSERVER_KEYS: [&str; 2] = ["field_size", "age"];
/// Comma-separated flag list, e.g. `optional = "norm,info"`.
const OPTIONAL_KEY: &str = "optional";

fn known_keys(with_age: bool) -> Vec<&'static str> {
    let mut keys = vec!["field_size"];
    if with_age {
        keys.push("age");
    }
    keys.extend(DOMAIN_KEYS);
    keys.extend(Flags::NAMES);
    keys.push(OPTIONAL_KEY);
    keys
}

/// Closest name by edit distance, when it is close enough to be a typo.
pub(crate) fn suggest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<String> {
    candidates
        .into_iter()
        .map(|candidate| (levenshtein::levenshtein(input, candidate), candidate))
        .filter(|(distance, candidate)| *distance <= (candidate.len() / 2).max(2))
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_owned())
}

fn reject_unknown_keys(map: &ParamMap, with_age: bool) -> CmfResult<()> {
    let known = known_keys(with_age);
    for key in map.keys() {
        let normalized = normalize_key(key);
        if known.contains(&normalized.as_str()) {
            continue;
        }
        let detail = match suggest(&normalized, known.iter().copied()) {
            Some(suggestion) => format!("unknown parameter (did you mean `{suggestion}`?)"),
            None => "unknown parameter".to_owned(),
        };
        return Err(CmfError::out_of_range(key, detail));
    }
    Ok(())
}

pub fn coerce_number(key: &str, value: &ParamValue) -> CmfResult<f64> {
    match value {
        ParamValue::Number(n) => Ok(*n),
        ParamValue::Integer(i) => Ok(*i as f64),
        ParamValue::Text(s) => s.trim().parse().map_err(|_| {
            CmfError::out_of_range(key, format!("cannot read `{s}` as a number"))
        }),
        ParamValue::List(l) if l.len() == 1 => coerce_number(key, &l[0]),
        other => Err(CmfError::out_of_range(
            key,
            format!("expected a number, got {}", other.kind()),
        )),
    }
}

pub fn coerce_boolean(key: &str, value: &ParamValue) -> CmfResult<bool> {
    match value {
        ParamValue::Boolean(b) => Ok(*b),
        ParamValue::Integer(i) => Ok(*i != 0),
        ParamValue::Number(n) => Ok(n.abs() > 1e-9),
        ParamValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            other => Err(CmfError::out_of_range(
                key,
                format!("cannot read `{other}` as a boolean"),
            )),
        },
        ParamValue::List(l) if l.len() == 1 => coerce_boolean(key, &l[0]),
        ParamValue::List(_) => Err(CmfError::out_of_range(key, "expected a boolean, got list")),
    }
}

fn optional_number(map: &ParamMap, key: &str) -> CmfResult<Option<f64>> {
    map.get_normalized(key)
        .map(|value| coerce_number(key, value))
        .transpose()
}

fn required_number(map: &ParamMap, key: &str) -> CmfResult<f64> {
    optional_number(map, key)?
        .ok_or_else(|| CmfError::out_of_range(key, "missing required parameter"))
}

/// Domain parameters with defaults for anything not given.
///
/// # Errors
/// `OutOfRangeParameter` for values that are not numbers.
pub fn parse_domain(map: &ParamMap) -> CmfResult<DomainParams> {
    Ok(DomainParams::new(
        optional_number(map, "min")?.unwrap_or(Defaults::MIN),
        optional_number(map, "max")?.unwrap_or(Defaults::MAX),
        optional_number(map, "step_size")?.unwrap_or(Defaults::STEP),
    ))
}

/// Flags given as individual booleans and/or as an `optional` list.
///
/// # Errors
/// `OutOfRangeParameter` for an unknown name in the `optional` list or a
/// value that is not a boolean.
pub fn parse_flags(map: &ParamMap) -> CmfResult<Flags> {
    let mut flags = Flags::default();

    for name in Flags::NAMES {
        if let Some(value) = map.get_normalized(name) {
            if coerce_boolean(name, value)? {
                set_flag(name, &mut flags);
            }
        }
    }

    if let Some(value) = map.get_normalized(OPTIONAL_KEY) {
        let names: Vec<String> = match value {
            ParamValue::Text(text) => text.split(',').map(|s| s.trim().to_ascii_lowercase()).collect(),
            ParamValue::List(items) => items
                .iter()
                .map(|item| match item {
                    ParamValue::Text(text) => Ok(text.trim().to_ascii_lowercase()),
                    other => Err(CmfError::out_of_range(
                        OPTIONAL_KEY,
                        format!("expected flag names, got {}", other.kind()),
                    )),
                })
                .collect::<CmfResult<_>>()?,
            other => {
                return Err(CmfError::out_of_range(
                    OPTIONAL_KEY,
                    format!("expected a comma-separated list, got {}", other.kind()),
                ));
            }
        };
        for name in names.iter().filter(|name| !name.is_empty()) {
            if !Flags::NAMES.contains(&name.as_str()) {
                let detail = match suggest(name, Flags::NAMES) {
                    Some(suggestion) => format!("unknown flag `{name}` (did you mean `{suggestion}`?)"),
                    None => format!("unknown flag `{name}`"),
                };
                return Err(CmfError::out_of_range("flag", detail));
            }
            set_flag(name, &mut flags);
        }
    }

    Ok(flags)
}

fn set_flag(name: &str, flags: &mut Flags) {
    match name {
        "log" => flags.log = true,
        "base" => flags.base = true,
        "norm" => flags.norm = true,
        "info" => flags.info = true,
        _ => {}
    }
}

/// Parameters of the physiological families.
///
/// Age is rounded to whole years before validation.
///
/// # Errors
/// `OutOfRangeParameter` for missing, malformed or unknown parameters.
pub fn parse_physiological(map: &ParamMap) -> CmfResult<(ObserverParams, DomainParams, Flags)> {
    reject_unknown_keys(map, true)?;
    let field_size = required_number(map, OBSERVER_KEYS[0])?;
    let age = required_number(map, OBSERVER_KEYS[1])?.round();
    let observer = ObserverParams::new(field_size, age)?;
    Ok((observer, parse_domain(map)?, parse_flags(map)?))
}

/// Parameters of the standard-observer families.
///
/// # Errors
/// `OutOfRangeParameter` for missing, malformed or unknown parameters,
/// `UnsupportedFieldSize` for a field size other than 2 or 10.
pub fn parse_standard(map: &ParamMap) -> CmfResult<(StandardField, DomainParams, Flags)> {
    reject_unknown_keys(map, false)?;
    let field = StandardField::from_field_size(required_number(map, OBSERVER_KEYS[0])?)?;
    Ok((field, parse_domain(map)?, parse_flags(map)?))
}

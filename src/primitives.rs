//! Built-in rule predicates.
//!
//! Every predicate returns `Ok(false)` for a failed check and `Err` only for
//! setup mistakes: an unparsable parameter or a rule applied to a kind of
//! value it has no meaning for. Absent values fail every rule except
//! `isdefault`.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

use crate::context::FieldLevel;
use crate::error::ConfigError;
use crate::value::{Value, values_equal};

// ─── Cached regexes ─────────────────────────────────────────────────────────

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?$").unwrap());

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z]+$").unwrap());

static ALPHANUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+$").unwrap());

// Local part per RFC 5322 atext (dot-atom), domain as dot-separated labels.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-zA-Z0-9!#$%&'*+/=?^_`{|}~-]+)*@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

// ─── Presence ───────────────────────────────────────────────────────────────

pub fn required(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(!fl.value().is_zero())
}

pub fn is_default(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(fl.value().is_zero())
}

// ─── Formats ────────────────────────────────────────────────────────────────

/// Strings holding a decimal number; numeric values always pass.
pub fn numeric(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(match fl.value() {
        Value::Str(s) => NUMERIC_RE.is_match(s),
        v => v.is_number(),
    })
}

/// Strings of ASCII digits; non-negative whole numbers.
pub fn number(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(match fl.value() {
        Value::Str(s) => NUMBER_RE.is_match(s),
        Value::Int(i) => *i >= 0,
        Value::Uint(_) => true,
        Value::Float(f) => *f >= 0.0 && f.fract() == 0.0,
        _ => false,
    })
}

pub fn alpha(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(fl.value().as_str().is_some_and(|s| ALPHA_RE.is_match(s)))
}

pub fn alphanum(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(fl.value().as_str().is_some_and(|s| ALPHANUM_RE.is_match(s)))
}

pub fn email(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    Ok(fl.value().as_str().is_some_and(|s| EMAIL_RE.is_match(s)))
}

// ─── Size comparisons ───────────────────────────────────────────────────────

pub fn len(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size == limit)
}

pub fn min(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size >= limit)
}

pub fn max(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size <= limit)
}

pub fn gt(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size > limit)
}

pub fn gte(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size >= limit)
}

pub fn lt(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size < limit)
}

pub fn lte(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    compare_size(fl, |size, limit| size <= limit)
}

fn compare_size(fl: &FieldLevel<'_>, op: fn(f64, f64) -> bool) -> Result<bool, ConfigError> {
    let limit = param_number(fl)?;
    Ok(size_of(fl, fl.value())?.is_some_and(|size| op(size, limit)))
}

/// Character count, element count or numeric value; `None` for absent values.
fn size_of(fl: &FieldLevel<'_>, value: &Value<'_>) -> Result<Option<f64>, ConfigError> {
    match value {
        Value::Nil => Ok(None),
        Value::Int(_) | Value::Uint(_) | Value::Float(_) => Ok(value.as_f64()),
        Value::Str(_) | Value::Seq(_) | Value::Map(_) => Ok(value.len().map(|n| n as f64)),
        other => Err(unsupported(fl, other)),
    }
}

fn param_number(fl: &FieldLevel<'_>) -> Result<f64, ConfigError> {
    fl.param()
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid_param(fl, "expected a number"))
}

// ─── Equality ───────────────────────────────────────────────────────────────

/// Strings compare their text, booleans their value, numbers numerically
/// and containers their length.
pub fn eq(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    let param = fl.param();
    match fl.value() {
        Value::Nil => Ok(false),
        Value::Str(s) => Ok(*s == param),
        Value::Bool(b) => param
            .trim()
            .parse::<bool>()
            .map(|p| p == *b)
            .map_err(|_| invalid_param(fl, "expected true or false")),
        v @ (Value::Int(_) | Value::Uint(_) | Value::Float(_)) => {
            Ok(v.as_f64() == Some(param_number(fl)?))
        }
        v @ (Value::Seq(_) | Value::Map(_)) => Ok(v.len().map(|n| n as f64) == Some(param_number(fl)?)),
        other => Err(unsupported(fl, other)),
    }
}

pub fn ne(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    if matches!(fl.value(), Value::Nil) {
        return Ok(false);
    }
    eq(fl).map(|equal| !equal)
}

/// Space-separated list of allowed values.
pub fn one_of(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    let mut options = fl.param().split_whitespace();
    match fl.value() {
        Value::Nil => Ok(false),
        Value::Str(s) => Ok(options.any(|o| o == *s)),
        v @ (Value::Int(_) | Value::Uint(_) | Value::Float(_)) => {
            let mut parsed = Vec::new();
            for option in options {
                let n = option
                    .parse::<f64>()
                    .map_err(|_| invalid_param(fl, "expected space-separated numbers"))?;
                parsed.push(n);
            }
            Ok(v.as_f64().is_some_and(|x| parsed.contains(&x)))
        }
        other => Err(unsupported(fl, other)),
    }
}

// ─── Substrings ─────────────────────────────────────────────────────────────

pub fn contains(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    text_check(fl, |s, p| s.contains(p))
}

pub fn starts_with(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    text_check(fl, |s, p| s.starts_with(p))
}

pub fn ends_with(fl: &FieldLevel<'_>) -> Result<bool, ConfigError> {
    text_check(fl, |s, p| s.ends_with(p))
}

fn text_check(fl: &FieldLevel<'_>, op: fn(&str, &str) -> bool) -> Result<bool, ConfigError> {
    match fl.value() {
        Value::Nil => Ok(false),
        Value::Str(s) => Ok(op(s, fl.param())),
        other => Err(unsupported(fl, other)),
    }
}

// ─── Cross-field ────────────────────────────────────────────────────────────

/// Exact equality with the related value; strings are case-sensitive.
pub fn eq_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    Ok(values_equal(fl.value(), other))
}

pub fn ne_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    Ok(!values_equal(fl.value(), other))
}

pub fn gt_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    compare_fields(fl, other, Ordering::is_gt)
}

pub fn gte_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    compare_fields(fl, other, Ordering::is_ge)
}

pub fn lt_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    compare_fields(fl, other, Ordering::is_lt)
}

pub fn lte_field(fl: &FieldLevel<'_>, other: &Value<'_>) -> Result<bool, ConfigError> {
    compare_fields(fl, other, Ordering::is_le)
}

/// Numbers compare by value, strings and containers by size. Comparing a
/// number with a string or container is a setup mistake.
fn compare_fields(
    fl: &FieldLevel<'_>,
    other: &Value<'_>,
    op: fn(Ordering) -> bool,
) -> Result<bool, ConfigError> {
    let value = fl.value();
    if value.is_number() != other.is_number()
        && !matches!(value, Value::Nil)
        && !matches!(other, Value::Nil)
    {
        return Err(unsupported(fl, other));
    }
    if let (Some(a), Some(b)) = (value.as_i128(), other.as_i128()) {
        return Ok(op(a.cmp(&b)));
    }
    match (size_of(fl, value)?, size_of(fl, other)?) {
        (Some(a), Some(b)) => Ok(a.partial_cmp(&b).is_some_and(op)),
        _ => Ok(false),
    }
}

// ─── Diagnostics ────────────────────────────────────────────────────────────

fn invalid_param(fl: &FieldLevel<'_>, reason: &str) -> ConfigError {
    ConfigError::InvalidParam {
        path: fl.path().to_string(),
        tag: fl.tag().to_string(),
        param: fl.param().to_string(),
        reason: reason.to_string(),
    }
}

fn unsupported(fl: &FieldLevel<'_>, value: &Value<'_>) -> ConfigError {
    ConfigError::UnsupportedKind {
        path: fl.path().to_string(),
        tag: fl.tag().to_string(),
        kind: value.type_label().to_string(),
    }
}

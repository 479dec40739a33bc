//! Rule evaluation: OR-groups, predicate dispatch and cross-field resolution.

use crate::context::FieldLevel;
use crate::error::{ConfigError, TagError};
use crate::registry::{Predicate, Registry};
use crate::types::RuleSpec;
use crate::value::Value;

/// Evaluates one rule against a field.
///
/// Returns `Ok(true)` when the primary branch or any OR alternative passes.
/// Branches are tried in declared order and evaluation stops at the first
/// pass. A branch that cannot be evaluated (unsupported kind, bad parameter)
/// does not hide a later branch that passes; its error is returned only when
/// no branch passes. A failing group is reported by the caller under the
/// primary branch.
pub fn evaluate_rule(
    registry: &Registry,
    rule: &RuleSpec,
    fl: FieldLevel<'_>,
) -> Result<bool, ConfigError> {
    let branches = std::iter::once((rule.name.as_str(), rule.param_str())).chain(
        rule.alternatives
            .iter()
            .map(|alt| (alt.name.as_str(), alt.param.as_deref().unwrap_or(""))),
    );

    let mut first_error = None;
    for (name, param) in branches {
        match evaluate_invocation(registry, name, param, fl) {
            Ok(true) => return Ok(true),
            Ok(false) => {}
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(false),
    }
}

fn evaluate_invocation<'a>(
    registry: &Registry,
    name: &'a str,
    param: &'a str,
    fl: FieldLevel<'a>,
) -> Result<bool, ConfigError> {
    let fl = fl.with_rule(name, param);
    let predicate = registry.predicate(name).ok_or_else(|| {
        ConfigError::tag(
            fl.path(),
            name,
            TagError::UnknownRule {
                name: name.to_string(),
            },
        )
    })?;

    match predicate {
        Predicate::Builtin(check) => check(&fl),
        Predicate::Custom(check) => Ok(check(&fl)),
        Predicate::BuiltinCross(check) => {
            let other = resolve_related(&fl)?;
            check(&fl, &other)
        }
        Predicate::CustomCross(check) => {
            let other = resolve_related(&fl)?;
            Ok(check(&fl, &other))
        }
    }
}

/// The value a cross-field rule compares against.
///
/// In pair mode this is the second value passed to `validate_pair`.
/// Otherwise the rule parameter names a field of the same composite;
/// a missing field is a configuration error.
pub fn resolve_related<'a>(fl: &FieldLevel<'a>) -> Result<Value<'a>, ConfigError> {
    if let Some(related) = fl.related() {
        return Ok(related.clone());
    }
    let name = fl.param();
    if !name.is_empty()
        && let Some(value) = fl.sibling(name)
    {
        return Ok(value);
    }
    Err(ConfigError::UnknownField {
        path: fl.path().to_string(),
        tag: fl.tag().to_string(),
        field: name.to_string(),
    })
}

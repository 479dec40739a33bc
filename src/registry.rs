use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::{FieldLevel, StructLevel};
use crate::enums::Directive;
use crate::error::{ConfigError, ValidationError};
use crate::parse::{RuleLookup, check_syntax, is_valid_name};
use crate::primitives;
use crate::value::{Structure, Value, type_id_of};

/// A user predicate over one field.
pub type RuleFn = dyn Fn(&FieldLevel<'_>) -> bool + Send + Sync;

/// A user predicate comparing a field with a related value: the sibling
/// named by the rule parameter, or the second value of `validate_pair`.
pub type CrossFieldFn = dyn Fn(&FieldLevel<'_>, &Value<'_>) -> bool + Send + Sync;

pub(crate) type StructFn = dyn Fn(&dyn Structure, &mut StructLevel<'_>) + Send + Sync;

pub(crate) type BuiltinFn = fn(&FieldLevel<'_>) -> Result<bool, ConfigError>;
pub(crate) type BuiltinCrossFn = fn(&FieldLevel<'_>, &Value<'_>) -> Result<bool, ConfigError>;

#[derive(Clone)]
pub(crate) enum Predicate {
    Builtin(BuiltinFn),
    BuiltinCross(BuiltinCrossFn),
    Custom(Arc<RuleFn>),
    CustomCross(Arc<CrossFieldFn>),
}

#[derive(Clone)]
pub(crate) struct StructValidator {
    pub(crate) type_name: &'static str,
    pub(crate) check: Arc<StructFn>,
}

// ─── Built-in rule table ────────────────────────────────────────────────────

/// An entry in the built-in rule table.
pub struct BuiltinRule {
    pub name: &'static str,
    pub(crate) check: Predicate,
}

/// Rules every [`Registry`] starts with.
pub static BUILTIN_RULES: &[BuiltinRule] = &[
    BuiltinRule {
        name: "required",
        check: Predicate::Builtin(primitives::required),
    },
    BuiltinRule {
        name: "isdefault",
        check: Predicate::Builtin(primitives::is_default),
    },
    BuiltinRule {
        name: "numeric",
        check: Predicate::Builtin(primitives::numeric),
    },
    BuiltinRule {
        name: "number",
        check: Predicate::Builtin(primitives::number),
    },
    BuiltinRule {
        name: "alpha",
        check: Predicate::Builtin(primitives::alpha),
    },
    BuiltinRule {
        name: "alphanum",
        check: Predicate::Builtin(primitives::alphanum),
    },
    BuiltinRule {
        name: "email",
        check: Predicate::Builtin(primitives::email),
    },
    BuiltinRule {
        name: "len",
        check: Predicate::Builtin(primitives::len),
    },
    BuiltinRule {
        name: "min",
        check: Predicate::Builtin(primitives::min),
    },
    BuiltinRule {
        name: "max",
        check: Predicate::Builtin(primitives::max),
    },
    BuiltinRule {
        name: "eq",
        check: Predicate::Builtin(primitives::eq),
    },
    BuiltinRule {
        name: "ne",
        check: Predicate::Builtin(primitives::ne),
    },
    BuiltinRule {
        name: "gt",
        check: Predicate::Builtin(primitives::gt),
    },
    BuiltinRule {
        name: "gte",
        check: Predicate::Builtin(primitives::gte),
    },
    BuiltinRule {
        name: "lt",
        check: Predicate::Builtin(primitives::lt),
    },
    BuiltinRule {
        name: "lte",
        check: Predicate::Builtin(primitives::lte),
    },
    BuiltinRule {
        name: "oneof",
        check: Predicate::Builtin(primitives::one_of),
    },
    BuiltinRule {
        name: "contains",
        check: Predicate::Builtin(primitives::contains),
    },
    BuiltinRule {
        name: "startswith",
        check: Predicate::Builtin(primitives::starts_with),
    },
    BuiltinRule {
        name: "endswith",
        check: Predicate::Builtin(primitives::ends_with),
    },
    BuiltinRule {
        name: "eqfield",
        check: Predicate::BuiltinCross(primitives::eq_field),
    },
    BuiltinRule {
        name: "nefield",
        check: Predicate::BuiltinCross(primitives::ne_field),
    },
    BuiltinRule {
        name: "necfield",
        check: Predicate::BuiltinCross(primitives::ne_field),
    },
    BuiltinRule {
        name: "gtfield",
        check: Predicate::BuiltinCross(primitives::gt_field),
    },
    BuiltinRule {
        name: "gtefield",
        check: Predicate::BuiltinCross(primitives::gte_field),
    },
    BuiltinRule {
        name: "ltfield",
        check: Predicate::BuiltinCross(primitives::lt_field),
    },
    BuiltinRule {
        name: "ltefield",
        check: Predicate::BuiltinCross(primitives::lte_field),
    },
];

/// Look up a built-in rule by name.
pub fn lookup_builtin(name: &str) -> Option<&'static BuiltinRule> {
    BUILTIN_RULES.iter().find(|r| r.name == name)
}

// ─── Registry ───────────────────────────────────────────────────────────────

/// Name resolution for rules, aliases, struct-level validators and message
/// templates.
///
/// Rule names and alias names share one namespace: an alias may not shadow a
/// rule and a rule may not shadow an alias. Re-registering a rule or an alias
/// under its own kind replaces it.
#[derive(Clone)]
pub struct Registry {
    rules: HashMap<String, Predicate>,
    aliases: HashMap<String, String>,
    struct_validators: HashMap<TypeId, StructValidator>,
    messages: HashMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// A registry holding the built-in rules.
    pub fn new() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|r| (r.name.to_string(), r.check.clone()))
            .collect();
        Registry {
            rules,
            aliases: HashMap::new(),
            struct_validators: HashMap::new(),
            messages: HashMap::new(),
        }
    }

    pub(crate) fn register_rule(&mut self, name: &str, predicate: Predicate) -> Result<(), ConfigError> {
        check_name(name)?;
        if self.aliases.contains_key(name) {
            return Err(ConfigError::NameConflict {
                name: name.to_string(),
                existing: "an alias",
            });
        }
        let replaced = self.rules.insert(name.to_string(), predicate).is_some();
        tracing::debug!(rule = %name, replaced, "registered rule");
        Ok(())
    }

    pub(crate) fn register_alias(&mut self, name: &str, expansion: &str) -> Result<(), ConfigError> {
        check_name(name)?;
        if self.rules.contains_key(name) {
            return Err(ConfigError::NameConflict {
                name: name.to_string(),
                existing: "a rule",
            });
        }
        check_syntax(expansion).map_err(|e| ConfigError::tag(name, expansion, e))?;
        self.aliases.insert(name.to_string(), expansion.to_string());
        tracing::debug!(alias = %name, expansion = %expansion, "registered alias");
        Ok(())
    }

    pub(crate) fn register_struct_validator<T, F>(&mut self, check: F)
    where
        T: Structure,
        F: Fn(&T, &mut StructLevel<'_>) + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let erased = move |s: &dyn Structure, level: &mut StructLevel<'_>| {
            let any: &dyn std::any::Any = s;
            if let Some(concrete) = any.downcast_ref::<T>() {
                check(concrete, level);
            }
        };
        self.struct_validators.insert(
            TypeId::of::<T>(),
            StructValidator {
                type_name,
                check: Arc::new(erased),
            },
        );
        tracing::debug!(composite = type_name, "registered struct validator");
    }

    pub(crate) fn register_message(&mut self, tag: &str, template: &str) {
        self.messages.insert(tag.to_string(), template.to_string());
    }

    pub(crate) fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.rules.get(name)
    }

    pub(crate) fn struct_validator(&self, s: &dyn Structure) -> Option<&StructValidator> {
        self.struct_validators.get(&type_id_of(s))
    }

    /// Registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Registered aliases and their expansions, sorted by name.
    pub fn aliases(&self) -> Vec<(&str, &str)> {
        let mut aliases: Vec<(&str, &str)> = self
            .aliases
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Type names of composites with a struct-level validator, sorted.
    pub fn struct_validator_types(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.struct_validators.values().map(|v| v.type_name).collect();
        names.sort_unstable();
        names
    }

    /// Builds a report entry, applying the message template registered for
    /// `tag` when there is one.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn make_error(
        &self,
        path: String,
        field: &str,
        struct_field: &str,
        tag: &str,
        actual_tag: &str,
        param: &str,
        value: &Value<'_>,
    ) -> ValidationError {
        let mut error = ValidationError {
            message: ValidationError::default_message(&path, field, tag),
            path,
            field: field.to_string(),
            struct_field: struct_field.to_string(),
            tag: tag.to_string(),
            actual_tag: actual_tag.to_string(),
            param: param.to_string(),
            value: value.to_json(),
        };
        if let Some(template) = self.messages.get(tag) {
            error.message = ValidationError::render_message(template, &error);
        }
        error
    }
}

impl RuleLookup for Registry {
    fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    fn alias(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("rules", &self.rule_names())
            .field("aliases", &self.aliases())
            .field("struct_validators", &self.struct_validator_types())
            .field("messages", &self.messages.len())
            .finish()
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    if !is_valid_name(name) {
        return Err(ConfigError::InvalidName {
            name: name.to_string(),
            reason: "names use ASCII letters, digits and '_'".to_string(),
        });
    }
    if let Some(directive) = Directive::from_token(name) {
        return Err(ConfigError::InvalidName {
            name: name.to_string(),
            reason: format!("'{}' is a reserved directive", directive),
        });
    }
    Ok(())
}

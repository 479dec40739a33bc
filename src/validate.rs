//! The validator and its traversal engine.
//!
//! A [`Validator`] owns the rule registry, the configuration and a cache of
//! parsed tag plans. Validation walks the value depth-first in declaration
//! order, applies each field's plan and collects every rule failure into one
//! [`ValidationReport`]. Setup mistakes (bad tags, unknown fields, invalid
//! parameters) abort the walk with a [`ConfigError`] instead.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::config::ValidatorConfig;
use crate::context::{FieldLevel, StructLevel, join_path};
use crate::error::*;
use crate::evaluate::evaluate_rule;
use crate::parse::parse_tag;
use crate::registry::{Predicate, Registry};
use crate::types::{DivePlan, RuleSpec, TagPlan};
use crate::value::{Reflect, Structure, Value};

static DEFAULT_VALIDATOR: LazyLock<Validator> = LazyLock::new(Validator::new);

/// Validate a composite with the built-in rules and the default configuration.
///
/// Equivalent to `Validator::new().validate_struct(value)` but shares one
/// plan cache across calls.
pub fn validate<T: Structure>(value: &T) -> Result<ValidationReport, ConfigError> {
    DEFAULT_VALIDATOR.validate_struct(value)
}

// ─── Validator ──────────────────────────────────────────────────────────────

/// Rule registry plus plan cache.
///
/// Registration takes `&mut self`, so it cannot overlap with validation.
/// Once built, a validator is `Send + Sync` and any number of threads may
/// validate through a shared reference.
pub struct Validator {
    registry: Registry,
    config: ValidatorConfig,
    plans: RwLock<HashMap<String, Arc<TagPlan>>>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator with only the built-in rules.
    pub fn new() -> Self {
        Validator {
            registry: Registry::new(),
            config: ValidatorConfig::default(),
            plans: RwLock::new(HashMap::new()),
        }
    }

    /// A validator with the aliases and message templates of `config`
    /// registered up front.
    pub fn with_config(config: ValidatorConfig) -> Result<Self, ConfigError> {
        let mut validator = Validator::new();
        for (name, expansion) in &config.aliases {
            validator.register_alias(name, expansion)?;
        }
        for (tag, template) in &config.messages {
            validator.register_message(tag, template);
        }
        validator.config = config;
        Ok(validator)
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers (or replaces) a single-field rule.
    pub fn register_rule<F>(&mut self, name: &str, rule: F) -> Result<(), ConfigError>
    where
        F: Fn(&FieldLevel<'_>) -> bool + Send + Sync + 'static,
    {
        self.registry
            .register_rule(name, Predicate::Custom(Arc::new(rule)))?;
        self.plans.get_mut().clear();
        Ok(())
    }

    /// Registers (or replaces) a rule that compares the field with a related
    /// value: the sibling named by the parameter, or the second value of
    /// [`validate_pair`](Self::validate_pair).
    pub fn register_cross_field_rule<F>(&mut self, name: &str, rule: F) -> Result<(), ConfigError>
    where
        F: Fn(&FieldLevel<'_>, &Value<'_>) -> bool + Send + Sync + 'static,
    {
        self.registry
            .register_rule(name, Predicate::CustomCross(Arc::new(rule)))?;
        self.plans.get_mut().clear();
        Ok(())
    }

    /// Registers (or replaces) an alias. The expansion is syntax-checked now;
    /// the rules it names are resolved when a tag using it is parsed.
    pub fn register_alias(&mut self, name: &str, expansion: &str) -> Result<(), ConfigError> {
        self.registry.register_alias(name, expansion)?;
        self.plans.get_mut().clear();
        Ok(())
    }

    /// Registers a validator that runs after the field rules of every `T`.
    ///
    /// `T: Structure` means only composites can carry one; a validator for a
    /// type that is never validated simply never runs.
    pub fn register_struct_validator<T, F>(&mut self, check: F)
    where
        T: Structure,
        F: Fn(&T, &mut StructLevel<'_>) + Send + Sync + 'static,
    {
        self.registry.register_struct_validator::<T, F>(check);
    }

    /// Sets the message template used for failures of `tag`.
    pub fn register_message(&mut self, tag: &str, template: &str) {
        self.registry.register_message(tag, template);
    }

    /// The parsed plan for `tag`, from the cache when possible.
    pub fn plan(&self, tag: &str) -> Result<Arc<TagPlan>, ConfigError> {
        self.cached_plan(tag)
            .map_err(|e| ConfigError::tag("", tag, e))
    }

    /// Number of distinct tags parsed since the last registration.
    pub fn cached_plans(&self) -> usize {
        self.plans.read().len()
    }

    fn cached_plan(&self, tag: &str) -> Result<Arc<TagPlan>, TagError> {
        if let Some(plan) = self.plans.read().get(tag) {
            return Ok(Arc::clone(plan));
        }
        let plan = Arc::new(parse_tag(tag, &self.registry)?);
        tracing::trace!(tag = %tag, rules = plan.rule_names().len(), "parsed tag plan");
        let mut plans = self.plans.write();
        let cached = plans.entry(tag.to_string()).or_insert(plan);
        Ok(Arc::clone(cached))
    }

    // ─── Entry points ───────────────────────────────────────────────────────

    /// Validates every declared field of `value`, recursing into nested
    /// composites, then runs struct-level validators.
    pub fn validate_struct<T: Structure>(&self, value: &T) -> Result<ValidationReport, ConfigError> {
        let mut walker = Walker::new(self, Some(value), None);
        walker.walk_struct(value, "", 0)?;
        Ok(walker.finish())
    }

    /// Validates a standalone value against `tag`. Errors carry an empty path
    /// and field name.
    pub fn validate_value<T: Reflect + ?Sized>(
        &self,
        value: &T,
        tag: &str,
    ) -> Result<ValidationReport, ConfigError> {
        let plan = self.plan(tag)?;
        let value = value.reflect();
        let mut walker = Walker::new(self, value.as_struct(), None);
        walker.walk_field(&value, &Site::root(), &plan, 0)?;
        Ok(walker.finish())
    }

    /// Validates `value` against `tag`, with `related` as the comparison
    /// target of every cross-field rule in the tag.
    pub fn validate_pair<A, B>(
        &self,
        value: &A,
        related: &B,
        tag: &str,
    ) -> Result<ValidationReport, ConfigError>
    where
        A: Reflect + ?Sized,
        B: Reflect + ?Sized,
    {
        let plan = self.plan(tag)?;
        let value = value.reflect();
        let related = related.reflect();
        let mut walker = Walker::new(self, value.as_struct(), Some(&related));
        walker.walk_field(&value, &Site::root(), &plan, 0)?;
        Ok(walker.finish())
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("cached_plans", &self.cached_plans())
            .finish()
    }
}

// ─── Traversal ──────────────────────────────────────────────────────────────

/// Where a value sits: its names and the composite that declares it.
struct Site<'s, 'v> {
    field: &'s str,
    struct_field: &'s str,
    path: &'s str,
    parent: Option<&'v dyn Structure>,
}

impl Site<'static, '_> {
    fn root() -> Self {
        Site {
            field: "",
            struct_field: "",
            path: "",
            parent: None,
        }
    }
}

struct Walker<'v> {
    validator: &'v Validator,
    top: Option<&'v dyn Structure>,
    related: Option<&'v Value<'v>>,
    errors: Vec<ValidationError>,
}

impl<'v> Walker<'v> {
    fn new(
        validator: &'v Validator,
        top: Option<&'v dyn Structure>,
        related: Option<&'v Value<'v>>,
    ) -> Self {
        Walker {
            validator,
            top,
            related,
            errors: Vec::new(),
        }
    }

    fn finish(self) -> ValidationReport {
        tracing::debug!(errors = self.errors.len(), "validation finished");
        ValidationReport {
            errors: self.errors,
        }
    }

    fn check_depth(&self, path: &str, depth: usize) -> Result<(), ConfigError> {
        let max = self.validator.config.max_depth;
        if depth > max {
            return Err(ConfigError::DepthExceeded {
                path: path.to_string(),
                max,
            });
        }
        Ok(())
    }

    fn walk_struct(
        &mut self,
        current: &'v dyn Structure,
        prefix: &str,
        depth: usize,
    ) -> Result<(), ConfigError> {
        self.check_depth(prefix, depth)?;

        let fields = current.fields();
        for field in &fields {
            let path = join_path(prefix, field.name);
            let plan = self
                .validator
                .cached_plan(field.tag)
                .map_err(|e| ConfigError::tag(&path, field.tag, e))?;
            let site = Site {
                field: field.name,
                struct_field: field.struct_name,
                path: &path,
                parent: Some(current),
            };
            self.walk_field(&field.value, &site, &plan, depth)?;
        }

        if let Some(validator) = self.validator.registry.struct_validator(current) {
            let mut level = StructLevel {
                current,
                top: self.top,
                path: prefix,
                registry: &self.validator.registry,
                errors: Vec::new(),
            };
            (validator.check)(current, &mut level);
            self.errors.append(&mut level.errors);
        }
        Ok(())
    }

    fn walk_field(
        &mut self,
        value: &Value<'v>,
        site: &Site<'_, 'v>,
        plan: &TagPlan,
        depth: usize,
    ) -> Result<(), ConfigError> {
        if plan.skip {
            return Ok(());
        }
        self.check_depth(site.path, depth)?;
        if plan.omit_empty && value.is_zero() {
            return Ok(());
        }

        let rules_apply = self.validator.config.struct_rules || !matches!(value, Value::Struct(_));
        let passed = !rules_apply || self.check_rules(value, site, &plan.rules)?;

        // A nested record is walked even when its own rules failed; a
        // failed container is not dived.
        match (&plan.dive, value) {
            (Some(_), _) if !passed => Ok(()),
            (Some(dive), _) => self.walk_dive(value, site, dive, depth),
            (None, Value::Struct(inner)) => self.walk_struct(*inner, site.path, depth + 1),
            (None, _) => Ok(()),
        }
    }

    /// Runs `rules` in order. The first failure is recorded and ends this
    /// level; returns whether every rule passed.
    fn check_rules(
        &mut self,
        value: &Value<'v>,
        site: &Site<'_, 'v>,
        rules: &[RuleSpec],
    ) -> Result<bool, ConfigError> {
        let registry = &self.validator.registry;
        let fl = FieldLevel {
            value,
            field: site.field,
            struct_field: site.struct_field,
            path: site.path,
            tag: "",
            param: "",
            parent: site.parent,
            top: self.top,
            related: self.related,
        };
        for rule in rules {
            if !evaluate_rule(registry, rule, fl)? {
                let error = registry.make_error(
                    site.path.to_string(),
                    site.field,
                    site.struct_field,
                    rule.reported_tag(),
                    &rule.name,
                    rule.param_str(),
                    value,
                );
                self.errors.push(error);
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn walk_dive(
        &mut self,
        value: &Value<'v>,
        site: &Site<'_, 'v>,
        dive: &DivePlan,
        depth: usize,
    ) -> Result<(), ConfigError> {
        match value {
            Value::Nil => Ok(()),
            Value::Seq(items) => {
                if dive.keys.is_some() {
                    return Err(ConfigError::KeysOnNonMap {
                        path: site.path.to_string(),
                        kind: value.kind(),
                    });
                }
                for (index, item) in items.iter().enumerate() {
                    let key = index.to_string();
                    self.walk_element(item, site, &key, &dive.elements, depth)?;
                }
                Ok(())
            }
            Value::Map(entries) => {
                let mut sorted: Vec<(String, &(Value<'v>, Value<'v>))> =
                    entries.iter().map(|e| (e.0.key_text(), e)).collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                for (key, (k, v)) in sorted {
                    if let Some(keys) = &dive.keys {
                        self.walk_element(k, site, &key, keys, depth)?;
                    }
                    self.walk_element(v, site, &key, &dive.elements, depth)?;
                }
                Ok(())
            }
            Value::Struct(inner) if dive.keys.is_none() && dive.elements.is_empty() => {
                self.walk_struct(*inner, site.path, depth + 1)
            }
            other => Err(ConfigError::InvalidDive {
                path: site.path.to_string(),
                kind: other.kind(),
            }),
        }
    }

    /// Walks one sequence element, map key or map value, named `Field[key]`.
    fn walk_element(
        &mut self,
        value: &Value<'v>,
        site: &Site<'_, 'v>,
        key: &str,
        plan: &TagPlan,
        depth: usize,
    ) -> Result<(), ConfigError> {
        let field = format!("{}[{}]", site.field, key);
        let struct_field = format!("{}[{}]", site.struct_field, key);
        let path = format!("{}[{}]", site.path, key);
        let element = Site {
            field: &field,
            struct_field: &struct_field,
            path: &path,
            parent: site.parent,
        };
        self.walk_field(value, &element, plan, depth + 1)
    }
}

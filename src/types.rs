use serde::{Deserialize, Serialize};

// ─── Parsed tag plans ───────────────────────────────────────────────────────

/// The parsed form of one tag string. Immutable once built; shared through
/// the validator's plan cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagPlan {
    /// Set by the tag `-`: the field is ignored entirely.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub skip: bool,
    /// Set by `omitempty`: zero values skip this level.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub omit_empty: bool,
    /// Rules applied to the value itself, in declared order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<RuleSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dive: Option<Box<DivePlan>>,
}

impl TagPlan {
    /// True when the plan neither checks nor dives.
    pub fn is_empty(&self) -> bool {
        !self.skip && !self.omit_empty && self.rules.is_empty() && self.dive.is_none()
    }

    /// Names of every rule this plan can invoke, nested plans included.
    pub fn rule_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_names(&mut names);
        names
    }

    fn collect_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for rule in &self.rules {
            names.push(rule.name.as_str());
            names.extend(rule.alternatives.iter().map(|a| a.name.as_str()));
        }
        if let Some(dive) = &self.dive {
            if let Some(keys) = &dive.keys {
                keys.collect_names(names);
            }
            dive.elements.collect_names(names);
        }
    }
}

/// What happens below a `dive`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DivePlan {
    /// Rules for map keys (`keys ... endkeys`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<TagPlan>,
    /// Rules for each element of a sequence or each value of a map.
    #[serde(default)]
    pub elements: TagPlan,
}

// ─── Rules ──────────────────────────────────────────────────────────────────

/// One rule invocation, possibly with OR alternatives (`a|b=1|c`).
///
/// The group passes when any branch passes. When every branch fails the
/// primary branch (`name`/`param`) is the one reported.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    /// The alias this rule was expanded from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<Alternative>,
}

impl RuleSpec {
    pub fn new(name: impl Into<String>, param: Option<String>) -> Self {
        RuleSpec {
            name: name.into(),
            param,
            alias: None,
            alternatives: Vec::new(),
        }
    }

    pub fn param_str(&self) -> &str {
        self.param.as_deref().unwrap_or("")
    }

    /// The tag reported on failure: the alias name when there is one.
    pub fn reported_tag(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A non-primary branch of an OR-group.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
}

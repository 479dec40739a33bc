//! Handles passed to user predicates and struct-level validators.

use crate::error::ValidationError;
use crate::registry::Registry;
use crate::value::{Reflect, Structure, Value};

// ─── FieldLevel ─────────────────────────────────────────────────────────────

/// Read access to the field a rule is being evaluated against.
#[derive(Clone, Copy)]
pub struct FieldLevel<'a> {
    pub(crate) value: &'a Value<'a>,
    pub(crate) field: &'a str,
    pub(crate) struct_field: &'a str,
    pub(crate) path: &'a str,
    pub(crate) tag: &'a str,
    pub(crate) param: &'a str,
    pub(crate) parent: Option<&'a dyn Structure>,
    pub(crate) top: Option<&'a dyn Structure>,
    pub(crate) related: Option<&'a Value<'a>>,
}

impl<'a> FieldLevel<'a> {
    /// The value under validation.
    pub fn value(&self) -> &'a Value<'a> {
        self.value
    }

    pub fn field_name(&self) -> &'a str {
        self.field
    }

    pub fn struct_field_name(&self) -> &'a str {
        self.struct_field
    }

    /// Path from the validated root, e.g. `Addresses[1].City`.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Name of the rule being evaluated.
    pub fn tag(&self) -> &'a str {
        self.tag
    }

    /// The rule parameter, or `""` when the rule has none.
    pub fn param(&self) -> &'a str {
        self.param
    }

    /// The composite that declares this field.
    pub fn parent(&self) -> Option<&'a dyn Structure> {
        self.parent
    }

    /// The composite passed to `validate_struct`.
    pub fn top(&self) -> Option<&'a dyn Structure> {
        self.top
    }

    /// A field of the parent composite, by declared name. Dotted names walk
    /// into nested composites.
    pub fn sibling(&self, name: &str) -> Option<Value<'a>> {
        self.parent?.lookup(name)
    }

    /// The second value given to `validate_pair`.
    pub fn related(&self) -> Option<&'a Value<'a>> {
        self.related
    }

    pub(crate) fn with_rule(self, tag: &'a str, param: &'a str) -> Self {
        FieldLevel { tag, param, ..self }
    }
}

// ─── StructLevel ────────────────────────────────────────────────────────────

/// Handle given to struct-level validators: read access to the composite
/// and a way to report errors against it.
pub struct StructLevel<'a> {
    pub(crate) current: &'a dyn Structure,
    pub(crate) top: Option<&'a dyn Structure>,
    pub(crate) path: &'a str,
    pub(crate) registry: &'a Registry,
    pub(crate) errors: Vec<ValidationError>,
}

impl<'a> StructLevel<'a> {
    /// The composite being validated.
    pub fn current(&self) -> &'a dyn Structure {
        self.current
    }

    pub fn top(&self) -> Option<&'a dyn Structure> {
        self.top
    }

    /// Path of the composite from the validated root (`""` at the root).
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Records one error at `<composite path>.<field_name>`.
    pub fn report_error<V: Reflect + ?Sized>(
        &mut self,
        value: &V,
        field_name: &str,
        struct_field_name: &str,
        tag: &str,
        param: &str,
    ) {
        let error = self.registry.make_error(
            join_path(self.path, field_name),
            field_name,
            struct_field_name,
            tag,
            tag,
            param,
            &value.reflect(),
        );
        self.errors.push(error);
    }

    /// Number of errors reported so far through this handle.
    pub fn reported(&self) -> usize {
        self.errors.len()
    }
}

pub(crate) fn join_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

//! The field accessor boundary.
//!
//! The engine never inspects host types directly. Everything it validates is
//! first viewed as a borrowed [`Value`]: scalars, sequences, maps, and
//! composites that expose their declared fields through [`Structure`].
//! [`Reflect`] produces that view and is implemented here for the standard
//! containers, the primitive types and `serde_json::Value`; the
//! [`fields!`](crate::fields) macro implements both traits for user records.

use serde_json::Number;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;
use std::rc::Rc;
use std::sync::Arc;

use crate::enums::Kind;

// ─── Value ──────────────────────────────────────────────────────────────────

/// Borrowed, shape-classified view of a value under validation.
#[derive(Clone)]
pub enum Value<'a> {
    /// An absent value (`None`, JSON `null`).
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(&'a str),
    Seq(Vec<Value<'a>>),
    /// Entries in the container's own iteration order.
    Map(Vec<(Value<'a>, Value<'a>)>),
    Struct(&'a dyn Structure),
}

impl<'a> Value<'a> {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Seq(_) => Kind::Sequence,
            Value::Map(_) => Kind::Map,
            Value::Struct(_) => Kind::Composite,
            _ => Kind::Scalar,
        }
    }

    /// The zero value of its type: `""`, `0`, `false`, absent, empty
    /// containers, and composites whose every field is zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !*b,
            Value::Int(i) => *i == 0,
            Value::Uint(u) => *u == 0,
            Value::Float(f) => *f == 0.0,
            Value::Str(s) => s.is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Struct(s) => s.fields().iter().all(|f| f.value.is_zero()),
        }
    }

    /// Character count for strings, element count for containers.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::Seq(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Uint(u) => Some(*u as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Exact integer view of `Int` and `Uint`, wide enough for both.
    pub fn as_i128(&self) -> Option<i128> {
        match self {
            Value::Int(i) => Some(i128::from(*i)),
            Value::Uint(u) => Some(i128::from(*u)),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Str(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_struct(&self) -> Option<&'a dyn Structure> {
        match self {
            Value::Struct(s) => Some(*s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Uint(_) | Value::Float(_))
    }

    /// Short type label used in diagnostics.
    pub fn type_label(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::Struct(s) => s.type_name(),
        }
    }

    /// Text used for map-key paths and map ordering.
    pub fn key_text(&self) -> String {
        match self {
            Value::Nil => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.to_string(),
            other => other.to_json().to_string(),
        }
    }

    /// JSON rendering, used to record offending values in reports.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Uint(u) => serde_json::Value::Number((*u).into()),
            Value::Float(f) => Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.to_string()),
            Value::Seq(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(entries) => serde_json::Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.key_text(), v.to_json()))
                    .collect(),
            ),
            Value::Struct(s) => serde_json::Value::Object(
                s.fields()
                    .iter()
                    .map(|f| (f.name.to_string(), f.value.to_json()))
                    .collect(),
            ),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("Nil"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Uint(u) => f.debug_tuple("Uint").field(u).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Struct(s) => f.debug_tuple("Struct").field(&s.type_name()).finish(),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        values_equal(self, other)
    }
}

/// Deep equality. Numbers compare by value across integer and float forms
/// (`42 == 42.0`); map entry order is irrelevant; composites must share a
/// type and have equal fields.
pub fn values_equal(a: &Value<'_>, b: &Value<'_>) -> bool {
    match (a, b) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Uint(a), Value::Uint(b)) => a == b,
        (Value::Str(a), Value::Str(b)) => a == b,
        (Value::Int(a), Value::Uint(b)) | (Value::Uint(b), Value::Int(a)) => {
            i128::from(*a) == i128::from(*b)
        }
        (a, b) if a.is_number() && b.is_number() => a.as_f64() == b.as_f64(),
        (Value::Seq(a), Value::Seq(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(a, b)| values_equal(a, b))
        }
        (Value::Map(a), Value::Map(b)) => {
            a.len() == b.len()
                && a.iter().all(|(ka, va)| {
                    b.iter()
                        .any(|(kb, vb)| values_equal(ka, kb) && values_equal(va, vb))
                })
        }
        (Value::Struct(a), Value::Struct(b)) => {
            let (ta, tb) = (type_id_of(*a), type_id_of(*b));
            if ta != tb {
                return false;
            }
            let (fa, fb) = (a.fields(), b.fields());
            fa.len() == fb.len()
                && fa
                    .iter()
                    .zip(fb.iter())
                    .all(|(x, y)| x.name == y.name && values_equal(&x.value, &y.value))
        }
        _ => false,
    }
}

// ─── Composites ─────────────────────────────────────────────────────────────

/// A record whose declared fields carry validation tags.
///
/// Usually implemented with the [`fields!`](crate::fields) macro.
pub trait Structure: Any + 'static {
    /// Fields in declaration order.
    fn fields(&self) -> Vec<Field<'_>>;

    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// The value of the field declared as `name`.
    fn field(&self, name: &str) -> Option<Value<'_>> {
        self.fields()
            .into_iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }
}

impl dyn Structure {
    /// Resolves a dotted field name (`Address.City`) through nested composites.
    pub fn lookup(&self, path: &str) -> Option<Value<'_>> {
        let mut segments = path.split('.');
        let mut current = self.field(segments.next()?)?;
        for segment in segments {
            current = current.as_struct()?.field(segment)?;
        }
        Some(current)
    }
}

pub(crate) fn type_id_of(s: &dyn Structure) -> TypeId {
    let any: &dyn Any = s;
    any.type_id()
}

/// Descriptor for one declared field of a [`Structure`].
#[derive(Clone, Debug)]
pub struct Field<'a> {
    /// Name used in error paths.
    pub name: &'static str,
    /// Rust-side name; equals `name` unless the field was renamed.
    pub struct_name: &'static str,
    /// Raw validation tag.
    pub tag: &'static str,
    pub value: Value<'a>,
}

impl<'a> Field<'a> {
    pub fn new(name: &'static str, tag: &'static str, value: Value<'a>) -> Self {
        Field {
            name,
            struct_name: name,
            tag,
            value,
        }
    }

    pub fn renamed(
        name: &'static str,
        struct_name: &'static str,
        tag: &'static str,
        value: Value<'a>,
    ) -> Self {
        Field {
            name,
            struct_name,
            tag,
            value,
        }
    }
}

// ─── Reflect ────────────────────────────────────────────────────────────────

/// Produces the [`Value`] view the engine validates.
pub trait Reflect {
    fn reflect(&self) -> Value<'_>;
}

impl Reflect for Value<'_> {
    fn reflect(&self) -> Value<'_> {
        self.clone()
    }
}

impl Reflect for str {
    fn reflect(&self) -> Value<'_> {
        Value::Str(self)
    }
}

impl Reflect for String {
    fn reflect(&self) -> Value<'_> {
        Value::Str(self.as_str())
    }
}

impl Reflect for Cow<'_, str> {
    fn reflect(&self) -> Value<'_> {
        Value::Str(self.as_ref())
    }
}

impl Reflect for bool {
    fn reflect(&self) -> Value<'_> {
        Value::Bool(*self)
    }
}

macro_rules! reflect_as {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl Reflect for $t {
                fn reflect(&self) -> Value<'_> {
                    Value::$variant(*self as $target)
                }
            }
        )*
    };
}

reflect_as!(Int, i64: i8, i16, i32, i64, isize);
reflect_as!(Uint, u64: u8, u16, u32, u64, usize);
reflect_as!(Float, f64: f32, f64);

impl<T: Reflect + ?Sized> Reflect for &T {
    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Box<T> {
    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Arc<T> {
    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }
}

impl<T: Reflect + ?Sized> Reflect for Rc<T> {
    fn reflect(&self) -> Value<'_> {
        (**self).reflect()
    }
}

/// `None` is absent (`Nil`). A present value is validated as the inner value
/// itself, with no presence marker: `Some(0)` and `Some(String::new())` are
/// zero, so they fail `required` and are skipped by `omitempty` just like
/// `0` and `""`.
impl<T: Reflect> Reflect for Option<T> {
    fn reflect(&self) -> Value<'_> {
        match self {
            Some(v) => v.reflect(),
            None => Value::Nil,
        }
    }
}

impl<T: Reflect> Reflect for [T] {
    fn reflect(&self) -> Value<'_> {
        Value::Seq(self.iter().map(Reflect::reflect).collect())
    }
}

impl<T: Reflect, const N: usize> Reflect for [T; N] {
    fn reflect(&self) -> Value<'_> {
        self.as_slice().reflect()
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    fn reflect(&self) -> Value<'_> {
        self.as_slice().reflect()
    }
}

impl<K: Reflect, V: Reflect, S: BuildHasher> Reflect for HashMap<K, V, S> {
    fn reflect(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}

impl<K: Reflect, V: Reflect> Reflect for BTreeMap<K, V> {
    fn reflect(&self) -> Value<'_> {
        Value::Map(self.iter().map(|(k, v)| (k.reflect(), v.reflect())).collect())
    }
}

impl Reflect for serde_json::Value {
    fn reflect(&self) -> Value<'_> {
        match self {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(u) = n.as_u64() {
                    Value::Uint(u)
                } else {
                    n.as_f64().map(Value::Float).unwrap_or(Value::Nil)
                }
            }
            serde_json::Value::String(s) => Value::Str(s.as_str()),
            serde_json::Value::Array(items) => Value::Seq(items.iter().map(Reflect::reflect).collect()),
            serde_json::Value::Object(map) => Value::Map(
                map.iter()
                    .map(|(k, v)| (Value::Str(k.as_str()), v.reflect()))
                    .collect(),
            ),
        }
    }
}

//! Closed enumerations used by the parser and the traversal engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape classification of a value, as seen by the traversal engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Strings, numbers, booleans and absent values.
    Scalar,
    /// Ordered collections.
    Sequence,
    /// Associative collections.
    Map,
    /// Records exposing named fields through [`crate::Structure`].
    Composite,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Scalar => "scalar",
            Kind::Sequence => "sequence",
            Kind::Map => "map",
            Kind::Composite => "composite",
        };
        f.write_str(name)
    }
}

/// Reserved tag tokens that steer traversal instead of naming a predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Directive {
    Dive,
    Keys,
    EndKeys,
    OmitEmpty,
}

impl Directive {
    /// All directives, in the order they are documented.
    pub const ALL: [Directive; 4] = [
        Directive::Dive,
        Directive::Keys,
        Directive::EndKeys,
        Directive::OmitEmpty,
    ];

    /// The token spelling used in tag strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Directive::Dive => "dive",
            Directive::Keys => "keys",
            Directive::EndKeys => "endkeys",
            Directive::OmitEmpty => "omitempty",
        }
    }

    /// Recognizes a directive token.
    pub fn from_token(token: &str) -> Option<Directive> {
        Directive::ALL.into_iter().find(|d| d.as_str() == token)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

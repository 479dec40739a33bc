//! Declarative, tag-driven validation for nested Rust data.
//!
//! Every validated field carries a tag string such as
//! `"required,dive,keys,required,min=2,endkeys,required"`. The engine parses
//! each tag once into a [`TagPlan`], walks the value depth-first, and
//! collects every rule failure into a [`ValidationReport`]:
//!
//! ```text
//! tag → parse_tag → TagPlan (cached)
//! value → Reflect → Value → walk(plan) → ValidationReport
//! ```
//!
//! Rule failures are data; setup mistakes such as unknown rules, bad
//! parameters or unknown sibling fields are returned as [`ConfigError`].
//!
//! # Quick Start
//!
//! ```rust
//! use tagcheck::{fields, Validator};
//!
//! struct Address {
//!     city: String,
//!     country: String,
//! }
//!
//! struct Customer {
//!     name: String,
//!     addresses: Vec<Address>,
//! }
//!
//! fields!(Address {
//!     city as "City": "required",
//!     country as "Country": "required",
//! });
//!
//! fields!(Customer {
//!     name as "Name": "required",
//!     addresses as "Addresses": "required,dive",
//! });
//!
//! let customer = Customer {
//!     name: "Rizky".into(),
//!     addresses: vec![
//!         Address { city: "Jakarta".into(), country: "Indonesia".into() },
//!         Address { city: "".into(), country: "Indonesia".into() },
//!     ],
//! };
//!
//! let report = Validator::new().validate_struct(&customer).expect("well-formed tags");
//! assert_eq!(report.tags(), vec![("Addresses[1].City", "required")]);
//! ```
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `yaml`  | yes     | YAML configuration loading and report output via [`serde_saphyr`]. Enables [`ValidatorConfig::from_yaml`] and [`serialize::to_yaml`]. |

pub mod config;
pub mod context;
pub mod enums;
pub mod error;
pub mod evaluate;
pub mod parse;
pub mod primitives;
pub mod registry;
pub mod serialize;
pub mod types;
pub mod validate;
pub mod value;

mod macros;

pub use error::*;
pub use types::*;

pub use config::ValidatorConfig;
pub use context::{FieldLevel, StructLevel};
pub use enums::{Directive, Kind};
pub use parse::parse_tag;
pub use registry::Registry;
pub use validate::{Validator, validate};
pub use value::{Field, Reflect, Structure, Value};

//! Field descriptor generation.

/// Implements [`Structure`](crate::Structure) and [`Reflect`](crate::Reflect)
/// for a record by listing its validated fields and their tags, in
/// declaration order.
///
/// A field may be given a different name for error paths with `as`:
///
/// ```rust
/// use tagcheck::{fields, Validator};
///
/// struct Login {
///     email: String,
///     password: String,
/// }
///
/// fields!(Login {
///     email as "Email": "required,email",
///     password as "Password": "required,min=5",
/// });
///
/// let validator = Validator::new();
/// let report = validator
///     .validate_struct(&Login { email: "rizk".into(), password: "pass".into() })
///     .unwrap();
/// assert_eq!(report.tags(), vec![("Email", "email"), ("Password", "min")]);
/// ```
///
/// Fields left out of the list are invisible to the engine. Every listed
/// field type must implement [`Reflect`](crate::Reflect).
#[macro_export]
macro_rules! fields {
    ($ty:ty { $($field:ident $(as $name:literal)? : $tag:literal),* $(,)? }) => {
        impl $crate::Structure for $ty {
            fn fields(&self) -> ::std::vec::Vec<$crate::Field<'_>> {
                ::std::vec![
                    $(
                        $crate::Field::renamed(
                            $crate::__field_name!($field $(, $name)?),
                            ::std::stringify!($field),
                            $tag,
                            $crate::Reflect::reflect(&self.$field),
                        )
                    ),*
                ]
            }
        }

        impl $crate::Reflect for $ty {
            fn reflect(&self) -> $crate::Value<'_> {
                $crate::Value::Struct(self)
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_name {
    ($field:ident) => {
        ::std::stringify!($field)
    };
    ($field:ident, $name:literal) => {
        $name
    };
}

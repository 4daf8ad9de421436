//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i64` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Ord`
/// - Conversion methods: `new()`, `as_i64()`
/// - `From<i64>` and `Into<i64>` implementations
/// - `FromStr` so IDs can be taken straight from URL path segments
///
/// # Example
///
/// ```rust
/// # use routine_advisor_core::define_id;
/// define_id!(ProductId);
/// define_id!(BundleId);
///
/// let product_id = ProductId::new(1);
/// let bundle_id = BundleId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ProductId = bundle_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            /// Create a new ID from an i64 value.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// Get the underlying i64 value.
            #[must_use]
            pub const fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_id_serializes_as_bare_integer() {
        let json = serde_json::to_string(&ProductId::new(42)).expect("serialize");
        assert_eq!(json, "42");

        let id: ProductId = serde_json::from_str("7").expect("deserialize");
        assert_eq!(id.as_i64(), 7);
    }

    #[test]
    fn test_product_id_from_str() {
        assert_eq!("12".parse::<ProductId>().ok(), Some(ProductId::new(12)));
        assert!("twelve".parse::<ProductId>().is_err());
    }
}

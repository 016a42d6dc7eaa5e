//! Newtype IDs for type-safe entity references.
//!
//! Documents are keyed by `MongoDB` `ObjectId`s. Over HTTP and in the client
//! those travel as their 24-character hex form, so IDs wrap a `String`.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
/// - `ObjectId` conversions (with `mongodb` feature)
///
/// # Example
///
/// ```rust
/// # use fullstack_core::define_id;
/// define_id!(OrderId);
/// define_id!(InvoiceId);
///
/// let order_id = OrderId::new("65a1f0c2e4b0a1b2c3d4e5f6");
/// assert_eq!(order_id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
///
/// // These are different types, so this won't compile:
/// // let _: InvoiceId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "mongodb")]
        impl From<::mongodb::bson::oid::ObjectId> for $name {
            fn from(id: ::mongodb::bson::oid::ObjectId) -> Self {
                Self(id.to_hex())
            }
        }

        #[cfg(feature = "mongodb")]
        impl $name {
            /// Parse the ID as a `MongoDB` `ObjectId`.
            ///
            /// Returns `None` when the string is not 24 hex characters, which
            /// callers treat the same as an unknown document.
            #[must_use]
            pub fn to_object_id(&self) -> Option<::mongodb::bson::oid::ObjectId> {
                ::mongodb::bson::oid::ObjectId::parse_str(&self.0).ok()
            }
        }
    };
}

// Define standard entity IDs
define_id!(UserId);

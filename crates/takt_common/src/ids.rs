//! The ordered id-newtype macro shared by the analysis crates.
//!
//! Takt's arena ids split into two families. Ids defined through
//! [`define_ordered_id!`] wrap a `u32` index whose total order carries
//! domain meaning: blocks and edges sort by program order, event
//! variables by the global variable order of the run. Ids whose
//! equality is pure identity — canonical diagram node ids, where the
//! arena index stands in for pointer equality and an index-based order
//! would be structural nonsense — are written by hand without `Ord`
//! (the meaningful order over diagram nodes is their structural
//! comparison, not their allocation order).

/// Defines an ordered, copyable `u32` id newtype.
///
/// The invocation names the order the raw index carries; it is spliced
/// into the generated docs. Besides the usual derive set, the expansion
/// provides `const` `from_raw`/`as_raw` accessors and explicit
/// `PartialOrd`/`Ord` impls over the raw index, so the domain order is
/// part of the type's contract rather than an accident of a derive
/// list.
#[macro_export]
macro_rules! define_ordered_id {
    ($(#[$meta:meta])* $name:ident ordered by $order:literal) => {
        $(#[$meta])*
        #[doc = ""]
        #[doc = concat!("Ids are totally ordered by ", $order, ".")]
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates an id from its raw `u32` index.
            pub const fn from_raw(index: u32) -> Self {
                Self(index)
            }

            /// Returns the raw `u32` index.
            pub const fn as_raw(self) -> u32 {
                self.0
            }
        }

        impl ::core::cmp::PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> ::core::option::Option<::core::cmp::Ordering> {
                ::core::option::Option::Some(self.cmp(other))
            }
        }

        impl ::core::cmp::Ord for $name {
            fn cmp(&self, other: &Self) -> ::core::cmp::Ordering {
                self.0.cmp(&other.0)
            }
        }
    };
}

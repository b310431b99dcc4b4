//! Render any [`serde`](https://docs.rs/serde)-serializable value as short, human-readable text
//! for assertion failure messages.
//!
//! The main entry point to the crate is [`describe`]. Values can override their rendering by
//! implementing [`SelfDescribing`], and any value can be given a fixed description with
//! [`Described`].
//!
//! ```
//! use describe_value::{Described, describe};
//! use maplit::btreemap;
//!
//! // Strings are quoted, composites are described all the way down.
//! assert_eq!(describe(&("id", 7)), r#"("id", 7)"#);
//! assert_eq!(describe(&vec![1, 2, 3]), "[1, 2, 3]");
//! assert_eq!(describe(&btreemap! { "k" => vec![(1, 2)] }), r#"{"k":[(1, 2)]}"#);
//! assert_eq!(describe(&(1..=5)), "1..5");
//! assert_eq!(describe(&None::<u32>), "null");
//!
//! // A caller-supplied description replaces the generic rendering.
//! assert_eq!(describe(&Described::new("an even number", 42)), "an even number");
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub(crate) mod describe;
pub(crate) mod described;
pub(crate) mod errors;
pub(crate) mod ser;

pub use describe::{Description, describe, try_describe};
pub use described::{Described, SelfDescribing, serialize_description};
pub use errors::DescribeError;
pub use ser::DescribeSerializer;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}

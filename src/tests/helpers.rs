use crate::{Description, describe, try_describe};
use serde::{Serialize, Serializer, ser::Error as _};
use std::fmt::Debug;

pub(crate) fn check_describes<T: Serialize + Debug + ?Sized>(value: &T, expected: &str) {
    let fallible = try_describe(value);
    assert_eq!(
        fallible.as_deref(),
        Ok(expected),
        "VALUE: {value:#?}\n\nDESCRIBED (fallible): {fallible:?}"
    );
    assert_eq!(describe(value), expected, "VALUE: {value:#?}");
    assert_eq!(
        Description(value).to_string(),
        expected,
        "VALUE: {value:#?}"
    );
}

/// Serializes a few elements, then fails.
#[derive(Debug)]
pub(crate) struct FailsAfter(pub(crate) usize);

impl Serialize for FailsAfter {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeSeq;

        let mut sequence = serializer.serialize_seq(None)?;
        for index in 0..self.0 {
            sequence.serialize_element(&index)?;
        }
        Err(S::Error::custom(format!("gave up after {}", self.0)))
    }
}

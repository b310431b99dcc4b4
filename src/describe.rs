use crate::{errors::DescribeError, ser::DescribeSerializer};
use serde::Serialize;
use std::fmt;

/// Formats `value` to be included in a description.
///
/// Strings are quoted, with `\` and `"` escaped. `None` is `null`. Elements of tuples, ranges,
/// sequences and maps are described recursively. A value that serializes a self-description
/// (see [`SelfDescribing`][`crate::SelfDescribing`]) is described by that text alone. Anything
/// else uses its natural textual form.
///
/// serde serializes fixed-size arrays as tuples, so `[1, 2]` is described as `(1, 2)`; only
/// the empty array is described as `[]`. Use a slice or a `Vec` to get sequence rendering.
///
/// Never fails: if the value's own `Serialize` impl errors, the error is rendered in place as
/// `<undescribable: ...>`. There is no cycle detection, so a self-referential value recurses
/// until the stack overflows.
pub fn describe<T>(value: &T) -> String
where
    T: Serialize + ?Sized,
{
    try_describe(value).unwrap_or_else(|error| format!("<undescribable: {error}>"))
}

/// Like [`describe`], but returns any error raised while serializing `value`.
pub fn try_describe<T>(value: &T) -> Result<String, DescribeError>
where
    T: Serialize + ?Sized,
{
    let mut output = String::new();
    value.serialize(DescribeSerializer::new(&mut output))?;
    Ok(output)
}

/// Displays the [`describe`] text of the wrapped value.
///
/// ```
/// use describe_value::Description;
///
/// let message = format!("expected {}", Description(&Some("yes")));
/// assert_eq!(message, r#"expected "yes""#);
/// ```
pub struct Description<'a, T: ?Sized>(pub &'a T);

impl<T: ?Sized> Clone for Description<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for Description<'_, T> {}

impl<T> fmt::Display for Description<'_, T>
where
    T: Serialize + ?Sized,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&describe(self.0))
    }
}

impl<T> fmt::Debug for Description<'_, T>
where
    T: Serialize + ?Sized,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, formatter)
    }
}

use thiserror::Error;

/// Reasons a value could not be described. Only surfaced by
/// [`try_describe`][`crate::try_describe`]; [`describe`][`crate::describe`] renders them inline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescribeError {
    /// The value's `Serialize` implementation reported an error of its own.
    #[error("{0}")]
    Custom(String),

    /// A self-description token wrapped something other than a string.
    #[error("self-description must be a string")]
    MalformedDescription,

    /// A `Display` impl reached through `collect_str` failed.
    #[error("formatting failed")]
    Format(#[from] std::fmt::Error),
}

impl serde::ser::Error for DescribeError {
    #[inline]
    fn custom<T>(msg: T) -> Self
    where
        T: std::fmt::Display,
    {
        DescribeError::Custom(msg.to_string())
    }
}

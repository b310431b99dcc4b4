use serde::{Serialize, Serializer};
use std::{fmt, rc::Rc, sync::Arc};

/// Newtype struct name reserved for carrying a self-description through serde.
///
/// [`DescribeSerializer`][`crate::DescribeSerializer`] emits the wrapped string verbatim. Every
/// other serializer sees an ordinary newtype struct around a string.
pub(crate) const DESCRIPTION_TOKEN: &str = "$describe_value::private::Description";

/// A value that can describe itself.
///
/// A self-description takes precedence over every generic rendering rule except `None`. To be
/// picked up by [`describe`][`crate::describe`], the type's `Serialize` impl must forward to
/// [`serialize_description`], which
/// [`impl_serialize_via_description!`][`crate::impl_serialize_via_description`] generates.
pub trait SelfDescribing {
    /// Returns the description of this value.
    fn description(&self) -> String;
}

impl<T> SelfDescribing for &T
where
    T: SelfDescribing + ?Sized,
{
    #[inline]
    fn description(&self) -> String {
        (**self).description()
    }
}

impl<T> SelfDescribing for &mut T
where
    T: SelfDescribing + ?Sized,
{
    #[inline]
    fn description(&self) -> String {
        (**self).description()
    }
}

impl<T> SelfDescribing for Box<T>
where
    T: SelfDescribing + ?Sized,
{
    #[inline]
    fn description(&self) -> String {
        (**self).description()
    }
}

impl<T> SelfDescribing for Rc<T>
where
    T: SelfDescribing + ?Sized,
{
    #[inline]
    fn description(&self) -> String {
        (**self).description()
    }
}

impl<T> SelfDescribing for Arc<T>
where
    T: SelfDescribing + ?Sized,
{
    #[inline]
    fn description(&self) -> String {
        (**self).description()
    }
}

macro_rules! impl_serialize_for_trait_objects {
    ($($object:ty),+ $(,)?) => {
        $(
            impl Serialize for $object {
                #[inline]
                fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
                where
                    S: Serializer,
                {
                    serialize_description(self, serializer)
                }
            }
        )+
    };
}

impl_serialize_for_trait_objects!(
    dyn SelfDescribing + '_,
    dyn SelfDescribing + Send + '_,
    dyn SelfDescribing + Send + Sync + '_,
);

/// Serializes `value` as its self-description.
///
/// Intended as the body of a hand-written `Serialize` impl:
///
/// ```
/// use describe_value::{SelfDescribing, describe, serialize_description};
/// use serde::{Serialize, Serializer};
///
/// struct Port(u16);
///
/// impl SelfDescribing for Port {
///     fn description(&self) -> String {
///         format!("port {}", self.0)
///     }
/// }
///
/// impl Serialize for Port {
///     fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
///         serialize_description(self, serializer)
///     }
/// }
///
/// assert_eq!(describe(&vec![Port(80), Port(443)]), "[port 80, port 443]");
/// ```
#[inline]
pub fn serialize_description<T, S>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    T: SelfDescribing + ?Sized,
    S: Serializer,
{
    serializer.serialize_newtype_struct(DESCRIPTION_TOKEN, &value.description())
}

/// Implements `Serialize` for the listed types by forwarding to [`serialize_description`].
///
/// ```
/// use describe_value::{SelfDescribing, describe, impl_serialize_via_description};
///
/// struct Anything;
///
/// impl SelfDescribing for Anything {
///     fn description(&self) -> String {
///         "anything".to_owned()
///     }
/// }
///
/// impl_serialize_via_description!(Anything);
///
/// assert_eq!(describe(&Some(Anything)), "anything");
/// ```
#[macro_export]
macro_rules! impl_serialize_via_description {
    ($($type:ty),+ $(,)?) => {
        $(
            impl $crate::__private::serde::Serialize for $type {
                #[inline]
                fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
                where
                    S: $crate::__private::serde::Serializer,
                {
                    $crate::serialize_description(self, serializer)
                }
            }
        )+
    };
}

/// Combines a value with a caller-supplied description.
///
/// The description is used verbatim whenever the `Described` flows through
/// [`describe`][`crate::describe`], whatever the held value is. `T` needs no `Serialize` impl.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Described<T> {
    description: String,
    value: T,
}

impl<T> Described<T> {
    /// Pairs `value` with `description`.
    #[inline]
    pub fn new(description: impl Into<String>, value: T) -> Self {
        Self {
            description: description.into(),
            value,
        }
    }

    /// The description of [`value`][`Self::value`].
    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The value being described.
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Discards the description.
    #[inline]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> SelfDescribing for Described<T> {
    #[inline]
    fn description(&self) -> String {
        self.description.clone()
    }
}

impl<T> Serialize for Described<T> {
    #[inline]
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(DESCRIPTION_TOKEN, &self.description)
    }
}

impl<T> fmt::Display for Described<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.description)
    }
}

impl<T> fmt::Debug for Described<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Described")
            .field("description", &self.description)
            .field("value", &self.value)
            .finish()
    }
}

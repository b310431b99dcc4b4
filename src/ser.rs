use crate::{described::DESCRIPTION_TOKEN, errors::DescribeError};
use serde::{
    Serialize,
    ser::{
        Impossible, SerializeMap, SerializeSeq, SerializeStruct, SerializeStructVariant,
        SerializeTuple, SerializeTupleStruct, SerializeTupleVariant, Serializer,
    },
};
use std::fmt::{Display, Write};

/// A [`Serializer`] which appends the description of the serialized value to a `String`.
///
/// [`describe`][`crate::describe`] is the usual entry point; use this directly to describe into
/// an existing buffer.
///
/// ```
/// use describe_value::DescribeSerializer;
/// use serde::Serialize;
///
/// let mut output = String::from("got ");
/// vec![("a", 1)].serialize(DescribeSerializer::new(&mut output))?;
/// assert_eq!(output, r#"got [("a", 1)]"#);
/// # Ok::<_, describe_value::DescribeError>(())
/// ```
pub struct DescribeSerializer<'a> {
    output: &'a mut String,
}

impl<'a> DescribeSerializer<'a> {
    /// Creates a serializer appending to `output`.
    #[inline]
    pub fn new(output: &'a mut String) -> Self {
        Self { output }
    }

    #[inline]
    fn display(self, value: impl Display) -> Result<(), DescribeError> {
        write!(self.output, "{value}")?;
        Ok(())
    }
}

// Only `\` and `"` are escaped, so a single pass is equivalent to escaping backslashes before
// quotes.
fn push_quoted(output: &mut String, text: &str) {
    output.reserve(text.len() + 2);
    output.push('"');
    for character in text.chars() {
        match character {
            '\\' => output.push_str("\\\\"),
            '"' => output.push_str("\\\""),
            character => output.push(character),
        }
    }
    output.push('"');
}

#[inline]
fn describe_into<T>(output: &mut String, value: &T) -> Result<(), DescribeError>
where
    T: Serialize + ?Sized,
{
    value.serialize(DescribeSerializer::new(output))
}

impl<'a> Serializer for DescribeSerializer<'a> {
    type Ok = ();
    type Error = DescribeError;

    type SerializeSeq = ListDescriber<'a>;
    type SerializeTuple = ListDescriber<'a>;
    type SerializeTupleStruct = ListDescriber<'a>;
    type SerializeTupleVariant = ListDescriber<'a>;
    type SerializeMap = MapDescriber<'a>;
    type SerializeStruct = StructDescriber<'a>;
    type SerializeStructVariant = StructDescriber<'a>;

    #[inline]
    fn serialize_bool(self, value: bool) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_i8(self, value: i8) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_i16(self, value: i16) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_i32(self, value: i32) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_i64(self, value: i64) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_i128(self, value: i128) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_u8(self, value: u8) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_u16(self, value: u16) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_u32(self, value: u32) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_u64(self, value: u64) -> Result<(), DescribeError> {
        self.display(value)
    }

    #[inline]
    fn serialize_u128(self, value: u128) -> Result<(), DescribeError> {
        self.display(value)
    }

    // Debug keeps the `.0` on whole numbers.
    #[inline]
    fn serialize_f32(self, value: f32) -> Result<(), DescribeError> {
        self.display(format_args!("{value:?}"))
    }

    #[inline]
    fn serialize_f64(self, value: f64) -> Result<(), DescribeError> {
        self.display(format_args!("{value:?}"))
    }

    #[inline]
    fn serialize_char(self, value: char) -> Result<(), DescribeError> {
        self.output.push(value);
        Ok(())
    }

    #[inline]
    fn serialize_str(self, value: &str) -> Result<(), DescribeError> {
        push_quoted(self.output, value);
        Ok(())
    }

    fn serialize_bytes(self, value: &[u8]) -> Result<(), DescribeError> {
        let mut list = ListDescriber::open(self.output, Delimiters::Sequence);
        for byte in value {
            list.element(byte)?;
        }
        list.close()
    }

    #[inline]
    fn serialize_none(self) -> Result<(), DescribeError> {
        self.output.push_str("null");
        Ok(())
    }

    #[inline]
    fn serialize_some<T>(self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        value.serialize(self)
    }

    #[inline]
    fn serialize_unit(self) -> Result<(), DescribeError> {
        self.output.push_str("()");
        Ok(())
    }

    #[inline]
    fn serialize_unit_struct(self, name: &'static str) -> Result<(), DescribeError> {
        self.output.push_str(name);
        Ok(())
    }

    #[inline]
    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), DescribeError> {
        self.output.push_str(variant);
        Ok(())
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        if name == DESCRIPTION_TOKEN {
            return value.serialize(VerbatimSerializer {
                output: self.output,
            });
        }
        self.output.push_str(name);
        self.output.push('(');
        describe_into(self.output, value)?;
        self.output.push(')');
        Ok(())
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.output.push_str(variant);
        self.output.push('(');
        describe_into(self.output, value)?;
        self.output.push(')');
        Ok(())
    }

    #[inline]
    fn serialize_seq(self, _len: Option<usize>) -> Result<ListDescriber<'a>, DescribeError> {
        Ok(ListDescriber::open(self.output, Delimiters::Sequence))
    }

    #[inline]
    fn serialize_tuple(self, len: usize) -> Result<ListDescriber<'a>, DescribeError> {
        // `()` goes through `serialize_unit`, so an empty tuple can only be a `[T; 0]`.
        let delimiters = if len == 0 {
            Delimiters::Sequence
        } else {
            Delimiters::Tuple
        };
        Ok(ListDescriber::open(self.output, delimiters))
    }

    #[inline]
    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<ListDescriber<'a>, DescribeError> {
        self.output.push_str(name);
        Ok(ListDescriber::open(self.output, Delimiters::Named))
    }

    #[inline]
    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<ListDescriber<'a>, DescribeError> {
        self.output.push_str(variant);
        Ok(ListDescriber::open(self.output, Delimiters::Named))
    }

    #[inline]
    fn serialize_map(self, _len: Option<usize>) -> Result<MapDescriber<'a>, DescribeError> {
        self.output.push('{');
        Ok(MapDescriber {
            output: self.output,
            length: 0,
        })
    }

    #[inline]
    fn serialize_struct(
        self,
        name: &'static str,
        len: usize,
    ) -> Result<StructDescriber<'a>, DescribeError> {
        Ok(StructDescriber::new(self.output, name, len, true))
    }

    #[inline]
    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<StructDescriber<'a>, DescribeError> {
        Ok(StructDescriber::new(self.output, variant, len, false))
    }

    // Values serialized through `collect_str` (`fmt::Arguments`, hand-written impls) are rendered
    // as their `Display` text, not as a quoted string.
    #[inline]
    fn collect_str<T>(self, value: &T) -> Result<(), DescribeError>
    where
        T: Display + ?Sized,
    {
        self.display(value)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Delimiters {
    /// `[a, b]`
    Sequence,
    /// `(a,)`, `(a, b)`
    Tuple,
    /// `Name(a, b)`, or just `Name` when empty. The name is written by the caller.
    Named,
}

/// Describes sequences, tuples, tuple structs and tuple variants.
pub struct ListDescriber<'a> {
    output: &'a mut String,
    delimiters: Delimiters,
    length: usize,
}

impl<'a> ListDescriber<'a> {
    #[inline]
    fn open(output: &'a mut String, delimiters: Delimiters) -> Self {
        match delimiters {
            Delimiters::Sequence => output.push('['),
            Delimiters::Tuple => output.push('('),
            Delimiters::Named => {}
        }
        Self {
            output,
            delimiters,
            length: 0,
        }
    }

    fn element<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        match (self.length, self.delimiters) {
            (0, Delimiters::Named) => self.output.push('('),
            (0, _) => {}
            _ => self.output.push_str(", "),
        }
        self.length += 1;
        describe_into(self.output, value)
    }

    fn close(self) -> Result<(), DescribeError> {
        match (self.delimiters, self.length) {
            (Delimiters::Sequence, _) => self.output.push(']'),
            (Delimiters::Tuple, 1) => self.output.push_str(",)"),
            (Delimiters::Tuple, _) => self.output.push(')'),
            (Delimiters::Named, 0) => {}
            (Delimiters::Named, _) => self.output.push(')'),
        }
        Ok(())
    }
}

impl SerializeSeq for ListDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

impl SerializeTuple for ListDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_element<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

impl SerializeTupleStruct for ListDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

impl SerializeTupleVariant for ListDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_field<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.element(value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

/// Describes maps as `{key:value, key:value}`.
pub struct MapDescriber<'a> {
    output: &'a mut String,
    length: usize,
}

impl SerializeMap for MapDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        if self.length > 0 {
            self.output.push_str(", ");
        }
        self.length += 1;
        describe_into(self.output, key)?;
        self.output.push(':');
        Ok(())
    }

    #[inline]
    fn serialize_value<T>(&mut self, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        describe_into(self.output, value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.output.push('}');
        Ok(())
    }
}

/// Describes structs and struct variants as `Name { field: value }`.
///
/// Field descriptions are buffered until the end so that serde's `Range*` structs can be
/// recognised and rendered as ranges instead.
pub struct StructDescriber<'a> {
    output: &'a mut String,
    name: &'static str,
    fields: Vec<(&'static str, String)>,
    may_be_range: bool,
}

impl<'a> StructDescriber<'a> {
    #[inline]
    fn new(output: &'a mut String, name: &'static str, len: usize, may_be_range: bool) -> Self {
        Self {
            output,
            name,
            fields: Vec::with_capacity(len),
            may_be_range,
        }
    }

    fn field<T>(&mut self, key: &'static str, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        let mut description = String::new();
        describe_into(&mut description, value)?;
        self.fields.push((key, description));
        Ok(())
    }

    fn write_range(&mut self) -> bool {
        let range = match (self.name, self.fields.as_slice()) {
            ("RangeInclusive", [("start", start), ("end", end)]) => format!("{start}..{end}"),
            ("Range", [("start", start), ("end", end)]) => format!("{start}..<{end}"),
            ("RangeFrom", [("start", start)]) => format!("{start}.."),
            ("RangeTo", [("end", end)]) => format!("..{end}"),
            _ => return false,
        };
        self.output.push_str(&range);
        true
    }

    fn close(mut self) -> Result<(), DescribeError> {
        if self.may_be_range && self.write_range() {
            return Ok(());
        }
        self.output.push_str(self.name);
        if self.fields.is_empty() {
            return Ok(());
        }
        self.output.push_str(" { ");
        for (index, (key, description)) in self.fields.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(key);
            self.output.push_str(": ");
            self.output.push_str(description);
        }
        self.output.push_str(" }");
        Ok(())
    }
}

impl SerializeStruct for StructDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.field(key, value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

impl SerializeStructVariant for StructDescriber<'_> {
    type Ok = ();
    type Error = DescribeError;

    #[inline]
    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        self.field(key, value)
    }

    #[inline]
    fn end(self) -> Result<(), DescribeError> {
        self.close()
    }
}

/// Accepts only a string, which is appended unmodified. Used for the payload of a
/// self-description token.
struct VerbatimSerializer<'a> {
    output: &'a mut String,
}

macro_rules! reject_all {
    ($($method:ident($($arg:ty),*) -> $ok:ty;)+) => {
        $(
            #[inline]
            fn $method(self, $(_: $arg),*) -> Result<$ok, DescribeError> {
                Err(DescribeError::MalformedDescription)
            }
        )+
    };
}

impl Serializer for VerbatimSerializer<'_> {
    type Ok = ();
    type Error = DescribeError;

    type SerializeSeq = Impossible<(), DescribeError>;
    type SerializeTuple = Impossible<(), DescribeError>;
    type SerializeTupleStruct = Impossible<(), DescribeError>;
    type SerializeTupleVariant = Impossible<(), DescribeError>;
    type SerializeMap = Impossible<(), DescribeError>;
    type SerializeStruct = Impossible<(), DescribeError>;
    type SerializeStructVariant = Impossible<(), DescribeError>;

    #[inline]
    fn serialize_str(self, value: &str) -> Result<(), DescribeError> {
        self.output.push_str(value);
        Ok(())
    }

    reject_all! {
        serialize_bool(bool) -> ();
        serialize_i8(i8) -> ();
        serialize_i16(i16) -> ();
        serialize_i32(i32) -> ();
        serialize_i64(i64) -> ();
        serialize_i128(i128) -> ();
        serialize_u8(u8) -> ();
        serialize_u16(u16) -> ();
        serialize_u32(u32) -> ();
        serialize_u64(u64) -> ();
        serialize_u128(u128) -> ();
        serialize_f32(f32) -> ();
        serialize_f64(f64) -> ();
        serialize_char(char) -> ();
        serialize_bytes(&[u8]) -> ();
        serialize_none() -> ();
        serialize_unit() -> ();
        serialize_unit_struct(&'static str) -> ();
        serialize_unit_variant(&'static str, u32, &'static str) -> ();
        serialize_seq(Option<usize>) -> Self::SerializeSeq;
        serialize_tuple(usize) -> Self::SerializeTuple;
        serialize_tuple_struct(&'static str, usize) -> Self::SerializeTupleStruct;
        serialize_tuple_variant(&'static str, u32, &'static str, usize) -> Self::SerializeTupleVariant;
        serialize_map(Option<usize>) -> Self::SerializeMap;
        serialize_struct(&'static str, usize) -> Self::SerializeStruct;
        serialize_struct_variant(&'static str, u32, &'static str, usize) -> Self::SerializeStructVariant;
    }

    #[inline]
    fn serialize_some<T>(self, _value: &T) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        Err(DescribeError::MalformedDescription)
    }

    #[inline]
    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        Err(DescribeError::MalformedDescription)
    }

    #[inline]
    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<(), DescribeError>
    where
        T: Serialize + ?Sized,
    {
        Err(DescribeError::MalformedDescription)
    }
}

use super::helpers::{FailsAfter, check_describes};
use crate::{
    DescribeError, DescribeSerializer, Described, SelfDescribing, describe,
    described::DESCRIPTION_TOKEN, impl_serialize_via_description, serialize_description,
    try_describe,
};
use maplit::btreemap;
use serde::{Serialize, Serializer};
use std::{fmt, rc::Rc, sync::Arc};

#[derive(Debug)]
struct Even;

impl SelfDescribing for Even {
    fn description(&self) -> String {
        "an even number".to_owned()
    }
}

impl_serialize_via_description!(Even);

// Would otherwise render as a quoted sequence of strings.
#[derive(Debug)]
struct Tags(Vec<&'static str>);

impl SelfDescribing for Tags {
    fn description(&self) -> String {
        format!("tags {}", self.0.join("+"))
    }
}

impl Serialize for Tags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serialize_description(self, serializer)
    }
}

struct Opaque;

#[derive(Debug)]
struct Malformed;

impl Serialize for Malformed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(DESCRIPTION_TOKEN, &5u32)
    }
}

struct BrokenDisplay;

impl fmt::Display for BrokenDisplay {
    fn fmt(&self, _formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[derive(Debug)]
struct CollectsBrokenDisplay;

impl Serialize for CollectsBrokenDisplay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&BrokenDisplay)
    }
}

#[test]
fn test_described_ignores_value() {
    check_describes(&Described::new("custom", 42), "custom");
}

#[test]
fn test_described_takes_precedence_over_strings() {
    check_describes(&Described::new("text", "abc"), "text");
}

#[test]
fn test_described_takes_precedence_over_composites() {
    check_describes(&Described::new("a list", vec![1, 2]), "a list");
    check_describes(&Described::new("a pair", (1, "x")), "a pair");
    check_describes(&Described::new("a range", 1..=5), "a range");
    check_describes(&Described::new("a map", btreemap! { 1 => 2 }), "a map");
}

#[test]
fn test_described_is_not_escaped() {
    check_describes(
        &Described::new(r#"say "hi" \o/"#, ()),
        r#"say "hi" \o/"#,
    );
}

#[test]
fn test_empty_description() {
    check_describes(&Described::new("", 1), "");
}

#[test]
fn test_described_without_serialize_value() {
    assert_eq!(describe(&Described::new("opaque", Opaque)), "opaque");
}

#[test]
fn test_described_nested_in_composites() {
    check_describes(
        &vec![Described::new("one", 1), Described::new("two", 2)],
        "[one, two]",
    );
    check_describes(
        &btreemap! { "k" => Described::new("v", 0) },
        r#"{"k":v}"#,
    );
    check_describes(&(Described::new("a", 1), 2), "(a, 2)");
    check_describes(&(Described::new("low", 1)..=Described::new("high", 9)), "low..high");
}

#[test]
fn test_none_precedes_self_description() {
    check_describes(&None::<Described<u8>>, "null");
    check_describes(&Some(Described::new("present", 0u8)), "present");
}

#[test]
fn test_described_accessors() {
    let described = Described::new("the answer", 42);
    assert_eq!(described.description(), "the answer");
    assert_eq!(*described.value(), 42);
    assert_eq!(SelfDescribing::description(&described), "the answer");
    assert_eq!(described.to_string(), "the answer");
    assert_eq!(
        format!("{described:?}"),
        r#"Described { description: "the answer", value: 42 }"#
    );
    assert_eq!(described.into_inner(), 42);
}

#[test]
fn test_self_describing_via_macro() {
    check_describes(&Even, "an even number");
    check_describes(&vec![Even, Even], "[an even number, an even number]");
}

#[test]
fn test_self_describing_takes_precedence_over_sequences() {
    check_describes(&Tags(vec!["a", "b"]), "tags a+b");
}

#[test]
fn test_self_describing_forwarding() {
    assert_eq!((&Even).description(), "an even number");
    assert_eq!((&mut Even).description(), "an even number");
    assert_eq!(Box::new(Even).description(), "an even number");
    assert_eq!(Rc::new(Even).description(), "an even number");
    assert_eq!(Arc::new(Even).description(), "an even number");

    let boxed: Box<dyn SelfDescribing> = Box::new(Tags(vec!["x"]));
    assert_eq!(boxed.description(), "tags x");
}

#[test]
fn test_smart_pointers_keep_self_description() {
    check_describes(&Box::new(Even), "an even number");
    check_describes(&Arc::new(Described::new("shared", 1)), "shared");
}

#[test]
fn test_other_serializers_see_the_description() {
    assert_eq!(
        serde_json::to_string(&Described::new("custom", 42)).unwrap(),
        r#""custom""#
    );
    assert_eq!(
        serde_json::to_string(&vec![Even]).unwrap(),
        r#"["an even number"]"#
    );
}

#[test]
fn test_malformed_description() {
    assert_eq!(try_describe(&Malformed), Err(DescribeError::MalformedDescription));
    assert_eq!(
        describe(&vec![Malformed]),
        "<undescribable: self-description must be a string>"
    );
}

#[test]
fn test_serialize_error_is_rendered_inline() {
    assert_eq!(
        try_describe(&FailsAfter(2)),
        Err(DescribeError::Custom("gave up after 2".to_owned()))
    );
    assert_eq!(describe(&FailsAfter(2)), "<undescribable: gave up after 2>");
    assert_eq!(
        describe(&btreemap! { "k" => FailsAfter(0) }),
        "<undescribable: gave up after 0>"
    );
}

#[test]
fn test_display_error_is_rendered_inline() {
    assert_eq!(
        try_describe(&CollectsBrokenDisplay),
        Err(DescribeError::Format(fmt::Error))
    );
    assert_eq!(
        describe(&CollectsBrokenDisplay),
        "<undescribable: formatting failed>"
    );
}

#[test]
fn test_serializer_appends() {
    let mut output = String::from("expected ");
    (1, Even)
        .serialize(DescribeSerializer::new(&mut output))
        .unwrap();
    output.push_str(" got ");
    "x".serialize(DescribeSerializer::new(&mut output)).unwrap();
    assert_eq!(output, r#"expected (1, an even number) got "x""#);
}

#[test]
fn test_trait_objects_are_describable() {
    let boxed: Box<dyn SelfDescribing> = Box::new(Even);
    assert_eq!(describe(&boxed), "an even number");

    let borrowed: &dyn SelfDescribing = &Tags(vec!["a"]);
    assert_eq!(describe(borrowed), "tags a");

    let sendable: Box<dyn SelfDescribing + Send> = Box::new(Described::new("sent", 1));
    assert_eq!(describe(&sendable), "sent");

    let even: Arc<dyn SelfDescribing + Send + Sync> = Arc::new(Even);
    let labeled: Arc<dyn SelfDescribing + Send + Sync> = Arc::new(Described::new("shared", ()));
    let shared = vec![even, labeled];
    assert_eq!(describe(&shared), "[an even number, shared]");
}

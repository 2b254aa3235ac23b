//! Property-based round-trip tests.
//!
//! Random element trees are rendered to canonical vdproj text and pushed
//! through both conversions; names and values go through the codecs on the way.

use proptest::prelude::*;
use vdproj::common::escape::{escape, unescape};
use vdproj::prelude::*;
use vdproj::text::LineEnding;
use vdproj::xml::name::{decode_name, encode_name};

/// A vdproj subtree.
#[derive(Debug, Clone)]
enum Node {
    Valued(String, String, String),
    Keyless(String, String),
    Bare(String),
    Block(String, Vec<Node>),
    KeylessBlock(String, String, Vec<Node>),
}

impl Node {
    fn events(&self, out: &mut Vec<Event>) {
        match self {
            Node::Valued(key, value_type, value) => {
                out.push(Event::Open(Element::valued(key.clone(), value_type.clone(), value.clone())));
                out.push(Event::Close);
            }
            Node::Keyless(value_type, value) => {
                out.push(Event::Open(Element::keyless(value_type.clone(), value.clone())));
                out.push(Event::Close);
            }
            Node::Bare(key) => {
                out.push(Event::Open(Element::key(key.clone())));
                out.push(Event::Close);
            }
            Node::Block(key, children) => {
                out.push(Event::Open(Element::key(key.clone())));
                block_events(children, out);
            }
            Node::KeylessBlock(value_type, value, children) => {
                out.push(Event::Open(Element::keyless(value_type.clone(), value.clone())));
                block_events(children, out);
            }
        }
    }
}

fn block_events(children: &[Node], out: &mut Vec<Event>) {
    if children.is_empty() {
        out.push(Event::Blank);
    }
    for child in children {
        child.events(out);
    }
    out.push(Event::Close);
}

/// Keys of value-less elements; a colon would turn them into keyless entries.
fn block_key() -> impl Strategy<Value = String> {
    "[^:\\p{Cc}]{0,12}"
}

fn leaf_key() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z][A-Za-z0-9]{0,10}",
        "[^\\p{Cc}]{0,12}",
    ]
}

fn value_text() -> impl Strategy<Value = String> {
    "[^\\p{Cc}]{0,16}"
}

/// Value type and value of a keyless entry; neither may contain a quote.
fn keyless_parts() -> impl Strategy<Value = (String, String)> {
    ("[^:\"\\p{Cc}]{0,12}", "[^\"\\p{Cc}]{0,16}")
}

fn leaf() -> impl Strategy<Value = Node> {
    prop_oneof![
        (leaf_key(), "[0-9]{1,2}", value_text()).prop_map(|(k, t, v)| Node::Valued(k, t, v)),
        keyless_parts().prop_map(|(t, v)| Node::Keyless(t, v)),
        block_key().prop_map(Node::Bare),
    ]
}

fn tree() -> impl Strategy<Value = Node> {
    let node = leaf().prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            (block_key(), prop::collection::vec(inner.clone(), 0..6))
                .prop_map(|(k, c)| Node::Block(k, c)),
            (keyless_parts(), prop::collection::vec(inner, 0..6))
                .prop_map(|((t, v), c)| Node::KeylessBlock(t, v, c)),
        ]
    });
    (block_key(), prop::collection::vec(node, 0..6)).prop_map(|(k, c)| Node::Block(k, c))
}

fn render_vdproj(events: &[Event]) -> String {
    let mut writer = VdprojWriter::new(Vec::new()).with_line_ending(LineEnding::CrLf);
    transfer(events.iter().cloned().map(Ok), &mut writer).unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

proptest! {
    #[test]
    fn name_codec_roundtrip(name in any::<String>()) {
        let encoded = encode_name(&name).into_owned();
        prop_assert!(!encoded.is_empty());
        prop_assert_ne!(encoded.as_str(), "NoKeyEntry");
        let decoded = decode_name(&encoded).unwrap().into_owned();
        prop_assert_eq!(decoded, name);
    }

    #[test]
    fn escape_codec_roundtrip(value in any::<String>()) {
        let unescaped = unescape(&escape(&value)).into_owned();
        prop_assert_eq!(unescaped, value);
    }

    #[test]
    fn vdproj_parses_to_the_events_it_was_written_from(root in tree()) {
        let mut events = Vec::new();
        root.events(&mut events);
        let text = render_vdproj(&events);

        let parsed: Vec<Event> = VdprojReader::new(text.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(parsed, events);
    }

    #[test]
    fn vdproj_xml_vdproj_is_identity(root in tree(), pretty_print in any::<bool>()) {
        let mut events = Vec::new();
        root.events(&mut events);
        let text = render_vdproj(&events);

        let xml = vdproj_to_xml_string(&text, &Config::new().pretty_print(pretty_print)).unwrap();
        let back = xml_to_vdproj_string(&xml).unwrap();
        prop_assert_eq!(back, text);
    }

    #[test]
    fn xml_vdproj_xml_is_identity(root in tree(), pretty_print in any::<bool>()) {
        let mut events = Vec::new();
        root.events(&mut events);
        let text = render_vdproj(&events);
        let config = Config::new().pretty_print(pretty_print);

        let xml = vdproj_to_xml_string(&text, &config).unwrap();
        let again = vdproj_to_xml_string(&xml_to_vdproj_string(&xml).unwrap(), &config).unwrap();
        prop_assert_eq!(again, xml);
    }
}

#[test]
fn test_weird_name_scenario() {
    let name = unescape(r#"We\"ird"#).into_owned();
    assert_eq!(name, "We\"ird");

    let encoded = encode_name(&name);
    assert_eq!(encoded, "We_x0022_ird");
    assert_eq!(decode_name(&encoded).unwrap(), "We\"ird");
}

#[test]
fn test_non_canonical_indentation_normalizes() {
    let text = "\"DeployProject\"\n{\n\"VSVersion\" = \"3:800\"\n\"Hierarchy\"\n    {\n        \"Entry\"\n        {\n        \"MsmKey\" = \"8:_1\"\n        }\n    }\n}\n";
    let xml = vdproj_to_xml_string(text, &Config::new()).unwrap();
    let back = xml_to_vdproj_string(&xml).unwrap();

    assert_eq!(
        back,
        "\"DeployProject\"\r\n{\r\n    \"VSVersion\" = \"3:800\"\r\n    \"Hierarchy\"\r\n    {\r\n        \"Entry\"\r\n        {\r\n            \"MsmKey\" = \"8:_1\"\r\n        }\r\n    }\r\n}\r\n"
    );

    let reparsed: Vec<Event> = VdprojReader::new(back.as_bytes()).collect::<Result<_, _>>().unwrap();
    let expected: Vec<Event> = VdprojReader::new(text.as_bytes()).collect::<Result<_, _>>().unwrap();
    assert_eq!(reparsed, expected);
}

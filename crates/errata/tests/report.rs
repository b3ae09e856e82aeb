//! Tests for reports, key checking and nested message maps.

use std::sync::Arc;

use errata::types::is_hint_excluded;
use errata::{
    Config, Entry, Key, KeyMap, KeyValidator, MessageCompiler, Node, Path, Report, TemplateStore,
    View,
};
use serde_json::json;

fn compiler() -> MessageCompiler {
    MessageCompiler::new(Arc::new(TemplateStore::new(Config::default()).unwrap()))
}

fn key_check(input: &serde_json::Value, keys: &KeyMap) -> Vec<String> {
    KeyValidator::new(keys)
        .validate(input)
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn required(name: &str) -> Node {
    Node::predicate("key?", vec![("name", name.into())])
}

// =========================================================================
// Placeholders
// =========================================================================

#[test]
fn declared_paths_get_empty_placeholders() {
    let keys = KeyMap::new(vec![
        Key::field("name"),
        Key::map("address", KeyMap::new(vec![Key::field("city"), Key::field("zip")])),
        Key::array("roles", KeyMap::new(vec![Key::field("name")])),
    ]);
    let tree = Node::key("name", Node::predicate("filled?", vec![("input", "".into())]));
    let input = json!({ "name": "" });

    let report = Report::with_key_check(&compiler(), &[tree], &input, &keys).unwrap();
    assert_eq!(
        serde_json::to_value(report.errors()).unwrap(),
        json!({
            "name": ["must be filled"],
            "address": { "city": [], "zip": [] },
            "roles": [],
        })
    );
}

#[test]
fn successful_run_is_empty() {
    let keys = KeyMap::new(vec![Key::field("name")]);
    let report = Report::with_key_check(&compiler(), &[], &json!({ "name": "Jane" }), &keys).unwrap();
    assert!(report.is_success());
    assert!(report.errors().is_empty());
    assert!(report.unexpected_keys().is_empty());
}

#[test]
fn array_elements_nest_by_index() {
    let tree = Node::key(0_usize, Node::Set(vec![required("method"), required("amount")]));
    let report = Report::new(&compiler(), &[tree]).unwrap();
    assert_eq!(
        serde_json::to_value(report.errors()).unwrap(),
        json!({ "0": { "method": ["is missing"], "amount": ["is missing"] } })
    );

    let report = Report::new(&compiler(), &[]).unwrap();
    assert_eq!(serde_json::to_value(report.errors()).unwrap(), json!({}));
}

// =========================================================================
// Hints
// =========================================================================

#[test]
fn hints_skip_excluded_predicates() {
    let tree = Node::key(
        "age",
        Node::Set(vec![
            Node::predicate("int?", vec![("input", "x".into())]),
            Node::hint(Node::predicate("int?", vec![])),
            Node::hint(Node::predicate("gt?", vec![("num", 18.into())])),
        ]),
    );
    let report = Report::new(&compiler(), &[tree]).unwrap();

    assert_eq!(
        serde_json::to_value(report.hints()).unwrap(),
        json!({ "age": ["must be greater than 18"] })
    );
    assert_eq!(
        serde_json::to_value(report.messages()).unwrap(),
        json!({ "age": ["must be an integer", "must be greater than 18"] })
    );
    assert!(
        report
            .message_set(View::Hints)
            .iter()
            .flat_map(Entry::leaves)
            .all(|message| !is_hint_excluded(&message.predicate))
    );
}

#[test]
fn hint_only_report_has_no_errors() {
    let tree = Node::key("age", Node::hint(Node::predicate("gt?", vec![("num", 18.into())])));
    let report = Report::new(&compiler(), &[tree]).unwrap();
    assert!(report.is_success());
    assert_eq!(report.message_set(View::Hints).len(), 1);
}

#[test]
fn merged_messages_only_carry_hints_at_failed_paths() {
    let tree = Node::Set(vec![
        Node::key("name", Node::predicate("filled?", vec![("input", "".into())])),
        Node::key("age", Node::hint(Node::predicate("gt?", vec![("num", 18.into())]))),
    ]);
    let report = Report::new(&compiler(), &[tree]).unwrap();
    assert_eq!(
        serde_json::to_value(report.messages()).unwrap(),
        json!({ "name": ["must be filled"] })
    );
    assert_eq!(
        serde_json::to_value(report.hints()).unwrap(),
        json!({ "age": ["must be greater than 18"] })
    );

    let tree = Node::key("age", Node::hint(Node::predicate("gt?", vec![("num", 18.into())])));
    let report = Report::new(&compiler(), &[tree]).unwrap();
    assert!(report.messages().is_empty());
    assert_eq!(serde_json::to_value(report.messages()).unwrap(), json!({}));
}

// =========================================================================
// Unexpected Keys
// =========================================================================

#[test]
fn unexpected_keys_are_reported_by_path() {
    let keys = KeyMap::new(vec![
        Key::field("name"),
        Key::map("address", KeyMap::new(vec![Key::field("city"), Key::field("zipcode")])),
        Key::array("roles", KeyMap::new(vec![Key::field("name")])),
    ]);
    let input = json!({
        "foo": "x",
        "name": "Jane",
        "address": { "bar": "x", "city": "NYC", "zipcode": "1" },
        "roles": [{ "name": "a" }, { "name": "e", "foo": "x" }],
    });

    assert_eq!(key_check(&input, &keys), vec!["foo", "address.bar", "roles[1].foo"]);
}

#[test]
fn prefix_matching_is_per_segment() {
    let keys = KeyMap::new(vec![
        Key::field("a"),
        Key::field("fooA"),
        Key::array("foo", KeyMap::new(vec![Key::field("bar")])),
    ]);
    let input = json!({ "a": 1, "fooA": 2, "foo": [{ "bar": 3 }] });
    assert!(key_check(&input, &keys).is_empty());

    let input = json!({ "fo": 1, "fooAB": 2, "foo": [{ "bar": 3, "baz": 4 }] });
    assert_eq!(key_check(&input, &keys), vec!["fo", "fooAB", "foo[0].baz"]);
}

#[test]
fn unexpected_keys_become_messages() {
    let keys = KeyMap::new(vec![Key::field("name")]);
    let input = json!({ "name": "Jane", "admin": true });
    let report = Report::with_key_check(&compiler(), &[], &input, &keys).unwrap();

    assert!(!report.is_success());
    assert_eq!(report.unexpected_keys(), &[Path::from(["admin"])]);
    assert_eq!(
        serde_json::to_value(report.errors()).unwrap(),
        json!({ "admin": ["is not allowed"], "name": [] })
    );
}

#[test]
fn unexpected_key_message_can_be_overridden() {
    let mut store = TemplateStore::new(Config::default()).unwrap();
    store
        .load_str("errata:\n  en:\n    errors:\n      unexpected_key: \"is not part of the form\"\n")
        .unwrap();
    let compiler = MessageCompiler::new(Arc::new(store));

    let keys = KeyMap::new(vec![Key::field("name")]);
    let report = Report::with_key_check(&compiler, &[], &json!({ "x": 1 }), &keys).unwrap();
    assert_eq!(
        report.message_set(View::Failures).get(&Path::from(["x"])).map(|node| node.texts().to_vec()),
        Some(vec!["is not part of the form".to_string()])
    );
}

// =========================================================================
// Snapshot
// =========================================================================

#[test]
fn signup_form_snapshot() {
    let keys = KeyMap::new(vec![
        Key::field("email"),
        Key::field("age"),
        Key::map("address", KeyMap::new(vec![Key::field("city"), Key::field("street")])),
    ]);
    let ast = [
        Node::key("email", Node::predicate("format?", vec![("input", "jane@".into())])),
        Node::key(
            "age",
            Node::or(
                Node::predicate("int?", vec![("input", "ten".into())]),
                Node::predicate("nil?", vec![("input", "ten".into())]),
            ),
        ),
        Node::key("address", Node::or(required("city"), required("street"))),
    ];
    let input = json!({ "email": "jane@", "age": "ten", "address": {}, "ref": "ad" });

    let report = Report::with_key_check(&compiler(), &ast, &input, &keys).unwrap();
    insta::assert_json_snapshot!(report.errors(), @r#"
    {
      "email": [
        "is in invalid format"
      ],
      "age": [
        "must be an integer or cannot be defined"
      ],
      "address": {
        "city": [],
        "street": [],
        "or": [
          {
            "city": [
              "is missing"
            ]
          },
          {
            "street": [
              "is missing"
            ]
          }
        ]
      },
      "ref": [
        "is not allowed"
      ]
    }
    "#);
}

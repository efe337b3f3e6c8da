use descriptor_tree::{Descriptor, ObjectType, ValueType, XmlOptions};
use proptest::prelude::*;
use serde_json::{json, Value};

fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e9f64..1.0e9).prop_map(|f| json!(f)),
        "[a-z0-9 .]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-z][a-z0-9_]{0,5}", inner, 0..5)
                .prop_map(|members| Value::Object(members.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn json_round_trip(value in arb_json()) {
        let d = Descriptor::from_json(&value);
        prop_assert_eq!(d.to_json().unwrap(), value.clone());
        let text = d.to_json_string().unwrap();
        prop_assert_eq!(Descriptor::from_json_str(&text).unwrap(), d);
    }

    #[test]
    fn binary_round_trip(value in arb_json()) {
        let d = Descriptor::from_json(&value);
        let back = Descriptor::decode(&d.encode()).unwrap();
        prop_assert_eq!(&back, &d);
        prop_assert_eq!(back.node_count(), d.node_count());
        prop_assert_eq!(back.to_json().unwrap(), value);
    }

    #[test]
    fn xml_round_trip(value in arb_json()) {
        let d = Descriptor::from_json(&value);
        let back = Descriptor::from_xml_str(&d.to_xml_string()).unwrap();
        prop_assert_eq!(&back, &d);
        let pretty = Descriptor::from_xml_str(&d.to_xml_string_pretty()).unwrap();
        prop_assert_eq!(&pretty, &d);
    }

    #[test]
    fn set_from_str_keeps_text(text in "[-+]?[0-9a-z.]{0,6}") {
        let d = Descriptor::new();
        d.set_from_str(&text);
        prop_assert_eq!(d.as_string("<none>"), text);
        prop_assert!(d.value_type() != ValueType::None);
    }
}

#[test]
fn binary_round_trip_keeps_unwritten_values() {
    let d = Descriptor::new();
    d.add("unset");
    d.add_typed("null", ObjectType::Null);
    d.add("typed").set_text("7", ValueType::String);
    let back = Descriptor::decode(&d.encode()).unwrap();
    assert_eq!(back, d);
    assert_eq!(back.get("unset").value_type(), ValueType::None);
    assert!(back.get("unset").is_value());
}

#[test]
fn xml_round_trip_of_empty_containers_and_null() {
    let d = Descriptor::from_json(&json!({
        "empty_object": {},
        "empty_array": [],
        "nothing": null,
        "blank": "",
        "nested": [[], {}, null]
    }));
    let xml = d.to_xml_string();
    let back = Descriptor::from_xml_str(&xml).unwrap();
    assert_eq!(back, d, "{xml}");
    assert_eq!(back.to_json().unwrap(), d.to_json().unwrap());
}

#[test]
fn xml_root_and_item_tags_are_ignored_on_import() {
    let d = Descriptor::from_json(&json!({ "list": ["a", "b"] }));
    let options = XmlOptions {
        root_tag: "document".to_string(),
        item_tag: "entry".to_string(),
    };
    let xml = d.to_xml_with(&options).to_xml_string();
    assert!(xml.starts_with("<document "));
    assert!(xml.contains("<entry data-type=\"string\">a</entry>"));
    assert_eq!(Descriptor::from_xml_str(&xml).unwrap(), d);
}

#[test]
fn conversions_compose() {
    let source = json!({
        "name": "sensor",
        "readings": [1.25, -3, 4e2],
        "meta": { "ok": true, "tags": [] }
    });
    let d = Descriptor::from_json(&source);
    let via_xml = Descriptor::from_xml_str(&d.to_xml_string()).unwrap();
    let via_bin = Descriptor::decode(&via_xml.encode()).unwrap();
    assert_eq!(via_bin.to_json().unwrap(), source);
}

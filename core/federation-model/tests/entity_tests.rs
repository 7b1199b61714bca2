mod common;

use std::sync::LazyLock;

use common::{ALICE, POST_GUID};
use federation_model::entities::{LOCATION, POLL, POLL_ANSWER, STATUS_MESSAGE};
use federation_model::{Data, Entity, EntitySchema, PropertyDef, Value, data};
use federation_types::Timestamp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

static TEST_ENTITY: LazyLock<EntitySchema> = LazyLock::new(|| {
    EntitySchema::define("test_entity")
        .property(PropertyDef::string("a"))
        .property(PropertyDef::string("b"))
        .property(PropertyDef::string("c").optional())
        .build()
        .unwrap()
});

fn created_at() -> Timestamp {
    Timestamp::from_unix(1_700_000_000).unwrap()
}

fn status_message_data() -> Data {
    data! {
        "author" => ALICE,
        "guid" => POST_GUID,
        "created_at" => created_at(),
        "text" => "hello #federation",
        "public" => true,
    }
}

// ── Required properties ──────────────────────────────────────────

#[test]
fn missing_properties_are_all_listed() {
    let err = Entity::from_data(&TEST_ENTITY, data! {}).unwrap_err();
    assert_eq!(err.entity, "test_entity");
    assert_eq!(err.missing_properties(), vec!["a", "b"]);

    let message = err.to_string();
    assert!(message.contains("a: nil (required)"), "{message}");
    assert!(message.contains("b: nil (required)"), "{message}");
}

#[test]
fn optional_property_may_be_absent() {
    let entity = Entity::from_data(&TEST_ENTITY, data! { "a" => "1", "b" => "2" }).unwrap();
    assert_eq!(entity.get_str("a"), Some("1"));
    assert_eq!(entity.get("c"), None);
}

#[test]
fn empty_string_counts_as_absent() {
    let err = Entity::from_data(&TEST_ENTITY, data! { "a" => "", "b" => "2" }).unwrap_err();
    assert_eq!(err.missing_properties(), vec!["a"]);

    let mut data = status_message_data();
    data.insert("text".into(), Value::from(""));
    let entity = Entity::from_data(&STATUS_MESSAGE, data).unwrap();
    assert_eq!(entity.get("text"), None);
}

// ── Defaults & aliases ───────────────────────────────────────────

#[test]
fn defaults_fill_absent_properties() {
    let before = Timestamp::now();
    let entity = Entity::from_data(&STATUS_MESSAGE, data! { "author" => ALICE, "guid" => POST_GUID }).unwrap();

    assert_eq!(entity.public(), Some(false));
    assert!(entity.get_timestamp("created_at").unwrap() >= before);
    assert_eq!(entity.get_entities("photos").len(), 0);
    assert_eq!(entity.get("photos"), Some(&Value::List(Vec::new())));
}

#[test]
fn alias_is_used_only_when_name_is_absent() {
    let entity = Entity::from_data(
        &STATUS_MESSAGE,
        data! { "author" => ALICE, "guid" => POST_GUID, "raw_message" => "via alias" },
    )
    .unwrap();
    assert_eq!(entity.get_str("text"), Some("via alias"));

    let entity = Entity::from_data(
        &STATUS_MESSAGE,
        data! { "author" => ALICE, "guid" => POST_GUID, "text" => "canonical", "raw_message" => "ignored" },
    )
    .unwrap();
    assert_eq!(entity.get_str("text"), Some("canonical"));
}

// ── Nested entities ──────────────────────────────────────────────

#[test]
fn nested_map_is_constructed() {
    let mut data = status_message_data();
    data.insert(
        "location".into(),
        Value::Map(data! { "address" => "Berlin", "lat" => "52.52", "lng" => "13.40" }),
    );
    let entity = Entity::from_data(&STATUS_MESSAGE, data).unwrap();

    let location = entity.get_entity("location").unwrap();
    assert_eq!(location.entity_type(), "location");
    assert_eq!(location.get_str("address"), Some("Berlin"));
}

#[test]
fn list_accepts_maps_and_entities_alike() {
    let built = Entity::from_data(
        &POLL_ANSWER,
        data! { "guid" => "aaaaaaaaaaaaaaaa1", "answer" => "yes" },
    )
    .unwrap();
    let poll = Entity::from_data(
        &POLL,
        data! {
            "guid" => "pppppppppppppppp1",
            "question" => "Tea?",
            "poll_answers" => Value::List(vec![
                Value::from(built.clone()),
                Value::Map(data! { "guid" => "aaaaaaaaaaaaaaaa2", "answer" => "no" }),
            ]),
        },
    )
    .unwrap();

    let answers = poll.get_entities("poll_answers");
    assert_eq!(answers.len(), 2);
    assert_eq!(answers[0], &built);
    assert_eq!(answers[1].get_str("answer"), Some("no"));
}

#[test]
fn nested_violations_are_prefixed() {
    let mut data = status_message_data();
    data.insert("location".into(), Value::Map(data! { "address" => "Berlin", "lng" => "13.40" }));
    let err = Entity::from_data(&STATUS_MESSAGE, data).unwrap_err();

    assert_eq!(err.entity, "status_message");
    assert!(err.has("location.lat", "required"), "{err}");
    assert!(!err.has("location", "required"));
}

// ── Type checks ──────────────────────────────────────────────────

#[test]
fn wrong_scalar_type_is_a_violation() {
    let mut data = status_message_data();
    data.insert("public".into(), Value::from("yes"));
    let err = Entity::from_data(&STATUS_MESSAGE, data).unwrap_err();
    assert!(err.has("public", "type"));
    assert_eq!(err.violations[0].value.as_deref(), Some("yes"));
}

#[test]
fn nested_entity_of_wrong_type_is_rejected() {
    let answer = Entity::from_data(
        &POLL_ANSWER,
        data! { "guid" => "aaaaaaaaaaaaaaaa1", "answer" => "yes" },
    )
    .unwrap();
    let mut data = status_message_data();
    data.insert("location".into(), Value::from(answer));
    let err = Entity::from_data(&STATUS_MESSAGE, data).unwrap_err();
    assert!(err.has("location", "type"));
}

#[test]
fn unknown_keys_are_rejected() {
    let mut data = status_message_data();
    data.insert("mood".into(), Value::from("happy"));
    let err = Entity::from_data(&STATUS_MESSAGE, data).unwrap_err();
    assert!(err.has("mood", "unknown_property"));
}

// ── Immutability & round trip ────────────────────────────────────

#[test]
fn same_input_gives_equal_entities() {
    let first = Entity::from_data(&STATUS_MESSAGE, status_message_data()).unwrap();
    let second = Entity::from_data(&STATUS_MESSAGE, status_message_data()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn to_builder_leaves_original_untouched() {
    let original = Entity::from_data(&STATUS_MESSAGE, status_message_data()).unwrap();
    let edited = original.to_builder().set("text", "edited").build().unwrap();

    assert_eq!(original.get_str("text"), Some("hello #federation"));
    assert_eq!(edited.get_str("text"), Some("edited"));
    assert_ne!(original, edited);
}

#[test]
fn to_map_round_trips_nested_entities() {
    let mut data = status_message_data();
    data.insert(
        "location".into(),
        Value::Map(data! { "address" => "Berlin", "lat" => "52.52", "lng" => "13.40" }),
    );
    let entity = Entity::from_data(&STATUS_MESSAGE, data).unwrap();

    let map = entity.to_map();
    assert!(matches!(map.get("location"), Some(Value::Map(_))));
    assert_eq!(Entity::from_data(&STATUS_MESSAGE, map).unwrap(), entity);
}

#[test]
fn additional_elements_are_kept_in_order() {
    let entity = Entity::builder(&LOCATION)
        .data(data! { "address" => "Berlin", "lat" => "52.52", "lng" => "13.40" })
        .additional_element("altitude", "34")
        .additional_element("floor", "3")
        .build()
        .unwrap();

    assert_eq!(entity.additional_element("altitude"), Some("34"));
    assert_eq!(entity.additional_element("missing"), None);
    let kept: Vec<(&str, &str)> = entity
        .additional_elements()
        .iter()
        .map(|element| (element.name(), element.text()))
        .collect();
    assert_eq!(kept, [("altitude", "34"), ("floor", "3")]);
    assert_eq!(entity.find_additional("floor").and_then(|e| e.raw()), None);
}

#[test]
fn class_name_is_camel_case() {
    let entity = Entity::from_data(&STATUS_MESSAGE, status_message_data()).unwrap();
    assert_eq!(entity.class_name(), "StatusMessage");
    assert_eq!(entity.entity_type(), "status_message");
}

proptest! {
    #[test]
    fn to_map_round_trip(text in "[a-zA-Z0-9 #.,!?]{1,80}", public in any::<bool>(), secs in 0i64..4_000_000_000) {
        let data = data! {
            "author" => ALICE,
            "guid" => POST_GUID,
            "created_at" => Timestamp::from_unix(secs).unwrap(),
            "text" => text,
            "public" => public,
        };
        let entity = Entity::from_data(&STATUS_MESSAGE, data).unwrap();
        prop_assert_eq!(Entity::from_data(&STATUS_MESSAGE, entity.to_map()).unwrap(), entity);
    }
}

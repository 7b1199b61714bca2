mod common;

use common::{ALICE, FakeHost, POST_GUID};
use federation_codec::{Codec, CodecError, Element, XmlPayload};
use federation_model::entities::{CONTACT, STATUS_MESSAGE};
use federation_model::{Entity, Value, data};
use federation_types::Timestamp;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn created_at() -> Timestamp {
    Timestamp::from_unix(1_451_642_400).unwrap()
}

fn status_message() -> Entity {
    Entity::from_data(
        &STATUS_MESSAGE,
        data! {
            "author" => ALICE,
            "guid" => POST_GUID,
            "created_at" => created_at(),
            "text" => "look at this & that <3",
            "public" => true,
            "location" => Value::Map(data! { "address" => "Berlin", "lat" => "52.52", "lng" => "13.40" }),
            "photos" => Value::List(vec![Value::Map(data! {
                "guid" => "photo000000000001",
                "author" => ALICE,
                "created_at" => created_at(),
                "remote_photo_path" => "https://pod.example/uploads/",
                "remote_photo_name" => "cat.jpg",
                "height" => 480,
                "width" => 640,
            })]),
        },
    )
    .unwrap()
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn encodes_wire_names_and_nested_elements() {
    let host = FakeHost::new();
    let xml = Codec::new(&host).encode_xml(&status_message()).unwrap();

    assert!(xml.starts_with("<status_message><diaspora_handle>alice@pod.example</diaspora_handle>"));
    assert!(xml.contains("<created_at>2016-01-01T10:00:00Z</created_at>"));
    assert!(xml.contains("<text>look at this &amp; that &lt;3</text>"));
    assert!(xml.contains("<provider_display_name/>"));
    assert!(xml.contains("<location><address>Berlin</address><lat>52.52</lat><lng>13.40</lng></location>"));
    assert!(xml.contains("<height>480</height>"));
    assert!(xml.contains("<public>true</public>"));
}

#[test]
fn xml_round_trip() {
    let host = FakeHost::new();
    let codec = Codec::new(&host);
    let entity = status_message();
    let decoded = codec.decode_xml(&codec.encode_xml(&entity).unwrap()).unwrap();
    assert_eq!(decoded, entity);
}

#[test]
fn legacy_wrapper_is_accepted() {
    let host = FakeHost::new();
    let codec = Codec::new(&host);
    let entity = status_message();
    let packed = XmlPayload::pack(codec.encode_element(&entity).unwrap()).to_xml();
    assert!(packed.starts_with("<XML><post><status_message>"));
    assert_eq!(codec.decode_xml(&packed).unwrap(), entity);
}

// ── Decoding ─────────────────────────────────────────────────────

#[test]
fn canonical_name_is_a_fallback_for_wire_name() {
    let host = FakeHost::new();
    let xml = format!(
        "<status_message><author>{ALICE}</author><guid>{POST_GUID}</guid><public>false</public></status_message>"
    );
    let entity = Codec::new(&host).decode_xml(&xml).unwrap();
    assert_eq!(entity.author(), Some(ALICE));
}

#[test]
fn unknown_elements_are_preserved() {
    let host = FakeHost::new();
    let codec = Codec::new(&host);
    let xml = format!(
        "<contact><author>{ALICE}</author><recipient>bob@remote.example</recipient>\
         <following>true</following><sharing>true</sharing><mood>cheerful</mood></contact>"
    );
    let entity = codec.decode_xml(&xml).unwrap();
    assert_eq!(entity.additional_element("mood"), Some("cheerful"));

    let again = codec.encode_xml(&entity).unwrap();
    assert!(again.ends_with("<mood>cheerful</mood></contact>"));
}

#[test]
fn unknown_elements_with_children_round_trip() {
    let host = FakeHost::new();
    let codec = Codec::new(&host);
    let xml = format!(
        "<contact><author>{ALICE}</author><recipient>bob@remote.example</recipient>\
         <following>true</following><sharing>true</sharing>\
         <reactions kind=\"emoji\"><reaction>heart</reaction><reaction>star</reaction></reactions></contact>"
    );
    let entity = codec.decode_xml(&xml).unwrap();
    assert_eq!(entity.additional_element("reactions"), Some("heartstar"));

    let again = codec.encode_xml(&entity).unwrap();
    assert!(again.ends_with(
        "<reactions kind=\"emoji\"><reaction>heart</reaction><reaction>star</reaction></reactions></contact>"
    ));
    assert_eq!(codec.decode_xml(&again).unwrap(), entity);
}

#[test]
fn malformed_scalars_decode_as_nil() {
    let host = FakeHost::new();
    let xml = format!(
        "<contact><author>{ALICE}</author><recipient>bob@remote.example</recipient>\
         <following>sometimes</following><sharing>true</sharing></contact>"
    );
    let entity = Codec::new(&host).decode_xml(&xml).unwrap();
    assert_eq!(entity.get_bool("following"), Some(false));
    assert_eq!(entity.get_bool("sharing"), Some(true));
}

#[test]
fn malformed_required_timestamp_fails_required_check() {
    let host = FakeHost::new();
    let xml = format!(
        "<event><author>{ALICE}</author><guid>{POST_GUID}</guid><summary>party</summary><start>soon</start></event>"
    );
    match Codec::new(&host).decode_xml(&xml) {
        Err(CodecError::Validation(err)) => assert_eq!(err.missing_properties(), vec!["start"]),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn unknown_and_invalid_tags() {
    let host = FakeHost::new();
    let codec = Codec::new(&host);
    assert!(matches!(
        codec.decode_xml("<unknown_entity><guid>x</guid></unknown_entity>"),
        Err(CodecError::UnknownEntity(name)) if name == "unknown_entity"
    ));
    assert!(matches!(
        codec.decode_xml("<StatusMessage/>"),
        Err(CodecError::InvalidEntityName(_))
    ));
    assert!(matches!(codec.decode_xml("<XML><post/></XML>"), Err(CodecError::InvalidRootNode(_))));
    assert!(matches!(codec.decode_xml("<contact>"), Err(CodecError::Xml(_))));
}

#[test]
fn element_tree_exposes_decoded_entity_shape() {
    let host = FakeHost::new();
    let element = Codec::new(&host)
        .encode_element(&Entity::from_data(&CONTACT, data! { "author" => ALICE, "recipient" => "bob@remote.example" }).unwrap())
        .unwrap();
    let names: Vec<&str> = element.children().iter().map(Element::name).collect();
    assert_eq!(names, vec!["author", "recipient", "following", "sharing", "blocking"]);
    assert_eq!(element.child("blocking").unwrap().text(), "false");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn arbitrary_text_round_trips(text in "[a-zA-Z0-9 <>&\"'#.,;]{1,60}", public in any::<bool>()) {
        let host = FakeHost::new();
        let codec = Codec::new(&host);
        let entity = Entity::from_data(
            &STATUS_MESSAGE,
            data! {
                "author" => ALICE,
                "guid" => POST_GUID,
                "created_at" => created_at(),
                "text" => text,
                "public" => public,
            },
        )
        .unwrap();
        let decoded = codec.decode_xml(&codec.encode_xml(&entity).unwrap()).unwrap();
        prop_assert_eq!(decoded, entity);
    }
}

use federation_types::{DiasporaId, Error, Guid};
use std::collections::HashSet;
use std::str::FromStr;

// ── DiasporaId ────────────────────────────────────────────────────

#[test]
fn diaspora_id_parses_plain_address() {
    let id = DiasporaId::parse("alice@pod.example.org").unwrap();
    assert_eq!(id.username(), "alice");
    assert_eq!(id.host(), "pod.example.org");
    assert_eq!(id.as_str(), "alice@pod.example.org");
}

#[test]
fn diaspora_id_with_port() {
    let id = DiasporaId::parse("bob_1@localhost:3000").unwrap();
    assert_eq!(id.host(), "localhost:3000");
    assert_eq!(id.pod_url(), "https://localhost:3000/");
}

#[test]
fn diaspora_id_with_ipv4_and_ipv6_hosts() {
    assert!(DiasporaId::is_valid("carol@192.168.1.10"));
    assert!(DiasporaId::is_valid("carol@[2001:db8::1]:443"));
}

#[test]
fn diaspora_id_rejects_uppercase_username() {
    assert!(!DiasporaId::is_valid("Alice@pod.example.org"));
}

#[test]
fn diaspora_id_rejects_missing_parts() {
    assert!(!DiasporaId::is_valid("alice"));
    assert!(!DiasporaId::is_valid("@pod.example.org"));
    assert!(!DiasporaId::is_valid("alice@"));
    assert!(!DiasporaId::is_valid("alice@pod..org"));
    assert!(!DiasporaId::is_valid(""));
}

#[test]
fn diaspora_id_rejects_overlong() {
    let long = format!("{}@pod.example.org", "a".repeat(250));
    assert!(matches!(DiasporaId::parse(&long), Err(Error::InvalidDiasporaId(_))));
}

#[test]
fn diaspora_id_from_str_and_display() {
    let id = DiasporaId::from_str("dave@pod.example").unwrap();
    assert_eq!(id.to_string(), "dave@pod.example");
}

#[test]
fn diaspora_id_serde_validates() {
    let id: DiasporaId = serde_json::from_str("\"erin@pod.example\"").unwrap();
    assert_eq!(id.username(), "erin");
    assert!(serde_json::from_str::<DiasporaId>("\"not an id\"").is_err());
}

// ── Guid ──────────────────────────────────────────────────────────

#[test]
fn generated_guids_are_valid_and_unique() {
    let guids: HashSet<Guid> = (0..100).map(|_| Guid::generate()).collect();
    assert_eq!(guids.len(), 100);
    for guid in &guids {
        assert_eq!(guid.as_str().len(), 32);
        assert!(Guid::is_valid(guid.as_str()));
    }
}

#[test]
fn guid_accepts_remote_alphabet() {
    assert!(Guid::is_valid("a1b2c3d4-e5f6.g7h8@pod:1"));
    assert!(Guid::is_valid("ABCDEF0123456789"));
}

#[test]
fn guid_rejects_short_and_bad_chars() {
    assert!(matches!(Guid::parse("tooshort"), Err(Error::InvalidGuid(_))));
    assert!(!Guid::is_valid("0123456789abcdef with spaces"));
    assert!(!Guid::is_valid(&"a".repeat(256)));
}

#[test]
fn guid_serialization_roundtrip() {
    let guid = Guid::generate();
    let json = serde_json::to_string(&guid).unwrap();
    let parsed: Guid = serde_json::from_str(&json).unwrap();
    assert_eq!(guid, parsed);
}

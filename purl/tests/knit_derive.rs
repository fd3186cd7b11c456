//! Tests for `#[derive(Knit)]`.

#![cfg(feature = "macros")]

use purl::{Coerce, Knit, KnitError};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Knit)]
struct Avatar {
    url: String,
    #[knit(default = 48)]
    size: u32,
}

#[derive(Debug, Clone, PartialEq, Knit)]
struct Account {
    #[knit(rename = "displayName")]
    display_name: String,
    #[knit(sticky)]
    email: String,
    #[knit(default = String::from("member"))]
    role: String,
    tags: Vec<String>,
    avatar: Option<Avatar>,
}

#[test]
fn test_fields_are_read_by_key() {
    let account = Account::knit(
        None,
        &json!({
            "displayName": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "tags": ["math", "engines"],
        }),
    )
    .unwrap();

    assert_eq!(account.display_name, "Ada");
    assert_eq!(account.email, "ada@example.com");
    assert_eq!(account.role, "admin");
    assert_eq!(account.tags, vec!["math", "engines"]);
    assert_eq!(account.avatar, None);
}

#[test]
fn test_renamed_field_ignores_rust_name() {
    let account = Account::knit(None, &json!({ "display_name": "Ada" })).unwrap();
    assert_eq!(account.display_name, "");
}

#[test]
fn test_missing_fields_use_defaults() {
    let account = Account::knit(None, &json!({})).unwrap();

    assert_eq!(account.role, "member");
    assert!(account.tags.is_empty());
    assert_eq!(account.email, "");
}

#[test]
fn test_sticky_field_keeps_previous_value() {
    let first = Account::knit(None, &json!({ "displayName": "Ada", "email": "ada@example.com" })).unwrap();

    // partial update: email omitted
    let second = Account::knit(Some(&first), &json!({ "displayName": "Ada L." })).unwrap();
    assert_eq!(second.display_name, "Ada L.");
    assert_eq!(second.email, "ada@example.com");

    // non-sticky fields do not carry over
    let first = Account::knit(None, &json!({ "role": "admin" })).unwrap();
    let second = Account::knit(Some(&first), &json!({})).unwrap();
    assert_eq!(second.role, "member");
}

#[test]
fn test_nested_structs_coerce() {
    let account = Account::knit(
        None,
        &json!({ "avatar": { "url": "/ada.png" } }),
    )
    .unwrap();

    assert_eq!(
        account.avatar,
        Some(Avatar {
            url: "/ada.png".into(),
            size: 48,
        })
    );
    assert_eq!(Avatar::coerce(&json!("not an avatar")), None);
}

#[test]
fn test_wrongly_typed_field_falls_back() {
    let avatar = Avatar::knit(None, &json!({ "url": "/a.png", "size": "huge" })).unwrap();
    assert_eq!(avatar.size, 48);
}

#[test]
fn test_non_object_payload_is_rejected() {
    let err = Account::knit(None, &json!([1, 2, 3])).unwrap_err();
    assert_eq!(
        err,
        KnitError::Shape {
            expected: "object",
            found: "array",
        }
    );
}

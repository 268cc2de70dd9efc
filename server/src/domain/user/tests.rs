//! Validation and serialisation coverage for the identity newtypes.

use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::credential::CredentialHash;

fn sample_user() -> User {
    let created = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).single().expect("valid timestamp");
    User::new(
        UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id"),
        UserName::new("Ada Lovelace").expect("valid name"),
        EmailAddress::new("ada@example.com").expect("valid email"),
        RoleName::Admin,
        created,
        created,
    )
}

#[rstest]
fn user_id_accepts_canonical_uuids() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
    assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("3fa85f64-5717-4562-b3fc-2c963f66afa6 ", UserValidationError::InvalidId)]
fn user_id_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = UserId::new(raw).expect_err("malformed id rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn random_ids_are_distinct() {
    assert_ne!(UserId::random(), UserId::random());
}

#[rstest]
#[case("", UserValidationError::EmptyName)]
#[case("   ", UserValidationError::EmptyName)]
fn user_name_rejects_blank_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = UserName::new(raw).expect_err("blank name rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn user_name_rejects_overlong_input() {
    let raw = "a".repeat(USER_NAME_MAX + 1);
    let err = UserName::new(raw).expect_err("overlong name rejected");
    assert_eq!(err, UserValidationError::NameTooLong { max: USER_NAME_MAX });
}

#[rstest]
fn email_is_normalised_to_lowercase() {
    let email = EmailAddress::new("Ada@Example.COM").expect("valid email");
    assert_eq!(email.as_ref(), "ada@example.com");
}

#[rstest]
#[case("", UserValidationError::EmptyEmail)]
#[case("ada", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("ada@", UserValidationError::InvalidEmail)]
#[case("ada@exa mple.com", UserValidationError::InvalidEmail)]
#[case(" ada@example.com", UserValidationError::InvalidEmail)]
#[case("ada@one@two", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    let err = EmailAddress::new(raw).expect_err("malformed email rejected");
    assert_eq!(err, expected);
}

#[rstest]
fn email_rejects_overlong_input() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    let err = EmailAddress::new(raw).expect_err("overlong email rejected");
    assert_eq!(err, UserValidationError::EmailTooLong { max: EMAIL_MAX });
}

#[rstest]
#[case("admin", RoleName::Admin)]
#[case("user", RoleName::User)]
fn role_names_parse_against_the_allow_list(#[case] raw: &str, #[case] expected: RoleName) {
    assert_eq!(RoleName::parse(raw).expect("allow-listed role"), expected);
}

#[rstest]
#[case("superuser")]
#[case("Admin")]
#[case("")]
fn unknown_role_names_are_rejected(#[case] raw: &str) {
    let err = RoleName::parse(raw).expect_err("unknown role rejected");
    assert_eq!(
        err,
        UserValidationError::UnknownRole {
            role: raw.to_owned()
        }
    );
}

#[rstest]
fn user_serialises_with_camel_case_keys_and_no_credential_field() {
    let value = serde_json::to_value(sample_user()).expect("serialise");
    let object = value.as_object().expect("object");

    let mut keys: Vec<_> = object.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec!["createdAt", "email", "id", "name", "role", "updatedAt"]
    );
    assert_eq!(
        object.get("role").and_then(Value::as_str),
        Some("admin")
    );
}

#[rstest]
fn user_round_trips_through_json() {
    let user = sample_user();
    let encoded = serde_json::to_string(&user).expect("serialise");
    let decoded: User = serde_json::from_str(&encoded).expect("deserialise");
    assert_eq!(decoded, user);
}

#[rstest]
fn user_rejects_unknown_fields_on_deserialisation() {
    let result: Result<User, _> = serde_json::from_value(serde_json::json!({
        "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "role": "admin",
        "createdAt": "2026-01-02T03:04:05Z",
        "updatedAt": "2026-01-02T03:04:05Z",
        "passwordHash": "sneaky"
    }));
    assert!(result.is_err());
}

#[rstest]
fn new_user_record_debug_never_shows_the_digest() {
    let record = NewUserRecord {
        id: UserId::random(),
        name: UserName::new("Ada Lovelace").expect("valid name"),
        email: EmailAddress::new("ada@example.com").expect("valid email"),
        role: RoleName::User,
        credential: CredentialHash::new("$2b$14$abcdefghijklmnopqrstuv").expect("valid digest"),
    };
    let rendered = format!("{record:?}");
    assert!(!rendered.contains("$2b$14$"));
}

//! Request and response records for the PetClinic REST API.
//!
//! Payloads are explicit structs rather than loose JSON maps. Responses are
//! read through [`CreatedEntity`] so a missing or unusable `id` is caught at
//! the deserialization boundary.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Exactly ten ASCII digits.
///
/// Build one with [`normalize_telephone`](crate::fake::normalize_telephone).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Telephone(pub(crate) String);

impl Telephone {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An owner as sent to `POST /api/owners`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    /// Assigned by the server; always `null` on create
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: Telephone,
    /// Only present when the owner is nested inside a pet payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pets: Option<Vec<serde_json::Value>>,
}

/// Pet species as known to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetType {
    pub id: i64,
    pub name: String,
}

impl Default for PetType {
    fn default() -> Self {
        Self {
            id: 3,
            name: "lizard".to_string(),
        }
    }
}

/// A pet as sent to `POST /api/owners/{ownerId}/pets`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: Option<i64>,
    pub owner: Owner,
    pub name: String,
    /// Serialized as `YYYY-MM-DD`
    pub birth_date: NaiveDate,
    #[serde(rename = "type")]
    pub pet_type: PetType,
}

/// The part of a create response we rely on.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedEntity {
    #[serde(default)]
    pub id: Option<i64>,
}

impl CreatedEntity {
    /// Parse a create response body and return the assigned identifier.
    ///
    /// A body that is not a JSON object is a decode error. A missing, `null`
    /// or zero `id` counts as missing.
    pub fn parse_id(body: &str, entity: &'static str) -> Result<i64, TaskError> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        if !value.is_object() {
            return Err(TaskError::Decode(format!(
                "{} response is not a JSON object",
                entity
            )));
        }
        let created: CreatedEntity = serde_json::from_value(value)?;
        match created.id {
            Some(id) if id != 0 => Ok(id),
            _ => Err(TaskError::MissingId { entity }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn owner() -> Owner {
        Owner {
            id: None,
            first_name: "Jean".into(),
            last_name: "Coleman".into(),
            address: "105 N. Lake St.".into(),
            city: "Monona".into(),
            telephone: Telephone("6085552654".into()),
            pets: None,
        }
    }

    #[test]
    fn test_owner_serializes_camel_case_with_null_id() {
        let value = serde_json::to_value(owner()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": null,
                "firstName": "Jean",
                "lastName": "Coleman",
                "address": "105 N. Lake St.",
                "city": "Monona",
                "telephone": "6085552654"
            })
        );
    }

    #[test]
    fn test_pet_nests_owner_and_type() {
        let mut nested = owner();
        nested.id = Some(42);
        nested.pets = Some(Vec::new());
        let pet = Pet {
            id: None,
            owner: nested,
            name: "Basil".into(),
            birth_date: NaiveDate::from_ymd_opt(2019, 8, 6).unwrap(),
            pet_type: PetType::default(),
        };
        let value = serde_json::to_value(pet).unwrap();
        assert_eq!(value["birthDate"], "2019-08-06");
        assert_eq!(value["type"], json!({"id": 3, "name": "lizard"}));
        assert_eq!(value["owner"]["id"], 42);
        assert_eq!(value["owner"]["pets"], json!([]));
        assert!(value["id"].is_null());
    }

    #[test]
    fn test_parse_id_accepts_numeric_id() {
        assert_eq!(
            CreatedEntity::parse_id(r#"{"id": 42, "firstName": "x"}"#, "owner"),
            Ok(42)
        );
    }

    #[test]
    fn test_parse_id_missing_null_or_zero() {
        for body in [r#"{"firstName": "x"}"#, r#"{"id": null}"#, r#"{"id": 0}"#] {
            assert_eq!(
                CreatedEntity::parse_id(body, "owner"),
                Err(TaskError::MissingId { entity: "owner" }),
                "body: {}",
                body
            );
        }
    }

    #[test]
    fn test_parse_id_rejects_non_object() {
        assert!(matches!(
            CreatedEntity::parse_id("[1, 2]", "pet"),
            Err(TaskError::Decode(_))
        ));
        assert!(matches!(
            CreatedEntity::parse_id("<html>", "pet"),
            Err(TaskError::Decode(_))
        ));
    }

    // Autoref dispatch: resolves to `Readable` only when `T: DeserializeOwned`.
    struct Subject<T>(std::marker::PhantomData<T>);

    trait Readable {
        fn readable(&self) -> bool {
            true
        }
    }
    impl<T: serde::de::DeserializeOwned> Readable for Subject<T> {}

    trait WriteOnly {
        fn readable(&self) -> bool {
            false
        }
    }
    impl<T> WriteOnly for &Subject<T> {}

    #[test]
    fn test_request_records_cannot_be_deserialized() {
        use std::marker::PhantomData;

        assert!(!(&Subject::<Telephone>(PhantomData)).readable());
        assert!(!(&Subject::<Owner>(PhantomData)).readable());
        assert!(!(&Subject::<Pet>(PhantomData)).readable());
        assert!((&Subject::<CreatedEntity>(PhantomData)).readable());
    }
}

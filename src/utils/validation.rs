use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{Error, Result};

/// JSON body that has been deserialized and passed `Validate`. Rejections use
/// the crate's error envelope, so a bad body never reaches a handler.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| Error::InvalidBody(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

/// Parses an integer path segment; `entity` names it in the 400 message.
/// Only an optional `-` followed by ASCII digits is accepted, so `" 5"` and
/// `"+5"` are rejected.
pub fn parse_id(raw: &str, entity: &str) -> Result<i32> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_id(entity));
    }
    raw.parse::<i32>().map_err(|_| invalid_id(entity))
}

fn invalid_id(entity: &str) -> Error {
    Error::BadRequest(format!("Invalid {} ID", entity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_integers() {
        assert_eq!(parse_id("42", "job").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_text_with_entity_message() {
        match parse_id("abc", "job") {
            Err(Error::BadRequest(msg)) => assert_eq!(msg, "Invalid job ID"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parse_id_rejects_padding_signs_and_overflow() {
        for raw in [" 5", "5 ", "+5", "", "-", "12x", "99999999999"] {
            assert!(
                matches!(parse_id(raw, "user"), Err(Error::BadRequest(_))),
                "{:?}",
                raw
            );
        }
        assert_eq!(parse_id("-3", "user").unwrap(), -3);
    }
}

//! Extractors that turn malformed requests into `ApiError`s.

use async_trait::async_trait;
use axum::{
    extract::{
        path::ErrorKind,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Path, Request,
    },
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors};

use crate::error::{ApiError, FieldError};

/// Fields whose rejected value is never echoed back
const REDACTED_FIELDS: &[&str] = &["password"];

/// JSON body that has passed its `Validate` rules
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;
        value.validate().map_err(validation_errors)?;
        Ok(Self(value))
    }
}

/// Path parameters whose parse failures report the offending key
#[derive(Debug, Clone)]
pub struct ValidatedPath<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(path_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::invalid_input(rejection.body_text())
}

fn path_rejection(rejection: PathRejection) -> ApiError {
    let message = rejection.body_text();
    let field_errors = match &rejection {
        PathRejection::FailedToDeserializePathParams(err) => match err.kind() {
            ErrorKind::ParseErrorAtKey {
                key,
                value,
                expected_type,
            } => vec![FieldError::new(
                to_camel_case(key),
                Value::String(value.clone()),
                format!("Expected {}", expected_type),
            )],
            ErrorKind::ParseErrorAtIndex {
                index,
                value,
                expected_type,
            } => vec![FieldError::new(
                index.to_string(),
                Value::String(value.clone()),
                format!("Expected {}", expected_type),
            )],
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    ApiError::InvalidInput {
        message,
        field_errors,
    }
}

/// One entry per failing field, sorted by field name for stable output
pub fn validation_errors(errors: ValidationErrors) -> ApiError {
    let mut field_errors: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .filter_map(|(field, errs)| {
            let field = field.to_string();
            let first = errs.first()?;
            let message = first
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| first.code.to_string());
            let rejected_value = if REDACTED_FIELDS.contains(&field.as_str()) {
                Value::Null
            } else {
                first.params.get("value").cloned().unwrap_or(Value::Null)
            };
            Some(FieldError::new(to_camel_case(&field), rejected_value, message))
        })
        .collect();

    field_errors.sort_by(|a, b| a.field.cmp(&b.field));
    ApiError::Validation(field_errors)
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{PhotoBookRequest, SignupRequest};
    use serde_json::json;

    #[test]
    fn camel_cases_field_names() {
        assert_eq!(to_camel_case("photo_url"), "photoUrl");
        assert_eq!(to_camel_case("email"), "email");
    }

    #[test]
    fn password_value_is_redacted() {
        let request = SignupRequest {
            username: "kim".to_string(),
            password: "short".to_string(),
            email: "kim@photoism.co.kr".to_string(),
        };
        let err = validation_errors(request.validate().unwrap_err());
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "password");
        assert_eq!(fields[0].rejected_value, Value::Null);
    }

    #[test]
    fn custom_rule_reports_camel_case_field_and_value() {
        let request = PhotoBookRequest {
            photo_url: "nope".to_string(),
        };
        let err = validation_errors(request.validate().unwrap_err());
        let ApiError::Validation(fields) = err else {
            panic!("expected validation error");
        };
        assert_eq!(fields[0].field, "photoUrl");
        assert_eq!(fields[0].rejected_value, json!("nope"));
    }
}

use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::ops::RangeInclusive;
use url::Url;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::auth::TokenResponse;
use crate::database::models::{CorrectionValues, FaceShape, Skin};

/// Allowed range for every facial adjustment level
pub const ADJUSTMENT_RANGE: RangeInclusive<i16> = -10..=10;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 2, max = 20, message = "Username must be between 2 and 20 characters"))]
    pub username: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 8, max = 64, message = "Password must be between 8 and 64 characters"))]
    pub password: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Only presence is checked; an unknown email is reported as not found
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// `POST /login` and `POST /token/refresh` body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub tokens: TokenResponse,
}

/// Missing and `null` fields stay `None` so validation can name each of them
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CorrectionRequest {
    pub shape: Option<FaceShape>,
    pub skin: Option<Skin>,
    pub eyes: Option<i16>,
    pub nose: Option<i16>,
    pub lips: Option<i16>,
    pub chin: Option<i16>,
}

impl Validate for CorrectionRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        CorrectionValues::try_from(*self).map(|_| ())
    }
}

impl TryFrom<CorrectionRequest> for CorrectionValues {
    type Error = ValidationErrors;

    fn try_from(request: CorrectionRequest) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();
        if request.shape.is_none() {
            errors.add("shape", required_error());
        }
        if request.skin.is_none() {
            errors.add("skin", required_error());
        }
        for (field, value) in [
            ("eyes", request.eyes),
            ("nose", request.nose),
            ("lips", request.lips),
            ("chin", request.chin),
        ] {
            match value {
                None => errors.add(field, required_error()),
                Some(level) if !ADJUSTMENT_RANGE.contains(&level) => errors.add(field, range_error(level)),
                Some(_) => {}
            }
        }

        match request {
            CorrectionRequest {
                shape: Some(shape),
                skin: Some(skin),
                eyes: Some(eyes),
                nose: Some(nose),
                lips: Some(lips),
                chin: Some(chin),
            } if errors.is_empty() => Ok(Self {
                shape,
                skin,
                eyes,
                nose,
                lips,
                chin,
            }),
            _ => Err(errors),
        }
    }
}

fn required_error() -> ValidationError {
    let mut error = ValidationError::new("required");
    error.message = Some(Cow::Borrowed("Must not be null"));
    error
}

fn range_error(value: i16) -> ValidationError {
    let mut error = ValidationError::new("range");
    error.message = Some(Cow::Owned(format!(
        "Must be between {} and {}",
        ADJUSTMENT_RANGE.start(),
        ADJUSTMENT_RANGE.end()
    )));
    error.add_param(Cow::Borrowed("value"), &value);
    error
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoBookRequest {
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_url: String,
}

impl Validate for PhotoBookRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if !is_web_url(&self.photo_url) {
            let mut error = ValidationError::new("url");
            error.message = Some(Cow::Borrowed("Photo URL must be an absolute http(s) URL"));
            error.add_param(Cow::Borrowed("value"), &self.photo_url);
            errors.add("photo_url", error);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Treats an explicit `null` like a missing field
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn is_web_url(value: &str) -> bool {
    match Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn correction(eyes: i16, chin: i16) -> CorrectionRequest {
        CorrectionRequest {
            shape: Some(FaceShape::Heart),
            skin: Some(Skin::Matte),
            eyes: Some(eyes),
            nose: Some(0),
            lips: Some(0),
            chin: Some(chin),
        }
    }

    #[test]
    fn adjustment_bounds_are_inclusive() {
        assert!(correction(-10, 10).validate().is_ok());

        let errors = correction(11, -11).validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.keys().any(|k| k.to_string() == "eyes"));
        assert!(fields.keys().any(|k| k.to_string() == "chin"));
    }

    #[test]
    fn missing_correction_fields_are_each_reported() {
        let request: CorrectionRequest = serde_json::from_value(serde_json::json!({
            "shape": "OVAL",
            "skin": null,
            "eyes": 1
        }))
        .unwrap();

        let errors = CorrectionValues::try_from(request).unwrap_err();
        let mut fields: Vec<String> = errors.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        assert_eq!(fields, vec!["chin", "lips", "nose", "skin"]);

        let values = CorrectionValues::try_from(correction(4, -4)).unwrap();
        assert_eq!((values.eyes, values.chin), (4, -4));
    }

    #[test]
    fn missing_and_null_strings_reach_validation() {
        let request: SignupRequest =
            serde_json::from_value(serde_json::json!({ "username": "kim", "email": null })).unwrap();
        assert_eq!(request.email, "");
        assert_eq!(request.password, "");

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 2);
        assert!(fields.keys().any(|k| k.to_string() == "email"));
        assert!(fields.keys().any(|k| k.to_string() == "password"));
    }

    #[test]
    fn login_accepts_any_non_empty_email() {
        let request = LoginRequest {
            email: "nobody".to_string(),
            password: "x".to_string(),
        };
        assert!(request.validate().is_ok());

        let request: LoginRequest = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(request.validate().unwrap_err().field_errors().len(), 2);
    }

    #[test]
    fn photo_url_must_be_absolute_web_url() {
        let ok = PhotoBookRequest { photo_url: "https://cdn.photoism.co.kr/a.jpg".to_string() };
        assert!(ok.validate().is_ok());

        for bad in ["", "not a url", "/relative/a.jpg", "ftp://cdn.photoism.co.kr/a.jpg"] {
            let request = PhotoBookRequest { photo_url: bad.to_string() };
            assert!(request.validate().is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn signup_rules() {
        let request = SignupRequest {
            username: "k".to_string(),
            password: "short".to_string(),
            email: "nope".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 3);

        let request = SignupRequest {
            username: "kim".to_string(),
            password: "password123".to_string(),
            email: "kim@photoism.co.kr".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn login_response_nests_tokens() {
        let body = LoginResponse {
            tokens: TokenResponse {
                access_token: "a".to_string(),
                refresh_token: "r".to_string(),
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["tokens"]["accessToken"], "a");
        assert_eq!(value["tokens"]["refreshToken"], "r");
    }
}

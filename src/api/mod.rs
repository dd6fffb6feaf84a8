//! Request and response bodies plus the extractors that validate them.

pub mod dto;
pub mod extract;

pub use dto::{
    CorrectionRequest, LoginRequest, LoginResponse, PhotoBookRequest, RefreshRequest, SignupRequest,
};
pub use extract::{validation_errors, ValidatedJson, ValidatedPath};

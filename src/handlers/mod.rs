// handlers/mod.rs - HTTP handlers
//
// public/    token acquisition, no authentication
// protected/ everything behind `jwt_auth_middleware`

pub mod protected;
pub mod public;

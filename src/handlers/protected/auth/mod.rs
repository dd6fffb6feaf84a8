// handlers/protected/auth/mod.rs - Session handlers for authenticated users

pub mod session;

pub use session::{logout, whoami};

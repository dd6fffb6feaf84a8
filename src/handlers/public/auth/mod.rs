// handlers/public/auth/mod.rs - Account creation and token acquisition

pub mod login; // POST /login
pub mod refresh; // POST /token/refresh
pub mod signup; // POST /signup

pub use login::login_post;
pub use refresh::refresh_post;
pub use signup::signup_post;

pub mod auth;
pub mod correction;
pub mod photo_book;

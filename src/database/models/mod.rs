pub mod correction;
pub mod photo_book;
pub mod user;

pub use correction::{Correction, CorrectionValues, FaceShape, Skin};
pub use photo_book::PhotoBook;
pub use user::{NewUser, User, UserProfile};

pub mod correction_service;
pub mod photo_book_service;
pub mod user_service;

pub use correction_service::CorrectionService;
pub use photo_book_service::PhotoBookService;
pub use user_service::UserService;

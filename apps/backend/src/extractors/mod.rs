pub mod current_user;
pub mod headers;

pub use current_user::{AdminUser, CurrentUser};
pub use headers::required_header;

//! Authentication: password hashing and the cookie session layer.

pub mod password;
pub mod session;

pub use session::SessionUser;

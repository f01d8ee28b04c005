pub mod api;
pub mod core;
pub mod error;
pub mod store;

pub use error::SipError;

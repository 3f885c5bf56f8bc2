//! Utility module - shared error types, logging and validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{AppError, AppResponse, AppResult, ok, ok_with_message};

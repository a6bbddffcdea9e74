//! Shared types, error types, and traits for weblogin

pub mod auth;
pub mod claims;
pub mod errors;
pub mod hook;
pub mod http;

pub use auth::Auth;
pub use claims::{Claims, SCOPE_CLAIM_TABLE};
pub use errors::{AppError, AppResult};
pub use hook::{LoginHook, LoginHookOutcome, LoginHookParams};
pub use http::{CallbackRequest, CallbackResponse, CookieOptions, SameSite};

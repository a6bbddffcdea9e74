//! OpenID Connect protocol pieces for weblogin
//!
//! Leaf components the callback orchestrator is built from:
//! - PKCE (S256) and nonce generation
//! - the signed, single-use OIDC state cookie
//! - the back-channel authorization-code → ID-token exchange
//! - ID-token parsing and the ordered claim checks

pub mod cookie;
pub mod pkce;
pub mod state;
pub mod token;
pub mod token_exchange;

pub use cookie::CookieCodec;
pub use pkce::{generate_nonce, generate_pkce, PkceMaterial};
pub use state::{OidcState, StateStore, OIDC_COOKIE_NAME, STATE_LIFETIME_SECS};
pub use token::{parse_token, validate_claims, ClaimError, ParsedToken, CLOCK_SKEW_SECS};
pub use token_exchange::TokenExchanger;

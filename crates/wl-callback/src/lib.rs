//! Login initiation and callback orchestration for weblogin
//!
//! The protocol core of the SDK: receives the authorization-code redirect,
//! exchanges the code over the back channel, validates the ID token and
//! establishes the session cookie. Written once against the capability
//! traits in `wl_types::http`; hosting frameworks supply thin adapters.

pub mod callback;
pub mod login;
pub mod observer;
pub mod pages;
pub mod session;

pub use callback::CallbackOrchestrator;
pub use login::{build_authorization_url, handle_login};
pub use observer::{AuthObserver, TracingObserver};
pub use session::{SessionCookie, AUTH_COOKIE_NAME};

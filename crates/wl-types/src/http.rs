//! Framework-agnostic request/response capabilities
//!
//! The orchestrator is written once against these traits; each hosting web
//! framework supplies a thin adapter. Adapters are expected to buffer, so
//! the methods are synchronous.

/// SameSite attribute for cookies issued by the SDK.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes for a cookie the adapter must set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    /// Max-Age in seconds; `Some(0)` clears the cookie
    pub max_age: Option<i64>,
}

impl CookieOptions {
    /// Signed, httpOnly cookie attributes used for both SDK cookies.
    pub fn signed(same_site_strict: bool, max_age: Option<i64>) -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: if same_site_strict {
                SameSite::Strict
            } else {
                SameSite::Lax
            },
            path: "/".to_string(),
            max_age,
        }
    }

    /// Attributes that expire a cookie immediately.
    pub fn expired() -> Self {
        Self::signed(false, Some(0))
    }
}

/// Read side of the callback boundary: query parameters, headers, cookies.
pub trait CallbackRequest: Send + Sync {
    /// All query parameters in request order, duplicates preserved.
    fn query_pairs(&self) -> Vec<(String, String)>;

    /// Value of a request cookie, undecoded.
    fn cookie(&self, name: &str) -> Option<String>;

    /// Value of a request header.
    fn header(&self, name: &str) -> Option<String>;

    /// First value of a query parameter.
    fn query(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Every value of a query parameter, in order.
    fn query_all(&self, name: &str) -> Vec<String> {
        self.query_pairs()
            .into_iter()
            .filter(|(k, _)| k == name)
            .map(|(_, v)| v)
            .collect()
    }
}

/// Write side of the callback boundary.
///
/// Exactly one of the terminal methods (`html`, `json`, `redirect`,
/// `respond`) is invoked per request; cookies may be set before it.
pub trait CallbackResponse: Send {
    /// Set a cookie with the given attributes.
    fn set_cookie(&mut self, name: &str, value: &str, options: &CookieOptions);

    /// Set a response header.
    fn set_header(&mut self, name: &str, value: &str);

    /// 200 with an HTML body.
    fn html(&mut self, body: &str);

    /// 200 with a JSON body.
    fn json(&mut self, body: &serde_json::Value);

    /// 302 redirect.
    fn redirect(&mut self, url: &str);

    /// Arbitrary status with a plain-text body.
    fn respond(&mut self, status: u16, body: &str);
}

//! HTML pages emitted by the callback
//!
//! Two static shells: the same-site bounce and the inline error page. Both
//! are transient, unstyled documents; applications wanting branded error
//! handling configure `routes.error` instead.

/// Parameters for the inline error page.
#[derive(Debug, Default)]
pub struct ErrorPageParams<'a> {
    pub error: &'a str,
    pub error_description: Option<&'a str>,
    pub error_uri: Option<&'a str>,
    pub target_uri: &'a str,
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The same-site bounce page.
///
/// Cookies set during the login redirect may not be visible until the
/// browser performs a top-level navigation, so the first callback request
/// gets this page, which immediately re-requests the same URL with a
/// `same_site=true` marker appended.
pub fn same_site_bounce() -> String {
    concat!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">",
        "<title>Signing in\u{2026}</title></head><body>",
        "<noscript>JavaScript is required to complete sign in.</noscript>",
        "<script>window.location.replace(window.location.href",
        " + (window.location.search ? '&' : '?') + 'same_site=true')</script>",
        "</body></html>"
    )
    .to_string()
}

/// The inline error page for provider-reported errors.
pub fn error_page(params: &ErrorPageParams<'_>) -> String {
    let mut body = String::from(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Login error</title></head><body>",
    );
    body.push_str("<h1>Login error</h1>");
    body.push_str(&format!("<p><b>{}</b></p>", escape_html(params.error)));
    if let Some(description) = params.error_description {
        body.push_str(&format!("<p>{}</p>", escape_html(description)));
    }
    if let Some(uri) = params.error_uri {
        let escaped = escape_html(uri);
        body.push_str(&format!(
            "<p><a href=\"{}\">{}</a></p>",
            escaped, escaped
        ));
    }
    body.push_str(&format!(
        "<p><a href=\"{}\">Continue</a></p>",
        escape_html(params.target_uri)
    ));
    body.push_str("</body></html>");
    body
}

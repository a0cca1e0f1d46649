//! Request transport seam for wiki API clients.
//!
//! The bot ships no network client. Whatever client is plugged in sends
//! through [`Transport`], and cross-cutting fixes compose around it as
//! decorators instead of being patched into a shared client instance.
//!
//! ```ignore
//! let client = SanitizeAuthorization::new(HttpTransport::new(api_url));
//! client.send(Request::get(url).header("Authorization", token))?;
//! ```

use anyhow::Result;

/// Header name sanitized by [`SanitizeAuthorization`].
pub const AUTHORIZATION: &str = "Authorization";

/// One outgoing API request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Request {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: "POST".into(),
            url: url.into(),
            body: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// First header named `name`, case-insensitively.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: String,
}

/// Sends requests to the wiki API.
pub trait Transport {
    fn send(&self, request: Request) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: Request) -> Result<Response> {
        (**self).send(request)
    }
}

/// Drops every character above U+00FF from `Authorization` headers.
///
/// HTTP header values must be Latin-1; tokens pasted from some consoles
/// carry zero-width or full-width characters that make the request fail
/// before it leaves the client.
#[derive(Debug, Clone)]
pub struct SanitizeAuthorization<T> {
    inner: T,
}

impl<T: Transport> SanitizeAuthorization<T> {
    pub fn new(inner: T) -> Self {
        Self { inner }
    }
}

impl<T: Transport> Transport for SanitizeAuthorization<T> {
    fn send(&self, mut request: Request) -> Result<Response> {
        for (name, value) in &mut request.headers {
            if name.eq_ignore_ascii_case(AUTHORIZATION) {
                *value = sanitize_header_value(value);
            }
        }
        self.inner.send(request)
    }
}

/// Keep only characters in the Latin-1 range.
pub fn sanitize_header_value(value: &str) -> String {
    value.chars().filter(|&c| u32::from(c) <= 0xFF).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records requests instead of sending them.
    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<Request>>,
    }

    impl Transport for Recorder {
        fn send(&self, request: Request) -> Result<Response> {
            self.sent.lock().unwrap().push(request);
            Ok(Response {
                status: 200,
                body: "{}".into(),
            })
        }
    }

    #[test]
    fn test_sanitize_header_value() {
        assert_eq!(sanitize_header_value("Bearer abc\u{200b}def"), "Bearer abcdef");
        assert_eq!(sanitize_header_value("Bearer ｔｏｋｅｎ"), "Bearer ");
        assert_eq!(sanitize_header_value("caf\u{e9}"), "caf\u{e9}");
    }

    #[test]
    fn test_decorator_sanitizes_authorization_only() {
        let recorder = Recorder::default();
        let client = SanitizeAuthorization::new(&recorder);

        let request = Request::get("https://example.org/api.php")
            .header("authorization", "Bearer x\u{200b}y")
            .header("X-Note", "备注");
        let response = client.send(request).unwrap();
        assert_eq!(response.status, 200);

        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent[0].header_value(AUTHORIZATION), Some("Bearer xy"));
        assert_eq!(sent[0].header_value("x-note"), Some("备注"));
    }

    #[test]
    fn test_decorator_passes_body_through() {
        let recorder = Recorder::default();
        SanitizeAuthorization::new(&recorder)
            .send(Request::post("https://example.org/api.php", "action=edit"))
            .unwrap();
        let sent = recorder.sent.lock().unwrap();
        assert_eq!(sent[0].method, "POST");
        assert_eq!(sent[0].body.as_deref(), Some("action=edit"));
    }
}

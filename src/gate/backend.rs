//! Configured backend base URL and the endpoints the gate calls on it.
//! Endpoints are always derived from the configured base; there is no
//! built-in host.

use super::identifier::Identifier;
use thiserror::Error;
use url::Url;

const STATUS_PATH: [&str; 4] = ["api", "v1", "auth", "check-pin-status"];
const LOGIN_PATH: [&str; 4] = ["api", "v1", "auth", "login"];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("invalid backend URL: {0}")]
    Parse(#[from] url::ParseError),
    #[error("unsupported scheme {0}, expected http or https")]
    UnsupportedScheme(String),
    #[error("backend URL has no host")]
    MissingHost,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Backend {
    base: Url,
}

impl Backend {
    /// Parses and validates a base URL such as `https://api.example.com` or
    /// `https://example.com/prefix/`. Query and fragment are dropped.
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute http(s) URL with a host.
    pub fn parse(raw: &str) -> Result<Self, BackendError> {
        let mut base = Url::parse(raw.trim())?;

        match base.scheme() {
            "http" | "https" => {}
            other => return Err(BackendError::UnsupportedScheme(other.to_string())),
        }

        // http(s) URLs with a host are never cannot-be-a-base.
        if base.host().is_none() {
            return Err(BackendError::MissingHost);
        }

        base.set_query(None);
        base.set_fragment(None);

        Ok(Self { base })
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `GET` target reporting whether `identifier` has a PIN.
    #[must_use]
    pub fn pin_status_url(&self, identifier: &Identifier) -> Url {
        let mut url = self.endpoint(&STATUS_PATH);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(identifier.as_str());
        }
        url
    }

    /// `POST` target for PIN verification.
    #[must_use]
    pub fn login_url(&self) -> Url {
        self.endpoint(&LOGIN_PATH)
    }

    fn endpoint(&self, path: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(path);
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(value: &str) -> Identifier {
        Identifier::parse(Some(value)).unwrap_or_else(|| panic!("invalid identifier {value}"))
    }

    #[test]
    fn builds_endpoints_from_base() -> Result<(), BackendError> {
        let backend = Backend::parse("https://api.example.com")?;
        assert_eq!(
            backend.pin_status_url(&id("abc123")).as_str(),
            "https://api.example.com/api/v1/auth/check-pin-status/abc123"
        );
        assert_eq!(
            backend.login_url().as_str(),
            "https://api.example.com/api/v1/auth/login"
        );
        Ok(())
    }

    #[test]
    fn keeps_path_prefix_and_drops_query() -> Result<(), BackendError> {
        let backend = Backend::parse("http://localhost:8080/gate/?debug=1#top")?;
        assert_eq!(
            backend.login_url().as_str(),
            "http://localhost:8080/gate/api/v1/auth/login"
        );
        Ok(())
    }

    #[test]
    fn identifier_is_a_single_escaped_segment() -> Result<(), BackendError> {
        let backend = Backend::parse("https://api.example.com")?;
        assert_eq!(
            backend.pin_status_url(&id("a/b?c")).as_str(),
            "https://api.example.com/api/v1/auth/check-pin-status/a%2Fb%3Fc"
        );
        Ok(())
    }

    #[test]
    fn rejects_non_http_urls() {
        assert_eq!(
            Backend::parse("ftp://example.com"),
            Err(BackendError::UnsupportedScheme("ftp".to_string()))
        );
        assert!(matches!(
            Backend::parse("not a url"),
            Err(BackendError::Parse(_))
        ));
    }
}

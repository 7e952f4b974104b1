// File: errors.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::time::Duration;

#[derive(Debug)]
pub enum FetchError {
    NoHost(String),
    InvalidUrl { url: String, reason: String },
    HeaderTimeout(Duration),
    Timeout(Duration),
    Request(reqwest::Error),
    Body(reqwest::Error),
    Literal(hyper_util::client::legacy::Error),
    LiteralBody(hyper::Error),
    Redirect { location: String, reason: String },
    ClientBuild(reqwest::Error),
    TlsInit(native_tls::Error),
}

impl FetchError {
    /// Timeouts are the only failures worth another attempt.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::HeaderTimeout(_) | Self::Timeout(_) => true,
            Self::Request(e) => e.is_timeout(),
            Self::Literal(e) => caused_by_timeout(e),
            _ => false,
        }
    }

    /// Input lines without a host are dropped silently by the probe.
    pub fn is_no_host(&self) -> bool {
        matches!(self, Self::NoHost(_))
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoHost(url) => write!(f, "no host in request URL: {}", url),
            Self::InvalidUrl { url, reason } => write!(f, "invalid URL {}: {}", url, reason),
            Self::HeaderTimeout(after) => write!(
                f,
                "timeout awaiting response headers after {:.1}s",
                after.as_secs_f64()
            ),
            Self::Timeout(after) => write!(
                f,
                "request timed out after {:.1}s",
                after.as_secs_f64()
            ),
            Self::Request(e) => write!(f, "request failed: {}", e),
            Self::Body(e) => write!(f, "failed to read body: {}", e),
            Self::Literal(e) => write!(f, "request failed: {}", e),
            Self::LiteralBody(e) => write!(f, "failed to read body: {}", e),
            Self::Redirect { location, reason } => {
                write!(f, "invalid redirect location {}: {}", location, reason)
            }
            Self::ClientBuild(e) => write!(f, "failed to build HTTP client: {}", e),
            Self::TlsInit(e) => write!(f, "failed to initialize TLS: {}", e),
        }
    }
}

impl StdError for FetchError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::Request(e) | Self::Body(e) | Self::ClientBuild(e) => Some(e),
            Self::Literal(e) => Some(e),
            Self::LiteralBody(e) => Some(e),
            Self::TlsInit(e) => Some(e),
            Self::NoHost(_)
            | Self::InvalidUrl { .. }
            | Self::HeaderTimeout(_)
            | Self::Timeout(_)
            | Self::Redirect { .. } => None,
        }
    }
}

/// hyper-util reports connect timeouts as an `io::ErrorKind::TimedOut`
/// somewhere down the source chain.
fn caused_by_timeout(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        Self::Request(error)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_timeout_is_retryable() {
        let err = FetchError::HeaderTimeout(Duration::from_secs(20));
        assert!(err.is_timeout());
        assert!(!err.is_no_host());
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn test_overall_timeout_is_retryable() {
        let err = FetchError::Timeout(Duration::from_millis(400));
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "request timed out after 0.4s");
    }

    #[derive(Debug)]
    struct Wrapper(io::Error);

    impl fmt::Display for Wrapper {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "tcp connect error")
        }
    }

    impl StdError for Wrapper {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_timed_out_io_error_in_chain_is_a_timeout() {
        let timed_out = Wrapper(io::Error::new(io::ErrorKind::TimedOut, "connect timeout"));
        assert!(caused_by_timeout(&timed_out));

        let refused = Wrapper(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        assert!(!caused_by_timeout(&refused));
    }

    #[test]
    fn test_no_host_is_benign_and_final() {
        let err = FetchError::NoHost("example.com/admin".to_string());
        assert!(err.is_no_host());
        assert!(!err.is_timeout());
        assert_eq!(
            err.to_string(),
            "no host in request URL: example.com/admin"
        );
    }

    #[test]
    fn test_invalid_url_is_reported() {
        let err = FetchError::InvalidUrl {
            url: "http://[::1".to_string(),
            reason: "invalid IPv6 address".to_string(),
        };
        assert!(!err.is_no_host());
        assert!(!err.is_timeout());
        assert!(StdError::source(&err).is_none());
    }
}

// File: http.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::config::ConfigParameter;
use crate::errors::{FetchError, FetchResult};
use crate::getstate::GetState;
use crate::outcome::{FetchOutcome, ProbeMethod};
use governor::{clock::DefaultClock, state::InMemoryState, state::NotKeyed, Quota, RateLimiter};
use http_body_util::{BodyExt, Empty};
use hyper::body::{Bytes, Incoming};
use hyper::Uri;
use hyper_tls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use log::{debug, trace, warn};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE, LOCATION,
    USER_AGENT,
};
use reqwest::{StatusCode, Url};
use std::fmt;
use std::sync::Arc;

pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Client for request-targets that must reach the server byte for byte.
pub type LiteralClient =
    hyper_util::client::legacy::Client<HttpsConnector<HttpConnector>, Empty<Bytes>>;

/// Fetcher shared by every probe task. Cloning is cheap and keeps the
/// connection pools, rate limiter and statistics shared.
#[derive(Debug, Clone)]
pub struct Http {
    state_ptr: Arc<GetState>,
    config_ptr: ConfigParameter,
    rate_limiter: Option<Arc<DirectRateLimiter>>,
    client: reqwest::Client,
    literal_client: LiteralClient,
}

enum Reply {
    Pooled(reqwest::Response),
    Literal(hyper::Response<Incoming>),
}

impl Reply {
    fn status(&self) -> StatusCode {
        match self {
            Reply::Pooled(r) => r.status(),
            Reply::Literal(r) => r.status(),
        }
    }

    fn headers(&self) -> &HeaderMap {
        match self {
            Reply::Pooled(r) => r.headers(),
            Reply::Literal(r) => r.headers(),
        }
    }

    async fn bytes(self) -> FetchResult<Bytes> {
        match self {
            Reply::Pooled(r) => r.bytes().await.map_err(FetchError::Body),
            Reply::Literal(r) => r
                .into_body()
                .collect()
                .await
                .map(|collected| collected.to_bytes())
                .map_err(FetchError::LiteralBody),
        }
    }
}

impl Http {
    pub fn new(state_ptr: Arc<GetState>, config_ptr: ConfigParameter) -> FetchResult<Self> {
        let client = build_client(&config_ptr)?;
        let literal_client = build_literal_client(&config_ptr)?;
        let rate_limiter = config_ptr
            .rate_limit()
            .map(|limit| Arc::new(RateLimiter::direct(Quota::per_second(limit))));
        Ok(Http {
            state_ptr,
            config_ptr,
            rate_limiter,
            client,
            literal_client,
        })
    }

    pub fn state(&self) -> &Arc<GetState> {
        &self.state_ptr
    }

    pub fn config(&self) -> &ConfigParameter {
        &self.config_ptr
    }

    /// Fetches `url` with `method`, retrying timeouts with linear backoff.
    pub async fn fetch(&self, url: &str, method: ProbeMethod) -> FetchResult<FetchOutcome> {
        let target = parse_target(url)?;
        let literal = literal_uri(url, &target);
        let max_attempts = self.config_ptr.max_attempts();
        let budget = self.config_ptr.timeout();
        let mut attempt = 1;

        loop {
            let chain = self.follow_chain(&target, literal.as_ref(), method);
            let result = match tokio::time::timeout(budget, chain).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(budget)),
            };
            match result {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_timeout() && attempt < max_attempts => {
                    let delay = self.config_ptr.retry_backoff() * attempt;
                    warn!(
                        "{} {} timed out (attempt {}/{}), retrying in {:?}",
                        method, url, attempt, max_attempts, delay
                    );
                    self.state_ptr.add_retry();
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One attempt: the first request and every redirect hop after it.
    /// `literal` replaces the first request-target when `Url` would rewrite it.
    async fn follow_chain(
        &self,
        target: &Url,
        literal: Option<&Uri>,
        method: ProbeMethod,
    ) -> FetchResult<FetchOutcome> {
        let mut current = target.clone();
        let mut first_literal = literal.cloned();
        let mut hops = 0;

        loop {
            let (response, sent_to) = match first_literal.take() {
                Some(uri) => {
                    let sent_to = uri.to_string();
                    (self.send_literal(uri, method).await?, sent_to)
                }
                None => (self.send(&current, method).await?, current.to_string()),
            };
            let status = response.status();

            if self.config_ptr.follow_redirects()
                && is_followable(status)
                && hops < self.config_ptr.max_redirects()
            {
                if let Some(next) = redirect_target(&current, response.headers())? {
                    trace!("{} {} -> {} ({})", method, sent_to, next, status);
                    if let Err(e) = response.bytes().await {
                        debug!("discarding redirect body from {} failed: {}", sent_to, e);
                    }
                    current = next;
                    hops += 1;
                    continue;
                }
            }

            let body = response.bytes().await?;
            return Ok(FetchOutcome::new(
                body.len(),
                status.as_u16(),
                normalize_final_url(&sent_to),
            ));
        }
    }

    async fn pace(&self, url: &(dyn fmt::Display + Sync), method: ProbeMethod) {
        if let Some(limiter) = &self.rate_limiter {
            limiter.until_ready().await;
        }
        self.state_ptr.add_request();
        debug!("{} {}", method, url);
    }

    async fn send(&self, url: &Url, method: ProbeMethod) -> FetchResult<Reply> {
        self.pace(url, method).await;

        let mut request = self
            .client
            .request(method.into(), url.clone())
            .headers(request_headers(method));
        if method == ProbeMethod::Post {
            request = request.body(Vec::new());
        }

        let header_timeout = self.config_ptr.header_timeout();
        match tokio::time::timeout(header_timeout, request.send()).await {
            Ok(result) => result.map(Reply::Pooled).map_err(FetchError::from),
            Err(_) => Err(FetchError::HeaderTimeout(header_timeout)),
        }
    }

    async fn send_literal(&self, uri: Uri, method: ProbeMethod) -> FetchResult<Reply> {
        self.pace(&uri, method).await;

        let mut request = hyper::Request::new(Empty::<Bytes>::new());
        *request.method_mut() = method.into();
        *request.uri_mut() = uri;
        *request.headers_mut() = request_headers(method);

        let header_timeout = self.config_ptr.header_timeout();
        match tokio::time::timeout(header_timeout, self.literal_client.request(request)).await {
            Ok(result) => result.map(Reply::Literal).map_err(FetchError::Literal),
            Err(_) => Err(FetchError::HeaderTimeout(header_timeout)),
        }
    }
}

/// One pooled client for the whole scan. Redirects are walked by hand so
/// the original method survives every hop. The overall budget is applied
/// per attempt around the whole chain, not per request.
pub fn build_client(config: &ConfigParameter) -> FetchResult<reqwest::Client> {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .connect_timeout(config.connect_timeout())
        .pool_max_idle_per_host(config.pool_max_idle_per_host())
        .pool_idle_timeout(config.pool_idle_timeout())
        .no_gzip()
        .no_brotli()
        .no_deflate()
        .build()
        .map_err(FetchError::ClientBuild)
}

/// Same pool limits and connect timeout as `build_client`, without any
/// rewriting of the request-target.
pub fn build_literal_client(config: &ConfigParameter) -> FetchResult<LiteralClient> {
    let tls = native_tls::TlsConnector::new().map_err(FetchError::TlsInit)?;
    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(config.connect_timeout()));
    let connector = HttpsConnector::from((http, tls.into()));

    Ok(hyper_util::client::legacy::Client::builder(TokioExecutor::new())
        .pool_timer(TokioTimer::new())
        .pool_max_idle_per_host(config.pool_max_idle_per_host())
        .pool_idle_timeout(config.pool_idle_timeout())
        .build(connector))
}

/// Headers sent on the first request and re-applied on every redirect hop.
pub fn request_headers(method: ProbeMethod) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    if method == ProbeMethod::Post {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    }
    headers
}

/// Parses a probe target. Strings without a `scheme://authority` prefix
/// yield `FetchError::NoHost`.
pub fn parse_target(raw: &str) -> FetchResult<Url> {
    if !has_host(raw) {
        return Err(FetchError::NoHost(raw.to_string()));
    }
    let url = Url::parse(raw).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.host_str().map_or(true, str::is_empty) {
        return Err(FetchError::NoHost(raw.to_string()));
    }
    Ok(url)
}

fn has_host(raw: &str) -> bool {
    match raw.split_once("://") {
        Some((scheme, rest)) => {
            let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
            !scheme.is_empty() && !authority.is_empty()
        }
        None => false,
    }
}

/// The request-target exactly as typed, when parsing into `Url` would send
/// something else (dot segments such as `/admin/.` are removed by `Url`).
/// `None` when the parsed form already matches, or the typed form is not a
/// valid request-target at all.
pub fn literal_uri(raw: &str, parsed: &Url) -> Option<Uri> {
    let typed = typed_request_target(raw);
    let sent = match parsed.query() {
        Some(query) => format!("{}?{}", parsed.path(), query),
        None => parsed.path().to_string(),
    };
    if typed == sent {
        return None;
    }
    raw.parse::<Uri>()
        .ok()
        .filter(|uri| uri.path_and_query().map(|pq| pq.as_str()) == Some(typed.as_str()))
}

fn typed_request_target(raw: &str) -> String {
    let rest = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let rest = rest.split('#').next().unwrap_or_default();
    match rest.find(['/', '?']) {
        Some(i) if rest[i..].starts_with('?') => format!("/{}", &rest[i..]),
        Some(i) => rest[i..].to_string(),
        None => "/".to_string(),
    }
}

fn is_followable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Resolves the `Location` of a redirect against the URL that produced it.
/// A redirect without `Location` ends the chain.
fn redirect_target(current: &Url, headers: &HeaderMap) -> FetchResult<Option<Url>> {
    let Some(location) = headers.get(LOCATION) else {
        return Ok(None);
    };
    let location = location.to_str().map_err(|e| FetchError::Redirect {
        location: String::from_utf8_lossy(location.as_bytes()).into_owned(),
        reason: e.to_string(),
    })?;
    current
        .join(location)
        .map(Some)
        .map_err(|e| FetchError::Redirect {
            location: location.to_string(),
            reason: e.to_string(),
        })
}

/// `http://host:80/x` and `http://host/x` compare equal after this. Only
/// the default port is dropped; the path is kept as sent, dot segments
/// included.
pub fn normalize_final_url(raw: &str) -> String {
    let Ok(uri) = raw.parse::<Uri>() else {
        return match Url::parse(raw) {
            Ok(url) => url.to_string(),
            Err(_) => raw.to_string(),
        };
    };
    let (Some(scheme), Some(authority)) = (uri.scheme_str(), uri.authority()) else {
        return raw.to_string();
    };

    let mut host = authority.as_str();
    if let Some(port) = uri.port_u16() {
        if is_default_port(scheme, port) {
            host = host.strip_suffix(&format!(":{}", port)).unwrap_or(host);
        }
    }
    let path = if uri.path().is_empty() { "/" } else { uri.path() };
    match uri.query() {
        Some(query) => format!("{}://{}{}?{}", scheme, host, path, query),
        None => format!("{}://{}{}", scheme, host, path),
    }
}

fn is_default_port(scheme: &str, port: u16) -> bool {
    matches!((scheme, port), ("http", 80) | ("https", 443))
}

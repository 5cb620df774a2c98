use std::collections::BTreeMap;
use std::fmt::Display;

use futures::future::BoxFuture;
use futures::FutureExt;
use md5::{Digest, Md5};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};

use crate::cache::{freshness, Freshness, ResponseCache};
use crate::error::LastfmError;

pub static API_ROOT: &str = "https://ws.audioscrobbler.com/2.0/";

/// Request parameters, kept sorted because the signature depends on key order
pub type Params = BTreeMap<String, String>;

/// An in-flight request. Dropping it cancels the request.
pub type PendingReply<'a> = BoxFuture<'a, Result<Reply, LastfmError>>;

/// Credentials and defaults shared by every request
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub api_key: String,
    pub shared_secret: Option<String>,
    pub session_key: Option<String>,
    /// Used when a user is not named explicitly
    pub username: String,
    /// Two letter language code, picks the localized website host
    pub language: Option<String>,
}

impl Session {
    pub fn new(api_key: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            username: username.into(),
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reply {
    url: Url,
    body: String,
}

impl Reply {
    pub fn new(url: Url, body: String) -> Self {
        Self { url, body }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn into_body(self) -> String {
        self.body
    }

    /// Fail with [`LastfmError::Ws`] if the service reported an error
    pub fn check(&self) -> Result<(), LastfmError> {
        crate::lfm::parse(&self.body).map(|_| ())
    }
}

#[derive(Clone, Debug)]
pub struct WsClient<'a> {
    reqwest_client: &'a Client,
    session: &'a Session,
    cache: &'a ResponseCache,
    api_root: Url,
}

impl<'a> WsClient<'a> {
    /// Create a new WsClient talking to the public API root
    pub fn new(reqwest_client: &'a Client, session: &'a Session, cache: &'a ResponseCache) -> Self {
        Self {
            reqwest_client,
            session,
            cache,
            api_root: Url::parse(API_ROOT).expect("API_ROOT is a valid url"),
        }
    }

    /// Send requests somewhere other than the public API, e.g. a proxy
    pub fn with_api_root(mut self, api_root: Url) -> Self {
        self.api_root = api_root;
        self
    }

    pub fn session(&self) -> &'a Session {
        self.session
    }

    pub fn cache(&self) -> &'a ResponseCache {
        self.cache
    }

    /// Full GET url for `params`, including the api key and signature
    pub fn url(&self, params: &Params) -> Url {
        let mut params = params.clone();
        self.sign(&mut params, false);

        let mut url = self.api_root.clone();
        url.query_pairs_mut().extend_pairs(params.iter());
        url
    }

    /// Add `api_key`, optionally `sk`, and `api_sig` when a shared secret is configured
    pub fn sign(&self, params: &mut Params, with_session_key: bool) {
        params.remove("api_sig");
        params.insert("api_key".to_owned(), self.session.api_key.clone());
        if with_session_key {
            if let Some(sk) = &self.session.session_key {
                params.insert("sk".to_owned(), sk.clone());
            }
        }
        if let Some(secret) = &self.session.shared_secret {
            let sig = api_signature(params, secret);
            params.insert("api_sig".to_owned(), sig);
        }
    }

    /// Issue a GET, answered from the response cache when possible.
    ///
    /// Only successful replies are stored, and not when `Cache-Control` forbids it.
    pub fn get(&self, params: Params) -> PendingReply<'a> {
        let url = self.url(&params);
        let client = self.reqwest_client;
        let cache = self.cache;

        async move {
            if let Some(body) = cache.get(&url) {
                tracing::debug!(%url, "reply served from cache");
                return Ok(Reply::new(url, body));
            }

            tracing::debug!(%url, "GET");
            let err_func = |error: reqwest::Error| LastfmError::Http {
                url: url.to_string(),
                error,
            };
            let resp = client.get(url.clone()).send().await.map_err(err_func)?;
            let success = resp.status().is_success();
            let freshness = freshness(
                resp.headers()
                    .get(CACHE_CONTROL)
                    .and_then(|v| v.to_str().ok()),
            );
            let body = resp.text().await.map_err(err_func)?;

            match freshness {
                Freshness::Cacheable(max_age) if success => {
                    cache.insert_with_max_age(&url, body.clone(), max_age);
                }
                _ => tracing::debug!(%url, success, "reply not cached"),
            }
            Ok(Reply::new(url, body))
        }
        .boxed()
    }

    /// Issue a signed POST, never cached
    pub fn post(&self, mut params: Params) -> PendingReply<'a> {
        self.sign(&mut params, true);
        let url = self.api_root.clone();
        let client = self.reqwest_client;

        async move {
            tracing::debug!(method = ?params.get("method"), "POST");
            let err_func = |error: reqwest::Error| LastfmError::Http {
                url: url.to_string(),
                error,
            };
            let body = client
                .post(url.clone())
                .form(&params)
                .send()
                .await
                .map_err(err_func)?
                .text()
                .await
                .map_err(err_func)?;
            Ok(Reply::new(url, body))
        }
        .boxed()
    }
}

/// md5 over every `key` + `value` in key order, followed by the shared secret
pub fn api_signature(params: &Params, secret: &str) -> String {
    let mut hasher = Md5::new();
    for (key, value) in params {
        if key == "api_sig" || key == "format" || key == "callback" {
            continue;
        }
        hasher.update(key.as_bytes());
        hasher.update(value.as_bytes());
    }
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Error codes documented for the 2.0 API
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WsErrorCode {
    InvalidService,
    InvalidMethod,
    AuthenticationFailed,
    InvalidFormat,
    InvalidParameters,
    InvalidResourceSpecified,
    OperationFailed,
    InvalidSessionKey,
    InvalidApiKey,
    ServiceOffline,
    SubscribersOnly,
    InvalidApiSignature,
    TryAgainLater,
    SuspendedApiKey,
    RateLimitExceeded,
    Other(u32),
}

impl From<u32> for WsErrorCode {
    fn from(code: u32) -> Self {
        match code {
            2 => Self::InvalidService,
            3 => Self::InvalidMethod,
            4 => Self::AuthenticationFailed,
            5 => Self::InvalidFormat,
            6 => Self::InvalidParameters,
            7 => Self::InvalidResourceSpecified,
            8 => Self::OperationFailed,
            9 => Self::InvalidSessionKey,
            10 => Self::InvalidApiKey,
            11 => Self::ServiceOffline,
            12 => Self::SubscribersOnly,
            13 => Self::InvalidApiSignature,
            16 => Self::TryAgainLater,
            26 => Self::SuspendedApiKey,
            29 => Self::RateLimitExceeded,
            n => Self::Other(n),
        }
    }
}

impl Display for WsErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidService => write!(f, "invalid service"),
            Self::InvalidMethod => write!(f, "invalid method"),
            Self::AuthenticationFailed => write!(f, "authentication failed"),
            Self::InvalidFormat => write!(f, "invalid format"),
            Self::InvalidParameters => write!(f, "invalid parameters"),
            Self::InvalidResourceSpecified => write!(f, "invalid resource specified"),
            Self::OperationFailed => write!(f, "operation failed"),
            Self::InvalidSessionKey => write!(f, "invalid session key"),
            Self::InvalidApiKey => write!(f, "invalid api key"),
            Self::ServiceOffline => write!(f, "service offline"),
            Self::SubscribersOnly => write!(f, "subscribers only"),
            Self::InvalidApiSignature => write!(f, "invalid method signature"),
            Self::TryAgainLater => write!(f, "temporary error, try again later"),
            Self::SuspendedApiKey => write!(f, "suspended api key"),
            Self::RateLimitExceeded => write!(f, "rate limit exceeded"),
            Self::Other(n) => write!(f, "unknown error {}", n),
        }
    }
}

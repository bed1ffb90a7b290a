//! Facilities for building an HTTP client bound to one controller.
use std::{sync::Arc, time::Duration};

use anyhow::Context;
use log::{debug, info};
use reqwest::{
    cookie::{CookieStore, Jar},
    Method,
};
use url::{Host, Url};

use crate::{
    error::Error,
    psst::Password,
    requests,
    session::{Auth, Cookie, Session},
};

/// The port the controller serves its API and UI on.
pub const DEFAULT_PORT: u16 = 8443;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Scheme {
    /// HTTPS
    #[default]
    Secure,
    /// HTTP, mostly useful for tests and reverse proxies.
    Plain,
}

impl Scheme {
    const fn http(self) -> &'static str {
        match self {
            Scheme::Secure => "https",
            Scheme::Plain => "http",
        }
    }
}

/// Parse a hostname or IP address, accepting IPv6 addresses with or without brackets.
fn parse_host(host: &str) -> Result<Host, url::ParseError> {
    if host.contains(':') && !host.starts_with('[') {
        Host::parse(&format!("[{host}]"))
    } else {
        Host::parse(host)
    }
}

pub struct ClientBuilder {
    auth: Auth,
    scheme: Scheme,
    port: Option<u16>,
    inner: reqwest::ClientBuilder,
}

impl ClientBuilder {
    /// Prepare a client that continues `session`, reusing any cookies it holds.
    pub fn from_session(session: &Session) -> Self {
        Self {
            auth: session.auth().clone(),
            scheme: Scheme::default(),
            port: None,
            inner: reqwest::Client::builder(),
        }
    }

    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Use `port` instead of [`DEFAULT_PORT`].
    pub fn port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    /// Skip certificate validation, e.g. for appliances with self-signed certificates.
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.inner = self.inner.danger_accept_invalid_certs(accept);
        self
    }

    /// Bound every round trip, including the one made when logging in again.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner = self.inner.timeout(timeout);
        self
    }

    pub fn with_inner(
        mut self,
        f: impl FnOnce(reqwest::ClientBuilder) -> reqwest::ClientBuilder,
    ) -> Self {
        self.inner = f(self.inner);
        self
    }

    pub fn build(self) -> anyhow::Result<Client> {
        let Self {
            auth:
                Auth {
                    username,
                    password,
                    controller_host,
                    cookies,
                },
            scheme,
            port,
            inner,
        } = self;
        let host = parse_host(&controller_host)
            .with_context(|| format!("Invalid controller host {controller_host:?}"))?;
        let port = port.unwrap_or(DEFAULT_PORT);
        let base = Url::parse(&format!("{}://{host}:{port}", scheme.http()))
            .expect("Restricted types are known to combine into a valid URL");

        let jar = Arc::new(Jar::default());
        for cookie in &cookies {
            jar.add_cookie_str(&cookie.to_string(), &base);
        }
        debug!("Restored {} cookie(s) for {base}", cookies.len());

        let client = inner
            .cookie_provider(Arc::clone(&jar))
            .build()
            .context("Failed to create reqwest client.")?;
        Ok(Client {
            base,
            username,
            password,
            jar,
            client,
        })
    }
}

/// The client through which all controller APIs are used.
///
/// Clones share the same connection pool and cookie jar; the jar is the only state mutated by
/// sending requests.
#[derive(Clone)]
pub struct Client {
    base: Url,
    username: String,
    password: Password,
    jar: Arc<Jar>,
    client: reqwest::Client,
}

impl Client {
    pub fn builder(session: &Session) -> ClientBuilder {
        ClientBuilder::from_session(session)
    }

    /// The address that all paths are resolved against and that cookies are bound to.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub(crate) fn url(&self, segments: &[String]) -> Result<Url, Error> {
        if let Some(segment) = segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(Error::Path {
                segment: segment.clone(),
            });
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("http(s) URLs always have a path")
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.client.request(method, url)
    }

    /// The cookies that will be sent with the next request.
    pub fn cookies(&self) -> Vec<Cookie> {
        self.jar
            .cookies(&self.base)
            .and_then(|header| header.to_str().ok().map(Cookie::parse_header))
            .unwrap_or_default()
    }

    /// Obtain a fresh session cookie.
    ///
    /// This is done automatically when a request is rejected because the session expired, but
    /// calling it explicitly is useful to verify credentials.
    pub async fn login(&self) -> Result<(), Error> {
        info!("Logging in to {} as {}", self.base, self.username);
        requests::login(&self.username, &self.password)
            .referer(format!("{}login", self.base))
            .send_once(self)
            .await
            .map(|_| ())
    }
}

//! Facilities for building and executing requests.
//!
//! Every request is a [`GenericRequest`] that knows its method, path, body and the type its
//! `data` decodes into. Sending it handles the session for the caller: a response saying that
//! the session expired causes one login followed by one retry of the same request.
use std::marker::PhantomData;

use log::{debug, info, trace};
use reqwest::{
    header::{CONTENT_TYPE, REFERER},
    Method, StatusCode,
};
use serde::{
    de::{DeserializeOwned, IgnoredAny},
    Serialize,
};
use url::Url;

use crate::{
    client::Client,
    error::Error,
    psst::Password,
    responses::{classify, Outcome, Station, WirelessNetwork},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Attempt {
    Initial,
    RetriedOnce,
}

pub struct GenericRequest<Rq, Rp> {
    method: Method,
    segments: Vec<String>,
    body: Option<Rq>,
    referer: Option<String>,
    _response: PhantomData<Rp>,
}

impl<Rq, Rp> GenericRequest<Rq, Rp> {
    /// Describe a call to the path made of `segments`, e.g. `["api", "self"]` for `/api/self`.
    ///
    /// Each segment is percent-encoded on its own, so a `/` inside one never adds a level.
    pub fn new<S>(method: Method, segments: impl IntoIterator<Item = S>, body: Option<Rq>) -> Self
    where
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body,
            referer: None,
            _response: PhantomData,
        }
    }

    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

impl<Rq, Rp> GenericRequest<Rq, Rp>
where
    Rq: Serialize,
    Rp: DeserializeOwned + Default,
{
    pub async fn send(self, client: &Client) -> Result<Rp, Error> {
        let prepared = self.prepare(client)?;
        let mut attempt = Attempt::Initial;
        loop {
            match (prepared.exchange(client).await?, attempt) {
                (Outcome::Data(data), _) => return Ok(data),
                (Outcome::LoginRequired, Attempt::Initial) => {
                    info!("Session expired while requesting {}", prepared.url);
                    client
                        .login()
                        .await
                        .map_err(|e| Error::Login(Box::new(e)))?;
                    attempt = Attempt::RetriedOnce;
                }
                (Outcome::LoginRequired, Attempt::RetriedOnce) => {
                    return Err(Error::Status {
                        status: StatusCode::UNAUTHORIZED,
                    })
                }
            }
        }
    }

    /// Like [`Self::send`] but a login-required response is an error like any other 401.
    pub(crate) async fn send_once(self, client: &Client) -> Result<Rp, Error> {
        match self.prepare(client)?.exchange(client).await? {
            Outcome::Data(data) => Ok(data),
            Outcome::LoginRequired => Err(Error::Status {
                status: StatusCode::UNAUTHORIZED,
            }),
        }
    }

    fn prepare(self, client: &Client) -> Result<Prepared<Rp>, Error> {
        let Self {
            method,
            segments,
            body,
            referer,
            _response,
        } = self;
        let url = client.url(&segments)?;
        let body = body.map(|body| {
            serde_json::to_vec(&body).expect("Request bodies are plain structs that serialize")
        });
        Ok(Prepared {
            method,
            url,
            body,
            referer,
            _response,
        })
    }
}

/// A request that is ready to be sent any number of times.
struct Prepared<Rp> {
    method: Method,
    url: Url,
    body: Option<Vec<u8>>,
    referer: Option<String>,
    _response: PhantomData<Rp>,
}

impl<Rp> Prepared<Rp>
where
    Rp: DeserializeOwned + Default,
{
    async fn exchange(&self, client: &Client) -> Result<Outcome<Rp>, Error> {
        let Self {
            method,
            url,
            body,
            referer,
            _response,
        } = self;
        debug!("Sending {method} {url}");
        let mut request = client.request(method.clone(), url.clone());
        if let Some(referer) = referer {
            request = request.header(REFERER, referer);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(body.clone());
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if cfg!(debug_assertions) {
            trace!("Received {status}: {text}");
        }

        classify(status, &text)
    }
}

/// Uppercase a MAC address the way the controller stores them.
pub fn normalize_mac(mac: &str) -> String {
    mac.to_uppercase()
}

#[derive(Serialize)]
pub struct LoginBody {
    username: String,
    password: String,
}

#[derive(Debug, Serialize)]
pub struct StationCommand {
    cmd: &'static str,
    mac: String,
}

#[derive(Debug, Serialize)]
pub struct WirelessNetworkUpdate {
    enabled: bool,
}

/// Exchange credentials for a session cookie.
///
/// Prefer [`Client::login`], which also sets the referer the controller expects.
pub fn login(username: &str, password: &Password) -> GenericRequest<LoginBody, IgnoredAny> {
    GenericRequest::new(
        Method::POST,
        ["api", "login"],
        Some(LoginBody {
            username: username.to_string(),
            password: password.dangerous_reveal().to_string(),
        }),
    )
}

/// Fetch all clients currently connected to `site`.
pub fn list_clients(site: &str) -> GenericRequest<(), Vec<Station>> {
    GenericRequest::new(Method::GET, ["api", "s", site, "stat", "sta"], None)
}

fn station_command(
    site: &str,
    cmd: &'static str,
    mac: &str,
) -> GenericRequest<StationCommand, IgnoredAny> {
    GenericRequest::new(
        Method::POST,
        ["api", "s", site, "cmd", "stamgr"],
        Some(StationCommand {
            cmd,
            mac: normalize_mac(mac),
        }),
    )
}

/// Prevent the client with `mac` from connecting to `site`.
pub fn block_client(site: &str, mac: &str) -> GenericRequest<StationCommand, IgnoredAny> {
    station_command(site, "block-sta", mac)
}

/// Undo [`block_client`].
pub fn unblock_client(site: &str, mac: &str) -> GenericRequest<StationCommand, IgnoredAny> {
    station_command(site, "unblock-sta", mac)
}

/// Fetch all wireless networks configured for `site`.
pub fn list_wireless_networks(site: &str) -> GenericRequest<(), Vec<WirelessNetwork>> {
    GenericRequest::new(Method::GET, ["api", "s", site, "list", "wlanconf"], None)
}

/// Turn the wireless network with `id` on or off.
pub fn enable_wireless_network(
    site: &str,
    id: &str,
    enabled: bool,
) -> GenericRequest<WirelessNetworkUpdate, IgnoredAny> {
    GenericRequest::new(
        Method::POST,
        ["api", "s", site, "upd", "wlanconf", id],
        Some(WirelessNetworkUpdate { enabled }),
    )
}

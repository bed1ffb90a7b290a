//! Options for reaching the controller.
use std::time::Duration;

use unictl_controller::{Client, Scheme, Session, DEFAULT_PORT};

#[derive(Clone, Debug, clap::Args)]
pub struct Connection {
    /// Site to operate on.
    #[clap(long, env = "UNICTL_SITE", default_value = "default")]
    pub site: String,
    /// Port the controller API is served on.
    #[clap(long, env = "UNICTL_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
    /// Use HTTP instead of HTTPS.
    #[clap(long, env = "UNICTL_PLAIN_HTTP")]
    plain_http: bool,
    /// Accept any certificate, such as the self-signed one most controllers ship with.
    #[clap(long, env = "UNICTL_INSECURE")]
    insecure: bool,
    /// Seconds to wait for each response.
    #[clap(long, env = "UNICTL_TIMEOUT", default_value_t = 30)]
    timeout: u64,
}

impl Connection {
    pub fn client(&self, session: &Session) -> anyhow::Result<Client> {
        let Self {
            site: _,
            port,
            plain_http,
            insecure,
            timeout,
        } = self;
        let scheme = if *plain_http {
            Scheme::Plain
        } else {
            Scheme::Secure
        };
        Client::builder(session)
            .scheme(scheme)
            .port(Some(*port))
            .accept_invalid_certs(*insecure)
            .timeout(Duration::from_secs(*timeout))
            .build()
    }
}

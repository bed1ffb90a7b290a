pub mod clients;
pub mod completions;
pub mod login;
pub mod wlans;

use clap::Subcommand;
use unictl_controller::Client;

use self::{
    clients::{BlockCommand, ListClientsCommand, UnblockCommand},
    wlans::{DisableWlanCommand, EnableWlanCommand, ListWlansCommand},
};

/// Commands that need a logged in client.
#[derive(Subcommand)]
pub enum OnlineCommands {
    /// List clients connected to the site
    ListClients(ListClientsCommand),
    /// Prevent a client from connecting
    Block(BlockCommand),
    /// Allow a blocked client to connect again
    Unblock(UnblockCommand),
    /// List wireless networks of the site
    ListWlans(ListWlansCommand),
    /// Turn a wireless network on
    EnableWlan(EnableWlanCommand),
    /// Turn a wireless network off
    DisableWlan(DisableWlanCommand),
}

impl OnlineCommands {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        match self {
            Self::ListClients(cmd) => cmd.exec(client, site).await,
            Self::Block(cmd) => cmd.exec(client, site).await,
            Self::Unblock(cmd) => cmd.exec(client, site).await,
            Self::ListWlans(cmd) => cmd.exec(client, site).await,
            Self::EnableWlan(cmd) => cmd.exec(client, site).await,
            Self::DisableWlan(cmd) => cmd.exec(client, site).await,
        }
    }
}

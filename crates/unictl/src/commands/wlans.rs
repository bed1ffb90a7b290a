use anyhow::Context;
use log::info;
use unictl_controller::{requests, Client};

#[derive(Clone, Debug, clap::Parser)]
pub struct ListWlansCommand {
    /// Print the full records as JSON.
    #[clap(long)]
    json: bool,
}

impl ListWlansCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        let networks = requests::list_wireless_networks(site)
            .send(client)
            .await
            .context("Failed to list wireless networks")?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&networks)?);
            return Ok(());
        }
        for network in &networks {
            let state = if network.enabled {
                "enabled"
            } else {
                "disabled"
            };
            println!("{}\t{state}\t{}", network.id, network.name);
        }
        Ok(())
    }
}

async fn set_enabled(client: &Client, site: &str, id: &str, enabled: bool) -> anyhow::Result<()> {
    requests::enable_wireless_network(site, id, enabled)
        .send(client)
        .await
        .with_context(|| format!("Failed to update wireless network {id}"))?;
    info!("Set enabled={enabled} for wireless network {id}");
    Ok(())
}

#[derive(Clone, Debug, clap::Parser)]
pub struct EnableWlanCommand {
    /// Identifier of the network, as printed by `list-wlans`.
    id: String,
}

impl EnableWlanCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        set_enabled(client, site, &self.id, true).await
    }
}

#[derive(Clone, Debug, clap::Parser)]
pub struct DisableWlanCommand {
    /// Identifier of the network, as printed by `list-wlans`.
    id: String,
}

impl DisableWlanCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        set_enabled(client, site, &self.id, false).await
    }
}

use anyhow::Context;
use log::info;
use unictl_controller::{requests, Client};

#[derive(Clone, Debug, clap::Parser)]
pub struct ListClientsCommand {
    /// Print the full records as JSON.
    #[clap(long)]
    json: bool,
}

impl ListClientsCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        let stations = requests::list_clients(site)
            .send(client)
            .await
            .context("Failed to list clients")?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&stations)?);
            return Ok(());
        }
        for station in &stations {
            println!(
                "{}\t{}\t{}",
                station.mac,
                station.ip.as_deref().unwrap_or("-"),
                station.display_name()
            );
        }
        Ok(())
    }
}

#[derive(Clone, Debug, clap::Parser)]
pub struct BlockCommand {
    /// MAC address of the client, in any case.
    mac: String,
}

impl BlockCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        let Self { mac } = self;
        requests::block_client(site, &mac)
            .send(client)
            .await
            .with_context(|| format!("Failed to block {mac}"))?;
        info!("Blocked {mac}");
        Ok(())
    }
}

#[derive(Clone, Debug, clap::Parser)]
pub struct UnblockCommand {
    /// MAC address of the client, in any case.
    mac: String,
}

impl UnblockCommand {
    pub async fn exec(self, client: &Client, site: &str) -> anyhow::Result<()> {
        let Self { mac } = self;
        requests::unblock_client(site, &mac)
            .send(client)
            .await
            .with_context(|| format!("Failed to unblock {mac}"))?;
        info!("Unblocked {mac}");
        Ok(())
    }
}

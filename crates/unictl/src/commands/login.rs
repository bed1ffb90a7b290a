use std::io::{self, IsTerminal};

use anyhow::Context;
use unictl_controller::{Auth, Password, Session};

use crate::{connection::Connection, db::Database};

#[derive(Clone, Debug, clap::Parser)]
pub struct LoginCommand {
    /// Hostname or IP address of the controller.
    #[clap(long, env = "UNICTL_CONTROLLER")]
    controller: String,
    #[clap(long, env = "UNICTL_USERNAME")]
    username: String,
    /// Read from stdin if not given.
    #[clap(long, env = "UNICTL_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

fn input(prompt: &str) -> anyhow::Result<String> {
    if io::stdin().is_terminal() {
        println!("{prompt}");
    }
    let mut buf = String::new();
    io::stdin()
        .read_line(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf.trim_end_matches(['\r', '\n']).to_string())
}

impl LoginCommand {
    pub async fn exec(self, db: Database, connection: &Connection) -> anyhow::Result<()> {
        let Self {
            controller,
            username,
            password,
        } = self;
        let password = match password {
            Some(p) => p,
            None => input("Enter the password:")?,
        };
        let mut session = Session::new(
            db,
            Auth {
                username,
                password: Password::new(password),
                controller_host: controller,
                cookies: Vec::new(),
            },
        );
        let client = connection.client(&session)?;
        client.login().await.context("Failed to log in")?;
        session.sync(&client).context("Failed to save session")?;
        Ok(())
    }
}

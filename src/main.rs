#![deny(rust_2018_idioms)]

use snafu::{ResultExt, Snafu};
use std::time::Duration;

pub use config::Config;

mod config;
mod dispatch;
mod domain;
mod flow;
mod jlc;
mod redact;
mod roster;
mod server_chan;

fn main() {
    if let Err(e) = core() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[tokio::main]
async fn core() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let config = Config::from_environment().context(UnableToConfigureSnafu)?;
    let groups = roster::build_groups(&config).context(UnableToBuildRosterSnafu)?;

    let http = reqwest_client().context(UnableToBuildHttpClientSnafu)?;

    let jlc = jlc::Config::new()
        .context(UnableToConfigureJlcSnafu)?
        .into_client(http.clone());
    let push = server_chan::Config::new()
        .context(UnableToConfigureServerChanSnafu)?
        .into_client(http);

    let flow = flow::CheckinFlow::new(jlc);

    dispatch::run(groups, flow, push).await;

    Ok(())
}

fn reqwest_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
}

#[derive(Debug, Snafu)]
enum Error {
    #[snafu(display("Unable to configure application"))]
    UnableToConfigure { source: config::Error },

    #[snafu(display("Unable to assemble the account roster"))]
    UnableToBuildRoster { source: roster::Error },

    #[snafu(display("Unable to build the HTTP client"))]
    UnableToBuildHttpClient { source: reqwest::Error },

    #[snafu(display("Unable to configure the check-in service client"))]
    UnableToConfigureJlc { source: jlc::Error },

    #[snafu(display("Unable to configure the notification channel"))]
    UnableToConfigureServerChan { source: server_chan::Error },
}

type Result<T, E = Error> = std::result::Result<T, E>;

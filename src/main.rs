// Entrypoint for the CLI application.
// - Keeps `main` small: parse flags, create an API client and hand both to
//   the UI flow.
// - Returns `anyhow::Result` so any failure is printed and exits non-zero.

use anyhow::Context;
use clap::Parser;
use jokecli::{api::ApiClient, api::DEFAULT_BASE_URL, cli::Cli, ui};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let api = ApiClient::new(DEFAULT_BASE_URL)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ui::run(&api, &cli, &mut out).context("could not fetch a joke")?;
    Ok(())
}

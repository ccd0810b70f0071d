// UI layer: runs the linear flow Ping -> Categories -> Validate -> Joke ->
// Render and writes the result. The first failing step ends the run.

use crate::api::{validate_params, ApiClient, CategoryResponse, Joke, ANY_CATEGORY};
use crate::cli::Cli;
use crate::error::JokeError;
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;

/// Pause between the setup and the delivery of a two-part joke.
pub const DEFAULT_PUNCHLINE_DELAY: Duration = Duration::from_secs(2);

/// Run one invocation against `api`, writing the joke (or the category
/// listing with `--list`) to `out`.
pub fn run<W: Write>(api: &ApiClient, cli: &Cli, out: &mut W) -> Result<(), JokeError> {
    info!("Checking server availability at {}", api.base_url());
    with_spinner("Checking server availability...", || api.check_availability())?;

    let categories = with_spinner("Fetching categories...", || api.fetch_categories())?;
    info!("Server lists {} categories", categories.categories.len());

    if cli.list {
        return list_categories(&categories, out).map_err(JokeError::from);
    }

    let category = if cli.pick {
        pick_category(&categories.categories)?
    } else {
        cli.category.clone()
    };
    let params = validate_params(&category, &cli.joke_type, &categories.categories)?;

    info!("Fetching {} joke from category {}", params.joke_type(), params.category());
    let joke = with_spinner("Fetching joke...", || api.fetch_joke(&params))?;
    debug!("Joke {} flags: {:?}", joke.id(), joke.flags().active());

    render(&joke, out, cli.punchline_delay())?;
    Ok(())
}

/// Write the joke to `out`. A two-part joke gets its setup line, a pause of
/// `delay`, then its delivery line; each line is flushed as it is written.
pub fn render<W: Write>(joke: &Joke, out: &mut W, delay: Duration) -> io::Result<()> {
    match joke {
        Joke::Single(j) => {
            writeln!(out, "{}", j.joke)?;
            out.flush()
        }
        Joke::TwoPart(j) => {
            writeln!(out, "{}", j.setup)?;
            out.flush()?;
            thread::sleep(delay);
            writeln!(out, "{}", j.delivery)?;
            out.flush()
        }
    }
}

/// Print categories one per line, followed by the aliases the server
/// resolves. Aliases are not accepted by `--cat`.
pub fn list_categories<W: Write>(resp: &CategoryResponse, out: &mut W) -> io::Result<()> {
    for category in &resp.categories {
        writeln!(out, "{}", category)?;
    }
    if !resp.category_aliases.is_empty() {
        writeln!(out)?;
        writeln!(out, "Aliases:")?;
        for a in &resp.category_aliases {
            writeln!(out, "  {} -> {}", a.alias, a.resolved)?;
        }
    }
    out.flush()
}

/// Keyboard-driven category menu. "Any" is offered first when the server
/// list lacks it.
fn pick_category(categories: &[String]) -> Result<String, JokeError> {
    let mut items: Vec<String> = Vec::with_capacity(categories.len() + 1);
    if !categories.iter().any(|c| c == ANY_CATEGORY) {
        items.push(ANY_CATEGORY.to_string());
    }
    items.extend(categories.iter().cloned());

    let selection = Select::new()
        .with_prompt("Category")
        .items(&items)
        .default(0)
        .interact()?;
    Ok(items.swap_remove(selection))
}

/// Show a spinner on stderr while `f` runs. Hidden when stderr is not a
/// terminal.
fn with_spinner<T>(msg: &'static str, f: impl FnOnce() -> T) -> T {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(msg);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let out = f();
    spinner.finish_and_clear();
    out
}

// Command-line flags. `--type` is taken as a raw string so that an unknown
// value is reported by `api::validate_params` like a bad category is.

use crate::api::ANY_CATEGORY;
use crate::ui::DEFAULT_PUNCHLINE_DELAY;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "jokecli", version, about = "Query JokeAPI for a quick joke")]
pub struct Cli {
    /// Joke category; must be one the server lists, or Any
    #[arg(long = "cat", value_name = "NAME", default_value = ANY_CATEGORY)]
    pub category: String,

    /// Joke type (single or twopart)
    #[arg(long = "type", value_name = "TYPE", default_value = "single")]
    pub joke_type: String,

    /// Pause between the setup and delivery of a twopart joke (at least 1)
    #[arg(
        long = "delay-ms",
        value_name = "MS",
        default_value_t = DEFAULT_PUNCHLINE_DELAY.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub delay_ms: u64,

    /// Print the available categories and exit
    #[arg(long)]
    pub list: bool,

    /// Choose the category from an interactive menu
    #[arg(long, conflicts_with = "list")]
    pub pick: bool,
}

impl Cli {
    pub fn punchline_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

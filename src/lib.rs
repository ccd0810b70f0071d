// Library root
// -----------
// This crate exposes a small library surface for the joke CLI. The binary
// (`main.rs`) parses flags and hands an API client to `ui::run`.
//
// Module responsibilities:
// - `api`: Encapsulates HTTP interactions with JokeAPI (ping, categories,
//   joke) plus the response schemas and request validation.
// - `error`: The typed error returned by every fallible step.
// - `cli`: Command-line flags.
// - `ui`: The linear fetch flow and terminal output.
//
// Keeping HTTP out of the UI layer lets the tests drive the client against
// a mock server.
pub mod api;
pub mod cli;
pub mod error;
pub mod ui;

pub use error::JokeError;

//! Randomify library
//!
//! This library fetches a random album and its artist from the Spotify Web
//! API. It covers the OAuth 2.0 authorization-code flow, a small catalog
//! client and the fetch pipeline that chains the dependent catalog calls.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line front-end rendering the pipeline state
//! - `config` - Environment loading and runtime settings
//! - `error` - Crate error type
//! - `pipeline` - Random album → album detail → artist detail state machine
//! - `server` - Local HTTP server for OAuth callbacks
//! - `session` - Token ownership for one launch of the application
//! - `spotify` - Spotify authorization and catalog clients
//! - `types` - Data structures and wire types
//! - `utils` - Random query generation and other helpers
//!
//! # Example
//!
//! ```
//! use randomify::{config, pipeline::Pipeline, session::Session, spotify::catalog::CatalogClient};
//!
//! #[tokio::main]
//! async fn main() -> randomify::Res<()> {
//!     config::load_env().await?;
//!     let settings = config::Settings::from_env()?;
//!     let mut session = Session::new(settings.clone());
//!     let mut catalog = CatalogClient::new(&settings);
//!     session.authorize().await?;
//!     session.configure(&mut catalog);
//!     let pipeline = Pipeline::new(&settings);
//!     let outcome = pipeline.run(&catalog, &mut rand::rng()).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod server;
pub mod session;
pub mod spotify;
pub mod types;
pub mod utils;

pub use error::Error;

/// A convenient Result type alias for operations that may fail.
///
/// # Example
///
/// ```
/// use randomify::Res;
///
/// async fn fetch_data() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Error>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Waiting for the Spotify redirect...");
/// info!("Search offset {}", offset);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Only meant for fatal errors in the binary. Library code returns
/// [`Error`] instead.
///
/// # Example
///
/// ```
/// error!("Cannot load settings. Err: {}", e);
/// // Program exits here
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// This is where the log-and-continue policy ends up: failed authorization
/// attempts and pipeline runs are reported here and the program goes on.
///
/// # Example
///
/// ```
/// warning!("Token exchange failed: {}", e);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}

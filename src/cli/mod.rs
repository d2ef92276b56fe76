//! # CLI Module
//!
//! Command-line front-end for randomify. It plays the part of the album
//! screen: it renders whatever the fetch pipeline produced last and turns
//! user input into new pipeline runs.
//!
//! ## Commands
//!
//! - [`auth`] - Runs the authorization flow and prints the token expiry
//! - [`random`] - Authorizes, fetches a random album and renders it;
//!   `--interactive` keeps the session open for more runs
//!
//! ## Error Handling
//!
//! Library calls return [`crate::Error`]. This layer decides how to show
//! them: failures are reported with `warning!` and the last view stays on
//! screen, which before the first successful run is the "Loading..."
//! placeholder.
//!
//! ## Usage Patterns
//!
//! ```bash
//! randomify auth                      # Check that authorization works
//! randomify random                    # One random album
//! randomify random --seed 42          # Reproducible query and offset
//! randomify random --interactive      # Keep randomifying
//! ```

mod auth;
mod random;

pub use auth::auth;
pub use random::launch;
pub use random::random;

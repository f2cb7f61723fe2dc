//! # otjlog-board
//!
//! Board service collaborator for otjlog.
//!
//! [`TrelloClient`] implements both [`otjlog_core::TaskSource`] and
//! [`otjlog_core::CommentSource`] against the Trello REST API. Any failure
//! (transport, non-success status, undecodable body) surfaces as a
//! [`otjlog_core::SourceError`]; nothing is retried or swallowed.
//!
//! ## Example
//!
//! ```rust,no_run
//! use otjlog_board::{TrelloClient, TrelloCredentials, DEFAULT_BASE_URL};
//! use otjlog_core::TaskSource;
//!
//! let credentials = TrelloCredentials::new("api-key", "token", "board-id");
//! let client = TrelloClient::new(credentials, DEFAULT_BASE_URL)?;
//! for task in client.tasks()? {
//!     println!("{}", task.title);
//! }
//! # Ok::<(), otjlog_core::SourceError>(())
//! ```

pub mod trello;

pub use trello::{TrelloClient, TrelloCredentials, DEFAULT_BASE_URL};

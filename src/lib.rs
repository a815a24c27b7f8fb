//! # Nestling 🪺
//!
//! Nested comment threads for Lemmy clients.
//!
//! ## Overview
//!
//! Lemmy serves comments as flat pages where each comment names its parent.
//! Nestling links those pages into a forest, keeps per-comment collapse and
//! vote state, and flattens the result into the rows a thread view paints.
//! Replies that arrive before their parent are kept as orphans and relinked
//! once the parent shows up.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ThreadSession                          │
//! │   Owns one thread view: load, load more, collapse, vote     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │       API       │ │      Tree       │ │     Models      │
//! │                 │ │                 │ │                 │
//! │ • CommentSource │ │ • Forest arena  │ │ • Comment       │
//! │ • VoteSubmitter │ │ • Orphans       │ │ • VoteState     │
//! │ • Lemmy client  │ │ • Visible rows  │ │ • CommentSort   │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`api`] — Comment source and vote submitter traits, Lemmy client
//! - [`config`] — Configuration management
//! - [`demo`] — Offline demo thread
//! - [`error`] — Errors raised by the tree
//! - [`models`] — Data models (Comment, VoteState, CommentSort)
//! - [`session`] — One open thread view
//! - [`tree`] — The comment forest
//!
//! ## Example
//!
//! ```
//! use nestling::{Comment, CommentForest, CommentId};
//!
//! let mut forest = CommentForest::build(vec![
//!     Comment::new(1, None),
//!     Comment::reply(2, 1),
//! ])
//! .unwrap();
//!
//! forest.set_collapsed(CommentId(1), true).unwrap();
//! assert_eq!(forest.visible_sequence().count(), 1);
//! ```

#![doc(html_root_url = "https://docs.rs/nestling/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::should_implement_trait)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::future_not_send)]

pub mod api;
pub mod config;
pub mod demo;
pub mod error;
pub mod models;
pub mod paths;
pub mod session;
pub mod tree;

// Re-export main types for convenience
pub use config::Config;
pub use error::ThreadError;
pub use models::{Comment, CommentId, CommentSort, VoteState};
pub use session::ThreadSession;
pub use tree::{CommentForest, CommentNode, VisibleIter};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/ricardodantas/nestling";

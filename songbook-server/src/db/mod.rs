//! Database access layer for songbook-server
//!
//! The pool itself is opened by `songbook_common::db::init_database` and
//! injected through [`crate::AppState`].

pub mod songs;
pub mod stats;

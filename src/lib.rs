//! PUG: pick-up group lobbies and teams for community chat servers.
//!
//! A PUG runs inside one category (scope). Members join a staging lobby,
//! a moderator splits the lobby into balanced teams, and when the games are
//! over the PUG is stopped and every role and channel it created is removed,
//! optionally archiving the text channels first.
//!
//! ## Layout
//!
//! - [`platform`]: the chat platform seam, plus an in-memory platform
//! - [`group`]: role-bound groups, lobbies and team partitioning
//! - [`archive`]: channel transcripts sent to an archive channel
//! - [`session`]: running lobbies per scope and their join messages
//! - [`commands`]: start, join, split, stop and setting toggles
//! - [`config`]: pug.toml, `PUG_*` env vars and CLI flags

pub mod archive;
pub mod chat;
pub mod color;
pub mod commands;
pub mod config;
pub mod error;
pub mod group;
pub mod platform;
pub mod session;

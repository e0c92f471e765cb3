//! Command layer: the operations a chat frontend exposes.
//!
//! Each command checks the session registry (one PUG per scope), then drives
//! the lobby and returns what the frontend should know. User-facing replies
//! that belong to the command itself are sent through the platform.

pub mod join;
pub mod settings;
pub mod split;
pub mod start;
pub mod stop;

pub use join::{join, join_by_trigger, JoinOutcome, ReplyTo};
pub use settings::{set_archive, set_team_text, set_team_voice, ArchiveArg};
pub use split::{split, split_with_rng, TeamSize};
pub use start::start;
pub use stop::stop;

//! Host platform abstraction.
//!
//! Everything the PUG engine needs from the chat platform goes through the
//! [`Platform`] trait: roles, channels, member voice state, messages and
//! channel history. Backends:
//! - a real chat client (lives in the host application)
//! - [`InMemoryPlatform`]: deterministic in-process platform for tests and
//!   the simulator

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::color::Colour;

mod memory;

pub use memory::{Destination, InMemoryPlatform, Sent};

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake!(
    /// A member of the community (also used for the bot's own identity).
    MemberId
);
snowflake!(
    /// A role (permission grant).
    RoleId
);
snowflake!(
    /// A text or voice channel.
    ChannelId
);
snowflake!(
    /// A message within a channel.
    MessageId
);
snowflake!(
    /// A containment scope (category) that holds channels.
    ScopeId
);

/// Errors surfaced by platform calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlatformError {
    /// The referenced entity does not exist (or no longer exists).
    #[error("not found: {0}")]
    NotFound(String),
    /// The bot lacks the permission needed for the call.
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Transport-level failure talking to the platform.
    #[error("http error: {0}")]
    Http(String),
    /// Anything else the backend reports.
    #[error("platform error: {0}")]
    Other(String),
}

/// Convenience alias for platform call results.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// A member as seen at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub display_name: String,
    /// Automated account.
    pub bot: bool,
    /// Roles currently held, in platform order.
    pub roles: Vec<RoleId>,
    /// Position of the member's highest role (larger ranks higher).
    pub top_role_position: i64,
    /// Voice channel the member currently occupies.
    pub voice: Option<ChannelId>,
}

impl Member {
    /// Mention markup that pings the member.
    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name)
    }
}

/// A role allocated on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub colour: Colour,
}

/// A containment scope (category).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub id: ScopeId,
    pub name: String,
}

/// Kind of channel to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Text,
    Voice,
}

/// A channel created on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub name: String,
    pub kind: ChannelKind,
}

impl Channel {
    /// Mention markup that links the channel.
    pub fn mention(&self) -> String {
        format!("<#{}>", self.id)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Subject of a permission overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OverwriteTarget {
    Role(RoleId),
    Member(MemberId),
}

/// Tri-state permission overwrite: `None` inherits, `Some` allows or denies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionOverwrite {
    pub read_messages: Option<bool>,
    pub send_messages: Option<bool>,
    pub connect: Option<bool>,
}

impl PermissionOverwrite {
    /// Allow reading, sending and connecting.
    pub fn participant() -> Self {
        Self {
            read_messages: Some(true),
            send_messages: Some(true),
            connect: Some(true),
        }
    }

    /// Deny reading only.
    pub fn hidden() -> Self {
        Self {
            read_messages: Some(false),
            ..Self::default()
        }
    }

    /// Layer `other` on top of `self`; explicit values in `other` win.
    pub fn update(&mut self, other: PermissionOverwrite) {
        if other.read_messages.is_some() {
            self.read_messages = other.read_messages;
        }
        if other.send_messages.is_some() {
            self.send_messages = other.send_messages;
        }
        if other.connect.is_some() {
            self.connect = other.connect;
        }
    }
}

/// Overwrite table of a scope or channel.
pub type Overwrites = BTreeMap<OverwriteTarget, PermissionOverwrite>;

/// A rich summary message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub colour: Colour,
    pub thumbnail_url: Option<String>,
}

/// A file upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Payload of an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outgoing {
    Text(String),
    Embed(Embed),
    File(FileUpload),
}

impl From<String> for Outgoing {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Outgoing {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl Outgoing {
    /// Text body, if this is a plain text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// A file attached to a historical message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub url: String,
}

/// A message read back from channel history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryMessage {
    pub id: MessageId,
    pub author: Member,
    pub created_at: DateTime<Utc>,
    pub edited_at: Option<DateTime<Utc>>,
    /// Content with mentions resolved to plain names.
    pub clean_content: String,
    pub attachments: Vec<Attachment>,
}

/// Host platform primitives consumed by the PUG engine.
///
/// Every method is an I/O boundary. Implementations must not reorder calls
/// issued sequentially by the engine.
#[async_trait]
pub trait Platform: Send + Sync {
    /// The bot's own identity.
    fn bot_id(&self) -> MemberId;

    /// The "everyone" role of the guild.
    fn default_role(&self) -> RoleId;

    /// Guild icon, used as the archive summary thumbnail.
    fn guild_icon_url(&self) -> Option<String>;

    /// Fetch the current state of a member.
    async fn member(&self, id: MemberId) -> PlatformResult<Member>;

    /// All members currently holding `role`.
    async fn role_members(&self, role: RoleId) -> PlatformResult<Vec<Member>>;

    /// Replace the member's role set in a single update.
    async fn edit_member_roles(&self, member: MemberId, roles: &[RoleId]) -> PlatformResult<()>;

    /// Allocate a new role.
    async fn create_role(&self, name: &str, colour: Colour) -> PlatformResult<Role>;

    /// Delete a role, revoking it from every holder.
    async fn delete_role(&self, role: RoleId, reason: &str) -> PlatformResult<()>;

    /// Overwrites configured on a scope.
    async fn scope_overwrites(&self, scope: ScopeId) -> PlatformResult<Overwrites>;

    /// Create a channel, optionally under a scope.
    async fn create_channel(
        &self,
        kind: ChannelKind,
        name: &str,
        scope: Option<ScopeId>,
        overwrites: Overwrites,
    ) -> PlatformResult<Channel>;

    /// Overwrites currently configured on a channel.
    async fn channel_overwrites(&self, channel: ChannelId) -> PlatformResult<Overwrites>;

    /// Replace a channel's overwrites.
    async fn edit_channel_overwrites(
        &self,
        channel: ChannelId,
        overwrites: Overwrites,
    ) -> PlatformResult<()>;

    /// Delete a channel.
    async fn delete_channel(&self, channel: ChannelId, reason: &str) -> PlatformResult<()>;

    /// Move a member who is connected to voice into `channel`.
    async fn move_member(&self, member: MemberId, channel: ChannelId) -> PlatformResult<()>;

    /// Send a message to a channel.
    async fn send(&self, channel: ChannelId, message: Outgoing) -> PlatformResult<MessageId>;

    /// Send a direct message to a member.
    async fn send_direct(&self, member: MemberId, message: Outgoing) -> PlatformResult<MessageId>;

    /// React to a message.
    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> PlatformResult<()>;

    /// Delete a message.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;

    /// Full channel history, oldest first.
    ///
    /// The stream is lazy and starts from the beginning on every call.
    fn history(&self, channel: ChannelId) -> BoxStream<'_, PlatformResult<HistoryMessage>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_update_keeps_unset_fields() {
        let mut base = PermissionOverwrite {
            read_messages: Some(false),
            send_messages: Some(false),
            connect: None,
        };
        base.update(PermissionOverwrite {
            read_messages: Some(true),
            ..PermissionOverwrite::default()
        });
        assert_eq!(base.read_messages, Some(true));
        assert_eq!(base.send_messages, Some(false));
        assert_eq!(base.connect, None);
    }

    #[test]
    fn test_member_mention_and_display() {
        let member = Member {
            id: MemberId(42),
            display_name: "Aaron".to_string(),
            bot: false,
            roles: vec![],
            top_role_position: 0,
            voice: None,
        };
        assert_eq!(member.mention(), "<@42>");
        assert_eq!(member.to_string(), "Aaron");
    }

    #[test]
    fn test_outgoing_as_text() {
        assert_eq!(Outgoing::Text("hi".into()).as_text(), Some("hi"));
        let file = Outgoing::File(FileUpload {
            filename: "a.md".into(),
            bytes: vec![],
        });
        assert_eq!(file.as_text(), None);
    }
}

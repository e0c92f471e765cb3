use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, BoxStream, StreamExt};

use crate::color::Colour;

use super::{
    Channel, ChannelId, ChannelKind, HistoryMessage, Member, MemberId, MessageId, Outgoing,
    Overwrites, Platform, PlatformError, PlatformResult, Role, RoleId, Scope, ScopeId,
};

/// Where a recorded message went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Channel(ChannelId),
    Direct(MemberId),
}

/// A message sent through the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub to: Destination,
    pub id: MessageId,
    pub message: Outgoing,
}

#[derive(Debug)]
struct ChannelEntry {
    channel: Channel,
    scope: Option<ScopeId>,
    overwrites: Overwrites,
    history: Vec<HistoryMessage>,
}

#[derive(Debug, Default)]
struct State {
    members: BTreeMap<MemberId, Member>,
    roles: BTreeMap<RoleId, Role>,
    scopes: BTreeMap<ScopeId, (Scope, Overwrites)>,
    channels: BTreeMap<ChannelId, ChannelEntry>,
    sent: Vec<Sent>,
    reactions: Vec<(ChannelId, MessageId, String)>,
    deleted_messages: Vec<(ChannelId, MessageId)>,
    role_edits: usize,
    fail_reactions: bool,
}

/// In-process platform with no network.
///
/// Keeps roles, channels, voice state and message history in memory and
/// records every message sent, so tests and the simulator can inspect what
/// the engine did.
#[derive(Debug)]
pub struct InMemoryPlatform {
    bot: MemberId,
    everyone: RoleId,
    icon: Option<String>,
    next_id: AtomicU64,
    state: Mutex<State>,
}

impl Default for InMemoryPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPlatform {
    /// Create an empty guild with a bot account and an "everyone" role.
    pub fn new() -> Self {
        let platform = Self {
            bot: MemberId(1),
            everyone: RoleId(2),
            icon: None,
            next_id: AtomicU64::new(100),
            state: Mutex::new(State::default()),
        };
        {
            let mut state = platform.lock();
            state.roles.insert(
                platform.everyone,
                Role {
                    id: platform.everyone,
                    name: "@everyone".to_string(),
                    colour: Colour::default(),
                },
            );
            state.members.insert(
                platform.bot,
                Member {
                    id: platform.bot,
                    display_name: "PUG".to_string(),
                    bot: true,
                    roles: vec![],
                    top_role_position: 0,
                    voice: None,
                },
            );
        }
        platform
    }

    /// Set the guild icon URL.
    pub fn with_icon(mut self, url: impl Into<String>) -> Self {
        self.icon = Some(url.into());
        self
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Add a human member.
    pub fn add_member(&self, name: &str) -> MemberId {
        self.add_member_with(name, false, 0)
    }

    /// Add an automated member.
    pub fn add_bot(&self, name: &str) -> MemberId {
        self.add_member_with(name, true, 0)
    }

    /// Add a member with an explicit bot flag and top-role position.
    pub fn add_member_with(&self, name: &str, bot: bool, top_role_position: i64) -> MemberId {
        let id = MemberId(self.next_id());
        self.lock().members.insert(
            id,
            Member {
                id,
                display_name: name.to_string(),
                bot,
                roles: vec![],
                top_role_position,
                voice: None,
            },
        );
        id
    }

    /// Add a scope (category) with the given overwrites.
    pub fn add_scope(&self, name: &str, overwrites: Overwrites) -> Scope {
        let scope = Scope {
            id: ScopeId(self.next_id()),
            name: name.to_string(),
        };
        self.lock()
            .scopes
            .insert(scope.id, (scope.clone(), overwrites));
        scope
    }

    /// Add a channel that exists outside any group (e.g. an archive channel).
    pub fn add_text_channel(&self, name: &str) -> ChannelId {
        let id = ChannelId(self.next_id());
        self.lock().channels.insert(
            id,
            ChannelEntry {
                channel: Channel {
                    id,
                    name: name.to_string(),
                    kind: ChannelKind::Text,
                },
                scope: None,
                overwrites: Overwrites::new(),
                history: Vec::new(),
            },
        );
        id
    }

    /// Connect a member to a voice channel.
    pub fn join_voice(&self, member: MemberId, channel: ChannelId) {
        if let Some(m) = self.lock().members.get_mut(&member) {
            m.voice = Some(channel);
        }
    }

    /// Append a message to a channel's history as if `author` posted it.
    pub fn post(
        &self,
        channel: ChannelId,
        author: MemberId,
        content: &str,
        created_at: DateTime<Utc>,
    ) -> MessageId {
        let id = MessageId(self.next_id());
        let mut state = self.lock();
        let Some(author) = state.members.get(&author).cloned() else {
            return id;
        };
        if let Some(entry) = state.channels.get_mut(&channel) {
            entry.history.push(HistoryMessage {
                id,
                author,
                created_at,
                edited_at: None,
                clean_content: content.to_string(),
                attachments: Vec::new(),
            });
        }
        id
    }

    /// Append a fully specified history record.
    pub fn push_history(&self, channel: ChannelId, message: HistoryMessage) {
        if let Some(entry) = self.lock().channels.get_mut(&channel) {
            entry.history.push(message);
        }
    }

    /// Make `add_reaction` fail, as when the bot lacks permission.
    pub fn fail_reactions(&self, fail: bool) {
        self.lock().fail_reactions = fail;
    }

    /// Snapshot of a member.
    pub fn member_snapshot(&self, id: MemberId) -> Option<Member> {
        self.lock().members.get(&id).cloned()
    }

    /// A role, if it still exists.
    pub fn role(&self, id: RoleId) -> Option<Role> {
        self.lock().roles.get(&id).cloned()
    }

    /// Every live role except "everyone".
    pub fn roles(&self) -> Vec<Role> {
        self.lock()
            .roles
            .values()
            .filter(|r| r.id != self.everyone)
            .cloned()
            .collect()
    }

    /// A channel, if it still exists.
    pub fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.lock().channels.get(&id).map(|e| e.channel.clone())
    }

    /// Every live channel.
    pub fn channels(&self) -> Vec<Channel> {
        self.lock()
            .channels
            .values()
            .map(|e| e.channel.clone())
            .collect()
    }

    /// Scope a channel was created under.
    pub fn channel_scope(&self, id: ChannelId) -> Option<ScopeId> {
        self.lock().channels.get(&id).and_then(|e| e.scope)
    }

    /// Current overwrites of a channel.
    pub fn overwrites_of(&self, id: ChannelId) -> Option<Overwrites> {
        self.lock().channels.get(&id).map(|e| e.overwrites.clone())
    }

    /// Every message sent, in order.
    pub fn sent(&self) -> Vec<Sent> {
        self.lock().sent.clone()
    }

    /// Messages sent to one channel, in order.
    pub fn sent_to(&self, channel: ChannelId) -> Vec<Outgoing> {
        self.lock()
            .sent
            .iter()
            .filter(|s| s.to == Destination::Channel(channel))
            .map(|s| s.message.clone())
            .collect()
    }

    /// Text messages sent to one channel, in order.
    pub fn texts_to(&self, channel: ChannelId) -> Vec<String> {
        self.sent_to(channel)
            .iter()
            .filter_map(|m| m.as_text().map(str::to_string))
            .collect()
    }

    /// Direct messages sent to a member, in order.
    pub fn direct_to(&self, member: MemberId) -> Vec<Outgoing> {
        self.lock()
            .sent
            .iter()
            .filter(|s| s.to == Destination::Direct(member))
            .map(|s| s.message.clone())
            .collect()
    }

    /// Reactions added, in order.
    pub fn reactions(&self) -> Vec<(ChannelId, MessageId, String)> {
        self.lock().reactions.clone()
    }

    /// Messages deleted, in order.
    pub fn deleted_messages(&self) -> Vec<(ChannelId, MessageId)> {
        self.lock().deleted_messages.clone()
    }

    /// Number of role-set updates applied to members.
    pub fn role_edits(&self) -> usize {
        self.lock().role_edits
    }
}

fn not_found(what: &str, id: impl std::fmt::Display) -> PlatformError {
    PlatformError::NotFound(format!("{} {}", what, id))
}

#[async_trait]
impl Platform for InMemoryPlatform {
    fn bot_id(&self) -> MemberId {
        self.bot
    }

    fn default_role(&self) -> RoleId {
        self.everyone
    }

    fn guild_icon_url(&self) -> Option<String> {
        self.icon.clone()
    }

    async fn member(&self, id: MemberId) -> PlatformResult<Member> {
        self.lock()
            .members
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found("member", id))
    }

    async fn role_members(&self, role: RoleId) -> PlatformResult<Vec<Member>> {
        let state = self.lock();
        if !state.roles.contains_key(&role) {
            return Err(not_found("role", role));
        }
        Ok(state
            .members
            .values()
            .filter(|m| m.roles.contains(&role))
            .cloned()
            .collect())
    }

    async fn edit_member_roles(&self, member: MemberId, roles: &[RoleId]) -> PlatformResult<()> {
        let mut state = self.lock();
        if let Some(missing) = roles.iter().find(|r| !state.roles.contains_key(*r)) {
            return Err(not_found("role", missing));
        }
        let m = state
            .members
            .get_mut(&member)
            .ok_or_else(|| not_found("member", member))?;
        m.roles = roles.to_vec();
        state.role_edits += 1;
        Ok(())
    }

    async fn create_role(&self, name: &str, colour: Colour) -> PlatformResult<Role> {
        let role = Role {
            id: RoleId(self.next_id()),
            name: name.to_string(),
            colour,
        };
        self.lock().roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn delete_role(&self, role: RoleId, _reason: &str) -> PlatformResult<()> {
        let mut state = self.lock();
        state.roles.remove(&role).ok_or_else(|| not_found("role", role))?;
        for member in state.members.values_mut() {
            member.roles.retain(|&r| r != role);
        }
        Ok(())
    }

    async fn scope_overwrites(&self, scope: ScopeId) -> PlatformResult<Overwrites> {
        self.lock()
            .scopes
            .get(&scope)
            .map(|(_, overs)| overs.clone())
            .ok_or_else(|| not_found("scope", scope))
    }

    async fn create_channel(
        &self,
        kind: ChannelKind,
        name: &str,
        scope: Option<ScopeId>,
        overwrites: Overwrites,
    ) -> PlatformResult<Channel> {
        let name = match kind {
            ChannelKind::Text => name.to_lowercase().replace(' ', "-"),
            ChannelKind::Voice => name.to_string(),
        };
        let channel = Channel {
            id: ChannelId(self.next_id()),
            name,
            kind,
        };
        let mut state = self.lock();
        if let Some(scope) = scope {
            if !state.scopes.contains_key(&scope) {
                return Err(not_found("scope", scope));
            }
        }
        state.channels.insert(
            channel.id,
            ChannelEntry {
                channel: channel.clone(),
                scope,
                overwrites,
                history: Vec::new(),
            },
        );
        Ok(channel)
    }

    async fn channel_overwrites(&self, channel: ChannelId) -> PlatformResult<Overwrites> {
        self.lock()
            .channels
            .get(&channel)
            .map(|e| e.overwrites.clone())
            .ok_or_else(|| not_found("channel", channel))
    }

    async fn edit_channel_overwrites(
        &self,
        channel: ChannelId,
        overwrites: Overwrites,
    ) -> PlatformResult<()> {
        let mut state = self.lock();
        let entry = state
            .channels
            .get_mut(&channel)
            .ok_or_else(|| not_found("channel", channel))?;
        entry.overwrites = overwrites;
        Ok(())
    }

    async fn delete_channel(&self, channel: ChannelId, _reason: &str) -> PlatformResult<()> {
        let mut state = self.lock();
        state
            .channels
            .remove(&channel)
            .ok_or_else(|| not_found("channel", channel))?;
        for member in state.members.values_mut() {
            if member.voice == Some(channel) {
                member.voice = None;
            }
        }
        Ok(())
    }

    async fn move_member(&self, member: MemberId, channel: ChannelId) -> PlatformResult<()> {
        let mut state = self.lock();
        match state.channels.get(&channel) {
            Some(entry) if entry.channel.kind == ChannelKind::Voice => {}
            Some(_) => {
                return Err(PlatformError::Other(format!(
                    "channel {} is not a voice channel",
                    channel
                )))
            }
            None => return Err(not_found("channel", channel)),
        }
        let m = state
            .members
            .get_mut(&member)
            .ok_or_else(|| not_found("member", member))?;
        if m.voice.is_none() {
            return Err(PlatformError::Other(format!(
                "member {} is not connected to voice",
                member
            )));
        }
        m.voice = Some(channel);
        Ok(())
    }

    async fn send(&self, channel: ChannelId, message: Outgoing) -> PlatformResult<MessageId> {
        let id = MessageId(self.next_id());
        let mut state = self.lock();
        let bot = state
            .members
            .get(&self.bot)
            .cloned()
            .ok_or_else(|| not_found("member", self.bot))?;
        let entry = state
            .channels
            .get_mut(&channel)
            .ok_or_else(|| not_found("channel", channel))?;
        if let Outgoing::Text(text) = &message {
            entry.history.push(HistoryMessage {
                id,
                author: bot,
                created_at: Utc::now(),
                edited_at: None,
                clean_content: text.clone(),
                attachments: Vec::new(),
            });
        }
        state.sent.push(Sent {
            to: Destination::Channel(channel),
            id,
            message,
        });
        Ok(id)
    }

    async fn send_direct(&self, member: MemberId, message: Outgoing) -> PlatformResult<MessageId> {
        let id = MessageId(self.next_id());
        let mut state = self.lock();
        if !state.members.contains_key(&member) {
            return Err(not_found("member", member));
        }
        state.sent.push(Sent {
            to: Destination::Direct(member),
            id,
            message,
        });
        Ok(id)
    }

    async fn add_reaction(
        &self,
        channel: ChannelId,
        message: MessageId,
        emoji: &str,
    ) -> PlatformResult<()> {
        let mut state = self.lock();
        if state.fail_reactions {
            return Err(PlatformError::Forbidden("add reactions".to_string()));
        }
        state.reactions.push((channel, message, emoji.to_string()));
        Ok(())
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        let mut state = self.lock();
        if let Some(entry) = state.channels.get_mut(&channel) {
            entry.history.retain(|m| m.id != message);
        }
        state.deleted_messages.push((channel, message));
        Ok(())
    }

    fn history(&self, channel: ChannelId) -> BoxStream<'_, PlatformResult<HistoryMessage>> {
        let snapshot: Vec<PlatformResult<HistoryMessage>> = match self.lock().channels.get(&channel) {
            Some(entry) => entry.history.iter().cloned().map(Ok).collect(),
            None => vec![Err(not_found("channel", channel))],
        };
        stream::iter(snapshot).boxed()
    }
}

//! Groups: role-bound member sets with optional dedicated channels.
//!
//! A group is identified by the role it owns. Membership is never stored
//! locally: a member belongs to the group iff they hold the role, so every
//! membership query goes to the platform.
//!
//! Two kinds share this type:
//! - plain groups (teams)
//! - lobbies, which stage members and own the teams they are split into
//!   (see [`lobby`])

mod lobby;
mod partition;

pub use lobby::{AssignOptions, LobbyState};
pub use partition::{deal, team_sizes, TeamShape};

use crate::archive::{self, ArchiveTarget};
use crate::chat::{self, Welcome};
use crate::platform::{
    Channel, ChannelKind, Member, MemberId, OverwriteTarget, Overwrites, PermissionOverwrite,
    Platform, PlatformResult, Role, RoleId, ScopeId,
};

/// What a group is for.
#[derive(Debug, PartialEq, Eq)]
pub enum GroupKind {
    /// A team (or any plain group).
    Plain,
    /// A staging lobby that owns its teams.
    Lobby(LobbyState),
}

/// A named member set bound to a role and optional text/voice channels.
#[derive(Debug, PartialEq, Eq)]
pub struct Group {
    role: Role,
    text: Option<Channel>,
    voice: Option<Channel>,
    kind: GroupKind,
}

impl Group {
    /// Wrap an allocated role as a plain group (team).
    pub fn new(role: Role) -> Self {
        Self {
            role,
            text: None,
            voice: None,
            kind: GroupKind::Plain,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn role_id(&self) -> RoleId {
        self.role.id
    }

    pub fn name(&self) -> &str {
        &self.role.name
    }

    pub fn text(&self) -> Option<&Channel> {
        self.text.as_ref()
    }

    pub fn voice(&self) -> Option<&Channel> {
        self.voice.as_ref()
    }

    pub fn kind(&self) -> &GroupKind {
        &self.kind
    }

    /// Noun used when welcoming members into this group.
    pub fn noun(&self) -> &'static str {
        match self.kind {
            GroupKind::Plain => "team",
            GroupKind::Lobby(_) => "lobby",
        }
    }

    /// Current members (holders of the group role).
    pub async fn members<P: Platform + ?Sized>(&self, platform: &P) -> PlatformResult<Vec<Member>> {
        platform.role_members(self.role.id).await
    }

    /// Number of members.
    pub async fn len<P: Platform + ?Sized>(&self, platform: &P) -> PlatformResult<usize> {
        Ok(self.members(platform).await?.len())
    }

    pub async fn is_empty<P: Platform + ?Sized>(&self, platform: &P) -> PlatformResult<bool> {
        Ok(self.len(platform).await? == 0)
    }

    /// Whether `member` currently holds the group role.
    pub async fn contains<P: Platform + ?Sized>(
        &self,
        platform: &P,
        member: MemberId,
    ) -> PlatformResult<bool> {
        Ok(self
            .members(platform)
            .await?
            .iter()
            .any(|m| m.id == member))
    }

    /// Add members to this group.
    pub async fn add_members<P: Platform + ?Sized>(
        &self,
        platform: &P,
        members: &[MemberId],
        welcome: Welcome,
    ) -> PlatformResult<()> {
        Self::move_members(platform, members, None, Some(self), welcome).await
    }

    /// Remove members from this group.
    pub async fn remove_members<P: Platform + ?Sized>(
        &self,
        platform: &P,
        members: &[MemberId],
        welcome: Welcome,
    ) -> PlatformResult<()> {
        Self::move_members(platform, members, Some(self), None, welcome).await
    }

    /// Move members from one group to another; either side may be absent.
    ///
    /// Each member's role set is rewritten in a single update. Members sitting
    /// in `from`'s voice channel follow into `to`'s voice channel when it
    /// exists. Notifications are posted only after every member has moved.
    pub async fn move_members<P: Platform + ?Sized>(
        platform: &P,
        members: &[MemberId],
        from: Option<&Group>,
        to: Option<&Group>,
        welcome: Welcome,
    ) -> PlatformResult<()> {
        if members.is_empty() || (from.is_none() && to.is_none()) {
            return Ok(());
        }

        let mut moved = Vec::with_capacity(members.len());
        for &id in members {
            let member = platform.member(id).await?;
            let mut roles = member.roles.clone();
            let mut in_voice = false;
            if let Some(from) = from {
                roles.retain(|&r| r != from.role.id);
                in_voice = match (member.voice, &from.voice) {
                    (Some(current), Some(channel)) => current == channel.id,
                    _ => false,
                };
            }
            if let Some(to) = to {
                if !roles.contains(&to.role.id) {
                    roles.push(to.role.id);
                }
            }
            platform.edit_member_roles(id, &roles).await?;
            if in_voice {
                if let Some(voice) = to.and_then(|t| t.voice.as_ref()) {
                    platform.move_member(id, voice.id).await?;
                }
            }
            moved.push(member);
        }

        let Some(list) = welcome.render(&moved) else {
            return Ok(());
        };
        if let Some(text) = from.and_then(|f| f.text.as_ref()) {
            platform
                .send(text.id, chat::goodbye(&list).into())
                .await?;
        }
        if let Some(to) = to {
            if let Some(text) = &to.text {
                platform
                    .send(text.id, chat::welcome(to.noun(), &list).into())
                    .await?;
            }
        }
        Ok(())
    }

    /// Create the group's text channel, or return the existing one.
    pub async fn create_text_channel<P: Platform + ?Sized>(
        &mut self,
        platform: &P,
        name: Option<&str>,
        scope: Option<ScopeId>,
    ) -> PlatformResult<&Channel> {
        let channel = match self.text.take() {
            Some(channel) => channel,
            None => {
                let channel = self
                    .create_channel(platform, ChannelKind::Text, name, scope)
                    .await?;
                log::debug!("created text channel {} for {}", channel.name, self.role.name);
                channel
            }
        };
        Ok(&*self.text.insert(channel))
    }

    /// Create the group's voice channel, or return the existing one.
    pub async fn create_voice_channel<P: Platform + ?Sized>(
        &mut self,
        platform: &P,
        name: Option<&str>,
        scope: Option<ScopeId>,
    ) -> PlatformResult<&Channel> {
        let channel = match self.voice.take() {
            Some(channel) => channel,
            None => {
                let channel = self
                    .create_channel(platform, ChannelKind::Voice, name, scope)
                    .await?;
                log::debug!("created voice channel {} for {}", channel.name, self.role.name);
                channel
            }
        };
        Ok(&*self.voice.insert(channel))
    }

    async fn create_channel<P: Platform + ?Sized>(
        &self,
        platform: &P,
        kind: ChannelKind,
        name: Option<&str>,
        scope: Option<ScopeId>,
    ) -> PlatformResult<Channel> {
        let inherited = match scope {
            Some(scope) => platform.scope_overwrites(scope).await?,
            None => Overwrites::new(),
        };
        let overwrites = self.channel_overwrites(platform, inherited);
        platform
            .create_channel(kind, name.unwrap_or(&self.role.name), scope, overwrites)
            .await
    }

    /// Layer the group's permission template over inherited overwrites.
    fn channel_overwrites<P: Platform + ?Sized>(&self, platform: &P, mut overs: Overwrites) -> Overwrites {
        overs
            .entry(OverwriteTarget::Role(self.role.id))
            .or_default()
            .update(PermissionOverwrite::participant());
        overs
            .entry(OverwriteTarget::Member(platform.bot_id()))
            .or_default()
            .update(PermissionOverwrite::participant());
        overs
            .entry(OverwriteTarget::Role(platform.default_role()))
            .or_default()
            .update(PermissionOverwrite::hidden());
        overs
    }

    /// Delete the group's channels and role, archiving the text channel first.
    ///
    /// Lobbies tear down every team before themselves, since team overwrites
    /// on the lobby channel reference the lobby role.
    pub async fn teardown<P: Platform + ?Sized>(
        self,
        platform: &P,
        archive: Option<ArchiveTarget>,
    ) -> PlatformResult<()> {
        let Group {
            role,
            text,
            voice,
            kind,
        } = self;
        if let GroupKind::Lobby(state) = kind {
            for team in state.teams {
                destroy(platform, team.role, team.text, team.voice, archive).await?;
            }
        }
        destroy(platform, role, text, voice, archive).await
    }
}

async fn destroy<P: Platform + ?Sized>(
    platform: &P,
    role: Role,
    text: Option<Channel>,
    voice: Option<Channel>,
    archive: Option<ArchiveTarget>,
) -> PlatformResult<()> {
    if let Some(text) = text {
        if let Some(target) = archive {
            archive::log(platform, &role, &text, target).await?;
        }
        platform.delete_channel(text.id, chat::TEARDOWN_REASON).await?;
    }
    if let Some(voice) = voice {
        platform.delete_channel(voice.id, chat::TEARDOWN_REASON).await?;
    }
    platform.delete_role(role.id, chat::TEARDOWN_REASON).await?;
    log::info!("tore down {}", role.name);
    Ok(())
}

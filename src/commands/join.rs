use crate::chat::{self, Welcome};
use crate::error::{PugError, Result};
use crate::group::Group;
use crate::platform::{ChannelId, Member, MemberId, Outgoing, Platform, PlatformResult, ScopeId};
use crate::session::{SessionRegistry, Trigger};

/// Where replies to the joining member go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyTo {
    /// The channel the command was issued in.
    Channel(ChannelId),
    /// A direct message, for reaction joins.
    Direct(MemberId),
}

impl ReplyTo {
    async fn send<P: Platform + ?Sized>(self, platform: &P, message: Outgoing) -> PlatformResult<()> {
        match self {
            Self::Channel(channel) => platform.send(channel, message).await?,
            Self::Direct(member) => platform.send_direct(member, message).await?,
        };
        Ok(())
    }
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    /// The member was already in the lobby or a team; nothing changed.
    AlreadyJoined,
    /// Every team was full; the member was told and nothing changed.
    Full,
}

/// Join `member` to the PUG running in `scope`.
pub async fn join<P: Platform + ?Sized>(
    registry: &SessionRegistry,
    platform: &P,
    scope: ScopeId,
    member: &Member,
    reply_to: ReplyTo,
) -> Result<JoinOutcome> {
    let lobby = registry.lobby(scope).ok_or(PugError::NotRunning(scope))?;
    enter(platform, lobby, member, reply_to).await
}

/// Join `member` through a reaction on a join announcement.
///
/// Bots and unknown or stale triggers are ignored and yield `None`.
pub async fn join_by_trigger<P: Platform + ?Sized>(
    registry: &mut SessionRegistry,
    platform: &P,
    trigger: Trigger,
    member: &Member,
) -> Result<Option<JoinOutcome>> {
    if member.bot {
        return Ok(None);
    }
    let Some(lobby) = registry.lookup_by_trigger(trigger) else {
        return Ok(None);
    };
    let outcome = enter(platform, lobby, member, ReplyTo::Direct(member.id)).await?;
    Ok(Some(outcome))
}

async fn enter<P: Platform + ?Sized>(
    platform: &P,
    lobby: &Group,
    member: &Member,
    reply_to: ReplyTo,
) -> Result<JoinOutcome> {
    if lobby.has_joined(platform, member.id).await? {
        log::debug!("{} already joined {}", member, lobby.name());
        reply_to.send(platform, chat::already_joined().into()).await?;
        return Ok(JoinOutcome::AlreadyJoined);
    }

    // The team a late joiner lands in greets them by name; the lobby
    // greeting below covers staging joins.
    let welcome = if lobby.is_split() {
        Welcome::Names
    } else {
        Welcome::Silent
    };
    match lobby.admit(platform, &[member.id], welcome).await {
        Ok(()) => {}
        Err(PugError::TeamIsFull) => {
            log::info!("{} could not join {}: teams full", member, lobby.name());
            reply_to.send(platform, chat::teams_full().into()).await?;
            return Ok(JoinOutcome::Full);
        }
        Err(e) => return Err(e),
    }

    match lobby.text() {
        Some(text) => {
            platform
                .send(text.id, chat::joined_lobby(&member.mention()).into())
                .await?;
        }
        None => reply_to.send(platform, chat::joined_lobby_reply().into()).await?,
    }
    log::debug!("{} joined {}", member, lobby.name());
    Ok(JoinOutcome::Joined)
}

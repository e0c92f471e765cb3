use crate::chat;
use crate::color::Colour;
use crate::config::{Config, Settings};
use crate::error::{PugError, Result};
use crate::group::Group;
use crate::platform::{ChannelId, Member, Platform, Scope};
use crate::session::{SessionRegistry, Trigger};

/// Open a PUG in `scope`.
///
/// Allocates the lobby role, registers the lobby, creates lobby channels per
/// `settings`, then posts the join announcement in `channel` and returns it
/// as the lobby's trigger. The join reaction is best-effort.
pub async fn start<P: Platform + ?Sized>(
    registry: &mut SessionRegistry,
    platform: &P,
    scope: &Scope,
    opener: &Member,
    channel: ChannelId,
    settings: &Settings,
    config: &Config,
) -> Result<Trigger> {
    if registry.is_active(scope.id) {
        return Err(PugError::AlreadyRunning(scope.id));
    }

    let role = platform
        .create_role(&format!("{} PUG", scope.name), Colour::RED)
        .await?;
    let role_id = role.id;
    registry.register_lobby(scope.id, Group::new_lobby(role, scope.clone()))?;

    // Registered first so a later stop cleans up whatever was created.
    if let Some(lobby) = registry.lobby_mut(scope.id) {
        if settings.team_text {
            lobby.create_text_channel(platform, None, Some(scope.id)).await?;
        }
        if settings.team_voice {
            lobby.create_voice_channel(platform, None, Some(scope.id)).await?;
        }
    }

    let announcement = chat::pug_opened(&opener.display_name, &config.command_prefix);
    let message = platform.send(channel, announcement.into()).await?;
    let trigger = Trigger::new(channel, message);
    registry.register_trigger(trigger, role_id);

    if let Err(e) = platform.add_reaction(channel, message, chat::JOIN_EMOJI).await {
        log::debug!("could not add join reaction: {}", e);
    }
    log::info!("{} opened a PUG in {}", opener.display_name, scope.name);
    Ok(trigger)
}

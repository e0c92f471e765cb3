use crate::config::{Config, Settings};
use crate::error::{PugError, Result};
use crate::platform::{Platform, ScopeId};
use crate::session::SessionRegistry;

/// Stop the PUG running in `scope` and clean up after it.
///
/// The lobby leaves the registry before anything is deleted, so the scope is
/// free again even if teardown fails partway. Join announcements are
/// removed best-effort.
pub async fn stop<P: Platform + ?Sized>(
    registry: &mut SessionRegistry,
    platform: &P,
    scope: ScopeId,
    settings: &Settings,
    config: &Config,
) -> Result<()> {
    let lobby = registry
        .unregister_lobby(scope)
        .ok_or(PugError::NotRunning(scope))?;

    for trigger in registry.release_triggers(lobby.role_id()) {
        if let Err(e) = platform.delete_message(trigger.channel, trigger.message).await {
            log::warn!("could not delete join message {}: {}", trigger.message, e);
        }
    }

    let archive = config.archive_target(settings);
    let name = lobby.name().to_string();
    lobby.teardown(platform, archive).await?;
    log::info!("stopped {}", name);
    Ok(())
}

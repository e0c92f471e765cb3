use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Config, Settings};
use crate::error::{PugError, Result};
use crate::group::AssignOptions;
use crate::platform::{Platform, ScopeId};
use crate::session::SessionRegistry;

/// Requested team shape. Exactly one of the two must be set (and non-zero).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamSize {
    pub size: Option<usize>,
    pub count: Option<usize>,
}

impl TeamSize {
    /// Teams of `n` members.
    pub fn size(n: usize) -> Self {
        Self {
            size: Some(n),
            count: None,
        }
    }

    /// `n` teams.
    pub fn count(n: usize) -> Self {
        Self {
            size: None,
            count: Some(n),
        }
    }

    fn options(self, settings: &Settings, config: &Config) -> AssignOptions {
        AssignOptions {
            size: self.size,
            count: self.count,
            prefix: config.team_prefix.clone(),
            create_text: settings.team_text,
            create_voice: settings.team_voice,
        }
    }
}

/// Split the lobby running in `scope` into teams.
pub async fn split<P: Platform + ?Sized>(
    registry: &mut SessionRegistry,
    platform: &P,
    scope: ScopeId,
    team_size: TeamSize,
    settings: &Settings,
    config: &Config,
) -> Result<()> {
    let mut rng = StdRng::from_entropy();
    split_with_rng(registry, platform, scope, team_size, settings, config, &mut rng).await
}

/// [`split`] with a caller-supplied shuffle source.
pub async fn split_with_rng<P, R>(
    registry: &mut SessionRegistry,
    platform: &P,
    scope: ScopeId,
    team_size: TeamSize,
    settings: &Settings,
    config: &Config,
    rng: &mut R,
) -> Result<()>
where
    P: Platform + ?Sized,
    R: Rng + Send + ?Sized,
{
    let lobby = registry
        .lobby_mut(scope)
        .ok_or(PugError::NotRunning(scope))?;
    let options = team_size.options(settings, config);
    lobby.assign_teams_with_rng(platform, &options, rng).await
}

//! Error types for PUG operations.

use crate::platform::{PlatformError, ScopeId};

/// An invalid split request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeamError {
    /// Teams exist already; splitting is single-shot.
    #[error("Members have already been assigned.")]
    AlreadyAssigned,
    /// Neither or both of size/count were given.
    #[error("Must specify exactly one of either size or count arguments.")]
    SizeOrCount,
    /// The lobby has nobody staged.
    #[error("Nobody to assign")]
    NobodyToAssign,
    /// Only lobbies can be split.
    #[error("Only a lobby can be split into teams.")]
    NotALobby,
}

/// Errors returned by lobby, team and command operations.
#[derive(Debug, thiserror::Error)]
pub enum PugError {
    /// No team has room for the incoming members.
    #[error("all teams are full")]
    TeamIsFull,

    #[error(transparent)]
    Team(#[from] TeamError),

    /// A PUG is already running in the scope.
    #[error("A PUG is already running in this category.")]
    AlreadyRunning(ScopeId),

    /// No PUG is running in the scope.
    #[error("No PUG is currently running in this category.")]
    NotRunning(ScopeId),

    /// A platform call failed.
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Convenience alias for PUG operation results.
pub type Result<T> = std::result::Result<T, PugError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_error_messages() {
        assert_eq!(
            TeamError::AlreadyAssigned.to_string(),
            "Members have already been assigned."
        );
        assert_eq!(TeamError::NobodyToAssign.to_string(), "Nobody to assign");
    }

    #[test]
    fn test_team_error_is_transparent() {
        let err = PugError::from(TeamError::SizeOrCount);
        assert_eq!(
            err.to_string(),
            "Must specify exactly one of either size or count arguments."
        );
    }

    #[test]
    fn test_platform_error_converts() {
        let err = PugError::from(PlatformError::Forbidden("manage roles".into()));
        assert!(matches!(err, PugError::Platform(_)));
        assert!(err.to_string().contains("manage roles"));
    }
}

//! Active PUG sessions, keyed by scope.
//!
//! One lobby per scope. Join announcements ("triggers") map back to the lobby
//! they were posted for, so reactions can join members without a command.

use std::collections::HashMap;

use crate::error::{PugError, Result};
use crate::group::Group;
use crate::platform::{ChannelId, MessageId, RoleId, ScopeId};

/// The announcement message members react to in order to join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trigger {
    pub channel: ChannelId,
    pub message: MessageId,
}

impl Trigger {
    pub fn new(channel: ChannelId, message: MessageId) -> Self {
        Self { channel, message }
    }
}

/// In-memory registry of running lobbies and their triggers.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    lobbies: HashMap<ScopeId, Group>,
    triggers: HashMap<Trigger, RoleId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the lobby running in `scope`.
    ///
    /// Fails with [`PugError::AlreadyRunning`] if the scope already has one;
    /// the existing lobby is left in place.
    pub fn register_lobby(&mut self, scope: ScopeId, lobby: Group) -> Result<()> {
        if self.lobbies.contains_key(&scope) {
            return Err(PugError::AlreadyRunning(scope));
        }
        self.lobbies.insert(scope, lobby);
        Ok(())
    }

    /// Remove and return the lobby running in `scope`.
    pub fn unregister_lobby(&mut self, scope: ScopeId) -> Option<Group> {
        self.lobbies.remove(&scope)
    }

    pub fn is_active(&self, scope: ScopeId) -> bool {
        self.lobbies.contains_key(&scope)
    }

    pub fn lobby(&self, scope: ScopeId) -> Option<&Group> {
        self.lobbies.get(&scope)
    }

    pub fn lobby_mut(&mut self, scope: ScopeId) -> Option<&mut Group> {
        self.lobbies.get_mut(&scope)
    }

    /// Scopes with a running lobby.
    pub fn active_scopes(&self) -> Vec<ScopeId> {
        let mut scopes: Vec<ScopeId> = self.lobbies.keys().copied().collect();
        scopes.sort_unstable();
        scopes
    }

    pub fn register_trigger(&mut self, trigger: Trigger, lobby_role: RoleId) {
        self.triggers.insert(trigger, lobby_role);
    }

    /// The running lobby a trigger was posted for.
    pub fn lookup_by_trigger(&mut self, trigger: Trigger) -> Option<&mut Group> {
        let role = *self.triggers.get(&trigger)?;
        self.lobbies.values_mut().find(|lobby| lobby.role_id() == role)
    }

    /// Forget every trigger pointing at `lobby_role`, returning them.
    pub fn release_triggers(&mut self, lobby_role: RoleId) -> Vec<Trigger> {
        let released: Vec<Trigger> = self
            .triggers
            .iter()
            .filter(|(_, role)| **role == lobby_role)
            .map(|(&trigger, _)| trigger)
            .collect();
        for trigger in &released {
            self.triggers.remove(trigger);
        }
        released
    }
}

//! Lobby behavior: staging, team splitting and late joins.
//!
//! A lobby moves through three states:
//! - staging: no teams yet, joining members hold the lobby role
//! - split: teams assigned (once), late joiners fill under-sized teams
//! - torn down: [`Group::teardown`] consumed the value

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::partition::{deal, team_sizes, TeamShape};
use super::{Group, GroupKind};
use crate::chat::Welcome;
use crate::color::team_colour;
use crate::error::{PugError, Result, TeamError};
use crate::platform::{MemberId, OverwriteTarget, Platform, PlatformResult, Role, Scope};

/// Lobby-only state.
#[derive(Debug, PartialEq, Eq)]
pub struct LobbyState {
    /// Scope new channels are created under.
    pub scope: Scope,
    /// Teams in creation order; empty until split.
    pub teams: Vec<Group>,
}

/// Parameters for splitting a lobby into teams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOptions {
    /// Target members per team.
    pub size: Option<usize>,
    /// Target number of teams.
    pub count: Option<usize>,
    /// Team role names are `{prefix} {n}`.
    pub prefix: String,
    pub create_text: bool,
    pub create_voice: bool,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            size: None,
            count: None,
            prefix: "Team".to_string(),
            create_text: false,
            create_voice: false,
        }
    }
}

impl AssignOptions {
    /// Split into teams of `size`.
    pub fn with_size(size: usize) -> Self {
        Self {
            size: Some(size),
            ..Self::default()
        }
    }

    /// Split into `count` teams.
    pub fn with_count(count: usize) -> Self {
        Self {
            count: Some(count),
            ..Self::default()
        }
    }
}

impl Group {
    /// Wrap an allocated role as a lobby staging under `scope`.
    pub fn new_lobby(role: Role, scope: Scope) -> Self {
        Self {
            kind: GroupKind::Lobby(LobbyState {
                scope,
                teams: Vec::new(),
            }),
            ..Self::new(role)
        }
    }

    /// Lobby state, if this group is a lobby.
    pub fn lobby(&self) -> Option<&LobbyState> {
        match &self.kind {
            GroupKind::Lobby(state) => Some(state),
            GroupKind::Plain => None,
        }
    }

    fn lobby_mut(&mut self) -> Option<&mut LobbyState> {
        match &mut self.kind {
            GroupKind::Lobby(state) => Some(state),
            GroupKind::Plain => None,
        }
    }

    /// Teams split off this group (always empty for plain groups).
    pub fn teams(&self) -> &[Group] {
        self.lobby().map(|l| l.teams.as_slice()).unwrap_or(&[])
    }

    /// Whether the lobby has been split into teams.
    pub fn is_split(&self) -> bool {
        !self.teams().is_empty()
    }

    /// Whether `member` holds this group's role or the role of one of its
    /// teams.
    pub async fn has_joined<P: Platform + ?Sized>(
        &self,
        platform: &P,
        member: MemberId,
    ) -> PlatformResult<bool> {
        let roles = platform.member(member).await?.roles;
        Ok(roles.contains(&self.role.id)
            || self.teams().iter().any(|team| roles.contains(&team.role_id())))
    }

    /// Admit members into the group.
    ///
    /// Members who already joined are skipped. Before a split this is
    /// [`Group::add_members`]. After a split each member goes to the first
    /// team below the largest team size; fails with [`PugError::TeamIsFull`]
    /// without moving anyone if there are not enough open slots.
    pub async fn admit<P: Platform + ?Sized>(
        &self,
        platform: &P,
        members: &[MemberId],
        welcome: Welcome,
    ) -> Result<()> {
        let mut incoming = Vec::with_capacity(members.len());
        for &member in members {
            if incoming.contains(&member) {
                continue;
            }
            if self.has_joined(platform, member).await? {
                log::debug!("{} already joined {}", member, self.role.name);
                continue;
            }
            incoming.push(member);
        }
        if incoming.is_empty() {
            return Ok(());
        }
        let members = incoming.as_slice();

        let teams = self.teams();
        if teams.is_empty() {
            self.add_members(platform, members, welcome).await?;
            return Ok(());
        }

        let mut sizes = Vec::with_capacity(teams.len());
        for team in teams {
            sizes.push(team.len(platform).await?);
        }
        let full = sizes.iter().copied().max().unwrap_or(0);
        let open: usize = sizes.iter().map(|&n| full - n).sum();
        if open == 0 || members.len() > open {
            return Err(PugError::TeamIsFull);
        }

        for &member in members {
            let Some(index) = sizes.iter().position(|&n| n < full) else {
                return Err(PugError::TeamIsFull);
            };
            teams[index].add_members(platform, &[member], welcome).await?;
            sizes[index] += 1;
        }
        Ok(())
    }

    /// Split the staged members into balanced teams.
    pub async fn assign_teams<P: Platform + ?Sized>(
        &mut self,
        platform: &P,
        options: &AssignOptions,
    ) -> Result<()> {
        let mut rng = StdRng::from_entropy();
        self.assign_teams_with_rng(platform, options, &mut rng).await
    }

    /// [`Group::assign_teams`] with a caller-supplied shuffle source.
    pub async fn assign_teams_with_rng<P, R>(
        &mut self,
        platform: &P,
        options: &AssignOptions,
        rng: &mut R,
    ) -> Result<()>
    where
        P: Platform + ?Sized,
        R: Rng + Send + ?Sized,
    {
        let Some(state) = self.lobby() else {
            return Err(TeamError::NotALobby.into());
        };
        if !state.teams.is_empty() {
            return Err(TeamError::AlreadyAssigned.into());
        }
        let shape = TeamShape::from_args(options.size, options.count)?;
        let scope = state.scope.id;

        let staged: Vec<MemberId> = self
            .members(platform)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();
        if staged.is_empty() {
            return Err(TeamError::NobodyToAssign.into());
        }

        let sizes = team_sizes(staged.len(), shape.team_size(staged.len()));
        let rosters = deal(staged, &sizes, rng);
        log::info!(
            "splitting {} into {} team(s) of sizes {:?}",
            self.role.name,
            rosters.len(),
            sizes
        );

        for (index, roster) in rosters.into_iter().enumerate() {
            let number = index + 1;
            let role = platform
                .create_role(
                    &format!("{} {}", options.prefix, number),
                    team_colour(number),
                )
                .await?;
            let mut team = Group::new(role);
            if options.create_text {
                team.create_text_channel(platform, None, Some(scope)).await?;
            }
            if options.create_voice {
                team.create_voice_channel(platform, None, Some(scope)).await?;
            }
            if let Some(state) = self.lobby_mut() {
                state.teams.push(team);
            }
            if let Some(team) = self.teams().last() {
                Group::move_members(platform, &roster, Some(&*self), Some(team), Welcome::Names)
                    .await?;
            }
        }

        if let Some(text) = &self.text {
            let mut overs = platform.channel_overwrites(text.id).await?;
            let inherited = overs
                .get(&OverwriteTarget::Role(self.role.id))
                .copied()
                .unwrap_or_default();
            for team in self.teams() {
                overs.insert(OverwriteTarget::Role(team.role.id), inherited);
            }
            platform.edit_channel_overwrites(text.id, overs).await?;
        }
        Ok(())
    }
}

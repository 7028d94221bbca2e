use std::fmt::{Debug, Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::{CoupError, Role};

/// Non-owning handle to a seat in a [`crate::Coup`] roster.
///
/// Handles are assigned when a player is added and stay valid across
/// [`crate::Coup::cleanup_inactive_players`]; a removed player's handle
/// simply stops resolving.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub(crate) usize);

impl Display for PlayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("#{}", self.0))
    }
}

#[derive(Clone, Eq, PartialEq)]
pub struct Player {
    id: PlayerId,
    name: String,
    role: Role,
    coins: u32,
    active: bool,
    sanctioned: bool,
    arrest_blocked: bool,
}

impl Player {
    pub(crate) fn new(id: PlayerId, name: String, role: Role) -> Self {
        Self {
            id,
            name,
            role,
            coins: 0,
            active: true,
            sanctioned: false,
            arrest_blocked: false,
        }
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_sanctioned(&self) -> bool {
        self.sanctioned
    }

    pub fn is_arrest_blocked(&self) -> bool {
        self.arrest_blocked
    }

    pub(crate) fn add_coins(&mut self, amount: u32) -> Result<(), CoupError> {
        self.coins = self
            .coins
            .checked_add(amount)
            .ok_or(CoupError::InvalidAmount { amount })?;
        Ok(())
    }

    pub(crate) fn remove_coins(&mut self, amount: u32) -> Result<(), CoupError> {
        self.coins = self
            .coins
            .checked_sub(amount)
            .ok_or_else(|| CoupError::insufficient("Not enough coins for action"))?;
        Ok(())
    }

    pub(crate) fn set_sanctioned(&mut self, sanctioned: bool) {
        self.sanctioned = sanctioned;
    }

    pub(crate) fn set_arrest_blocked(&mut self, blocked: bool) {
        self.arrest_blocked = blocked;
    }

    // one way, there is no revive
    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// Everything a presentation layer may show about this player.
    pub fn view(&self) -> PlayerView {
        PlayerView {
            name: self.name.clone(),
            role: self.role,
            coins: self.coins,
            active: self.active,
            sanctioned: self.sanctioned,
            arrest_blocked: self.arrest_blocked,
        }
    }
}

impl Debug for Player {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let status = if self.active { "" } else { " [out]" };
        f.write_fmt(format_args!("{} {} ({}): ${}{status}", self.id, self.name, self.role, self.coins))?;
        if self.sanctioned {
            f.write_str(" sanctioned")?;
        }
        if self.arrest_blocked {
            f.write_str(" arrest-blocked")?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub role: Role,
    pub coins: u32,
    pub active: bool,
    pub sanctioned: bool,
    pub arrest_blocked: bool,
}

/// What a Spy learns from investigating someone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intel {
    pub name: String,
    pub role: Role,
    pub coins: u32,
    pub sanctioned: bool,
    pub arrest_blocked: bool,
}

impl From<&Player> for Intel {
    fn from(player: &Player) -> Self {
        Intel {
            name: player.name.clone(),
            role: player.role,
            coins: player.coins,
            sanctioned: player.sanctioned,
            arrest_blocked: player.arrest_blocked,
        }
    }
}

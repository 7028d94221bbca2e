use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::CoupError;

#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Action {
    Gather,
    Tax,
    Bribe,
    Arrest,
    Sanction,
    Coup,
    Invest,
    Investigate,
    BlockArrest,
    EndTurn,
}

pub static ACTION_VARIANTS: [Action; 10] = [
    Action::Gather,
    Action::Tax,
    Action::Bribe,
    Action::Arrest,
    Action::Sanction,
    Action::Coup,
    Action::Invest,
    Action::Investigate,
    Action::BlockArrest,
    Action::EndTurn,
];

impl Action {
    /// Display name, as the presentation layer labels its buttons.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Gather => "Gather",
            Action::Tax => "Tax",
            Action::Bribe => "Bribe",
            Action::Arrest => "Arrest",
            Action::Sanction => "Sanction",
            Action::Coup => "Coup",
            Action::Invest => "Invest",
            Action::Investigate => "Investigate",
            Action::BlockArrest => "Block Arrest",
            Action::EndTurn => "End Turn",
        }
    }

    /// Coins the actor must hold before the action is considered.
    /// Sanction against a Judge actually costs 4, see [`crate::Role::sanction_cost`].
    pub fn nominal_cost(&self) -> u32 {
        match self {
            Action::Bribe => BRIBE_COST,
            Action::Sanction => SANCTION_COST,
            Action::Coup => COUP_COST,
            Action::Invest => INVEST_COST,
            _ => 0,
        }
    }

    pub fn requires_target(&self) -> bool {
        matches!(
            self,
            Action::Arrest | Action::Sanction | Action::Coup | Action::Investigate | Action::BlockArrest
        )
    }

    pub fn is_blockable(&self) -> bool {
        matches!(self, Action::Tax | Action::Bribe | Action::Sanction | Action::Coup)
    }

    /// Spy abilities leave the turn budget alone.
    pub fn consumes_action(&self) -> bool {
        !matches!(self, Action::Investigate | Action::BlockArrest)
    }

    /// Exempt from the mandatory coup rule.
    pub fn allowed_when_rich(&self) -> bool {
        matches!(self, Action::Coup | Action::EndTurn)
    }
}

pub const BRIBE_COST: u32 = 4;
pub const SANCTION_COST: u32 = 3;
pub const COUP_COST: u32 = 7;
pub const INVEST_COST: u32 = 3;
pub const INVEST_RETURN: u32 = 6;

impl FromStr for Action {
    type Err = CoupError;

    // "Block Arrest", "block-arrest" and "BLOCK_ARREST" all name the same action
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .map(|c| c.to_ascii_lowercase())
            .collect();

        ACTION_VARIANTS
            .iter()
            .find(|action| {
                action.name().replace(' ', "").to_ascii_lowercase() == normalized
            })
            .copied()
            .ok_or_else(|| CoupError::illegal_move(format!("Unknown action: {s}")))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Debug for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let target = if self.requires_target() { " <target>" } else { "" };
        f.write_fmt(format_args!("{}{target} (${})", self.name(), self.nominal_cost()))
    }
}

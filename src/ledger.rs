// treasury + sum(balances) never changes once a game exists

use crate::{Coup, CoupError};
#[cfg(any(test, feature = "test-util"))]
use crate::PlayerId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Treasury {
    coins: u32,
}

impl Treasury {
    pub fn new(coins: u32) -> Self {
        Self { coins }
    }

    pub fn coins(&self) -> u32 {
        self.coins
    }

    pub fn deposit(&mut self, amount: u32) -> Result<(), CoupError> {
        self.coins = self
            .coins
            .checked_add(amount)
            .ok_or(CoupError::InvalidAmount { amount })?;
        Ok(())
    }

    pub fn withdraw(&mut self, amount: u32) -> Result<(), CoupError> {
        self.coins = self
            .coins
            .checked_sub(amount)
            .ok_or_else(|| CoupError::insufficient("Not enough coins in treasury"))?;
        Ok(())
    }
}

impl Coup {
    pub fn treasury(&self) -> u32 {
        self.treasury.coins()
    }

    /// Treasury plus every balance on the roster, eliminated players included.
    pub fn total_coins(&self) -> u32 {
        self.players
            .iter()
            .fold(self.treasury.coins(), |sum, p| sum + p.coins())
    }

    /// Moves coins from the treasury to a player, outside the turn system.
    /// Table setup for tests and tooling; refused before the start and while
    /// a block decision is pending.
    #[cfg(any(test, feature = "test-util"))]
    pub fn pay_from_treasury(&mut self, id: PlayerId, amount: u32) -> Result<(), CoupError> {
        self.transact(|game| {
            game.ensure_table_settled()?;
            let idx = game.index_of(id)?;
            game.credit(idx, amount)
        })
    }

    /// Moves coins from a player to the treasury, outside the turn system.
    #[cfg(any(test, feature = "test-util"))]
    pub fn pay_to_treasury(&mut self, id: PlayerId, amount: u32) -> Result<(), CoupError> {
        self.transact(|game| {
            game.ensure_table_settled()?;
            let idx = game.index_of(id)?;
            game.debit(idx, amount)
        })
    }

    /// Moves coins from one player to another, outside the turn system.
    #[cfg(any(test, feature = "test-util"))]
    pub fn transfer(&mut self, from: PlayerId, to: PlayerId, amount: u32) -> Result<(), CoupError> {
        self.transact(|game| {
            game.ensure_table_settled()?;
            let from_idx = game.index_of(from)?;
            let to_idx = game.index_of(to)?;
            game.move_coins(from_idx, to_idx, amount)
        })
    }

    pub(crate) fn add_to_treasury(&mut self, amount: u32) -> Result<(), CoupError> {
        self.treasury.deposit(amount)
    }

    pub(crate) fn remove_from_treasury(&mut self, amount: u32) -> Result<(), CoupError> {
        self.treasury.withdraw(amount)
    }

    // treasury -> player
    pub(crate) fn credit(&mut self, idx: usize, amount: u32) -> Result<(), CoupError> {
        self.remove_from_treasury(amount)?;
        self.players[idx].add_coins(amount)
    }

    // player -> treasury
    pub(crate) fn debit(&mut self, idx: usize, amount: u32) -> Result<(), CoupError> {
        self.players[idx].remove_coins(amount)?;
        self.add_to_treasury(amount)
    }

    pub(crate) fn move_coins(&mut self, from_idx: usize, to_idx: usize, amount: u32) -> Result<(), CoupError> {
        self.players[from_idx].remove_coins(amount)?;
        self.players[to_idx].add_coins(amount)
    }
}

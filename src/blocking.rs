// Proposed -> {Unblocked -> Executed, Blocked -> Reverted (+ side payment)} -> turn advanced

use std::fmt::{Debug, Formatter};
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::action::{BRIBE_COST, COUP_COST};
use crate::role::GENERAL_BLOCK_COST;
use crate::{Action, Coup, CoupError, Outcome, PlayerId, Role};

/// A blockable action waiting for the table to decide.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub action: Action,
    pub actor: PlayerId,
    pub target: Option<PlayerId>,
    pub blockers: Vec<PlayerId>,
    /// Coins moved from the actor to the treasury when the action was proposed.
    pub escrow: u32,
}

impl Debug for PendingResolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{} proposes {}", self.actor, self.action))?;
        if let Some(target) = self.target {
            f.write_fmt(format_args!(" on {target}"))?;
        }
        f.write_fmt(format_args!(" | blockers {:?} | escrow ${}", self.blockers, self.escrow))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Block(PlayerId),
    Proceed,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Proposal {
    /// Nothing stood in the way; the action already happened.
    Resolved(Outcome),
    AwaitingBlock(PendingResolution),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Executed(Outcome),
    Blocked {
        blocker: PlayerId,
        refunded: u32,
        side_payment: u32,
    },
}

impl Coup {
    pub fn pending(&self) -> Option<&PendingResolution> {
        self.pending.as_ref()
    }

    /// Active players other than `actor` whose role lets them block `action` right now.
    pub fn eligible_blockers(&self, action: Action, actor: PlayerId) -> Vec<PlayerId> {
        if !action.is_blockable() {
            return vec![];
        }

        self.players
            .iter()
            .filter(|p| p.is_active() && p.id() != actor)
            .filter(|p| p.role().can_block(action, p.coins()))
            .map(|p| p.id())
            .collect()
    }

    pub fn propose(&mut self, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Result<Proposal, CoupError> {
        let blockers = self.eligible_blockers(action, actor);
        if blockers.is_empty() {
            return self.perform(action, actor, target).map(Proposal::Resolved);
        }

        self.transact(|game| {
            // resolving unblocked later cannot fail
            game.dry_run(action, actor, target)?;

            let actor_idx = game.index_of(actor)?;
            let escrow = game.escrow_for(action, target)?;
            game.debit(actor_idx, escrow)?;

            let pending = PendingResolution {
                action,
                actor,
                target,
                blockers,
                escrow,
            };
            info!(player = %game.players[actor_idx].name(), %action, blockers = pending.blockers.len(), escrow, "awaiting block decision");
            game.pending = Some(pending.clone());

            Ok(Proposal::AwaitingBlock(pending))
        })
    }

    pub fn propose_named(&mut self, action: &str, actor: PlayerId, target: Option<PlayerId>) -> Result<Proposal, CoupError> {
        self.propose(action.parse()?, actor, target)
    }

    pub fn resolve(&mut self, pending: PendingResolution, decision: Decision) -> Result<Resolution, CoupError> {
        self.transact(|game| {
            match game.pending.take() {
                Some(current) if current == pending => {}
                _ => return Err(CoupError::illegal_move("No matching action is waiting for a block decision")),
            }

            let actor_idx = game.index_of(pending.actor)?;
            game.credit(actor_idx, pending.escrow)?;

            match decision {
                Decision::Proceed => {
                    let outcome = game.apply(pending.action, pending.actor, pending.target)?;
                    Ok(Resolution::Executed(outcome))
                }
                Decision::Block(blocker) => game.apply_block(&pending, actor_idx, blocker),
            }
        })
    }

    fn apply_block(&mut self, pending: &PendingResolution, actor_idx: usize, blocker: PlayerId) -> Result<Resolution, CoupError> {
        let blocker_idx = self.index_of(blocker)?;
        let blocker_player = &self.players[blocker_idx];

        if !pending.blockers.contains(&blocker) || !blocker_player.is_active() {
            return Err(CoupError::illegal_move(format!("{} cannot block {}", blocker_player.name(), pending.action)));
        }

        let side_payment = match (pending.action, blocker_player.role()) {
            (Action::Coup, Role::General) => GENERAL_BLOCK_COST,
            _ => 0,
        };
        if side_payment > 0 {
            self.debit(blocker_idx, side_payment)?;
        }

        info!(
            blocker = %self.players[blocker_idx].name(),
            role = %self.players[blocker_idx].role(),
            player = %self.players[actor_idx].name(),
            action = %pending.action,
            refunded = pending.escrow,
            side_payment,
            "blocked"
        );
        self.finish_action()?;

        Ok(Resolution::Blocked {
            blocker,
            refunded: pending.escrow,
            side_payment,
        })
    }

    // what the actor would pay if the action went through; a blocked tax costs nothing
    fn escrow_for(&self, action: Action, target: Option<PlayerId>) -> Result<u32, CoupError> {
        Ok(match action {
            Action::Bribe => BRIBE_COST,
            Action::Coup => COUP_COST,
            Action::Sanction => match target {
                Some(target) => self.player(target)?.role().sanction_cost(),
                None => Action::Sanction.nominal_cost(),
            },
            _ => 0,
        })
    }
}

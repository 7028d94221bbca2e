use tracing::info;
use crate::action::{BRIBE_COST, COUP_COST, INVEST_COST, INVEST_RETURN};
use crate::{Action, ActionValidator, Coup, CoupError, Intel, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Investigated(Intel),
}

const BRIBE_EXTRA_ACTIONS: u32 = 2;

impl Coup {
    /// Runs any catalog action, without giving anyone the chance to block it.
    /// See [`Coup::propose`] for the blockable path.
    pub fn perform(&mut self, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Result<Outcome, CoupError> {
        self.transact(|game| game.apply(action, actor, target))
    }

    pub fn perform_named(&mut self, action: &str, actor: PlayerId, target: Option<PlayerId>) -> Result<Outcome, CoupError> {
        self.perform(action.parse()?, actor, target)
    }

    pub fn gather(&mut self, actor: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Gather, actor, None).map(drop)
    }

    pub fn tax(&mut self, actor: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Tax, actor, None).map(drop)
    }

    pub fn bribe(&mut self, actor: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Bribe, actor, None).map(drop)
    }

    pub fn arrest(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Arrest, actor, Some(target)).map(drop)
    }

    pub fn sanction(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Sanction, actor, Some(target)).map(drop)
    }

    pub fn coup(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Coup, actor, Some(target)).map(drop)
    }

    pub fn invest(&mut self, actor: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::Invest, actor, None).map(drop)
    }

    /// Spy only. Free, and leaves the turn budget alone.
    pub fn investigate(&self, actor: PlayerId, target: PlayerId) -> Result<Intel, CoupError> {
        ActionValidator::check(self, Action::Investigate, actor, Some(target))?;
        let actor_idx = self.index_of(actor)?;
        let target_idx = self.index_of(target)?;
        Ok(self.investigate_at(actor_idx, target_idx))
    }

    /// Spy only. Free, and leaves the turn budget alone.
    pub fn block_arrest(&mut self, actor: PlayerId, target: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::BlockArrest, actor, Some(target)).map(drop)
    }

    /// Hands the turn on, whatever budget is left.
    pub fn end_turn(&mut self, actor: PlayerId) -> Result<(), CoupError> {
        self.perform(Action::EndTurn, actor, None).map(drop)
    }

    pub(crate) fn apply(&mut self, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Result<Outcome, CoupError> {
        ActionValidator::check(self, action, actor, target)?;

        let actor_idx = self.index_of(actor)?;
        let target_idx = match target {
            Some(target) if action.requires_target() => Some(self.index_of(target)?),
            _ => None,
        };
        let target_idx = || target_idx.ok_or_else(|| CoupError::illegal_target(format!("Target required for {action}")));

        match action {
            Action::Gather => self.apply_gather(actor_idx)?,
            Action::Tax => self.apply_tax(actor_idx)?,
            Action::Bribe => self.apply_bribe(actor_idx)?,
            Action::Arrest => self.apply_arrest(actor_idx, target_idx()?)?,
            Action::Sanction => self.apply_sanction(actor_idx, target_idx()?)?,
            Action::Coup => self.apply_coup(actor_idx, target_idx()?)?,
            Action::Invest => self.apply_invest(actor_idx)?,
            Action::Investigate => return Ok(Outcome::Investigated(self.investigate_at(actor_idx, target_idx()?))),
            Action::BlockArrest => self.apply_block_arrest(actor_idx, target_idx()?),
            Action::EndTurn => {
                info!(player = %self.players[actor_idx].name(), "ended turn");
                self.next_turn()?
            }
        }

        Ok(Outcome::Done)
    }

    fn apply_gather(&mut self, actor: usize) -> Result<(), CoupError> {
        self.credit(actor, 1)?;
        info!(player = %self.players[actor].name(), coins = self.players[actor].coins(), treasury = self.treasury(), "gathered 1 coin");
        self.finish_action()
    }

    fn apply_tax(&mut self, actor: usize) -> Result<(), CoupError> {
        let amount = self.players[actor].role().tax_amount();
        self.credit(actor, amount)?;
        info!(player = %self.players[actor].name(), amount, coins = self.players[actor].coins(), treasury = self.treasury(), "taxed");
        self.finish_action()
    }

    fn apply_bribe(&mut self, actor: usize) -> Result<(), CoupError> {
        self.debit(actor, BRIBE_COST)?;
        self.add_extra_actions(BRIBE_EXTRA_ACTIONS);
        info!(player = %self.players[actor].name(), coins = self.players[actor].coins(), "bribed for extra actions");
        self.finish_action()
    }

    fn apply_arrest(&mut self, actor: usize, target: usize) -> Result<(), CoupError> {
        let target_id = self.players[target].id();
        if self.last_arrested == Some(target_id) {
            return Err(CoupError::illegal_target("Cannot arrest the same player twice in a row"));
        }

        let payout = self.players[target].role().arrest_payout(self.players[target].coins());
        if payout.to_arrester > 0 {
            self.move_coins(target, actor, payout.to_arrester)?;
        }
        if payout.to_treasury > 0 {
            self.debit(target, payout.to_treasury)?;
        }
        self.last_arrested = Some(target_id);

        info!(
            player = %self.players[actor].name(),
            target = %self.players[target].name(),
            role = %self.players[target].role(),
            to_arrester = payout.to_arrester,
            to_treasury = payout.to_treasury,
            "arrested"
        );
        self.finish_action()
    }

    fn apply_sanction(&mut self, actor: usize, target: usize) -> Result<(), CoupError> {
        let role = self.players[target].role();
        let cost = role.sanction_cost();
        if self.players[actor].coins() < cost {
            return Err(CoupError::insufficient(format!("Need {cost} coins to sanction a {role}")));
        }
        self.debit(actor, cost)?;

        // compensation is skipped, never an error, when the treasury is dry
        let compensation = role.sanction_compensation();
        let compensated = compensation > 0 && self.treasury() >= compensation;
        if compensated {
            self.credit(target, compensation)?;
        }
        self.players[target].set_sanctioned(true);

        info!(
            player = %self.players[actor].name(),
            target = %self.players[target].name(),
            cost,
            compensated,
            "sanctioned"
        );
        self.finish_action()
    }

    fn apply_coup(&mut self, actor: usize, target: usize) -> Result<(), CoupError> {
        self.debit(actor, COUP_COST)?;
        self.players[target].deactivate();
        info!(player = %self.players[actor].name(), target = %self.players[target].name(), "coup, target eliminated");
        self.finish_action()
    }

    fn apply_invest(&mut self, actor: usize) -> Result<(), CoupError> {
        if self.treasury() < INVEST_RETURN {
            return Err(CoupError::illegal_move("Treasury doesn't have enough coins for investment return"));
        }
        self.debit(actor, INVEST_COST)?;
        self.credit(actor, INVEST_RETURN)?;
        info!(player = %self.players[actor].name(), coins = self.players[actor].coins(), treasury = self.treasury(), "invested");
        self.finish_action()
    }

    fn investigate_at(&self, actor: usize, target: usize) -> Intel {
        let intel = Intel::from(&self.players[target]);
        info!(player = %self.players[actor].name(), target = %intel.name, "investigated");
        intel
    }

    fn apply_block_arrest(&mut self, actor: usize, target: usize) {
        self.players[target].set_arrest_blocked(true);
        info!(player = %self.players[actor].name(), target = %self.players[target].name(), "blocked arrest ability");
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;
    use crate::tests::{game_with, give};
    use crate::Role::{Baron, General, Governor, Judge, Merchant, Spy};
    use crate::{Action, Outcome};

    #[test]
    fn gather_and_tax() {
        let (mut coup, ids) = game_with(&[Governor, Spy]);
        coup.tax(ids[0]).unwrap();
        coup.tax(ids[1]).unwrap();
        coup.gather(ids[0]).unwrap();

        assert_eq!(coup.player(ids[0]).unwrap().coins(), 4);
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 2);
        assert_eq!(coup.treasury(), 44);
    }

    #[test]
    fn tax_from_a_short_treasury_fails_cleanly() {
        let (mut coup, ids) = game_with(&[Governor, Spy]);
        give(&mut coup, ids[1], 48);
        let before = coup.clone();

        assert_eq!(coup.tax(ids[0]).unwrap_err().kind(), ErrorKind::InsufficientFunds);
        assert_eq!(coup, before);
    }

    #[test]
    fn arrest_moves_one_coin() {
        let (mut coup, ids) = game_with(&[Spy, Judge, Baron]);
        give(&mut coup, ids[1], 2);

        coup.arrest(ids[0], ids[1]).unwrap();
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 1);
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 1);
        assert_eq!(coup.last_arrested(), Some(ids[1]));
    }

    #[test]
    fn arrest_of_a_broke_player_still_counts() {
        let (mut coup, ids) = game_with(&[Spy, Judge, Baron]);
        coup.arrest(ids[0], ids[1]).unwrap();
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 0);
        assert_eq!(coup.last_arrested(), Some(ids[1]));
    }

    #[test]
    fn same_target_cannot_be_arrested_twice_in_a_row() {
        let (mut coup, ids) = game_with(&[Spy, Judge, Baron]);
        coup.arrest(ids[0], ids[2]).unwrap();

        // a different arrester makes no difference
        let err = coup.arrest(ids[1], ids[2]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalTarget);
        assert_eq!(coup.turn().unwrap(), "p1");

        coup.arrest(ids[1], ids[0]).unwrap();
        coup.arrest(ids[2], ids[1]).unwrap();
        coup.arrest(ids[0], ids[2]).unwrap();
    }

    #[test]
    fn general_is_immune_to_arrest_payouts() {
        let (mut coup, ids) = game_with(&[Spy, General]);
        give(&mut coup, ids[1], 4);

        coup.arrest(ids[0], ids[1]).unwrap();
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 4);
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 0);
        assert_eq!(coup.last_arrested(), Some(ids[1]));
        assert_eq!(coup.turn().unwrap(), "p1");
    }

    #[test]
    fn sanction_pays_the_treasury() {
        let (mut coup, ids) = game_with(&[Spy, Governor]);
        give(&mut coup, ids[0], 5);

        coup.sanction(ids[0], ids[1]).unwrap();
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 2);
        assert_eq!(coup.treasury(), 48);
        assert!(coup.player(ids[1]).unwrap().is_sanctioned());
    }

    #[test]
    fn sanctioning_a_judge_with_three_coins_fails() {
        let (mut coup, ids) = game_with(&[Spy, Judge]);
        give(&mut coup, ids[0], 3);
        let before = coup.clone();

        assert_eq!(coup.sanction(ids[0], ids[1]).unwrap_err().kind(), ErrorKind::InsufficientFunds);
        assert_eq!(coup, before);
    }

    #[test]
    fn baron_compensation() {
        let (mut coup, ids) = game_with(&[Spy, Baron]);
        give(&mut coup, ids[0], 3);

        coup.sanction(ids[0], ids[1]).unwrap();
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 1);
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 0);
        assert_eq!(coup.treasury(), 49);
    }

    #[test]
    fn coup_eliminates() {
        let (mut coup, ids) = game_with(&[Judge, Spy, Baron]);
        give(&mut coup, ids[0], 8);

        coup.coup(ids[0], ids[2]).unwrap();
        let target = coup.player(ids[2]).unwrap();
        assert!(!target.is_active());
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 1);
        assert_eq!(coup.players(), vec!["p0", "p1"]);
        assert!(!coup.is_game_over());

        // nobody can touch the eliminated player any more
        assert_eq!(coup.arrest(ids[1], ids[2]).unwrap_err().kind(), ErrorKind::IllegalTarget);
    }

    #[test]
    fn invest_needs_a_rich_treasury() {
        let (mut coup, ids) = game_with(&[Baron, Spy]);
        give(&mut coup, ids[0], 3);
        give(&mut coup, ids[1], 42);
        assert_eq!(coup.treasury(), 5);

        let err = coup.invest(ids[0]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IllegalMove);
        assert_eq!(coup.player(ids[0]).unwrap().coins(), 3);
    }

    #[test]
    fn spy_abilities_keep_the_turn() {
        let (mut coup, ids) = game_with(&[Spy, Merchant, Judge]);
        give(&mut coup, ids[1], 5);

        let intel = coup.investigate(ids[0], ids[1]).unwrap();
        assert_eq!(intel.coins, 5);
        assert_eq!(intel.role, Merchant);
        assert!(!intel.sanctioned);

        coup.block_arrest(ids[0], ids[2]).unwrap();
        assert!(coup.player(ids[2]).unwrap().is_arrest_blocked());
        assert_eq!(coup.turn().unwrap(), "p0");
        assert_eq!(coup.actions_remaining(), 1);

        match coup.perform(Action::Investigate, ids[0], Some(ids[2])).unwrap() {
            Outcome::Investigated(intel) => assert!(intel.arrest_blocked),
            Outcome::Done => panic!("expected a report"),
        }

        assert_eq!(coup.investigate(ids[0], ids[0]).unwrap_err().kind(), ErrorKind::IllegalTarget);
        assert_eq!(coup.block_arrest(ids[0], ids[0]).unwrap_err().kind(), ErrorKind::IllegalTarget);
    }

    #[test]
    fn end_turn_drops_remaining_actions() {
        let (mut coup, ids) = game_with(&[Spy, Baron]);
        give(&mut coup, ids[0], 4);
        coup.bribe(ids[0]).unwrap();
        assert_eq!(coup.actions_remaining(), 2);

        coup.end_turn(ids[0]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p1");
        assert_eq!(coup.actions_remaining(), 1);
    }

    #[test]
    fn by_name() {
        let (mut coup, ids) = game_with(&[Spy, Baron]);
        coup.perform_named("GATHER", ids[0], None).unwrap();
        assert_eq!(coup.perform_named("pray", ids[1], None).unwrap_err().kind(), ErrorKind::IllegalMove);
    }
}

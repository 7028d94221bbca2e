use tracing::{debug, info, warn};
use crate::{Coup, CoupError};

impl Coup {
    pub fn actions_remaining(&self) -> u32 {
        self.actions_remaining
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// True once a started game is down to its last player.
    pub fn is_game_over(&self) -> bool {
        self.started && self.active_player_count() <= 1
    }

    pub(crate) fn start_turn_actions(&mut self) {
        self.actions_remaining = 1;
    }

    pub(crate) fn add_extra_actions(&mut self, count: u32) {
        self.actions_remaining += count;
    }

    pub(crate) fn consume_action(&mut self) {
        self.actions_remaining = self.actions_remaining.saturating_sub(1);
    }

    // every turn-consuming action ends here
    pub(crate) fn finish_action(&mut self) -> Result<(), CoupError> {
        self.consume_action();
        if self.actions_remaining == 0 {
            self.next_turn()?;
        }
        Ok(())
    }

    pub(crate) fn next_turn(&mut self) -> Result<(), CoupError> {
        if self.active_player_count() <= 1 {
            // game is over, whoever is left keeps the turn
            return Ok(());
        }

        // status effects only last until the end of the affected player's own turn
        if let Some(departing) = self.players.get_mut(self.current_player_idx) {
            if departing.is_sanctioned() || departing.is_arrest_blocked() {
                debug!(player = %departing.name(), "status effects cleared");
            }
            departing.set_sanctioned(false);
            departing.set_arrest_blocked(false);
        }

        self.current_player_idx = self.next_living_player();
        self.on_turn_start()?;
        self.start_turn_actions();

        Ok(())
    }

    fn on_turn_start(&mut self) -> Result<(), CoupError> {
        let idx = self.current_player_idx;
        let player = &self.players[idx];
        let bonus = player.role().turn_start_bonus(player.coins());

        if bonus > 0 && self.treasury() >= bonus {
            self.credit(idx, bonus)?;
            info!(player = %self.players[idx].name(), bonus, treasury = self.treasury(), "turn start bonus");
        }

        let player = &self.players[idx];
        if player.coins() >= self.config.mandatory_coup_threshold {
            warn!(player = %player.name(), coins = player.coins(), "must coup this turn");
        }
        info!(player = %player.name(), role = %player.role(), coins = player.coins(), "turn begins");

        Ok(())
    }

    // wraps around the table; lands back on the current seat when nobody else is alive
    fn next_living_player(&self) -> usize {
        let len = self.players.len();
        let mut idx = self.current_player_idx;

        loop {
            idx = (idx + 1) % len;
            if idx == self.current_player_idx || self.players[idx].is_active() {
                return idx;
            }
        }
    }

    /// Drops eliminated players from the roster. Their coins go back to the
    /// treasury and the turn stays with the same player.
    pub fn cleanup_inactive_players(&mut self) -> Result<(), CoupError> {
        self.transact(|game| {
            game.ensure_table_settled()?;
            let removed_before = game.players[..game.current_player_idx.min(game.players.len())]
                .iter()
                .filter(|p| !p.is_active())
                .count();

            let returned = game
                .players
                .iter()
                .filter(|p| !p.is_active())
                .fold(0, |sum, p| sum + p.coins());
            game.add_to_treasury(returned)?;

            game.players.retain(|p| p.is_active());
            game.current_player_idx -= removed_before;
            if game.current_player_idx >= game.players.len() {
                game.current_player_idx = 0;
            }

            debug!(returned, remaining = game.players.len(), "inactive players removed");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::tests::{game_with, give};
    use crate::Role::{Baron, General, Governor, Judge, Merchant, Spy};

    #[test]
    fn turn_passes_after_one_action() {
        let (mut coup, ids) = game_with(&[Spy, Judge, Baron]);
        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p1");
        coup.gather(ids[1]).unwrap();
        coup.gather(ids[2]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p0");
        assert_eq!(coup.actions_remaining(), 1);
    }

    #[test]
    fn bribe_grants_two_more_actions() {
        let (mut coup, ids) = game_with(&[Spy, Baron]);
        give(&mut coup, ids[0], 4);

        coup.bribe(ids[0]).unwrap();
        assert_eq!(coup.actions_remaining(), 2);
        assert_eq!(coup.turn().unwrap(), "p0");

        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p0");
        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p1");
        assert_eq!(coup.actions_remaining(), 1);
    }

    #[test]
    fn skips_eliminated_players() {
        let (mut coup, ids) = game_with(&[Judge, Baron, Spy, Governor]);
        give(&mut coup, ids[0], 7);
        coup.coup(ids[0], ids[1]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p2");

        coup.gather(ids[2]).unwrap();
        coup.gather(ids[3]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p0");
        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p2");
    }

    #[test]
    fn no_advance_once_alone() {
        let (mut coup, ids) = game_with(&[Judge, Baron]);
        give(&mut coup, ids[0], 7);
        coup.coup(ids[0], ids[1]).unwrap();

        assert!(coup.is_game_over());
        assert_eq!(coup.turn().unwrap(), "p0");
        assert_eq!(coup.winner().unwrap(), "p0");

        coup.next_turn().unwrap();
        assert_eq!(coup.turn().unwrap(), "p0");
    }

    #[test]
    fn sanction_lasts_through_own_turn() {
        let (mut coup, ids) = game_with(&[Judge, Spy, Baron]);
        give(&mut coup, ids[0], 3);

        coup.sanction(ids[0], ids[1]).unwrap();
        assert!(coup.player(ids[1]).unwrap().is_sanctioned());

        // still sanctioned while it is their turn
        assert!(coup.gather(ids[1]).is_err());
        coup.end_turn(ids[1]).unwrap();
        assert!(!coup.player(ids[1]).unwrap().is_sanctioned());
    }

    #[test]
    fn merchant_bonus_at_turn_start() {
        let (mut coup, ids) = game_with(&[Judge, Merchant]);
        give(&mut coup, ids[1], 3);

        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 4);
        assert_eq!(coup.total_coins(), 50);

        // below the threshold there is no bonus
        let (mut coup, ids) = game_with(&[Judge, Merchant]);
        give(&mut coup, ids[1], 2);
        coup.gather(ids[0]).unwrap();
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 2);
    }

    #[test]
    fn merchant_bonus_skipped_on_empty_treasury() {
        let (mut coup, ids) = game_with(&[Judge, Merchant]);
        give(&mut coup, ids[1], 3);
        give(&mut coup, ids[0], 47);
        assert_eq!(coup.treasury(), 0);

        // p0 is at the coup threshold, but ending the turn is still allowed
        coup.end_turn(ids[0]).unwrap();
        assert_eq!(coup.player(ids[1]).unwrap().coins(), 3);
        assert_eq!(coup.turn().unwrap(), "p1");
    }

    #[test]
    fn cleanup_keeps_turn_order() {
        let (mut coup, ids) = game_with(&[Judge, Spy, Baron, General, Governor]);
        give(&mut coup, ids[0], 7);
        give(&mut coup, ids[1], 1);
        coup.coup(ids[0], ids[1]).unwrap();

        // p2 is up, p1 is out but still listed
        assert_eq!(coup.all_players().len(), 5);
        assert_eq!(coup.players(), vec!["p0", "p2", "p3", "p4"]);

        coup.cleanup_inactive_players().unwrap();
        assert_eq!(coup.all_players().len(), 4);
        assert_eq!(coup.turn().unwrap(), "p2");
        assert!(coup.player(ids[1]).is_err());
        assert_eq!(coup.total_coins(), 50);

        coup.gather(ids[2]).unwrap();
        assert_eq!(coup.turn().unwrap(), "p3");
    }
}

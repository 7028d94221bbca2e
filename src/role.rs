use std::fmt::{Display, Formatter};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use crate::action::{Action, SANCTION_COST};
use crate::Role::{Baron, General, Governor, Judge, Merchant, Spy};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Governor,
    Spy,
    Baron,
    General,
    Judge,
    Merchant,
}

pub static ROLE_VARIANTS: [Role; 6] = [
    Governor,
    Spy,
    Baron,
    General,
    Judge,
    Merchant,
];

/// What a General pays to stop a coup.
pub const GENERAL_BLOCK_COST: u32 = 5;

const BASE_TAX: u32 = 2;
const MERCHANT_BONUS_THRESHOLD: u32 = 3;
const MERCHANT_ARREST_PENALTY: u32 = 2;

/// Where the coins taken by an arrest end up.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct ArrestPayout {
    pub to_arrester: u32,
    pub to_treasury: u32,
}

impl ArrestPayout {
    pub fn total(&self) -> u32 {
        self.to_arrester + self.to_treasury
    }
}

impl Role {
    pub fn random<R: Rng + Sized>(rng: &mut R) -> Role {
        // the variant table is never empty
        *ROLE_VARIANTS.choose(rng).unwrap_or(&Governor)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Governor => "Governor",
            Spy => "Spy",
            Baron => "Baron",
            General => "General",
            Judge => "Judge",
            Merchant => "Merchant",
        }
    }

    /// Capability table for the blocking protocol. `coins` is the would-be
    /// blocker's balance, which only matters to a General.
    pub fn can_block(&self, action: Action, coins: u32) -> bool {
        match (self, action) {
            (Governor, Action::Tax) => true,
            (Judge, Action::Bribe) => true,
            (General, Action::Coup) => coins >= GENERAL_BLOCK_COST,
            _ => false,
        }
    }

    /// Case-insensitive variant of [`Role::can_block`]; unknown names are never blockable.
    pub fn can_block_named(&self, action: &str, coins: u32) -> bool {
        action
            .parse::<Action>()
            .map(|action| self.can_block(action, coins))
            .unwrap_or(false)
    }

    pub fn tax_amount(&self) -> u32 {
        match self {
            Governor => BASE_TAX + 1,
            _ => BASE_TAX,
        }
    }

    /// Coins owed to the player at the start of their turn, before the treasury is consulted.
    pub fn turn_start_bonus(&self, coins: u32) -> u32 {
        match self {
            Merchant if coins >= MERCHANT_BONUS_THRESHOLD => 1,
            _ => 0,
        }
    }

    /// How an arrest against a player of this role with `coins` is paid out.
    pub fn arrest_payout(&self, coins: u32) -> ArrestPayout {
        match self {
            General => ArrestPayout::default(),
            Merchant => ArrestPayout {
                to_arrester: 0,
                to_treasury: coins.min(MERCHANT_ARREST_PENALTY),
            },
            _ => ArrestPayout {
                to_arrester: coins.min(1),
                to_treasury: 0,
            },
        }
    }

    /// Price of sanctioning a player of this role.
    pub fn sanction_cost(&self) -> u32 {
        match self {
            Judge => SANCTION_COST + 1,
            _ => SANCTION_COST,
        }
    }

    /// Paid from the treasury to a sanctioned player of this role, when the treasury can afford it.
    pub fn sanction_compensation(&self) -> u32 {
        match self {
            Baron => 1,
            _ => 0,
        }
    }

    /// Role-exclusive actions; everything else is open to all roles.
    pub fn grants(&self, action: Action) -> bool {
        match action {
            Action::Invest => *self == Baron,
            Action::Investigate | Action::BlockArrest => *self == Spy,
            _ => true,
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;
    use crate::action::{Action, ACTION_VARIANTS};
    use crate::role::{ArrestPayout, ROLE_VARIANTS};
    use crate::Role;
    use crate::Role::{Baron, General, Governor, Judge, Merchant, Spy};

    #[test]
    fn block_capabilities() {
        assert!(Governor.can_block(Action::Tax, 0));
        assert!(Judge.can_block(Action::Bribe, 0));
        assert!(!General.can_block(Action::Coup, 4));
        assert!(General.can_block(Action::Coup, 5));

        // nothing else blocks anything
        for role in [Spy, Baron, Merchant] {
            for action in ACTION_VARIANTS {
                assert!(!role.can_block(action, 100), "{role} should not block {action}");
            }
        }

        // arrest, gather and invest are never blockable by anyone
        for role in ROLE_VARIANTS {
            assert!(!role.can_block(Action::Arrest, 100));
            assert!(!role.can_block(Action::Gather, 100));
            assert!(!role.can_block(Action::Invest, 100));
        }
    }

    #[test]
    fn block_by_name_ignores_case() {
        assert!(Governor.can_block_named("TAX", 0));
        assert!(Judge.can_block_named("bribe", 0));
        assert!(General.can_block_named("Coup", 9));
        assert!(!General.can_block_named("coup", 2));
        assert!(!Governor.can_block_named("taxes", 0));
    }

    #[test]
    fn tax() {
        assert_eq!(Governor.tax_amount(), 3);
        for role in [Spy, Baron, General, Judge, Merchant] {
            assert_eq!(role.tax_amount(), 2);
        }
    }

    #[test]
    fn arrest_payouts() {
        assert_eq!(General.arrest_payout(8), ArrestPayout::default());
        assert_eq!(Merchant.arrest_payout(5), ArrestPayout { to_arrester: 0, to_treasury: 2 });
        assert_eq!(Merchant.arrest_payout(1), ArrestPayout { to_arrester: 0, to_treasury: 1 });
        assert_eq!(Merchant.arrest_payout(0).total(), 0);
        assert_eq!(Spy.arrest_payout(3), ArrestPayout { to_arrester: 1, to_treasury: 0 });
        assert_eq!(Judge.arrest_payout(0).total(), 0);
    }

    #[test]
    fn sanction_terms() {
        assert_eq!(Judge.sanction_cost(), 4);
        assert_eq!(Baron.sanction_cost(), 3);
        assert_eq!(Baron.sanction_compensation(), 1);
        assert_eq!(Spy.sanction_compensation(), 0);
    }

    #[test]
    fn merchant_bonus() {
        assert_eq!(Merchant.turn_start_bonus(2), 0);
        assert_eq!(Merchant.turn_start_bonus(3), 1);
        assert_eq!(Baron.turn_start_bonus(9), 0);
    }

    #[test]
    fn exclusive_abilities() {
        assert!(Baron.grants(Action::Invest));
        assert!(!Spy.grants(Action::Invest));
        assert!(Spy.grants(Action::Investigate));
        assert!(Spy.grants(Action::BlockArrest));
        assert!(!Judge.grants(Action::BlockArrest));
        assert!(Judge.grants(Action::Coup));
    }

    #[test]
    fn random_roles_cover_the_set() {
        let mut rng = Pcg64::seed_from_u64(7);
        let mut seen = vec![];
        for _ in 0..200 {
            let role = Role::random(&mut rng);
            if !seen.contains(&role) {
                seen.push(role);
            }
        }
        assert_eq!(seen.len(), ROLE_VARIANTS.len());
    }
}

use tracing::debug;
use crate::{Action, Coup, CoupError, Player, PlayerId};

/// Outcome of [`ActionValidator::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub message: String,
}

impl Validation {
    pub fn ok() -> Self {
        Validation { valid: true, message: String::new() }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Validation { valid: false, message: message.into() }
    }
}

impl From<Result<(), CoupError>> for Validation {
    fn from(result: Result<(), CoupError>) -> Self {
        match result {
            Ok(()) => Validation::ok(),
            Err(err) => Validation::invalid(err.to_string()),
        }
    }
}

pub const MUST_COUP: &str = "Must perform coup when having 10 or more coins";

pub struct ActionValidator;

impl ActionValidator {
    /// Non-failing form, for driving affordances.
    pub fn validate(game: &Coup, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Validation {
        Self::check(game, action, actor, target).into()
    }

    /// Same pipeline as [`ActionValidator::validate`], with the failure typed
    /// by the rule that rejected it.
    pub fn check(game: &Coup, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Result<(), CoupError> {
        let result = Self::run(game, action, actor, target, true);
        if let Err(err) = &result {
            debug!(%action, %actor, reason = %err, "action rejected");
        }
        result
    }

    pub fn check_named(game: &Coup, action: &str, actor: PlayerId, target: Option<PlayerId>) -> Result<(), CoupError> {
        Self::check(game, action.parse()?, actor, target)
    }

    /// Full check, target included, but with no target supplied.
    /// Targeted actions therefore always report unavailable.
    pub fn is_available(game: &Coup, action: Action, actor: PlayerId) -> bool {
        Self::run(game, action, actor, None, true).is_ok()
    }

    /// Whether a button for `action` should be enabled before a target is picked.
    pub fn is_available_for_button(game: &Coup, action: Action, actor: PlayerId) -> bool {
        Self::run(game, action, actor, None, false).is_ok()
    }

    pub fn action_cost(action: Action) -> u32 {
        action.nominal_cost()
    }

    pub fn requires_target(action: Action) -> bool {
        action.requires_target()
    }

    // checks run in this order and the first failure wins
    fn run(game: &Coup, action: Action, actor: PlayerId, target: Option<PlayerId>, with_target: bool) -> Result<(), CoupError> {
        let actor = game.player(actor)?;

        Self::check_mandatory_coup(game, action, actor)?;
        Self::check_player_state(actor)?;
        Self::check_game_state(game, actor)?;
        Self::check_coins(action, actor)?;
        Self::check_role(action, actor)?;

        if with_target && action.requires_target() {
            Self::check_target(game, action, actor, target)?;
        }

        Ok(())
    }

    fn check_mandatory_coup(game: &Coup, action: Action, actor: &Player) -> Result<(), CoupError> {
        if actor.coins() >= game.config().mandatory_coup_threshold && !action.allowed_when_rich() {
            return Err(CoupError::illegal_move(MUST_COUP));
        }
        Ok(())
    }

    fn check_player_state(actor: &Player) -> Result<(), CoupError> {
        if !actor.is_active() {
            return Err(CoupError::illegal_move("Player is not active"));
        }
        Ok(())
    }

    fn check_game_state(game: &Coup, actor: &Player) -> Result<(), CoupError> {
        if !game.is_player_turn(actor.id()) {
            return Err(CoupError::NotYourTurn);
        }
        if !game.is_started() {
            return Err(CoupError::game_state("Game has not started"));
        }
        if game.pending().is_some() {
            return Err(CoupError::illegal_move("An action is waiting for a block decision"));
        }
        Ok(())
    }

    fn check_coins(action: Action, actor: &Player) -> Result<(), CoupError> {
        let required = action.nominal_cost();
        if actor.coins() >= required {
            return Ok(());
        }

        // the real price of a sanction depends on the target, so only the floor is checked here
        match action {
            Action::Sanction => Err(CoupError::insufficient(format!("Need at least {required} coins for sanction"))),
            _ => Err(CoupError::insufficient(format!("Need {required} coins for {action}"))),
        }
    }

    fn check_role(action: Action, actor: &Player) -> Result<(), CoupError> {
        match action {
            Action::Gather | Action::Tax if actor.is_sanctioned() => {
                Err(CoupError::illegal_move("You are under sanctions and cannot gather or tax"))
            }
            Action::Arrest if actor.is_arrest_blocked() => {
                Err(CoupError::illegal_move("Your arrest ability is blocked this turn"))
            }
            Action::Invest if !actor.role().grants(action) => Err(CoupError::illegal_move("Only Baron can invest")),
            Action::Investigate if !actor.role().grants(action) => Err(CoupError::illegal_move("Only Spy can investigate")),
            Action::BlockArrest if !actor.role().grants(action) => {
                Err(CoupError::illegal_move("Only Spy can block arrest abilities"))
            }
            _ => Ok(()),
        }
    }

    fn check_target(game: &Coup, action: Action, actor: &Player, target: Option<PlayerId>) -> Result<(), CoupError> {
        let Some(target) = target else {
            return Err(CoupError::illegal_target(format!("Target required for {action}")));
        };
        let target = game.player(target)?;

        if !target.is_active() {
            return Err(CoupError::illegal_target("Target player is not active"));
        }
        if target.id() == actor.id() {
            return Err(CoupError::illegal_target(format!("Cannot target yourself with {action}")));
        }

        Ok(())
    }
}

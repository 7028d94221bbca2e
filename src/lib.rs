pub mod action;
pub mod blocking;
pub mod config;
pub mod error;
pub mod ledger;
pub mod play;
pub mod player;
pub mod role;
pub mod turn;
pub mod validator;

pub use action::Action;
pub use blocking::{Decision, PendingResolution, Proposal, Resolution};
pub use config::RulesConfig;
pub use error::{ConfigError, CoupError, ErrorKind};
pub use play::Outcome;
pub use player::{Intel, Player, PlayerId, PlayerView};
pub use role::Role;
pub use validator::{ActionValidator, Validation};

use std::fmt::{Debug, Formatter};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tracing::{debug_span, info};
use crate::action::ACTION_VARIANTS;
use crate::ledger::Treasury;

/// The game controller: owns the roster, the treasury and the turn state.
#[derive(Clone, Eq, PartialEq)]
pub struct Coup {
    config: RulesConfig,
    players: Vec<Player>,
    next_player_id: usize,
    current_player_idx: usize,
    treasury: Treasury,
    started: bool,
    last_arrested: Option<PlayerId>,
    actions_remaining: u32,
    pending: Option<PendingResolution>,
}

/// An action paired with its target, as offered to the current player.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub action: Action,
    pub target: Option<PlayerId>,
}

impl Debug for Move {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.target {
            Some(target) => f.write_fmt(format_args!("{} {target}", self.action)),
            None => f.write_fmt(format_args!("{}", self.action)),
        }
    }
}

/// Serializable snapshot of the whole table for a presentation layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameView {
    pub players: Vec<PlayerView>,
    pub current_player: Option<String>,
    pub treasury: u32,
    pub started: bool,
    pub game_over: bool,
    pub actions_remaining: u32,
    pub last_arrested: Option<String>,
    pub pending: Option<PendingResolution>,
}

impl Debug for Coup {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(format!("P {} | A {} | $T {}\n", self.current_player_idx, self.actions_remaining, self.treasury.coins()).as_str())?;
        for player in self.players.iter() {
            f.write_str(format!("\t{:?}\n", player).as_str())?;
        }
        if let Some(pending) = &self.pending {
            f.write_str(format!("\tpending {:?}\n", pending).as_str())?;
        }
        Ok(())
    }
}

impl Default for Coup {
    fn default() -> Self {
        Coup::new()
    }
}

impl Coup {
    pub fn new() -> Self {
        Self::from_valid_config(RulesConfig::default())
    }

    pub fn with_config(config: RulesConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: RulesConfig) -> Self {
        Self {
            treasury: Treasury::new(config.starting_treasury),
            players: Vec::with_capacity(config.max_players),
            config,
            next_player_id: 0,
            current_player_idx: 0,
            started: false,
            last_arrested: None,
            actions_remaining: 1,
            pending: None,
        }
    }

    /// Builds an unstarted game whose roles are drawn from a seeded rng, so
    /// the same seed always deals the same roles.
    pub fn with_random_roles(names: &[&str], seed: u64) -> Result<Self, CoupError> {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut game = Coup::new();
        for name in names {
            game.add_random_player(name, &mut rng)?;
        }
        Ok(game)
    }

    pub fn config(&self) -> &RulesConfig {
        &self.config
    }

    pub fn add_player(&mut self, name: &str, role: Role) -> Result<PlayerId, CoupError> {
        if self.players.len() >= self.config.max_players {
            return Err(CoupError::TooManyPlayers { max: self.config.max_players });
        }
        if self.started {
            return Err(CoupError::game_state("Cannot add players after the game has started"));
        }
        if self.players.iter().any(|p| p.name() == name) {
            return Err(CoupError::game_state(format!("Player name already taken: {name}")));
        }

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        self.players.push(Player::new(id, name.to_string(), role));
        info!(player = %name, role = %role, seat = self.players.len() - 1, "player joined");

        Ok(id)
    }

    pub fn add_random_player<R: Rng + Sized>(&mut self, name: &str, rng: &mut R) -> Result<PlayerId, CoupError> {
        self.add_player(name, Role::random(rng))
    }

    pub fn start(&mut self) -> Result<(), CoupError> {
        if self.started {
            return Err(CoupError::game_state("Game already started"));
        }
        if self.players.len() < self.config.min_players {
            return Err(CoupError::game_state("Not enough players to start game"));
        }

        self.started = true;
        self.start_turn_actions();
        info!(players = self.players.len(), treasury = self.treasury.coins(), "game started");

        Ok(())
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Names of the players still in the game, in seating order.
    pub fn players(&self) -> Vec<&str> {
        self.players
            .iter()
            .filter(|p| p.is_active())
            .map(|p| p.name())
            .collect()
    }

    /// The full roster, eliminated players included.
    pub fn all_players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, CoupError> {
        self.index_of(id).map(|idx| &self.players[idx])
    }

    pub fn player_by_name(&self, name: &str) -> Result<PlayerId, CoupError> {
        self.players
            .iter()
            .find(|p| p.name() == name)
            .map(|p| p.id())
            .ok_or_else(|| CoupError::NotFound(name.to_string()))
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_idx)
    }

    /// Name of the player whose turn it is.
    pub fn turn(&self) -> Result<&str, CoupError> {
        self.current_player()
            .map(|p| p.name())
            .ok_or_else(|| CoupError::game_state("No players in game"))
    }

    pub fn is_player_turn(&self, id: PlayerId) -> bool {
        self.current_player().map(|p| p.id() == id).unwrap_or(false)
    }

    pub fn last_arrested(&self) -> Option<PlayerId> {
        self.last_arrested
    }

    pub fn winner(&self) -> Result<&str, CoupError> {
        if !self.is_game_over() {
            return Err(CoupError::game_state("Game is not over yet"));
        }

        self.players
            .iter()
            .find(|p| p.is_active())
            .map(|p| p.name())
            .ok_or_else(|| CoupError::game_state("No winner - all players eliminated"))
    }

    /// Every move the current player could make right now.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(ACTION_VARIANTS.len() * self.players.len());

        let Some(actor) = self.current_player() else {
            return moves;
        };
        if self.is_game_over() {
            return moves;
        }
        let actor = actor.id();

        for action in ACTION_VARIANTS {
            if action.requires_target() {
                for target in self.players.iter().filter(|p| p.id() != actor) {
                    self.offer(&mut moves, action, actor, Some(target.id()));
                }
            } else {
                self.offer(&mut moves, action, actor, None);
            }
        }

        moves
    }

    // some rules (repeat arrests, the invest return) only show up when the action runs
    fn offer(&self, moves: &mut Vec<Move>, action: Action, actor: PlayerId, target: Option<PlayerId>) {
        if !ActionValidator::validate(self, action, actor, target).valid {
            return;
        }
        if self.dry_run(action, actor, target).is_ok() {
            moves.push(Move { action, target });
        }
    }

    pub fn snapshot(&self) -> GameView {
        let name_of = |id: PlayerId| self.player(id).ok().map(|p| p.name().to_string());

        GameView {
            players: self.players.iter().map(Player::view).collect(),
            current_player: self.current_player().map(|p| p.name().to_string()),
            treasury: self.treasury.coins(),
            started: self.started,
            game_over: self.is_game_over(),
            actions_remaining: self.actions_remaining,
            last_arrested: self.last_arrested.and_then(name_of),
            pending: self.pending.clone(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }

    fn index_of(&self, id: PlayerId) -> Result<usize, CoupError> {
        self.players
            .iter()
            .position(|p| p.id() == id)
            .ok_or_else(|| CoupError::NotFound(id.to_string()))
    }

    // plays the action on a throwaway copy; its logs land in a `dry_run` span
    pub(crate) fn dry_run(&self, action: Action, actor: PlayerId, target: Option<PlayerId>) -> Result<Outcome, CoupError> {
        let _span = debug_span!("dry_run", %action).entered();
        self.clone().apply(action, actor, target)
    }

    // direct table changes wait for the start and for any block decision
    fn ensure_table_settled(&self) -> Result<(), CoupError> {
        if !self.started {
            return Err(CoupError::game_state("Game has not started"));
        }
        if self.pending.is_some() {
            return Err(CoupError::illegal_move("An action is waiting for a block decision"));
        }
        Ok(())
    }

    // runs `f` against a draft of the game and only keeps the draft if `f` succeeds
    fn transact<T>(&mut self, f: impl FnOnce(&mut Coup) -> Result<T, CoupError>) -> Result<T, CoupError> {
        let mut game = self.clone();
        let out = f(&mut game)?;
        *self = game;
        Ok(out)
    }
}

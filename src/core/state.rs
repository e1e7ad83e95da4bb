//! Session state.
//!
//! ## CoreState
//!
//! Everything that persists across phases:
//! - Actors (party and enemies), keyed by id
//! - Relics, rest count, rewind cooldowns
//! - Reward queue and history
//! - Command history and flow telemetry
//! - Id allocator and RNG streams
//!
//! ## Phase
//!
//! Where the session is. Board and combat state exist only inside the
//! variants that need them, so a garden session cannot hold a stale board.
//!
//! ## GameState
//!
//! Core + phase + the single rewind snapshot. Uses `im` persistent
//! collections throughout, so cloning a state for the snapshot is cheap and
//! shares structure with the live one.

use im::{HashMap as ImHashMap, Vector};
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::command::CommandRecord;
use super::ids::{ActorId, BiomeId, IdAllocator};
use super::rng::{GameRng, Stream};
use super::side::Side;
use crate::cards::Reward;
use crate::combat::{CombatState, FlowStats, RelicInstance};
use crate::zones::Board;

/// State shared by every phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoreState {
    // === Actors ===
    /// Every live actor, party and enemy alike.
    pub actors: ImHashMap<ActorId, Actor>,

    /// Party members in foundation order.
    pub party: Vector<ActorId>,

    // === Meta progression ===
    pub relics: Vector<RelicInstance>,

    /// Rests completed this session.
    pub rest_count: u32,

    /// Plays remaining before each actor's rewind ability is ready again.
    pub rewind_cooldowns: ImHashMap<ActorId, i32>,

    /// Rewards not yet drained by the host.
    pub rewards: Vector<Reward>,

    /// Every reward ever granted.
    pub reward_history: Vector<Reward>,

    // === Telemetry ===
    pub history: Vector<CommandRecord>,
    pub flow: FlowStats,

    // === Determinism ===
    pub ids: IdAllocator,

    /// Deal shuffles and backfill.
    pub rng: GameRng,

    /// Hit rolls.
    pub combat_rng: GameRng,

    /// Timestamp of the latest accepted command.
    pub clock_ms: Option<u64>,

    /// Next command sequence number.
    pub sequence: u64,
}

impl CoreState {
    /// Empty core seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            actors: ImHashMap::new(),
            party: Vector::new(),
            relics: Vector::new(),
            rest_count: 0,
            rewind_cooldowns: ImHashMap::new(),
            rewards: Vector::new(),
            reward_history: Vector::new(),
            history: Vector::new(),
            flow: FlowStats::default(),
            ids: IdAllocator::new(),
            rng: GameRng::stream(seed, Stream::Deal),
            combat_rng: GameRng::stream(seed, Stream::Combat),
            clock_ms: None,
            sequence: 0,
        }
    }

    /// Look up an actor.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    /// Party members in foundation order.
    pub fn party_actors(&self) -> impl Iterator<Item = &Actor> {
        self.party.iter().filter_map(|id| self.actors.get(id))
    }

    /// Queue a reward and remember it.
    pub fn grant_reward(&mut self, reward: Reward) {
        tracing::debug!(?reward, "reward granted");
        self.rewards.push_back(reward);
        self.reward_history.push_back(reward);
    }

    /// Next sequence number.
    pub fn next_sequence(&mut self) -> u64 {
        let seq = self.sequence;
        self.sequence += 1;
        seq
    }
}

/// Where the session is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Between biomes. Resting is only possible here.
    Garden,
    /// A plain solitaire session with no biome and no combat.
    Playing(Board),
    StaticBiome {
        biome: BiomeId,
        board: Board,
    },
    CombatBiome {
        biome: BiomeId,
        board: Board,
        combat: CombatState,
    },
}

impl Phase {
    /// Stable name for logs and rejections.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Phase::Garden => "garden",
            Phase::Playing(_) => "playing",
            Phase::StaticBiome { .. } => "static biome",
            Phase::CombatBiome { .. } => "combat biome",
        }
    }

    #[must_use]
    pub fn board(&self) -> Option<&Board> {
        match self {
            Phase::Garden => None,
            Phase::Playing(board) | Phase::StaticBiome { board, .. } | Phase::CombatBiome { board, .. } => {
                Some(board)
            }
        }
    }

    pub fn board_mut(&mut self) -> Option<&mut Board> {
        self.parts_mut().0
    }

    #[must_use]
    pub fn combat(&self) -> Option<&CombatState> {
        match self {
            Phase::CombatBiome { combat, .. } => Some(combat),
            _ => None,
        }
    }

    pub fn combat_mut(&mut self) -> Option<&mut CombatState> {
        self.parts_mut().1
    }

    /// Board and combat state borrowed together.
    pub fn parts_mut(&mut self) -> (Option<&mut Board>, Option<&mut CombatState>) {
        match self {
            Phase::Garden => (None, None),
            Phase::Playing(board) | Phase::StaticBiome { board, .. } => (Some(board), None),
            Phase::CombatBiome { board, combat, .. } => (Some(board), Some(combat)),
        }
    }

    /// The biome the session is in.
    #[must_use]
    pub fn biome(&self) -> Option<BiomeId> {
        match self {
            Phase::StaticBiome { biome, .. } | Phase::CombatBiome { biome, .. } => Some(*biome),
            _ => None,
        }
    }
}

/// Everything a rewind restores.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub core: CoreState,
    pub phase: Phase,
}

/// A complete session snapshot.
///
/// ## Example
///
/// ```
/// use golf_rpg::core::{GameState, Phase};
///
/// let state = GameState::new(42);
/// assert_eq!(state.phase, Phase::Garden);
/// assert!(state.snapshot.is_none());
/// assert_eq!(state.active_side(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub core: CoreState,
    pub phase: Phase,
    /// State before the latest play, if one can be rewound.
    pub snapshot: Option<Box<Snapshot>>,
}

impl GameState {
    /// A garden session with no actors.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            core: CoreState::new(seed),
            phase: Phase::Garden,
            snapshot: None,
        }
    }

    /// Capture everything but the snapshot itself.
    #[must_use]
    pub fn capture(&self) -> Snapshot {
        Snapshot {
            core: self.core.clone(),
            phase: self.phase.clone(),
        }
    }

    /// Replace the live state with a snapshot. The restored state has no
    /// snapshot of its own.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.core = snapshot.core;
        self.phase = snapshot.phase;
        self.snapshot = None;
    }

    /// Equip a relic.
    #[must_use]
    pub fn with_relic(mut self, relic: RelicInstance) -> Self {
        self.core.relics.push_back(relic);
        self
    }

    /// Look up an actor.
    #[must_use]
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.core.actor(id)
    }

    /// Actor ids for a side, in foundation order. Empty outside combat for
    /// the enemy side.
    #[must_use]
    pub fn side_actors(&self, side: Side) -> Vector<ActorId> {
        match side {
            Side::Player => self.core.party.clone(),
            Side::Enemy => self
                .phase
                .combat()
                .map(|c| c.enemies.clone())
                .unwrap_or_default(),
        }
    }

    /// The side whose turn it is, inside combat.
    #[must_use]
    pub fn active_side(&self) -> Option<Side> {
        self.phase.combat().map(|c| c.turn.active)
    }

    /// Current turn number, 0 outside combat.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.phase.combat().map_or(0, |c| c.turn.turn_number)
    }
}

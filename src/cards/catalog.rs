//! Read-only content catalog.
//!
//! The `Catalog` holds every static definition the engine reads: actors,
//! orims, relics, biomes, and the elemental type chart. It is injected into
//! the engine by reference and never mutated by a command.
//!
//! ## Precedence
//!
//! A catalog has two layers. Lookups consult the **live** layer first and
//! fall back to the **fallback** layer, so a host can ship bundled content
//! as the fallback and overlay hot-reloaded entries on top.
//!
//! ```
//! use golf_rpg::cards::{Catalog, OrimDefinition};
//! use golf_rpg::core::OrimId;
//!
//! let mut catalog = Catalog::new();
//! catalog.fallback_mut().register_orim(OrimDefinition::new(OrimId::new(1), "Bundled"));
//! catalog.live_mut().register_orim(OrimDefinition::new(OrimId::new(1), "Patched"));
//!
//! assert_eq!(catalog.orim(OrimId::new(1)).unwrap().name, "Patched");
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::card::{Card, Element, Rank};
use super::orim::{OrimDefinition, RawOrimDefinition};
use crate::core::ids::{ActorDefId, BiomeId, OrimId, RelicId};
use crate::triggers::TriggerCompileError;

// === Actors ===

/// Base stats of an actor definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorStats {
    pub hp_max: u32,
    pub armor: u32,
    pub super_armor: u32,
    pub defense: u32,
    pub evasion: u32,
    pub accuracy: u32,
    pub power_max: u32,
    pub energy: u32,
    pub stamina_max: u32,
}

impl Default for ActorStats {
    fn default() -> Self {
        Self {
            hp_max: 10,
            armor: 0,
            super_armor: 0,
            defense: 0,
            evasion: 0,
            accuracy: 100,
            power_max: 3,
            energy: 0,
            stamina_max: 3,
        }
    }
}

/// Static actor definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActorDefinition {
    pub id: ActorDefId,
    pub name: String,
    #[serde(default)]
    pub stats: ActorStats,
    #[serde(default)]
    pub element: Element,
    /// Rank of the card that seeds this actor's foundation.
    pub seed_rank: Rank,
    /// Orims making up the actor's ability deck, one deck card each.
    #[serde(default)]
    pub ability_deck: Vec<OrimId>,
    /// Orims socketed directly into the actor.
    #[serde(default)]
    pub slotted: SmallVec<[OrimId; 2]>,
    /// Actor carries a cooldown-gated rewind ability.
    #[serde(default)]
    pub has_rewind: bool,
}

impl ActorDefinition {
    /// Create a definition with default stats.
    pub fn new(id: ActorDefId, name: impl Into<String>, seed_rank: Rank) -> Self {
        Self {
            id,
            name: name.into(),
            stats: ActorStats::default(),
            element: Element::default(),
            seed_rank,
            ability_deck: Vec::new(),
            slotted: SmallVec::new(),
            has_rewind: false,
        }
    }

    /// Set base stats.
    #[must_use]
    pub fn with_stats(mut self, stats: ActorStats) -> Self {
        self.stats = stats;
        self
    }

    /// Set the element.
    #[must_use]
    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    /// Add an orim to the ability deck.
    #[must_use]
    pub fn with_ability(mut self, orim: OrimId) -> Self {
        self.ability_deck.push(orim);
        self
    }

    /// Socket an orim into the actor.
    #[must_use]
    pub fn with_slotted(mut self, orim: OrimId) -> Self {
        self.slotted.push(orim);
        self
    }

    /// Give the actor a rewind ability.
    #[must_use]
    pub fn with_rewind(mut self) -> Self {
        self.has_rewind = true;
        self
    }

    /// The card placed on this actor's foundation when a board is dealt.
    #[must_use]
    pub fn seed_card(&self) -> Card {
        Card::new(self.seed_rank, self.element)
    }
}

// === Relics ===

/// What a relic does. Each behavior reacts to one narrow event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelicBehavior {
    /// Ending a player turn early banks the leftover time as party armor.
    BankedTimeArmor { ms_per_armor: u64 },
    /// Every valid play adds time to the running countdown.
    MoveTimerBonus { bonus_ms: u64 },
    /// One wild card per foundation when stuck outside combat after a rest.
    RestWildcards,
    /// One rewind per rest.
    RewindOncePerRest,
    /// The countdown does not run while the enemy side is empty.
    TimerFreeze,
}

/// Static relic definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelicDefinition {
    pub id: RelicId,
    pub name: String,
    pub behavior: RelicBehavior,
}

impl RelicDefinition {
    pub fn new(id: RelicId, name: impl Into<String>, behavior: RelicBehavior) -> Self {
        Self {
            id,
            name: name.into(),
            behavior,
        }
    }
}

// === Biomes ===

/// Whether a biome fights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiomeKind {
    /// Pure solitaire layout; cleared by emptying it.
    #[default]
    Static,
    /// Spawns an enemy side; cleared by knocking every enemy out.
    Combat,
}

/// Weighted enemy roster entry.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub actor: ActorDefId,
    pub weight: f32,
}

/// Reward granted once when a biome is cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BiomeReward {
    pub element: Element,
    pub amount: u32,
}

/// Static biome definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiomeDefinition {
    pub id: BiomeId,
    pub name: String,
    #[serde(default)]
    pub kind: BiomeKind,
    /// Fixed tableau layout, bottom card first. Empty means deal from a deck.
    #[serde(default)]
    pub layout: Vec<Vec<Card>>,
    #[serde(default = "default_tableau_count")]
    pub tableau_count: usize,
    #[serde(default = "default_tableau_depth")]
    pub tableau_depth: usize,
    #[serde(default)]
    pub stock_size: usize,
    /// Tableaus backfill beneath their top when a card is taken.
    #[serde(default)]
    pub infinite: bool,
    /// Deal independent random cards instead of shuffled runs.
    #[serde(default)]
    pub random: bool,
    /// Extra hp given to every spawned enemy.
    #[serde(default)]
    pub difficulty: u32,
    #[serde(default)]
    pub elements: Vec<Element>,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub enemy_count: usize,
    #[serde(default)]
    pub rewards: Vec<BiomeReward>,
    /// Dealt cards of this rank carry a reward of their element.
    #[serde(default)]
    pub reward_rank: Option<Rank>,
    /// Deterministic backfill order for infinite tableaus.
    #[serde(default)]
    pub backfill: Vec<Card>,
}

fn default_tableau_count() -> usize {
    7
}

fn default_tableau_depth() -> usize {
    5
}

impl BiomeDefinition {
    /// Create a static biome with the default deal shape.
    pub fn new(id: BiomeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: BiomeKind::Static,
            layout: Vec::new(),
            tableau_count: default_tableau_count(),
            tableau_depth: default_tableau_depth(),
            stock_size: 0,
            infinite: false,
            random: false,
            difficulty: 0,
            elements: Vec::new(),
            enemies: Vec::new(),
            enemy_count: 0,
            rewards: Vec::new(),
            reward_rank: None,
            backfill: Vec::new(),
        }
    }

    /// Make this a combat biome spawning `count` enemies from the roster.
    #[must_use]
    pub fn combat(mut self, count: usize) -> Self {
        self.kind = BiomeKind::Combat;
        self.enemy_count = count;
        self
    }

    /// Add an enemy to the spawn roster.
    #[must_use]
    pub fn with_enemy(mut self, actor: ActorDefId, weight: f32) -> Self {
        self.enemies.push(EnemySpawn { actor, weight });
        self
    }

    /// Set the tableau shape.
    #[must_use]
    pub fn with_tableaus(mut self, count: usize, depth: usize) -> Self {
        self.tableau_count = count;
        self.tableau_depth = depth;
        self
    }

    /// Set the stock size.
    #[must_use]
    pub fn with_stock(mut self, size: usize) -> Self {
        self.stock_size = size;
        self
    }

    /// Use a fixed layout.
    #[must_use]
    pub fn with_layout(mut self, layout: Vec<Vec<Card>>) -> Self {
        self.layout = layout;
        self
    }

    /// Restrict dealt elements.
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<Element>) -> Self {
        self.elements = elements;
        self
    }

    /// Enable tableau backfill.
    #[must_use]
    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    /// Add a clear reward.
    #[must_use]
    pub fn with_reward(mut self, element: Element, amount: u32) -> Self {
        self.rewards.push(BiomeReward { element, amount });
        self
    }

    /// Set the enemy hp bonus.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: u32) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Does this biome spawn enemies?
    #[must_use]
    pub fn is_combat(&self) -> bool {
        self.kind == BiomeKind::Combat
    }
}

// === Type chart ===

/// Elemental damage multipliers, indexed `[attacker][defender]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeChart {
    multipliers: [[f32; Element::COUNT]; Element::COUNT],
}

impl Default for TypeChart {
    fn default() -> Self {
        Self {
            multipliers: [[1.0; Element::COUNT]; Element::COUNT],
        }
    }
}

impl TypeChart {
    /// A chart where every multiplier is 1.0.
    #[must_use]
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Set one multiplier.
    #[must_use]
    pub fn with(mut self, attacker: Element, defender: Element, multiplier: f32) -> Self {
        self.set(attacker, defender, multiplier);
        self
    }

    /// Set one multiplier. Negative values clamp to zero.
    pub fn set(&mut self, attacker: Element, defender: Element, multiplier: f32) {
        self.multipliers[attacker.index()][defender.index()] = multiplier.max(0.0);
    }

    /// Multiplier for `attacker` damage hitting a `defender`.
    #[must_use]
    pub fn multiplier(&self, attacker: Element, defender: Element) -> f32 {
        self.multipliers[attacker.index()][defender.index()]
    }
}

// === Catalog ===

/// One layer of definitions.
#[derive(Clone, Debug, Default)]
pub struct CatalogLayer {
    actors: FxHashMap<ActorDefId, ActorDefinition>,
    orims: FxHashMap<OrimId, OrimDefinition>,
    relics: FxHashMap<RelicId, RelicDefinition>,
    biomes: FxHashMap<BiomeId, BiomeDefinition>,
}

impl CatalogLayer {
    /// Register an actor, replacing any entry with the same id.
    pub fn register_actor(&mut self, def: ActorDefinition) -> Option<ActorDefinition> {
        self.actors.insert(def.id, def)
    }

    /// Register an orim, replacing any entry with the same id.
    pub fn register_orim(&mut self, def: OrimDefinition) -> Option<OrimDefinition> {
        self.orims.insert(def.id, def)
    }

    /// Register a relic, replacing any entry with the same id.
    pub fn register_relic(&mut self, def: RelicDefinition) -> Option<RelicDefinition> {
        self.relics.insert(def.id, def)
    }

    /// Register a biome, replacing any entry with the same id.
    pub fn register_biome(&mut self, def: BiomeDefinition) -> Option<BiomeDefinition> {
        self.biomes.insert(def.id, def)
    }

    /// Compile an authored orim and register it.
    ///
    /// Nothing is registered when the trigger fails to compile.
    pub fn load_orim(&mut self, raw: RawOrimDefinition) -> Result<OrimId, TriggerCompileError> {
        let def = OrimDefinition::try_from(raw)?;
        let id = def.id;
        self.register_orim(def);
        Ok(id)
    }

    /// Number of definitions across all kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len() + self.orims.len() + self.relics.len() + self.biomes.len()
    }

    /// Is the layer empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Layered, read-only content catalog.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    live: CatalogLayer,
    fallback: CatalogLayer,
    type_chart: TypeChart,
}

impl Catalog {
    /// Create an empty catalog with a neutral type chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the type chart.
    #[must_use]
    pub fn with_type_chart(mut self, chart: TypeChart) -> Self {
        self.type_chart = chart;
        self
    }

    /// Live layer, consulted first.
    pub fn live_mut(&mut self) -> &mut CatalogLayer {
        &mut self.live
    }

    /// Fallback layer, consulted when the live layer has no entry.
    pub fn fallback_mut(&mut self) -> &mut CatalogLayer {
        &mut self.fallback
    }

    /// Look up an actor definition.
    #[must_use]
    pub fn actor(&self, id: ActorDefId) -> Option<&ActorDefinition> {
        self.live.actors.get(&id).or_else(|| self.fallback.actors.get(&id))
    }

    /// Look up an orim definition.
    #[must_use]
    pub fn orim(&self, id: OrimId) -> Option<&OrimDefinition> {
        self.live.orims.get(&id).or_else(|| self.fallback.orims.get(&id))
    }

    /// Look up a relic definition.
    #[must_use]
    pub fn relic(&self, id: RelicId) -> Option<&RelicDefinition> {
        self.live.relics.get(&id).or_else(|| self.fallback.relics.get(&id))
    }

    /// Look up a biome definition.
    #[must_use]
    pub fn biome(&self, id: BiomeId) -> Option<&BiomeDefinition> {
        self.live.biomes.get(&id).or_else(|| self.fallback.biomes.get(&id))
    }

    /// The elemental type chart.
    #[must_use]
    pub fn type_chart(&self) -> &TypeChart {
        &self.type_chart
    }
}

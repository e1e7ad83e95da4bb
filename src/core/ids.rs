//! Stable identifiers.
//!
//! Actors, deck cards, content definitions and runtime entries are all
//! referenced by small `Copy` ids. State collections are keyed by these ids
//! (flat maps) instead of nesting objects inside each other, so snapshots
//! share structure and updates touch only the entries they change.
//!
//! ## Usage
//!
//! ```
//! use golf_rpg::core::{ActorId, OrimId};
//!
//! let hero = ActorId::new(1);
//! assert_eq!(hero.raw(), 1);
//! assert_eq!(format!("{}", hero), "Actor(1)");
//! assert_eq!(format!("{}", OrimId::new(7)), "Orim(7)");
//! ```

use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            /// Create a new id.
            #[must_use]
            pub const fn new(id: u32) -> Self {
                Self(id)
            }

            /// Get the raw id value.
            #[must_use]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

id_type!(
    /// A combat participant: party member, roster entry or enemy.
    ///
    /// Actor ids are allocated by the session; the definition an actor was
    /// spawned from is kept separately as [`ActorDefId`].
    ActorId,
    "Actor"
);

id_type!(
    /// Static actor definition in the catalog.
    ActorDefId,
    "ActorDef"
);

id_type!(
    /// Slot in an actor's ability deck.
    DeckCardId,
    "DeckCard"
);

id_type!(
    /// Orim (ability/modifier) definition in the catalog.
    OrimId,
    "Orim"
);

id_type!(
    /// Runtime handle binding an orim definition to a slot.
    OrimInstanceId,
    "OrimInstance"
);

id_type!(
    /// Relic definition in the catalog.
    RelicId,
    "Relic"
);

id_type!(
    /// Biome definition in the catalog.
    BiomeId,
    "Biome"
);

id_type!(
    /// Scheduled damage-over-time entry.
    DotId,
    "Dot"
);

id_type!(
    /// Runtime-only hand card that is not backed by a deck slot.
    TransientId,
    "Transient"
);

/// Monotonic allocator for runtime ids.
///
/// Lives inside the session state, so a rewound snapshot also rewinds the
/// counters and replays allocate the same ids.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdAllocator {
    next_actor: u32,
    next_deck_card: u32,
    next_instance: u32,
    next_dot: u32,
    next_transient: u32,
}

impl IdAllocator {
    /// Create an allocator starting every counter at 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_actor: 1,
            next_deck_card: 1,
            next_instance: 1,
            next_dot: 1,
            next_transient: 1,
        }
    }

    pub fn actor(&mut self) -> ActorId {
        ActorId(bump(&mut self.next_actor))
    }

    pub fn deck_card(&mut self) -> DeckCardId {
        DeckCardId(bump(&mut self.next_deck_card))
    }

    pub fn orim_instance(&mut self) -> OrimInstanceId {
        OrimInstanceId(bump(&mut self.next_instance))
    }

    pub fn dot(&mut self) -> DotId {
        DotId(bump(&mut self.next_dot))
    }

    pub fn transient(&mut self) -> TransientId {
        TransientId(bump(&mut self.next_transient))
    }
}

fn bump(counter: &mut u32) -> u32 {
    let id = *counter;
    *counter += 1;
    id
}

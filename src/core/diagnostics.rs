//! Structured diagnostics.
//!
//! Invariant problems are never errors: the command that caused them still
//! succeeds. They are reported to a host-supplied [`DiagnosticsSink`] so the
//! host decides whether to log, count, or assert on them.

use std::cell::RefCell;

use im::HashMap as ImHashMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::ids::ActorId;

/// A protected actor stat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Hp,
    Armor,
    SuperArmor,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Hp, Stat::Armor, Stat::SuperArmor];

    /// Read the stat off an actor.
    #[must_use]
    pub fn read(self, actor: &Actor) -> u32 {
        match self {
            Stat::Hp => actor.hp,
            Stat::Armor => actor.armor,
            Stat::SuperArmor => actor.super_armor,
        }
    }
}

/// Something the engine noticed but did not fail on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Diagnostic {
    /// A protected stat grew by more than any sanctioned grant.
    StatIncreased {
        actor: ActorId,
        stat: Stat,
        before: u32,
        after: u32,
        command: &'static str,
    },
    /// A tick arrived with an earlier timestamp than the last one.
    TimeWentBackwards { last_ms: u64, now_ms: u64 },
}

/// Receives diagnostics.
pub trait DiagnosticsSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards every diagnostic to `tracing::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(?diagnostic, "engine invariant report");
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    #[must_use]
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.borrow().clone()
    }

    /// Drain everything reported so far.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl DiagnosticsSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.borrow_mut().push(diagnostic);
    }
}

/// Sanctioned stat increases made during one command.
///
/// Healing, armor grants and relic bonuses record here; anything that grows
/// a protected stat without a matching grant is reported.
#[derive(Clone, Debug, Default)]
pub struct StatLedger {
    grants: FxHashMap<(ActorId, Stat), u32>,
}

impl StatLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sanctioned increase.
    pub fn grant(&mut self, actor: ActorId, stat: Stat, amount: u32) {
        *self.grants.entry((actor, stat)).or_insert(0) += amount;
    }

    /// Total granted for one stat.
    #[must_use]
    pub fn granted(&self, actor: ActorId, stat: Stat) -> u32 {
        self.grants.get(&(actor, stat)).copied().unwrap_or(0)
    }

    /// Compare actors before and after a command and report unexplained
    /// growth. Actors that only exist on one side are skipped.
    pub fn check(
        &self,
        before: &ImHashMap<ActorId, Actor>,
        after: &ImHashMap<ActorId, Actor>,
        command: &'static str,
        sink: &dyn DiagnosticsSink,
    ) {
        for (id, new) in after {
            let Some(old) = before.get(id) else {
                continue;
            };
            for stat in Stat::ALL {
                let (b, a) = (stat.read(old), stat.read(new));
                if a > b.saturating_add(self.granted(*id, stat)) {
                    sink.report(Diagnostic::StatIncreased {
                        actor: *id,
                        stat,
                        before: b,
                        after: a,
                        command,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{ActorDefinition, Catalog, Rank};
    use crate::core::ids::{ActorDefId, IdAllocator};

    fn actors() -> (ActorId, ImHashMap<ActorId, Actor>) {
        let def = ActorDefinition::new(ActorDefId(1), "Scout", Rank::ACE);
        let actor = Actor::spawn(&def, &Catalog::new(), &mut IdAllocator::new());
        let id = actor.id;
        (id, ImHashMap::unit(id, actor))
    }

    #[test]
    fn test_unsanctioned_increase_reported() {
        let (id, before) = actors();
        let mut after = before.clone();
        if let Some(actor) = after.get_mut(&id) {
            actor.armor += 3;
        }

        let sink = CollectingSink::new();
        StatLedger::new().check(&before, &after, "play", &sink);

        assert_eq!(
            sink.take(),
            vec![Diagnostic::StatIncreased {
                actor: id,
                stat: Stat::Armor,
                before: 0,
                after: 3,
                command: "play",
            }]
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_granted_increase_is_quiet() {
        let (id, before) = actors();
        let mut after = before.clone();
        if let Some(actor) = after.get_mut(&id) {
            actor.super_armor += 2;
        }

        let mut ledger = StatLedger::new();
        ledger.grant(id, Stat::SuperArmor, 2);

        let sink = CollectingSink::new();
        ledger.check(&before, &after, "play", &sink);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_decrease_is_quiet() {
        let (id, before) = actors();
        let mut after = before.clone();
        if let Some(actor) = after.get_mut(&id) {
            actor.hp -= 1;
        }

        let sink = CollectingSink::new();
        StatLedger::new().check(&before, &after, "tick", &sink);
        assert!(sink.entries().is_empty());
    }
}

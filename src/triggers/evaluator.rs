//! Trigger evaluation.
//!
//! A [`TriggerContext`] is a read-only view of the live state relevant to
//! one actor: its own numbers, every opposing actor's numbers, and a few
//! lane-wide facts. Evaluation walks the compiled AST against it.

use super::condition::{GroupMode, LeafKind, Operand, TriggerLeaf, TriggerNode, TriggerTarget};
use crate::core::actor::Actor;

/// Per-actor facts a leaf can measure.
#[derive(Clone, Copy, Debug)]
pub struct Subject<'a> {
    pub actor: &'a Actor,
    pub combo: u32,
    pub party_combo: u32,
    /// The actor's side has no golf move.
    pub no_legal_moves: bool,
}

impl<'a> Subject<'a> {
    /// A subject with zero combos and moves available.
    #[must_use]
    pub fn idle(actor: &'a Actor) -> Self {
        Self {
            actor,
            combo: 0,
            party_combo: 0,
            no_legal_moves: false,
        }
    }
}

/// Everything a trigger may look at.
#[derive(Clone, Debug)]
pub struct TriggerContext<'a> {
    /// The acting actor.
    pub subject: Subject<'a>,
    pub opponents: Vec<Subject<'a>>,
    /// Time since the last play in the combat lane.
    pub inactivity_ms: u64,
}

impl<'a> TriggerContext<'a> {
    /// A context with no opponents.
    #[must_use]
    pub fn solo(subject: Subject<'a>) -> Self {
        Self {
            subject,
            opponents: Vec::new(),
            inactivity_ms: 0,
        }
    }

    /// Evaluate a compiled trigger.
    #[must_use]
    pub fn evaluate(&self, node: &TriggerNode) -> bool {
        match node {
            TriggerNode::Leaf(leaf) => self.visit_leaf(leaf),
            TriggerNode::Group {
                mode,
                negate,
                children,
            } => {
                let result = match mode {
                    GroupMode::All => children.iter().all(|c| self.evaluate(c)),
                    GroupMode::Any => children.iter().any(|c| self.evaluate(c)),
                };
                result != *negate
            }
        }
    }

    fn visit_leaf(&self, leaf: &TriggerLeaf) -> bool {
        // Decided by the hand's return gate.
        if leaf.kind == LeafKind::NotYetReturned {
            return true;
        }
        let on_self = || self.check(leaf, &self.subject);
        let on_enemy = || self.opponents.iter().any(|o| self.check(leaf, o));
        match leaf.target {
            TriggerTarget::SelfActor => on_self(),
            TriggerTarget::Enemy => on_enemy(),
            TriggerTarget::Either => on_self() || on_enemy(),
        }
    }

    fn check(&self, leaf: &TriggerLeaf, subject: &Subject<'_>) -> bool {
        let lhs = self.measure(leaf.kind, subject);
        let rhs = match leaf.value {
            Some(Operand::Literal(v)) => v,
            Some(Operand::Field(field)) => field.read(self.subject.actor),
            None => f64::from(subject.actor.power_max),
        };
        leaf.op.compare(lhs, rhs)
    }

    fn measure(&self, kind: LeafKind, subject: &Subject<'_>) -> f64 {
        let actor = subject.actor;
        let flag = |b: bool| if b { 1.0 } else { 0.0 };
        match kind {
            LeafKind::NoLegalMoves => flag(subject.no_legal_moves),
            LeafKind::HpPercent => actor.hp_percent(),
            LeafKind::Ko => flag(actor.is_knocked_out()),
            LeafKind::HasArmor => flag(actor.armor > 0),
            LeafKind::HasSuperArmor => flag(actor.super_armor > 0),
            LeafKind::InactivitySeconds => self.inactivity_ms as f64 / 1_000.0,
            LeafKind::Combo => f64::from(subject.combo),
            LeafKind::PartyCombo => f64::from(subject.party_combo),
            LeafKind::DiscardCount => actor.deck.discarded_count() as f64,
            LeafKind::ActiveDeckCount => actor.deck.active_count() as f64,
            LeafKind::NotYetReturned => 1.0,
        }
    }
}

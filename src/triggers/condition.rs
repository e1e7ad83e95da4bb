//! Trigger conditions: authoring form and compiled AST.
//!
//! Content authors write triggers as loosely-typed records ([`RawTrigger`]):
//! string type ids in any case or separator style, optional operators and
//! values. [`TriggerNode::compile`] turns them into a typed AST once, at
//! catalog load, so evaluation never touches strings.
//!
//! ## Grammar
//!
//! ```text
//! node  := group | leaf
//! group := { "op": "and" | "or", "not": bool?, "conditions": [node, ...] }
//! leaf  := { "type": kind, "target": target?, "operator": op?, "value": value? }
//! value := number | bool | field-name
//! ```
//!
//! ## Example
//!
//! ```
//! use golf_rpg::triggers::{Comparison, LeafKind, RawTrigger, TriggerNode};
//!
//! let raw: RawTrigger = serde_json::from_str(
//!     r#"{ "op": "or", "conditions": [
//!         { "type": "HP_Percent", "operator": "<", "value": 30 },
//!         { "type": "no-legal-moves" }
//!     ] }"#,
//! ).unwrap();
//!
//! let node = TriggerNode::compile(&raw).unwrap();
//! let TriggerNode::Group { children, .. } = node else { panic!() };
//! let TriggerNode::Leaf(first) = &children[0] else { panic!() };
//! assert_eq!(first.kind, LeafKind::HpPercent);
//! assert_eq!(first.op, Comparison::Lt);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::actor::Actor;

// === Compiled AST ===

/// A comparison operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    /// Apply the comparison.
    #[must_use]
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        const EPSILON: f64 = 1e-9;
        match self {
            Comparison::Lt => lhs < rhs,
            Comparison::Le => lhs <= rhs + EPSILON,
            Comparison::Gt => lhs > rhs,
            Comparison::Ge => lhs + EPSILON >= rhs,
            Comparison::Eq => (lhs - rhs).abs() < EPSILON,
            Comparison::Ne => (lhs - rhs).abs() >= EPSILON,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        let op = raw.trim().to_ascii_lowercase();
        Some(match op.as_str() {
            "<" | "lt" => Comparison::Lt,
            "<=" | "le" | "lte" => Comparison::Le,
            ">" | "gt" => Comparison::Gt,
            ">=" | "ge" | "gte" => Comparison::Ge,
            "=" | "==" | "eq" => Comparison::Eq,
            "!=" | "<>" | "ne" | "neq" => Comparison::Ne,
            _ => return None,
        })
    }
}

/// Which actor(s) a leaf checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerTarget {
    /// The acting actor.
    #[default]
    SelfActor,
    /// Any opposing actor.
    Enemy,
    /// The acting actor or any opposing actor.
    Either,
}

/// What a leaf measures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeafKind {
    /// The side has no golf move left.
    NoLegalMoves,
    /// Current hp as a percentage of max.
    HpPercent,
    /// Knocked out.
    Ko,
    HasArmor,
    HasSuperArmor,
    /// Seconds since the last play in the combat lane.
    InactivitySeconds,
    /// The actor's own combo.
    Combo,
    /// Combined combo of the actor's side.
    PartyCombo,
    /// Deck cards in the discard pile.
    DiscardCount,
    /// Deck cards not in the discard pile.
    ActiveDeckCount,
    /// The card being offered has never come back from the discard pile.
    NotYetReturned,
}

impl LeafKind {
    /// Leaves that measure a yes/no fact.
    #[must_use]
    pub fn is_boolean(self) -> bool {
        matches!(
            self,
            LeafKind::NoLegalMoves
                | LeafKind::Ko
                | LeafKind::HasArmor
                | LeafKind::HasSuperArmor
                | LeafKind::NotYetReturned
        )
    }

    /// Operator used when the author gives none.
    #[must_use]
    pub fn default_comparison(self) -> Comparison {
        match self {
            LeafKind::HpPercent | LeafKind::ActiveDeckCount => Comparison::Le,
            LeafKind::Combo
            | LeafKind::PartyCombo
            | LeafKind::DiscardCount
            | LeafKind::InactivitySeconds => Comparison::Ge,
            _ => Comparison::Eq,
        }
    }

    fn parse(normalized: &str) -> Option<Self> {
        Some(match normalized {
            "nolegalmoves" | "nomoves" | "nolegalmove" => LeafKind::NoLegalMoves,
            "hppercent" | "hppct" | "hp%" | "healthpercent" => LeafKind::HpPercent,
            "ko" | "knockedout" => LeafKind::Ko,
            "hasarmor" | "armor" => LeafKind::HasArmor,
            "hassuperarmor" | "superarmor" => LeafKind::HasSuperArmor,
            "inactivity" | "inactivityseconds" | "idle" | "idleseconds" => {
                LeafKind::InactivitySeconds
            }
            "combo" => LeafKind::Combo,
            "partycombo" => LeafKind::PartyCombo,
            "discardcount" | "discard" | "discardpile" => LeafKind::DiscardCount,
            "activedeckcount" | "activedeck" | "deckcount" => LeafKind::ActiveDeckCount,
            "notyetreturned" | "notreturned" => LeafKind::NotYetReturned,
            _ => return None,
        })
    }
}

/// An actor stat a leaf can compare against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldRef {
    Hp,
    HpMax,
    Armor,
    SuperArmor,
    Defense,
    Evasion,
    Accuracy,
    Power,
    PowerMax,
    Energy,
    Stamina,
    StaminaMax,
}

impl FieldRef {
    /// Read the field off an actor.
    #[must_use]
    pub fn read(self, actor: &Actor) -> f64 {
        f64::from(match self {
            FieldRef::Hp => actor.hp,
            FieldRef::HpMax => actor.hp_max,
            FieldRef::Armor => actor.armor,
            FieldRef::SuperArmor => actor.super_armor,
            FieldRef::Defense => actor.defense,
            FieldRef::Evasion => actor.evasion,
            FieldRef::Accuracy => actor.accuracy,
            FieldRef::Power => actor.power,
            FieldRef::PowerMax => actor.power_max,
            FieldRef::Energy => actor.energy,
            FieldRef::Stamina => actor.stamina,
            FieldRef::StaminaMax => actor.stamina_max,
        })
    }

    fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix("self.")
            .or_else(|| trimmed.strip_prefix("Self."))
            .unwrap_or(trimmed);
        Some(match normalize(trimmed).as_str() {
            "hp" => FieldRef::Hp,
            "hpmax" | "maxhp" => FieldRef::HpMax,
            "armor" => FieldRef::Armor,
            "superarmor" => FieldRef::SuperArmor,
            "defense" => FieldRef::Defense,
            "evasion" => FieldRef::Evasion,
            "accuracy" => FieldRef::Accuracy,
            "power" => FieldRef::Power,
            "powermax" | "maxpower" => FieldRef::PowerMax,
            "energy" => FieldRef::Energy,
            "stamina" => FieldRef::Stamina,
            "staminamax" | "maxstamina" => FieldRef::StaminaMax,
            _ => return None,
        })
    }
}

/// Right-hand side of a leaf comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Operand {
    Literal(f64),
    /// A stat of the acting actor.
    Field(FieldRef),
}

/// A single comparison.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TriggerLeaf {
    pub kind: LeafKind,
    pub target: TriggerTarget,
    pub op: Comparison,
    /// `None` only for combo leaves, which fall back to the power ceiling.
    pub value: Option<Operand>,
}

impl TriggerLeaf {
    /// A leaf with the kind's default operator and value.
    #[must_use]
    pub fn new(kind: LeafKind) -> Self {
        Self {
            kind,
            target: TriggerTarget::SelfActor,
            op: kind.default_comparison(),
            value: kind.is_boolean().then_some(Operand::Literal(1.0)),
        }
    }

    /// Check a different actor.
    #[must_use]
    pub fn on(mut self, target: TriggerTarget) -> Self {
        self.target = target;
        self
    }

    /// Compare against a literal.
    #[must_use]
    pub fn compare(mut self, op: Comparison, value: f64) -> Self {
        self.op = op;
        self.value = Some(Operand::Literal(value));
        self
    }

    /// Compare against a stat of the acting actor.
    #[must_use]
    pub fn compare_field(mut self, op: Comparison, field: FieldRef) -> Self {
        self.op = op;
        self.value = Some(Operand::Field(field));
        self
    }
}

/// How a group combines its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupMode {
    All,
    Any,
}

/// Compiled trigger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum TriggerNode {
    Leaf(TriggerLeaf),
    Group {
        mode: GroupMode,
        negate: bool,
        children: Vec<TriggerNode>,
    },
}

impl TriggerNode {
    /// All children must hold.
    #[must_use]
    pub fn all(children: Vec<TriggerNode>) -> Self {
        TriggerNode::Group {
            mode: GroupMode::All,
            negate: false,
            children,
        }
    }

    /// At least one child must hold.
    #[must_use]
    pub fn any(children: Vec<TriggerNode>) -> Self {
        TriggerNode::Group {
            mode: GroupMode::Any,
            negate: false,
            children,
        }
    }

    /// Negate this node.
    #[must_use]
    pub fn not(self) -> Self {
        match self {
            TriggerNode::Group {
                mode,
                negate,
                children,
            } => TriggerNode::Group {
                mode,
                negate: !negate,
                children,
            },
            leaf => TriggerNode::Group {
                mode: GroupMode::All,
                negate: true,
                children: vec![leaf],
            },
        }
    }

    /// Does a card that has (or has not) come back from the discard pile
    /// pass this trigger's return gate?
    ///
    /// Every `NotYetReturned` leaf must hold on its own, whatever group it
    /// sits in. [`TriggerContext::evaluate`](super::TriggerContext::evaluate)
    /// treats those leaves as satisfied.
    #[must_use]
    pub fn passes_return_gate(&self, returned: bool) -> bool {
        match self {
            TriggerNode::Leaf(leaf) if leaf.kind == LeafKind::NotYetReturned => {
                let rhs = match leaf.value {
                    Some(Operand::Literal(v)) => v,
                    _ => 1.0,
                };
                leaf.op.compare(if returned { 0.0 } else { 1.0 }, rhs)
            }
            TriggerNode::Leaf(_) => true,
            TriggerNode::Group { children, .. } => children.iter().all(|c| c.passes_return_gate(returned)),
        }
    }

    /// Compile an authored trigger.
    pub fn compile(raw: &RawTrigger) -> Result<Self, TriggerCompileError> {
        match raw {
            RawTrigger::Group(group) => compile_group(group),
            RawTrigger::Leaf(leaf) => compile_leaf(leaf).map(TriggerNode::Leaf),
        }
    }
}

impl From<TriggerLeaf> for TriggerNode {
    fn from(leaf: TriggerLeaf) -> Self {
        TriggerNode::Leaf(leaf)
    }
}

// === Authoring form ===

/// Authored trigger, as read from content files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTrigger {
    Group(RawGroup),
    Leaf(RawLeaf),
}

/// Authored boolean group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawGroup {
    /// `"and"` (default) or `"or"`.
    #[serde(default, alias = "group", alias = "mode")]
    pub op: Option<String>,
    #[serde(default, alias = "negate")]
    pub not: bool,
    pub conditions: Vec<RawTrigger>,
}

/// Authored leaf.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawLeaf {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default, alias = "op")]
    pub operator: Option<String>,
    #[serde(default)]
    pub value: Option<RawValue>,
}

/// Authored comparison value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Field(String),
}

/// Why an authored trigger did not compile.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TriggerCompileError {
    #[error("unknown trigger type {0:?}")]
    UnknownLeaf(String),

    #[error("unknown comparison operator {0:?}")]
    UnknownOperator(String),

    #[error("unknown trigger target {0:?}")]
    UnknownTarget(String),

    #[error("unknown actor field {0:?}")]
    UnknownField(String),

    #[error("unknown group combinator {0:?}")]
    UnknownGroup(String),

    #[error("{0:?} trigger needs a value")]
    MissingValue(LeafKind),

    #[error("trigger group has no conditions")]
    EmptyGroup,
}

/// Lowercase and drop `_`, `-` and spaces.
fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn compile_group(group: &RawGroup) -> Result<TriggerNode, TriggerCompileError> {
    let mode = match group.op.as_deref().map(normalize).as_deref() {
        None | Some("and") | Some("all") | Some("&&") => GroupMode::All,
        Some("or") | Some("any") | Some("||") => GroupMode::Any,
        Some(other) => return Err(TriggerCompileError::UnknownGroup(other.to_string())),
    };
    if group.conditions.is_empty() {
        return Err(TriggerCompileError::EmptyGroup);
    }

    let children = group
        .conditions
        .iter()
        .map(TriggerNode::compile)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(TriggerNode::Group {
        mode,
        negate: group.not,
        children,
    })
}

fn compile_leaf(raw: &RawLeaf) -> Result<TriggerLeaf, TriggerCompileError> {
    let kind = LeafKind::parse(&normalize(&raw.kind))
        .ok_or_else(|| TriggerCompileError::UnknownLeaf(raw.kind.clone()))?;

    let target = match raw.target.as_deref().map(normalize).as_deref() {
        None | Some("self") | Some("actor") | Some("me") => TriggerTarget::SelfActor,
        Some("enemy") | Some("opponent") | Some("foe") => TriggerTarget::Enemy,
        Some("either") | Some("any") | Some("both") => TriggerTarget::Either,
        Some(_) => {
            return Err(TriggerCompileError::UnknownTarget(
                raw.target.clone().unwrap_or_default(),
            ))
        }
    };

    let op = match &raw.operator {
        Some(op) => {
            Comparison::parse(op).ok_or_else(|| TriggerCompileError::UnknownOperator(op.clone()))?
        }
        None => kind.default_comparison(),
    };

    let value = match &raw.value {
        Some(RawValue::Bool(b)) => Some(Operand::Literal(if *b { 1.0 } else { 0.0 })),
        Some(RawValue::Number(n)) => Some(Operand::Literal(*n)),
        Some(RawValue::Field(name)) => Some(Operand::Field(
            FieldRef::parse(name).ok_or_else(|| TriggerCompileError::UnknownField(name.clone()))?,
        )),
        None if kind.is_boolean() => Some(Operand::Literal(1.0)),
        None if matches!(kind, LeafKind::Combo | LeafKind::PartyCombo) => None,
        None => return Err(TriggerCompileError::MissingValue(kind)),
    };

    Ok(TriggerLeaf {
        kind,
        target,
        op,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(json: &str) -> Result<TriggerNode, TriggerCompileError> {
        let raw: RawTrigger = serde_json::from_str(json).unwrap();
        TriggerNode::compile(&raw)
    }

    fn leaf(json: &str) -> TriggerLeaf {
        match compile(json).unwrap() {
            TriggerNode::Leaf(leaf) => leaf,
            other => panic!("Expected leaf, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_styles() {
        for name in ["hpPercent", "HP_PERCENT", "hp-percent", "Hp Percent"] {
            let json = format!(r#"{{ "type": "{}", "value": 10 }}"#, name);
            assert_eq!(leaf(&json).kind, LeafKind::HpPercent);
        }
    }

    #[test]
    fn test_default_operators() {
        assert_eq!(leaf(r#"{ "type": "ko" }"#).op, Comparison::Eq);
        assert_eq!(leaf(r#"{ "type": "hp_percent", "value": 50 }"#).op, Comparison::Le);
        assert_eq!(leaf(r#"{ "type": "combo" }"#).op, Comparison::Ge);
        assert_eq!(leaf(r#"{ "type": "active_deck_count", "value": 1 }"#).op, Comparison::Le);
    }

    #[test]
    fn test_boolean_default_value() {
        let ko = leaf(r#"{ "type": "KO", "target": "enemy" }"#);
        assert_eq!(ko.value, Some(Operand::Literal(1.0)));
        assert_eq!(ko.target, TriggerTarget::Enemy);

        let not_ko = leaf(r#"{ "type": "KO", "value": false }"#);
        assert_eq!(not_ko.value, Some(Operand::Literal(0.0)));
    }

    #[test]
    fn test_combo_without_value() {
        assert_eq!(leaf(r#"{ "type": "party_combo" }"#).value, None);
    }

    #[test]
    fn test_field_operand() {
        let l = leaf(r#"{ "type": "combo", "operator": ">=", "value": "self.power_max" }"#);
        assert_eq!(l.value, Some(Operand::Field(FieldRef::PowerMax)));
    }

    #[test]
    fn test_nested_groups() {
        let node = compile(
            r#"{ "op": "AND", "not": true, "conditions": [
                { "type": "has_armor" },
                { "group": "or", "conditions": [ { "type": "ko", "target": "either" } ] }
            ] }"#,
        )
        .unwrap();

        match node {
            TriggerNode::Group {
                mode,
                negate,
                children,
            } => {
                assert_eq!(mode, GroupMode::All);
                assert!(negate);
                assert_eq!(children.len(), 2);
                assert!(matches!(
                    children[1],
                    TriggerNode::Group {
                        mode: GroupMode::Any,
                        ..
                    }
                ));
            }
            other => panic!("Expected group, got {:?}", other),
        }
    }

    #[test]
    fn test_compile_errors() {
        assert_eq!(
            compile(r#"{ "type": "moon_phase" }"#),
            Err(TriggerCompileError::UnknownLeaf("moon_phase".into()))
        );
        assert_eq!(
            compile(r#"{ "type": "combo", "operator": "~" }"#),
            Err(TriggerCompileError::UnknownOperator("~".into()))
        );
        assert_eq!(
            compile(r#"{ "type": "ko", "target": "referee" }"#),
            Err(TriggerCompileError::UnknownTarget("referee".into()))
        );
        assert_eq!(
            compile(r#"{ "type": "combo", "value": "luck" }"#),
            Err(TriggerCompileError::UnknownField("luck".into()))
        );
        assert_eq!(
            compile(r#"{ "type": "hp_percent" }"#),
            Err(TriggerCompileError::MissingValue(LeafKind::HpPercent))
        );
        assert_eq!(
            compile(r#"{ "op": "xor", "conditions": [ { "type": "ko" } ] }"#),
            Err(TriggerCompileError::UnknownGroup("xor".into()))
        );
        assert_eq!(compile(r#"{ "conditions": [] }"#), Err(TriggerCompileError::EmptyGroup));
    }

    #[test]
    fn test_comparison_edges() {
        assert!(Comparison::Le.compare(25.0, 25.0));
        assert!(!Comparison::Lt.compare(25.0, 25.0));
        assert!(Comparison::Ne.compare(1.0, 0.0));
        assert!(Comparison::Eq.compare(0.1 + 0.2, 0.3));
    }

    #[test]
    fn test_not_wraps_leaf() {
        let node = TriggerNode::from(TriggerLeaf::new(LeafKind::Ko)).not();
        assert!(matches!(node, TriggerNode::Group { negate: true, .. }));
    }
}

//! Declarative ability triggers.
//!
//! Orims may carry a trigger that gates when their card is offered in
//! hand. Triggers are authored as [`RawTrigger`] records, compiled once
//! into a [`TriggerNode`] AST, and evaluated against a [`TriggerContext`].
//!
//! ## Example Usage
//!
//! ```
//! use golf_rpg::cards::{ActorDefinition, Catalog, Rank};
//! use golf_rpg::core::{Actor, ActorDefId, IdAllocator};
//! use golf_rpg::triggers::{RawTrigger, Subject, TriggerContext, TriggerNode};
//!
//! let raw: RawTrigger = serde_json::from_str(r#"{ "type": "has_armor", "value": false }"#).unwrap();
//! let trigger = TriggerNode::compile(&raw).unwrap();
//!
//! let def = ActorDefinition::new(ActorDefId::new(1), "Squire", Rank::ACE);
//! let squire = Actor::spawn(&def, &Catalog::new(), &mut IdAllocator::new());
//!
//! let ctx = TriggerContext::solo(Subject::idle(&squire));
//! assert!(ctx.evaluate(&trigger));
//! ```

mod condition;
mod evaluator;

pub use condition::{
    Comparison, FieldRef, GroupMode, LeafKind, Operand, RawGroup, RawLeaf, RawTrigger, RawValue,
    TriggerCompileError, TriggerLeaf, TriggerNode, TriggerTarget,
};
pub use evaluator::{Subject, TriggerContext};

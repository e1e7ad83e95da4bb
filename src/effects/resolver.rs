//! Effect resolution: applying effects to live state.
//!
//! The resolver works on a [`Scene`], a bundle of mutable borrows into the
//! state being built by a command. Every stat grant it makes is recorded in
//! the scene's [`StatLedger`] so the post-command audit can tell sanctioned
//! growth from a bug.

use super::damage::{
    apply_damage_to_actor, build_damage_packet, resolve_packet_total, roll_hit, DamageOutcome, DamagePacket,
    HitRoll,
};
use super::effect::{Effect, EffectKind, TargetSelector};
use super::targeting::{select_targets, Rosters, Targets};
use crate::cards::Catalog;
use crate::combat::{CombatState, DotEntry, ExpiringBuff, TimedDebuff};
use crate::core::config::EngineConfig;
use crate::core::diagnostics::{Stat, StatLedger};
use crate::core::ids::{ActorId, DeckCardId};
use crate::core::side::Side;
use crate::core::state::CoreState;
use crate::zones::{Board, TransientCard};

/// Mutable view of the state a command is building.
pub struct Scene<'a> {
    pub core: &'a mut CoreState,
    pub board: &'a mut Board,
    pub combat: Option<&'a mut CombatState>,
    pub ledger: &'a mut StatLedger,
    pub catalog: &'a Catalog,
    pub config: &'a EngineConfig,
    pub now_ms: u64,
}

/// Who is resolving effects, and from where.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSource {
    pub side: Side,
    pub actor: ActorId,
    /// Foundation the source card landed on.
    pub foundation: usize,
    /// Deck card the effects came from, for replay expiry.
    pub deck_card: Option<DeckCardId>,
    /// Force every effect onto the source actor.
    pub self_target_only: bool,
}

/// What a batch of effects did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResolutionReport {
    pub damage_dealt: u32,
    pub healed: u32,
    pub misses: u32,
    pub cards_drawn: u32,
    pub dots_applied: u32,
}

impl<'a> Scene<'a> {
    fn roster_ids(&self, side: Side) -> Vec<ActorId> {
        match side {
            Side::Player => self.core.party.iter().copied().collect(),
            Side::Enemy => self
                .combat
                .as_ref()
                .map(|c| c.enemies.iter().copied().collect())
                .unwrap_or_default(),
        }
    }

    fn targets(&self, selector: TargetSelector, source: &EffectSource) -> Targets {
        let selector = if source.self_target_only {
            TargetSelector::SelfActor
        } else {
            selector
        };
        let allies = self.roster_ids(source.side);
        let enemies = self.roster_ids(source.side.opponent());
        let rosters = Rosters {
            allies: &allies,
            enemies: &enemies,
            actors: &self.core.actors,
        };
        select_targets(selector, source.actor, source.foundation, &rosters)
    }

    /// Resolve a batch of effects in order. Damage effects sharing a
    /// selector are combined into one packet per target.
    pub fn resolve(&mut self, source: &EffectSource, effects: &[Effect]) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        if let Some(deck_card) = source.deck_card {
            self.expire_buffs(deck_card);
        }

        let mut damage_selectors: Vec<TargetSelector> = Vec::new();
        for effect in effects.iter().filter(|e| e.kind.is_damage()) {
            if !damage_selectors.contains(&effect.target) {
                damage_selectors.push(effect.target);
            }
        }
        for selector in damage_selectors {
            let group: Vec<Effect> = effects
                .iter()
                .filter(|e| e.kind.is_damage() && e.target == selector)
                .copied()
                .collect();
            let packet = build_damage_packet(0, &group);
            for target in self.targets(selector, source) {
                match self.strike(source.actor, target, &packet) {
                    (HitRoll::Miss, _) => report.misses += 1,
                    (_, outcome) => report.damage_dealt += outcome.hp_lost,
                }
            }
        }

        for effect in effects.iter().filter(|e| !e.kind.is_damage()) {
            self.apply(source, effect, &mut report);
        }
        report
    }

    /// Hit `target` with a packet from `attacker`.
    pub fn strike(&mut self, attacker: ActorId, target: ActorId, packet: &DamagePacket) -> (HitRoll, DamageOutcome) {
        if packet.is_empty() {
            return (HitRoll::Hit, DamageOutcome::default());
        }
        let accuracy = self.core.actors.get(&attacker).map_or(0, |a| a.accuracy);
        let Some(defender) = self.core.actors.get_mut(&target) else {
            tracing::debug!(%target, "strike against unknown actor ignored");
            return (HitRoll::Miss, DamageOutcome::default());
        };

        let total = resolve_packet_total(packet, defender.element, self.catalog.type_chart());
        let roll = roll_hit(accuracy, defender.evasion, self.config, &mut self.core.combat_rng);
        let outcome = apply_damage_to_actor(defender, roll.scale(total));
        tracing::debug!(%attacker, %target, total, ?roll, hp_lost = outcome.hp_lost, "strike");
        (roll, outcome)
    }

    /// Hit the enemy facing the source's foundation. `None` when no enemy
    /// is standing.
    pub fn strike_facing(&mut self, source: &EffectSource, packet: &DamagePacket) -> Option<(HitRoll, DamageOutcome)> {
        let target = self.targets(TargetSelector::Enemy, source).first().copied()?;
        Some(self.strike(source.actor, target, packet))
    }

    fn apply(&mut self, source: &EffectSource, effect: &Effect, report: &mut ResolutionReport) {
        let amount = effect.magnitude;
        match effect.kind {
            EffectKind::Damage => {}
            EffectKind::Armor | EffectKind::SuperArmor | EffectKind::Defense | EffectKind::Evasion => {
                for target in self.targets(effect.target, source) {
                    self.grant_stat(target, effect.kind, amount);
                    if effect.expires_on_replay {
                        if let (Some(deck_card), Some(combat)) = (source.deck_card, self.combat.as_deref_mut()) {
                            combat.buffs.push_back(ExpiringBuff {
                                source: deck_card,
                                target,
                                kind: effect.kind,
                                amount,
                            });
                        }
                    }
                }
            }
            EffectKind::Healing => {
                for target in self.targets(effect.target, source) {
                    if let Some(actor) = self.core.actors.get_mut(&target) {
                        let healed = actor.heal(amount);
                        self.ledger.grant(target, Stat::Hp, healed);
                        report.healed += healed;
                    }
                }
            }
            EffectKind::Draw => {
                for _ in 0..amount {
                    let Ok(card) = self.board.take_from_stock(source.side) else {
                        break;
                    };
                    let id = self.core.ids.transient();
                    self.board.lane_mut(source.side).hand.push_back(TransientCard { id, card });
                    report.cards_drawn += 1;
                }
            }
            EffectKind::Redeal => {
                self.board.redeal_tableaus(source.side, &mut self.core.rng);
            }
            EffectKind::DamageOverTime { ticks, interval_ms, kind } => {
                if ticks == 0 || amount == 0 {
                    return;
                }
                let accuracy = self.core.actors.get(&source.actor).map_or(0, |a| a.accuracy);
                let interval = interval_ms.unwrap_or(self.config.dot_interval_ms).max(1);
                let targets = self.targets(effect.target, source);
                let Some(combat) = self.combat.as_deref_mut() else {
                    return;
                };
                for target in targets {
                    combat.dots.push_back(DotEntry {
                        id: self.core.ids.dot(),
                        target,
                        damage_per_tick: amount,
                        remaining_ticks: ticks,
                        initial_ticks: ticks,
                        next_tick_at: self.now_ms + interval,
                        interval_ms: interval,
                        kind,
                        source_accuracy: accuracy,
                    });
                    report.dots_applied += 1;
                }
            }
            EffectKind::Slow { duration_ms, factor_pct } => {
                let duration = duration_ms.unwrap_or(self.config.slow_duration_ms);
                if let Some(combat) = self.combat.as_deref_mut() {
                    combat.apply_slow(
                        source.side.opponent(),
                        TimedDebuff {
                            until_ms: self.now_ms + duration,
                            factor_pct,
                        },
                    );
                }
            }
            EffectKind::Ordering(rule) => {
                self.board.lane_mut(source.side).rules.push_back(rule);
            }
        }
    }

    fn grant_stat(&mut self, target: ActorId, kind: EffectKind, amount: u32) {
        let Some(actor) = self.core.actors.get_mut(&target) else {
            return;
        };
        match kind {
            EffectKind::Armor => {
                actor.armor += amount;
                self.ledger.grant(target, Stat::Armor, amount);
            }
            EffectKind::SuperArmor => {
                actor.super_armor += amount;
                self.ledger.grant(target, Stat::SuperArmor, amount);
            }
            EffectKind::Defense => actor.defense += amount,
            EffectKind::Evasion => actor.evasion += amount,
            _ => {}
        }
    }

    /// Undo stat grants from a previous play of `deck_card`.
    fn expire_buffs(&mut self, deck_card: DeckCardId) {
        let Some(combat) = self.combat.as_deref_mut() else {
            return;
        };
        let (expired, kept): (Vec<ExpiringBuff>, Vec<ExpiringBuff>) =
            combat.buffs.iter().copied().partition(|b| b.source == deck_card);
        if expired.is_empty() {
            return;
        }
        combat.buffs = kept.into_iter().collect();

        for buff in expired {
            let Some(actor) = self.core.actors.get_mut(&buff.target) else {
                continue;
            };
            let stat = match buff.kind {
                EffectKind::Armor => &mut actor.armor,
                EffectKind::SuperArmor => &mut actor.super_armor,
                EffectKind::Defense => &mut actor.defense,
                EffectKind::Evasion => &mut actor.evasion,
                _ => continue,
            };
            *stat = stat.saturating_sub(buff.amount);
        }
    }
}

//! Effect targeting.
//!
//! Target selection is a pure function of the selector, the source actor
//! and the two rosters. Knocked-out actors are never selected.

use im::HashMap as ImHashMap;
use smallvec::SmallVec;

use super::effect::TargetSelector;
use crate::core::actor::Actor;
use crate::core::ids::ActorId;

/// Resolved targets. Most selectors pick one actor.
pub type Targets = SmallVec<[ActorId; 4]>;

/// Who is on which side, from the source's point of view.
#[derive(Clone, Copy, Debug)]
pub struct Rosters<'a> {
    /// The source's side, in foundation order.
    pub allies: &'a [ActorId],
    /// The opposing side, in foundation order.
    pub enemies: &'a [ActorId],
    pub actors: &'a ImHashMap<ActorId, Actor>,
}

impl<'a> Rosters<'a> {
    fn alive(&self, id: ActorId) -> bool {
        self.actors.get(&id).is_some_and(Actor::is_alive)
    }

    fn living(&self, ids: &[ActorId]) -> Targets {
        ids.iter().copied().filter(|&id| self.alive(id)).collect()
    }
}

/// Select targets for an effect.
///
/// `foundation` is the index the source card landed on; the facing enemy
/// is the one at the same index.
#[must_use]
pub fn select_targets(
    selector: TargetSelector,
    source: ActorId,
    foundation: usize,
    rosters: &Rosters<'_>,
) -> Targets {
    match selector {
        TargetSelector::SelfActor => {
            if rosters.alive(source) {
                SmallVec::from_elem(source, 1)
            } else {
                SmallVec::new()
            }
        }
        TargetSelector::Ally => most_wounded_ally(source, rosters).into_iter().collect(),
        TargetSelector::AllAllies => rosters.living(rosters.allies),
        TargetSelector::Enemy => facing_enemy(foundation, rosters).into_iter().collect(),
        TargetSelector::AllEnemies => rosters.living(rosters.enemies),
        TargetSelector::Anyone => {
            let mut targets = rosters.living(rosters.allies);
            targets.extend(rosters.living(rosters.enemies));
            targets
        }
    }
}

/// The living enemy at `foundation`, or the first living enemy.
#[must_use]
pub fn facing_enemy(foundation: usize, rosters: &Rosters<'_>) -> Option<ActorId> {
    rosters
        .enemies
        .get(foundation)
        .copied()
        .filter(|&id| rosters.alive(id))
        .or_else(|| rosters.living(rosters.enemies).first().copied())
}

/// The living ally with the lowest hp percentage, preferring anyone but
/// the source.
fn most_wounded_ally(source: ActorId, rosters: &Rosters<'_>) -> Option<ActorId> {
    let pick = |exclude_source: bool| {
        rosters
            .living(rosters.allies)
            .into_iter()
            .filter(|&id| !exclude_source || id != source)
            .filter_map(|id| rosters.actors.get(&id))
            .min_by(|a, b| a.hp_percent().total_cmp(&b.hp_percent()))
            .map(|a| a.id)
    };
    pick(true).or_else(|| pick(false))
}

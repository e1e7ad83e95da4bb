//! Combat flow tests.
//!
//! These drive the engine through whole turns:
//! - Ability cards resolving against live actors
//! - Deck cards leaving and re-entering hand
//! - Damage over time on the host's clock
//! - Trigger-gated cards

mod common;

use common::*;
use golf_rpg::core::{Command, GameState, HandCardRef, OrimId, Rejection, Side};
use golf_rpg::reducer::Engine;

fn tableau(tableau: usize) -> Command {
    Command::PlayFromTableau {
        side: Side::Player,
        tableau,
        foundation: 0,
    }
}

fn deck_play(engine: &Engine<'_>, state: &GameState, orim: OrimId, now_ms: u64) -> Command {
    let held = engine
        .hand(state, Side::Player, now_ms)
        .into_iter()
        .find(|h| h.card.ability == Some(orim))
        .expect("card should be in hand");
    Command::PlayFromHand {
        side: Side::Player,
        card: held.source,
        foundation: 0,
    }
}

fn in_hand(engine: &Engine<'_>, state: &GameState, orim: OrimId, now_ms: u64) -> bool {
    engine
        .hand(state, Side::Player, now_ms)
        .iter()
        .any(|h| h.card.ability == Some(orim))
}

/// Healing with no enemy side clamps at max hp.
#[test]
fn test_self_heal_clamps_with_empty_enemy_side() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let mut state = engine.apply(&state, Command::EnterBiome(QUIET), 0).unwrap();
    let hero = state.core.party[0];
    if let Some(actor) = state.core.actors.get_mut(&hero) {
        actor.hp = 6;
    }

    let play = deck_play(&engine, &state, MEND, 10);
    let next = engine.apply(&state, play, 10).unwrap();

    let actor = next.actor(hero).unwrap();
    assert_eq!(actor.hp, 10);
    assert_eq!(actor.hp_max, 10);
}

/// A combo-cooldown card discarded at combo 4 comes back once the owner's
/// combo reaches 6.
#[test]
fn test_combo_cooldown_card_returns() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let mut state = engine.apply(&state, Command::EnterBiome(QUIET), 0).unwrap();
    let hero = state.core.party[0];

    // 6, 7, 8 onto the 5 seed.
    for now in 1..=3 {
        state = engine.apply(&state, tableau(0), now).unwrap();
    }
    let play = deck_play(&engine, &state, RECALL, 4);
    state = engine.apply(&state, play, 4).unwrap();
    assert_eq!(state.phase.combat().unwrap().combos.actor_combo(hero), 4);
    assert!(!in_hand(&engine, &state, RECALL, 4));

    // The recall card is wild, so the 9 lands on it.
    state = engine.apply(&state, tableau(0), 5).unwrap();
    assert!(!in_hand(&engine, &state, RECALL, 5));

    state = engine.apply(&state, tableau(0), 6).unwrap();
    assert_eq!(state.phase.combat().unwrap().combos.actor_combo(hero), 6);
    assert!(in_hand(&engine, &state, RECALL, 6));

    let recall = state
        .actor(hero)
        .unwrap()
        .deck
        .iter()
        .find(|c| c.orim == RECALL)
        .unwrap();
    assert_eq!(recall.returns, 1);
}

/// Progress toward a combo return survives the round reset.
#[test]
fn test_round_reset_keeps_return_progress() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let mut state = engine.apply(&state, Command::EnterBiome(QUIET), 0).unwrap();

    for now in 1..=3 {
        state = engine.apply(&state, tableau(0), now).unwrap();
    }
    let play = deck_play(&engine, &state, RECALL, 4);
    state = engine.apply(&state, play, 4).unwrap();
    state = engine.apply(&state, tableau(0), 5).unwrap();
    assert!(!in_hand(&engine, &state, RECALL, 5));

    state = engine.apply(&state, Command::EndTurn, 6).unwrap();
    assert!(state.phase.combat().unwrap().combos.is_fresh());
    assert!(!in_hand(&engine, &state, RECALL, 6));

    // Tableaus were re-dealt; one more play completes the threshold.
    state = engine.apply(&state, tableau(0), 7).unwrap();
    assert!(in_hand(&engine, &state, RECALL, 7));
}

/// A DOT with N ticks fires at most N times however late the tick comes.
#[test]
fn test_dot_fires_at_most_n_times() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let state = engine.apply(&state, Command::EnterBiome(LAIR), 0).unwrap();
    let ogre = state.side_actors(Side::Enemy)[0];

    let play = deck_play(&engine, &state, EMBER, 0);
    let state = engine.apply(&state, play, 0).unwrap();
    assert_eq!(state.phase.combat().unwrap().dots.len(), 1);
    assert_eq!(state.actor(ogre).unwrap().hp, 50);

    let late = engine.apply(&state, Command::Tick, 1_000_000).unwrap();
    assert_eq!(late.actor(ogre).unwrap().hp, 44);
    assert!(late.phase.combat().unwrap().dots.is_empty());

    let later = engine.apply(&late, Command::Tick, 2_000_000).unwrap();
    assert_eq!(later.actor(ogre).unwrap().hp, 44);
}

/// Inactivity triggers look at time since the last play.
#[test]
fn test_inactivity_trigger_gates_card() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let state = engine.apply(&state, Command::EnterBiome(LAIR), 0).unwrap();

    assert!(!in_hand(&engine, &state, SECOND_WIND, 1_000));
    assert!(in_hand(&engine, &state, SECOND_WIND, 6_000));

    let played = engine.apply(&state, tableau(0), 6_000).unwrap();
    assert!(!in_hand(&engine, &played, SECOND_WIND, 7_000));
    assert!(in_hand(&engine, &played, SECOND_WIND, 11_000));
}

/// Plain plays strike the facing enemy.
#[test]
fn test_plain_card_strikes_facing_enemy() {
    let catalog = catalog();
    let config = sure_hits().with_base_card_damage(4);
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let state = engine.apply(&state, Command::EnterBiome(LAIR), 0).unwrap();
    let ogre = state.side_actors(Side::Enemy)[0];

    let next = engine.apply(&state, tableau(0), 10).unwrap();
    assert_eq!(next.actor(ogre).unwrap().hp, 46);
    assert_eq!(next.actor(ogre).unwrap().damage_taken, 4);
}

/// Plays need the active side and a standing foundation owner.
#[test]
fn test_play_rejections() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 1);
    let mut state = engine.apply(&state, Command::EnterBiome(LAIR), 0).unwrap();
    let hero = state.core.party[0];

    let enemy_play = Command::PlayFromTableau {
        side: Side::Enemy,
        tableau: 0,
        foundation: 0,
    };
    assert_eq!(
        engine.apply(&state, enemy_play, 1),
        Err(Rejection::WrongSide {
            active: Side::Player,
            attempted: Side::Enemy
        })
    );
    assert_eq!(
        engine.apply(&state, tableau(7), 1),
        Err(Rejection::NoSuchTableau {
            side: Side::Player,
            index: 7
        })
    );

    let mend = deck_play(&engine, &state, MEND, 1);
    let elsewhere = match mend {
        Command::PlayFromHand { side, card, .. } => Command::PlayFromHand {
            side,
            card,
            foundation: 3,
        },
        other => other,
    };
    assert!(matches!(
        engine.apply(&state, elsewhere, 1),
        Err(Rejection::NoSuchFoundation { .. })
    ));

    if let Some(actor) = state.core.actors.get_mut(&hero) {
        actor.hp = 0;
    }
    assert_eq!(
        engine.apply(&state, tableau(0), 1),
        Err(Rejection::ActorKnockedOut { actor: hero })
    );

    let ghost = Command::PlayFromHand {
        side: Side::Player,
        card: HandCardRef::Transient(golf_rpg::core::TransientId(99)),
        foundation: 0,
    };
    assert!(engine.apply(&state, ghost, 1).is_err());
}

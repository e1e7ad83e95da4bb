//! Session lifecycle tests: garden, biomes, rewards and the command log.

mod common;

use common::*;
use golf_rpg::cards::{Element, Reward, RewardSource};
use golf_rpg::core::{Command, CommandRecord, Phase, Rejection, Side};
use golf_rpg::reducer::Engine;

fn strike() -> Command {
    Command::PlayFromTableau {
        side: Side::Player,
        tableau: 0,
        foundation: 0,
    }
}

#[test]
fn test_full_lifecycle() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 7);
    let state = engine.apply(&state, Command::Rest, 0).unwrap();
    assert_eq!(state.core.rest_count, 1);

    let mut state = engine.apply(&state, Command::EnterBiome(LAIR), 10).unwrap();
    assert_eq!(state.phase.biome(), Some(LAIR));
    let ogre = state.side_actors(Side::Enemy)[0];
    if let Some(actor) = state.core.actors.get_mut(&ogre) {
        actor.hp = 1;
    }

    let state = engine.apply(&state, strike(), 20).unwrap();
    assert!(state.actor(ogre).unwrap().is_knocked_out());
    assert!(state.phase.board().unwrap().cleared);

    let state = engine.apply(&state, Command::Tick, 30).unwrap();
    let state = engine.apply(&state, Command::ExitBiome, 40).unwrap();
    assert_eq!(state.phase, Phase::Garden);
    assert!(state.actor(ogre).is_none());

    let (drained, rewards) = engine.drain_rewards(&state);
    assert_eq!(
        rewards,
        vec![Reward {
            element: Element::Fire,
            amount: 3,
            source: RewardSource::BiomeClear,
        }]
    );
    assert!(drained.core.rewards.is_empty());
    assert_eq!(drained.core.reward_history.len(), 1);

    let (_, again) = engine.drain_rewards(&drained);
    assert!(again.is_empty());
}

#[test]
fn test_history_skips_ticks() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let state = engine.new_session(&[HERO], 7);
    let state = engine.apply(&state, Command::EnterBiome(QUIET), 100).unwrap();
    let state = engine.apply(&state, Command::Tick, 150).unwrap();
    let state = engine.apply(&state, strike(), 200).unwrap();
    let state = engine.apply(&state, Command::Tick, 250).unwrap();
    let state = engine.apply(&state, strike(), 300).unwrap();

    let log: Vec<&CommandRecord> = state.core.history.iter().collect();
    assert_eq!(log.len(), 3);
    assert_eq!(log[0].command, Command::EnterBiome(QUIET));
    assert_eq!(log[1].command, strike());
    assert_eq!(log[1].side, Side::Player);
    assert_eq!(log[1].turn, 1);

    let sequences: Vec<u64> = log.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, vec![0, 1, 2]);
    let stamps: Vec<u64> = log.iter().map(|r| r.at_ms).collect();
    assert_eq!(stamps, vec![100, 200, 300]);
    assert_eq!(state.core.clock_ms, Some(300));
    assert_eq!(state.core.flow.moves, 2);

    let json = serde_json::to_string(&state.core.history).unwrap();
    assert!(json.contains("EnterBiome"));
}

#[test]
fn test_rejection_leaves_state_untouched() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let garden = engine.new_session(&[HERO], 7);
    let copy = garden.clone();

    assert!(matches!(
        engine.apply(&garden, Command::ExitBiome, 5),
        Err(Rejection::NoBoard(_))
    ));
    assert!(matches!(engine.apply(&garden, strike(), 5), Err(Rejection::NoBoard(_))));
    assert_eq!(engine.apply(&garden, Command::EndTurn, 5), Err(Rejection::NotInCombat));
    assert_eq!(garden, copy);
    assert!(garden.core.history.is_empty());

    let inside = engine.apply(&garden, Command::EnterBiome(LAIR), 10).unwrap();
    let before = inside.clone();
    assert_eq!(engine.apply(&inside, Command::Rest, 11), Err(Rejection::NotInGarden("combat biome")));
    assert_eq!(inside, before);
}

#[test]
fn test_plain_board_plays_without_combat() {
    let catalog = catalog();
    let config = sure_hits();
    let engine = Engine::new(&catalog, &config);

    let garden = engine.new_session(&[HERO], 3);
    let deal = golf_rpg::zones::DealSpec::default().with_layout(vec![run(&[4, 3]), run(&[9])]);
    let state = engine.start_playing(&garden, deal).unwrap();

    assert_eq!(state.active_side(), None);
    assert!(engine.hand(&state, Side::Player, 0).is_empty());

    let plays = engine.legal_plays(&state, Side::Player, 0);
    assert_eq!(plays, vec![strike()]);

    let state = engine.apply(&state, strike(), 1).unwrap();
    let state = engine.apply(&state, strike(), 2).unwrap();
    assert!(!engine.has_legal_move(&state, Side::Player, 3));
    assert_eq!(engine.apply(&state, Command::EndTurn, 3), Err(Rejection::NotInCombat));
}

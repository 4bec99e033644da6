//! Integration tests for the session loop

use drop_jelly::core::{SimConfig, TileSpawner, Timings};
use drop_jelly::engine::Session;
use drop_jelly::types::{Color, CoreEvent, TileKind};

fn config(seed: u32) -> SimConfig {
    let mut config = SimConfig::with_size(8, 5);
    config.seed = seed;
    config.timings = Timings::instant();
    config
}

#[test]
fn test_session_lifecycle() {
    let mut session = Session::new(config(12345));
    assert!(session.is_idle());
    assert_eq!(session.placed(), 0);

    let result = session.drop_current(2);
    assert!(result.accepted);
    assert!(!session.is_idle());

    let events = session.take_events();
    assert!(matches!(events[0], CoreEvent::TilePlaced { .. }));
    assert!(events.contains(&CoreEvent::SpawnRequested));

    session.simulation_mut().run_until_idle(100).unwrap();
    assert!(session.is_idle());
    assert_eq!(session.placed(), 1);
    assert!(session.snapshot().cascade_idle);
}

#[test]
fn test_same_seed_same_game() {
    let mut a = Session::new(config(99));
    let mut b = Session::new(config(99));

    for col in [0, 1, 2, 3, 4, 2, 2, 0] {
        let ra = a.drop_current(col);
        let rb = b.drop_current(col);
        assert_eq!(ra.accepted, rb.accepted);
        a.simulation_mut().run_until_idle(1_000).unwrap();
        b.simulation_mut().run_until_idle(1_000).unwrap();
        assert_eq!(a.take_events(), b.take_events());
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn test_spawned_tiles_avoid_adjacent_repeats() {
    let mut spawner = TileSpawner::new(4242);
    for _ in 0..500 {
        let tile = spawner.spawn();
        let colors = tile.colors();
        match tile.kind() {
            TileKind::Single => {}
            TileKind::Split2 | TileKind::Split3 => {
                for pair in colors.windows(2) {
                    assert_ne!(pair[0], pair[1], "{colors:?}");
                }
            }
            TileKind::Split4 => {
                for i in 1..colors.len() {
                    assert_ne!(colors[i], colors[i - 1], "{colors:?}");
                    if i >= 2 {
                        assert_ne!(colors[i], colors[i - 2], "{colors:?}");
                    }
                }
            }
        }
        if tile.kind() == TileKind::Split3 {
            // All three colours are used exactly once.
            for c in Color::ALL {
                assert_eq!(colors.iter().filter(|&&x| x == c).count(), 1);
            }
        }
    }
}

use std::fs;
use std::time::Duration;

use flappy_term::{
    FrameInput, GameConfig, GameEvent, GameSession, HighScoreStore, SessionState,
};

/// Taps whenever the avatar sinks near the bottom of the next opening.
fn autopilot(session: &GameSession) -> bool {
    let avatar = session.avatar().bounding_box();
    let floor = session
        .obstacles()
        .obstacles()
        .iter()
        .find(|o| o.x() + o.width() > avatar.left())
        .map(|o| o.gap_bottom())
        .unwrap_or(320.0);
    avatar.bottom() > floor - 8.0 && session.avatar().jump_steps_remaining() == 0
}

/// Flies on autopilot for `flying` frames, then lets go until the session ends.
fn play_until_ended(session: &mut GameSession, config: &GameConfig, flying: usize) -> u32 {
    session.tick(FrameInput {
        jump: true,
        elapsed: Duration::ZERO,
    });
    for frame in 0..flying + 1_000 {
        let jump = frame < flying && autopilot(session);
        session.tick(FrameInput {
            jump,
            elapsed: config.frame_interval(),
        });
        if let Some(score) = session.final_score() {
            return score;
        }
    }
    panic!("session still {:?}", session.state());
}

#[test]
fn unchecked_gravity_ends_the_session() {
    let config = GameConfig {
        width: 300.0,
        height: 500.0,
        spawn_obstacles: false,
        ..GameConfig::default()
    };
    let mut session = GameSession::seeded(&config, 0);

    let report = session.tick(FrameInput {
        jump: true,
        elapsed: Duration::ZERO,
    });
    assert_eq!(report.events, vec![GameEvent::Jumped]);

    let mut died = 0;
    for _ in 1..200 {
        let report = session.tick(FrameInput {
            jump: false,
            elapsed: config.frame_interval(),
        });
        died += report.events.iter().filter(|e| **e == GameEvent::Died).count();
    }

    assert!(matches!(
        session.state(),
        SessionState::Dying | SessionState::Ended
    ));
    assert_eq!(died, 1);
    assert_eq!(session.score(), 0);
    assert!(session.obstacles().is_empty());
}

#[test]
fn high_score_keeps_the_best_of_several_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("highscore");
    fs::write(&path, "10").unwrap();
    let store = HighScoreStore::new(&path);

    assert_eq!(store.record(15).unwrap(), 15);
    assert_eq!(store.record(5).unwrap(), 15);
    assert_eq!(store.load(), 15);
}

#[test]
fn a_finished_session_feeds_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = HighScoreStore::new(dir.path().join("highscore"));
    let config = GameConfig::default();

    let mut session = GameSession::seeded(&config, 11);
    let score = play_until_ended(&mut session, &config, 600);
    assert!(score > 0);
    let best = store.record(score).unwrap();
    assert_eq!(best, score);
    assert_eq!(store.load(), score);
}

#[test]
fn same_seed_same_pipes() {
    let config = GameConfig::default();
    let mut a = GameSession::seeded(&config, 42);
    let mut b = GameSession::seeded(&config, 42);
    let tap = |i: usize| FrameInput {
        jump: i % 20 == 0,
        elapsed: Duration::from_millis(500),
    };
    for i in 0..30 {
        let ra = a.tick(tap(i));
        let rb = b.tick(tap(i));
        assert_eq!(ra, rb);
    }
    assert_eq!(a.obstacles().obstacles(), b.obstacles().obstacles());
}

#[test]
fn flapping_through_the_gaps_scores() {
    let config = GameConfig::default();
    let mut session = GameSession::seeded(&config, 5);
    session.tick(FrameInput {
        jump: true,
        elapsed: Duration::ZERO,
    });

    let mut scored = 0;
    for _ in 0..2_000 {
        let report = session.tick(FrameInput {
            jump: autopilot(&session),
            elapsed: config.frame_interval(),
        });
        assert!(report.is_alive(), "crashed with score {}", report.score);
        scored += report
            .events
            .iter()
            .filter(|e| **e == GameEvent::Scored)
            .count() as u32;
    }

    assert_eq!(scored, session.score());
    assert!(session.score() >= 5, "score {}", session.score());
}

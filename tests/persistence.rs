//! Value-table and trajectory-log persistence

use std::{fs, path::Path};

use qttt::{
    Action, BoardState, StateKey,
    adapters::{InMemoryRepository, JsonRepository, MsgPackRepository, repository_for},
    pipeline::{RandomOpponent, Trainer, TrainingConfig},
    ports::Repository,
    q_learning::{TrajectoryLog, ValueTable},
};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tempfile::TempDir;

fn repositories() -> Vec<(&'static str, Box<dyn Repository>)> {
    vec![
        ("json", Box::new(JsonRepository::new())),
        ("msgpack", Box::new(MsgPackRepository::new())),
        ("memory", Box::new(InMemoryRepository::new())),
    ]
}

/// Table with entries on positions reached by random play
fn random_table(entries: usize, seed: u64) -> ValueTable {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut table = ValueTable::new();
    while table.len() < entries {
        let mut board = BoardState::new();
        while !board.is_terminal() {
            let legal = board.legal_actions();
            let Some(&action) = legal.choose(&mut rng) else {
                break;
            };
            table.update(&board.state_key(), action, rng.random_range(-1.0..1.0));
            board = board.play(action).unwrap();
        }
    }
    table
}

fn assert_roundtrip(table: &ValueTable) {
    let dir = TempDir::new().unwrap();
    for (name, repo) in repositories() {
        let path = dir.path().join(format!("table.{name}"));
        repo.save_table(table, &path).unwrap();
        let loaded = repo.load_table(&path).unwrap();
        assert_eq!(&loaded, table, "{name} round-trip");
    }
}

#[test]
fn test_empty_table_roundtrip() {
    assert_roundtrip(&ValueTable::new());
}

#[test]
fn test_single_entry_roundtrip() {
    let mut table = ValueTable::new();
    table.update(&StateKey::parse("X...O....").unwrap(), Action::new(2, 2), 0.123456789);
    assert_roundtrip(&table);
}

#[test]
fn test_large_table_roundtrip() {
    let table = random_table(250, 99);
    assert!(table.len() >= 100);
    assert_roundtrip(&table);
}

#[test]
fn test_missing_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    for name in ["absent.json", "absent.msgpack"] {
        let path = dir.path().join(name);
        let table = ValueTable::load_or_default(repository_for(&path).as_ref(), &path);
        assert!(table.is_empty());
    }
}

#[test]
fn test_corrupt_file_loads_empty() {
    let dir = TempDir::new().unwrap();
    let cases: [(&str, &[u8]); 4] = [
        ("garbage.json", b"{\"X...O....\": [1, 2"),
        ("wrong_shape.json", b"[1, 2, 3]"),
        ("bad_action.json", b"{\".........\": {\"9-9\": 0.5}}"),
        ("garbage.msgpack", &[0xde, 0xad, 0xbe, 0xef]),
    ];
    for (name, bytes) in cases {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        let table = ValueTable::load_or_default(repository_for(&path).as_ref(), &path);
        assert!(table.is_empty(), "{name}");
    }
}

#[test]
fn test_save_then_load_via_table_methods() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("q_table.json");
    let repo = repository_for(&path);
    let table = random_table(20, 5);

    table.save(repo.as_ref(), &path).unwrap();
    assert_eq!(ValueTable::load_or_default(repo.as_ref(), &path), table);
}

fn recorded_log(episodes: usize) -> TrajectoryLog {
    let config = TrainingConfig::default()
        .with_episodes(episodes)
        .with_seed(Some(12))
        .with_record_trajectories(true);
    let mut trainer = Trainer::new(config.clone());
    let mut policy = config.build_policy(ValueTable::new());
    let mut opponent = RandomOpponent::new("Random");
    trainer.run(&mut policy, &mut opponent).unwrap();
    trainer.take_trajectories()
}

#[test]
fn test_trajectory_log_roundtrip() {
    let log = recorded_log(15);
    assert_eq!(log.len(), 15);

    let dir = TempDir::new().unwrap();
    for (name, repo) in repositories() {
        let path = dir.path().join(format!("log.{name}"));
        repo.save_trajectories(&log, &path).unwrap();
        assert_eq!(repo.load_trajectories(&path).unwrap(), log, "{name}");
    }
    assert_eq!(TrajectoryLog::new(), {
        let path = dir.path().join("empty.json");
        let repo = JsonRepository::new();
        repo.save_trajectories(&TrajectoryLog::new(), &path).unwrap();
        repo.load_trajectories(&path).unwrap()
    });
}

#[test]
fn test_trajectory_snapshots_are_state_keys() {
    let log = recorded_log(1);
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    JsonRepository::new().save_trajectories(&log, &path).unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["episodes"][0]["steps"][0]["board"], ".........");
    assert!(raw["episodes"][0]["steps"][0]["action"].is_string());
}

#[test]
fn test_corrupt_trajectory_log_loads_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("log.json");
    fs::write(&path, "{\"episodes\": [{\"learner\": \"X\", \"steps\": 5}]}").unwrap();
    let log = TrajectoryLog::load_or_default(&JsonRepository::new(), &path);
    assert!(log.is_empty());

    let missing = TrajectoryLog::load_or_default(&JsonRepository::new(), Path::new("/nonexistent/log.json"));
    assert!(missing.is_empty());
}

use race_analyzer::core::Storage;
use race_analyzer::domain::services::{self, RaceDraft};
use race_analyzer::{AppState, JsonFileStorage, RaceTiming};
use tempfile::TempDir;

const BROWSER_EXPORT: &str = r#"{
  "groups": {
    "g1": {
      "id": "g1",
      "name": "Tuesday track",
      "createdAt": 1714000000000,
      "targetProb": 0.9,
      "races": [
        { "id": "a", "participants": 4, "finishes": 2, "firstTimeMs": 12340, "createdAt": 1714000100000 },
        { "id": "b", "participants": 3, "finishes": 0, "firstTimeMs": null, "createdAt": 1714000200000 },
        { "id": "c", "participants": 5, "times": [13012.7, 12890.2, 15000], "createdAt": 1714000300000 }
      ]
    },
    "g2": { "id": "g2", "name": "Old", "races": [] }
  },
  "order": ["g2", "g1"]
}"#;

fn storage_in(dir: &TempDir) -> JsonFileStorage {
    JsonFileStorage::new(dir.path().join("races.json"))
}

#[test]
fn test_loads_browser_storage_format() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    std::fs::write(storage.path(), BROWSER_EXPORT).unwrap();

    let state = storage.load().unwrap();
    assert_eq!(state.order, vec!["g2".to_string(), "g1".to_string()]);

    let group = state.group("g1").unwrap();
    assert_eq!(group.target_prob, 0.9);
    assert_eq!(group.races.len(), 3);
    assert_eq!(group.races[0].first_place_time(), Some(12_340));
    assert_eq!(group.races[1].first_place_time(), None);
    assert_eq!(group.races[2].finishes, 3);
    assert_eq!(group.races[2].first_place_time(), Some(12_890));

    assert_eq!(state.group("g2").unwrap().target_prob, 0.8);
}

#[test]
fn test_round_trip_preserves_state() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    std::fs::write(storage.path(), BROWSER_EXPORT).unwrap();

    let mut state = storage.load().unwrap();
    services::add_race(
        &mut state,
        "g1",
        RaceDraft {
            participants: 2,
            finishes: 1,
            first_time_ms: Some(11_110),
        },
    )
    .unwrap();
    storage.save(&state).unwrap();

    let reloaded = storage.load().unwrap();
    assert_eq!(reloaded, state);
    let legacy = &reloaded.group("g1").unwrap().races[2];
    assert!(matches!(legacy.timing, RaceTiming::Legacy(_)));
}

#[test]
fn test_saved_json_uses_camel_case_keys() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);

    let mut state = AppState::default();
    let id = services::create_group(&mut state, "Keys", 0.8).unwrap();
    services::add_race(
        &mut state,
        &id,
        RaceDraft {
            participants: 4,
            finishes: 1,
            first_time_ms: Some(9_990),
        },
    )
    .unwrap();
    storage.save(&state).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(storage.path()).unwrap()).unwrap();
    let group = &raw["groups"][id.as_str()];
    assert_eq!(group["targetProb"], 0.8);
    assert!(group["createdAt"].is_i64());
    assert_eq!(group["races"][0]["firstTimeMs"], 9_990);
    assert_eq!(raw["order"][0], id.as_str());
}

#[test]
fn test_corrupt_file_falls_back_to_empty_state() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    std::fs::write(storage.path(), "{ this is not json").unwrap();

    let state = storage.load().unwrap();
    assert!(state.is_empty());
    assert!(state.order.is_empty());
}

#[test]
fn test_blank_file_is_empty_state() {
    let dir = TempDir::new().unwrap();
    let storage = storage_in(&dir);
    std::fs::write(storage.path(), "  \n").unwrap();

    assert_eq!(storage.load().unwrap(), AppState::default());
}

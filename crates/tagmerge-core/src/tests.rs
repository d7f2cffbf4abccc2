//! End-to-end tests for a merge session

use super::*;
use serde_json::json;

fn database(locator: &str, players: serde_json::Value) -> Database {
    ingest::ingest_value(json!({ "players": players }), locator, Origin::File).unwrap()
}

fn target(value: serde_json::Value) -> TargetDocument {
    serde_json::from_value(value).unwrap()
}

fn tags_json(doc: &TargetDocument) -> serde_json::Value {
    serde_json::to_value(&doc.tags).unwrap()
}

#[test]
fn test_vip_scenario() {
    let mut session = SessionState::new();
    session.set_target(target(json!({ "Config": { "vip": { "Name": "VIP" } }, "Tags": {} })));
    session
        .add_database(database(
            "db.json",
            json!([
                { "steamid": "[U:1:1]", "attributes": ["a"] },
                { "steamid": "[U:1:2]", "attributes": ["b"] }
            ]),
        ))
        .unwrap();
    session.mapping_mut().set("a", "vip");
    session.mapping_mut().set("b", "");

    assert_eq!(
        session.stats(),
        ImportStats {
            imported: 2,
            added: 2,
            duplicates: 0
        }
    );
    let output = session.build_output();
    assert_eq!(tags_json(&output), json!({ "1": ["vip"] }));
}

#[test]
fn test_existing_tags_are_never_overwritten() {
    let mut session = SessionState::new();
    session.set_target(target(json!({
        "Config": { "vip": { "Name": "VIP" }, "bad": { "Name": "Cheater" } },
        "Tags": { "100": ["vip"] }
    })));
    session
        .add_database(database(
            "db.json",
            json!([{ "steamid": "76561197960265828", "attributes": ["cheater"] }]),
        ))
        .unwrap();
    session.mapping_mut().set("cheater", "bad");

    assert_eq!(session.stats().duplicates, 1);
    let output = session.build_output();
    assert_eq!(tags_json(&output), json!({ "100": ["vip"] }));
}

#[test]
fn test_same_url_is_rejected() {
    let remote = |players: serde_json::Value| {
        ingest::ingest_value(
            json!({ "players": players }),
            "https://lists.example.org/db.json",
            Origin::Network,
        )
        .unwrap()
    };
    let mut session = SessionState::new();
    session
        .add_database(remote(json!([{ "steamid": "[U:1:1]" }])))
        .unwrap();
    let err = session
        .add_database(remote(json!([{ "steamid": "[U:1:2]" }])))
        .unwrap_err();

    assert_eq!(
        err,
        SessionError::AlreadyLoaded("https://lists.example.org/db.json".to_string())
    );
    assert_eq!(session.databases().len(), 1);
    assert_eq!(session.stats().imported, 1);
}

#[test]
fn test_same_file_is_appended_again() {
    let mut session = SessionState::new();
    let db = database("db.json", json!([{ "steamid": "[U:1:1]", "attributes": ["a"] }]));
    session.add_database(db.clone()).unwrap();
    session.add_database(db).unwrap();

    assert_eq!(session.databases().len(), 2);
    assert_eq!(
        session.stats(),
        ImportStats {
            imported: 2,
            added: 1,
            duplicates: 1
        }
    );
}

#[test]
fn test_removing_a_database_forgets_it() {
    let first = database("first.json", json!([{ "steamid": "[U:1:1]", "attributes": ["a"] }]));
    let second = database(
        "second.json",
        json!([
            { "steamid": "[U:1:1]", "attributes": ["z"] },
            { "steamid": "[U:1:3]", "attributes": ["c"] }
        ]),
    );

    let mut only_first = SessionState::new();
    only_first.add_database(first.clone()).unwrap();

    let mut session = SessionState::new();
    session.add_database(first).unwrap();
    session.add_database(second).unwrap();
    assert_eq!(session.stats().duplicates, 1);

    let removed = session.remove_database(1).unwrap();
    assert_eq!(removed.locator, "second.json");
    assert_eq!(session.reconciliation(), only_first.reconciliation());
    assert!(session.remove_database(5).is_none());
}

#[test]
fn test_clear_target_releases_excluded_players() {
    let mut session = SessionState::new();
    session.set_target(target(json!({ "Config": {}, "Tags": { "7": ["x"] } })));
    session
        .add_database(database("db.json", json!([{ "steamid": "[U:1:7]" }])))
        .unwrap();
    assert_eq!(session.stats().added, 0);

    let previous = session.clear_target().unwrap();
    assert_eq!(previous.tagged_players(), 1);
    assert_eq!(session.stats().added, 1);
    assert_eq!(session.available_tags(), None);
}

#[test]
fn test_mapping_survives_reset() {
    let mut session = SessionState::new();
    session.mapping_mut().set("cheater", "bad");
    session
        .add_database(database("db.json", json!([{ "steamid": "[U:1:7]" }])))
        .unwrap();

    session.reset();
    assert!(session.databases().is_empty());
    assert!(session.target().is_none());
    assert_eq!(session.stats(), ImportStats::default());
    assert_eq!(session.mapping().get("cheater"), Some("bad"));
}

#[test]
fn test_output_without_target_has_empty_config() {
    let mut session = SessionState::new();
    session
        .add_database(database(
            "db.json",
            json!([{ "steamid": "[U:1:7]", "attributes": ["cheater"] }]),
        ))
        .unwrap();
    session.mapping_mut().set("cheater", "bad");

    let text = String::from_utf8(to_pretty_json(&session.build_output()).unwrap()).unwrap();
    assert_eq!(
        text,
        "{\n    \"Config\": {},\n    \"Tags\": {\n        \"7\": [\n            \"bad\"\n        ]\n    }\n}"
    );
}

use super::*;
use crate::error::ErrorBody;
use serde_json::json;

fn snapshot_body() -> serde_json::Value {
    json!({
        "tag": "#ABC123",
        "name": "Ash",
        "town_hall_level": 10,
        "exp_level": 120,
        "trophies": 3000,
        "best_trophies": 3200,
        "war_stars": 450,
        "attack_wins": 80,
        "defense_wins": 5,
        "heroes": [{"name": "Battle Machine", "level": 20, "max_level": 30, "village": "builderBase"}],
        "troops": [{"name": "Barbarian", "level": 9, "max_level": 11, "village": "home"}],
        "spells": [],
        "available_upgrades": [
            {"name": "Barbarian", "current_level": 9, "max_level": 11, "type": "troop"}
        ]
    })
}

#[test]
fn nullable_fields_accept_absent_or_null_and_serialize_as_null() {
    let absent: PlayerSnapshot = serde_json::from_value(snapshot_body()).expect("absent");

    let mut body = snapshot_body();
    body["clan_name"] = json!(null);
    body["clan_tag"] = json!(null);
    body["league"] = json!(null);
    let null: PlayerSnapshot = serde_json::from_value(body).expect("null");

    assert_eq!(absent, null);
    assert_eq!(absent.clan_name, None);
    assert_eq!(absent.league, None);

    let encoded = serde_json::to_value(&absent).expect("encode");
    assert_eq!(encoded["clan_tag"], json!(null));
    assert_eq!(encoded["heroes"][0]["village"], json!("builderBase"));
    assert_eq!(encoded["available_upgrades"][0]["type"], json!("troop"));
}

#[test]
fn unit_collections_are_required() {
    let mut body = snapshot_body();
    body.as_object_mut().expect("object").remove("spells");
    let err = serde_json::from_value::<PlayerSnapshot>(body).expect_err("must fail");
    assert!(err.to_string().contains("spells"), "unexpected error: {err}");
}

#[test]
fn village_and_difficulty_accept_alternate_spellings() {
    let unit: UpgradeableUnit = serde_json::from_value(
        json!({"name": "Cannon Cart", "level": 1, "max_level": 20, "village": "builder"}),
    )
    .expect("unit");
    assert_eq!(unit.village, Village::Builder);

    let strategy: AttackStrategy = serde_json::from_value(json!({
        "strategy_name": "Mass Dragons",
        "description": "Funnel then flood the core",
        "recommended_troops": ["Dragon"],
        "recommended_spells": ["Rage Spell"],
        "difficulty": "Easy"
    }))
    .expect("strategy");
    assert_eq!(strategy.difficulty, Difficulty::Easy);

    let loud: Difficulty = serde_json::from_value(json!("MEDIUM")).expect("difficulty");
    assert_eq!(loud, Difficulty::Medium);
}

#[test]
fn unrecognized_difficulty_keeps_the_rest_of_the_advice() {
    for word in ["Medium-Hard", "intermediate"] {
        let advice: PlayerAdvice = serde_json::from_value(json!({
            "upgrade_priorities": [
                {"item_name": "Archer Queen", "priority": 1, "reason": "Carries every attack"}
            ],
            "attack_strategies": [{
                "strategy_name": "Queen Walk",
                "description": "Walk the queen around the edge",
                "recommended_troops": ["Healer"],
                "recommended_spells": [],
                "difficulty": word
            }],
            "general_tips": ["Keep builders busy"],
            "war_tips": ["Scout first"]
        }))
        .expect("advice");

        let difficulty = &advice.attack_strategies[0].difficulty;
        assert_eq!(difficulty, &Difficulty::Other(word.to_string()));
        assert_eq!(difficulty.to_string(), word);
        assert_eq!(advice.upgrade_priorities[0].item_name, "Archer Queen");
        assert_eq!(advice.war_tips, Some(vec!["Scout first".to_string()]));

        let encoded = serde_json::to_value(&advice).expect("encode");
        assert_eq!(encoded["attack_strategies"][0]["difficulty"], json!(word));
    }
}

#[test]
fn war_tips_stay_distinct_from_empty_list() {
    let without: PlayerAdvice = serde_json::from_value(json!({
        "upgrade_priorities": [],
        "attack_strategies": [],
        "general_tips": ["Keep builders busy"],
        "war_tips": null
    }))
    .expect("advice");
    assert_eq!(without.war_tips, None);

    let empty: PlayerAdvice = serde_json::from_value(json!({
        "upgrade_priorities": [],
        "attack_strategies": [],
        "general_tips": [],
        "war_tips": []
    }))
    .expect("advice");
    assert_eq!(empty.war_tips, Some(Vec::new()));
}

#[test]
fn advice_request_omits_model_unless_overridden() {
    let request = AdviceRequest {
        tag: PlayerTag::new("#ABC123"),
        war_focus: true,
        model: None,
    };
    assert_eq!(
        serde_json::to_value(&request).expect("encode"),
        json!({"tag": "#ABC123", "war_focus": true})
    );

    let request = AdviceRequest {
        model: Some("openai/gpt-4o".into()),
        ..request
    };
    assert_eq!(
        serde_json::to_value(&request).expect("encode")["model"],
        json!("openai/gpt-4o")
    );
}

#[test]
fn history_timestamps_parse_with_and_without_fraction() {
    let items: Vec<PlayerHistoryItem> = serde_json::from_value(json!([
        {"id": 2, "timestamp": "2024-05-02T10:30:00.123456", "town_hall_level": 10},
        {"id": 1, "timestamp": "2024-04-01T09:00:00", "town_hall_level": 9}
    ]))
    .expect("history");
    assert_eq!(items[0].timestamp.format("%Y-%m-%d").to_string(), "2024-05-02");
    assert_eq!(items[1].town_hall_level, 9);
}

#[test]
fn error_body_only_yields_string_details() {
    let body: ErrorBody =
        serde_json::from_value(json!({"detail": "Player not found"})).expect("body");
    assert_eq!(body.message(), Some("Player not found"));

    let body: ErrorBody =
        serde_json::from_value(json!({"detail": [{"msg": "field required"}]})).expect("body");
    assert_eq!(body.message(), None);

    let body: ErrorBody = serde_json::from_value(json!({})).expect("body");
    assert_eq!(body.message(), None);
}

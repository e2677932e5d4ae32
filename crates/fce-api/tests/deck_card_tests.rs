use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::common::{self, TestClient};

async fn create_deck(client: &TestClient, name: &str) -> String {
    let response = client.post_json("/decks", &json!({ "name": name })).await;
    response.assert_status(StatusCode::CREATED);
    let deck: Value = response.json();
    deck["id"].as_str().unwrap().to_string()
}

async fn create_card(client: &TestClient, deck_id: &str, front: &str, back: &str) -> Value {
    let response = client
        .post_json(
            "/cards",
            &json!({ "front": front, "back": back, "deckId": deck_id }),
        )
        .await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

#[tokio::test]
async fn test_health() {
    let (_, client) = common::setup().await;
    client.get("/health").await.assert_status(StatusCode::OK);
    client.get("/nope").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_and_list_decks() {
    let (state, client) = common::setup().await;

    let response = client
        .post_json("/decks", &json!({ "name": "  Spanish  " }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let deck: Value = response.json();
    assert_eq!(deck["name"], "Spanish");
    assert_eq!(deck["createdAt"], common::start_time().timestamp_millis());
    assert!(deck["lastReviewed"].is_null());

    let deck_id = deck["id"].as_str().unwrap();
    create_card(&client, deck_id, "hola", "hello").await;

    let decks: Value = client.get("/decks").await.json();
    let decks = decks.as_array().unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0]["cardCount"], 1);
    assert_eq!(decks[0]["dueCount"], 1);

    // the new deck became current, and that was saved
    let current: Value = client.get("/decks/current").await.json();
    assert_eq!(current["deckId"], deck_id);
    let stored = common::stored_state(&state.pool).await;
    assert_eq!(stored.decks.len(), 1);
    assert_eq!(stored.cards.len(), 1);
    assert_eq!(stored.current_deck_id.unwrap().as_str(), deck_id);
}

#[tokio::test]
async fn test_deck_name_validation() {
    let (_, client) = common::setup().await;

    let response = client.post_json("/decks", &json!({ "name": "   " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("cannot be empty"));

    client
        .post_json("/decks", &json!({ "name": "x".repeat(101) }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let decks: Value = client.get("/decks").await.json();
    assert!(decks.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_rename_and_get_deck() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;

    let response = client
        .put_json(&format!("/decks/{deck_id}"), &json!({ "name": "Español" }))
        .await;
    response.assert_status(StatusCode::OK);

    let deck: Value = client.get(&format!("/decks/{deck_id}")).await.json();
    assert_eq!(deck["name"], "Español");
    assert_eq!(deck["cardCount"], 0);

    client
        .put_json("/decks/missing", &json!({ "name": "Nope" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_deck_removes_its_cards() {
    let (state, client) = common::setup().await;
    let spanish = create_deck(&client, "Spanish").await;
    let german = create_deck(&client, "German").await;
    create_card(&client, &spanish, "hola", "hello").await;
    create_card(&client, &german, "hallo", "hello").await;
    create_card(&client, &german, "tschüss", "bye").await;

    let response = client.delete(&format!("/decks/{german}")).await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["deletedCards"], 2);

    let cards: Value = client.get("/cards").await.json();
    assert_eq!(cards.as_array().unwrap().len(), 1);
    let current: Value = client.get("/decks/current").await.json();
    assert!(current["deckId"].is_null());

    let stored = common::stored_state(&state.pool).await;
    assert_eq!(stored.decks.len(), 1);
    assert_eq!(stored.cards.len(), 1);

    client
        .delete(&format!("/decks/{german}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_set_current_deck() {
    let (_, client) = common::setup().await;
    let spanish = create_deck(&client, "Spanish").await;
    create_deck(&client, "German").await;

    let response = client
        .put_json("/decks/current", &json!({ "deckId": spanish }))
        .await;
    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["deckId"], spanish.as_str());

    client
        .put_json("/decks/current", &json!({ "deckId": "missing" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let body: Value = client
        .put_json("/decks/current", &json!({ "deckId": null }))
        .await
        .json();
    assert!(body["deckId"].is_null());
}

#[tokio::test]
async fn test_new_card_starts_fresh() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;

    let card = create_card(&client, &deck_id, "hola", "hello").await;
    assert_eq!(card["easeFactor"], 2.5);
    assert_eq!(card["interval"], 0);
    assert_eq!(card["repetitions"], 0);
    assert!(card["lastReviewed"].is_null());
    assert_eq!(card["nextReview"], common::start_time().timestamp_millis());
    assert_eq!(card["tags"], json!([]));
}

#[tokio::test]
async fn test_card_validation() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;

    client
        .post_json(
            "/cards",
            &json!({ "front": "", "back": "hello", "deckId": deck_id }),
        )
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    client
        .post_json(
            "/cards",
            &json!({ "front": "hola", "back": "hello", "deckId": "missing" }),
        )
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_card_ignores_schedule_fields() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;
    let card = create_card(&client, &deck_id, "hola", "hello").await;
    let id = card["id"].as_str().unwrap();

    let response = client
        .put_json(
            &format!("/cards/{id}"),
            &json!({ "back": "hi", "tags": ["greetings"], "repetitions": 9, "easeFactor": 9.0 }),
        )
        .await;
    response.assert_status(StatusCode::OK);

    let updated: Value = client.get(&format!("/cards/{id}")).await.json();
    assert_eq!(updated["front"], "hola");
    assert_eq!(updated["back"], "hi");
    assert_eq!(updated["tags"], json!(["greetings"]));
    assert_eq!(updated["repetitions"], 0);
    assert_eq!(updated["easeFactor"], 2.5);
}

#[tokio::test]
async fn test_delete_card() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;
    let card = create_card(&client, &deck_id, "hola", "hello").await;
    let id = card["id"].as_str().unwrap();

    client
        .delete(&format!("/cards/{id}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);
    client
        .get(&format!("/cards/{id}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags() {
    let (_, client) = common::setup().await;
    let deck_id = create_deck(&client, "Spanish").await;
    let first = create_card(&client, &deck_id, "correr", "to run").await;
    let second = create_card(&client, &deck_id, "casa", "house").await;
    let first_id = first["id"].as_str().unwrap();
    let second_id = second["id"].as_str().unwrap();

    for _ in 0..2 {
        client
            .post_json(&format!("/cards/{first_id}/tags"), &json!({ "tag": "verbs" }))
            .await
            .assert_status(StatusCode::OK);
    }
    client
        .post_json(&format!("/cards/{second_id}/tags"), &json!({ "tag": " nouns " }))
        .await
        .assert_status(StatusCode::OK);
    client
        .post_json(&format!("/cards/{second_id}/tags"), &json!({ "tag": "" }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let card: Value = client.get(&format!("/cards/{first_id}")).await.json();
    assert_eq!(card["tags"], json!(["verbs"]));

    let tags: Value = client.get("/tags").await.json();
    assert_eq!(tags, json!(["nouns", "verbs"]));

    let tagged: Value = client.get("/cards?tag=verbs").await.json();
    assert_eq!(tagged.as_array().unwrap().len(), 1);
    assert_eq!(tagged[0]["id"], first_id);

    let response = client
        .delete(&format!("/cards/{first_id}/tags/verbs"))
        .await;
    response.assert_status(StatusCode::OK);
    let tags: Value = client.get("/tags").await.json();
    assert_eq!(tags, json!(["nouns"]));
}

#[tokio::test]
async fn test_list_cards_by_deck() {
    let (_, client) = common::setup().await;
    let spanish = create_deck(&client, "Spanish").await;
    let german = create_deck(&client, "German").await;
    create_card(&client, &spanish, "hola", "hello").await;
    create_card(&client, &german, "hallo", "hello").await;

    let cards: Value = client.get(&format!("/cards?deckId={german}")).await.json();
    let cards = cards.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["front"], "hallo");
}

mod common;

use common::{InMemoryDirectory, RecordingPush, TestApp, CHANNEL_ID};
use rissala_notifications::logic::{CLICK_ACTION, NEW_MESSAGE_TITLE, NEW_PRODUCT_TITLE};
use serde_json::json;

// --- Token registration ---

#[tokio::test]
async fn test_register_token_writes_once_and_succeeds() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/notifications/fcm-token",
            json!({"token": "TKN", "user_id": "u1"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(
        app.directory.writes(),
        vec![("u1".to_string(), "TKN".to_string())]
    );
    assert_eq!(app.directory.token_of("u1").as_deref(), Some("TKN"));
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_register_token_last_write_wins() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    app.post(
        "/api/notifications/fcm-token",
        json!({"token": "OLD", "user_id": "u1"}),
    )
    .await;
    app.post(
        "/api/notifications/fcm-token",
        json!({"token": "NEW", "user_id": "u1"}),
    )
    .await;

    assert_eq!(app.directory.token_of("u1").as_deref(), Some("NEW"));
}

#[tokio::test]
async fn test_register_token_missing_fields() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    for body in [
        json!({"token": "TKN"}),
        json!({"user_id": "u1"}),
        json!({"token": "", "user_id": "u1"}),
        json!({}),
    ] {
        let (status, response) = app.post("/api/notifications/fcm-token", body).await;
        assert_eq!(status, 400);
        assert_eq!(
            response,
            json!({"success": false, "error": "Token ou user_id manquant"})
        );
    }

    assert!(app.directory.writes().is_empty());
}

#[tokio::test]
async fn test_register_token_zero_user_id_is_missing() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/notifications/fcm-token",
            json!({"token": "T", "user_id": 0}),
        )
        .await;

    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"success": false, "error": "Token ou user_id manquant"})
    );
    assert!(app.directory.writes().is_empty());
    assert_eq!(app.directory.token_of("0"), None);
}

#[tokio::test]
async fn test_register_token_malformed_body_is_missing_fields() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    let (status, _) = app
        .post_raw("/api/notifications/fcm-token", "{not json")
        .await;

    assert_eq!(status, 400);
    assert!(app.directory.writes().is_empty());
}

#[tokio::test]
async fn test_register_token_store_failure_is_500() {
    let app = TestApp::new(
        InMemoryDirectory::default().failing_writes(),
        RecordingPush::default(),
    );

    let (status, body) = app
        .post(
            "/api/notifications/fcm-token",
            json!({"token": "TKN", "user_id": "u1"}),
        )
        .await;

    assert_eq!(status, 500);
    assert_eq!(body, json!({"success": false, "error": "Erreur serveur"}));
}

// --- Product broadcast ---

#[tokio::test]
async fn test_product_broadcast_skips_seller_and_tokenless_users() {
    let directory = InMemoryDirectory::with_users([
        ("seller", Some("SELLER_TKN")),
        ("u1", Some("T1")),
        ("u2", None),
        ("u3", Some("")),
        ("u4", Some("T4")),
    ]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post("/api/products", json!({"title": "Vélo", "sellerId": "seller"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true, "message": "Produit publié"}));
    assert_eq!(app.push.sent_tokens(), vec!["T1", "T4"]);

    for sent in app.push.sent() {
        let message = sent.message;
        assert_eq!(message.notification.title, NEW_PRODUCT_TITLE);
        assert_eq!(message.notification.body, "Découvrez : Vélo");
        assert_eq!(message.data["type"], "nouveau_produit");
        assert_eq!(message.data["click_action"], CLICK_ACTION);
        assert!(message.data["relatedId"].parse::<i64>().is_ok());
        assert_eq!(message.android.notification.channel_id, CHANNEL_ID);
    }
}

#[tokio::test]
async fn test_product_broadcast_continues_after_failure() {
    let directory =
        InMemoryDirectory::with_users([("u1", Some("T1")), ("u2", Some("T2")), ("u3", Some("T3"))]);
    let app = TestApp::new(directory, RecordingPush::failing_for(&["T1"]));

    let (status, body) = app
        .post("/api/products", json!({"title": "Table", "sellerId": "u9"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert_eq!(app.push.sent_tokens(), vec!["T1", "T2", "T3"]);
}

#[tokio::test]
async fn test_product_missing_fields() {
    let directory = InMemoryDirectory::with_users([("u1", Some("T1"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app.post("/api/products", json!({"title": "Vélo"})).await;

    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"success": false, "error": "Titre ou vendeur manquant"})
    );
    assert_eq!(app.directory.reads(), 0);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_product_directory_failure_still_succeeds() {
    let directory = InMemoryDirectory::with_users([("u1", Some("T1"))]).failing_reads();
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post("/api/products", json!({"title": "Vélo", "sellerId": "s"}))
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["success"], json!(true));
    assert!(app.push.sent().is_empty());
}

// --- Demands ---

#[tokio::test]
async fn test_demand_notifies_seller() {
    let directory = InMemoryDirectory::with_users([("seller", Some("SELLER_TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/demands",
            json!({"productId": "p42", "sellerId": "seller", "buyerName": "Awa"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));

    let sent = app.push.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0].message;
    assert_eq!(message.token, "SELLER_TKN");
    assert_eq!(message.notification.body, "Awa souhaite acheter votre produit.");
    assert_eq!(message.data["type"], "nouvelle_demande");
    assert_eq!(message.data["relatedId"], "p42");
}

#[tokio::test]
async fn test_demand_without_seller_token_is_silent() {
    let directory = InMemoryDirectory::with_users([("seller", None)]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/demands",
            json!({"productId": "p42", "sellerId": "seller", "buyerName": "Awa"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));

    let (status, _) = app
        .post(
            "/api/demands",
            json!({"productId": "p42", "sellerId": "unknown", "buyerName": "Awa"}),
        )
        .await;
    assert_eq!(status, 200);

    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_demand_missing_fields() {
    let app = TestApp::new(InMemoryDirectory::default(), RecordingPush::default());

    let (status, body) = app
        .post("/api/demands", json!({"sellerId": "seller", "buyerName": "Awa"}))
        .await;

    assert_eq!(status, 400);
    assert_eq!(body, json!({"success": false, "error": "Données manquantes"}));
    assert_eq!(app.directory.reads(), 0);
}

#[tokio::test]
async fn test_demand_missing_seller_id() {
    let directory = InMemoryDirectory::with_users([("seller", Some("SELLER_TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    for body in [
        json!({"productId": "p42", "buyerName": "Awa"}),
        json!({"productId": "p42", "sellerId": "", "buyerName": "Awa"}),
        json!({"productId": "p42", "sellerId": null, "buyerName": "Awa"}),
    ] {
        let (status, response) = app.post("/api/demands", body).await;
        assert_eq!(status, 400);
        assert_eq!(
            response,
            json!({"success": false, "error": "Données manquantes"})
        );
    }

    assert_eq!(app.directory.reads(), 0);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_demand_push_failure_still_succeeds() {
    let directory = InMemoryDirectory::with_users([("seller", Some("SELLER_TKN"))]);
    let app = TestApp::new(directory, RecordingPush::failing_all());

    let (status, body) = app
        .post(
            "/api/demands",
            json!({"productId": "p42", "sellerId": "seller", "buyerName": "Awa"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));
    assert_eq!(app.push.sent().len(), 1);
}

// --- Messages ---

#[tokio::test]
async fn test_message_body_is_truncated() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/messages",
            json!({
                "senderName": "Ali",
                "receiverId": "u1",
                "content": "Hello there, is the item still available today?"
            }),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));

    let sent = app.push.sent();
    assert_eq!(sent.len(), 1);
    let message = &sent[0].message;
    assert_eq!(message.token, "TKN");
    assert_eq!(message.notification.title, NEW_MESSAGE_TITLE);
    assert_eq!(
        message.notification.body,
        "De Ali: Hello there, is the item still..."
    );
    assert_eq!(message.data["type"], "nouveau_message");
    assert_eq!(message.data["relatedId"], "u1");
}

#[tokio::test]
async fn test_short_message_is_passed_through() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    app.post(
        "/api/messages",
        json!({"senderName": "Ali", "receiverId": "u1", "content": "Toujours dispo ?"}),
    )
    .await;

    let sent = app.push.sent();
    assert_eq!(sent[0].message.notification.body, "De Ali: Toujours dispo ?");
}

#[tokio::test]
async fn test_message_missing_fields() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post("/api/messages", json!({"senderName": "Ali", "receiverId": "u1"}))
        .await;

    assert_eq!(status, 400);
    assert_eq!(
        body,
        json!({"success": false, "error": "Destinataire ou message manquant"})
    );
    assert_eq!(app.directory.reads(), 0);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_message_missing_receiver_id() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]);
    let app = TestApp::new(directory, RecordingPush::default());

    for body in [
        json!({"senderName": "Ali", "content": "Salut"}),
        json!({"senderName": "Ali", "receiverId": "", "content": "Salut"}),
        json!({"senderName": "Ali", "receiverId": 0, "content": "Salut"}),
    ] {
        let (status, response) = app.post("/api/messages", body).await;
        assert_eq!(status, 400);
        assert_eq!(
            response,
            json!({"success": false, "error": "Destinataire ou message manquant"})
        );
    }

    assert_eq!(app.directory.reads(), 0);
    assert!(app.push.sent().is_empty());
}

#[tokio::test]
async fn test_message_push_failure_still_succeeds() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]);
    let app = TestApp::new(directory, RecordingPush::failing_all());

    let (status, body) = app
        .post(
            "/api/messages",
            json!({"senderName": "Ali", "receiverId": "u1", "content": "Salut"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));
}

#[tokio::test]
async fn test_message_directory_failure_still_succeeds() {
    let directory = InMemoryDirectory::with_users([("u1", Some("TKN"))]).failing_reads();
    let app = TestApp::new(directory, RecordingPush::default());

    let (status, body) = app
        .post(
            "/api/messages",
            json!({"senderName": "Ali", "receiverId": "u1", "content": "Salut"}),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));
    assert!(app.push.sent().is_empty());
}

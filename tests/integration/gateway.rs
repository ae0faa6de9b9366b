//! Validating gateway behaviour against the recording store.

use crate::common::fixtures;
use crate::common::{RecordingStore, StoreCall, init_logging};
use mongrove::error::{ErrorCode, IssueKind, MongroveError};
use mongrove::options::{FindOneAndModifyOptions, InsertOptions, ReplaceOptions, UpdateOptions};
use mongrove::store::{Namespace, StoreError};
use mongrove::{Collection, Database, WriteOperation};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

fn database() -> (Arc<RecordingStore>, Database<RecordingStore>) {
    init_logging();
    let store = Arc::new(RecordingStore::new());
    let database = Database::new("app", Arc::clone(&store), Arc::new(fixtures::registry()));
    (store, database)
}

fn users() -> (Arc<RecordingStore>, Collection<RecordingStore>) {
    let (store, database) = database();
    let users = database.collection("user").expect("user collection");
    (store, users)
}

#[tokio::test]
async fn test_insert_one_forwards_normalized_document() {
    let (store, users) = users();

    users
        .insert_one(json!({ "email": "a@b.io" }), None)
        .await
        .expect("insert should succeed");

    let calls = store.calls().await;
    assert_eq!(calls.len(), 1);
    match &calls[0] {
        StoreCall::InsertOne {
            namespace,
            document,
        } => {
            assert_eq!(namespace, &Namespace::new("app", "user"));
            assert_eq!(document["email"], json!("a@b.io"));
            assert_eq!(document["score"], json!(0));
            assert!(document["createdAt"].is_string());
            assert!(document.get("tags").is_none());
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_insert_never_reaches_store() {
    let (store, users) = users();

    let error = users
        .insert_one(json!({ "email": "not-an-email", "score": 1 }), None)
        .await
        .unwrap_err();

    match &error {
        MongroveError::Validation(validation) => {
            assert_eq!(validation.code, ErrorCode::InsertFailed);
            assert_eq!(validation.operation, WriteOperation::InsertOne);
            assert_eq!(validation.collection, "user");
            assert!(validation.issues[0].is_at("email"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(error.to_string().contains("Invalid email at \"email\""));
    assert_eq!(store.call_count().await, 0);
}

#[tokio::test]
async fn test_validate_false_bypasses_validation() {
    let (store, users) = users();

    let document = json!({ "email": "not-an-email", "unknown": true });
    users
        .insert_one(document.clone(), InsertOptions::unvalidated())
        .await
        .expect("unvalidated insert should pass through");

    assert_eq!(
        store.calls().await,
        vec![StoreCall::InsertOne {
            namespace: Namespace::new("app", "user"),
            document,
        }]
    );
}

#[tokio::test]
async fn test_insert_many_reports_document_index() {
    let (store, users) = users();

    let error = users
        .insert_many(
            vec![json!({ "email": "a@b.io" }), json!({ "email": "a@b.io", "score": -3 })],
            None,
        )
        .await
        .unwrap_err();

    let issues = error.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].path_string(), "[1].score");
    assert_eq!(store.call_count().await, 0);
}

#[tokio::test]
async fn test_insert_many_forwards_every_document() {
    let (store, users) = users();

    let result = users
        .insert_many(
            vec![
                json!({ "_id": "507f1f77bcf86cd799439011", "email": "a@b.io" }),
                json!({ "email": "c@d.io" }),
            ],
            None,
        )
        .await;
    // `_id` is not declared on the user schema
    assert!(result.is_err());

    users
        .insert_many(vec![json!({ "email": "a@b.io" }), json!({ "email": "c@d.io" })], None)
        .await
        .expect("insert many");

    match &store.calls().await[0] {
        StoreCall::InsertMany { documents, .. } => {
            assert_eq!(documents.len(), 2);
            assert!(documents.iter().all(|d| d["score"] == json!(0)));
        }
        other => panic!("unexpected call: {:?}", other),
    }
}

#[tokio::test]
async fn test_replace_validates_full_document() {
    let (store, users) = users();

    // Replacement must be a complete document
    let error = users
        .replace_one(json!({ "email": "a@b.io" }), json!({ "score": 3 }), None)
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some(ErrorCode::ReplaceFailed));

    users
        .replace_one(
            json!({ "email": "a@b.io" }),
            json!({ "email": "b@b.io", "score": 3 }),
            ReplaceOptions {
                upsert: true,
                ..ReplaceOptions::default()
            },
        )
        .await
        .expect("replace");

    let returned = users
        .find_one_and_replace(
            json!({ "email": "b@b.io" }),
            json!({ "email": "c@b.io" }),
            None,
        )
        .await
        .expect("find one and replace")
        .expect("document");
    assert_eq!(returned["score"], json!(0));
    assert_eq!(store.call_count().await, 2);
}

#[tokio::test]
async fn test_update_forwards_original_expression() {
    let (store, users) = users();

    let update = json!({ "$set": { "email": "new@b.io" }, "$inc": { "score": 1 } });
    users
        .update_one(json!({ "email": "a@b.io" }), update.clone(), None)
        .await
        .expect("update");

    assert_eq!(
        store.calls().await,
        vec![StoreCall::UpdateOne {
            namespace: Namespace::new("app", "user"),
            filter: json!({ "email": "a@b.io" }),
            update,
        }]
    );
}

#[tokio::test]
async fn test_update_checks_operator_operands() {
    let (store, users) = users();

    let error = users
        .update_many(json!({}), json!({ "$inc": { "score": 1.5 } }), None)
        .await
        .unwrap_err();
    assert_eq!(error.code(), Some(ErrorCode::UpdateFailed));
    assert_eq!(error.issues()[0].kind, IssueKind::NotInteger);

    let error = users
        .update_one(json!({}), json!({ "$set": { "nickname": "al" } }), None)
        .await
        .unwrap_err();
    assert!(matches!(error.issues()[0].kind, IssueKind::UnrecognizedKeys(_)));

    let error = users
        .find_one_and_update(json!({}), json!({ "$push": { "tags": 7 } }), None)
        .await
        .unwrap_err();
    assert_eq!(error.issues()[0].path_string(), "tags[0]");

    assert_eq!(store.call_count().await, 0);
}

#[tokio::test]
async fn test_update_set_precedence() {
    let (_store, users) = users();

    // $set wins, so the invalid $inc operand is never checked
    users
        .update_one(
            json!({}),
            json!({ "$inc": { "score": "five" }, "$set": { "score": 10 } }),
            None,
        )
        .await
        .expect("set takes precedence");

    // ...and an invalid $set value is caught even when $inc is fine
    let error = users
        .update_one(
            json!({}),
            json!({ "$inc": { "score": 5 }, "$set": { "score": "ten" } }),
            None,
        )
        .await
        .unwrap_err();
    assert!(error.issues()[0].is_at("score"));
}

#[tokio::test]
async fn test_update_push_each_and_unsupported_operators() {
    let (store, users) = users();

    users
        .update_one(
            json!({}),
            json!({
                "$push": { "tags": { "$each": ["a", "b"] } },
                "$unset": { "profile": "" }
            }),
            None,
        )
        .await
        .expect("push each");

    let error = users
        .update_one(
            json!({}),
            json!({ "$addToSet": { "tags": { "$each": ["a", "b", "c", "d", "e", "f"] } } }),
            None,
        )
        .await
        .unwrap_err();
    assert!(error.to_string().contains("at most 5"));

    users
        .update_many(json!({}), json!({ "$set": { "tags": [1] } }), UpdateOptions::unvalidated())
        .await
        .expect("unvalidated update");
    assert_eq!(store.call_count().await, 2);
}

#[tokio::test]
async fn test_update_nested_object_is_validated_in_full() {
    let (_store, users) = users();

    let error = users
        .update_one(
            json!({}),
            json!({ "$set": { "profile": { "website": null } } }),
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(error.issues()[0].path_string(), "profile.displayName");
    assert_eq!(error.issues()[0].kind, IssueKind::Required);

    users
        .update_one(
            json!({}),
            json!({ "$set": { "profile": { "displayName": "Al", "website": null } } }),
            None,
        )
        .await
        .expect("complete nested object");
}

#[tokio::test]
async fn test_server_errors_are_translated() {
    let (store, users) = users();
    store
        .fail("insertOne", StoreError::server(11000, "E11000 duplicate key"))
        .await;

    let error = users
        .insert_one(json!({ "email": "a@b.io" }), None)
        .await
        .unwrap_err();

    match error {
        MongroveError::Server(server) => {
            assert_eq!(server.code, ErrorCode::InsertFailed);
            assert_eq!(server.operation, WriteOperation::InsertOne);
            assert_eq!(server.collection, "user");
            assert_eq!(server.source, StoreError::server(11000, "E11000 duplicate key"));
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_api_and_other_errors_pass_through() {
    let (store, users) = users();
    store.fail("updateOne", StoreError::api("client was closed")).await;
    store.fail("replaceOne", StoreError::other("connection reset")).await;

    let error = users
        .update_one(json!({}), json!({ "$set": { "score": 1 } }), None)
        .await
        .unwrap_err();
    assert!(matches!(error, MongroveError::Api(_)));

    let error = users
        .replace_one(json!({}), json!({ "email": "a@b.io" }), None)
        .await
        .unwrap_err();
    assert!(matches!(error, MongroveError::Store(_)));
    assert_eq!(error.code(), None);
}

#[tokio::test]
async fn test_unknown_collection_is_invalid_argument() {
    let (_store, database) = database();

    let error = database.collection("comments").unwrap_err();
    assert_eq!(error.code(), Some(ErrorCode::InvalidArgument));
    assert!(error.to_string().contains("comments"));
}

#[tokio::test]
async fn test_typed_inserts() {
    #[derive(Serialize)]
    struct NewPost<'a> {
        #[serde(rename = "authorId")]
        author_id: &'a str,
        body: Option<&'a str>,
    }

    let (store, database) = database();
    let posts = database.collection("post").expect("post collection");

    posts
        .insert_one_typed(
            &NewPost {
                author_id: "507f1f77bcf86cd799439011",
                body: None,
            },
            None,
        )
        .await
        .expect("typed insert");

    match &store.calls().await[0] {
        StoreCall::InsertOne { document, .. } => {
            assert_eq!(
                document,
                &json!({
                    "authorId": "507f1f77bcf86cd799439011",
                    "status": "draft",
                    "body": null
                })
            );
        }
        other => panic!("unexpected call: {:?}", other),
    }

    let error = posts
        .insert_many_typed(
            &[NewPost {
                author_id: "nope",
                body: Some("hi"),
            }],
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(error.issues()[0].message(), "Invalid ObjectId");
}

#[tokio::test]
async fn test_find_one_and_update_with_options() {
    let (store, database) = database();
    let posts = database.collection("post").expect("post collection");

    posts
        .find_one_and_update(
            json!({ "authorId": { "$oid": "507f1f77bcf86cd799439011" } }),
            json!({ "$set": { "status": "published", "body": null } }),
            FindOneAndModifyOptions {
                upsert: true,
                ..FindOneAndModifyOptions::default()
            },
        )
        .await
        .expect("find one and update");

    let error = posts
        .find_one_and_update(json!({}), json!({ "$set": { "status": "archived" } }), None)
        .await
        .unwrap_err();
    assert_eq!(
        error.issues()[0].message(),
        "Invalid enum value. Expected 'draft' | 'published', received 'archived'"
    );
    assert_eq!(store.call_count().await, 1);
}

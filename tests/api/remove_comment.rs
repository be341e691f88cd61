use serde_json::json;

use crate::helpers::{self, TestApp, TestUser, result_body};

async fn comment_as(app: &TestApp, user: &TestUser, checkin_id: &str) -> String {
    let body = result_body(
        app.add_comment(checkin_id, user, &json!({ "comment": "to be removed" }))
            .await,
    )
    .await;
    assert_eq!(body["success"], true);

    app.store
        .comments()
        .last()
        .expect("comment was stored")
        .id
        .to_string()
}

#[tokio::test]
async fn author_can_remove_their_comment() {
    let app = helpers::spawn_app().await;
    let owner = app.create_user(false);
    let friend = app.create_user(false);
    app.befriend(&owner, &friend);
    let checkin_id = app.create_checkin(&owner);
    let comment_id = comment_as(&app, &friend, checkin_id.as_ref()).await;

    let body = result_body(app.remove_comment(&comment_id, &friend).await).await;

    assert_eq!(body, json!({ "success": true, "errors": [] }));
    assert!(app.store.comments().is_empty());
}

#[tokio::test]
async fn checkin_owner_can_remove_a_friends_comment() {
    let app = helpers::spawn_app().await;
    let owner = app.create_user(false);
    let friend = app.create_user(false);
    app.befriend(&owner, &friend);
    let checkin_id = app.create_checkin(&owner);
    let comment_id = comment_as(&app, &friend, checkin_id.as_ref()).await;

    let body = result_body(app.remove_comment(&comment_id, &owner).await).await;

    assert_eq!(body["success"], true);
    assert!(app.store.comments().is_empty());
}

#[tokio::test]
async fn another_friend_cannot_remove_the_comment() {
    let app = helpers::spawn_app().await;
    let owner = app.create_user(false);
    let author = app.create_user(false);
    let bystander = app.create_user(false);
    app.befriend(&owner, &author);
    app.befriend(&owner, &bystander);
    let checkin_id = app.create_checkin(&owner);
    let comment_id = comment_as(&app, &author, checkin_id.as_ref()).await;
    let before = app.store.comments();

    let body = result_body(app.remove_comment(&comment_id, &bystander).await).await;

    assert_eq!(body, json!({ "success": false, "errors": ["NOT_AUTHORIZED"] }));
    assert_eq!(app.store.comments(), before);
}

#[tokio::test]
async fn removing_an_already_removed_comment_fails_cleanly() {
    let app = helpers::spawn_app().await;
    let owner = app.create_user(false);
    let checkin_id = app.create_checkin(&owner);
    let comment_id = comment_as(&app, &owner, checkin_id.as_ref()).await;

    let first = result_body(app.remove_comment(&comment_id, &owner).await).await;
    let second = result_body(app.remove_comment(&comment_id, &owner).await).await;

    assert_eq!(first["success"], true);
    assert_eq!(second, json!({ "success": false, "errors": ["UNEXPECTED_ERROR"] }));
}

#[tokio::test]
async fn malformed_comment_id_yields_the_generic_error() {
    let app = helpers::spawn_app().await;
    let owner = app.create_user(false);

    let body = result_body(app.remove_comment(&"f".repeat(65), &owner).await).await;

    assert_eq!(body["errors"], json!(["UNEXPECTED_ERROR"]));
    assert!(app.store.calls().is_empty());
}

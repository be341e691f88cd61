use chrono::{DateTime, Duration, TimeZone, Utc};
use claims::{assert_err, assert_ok};
use fourgoats::domain::{CheckinId, CommentBody, CommentId, UserId, VenueInfo};
use fourgoats::repository::{CommentStore, IdentityResolver, PgCommentStore, PgIdentityResolver};
use secrecy::Secret;
use serde_json::json;
use sqlx::PgPool;

use crate::helpers::{self, result_body};

async fn seed_user(pool: &PgPool, id: &str, is_public: bool) -> UserId {
    sqlx::query("INSERT INTO users (id, first_name, last_name, is_public) VALUES ($1, $2, $3, $4)")
        .bind(id)
        .bind("Billy")
        .bind(id)
        .bind(is_public)
        .execute(pool)
        .await
        .expect("Failed to seed user");
    UserId::new(id)
}

async fn seed_session(pool: &PgPool, token: &str, user: &UserId, expires_at: DateTime<Utc>) {
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user.as_ref())
        .bind(expires_at)
        .execute(pool)
        .await
        .expect("Failed to seed session");
}

async fn seed_friend_row(pool: &PgPool, user: &UserId, friend: &UserId) {
    sqlx::query("INSERT INTO friends (user_id, friend_user_id) VALUES ($1, $2)")
        .bind(user.as_ref())
        .bind(friend.as_ref())
        .execute(pool)
        .await
        .expect("Failed to seed friendship");
}

async fn seed_checkin(
    pool: &PgPool,
    id: &str,
    owner: &UserId,
    venue_website: Option<&str>,
) -> CheckinId {
    let venue_id = format!("venue{id}");
    sqlx::query("INSERT INTO venues (id, name, website) VALUES ($1, $2, $3)")
        .bind(&venue_id)
        .bind("Goat Farm")
        .bind(venue_website)
        .execute(pool)
        .await
        .expect("Failed to seed venue");
    sqlx::query("INSERT INTO checkins (id, user_id, venue_id) VALUES ($1, $2, $3)")
        .bind(id)
        .bind(owner.as_ref())
        .bind(&venue_id)
        .execute(pool)
        .await
        .expect("Failed to seed checkin");
    CheckinId::parse(id.to_string()).expect("valid checkin id")
}

fn comment_id(id: &str) -> CommentId {
    CommentId::parse(id.to_string()).expect("valid comment id")
}

fn body(text: &str) -> CommentBody {
    CommentBody::parse(text.to_string()).expect("valid comment body")
}

#[tokio::test]
async fn expired_sessions_do_not_resolve() {
    let pool = helpers::test_database().await;
    let identity = PgIdentityResolver::new(pool.clone());
    let user = seed_user(&pool, "billy", false).await;
    seed_session(&pool, "live", &user, Utc::now() + Duration::hours(1)).await;
    seed_session(&pool, "stale", &user, Utc::now() - Duration::hours(1)).await;

    let resolved = assert_ok!(identity.resolve_user(&Secret::new("live".to_string())).await);
    assert_eq!(resolved, user);
    assert_err!(identity.resolve_user(&Secret::new("stale".to_string())).await);
    assert_err!(identity.resolve_user(&Secret::new("unknown".to_string())).await);
}

#[tokio::test]
async fn friendship_rows_are_directional() {
    let pool = helpers::test_database().await;
    let identity = PgIdentityResolver::new(pool.clone());
    let billy = seed_user(&pool, "billy", false).await;
    let nanny = seed_user(&pool, "nanny", false).await;
    seed_friend_row(&pool, &billy, &nanny).await;

    assert!(assert_ok!(identity.is_friend(&billy, &nanny).await));
    assert!(!assert_ok!(identity.is_friend(&nanny, &billy).await));
}

#[tokio::test]
async fn checkin_lookups_fail_for_unknown_checkins() {
    let pool = helpers::test_database().await;
    let identity = PgIdentityResolver::new(pool.clone());
    let store = PgCommentStore::new(pool.clone());
    let owner = seed_user(&pool, "owner", true).await;
    let checkin_id = seed_checkin(&pool, "checkin1", &owner, None).await;
    let missing = CheckinId::parse("nope".to_string()).expect("valid checkin id");

    assert_eq!(assert_ok!(identity.get_checkin_owner(&checkin_id).await), owner);
    assert!(assert_ok!(identity.is_checkin_owner_profile_public(&checkin_id).await));
    assert_err!(identity.get_checkin_owner(&missing).await);
    assert_err!(identity.is_checkin_owner_profile_public(&missing).await);
    assert_err!(store.get_venue_info(&missing).await);
}

#[tokio::test]
async fn missing_venue_website_reads_as_empty() {
    let pool = helpers::test_database().await;
    let store = PgCommentStore::new(pool.clone());
    let owner = seed_user(&pool, "owner", false).await;
    let bare = seed_checkin(&pool, "bare", &owner, None).await;
    let linked = seed_checkin(&pool, "linked", &owner, Some("https://goat.example")).await;

    assert_eq!(
        assert_ok!(store.get_venue_info(&bare).await),
        VenueInfo {
            venue_name: "Goat Farm".to_string(),
            venue_website: String::new(),
        }
    );
    assert_eq!(
        assert_ok!(store.get_venue_info(&linked).await).venue_website,
        "https://goat.example"
    );
}

#[tokio::test]
async fn comments_are_listed_oldest_first_with_id_breaking_ties() {
    let pool = helpers::test_database().await;
    let store = PgCommentStore::new(pool.clone());
    let owner = seed_user(&pool, "owner", false).await;
    let checkin_id = seed_checkin(&pool, "checkin1", &owner, None).await;
    let noon = Utc.with_ymd_and_hms(2012, 6, 1, 12, 0, 0).unwrap();

    for (id, at) in [
        ("late", noon + Duration::minutes(5)),
        ("tieb", noon),
        ("tiea", noon),
    ] {
        assert_ok!(
            store
                .insert_comment(at, &comment_id(id), &owner, &body(id), &checkin_id)
                .await
        );
    }

    let fields = assert_ok!(store.select_comments_by_checkin(&checkin_id).await);

    assert_eq!(fields["commentID0"], "tiea");
    assert_eq!(fields["commentID1"], "tieb");
    assert_eq!(fields["commentID2"], "late");
    assert_eq!(fields["dateTime0"], "2012-06-01T12:00:00.000Z");
    assert_eq!(fields["lastName0"], "owner");
}

#[tokio::test]
async fn duplicate_comment_ids_are_rejected() {
    let pool = helpers::test_database().await;
    let store = PgCommentStore::new(pool.clone());
    let owner = seed_user(&pool, "owner", false).await;
    let checkin_id = seed_checkin(&pool, "checkin1", &owner, None).await;
    let id = comment_id("abc123");

    assert_ok!(
        store
            .insert_comment(Utc::now(), &id, &owner, &body("first"), &checkin_id)
            .await
    );
    assert_err!(
        store
            .insert_comment(Utc::now(), &id, &owner, &body("second"), &checkin_id)
            .await
    );
}

#[tokio::test]
async fn deleting_a_comment_twice_fails_the_second_time() {
    let pool = helpers::test_database().await;
    let identity = PgIdentityResolver::new(pool.clone());
    let store = PgCommentStore::new(pool.clone());
    let owner = seed_user(&pool, "owner", false).await;
    let checkin_id = seed_checkin(&pool, "checkin1", &owner, None).await;
    let id = comment_id("abc123");
    assert_ok!(
        store
            .insert_comment(Utc::now(), &id, &owner, &body("hello"), &checkin_id)
            .await
    );

    assert!(assert_ok!(identity.is_comment_owner(&owner, &id).await));
    assert_eq!(
        assert_ok!(store.get_checkin_id_for_comment(&id).await),
        checkin_id
    );

    assert_ok!(store.delete_comment(&id).await);
    assert_err!(store.delete_comment(&id).await);
    assert_err!(store.get_checkin_id_for_comment(&id).await);
    assert!(!assert_ok!(identity.is_comment_owner(&owner, &id).await));
}

#[tokio::test]
async fn comments_round_trip_through_the_postgres_backed_app() {
    let app = helpers::spawn_pg_app().await;
    let owner = seed_user(&app.db_pool, "owner", false).await;
    let stranger = seed_user(&app.db_pool, "stranger", false).await;
    let expires_at = Utc::now() + Duration::hours(1);
    seed_session(&app.db_pool, "ownertoken", &owner, expires_at).await;
    seed_session(&app.db_pool, "strangertoken", &stranger, expires_at).await;
    let checkin_id =
        seed_checkin(&app.db_pool, "checkin1", &owner, Some("https://goat.example")).await;

    let add = |token: &'static str, text: &'static str| {
        app.api_client
            .post(format!("{}/v1/comments/add/{}", app.address, checkin_id))
            .query(&[("sessionToken", token)])
            .json(&json!({ "comment": text }))
            .send()
    };
    let get = |token: &'static str| {
        app.api_client
            .get(format!("{}/v1/comments/get/{}", app.address, checkin_id))
            .query(&[("sessionToken", token)])
            .send()
    };

    let response = add("ownertoken", "baa").await.expect("Failed to execute request.");
    let added = result_body(response).await;
    assert_eq!(added, json!({ "success": true, "errors": [] }));

    let response = add("strangertoken", "baa").await.expect("Failed to execute request.");
    let denied = result_body(response).await;
    assert_eq!(denied, json!({ "success": false, "errors": ["NOT_AUTHORIZED"] }));

    let response = get("ownertoken").await.expect("Failed to execute request.");
    let listed = result_body(response).await;
    assert_eq!(listed["success"], true);
    assert_eq!(listed["comments"]["comment0"], "baa");
    assert_eq!(listed["comments"]["userID0"], "owner");
    assert_eq!(listed["comments"]["venueWebsite"], "https://goat.example");
    assert!(listed["comments"].get("comment1").is_none());
}

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use crate::{authentication::SessionQuery, domain::AddCommentPayload, services::CommentService};

#[derive(Deserialize, Debug)]
pub struct CheckinPathParams {
    pub checkin_id: String,
}

#[derive(Deserialize, Debug)]
pub struct CommentPathParams {
    pub comment_id: String,
}

// Handlers answer 200 with the operation result whatever the outcome;
// `success` and `errors` in the body carry the verdict.

pub async fn add_comment(
    path: web::Path<CheckinPathParams>,
    session: web::Query<SessionQuery>,
    payload: web::Json<AddCommentPayload>,
    service: web::Data<CommentService>,
) -> HttpResponse {
    let result = service
        .add_comment(
            &session.session_token,
            payload.into_inner().comment,
            path.into_inner().checkin_id,
        )
        .await;

    HttpResponse::Ok().json(result)
}

pub async fn remove_comment(
    path: web::Path<CommentPathParams>,
    session: web::Query<SessionQuery>,
    service: web::Data<CommentService>,
) -> HttpResponse {
    let result = service
        .remove_comment(&session.session_token, path.into_inner().comment_id)
        .await;

    HttpResponse::Ok().json(result)
}

pub async fn get_comments(
    path: web::Path<CheckinPathParams>,
    session: web::Query<SessionQuery>,
    service: web::Data<CommentService>,
) -> HttpResponse {
    let result = service
        .get_comments(&session.session_token, path.into_inner().checkin_id)
        .await;

    HttpResponse::Ok().json(result)
}

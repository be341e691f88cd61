use actix_web::web;

use crate::routes;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/add/{checkin_id}", web::post().to(routes::add_comment))
        .route(
            "/remove/{comment_id}",
            web::delete().to(routes::remove_comment),
        )
        .route("/get/{checkin_id}", web::get().to(routes::get_comments));
}

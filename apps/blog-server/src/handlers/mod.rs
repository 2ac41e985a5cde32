//! HTTP handlers and route configuration.

mod feed;
mod health;
mod interactions;
mod posts;
mod present;
mod search;
mod widgets;

#[cfg(test)]
mod tests;

use actix_web::web;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api").route("/health", web::get().to(health::health_check)))
        .service(
            web::scope("/blog")
                .route("", web::get().to(posts::list_posts))
                .route("/feed", web::get().to(feed::latest_posts_feed))
                .route("/search", web::get().to(search::search_posts))
                .route("/widgets", web::get().to(widgets::widgets))
                .route("/tag/{tag_slug}", web::get().to(posts::list_posts_by_tag))
                .route(
                    "/{year}/{month}/{day}/{slug}",
                    web::get().to(posts::post_detail),
                )
                .service(
                    web::resource("/{post_id}/share")
                        .route(web::get().to(interactions::share_target))
                        .route(web::post().to(interactions::share_post)),
                )
                .route("/{post_id}/comment", web::post().to(interactions::add_comment)),
        );
}

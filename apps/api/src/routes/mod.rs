pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::admin::handlers as admin;
use crate::auth::handlers as auth;
use crate::content::{contact, handlers as content, site};
use crate::membership::handlers as membership;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    let api = Router::new()
        .route("/", get(content::handle_root))
        // Auth
        .route("/auth/register", post(auth::handle_register))
        .route("/auth/login", post(auth::handle_login))
        .route("/auth/me", get(auth::handle_me))
        .route("/auth/google", post(auth::handle_google))
        // Catalog
        .route("/courses", get(content::handle_list_courses))
        .route("/courses/:id", get(content::handle_get_course))
        .route("/courses/:id/lessons", get(content::handle_list_lessons))
        .route("/resources", get(content::handle_list_resources))
        .route("/podcast/episodes", get(content::handle_list_episodes))
        .route("/community/posts", get(content::handle_list_posts))
        .route("/community/posts/:id", get(content::handle_get_post))
        .route("/news/articles", get(content::handle_list_articles))
        .route("/news/sources", get(content::handle_list_sources))
        .route("/content/:section", get(site::handle_get_section))
        .route("/contact", post(contact::handle_contact))
        // Membership
        .route("/membership/tiers", get(membership::handle_list_tiers))
        .route("/membership/subscribe", post(membership::handle_subscribe))
        // Admin
        .route("/admin/login", post(admin::handle_login))
        .route("/admin/analytics/content", get(admin::handle_analytics))
        .route(
            "/admin/upload",
            post(admin::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/admin/files", get(admin::handle_list_files))
        .route("/admin/podcast/list", get(admin::handle_list_podcasts))
        .route("/admin/podcast/update", post(admin::handle_update_podcasts))
        .route(
            "/admin/content/:section",
            get(admin::handle_get_content).post(admin::handle_save_content),
        );

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .with_state(state)
}

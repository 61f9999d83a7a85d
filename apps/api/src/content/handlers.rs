use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::OptionalUser;
use crate::errors::AppError;
use crate::membership::{can_access, MembershipTier};
use crate::models::content::{
    CommunityPost, Course, Lesson, NewsArticle, NewsSource, PodcastEpisode, Resource,
    NEWS_SOURCES,
};
use crate::state::AppState;
use crate::store::{self, Collection};

/// Listing endpoints never return more than this many posts or articles.
const FEED_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct CourseFilter {
    pub category: Option<String>,
    pub tier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResourceFilter {
    pub resource_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EpisodeFilter {
    pub season: Option<u32>,
}

/// A resource as shown to one viewer. Locked resources omit `download_url`.
#[derive(Debug, Serialize)]
pub struct ResourceView {
    #[serde(flatten)]
    pub resource: Resource,
    pub locked: bool,
}

impl ResourceView {
    pub fn for_viewer(mut resource: Resource, viewer_tier: MembershipTier) -> Self {
        let locked = !can_access(viewer_tier, resource.tier_required);
        if locked {
            resource.download_url = None;
        }
        Self { resource, locked }
    }
}

/// GET /api
pub async fn handle_root() -> Json<Value> {
    Json(json!({
        "message": "Coaching API - content, courses and membership",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /api/courses
pub async fn handle_list_courses(
    State(state): State<AppState>,
    Query(filter): Query<CourseFilter>,
) -> Result<Json<Vec<Course>>, AppError> {
    let tier = filter
        .tier
        .as_deref()
        .map(str::parse::<MembershipTier>)
        .transpose()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let query = store::Query::all()
        .eq_opt("category", filter.category)
        .eq_opt("tier", tier.map(MembershipTier::as_str));
    let courses = store::find_as(state.documents.as_ref(), Collection::Courses, &query).await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id
pub async fn handle_get_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Course>, AppError> {
    let course = find_course(&state, &id).await?;
    Ok(Json(course))
}

/// GET /api/courses/:id/lessons
///
/// Free courses are open to everyone. Paid courses need a signed-in user
/// whose tier reaches the course tier.
pub async fn handle_list_lessons(
    State(state): State<AppState>,
    Path(id): Path<String>,
    OptionalUser(viewer): OptionalUser,
) -> Result<Json<Vec<Lesson>>, AppError> {
    let course = find_course(&state, &id).await?;

    if course.tier != MembershipTier::Free {
        let user = viewer.ok_or_else(AppError::authentication_required)?;
        if !user.membership_tier.can_access(course.tier) {
            return Err(AppError::Forbidden(format!(
                "This course requires a {} membership",
                course.tier
            )));
        }
    }

    let query = store::Query::all().eq("course_id", id).ascending("order");
    let lessons = store::find_as(state.documents.as_ref(), Collection::Lessons, &query).await?;
    Ok(Json(lessons))
}

async fn find_course(state: &AppState, id: &str) -> Result<Course, AppError> {
    store::get_as(state.documents.as_ref(), Collection::Courses, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
}

/// GET /api/resources
pub async fn handle_list_resources(
    State(state): State<AppState>,
    Query(filter): Query<ResourceFilter>,
    OptionalUser(viewer): OptionalUser,
) -> Result<Json<Vec<ResourceView>>, AppError> {
    let viewer_tier = viewer.map(|u| u.membership_tier).unwrap_or_default();
    let query = store::Query::all().eq_opt("resource_type", filter.resource_type);
    let resources: Vec<Resource> =
        store::find_as(state.documents.as_ref(), Collection::Resources, &query).await?;

    Ok(Json(
        resources
            .into_iter()
            .map(|r| ResourceView::for_viewer(r, viewer_tier))
            .collect(),
    ))
}

/// GET /api/podcast/episodes
pub async fn handle_list_episodes(
    State(state): State<AppState>,
    Query(filter): Query<EpisodeFilter>,
) -> Result<Json<Vec<PodcastEpisode>>, AppError> {
    let query = store::Query::all()
        .eq_opt("season", filter.season)
        .newest_first("published_at");
    let episodes =
        store::find_as(state.documents.as_ref(), Collection::PodcastEpisodes, &query).await?;
    Ok(Json(episodes))
}

/// GET /api/community/posts
pub async fn handle_list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<CommunityPost>>, AppError> {
    let query = store::Query::all()
        .newest_first("created_at")
        .limit(FEED_LIMIT);
    let posts = store::find_as(state.documents.as_ref(), Collection::CommunityPosts, &query).await?;
    Ok(Json(posts))
}

/// GET /api/community/posts/:id
pub async fn handle_get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CommunityPost>, AppError> {
    store::get_as(state.documents.as_ref(), Collection::CommunityPosts, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))
}

/// GET /api/news/articles
pub async fn handle_list_articles(
    State(state): State<AppState>,
) -> Result<Json<Vec<NewsArticle>>, AppError> {
    let query = store::Query::all()
        .newest_first("published_at")
        .limit(FEED_LIMIT);
    let articles = store::find_as(state.documents.as_ref(), Collection::NewsArticles, &query).await?;
    Ok(Json(articles))
}

/// GET /api/news/sources
pub async fn handle_list_sources() -> Json<Vec<NewsSource>> {
    Json(NEWS_SOURCES.to_vec())
}

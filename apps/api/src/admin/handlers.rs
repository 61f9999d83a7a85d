use std::collections::{BTreeMap, HashSet};

use axum::{
    extract::{multipart::Field, Multipart, Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::info;
use uuid::Uuid;

use crate::admin::gateway::AdminLogin;
use crate::auth::AdminSession;
use crate::content::site::{load_section, save_section};
use crate::errors::AppError;
use crate::membership::MembershipTier;
use crate::models::content::{PodcastEpisode, UploadedFile};
use crate::models::site::{ContentValue, SiteSection};
use crate::state::AppState;
use crate::store::object::{is_valid_folder, object_key};
use crate::store::{self, to_documents, Collection, StoreError};

const DEFAULT_FOLDER: &str = "uploads";

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/admin/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<AdminLoginRequest>,
) -> Result<Json<AdminLogin>, AppError> {
    Ok(Json(state.admin.login(&req.email, &req.password)?))
}

#[derive(Debug, Serialize)]
pub struct ContentAnalytics {
    pub total_users: u64,
    pub total_courses: u64,
    pub total_podcast_episodes: u64,
    pub total_community_posts: u64,
    pub total_resources: u64,
    pub membership_breakdown: BTreeMap<MembershipTier, u64>,
}

/// GET /api/admin/analytics/content
pub async fn handle_analytics(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ContentAnalytics>, AppError> {
    let docs = state.documents.as_ref();
    let mut membership_breakdown = BTreeMap::new();
    for tier in MembershipTier::ALL {
        membership_breakdown.insert(tier, state.users.count_by_tier(tier).await?);
    }

    Ok(Json(ContentAnalytics {
        total_users: state.users.count().await?,
        total_courses: docs.count(Collection::Courses).await?,
        total_podcast_episodes: docs.count(Collection::PodcastEpisodes).await?,
        total_community_posts: docs.count(Collection::CommunityPosts).await?,
        total_resources: docs.count(Collection::Resources).await?,
        membership_breakdown,
    }))
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub url: String,
    pub key: String,
}

struct SpooledFile {
    spool: NamedTempFile,
    filename: String,
    content_type: String,
    size: u64,
}

/// Copies a multipart field to a temp file chunk by chunk.
async fn spool_field(mut field: Field<'_>) -> Result<SpooledFile, AppError> {
    let filename = field.file_name().unwrap_or("upload").to_string();
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let spool = NamedTempFile::new().map_err(StoreError::from)?;
    let mut out = tokio::fs::File::create(spool.path())
        .await
        .map_err(StoreError::from)?;
    let mut size = 0u64;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        out.write_all(&chunk).await.map_err(StoreError::from)?;
        size += chunk.len() as u64;
    }
    out.flush().await.map_err(StoreError::from)?;

    Ok(SpooledFile {
        spool,
        filename,
        content_type,
        size,
    })
}

/// POST /api/admin/upload
/// Multipart form with a `file` part and an optional `folder` part.
pub async fn handle_upload(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut folder = DEFAULT_FOLDER.to_string();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => file = Some(spool_field(field).await?),
            Some("folder") => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?
                    .trim()
                    .to_string();
            }
            _ => {}
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".to_string()))?;
    if !is_valid_folder(&folder) {
        return Err(AppError::Validation(format!("Invalid folder '{folder}'")));
    }

    let key = object_key(&folder, &file.filename);
    let url = state
        .objects
        .put_file(file.spool.path(), &key, &file.content_type)
        .await?;

    let record = UploadedFile {
        id: Uuid::new_v4().to_string(),
        key: key.clone(),
        url: url.clone(),
        folder,
        filename: file.filename,
        content_type: file.content_type,
        size: file.size,
        uploaded_at: Utc::now(),
    };
    state
        .documents
        .insert_many(Collection::UploadedFiles, to_documents(&[record])?)
        .await?;
    info!(admin = %admin.email, key = %key, size = file.size, "Admin upload stored");

    Ok(Json(UploadResponse {
        success: true,
        url,
        key,
    }))
}

/// GET /api/admin/files
pub async fn handle_list_files(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<UploadedFile>>, AppError> {
    let query = store::Query::all().newest_first("uploaded_at");
    let files = store::find_as(state.documents.as_ref(), Collection::UploadedFiles, &query).await?;
    Ok(Json(files))
}

/// GET /api/admin/podcast/list
pub async fn handle_list_podcasts(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<PodcastEpisode>>, AppError> {
    let query = store::Query::all().ascending("episode");
    let episodes =
        store::find_as(state.documents.as_ref(), Collection::PodcastEpisodes, &query).await?;
    Ok(Json(episodes))
}

/// An episode as edited in the admin dashboard. Everything but the title is
/// optional.
#[derive(Debug, Deserialize)]
pub struct EpisodeInput {
    #[serde(default)]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub audio_url: String,
    #[serde(default)]
    pub spotify_url: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub season: Option<u32>,
    #[serde(default)]
    pub episode: Option<u32>,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

/// Validates the submitted list and fills defaults. Episodes without a
/// number are numbered by position. Ids must be unique within the list.
pub fn normalize_episodes(
    inputs: Vec<EpisodeInput>,
    now: DateTime<Utc>,
) -> Result<Vec<PodcastEpisode>, AppError> {
    let episodes = inputs
        .into_iter()
        .enumerate()
        .map(|(i, input)| {
            let title = input.title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::Validation(format!(
                    "Episode {} is missing a title",
                    i + 1
                )));
            }
            Ok(PodcastEpisode {
                id: input
                    .id
                    .filter(|id| !id.trim().is_empty())
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                title,
                description: input.description,
                audio_url: input.audio_url,
                spotify_url: input.spotify_url.filter(|u| !u.trim().is_empty()),
                duration: input.duration.unwrap_or_else(|| "45:00".to_string()),
                season: input.season.unwrap_or(1),
                episode: input.episode.unwrap_or(i as u32 + 1),
                thumbnail: input.thumbnail,
                published_at: input.published_at.unwrap_or(now),
            })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    let mut seen = HashSet::new();
    if let Some(dup) = episodes.iter().find(|e| !seen.insert(e.id.as_str())) {
        return Err(AppError::Validation(format!(
            "Duplicate episode id '{}'",
            dup.id
        )));
    }
    Ok(episodes)
}

#[derive(Debug, Serialize)]
pub struct PodcastUpdateResponse {
    pub success: bool,
    pub count: u64,
}

/// POST /api/admin/podcast/update
/// Replaces the whole episode list.
pub async fn handle_update_podcasts(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Json(inputs): Json<Vec<EpisodeInput>>,
) -> Result<Json<PodcastUpdateResponse>, AppError> {
    let episodes = normalize_episodes(inputs, Utc::now())?;
    let docs = to_documents(&episodes)?;

    let (replaced, count) = state
        .documents
        .replace_all(Collection::PodcastEpisodes, docs)
        .await?;
    info!(admin = %admin.email, replaced, count, "Podcast episode list replaced");

    Ok(Json(PodcastUpdateResponse {
        success: true,
        count,
    }))
}

/// GET /api/admin/content/:section
pub async fn handle_get_content(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(section): Path<String>,
) -> Result<Json<SiteSection>, AppError> {
    Ok(Json(load_section(state.documents.as_ref(), &section).await?))
}

/// POST /api/admin/content/:section
pub async fn handle_save_content(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(section): Path<String>,
    Json(data): Json<BTreeMap<String, ContentValue>>,
) -> Result<Json<SiteSection>, AppError> {
    let saved = save_section(state.documents.as_ref(), &section, data).await?;
    info!(admin = %admin.email, section = %saved.section, fields = saved.data.len(), "Site section saved");
    Ok(Json(saved))
}

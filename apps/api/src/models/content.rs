use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::membership::MembershipTier;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub instructor: String,
    pub duration: String,
    pub lesson_count: u32,
    /// Tier required to open the course's lessons.
    pub tier: MembershipTier,
    pub category: String,
    pub difficulty: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    #[serde(default)]
    pub video_url: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PodcastEpisode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub audio_url: String,
    #[serde(default)]
    pub spotify_url: Option<String>,
    pub duration: String,
    pub season: u32,
    pub episode: u32,
    pub thumbnail: String,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    DailyTip,
    Ebook,
    Workbook,
    Article,
    MarketReport,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub resource_type: ResourceType,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    pub tier_required: MembershipTier,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityPost {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub replies_count: u32,
    #[serde(default)]
    pub likes_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub source: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsSource {
    pub name: &'static str,
    pub logo: &'static str,
    pub url: &'static str,
}

pub const NEWS_SOURCES: [NewsSource; 4] = [
    NewsSource {
        name: "HousingWire",
        logo: "https://via.placeholder.com/100x50?text=HousingWire",
        url: "https://www.housingwire.com",
    },
    NewsSource {
        name: "Inman",
        logo: "https://via.placeholder.com/100x50?text=Inman",
        url: "https://www.inman.com",
    },
    NewsSource {
        name: "Mortgage News Daily",
        logo: "https://via.placeholder.com/100x50?text=MND",
        url: "https://www.mortgagenewsdaily.com",
    },
    NewsSource {
        name: "Realtor Magazine",
        logo: "https://via.placeholder.com/100x50?text=Realtor",
        url: "https://www.nar.realtor/magazine",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub key: String,
    pub url: String,
    pub folder: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
}

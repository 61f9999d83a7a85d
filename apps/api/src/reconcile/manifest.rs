//! Canonical site content shipped with the binary.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::membership::MembershipTier;
use crate::models::content::{
    CommunityPost, Course, NewsArticle, PodcastEpisode, Resource, ResourceType,
};
use crate::store::Collection;

/// Host used by legacy seed data for stand-in images.
pub const PLACEHOLDER_HOST: &str = "via.placeholder.com";

/// Replace the image of the document titled `title` with `url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCorrection {
    pub collection: Collection,
    pub title: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone)]
pub struct ContentManifest {
    pub courses: Vec<Course>,
    pub podcast_episodes: Vec<PodcastEpisode>,
    pub resources: Vec<Resource>,
    pub community_posts: Vec<CommunityPost>,
    pub news_articles: Vec<NewsArticle>,
    pub image_corrections: Vec<ImageCorrection>,
}

impl ContentManifest {
    /// Builds the manifest. Seed-only items are stamped relative to `now`;
    /// podcast episodes carry fixed dates so replacing them is a no-op in
    /// effect.
    pub fn canonical(now: DateTime<Utc>) -> Self {
        Self {
            courses: courses(now),
            podcast_episodes: podcast_episodes(),
            resources: resources(now),
            community_posts: community_posts(now),
            news_articles: news_articles(now),
            image_corrections: image_corrections(),
        }
    }

    pub fn corrections_for(&self, collection: Collection) -> Vec<&ImageCorrection> {
        self.image_corrections
            .iter()
            .filter(|c| c.collection == collection)
            .collect()
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    id: &str,
    title: &str,
    description: &str,
    thumbnail: &str,
    instructor: &str,
    duration: &str,
    lesson_count: u32,
    tier: MembershipTier,
    category: &str,
    difficulty: &str,
    created_at: DateTime<Utc>,
) -> Course {
    Course {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        thumbnail: thumbnail.to_string(),
        instructor: instructor.to_string(),
        duration: duration.to_string(),
        lesson_count,
        tier,
        category: category.to_string(),
        difficulty: difficulty.to_string(),
        created_at,
    }
}

fn courses(now: DateTime<Utc>) -> Vec<Course> {
    vec![
        course(
            "course-listing-presentations",
            "Mastering Listing Presentations",
            "Learn proven strategies to win more listings and impress sellers with confidence.",
            "https://images.unsplash.com/photo-1627161683077-e34782c24d81?w=400&h=300&fit=crop",
            "Sarah Martinez",
            "3h 20min",
            12,
            MembershipTier::Bronze,
            "sales",
            "intermediate",
            now,
        ),
        course(
            "course-social-media-marketing",
            "Social Media Marketing for Agents",
            "Grow your brand and generate leads through strategic social media marketing.",
            "https://images.unsplash.com/photo-1563986768494-4dee2763ff3f?w=400&h=300&fit=crop",
            "James Chen",
            "4h 15min",
            18,
            MembershipTier::Silver,
            "marketing",
            "beginner",
            now,
        ),
        course(
            "course-negotiation-masterclass",
            "Negotiation Masterclass",
            "Master the art of negotiation to close more deals at better prices.",
            "https://images.unsplash.com/photo-1521791136064-7986c2920216?w=400&h=300&fit=crop",
            "Michael Davis",
            "2h 45min",
            10,
            MembershipTier::Gold,
            "negotiation",
            "advanced",
            now,
        ),
        course(
            "course-first-time-homebuyer",
            "First-Time Homebuyer Specialist",
            "Become the go-to expert for first-time homebuyers in your market.",
            "https://images.unsplash.com/photo-1609220136736-443140cffec6?w=400&h=300&fit=crop",
            "Emily Rodriguez",
            "3h 50min",
            15,
            MembershipTier::Bronze,
            "specialization",
            "beginner",
            now,
        ),
        course(
            "course-million-dollar-database",
            "Building a Million Dollar Database",
            "Learn how to build and nurture a database that generates consistent referrals.",
            "https://images.unsplash.com/photo-1723095469034-c3cf31e32730?w=400&h=300&fit=crop",
            "David Thompson",
            "5h 10min",
            20,
            MembershipTier::Silver,
            "business",
            "intermediate",
            now,
        ),
        course(
            "course-luxury-real-estate",
            "Luxury Real Estate Excellence",
            "Position yourself as the luxury market expert with proven high-end strategies.",
            "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=400&h=300&fit=crop",
            "Victoria Sterling",
            "4h 30min",
            16,
            MembershipTier::Gold,
            "specialization",
            "advanced",
            now,
        ),
    ]
}

fn published(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

fn podcast_episodes() -> Vec<PodcastEpisode> {
    vec![
        PodcastEpisode {
            id: "podcast-s1e1".to_string(),
            title: "5 Scripts That Close Every Listing".to_string(),
            description: "Learn the exact words top agents use to win seller confidence and secure listings.".to_string(),
            audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-1.mp3".to_string(),
            spotify_url: None,
            duration: "42:15".to_string(),
            season: 1,
            episode: 1,
            thumbnail: "https://images.unsplash.com/photo-1485579149621-3123dd979885?w=400&h=400&fit=crop".to_string(),
            published_at: published(2024, 10, 14),
        },
        PodcastEpisode {
            id: "podcast-s1e2".to_string(),
            title: "From Zero to Hero: My First Year Success".to_string(),
            description: "Interview with an agent who closed 38 deals in their first year. Hear their exact strategy.".to_string(),
            audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-2.mp3".to_string(),
            spotify_url: None,
            duration: "38:20".to_string(),
            season: 1,
            episode: 2,
            thumbnail: "https://images.unsplash.com/photo-1695891583421-3cbbf1c2e3bd?w=400&h=400&fit=crop".to_string(),
            published_at: published(2024, 10, 7),
        },
        PodcastEpisode {
            id: "podcast-s1e3".to_string(),
            title: "Market Shift Strategies: Thriving in Any Market".to_string(),
            description: "How to adapt your business strategy during market shifts and economic uncertainty.".to_string(),
            audio_url: "https://www.soundhelix.com/examples/mp3/SoundHelix-Song-3.mp3".to_string(),
            spotify_url: None,
            duration: "45:30".to_string(),
            season: 1,
            episode: 3,
            thumbnail: "https://images.unsplash.com/photo-1758691736545-5c33b6255dca?w=400&h=400&fit=crop".to_string(),
            published_at: published(2024, 9, 30),
        },
    ]
}

fn resources(now: DateTime<Utc>) -> Vec<Resource> {
    vec![
        Resource {
            id: "resource-speed-to-lead".to_string(),
            title: "Follow up with all new leads within 5 minutes".to_string(),
            description: "Speed to lead matters. Studies show contacting leads within 5 minutes increases conversion by 391%.".to_string(),
            resource_type: ResourceType::DailyTip,
            thumbnail: None,
            download_url: None,
            tier_required: MembershipTier::Free,
            created_at: now,
        },
        Resource {
            id: "resource-open-house-playbook".to_string(),
            title: "The Complete Open House Playbook".to_string(),
            description: "Everything you need to host successful open houses that generate leads and listings.".to_string(),
            resource_type: ResourceType::Ebook,
            thumbnail: Some("https://images.unsplash.com/photo-1560518883-ce09059eeffa?w=300&h=400&fit=crop".to_string()),
            download_url: Some("#".to_string()),
            tier_required: MembershipTier::Bronze,
            created_at: now,
        },
        Resource {
            id: "resource-buyer-consultation".to_string(),
            title: "Buyer Consultation Workbook".to_string(),
            description: "Step-by-step workbook to conduct professional buyer consultations that convert.".to_string(),
            resource_type: ResourceType::Workbook,
            thumbnail: Some("https://images.unsplash.com/photo-1554224155-6726b3ff858f?w=300&h=400&fit=crop".to_string()),
            download_url: Some("#".to_string()),
            tier_required: MembershipTier::Silver,
            created_at: now,
        },
    ]
}

fn community_posts(now: DateTime<Utc>) -> Vec<CommunityPost> {
    vec![
        CommunityPost {
            id: "post-first-million-listing".to_string(),
            user_id: "member-jennifer-mills".to_string(),
            user_name: "Jennifer Mills".to_string(),
            title: "Just closed my first $1M listing!".to_string(),
            content: "Thanks to the negotiation course, I just closed my first million-dollar listing. The strategies really work!".to_string(),
            replies_count: 24,
            likes_count: 87,
            created_at: now,
        },
        CommunityPost {
            id: "post-best-crm".to_string(),
            user_id: "member-mark-stevens".to_string(),
            user_name: "Mark Stevens".to_string(),
            title: "Best CRM for new agents?".to_string(),
            content: "I'm looking for recommendations on CRM systems. What's everyone using?".to_string(),
            replies_count: 15,
            likes_count: 42,
            created_at: now - Duration::hours(5),
        },
    ]
}

fn news_articles(now: DateTime<Utc>) -> Vec<NewsArticle> {
    vec![
        NewsArticle {
            id: "news-mortgage-rates-drop".to_string(),
            title: "Mortgage Rates Drop to Lowest Level in 6 Months".to_string(),
            excerpt: "Average 30-year fixed mortgage rates fell to 6.2% this week, providing relief to homebuyers.".to_string(),
            source: "HousingWire".to_string(),
            url: "#".to_string(),
            thumbnail: Some("https://images.unsplash.com/photo-1626178793926-22b28830aa30?w=600&h=400&fit=crop".to_string()),
            published_at: now,
        },
        NewsArticle {
            id: "news-nar-settlement".to_string(),
            title: "NAR Settlement: What Agents Need to Know".to_string(),
            excerpt: "Breaking down the recent NAR settlement and how it impacts real estate commission practices.".to_string(),
            source: "Inman".to_string(),
            url: "#".to_string(),
            thumbnail: Some("https://images.unsplash.com/photo-1450101499163-c8848c66ca85?w=600&h=400&fit=crop".to_string()),
            published_at: now - Duration::hours(3),
        },
        NewsArticle {
            id: "news-housing-inventory".to_string(),
            title: "Housing Inventory Increases for First Time This Year".to_string(),
            excerpt: "Active listings are up 12% year-over-year, signaling a shift toward more balanced market conditions.".to_string(),
            source: "Realtor Magazine".to_string(),
            url: "#".to_string(),
            thumbnail: Some("https://images.unsplash.com/photo-1623001466340-c65619d1682a?w=600&h=400&fit=crop".to_string()),
            published_at: now - Duration::hours(8),
        },
    ]
}

fn image_corrections() -> Vec<ImageCorrection> {
    const TABLE: [(Collection, &str, &str); 12] = [
        (Collection::Courses, "Mastering Listing Presentations", "https://images.unsplash.com/photo-1627161683077-e34782c24d81?w=400&h=300&fit=crop"),
        (Collection::Courses, "Social Media Marketing for Agents", "https://images.unsplash.com/photo-1563986768494-4dee2763ff3f?w=400&h=300&fit=crop"),
        (Collection::Courses, "Negotiation Masterclass", "https://images.unsplash.com/photo-1521791136064-7986c2920216?w=400&h=300&fit=crop"),
        (Collection::Courses, "First-Time Homebuyer Specialist", "https://images.unsplash.com/photo-1609220136736-443140cffec6?w=400&h=300&fit=crop"),
        (Collection::Courses, "Building a Million Dollar Database", "https://images.unsplash.com/photo-1723095469034-c3cf31e32730?w=400&h=300&fit=crop"),
        (Collection::Courses, "Luxury Real Estate Excellence", "https://images.unsplash.com/photo-1505843513577-22bb7d21e455?w=400&h=300&fit=crop"),
        (Collection::PodcastEpisodes, "5 Scripts That Close Every Listing", "https://images.unsplash.com/photo-1485579149621-3123dd979885?w=400&h=400&fit=crop"),
        (Collection::PodcastEpisodes, "From Zero to Hero: My First Year Success", "https://images.unsplash.com/photo-1695891583421-3cbbf1c2e3bd?w=400&h=400&fit=crop"),
        (Collection::PodcastEpisodes, "Market Shift Strategies: Thriving in Any Market", "https://images.unsplash.com/photo-1758691736545-5c33b6255dca?w=400&h=400&fit=crop"),
        (Collection::NewsArticles, "Mortgage Rates Drop to Lowest Level in 6 Months", "https://images.unsplash.com/photo-1626178793926-22b28830aa30?w=600&h=400&fit=crop"),
        (Collection::NewsArticles, "NAR Settlement: What Agents Need to Know", "https://images.unsplash.com/photo-1450101499163-c8848c66ca85?w=600&h=400&fit=crop"),
        (Collection::NewsArticles, "Housing Inventory Increases for First Time This Year", "https://images.unsplash.com/photo-1623001466340-c65619d1682a?w=600&h=400&fit=crop"),
    ];
    TABLE
        .iter()
        .map(|&(collection, title, url)| ImageCorrection {
            collection,
            title,
            url,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_manifest_sizes() {
        let manifest = ContentManifest::canonical(Utc::now());
        assert_eq!(manifest.courses.len(), 6);
        assert_eq!(manifest.podcast_episodes.len(), 3);
        assert_eq!(manifest.resources.len(), 3);
        assert_eq!(manifest.community_posts.len(), 2);
        assert_eq!(manifest.news_articles.len(), 3);
    }

    #[test]
    fn test_podcasts_are_stable_across_builds() {
        let a = ContentManifest::canonical(Utc::now());
        let b = ContentManifest::canonical(Utc::now() + Duration::days(3));
        assert_eq!(a.podcast_episodes, b.podcast_episodes);
    }

    #[test]
    fn test_ids_are_unique() {
        let m = ContentManifest::canonical(Utc::now());
        let ids: Vec<&str> = m
            .courses
            .iter()
            .map(|c| c.id.as_str())
            .chain(m.podcast_episodes.iter().map(|p| p.id.as_str()))
            .chain(m.resources.iter().map(|r| r.id.as_str()))
            .chain(m.community_posts.iter().map(|p| p.id.as_str()))
            .chain(m.news_articles.iter().map(|a| a.id.as_str()))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_every_titled_item_has_a_correction() {
        let m = ContentManifest::canonical(Utc::now());
        for course in &m.courses {
            let fix = m
                .corrections_for(Collection::Courses)
                .into_iter()
                .find(|c| c.title == course.title)
                .unwrap();
            assert_eq!(fix.url, course.thumbnail);
        }
        assert_eq!(m.corrections_for(Collection::PodcastEpisodes).len(), 3);
        assert_eq!(m.corrections_for(Collection::NewsArticles).len(), 3);
    }

    #[test]
    fn test_canonical_content_has_no_placeholders() {
        let m = ContentManifest::canonical(Utc::now());
        let json = serde_json::to_string(&(
            &m.courses,
            &m.podcast_episodes,
            &m.resources,
            &m.news_articles,
        ))
        .unwrap();
        assert!(!json.contains(PLACEHOLDER_HOST));
    }
}

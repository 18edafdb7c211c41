//! Static fixture content served when the primary store is unavailable.
//!
//! The public site degrades to this sample set instead of failing outright.
//! Six posts, two advertisements, and two video embeds, Kenya-flavored to
//! read plausibly on the live site.

use chrono::NaiveDateTime;
use ton_content::{Advertisement, Block, Post, PostStatus, VideoEmbed};
use uuid::Uuid;

fn day(offset: i64) -> NaiveDateTime {
    // Fixed base so fixture ordering is stable across runs.
    chrono::DateTime::from_timestamp(1_748_736_000 + offset * 86_400, 0)
        .unwrap_or_default()
        .naive_utc()
}

fn post(
    id: u128,
    title: &str,
    slug: &str,
    body: &str,
    tags: &[&str],
    status: PostStatus,
    offset: i64,
) -> Post {
    Post {
        id: Uuid::from_u128(id),
        title: title.to_string(),
        slug: slug.to_string(),
        content: vec![Block::Paragraph {
            text: body.to_string(),
        }],
        cover_image: format!("https://static.talkofnations.co.ke/covers/{slug}.jpg"),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status,
        author_name: "Diano".to_string(),
        author_image: None,
        created_at: day(offset),
        updated_at: day(offset),
    }
}

/// The six-post fixture set.
pub fn posts() -> Vec<Post> {
    vec![
        post(
            0x1001,
            "Nairobi's Matatu Culture Goes Digital",
            "nairobi-matatu-culture-goes-digital",
            "Cashless fare apps are changing the daily commute along Thika Road, \
             and the artists who paint the matatus are finding new clients online.",
            &["Tech", "Kenya"],
            PostStatus::Published,
            5,
        ),
        post(
            0x1002,
            "Inside the Rift Valley's Geothermal Boom",
            "inside-the-rift-valleys-geothermal-boom",
            "Olkaria's steam fields now supply nearly half of Kenya's electricity, \
             and new wells are being drilled toward Lake Bogoria.",
            &["Business", "Kenya"],
            PostStatus::Published,
            4,
        ),
        post(
            0x1003,
            "Harambee Stars: A New Generation Rises",
            "harambee-stars-a-new-generation-rises",
            "A crop of young midfielders from the Kenyan Premier League is giving \
             the national team its most promising squad in a decade.",
            &["Sports", "Kenya"],
            PostStatus::Published,
            3,
        ),
        post(
            0x1004,
            "The Swahili Coast's Quiet Culinary Revolution",
            "the-swahili-coasts-quiet-culinary-revolution",
            "From Lamu to Diani, chefs are reworking biryani and mahamri for a new \
             generation of travelers.",
            &["Lifestyle"],
            PostStatus::Published,
            2,
        ),
        post(
            0x1005,
            "Why East Africa's Startup Capital Keeps Moving",
            "why-east-africas-startup-capital-keeps-moving",
            "Kigali, Kampala, and Nairobi are trading places on the funding league \
             tables. The reasons say a lot about where the region is headed.",
            &["Business", "Africa", "Opinion"],
            PostStatus::Published,
            1,
        ),
        post(
            0x1006,
            "Drafting Notes: County Budgets Explained",
            "drafting-notes-county-budgets-explained",
            "A work-in-progress explainer on how county allocations are decided.",
            &["Politics", "Kenya"],
            PostStatus::Draft,
            0,
        ),
    ]
}

/// Fixture advertisements.
pub fn advertisements() -> Vec<Advertisement> {
    vec![
        Advertisement {
            id: Uuid::from_u128(0x2001),
            title: "Safari Nights at Ol Pejeta".to_string(),
            description: "Book a conservancy stay before the long rains.".to_string(),
            image_url: "https://static.talkofnations.co.ke/ads/ol-pejeta.jpg".to_string(),
            link_url: "https://example.com/ol-pejeta".to_string(),
            created_at: day(2),
        },
        Advertisement {
            id: Uuid::from_u128(0x2002),
            title: "Nairobi Coffee Week".to_string(),
            description: "Tastings across the city, one ticket.".to_string(),
            image_url: "https://static.talkofnations.co.ke/ads/coffee-week.jpg".to_string(),
            link_url: "https://example.com/coffee-week".to_string(),
            created_at: day(1),
        },
    ]
}

/// Fixture video embeds.
pub fn videos() -> Vec<VideoEmbed> {
    vec![
        VideoEmbed {
            id: Uuid::from_u128(0x3001),
            title: "Street Food Tour: Kenyatta Market".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string(),
            created_at: day(2),
        },
        VideoEmbed {
            id: Uuid::from_u128(0x3002),
            title: "Talk of Nations Weekly Roundup".to_string(),
            youtube_url: "https://www.youtube.com/watch?v=9bZkp7q19f0".to_string(),
            created_at: day(1),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_set_has_six_posts() {
        assert_eq!(posts().len(), 6);
    }

    #[test]
    fn fixture_slugs_are_unique() {
        let all = posts();
        let mut slugs: Vec<_> = all.iter().map(|p| p.slug.as_str()).collect();
        slugs.sort_unstable();
        slugs.dedup();
        assert_eq!(slugs.len(), all.len());
    }

    #[test]
    fn fixtures_are_newest_first_capable() {
        let all = posts();
        assert!(all.iter().any(|p| p.status == PostStatus::Draft));
        assert_eq!(
            all.iter()
                .filter(|p| p.status == PostStatus::Published)
                .count(),
            5
        );
    }
}

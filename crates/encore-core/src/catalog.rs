//! Fixed genre lineup and the sample issue the storyteller demo produces.

use serde::Serialize;

// ---------------------------------------------------------------------------
// Genre
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Genre {
    pub id: &'static str,
    pub name: &'static str,
    pub label: &'static str,
    pub day: &'static str,
    pub time: &'static str,
    pub emoji: &'static str,
    pub subscribers: u64,
    pub engagement: f64,
    pub growth: f64,
    pub revenue: u64,
    pub description: &'static str,
    pub demo_available: bool,
    pub featured: bool,
}

pub static GENRES: [Genre; 4] = [
    Genre {
        id: "pulse",
        name: "PULSE",
        label: "Hip-Hop/Rap",
        day: "Monday",
        time: "6 AM",
        emoji: "🎤",
        subscribers: 15420,
        engagement: 42.3,
        growth: 18.7,
        revenue: 28450,
        description: "Underground hip-hop trends, emerging rappers, and street culture intelligence",
        demo_available: false,
        featured: false,
    },
    Genre {
        id: "storyteller",
        name: "STORYTELLER",
        label: "Singer-Songwriter",
        day: "Tuesday",
        time: "6 PM",
        emoji: "🎸",
        subscribers: 12300,
        engagement: 51.2,
        growth: 15.8,
        revenue: 24600,
        description: "Intimate singer-songwriter discoveries, confessional folk movement, and authentic storytelling",
        demo_available: true,
        featured: true,
    },
    Genre {
        id: "voltage",
        name: "VOLTAGE",
        label: "Electronic/EDM",
        day: "Tuesday",
        time: "6 AM",
        emoji: "⚡",
        subscribers: 18750,
        engagement: 45.1,
        growth: 24.6,
        revenue: 35800,
        description: "Electronic music evolution, festival intelligence, and producer spotlights",
        demo_available: false,
        featured: false,
    },
    Genre {
        id: "resonance",
        name: "RESONANCE",
        label: "Pop/Mainstream",
        day: "Thursday",
        time: "6 AM",
        emoji: "✨",
        subscribers: 28900,
        engagement: 35.8,
        growth: 8.9,
        revenue: 42500,
        description: "Pop culture analysis, mainstream trends, and commercial music intelligence",
        demo_available: false,
        featured: false,
    },
];

pub fn genre(id: &str) -> Option<&'static Genre> {
    GENRES.iter().find(|g| g.id == id)
}

// ---------------------------------------------------------------------------
// DashboardStats
// ---------------------------------------------------------------------------

/// Headline platform confidence shown on the dashboard.
pub const PLATFORM_CONFIDENCE: f64 = 89.7;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_subscribers: u64,
    pub weekly_growth: f64,
    pub average_engagement: f64,
    pub total_revenue: u64,
    pub ai_confidence: f64,
}

pub fn dashboard_stats(genres: &[Genre]) -> DashboardStats {
    let n = genres.len() as f64;
    let mean = |f: fn(&Genre) -> f64| {
        if genres.is_empty() {
            0.0
        } else {
            genres.iter().map(f).sum::<f64>() / n
        }
    };
    DashboardStats {
        total_subscribers: genres.iter().map(|g| g.subscribers).sum(),
        weekly_growth: mean(|g| g.growth),
        average_engagement: mean(|g| g.engagement),
        total_revenue: genres.iter().map(|g| g.revenue).sum(),
        ai_confidence: PLATFORM_CONFIDENCE,
    }
}

// ---------------------------------------------------------------------------
// Storyteller sample issue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeaturedArtist {
    pub name: &'static str,
    pub location: &'static str,
    pub age: u32,
    pub bio: &'static str,
    pub key_track: &'static str,
    pub monthly_listeners: u64,
    pub streaming_growth: u32,
    pub recent_activity: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarDiscovery {
    pub name: &'static str,
    pub location: &'static str,
    pub track: &'static str,
    pub description: &'static str,
    pub prediction: &'static str,
    pub confidence: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueMetrics {
    pub estimated_reach: u64,
    pub processing_time: &'static str,
    pub confidence_score: u32,
    pub sources_analyzed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleIssue {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub date: &'static str,
    pub issue: &'static str,
    pub ai_confidence: u32,
    pub featured_artist: FeaturedArtist,
    pub radar_discoveries: &'static [RadarDiscovery],
    pub metrics: IssueMetrics,
}

static RADAR: [RadarDiscovery; 2] = [
    RadarDiscovery {
        name: "River Collins",
        location: "Nashville, TN",
        track: "Therapy Sessions EP",
        description: "Millennial burnout through delicate fingerpicking and brutally honest lyrics.",
        prediction: "85K monthly listeners by September",
        confidence: 88,
    },
    RadarDiscovery {
        name: "Maya Stern",
        location: "Brooklyn, NY",
        track: "Corporate Anxiety",
        description: "Former Wall Street analyst turned confessional songwriter.",
        prediction: "Record label interest within 45 days",
        confidence: 92,
    },
];

/// The newsletter shown once the storyteller demo completes.
pub fn storyteller_issue() -> SampleIssue {
    SampleIssue {
        title: "Vulnerable Hours: The Confessional Folk Revolution",
        subtitle: "When Midnight Coffee Shops Become Concert Halls",
        date: "2025-07-30",
        issue: "#347",
        ai_confidence: 94,
        featured_artist: FeaturedArtist {
            name: "Luna Sawyer",
            location: "Portland, OR",
            age: 26,
            bio: "Former indie rock guitarist turned introspective storyteller, Luna Sawyer creates haunting melodies that speak to the isolated generation.",
            key_track: "Midnight Coffee Shop",
            monthly_listeners: 23847,
            streaming_growth: 156,
            recent_activity: &[
                "Featured on Spotify's \"Bedroom Folk\" playlist (+12K listeners)",
                "Viral TikTok acoustic performance (2.3M views)",
                "NPR Music discovery mention",
                "Three sold-out Portland coffee shop shows",
            ],
        },
        radar_discoveries: &RADAR,
        metrics: IssueMetrics {
            estimated_reach: 12300,
            processing_time: "6.7 seconds",
            confidence_score: 94,
            sources_analyzed: 50847,
        },
    }
}

use crate::api::{InkwellApi, Post};

const FEATURED_LIMIT: usize = 2;

/// Ordering of the home feed. Every ordering is descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedOrder {
    #[default]
    Latest,
    Popular,
    MostLiked,
    MostCommented,
}

impl FeedOrder {
    pub const ALL: [FeedOrder; 4] = [
        FeedOrder::Latest,
        FeedOrder::Popular,
        FeedOrder::MostLiked,
        FeedOrder::MostCommented,
    ];

    /// Parse a `?sort=` value. Unknown keys fall back to `Latest`.
    pub fn from_key(key: &str) -> Self {
        match key {
            "popular" => FeedOrder::Popular,
            "most-liked" => FeedOrder::MostLiked,
            "most-commented" => FeedOrder::MostCommented,
            _ => FeedOrder::Latest,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            FeedOrder::Latest => "latest",
            FeedOrder::Popular => "popular",
            FeedOrder::MostLiked => "most-liked",
            FeedOrder::MostCommented => "most-commented",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FeedOrder::Latest => "Latest",
            FeedOrder::Popular => "Most Viewed",
            FeedOrder::MostLiked => "Most Liked",
            FeedOrder::MostCommented => "Most Commented",
        }
    }

    /// Stable sort, so posts with equal keys keep their fetch order.
    pub fn sort(self, posts: &mut [Post]) {
        match self {
            FeedOrder::Latest => posts.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            FeedOrder::Popular => posts.sort_by(|a, b| b.views.cmp(&a.views)),
            FeedOrder::MostLiked => posts.sort_by(|a, b| b.likes.cmp(&a.likes)),
            FeedOrder::MostCommented => posts.sort_by(|a, b| b.comments.cmp(&a.comments)),
        }
    }
}

#[derive(Debug, Default)]
pub struct Feed {
    pub featured: Vec<Post>,
    pub trending: Vec<Post>,
    pub sorted: Vec<Post>,
    pub order: FeedOrder,
}

impl Feed {
    pub fn from_posts(posts: Vec<Post>, order: FeedOrder) -> Self {
        let featured = posts
            .iter()
            .filter(|p| p.featured)
            .take(FEATURED_LIMIT)
            .cloned()
            .collect();
        let trending = posts.iter().filter(|p| p.trending).cloned().collect();

        let mut sorted = posts;
        order.sort(&mut sorted);

        Self {
            featured,
            trending,
            sorted,
            order,
        }
    }

    /// Fetch the whole collection. A failed fetch leaves the feed empty.
    pub async fn load(api: &dyn InkwellApi, order: FeedOrder) -> Self {
        let posts = match api.list_blogs().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!("Failed to fetch blogs: {}", e);
                Vec::new()
            }
        };
        Self::from_posts(posts, order)
    }
}

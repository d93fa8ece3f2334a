pub mod articles;
pub mod pagination;
pub mod serde_time;
pub mod versions;

pub use articles::{ArticleDto, AuthorDto, ContentDto, PublishedDto, RecommendedArticleDto};
pub use pagination::Page;
pub use versions::{ArticleVersionDto, ArticleVersionListDto};

mod get_by_id;
mod get_by_slug;
mod list;
mod recommended;
mod service;
mod versions;

pub use get_by_id::GetArticleByIdQuery;
pub use get_by_slug::GetArticleBySlugQuery;
pub use list::{ListArticlesQuery, SearchArticlesQuery, StatusFilter};
pub use recommended::GetRecommendedArticlesQuery;
pub use service::ArticleQueryService;
pub use versions::{GetArticleVersionQuery, ListArticleVersionsQuery};

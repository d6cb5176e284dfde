use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A shortened link as stored by the link service.
///
/// Reports only read it: `short_code` is the resource key and `created_by`
/// is the owner every visit rolls up to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShortenedUrl {
    pub id: i64,
    pub short_code: String,
    pub original_url: String,
    pub created_at: i64,
    pub created_by: Option<String>,
    pub clicks: i64,
    pub is_active: bool,
}

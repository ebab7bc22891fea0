use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type PostId = i64;

/// Lifecycle status of a generated post.
///
/// The backend owns the full status vocabulary; statuses this build does not
/// know are kept verbatim in `Other` and treated as opaque labels.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    ReviewReady,
    Approved,
    Scheduled,
    Posted,
    Failed,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ReviewReady => "review_ready",
            Self::Approved => "approved",
            Self::Scheduled => "scheduled",
            Self::Posted => "posted",
            Self::Failed => "failed",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for PostStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "review_ready" => Self::ReviewReady,
            "approved" => Self::Approved,
            "scheduled" => Self::Scheduled,
            "posted" => Self::Posted,
            "failed" => Self::Failed,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for PostStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<PostStatus> for String {
    fn from(value: PostStatus) -> Self {
        match value {
            PostStatus::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MediaKind {
    #[default]
    Single,
    Carousel,
    Reel,
    Other(String),
}

impl MediaKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Single => "single",
            Self::Carousel => "carousel",
            Self::Reel => "reel",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for MediaKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "single" => Self::Single,
            "carousel" => Self::Carousel,
            "reel" => Self::Reel,
            _ => Self::Other(value),
        }
    }
}

impl From<MediaKind> for String {
    fn from(value: MediaKind) -> Self {
        match value {
            MediaKind::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

/// Structured failure carried by a post (display data, not an exception).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostFailure {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFlags {
    pub ssim_score: f64,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantPreview {
    pub variant_index: i32,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub item_urls: Vec<String>,
    #[serde(default)]
    pub quality_flags: Option<QualityFlags>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostRecord {
    pub id: PostId,
    pub status: PostStatus,
    #[serde(default, rename = "media_type")]
    pub media_kind: MediaKind,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "crate::timestamp::option")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_timezone: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub hashtags: Option<String>,
    #[serde(default)]
    pub error_code: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub variants: Vec<VariantPreview>,
}

impl PostRecord {
    /// The structured failure, if the backend reported one.
    ///
    /// A code without a message (or the reverse) still counts; the missing
    /// half is rendered as an empty string.
    pub fn failure(&self) -> Option<PostFailure> {
        if self.error_code.is_none() && self.error_message.is_none() {
            return None;
        }
        Some(PostFailure {
            code: self.error_code.clone().unwrap_or_default(),
            message: self.error_message.clone().unwrap_or_default(),
        })
    }

    /// Preview URLs of rendered variants, in variant order.
    pub fn preview_urls(&self) -> Vec<&str> {
        self.variants
            .iter()
            .filter_map(|v| v.preview_url.as_deref())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub post_id: PostId,
    #[serde(with = "crate::timestamp")]
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    pub scheduled_timezone: Option<String>,
    pub status: PostStatus,
}

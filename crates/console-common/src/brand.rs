use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub type BrandId = i64;

/// Category label used to pick the starter AI profile template.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BrandCategory {
    Fashion,
    Furniture,
    Food,
    Beauty,
    #[default]
    General,
}

impl BrandCategory {
    pub const ALL: [BrandCategory; 5] = [
        Self::Fashion,
        Self::Furniture,
        Self::Food,
        Self::Beauty,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fashion => "fashion",
            Self::Furniture => "furniture",
            Self::Food => "food",
            Self::Beauty => "beauty",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for BrandCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrandCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fashion" => Ok(Self::Fashion),
            "furniture" => Ok(Self::Furniture),
            "food" => Ok(Self::Food),
            "beauty" => Ok(Self::Beauty),
            "general" => Ok(Self::General),
            _ => Err(format!(
                "Invalid category: {} (allowed: fashion, furniture, food, beauty, general)",
                s
            )),
        }
    }
}

/// Messaging-bot settings attached to a brand. Secrets are never echoed back
/// by the listing endpoint, so every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BotCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_bot_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telegram_webhook_secret: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_user_ids: Option<String>,
}

impl BotCredentials {
    pub fn is_empty(&self) -> bool {
        self.telegram_bot_token.is_none()
            && self.telegram_webhook_secret.is_none()
            && self.allowed_user_ids.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    /// Kept as free text: the backend may know categories this build does not.
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, flatten)]
    pub bot: BotCredentials,
}

fn default_category() -> String {
    BrandCategory::General.as_str().to_string()
}

fn default_timezone() -> String {
    "Asia/Kolkata".to_string()
}

impl Brand {
    /// The category as a known enum, if it is one.
    pub fn known_category(&self) -> Option<BrandCategory> {
        self.category.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_round_trips_through_str() {
        for category in BrandCategory::ALL {
            assert_eq!(category.as_str().parse::<BrandCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(" Food ".parse::<BrandCategory>(), Ok(BrandCategory::Food));
        assert!("toys".parse::<BrandCategory>().is_err());
    }

    #[test]
    fn test_brand_deserializes_listing_shape() {
        let brand: Brand = serde_json::from_value(serde_json::json!({
            "id": 3,
            "slug": "vak-studio",
            "name": "Vak Studio",
            "category": "fashion",
            "description": null,
            "timezone": "Asia/Kolkata",
            "status": "active"
        }))
        .unwrap();
        assert_eq!(brand.id, 3);
        assert_eq!(brand.known_category(), Some(BrandCategory::Fashion));
        assert!(brand.bot.is_empty());
    }

    #[test]
    fn test_brand_defaults_missing_category_and_timezone() {
        let brand: Brand =
            serde_json::from_value(serde_json::json!({"id": 1, "slug": "a1", "name": "A"}))
                .unwrap();
        assert_eq!(brand.category, "general");
        assert_eq!(brand.timezone, "Asia/Kolkata");
    }
}

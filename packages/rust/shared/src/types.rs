//! Generated marketing artifacts.
//!
//! These are created fresh by each generation call and owned by the caller
//! afterwards. JSON field names are camelCase to match what the prompts ask
//! the model to produce; every field has a serde default so partially
//! populated model output still deserializes.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// ContentType
// ---------------------------------------------------------------------------

/// The per-channel content shapes the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Blog,
    Video,
    Social,
    Email,
}

impl ContentType {
    /// All content types, in the default request order.
    pub const ALL: [ContentType; 4] = [Self::Blog, Self::Video, Self::Social, Self::Email];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blog => "blog",
            Self::Video => "video",
            Self::Social => "social",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blog" => Ok(Self::Blog),
            "video" => Ok(Self::Video),
            "social" => Ok(Self::Social),
            "email" => Ok(Self::Email),
            other => Err(format!(
                "unknown content type '{other}': expected blog, video, social, or email"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Topics and plans
// ---------------------------------------------------------------------------

/// One week's content theme plus channel/effort metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignTopic {
    /// 1-based week index.
    pub week: u32,
    pub title: String,
    pub description: String,
    pub primary_channel: String,
    pub secondary_channels: Vec<String>,
    pub content_types: Vec<String>,
    /// Relative effort estimate (hours or points, as the model reports it).
    #[serde(deserialize_with = "lenient_number")]
    pub estimated_effort: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seasonal_relevance: Option<String>,
}

/// Channel tiers for a campaign.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelStrategy {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub experimental: Vec<String>,
}

impl ChannelStrategy {
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty() && self.experimental.is_empty()
    }
}

/// A full campaign plan built around an ordered list of topics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetailedCampaignPlan {
    pub overview: String,
    pub quarterly_themes: Vec<String>,
    pub campaigns: Vec<CampaignTopic>,
    pub channel_strategy: ChannelStrategy,
    pub timeline: String,
    /// Goal name → KPI names.
    pub kpis: BTreeMap<String, Vec<String>>,
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogContent {
    pub title: String,
    pub outline: Vec<String>,
    pub content: String,
    pub word_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoContent {
    pub title: String,
    pub script: String,
    pub duration: String,
    pub scenes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialPost {
    pub content: String,
    pub hashtags: Vec<String>,
    pub best_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailContent {
    pub subject: String,
    pub preview_text: String,
    pub content: String,
    pub call_to_action: String,
}

/// Per-type content for one topic. Only requested types are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampaignContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog: Option<BlogContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoContent>,
    /// Platform name → post.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<BTreeMap<String, SocialPost>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<EmailContent>,
}

impl CampaignContent {
    /// The content types that are populated, in canonical order.
    pub fn types(&self) -> Vec<ContentType> {
        let mut types = Vec::new();
        if self.blog.is_some() {
            types.push(ContentType::Blog);
        }
        if self.video.is_some() {
            types.push(ContentType::Video);
        }
        if self.social.is_some() {
            types.push(ContentType::Social);
        }
        if self.email.is_some() {
            types.push(ContentType::Email);
        }
        types
    }

    pub fn is_empty(&self) -> bool {
        self.types().is_empty()
    }
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// A simulated audience reaction to generated content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngagementSimulation {
    pub persona_reaction: String,
    /// Intended range 1–10; not enforced.
    #[serde(deserialize_with = "lenient_number")]
    pub engagement_score: i32,
    pub optimization_suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// Lenient numbers
// ---------------------------------------------------------------------------

/// Accept integers, floats (rounded), numeric strings, and null (zero).
fn lenient_number<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: TryFrom<i64> + Default,
{
    use serde::de::Error;

    let value = serde_json::Value::deserialize(deserializer)?;
    let n = match &value {
        serde_json::Value::Null => return Ok(T::default()),
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .map(|f| f.round() as i64),
        _ => None,
    };
    let n = n.ok_or_else(|| D::Error::custom(format!("expected a number, got {value}")))?;
    T::try_from(n).map_err(|_| D::Error::custom(format!("number {n} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parsing() {
        assert_eq!("blog".parse::<ContentType>(), Ok(ContentType::Blog));
        assert_eq!(" Email ".parse::<ContentType>(), Ok(ContentType::Email));
        assert!("podcast".parse::<ContentType>().is_err());
        assert_eq!(ContentType::Social.to_string(), "social");
    }

    #[test]
    fn topic_deserializes_camel_case_with_missing_fields() {
        let json = r#"{"week": 3, "title": "Spring Launch", "primaryChannel": "Blog"}"#;
        let topic: CampaignTopic = serde_json::from_str(json).expect("parse topic");
        assert_eq!(topic.week, 3);
        assert_eq!(topic.primary_channel, "Blog");
        assert!(topic.secondary_channels.is_empty());
        assert!(topic.seasonal_relevance.is_none());
    }

    #[test]
    fn numbers_are_parsed_leniently() {
        let json = r#"{"week": 1, "estimatedEffort": "6.4"}"#;
        let topic: CampaignTopic = serde_json::from_str(json).expect("parse topic");
        assert_eq!(topic.estimated_effort, 6);

        let json = r#"{"engagementScore": 7.6, "personaReaction": "Nice"}"#;
        let sim: EngagementSimulation = serde_json::from_str(json).expect("parse simulation");
        assert_eq!(sim.engagement_score, 8);

        let json = r#"{"estimatedEffort": "a lot"}"#;
        assert!(serde_json::from_str::<CampaignTopic>(json).is_err());
    }

    #[test]
    fn content_omits_unrequested_types() {
        let content = CampaignContent {
            blog: Some(BlogContent::default()),
            ..Default::default()
        };
        let json = serde_json::to_value(&content).expect("serialize");
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("blog"));
        assert!(!obj.contains_key("video"));
        assert!(!obj.contains_key("social"));
        assert!(!obj.contains_key("email"));
        assert_eq!(content.types(), vec![ContentType::Blog]);
    }

    #[test]
    fn plan_serialization() {
        let mut kpis = BTreeMap::new();
        kpis.insert("Engagement".to_string(), vec!["Likes".to_string()]);
        let plan = DetailedCampaignPlan {
            overview: "Q1 plan".into(),
            quarterly_themes: vec!["Awareness".into()],
            campaigns: vec![CampaignTopic {
                week: 1,
                title: "Kickoff".into(),
                ..Default::default()
            }],
            channel_strategy: ChannelStrategy {
                primary: vec!["Blog".into()],
                ..Default::default()
            },
            timeline: "13 weeks".into(),
            kpis,
        };

        let json = serde_json::to_string(&plan).expect("serialize");
        assert!(json.contains(r#""quarterlyThemes""#));
        assert!(json.contains(r#""channelStrategy""#));
        let parsed: DetailedCampaignPlan = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, plan);
    }
}

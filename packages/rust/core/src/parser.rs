//! Response parsing with deterministic fallbacks.
//!
//! Model output that cannot be parsed is an expected condition, not an
//! error: every parser here returns a fully typed artifact, tagged with
//! whether it came from the model ([`ParseOutcome::Parsed`]) or from the
//! built-in fallback ([`ParseOutcome::Fallback`]).

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use campaignforge_shared::{
    BlogContent, CampaignContent, CampaignTopic, ChannelStrategy, ContentType,
    DetailedCampaignPlan, EmailContent, EngagementSimulation, GenerationContext, SocialPost,
    VideoContent,
};

use crate::prompts::social_platforms;

// ---------------------------------------------------------------------------
// ParseOutcome
// ---------------------------------------------------------------------------

/// A parsed artifact, tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<T> {
    /// Built from the model's structured output.
    Parsed(T),
    /// The model output was unusable; this is the deterministic fallback.
    Fallback(T),
}

impl<T> ParseOutcome<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn as_ref(&self) -> &T {
        match self {
            Self::Parsed(v) | Self::Fallback(v) => v,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    /// Transform the artifact, keeping the tag.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        match self {
            Self::Parsed(v) => ParseOutcome::Parsed(f(v)),
            Self::Fallback(v) => ParseOutcome::Fallback(f(v)),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON extraction
// ---------------------------------------------------------------------------

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json|JSON)?\s*(.*?)```").expect("valid regex"));

/// Candidate JSON texts inside a model reply, most specific first:
/// the whole reply, each fenced code block, then the outermost
/// array and object spans, whichever opens first leading.
fn json_candidates(raw: &str) -> Vec<&str> {
    let mut candidates = vec![raw.trim()];

    for cap in FENCED_BLOCK.captures_iter(raw) {
        if let Some(body) = cap.get(1) {
            candidates.push(body.as_str().trim());
        }
    }

    let mut spans: Vec<(usize, &str)> = [('[', ']'), ('{', '}')]
        .into_iter()
        .filter_map(|(open, close)| {
            let start = raw.find(open)?;
            let end = raw.rfind(close)?;
            (start < end).then(|| (start, &raw[start..=end]))
        })
        .collect();
    spans.sort_by_key(|(start, _)| *start);
    candidates.extend(spans.into_iter().map(|(_, span)| span));

    candidates
}

/// Strictly parse the first candidate that deserializes as `T`.
pub fn extract_json<T: DeserializeOwned>(raw: &str) -> Option<T> {
    json_candidates(raw)
        .into_iter()
        .filter(|c| !c.is_empty())
        .find_map(|c| serde_json::from_str(c).ok())
}

/// Like [`extract_json`], but only a JSON object may become `T`.
///
/// Serde structs also deserialize from sequences, so an inner array
/// would otherwise pass for a defaulted struct.
pub fn extract_json_object<T: DeserializeOwned>(raw: &str) -> Option<T> {
    json_candidates(raw)
        .into_iter()
        .filter(|c| !c.is_empty())
        .filter_map(|c| serde_json::from_str::<Value>(c).ok())
        .filter(Value::is_object)
        .find_map(|v| serde_json::from_value(v).ok())
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Fixed topic names cycled by the fallback.
pub const FALLBACK_TOPIC_NAMES: [&str; 13] = [
    "Industry Trends and Insights",
    "Customer Success Stories",
    "Product Deep Dive",
    "Behind the Scenes",
    "Expert Tips and Best Practices",
    "Common Challenges and Solutions",
    "Team Spotlight",
    "Myths vs. Facts",
    "How-To Guide",
    "Case Study Showcase",
    "Community and Partnerships",
    "Future of the Industry",
    "Quarterly Recap and Lessons Learned",
];

#[derive(Deserialize)]
struct TopicsEnvelope {
    topics: Vec<CampaignTopic>,
}

/// Parse a topic list, truncating to `week_count`.
///
/// A list shorter than `week_count` is never padded; it falls back instead.
/// Week indices are renumbered 1..=n after truncation.
pub fn parse_topics(raw: &str, week_count: usize) -> ParseOutcome<Vec<CampaignTopic>> {
    let parsed = extract_json::<Vec<CampaignTopic>>(raw)
        .or_else(|| extract_json_object::<TopicsEnvelope>(raw).map(|e| e.topics));

    match parsed {
        Some(mut topics) if topics.len() >= week_count => {
            topics.truncate(week_count);
            for (i, topic) in topics.iter_mut().enumerate() {
                topic.week = i as u32 + 1;
            }
            ParseOutcome::Parsed(topics)
        }
        _ => ParseOutcome::Fallback(fallback_topics(week_count)),
    }
}

/// `week_count` generic topics cycling through [`FALLBACK_TOPIC_NAMES`].
pub fn fallback_topics(week_count: usize) -> Vec<CampaignTopic> {
    (0..week_count)
        .map(|i| {
            let name = FALLBACK_TOPIC_NAMES[i % FALLBACK_TOPIC_NAMES.len()];
            fallback_topic(i as u32 + 1, format!("Week {}: {name}", i + 1), name)
        })
        .collect()
}

fn fallback_topic(week: u32, title: String, subject: &str) -> CampaignTopic {
    CampaignTopic {
        week,
        title,
        description: format!("Engaging content exploring {subject}."),
        primary_channel: "Blog".to_string(),
        secondary_channels: vec!["Social Media".to_string()],
        content_types: vec!["blog".to_string(), "social".to_string()],
        estimated_effort: 6,
        seasonal_relevance: None,
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Channel strategy used when neither the model nor the context supplies one.
fn default_channel_strategy() -> ChannelStrategy {
    ChannelStrategy {
        primary: vec!["Blog".to_string(), "LinkedIn".to_string()],
        secondary: vec!["Email".to_string(), "Twitter".to_string()],
        experimental: vec!["TikTok".to_string()],
    }
}

fn context_channel_strategy(context: &GenerationContext) -> ChannelStrategy {
    let strategy = ChannelStrategy {
        primary: context.goals.primary_channels.clone(),
        secondary: context.goals.secondary_channels.clone(),
        experimental: context.goals.experimental_channels.clone(),
    };
    if strategy.is_empty() {
        default_channel_strategy()
    } else {
        strategy
    }
}

/// The fixed goal → KPI mapping used by the fallback plan.
pub fn default_kpis() -> BTreeMap<String, Vec<String>> {
    let entries: [(&str, &[&str]); 3] = [
        ("Brand Awareness", &["Reach", "Impressions"]),
        ("Engagement", &["Likes", "Comments", "Shares"]),
        ("Conversion", &["Click-through Rate", "Lead Generation"]),
    ];
    entries
        .into_iter()
        .map(|(goal, kpis)| {
            (
                goal.to_string(),
                kpis.iter().map(|k| k.to_string()).collect(),
            )
        })
        .collect()
}

/// Parse a campaign plan for `topics`.
///
/// A parsed plan with fewer campaigns than topics falls back; extra
/// campaigns are truncated. An empty channel strategy is filled from context.
pub fn parse_plan(
    raw: &str,
    context: &GenerationContext,
    topics: &[String],
) -> ParseOutcome<DetailedCampaignPlan> {
    match extract_json_object::<DetailedCampaignPlan>(raw) {
        Some(mut plan) if plan.campaigns.len() >= topics.len() => {
            plan.campaigns.truncate(topics.len());
            if plan.channel_strategy.is_empty() {
                plan.channel_strategy = context_channel_strategy(context);
            }
            ParseOutcome::Parsed(plan)
        }
        _ => ParseOutcome::Fallback(fallback_plan(context, topics)),
    }
}

/// A plan with exactly one campaign per topic, in input order.
pub fn fallback_plan(context: &GenerationContext, topics: &[String]) -> DetailedCampaignPlan {
    let company = match context.company_name() {
        "" => "the company".to_string(),
        name => name.to_string(),
    };

    DetailedCampaignPlan {
        overview: format!(
            "A {}-week content campaign for {company} built around the selected topics.",
            topics.len()
        ),
        quarterly_themes: vec![
            "Brand Awareness".to_string(),
            "Audience Engagement".to_string(),
            "Lead Generation".to_string(),
        ],
        campaigns: topics
            .iter()
            .enumerate()
            .map(|(i, title)| fallback_topic(i as u32 + 1, title.clone(), title))
            .collect(),
        channel_strategy: context_channel_strategy(context),
        timeline: format!("{} weeks", topics.len()),
        kpis: default_kpis(),
    }
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// One content type's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPiece {
    Blog(BlogContent),
    Video(VideoContent),
    Social(BTreeMap<String, SocialPost>),
    Email(EmailContent),
}

impl ContentPiece {
    /// Store this piece in its slot of `content`.
    pub fn store(self, content: &mut CampaignContent) {
        match self {
            Self::Blog(blog) => content.blog = Some(blog),
            Self::Video(video) => content.video = Some(video),
            Self::Social(posts) => content.social = Some(posts),
            Self::Email(email) => content.email = Some(email),
        }
    }
}

/// Parse one content type's output, wrapping unusable output as free text.
pub fn parse_content(
    raw: &str,
    content_type: ContentType,
    context: &GenerationContext,
) -> ParseOutcome<ContentPiece> {
    let parsed = match content_type {
        ContentType::Blog => extract_json_object::<BlogContent>(raw).map(ContentPiece::Blog),
        ContentType::Video => extract_json_object::<VideoContent>(raw).map(ContentPiece::Video),
        ContentType::Social => extract_json_object::<BTreeMap<String, SocialPost>>(raw)
            .filter(|posts| !posts.is_empty())
            .map(ContentPiece::Social),
        ContentType::Email => extract_json_object::<EmailContent>(raw).map(ContentPiece::Email),
    };

    match parsed {
        Some(piece) => ParseOutcome::Parsed(piece),
        None => ParseOutcome::Fallback(fallback_content(raw, content_type, context)),
    }
}

/// The raw text as the primary free-text field of `content_type`'s shape.
pub fn fallback_content(
    raw: &str,
    content_type: ContentType,
    context: &GenerationContext,
) -> ContentPiece {
    let text = raw.trim().to_string();
    match content_type {
        ContentType::Blog => ContentPiece::Blog(BlogContent {
            content: text,
            ..Default::default()
        }),
        ContentType::Video => ContentPiece::Video(VideoContent {
            script: text,
            ..Default::default()
        }),
        ContentType::Social => {
            let platform = social_platforms(context)
                .into_iter()
                .next()
                .unwrap_or_else(|| "LinkedIn".to_string());
            let mut posts = BTreeMap::new();
            posts.insert(
                platform,
                SocialPost {
                    content: text,
                    ..Default::default()
                },
            );
            ContentPiece::Social(posts)
        }
        ContentType::Email => ContentPiece::Email(EmailContent {
            content: text,
            ..Default::default()
        }),
    }
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

pub fn parse_engagement(raw: &str) -> ParseOutcome<EngagementSimulation> {
    match extract_json_object::<EngagementSimulation>(raw) {
        Some(sim) => ParseOutcome::Parsed(sim),
        None => ParseOutcome::Fallback(fallback_engagement()),
    }
}

pub fn fallback_engagement() -> EngagementSimulation {
    EngagementSimulation {
        persona_reaction: "This content feels relevant and speaks to challenges I recognize. \
                           I would likely read it through and consider sharing it."
            .to_string(),
        engagement_score: 7,
        optimization_suggestions: vec![
            "Add a clearer, more specific call-to-action".to_string(),
            "Include concrete examples or data to strengthen credibility".to_string(),
        ],
    }
}

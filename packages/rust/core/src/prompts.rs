//! Prompt construction.
//!
//! Pure and deterministic: the same context and parameters always yield the
//! same prompt text. Each builder starts from [`render_context_summary`] and
//! appends task-specific instructions plus an output-shape example the model
//! is asked to mimic.

use campaignforge_shared::{
    CampaignContent, ContentType, GenerationContext, render_context_summary,
};

/// Blog length used when the profile has no preference.
pub const DEFAULT_BLOG_WORDS: u32 = 2000;
/// Video length used when the profile has no preference.
pub const DEFAULT_VIDEO_LENGTH: &str = "2-3 minutes";
/// Email length used when the profile has no preference.
pub const DEFAULT_EMAIL_LENGTH: &str = "150-250 words";
/// Social platforms used when the profile names neither platforms nor primary channels.
pub const DEFAULT_PRIMARY_CHANNELS: [&str; 2] = ["LinkedIn", "Twitter"];
pub const DEFAULT_BRAND_TONE: &str = "conversational";
pub const DEFAULT_AUDIENCE: &str = "general business audience";

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

/// Prompt asking for `week_count` weekly topics as a JSON array.
pub fn topics_prompt(context: &GenerationContext, week_count: usize) -> String {
    format!(
        r#"{summary}
Generate {week_count} weekly content marketing topics for a {week_count}-week content calendar.
Content is published {cadence}. Each topic should build on the company's value
propositions and speak directly to the audience's pain points.

Respond with ONLY a JSON array of exactly {week_count} objects, in week order, shaped like:
[
  {{
    "week": 1,
    "title": "Topic title",
    "description": "One or two sentences describing the angle",
    "primaryChannel": "Blog",
    "secondaryChannels": ["LinkedIn", "Email"],
    "contentTypes": ["blog", "social"],
    "estimatedEffort": 6,
    "seasonalRelevance": "Optional seasonal hook"
  }}
]"#,
        summary = render_context_summary(context),
        cadence = context.cadence(),
    )
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Prompt asking for a full campaign plan over the given ordered topics.
pub fn plan_prompt(context: &GenerationContext, topics: &[String]) -> String {
    let topic_lines: String = topics
        .iter()
        .enumerate()
        .map(|(i, title)| format!("Week {}: {title}\n", i + 1))
        .collect();

    format!(
        r#"{summary}
Create a detailed campaign plan for the following {count} weekly topics:
{topic_lines}
Respond with ONLY a JSON object shaped like:
{{
  "overview": "Campaign overview",
  "quarterlyThemes": ["Theme 1", "Theme 2", "Theme 3"],
  "campaigns": [
    {{
      "week": 1,
      "title": "Topic title from the list above",
      "description": "How this week supports the plan",
      "primaryChannel": "Blog",
      "secondaryChannels": ["LinkedIn"],
      "contentTypes": ["blog", "social"],
      "estimatedEffort": 6
    }}
  ],
  "channelStrategy": {{
    "primary": ["Blog"],
    "secondary": ["LinkedIn"],
    "experimental": ["TikTok"]
  }},
  "timeline": "{count} weeks",
  "kpis": {{ "Goal name": ["KPI 1", "KPI 2"] }}
}}
Include exactly one entry in "campaigns" per topic, in the order listed."#,
        summary = render_context_summary(context),
        count = topics.len(),
    )
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Social platforms to write for: explicit preference, then primary channels,
/// then [`DEFAULT_PRIMARY_CHANNELS`].
pub fn social_platforms(context: &GenerationContext) -> Vec<String> {
    if !context.preferences.social_platforms.is_empty() {
        return context.preferences.social_platforms.clone();
    }
    if !context.goals.primary_channels.is_empty() {
        return context.goals.primary_channels.clone();
    }
    DEFAULT_PRIMARY_CHANNELS.iter().map(|s| s.to_string()).collect()
}

fn brand_tone(context: &GenerationContext) -> &str {
    context.brand.tone.as_deref().unwrap_or(DEFAULT_BRAND_TONE)
}

fn audience(context: &GenerationContext) -> &str {
    context.audience.primary.as_deref().unwrap_or(DEFAULT_AUDIENCE)
}

/// Task instructions and output shape for one content type.
fn content_task(context: &GenerationContext, content_type: ContentType) -> String {
    let tone = brand_tone(context);
    let audience = audience(context);

    match content_type {
        ContentType::Blog => {
            let words = context
                .preferences
                .blog_word_count
                .unwrap_or(DEFAULT_BLOG_WORDS);
            format!(
                r#"Write a {words}-word blog post in a {tone} tone for a {audience}.
Respond with ONLY a JSON object shaped like:
{{"title": "Post title", "outline": ["Section 1", "Section 2"], "content": "Full post body", "wordCount": {words}}}"#
            )
        }
        ContentType::Video => {
            let length = context
                .preferences
                .video_length
                .as_deref()
                .unwrap_or(DEFAULT_VIDEO_LENGTH);
            format!(
                r#"Write a {length} video script in a {tone} tone for a {audience}, broken into scenes.
Respond with ONLY a JSON object shaped like:
{{"title": "Video title", "script": "Full narration script", "duration": "{length}", "scenes": ["Scene 1 description", "Scene 2 description"]}}"#
            )
        }
        ContentType::Social => {
            let platforms = social_platforms(context).join(", ");
            format!(
                r##"Write one social media post for each of these platforms: {platforms}.
Match each platform's conventions, keep a {tone} tone, and target a {audience}.
Respond with ONLY a JSON object keyed by platform name, shaped like:
{{"PlatformName": {{"content": "Post text", "hashtags": ["#tag"], "bestTime": "Tuesday 9am"}}}}"##
            )
        }
        ContentType::Email => {
            let length = context
                .preferences
                .email_length
                .as_deref()
                .unwrap_or(DEFAULT_EMAIL_LENGTH);
            format!(
                r#"Write a marketing email ({length}) in a {tone} tone for a {audience}.
Respond with ONLY a JSON object shaped like:
{{"subject": "Subject line", "previewText": "Inbox preview", "content": "Email body", "callToAction": "Button text"}}"#
            )
        }
    }
}

/// Prompt asking for one content type about one topic.
pub fn content_prompt(
    context: &GenerationContext,
    topic: &str,
    content_type: ContentType,
) -> String {
    format!(
        "{summary}\nTOPIC: {topic}\n\n{task}",
        summary = render_context_summary(context),
        task = content_task(context, content_type),
    )
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// Prompt asking the model to react to `content` as a member of the audience.
pub fn engagement_prompt(context: &GenerationContext, content: &CampaignContent) -> String {
    let serialized = serde_json::to_string_pretty(content).unwrap_or_default();

    format!(
        r#"{summary}
Act as a typical member of the target audience ({audience}) and react honestly to
the following content:

{serialized}

Respond with ONLY a JSON object shaped like:
{{
  "personaReaction": "First-person reaction to the content",
  "engagementScore": 7,
  "optimizationSuggestions": ["Suggestion 1", "Suggestion 2"]
}}
The engagementScore is an integer from 1 (ignore) to 10 (share immediately)."#,
        summary = render_context_summary(context),
        audience = audience(context),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaignforge_shared::BlogContent;

    fn acme() -> GenerationContext {
        let mut ctx = GenerationContext::default();
        ctx.company.name = Some("Acme".into());
        ctx.goals.primary_channels = vec!["Blog".into(), "Instagram".into()];
        ctx
    }

    #[test]
    fn topics_prompt_embeds_count_cadence_and_shape() {
        let prompt = topics_prompt(&GenerationContext::default(), 8);
        assert!(prompt.contains("Generate 8 weekly"));
        assert!(prompt.contains("published weekly"));
        assert!(prompt.contains(r#""primaryChannel": "Blog""#));
        assert!(prompt.starts_with("COMPANY CONTEXT:"));
    }

    #[test]
    fn prompts_are_deterministic() {
        let ctx = acme();
        assert_eq!(topics_prompt(&ctx, 13), topics_prompt(&ctx, 13));
        assert_eq!(
            content_prompt(&ctx, "Launch", ContentType::Email),
            content_prompt(&ctx, "Launch", ContentType::Email)
        );
    }

    #[test]
    fn plan_prompt_lists_topics_in_order() {
        let topics = vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()];
        let prompt = plan_prompt(&acme(), &topics);
        let a = prompt.find("Week 1: Alpha").unwrap();
        let b = prompt.find("Week 2: Beta").unwrap();
        let c = prompt.find("Week 3: Gamma").unwrap();
        assert!(a < b && b < c);
        assert!(prompt.contains("\"timeline\": \"3 weeks\""));
    }

    #[test]
    fn content_prompts_use_literal_defaults() {
        let ctx = GenerationContext::default();

        let blog = content_prompt(&ctx, "Launch", ContentType::Blog);
        assert!(blog.contains("2000-word blog post"));
        assert!(blog.contains("conversational tone"));
        assert!(blog.contains("general business audience"));

        let social = content_prompt(&ctx, "Launch", ContentType::Social);
        assert!(social.contains("platforms: LinkedIn, Twitter"));
        assert!(social.contains(
            r##"{"PlatformName": {"content": "Post text", "hashtags": ["#tag"], "bestTime": "Tuesday 9am"}}"##
        ));
    }

    #[test]
    fn content_prompts_honor_preferences() {
        let mut ctx = acme();
        ctx.preferences.blog_word_count = Some(800);
        ctx.brand.tone = Some("witty".into());
        ctx.audience.primary = Some("indie game developers".into());

        let blog = content_prompt(&ctx, "Launch", ContentType::Blog);
        assert!(blog.contains("800-word blog post in a witty tone for a indie game developers"));

        let social = content_prompt(&ctx, "Launch", ContentType::Social);
        assert!(social.contains("platforms: Blog, Instagram"));

        ctx.preferences.social_platforms = vec!["TikTok".into()];
        assert_eq!(social_platforms(&ctx), vec!["TikTok".to_string()]);
    }

    #[test]
    fn each_content_type_has_distinct_instructions() {
        let ctx = acme();
        let prompts: Vec<String> = ContentType::ALL
            .iter()
            .map(|t| content_prompt(&ctx, "Launch", *t))
            .collect();
        assert!(prompts[0].contains("blog post"));
        assert!(prompts[1].contains("video script"));
        assert!(prompts[2].contains("social media post"));
        assert!(prompts[3].contains("marketing email"));
        assert!(prompts.iter().all(|p| p.contains("TOPIC: Launch")));
    }

    #[test]
    fn engagement_prompt_embeds_serialized_content() {
        let content = CampaignContent {
            blog: Some(BlogContent {
                title: "Ten Trail Tips".into(),
                ..Default::default()
            }),
            ..Default::default()
        };
        let prompt = engagement_prompt(&acme(), &content);
        assert!(prompt.contains("Ten Trail Tips"));
        assert!(prompt.contains("engagementScore"));
        assert!(!prompt.contains("\"video\""));
    }
}

//! Campaign generation: prompt → dispatch → parse, once per operation.

use tracing::{info, instrument, warn};

use campaignforge_providers::ProviderClient;
use campaignforge_shared::{
    CampaignContent, CampaignForgeError, CampaignTopic, ContentType, DetailedCampaignPlan,
    EngagementSimulation, GenerationContext, ProviderConfig, Result,
};

use crate::parser::{self, ParseOutcome};
use crate::prompts;

/// Weeks in the default content calendar (one quarter).
pub const DEFAULT_WEEK_COUNT: usize = 13;

/// Upper bound on a single calendar request.
pub const MAX_WEEK_COUNT: usize = 52;

/// Runs the four generation tasks against one provider configuration.
///
/// The configuration is optional so a generator can be built before
/// credentials are known; every operation fails with
/// [`CampaignForgeError::MissingConfig`] until one is supplied.
pub struct CampaignGenerator {
    client: ProviderClient,
    config: Option<ProviderConfig>,
}

impl CampaignGenerator {
    /// A generator backed by the built-in vendors.
    pub fn new(config: Option<ProviderConfig>) -> Result<Self> {
        Ok(Self::with_client(ProviderClient::new()?, config))
    }

    pub fn with_client(client: ProviderClient, config: Option<ProviderConfig>) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> Option<&ProviderConfig> {
        self.config.as_ref()
    }

    async fn dispatch(&self, prompt: &str) -> Result<String> {
        self.client.send(prompt, self.config.as_ref()).await
    }

    /// Generate exactly `week_count` weekly topics.
    #[instrument(skip_all, fields(week_count = week_count))]
    pub async fn generate_topics(
        &self,
        context: &GenerationContext,
        week_count: usize,
    ) -> Result<ParseOutcome<Vec<CampaignTopic>>> {
        if !(1..=MAX_WEEK_COUNT).contains(&week_count) {
            return Err(CampaignForgeError::validation(format!(
                "week count must be between 1 and {MAX_WEEK_COUNT}, got {week_count}"
            )));
        }

        let raw = self
            .dispatch(&prompts::topics_prompt(context, week_count))
            .await?;
        let outcome = parser::parse_topics(&raw, week_count);
        log_outcome("topics", &outcome);
        Ok(outcome)
    }

    /// Generate a plan with one campaign per entry of `topics`, in order.
    #[instrument(skip_all, fields(topic_count = topics.len()))]
    pub async fn generate_plan(
        &self,
        context: &GenerationContext,
        topics: &[String],
    ) -> Result<ParseOutcome<DetailedCampaignPlan>> {
        if topics.is_empty() {
            return Err(CampaignForgeError::validation(
                "a campaign plan needs at least one topic",
            ));
        }

        let raw = self.dispatch(&prompts::plan_prompt(context, topics)).await?;
        let outcome = parser::parse_plan(&raw, context, topics);
        log_outcome("plan", &outcome);
        Ok(outcome)
    }

    /// Generate content for `topic`, one dispatch per requested type.
    ///
    /// Types are processed sequentially in the given order; an empty slice
    /// means every type. The first dispatch error aborts the whole call and
    /// discards whatever was already generated. The result is a fallback if
    /// any single type fell back.
    #[instrument(skip_all, fields(topic = %topic, types = ?content_types))]
    pub async fn generate_content(
        &self,
        context: &GenerationContext,
        topic: &str,
        content_types: &[ContentType],
    ) -> Result<ParseOutcome<CampaignContent>> {
        let requested: &[ContentType] = if content_types.is_empty() {
            &ContentType::ALL
        } else {
            content_types
        };

        let mut content = CampaignContent::default();
        let mut any_fallback = false;
        let mut done: Vec<ContentType> = Vec::with_capacity(requested.len());

        for &content_type in requested {
            if done.contains(&content_type) {
                continue;
            }
            let raw = self
                .dispatch(&prompts::content_prompt(context, topic, content_type))
                .await?;
            let outcome = parser::parse_content(&raw, content_type, context);
            if outcome.is_fallback() {
                warn!(%content_type, "content output unparseable, wrapping raw text");
                any_fallback = true;
            }
            outcome.into_inner().store(&mut content);
            done.push(content_type);
        }

        info!(generated = ?content.types(), "content generated");
        Ok(if any_fallback {
            ParseOutcome::Fallback(content)
        } else {
            ParseOutcome::Parsed(content)
        })
    }

    /// Ask the model to react to `content` as the target audience.
    #[instrument(skip_all)]
    pub async fn simulate_engagement(
        &self,
        context: &GenerationContext,
        content: &CampaignContent,
    ) -> Result<ParseOutcome<EngagementSimulation>> {
        let raw = self
            .dispatch(&prompts::engagement_prompt(context, content))
            .await?;
        let outcome = parser::parse_engagement(&raw);
        log_outcome("engagement", &outcome);
        Ok(outcome)
    }
}

fn log_outcome<T>(task: &str, outcome: &ParseOutcome<T>) {
    if outcome.is_fallback() {
        warn!(task, "model output unparseable, using fallback");
    } else {
        info!(task, "model output parsed");
    }
}

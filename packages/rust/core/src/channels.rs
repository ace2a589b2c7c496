//! Channel matrix: pure composition over the context's channel tiers.

use serde::{Deserialize, Serialize};

use campaignforge_shared::{CampaignTopic, GenerationContext};

/// Secondary channels attached to each topic in the matrix.
const SECONDARY_PER_TOPIC: usize = 2;

pub const CHANNEL_RECOMMENDATIONS: [&str; 4] = [
    "Focus 60% of effort on primary channels for consistent reach",
    "Repurpose primary content across secondary channels to extend its lifespan",
    "Reserve 10-15% of effort for experimental channels and measure results",
    "Review channel performance monthly and rebalance effort accordingly",
];

/// Channels assigned to one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicChannels {
    pub week: u32,
    pub title: String,
    pub channels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMatrix {
    pub primary: Vec<String>,
    pub secondary: Vec<String>,
    pub experimental: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic_channels: Option<Vec<TopicChannels>>,
}

/// Build the channel matrix for `context`, optionally mapping `topics`.
///
/// Each topic gets every primary channel plus the first two secondary ones.
pub fn build_channel_matrix(
    context: &GenerationContext,
    topics: Option<&[CampaignTopic]>,
) -> ChannelMatrix {
    let goals = &context.goals;

    let topic_channels = topics.map(|topics| {
        let channels: Vec<String> = goals
            .primary_channels
            .iter()
            .chain(goals.secondary_channels.iter().take(SECONDARY_PER_TOPIC))
            .cloned()
            .collect();
        topics
            .iter()
            .map(|topic| TopicChannels {
                week: topic.week,
                title: topic.title.clone(),
                channels: channels.clone(),
            })
            .collect()
    });

    ChannelMatrix {
        primary: goals.primary_channels.clone(),
        secondary: goals.secondary_channels.clone(),
        experimental: goals.experimental_channels.clone(),
        recommendations: CHANNEL_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        topic_channels,
    }
}

//! Campaign generation for CampaignForge.
//!
//! This crate turns a [`GenerationContext`](campaignforge_shared::GenerationContext)
//! into marketing artifacts: prompts are built in [`prompts`], dispatched
//! through the provider client, and parsed in [`parser`] with deterministic
//! fallbacks. [`CampaignGenerator`] runs the four generation tasks;
//! [`build_channel_matrix`] needs no AI call.

pub mod channels;
pub mod generator;
pub mod parser;
pub mod prompts;

pub use channels::{ChannelMatrix, TopicChannels, build_channel_matrix};
pub use generator::{CampaignGenerator, DEFAULT_WEEK_COUNT, MAX_WEEK_COUNT};
pub use parser::{ContentPiece, ParseOutcome};

pub mod orchestrator;

pub use orchestrator::{CampaignConfig, CampaignReport, TrialKind, run_campaign};

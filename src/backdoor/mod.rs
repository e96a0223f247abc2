pub mod synthesize;
pub mod detect;

pub mod synthesize;

pub use synthesize::{ExponentCandidate, check_bound, max_exponent, search_bound, synthesize, synthesize_with};

pub mod detect;

pub use detect::{BackdoorFinding, MAX_PHI_COFACTOR, detect};

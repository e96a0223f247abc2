pub mod math;
pub mod keygen;

pub mod keygen;

pub use keygen::{KeyParameters, generate_primes};

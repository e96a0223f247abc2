// Réexporte les primitives arithmétiques partagées par la synthèse et la détection

mod math;

pub use math::{MIN_KEY_BITS, gcd, generate_prime, is_probable_prime, is_valid_keypair, mod_inverse};

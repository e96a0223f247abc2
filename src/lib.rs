// Déclaration des modules
pub mod crypto_error;
pub mod rsa;
pub mod backdoor;
pub mod orchestrator;

pub use crate::rsa::math;
pub use crate::rsa::keygen;

// Primitives arithmétiques principales
pub use crate::rsa::math::{gcd, generate_prime, is_probable_prime, is_valid_keypair, mod_inverse};

// Types et génération des paramètres de clé
pub use crate::rsa::keygen::{KeyParameters, generate_primes};

// Cœur de l'attaque : synthèse et détection d'exposants piégés
pub use crate::backdoor::synthesize::{ExponentCandidate, search_bound, synthesize, synthesize_with};
pub use crate::backdoor::detect::{BackdoorFinding, detect};

// Orchestration des campagnes de mesures
pub use crate::orchestrator::{CampaignConfig, CampaignReport, TrialKind, run_campaign};

// Erreur centralisée
pub use crypto_error::CryptoError;

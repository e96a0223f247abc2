// ===========================================================================
// Gestion centralisée des erreurs cryptographiques
//
// Tous les modules utilisent ce type au lieu de panic!/assert!/unwrap().
// Attention : l'absence d'inverse modulaire n'est PAS une erreur ici —
// c'est un résultat fréquent et attendu des boucles de recherche, signalé
// par Option::None dans math::mod_inverse. Seules les conditions qui
// empêchent la recherche de démarrer (ou un worker de terminer) passent
// par CryptoError.
// ===========================================================================

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum CryptoError {
    // --- Erreurs de paramètres d'entrée ---
    /// La taille de clé demandée est trop petite (< MIN_KEY_BITS)
    KeySizeTooSmall { requested: u64, minimum: u64 },
    /// Paramètre de sécurité nul : la borne de recherche 2·sec serait une
    /// division par zéro
    SecurityParameterZero,

    // --- Erreurs d'orchestration ---
    /// Un worker de campagne a paniqué ou fermé son canal avant la fin
    WorkerFailure,

    InvalidInput(String), // Erreur générique pour les entrées invalides (ex: longueur de clé impaire)
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeySizeTooSmall { requested, minimum } =>
                write!(f, "Taille de clé {requested} bits insuffisante, minimum requis : {minimum} bits"),
            CryptoError::SecurityParameterZero =>
                write!(f, "Paramètre de sécurité nul : borne de recherche indéfinie"),
            CryptoError::WorkerFailure =>
                write!(f, "Un worker de campagne s'est arrêté prématurément"),
            CryptoError::InvalidInput(msg) =>
                write!(f, "Entrée invalide : {msg}"),
        }
    }
}

impl std::error::Error for CryptoError {}

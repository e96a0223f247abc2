use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand_core::RngCore;
use crate::rsa::keygen::{KeyParameters, generate_primes};
use crate::rsa::math::{gcd, mod_inverse};
use crate::crypto_error::CryptoError;

// ============================================================================
// Candidat d'exposant public piégé
//
// Relation structurelle : e ≡ e0 · e1⁻¹ (mod phi(N)) avec e0, e1 petits.
// Invariants garantis par la synthèse : 1 ≤ e0, e1 < B ; e impair ;
// 1 < e < 2^(kl-1) − 2·2^(kl/2) ; gcd(e, phi(N)) = 1.
// Deux paires (e0, e1) distinctes peuvent produire le même e.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExponentCandidate {
    pub e0: u64,
    pub e1: u64,
    pub e:  BigUint,
}

impl ExponentCandidate {
    // -----------------------------------------------------------------------
    // Un candidat avec e1 = 1 (donc e = e0, un petit exposant ordinaire)
    // n'est pas un vrai piège : e·e1 − e0 n'atteint jamais l'ordre de
    // grandeur de phi(N) et le détecteur ne peut rien en retrouver.
    // Les démonstrations et essais de détection l'écartent.
    // -----------------------------------------------------------------------
    pub fn is_degenerate(&self) -> bool {
        self.e1 == 1 || BigUint::from(self.e0) == self.e
    }
}

// ---------------------------------------------------------------------------
// Borne supérieure (exclusive) de l'énumération e0/e1 : B = kl/(2·sec) + 1
// ---------------------------------------------------------------------------
pub fn search_bound(key_length: u64, sec: u64) -> u64 {
    key_length / (2 * sec) + 1
}

// ---------------------------------------------------------------------------
// Pré-filtre : 2·e0 + e1·(e1+1) < 2·kl/r, en forme entière exacte
// r·(2·e0 + e1·(e1+1)) < 2·kl (le membre droit original est un réel —
// la multiplication croisée évite toute troncature).
// Écarte à bas coût les paires qui ne peuvent pas satisfaire la contrainte
// de plage sur e, avant de payer un inverse modulaire.
// ---------------------------------------------------------------------------
pub fn check_bound(e0: u64, e1: u64, key_length: u64, r: u64) -> bool {
    r * (2 * e0 + e1 * (e1 + 1)) < 2 * key_length
}

// Plage admissible pour e : 1 < e < 2^(kl-1) − 2·2^(kl/2)
pub fn max_exponent(key_length: u64) -> BigUint {
    (BigUint::one() << (key_length - 1)) - (BigUint::one() << (key_length / 2 + 1))
}

// ============================================================================
// Synthèse : énumère les paires (e0, e1) sous la borne B, inverse e1
// modulo le vrai phi(N) et filtre. e = e0 · e1⁻¹ SANS réduction mod phi —
// la contrainte de plage fait le tri.
//
// Ordre du résultat : e0 croissant puis e1 croissant (ordre d'insertion de
// l'énumération imbriquée).
// ============================================================================
pub fn synthesize_with(params: &KeyParameters, sec: u64) -> Result<Vec<ExponentCandidate>, CryptoError> {
    if sec == 0 {
        return Err(CryptoError::SecurityParameterZero);
    }

    let r = 2 * sec;
    let bound = search_bound(params.key_length, sec);

    let min_e = BigUint::one();
    let max_e = max_exponent(params.key_length);

    let mut candidates = Vec::new();

    for e0 in 1..bound {
        for e1 in 1..bound {
            if !check_bound(e0, e1, params.key_length, r) {
                continue;
            }

            // Absence d'inverse : résultat ordinaire, on passe au suivant
            let Some(e1_inverse) = mod_inverse(&BigUint::from(e1), &params.phi_n) else {
                continue;
            };

            let e = e1_inverse * e0;

            // e doit être demandable comme exposant public RSA : impair et
            // dans la plage 1 < e < 2^(kl-1) − 2·2^(kl/2)
            if e.is_even() || e <= min_e || e >= max_e {
                continue;
            }
            if gcd(&e, &params.phi_n) != BigUint::one() {
                continue;
            }

            candidates.push(ExponentCandidate { e0, e1, e });
        }
    }

    Ok(candidates)
}

// ============================================================================
// Variante autonome : génère d'abord les premiers, puis synthétise.
// Retourne aussi les paramètres de clé pour que l'appelant puisse comparer
// les trouvailles du détecteur au vrai phi(N).
// ============================================================================
pub fn synthesize(
    sec: u64,
    key_length: u64,
    rng: &mut impl RngCore,
) -> Result<(KeyParameters, Vec<ExponentCandidate>), CryptoError> {
    let params = generate_primes(key_length, rng)?;
    let candidates = synthesize_with(&params, sec)?;
    Ok((params, candidates))
}

// ============================================================================
// Tests unitaires de la synthèse
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    // Paramètres fixes : p = 149, q = 251 → N = 37399 (16 bits), phi = 37000
    fn fixture_params() -> KeyParameters {
        KeyParameters {
            p:          BigUint::from(149u32),
            q:          BigUint::from(251u32),
            n:          BigUint::from(37399u32),
            phi_n:      BigUint::from(37000u32),
            key_length: 16,
        }
    }

    #[test]
    fn test_synthesize_fixture_exact_output() {
        // sec = 1 → r = 2, B = 16/2 + 1 = 9, max_e = 2^15 − 2^9 = 32256.
        // e1 = 3 : inv(3, 37000) = 24667 → (1, 3, 24667) ; e0 ≥ 2 dépasse max_e.
        // e1 = 1 : e = e0, seuls e0 = 3 impairs et copremiers avec 37000.
        let candidates = synthesize_with(&fixture_params(), 1).unwrap();
        assert_eq!(
            candidates,
            vec![
                ExponentCandidate { e0: 1, e1: 3, e: BigUint::from(24667u32) },
                ExponentCandidate { e0: 3, e1: 1, e: BigUint::from(3u32) },
            ]
        );
    }

    #[test]
    fn test_degenerate_candidates_flagged() {
        let candidates = synthesize_with(&fixture_params(), 1).unwrap();
        assert!(!candidates[0].is_degenerate()); // (1, 3, 24667)
        assert!(candidates[1].is_degenerate());  // (3, 1, 3) : e1 = 1
    }

    #[test]
    fn test_synthesize_rejects_zero_security_parameter() {
        assert!(matches!(
            synthesize_with(&fixture_params(), 0),
            Err(CryptoError::SecurityParameterZero)
        ));
    }

    #[test]
    fn test_candidate_invariants_over_fresh_primes() {
        let mut rng = OsRng;
        let (params, candidates) = synthesize(4, 64, &mut rng).unwrap();
        let bound = search_bound(64, 4);
        let max_e = max_exponent(64);
        for c in &candidates {
            assert!(c.e0 >= 1 && c.e0 < bound);
            assert!(c.e1 >= 1 && c.e1 < bound);
            assert!(c.e.is_odd());
            assert!(c.e > BigUint::one());
            assert!(c.e < max_e);
            assert_eq!(gcd(&c.e, &params.phi_n), BigUint::one());
            // Relation structurelle : e · e1 ≡ e0 (mod phi)
            assert_eq!(
                (&c.e * c.e1) % &params.phi_n,
                BigUint::from(c.e0) % &params.phi_n
            );
        }
    }

    #[test]
    fn test_check_bound_monotonically_restrictive() {
        // À kl et sec fixés, grossir e0 ou e1 finit par violer la borne
        let (key_length, r) = (1024, 160);
        assert!(check_bound(1, 1, key_length, r));
        let mut e0 = 1;
        while check_bound(e0, 1, key_length, r) {
            e0 += 1;
        }
        assert!(!check_bound(e0 + 1, 1, key_length, r));
        let mut e1 = 1;
        while check_bound(1, e1, key_length, r) {
            e1 += 1;
        }
        assert!(!check_bound(1, e1 + 1, key_length, r));
    }

    #[test]
    fn test_check_bound_exact_integer_form() {
        // kl = 1024, r = 160 : le seuil réel vaut 12.8 — la paire (5, 1)
        // donne exactement 12 et doit passer (12 < 12.8), ce qu'une division
        // entière tronquée à 12 aurait rejeté
        assert!(check_bound(5, 1, 1024, 160));
        assert!(!check_bound(6, 1, 1024, 160));
    }

    #[test]
    fn test_search_bound_1024_80() {
        assert_eq!(search_bound(1024, 80), 7);
    }
}

use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};
use rand_core::RngCore;
use crate::rsa::math::{gcd, is_valid_keypair, mod_inverse};
use crate::crypto_error::CryptoError;

// Borne (exclusive) sur le multiplicateur k : phi(N) divise e·e1 − e0 et
// n'en est qu'un petit multiple en dessous pour les paramètres réalistes —
// énumérer k < 30 suffit à le retrouver sans factoriser N.
pub const MAX_PHI_COFACTOR: u32 = 30;

// ============================================================================
// Trouvaille du détecteur : un phi(N) reconstruit cohérent avec e observé.
// Plusieurs trouvailles peuvent exister pour un même e ; au plus une vaut
// le vrai phi(N) pour un piège fidèlement construit.
// ============================================================================
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackdoorFinding {
    pub e0:            u64,
    pub e1:            u64,
    pub phi_candidate: BigUint,
}

// ============================================================================
// Détection : vue de l'adversaire, qui n'observe QUE (e, N).
//
// Pour chaque paire (e0, e1) sous la borne B = bits(N)/(2·sec) + 1 :
//   v = e·e1 − e0 (arithmétique signée) ; pour chaque k < 30 divisant v,
//   phi_cand = v/k est proposé puis confirmé en reconstruisant une paire
//   RSA complète (e, inverse(e, phi_cand)) validée contre N.
//
// Coût : O(B²·K) inverses modulaires — praticable seulement quand la
// sécurité effective du piège est faible devant la taille de clé.
// ============================================================================
pub fn detect(
    e: &BigUint,
    modulus: &BigUint,
    sec: u64,
    rng: &mut impl RngCore,
) -> Result<Vec<BackdoorFinding>, CryptoError> {
    if sec == 0 {
        return Err(CryptoError::SecurityParameterZero);
    }

    let n = modulus.bits();
    let bound = n / (2 * sec) + 1;

    let e_signed = BigInt::from(e.clone());
    let mut findings = Vec::new();

    for e0 in 1..bound {
        for e1 in 1..bound {
            // phi(N) | e·e1 − e0, et e·e1 − e0 à peine plus grand que phi(N)
            let v = &e_signed * e1 - e0;
            if v.sign() != Sign::Plus {
                // v ≤ 0 : aucun phi candidat non nul possible pour cette paire
                continue;
            }

            for k in 1..MAX_PHI_COFACTOR {
                if !(&v % k).is_zero() {
                    continue;
                }
                let Some(phi_candidate) = (&v / k).to_biguint() else {
                    continue;
                };

                let Some(e1_inverse) = mod_inverse(&BigUint::from(e1), &phi_candidate) else {
                    continue;
                };

                let backdoor_e = (e1_inverse * e0) % &phi_candidate;
                if &backdoor_e != e {
                    continue;
                }
                if gcd(e, &phi_candidate) != BigUint::one() {
                    continue;
                }

                // Confirmation finale : (e, d) reconstruit doit former une
                // paire RSA fonctionnelle contre le module observé
                let Some(d) = mod_inverse(e, &phi_candidate) else {
                    continue;
                };
                if !is_valid_keypair(e, &d, modulus, rng) {
                    continue;
                }

                findings.push(BackdoorFinding {
                    e0,
                    e1,
                    phi_candidate,
                });
            }
        }
    }

    Ok(findings)
}

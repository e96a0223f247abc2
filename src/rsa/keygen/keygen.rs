use num_bigint::BigUint;
use num_traits::One;
use rand_core::RngCore;
use zeroize::Zeroize;
use crate::rsa::math::{MIN_KEY_BITS, generate_prime};
use crate::crypto_error::CryptoError;

// ============================================================================
// Helper : efface les octets internes d'un BigUint
// ============================================================================
fn zeroize_biguint(n: &mut BigUint) {
    let bits = n.bits() as usize;
    if bits > 0 {
        *n = BigUint::from_bytes_be(&vec![0u8; (bits + 7) / 8]);
    }
    *n = BigUint::default();
}

// ============================================================================
// Paramètres de clé RSA — ZEROISÉS À LA DESTRUCTION
//
// p, q et phi(N) sont équivalents à la clé privée : quiconque connaît l'un
// d'eux factorise N. Seuls n et key_length sont publics. Les entités sont
// immuables après création et ne survivent pas à un essai de campagne.
// ============================================================================
#[derive(Clone, Debug)]
pub struct KeyParameters {
    pub p:          BigUint,
    pub q:          BigUint,
    pub n:          BigUint,
    pub phi_n:      BigUint,
    pub key_length: u64,
}

impl Zeroize for KeyParameters {
    fn zeroize(&mut self) {
        zeroize_biguint(&mut self.p);
        zeroize_biguint(&mut self.q);
        zeroize_biguint(&mut self.phi_n);
    }
}

impl Drop for KeyParameters {
    fn drop(&mut self) {
        self.zeroize();
    }
}

// ============================================================================
// Génération des paramètres de clé
//
// Deux premiers distincts de key_length/2 bits, retirés tant que le produit
// n'a pas EXACTEMENT key_length bits (le produit de deux premiers de k bits
// a 2k ou 2k-1 bits — la boucle de retrait est l'issue normale, pas une
// erreur). Une longueur impaire ne peut jamais satisfaire la contrainte et
// est rejetée d'emblée.
// ============================================================================
pub fn generate_primes(key_length: u64, rng: &mut impl RngCore) -> Result<KeyParameters, CryptoError> {
    if key_length < MIN_KEY_BITS {
        return Err(CryptoError::KeySizeTooSmall {
            requested: key_length,
            minimum: MIN_KEY_BITS,
        });
    }
    if key_length % 2 != 0 {
        return Err(CryptoError::InvalidInput(format!(
            "longueur de clé impaire ({key_length}) : bits(p·q) ne peut pas l'atteindre"
        )));
    }

    let half = key_length / 2;

    loop {
        let p = generate_prime(half, rng)?;
        let q = generate_prime(half, rng)?;
        if p == q {
            continue;
        }

        let n = &p * &q;
        if n.bits() != key_length {
            continue;
        }

        let phi_n = (&p - BigUint::one()) * (&q - BigUint::one());

        return Ok(KeyParameters { p, q, n, phi_n, key_length });
    }
}

// ============================================================================
// Tests unitaires de la génération de clés
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::rsa::math::is_probable_prime;
    use rand_core::OsRng;

    #[test]
    fn test_generate_primes_exact_modulus_length() {
        let mut rng = OsRng;
        for key_length in [16u64, 32, 64] {
            let params = generate_primes(key_length, &mut rng).unwrap();
            assert_eq!(params.n.bits(), key_length);
            assert_eq!(params.key_length, key_length);
            assert_ne!(params.p, params.q);
            assert!(is_probable_prime(&params.p, 10, &mut rng));
            assert!(is_probable_prime(&params.q, 10, &mut rng));
        }
    }

    #[test]
    fn test_generate_primes_phi_consistency() {
        let mut rng = OsRng;
        let params = generate_primes(32, &mut rng).unwrap();
        let expected = (&params.p - BigUint::one()) * (&params.q - BigUint::one());
        assert_eq!(params.phi_n, expected);
        assert_eq!(params.n, &params.p * &params.q);
    }

    #[test]
    fn test_generate_primes_rejects_bad_lengths() {
        let mut rng = OsRng;
        assert!(matches!(
            generate_primes(4, &mut rng),
            Err(CryptoError::KeySizeTooSmall { .. })
        ));
        assert!(matches!(
            generate_primes(17, &mut rng),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_zeroize_clears_secret_fields() {
        let mut params = KeyParameters {
            p:          BigUint::from(149u32),
            q:          BigUint::from(251u32),
            n:          BigUint::from(37399u32),
            phi_n:      BigUint::from(37000u32),
            key_length: 16,
        };
        params.zeroize();
        assert_eq!(params.p, BigUint::default());
        assert_eq!(params.q, BigUint::default());
        assert_eq!(params.phi_n, BigUint::default());
        // n est public et reste en place
        assert_eq!(params.n, BigUint::from(37399u32));
    }
}

use num_bigint::{BigInt, BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand_core::RngCore;
use crate::crypto_error::crypto_error::CryptoError;

// Taille minimale de clé acceptée (assouplie : les campagnes d'étude
// utilisent volontairement des modules très courts)
pub const MIN_KEY_BITS: u64 = 8;

// ---------------------------------------------------------------------------
// Table de petits premiers (crible préliminaire, couvre jusqu'à 2999)
// ---------------------------------------------------------------------------
const SMALL_PRIMES: &[u64] = &[
      3,   5,   7,  11,  13,  17,  19,  23,  29,  31,
     37,  41,  43,  47,  53,  59,  61,  67,  71,  73,
     79,  83,  89,  97, 101, 103, 107, 109, 113, 127,
    131, 137, 139, 149, 151, 157, 163, 167, 173, 179,
    181, 191, 193, 197, 199, 211, 223, 227, 229, 233,
    239, 241, 251, 257, 263, 269, 271, 277, 281, 283,
    293, 307, 311, 313, 317, 331, 337, 347, 349, 353,
    359, 367, 373, 379, 383, 389, 397, 401, 409, 419,
    421, 431, 433, 439, 443, 449, 457, 461, 463, 467,
    479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607,
    613, 617, 619, 631, 641, 643, 647, 653, 659, 661,
    673, 677, 683, 691, 701, 709, 719, 727, 733, 739,
    743, 751, 757, 761, 769, 773, 787, 797, 809, 811,
    821, 823, 827, 829, 839, 853, 857, 859, 863, 877,
    881, 883, 887, 907, 911, 919, 929, 937, 941, 947,
    953, 967, 971, 977, 983, 991, 997,1009,1013,1021,
   1031,1033,1039,1049,1051,1061,1063,1069,1087,1091,
   1093,1097,1103,1109,1117,1123,1129,1151,1153,1163,
   1171,1181,1187,1193,1201,1213,1217,1223,1229,1231,
   1237,1249,1259,1277,1279,1283,1289,1291,1297,1301,
   1303,1307,1319,1321,1327,1361,1367,1373,1381,1399,
   1409,1423,1427,1429,1433,1439,1447,1451,1453,1459,
   1471,1481,1483,1487,1489,1493,1499,1511,1523,1531,
   1543,1549,1553,1559,1567,1571,1579,1583,1597,1601,
   1607,1609,1613,1619,1621,1627,1637,1657,1663,1667,
   1669,1693,1697,1699,1709,1721,1723,1733,1741,1747,
   1753,1759,1777,1783,1787,1789,1801,1811,1823,1831,
   1847,1861,1867,1871,1873,1877,1879,1889,1901,1907,
   1913,1931,1933,1949,1951,1973,1979,1987,1993,1997,
   1999,2003,2011,2017,2027,2029,2039,2053,2063,2069,
   2081,2083,2087,2089,2099,2111,2113,2129,2131,2137,
   2141,2143,2153,2161,2179,2203,2207,2213,2221,2237,
   2239,2243,2251,2267,2269,2273,2281,2287,2293,2297,
   2309,2311,2333,2339,2341,2347,2351,2357,2371,2377,
   2381,2383,2389,2393,2399,2411,2417,2423,2437,2441,
   2447,2459,2467,2473,2477,2503,2521,2531,2539,2543,
   2549,2551,2557,2579,2591,2593,2609,2617,2621,2633,
   2647,2657,2659,2663,2671,2677,2683,2687,2689,2693,
   2699,2707,2711,2713,2719,2729,2731,2741,2749,2753,
   2767,2777,2789,2791,2797,2801,2803,2819,2833,2837,
   2843,2851,2857,2861,2879,2887,2897,2903,2909,2917,
   2927,2939,2953,2957,2963,2969,2971,2999,
];

// Calcule le pgcd de deux nombres
pub fn gcd(a: &BigUint, b: &BigUint) -> BigUint {
    a.gcd(b)
}

// ---------------------------------------------------------------------------
// Nombre de rounds Miller-Rabin
// ---------------------------------------------------------------------------
fn miller_rabin_rounds(_nbits: u64) -> u32 {
    5
}

// ---------------------------------------------------------------------------
// Génère un nombre premier probable de exactement `nbits` bits.
//
// Bit de poids fort forcé (garantit la taille exacte), bit 0 forcé (impair),
// crible par la table de petits premiers avant chaque Miller-Rabin.
// Le générateur est passé explicitement : chaque worker de campagne possède
// le sien, aucun état aléatoire global.
// ---------------------------------------------------------------------------
pub fn generate_prime(nbits: u64, rng: &mut impl RngCore) -> Result<BigUint, CryptoError> {
    // Besoin d'au moins 4 bits : en dessous, MSB et bit 0 ne laissent
    // presque aucun candidat
    if nbits < 4 {
        return Err(CryptoError::KeySizeTooSmall {
            requested: nbits,
            minimum: 4,
        });
    }

    let rounds = miller_rabin_rounds(nbits);

    loop {
        let mut candidate = rng.gen_biguint(nbits);
        candidate.set_bit(nbits - 1, true); // MSB (garantit nbits bits)
        candidate.set_bit(0, true);         // impair

        if is_divisible_by_small_prime(&candidate) {
            continue;
        }

        if is_probable_prime(&candidate, rounds, rng) {
            debug_assert_eq!(
                candidate.bits(),
                nbits,
                "le premier généré devrait avoir {} bits, en a {}",
                nbits,
                candidate.bits()
            );
            return Ok(candidate);
        }
    }
}

// Vérifie si n est divisible par un des petits premiers de la table.
fn is_divisible_by_small_prime(n: &BigUint) -> bool {
    for &p in SMALL_PRIMES {
        let bp = BigUint::from(p);
        // Si n est égal au petit premier lui-même, c'est un vrai premier → ne pas rejeter
        if n == &bp {
            return false;
        }
        if (n % &bp).is_zero() {
            return true;
        }
    }
    false
}

pub fn is_probable_prime(n: &BigUint, rounds: u32, rng: &mut impl RngCore) -> bool {
    if n <= &BigUint::one() { return false; }
    if n == &BigUint::from(2u32) || n == &BigUint::from(3u32) { return true; }
    if n.is_even() { return false; }
    for &p in SMALL_PRIMES {
        if n == &BigUint::from(p) { return true; }
    }
    if n < &BigUint::from(5u32) { return false; }

    let n_minus_1 = n - BigUint::one();
    let mut d = n_minus_1.clone();
    let mut r = 0u32;
    while d.is_even() {
        d >>= 1;
        r += 1;
    }

    'witness: for _ in 0..rounds {
        let a = rng.gen_biguint_range(
            &BigUint::from(2u32),
            &(n - BigUint::from(2u32)),
        );
        let mut x = a.modpow(&d, n);
        if x == BigUint::one() || x == n_minus_1 {
            continue 'witness;
        }
        for _ in 0..r.saturating_sub(1) {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

// ---------------------------------------------------------------------------
// Calcule l'inverse modulaire de a mod m.
//
// Retourne None si gcd(a, m) != 1 (ou si m est nul). L'absence d'inverse
// est un résultat ordinaire des boucles e0/e1 — Option plutôt que Err, et
// distinguable d'un inverse qui vaudrait zéro (m = 1 → Some(0)).
// ---------------------------------------------------------------------------
pub fn mod_inverse(a: &BigUint, m: &BigUint) -> Option<BigUint> {
    if m.is_zero() {
        return None;
    }
    if m.is_one() {
        // Tout entier est son propre inverse mod 1, représentant canonique 0
        return Some(BigUint::zero());
    }

    let (g, x) = extended_gcd(a, m);
    if !g.is_one() {
        return None;
    }

    let m_signed = BigInt::from(m.clone());
    let mut inv = x % &m_signed;
    if inv < BigInt::zero() {
        inv += &m_signed;
    }

    inv.to_biguint()
}

// Euclide étendu : retourne (gcd(a, b), x) avec a·x + b·y = gcd(a, b).
// Le coefficient de Bézout de b n'est pas suivi, seul x sert à l'inverse.
fn extended_gcd(a: &BigUint, b: &BigUint) -> (BigUint, BigInt) {
    let (mut old_r, mut r) = (BigInt::from(a.clone()), BigInt::from(b.clone()));
    let (mut old_x, mut x) = (BigInt::one(), BigInt::zero());

    while !r.is_zero() {
        let quotient = &old_r / &r;

        let next_r = &old_r - &quotient * &r;
        old_r = std::mem::replace(&mut r, next_r);

        let next_x = &old_x - &quotient * &x;
        old_x = std::mem::replace(&mut x, next_x);
    }

    (old_r.to_biguint().unwrap_or_default(), old_x)
}

// ---------------------------------------------------------------------------
// Vérifie qu'un triplet (e, d, N) forme une paire RSA fonctionnelle par un
// aller-retour chiffrement/déchiffrement sur un échantillon aléatoire.
//
// Test probabiliste à un seul tirage : un échec est une preuve d'invalidité,
// une réussite n'est qu'une très forte présomption (un x partageant un
// facteur avec N peut boucler correctement par accident).
// ---------------------------------------------------------------------------
pub fn is_valid_keypair(e: &BigUint, d: &BigUint, n: &BigUint, rng: &mut impl RngCore) -> bool {
    let x = rng.gen_biguint_below(n);
    let c = x.modpow(e, n);
    let x_back = c.modpow(d, n);
    x == x_back
}

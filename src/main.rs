// =========================================================
// Backdoor RSA — exposants publics piégés e ≡ e0·e1⁻¹ mod φ(N)
// Synthèse, détection et campagnes de mesures
// ClickNCrypt Technical Series 2026 · v1.0
// =========================================================

// ── Cœur de l'attaque ─────────────────────────────────────
use rsa_backdoor::backdoor::detect::detect;
use rsa_backdoor::backdoor::synthesize::{synthesize, synthesize_with};

// ── Génération de clés ────────────────────────────────────
use rsa_backdoor::rsa::keygen::generate_primes;

// ── Orchestration ─────────────────────────────────────────
use rsa_backdoor::orchestrator::{CampaignConfig, TrialKind, run_campaign};

// ── Types et erreurs ──────────────────────────────────────
use rsa_backdoor::CryptoError;

// ── Stdlib & crates externes ──────────────────────────────
use rand_core::OsRng;
use std::io::{self, Write};
use std::time::Instant;

// ── Paramètres par défaut (ceux des campagnes d'origine) ──
const DEFAULT_SYNTH_KEY_LENGTH:  u64 = 1024;
const DEFAULT_SYNTH_SEC:         u64 = 80;
const DEFAULT_DETECT_KEY_LENGTH: u64 = 2048;
const DEFAULT_DETECT_SEC:        u64 = 112;
const DEFAULT_TRIALS:            u64 = 4;
const DEFAULT_WORKERS:           usize = 4;

// ─────────────────────────────────────────────────────────
// Point d'entrée
// ─────────────────────────────────────────────────────────

fn main() {
    loop {
        afficher_menu();
        let choix = lire_choix();

        let res = match choix.as_str() {
            "1" => demonstration_synthese(),
            "2" => demonstration_detection(),
            "3" => campagne_mesures(),
            "4" => { println!("\nAu revoir !\n"); break; }
            _   => { println!("\nChoix invalide. Veuillez choisir 1, 2, 3 ou 4.\n"); continue; }
        };

        if let Err(e) = res {
            eprintln!("\n[ERREUR] {}\n", e);
        }

        println!("\nAppuyez sur Entrée pour continuer...");
        let mut pause = String::new();
        io::stdin().read_line(&mut pause).ok();
    }
}

// ─────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────

fn afficher_menu() {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║   BACKDOOR RSA e0/e1 — MENU                   ║");
    println!("╚═══════════════════════════════════════════════╝");
    println!("\n  [1] Synthèse d'exposants piégés");
    println!("  [2] Détection de backdoor (vue adversaire)");
    println!("  [3] Campagne de mesures parallèle");
    println!("  [4] Quitter\n");
    print!("Votre choix : ");
    io::stdout().flush().ok();
}

fn lire_choix() -> String {
    let mut input = String::new();
    io::stdin().read_line(&mut input).ok();
    input.trim().to_string()
}

// Lit un entier sur stdin ; Entrée vide ou saisie invalide → valeur par défaut
fn lire_entier(prompt: &str, defaut: u64) -> u64 {
    print!("{prompt} [{defaut}] : ");
    io::stdout().flush().ok();
    let saisie = lire_choix();
    saisie.parse().unwrap_or(defaut)
}

// ─────────────────────────────────────────────────────────
// [1] Synthèse : énumère les (e0, e1, e) valides pour une
// clé fraîche et affiche les premiers candidats
// ─────────────────────────────────────────────────────────

fn demonstration_synthese() -> Result<(), CryptoError> {
    let key_length = lire_entier("Longueur de clé (bits)", DEFAULT_SYNTH_KEY_LENGTH);
    let sec        = lire_entier("Paramètre de sécurité", DEFAULT_SYNTH_SEC);

    println!("\nGénération des premiers et synthèse en cours...");
    let mut rng = OsRng;

    let start = Instant::now();
    let (params, candidates) = synthesize(sec, key_length, &mut rng)?;
    let elapsed = start.elapsed();

    println!("\nModule N ({} bits) généré, φ(N) connu du synthétiseur.", params.key_length);
    println!("Candidats (e0, e1, e) valides : {} (en {:.2?})", candidates.len(), elapsed);

    for c in candidates.iter().take(5) {
        let marque = if c.is_degenerate() { "  [dégénéré]" } else { "" };
        println!("  e0 = {}, e1 = {}, e de {} bits{}", c.e0, c.e1, c.e.bits(), marque);
    }
    if candidates.len() > 5 {
        println!("  ... et {} autres", candidates.len() - 5);
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [2] Détection : retire des premiers jusqu'à obtenir un e
// piégé non dégénéré, puis rejoue l'attaque avec pour seules
// données (e, N) et compare au vrai φ(N)
// ─────────────────────────────────────────────────────────

fn demonstration_detection() -> Result<(), CryptoError> {
    let key_length = lire_entier("Longueur de clé (bits)", DEFAULT_DETECT_KEY_LENGTH);
    let sec        = lire_entier("Paramètre de sécurité", DEFAULT_DETECT_SEC);

    let mut rng = OsRng;

    println!("\nRecherche d'un exposant piégé non dégénéré...");
    let (params, backdoored) = loop {
        let params = generate_primes(key_length, &mut rng)?;
        let candidates = synthesize_with(&params, sec)?;
        if let Some(c) = candidates.into_iter().find(|c| !c.is_degenerate()) {
            break (params, c);
        }
    };
    println!("Exposant publié : e de {} bits (e0 = {}, e1 = {} restent secrets)",
             backdoored.e.bits(), backdoored.e0, backdoored.e1);

    println!("\nDétection en cours (l'adversaire ne voit que e et N)...");
    let start = Instant::now();
    let findings = detect(&backdoored.e, &params.n, sec, &mut rng)?;
    let elapsed = start.elapsed();
    println!("Détection terminée en {:.2?} — {} trouvaille(s).", elapsed, findings.len());

    let mut retrouve = false;
    for f in &findings {
        if f.phi_candidate == params.phi_n {
            println!("\nBackdoor trouvé, φ(N) retrouvé avec e0 = {}, e1 = {}", f.e0, f.e1);
            println!("N    = {}", params.n);
            println!("φ(N) = {}", f.phi_candidate);
            retrouve = true;
        }
    }
    if !retrouve {
        println!("\nAucune trouvaille ne correspond au vrai φ(N) — backdoor non détecté.");
    }

    Ok(())
}

// ─────────────────────────────────────────────────────────
// [3] Campagne : T essais indépendants répartis sur un pool
// de workers, rapport moyenne/maximum
// ─────────────────────────────────────────────────────────

fn campagne_mesures() -> Result<(), CryptoError> {
    println!("\nMode : [1] synthèse  [2] détection");
    let kind = match lire_choix().as_str() {
        "2" => TrialKind::Detection,
        _   => TrialKind::Synthesis,
    };

    let cfg = CampaignConfig {
        key_length:         lire_entier("Longueur de clé (bits)", DEFAULT_SYNTH_KEY_LENGTH),
        security_parameter: lire_entier("Paramètre de sécurité", DEFAULT_SYNTH_SEC),
        trials:             lire_entier("Nombre d'essais", DEFAULT_TRIALS),
        workers:            lire_entier("Nombre de workers", DEFAULT_WORKERS as u64) as usize,
        kind,
    };

    println!("\nCampagne en cours...");
    let start = Instant::now();
    let report = run_campaign(&cfg)?;
    let elapsed = start.elapsed();

    println!("\n{report}");
    println!("Durée totale          : {:.2?}", elapsed);

    Ok(())
}

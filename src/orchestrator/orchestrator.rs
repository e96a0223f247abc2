// ============================================================================
// Orchestrateur de campagnes — fork-join sur essais indépendants
//
// Chaque essai est une fonction pure de ses paramètres : génération de
// premiers puis synthèse (ou détection), sans I/O ni état partagé. Un pool
// de taille fixe tire les indices d'essai d'un compteur atomique partagé et
// renvoie les comptes par un canal mpsc ; la réduction finale (somme, max)
// est commutative, l'ordre d'arrivée entre workers est donc indifférent.
// Chaque worker se seed une seule fois au démarrage — aucun générateur
// global caché, les essais d'un worker restent séquentiels.
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc;
use std::thread;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::backdoor::detect::detect;
use crate::backdoor::synthesize::synthesize;
use crate::crypto_error::CryptoError;

// ---------------------------------------------------------------------------
// Nature d'un essai : compter les candidats synthétisés, ou compter les
// trouvailles du détecteur égales au vrai phi(N)
// ---------------------------------------------------------------------------
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialKind {
    Synthesis,
    Detection,
}

#[derive(Clone, Copy, Debug)]
pub struct CampaignConfig {
    pub key_length:         u64,
    pub security_parameter: u64,
    pub trials:             u64,
    pub workers:            usize,
    pub kind:               TrialKind,
}

// ---------------------------------------------------------------------------
// Rapport agrégé — moyenne et maximum des comptes par essai
// ---------------------------------------------------------------------------
#[derive(Clone, Debug)]
pub struct CampaignReport {
    pub key_length:         u64,
    pub security_parameter: u64,
    pub trials:             u64,
    pub average:            f64,
    pub maximum:            u64,
}

impl fmt::Display for CampaignReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Longueur de clé       : {} bits", self.key_length)?;
        writeln!(f, "Paramètre de sécurité : {}", self.security_parameter)?;
        writeln!(f, "Nombre d'essais       : {}", self.trials)?;
        writeln!(f, "Moyenne de (e0, e1, e) valides : {}", self.average)?;
        write!(f, "Maximum de (e0, e1, e) valides : {}", self.maximum)
    }
}

// ---------------------------------------------------------------------------
// Un essai complet, exécuté séquentiellement dans le worker appelant
// ---------------------------------------------------------------------------
fn run_trial(cfg: &CampaignConfig, rng: &mut StdRng) -> Result<u64, CryptoError> {
    match cfg.kind {
        TrialKind::Synthesis => {
            let (_params, candidates) =
                synthesize(cfg.security_parameter, cfg.key_length, rng)?;
            Ok(candidates.len() as u64)
        }
        TrialKind::Detection => {
            let (params, candidates) =
                synthesize(cfg.security_parameter, cfg.key_length, rng)?;
            // Sans candidat non dégénéré, rien à détecter pour cet essai
            let Some(backdoored) = candidates.iter().find(|c| !c.is_degenerate()) else {
                return Ok(0);
            };
            let findings = detect(&backdoored.e, &params.n, cfg.security_parameter, rng)?;
            Ok(findings
                .iter()
                .filter(|f| f.phi_candidate == params.phi_n)
                .count() as u64)
        }
    }
}

// ============================================================================
// Campagne : T essais répartis sur un pool fixe de workers, réduction
// somme/max. La première erreur d'essai fait échouer toute la campagne.
// ============================================================================
pub fn run_campaign(cfg: &CampaignConfig) -> Result<CampaignReport, CryptoError> {
    if cfg.trials == 0 {
        return Err(CryptoError::InvalidInput(
            "campagne sans essai (trials = 0)".into(),
        ));
    }

    let workers = cfg.workers.max(1);
    let next_trial = AtomicU64::new(0);
    let (tx, rx) = mpsc::channel::<Result<u64, CryptoError>>();

    let outcomes: Vec<Result<u64, CryptoError>> = thread::scope(|s| {
        for _ in 0..workers {
            let tx = tx.clone();
            let next_trial = &next_trial;
            s.spawn(move || {
                // Graine indépendante par worker, une seule fois au démarrage
                let mut rng = StdRng::from_entropy();
                loop {
                    if next_trial.fetch_add(1, Ordering::Relaxed) >= cfg.trials {
                        break;
                    }
                    let outcome = run_trial(cfg, &mut rng);
                    let stop = outcome.is_err();
                    if tx.send(outcome).is_err() || stop {
                        break;
                    }
                }
            });
        }
        // Le canal se ferme quand le dernier worker a rendu son dernier essai
        drop(tx);
        rx.iter().collect()
    });

    let mut sum = 0u64;
    let mut maximum = 0u64;
    let mut completed = 0u64;
    for outcome in outcomes {
        let count = outcome?;
        sum += count;
        maximum = maximum.max(count);
        completed += 1;
    }
    // Tous les essais ont rendu un compte : sinon un worker est mort sans
    // signaler d'erreur (panic), ce qui ne doit pas passer inaperçu
    if completed != cfg.trials {
        return Err(CryptoError::WorkerFailure);
    }

    Ok(CampaignReport {
        key_length:         cfg.key_length,
        security_parameter: cfg.security_parameter,
        trials:             cfg.trials,
        average:            sum as f64 / cfg.trials as f64,
        maximum,
    })
}

// ============================================================================
// Tests unitaires de l'orchestrateur
// ============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthesis_campaign_aggregates() {
        let cfg = CampaignConfig {
            key_length:         32,
            security_parameter: 2,
            trials:             8,
            workers:            3,
            kind:               TrialKind::Synthesis,
        };
        let report = run_campaign(&cfg).unwrap();
        assert_eq!(report.trials, 8);
        assert_eq!(report.key_length, 32);
        assert!(report.average >= 0.0);
        // Le maximum majore la moyenne
        assert!(report.maximum as f64 >= report.average);
    }

    #[test]
    fn test_detection_campaign_runs() {
        let cfg = CampaignConfig {
            key_length:         32,
            security_parameter: 2,
            trials:             4,
            workers:            2,
            kind:               TrialKind::Detection,
        };
        let report = run_campaign(&cfg).unwrap();
        assert_eq!(report.trials, 4);
    }

    #[test]
    fn test_single_worker_matches_trial_count() {
        let cfg = CampaignConfig {
            key_length:         16,
            security_parameter: 1,
            trials:             5,
            workers:            1,
            kind:               TrialKind::Synthesis,
        };
        let report = run_campaign(&cfg).unwrap();
        assert_eq!(report.trials, 5);
    }

    #[test]
    fn test_campaign_propagates_trial_errors() {
        // Longueur de clé impaire : chaque essai échoue, la campagne aussi
        let cfg = CampaignConfig {
            key_length:         17,
            security_parameter: 1,
            trials:             3,
            workers:            2,
            kind:               TrialKind::Synthesis,
        };
        assert!(matches!(
            run_campaign(&cfg),
            Err(CryptoError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_campaign_rejects_zero_trials() {
        let cfg = CampaignConfig {
            key_length:         16,
            security_parameter: 1,
            trials:             0,
            workers:            2,
            kind:               TrialKind::Synthesis,
        };
        assert!(matches!(
            run_campaign(&cfg),
            Err(CryptoError::InvalidInput(_))
        ));
    }
}

//! src/app/etat.rs
//!
//! État de session (sans affichage).
//!
//! Rôle : garder l’entrée courante, les registres (ANS, M), l’unité d’angle,
//! la précision et la dernière erreur ; offrir `crunch` et les actions C/CLR/AC.
//!
//! Contrats :
//! - Le noyau reste pur : les registres vivent ICI et lui sont passés à chaque appel.
//! - Un échec ne touche jamais à l’entrée tapée.

use log::debug;

use crate::noyau::{calculate_avec, AngleUnit, Decimal, ErreurCalcul, Reglages};

#[derive(Clone, Debug)]
pub struct Session {
    // --- entrée utilisateur ---
    pub entree: String,
    /// Vrai quand ANS correspond à l’entrée courante.
    pub propre: bool,

    // --- registres ---
    pub ans: Decimal,
    pub ind: Decimal,

    // --- sorties ---
    pub erreur: Option<ErreurCalcul>,

    // --- paramètres ---
    pub unite: AngleUnit,
    pub reglages: Reglages,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Reglages::default(), AngleUnit::default())
    }
}

impl Session {
    pub fn new(reglages: Reglages, unite: AngleUnit) -> Self {
        Self {
            entree: String::new(),
            propre: false,
            ans: Decimal::zero(),
            ind: Decimal::zero(),
            erreur: None,
            unite,
            reglages,
        }
    }

    /* ------------------------ Actions ------------------------ */

    /// Évalue l’entrée.
    ///
    /// - succès : résultat dans ANS (et M si `save_to_ind`), entrée marquée propre
    /// - échec : erreur mémorisée, entrée et registres intacts
    pub fn crunch(&mut self, save_to_ind: bool) -> Option<Decimal> {
        match calculate_avec(&self.entree, &self.ans, &self.ind, self.unite, &self.reglages) {
            Ok(v) => {
                self.erreur = None;
                self.propre = true;
                self.ans = v.clone();
                if save_to_ind {
                    self.ind = v.clone();
                }
                Some(v)
            }
            Err(e) => {
                debug!("crunch: {e}");
                self.erreur = Some(e);
                None
            }
        }
    }

    /// Remplace l’entrée (l’entrée n’est plus « propre »).
    pub fn set_entree(&mut self, texte: impl Into<String>) {
        self.entree = texte.into();
        self.propre = false;
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.propre = false;
    }

    /// CLR : effacer l’erreur (sans toucher à l’entrée).
    pub fn clear_resultats(&mut self) {
        self.erreur = None;
    }

    /// AC : entrée + registres + erreur.
    pub fn clear_all(&mut self) {
        self.clear_entree();
        self.clear_resultats();
        self.ans = Decimal::zero();
        self.ind = Decimal::zero();
    }

    pub fn set_unite(&mut self, unite: AngleUnit) {
        self.unite = unite;
        self.propre = false;
    }

    pub fn set_precision(&mut self, precision: usize) {
        self.reglages = Reglages::with_precision(precision);
        self.propre = false;
    }
}

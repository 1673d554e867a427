// src/noyau/reglages.rs
//
// Réglages d’évaluation : précision de travail (chiffres significatifs)
// et unité d’angle (passée à chaque appel, jamais mémorisée dans le noyau).

pub const PRECISION_DEFAUT: usize = 100;
pub const PRECISION_MIN: usize = 1;
pub const PRECISION_MAX: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    /// Chiffres significatifs du résultat.
    pub precision: usize,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            precision: PRECISION_DEFAUT,
        }
    }
}

impl Reglages {
    /// Précision bornée à [PRECISION_MIN, PRECISION_MAX].
    pub fn with_precision(precision: usize) -> Self {
        Self {
            precision: precision.clamp(PRECISION_MIN, PRECISION_MAX),
        }
    }
}

/// N’affecte que sin/cos/tan et asin/acos/atan.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AngleUnit {
    Deg,
    #[default]
    Rad,
}

impl AngleUnit {
    pub fn label(self) -> &'static str {
        match self {
            AngleUnit::Deg => "DEG",
            AngleUnit::Rad => "RAD",
        }
    }
}

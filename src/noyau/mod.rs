//! Noyau de calcul décimal
//!
//! Organisation interne :
//! - decimal.rs        : Decimal (mantisse BigInt × 10^exposant, ±∞, NaN)
//! - transcendantes.rs : π, e, exp, ln, puissances, racines, trig (séries en virgule fixe)
//! - jetons.rs         : tokenisation (règles ordonnées)
//! - format.rs         : rendu canonique des jetons
//! - pratt.rs          : évaluateur Pratt (calcul en ligne, sans AST)
//! - trig.rs           : unités d’angle, garde tan, angles remarquables
//! - erreurs.rs        : erreurs lexicales / d’évaluation
//! - reglages.rs       : précision, unité d’angle
//! - eval.rs           : pipeline complet

pub mod decimal;
pub mod erreurs;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod pratt;
pub mod reglages;
pub mod transcendantes;
pub mod trig;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use decimal::Decimal;
pub use erreurs::{ErreurCalcul, ErreurEval, ErreurLexicale};
pub use eval::{calculate, calculate_avec};
pub use format::{format_tokens, prettify};
pub use jetons::{tokenize, Tok};
pub use pratt::{evaluate, evaluate_avec};
pub use reglages::{AngleUnit, Reglages};

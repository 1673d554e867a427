//! Calculatrice décimale — tokeniseur + évaluateur Pratt
//!
//! Une expression texte devient une suite de jetons typés, puis une valeur
//! décimale en précision arbitraire, calculée pendant l’analyse (pas d’AST).
//!
//! ```
//! use calculatrice_pratt::{calculate, AngleUnit, Decimal};
//!
//! let zero = Decimal::zero();
//! let v = calculate("4^3^2", &zero, &zero, AngleUnit::Rad).unwrap();
//! assert_eq!(v.to_string(), "262144");
//!
//! let sin = calculate("sin(90)", &zero, &zero, AngleUnit::Deg).unwrap();
//! assert_eq!(sin, Decimal::one());
//! ```
//!
//! - [`noyau`] : calcul pur (aucun état partagé entre appels)
//! - [`app`]   : hôte terminal (registres ANS / M, console)

pub mod app;
pub mod noyau;

pub use noyau::{
    calculate, calculate_avec, evaluate, evaluate_avec, format_tokens, prettify, tokenize,
    AngleUnit, Decimal, ErreurCalcul, ErreurEval, ErreurLexicale, Reglages, Tok,
};

//! Noyau — évaluation (pipeline réel)
//!
//! texte -> tokenize -> Pratt (calcul en ligne) -> Decimal
//!
//! Fonction pure : les registres `ans` / `ind` et l’unité d’angle
//! sont fournis à chaque appel, rien n’est mémorisé ici.

use log::debug;

use super::decimal::Decimal;
use super::erreurs::ErreurCalcul;
use super::jetons::tokenize;
use super::pratt::evaluate_avec;
use super::reglages::{AngleUnit, Reglages};

/// API publique : texte -> valeur, à la précision par défaut.
pub fn calculate(
    expr: &str,
    ans: &Decimal,
    ind: &Decimal,
    unite: AngleUnit,
) -> Result<Decimal, ErreurCalcul> {
    calculate_avec(expr, ans, ind, unite, &Reglages::default())
}

pub fn calculate_avec(
    expr: &str,
    ans: &Decimal,
    ind: &Decimal,
    unite: AngleUnit,
    reglages: &Reglages,
) -> Result<Decimal, ErreurCalcul> {
    debug!("calculate: {expr:?}");

    let jetons = tokenize(expr)?;
    let valeur = evaluate_avec(&jetons, ans, ind, unite, reglages)?;

    Ok(valeur)
}

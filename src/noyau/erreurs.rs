// src/noyau/erreurs.rs
//
// Taxonomie des erreurs du noyau.
// - Lexicale : aucun jeton reconnu à une position (index en caractères)
// - Eval     : syntaxe / sémantique, levée par l’évaluateur Pratt
// - Calcul   : l’une ou l’autre, pour le pipeline texte -> valeur
//
// Aucune de ces erreurs n’est une panique : toujours retournées.

use thiserror::Error;

/// Aucun des motifs de jeton ne s’applique à la position `idx` (en caractères).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErreurLexicale {
    #[error("jeton inconnu à la position {idx}")]
    UnknownToken { idx: usize },
}

impl ErreurLexicale {
    /// Début de la portion fautive de l’entrée (pour surligner).
    pub fn idx(&self) -> usize {
        match self {
            ErreurLexicale::UnknownToken { idx } => *idx,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErreurEval {
    #[error("fin d’expression inattendue")]
    UnexpectedEndOfInput,

    #[error("jeton inattendu")]
    UnexpectedToken,

    #[error("parenthèse ouvrante manquante")]
    MissingOpenBracket,

    #[error("parenthèse fermante manquante")]
    MissingCloseBracket,

    #[error("pas assez d’arguments")]
    TooFewArguments,

    #[error("trop d’arguments")]
    TooManyArguments,

    #[error("le résultat n’est pas un nombre")]
    ResultIsNotANumber,

    #[error("le résultat est infini")]
    ResultIsInfinite,

    #[error("tangente indéfinie pour cet argument")]
    TrigonometricSingularity,

    #[error("racine indéfinie (degré nul, ou radicande négatif sans degré impair)")]
    UndefinedRoot,
}

/// Erreur du pipeline complet (tokenize + évaluation).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErreurCalcul {
    #[error("erreur lexicale: {0}")]
    Lexicale(#[from] ErreurLexicale),

    #[error("erreur de syntaxe: {0}")]
    Syntaxe(#[from] ErreurEval),
}

/// Texte qui n’est pas un décimal valide.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErreurDecimal {
    #[error("nombre décimal invalide: {0:?}")]
    Invalide(String),
}

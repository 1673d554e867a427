// src/noyau/format.rs
//
// Rendu canonique d’une suite de jetons : `1+2*(cos(2)/sqrt(pi))` -> `1 + 2 × (cos(2) / √(π))`
//
// Règles d’espacement :
// - pas d’espace à l’intérieur des parenthèses
// - pas d’espace entre une fonction et sa parenthèse
// - pas d’espace après un moins préfixe, ni avant `;` ou un exposant ⁰-⁹
//
// Re-tokeniser le rendu redonne exactement les mêmes jetons.

use super::erreurs::ErreurLexicale;
use super::jetons::{tokenize, Const, Func, Mem, Op, Tok};

const EXPOSANTS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];

/* ------------------------ Glyphes ------------------------ */

fn glyphe_op(op: Op) -> &'static str {
    match op {
        Op::Plus => "+",
        Op::Minus => "−",
        Op::Star => "×",
        Op::Slash => "/",
        Op::Caret => "^",
    }
}

fn glyphe_func(f: Func) -> &'static str {
    match f {
        Func::Sin => "sin",
        Func::Cos => "cos",
        Func::Tan => "tan",
        Func::Asin => "asin",
        Func::Acos => "acos",
        Func::Atan => "atan",
        Func::Ln => "ln",
        Func::Log10 => "log",
        Func::Sqrt => "√",
        Func::Root => "root",
    }
}

/// Chiffres ASCII -> chiffres supérieurs
fn en_exposant(chiffres: &str) -> String {
    chiffres
        .chars()
        .map(|c| match c.to_digit(10) {
            Some(d) => EXPOSANTS[d as usize],
            None => c,
        })
        .collect()
}

fn glyphe(t: &Tok) -> String {
    match t {
        Tok::Num(v) => v.to_plain_string(),
        Tok::SupPow(v) => en_exposant(&v.to_plain_string()),
        Tok::Op(op) => glyphe_op(*op).to_string(),

        Tok::LPar => "(".to_string(),
        Tok::RPar => ")".to_string(),
        Tok::Sep => ";".to_string(),

        Tok::Const(Const::Pi) => "π".to_string(),
        Tok::Const(Const::E) => "e".to_string(),
        Tok::Mem(Mem::Ans) => "ANS".to_string(),
        Tok::Mem(Mem::Ind) => "M".to_string(),
        Tok::Func(f) => glyphe_func(*f).to_string(),
    }
}

/* ------------------------ Rendu ------------------------ */

/// Après ce jeton, le suivant est en position préfixe (un `-` y est unaire).
fn ouvre_prefixe(t: &Tok) -> bool {
    matches!(t, Tok::Op(_) | Tok::LPar | Tok::Sep | Tok::Func(_))
}

/// Rendu canonique (jetons issus de `tokenize`).
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = String::new();

    // vrai en début d’expression
    let mut prefixe = true;
    let mut moins_unaire = false;

    for (i, cur) in tokens.iter().enumerate() {
        if let Some(lhs) = i.checked_sub(1).map(|j| &tokens[j]) {
            let colle = match (lhs, cur) {
                (_, Tok::RPar) | (Tok::LPar, _) => true,
                (Tok::Func(_), Tok::LPar) => true,
                (_, Tok::Sep) => true,
                // deux exposants collés fusionneraient en un seul
                (Tok::SupPow(_), Tok::SupPow(_)) => false,
                (_, Tok::SupPow(_)) => true,
                _ => moins_unaire,
            };
            if !colle {
                out.push(' ');
            }
        }

        out.push_str(&glyphe(cur));

        moins_unaire = prefixe && matches!(cur, Tok::Op(Op::Minus));
        prefixe = ouvre_prefixe(cur);
    }

    out
}

/// Texte -> rendu canonique.
pub fn prettify(expression: &str) -> Result<String, ErreurLexicale> {
    Ok(format_tokens(&tokenize(expression)?))
}

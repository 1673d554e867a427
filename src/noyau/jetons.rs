// src/noyau/jetons.rs
//
// Tokenisation : texte -> jetons typés
// ------------------------------------
// À chaque position (après les blancs), on essaie les règles dans un ordre FIXE ;
// la première qui reconnaît un préfixe gagne. Aucune règle => erreur à cette position.
//
// Ordre : littéral, exposant ⁰-⁹, opérateur, (, ), séparateur, constante,
//         mémoire, fonction.

use log::{debug, trace};

use super::decimal::Decimal;
use super::erreurs::ErreurLexicale;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Plus,
    Minus,
    Star,
    Slash,
    Caret, // ^
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Const {
    Pi,
    E,
}

/// Registres fournis par l’appelant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mem {
    Ans,
    Ind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Log10,
    Sqrt,
    /// 1 ou 2 arguments : root(x) = √x, root(x; n)
    Root,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    Num(Decimal),
    /// Exposant en chiffres supérieurs : 2³ == 2^3
    SupPow(Decimal),
    Op(Op),

    LPar,
    RPar,
    Sep, // ; (ou , hors littéral)

    Const(Const),
    Mem(Mem),
    Func(Func),
}

/// Une règle reconnaît un préfixe de l’entrée : (longueur en octets, jeton).
type Regle = fn(&str) -> Option<(usize, Tok)>;

const REGLES: [Regle; 9] = [
    litteral,
    exposant,
    operateur,
    gauche,
    droite,
    separateur,
    constante,
    memoire,
    fonction,
];

/// Tokenize une chaîne en jetons.
///
/// En cas d’échec, `idx` est la position (en caractères) du premier passage
/// qu’aucune règle ne reconnaît. Pas de reprise après erreur.
///
/// ```
/// use calculatrice_pratt::noyau::jetons::{tokenize, Op, Tok};
///
/// let jetons = tokenize("2 × 3").unwrap();
/// assert_eq!(jetons[1], Tok::Op(Op::Star));
/// assert_eq!(tokenize("1 ö 2").unwrap_err().idx(), 2);
/// ```
pub fn tokenize(s: &str) -> Result<Vec<Tok>, ErreurLexicale> {
    trace!("tokenize: {s:?}");

    let mut out = Vec::new();
    let mut pos: usize = 0; // octets
    let mut idx: usize = 0; // caractères

    while pos < s.len() {
        let reste = &s[pos..];

        // blancs
        let blancs: usize = reste
            .chars()
            .take_while(|c| c.is_whitespace())
            .map(char::len_utf8)
            .sum();
        if blancs > 0 {
            idx += reste[..blancs].chars().count();
            pos += blancs;
            continue;
        }

        match REGLES.iter().find_map(|regle| regle(reste)) {
            Some((longueur, jeton)) => {
                idx += reste[..longueur].chars().count();
                pos += longueur;
                out.push(jeton);
            }
            None => {
                debug!("tokenize: jeton inconnu à {idx} dans {s:?}");
                return Err(ErreurLexicale::UnknownToken { idx });
            }
        }
    }

    debug!("tokenize: {} jetons", out.len());
    Ok(out)
}

/* ------------------------ Règles ------------------------ */

/// `(\d+[,.]\d+)|([1-9]\d*)|0` : "0", "123", "25.6", "25,6"
fn litteral(s: &str) -> Option<(usize, Tok)> {
    let b = s.as_bytes();
    let chiffres = |depuis: usize| b[depuis..].iter().take_while(|c| c.is_ascii_digit()).count();

    let n = chiffres(0);
    if n == 0 {
        return None;
    }

    // partie fractionnaire (un seul séparateur, au moins un chiffre derrière)
    if n < b.len() && (b[n] == b'.' || b[n] == b',') {
        let f = chiffres(n + 1);
        if f > 0 {
            let longueur = n + 1 + f;
            let valeur = s[..longueur].replace(',', ".").parse().ok()?;
            return Some((longueur, Tok::Num(valeur)));
        }
    }

    // pas de zéros en tête : "007" = 0, 0, 7
    let longueur = if b[0] == b'0' { 1 } else { n };
    let valeur = s[..longueur].parse().ok()?;
    Some((longueur, Tok::Num(valeur)))
}

fn chiffre_exposant(c: char) -> Option<char> {
    match c {
        '⁰' => Some('0'),
        '¹' => Some('1'),
        '²' => Some('2'),
        '³' => Some('3'),
        '⁴' => Some('4'),
        '⁵' => Some('5'),
        '⁶' => Some('6'),
        '⁷' => Some('7'),
        '⁸' => Some('8'),
        '⁹' => Some('9'),
        _ => None,
    }
}

/// "²", "¹²" : une suite de chiffres supérieurs = un seul exposant
fn exposant(s: &str) -> Option<(usize, Tok)> {
    let mut chiffres = String::new();
    let mut longueur = 0;

    for c in s.chars() {
        match chiffre_exposant(c) {
            Some(d) => {
                chiffres.push(d);
                longueur += c.len_utf8();
            }
            None => break,
        }
    }

    if longueur == 0 {
        return None;
    }
    let valeur = chiffres.parse().ok()?;
    Some((longueur, Tok::SupPow(valeur)))
}

/// ASCII et glyphes : − (U+2212), × et ÷ se ramènent au même opérateur
fn operateur(s: &str) -> Option<(usize, Tok)> {
    let c = s.chars().next()?;
    let op = match c {
        '+' => Op::Plus,
        '-' | '−' => Op::Minus,
        '*' | '×' => Op::Star,
        '/' | '÷' => Op::Slash,
        '^' => Op::Caret,
        _ => return None,
    };
    Some((c.len_utf8(), Tok::Op(op)))
}

fn gauche(s: &str) -> Option<(usize, Tok)> {
    s.starts_with('(').then_some((1, Tok::LPar))
}

fn droite(s: &str) -> Option<(usize, Tok)> {
    s.starts_with(')').then_some((1, Tok::RPar))
}

/// `,` n’arrive ici que si elle ne fait pas partie d’un littéral
fn separateur(s: &str) -> Option<(usize, Tok)> {
    (s.starts_with(';') || s.starts_with(',')).then_some((1, Tok::Sep))
}

fn constante(s: &str) -> Option<(usize, Tok)> {
    let (m, c) = prefixe(
        s,
        &[
            ("pi", Const::Pi),
            ("π", Const::Pi),
            ("Π", Const::Pi),
            ("e", Const::E),
            ("ℇ", Const::E),
            ("𝑒", Const::E),
            ("ℯ", Const::E),
        ],
    )?;
    Some((m.len(), Tok::Const(c)))
}

/// "mem" avant "m" : la règle la plus longue d’abord
fn memoire(s: &str) -> Option<(usize, Tok)> {
    let (m, r) = prefixe(
        s,
        &[
            ("ans", Mem::Ans),
            ("mem", Mem::Ind),
            ("m", Mem::Ind),
            ("ind", Mem::Ind),
        ],
    )?;
    Some((m.len(), Tok::Mem(r)))
}

fn fonction(s: &str) -> Option<(usize, Tok)> {
    let (m, f) = prefixe(
        s,
        &[
            ("arcsin", Func::Asin),
            ("arccos", Func::Acos),
            ("arctan", Func::Atan),
            ("asin", Func::Asin),
            ("acos", Func::Acos),
            ("atan", Func::Atan),
            ("sin", Func::Sin),
            ("cos", Func::Cos),
            ("tan", Func::Tan),
            ("log", Func::Log10),
            ("lg", Func::Log10),
            ("ln", Func::Ln),
            ("root", Func::Root),
            ("sqrt", Func::Sqrt),
            ("√", Func::Sqrt),
        ],
    )?;
    Some((m.len(), Tok::Func(f)))
}

/// Premier motif (dans l’ordre) qui préfixe `s`, casse ASCII ignorée.
fn prefixe<T: Copy>(s: &str, motifs: &[(&'static str, T)]) -> Option<(&'static str, T)> {
    motifs
        .iter()
        .find(|(m, _)| s.get(..m.len()).is_some_and(|t| t.eq_ignore_ascii_case(m)))
        .copied()
}

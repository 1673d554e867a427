// src/noyau/pratt.rs
//
// Évaluateur Pratt : analyse ET calcul en une passe
// -------------------------------------------------
// Pas d’AST : chaque `led` replie immédiatement gauche ⊕ droite en une valeur.
//
// Puissances de liaison (gauche) :
//   ( ) ;          0
//   nombre, cte    1
//   + −            2
//   × /            3
//   ^  ⁰-⁹         4   (^ associatif à droite : opérande droit lu à 3)
//   fonction       5
//
// Parenthèses vérifiées d’un bloc avant l’analyse : un déséquilibre est
// toujours signalé comme tel, même si un opérande manque aussi.
// Moins unaire : opérande lu à 3 (plus lié que + −, moins que × /).
// Calculs intermédiaires à `precision + GARDE`, arrondi final unique.

use log::{debug, trace};

use super::decimal::Decimal;
use super::erreurs::ErreurEval;
use super::jetons::{Const, Func, Mem, Op, Tok};
use super::reglages::{AngleUnit, Reglages};
use super::transcendantes::GARDE;
use super::trig::{self, TrigFn};

/// Évalue une suite de jetons à la précision par défaut.
///
/// `ans` et `ind` sont les registres de l’appelant, substitués aux jetons mémoire.
pub fn evaluate(
    tokens: &[Tok],
    ans: &Decimal,
    ind: &Decimal,
    unite: AngleUnit,
) -> Result<Decimal, ErreurEval> {
    evaluate_avec(tokens, ans, ind, unite, &Reglages::default())
}

pub fn evaluate_avec(
    tokens: &[Tok],
    ans: &Decimal,
    ind: &Decimal,
    unite: AngleUnit,
    reglages: &Reglages,
) -> Result<Decimal, ErreurEval> {
    debug!(
        "evaluate: {} jetons, {} chiffres, {}",
        tokens.len(),
        reglages.precision,
        unite.label()
    );

    let mut p = Pratt {
        tokens,
        pos: 0,
        ans,
        ind,
        unite,
        precision: reglages.precision,
        wp: reglages.precision + GARDE,
    };

    let resultat = equilibre(tokens)
        .and_then(|()| p.racine())
        .and_then(|v| verifie(v, reglages.precision));

    match &resultat {
        Ok(v) => debug!("evaluate: = {v}"),
        Err(e) => debug!("evaluate: échec au jeton {}: {e:?}", p.pos),
    }
    resultat
}

/// NaN et ±∞ ne sont jamais rendus comme résultats.
fn verifie(v: Decimal, precision: usize) -> Result<Decimal, ErreurEval> {
    if v.is_nan() {
        Err(ErreurEval::ResultIsNotANumber)
    } else if v.is_infinite() {
        Err(ErreurEval::ResultIsInfinite)
    } else {
        Ok(v.round(precision))
    }
}

/// Profondeur négative : `(` manquante ; profondeur finale positive : `)` manquante.
fn equilibre(tokens: &[Tok]) -> Result<(), ErreurEval> {
    let mut profondeur = 0usize;
    for t in tokens {
        match t {
            Tok::LPar => profondeur += 1,
            Tok::RPar => {
                profondeur = profondeur
                    .checked_sub(1)
                    .ok_or(ErreurEval::MissingOpenBracket)?;
            }
            _ => {}
        }
    }

    if profondeur > 0 {
        Err(ErreurEval::MissingCloseBracket)
    } else {
        Ok(())
    }
}

fn lbp(t: &Tok) -> u8 {
    match t {
        Tok::LPar | Tok::RPar | Tok::Sep => 0,
        Tok::Num(_) | Tok::Const(_) | Tok::Mem(_) => 1,
        Tok::Op(Op::Plus | Op::Minus) => 2,
        Tok::Op(Op::Star | Op::Slash) => 3,
        Tok::Op(Op::Caret) | Tok::SupPow(_) => 4,
        Tok::Func(_) => 5,
    }
}

struct Pratt<'a> {
    tokens: &'a [Tok],
    pos: usize,
    ans: &'a Decimal,
    ind: &'a Decimal,
    unite: AngleUnit,
    /// chiffres rendus par les fonctions trig (qui ajoutent leur propre garde)
    precision: usize,
    wp: usize,
}

impl<'a> Pratt<'a> {
    fn next(&mut self) -> Option<&'a Tok> {
        let t = self.tokens.get(self.pos);
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn peek(&self) -> Option<&'a Tok> {
        self.tokens.get(self.pos)
    }

    /// Expression complète : tous les jetons doivent être consommés.
    fn racine(&mut self) -> Result<Decimal, ErreurEval> {
        let v = self.expr(0)?;
        match self.peek() {
            None => Ok(v),
            Some(Tok::RPar) => Err(ErreurEval::MissingOpenBracket),
            Some(_) => Err(ErreurEval::UnexpectedToken),
        }
    }

    fn expr(&mut self, rbp: u8) -> Result<Decimal, ErreurEval> {
        let t = self.next();
        let mut gauche = self.nud(t)?;

        while let Some(t) = self.peek() {
            if lbp(t) <= rbp {
                break;
            }
            self.pos += 1;
            gauche = self.led(t, gauche)?;
        }

        Ok(gauche)
    }

    /// Préfixe : atome, parenthèse, moins unaire, appel de fonction.
    fn nud(&mut self, t: Option<&'a Tok>) -> Result<Decimal, ErreurEval> {
        let t = match t {
            Some(t) => t,
            None => return Err(ErreurEval::UnexpectedEndOfInput),
        };

        match t {
            Tok::Num(v) => Ok(v.clone()),
            Tok::Const(Const::Pi) => Ok(Decimal::pi(self.wp)),
            Tok::Const(Const::E) => Ok(Decimal::e(self.wp)),
            Tok::Mem(Mem::Ans) => Ok(self.ans.clone()),
            Tok::Mem(Mem::Ind) => Ok(self.ind.clone()),

            Tok::Op(Op::Minus) => Ok(-self.expr(3)?),

            Tok::LPar => {
                let v = self.expr(0)?;
                match self.next() {
                    Some(Tok::RPar) => Ok(v),
                    _ => Err(ErreurEval::MissingCloseBracket),
                }
            }

            Tok::Func(f) => self.appel(*f),

            Tok::Op(_) | Tok::SupPow(_) | Tok::RPar | Tok::Sep => {
                Err(ErreurEval::UnexpectedToken)
            }
        }
    }

    /// Infixe / postfixe : replie `gauche` avec l’opérande suivant.
    fn led(&mut self, t: &'a Tok, gauche: Decimal) -> Result<Decimal, ErreurEval> {
        let wp = self.wp;
        match t {
            Tok::Op(Op::Plus) => Ok(gauche.plus(&self.expr(2)?, wp)),
            Tok::Op(Op::Minus) => Ok(gauche.minus(&self.expr(2)?, wp)),
            Tok::Op(Op::Star) => Ok(gauche.times(&self.expr(3)?, wp)),
            Tok::Op(Op::Slash) => Ok(gauche.div(&self.expr(3)?, wp)),
            // associatif à droite
            Tok::Op(Op::Caret) => Ok(gauche.pow(&self.expr(3)?, wp)),
            Tok::SupPow(n) => Ok(gauche.pow(n, wp)),

            // seule la parenthèse ouvrante consomme une fermante
            Tok::RPar => Err(ErreurEval::MissingOpenBracket),
            Tok::Num(_) | Tok::Const(_) | Tok::Mem(_) | Tok::Func(_) | Tok::LPar | Tok::Sep => {
                Err(ErreurEval::UnexpectedToken)
            }
        }
    }

    /// f ( arg ; arg … )
    fn appel(&mut self, f: Func) -> Result<Decimal, ErreurEval> {
        if !matches!(self.next(), Some(Tok::LPar)) {
            return Err(ErreurEval::MissingOpenBracket);
        }
        if matches!(self.peek(), Some(Tok::RPar)) {
            return Err(ErreurEval::TooFewArguments);
        }

        let mut args = vec![self.expr(0)?];
        loop {
            match self.next() {
                Some(Tok::Sep) => args.push(self.expr(0)?),
                Some(Tok::RPar) => break,
                _ => return Err(ErreurEval::MissingCloseBracket),
            }
        }

        trace!("appel {f:?} avec {} argument(s)", args.len());
        self.applique(f, &args)
    }

    fn applique(&self, f: Func, args: &[Decimal]) -> Result<Decimal, ErreurEval> {
        let max = if f == Func::Root { 2 } else { 1 };
        if args.len() > max {
            return Err(ErreurEval::TooManyArguments);
        }

        let x = &args[0];
        let wp = self.wp;

        match f {
            Func::Sin => trig::evalue(TrigFn::Sin, x, self.unite, self.precision),
            Func::Cos => trig::evalue(TrigFn::Cos, x, self.unite, self.precision),
            Func::Tan => trig::evalue(TrigFn::Tan, x, self.unite, self.precision),
            Func::Asin => trig::evalue(TrigFn::Asin, x, self.unite, self.precision),
            Func::Acos => trig::evalue(TrigFn::Acos, x, self.unite, self.precision),
            Func::Atan => trig::evalue(TrigFn::Atan, x, self.unite, self.precision),

            Func::Ln => Ok(x.ln(wp)),
            Func::Log10 => Ok(x.log10(wp)),

            Func::Sqrt => racine(x, &Decimal::from(2), wp),
            Func::Root => {
                let deux = Decimal::from(2);
                racine(x, args.get(1).unwrap_or(&deux), wp)
            }
        }
    }
}

/// Racine `degre`-ième :
/// - degré nul : indéfini
/// - radicande nul : 0
/// - radicande négatif : -((-x)^(1/n)) si n entier impair positif, indéfini sinon
fn racine(x: &Decimal, degre: &Decimal, wp: usize) -> Result<Decimal, ErreurEval> {
    if degre.is_zero() {
        return Err(ErreurEval::UndefinedRoot);
    }
    if x.is_zero() {
        return Ok(Decimal::zero());
    }
    if x.is_negative() {
        if degre.is_positive() && degre.is_odd_integer() {
            return Ok(-x.abs().nth_root(degre, wp));
        }
        return Err(ErreurEval::UndefinedRoot);
    }
    Ok(x.nth_root(degre, wp))
}

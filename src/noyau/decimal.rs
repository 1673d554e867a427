// src/noyau/decimal.rs
//
// Décimal à précision arbitraire (sans flottants binaires).
// ---------------------------------------------------------
// - Fini : mantisse (BigInt) × 10^exposant, normalisé (zéros de queue retirés, zéro unique)
// - Infini(±) et NaN : valeurs spéciales, propagées comme en IEEE
// - Chaque opération arrondie prend une précision en chiffres significatifs
//
// Les fonctions transcendantes vivent dans transcendantes.rs.

use num_bigint::{BigInt, Sign};
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;

use super::erreurs::ErreurDecimal;

/// Borne de l’exposant ajusté : au-delà => ±∞, en deçà => 0.
/// Assez loin de i64::MAX pour que les sommes d’exposants ne débordent jamais.
pub(crate) const EXPOSANT_MAX: i64 = 1_000_000_000_000_000;

/// Seuils d’affichage en notation scientifique (comme decimal.js).
const SCI_HAUT: i64 = 21;
const SCI_BAS: i64 = -7;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum Repr {
    Fini { mantisse: BigInt, exposant: i64 },
    Infini { negatif: bool },
    NaN,
}

/// Nombre décimal exact à précision arbitraire.
///
/// L’égalité (`==`) est structurelle : deux décimaux finis de même valeur sont égaux
/// (`0.1000 == 0.1`), et `NaN == NaN` (utile pour vérifier le déterminisme).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Decimal(Repr);

/* ------------------------ Outils ------------------------ */

pub(crate) fn pow10(n: u64) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Nombre de chiffres décimaux de |m| (1 pour zéro).
pub(crate) fn nb_chiffres(m: &BigInt) -> u64 {
    m.magnitude().to_string().len() as u64
}

/* ------------------------ Constructeurs ------------------------ */

impl Decimal {
    pub fn zero() -> Self {
        Decimal(Repr::Fini {
            mantisse: BigInt::zero(),
            exposant: 0,
        })
    }

    pub fn one() -> Self {
        Decimal::from(1)
    }

    pub fn nan() -> Self {
        Decimal(Repr::NaN)
    }

    pub fn infinity(negatif: bool) -> Self {
        Decimal(Repr::Infini { negatif })
    }

    /// mantisse × 10^exposant, normalisé.
    pub(crate) fn from_parts(mantisse: BigInt, exposant: i64) -> Self {
        if mantisse.is_zero() {
            return Decimal::zero();
        }

        // retire les zéros de queue (une seule conversion texte)
        let txt = mantisse.magnitude().to_string();
        let sans_zeros = txt.trim_end_matches('0');
        let zeros = (txt.len() - sans_zeros.len()) as u64;

        let (mantisse, exposant) = if zeros == 0 {
            (mantisse, exposant)
        } else {
            (mantisse / pow10(zeros), exposant.saturating_add(zeros as i64))
        };

        let ajuste = exposant.saturating_add(sans_zeros.len() as i64 - 1);
        if ajuste > EXPOSANT_MAX {
            return Decimal::infinity(mantisse.is_negative());
        }
        if ajuste < -EXPOSANT_MAX {
            return Decimal::zero();
        }

        Decimal(Repr::Fini { mantisse, exposant })
    }

    /// (mantisse, exposant) si fini.
    pub(crate) fn parts(&self) -> Option<(&BigInt, i64)> {
        match &self.0 {
            Repr::Fini { mantisse, exposant } => Some((mantisse, *exposant)),
            _ => None,
        }
    }
}

impl From<i32> for Decimal {
    fn from(n: i32) -> Self {
        Decimal::from_parts(BigInt::from(n), 0)
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Decimal::from_parts(BigInt::from(n), 0)
    }
}

impl From<u64> for Decimal {
    fn from(n: u64) -> Self {
        Decimal::from_parts(BigInt::from(n), 0)
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::from_parts(n, 0)
    }
}

/* ------------------------ Prédicats ------------------------ */

impl Decimal {
    pub fn is_nan(&self) -> bool {
        matches!(self.0, Repr::NaN)
    }

    pub fn is_infinite(&self) -> bool {
        matches!(self.0, Repr::Infini { .. })
    }

    pub fn is_finite(&self) -> bool {
        matches!(self.0, Repr::Fini { .. })
    }

    pub fn is_zero(&self) -> bool {
        matches!(&self.0, Repr::Fini { mantisse, .. } if mantisse.is_zero())
    }

    pub fn is_negative(&self) -> bool {
        match &self.0 {
            Repr::Fini { mantisse, .. } => mantisse.is_negative(),
            Repr::Infini { negatif } => *negatif,
            Repr::NaN => false,
        }
    }

    pub fn is_positive(&self) -> bool {
        !self.is_nan() && !self.is_zero() && !self.is_negative()
    }

    /// Vrai si fini et entier.
    pub fn is_integer(&self) -> bool {
        matches!(self.0, Repr::Fini { exposant, .. } if exposant >= 0)
    }

    /// Vrai si entier impair (forme normalisée : un impair a forcément exposant 0).
    pub fn is_odd_integer(&self) -> bool {
        match &self.0 {
            Repr::Fini { mantisse, exposant } => {
                *exposant == 0 && (mantisse % BigInt::from(2)) != BigInt::zero()
            }
            _ => false,
        }
    }

    /// Exposant du chiffre de tête (1234 -> 3, 0.05 -> -2). None si non fini ou zéro.
    pub(crate) fn adjusted_exponent(&self) -> Option<i64> {
        match &self.0 {
            Repr::Fini { mantisse, exposant } if !mantisse.is_zero() => {
                Some(exposant + nb_chiffres(mantisse) as i64 - 1)
            }
            _ => None,
        }
    }
}

/* ------------------------ Conversions exactes ------------------------ */

impl Decimal {
    /// Valeur entière exacte (None si non entier ou démesuré).
    pub fn to_integer(&self) -> Option<BigInt> {
        match &self.0 {
            Repr::Fini { mantisse, exposant } if *exposant >= 0 && *exposant <= 100_000 => {
                Some(mantisse * pow10(*exposant as u64))
            }
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.to_integer()?.to_i64()
    }

    /// Fraction exacte p/q d’un décimal fini.
    pub fn to_fraction(&self) -> Option<BigRational> {
        match &self.0 {
            Repr::Fini { mantisse, exposant } => {
                if *exposant >= 0 {
                    Some(BigRational::from_integer(self.to_integer()?))
                } else if *exposant >= -100_000 {
                    Some(BigRational::new(
                        mantisse.clone(),
                        pow10(exposant.unsigned_abs()),
                    ))
                } else {
                    None
                }
            }
            _ => None,
        }
    }
}

/* ------------------------ Arrondi ------------------------ */

impl Decimal {
    /// Arrondi à `precision` chiffres significatifs (demi loin de zéro).
    pub fn round(&self, precision: usize) -> Decimal {
        let precision = precision.max(1) as u64;
        let (mantisse, exposant) = match &self.0 {
            Repr::Fini { mantisse, exposant } => (mantisse, *exposant),
            _ => return self.clone(),
        };

        let n = nb_chiffres(mantisse);
        if n <= precision {
            return self.clone();
        }

        let k = n - precision;
        let diviseur = pow10(k);
        let abs = mantisse.magnitude();
        let mut q = BigInt::from(abs / diviseur.magnitude());
        let r = BigInt::from(abs % diviseur.magnitude());

        if r * BigInt::from(2) >= diviseur {
            q += BigInt::one();
        }
        if mantisse.is_negative() {
            q = -q;
        }

        Decimal::from_parts(q, exposant + k as i64)
    }
}

/* ------------------------ Arithmétique ------------------------ */

impl Neg for Decimal {
    type Output = Decimal;

    fn neg(self) -> Decimal {
        match self.0 {
            Repr::Fini { mantisse, exposant } => Decimal(Repr::Fini {
                mantisse: -mantisse,
                exposant,
            }),
            Repr::Infini { negatif } => Decimal::infinity(!negatif),
            Repr::NaN => self,
        }
    }
}

impl Decimal {
    pub fn abs(&self) -> Decimal {
        if self.is_negative() {
            -self.clone()
        } else {
            self.clone()
        }
    }

    pub fn plus(&self, autre: &Decimal, precision: usize) -> Decimal {
        use Repr::*;

        match (&self.0, &autre.0) {
            (NaN, _) | (_, NaN) => Decimal::nan(),
            (Infini { negatif: a }, Infini { negatif: b }) => {
                if a == b {
                    self.clone()
                } else {
                    Decimal::nan()
                }
            }
            (Infini { .. }, _) => self.clone(),
            (_, Infini { .. }) => autre.clone(),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => {
                if ma.is_zero() {
                    return autre.round(precision);
                }
                if mb.is_zero() {
                    return self.round(precision);
                }

                // Écart démesuré : le petit terme ne compte que comme “retenue collante”
                // sous le dernier chiffre arrondi.
                let (aa, ab) = match (self.adjusted_exponent(), autre.adjusted_exponent()) {
                    (Some(x), Some(y)) => (x, y),
                    _ => return Decimal::nan(),
                };
                let seuil = precision as i64 + 2;
                if aa - ab > seuil {
                    let collant = Decimal::from_parts(
                        mb.signum(),
                        aa - precision as i64 - 3,
                    );
                    return self.plus(&collant, precision);
                }
                if ab - aa > seuil {
                    let collant = Decimal::from_parts(
                        ma.signum(),
                        ab - precision as i64 - 3,
                    );
                    return autre.plus(&collant, precision);
                }

                let e = (*ea).min(*eb);
                let somme = ma * pow10((ea - e) as u64) + mb * pow10((eb - e) as u64);
                Decimal::from_parts(somme, e).round(precision)
            }
        }
    }

    pub fn minus(&self, autre: &Decimal, precision: usize) -> Decimal {
        self.plus(&-autre.clone(), precision)
    }

    pub fn times(&self, autre: &Decimal, precision: usize) -> Decimal {
        use Repr::*;

        let negatif = self.is_negative() != autre.is_negative();
        match (&self.0, &autre.0) {
            (NaN, _) | (_, NaN) => Decimal::nan(),
            (Infini { .. }, _) | (_, Infini { .. }) => {
                if self.is_zero() || autre.is_zero() {
                    Decimal::nan()
                } else {
                    Decimal::infinity(negatif)
                }
            }
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => Decimal::from_parts(ma * mb, ea + eb).round(precision),
        }
    }

    pub fn div(&self, autre: &Decimal, precision: usize) -> Decimal {
        use Repr::*;

        let negatif = self.is_negative() != autre.is_negative();
        match (&self.0, &autre.0) {
            (NaN, _) | (_, NaN) => Decimal::nan(),
            (Infini { .. }, Infini { .. }) => Decimal::nan(),
            (Infini { .. }, _) => Decimal::infinity(negatif),
            (_, Infini { .. }) => Decimal::zero(),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => {
                if mb.is_zero() {
                    return if ma.is_zero() {
                        Decimal::nan()
                    } else {
                        Decimal::infinity(ma.is_negative())
                    };
                }
                if ma.is_zero() {
                    return Decimal::zero();
                }

                // assez de chiffres pour arrondir correctement (+ chiffre collant si reste)
                let decalage = (precision as i64 + 2 + nb_chiffres(mb) as i64
                    - nb_chiffres(ma) as i64)
                    .max(0) as u64;
                let num = ma * pow10(decalage);
                let mut q = &num / mb;
                let r = &num % mb;
                let mut exposant = ea - eb - decalage as i64;

                if !r.is_zero() {
                    let collant = BigInt::from(if negatif { -1 } else { 1 });
                    q = q * BigInt::from(10) + collant;
                    exposant -= 1;
                }

                Decimal::from_parts(q, exposant).round(precision)
            }
        }
    }

    /// Comparaison de valeur (None si NaN).
    pub fn compare(&self, autre: &Decimal) -> Option<Ordering> {
        use Repr::*;

        match (&self.0, &autre.0) {
            (NaN, _) | (_, NaN) => None,
            (Infini { negatif: a }, Infini { negatif: b }) => Some(b.cmp(a)),
            (Infini { negatif }, _) => Some(if *negatif {
                Ordering::Less
            } else {
                Ordering::Greater
            }),
            (_, Infini { negatif }) => Some(if *negatif {
                Ordering::Greater
            } else {
                Ordering::Less
            }),
            (
                Fini {
                    mantisse: ma,
                    exposant: ea,
                },
                Fini {
                    mantisse: mb,
                    exposant: eb,
                },
            ) => {
                let sa = ma.sign();
                let sb = mb.sign();
                if sa != sb {
                    return Some(signe_rang(sa).cmp(&signe_rang(sb)));
                }
                if sa == Sign::NoSign {
                    return Some(Ordering::Equal);
                }

                // même signe, non nuls : d’abord l’ordre de grandeur
                let aa = ea + nb_chiffres(ma) as i64;
                let ab = eb + nb_chiffres(mb) as i64;
                let ordre_abs = if aa != ab {
                    aa.cmp(&ab)
                } else {
                    let e = (*ea).min(*eb);
                    let xa = ma.magnitude() * pow10((ea - e) as u64).magnitude();
                    let xb = mb.magnitude() * pow10((eb - e) as u64).magnitude();
                    xa.cmp(&xb)
                };

                Some(if sa == Sign::Minus {
                    ordre_abs.reverse()
                } else {
                    ordre_abs
                })
            }
        }
    }

    pub fn lt(&self, autre: &Decimal) -> bool {
        self.compare(autre) == Some(Ordering::Less)
    }

    pub fn gt(&self, autre: &Decimal) -> bool {
        self.compare(autre) == Some(Ordering::Greater)
    }
}

fn signe_rang(s: Sign) -> i8 {
    match s {
        Sign::Minus => -1,
        Sign::NoSign => 0,
        Sign::Plus => 1,
    }
}

/* ------------------------ Texte ------------------------ */

impl FromStr for Decimal {
    type Err = ErreurDecimal;

    /// Accepte `[+-]chiffres[(.|,)chiffres][e[+-]chiffres]`, ainsi que `NaN` / `Infinity`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalide = || ErreurDecimal::Invalide(s.to_string());

        let t = s.trim();
        let (negatif, corps) = match t.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, t.strip_prefix('+').unwrap_or(t)),
        };

        match corps {
            "NaN" => return Ok(Decimal::nan()),
            "Infinity" => return Ok(Decimal::infinity(negatif)),
            _ => {}
        }

        let (nombre, exposant_txt) = match corps.find(['e', 'E']) {
            Some(i) => (&corps[..i], Some(&corps[i + 1..])),
            None => (corps, None),
        };

        let (entier, fraction) = match nombre.find(['.', ',']) {
            Some(i) => (&nombre[..i], &nombre[i + 1..]),
            None => (nombre, ""),
        };

        let chiffres_ok = |x: &str| x.chars().all(|c| c.is_ascii_digit());
        if entier.is_empty() && fraction.is_empty() {
            return Err(invalide());
        }
        if !chiffres_ok(entier) || !chiffres_ok(fraction) {
            return Err(invalide());
        }

        let mut exposant: i64 = match exposant_txt {
            Some(e) => e.parse::<i64>().map_err(|_| invalide())?,
            None => 0,
        };
        exposant = exposant
            .checked_sub(fraction.len() as i64)
            .ok_or_else(invalide)?;

        let texte = format!("{entier}{fraction}");
        let mantisse = BigInt::parse_bytes(texte.as_bytes(), 10).ok_or_else(invalide)?;
        let mantisse = if negatif { -mantisse } else { mantisse };

        Ok(Decimal::from_parts(mantisse, exposant))
    }
}

impl Decimal {
    /// Notation positionnelle, sans exposant (ex: 1e-3 -> "0.001").
    pub fn to_plain_string(&self) -> String {
        let (mantisse, exposant) = match &self.0 {
            Repr::Fini { mantisse, exposant } => (mantisse, *exposant),
            _ => return self.to_string(),
        };

        let signe = if mantisse.is_negative() { "-" } else { "" };
        let chiffres = mantisse.magnitude().to_string();

        if exposant >= 0 {
            return format!("{signe}{chiffres}{}", "0".repeat(exposant as usize));
        }

        let apres = exposant.unsigned_abs() as usize;
        if chiffres.len() > apres {
            let (a, b) = chiffres.split_at(chiffres.len() - apres);
            format!("{signe}{a}.{b}")
        } else {
            format!("{signe}0.{}{chiffres}", "0".repeat(apres - chiffres.len()))
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::NaN => write!(f, "NaN"),
            Repr::Infini { negatif: true } => write!(f, "-Infinity"),
            Repr::Infini { negatif: false } => write!(f, "Infinity"),
            Repr::Fini { mantisse, .. } => {
                let ajuste = self.adjusted_exponent().unwrap_or(0);
                if ajuste < SCI_HAUT && ajuste > SCI_BAS {
                    return write!(f, "{}", self.to_plain_string());
                }

                let signe = if mantisse.is_negative() { "-" } else { "" };
                let chiffres = mantisse.magnitude().to_string();
                let (tete, queue) = chiffres.split_at(1);
                let signe_exp = if ajuste < 0 { "-" } else { "+" };

                if queue.is_empty() {
                    write!(f, "{signe}{tete}e{signe_exp}{}", ajuste.unsigned_abs())
                } else {
                    write!(f, "{signe}{tete}.{queue}e{signe_exp}{}", ajuste.unsigned_abs())
                }
            }
        }
    }
}

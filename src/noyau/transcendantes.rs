// src/noyau/transcendantes.rs
//
// Fonctions transcendantes sur Decimal, en virgule fixe (entier scalé ×10^w).
// -------------------------------------------------------------------------
// - π (Machin) et ln 2 / ln 10 (atanh) par séries arctan(1/q)
// - exp, ln, log10, puissance, racine n-ième
// - sin, cos, tan, atan, asin, acos
//
// Règle : tout est calculé à `precision + GARDE` chiffres, puis arrondi une seule fois.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};

use std::cmp::Ordering;

use super::decimal::{nb_chiffres, pow10, Decimal};

/// Chiffres de garde pour les calculs intermédiaires.
pub(crate) const GARDE: usize = 12;

/// Au-delà de 10^LIMITE_REDUCTION, la réduction modulo π/2 n’a plus de sens.
const LIMITE_REDUCTION: i64 = 10_000;

/// Exposants entiers traités par exponentiation binaire exacte.
const PUISSANCE_ENTIERE_MAX: u64 = 100_000;

/// Degrés entiers traités par racine entière exacte (BigInt::nth_root).
const RACINE_EXACTE_MAX: u64 = 64;

/* ------------------------ Virgule fixe ------------------------ */

/// trunc(x × 10^w) ; x fini.
fn vers_fixe(x: &Decimal, w: u64) -> BigInt {
    match x.parts() {
        None => BigInt::zero(),
        Some((m, e)) => {
            let decalage = e + w as i64;
            if decalage >= 0 {
                m * pow10(decalage as u64)
            } else {
                m / pow10(decalage.unsigned_abs())
            }
        }
    }
}

fn depuis_fixe(v: BigInt, w: u64) -> Decimal {
    Decimal::from_parts(v, -(w as i64))
}

fn mul_fixe(a: &BigInt, b: &BigInt, echelle: &BigInt) -> BigInt {
    a * b / echelle
}

fn div_fixe(a: &BigInt, b: &BigInt, echelle: &BigInt) -> BigInt {
    a * echelle / b
}

/// Entier le plus proche de a/b (b > 0).
fn arrondi_div(a: &BigInt, b: &BigInt) -> BigInt {
    let deux = BigInt::from(2);
    if a.is_negative() {
        -((-a * &deux + b) / (b * &deux))
    } else {
        (a * &deux + b) / (b * &deux)
    }
}

fn ceil_div(a: i64, b: i64) -> i64 {
    if a >= 0 {
        (a + b - 1) / b
    } else {
        -((-a) / b)
    }
}

/* ------------------------ Séries ------------------------ */

/// Σ (±1)^k / ((2k+1)·q^(2k+1)) en entier scalé (troncature).
/// `alterne` = true : arctan(1/q) ; false : atanh(1/q).
fn serie_inv_q(q: i64, alterne: bool, echelle: &BigInt) -> BigInt {
    let q = BigInt::from(q);
    let q2 = &q * &q;

    let mut k: u64 = 0;
    let mut q_pow = q.clone();
    let mut somme = BigInt::zero();

    loop {
        let d = &q_pow * BigInt::from(2 * k + 1);
        let terme = echelle / &d;
        if terme.is_zero() {
            break;
        }

        if alterne && k % 2 == 1 {
            somme -= &terme;
        } else {
            somme += &terme;
        }

        q_pow *= &q2;
        k += 1;
    }

    somme
}

/// π × 10^w (Machin : π = 16·atan(1/5) − 4·atan(1/239)).
pub(crate) fn pi_fixe(w: u64) -> BigInt {
    // extra pour amortir les erreurs de troncature
    let extra = 10;
    let echelle = pow10(w + extra);

    let a = serie_inv_q(5, true, &echelle);
    let b = serie_inv_q(239, true, &echelle);

    let pi = BigInt::from(16) * a - BigInt::from(4) * b;
    pi / pow10(extra)
}

/// ln 2 = 2·atanh(1/3)
fn ln2_fixe(w: u64) -> BigInt {
    let extra = 10;
    let echelle = pow10(w + extra);
    serie_inv_q(3, false, &echelle) * BigInt::from(2) / pow10(extra)
}

/// ln 10 = 3·ln 2 + ln(5/4), avec ln(5/4) = 2·atanh(1/9)
fn ln10_fixe(w: u64) -> BigInt {
    let extra = 10;
    let echelle = pow10(w + extra);
    let ln2 = serie_inv_q(3, false, &echelle) * BigInt::from(2);
    let ln_5_4 = serie_inv_q(9, false, &echelle) * BigInt::from(2);
    (ln2 * BigInt::from(3) + ln_5_4) / pow10(extra)
}

/// atanh(z) = z + z³/3 + z⁵/5 + … (|z| petit)
fn atanh_fixe(z: &BigInt, echelle: &BigInt) -> BigInt {
    let z2 = mul_fixe(z, z, echelle);
    let mut puissance = z.clone();
    let mut somme = BigInt::zero();
    let mut k: u64 = 0;

    loop {
        let terme = &puissance / BigInt::from(2 * k + 1);
        if terme.is_zero() {
            break;
        }
        somme += terme;
        puissance = mul_fixe(&puissance, &z2, echelle);
        k += 1;
    }

    somme
}

/// atan(z) = z − z³/3 + z⁵/5 − … (|z| ≤ 0.1)
fn atan_fixe(z: &BigInt, echelle: &BigInt) -> BigInt {
    let z2 = mul_fixe(z, z, echelle);
    let mut puissance = z.clone();
    let mut somme = BigInt::zero();
    let mut k: u64 = 0;

    loop {
        let terme = &puissance / BigInt::from(2 * k + 1);
        if terme.is_zero() {
            break;
        }
        if k % 2 == 1 {
            somme -= terme;
        } else {
            somme += terme;
        }
        puissance = mul_fixe(&puissance, &z2, echelle);
        k += 1;
    }

    somme
}

/// exp(r) par Taylor (|r| < 0.2)
fn exp_fixe(r: &BigInt, echelle: &BigInt) -> BigInt {
    let mut terme = echelle.clone();
    let mut somme = echelle.clone();
    let mut k: u64 = 1;

    loop {
        terme = mul_fixe(&terme, r, echelle) / BigInt::from(k);
        if terme.is_zero() {
            break;
        }
        somme += &terme;
        k += 1;
    }

    somme
}

/// (sin r, cos r) par Taylor (|r| ≤ π/4)
fn sin_cos_fixe(r: &BigInt, echelle: &BigInt) -> (BigInt, BigInt) {
    let r2 = mul_fixe(r, r, echelle);

    let mut terme = r.clone();
    let mut sin = r.clone();
    let mut n: u64 = 1;
    loop {
        terme = -(mul_fixe(&terme, &r2, echelle) / BigInt::from((n + 1) * (n + 2)));
        if terme.is_zero() {
            break;
        }
        sin += &terme;
        n += 2;
    }

    let mut terme = echelle.clone();
    let mut cos = echelle.clone();
    let mut n: u64 = 0;
    loop {
        terme = -(mul_fixe(&terme, &r2, echelle) / BigInt::from((n + 1) * (n + 2)));
        if terme.is_zero() {
            break;
        }
        cos += &terme;
        n += 2;
    }

    (sin, cos)
}

/// x = k·π/2 + r avec |r| ≤ π/4. Rend (k mod 4, r scalé, w).
fn reduction_quadrant(x: &Decimal, precision: usize) -> Option<(u8, BigInt, u64)> {
    let ajuste = x.adjusted_exponent()?;
    if ajuste > LIMITE_REDUCTION {
        return None;
    }

    // chiffres entiers de x/(π/2) + chiffres sous la virgule pour les petits x
    let w = (precision + GARDE) as u64 + ajuste.unsigned_abs() + 2;
    let xf = vers_fixe(x, w);
    let demi_pi = pi_fixe(w) / BigInt::from(2);

    let k = arrondi_div(&xf, &demi_pi);
    let r = xf - &k * &demi_pi;

    let quatre = BigInt::from(4);
    let q = ((k % &quatre) + &quatre) % &quatre;

    Some((q.to_u8().unwrap_or(0), r, w))
}

/// π/2 arrondi à `precision`.
fn demi_pi(precision: usize) -> Decimal {
    let w = (precision + GARDE) as u64;
    depuis_fixe(pi_fixe(w) / BigInt::from(2), w).round(precision)
}

/* ------------------------ Constantes ------------------------ */

impl Decimal {
    /// π à `precision` chiffres significatifs.
    pub fn pi(precision: usize) -> Decimal {
        let w = (precision + GARDE) as u64;
        depuis_fixe(pi_fixe(w), w).round(precision)
    }

    /// Nombre d’Euler e à `precision` chiffres significatifs.
    pub fn e(precision: usize) -> Decimal {
        Decimal::one().exp(precision)
    }

    pub(crate) fn ln10(precision: usize) -> Decimal {
        let w = (precision + GARDE) as u64;
        depuis_fixe(ln10_fixe(w), w).round(precision)
    }
}

/* ------------------------ Exponentielle / logarithmes ------------------------ */

impl Decimal {
    pub fn exp(&self, precision: usize) -> Decimal {
        if self.is_nan() {
            return Decimal::nan();
        }
        if self.is_infinite() {
            return if self.is_negative() {
                Decimal::zero()
            } else {
                Decimal::infinity(false)
            };
        }
        if self.is_zero() {
            return Decimal::one();
        }

        // |x| ≥ 1e16 : hors de la plage des exposants
        let ajuste = self.adjusted_exponent().unwrap_or(0);
        if ajuste >= 16 {
            return if self.is_negative() {
                Decimal::zero()
            } else {
                Decimal::infinity(false)
            };
        }

        let negatif = self.is_negative();
        let a = self.abs();

        // a = n·ln10 + r, 0 ≤ r < ln10 ; exp(a) = 10^n · exp(r)
        let w = (precision + GARDE) as u64 + ajuste.max(0) as u64 + 6;
        let echelle = pow10(w);
        let af = vers_fixe(&a, w);
        let ln10 = ln10_fixe(w);

        let n = &af / &ln10;
        let r = af - &n * &ln10;

        // exp(r) = exp(r/16)^16
        let mut v = exp_fixe(&(r / BigInt::from(16)), &echelle);
        for _ in 0..4 {
            v = mul_fixe(&v, &v, &echelle);
        }

        let n = n.to_i64().unwrap_or(i64::MAX / 2);
        let resultat = Decimal::from_parts(v, n - w as i64);

        if negatif {
            Decimal::one().div(&resultat, precision)
        } else {
            resultat.round(precision)
        }
    }

    /// Logarithme népérien. ln 0 = −∞ ; ln(x < 0) = NaN.
    pub fn ln(&self, precision: usize) -> Decimal {
        if self.is_nan() || self.is_negative() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::infinity(true);
        }
        if self.is_infinite() {
            return Decimal::infinity(false);
        }

        let un = Decimal::one();
        if *self == un {
            return Decimal::zero();
        }

        let (m, e) = match self.parts() {
            Some(p) => p,
            None => return Decimal::nan(),
        };

        // x = y · 10^e10 avec y ∈ [1, 10)
        let d = nb_chiffres(m) as i64;
        let e10 = e + d - 1;

        // près de 1, ln x ≈ x − 1 : il faut autant de chiffres que de zéros en tête
        let proche = if e10 == 0 || e10 == -1 {
            self.minus(&un, (d + 2) as usize)
                .adjusted_exponent()
                .map(|a| (-a).max(0) as u64)
                .unwrap_or(0)
        } else {
            0
        };

        let w = (precision + GARDE) as u64 + proche + nb_chiffres(&BigInt::from(e10));
        let echelle = pow10(w);

        let y = Decimal::from_parts(m.clone(), -(d - 1));
        let mut yf = vers_fixe(&y, w);

        // ramène y près de 1 (au plus 3 divisions, car y < 10)
        let seuil = &echelle * BigInt::from(3) / BigInt::from(2);
        let mut j: i64 = 0;
        while yf > seuil {
            yf /= BigInt::from(2);
            j += 1;
        }

        // ln y = 2·atanh((y − 1)/(y + 1))
        let z = div_fixe(&(&yf - &echelle), &(&yf + &echelle), &echelle);
        let mut res = atanh_fixe(&z, &echelle) * BigInt::from(2);

        if j > 0 {
            res += ln2_fixe(w) * BigInt::from(j);
        }
        if e10 != 0 {
            res += ln10_fixe(w) * BigInt::from(e10);
        }

        depuis_fixe(res, w).round(precision)
    }

    /// Logarithme décimal, exact pour les puissances de 10.
    pub fn log10(&self, precision: usize) -> Decimal {
        if self.is_nan() || self.is_negative() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::infinity(true);
        }
        if self.is_infinite() {
            return Decimal::infinity(false);
        }

        if let Some((m, e)) = self.parts() {
            if m.is_one() {
                return Decimal::from(e);
            }
        }

        let wp = precision + GARDE;
        self.ln(wp).div(&Decimal::ln10(wp), precision)
    }
}

/* ------------------------ Puissances / racines ------------------------ */

impl Decimal {
    /// x^y. Base négative avec exposant non entier => NaN ; 0^(y<0) = +∞ ; x^0 = 1.
    pub fn pow(&self, y: &Decimal, precision: usize) -> Decimal {
        if y.is_zero() {
            return Decimal::one();
        }
        if self.is_nan() || y.is_nan() {
            return Decimal::nan();
        }

        if self.is_zero() {
            return if y.is_negative() {
                Decimal::infinity(false)
            } else {
                Decimal::zero()
            };
        }

        if y.is_infinite() {
            return match (self.abs().compare(&Decimal::one()), y.is_negative()) {
                (Some(Ordering::Equal), _) | (None, _) => Decimal::nan(),
                (Some(Ordering::Greater), false) | (Some(Ordering::Less), true) => {
                    Decimal::infinity(false)
                }
                _ => Decimal::zero(),
            };
        }

        if self.is_infinite() {
            return if y.is_negative() {
                Decimal::zero()
            } else {
                Decimal::infinity(self.is_negative() && y.is_odd_integer())
            };
        }

        if y.is_integer() {
            if let Some(n) = y.to_i64() {
                if n.unsigned_abs() <= PUISSANCE_ENTIERE_MAX {
                    return puissance_entiere(self, n, precision);
                }
            }

            let r = self.abs().pow_reel(y, precision);
            return if self.is_negative() && y.is_odd_integer() {
                -r
            } else {
                r
            };
        }

        if self.is_negative() {
            return Decimal::nan();
        }

        self.pow_reel(y, precision)
    }

    /// exp(y · ln x), x > 0.
    fn pow_reel(&self, y: &Decimal, precision: usize) -> Decimal {
        // l’erreur absolue sur y·ln x devient une erreur relative sur le résultat
        let ln_grossier = self.ln(GARDE);
        let extra = match (ln_grossier.adjusted_exponent(), y.adjusted_exponent()) {
            (Some(a), Some(b)) => (a + b + 2).clamp(0, 20) as usize,
            _ => 0,
        };

        let wp = precision + GARDE + extra;
        let z = y.times(&self.ln(wp), wp);
        z.exp(precision)
    }

    /// Racine carrée. Négatif => NaN.
    pub fn sqrt(&self, precision: usize) -> Decimal {
        self.nth_root(&Decimal::from(2), precision)
    }

    /// Racine `degre`-ième d’un radicande positif ou nul (négatif => NaN).
    /// Les règles de signe de la fonction `root` vivent dans l’évaluateur.
    pub fn nth_root(&self, degre: &Decimal, precision: usize) -> Decimal {
        if self.is_nan() || degre.is_nan() || self.is_negative() || degre.is_zero() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::zero();
        }
        if self.is_infinite() {
            return if degre.is_negative() {
                Decimal::zero()
            } else {
                Decimal::infinity(false)
            };
        }

        if let Some(n) = degre.to_i64() {
            if n.unsigned_abs() <= RACINE_EXACTE_MAX {
                let r = racine_entiere(self, n.unsigned_abs() as u32, precision + GARDE);
                return if n > 0 {
                    r.round(precision)
                } else {
                    Decimal::one().div(&r, precision)
                };
            }
        }

        let inverse = Decimal::one().div(degre, precision + GARDE);
        self.pow(&inverse, precision)
    }
}

/// Exponentiation binaire (exposant entier), arrondie à chaque étape.
fn puissance_entiere(base: &Decimal, n: i64, precision: usize) -> Decimal {
    let wp = precision + GARDE + nb_chiffres(&BigInt::from(n)) as usize;

    let mut e = n.unsigned_abs();
    let mut acc = Decimal::one();
    let mut b = base.clone();

    while e > 0 {
        if (e & 1) == 1 {
            acc = acc.times(&b, wp);
        }
        e >>= 1;
        if e > 0 {
            b = b.times(&b, wp);
        }
    }

    if n < 0 {
        Decimal::one().div(&acc, precision)
    } else {
        acc.round(precision)
    }
}

/// Racine n-ième (x > 0 fini) via la racine entière d’une mantisse scalée :
/// exacte pour les puissances parfaites (root(8;3) = 2).
fn racine_entiere(x: &Decimal, n: u32, precision: usize) -> Decimal {
    let (m, e) = match x.parts() {
        Some(p) => p,
        None => return Decimal::nan(),
    };

    let n64 = n as i64;
    let d = nb_chiffres(m) as i64;
    let cible = n64 * precision as i64;

    // t : assez de chiffres dans la racine, et exposant entier positif ou nul
    let t = ceil_div(cible - d - e, n64).max(ceil_div(-e, n64));

    let grand = m * pow10((e + n64 * t) as u64);
    let r = grand.nth_root(n);

    Decimal::from_parts(r, -t).round(precision)
}

/* ------------------------ Trigonométrie (radians) ------------------------ */

impl Decimal {
    pub fn sin(&self, precision: usize) -> Decimal {
        if !self.is_finite() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::zero();
        }

        let (q, r, w) = match reduction_quadrant(self, precision) {
            Some(x) => x,
            None => return Decimal::nan(),
        };
        let (s, c) = sin_cos_fixe(&r, &pow10(w));

        let v = match q {
            0 => s,
            1 => c,
            2 => -s,
            _ => -c,
        };
        depuis_fixe(v, w).round(precision)
    }

    pub fn cos(&self, precision: usize) -> Decimal {
        if !self.is_finite() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::one();
        }

        let (q, r, w) = match reduction_quadrant(self, precision) {
            Some(x) => x,
            None => return Decimal::nan(),
        };
        let (s, c) = sin_cos_fixe(&r, &pow10(w));

        let v = match q {
            0 => c,
            1 => -s,
            2 => -c,
            _ => s,
        };
        depuis_fixe(v, w).round(precision)
    }

    /// tan = sin/cos ; la garde de singularité est faite par l’appelant.
    pub fn tan(&self, precision: usize) -> Decimal {
        if !self.is_finite() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::zero();
        }

        let (q, r, w) = match reduction_quadrant(self, precision) {
            Some(x) => x,
            None => return Decimal::nan(),
        };
        let (s, c) = sin_cos_fixe(&r, &pow10(w));

        let (sin, cos) = match q {
            0 => (s, c),
            1 => (c, -s),
            2 => (-s, -c),
            _ => (-c, s),
        };
        depuis_fixe(sin, w).div(&depuis_fixe(cos, w), precision)
    }

    pub fn atan(&self, precision: usize) -> Decimal {
        if self.is_nan() {
            return Decimal::nan();
        }
        if self.is_infinite() {
            let v = demi_pi(precision);
            return if self.is_negative() { -v } else { v };
        }
        if self.is_zero() {
            return Decimal::zero();
        }

        let ajuste = self.adjusted_exponent().unwrap_or(0);
        let w = (precision + GARDE) as u64 + (-ajuste).max(0) as u64 + 2;
        let echelle = pow10(w);

        let negatif = self.is_negative();
        let a = self.abs();

        // |x| > 1 : atan x = π/2 − atan(1/x)
        let inverse = a.gt(&Decimal::one());
        let y = if inverse {
            Decimal::one().div(&a, w as usize)
        } else {
            a
        };
        let mut yf = vers_fixe(&y, w);

        // atan(y) = 2·atan(y / (1 + √(1 + y²))), jusqu’à y ≤ 0.1
        let dixieme = &echelle / BigInt::from(10);
        let mut doublements: u32 = 0;
        while yf > dixieme {
            let y2 = mul_fixe(&yf, &yf, &echelle);
            let racine = ((&echelle + y2) * &echelle).sqrt();
            yf = div_fixe(&yf, &(&echelle + racine), &echelle);
            doublements += 1;
        }

        let mut res = atan_fixe(&yf, &echelle) * BigInt::from(2).pow(doublements);
        if inverse {
            res = pi_fixe(w) / BigInt::from(2) - res;
        }
        if negatif {
            res = -res;
        }

        depuis_fixe(res, w).round(precision)
    }

    /// |x| > 1 => NaN.
    pub fn asin(&self, precision: usize) -> Decimal {
        if !self.is_finite() {
            return Decimal::nan();
        }
        if self.is_zero() {
            return Decimal::zero();
        }

        let un = Decimal::one();
        match self.abs().compare(&un) {
            Some(Ordering::Greater) | None => return Decimal::nan(),
            Some(Ordering::Equal) => {
                let v = demi_pi(precision);
                return if self.is_negative() { -v } else { v };
            }
            Some(Ordering::Less) => {}
        }

        // asin x = atan(x / √(1 − x²))
        let wp = precision + GARDE;
        let reste = un.minus(&self.times(self, 2 * wp), 2 * wp);
        let racine = reste.sqrt(wp);
        self.div(&racine, wp).atan(precision)
    }

    /// |x| > 1 => NaN.
    pub fn acos(&self, precision: usize) -> Decimal {
        if !self.is_finite() {
            return Decimal::nan();
        }
        if self.abs().gt(&Decimal::one()) {
            return Decimal::nan();
        }

        let wp = precision + GARDE;
        demi_pi(wp).minus(&self.asin(wp), wp).round(precision)
    }
}

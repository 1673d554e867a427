// src/noyau/trig.rs
//
// Trigonométrie avec unité d’angle
// --------------------------------
// - sin/cos : argument converti en radians avant calcul
// - asin/acos/atan : résultat converti vers l’unité active
// - tan : toujours en radians ; garde de singularité (distance à π/2 + kπ, en fraction de π)
// - Degrés : table des angles remarquables (multiples de 30° et 45°), valeurs exactes

use log::trace;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use super::decimal::{pow10, Decimal};
use super::erreurs::ErreurEval;
use super::reglages::AngleUnit;
use super::transcendantes::GARDE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrigFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TrigOutcome {
    Valeur(Decimal),
    Indefini,
}

/// Tolérance de la garde tan : 1e-9 (en fraction de π).
fn tolerance_tan() -> Decimal {
    Decimal::from_parts(BigInt::from(1), -9)
}

/// Évalue une fonction trigonométrique dans l’unité donnée, arrondie à `precision`.
pub fn evalue(
    f: TrigFn,
    x: &Decimal,
    unite: AngleUnit,
    precision: usize,
) -> Result<Decimal, ErreurEval> {
    let wp = precision + GARDE;

    if unite == AngleUnit::Deg {
        if let Some(issue) = trig_special(x, f, wp) {
            return match issue {
                TrigOutcome::Valeur(v) => Ok(v.round(precision)),
                TrigOutcome::Indefini => Err(ErreurEval::TrigonometricSingularity),
            };
        }
    }

    let v = match f {
        TrigFn::Sin => vers_radians(x, unite, wp).sin(wp),
        TrigFn::Cos => vers_radians(x, unite, wp).cos(wp),
        TrigFn::Tan => {
            let r = vers_radians(x, unite, wp);
            if est_singulier_tan(&r, wp) {
                trace!("tan: argument critique {r}");
                return Err(ErreurEval::TrigonometricSingularity);
            }
            r.tan(wp)
        }
        TrigFn::Asin => depuis_radians(&x.asin(wp), unite, wp),
        TrigFn::Acos => depuis_radians(&x.acos(wp), unite, wp),
        TrigFn::Atan => depuis_radians(&x.atan(wp), unite, wp),
    };

    Ok(v.round(precision))
}

/* ------------------------ Unités ------------------------ */

fn vers_radians(x: &Decimal, unite: AngleUnit, wp: usize) -> Decimal {
    match unite {
        AngleUnit::Rad => x.clone(),
        AngleUnit::Deg => x.times(&Decimal::pi(wp), wp).div(&Decimal::from(180), wp),
    }
}

fn depuis_radians(x: &Decimal, unite: AngleUnit, wp: usize) -> Decimal {
    match unite {
        AngleUnit::Rad => x.clone(),
        AngleUnit::Deg => x.times(&Decimal::from(180), wp).div(&Decimal::pi(wp), wp),
    }
}

/* ------------------------ Garde tan ------------------------ */

/// c = (r − π/2)/π ; singulier si c est à moins de 1e-9 d’un entier.
/// Au-delà de la résolution de travail (c sans partie fractionnaire représentable),
/// on laisse la réduction de `tan` trancher.
fn est_singulier_tan(r: &Decimal, wp: usize) -> bool {
    if !r.is_finite() {
        return false;
    }

    let pi = Decimal::pi(wp);
    let demi_pi = pi.div(&Decimal::from(2), wp);
    let c = r.minus(&demi_pi, wp).div(&pi, wp);

    pres_d_un_entier(&c, wp)
}

fn pres_d_un_entier(c: &Decimal, wp: usize) -> bool {
    if c.is_zero() {
        return true;
    }
    let (m, e) = match (c.parts(), c.adjusted_exponent()) {
        (Some((m, e)), Some(ajuste)) => {
            if ajuste >= wp as i64 {
                return false;
            }
            if ajuste < -9 {
                return true;
            }
            (m, e)
        }
        _ => return false,
    };
    if e >= 0 {
        return true;
    }

    let echelle = pow10(e.unsigned_abs());
    let frac = ((m % &echelle) + &echelle) % &echelle;
    let complement = &echelle - &frac;
    let distance = if frac < complement { frac } else { complement };

    Decimal::from_parts(distance, e).lt(&tolerance_tan())
}

/* ------------------------ Angles remarquables (degrés) ------------------------ */

/// Reconnaît les angles remarquables (multiples de 30° ou 45°) pour sin/cos/tan.
///
/// Retour:
/// - Some(Valeur(v)) si reconnu (v à `precision` chiffres)
/// - Some(Indefini) pour tan(90° + k·180°)
/// - None sinon (y compris pour les fonctions réciproques)
pub fn trig_special(deg: &Decimal, f: TrigFn, precision: usize) -> Option<TrigOutcome> {
    if matches!(f, TrigFn::Asin | TrigFn::Acos | TrigFn::Atan) {
        return None;
    }

    // 1) angle = (deg/180)·π, fraction exacte réduite modulo 2 dans [0, 2)
    let demi_tours = deg.to_fraction()? / BigRational::from_integer(BigInt::from(180));
    let deux = BigRational::from_integer(BigInt::from(2));
    let reduit = &demi_tours - (&demi_tours / &deux).floor() * &deux;

    // 2) angle = kπ/n, n ∈ {1,2,3,4,6}, k ∈ [0, 2n)
    let (k_mod, n) = rational_to_small_kn(&reduit)?;

    // Constructeurs
    let rat = |a: i64, b: i64| Decimal::from(a).div(&Decimal::from(b), precision);
    let racine = |a: i64| Decimal::from(a).sqrt(precision);
    let sur = |v: Decimal, b: i64| v.div(&Decimal::from(b), precision);

    let zero = Decimal::zero();
    let one = Decimal::one();
    let neg_one = -Decimal::one();
    let half = rat(1, 2);
    let neg_half = rat(-1, 2);

    let sqrt3 = racine(3);
    let sqrt2_over_2 = sur(racine(2), 2);
    let sqrt3_over_2 = sur(sqrt3.clone(), 2);
    let sqrt3_over_3 = sur(sqrt3.clone(), 3);

    trace!(
        "trig remarquable: {:?}({}) = {:?}({})",
        f,
        deg,
        f,
        format_angle_kn_pi(k_mod, n)
    );

    let a = (k_mod, n);
    let out = match f {
        TrigFn::Sin => match a {
            (0, _) | (1, 1) => TrigOutcome::Valeur(zero),

            (1, 6) | (5, 6) => TrigOutcome::Valeur(half),
            (7, 6) | (11, 6) => TrigOutcome::Valeur(neg_half),

            (1, 4) | (3, 4) => TrigOutcome::Valeur(sqrt2_over_2),
            (5, 4) | (7, 4) => TrigOutcome::Valeur(-sqrt2_over_2),

            (1, 3) | (2, 3) => TrigOutcome::Valeur(sqrt3_over_2),
            (4, 3) | (5, 3) => TrigOutcome::Valeur(-sqrt3_over_2),

            (1, 2) => TrigOutcome::Valeur(one),
            (3, 2) => TrigOutcome::Valeur(neg_one),

            _ => return None,
        },

        TrigFn::Cos => match a {
            (0, _) => TrigOutcome::Valeur(one),
            (1, 1) => TrigOutcome::Valeur(neg_one),

            (1, 6) | (11, 6) => TrigOutcome::Valeur(sqrt3_over_2),
            (5, 6) | (7, 6) => TrigOutcome::Valeur(-sqrt3_over_2),

            (1, 4) | (7, 4) => TrigOutcome::Valeur(sqrt2_over_2),
            (3, 4) | (5, 4) => TrigOutcome::Valeur(-sqrt2_over_2),

            (1, 3) | (5, 3) => TrigOutcome::Valeur(half),
            (2, 3) | (4, 3) => TrigOutcome::Valeur(neg_half),

            (1, 2) | (3, 2) => TrigOutcome::Valeur(zero),

            _ => return None,
        },

        TrigFn::Tan => match a {
            (0, _) | (1, 1) => TrigOutcome::Valeur(zero),

            (1, 6) | (7, 6) => TrigOutcome::Valeur(sqrt3_over_3),
            (5, 6) | (11, 6) => TrigOutcome::Valeur(-sqrt3_over_3),

            (1, 4) | (5, 4) => TrigOutcome::Valeur(one),
            (3, 4) | (7, 4) => TrigOutcome::Valeur(neg_one),

            (1, 3) | (4, 3) => TrigOutcome::Valeur(sqrt3),
            (2, 3) | (5, 3) => TrigOutcome::Valeur(-sqrt3),

            (1, 2) | (3, 2) => TrigOutcome::Indefini,

            _ => return None,
        },

        TrigFn::Asin | TrigFn::Acos | TrigFn::Atan => return None,
    };

    Some(out)
}

/* ------------------------ Outils ------------------------ */

fn format_angle_kn_pi(k: i64, n: i64) -> String {
    if k == 0 {
        return "0".to_string();
    }
    if n == 1 {
        return match k {
            1 => "π".to_string(),
            _ => format!("{k}π"),
        };
    }
    if k == 1 {
        return format!("π/{n}");
    }
    format!("{k}π/{n}")
}

/// r = k/n (fraction réduite, 0 ≤ r < 2) -> (k, n).
/// Accepte seulement n ∈ {1,2,3,4,6}.
fn rational_to_small_kn(r: &BigRational) -> Option<(i64, i64)> {
    let k = r.numer().to_i64()?;
    let n = r.denom().to_i64()?;

    if [1, 2, 3, 4, 6].contains(&n) {
        Some((k, n))
    } else {
        None
    }
}

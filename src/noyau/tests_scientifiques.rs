//! Tests scientifiques (campagne) : propriétés du contrat + identités + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - précision modérée (40 chiffres) sauf test dédié
//!
//! Notes :
//! - Les identités trig sont vérifiées à tolérance près (1e-35) : π n’est qu’approché.
//! - En degrés, les angles remarquables (multiples de 30° / 45°) sont exacts : égalité stricte.

use std::time::{Duration, Instant};

use super::{
    calculate_avec, format_tokens, tokenize, AngleUnit, Decimal, ErreurCalcul, ErreurEval,
    Reglages,
};

const P: usize = 40;

fn d(s: &str) -> Decimal {
    s.parse().unwrap_or_else(|e| panic!("{s:?}: {e}"))
}

fn calc_avec(expr: &str, ans: &str, ind: &str, unite: AngleUnit) -> Result<Decimal, ErreurCalcul> {
    calculate_avec(expr, &d(ans), &d(ind), unite, &Reglages::with_precision(P))
}

fn calc(expr: &str, unite: AngleUnit) -> Result<Decimal, ErreurCalcul> {
    calc_avec(expr, "0", "0", unite)
}

fn eval_ok(expr: &str, unite: AngleUnit) -> Decimal {
    calc(expr, unite).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"))
}

fn assert_exact(expr: &str, attendu: &str, unite: AngleUnit) {
    assert_eq!(eval_ok(expr, unite), d(attendu), "expr={expr:?}");
}

/// |v − attendu| ≤ 1e-35 · max(1, |attendu|)
fn assert_proche(expr: &str, attendu: &str, unite: AngleUnit) {
    let v = eval_ok(expr, unite);
    let a = d(attendu);
    let echelle = if a.abs().gt(&Decimal::one()) {
        a.abs()
    } else {
        Decimal::one()
    };
    let tolerance = d("1e-35").times(&echelle, P);
    let ecart = v.minus(&a, P).abs();
    assert!(
        !ecart.gt(&tolerance),
        "expr={expr:?} v={v} attendu={attendu} écart={ecart}"
    );
}

fn assert_singulier(expr: &str, unite: AngleUnit) {
    assert_eq!(
        calc(expr, unite),
        Err(ErreurCalcul::Syntaxe(ErreurEval::TrigonometricSingularity)),
        "expr={expr:?}"
    );
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Propriétés du contrat ------------------------ */

#[test]
fn sci_associativite() {
    assert_exact("4-3-2", "-1", AngleUnit::Rad);
    assert_exact("4^3^2", "262144", AngleUnit::Rad);
    assert_eq!(
        eval_ok("4/3/2", AngleUnit::Rad),
        eval_ok("(4/3)/2", AngleUnit::Rad)
    );
    assert_ne!(
        eval_ok("4/3/2", AngleUnit::Rad),
        eval_ok("4/(3/2)", AngleUnit::Rad)
    );
}

#[test]
fn sci_moins_unaire() {
    assert_exact("-5", "-5", AngleUnit::Rad);
    assert_exact("-5*5", "-25", AngleUnit::Rad);
    assert_exact("7+-5", "2", AngleUnit::Rad);
    assert_exact("7 − 5", "2", AngleUnit::Rad);
}

#[test]
fn sci_fonctions_en_degres() {
    assert_exact("sin(0)", "0", AngleUnit::Deg);
    assert_exact("sin(90)", "1", AngleUnit::Deg);
    assert_exact("asin(1)", "90", AngleUnit::Deg);
    assert_exact("acos(0.5)", "60", AngleUnit::Deg);
    assert_exact("atan(-1)", "-45", AngleUnit::Deg);
}

#[test]
fn sci_racines() {
    assert_exact("root(8;3)", "2", AngleUnit::Rad);
    assert_exact("root(-8;3)", "-2", AngleUnit::Rad);
    assert_exact("root(-32;5)", "-2", AngleUnit::Rad);
    assert_proche("root(2;0.5)", "4", AngleUnit::Rad);
    for expr in ["root(8;0)", "root(-8;2)", "root(-8;1.5)"] {
        assert_eq!(
            calc(expr, AngleUnit::Rad),
            Err(ErreurCalcul::Syntaxe(ErreurEval::UndefinedRoot)),
            "expr={expr:?}"
        );
    }
}

#[test]
fn sci_tan_singuliere() {
    assert_singulier("tan(90)", AngleUnit::Deg);
    assert_singulier("tan(-270)", AngleUnit::Deg);
    assert!(calc("tan(90.1)", AngleUnit::Deg).is_ok());

    assert_singulier("tan(pi/2)", AngleUnit::Rad);
    assert_singulier("tan(3*pi/2)", AngleUnit::Rad);
    assert_singulier("tan(-pi/2)", AngleUnit::Rad);
}

#[test]
fn sci_propagation_erreur() {
    // une erreur interne remonte telle quelle, sans résultat partiel
    assert_singulier("1 + tan(pi/2)", AngleUnit::Rad);
    assert_singulier("tan(pi/2) + 1", AngleUnit::Rad);
    assert_singulier("2 * tan(pi/2)", AngleUnit::Rad);
    assert_singulier("sqrt(tan(pi/2))", AngleUnit::Rad);
}

#[test]
fn sci_parentheses_desequilibrees() {
    // le déséquilibre l’emporte sur l’opérande manquant
    for expr in ["(1+1", "((1)", "sin(1", "(1+", "(", "sin(1+", "2*(3-", "root(8;"] {
        assert_eq!(
            calc(expr, AngleUnit::Rad),
            Err(ErreurCalcul::Syntaxe(ErreurEval::MissingCloseBracket)),
            "expr={expr:?}"
        );
    }
    for expr in ["1+1)", ")(", ")", "1+)", "(1)) + (2"] {
        assert_eq!(
            calc(expr, AngleUnit::Rad),
            Err(ErreurCalcul::Syntaxe(ErreurEval::MissingOpenBracket)),
            "expr={expr:?}"
        );
    }
}

#[test]
fn sci_litteraux_normalises() {
    assert_eq!(tokenize("0.1000"), tokenize("0,1"));
    assert_exact("0.1000", "0.1", AngleUnit::Rad);
}

#[test]
fn sci_registres() {
    assert_eq!(calc_avec("ans+ind", "2", "3", AngleUnit::Rad), Ok(d("5")));
    assert_eq!(calc_avec("ANS × M", "2", "3", AngleUnit::Rad), Ok(d("6")));
}

/* ------------------------ Identités numériques ------------------------ */

#[test]
fn sci_identites_symetrie() {
    for x in ["0.3", "1", "2.5", "10"] {
        let sin_x = eval_ok(&format!("sin({x})"), AngleUnit::Rad);
        let cos_x = eval_ok(&format!("cos({x})"), AngleUnit::Rad);
        assert_proche(&format!("sin(-{x})"), &(-sin_x).to_plain_string(), AngleUnit::Rad);
        assert_proche(&format!("cos(-{x})"), &cos_x.to_plain_string(), AngleUnit::Rad);
    }
}

#[test]
fn sci_pythagore() {
    for x in ["0.1", "1", "3", "100", "-7.25"] {
        assert_proche(&format!("sin({x})^2 + cos({x})^2"), "1", AngleUnit::Rad);
    }
    assert_proche("sin(17)^2 + cos(17)^2", "1", AngleUnit::Deg);
}

#[test]
fn sci_periodicite_degres() {
    assert_exact("sin(30+360)", "0.5", AngleUnit::Deg);
    assert_exact("cos(420)", "0.5", AngleUnit::Deg);
    assert_exact("tan(225)", "1", AngleUnit::Deg);
    assert_exact("sin(-720)", "0", AngleUnit::Deg);
}

#[test]
fn sci_logarithmes_et_exponentielles() {
    assert_proche("ln(e)", "1", AngleUnit::Rad);
    assert_exact("log(10^12)", "12", AngleUnit::Rad);
    assert_exact("lg(0.001)", "-3", AngleUnit::Rad);
    assert_proche("e^ln(5)", "5", AngleUnit::Rad);
    assert_proche("2^0.5", "1.414213562373095048801688724209698078570", AngleUnit::Rad);
    assert_proche("ln(2)+ln(3)-ln(6)", "0", AngleUnit::Rad);
}

/* ------------------------ Rendu canonique ------------------------ */

#[test]
fn sci_aller_retour_rendu() {
    for expr in [
        "1+2*(cos(2)/sqrt(pi))",
        "-3²+2³",
        "root(27, 3) + arcsin(0.5)",
        "ans*mem-e",
        "4^3^2/1,5",
    ] {
        let jetons = tokenize(expr).unwrap();
        let rendu = format_tokens(&jetons);
        assert_eq!(
            calc_avec(&rendu, "2", "3", AngleUnit::Rad),
            calc_avec(expr, "2", "3", AngleUnit::Rad),
            "{expr:?} -> {rendu:?}"
        );
    }
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_profondeur_sqrt_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // alternance √ / ² : la valeur revient à 4 (à la précision près)
    let mut expr = "4".to_string();
    for k in 0..60 {
        expr = if k % 2 == 0 {
            format!("sqrt({expr})")
        } else {
            format!("({expr})^2")
        };
        budget(t0, max);
    }

    assert_proche(&expr, "4", AngleUnit::Rad);
    budget(t0, max);
}

#[test]
fn sci_stress_taille_somme_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut expr = String::new();
    for k in 0..400 {
        if k > 0 {
            expr.push_str(" + ");
        }
        expr.push_str("1/2");
    }

    // 400*(1/2)=200
    assert_exact(&expr, "200", AngleUnit::Rad);
    budget(t0, max);
}

#[test]
fn sci_stress_parentheses_imbriquees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let n = 200;
    let expr = format!("{}1{}", "(".repeat(n), ")".repeat(n));
    assert_exact(&expr, "1", AngleUnit::Rad);
    budget(t0, max);
}

#[test]
fn sci_stress_bigint_safe() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    // (10^100 − 1)/7 + 1/7 = 10^100/7
    let big = "9".repeat(100);
    let v = eval_ok(&format!("{big}/7 + 1/7"), AngleUnit::Rad);
    let attendu = d(&format!("1{}", "0".repeat(100))).div(&d("7"), P);
    assert_eq!(v, attendu);
    budget(t0, max);
}

#[test]
fn sci_haute_precision() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let pi = calculate_avec(
        "pi",
        &Decimal::zero(),
        &Decimal::zero(),
        AngleUnit::Rad,
        &Reglages::with_precision(300),
    )
    .unwrap();
    assert!(pi
        .to_plain_string()
        .starts_with("3.14159265358979323846264338327950288419716939937510582097494459"));
    assert_eq!(pi.to_plain_string().len(), 301);
    budget(t0, max);
}

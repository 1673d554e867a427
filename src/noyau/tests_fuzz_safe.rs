//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée, exposants petits
//! - budget temps global
//! - une expression bien formée ne produit jamais d’erreur de syntaxe :
//!   seules les erreurs de valeur (NaN, ∞, singularité, racine) sont admises
//! - rendu canonique : re-tokeniser redonne les mêmes jetons, donc la même valeur

use std::time::{Duration, Instant};

use super::{
    calculate_avec, evaluate_avec, format_tokens, tokenize, AngleUnit, Decimal, ErreurCalcul,
    ErreurEval, Reglages,
};

const P: usize = 30;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
    fn choose<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.pick(items.len() as u32) as usize]
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn calc(expr: &str, unite: AngleUnit) -> Result<Decimal, ErreurCalcul> {
    let ans: Decimal = "2.5".parse().unwrap();
    let ind: Decimal = "-3".parse().unwrap();
    calculate_avec(expr, &ans, &ind, unite, &Reglages::with_precision(P))
}

fn is_erreur_de_valeur(e: &ErreurCalcul) -> bool {
    // Liste blanche : erreurs *normales* sur une expression bien formée,
    // le domaine des fonctions étant volontairement limité.
    matches!(
        e,
        ErreurCalcul::Syntaxe(
            ErreurEval::ResultIsNotANumber
                | ErreurEval::ResultIsInfinite
                | ErreurEval::TrigonometricSingularity
                | ErreurEval::UndefinedRoot
        )
    )
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

fn gen_nombre(rng: &mut Rng) -> String {
    match rng.pick(6) {
        0 => "0".to_string(),
        1 => format!("{}", 1 + rng.pick(9)),
        2 => format!("{}", 10 + rng.pick(990)),
        3 => format!("{}.{}", rng.pick(10), 1 + rng.pick(99)),
        4 => format!("{},5", rng.pick(4)),
        _ => "0.001".to_string(),
    }
}

fn gen_atom(rng: &mut Rng) -> String {
    match rng.pick(8) {
        0..=3 => gen_nombre(rng),
        4 => rng.choose(&["pi", "π", "Π"]).to_string(),
        5 => rng.choose(&["e", "ℯ"]).to_string(),
        6 => rng.choose(&["ans", "ANS"]).to_string(),
        _ => rng.choose(&["M", "mem", "ind"]).to_string(),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atom(rng);
    }

    match rng.pick(12) {
        0 => gen_atom(rng),
        1 => format!("{}+{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("{} - {}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({})×{}", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("{}/({})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        // exposant borné : la base est libre, la puissance reste petite
        5 => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
        6 => format!("({}){}", gen_expr(rng, depth - 1), rng.choose(&["²", "³"])),
        7 => format!("-{}", gen_expr(rng, depth - 1)),
        8 => format!("root({})", gen_expr(rng, depth - 1)),
        9 => {
            let f = rng.choose(&[
                "sin", "cos", "tan", "asin", "acos", "atan", "arctan", "ln", "log", "sqrt", "√",
            ]);
            format!("{f}({})", gen_expr(rng, depth - 1))
        }
        10 => {
            let sep = if rng.coin() { ";" } else { ", " };
            format!(
                "root({}{sep}{})",
                gen_expr(rng, depth - 1),
                1 + rng.pick(5)
            )
        }
        _ => format!("({})", gen_expr(rng, depth - 1)),
    }
}

/// Soupe de jetons : suites quelconques (mal formées le plus souvent).
fn gen_soupe(rng: &mut Rng, n: usize) -> String {
    const VOCABULAIRE: [&str; 22] = [
        "1", "2", "3", "0.5", "4,5", "+", "-", "−", "×", "*", "/", "^", "²", "(", ")", ";", "pi",
        "e", "ans", "M", "sin", "root",
    ];

    let mut s = String::new();
    for _ in 0..n {
        s.push_str(rng.choose(&VOCABULAIRE));
        if rng.coin() {
            s.push(' ');
        }
    }
    s
}

/// Caractères bruts, dont certains inconnus du tokeniseur.
fn gen_bruit(rng: &mut Rng, n: usize) -> String {
    const CARACTERES: [char; 16] = [
        '1', '0', '.', ',', '+', '(', ')', 's', 'i', 'n', '#', 'ö', '€', '³', ' ', '√',
    ];
    (0..n)
        .map(|_| CARACTERES[rng.pick(CARACTERES.len() as u32) as usize])
        .collect()
}

/* ------------------------ Helper somme balancée anti pile ------------------------ */

fn somme_balancee(terme: &str, n: usize) -> String {
    let mut items: Vec<String> = (0..n).map(|_| terme.to_string()).collect();
    while items.len() > 1 {
        let mut next = Vec::new();
        let mut i = 0;
        while i < items.len() {
            if i + 1 < items.len() {
                next.push(format!("({}+{})", items[i], items[i + 1]));
                i += 2;
            } else {
                next.push(items[i].clone());
                i += 1;
            }
        }
        items = next;
    }
    items.pop().unwrap_or_else(|| "0".to_string())
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_expressions_bien_formees() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for i in 0..150 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 4);
        let unite = if i % 2 == 0 {
            AngleUnit::Rad
        } else {
            AngleUnit::Deg
        };

        match calc(&expr, unite) {
            Ok(_) => seen_ok += 1,
            Err(e) => {
                assert!(
                    is_erreur_de_valeur(&e),
                    "erreur non attendue: expr={expr:?} err={e:?}"
                );
                seen_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 20, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    // Même seed => mêmes expressions => mêmes sorties
    let mut r1 = Rng::new(0xDE7E_u64);
    let mut r2 = Rng::new(0xDE7E_u64);

    for _ in 0..40 {
        budget(t0, max);

        let e1 = gen_expr(&mut r1, 3);
        let e2 = gen_expr(&mut r2, 3);
        assert_eq!(e1, e2);

        // aucun état caché entre deux appels
        assert_eq!(calc(&e1, AngleUnit::Rad), calc(&e2, AngleUnit::Rad), "expr={e1:?}");
    }
}

#[test]
fn fuzz_safe_rendu_canonique() {
    let t0 = Instant::now();
    let max = Duration::from_secs(20);

    let mut rng = Rng::new(0xBADC0DE_u64);
    let zero = Decimal::zero();
    let reglages = Reglages::with_precision(P);

    for _ in 0..80 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 3);
        let jetons = tokenize(&expr).unwrap_or_else(|e| panic!("expr={expr:?} err={e}"));
        let rendu = format_tokens(&jetons);
        let relus = tokenize(&rendu).unwrap_or_else(|e| panic!("rendu={rendu:?} err={e}"));

        assert_eq!(relus, jetons, "expr={expr:?} rendu={rendu:?}");
        assert_eq!(
            evaluate_avec(&relus, &zero, &zero, AngleUnit::Deg, &reglages),
            evaluate_avec(&jetons, &zero, &zero, AngleUnit::Deg, &reglages),
            "expr={expr:?}"
        );
    }
}

#[test]
fn fuzz_safe_soupe_de_jetons() {
    let t0 = Instant::now();
    let max = Duration::from_secs(10);

    let mut rng = Rng::new(0x50_u64);

    for _ in 0..300 {
        budget(t0, max);

        let n = 1 + rng.pick(12) as usize;
        let soupe = gen_soupe(&mut rng, n);

        // le vocabulaire est connu : la tokenisation réussit toujours
        let jetons = tokenize(&soupe).unwrap_or_else(|e| panic!("soupe={soupe:?} err={e}"));

        // rendu stable même pour une suite mal formée
        let rendu = format_tokens(&jetons);
        assert_eq!(tokenize(&rendu).as_ref(), Ok(&jetons), "soupe={soupe:?}");

        // pas de panique ; résultat ou erreur typée
        let _ = calc(&soupe, AngleUnit::Rad);
    }
}

#[test]
fn fuzz_safe_bruit_lexical() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let mut rng = Rng::new(0xB1E55_u64);

    for _ in 0..300 {
        budget(t0, max);

        let n = 1 + rng.pick(16) as usize;
        let bruit = gen_bruit(&mut rng, n);

        if let Err(ErreurCalcul::Lexicale(e)) = calc(&bruit, AngleUnit::Rad) {
            // la position pointe sur un caractère de l’entrée
            assert!(e.idx() < bruit.chars().count(), "bruit={bruit:?} idx={}", e.idx());
        }
    }
}

#[test]
fn fuzz_safe_somme_balancee_anti_pile() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    let expr = somme_balancee("1/2", 800);
    budget(t0, max);

    let v = calc(&expr, AngleUnit::Rad).unwrap_or_else(|e| panic!("err: {e}"));

    // 800*(1/2) = 400
    assert_eq!(v.to_string(), "400");
    budget(t0, max);
}

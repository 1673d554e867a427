// src/main.rs
//
// Calculatrice — point d’entrée terminal
// --------------------------------------
// - avec une expression : évaluation unique, code de sortie 1 en cas d’échec
// - sans expression     : console interactive (voir app/console.rs)
//
// Journalisation : RUST_LOG=debug (ou trace) via pretty_env_logger.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use calculatrice_pratt::app::{console, Session};
use calculatrice_pratt::noyau::reglages::PRECISION_DEFAUT;
use calculatrice_pratt::noyau::{AngleUnit, Reglages};

/// Calculatrice décimale en précision arbitraire (évaluateur Pratt).
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Chiffres significatifs du résultat (borné à 1..=1000).
    #[arg(short, long, default_value_t = PRECISION_DEFAUT)]
    precision: usize,

    /// Angles en degrés (radians par défaut).
    #[arg(short, long)]
    deg: bool,

    /// Expression à évaluer une fois ; sans elle, console interactive.
    expression: Option<String>,
}

fn main() -> ExitCode {
    pretty_env_logger::init();

    let args = Args::parse();
    let unite = if args.deg {
        AngleUnit::Deg
    } else {
        AngleUnit::Rad
    };
    let mut session = Session::new(Reglages::with_precision(args.precision), unite);

    match args.expression {
        Some(expr) => {
            session.set_entree(expr);
            match session.crunch(false) {
                Some(v) => {
                    println!("{v}");
                    ExitCode::SUCCESS
                }
                None => {
                    if let Some(e) = &session.erreur {
                        eprintln!("{e}");
                    }
                    ExitCode::FAILURE
                }
            }
        }
        None => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            match console::boucle(&mut session, stdin.lock(), &mut stdout) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("erreur d’entrée/sortie: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

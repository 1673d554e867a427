// src/app/console.rs
//
// Console ligne à ligne
// ---------------------
// - une ligne = une expression, évaluée puis rangée dans ANS
// - :deg / :rad  unité d’angle
// - :m           range ANS dans M (réévalue d’abord si l’entrée n’est plus propre)
// - :p N         précision N chiffres (bornée)
// - :ac          efface entrée et registres
// - :q           quitter
//
// Les erreurs lexicales sont surlignées (^) sous la position fautive.

use std::io::{self, BufRead, Write};

use crate::noyau::{prettify, AngleUnit, Decimal, ErreurCalcul};

use super::etat::Session;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reponse {
    /// Rendu canonique de l’entrée + valeur
    Valeur { rendu: String, valeur: String },
    Erreur(String),
    Info(String),
    Rien,
    Quitter,
}

/// Traite une ligne (commande ou expression).
pub fn traite_ligne(session: &mut Session, ligne: &str) -> Reponse {
    let ligne = ligne.trim();

    match ligne {
        "" => Reponse::Rien,
        ":q" => Reponse::Quitter,
        ":deg" => {
            session.set_unite(AngleUnit::Deg);
            Reponse::Info("angles en degrés".into())
        }
        ":rad" => {
            session.set_unite(AngleUnit::Rad);
            Reponse::Info("angles en radians".into())
        }
        ":ac" => {
            session.clear_all();
            Reponse::Info("entrée et registres effacés".into())
        }
        ":m" => memorise(session),
        _ if ligne.starts_with(":p") => precision(session, &ligne[2..]),
        _ => {
            session.set_entree(ligne);
            crunch(session, false)
        }
    }
}

fn crunch(session: &mut Session, save_to_ind: bool) -> Reponse {
    if session.entree.trim().is_empty() {
        return Reponse::Erreur("entrée vide".into());
    }

    match session.crunch(save_to_ind) {
        Some(v) => valeur(session, &v),
        None => Reponse::Erreur(message_erreur(&session.entree, session.erreur.as_ref())),
    }
}

/// ANS correspond déjà à l’entrée : pas de seconde évaluation.
fn memorise(session: &mut Session) -> Reponse {
    if !session.propre {
        return crunch(session, true);
    }

    session.ind = session.ans.clone();
    valeur(session, &session.ans)
}

fn precision(session: &mut Session, arg: &str) -> Reponse {
    match arg.trim().parse::<usize>() {
        Ok(n) => {
            session.set_precision(n);
            Reponse::Info(format!("précision : {} chiffres", session.reglages.precision))
        }
        Err(_) => Reponse::Erreur(format!("précision invalide : {:?}", arg.trim())),
    }
}

fn valeur(session: &Session, v: &Decimal) -> Reponse {
    Reponse::Valeur {
        rendu: prettify(&session.entree).unwrap_or_else(|_| session.entree.clone()),
        valeur: v.to_string(),
    }
}

fn message_erreur(entree: &str, erreur: Option<&ErreurCalcul>) -> String {
    match erreur {
        Some(ErreurCalcul::Lexicale(e)) => {
            format!("{entree}\n{}^\n{e}", " ".repeat(e.idx()))
        }
        Some(e) => e.to_string(),
        None => "erreur inconnue".into(),
    }
}

/// Boucle interactive ; rend la main sur `:q` ou en fin d’entrée.
pub fn boucle<R: BufRead, W: Write>(
    session: &mut Session,
    entree: R,
    sortie: &mut W,
) -> io::Result<()> {
    write!(sortie, "[{}] > ", session.unite.label())?;
    sortie.flush()?;

    for ligne in entree.lines() {
        match traite_ligne(session, &ligne?) {
            Reponse::Quitter => break,
            Reponse::Valeur { rendu, valeur } => writeln!(sortie, "{rendu}\n= {valeur}")?,
            Reponse::Erreur(msg) => writeln!(sortie, "{msg}")?,
            Reponse::Info(msg) => writeln!(sortie, "({msg})")?,
            Reponse::Rien => {}
        }
        write!(sortie, "[{}] > ", session.unite.label())?;
        sortie.flush()?;
    }

    writeln!(sortie)?;
    Ok(())
}

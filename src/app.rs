// src/app.rs
//
// Calculatrice — hôte terminal
// ----------------------------
// Rôle:
// - Déclarer les sous-modules (etat.rs + console.rs)
// - Ré-exporter Session (pour main.rs: use calculatrice_pratt::app::Session;)
//
// Le noyau ne garde aucun état : registres, entrée et unité vivent dans Session.

pub mod console;
pub mod etat;

pub use etat::Session;

//! Error types for `medcert-core`.
//!
//! Display strings are French: they travel to the caller verbatim inside the
//! JSON `error` field and the deployed frontend shows them to end users.

use thiserror::Error;

use crate::schema::Table;

#[derive(Debug, Error)]
pub enum Error {
  #[error(
    "Table non valide: {0:?}. Tables valides: arrets_travail, prolongation, \
     cbv, antirabique, dece"
  )]
  UnknownTable(String),

  /// The generic update path takes four tables only; death certificates
  /// have a dedicated update endpoint with partial semantics.
  #[error(
    "Table non valide: {0:?}. Tables valides: arrets_travail, prolongation, \
     cbv, antirabique"
  )]
  InvalidUpdateTarget(String),

  #[error("Format de date invalide. Utilisez AAAA-MM-JJ.")]
  InvalidDateFormat(String),

  #[error("Champ obligatoire manquant: {0}")]
  MissingField(&'static str),

  #[error("Valeur invalide pour le champ {0}")]
  InvalidField(&'static str),

  #[error("ID de l'enregistrement manquant")]
  MissingId,

  #[error("Aucune donnée exploitable dans la requête")]
  EmptyPayload,

  #[error(
    "Un enregistrement identique existe déjà dans la table {} \
     (tous les champs sont identiques)",
    .0.wire_name()
  )]
  DuplicateRecord(Table),

  #[error("Aucun enregistrement trouvé avec cet ID")]
  RecordNotFound(Table, i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

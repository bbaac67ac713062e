//! Integration tests for `SqliteStore` against an in-memory database.

use medcert_core::{
  Record, Table, error::Error as CoreError, store::CertificateStore,
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn record(value: serde_json::Value) -> Record {
  Record::from_value(value).expect("JSON object")
}

/// A valid create payload for each dedup-checked table.
fn sample(table: Table) -> Record {
  match table {
    Table::WorkStoppage | Table::Extension => record(json!({
      "nom": "Benali",
      "prenom": "Amine",
      "medecin": "Dr. X",
      "nombre_jours": 5,
      "date_certificat": "2024-03-01",
    })),
    Table::HealthCheck => record(json!({
      "nom": "Cherif",
      "prenom": "Lina",
      "medecin": "Dr. Y",
      "date_certificat": "2024-03-02",
      "heure": "09:30",
      "titre": "Aptitude",
    })),
    Table::AntiRabies => record(json!({
      "nom": "Saidi",
      "prenom": "Karim",
      "medecin": "Dr. Z",
      "classe": "II",
      "type_de_vaccin": "VERO",
      "shema": "Zagreb",
      "date_de_certificat": "2024-03-03",
      "animal": "chien",
    })),
    Table::Death => record(json!({
      "nom": "Mansouri",
      "prenom": "Omar",
      "date_deces": "2024-03-04",
      "causeDeces": "naturelle",
    })),
  }
}

fn range_dates(table: Table) -> (&'static str, &'static str) {
  match table {
    Table::WorkStoppage | Table::Extension => ("2024-03-01", "2024-03-01"),
    Table::HealthCheck => ("2024-03-02", "2024-03-02"),
    Table::AntiRabies => ("2024-03-03", "2024-03-03"),
    Table::Death => ("2024-03-04", "2024-03-04"),
  }
}

// ─── Create + duplicate detection ────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_ids_and_stamps_created_at() {
  let s = store().await;

  let id = s.create(Table::WorkStoppage, sample(Table::WorkStoppage)).await.unwrap();
  assert!(id >= 1);

  let result = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(result.total, 1);
  assert_eq!(result.returned(), 1);

  let row = &result.rows[0];
  assert_eq!(row.get("id").and_then(|v| v.as_i64()), Some(id));
  assert_eq!(row.get("nom").and_then(|v| v.as_str()), Some("Benali"));
  assert_eq!(row.get("prenom").and_then(|v| v.as_str()), Some("Amine"));
  assert_eq!(row.get("nombre_jours").and_then(|v| v.as_i64()), Some(5));
  // Server-stamped, formatted `YYYY-MM-DD HH:MM:SS`.
  let created = row.get("created_at").and_then(|v| v.as_str()).unwrap();
  assert_eq!(created.len(), 19);
}

#[tokio::test]
async fn identical_create_rejected_for_all_dedup_tables() {
  let s = store().await;

  for table in [
    Table::WorkStoppage,
    Table::Extension,
    Table::HealthCheck,
    Table::AntiRabies,
  ] {
    s.create(table, sample(table)).await.unwrap();
    let err = s.create(table, sample(table)).await.unwrap_err();
    assert!(
      matches!(err, Error::Core(CoreError::DuplicateRecord(t)) if t == table),
      "expected duplicate rejection for {table}"
    );

    // Exactly one row stored.
    let (start, end) = range_dates(table);
    let result = s.range_query(table, start, end).await.unwrap();
    assert_eq!(result.total, 1, "one row expected in {table}");
  }
}

#[tokio::test]
async fn duplicate_check_treats_absent_and_empty_as_equal() {
  let s = store().await;

  let mut first = sample(Table::WorkStoppage);
  first.insert("date_naissance", json!(""));
  s.create(Table::WorkStoppage, first).await.unwrap();

  // Same tuple with the optional field absent instead of empty.
  let err = s
    .create(Table::WorkStoppage, sample(Table::WorkStoppage))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateRecord(_))));
}

#[tokio::test]
async fn differing_field_is_not_a_duplicate() {
  let s = store().await;

  s.create(Table::WorkStoppage, sample(Table::WorkStoppage)).await.unwrap();

  let mut other = sample(Table::WorkStoppage);
  other.insert("nombre_jours", json!(10));
  s.create(Table::WorkStoppage, other).await.unwrap();

  let result = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(result.total, 2);
}

#[tokio::test]
async fn anti_rabies_missing_required_class_fails() {
  let s = store().await;

  let payload = record(json!({
    "nom": "Saidi",
    "prenom": "Karim",
    "medecin": "Dr. Z",
    "type_de_vaccin": "VERO",
    "shema": "Zagreb",
    "date_de_certificat": "2024-03-03",
  }));

  let err = s.create(Table::AntiRabies, payload).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MissingField("classe"))));
}

#[tokio::test]
async fn day_count_must_be_a_positive_integer() {
  let s = store().await;

  let mut payload = sample(Table::WorkStoppage);
  payload.insert("nombre_jours", json!(0));
  let err = s.create(Table::WorkStoppage, payload).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::InvalidField("nombre_jours"))
  ));
}

// ─── Range queries ───────────────────────────────────────────────────────────

#[tokio::test]
async fn inverted_interval_returns_empty_not_error() {
  let s = store().await;
  s.create(Table::WorkStoppage, sample(Table::WorkStoppage)).await.unwrap();

  let result = s
    .range_query(Table::WorkStoppage, "2024-03-02", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(result.total, 0);
  assert!(result.rows.is_empty());
}

#[tokio::test]
async fn malformed_date_rejected_for_every_table() {
  let s = store().await;

  for table in Table::ALL {
    let err = s
      .range_query(table, "2024/01/01", "2024-01-31")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidDateFormat(_))));

    let err = s
      .range_query(table, "2024-01-01", "31-01-2024")
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Core(CoreError::InvalidDateFormat(_))));
  }
}

#[tokio::test]
async fn range_orders_by_date_desc_then_names_asc() {
  let s = store().await;

  for (nom, prenom, date) in [
    ("Ziani", "Mohamed", "2024-03-01"),
    ("Benali", "Amine", "2024-03-05"),
    ("Benali", "Yacine", "2024-03-01"),
    ("Aissa", "Nour", "2024-03-01"),
  ] {
    let payload = record(json!({
      "nom": nom,
      "prenom": prenom,
      "medecin": "Dr. X",
      "nombre_jours": 3,
      "date_certificat": date,
    }));
    s.create(Table::WorkStoppage, payload).await.unwrap();
  }

  let result = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-31")
    .await
    .unwrap();
  assert_eq!(result.total, 4);

  let keys: Vec<(String, String, String)> = result
    .rows
    .iter()
    .map(|r| {
      (
        r.get("date_certificat").unwrap().as_str().unwrap().to_owned(),
        r.get("nom").unwrap().as_str().unwrap().to_owned(),
        r.get("prenom").unwrap().as_str().unwrap().to_owned(),
      )
    })
    .collect();
  assert_eq!(keys[0].0, "2024-03-05");
  assert_eq!(
    &keys[1..],
    &[
      ("2024-03-01".into(), "Aissa".into(), "Nour".into()),
      ("2024-03-01".into(), "Benali".into(), "Amine".into()),
      ("2024-03-01".into(), "Benali".into(), "Yacine".into()),
    ]
  );
}

// ─── Updates ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_without_id_fails() {
  let s = store().await;
  let err = s
    .update(Table::WorkStoppage, sample(Table::WorkStoppage))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MissingId)));
}

#[tokio::test]
async fn update_nonexistent_id_fails_and_mutates_nothing() {
  let s = store().await;
  s.create(Table::WorkStoppage, sample(Table::WorkStoppage)).await.unwrap();

  let mut payload = sample(Table::WorkStoppage);
  payload.insert("id", json!(999));
  payload.insert("nom", json!("Autre"));
  let err = s.update(Table::WorkStoppage, payload).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::RecordNotFound(Table::WorkStoppage, 999))
  ));

  let result = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(result.rows[0].get("nom").unwrap().as_str(), Some("Benali"));
}

#[tokio::test]
async fn update_rewrites_every_column() {
  let s = store().await;

  let mut payload = sample(Table::WorkStoppage);
  payload.insert("age", json!(40));
  let id = s.create(Table::WorkStoppage, payload).await.unwrap();

  // Partial payload on a non-death table: unnamed fields become NULL.
  let mut update = sample(Table::WorkStoppage);
  update.insert("id", json!(id));
  update.insert("nombre_jours", json!(8));
  s.update(Table::WorkStoppage, update).await.unwrap();

  let row = &s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap()
    .rows[0];
  assert_eq!(row.get("nombre_jours").unwrap().as_i64(), Some(8));
  assert!(row.get("age").unwrap().is_null());
}

#[tokio::test]
async fn extension_updates_target_the_extension_table() {
  let s = store().await;

  let stoppage_id =
    s.create(Table::WorkStoppage, sample(Table::WorkStoppage)).await.unwrap();
  let extension_id =
    s.create(Table::Extension, sample(Table::Extension)).await.unwrap();

  let mut update = sample(Table::Extension);
  update.insert("id", json!(extension_id));
  update.insert("nom", json!("Modifié"));
  s.update(Table::Extension, update).await.unwrap();

  let extensions = s
    .range_query(Table::Extension, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(extensions.rows[0].get("nom").unwrap().as_str(), Some("Modifié"));

  // The work-stoppage row with the same layout is untouched.
  let stoppages = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(
    stoppages.rows[0].get("id").unwrap().as_i64(),
    Some(stoppage_id)
  );
  assert_eq!(stoppages.rows[0].get("nom").unwrap().as_str(), Some("Benali"));
}

// ─── Deletes ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_semantics() {
  let s = store().await;
  let id = s
    .create(Table::WorkStoppage, sample(Table::WorkStoppage))
    .await
    .unwrap();

  let err = s.delete(Table::WorkStoppage, 999).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::RecordNotFound(Table::WorkStoppage, 999))
  ));

  s.delete(Table::WorkStoppage, id).await.unwrap();

  // Gone: a second delete finds nothing, and neither does a range query.
  let err = s.delete(Table::WorkStoppage, id).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::RecordNotFound(_, _))));
  let result = s
    .range_query(Table::WorkStoppage, "2024-03-01", "2024-03-01")
    .await
    .unwrap();
  assert_eq!(result.total, 0);
}

#[tokio::test]
async fn delete_with_zero_id_is_missing_id() {
  let s = store().await;
  let err = s.delete(Table::Death, 0).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MissingId)));
}

// ─── Death certificates ──────────────────────────────────────────────────────

#[tokio::test]
async fn death_create_drops_unrecognized_fields() {
  let s = store().await;

  let mut payload = sample(Table::Death);
  payload.insert("champ_inconnu", json!("ignoré"));
  s.create(Table::Death, payload).await.unwrap();

  let result = s
    .range_query(Table::Death, "2024-03-04", "2024-03-04")
    .await
    .unwrap();
  assert_eq!(result.total, 1);
  assert!(result.rows[0].get("champ_inconnu").is_none());
}

#[tokio::test]
async fn death_create_with_no_recognized_fields_fails() {
  let s = store().await;

  let err = s
    .create(Table::Death, record(json!({ "champ_inconnu": "x" })))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::EmptyPayload)));

  let err = s.create(Table::Death, Record::new()).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::EmptyPayload)));
}

#[tokio::test]
async fn death_create_is_never_duplicate_checked() {
  let s = store().await;
  s.create(Table::Death, sample(Table::Death)).await.unwrap();
  s.create(Table::Death, sample(Table::Death)).await.unwrap();

  let result = s
    .range_query(Table::Death, "2024-03-04", "2024-03-04")
    .await
    .unwrap();
  assert_eq!(result.total, 2);
}

#[tokio::test]
async fn death_aliases_synchronized_both_ways() {
  let s = store().await;

  // Written under the display spelling, stored under both.
  let payload = record(json!({
    "nom": "Mansouri",
    "dateDeces": "2024-04-10",
    "heureDeces": "14:30",
  }));
  s.create(Table::Death, payload).await.unwrap();

  let result = s
    .range_query(Table::Death, "2024-04-10", "2024-04-10")
    .await
    .unwrap();
  assert_eq!(result.total, 1);
  let row = &result.rows[0];
  assert_eq!(row.get("date_deces").unwrap().as_str(), Some("2024-04-10"));
  assert_eq!(row.get("dateDeces").unwrap().as_str(), Some("2024-04-10"));
  assert_eq!(row.get("heure_deces").unwrap().as_str(), Some("14:30"));
  assert_eq!(row.get("heureDeces").unwrap().as_str(), Some("14:30"));
}

#[tokio::test]
async fn death_partial_update_leaves_other_fields_alone() {
  let s = store().await;
  let id = s.create(Table::Death, sample(Table::Death)).await.unwrap();

  let update = record(json!({ "id": id, "causeDeces": "accidentelle" }));
  s.update_death(update).await.unwrap();

  let row = &s
    .range_query(Table::Death, "2024-03-04", "2024-03-04")
    .await
    .unwrap()
    .rows[0];
  assert_eq!(row.get("causeDeces").unwrap().as_str(), Some("accidentelle"));
  assert_eq!(row.get("nom").unwrap().as_str(), Some("Mansouri"));
  assert_eq!(row.get("prenom").unwrap().as_str(), Some("Omar"));
}

#[tokio::test]
async fn death_update_requires_id_and_payload() {
  let s = store().await;

  let err = s
    .update_death(record(json!({ "causeDeces": "x" })))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MissingId)));

  let err = s
    .update_death(record(json!({ "id": 1, "champ_inconnu": "x" })))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::EmptyPayload)));

  let err = s
    .update_death(record(json!({ "id": 999, "causeDeces": "x" })))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::RecordNotFound(Table::Death, 999))
  ));
}

// ─── Death listing ───────────────────────────────────────────────────────────

#[tokio::test]
async fn list_death_on_empty_table() {
  let s = store().await;

  let page = s.list_death(0, 20).await.unwrap();
  assert_eq!(page.total, 0);
  assert_eq!(page.returned(), 0);
  assert!(!page.has_more());
  assert_eq!(page.offset, 0);
  assert_eq!(page.limit, 20);
}

#[tokio::test]
async fn list_death_paginates() {
  let s = store().await;
  for i in 0..3 {
    let payload = record(json!({
      "nom": format!("Nom{i}"),
      "date_deces": "2024-03-04",
    }));
    s.create(Table::Death, payload).await.unwrap();
  }

  let first = s.list_death(0, 2).await.unwrap();
  assert_eq!(first.total, 3);
  assert_eq!(first.returned(), 2);
  assert!(first.has_more());

  let second = s.list_death(2, 2).await.unwrap();
  assert_eq!(second.total, 3);
  assert_eq!(second.returned(), 1);
  assert!(!second.has_more());
}

// ─── Migrations ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn anti_rabies_creation_time_column_exists_after_open() {
  let s = store().await;

  // The v2 migration column is recognized on write and returned on read.
  let mut payload = sample(Table::AntiRabies);
  payload.insert("heure_creation", json!("08:15"));
  s.create(Table::AntiRabies, payload).await.unwrap();

  let result = s
    .range_query(Table::AntiRabies, "2024-03-03", "2024-03-03")
    .await
    .unwrap();
  assert_eq!(
    result.rows[0].get("heure_creation").unwrap().as_str(),
    Some("08:15")
  );
}

#[tokio::test]
async fn creation_time_excluded_from_duplicate_predicate() {
  let s = store().await;

  let mut first = sample(Table::AntiRabies);
  first.insert("heure_creation", json!("08:15"));
  s.create(Table::AntiRabies, first).await.unwrap();

  let mut second = sample(Table::AntiRabies);
  second.insert("heure_creation", json!("17:45"));
  let err = s.create(Table::AntiRabies, second).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Core(CoreError::DuplicateRecord(Table::AntiRabies))
  ));
}

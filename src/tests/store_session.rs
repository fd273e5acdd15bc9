use crate::model::{BillPayload, BillStatus, User};
use crate::session::Storage;
use crate::store::{ApiError, BillsApi, FailingStore, MockStore, StoreCall};
use crate::{Error, Result, fixtures};

fn sample_payload() -> BillPayload {
    BillPayload {
        email: "a@a".into(),
        bill_type: "Transports".into(),
        name: "taxi".into(),
        amount: Some(42),
        date: "2023-05-01".into(),
        vat: "8".into(),
        pct: 20,
        commentary: "".into(),
        file_url: "https://localhost:3456/images/test.jpg".into(),
        file_name: "test.jpg".into(),
        status: BillStatus::Pending,
    }
}

#[test]
fn mock_store_lists_the_seed_bills() -> Result<()> {
    let store = MockStore::new();
    let bills = store.list().expect("seeded list");
    assert_eq!(bills.len(), 4);
    assert!(bills.iter().any(|bill| bill.date == "2004-04-04"));
    assert_eq!(store.calls(), vec![StoreCall::List]);
    Ok(())
}

#[test]
fn mock_store_create_answers_the_canonical_receipt() {
    let store = MockStore::empty();
    let receipt = store.create("note.png", "a@a").expect("create accepted");
    assert_eq!(receipt.file_url, "https://localhost:3456/images/test.jpg");
    assert_eq!(receipt.key, "1234");
}

#[test]
fn mock_store_update_upserts_by_id() {
    let store = MockStore::empty();
    let payload = sample_payload();
    let created = store.update("b1", &payload).expect("insert");
    assert_eq!(created.id, "b1");
    assert_eq!(created.amount, 42);

    let mut changed = payload.clone();
    changed.name = "taxi retour".into();
    store.update("b1", &changed).expect("replace");
    let bills = store.list().expect("list");
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].name, "taxi retour");
}

#[test]
fn failing_store_rejects_with_its_status() {
    let store = FailingStore::new(404);
    let err = store.list().expect_err("must fail");
    assert_eq!(err, ApiError::Http { status: 404 });
    assert_eq!(err.to_string(), "Erreur 404");
    assert_eq!(
        FailingStore::new(500).list().expect_err("must fail").to_string(),
        "Erreur 500"
    );
}

#[test]
fn storage_round_trips_the_user_record() -> Result<()> {
    let mut storage = Storage::new();
    assert_eq!(storage.user()?, None);
    storage.set_user(&User::employee("a@a"))?;
    let user = storage.user()?.expect("stored user");
    assert!(user.is_employee());
    assert_eq!(user.email, "a@a");
    Ok(())
}

#[test]
fn corrupted_user_record_is_a_storage_error() {
    let mut storage = Storage::new();
    storage.set_item("user", "{not json");
    assert!(matches!(storage.user(), Err(Error::Storage(_))));
}

#[test]
fn user_without_email_deserializes_with_an_empty_one() -> Result<()> {
    let mut storage = Storage::new();
    storage.set_item("user", r#"{"type":"Employee"}"#);
    let user = storage.user()?.expect("stored user");
    assert!(user.is_employee());
    assert_eq!(user.email, "");
    Ok(())
}

#[test]
fn bill_serializes_in_the_backend_shape() -> Result<()> {
    let bill = fixtures::bills().remove(0);
    let json = serde_json::to_value(&bill).expect("serializable");
    assert_eq!(json["id"], "47qAXb6fIm2zOKkLzMro");
    assert_eq!(json["type"], "Hôtel et logement");
    assert_eq!(json["status"], "pending");
    assert!(json["fileUrl"].is_string());
    assert!(json["fileName"].is_string());
    assert!(json.get("file_url").is_none());

    let back: crate::model::Bill = serde_json::from_value(json).expect("round trip");
    assert_eq!(back, bill);
    Ok(())
}

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::debug;

use crate::fixtures;
use crate::model::{Bill, BillPayload, BillStatus};

/// Backend failure, keyed by HTTP status. The `Display` form is exactly
/// the text the error page renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Erreur {status}")]
    Http { status: u16 },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Answer to a receipt upload: where the file landed and the key of the
/// draft bill created around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReceipt {
    pub file_url: String,
    pub key: String,
}

/// Remote CRUD access to the "bills" resource.
pub trait BillsApi {
    fn list(&self) -> ApiResult<Vec<Bill>>;
    fn create(&self, file_name: &str, email: &str) -> ApiResult<CreateReceipt>;
    fn update(&self, id: &str, payload: &BillPayload) -> ApiResult<Bill>;
}

/// One recorded call against a store, kept so tests can assert on what the
/// containers actually sent.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreCall {
    List,
    Create { file_name: String, email: String },
    Update { id: String, payload: BillPayload },
}

/// In-memory stand-in for the backend, seeded with the canonical fixture
/// bills. Records every call.
pub struct MockStore {
    bills: RefCell<Vec<Bill>>,
    calls: RefCell<Vec<StoreCall>>,
}

impl MockStore {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            bills: RefCell::new(fixtures::bills()),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn empty() -> Rc<Self> {
        Rc::new(Self {
            bills: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn with_bills(bills: Vec<Bill>) -> Rc<Self> {
        Rc::new(Self {
            bills: RefCell::new(bills),
            calls: RefCell::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.borrow().clone()
    }

    pub fn last_update(&self) -> Option<(String, BillPayload)> {
        self.calls.borrow().iter().rev().find_map(|call| match call {
            StoreCall::Update { id, payload } => Some((id.clone(), payload.clone())),
            _ => None,
        })
    }
}

impl BillsApi for MockStore {
    fn list(&self) -> ApiResult<Vec<Bill>> {
        self.calls.borrow_mut().push(StoreCall::List);
        let bills = self.bills.borrow().clone();
        debug!(count = bills.len(), "mock store list");
        Ok(bills)
    }

    fn create(&self, file_name: &str, email: &str) -> ApiResult<CreateReceipt> {
        self.calls.borrow_mut().push(StoreCall::Create {
            file_name: file_name.to_string(),
            email: email.to_string(),
        });
        debug!(file_name, "mock store create");
        Ok(CreateReceipt {
            file_url: "https://localhost:3456/images/test.jpg".into(),
            key: "1234".into(),
        })
    }

    fn update(&self, id: &str, payload: &BillPayload) -> ApiResult<Bill> {
        self.calls.borrow_mut().push(StoreCall::Update {
            id: id.to_string(),
            payload: payload.clone(),
        });
        debug!(id, "mock store update");
        let bill = Bill {
            id: id.to_string(),
            bill_type: payload.bill_type.clone(),
            name: payload.name.clone(),
            email: payload.email.clone(),
            amount: payload.amount.unwrap_or(0),
            date: payload.date.clone(),
            vat: payload.vat.clone(),
            pct: payload.pct,
            status: BillStatus::Pending,
            commentary: payload.commentary.clone(),
            file_url: payload.file_url.clone(),
            file_name: payload.file_name.clone(),
        };
        let mut bills = self.bills.borrow_mut();
        match bills.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = bill.clone(),
            None => bills.push(bill.clone()),
        }
        Ok(bill)
    }
}

/// A store whose every operation rejects with the given HTTP status.
/// Used by the 404/500 journeys.
pub struct FailingStore {
    pub status: u16,
}

impl FailingStore {
    pub fn new(status: u16) -> Rc<Self> {
        Rc::new(Self { status })
    }
}

impl BillsApi for FailingStore {
    fn list(&self) -> ApiResult<Vec<Bill>> {
        Err(ApiError::Http {
            status: self.status,
        })
    }

    fn create(&self, _file_name: &str, _email: &str) -> ApiResult<CreateReceipt> {
        Err(ApiError::Http {
            status: self.status,
        })
    }

    fn update(&self, _id: &str, _payload: &BillPayload) -> ApiResult<Bill> {
        Err(ApiError::Http {
            status: self.status,
        })
    }
}

use serde::{Deserialize, Serialize};

/// One expense-report entry as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    pub email: String,
    pub amount: i64,
    /// ISO-like date string; kept raw, the display layer formats it.
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub status: BillStatus,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Pending,
    Accepted,
    Refused,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Refused => "refused",
        }
    }
}

/// What the submission forwarder sends to the backend. `amount` is absent
/// when the field did not parse; `pct` falls back to 20.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPayload {
    pub email: String,
    #[serde(rename = "type")]
    pub bill_type: String,
    pub name: String,
    pub amount: Option<i64>,
    pub date: String,
    pub vat: String,
    pub pct: i64,
    pub commentary: String,
    pub file_url: String,
    pub file_name: String,
    pub status: BillStatus,
}

/// The logged-in user record kept in the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "type")]
    pub user_type: String,
    #[serde(default)]
    pub email: String,
}

impl User {
    pub fn employee(email: &str) -> Self {
        Self {
            user_type: "Employee".into(),
            email: email.into(),
        }
    }

    pub fn is_employee(&self) -> bool {
        self.user_type == "Employee"
    }
}

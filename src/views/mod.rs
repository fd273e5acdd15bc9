//! Markup renderers. Each view builds an HTML fragment string; nothing in
//! here touches the document or the backend.

pub mod bills;
pub mod layout;
pub mod new_bill;

//! DOM wiring. Containers attach handlers to the rendered views, read the
//! document on events, talk to the backend client and navigate.

pub mod bills;
pub mod new_bill;

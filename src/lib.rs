//! Employee expense-report front-end, exercised end to end under plain
//! `cargo test`.
//!
//! The application half is the familiar pair of pages: a bills list
//! (fetch, sort, receipt modal) and a new-bill form (file-extension gate,
//! submission forwarding). The substrate half is a deterministic
//! in-process document: an arena DOM with a small fragment parser, a CSS
//! selector subset, listener dispatch and a FIFO task queue standing in
//! for asynchronous backend completions. Handlers are Rust closures;
//! there is no script engine and no real browser anywhere.
//!
//! ```
//! use frais::{MockStore, RoutePath, Window};
//!
//! fn main() -> frais::Result<()> {
//!     let mut win = Window::new(MockStore::new())?;
//!     win.storage_mut().set_user(&frais::User::employee("a@a"))?;
//!     win.navigate(RoutePath::Bills)?;
//!     win.flush()?;
//!     win.assert_exists("[data-testid='tbody']")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error as ThisError;

pub mod containers;
mod dom;
mod event;
pub mod fixtures;
pub mod format;
mod html;
pub mod model;
mod page;
pub mod router;
mod selector;
pub mod session;
pub mod store;
pub mod views;

pub use dom::{FileUpload, NodeId};
pub use event::{EventState, Handler};
pub use model::{Bill, BillPayload, BillStatus, User};
pub use page::Window;
pub use router::RoutePath;
pub use session::Storage;
pub use store::{ApiError, ApiResult, BillsApi, CreateReceipt, FailingStore, MockStore, StoreCall};

pub type Result<T> = std::result::Result<T, Error>;

/// Harness and document errors. Backend failures are a separate type,
/// [`ApiError`]; containers render those instead of propagating them.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum Error {
    #[error("html parse error: {0}")]
    HtmlParse(String),
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    #[error("unsupported selector: {0}")]
    UnsupportedSelector(String),
    #[error("type mismatch for {selector}: expected {expected}, actual {actual}")]
    TypeMismatch {
        selector: String,
        expected: String,
        actual: String,
    },
    #[error(
        "assertion failed for {selector}: expected {expected}, actual {actual}, snippet {dom_snippet}"
    )]
    AssertionFailed {
        selector: String,
        expected: String,
        actual: String,
        dom_snippet: String,
    },
    #[error("dom misuse: {0}")]
    DomMisuse(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("unknown route: {0}")]
    UnknownRoute(String),
    #[error("bad pattern: {0}")]
    Pattern(String),
    #[error("task queue did not settle within {0} steps")]
    TaskStepLimit(usize),
}

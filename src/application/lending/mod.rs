mod document_guard;
mod errors;
mod lending_service;
mod overdue_loans;

pub use document_guard::{DEFAULT_PRUNE_THRESHOLD, DocumentGuard, DocumentGuards};
pub use errors::{LendingError, Result};
pub use lending_service::{
    ServiceDependencies, borrow_document, get_lending_status, get_loan, list_loans_for_user,
    return_document,
};
pub use overdue_loans::list_overdue_loans;

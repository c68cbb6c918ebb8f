pub mod clock;
pub mod document_catalog;
pub mod loan_repository;

pub use clock::Clock;
pub use document_catalog::DocumentCatalog;
pub use loan_repository::{LoanRepository, RepositoryError};

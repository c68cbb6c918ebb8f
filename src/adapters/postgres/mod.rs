pub mod document_catalog;
pub mod loan_repository;

// パブリックに型を再エクスポート
pub use document_catalog::DocumentCatalog as PostgresDocumentCatalog;
pub use loan_repository::LoanRepository as PostgresLoanRepository;

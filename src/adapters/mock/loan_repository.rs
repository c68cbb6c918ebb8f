use crate::domain::{DocumentId, LoanId, LoanRecord, UserId};
use crate::ports::loan_repository::{
    LoanRepository as LoanRepositoryTrait, RepositoryError, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// In-memory implementation of LoanRepository
///
/// Records are kept in insertion order behind a single mutex, so every
/// check-then-write happens atomically and readers never see a record
/// mid-update. Enforces the same single-active-loan rule as the
/// partial unique index of the PostgreSQL adapter.
#[derive(Debug, Default)]
pub struct LoanRepository {
    loans: Mutex<Vec<LoanRecord>>,
}

impl LoanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored record, oldest first.
    pub fn all(&self) -> Vec<LoanRecord> {
        self.loans().clone()
    }

    /// Number of records with no return timestamp for the document.
    pub fn active_count(&self, document_id: DocumentId) -> usize {
        self.loans()
            .iter()
            .filter(|loan| loan.document_id == document_id && loan.is_active())
            .count()
    }

    fn loans(&self) -> MutexGuard<'_, Vec<LoanRecord>> {
        self.loans.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl LoanRepositoryTrait for LoanRepository {
    async fn insert(&self, loan: LoanRecord) -> Result<()> {
        let mut loans = self.loans();

        if loan.is_active()
            && loans
                .iter()
                .any(|l| l.document_id == loan.document_id && l.is_active())
        {
            return Err(RepositoryError::ActiveLoanExists(loan.document_id));
        }

        loans.push(loan);
        Ok(())
    }

    async fn find_active_by_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<LoanRecord>> {
        Ok(self
            .loans()
            .iter()
            .find(|l| l.document_id == document_id && l.is_active())
            .cloned())
    }

    async fn find_latest_by_document(
        &self,
        document_id: DocumentId,
    ) -> Result<Option<LoanRecord>> {
        let loans = self.loans();
        let history = loans.iter().filter(|l| l.document_id == document_id);

        if let Some(active) = history.clone().find(|l| l.is_active()) {
            return Ok(Some(active.clone()));
        }

        Ok(history.max_by_key(|l| l.returned_at).cloned())
    }

    async fn mark_returned(
        &self,
        loan_id: LoanId,
        returned_at: DateTime<Utc>,
    ) -> Result<LoanRecord> {
        let mut loans = self.loans();
        let loan = loans
            .iter_mut()
            .find(|l| l.id == loan_id)
            .ok_or(RepositoryError::LoanNotFound(loan_id))?;

        if !loan.is_active() {
            return Err(RepositoryError::AlreadyReturned(loan_id));
        }

        loan.returned_at = Some(returned_at);
        Ok(loan.clone())
    }

    async fn get_by_id(&self, loan_id: LoanId) -> Result<Option<LoanRecord>> {
        Ok(self.loans().iter().find(|l| l.id == loan_id).cloned())
    }

    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<LoanRecord>> {
        let mut loans: Vec<LoanRecord> = self
            .loans()
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        loans.sort_by(|a, b| b.borrowed_at.cmp(&a.borrowed_at));
        Ok(loans)
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<LoanRecord>> {
        let mut loans: Vec<LoanRecord> = self
            .loans()
            .iter()
            .filter(|l| l.is_active() && l.due_at < now)
            .cloned()
            .collect();
        loans.sort_by_key(|l| l.due_at);
        Ok(loans)
    }
}

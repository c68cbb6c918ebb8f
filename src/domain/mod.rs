pub mod commands;
pub mod errors;
pub mod loan;
pub mod value_objects;

pub use errors::*;
pub use loan::{Availability, LendingStatus, LoanRecord, LoanStatus, ReturnedLoan};
pub use value_objects::*;

//! Loans and their installment payments.

pub mod service;
pub mod types;

pub use service::LoanService;
pub use types::{Loan, LoanState, NewLoan, Payment, PaymentReceipt, RecordPayment};

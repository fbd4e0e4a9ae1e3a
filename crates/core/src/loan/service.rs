//! Loan issuance, repayment and deletion.

use std::sync::Arc;

use lendfund_shared::types::{LoanId, PaymentId};
use rust_decimal::Decimal;

use super::types::{Loan, LoanState, NewLoan, Payment, PaymentReceipt, RecordPayment};
use crate::amortization::{AmortizationCalculator, InstallmentLine, Schedule};
use crate::clock::Clock;
use crate::error::LendingError;
use crate::ledger::{EntryKind, LedgerRegistrar, NewLedgerEntry, status};
use crate::store::LendingStore;

/// Loan lifecycle operations.
pub struct LoanService<S: ?Sized, C> {
    registrar: LedgerRegistrar<S, C>,
}

impl<S, C> LoanService<S, C>
where
    S: LendingStore + ?Sized,
    C: Clock,
{
    /// Creates a service over a store and a clock.
    pub fn new(store: Arc<S>, clock: C) -> Self {
        Self {
            registrar: LedgerRegistrar::new(store, clock),
        }
    }

    /// Installment schedule of a loan.
    pub fn schedule(loan: &Loan) -> Result<Schedule, LendingError> {
        Ok(AmortizationCalculator::calculate(&loan.schedule_request())?)
    }

    /// Loads a loan.
    ///
    /// # Errors
    ///
    /// Returns [`LendingError::LoanNotFound`] when absent.
    pub async fn get_loan(&self, loan_id: LoanId) -> Result<Loan, LendingError> {
        self.registrar
            .store()
            .find_loan(loan_id)
            .await?
            .ok_or(LendingError::LoanNotFound(loan_id))
    }

    /// Issues a loan and books its disbursement in the active period.
    ///
    /// The loan row and the `disbursed` expense entry are written together;
    /// nothing is written when no period covers the current instant.
    pub async fn issue_loan(&self, request: NewLoan) -> Result<Loan, LendingError> {
        if request.borrower.trim().is_empty() {
            return Err(LendingError::Validation("borrower is required".to_string()));
        }

        let now = self.registrar.clock().now();
        let loan = Loan {
            id: LoanId::new(),
            borrower: request.borrower.trim().to_string(),
            principal: request.principal,
            method: request.method,
            rate_percent: request.rate_percent,
            installment_count: request.installment_count,
            installments_remaining: request.installment_count,
            remaining_principal: request.principal,
            state: LoanState::Active,
            issued_at: now,
            last_payment_at: None,
        };
        loan.schedule_request().validate()?;

        let disbursement = self
            .registrar
            .resolve(
                NewLedgerEntry::new(
                    EntryKind::Expense,
                    status::DISBURSED,
                    format!("Disbursement of loan {} to {}", loan.id, loan.borrower),
                    loan.principal,
                )
                .at(now)
                .for_loan(loan.id),
            )
            .await?;

        self.registrar.store().create_loan(&loan, &disbursement).await?;

        tracing::info!(
            loan_id = %loan.id,
            period_id = %disbursement.period_id,
            principal = %loan.principal,
            method = %loan.method,
            "loan issued"
        );
        Ok(loan)
    }

    /// The schedule line the next payment settles, or `None` when paid off.
    pub async fn next_installment(&self, loan_id: LoanId) -> Result<Option<InstallmentLine>, LendingError> {
        let loan = self.get_loan(loan_id).await?;
        let Some(sequence) = loan.next_sequence() else {
            return Ok(None);
        };
        Ok(Self::schedule(&loan)?.line(sequence).copied())
    }

    /// Records the next installment of a loan.
    ///
    /// The amounts come from the loan's schedule line. The loan update, the
    /// payment row and the `confirmed` income entry are written as one unit.
    /// Paying the last installment zeroes the remaining principal and
    /// completes the loan.
    ///
    /// # Errors
    ///
    /// - [`LendingError::LoanNotFound`] for an unknown loan
    /// - [`LendingError::LoanAlreadyPaid`] when no installment is left
    /// - [`LendingError::NoActivePeriod`] when no period covers now
    pub async fn record_payment(&self, request: RecordPayment) -> Result<PaymentReceipt, LendingError> {
        if request.payment_type.trim().is_empty() {
            return Err(LendingError::Validation("payment type is required".to_string()));
        }

        let loan = self.get_loan(request.loan_id).await?;
        let Some(sequence) = loan.next_sequence() else {
            return Err(LendingError::LoanAlreadyPaid(loan.id));
        };
        let schedule = Self::schedule(&loan)?;
        let line = schedule.line(sequence).copied().ok_or_else(|| {
            LendingError::Validation(format!(
                "installment {sequence} is outside the schedule of loan {}",
                loan.id
            ))
        })?;

        let now = self.registrar.clock().now();
        let installments_remaining = loan.installments_remaining - 1;
        let (remaining_principal, state) = if installments_remaining == 0 {
            (Decimal::ZERO, LoanState::Completed)
        } else {
            ((loan.remaining_principal - line.capital).max(Decimal::ZERO), LoanState::Active)
        };

        let updated = Loan {
            installments_remaining,
            remaining_principal,
            state,
            last_payment_at: Some(now),
            ..loan
        };
        let payment = Payment {
            id: PaymentId::new(),
            loan_id: updated.id,
            paid_at: now,
            payment_type: request.payment_type.trim().to_string(),
            installment_number: sequence,
            amount: line.installment,
            interest_paid: line.interest,
            capital_paid: line.capital,
            installments_remaining,
            notes: request.notes,
        };
        let entry = self
            .registrar
            .resolve(
                NewLedgerEntry::new(
                    EntryKind::Income,
                    status::CONFIRMED,
                    format!("Installment #{sequence} of loan {}", updated.id),
                    line.installment,
                )
                .at(now)
                .for_loan(updated.id),
            )
            .await?;

        self.registrar
            .store()
            .apply_payment(&updated, &payment, &entry)
            .await?;

        tracing::info!(
            loan_id = %updated.id,
            installment = sequence,
            amount = %payment.amount,
            remaining = installments_remaining,
            "payment recorded"
        );
        Ok(PaymentReceipt {
            payment,
            loan: updated,
        })
    }

    /// Payments recorded for a loan.
    pub async fn payments(&self, loan_id: LoanId) -> Result<Vec<Payment>, LendingError> {
        Ok(self.registrar.store().list_payments(loan_id).await?)
    }

    /// Deletes a loan together with its payments and ledger entries.
    ///
    /// # Errors
    ///
    /// Returns [`LendingError::LoanNotFound`] when absent.
    pub async fn delete_loan(&self, loan_id: LoanId) -> Result<(), LendingError> {
        if !self.registrar.store().delete_loan(loan_id).await? {
            return Err(LendingError::LoanNotFound(loan_id));
        }
        tracing::info!(loan_id = %loan_id, "loan deleted");
        Ok(())
    }
}

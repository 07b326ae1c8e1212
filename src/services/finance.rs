use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{Expense, Invoice, NewExpense, NewInvoice};
use crate::errors::ServiceError;
use crate::store::HerdStore;

/// Revenue and expense roll-up for a reporting period. Month keys are
/// "YYYY-MM" so the maps iterate chronologically.
#[derive(Clone, Debug, Serialize)]
pub struct FinancialSummary {
    pub revenue_by_month: BTreeMap<String, Decimal>,
    pub expense_by_month: BTreeMap<String, Decimal>,
    pub expense_by_category: BTreeMap<String, Decimal>,
    pub total_revenue: Decimal,
    pub total_expenses: Decimal,
    pub net_profit: Decimal,
    /// Percentage of revenue kept as profit, one decimal; zero without revenue
    pub profit_margin: Decimal,
}

/// Invoicing and expense tracking. PDF rendering and charting belong to the
/// web layer; this service owns the arithmetic and the records.
#[derive(Clone)]
pub struct FinanceService {
    store: Arc<HerdStore>,
}

impl FinanceService {
    pub fn new(store: Arc<HerdStore>) -> Self {
        Self { store }
    }

    /// Creates an invoice, deriving totals from its per-pig lines.
    #[instrument(skip(self, input), fields(invoice_number = %input.invoice_number))]
    pub fn create_invoice(&self, owner_id: Uuid, input: NewInvoice) -> Result<Invoice, ServiceError> {
        input.validate()?;
        if input
            .lines
            .iter()
            .any(|line| line.weight_kg <= Decimal::ZERO || line.price_per_kg <= Decimal::ZERO)
        {
            return Err(ServiceError::Validation(
                "Invoice lines need positive weights and prices".to_string(),
            ));
        }
        if self
            .store
            .invoice_number_exists(owner_id, &input.invoice_number)
        {
            return Err(ServiceError::Conflict(format!(
                "Invoice {} already exists for this account",
                input.invoice_number
            )));
        }

        let num_of_pigs = input.lines.len() as u32;
        let total_weight_kg: Decimal = input.lines.iter().map(|l| l.weight_kg).sum();
        let total_price: Decimal = input
            .lines
            .iter()
            .map(|l| l.weight_kg * l.price_per_kg)
            .sum();
        let average_weight_kg = (total_weight_kg / Decimal::from(num_of_pigs)).round_dp(2);

        let invoice = Invoice {
            id: Uuid::new_v4(),
            owner_id,
            invoice_number: input.invoice_number,
            company_name: input.company_name,
            date: input.date,
            num_of_pigs,
            total_weight_kg: total_weight_kg.round_dp(2),
            average_weight_kg,
            total_price: total_price.round_dp(2),
            created_at: Utc::now(),
        };
        self.store.insert_invoice(invoice.clone());
        info!(
            invoice_id = %invoice.id,
            total_price = %invoice.total_price,
            "created invoice"
        );
        Ok(invoice)
    }

    pub fn list_invoices(&self, owner_id: Uuid) -> Vec<Invoice> {
        self.store.invoices_for_owner(owner_id)
    }

    pub fn delete_invoice(&self, owner_id: Uuid, invoice_id: Uuid) -> Result<(), ServiceError> {
        self.store
            .remove_invoice(owner_id, invoice_id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Invoice {} not found", invoice_id)))
    }

    #[instrument(skip(self, input), fields(receipt_number = %input.receipt_number))]
    pub fn record_expense(&self, owner_id: Uuid, input: NewExpense) -> Result<Expense, ServiceError> {
        input.validate()?;
        if input.amount <= Decimal::ZERO {
            return Err(ServiceError::Validation(
                "Expense amount must be positive".to_string(),
            ));
        }
        if self
            .store
            .receipt_number_exists(owner_id, &input.receipt_number)
        {
            return Err(ServiceError::Conflict(format!(
                "Receipt {} is already recorded for this account",
                input.receipt_number
            )));
        }

        let expense = Expense {
            id: Uuid::new_v4(),
            owner_id,
            date: input.date,
            amount: input.amount,
            receipt_number: input.receipt_number,
            category: input.category,
            vendor: input.vendor,
            description: input.description,
            created_at: Utc::now(),
        };
        self.store.insert_expense(expense.clone());
        info!(expense_id = %expense.id, amount = %expense.amount, "recorded expense");
        Ok(expense)
    }

    pub fn list_expenses(&self, owner_id: Uuid) -> Vec<Expense> {
        self.store.expenses_for_owner(owner_id)
    }

    pub fn delete_expense(&self, owner_id: Uuid, expense_id: Uuid) -> Result<(), ServiceError> {
        self.store
            .remove_expense(owner_id, expense_id)
            .map(|_| ())
            .ok_or_else(|| ServiceError::NotFound(format!("Expense {} not found", expense_id)))
    }

    /// Revenue against expenses over the trailing `period_days`, or over all
    /// time when `period_days` is `None`.
    #[instrument(skip(self))]
    pub fn financial_summary(
        &self,
        owner_id: Uuid,
        today: NaiveDate,
        period_days: Option<i64>,
    ) -> FinancialSummary {
        let cutoff = period_days.map(|days| today - Duration::days(days));
        let in_period = |date: NaiveDate| cutoff.map_or(true, |cut| date >= cut);

        let mut revenue_by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut expense_by_month: BTreeMap<String, Decimal> = BTreeMap::new();
        let mut expense_by_category: BTreeMap<String, Decimal> = BTreeMap::new();

        for invoice in self.store.invoices_for_owner(owner_id) {
            if !in_period(invoice.date) {
                continue;
            }
            let month = invoice.date.format("%Y-%m").to_string();
            *revenue_by_month.entry(month).or_insert(Decimal::ZERO) += invoice.total_price;
        }

        for expense in self.store.expenses_for_owner(owner_id) {
            if !in_period(expense.date) {
                continue;
            }
            let month = expense.date.format("%Y-%m").to_string();
            *expense_by_month.entry(month).or_insert(Decimal::ZERO) += expense.amount;
            *expense_by_category
                .entry(expense.category.to_string())
                .or_insert(Decimal::ZERO) += expense.amount;
        }

        let total_revenue: Decimal = revenue_by_month.values().copied().sum();
        let total_expenses: Decimal = expense_by_month.values().copied().sum();
        let net_profit = total_revenue - total_expenses;
        let profit_margin = if total_revenue > Decimal::ZERO {
            (net_profit / total_revenue * dec!(100)).round_dp(1)
        } else {
            Decimal::ZERO
        };

        FinancialSummary {
            revenue_by_month,
            expense_by_month,
            expense_by_category,
            total_revenue,
            total_expenses,
            net_profit,
            profit_margin,
        }
    }
}

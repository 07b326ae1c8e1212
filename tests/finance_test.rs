mod common;

use assert_matches::assert_matches;
use rust_decimal_macros::dec;

use common::{app, date, owner};
use herdbook::entities::{ExpenseCategory, InvoiceLine, NewExpense, NewInvoice};
use herdbook::ServiceError;

fn invoice_input(number: &str) -> NewInvoice {
    NewInvoice {
        invoice_number: number.to_string(),
        company_name: "Kanyama Butchery".to_string(),
        date: date(2024, 5, 10),
        lines: vec![
            InvoiceLine {
                weight_kg: dec!(62.5),
                price_per_kg: dec!(35.00),
            },
            InvoiceLine {
                weight_kg: dec!(71.0),
                price_per_kg: dec!(35.00),
            },
            InvoiceLine {
                weight_kg: dec!(66.5),
                price_per_kg: dec!(34.00),
            },
        ],
    }
}

fn expense_input(receipt: &str, amount: rust_decimal::Decimal, month_day: (u32, u32)) -> NewExpense {
    NewExpense {
        date: date(2024, month_day.0, month_day.1),
        amount,
        receipt_number: receipt.to_string(),
        category: ExpenseCategory::Feed,
        vendor: Some("Agrivet".to_string()),
        description: None,
    }
}

#[test]
fn invoice_totals_derive_from_lines() {
    let state = app();
    let owner_id = owner();

    let invoice = state
        .services
        .finance
        .create_invoice(owner_id, invoice_input("INV-2024-001"))
        .unwrap();
    assert_eq!(invoice.num_of_pigs, 3);
    assert_eq!(invoice.total_weight_kg, dec!(200.00));
    assert_eq!(invoice.average_weight_kg, dec!(66.67));
    // 62.5*35 + 71*35 + 66.5*34 = 2187.50 + 2485.00 + 2261.00
    assert_eq!(invoice.total_price, dec!(6933.50));
}

#[test]
fn invoice_numbers_are_unique_per_owner() {
    let state = app();
    let owner_id = owner();

    state
        .services
        .finance
        .create_invoice(owner_id, invoice_input("INV-2024-001"))
        .unwrap();
    assert_matches!(
        state
            .services
            .finance
            .create_invoice(owner_id, invoice_input("INV-2024-001")),
        Err(ServiceError::Conflict(_))
    );
    // Another account may reuse the number.
    assert!(state
        .services
        .finance
        .create_invoice(owner(), invoice_input("INV-2024-001"))
        .is_ok());
}

#[test]
fn invoices_reject_non_positive_lines() {
    let state = app();
    let mut input = invoice_input("INV-2024-002");
    input.lines[1].weight_kg = dec!(0);

    assert_matches!(
        state.services.finance.create_invoice(owner(), input),
        Err(ServiceError::Validation(_))
    );
}

#[test]
fn expenses_must_be_positive_and_unique() {
    let state = app();
    let owner_id = owner();

    assert_matches!(
        state
            .services
            .finance
            .record_expense(owner_id, expense_input("RCT-01", dec!(-10.00), (3, 5))),
        Err(ServiceError::Validation(_))
    );

    state
        .services
        .finance
        .record_expense(owner_id, expense_input("RCT-01", dec!(250.00), (3, 5)))
        .unwrap();
    assert_matches!(
        state
            .services
            .finance
            .record_expense(owner_id, expense_input("RCT-01", dec!(99.00), (3, 6))),
        Err(ServiceError::Conflict(_))
    );
}

#[test]
fn financial_summary_rolls_up_by_month_and_category() {
    let state = app();
    let owner_id = owner();
    let today = date(2024, 6, 1);

    state
        .services
        .finance
        .create_invoice(owner_id, invoice_input("INV-2024-001"))
        .unwrap();
    state
        .services
        .finance
        .record_expense(owner_id, expense_input("RCT-01", dec!(1500.00), (5, 2)))
        .unwrap();
    state
        .services
        .finance
        .record_expense(
            owner_id,
            NewExpense {
                date: date(2024, 4, 20),
                amount: dec!(433.50),
                receipt_number: "RCT-02".to_string(),
                category: ExpenseCategory::Veterinary,
                vendor: None,
                description: Some("vaccines".to_string()),
            },
        )
        .unwrap();

    let summary = state.services.finance.financial_summary(owner_id, today, None);
    assert_eq!(summary.total_revenue, dec!(6933.50));
    assert_eq!(summary.total_expenses, dec!(1933.50));
    assert_eq!(summary.net_profit, dec!(5000.00));
    // 5000 / 6933.50 = 72.115...% -> 72.1
    assert_eq!(summary.profit_margin, dec!(72.1));
    assert_eq!(summary.revenue_by_month.get("2024-05"), Some(&dec!(6933.50)));
    assert_eq!(summary.expense_by_month.get("2024-04"), Some(&dec!(433.50)));
    assert_eq!(
        summary.expense_by_category.get("veterinary"),
        Some(&dec!(433.50))
    );

    // A 30-day window drops the April expense.
    let windowed = state
        .services
        .finance
        .financial_summary(owner_id, today, Some(30));
    assert_eq!(windowed.total_expenses, dec!(1500.00));
}

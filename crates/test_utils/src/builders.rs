//! Test Data Builders
//!
//! Provides builder patterns for constructing test data with sensible defaults.
//! These builders allow tests to specify only the relevant fields while using
//! defaults for everything else. Names and lenders are generated with `fake`.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use core_kernel::{KeyValueStore, KeyValueStoreExt, LoanId};
use domain_loans::{Loan, LoanForm, LoanStorageKeys, NewLoan};
use domain_pnl::{PnlConfig, PnlEntry};
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Word;
use fake::Fake;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::fixtures::DateFixtures;

/// Builder for constructing test loans
pub struct LoanBuilder {
    id: LoanId,
    name: String,
    lender: String,
    remaining_amount: Decimal,
    interest_rate: Decimal,
    emi_amount: Decimal,
    due_date: Option<NaiveDate>,
    emi_day_of_month: Option<u32>,
    last_emi_paid_date: Option<NaiveDate>,
    total_emis: Option<u32>,
    emis_paid_count: u32,
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanBuilder {
    /// Creates a builder for a 100,000 loan at 12% with a 10,000 EMI
    pub fn new() -> Self {
        let due_date = DateFixtures::ymd(2025, 1, 5);
        let word: String = Word().fake();
        Self {
            id: LoanId::new_v7(),
            name: format!("{word} loan"),
            lender: CompanyName().fake(),
            remaining_amount: dec!(100000),
            interest_rate: dec!(12),
            emi_amount: dec!(10000),
            due_date: Some(due_date),
            emi_day_of_month: Some(due_date.day()),
            last_emi_paid_date: None,
            total_emis: Some(10),
            emis_paid_count: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = LoanId::from_raw(id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_balance(mut self, balance: Decimal) -> Self {
        self.remaining_amount = balance;
        self
    }

    /// Sets the annual percentage rate
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.interest_rate = rate;
        self
    }

    pub fn with_emi(mut self, emi: Decimal) -> Self {
        self.emi_amount = emi;
        self
    }

    /// Sets the due date and the billing day derived from it
    pub fn with_due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self.emi_day_of_month = Some(date.day());
        self
    }

    pub fn with_emi_day(mut self, day: Option<u32>) -> Self {
        self.emi_day_of_month = day;
        self
    }

    pub fn paid_on(mut self, date: NaiveDate) -> Self {
        self.last_emi_paid_date = Some(date);
        self
    }

    pub fn with_emis(mut self, total: Option<u32>, paid: u32) -> Self {
        self.total_emis = total;
        self.emis_paid_count = paid;
        self
    }

    pub fn build(self) -> Loan {
        Loan {
            id: self.id,
            name: self.name,
            lender: self.lender,
            remaining_amount: self.remaining_amount,
            interest_rate: self.interest_rate,
            emi_amount: self.emi_amount,
            due_date: self.due_date,
            emi_day_of_month: self.emi_day_of_month,
            last_emi_paid_date: self.last_emi_paid_date,
            total_emis: self.total_emis,
            emis_paid_count: self.emis_paid_count,
            total_interest_paid: Decimal::ZERO,
        }
    }

    /// Builds creation input; derived fields are left for the ledger
    pub fn build_new(self) -> NewLoan {
        NewLoan {
            name: self.name,
            lender: self.lender,
            remaining_amount: self.remaining_amount,
            interest_rate: self.interest_rate,
            emi_amount: self.emi_amount,
            due_date: self.due_date,
            emi_day_of_month: None,
            total_emis: None,
            emis_paid_count: None,
        }
    }

    /// Builds the raw form text a user would type
    pub fn build_form(self) -> LoanForm {
        LoanForm {
            name: self.name,
            lender: self.lender,
            remaining_amount: self.remaining_amount.to_string(),
            interest_rate: self.interest_rate.to_string(),
            emi_amount: self.emi_amount.to_string(),
            due_date: self
                .due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            total_emis: self.total_emis.map(|t| t.to_string()).unwrap_or_default(),
        }
    }
}

/// Writes records straight into a store, bypassing the ledgers
pub struct StoreSeeder {
    store: Arc<dyn KeyValueStore>,
}

impl StoreSeeder {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Stores `loans` under the default loan key
    pub async fn loans(&self, loans: &[Loan]) -> &Self {
        let key = LoanStorageKeys::default().loans;
        self.store
            .save_json(&key, loans)
            .await
            .expect("seeding loans");
        self
    }

    /// Stores entries and an active baseline under the default PnL keys
    pub async fn pnl(&self, baseline: Decimal, entries: &[PnlEntry]) -> &Self {
        let keys = PnlConfig::default().keys;
        let baseline: f64 = baseline.to_string().parse().expect("decimal as f64");
        self.store
            .save_json(&keys.entries, entries)
            .await
            .expect("seeding entries");
        self.store
            .save_json(&keys.baseline, &baseline)
            .await
            .expect("seeding baseline");
        self.store
            .save_json(&keys.baseline_saved, &true)
            .await
            .expect("seeding baseline flag");
        self
    }

    /// Stores a raw JSON value, for malformed and legacy data
    pub async fn raw(&self, key: &str, value: serde_json::Value) -> &Self {
        self.store.save_json(key, &value).await.expect("seeding raw value");
        self
    }
}

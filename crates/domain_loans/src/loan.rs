//! Loan records, creation input and the allow-listed update patch

use chrono::{Datelike, NaiveDate};
use core_kernel::money::{parse_non_negative_amount, parse_positive_amount};
use core_kernel::{normalize_date, LoanId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LoanError;

/// A tracked loan
///
/// Serialized with the camelCase field names of the persisted collection.
/// Amounts are stored as JSON numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: LoanId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lender: String,
    /// Outstanding principal
    #[serde(default, with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    /// Annual percentage rate
    #[serde(default, with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    /// Reference due date
    #[serde(default, with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Recurring billing day (1-31)
    #[serde(default)]
    pub emi_day_of_month: Option<u32>,
    /// Date of the last applied payment
    #[serde(default, with = "lenient_date", skip_serializing_if = "Option::is_none")]
    pub last_emi_paid_date: Option<NaiveDate>,
    #[serde(default)]
    pub total_emis: Option<u32>,
    #[serde(default)]
    pub emis_paid_count: u32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub total_interest_paid: Decimal,
}

impl Loan {
    /// Number of EMIs left, if the total is known
    pub fn emis_remaining(&self) -> Option<u32> {
        self.total_emis
            .map(|total| total.saturating_sub(self.emis_paid_count))
    }

    /// A loan is completed once its known EMI count has been paid
    pub fn is_completed(&self) -> bool {
        self.emis_remaining() == Some(0)
    }

    /// True if an EMI amount has been set
    pub fn has_emi(&self) -> bool {
        self.emi_amount > Decimal::ZERO
    }
}

/// Input for creating a loan
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLoan {
    pub name: String,
    pub lender: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_amount: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub emi_amount: Decimal,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub emi_day_of_month: Option<u32>,
    #[serde(default)]
    pub total_emis: Option<u32>,
    #[serde(default)]
    pub emis_paid_count: Option<u32>,
}

/// Allow-listed partial update of a loan
///
/// Only the fields listed here can change through an update; the id and the
/// payment bookkeeping are untouched. `total_emis` distinguishes "leave as
/// is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoanPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub lender: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub remaining_amount: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub interest_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub emi_amount: Option<Decimal>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub emi_day_of_month: Option<u32>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub total_emis: Option<Option<u32>>,
}

impl LoanPatch {
    /// Checks the patched values before anything is merged
    pub fn validate(&self) -> Result<(), LoanError> {
        for (field, value) in [
            ("remaining amount", self.remaining_amount),
            ("interest rate", self.interest_rate),
            ("EMI amount", self.emi_amount),
        ] {
            if let Some(value) = value.filter(|v| v.is_sign_negative() && !v.is_zero()) {
                return Err(LoanError::amount(
                    field,
                    core_kernel::MoneyError::Negative(value),
                ));
            }
        }
        if let Some(day) = self.emi_day_of_month {
            validate_emi_day(day)?;
        }
        if let Some(Some(0)) = self.total_emis {
            return Err(LoanError::InvalidTotalEmis("0".to_string()));
        }
        Ok(())
    }

    /// Merges the patch into `loan`
    pub fn apply_to(&self, loan: &mut Loan) {
        if let Some(name) = &self.name {
            loan.name = name.clone();
        }
        if let Some(lender) = &self.lender {
            loan.lender = lender.clone();
        }
        if let Some(amount) = self.remaining_amount {
            loan.remaining_amount = amount;
        }
        if let Some(rate) = self.interest_rate {
            loan.interest_rate = rate;
        }
        if let Some(emi) = self.emi_amount {
            loan.emi_amount = emi;
        }
        if let Some(due_date) = self.due_date {
            loan.due_date = Some(due_date);
        }
        if let Some(day) = self.emi_day_of_month {
            loan.emi_day_of_month = Some(day);
        }
        if let Some(total) = self.total_emis {
            loan.total_emis = total;
        }
    }

    /// True if the patch changes nothing
    pub fn is_empty(&self) -> bool {
        *self == LoanPatch::default()
    }
}

/// Raw text of the add/edit loan form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanForm {
    pub name: String,
    pub lender: String,
    pub remaining_amount: String,
    pub interest_rate: String,
    pub emi_amount: String,
    pub due_date: String,
    pub total_emis: String,
}

struct ParsedForm {
    name: String,
    lender: String,
    remaining_amount: Decimal,
    interest_rate: Decimal,
    emi_amount: Decimal,
    due_date: NaiveDate,
    total_emis: Option<u32>,
}

impl LoanForm {
    /// Validates the form for a new loan
    pub fn to_new_loan(&self) -> Result<NewLoan, LoanError> {
        let parsed = self.parse()?;
        Ok(NewLoan {
            name: parsed.name,
            lender: parsed.lender,
            remaining_amount: parsed.remaining_amount,
            interest_rate: parsed.interest_rate,
            emi_amount: parsed.emi_amount,
            emi_day_of_month: Some(parsed.due_date.day()),
            due_date: Some(parsed.due_date),
            total_emis: parsed.total_emis,
            emis_paid_count: None,
        })
    }

    /// Validates the form as an edit of an existing loan
    ///
    /// A blank total EMI field clears the stored count. The billing day is
    /// re-derived from the due date.
    pub fn to_patch(&self) -> Result<LoanPatch, LoanError> {
        let parsed = self.parse()?;
        Ok(LoanPatch {
            name: Some(parsed.name),
            lender: Some(parsed.lender),
            remaining_amount: Some(parsed.remaining_amount),
            interest_rate: Some(parsed.interest_rate),
            emi_amount: Some(parsed.emi_amount),
            emi_day_of_month: Some(parsed.due_date.day()),
            due_date: Some(parsed.due_date),
            total_emis: Some(parsed.total_emis),
        })
    }

    fn parse(&self) -> Result<ParsedForm, LoanError> {
        let name = required(&self.name, "name")?;
        let lender = required(&self.lender, "lender")?;
        let balance = required(&self.remaining_amount, "remaining amount")?;
        let rate = required(&self.interest_rate, "interest rate")?;
        let emi = required(&self.emi_amount, "EMI amount")?;
        let due_date = required(&self.due_date, "due date")?;

        Ok(ParsedForm {
            remaining_amount: parse_positive_amount(&balance)
                .map_err(|e| LoanError::amount("remaining amount", e))?,
            interest_rate: parse_non_negative_amount(&rate)
                .map_err(|e| LoanError::amount("interest rate", e))?,
            emi_amount: parse_positive_amount(&emi)
                .map_err(|e| LoanError::amount("EMI amount", e))?,
            due_date: normalize_date(&due_date).map_err(|e| LoanError::date("due date", e))?,
            total_emis: parse_total_emis(&self.total_emis)?,
            name,
            lender,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, LoanError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(LoanError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

fn parse_total_emis(raw: &str) -> Result<Option<u32>, LoanError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(count) if count > 0 => Ok(Some(count)),
        _ => Err(LoanError::InvalidTotalEmis(trimmed.to_string())),
    }
}

pub(crate) fn validate_emi_day(day: u32) -> Result<(), LoanError> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(LoanError::InvalidEmiDay(day))
    }
}

fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reads stored dates leniently; unreadable text becomes `None`
mod lenient_date {
    use chrono::NaiveDate;
    use core_kernel::normalize_date;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(|text| normalize_date(text).ok()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn form() -> LoanForm {
        LoanForm {
            name: " Car loan ".to_string(),
            lender: "HDFC".to_string(),
            remaining_amount: "1,20,000".to_string(),
            interest_rate: "9.5".to_string(),
            emi_amount: "5,000".to_string(),
            due_date: "2025-03-31".to_string(),
            total_emis: String::new(),
        }
    }

    #[test]
    fn test_form_to_new_loan() {
        let new_loan = form().to_new_loan().unwrap();
        assert_eq!(new_loan.name, "Car loan");
        assert_eq!(new_loan.remaining_amount, dec!(120000));
        assert_eq!(new_loan.emi_amount, dec!(5000));
        assert_eq!(new_loan.emi_day_of_month, Some(31));
        assert_eq!(new_loan.total_emis, None);
    }

    #[test]
    fn test_form_requires_fields() {
        let mut f = form();
        f.lender = "  ".to_string();
        assert_eq!(f.to_new_loan(), Err(LoanError::MissingField("lender")));
    }

    #[test]
    fn test_form_rejects_zero_balance_and_negative_rate() {
        let mut f = form();
        f.remaining_amount = "0".to_string();
        assert!(matches!(
            f.to_new_loan(),
            Err(LoanError::InvalidAmount { field: "remaining amount", .. })
        ));

        let mut f = form();
        f.interest_rate = "-1".to_string();
        assert!(matches!(
            f.to_new_loan(),
            Err(LoanError::InvalidAmount { field: "interest rate", .. })
        ));
    }

    #[test]
    fn test_form_total_emis() {
        let mut f = form();
        f.total_emis = "24".to_string();
        assert_eq!(f.to_new_loan().unwrap().total_emis, Some(24));

        f.total_emis = "2.5".to_string();
        assert!(matches!(f.to_new_loan(), Err(LoanError::InvalidTotalEmis(_))));
    }

    #[test]
    fn test_blank_total_emis_clears_on_edit() {
        let patch = form().to_patch().unwrap();
        assert_eq!(patch.total_emis, Some(None));
    }

    #[test]
    fn test_patch_distinguishes_null_from_absent() {
        let absent: LoanPatch = serde_json::from_value(json!({"name": "x"})).unwrap();
        assert_eq!(absent.total_emis, None);

        let cleared: LoanPatch = serde_json::from_value(json!({"totalEmis": null})).unwrap();
        assert_eq!(cleared.total_emis, Some(None));

        let set: LoanPatch = serde_json::from_value(json!({"totalEmis": 12})).unwrap();
        assert_eq!(set.total_emis, Some(Some(12)));
    }

    #[test]
    fn test_patch_rejects_unlisted_fields() {
        let result = serde_json::from_value::<LoanPatch>(json!({"emisPaidCount": 3}));
        assert!(result.is_err());
    }

    #[test]
    fn test_patch_validation() {
        let patch = LoanPatch {
            emi_day_of_month: Some(32),
            ..Default::default()
        };
        assert_eq!(patch.validate(), Err(LoanError::InvalidEmiDay(32)));

        let patch = LoanPatch {
            remaining_amount: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(LoanPatch::default().validate().is_ok());
        assert!(LoanPatch::default().is_empty());
    }

    #[test]
    fn test_loan_decodes_legacy_record() {
        let loan: Loan = serde_json::from_value(json!({
            "id": "1733312345678",
            "name": "Phone",
            "lender": "Bajaj",
            "remainingAmount": 18000,
            "interestRate": 0,
            "emiAmount": 3000,
            "dueDate": "2025-12-05T00:00:00.000Z",
            "emiDayOfMonth": 5
        }))
        .unwrap();

        assert_eq!(loan.due_date, NaiveDate::from_ymd_opt(2025, 12, 5));
        assert_eq!(loan.emis_paid_count, 0);
        assert_eq!(loan.total_emis, None);
        assert_eq!(loan.total_interest_paid, Decimal::ZERO);
        assert!(!loan.is_completed());
    }

    #[test]
    fn test_loan_serializes_camel_case_numbers() {
        let loan = Loan {
            id: LoanId::from_raw("1"),
            name: "A".to_string(),
            lender: "B".to_string(),
            remaining_amount: dec!(1102),
            interest_rate: dec!(12),
            emi_amount: dec!(110),
            due_date: NaiveDate::from_ymd_opt(2025, 1, 5),
            emi_day_of_month: Some(5),
            last_emi_paid_date: None,
            total_emis: Some(11),
            emis_paid_count: 1,
            total_interest_paid: dec!(12),
        };
        let value = serde_json::to_value(&loan).unwrap();
        assert_eq!(value["remainingAmount"], json!(1102.0));
        assert_eq!(value["dueDate"], json!("2025-01-05"));
        assert!(value.get("lastEmiPaidDate").is_none());
    }
}

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::collection::{CollectionStatus, NewCollection, PaymentMode};
use crate::forms::{optional_multiline, optional_text};

#[derive(Debug, Error, PartialEq)]
pub enum CollectionFormError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
}

/// Payload of the record collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionForm {
    pub customer_id: i32,
    #[serde(default, deserialize_with = "crate::forms::lenient_id")]
    pub order_id: Option<i32>,
    /// Defaults to today.
    pub collection_date: Option<NaiveDate>,
    #[serde(deserialize_with = "crate::forms::lenient_number")]
    pub amount: f64,
    #[serde(default)]
    pub payment_mode: PaymentMode,
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub status: CollectionStatus,
    pub notes: Option<String>,
}

impl CollectionForm {
    pub fn into_new_collection(
        self,
        collection_no: String,
        today: NaiveDate,
        collected_by: i32,
    ) -> Result<NewCollection, CollectionFormError> {
        if self.amount <= 0.0 {
            return Err(CollectionFormError::NonPositiveAmount);
        }

        Ok(NewCollection {
            collection_no,
            customer_id: self.customer_id,
            order_id: self.order_id,
            collection_date: self.collection_date.unwrap_or(today),
            amount: self.amount,
            payment_mode: self.payment_mode,
            payment_reference: optional_text(self.payment_reference.as_deref()),
            status: self.status,
            notes: optional_multiline(self.notes.as_deref()),
            collected_by: Some(collected_by),
        })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CollectionStatusForm {
    pub status: CollectionStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(amount: f64, mode: PaymentMode, reference: Option<&str>) -> CollectionForm {
        CollectionForm {
            customer_id: 3,
            order_id: None,
            collection_date: None,
            amount,
            payment_mode: mode,
            payment_reference: reference.map(str::to_string),
            status: CollectionStatus::Pending,
            notes: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 2).unwrap()
    }

    #[test]
    fn date_defaults_to_today() {
        let collection = form(500.0, PaymentMode::Cash, None)
            .into_new_collection("COL1".to_string(), today(), 8)
            .expect("valid");

        assert_eq!(collection.collection_date, today());
        assert_eq!(collection.collected_by, Some(8));
    }

    #[test]
    fn blank_reference_is_dropped() {
        let collection = form(500.0, PaymentMode::Cheque, Some(" "))
            .into_new_collection("C".into(), today(), 1)
            .expect("valid");

        assert_eq!(collection.payment_reference, None);
        assert_eq!(collection.payment_mode, PaymentMode::Cheque);
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(
            form(0.0, PaymentMode::Cash, None).into_new_collection("C".into(), today(), 1),
            Err(CollectionFormError::NonPositiveAmount)
        );
    }
}

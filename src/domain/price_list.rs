use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerType;
use crate::pagination::Pagination;

/// Price of a product for one customer type over a date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceListEntry {
    pub id: i32,
    pub product_id: i32,
    pub customer_type: CustomerType,
    pub price: f64,
    /// Default line discount, 0–100.
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    /// Open-ended when `None`.
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl PriceListEntry {
    /// Whether the entry is active and its effective range contains `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        self.is_active
            && self.effective_from <= date
            && self.effective_to.is_none_or(|until| date <= until)
    }
}

/// Pick the entry that applies on `date`.
///
/// Several active rows may overlap for the same product and customer type.
/// The one that became effective most recently wins, then the newest row.
pub fn select_effective(entries: &[PriceListEntry], date: NaiveDate) -> Option<&PriceListEntry> {
    entries
        .iter()
        .filter(|entry| entry.applies_on(date))
        .max_by(|a, b| {
            a.effective_from
                .cmp(&b.effective_from)
                .then_with(|| a.id.cmp(&b.id))
        })
}

/// Price list row joined with the product it prices.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceListRow {
    #[serde(flatten)]
    pub entry: PriceListEntry,
    pub product_code: String,
    pub product_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPriceListEntry {
    pub product_id: i32,
    pub customer_type: CustomerType,
    pub price: f64,
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
}

impl NewPriceListEntry {
    pub fn new(
        product_id: i32,
        customer_type: CustomerType,
        price: f64,
        effective_from: NaiveDate,
    ) -> Self {
        Self {
            product_id,
            customer_type,
            price,
            discount_percentage: 0.0,
            effective_from,
            effective_to: None,
        }
    }

    pub fn with_discount(mut self, discount_percentage: f64) -> Self {
        self.discount_percentage = discount_percentage;
        self
    }

    pub fn until(mut self, effective_to: NaiveDate) -> Self {
        self.effective_to = Some(effective_to);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePriceListEntry {
    pub price: f64,
    pub discount_percentage: f64,
    pub effective_from: NaiveDate,
    pub effective_to: Option<NaiveDate>,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default)]
pub struct PriceListQuery {
    /// Matches product code or name.
    pub search: Option<String>,
    pub product_id: Option<i32>,
    pub customer_type: Option<CustomerType>,
    pub active_only: bool,
    pub pagination: Option<Pagination>,
}

impl PriceListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn product_id(mut self, product_id: i32) -> Self {
        self.product_id = Some(product_id);
        self
    }

    pub fn customer_type(mut self, customer_type: CustomerType) -> Self {
        self.customer_type = Some(customer_type);
        self
    }

    pub fn active_only(mut self) -> Self {
        self.active_only = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn entry(id: i32, from: NaiveDate, to: Option<NaiveDate>, active: bool) -> PriceListEntry {
        PriceListEntry {
            id,
            product_id: 1,
            customer_type: CustomerType::Retail,
            price: 100.0 + f64::from(id),
            discount_percentage: 0.0,
            effective_from: from,
            effective_to: to,
            is_active: active,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn inactive_and_out_of_range_entries_never_apply() {
        let on = date(2024, 6, 1);
        assert!(!entry(1, date(2024, 1, 1), None, false).applies_on(on));
        assert!(!entry(2, date(2024, 7, 1), None, true).applies_on(on));
        assert!(!entry(3, date(2024, 1, 1), Some(date(2024, 5, 31)), true).applies_on(on));
        assert!(entry(4, date(2024, 1, 1), Some(date(2024, 6, 1)), true).applies_on(on));
    }

    #[test]
    fn latest_effective_entry_wins_over_older_overlapping_rows() {
        let entries = vec![
            entry(1, date(2024, 1, 1), None, true),
            entry(2, date(2024, 3, 1), None, true),
            entry(3, date(2024, 2, 1), None, true),
        ];

        let selected = select_effective(&entries, date(2024, 6, 1)).map(|e| e.id);
        assert_eq!(selected, Some(2));
    }

    #[test]
    fn ties_on_start_date_pick_the_newest_row() {
        let entries = vec![
            entry(7, date(2024, 1, 1), None, true),
            entry(9, date(2024, 1, 1), None, true),
        ];

        let selected = select_effective(&entries, date(2024, 1, 1)).map(|e| e.id);
        assert_eq!(selected, Some(9));
    }

    #[test]
    fn no_applicable_entry_yields_none() {
        let entries = vec![entry(1, date(2025, 1, 1), None, true)];
        assert!(select_effective(&entries, date(2024, 1, 1)).is_none());
    }
}

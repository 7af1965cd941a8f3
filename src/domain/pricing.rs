//! Order pricing: price-list pre-fill, per-line amounts and order totals.
//!
//! Everything here is pure. The order service loads products and price list
//! entries and hands them in; nothing is read from or written to storage.

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

use crate::domain::price_list::PriceListEntry;
use crate::domain::product::Product;

/// Net total may differ from `gross - discount + tax` by this much before a
/// warning is logged.
pub const TOTALS_DRIFT_TOLERANCE: f64 = 1e-6;

text_enum! {
    /// Where the unit price of a priced line came from.
    pub enum PriceSource {
        PriceList => "price_list",
        Manual => "manual",
        /// No price list entry applied; the line carries caller or zero values.
        Missing => "missing",
    }
    default = Missing;
}

#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    #[error("order must contain at least one line with a product")]
    NoProducts,
    #[error("product {0} does not exist")]
    UnknownProduct(i32),
    #[error("product {0} is inactive")]
    InactiveProduct(i32),
}

/// Line as submitted by the client, after lenient number parsing.
///
/// `None` for a price, discount or tax means "not supplied", which lets the
/// product and price list fill it in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineInput {
    pub product_id: Option<i32>,
    pub quantity: f64,
    pub unit_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub tax_percentage: Option<f64>,
}

impl LineInput {
    pub fn new(product_id: i32, quantity: f64) -> Self {
        Self {
            product_id: Some(product_id),
            quantity,
            ..Self::default()
        }
    }

    pub fn unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn discount(mut self, discount_percentage: f64) -> Self {
        self.discount_percentage = Some(discount_percentage);
        self
    }

    pub fn tax(mut self, tax_percentage: f64) -> Self {
        self.tax_percentage = Some(tax_percentage);
        self
    }
}

/// Monetary breakdown of one line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LineAmounts {
    pub subtotal: f64,
    pub discount_amount: f64,
    pub taxable_amount: f64,
    pub tax_amount: f64,
    pub line_total: f64,
}

/// Compute the amounts of a single line.
///
/// Negative and zero inputs are accepted and simply propagate.
pub fn compute_line(
    quantity: f64,
    unit_price: f64,
    discount_percentage: f64,
    tax_percentage: f64,
) -> LineAmounts {
    let subtotal = quantity * unit_price;
    let discount_amount = subtotal * (discount_percentage / 100.0);
    let taxable_amount = subtotal - discount_amount;
    let tax_amount = taxable_amount * (tax_percentage / 100.0);
    LineAmounts {
        subtotal,
        discount_amount,
        taxable_amount,
        tax_amount,
        line_total: taxable_amount + tax_amount,
    }
}

/// Fully resolved order line, ready to be persisted or quoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedLine {
    pub line_no: i32,
    pub product_id: i32,
    pub product_code: String,
    pub product_name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub discount_percentage: f64,
    pub tax_percentage: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub line_total: f64,
    pub price_source: PriceSource,
}

/// Resolve the editable values of a line and compute its amounts.
///
/// Tax defaults to the product GST rate; price and discount default to the
/// price list entry. Values supplied by the caller always win.
pub fn price_line(
    line_no: i32,
    input: &LineInput,
    product: &Product,
    entry: Option<&PriceListEntry>,
) -> PricedLine {
    let price_source = match (entry, input.unit_price) {
        (None, _) => PriceSource::Missing,
        (Some(_), Some(_)) => PriceSource::Manual,
        (Some(_), None) => PriceSource::PriceList,
    };

    let unit_price = input
        .unit_price
        .or_else(|| entry.map(|e| e.price))
        .unwrap_or(0.0);
    let discount_percentage = input
        .discount_percentage
        .or_else(|| entry.map(|e| e.discount_percentage))
        .unwrap_or(0.0);
    let tax_percentage = input.tax_percentage.unwrap_or(product.gst_rate);

    let amounts = compute_line(
        input.quantity,
        unit_price,
        discount_percentage,
        tax_percentage,
    );

    PricedLine {
        line_no,
        product_id: product.id,
        product_code: product.product_code.clone(),
        product_name: product.product_name.clone(),
        quantity: input.quantity,
        unit_price,
        discount_percentage,
        tax_percentage,
        discount_amount: amounts.discount_amount,
        tax_amount: amounts.tax_amount,
        line_total: amounts.line_total,
        price_source,
    }
}

/// Header totals of an order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OrderTotals {
    pub total_amount: f64,
    pub discount_amount: f64,
    pub tax_amount: f64,
    pub net_amount: f64,
}

impl OrderTotals {
    /// Aggregate priced lines.
    ///
    /// Gross, discount and tax are recomputed from the line inputs rather
    /// than summed from the stored line amounts; net is the sum of line totals.
    pub fn aggregate(lines: &[PricedLine]) -> Self {
        lines.iter().fold(Self::default(), |mut totals, line| {
            let gross = line.quantity * line.unit_price;
            totals.total_amount += gross;
            totals.discount_amount += gross * line.discount_percentage / 100.0;
            totals.tax_amount += gross * (1.0 - line.discount_percentage / 100.0)
                * line.tax_percentage
                / 100.0;
            totals.net_amount += line.line_total;
            totals
        })
    }

    /// Difference between the net amount and `gross - discount + tax`.
    pub fn drift(&self) -> f64 {
        self.net_amount - (self.total_amount - self.discount_amount + self.tax_amount)
    }

    pub fn is_consistent(&self) -> bool {
        self.drift().abs() <= TOTALS_DRIFT_TOLERANCE
    }
}

/// Result of pricing a whole order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub totals: OrderTotals,
}

/// Product ids referenced by the submitted lines, without duplicates.
pub fn referenced_products(inputs: &[LineInput]) -> Vec<i32> {
    let mut ids: Vec<i32> = inputs.iter().filter_map(|line| line.product_id).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Price every line that names a product.
///
/// Lines without a product are dropped and the remaining lines are numbered
/// from 1. `prices` holds the entry already resolved for each product id.
pub fn price_order(
    inputs: &[LineInput],
    products: &HashMap<i32, Product>,
    prices: &HashMap<i32, PriceListEntry>,
) -> Result<PricedOrder, PricingError> {
    let mut lines = Vec::new();
    for input in inputs {
        let Some(product_id) = input.product_id else {
            continue;
        };
        let product = products
            .get(&product_id)
            .ok_or(PricingError::UnknownProduct(product_id))?;
        if !product.is_active {
            return Err(PricingError::InactiveProduct(product_id));
        }
        let line_no = lines.len() as i32 + 1;
        lines.push(price_line(line_no, input, product, prices.get(&product_id)));
    }

    if lines.is_empty() {
        return Err(PricingError::NoProducts);
    }

    let totals = OrderTotals::aggregate(&lines);
    Ok(PricedOrder { lines, totals })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;
    use crate::domain::customer::CustomerType;

    const EPS: f64 = 1e-9;

    fn product(id: i32, gst_rate: f64) -> Product {
        Product {
            id,
            product_code: format!("P{id:03}"),
            product_name: format!("Product {id}"),
            category: None,
            subcategory: None,
            unit_of_measure: "pcs".to_string(),
            hsn_code: None,
            gst_rate,
            description: None,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn price(product_id: i32, price: f64, discount: f64) -> PriceListEntry {
        PriceListEntry {
            id: product_id * 10,
            product_id,
            customer_type: CustomerType::Dealer,
            price,
            discount_percentage: discount,
            effective_from: NaiveDate::default(),
            effective_to: None,
            is_active: true,
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    #[test]
    fn worked_example_matches_expected_breakdown() {
        let amounts = compute_line(10.0, 100.0, 10.0, 18.0);
        assert!((amounts.subtotal - 1000.0).abs() < EPS);
        assert!((amounts.discount_amount - 100.0).abs() < EPS);
        assert!((amounts.taxable_amount - 900.0).abs() < EPS);
        assert!((amounts.tax_amount - 162.0).abs() < EPS);
        assert!((amounts.line_total - 1062.0).abs() < EPS);
    }

    #[test]
    fn line_total_matches_closed_form() {
        for &(q, p, d, t) in &[
            (3.0, 19.99, 5.0, 12.0),
            (0.5, 1200.0, 0.0, 28.0),
            (7.0, 0.0, 50.0, 5.0),
        ] {
            let amounts = compute_line(q, p, d, t);
            let expected = q * p * (1.0 - d / 100.0) * (1.0 + t / 100.0);
            assert!((amounts.line_total - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn negative_and_zero_values_propagate() {
        let amounts = compute_line(-2.0, 50.0, 0.0, 10.0);
        assert!((amounts.line_total + 110.0).abs() < EPS);

        let zero = compute_line(0.0, 50.0, 10.0, 18.0);
        assert_eq!(zero.line_total, 0.0);
    }

    #[test]
    fn price_list_fills_price_and_discount_and_product_fills_tax() {
        let line = price_line(
            1,
            &LineInput::new(1, 10.0),
            &product(1, 18.0),
            Some(&price(1, 100.0, 10.0)),
        );

        assert_eq!(line.price_source, PriceSource::PriceList);
        assert_eq!(line.unit_price, 100.0);
        assert_eq!(line.discount_percentage, 10.0);
        assert_eq!(line.tax_percentage, 18.0);
        assert!((line.line_total - 1062.0).abs() < EPS);
    }

    #[test]
    fn caller_values_override_defaults() {
        let input = LineInput::new(1, 2.0).unit_price(80.0).discount(0.0).tax(5.0);
        let line = price_line(1, &input, &product(1, 18.0), Some(&price(1, 100.0, 10.0)));

        assert_eq!(line.price_source, PriceSource::Manual);
        assert_eq!(line.unit_price, 80.0);
        assert_eq!(line.discount_percentage, 0.0);
        assert_eq!(line.tax_percentage, 5.0);
    }

    #[test]
    fn missing_price_keeps_zero_and_is_flagged() {
        let line = price_line(1, &LineInput::new(1, 4.0), &product(1, 12.0), None);

        assert_eq!(line.price_source, PriceSource::Missing);
        assert_eq!(line.unit_price, 0.0);
        assert_eq!(line.line_total, 0.0);
    }

    #[test]
    fn order_drops_blank_lines_and_numbers_the_rest() {
        let products = HashMap::from([(1, product(1, 18.0)), (2, product(2, 5.0))]);
        let prices = HashMap::from([(1, price(1, 100.0, 10.0)), (2, price(2, 40.0, 0.0))]);
        let inputs = vec![
            LineInput::new(1, 10.0),
            LineInput {
                quantity: 3.0,
                ..LineInput::default()
            },
            LineInput::new(2, 5.0),
        ];

        let order = price_order(&inputs, &products, &prices).expect("order prices");

        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.lines[0].line_no, 1);
        assert_eq!(order.lines[1].line_no, 2);
        assert_eq!(order.lines[1].product_id, 2);

        let sum: f64 = order.lines.iter().map(|l| l.line_total).sum();
        assert_eq!(order.totals.net_amount, sum);
        assert!((order.totals.total_amount - 1200.0).abs() < EPS);
        assert!((order.totals.discount_amount - 100.0).abs() < EPS);
        assert!((order.totals.tax_amount - 172.0).abs() < EPS);
        assert!(order.totals.is_consistent());
    }

    #[test]
    fn order_without_products_is_rejected() {
        let inputs = vec![LineInput {
            quantity: 1.0,
            ..LineInput::default()
        }];
        let result = price_order(&inputs, &HashMap::new(), &HashMap::new());
        assert_eq!(result, Err(PricingError::NoProducts));
    }

    #[test]
    fn unknown_product_is_reported() {
        let result = price_order(&[LineInput::new(9, 1.0)], &HashMap::new(), &HashMap::new());
        assert_eq!(result, Err(PricingError::UnknownProduct(9)));
    }

    #[test]
    fn inactive_product_is_reported() {
        let mut retired = product(4, 18.0);
        retired.is_active = false;
        let products = HashMap::from([(4, retired)]);

        let result = price_order(&[LineInput::new(4, 1.0)], &products, &HashMap::new());
        assert_eq!(result, Err(PricingError::InactiveProduct(4)));
    }

    #[test]
    fn referenced_products_are_unique() {
        let inputs = vec![LineInput::new(2, 1.0), LineInput::new(1, 1.0), LineInput::new(2, 3.0)];
        assert_eq!(referenced_products(&inputs), vec![1, 2]);
    }
}

use chrono::NaiveDate;
use serde::Deserialize;

use crate::domain::order::OrderStatus;
use crate::domain::pricing::LineInput;
use crate::forms::optional_multiline;

/// One line of the order entry grid.
///
/// Numbers may arrive as JSON numbers or as the raw text of an input field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderLineForm {
    #[serde(default, deserialize_with = "crate::forms::lenient_id")]
    pub product_id: Option<i32>,
    #[serde(default, deserialize_with = "crate::forms::lenient_number")]
    pub quantity: f64,
    #[serde(default, deserialize_with = "crate::forms::lenient_optional_number")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "crate::forms::lenient_optional_number")]
    pub discount_percentage: Option<f64>,
    #[serde(default, deserialize_with = "crate::forms::lenient_optional_number")]
    pub tax_percentage: Option<f64>,
}

impl From<&OrderLineForm> for LineInput {
    fn from(value: &OrderLineForm) -> Self {
        LineInput {
            product_id: value.product_id,
            quantity: value.quantity,
            unit_price: value.unit_price,
            discount_percentage: value.discount_percentage,
            tax_percentage: value.tax_percentage,
        }
    }
}

/// Payload of the create and quote order endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderForm {
    pub customer_id: i32,
    /// Defaults to today.
    pub order_date: Option<NaiveDate>,
    pub delivery_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: OrderStatus,
    pub notes: Option<String>,
    #[serde(default)]
    pub lines: Vec<OrderLineForm>,
}

impl OrderForm {
    pub fn line_inputs(&self) -> Vec<LineInput> {
        self.lines.iter().map(LineInput::from).collect()
    }

    pub fn clean_notes(&self) -> Option<String> {
        optional_multiline(self.notes.as_deref())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OrderStatusForm {
    pub status: OrderStatus,
}

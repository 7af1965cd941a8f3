use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::route::{NewRoute, NewRouteCustomer, UpdateRoute};
use crate::forms::{optional_multiline, sanitize_inline_text};

#[derive(Debug, Error)]
pub enum RouteFormError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
    #[error("visit sequence must be at least 1")]
    InvalidSequence,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddRouteForm {
    #[validate(length(min = 1, max = 32))]
    pub route_code: String,
    #[validate(length(min = 1, max = 120))]
    pub route_name: String,
    pub route_description: Option<String>,
}

impl AddRouteForm {
    pub fn into_new_route(self, created_by: i32) -> Result<NewRoute, RouteFormError> {
        self.validate()?;

        let route_code = sanitize_inline_text(&self.route_code).to_uppercase();
        if route_code.is_empty() {
            return Err(RouteFormError::Empty { field: "route_code" });
        }
        let route_name = sanitize_inline_text(&self.route_name);
        if route_name.is_empty() {
            return Err(RouteFormError::Empty { field: "route_name" });
        }

        Ok(NewRoute {
            route_code,
            route_name,
            route_description: optional_multiline(self.route_description.as_deref()),
            created_by: Some(created_by),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditRouteForm {
    #[validate(length(min = 1, max = 120))]
    pub route_name: String,
    pub route_description: Option<String>,
    #[serde(default = "active_by_default")]
    pub is_active: bool,
}

fn active_by_default() -> bool {
    true
}

impl EditRouteForm {
    pub fn into_update(self) -> Result<UpdateRoute, RouteFormError> {
        self.validate()?;

        let route_name = sanitize_inline_text(&self.route_name);
        if route_name.is_empty() {
            return Err(RouteFormError::Empty { field: "route_name" });
        }

        Ok(UpdateRoute {
            route_name,
            route_description: optional_multiline(self.route_description.as_deref()),
            is_active: self.is_active,
            updated_at: chrono::Local::now().naive_utc(),
        })
    }
}

/// Request to append a customer to a route.
///
/// Any position sent by the client is ignored; new mappings always go last.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AddRouteCustomerForm {
    pub customer_id: i32,
}

impl AddRouteCustomerForm {
    pub fn into_mapping(self, route_id: i32, created_by: i32) -> NewRouteCustomer {
        NewRouteCustomer {
            route_id,
            customer_id: self.customer_id,
            created_by: Some(created_by),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct VisitSequenceForm {
    pub visit_sequence: i32,
}

impl VisitSequenceForm {
    pub fn checked(self) -> Result<i32, RouteFormError> {
        if self.visit_sequence < 1 {
            return Err(RouteFormError::InvalidSequence);
        }
        Ok(self.visit_sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_code_is_normalised() {
        let form = AddRouteForm {
            route_code: " r-north ".to_string(),
            route_name: "North  Belt".to_string(),
            route_description: Some("\n".to_string()),
        };

        let route = form.into_new_route(2).expect("valid");
        assert_eq!(route.route_code, "R-NORTH");
        assert_eq!(route.route_name, "North Belt");
        assert_eq!(route.route_description, None);
    }

    #[test]
    fn position_field_is_ignored() {
        let form: AddRouteCustomerForm =
            serde_json::from_str(r#"{"customer_id": 4, "visit_sequence": 1}"#).expect("parses");

        let mapping = form.into_mapping(9, 1);
        assert_eq!(mapping.route_id, 9);
        assert_eq!(mapping.customer_id, 4);
    }

    #[test]
    fn sequence_below_one_is_rejected() {
        assert!(VisitSequenceForm { visit_sequence: 0 }.checked().is_err());
        assert_eq!(VisitSequenceForm { visit_sequence: 3 }.checked().ok(), Some(3));
    }
}

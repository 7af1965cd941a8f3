use serde::Deserialize;
use validator::Validate;

/// Mobile number and password submitted to the login endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(custom(function = "crate::forms::validate_mobile"))]
    pub mobile_no: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_requires_ten_digit_mobile() {
        let form = LoginForm {
            mobile_no: "12345".to_string(),
            password: "secret".to_string(),
        };
        assert!(form.validate().is_err());

        let form = LoginForm {
            mobile_no: "9876543210".to_string(),
            password: "secret".to_string(),
        };
        assert!(form.validate().is_ok());
    }
}

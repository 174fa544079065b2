//! Customer model and request payloads

use serde::{Deserialize, Serialize};
use validator::Validate;

/// A stored customer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerid")]
    pub customer_id: i32,
    #[serde(rename = "customername")]
    pub customer_name: String,
}

/// Body accepted by create and update.
///
/// A `customerid` sent by the client is ignored; ids are assigned by storage
/// and taken from the path on update.
#[derive(Debug, Deserialize, Validate)]
pub struct CustomerPayload {
    #[serde(rename = "customername")]
    #[validate(length(min = 1, max = 255, message = "customername must be between 1 and 255 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub customer_name: String,
}

fn validate_not_blank(name: &str) -> Result<(), validator::ValidationError> {
    if name.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("customername must not be blank".into());
        return Err(err);
    }
    Ok(())
}

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors};

use crate::{Error, Result};

pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_A_UUID: &str = "Must be a valid UUID.";

/// A JSON object decoded one field at a time, so a value of the wrong type
/// is reported against the field that carries it.
pub struct JsonFields {
    fields: Map<String, Value>,
    errors: ValidationErrors,
}

impl JsonFields {
    pub fn new(body: Value) -> Result<Self> {
        match body {
            Value::Object(fields) => Ok(Self {
                fields,
                errors: ValidationErrors::new(),
            }),
            _ => Err(Error::BadRequest("Expected a JSON object.".to_string())),
        }
    }

    /// Absent and `null` fields both read as `None`.
    pub fn take<T: DeserializeOwned>(&mut self, name: &'static str, message: &'static str) -> Option<T> {
        let value = match self.fields.remove(name) {
            None | Some(Value::Null) => return None,
            Some(value) => value,
        };

        match serde_json::from_value(value) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::debug!(field = name, %err, "Rejected JSON field");
                let mut error = ValidationError::new("invalid");
                error.message = Some(message.into());
                self.errors.add(name, error);
                None
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(Error::ValidationFailed(self.errors))
        }
    }
}

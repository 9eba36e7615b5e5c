use serde::ser::SerializeMap;
use thiserror::Error;

/// User-facing error vocabulary.
///
/// Every non-2xx response serializes one of these as its JSON body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("Internal server error")]
    Internal,
    #[error("User not found")]
    NotFound,
    #[error("Invalid flag name")]
    UnknownFlag { name: String },
    #[error("{message}")]
    InvalidForm { message: String },
}

impl Error {
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::NotFound => "not_found",
            Self::UnknownFlag { .. } => "unknown_flag",
            Self::InvalidForm { .. } => "invalid_form",
        }
    }
}

impl serde::Serialize for Error {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("code", self.code())?;
        map.serialize_entry("message", &self.to_string())?;
        if let Self::UnknownFlag { name } = self {
            map.serialize_entry("name", name)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_with_code_and_message() {
        assert_eq!(
            serde_json::to_value(Error::NotFound).unwrap(),
            json!({ "code": "not_found", "message": "User not found" }),
        );
    }

    #[test]
    fn unknown_flag_should_carry_the_offending_name() {
        let error = Error::UnknownFlag {
            name: "BOGUS".to_string(),
        };

        assert_eq!(
            serde_json::to_value(error).unwrap(),
            json!({
                "code": "unknown_flag",
                "message": "Invalid flag name",
                "name": "BOGUS",
            }),
        );
    }
}

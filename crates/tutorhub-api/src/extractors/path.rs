//! Typed path parameter helpers.

use std::fmt::Display;
use std::str::FromStr;

use tutorhub_core::AppError;

/// Parses a typed id from a path segment.
pub fn parse_id<T>(s: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    s.parse()
        .map_err(|e| AppError::validation(format!("Invalid id '{s}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorhub_core::ErrorKind;
    use tutorhub_core::types::SlotId;

    #[test]
    fn test_parse_id() {
        let id = SlotId::new();
        assert_eq!(parse_id::<SlotId>(&id.to_string()).unwrap(), id);
        assert_eq!(
            parse_id::<SlotId>("not-a-uuid").unwrap_err().kind,
            ErrorKind::Validation
        );
    }
}

//! Caller role as asserted by the identity gateway.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a verified subject can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectRole {
    /// Browses sessions and books seats.
    Student,
    /// Offers availability and decides on bookings.
    Tutor,
    /// Platform operator.
    Admin,
}

impl SubjectRole {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Tutor => "tutor",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for SubjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubjectRole {
    type Err = tutorhub_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "tutor" => Ok(Self::Tutor),
            "admin" => Ok(Self::Admin),
            _ => Err(tutorhub_core::AppError::authentication(format!(
                "Unknown subject role: '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("TUTOR".parse::<SubjectRole>().unwrap(), SubjectRole::Tutor);
        assert_eq!("student".parse::<SubjectRole>().unwrap(), SubjectRole::Student);
        assert!("guest".parse::<SubjectRole>().is_err());
    }
}

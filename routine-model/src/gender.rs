use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::ModelError;

/// Employee gender, persisted as its discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "i16", into = "i16"))]
pub enum Gender {
    Male = 1,
    Female = 2,
}

impl Gender {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i16> for Gender {
    type Error = ModelError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Gender::Male),
            2 => Ok(Gender::Female),
            other => Err(ModelError::InvalidGender(other.to_string())),
        }
    }
}

impl From<Gender> for i16 {
    fn from(value: Gender) -> Self {
        value.as_i16()
    }
}

/// Accepts the variant name (any case) or its discriminant.
impl FromStr for Gender {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("male") {
            return Ok(Gender::Male);
        }
        if trimmed.eq_ignore_ascii_case("female") {
            return Ok(Gender::Female);
        }
        trimmed
            .parse::<i16>()
            .ok()
            .and_then(|value| Gender::try_from(value).ok())
            .ok_or_else(|| ModelError::InvalidGender(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_discriminants() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" female ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("2".parse::<Gender>().unwrap(), Gender::Female);
        assert!("3".parse::<Gender>().is_err());
        assert!("other".parse::<Gender>().is_err());
    }

    #[test]
    fn discriminant_round_trip() {
        assert_eq!(Gender::try_from(Gender::Male.as_i16()), Ok(Gender::Male));
        assert!(Gender::try_from(0).is_err());
    }
}

//! Postal code type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`ZipCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ZipCodeError {
    /// The input is empty after trimming whitespace.
    #[error("zip code cannot be empty")]
    Empty,
    /// The input is too long.
    #[error("zip code must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character that never appears in a postal code.
    #[error("zip code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A postal code as stored in the geocoding table.
///
/// ## Constraints
///
/// - Surrounding whitespace is trimmed
/// - Length: 1-6 characters
/// - ASCII letters, digits, inner spaces and `-` only
///
/// The value is compared byte for byte, so `"02134"` and `"2134"` are
/// different zip codes.
///
/// ## Examples
///
/// ```
/// use fairprice_core::ZipCode;
///
/// assert_eq!(ZipCode::parse(" 94103 ").unwrap().as_str(), "94103");
/// assert!(ZipCode::parse("K1A 0B").is_ok());
///
/// assert!(ZipCode::parse("").is_err());
/// assert!(ZipCode::parse("9410399").is_err());
/// assert!(ZipCode::parse("94;03").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ZipCode(String);

impl ZipCode {
    /// Maximum length of a stored zip code.
    pub const MAX_LENGTH: usize = 6;

    /// Parse a `ZipCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the trimmed input is empty, longer than
    /// [`Self::MAX_LENGTH`], or contains a character outside the allowed set.
    pub fn parse(s: &str) -> Result<Self, ZipCodeError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ZipCodeError::Empty);
        }

        if trimmed.chars().count() > Self::MAX_LENGTH {
            return Err(ZipCodeError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == ' ' || *c == '-'))
        {
            return Err(ZipCodeError::InvalidCharacter(c));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Parse an optional shopper-supplied zip.
    ///
    /// `None`, the empty string and whitespace-only input all mean "no zip".
    ///
    /// # Errors
    ///
    /// Returns an error if a non-blank input fails [`ZipCode::parse`].
    pub fn parse_optional(s: Option<&str>) -> Result<Option<Self>, ZipCodeError> {
        match s.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => Self::parse(value).map(Some),
        }
    }

    /// Returns the zip code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ZipCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for ZipCode {
    type Err = ZipCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ZipCode {
    type Error = ZipCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ZipCode> for String {
    fn from(zip: ZipCode) -> Self {
        zip.0
    }
}

impl AsRef<str> for ZipCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for ZipCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for ZipCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for ZipCode {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert!(ZipCode::parse("94103").is_ok());
        assert!(ZipCode::parse("02134").is_ok());
        assert!(ZipCode::parse("SW1A").is_ok());
        assert!(ZipCode::parse("1234-5").is_ok());
    }

    #[test]
    fn test_parse_trims() {
        assert_eq!(ZipCode::parse("\t10001 \n").unwrap().as_str(), "10001");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ZipCode::parse(""), Err(ZipCodeError::Empty));
        assert_eq!(ZipCode::parse("   "), Err(ZipCodeError::Empty));
    }

    #[test]
    fn test_parse_too_long() {
        assert_eq!(
            ZipCode::parse("1234567"),
            Err(ZipCodeError::TooLong { max: 6 })
        );
    }

    #[test]
    fn test_parse_invalid_character() {
        assert_eq!(
            ZipCode::parse("941'3"),
            Err(ZipCodeError::InvalidCharacter('\''))
        );
    }

    #[test]
    fn test_parse_optional_blank_is_none() {
        assert_eq!(ZipCode::parse_optional(None), Ok(None));
        assert_eq!(ZipCode::parse_optional(Some("")), Ok(None));
        assert_eq!(ZipCode::parse_optional(Some("  ")), Ok(None));
    }

    #[test]
    fn test_parse_optional_present() {
        let zip = ZipCode::parse_optional(Some("94103")).unwrap().unwrap();
        assert_eq!(zip.as_str(), "94103");
        assert!(ZipCode::parse_optional(Some("bad!")).is_err());
    }

    #[test]
    fn test_leading_zero_is_significant() {
        assert_ne!(
            ZipCode::parse("02134").unwrap(),
            ZipCode::parse("2134").unwrap()
        );
    }

    #[test]
    fn test_serde_validates() {
        let zip: ZipCode = serde_json::from_str("\"94103\"").unwrap();
        assert_eq!(serde_json::to_string(&zip).unwrap(), "\"94103\"");
        assert!(serde_json::from_str::<ZipCode>("\"9410399\"").is_err());
    }
}

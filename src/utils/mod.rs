//! Project-specific utilities live here.

use crate::modules::catalog::CatalogError;

/// Parse a raw id field: ASCII digits only, no sign or whitespace, must fit a `u32`.
pub fn parse_id(raw: &str) -> Result<u32, CatalogError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::InvalidInput);
    }
    raw.parse().map_err(|_| CatalogError::InvalidInput)
}

/// Parse the user and book fields together; either one failing rejects both.
pub fn parse_id_pair(user: &str, book: &str) -> Result<(u32, u32), CatalogError> {
    Ok((parse_id(user)?, parse_id(book)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_digits() {
        assert_eq!(parse_id("0"), Ok(0));
        assert_eq!(parse_id("007"), Ok(7));
        assert_eq!(parse_id_pair("1", "3"), Ok((1, 3)));
    }

    #[test]
    fn rejects_anything_else() {
        for raw in ["", " 1", "1 ", "-1", "+1", "1.0", "abc", "99999999999"] {
            assert_eq!(parse_id(raw), Err(CatalogError::InvalidInput), "{raw:?}");
        }
        assert_eq!(parse_id_pair("1", "x"), Err(CatalogError::InvalidInput));
    }
}

//! Page request normalization for contact listings.

use rolodex_model::{PageRequest, Sort};

use crate::error::{ContactError, Result};

pub const DEFAULT_PAGE: i64 = 0;
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Listings are always ordered by name.
pub const CONTACT_SORT: Sort = Sort::ascending("name");

/// Builds a zero-based page request sorted by name ascending.
///
/// `page` must be non-negative and `size` at least one. There is no upper
/// bound on `size`.
pub fn contact_page_request(page: i64, size: i64) -> Result<PageRequest> {
    let page = u64::try_from(page).map_err(|_| {
        ContactError::Validation(format!("page must be >= 0, got {page}"))
    })?;
    let size = u64::try_from(size)
        .ok()
        .filter(|size| *size >= 1)
        .ok_or_else(|| {
            ContactError::Validation(format!("size must be >= 1, got {size}"))
        })?;

    Ok(PageRequest::new(page, size, CONTACT_SORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_produce_first_page_of_ten() {
        let request =
            contact_page_request(DEFAULT_PAGE, DEFAULT_PAGE_SIZE).unwrap();
        assert_eq!(request.page, 0);
        assert_eq!(request.size, 10);
        assert_eq!(request.sort, CONTACT_SORT);
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn rejects_negative_page() {
        let err = contact_page_request(-1, 10).unwrap_err();
        assert!(matches!(err, ContactError::Validation(_)));
    }

    #[test]
    fn rejects_zero_and_negative_size() {
        assert!(matches!(
            contact_page_request(0, 0),
            Err(ContactError::Validation(_))
        ));
        assert!(matches!(
            contact_page_request(0, -5),
            Err(ContactError::Validation(_))
        ));
    }

    #[test]
    fn large_sizes_are_accepted() {
        let request = contact_page_request(3, 1_000_000).unwrap();
        assert_eq!(request.offset(), 3_000_000);
    }
}

//! Input validation for course records and item payloads

use super::ordering::MAX_ORDER;
use crate::contract::{ContentKind, CourseError, ItemFields, ItemPayload};
use std::collections::HashSet;

/// Maximum length of subject, course and module titles
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of item titles
pub const MAX_ITEM_TITLE_LEN: usize = 250;

/// Maximum length of slugs
pub const MAX_SLUG_LEN: usize = 200;

/// Validate a required title of at most `max_len` characters
pub fn validate_title(field: &str, title: &str, max_len: usize) -> Result<(), CourseError> {
    if title.trim().is_empty() {
        return Err(CourseError::validation(format!("{} cannot be empty", field)));
    }
    if title.chars().count() > max_len {
        return Err(CourseError::validation(format!(
            "{} must be at most {} characters",
            field, max_len
        )));
    }
    Ok(())
}

/// Validate a slug: lowercase ASCII letters, digits, '-' and '_'
pub fn validate_slug(slug: &str) -> Result<(), CourseError> {
    if slug.is_empty() {
        return Err(CourseError::validation("slug cannot be empty"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(CourseError::validation(format!(
            "slug must be at most {} characters",
            MAX_SLUG_LEN
        )));
    }
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !valid {
        return Err(CourseError::validation(format!(
            "slug '{}' contains invalid characters. \
             Only lowercase letters, digits, '-' and '_' are allowed",
            slug
        )));
    }
    Ok(())
}

/// Turn caller fields into the payload of `kind`
///
/// Video URLs must be absolute http(s) URLs when `check_urls` is set.
/// Image and file references must be non-empty.
pub fn validate_item_fields(
    kind: ContentKind,
    fields: ItemFields,
    check_urls: bool,
) -> Result<(String, ItemPayload), CourseError> {
    validate_title("title", &fields.title, MAX_ITEM_TITLE_LEN)?;

    match kind {
        ContentKind::Video if check_urls => {
            let url = url::Url::parse(&fields.content).map_err(|e| {
                CourseError::validation(format!("invalid video url '{}': {}", fields.content, e))
            })?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(CourseError::validation(format!(
                    "video url must use http or https, got '{}'",
                    url.scheme()
                )));
            }
        }
        ContentKind::Image | ContentKind::File if fields.content.trim().is_empty() => {
            return Err(CourseError::validation(format!(
                "{} reference cannot be empty",
                kind
            )));
        }
        _ => {}
    }

    Ok((fields.title, ItemPayload::from_raw(kind, fields.content)))
}

/// Validate an order chosen by the caller
pub fn validate_order(order: u32) -> Result<(), CourseError> {
    if order > MAX_ORDER {
        return Err(CourseError::validation(format!(
            "order {} exceeds the maximum of {}",
            order, MAX_ORDER
        )));
    }
    Ok(())
}

/// Reject reorder requests naming a module or an order twice
pub fn validate_reorder(orders: &[(i64, u32)]) -> Result<(), CourseError> {
    let mut ids = HashSet::new();
    let mut values = HashSet::new();
    for (module_id, order) in orders {
        validate_order(*order)?;
        if !ids.insert(*module_id) {
            return Err(CourseError::validation(format!(
                "module {} appears more than once",
                module_id
            )));
        }
        if !values.insert(*order) {
            return Err(CourseError::validation(format!(
                "order {} is assigned more than once",
                order
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(title: &str, content: &str) -> ItemFields {
        ItemFields {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_validate_title() {
        assert!(validate_title("title", "Ownership", MAX_TITLE_LEN).is_ok());
        assert!(validate_title("title", "   ", MAX_TITLE_LEN).is_err());
        assert!(validate_title("title", &"x".repeat(201), MAX_TITLE_LEN).is_err());
        assert!(validate_title("title", &"x".repeat(250), MAX_ITEM_TITLE_LEN).is_ok());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("rust-101").is_ok());
        assert!(validate_slug("intro_to_rust").is_ok());
        assert!(validate_slug("").is_err());
        assert!(validate_slug("Rust 101").is_err());
        assert!(validate_slug(&"a".repeat(201)).is_err());
    }

    fn video(url: &str, check_urls: bool) -> Result<(String, ItemPayload), CourseError> {
        validate_item_fields(ContentKind::Video, fields("Demo", url), check_urls)
    }

    #[test]
    fn test_video_url_must_be_http() {
        assert!(video("https://v.example/1", true).is_ok());
        assert!(video("not a url", true).is_err());
        assert!(video("ftp://v.example/1", true).is_err());
        // unchecked mode stores whatever was given
        assert!(video("not a url", false).is_ok());
    }

    #[test]
    fn test_file_reference_required() {
        assert!(validate_item_fields(ContentKind::File, fields("Slides", ""), true).is_err());
        assert!(validate_item_fields(ContentKind::Image, fields("Diagram", " "), true).is_err());
        let (title, payload) =
            validate_item_fields(ContentKind::Image, fields("Diagram", "images/d.png"), true)
                .unwrap();
        assert_eq!(title, "Diagram");
        assert_eq!(
            payload,
            ItemPayload::Image {
                file: "images/d.png".to_string()
            }
        );
    }

    #[test]
    fn test_text_body_may_be_empty() {
        let (_, payload) =
            validate_item_fields(ContentKind::Text, fields("Notes", ""), true).unwrap();
        assert_eq!(payload.kind(), ContentKind::Text);
    }

    #[test]
    fn test_validate_reorder() {
        assert!(validate_reorder(&[(1, 1), (2, 0)]).is_ok());
        assert!(validate_reorder(&[]).is_ok());
        assert!(validate_reorder(&[(1, 0), (1, 1)]).is_err());
        assert!(validate_reorder(&[(1, 0), (2, 0)]).is_err());
        assert!(validate_reorder(&[(1, 0), (2, u32::MAX)]).is_err());
    }

    #[test]
    fn test_validate_order_fits_column() {
        assert!(validate_order(0).is_ok());
        assert!(validate_order(i32::MAX as u32).is_ok());
        assert!(validate_order(i32::MAX as u32 + 1).is_err());
    }
}

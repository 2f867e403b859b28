/// Trims free-text input the way the original API did; whitespace-only
/// input counts as absent.
pub fn clean_text(value: Option<String>) -> Option<String> {
    let value = value?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Upload filter: only image content types are accepted.
pub fn is_image_mime(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_trims_and_drops_empty() {
        assert_eq!(clean_text(Some("  sunset  ".into())).as_deref(), Some("sunset"));
        assert_eq!(clean_text(Some("   ".into())), None);
        assert_eq!(clean_text(None), None);
    }

    #[test]
    fn image_mimes_only() {
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("image/png"));
        assert!(!is_image_mime("application/pdf"));
        assert!(!is_image_mime("not a mime"));
    }
}

//! Vantage Utils - Utility Functions
//!
//! Text normalization used by every search surface.
//!
//! @version 0.1.0
//! @author Vantage Development Team

// =============================================================================
// Text Normalization
// =============================================================================

/// Trim and case-fold user supplied search text.
pub fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Case-insensitive equality against an already normalized needle.
#[inline]
pub fn eq_folded(haystack: &str, normalized_needle: &str) -> bool {
    haystack.to_lowercase() == normalized_needle
}

/// Case-insensitive containment against an already normalized needle.
#[inline]
pub fn contains_folded(haystack: &str, normalized_needle: &str) -> bool {
    haystack.to_lowercase().contains(normalized_needle)
}

/// Treat empty or whitespace-only optional strings as absent.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// =============================================================================
// Tests
// =============================================================================

//! Design title convention.

use crate::platform::Platform;

/// Title sent to the design API for a generated design.
///
/// Convention: `{Platform} Design - {first} {last} - for the {campaign} Campaign`
///
/// # Examples
///
/// ```
/// use donut_core::naming::design_title;
/// use donut_core::platform::Platform;
///
/// assert_eq!(
///     design_title(Platform::Instagram, "Marge", "Simpson", "Spring"),
///     "Instagram Design - Marge Simpson - for the Spring Campaign",
/// );
/// ```
pub fn design_title(
    platform: Platform,
    first_name: &str,
    last_name: &str,
    campaign_title: &str,
) -> String {
    format!(
        "{} Design - {} {} - for the {} Campaign",
        platform.display_name(),
        first_name,
        last_name,
        campaign_title
    )
}

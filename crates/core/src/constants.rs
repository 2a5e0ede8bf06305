/// Separator used in admin labels and breadcrumb trails.
pub const BREADCRUMB_SEPARATOR: &str = " → ";

/// Maximum accepted length for a category or product name.
pub const MAX_NAME_LENGTH: usize = 200;

//! Fill colors for selected regions.

/// Region fill colors, assigned by position within a selection and
/// wrapping after the last entry.
pub const PALETTE: [&str; 10] = [
    "#22c55e", "#3b82f6", "#f59e0b", "#ec4899", "#8b5cf6", "#14b8a6", "#f97316", "#06b6d4",
    "#ef4444", "#84cc16",
];

/// Color for the `position`-th region of a selection.
#[must_use]
pub const fn color_for(position: usize) -> &'static str {
    PALETTE[position % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_wrap_around() {
        assert_eq!(color_for(0), "#22c55e");
        assert_eq!(color_for(9), "#84cc16");
        assert_eq!(color_for(10), color_for(0));
        assert_eq!(color_for(23), color_for(3));
    }
}

//! Preset example questions.

/// Example questions offered to the user, in display order.
pub const EXAMPLE_QUESTIONS: [&str; 5] = [
    "Show total sales and profit by region.",
    "List the top 10 customers by total sales.",
    "Show profitability (profit margin) by product category.",
    "Show yearly sales totals from 2014 to 2017.",
    "Analyze how discount levels impact average profit.",
];

/// Returns the preset with the given 1-based number.
pub fn preset(number: usize) -> Option<&'static str> {
    number
        .checked_sub(1)
        .and_then(|index| EXAMPLE_QUESTIONS.get(index).copied())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_numbers_are_one_based() {
        assert_eq!(preset(1), Some("Show total sales and profit by region."));
        assert_eq!(
            preset(5),
            Some("Analyze how discount levels impact average profit.")
        );
        assert_eq!(preset(0), None);
        assert_eq!(preset(6), None);
    }
}

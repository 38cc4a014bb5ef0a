//! Country and currency lookups for locale-aware display.

/// Country assigned to every record when the snapshot has no country column.
pub const DEFAULT_COUNTRY: &str = "阿联酋";

const CURRENCIES: [(&str, &str); 3] = [("阿联酋", "AED"), ("沙特", "SAR"), ("埃及", "EGP")];

/// Currency label for a marketplace country. Unknown countries get an empty
/// label; display only, never used for filtering.
pub fn currency_for(country: &str) -> &'static str {
    CURRENCIES
        .iter()
        .find(|(name, _)| *name == country)
        .map(|(_, currency)| *currency)
        .unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_countries_map_to_their_currency() {
        assert_eq!(currency_for("阿联酋"), "AED");
        assert_eq!(currency_for("沙特"), "SAR");
        assert_eq!(currency_for("埃及"), "EGP");
    }

    #[test]
    fn unknown_countries_get_an_empty_label() {
        assert_eq!(currency_for("火星"), "");
        assert_eq!(currency_for(""), "");
    }
}

//! Reference lookups: country codes and staff handler codes.

use std::collections::BTreeMap;

use softbridge_core::HandlerDirectory;

/// Maps coded identifiers to human-readable values.
pub trait ReferenceResolver: Send + Sync {
    /// ERP country code (vehicle registration style, e.g. `D`, `A`, `CH`) → ISO 3166 alpha-2.
    fn country_code_to_iso(&self, code: &str) -> String;

    /// Staff code → display name; `None` when the code is unknown.
    fn resolve_handler(&self, code: &str) -> Option<String>;
}

impl<R> ReferenceResolver for &R
where
    R: ReferenceResolver + ?Sized,
{
    fn country_code_to_iso(&self, code: &str) -> String {
        (**self).country_code_to_iso(code)
    }

    fn resolve_handler(&self, code: &str) -> Option<String> {
        (**self).resolve_handler(code)
    }
}

const DEFAULT_COUNTRIES: &[(&str, &str)] = &[
    ("D", "DE"),
    ("A", "AT"),
    ("B", "BE"),
    ("CH", "CH"),
    ("CZ", "CZ"),
    ("DK", "DK"),
    ("E", "ES"),
    ("F", "FR"),
    ("FIN", "FI"),
    ("GB", "GB"),
    ("GR", "GR"),
    ("H", "HU"),
    ("I", "IT"),
    ("IRL", "IE"),
    ("L", "LU"),
    ("N", "NO"),
    ("NL", "NL"),
    ("P", "PT"),
    ("PL", "PL"),
    ("S", "SE"),
    ("SK", "SK"),
    ("SLO", "SI"),
];

/// Table-driven resolver built from configuration.
#[derive(Debug, Clone)]
pub struct StaticReferenceResolver {
    handlers: HandlerDirectory,
    countries: BTreeMap<String, String>,
    home_country: String,
}

impl StaticReferenceResolver {
    pub fn new(handlers: HandlerDirectory) -> Self {
        Self {
            handlers,
            countries: DEFAULT_COUNTRIES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            home_country: "DE".to_string(),
        }
    }

    /// Add or override a country mapping.
    pub fn with_country(mut self, code: impl Into<String>, iso: impl Into<String>) -> Self {
        self.countries.insert(code.into(), iso.into());
        self
    }
}

impl Default for StaticReferenceResolver {
    fn default() -> Self {
        Self::new(HandlerDirectory::default())
    }
}

impl ReferenceResolver for StaticReferenceResolver {
    /// Blank codes denote domestic addresses; unknown codes pass through upper-cased.
    fn country_code_to_iso(&self, code: &str) -> String {
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return self.home_country.clone();
        }
        self.countries.get(&code).cloned().unwrap_or(code)
    }

    fn resolve_handler(&self, code: &str) -> Option<String> {
        self.handlers.resolve(code).map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_erp_country_codes() {
        let r = StaticReferenceResolver::default();
        assert_eq!(r.country_code_to_iso("D"), "DE");
        assert_eq!(r.country_code_to_iso(" a "), "AT");
        assert_eq!(r.country_code_to_iso(""), "DE");
        assert_eq!(r.country_code_to_iso("US"), "US");
        let r = r.with_country("USA", "US");
        assert_eq!(r.country_code_to_iso("USA"), "US");
    }

    #[test]
    fn resolves_handlers_through_injected_directory() {
        let dir: HandlerDirectory = [("jdoe", "Jane Doe")].into_iter().collect();
        let r = StaticReferenceResolver::new(dir);
        assert_eq!(r.resolve_handler("jdoe").as_deref(), Some("Jane Doe"));
        assert_eq!(r.resolve_handler("bbonrath"), None);
    }
}

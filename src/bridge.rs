//! Identifier bridge between ISO alpha-2 codes and topology feature ids.
//!
//! The topology keys each feature by its ISO 3166-1 numeric code (as a
//! zero-padded string), while domain records carry alpha-2 codes. A single
//! compiled table covers the curated set of countries the maps know about;
//! every consumer (the world lookup and the region highlight set) resolves
//! through the same [`IdentifierBridge`].
//!
//! Codes outside the table resolve to `None`. The corresponding country is
//! unreachable from geometry, which is never an error.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, OnceLock};

use crate::types::Country;

/// ISO alpha-2 -> ISO numeric table.
pub(crate) const ISO_NUMERIC_TABLE: &[(&str, &str)] = &[
    ("US", "840"), ("CN", "156"), ("RU", "643"), ("GB", "826"), ("FR", "250"),
    ("DE", "276"), ("JP", "392"), ("IN", "356"), ("BR", "076"), ("CA", "124"),
    ("AU", "036"), ("KR", "410"), ("IT", "380"), ("ES", "724"), ("MX", "484"),
    ("ID", "360"), ("TR", "792"), ("SA", "682"), ("IR", "364"), ("EG", "818"),
    ("PK", "586"), ("NG", "566"), ("ZA", "710"), ("AR", "032"), ("PL", "616"),
    ("UA", "804"), ("TH", "764"), ("VN", "704"), ("MY", "458"), ("PH", "608"),
    ("IL", "376"), ("AE", "784"), ("SG", "702"), ("NZ", "554"), ("NO", "578"),
    ("SE", "752"), ("DK", "208"), ("FI", "246"), ("NL", "528"), ("BE", "056"),
    ("CH", "756"), ("AT", "040"), ("PT", "620"), ("GR", "300"), ("CZ", "203"),
    ("RO", "642"), ("HU", "348"), ("IE", "372"), ("CO", "170"), ("CL", "152"),
    ("PE", "604"), ("VE", "862"), ("EC", "218"), ("BO", "068"), ("PY", "600"),
    ("UY", "858"), ("KE", "404"), ("ET", "231"), ("GH", "288"), ("TZ", "834"),
    ("YE", "887"), ("ER", "232"), ("DJ", "262"), ("SD", "729"), ("SO", "706"),
    ("KP", "408"), ("MM", "104"), ("BD", "050"), ("LK", "144"), ("NP", "524"),
    ("KZ", "398"), ("UZ", "860"), ("TM", "795"), ("KG", "417"), ("TJ", "762"),
    ("GE", "268"), ("AM", "051"), ("AZ", "031"), ("IQ", "368"), ("SY", "760"),
    ("JO", "400"), ("LB", "422"), ("LY", "434"), ("TN", "788"), ("DZ", "012"),
    ("MA", "504"), ("CU", "192"), ("DO", "214"), ("HT", "332"), ("JM", "388"),
    ("RS", "688"), ("BA", "070"), ("HR", "191"), ("SI", "705"), ("ME", "499"),
    ("MK", "807"), ("AL", "008"), ("BG", "100"), ("XK", "412"),
    ("TW", "158"), ("QA", "634"), ("CD", "180"), ("PS", "275"),
];

static SHARED: OnceLock<Arc<IdentifierBridge>> = OnceLock::new();

/// Bidirectional ISO alpha-2 <-> numeric id mapping.
#[derive(Debug, Clone)]
pub struct IdentifierBridge {
    to_numeric: BTreeMap<&'static str, &'static str>,
    to_iso: BTreeMap<&'static str, &'static str>,
}

impl IdentifierBridge {
    /// Build a bridge from the compiled table.
    ///
    /// Prefer [`IdentifierBridge::shared`] outside of tests.
    pub fn new() -> Self {
        let mut to_numeric = BTreeMap::new();
        let mut to_iso = BTreeMap::new();
        for &(iso, numeric) in ISO_NUMERIC_TABLE {
            to_numeric.insert(iso, numeric);
            to_iso.insert(numeric, iso);
        }
        Self { to_numeric, to_iso }
    }

    /// The process-wide bridge, built on first use.
    pub fn shared() -> Arc<IdentifierBridge> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(IdentifierBridge::new())))
    }

    /// Resolve an alpha-2 code to its numeric feature id.
    pub fn resolve(&self, iso_code: &str) -> Option<&'static str> {
        self.to_numeric.get(iso_code).copied()
    }

    /// Resolve a numeric feature id back to its alpha-2 code.
    pub fn iso_for(&self, feature_id: &str) -> Option<&'static str> {
        self.to_iso.get(feature_id).copied()
    }

    /// Resolve many alpha-2 codes, silently dropping those outside the table.
    pub fn resolve_all<'a, I>(&self, iso_codes: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        iso_codes
            .into_iter()
            .filter_map(|iso| self.resolve(iso))
            .map(str::to_string)
            .collect()
    }

    /// Iterate `(alpha-2, numeric)` pairs in alpha-2 order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.to_numeric.iter().map(|(&iso, &numeric)| (iso, numeric))
    }

    /// Number of table entries.
    pub fn len(&self) -> usize {
        self.to_numeric.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.to_numeric.is_empty()
    }

    /// Build the reverse lookup from numeric id to country.
    pub fn build_lookup(&self, countries: &[Country]) -> CountryLookup {
        CountryLookup::build(self, countries)
    }
}

impl Default for IdentifierBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Numeric feature id -> country, rebuilt once per country-set load.
#[derive(Debug, Clone, Default)]
pub struct CountryLookup {
    by_feature: BTreeMap<String, Arc<Country>>,
    unmapped: usize,
}

impl CountryLookup {
    /// Build a lookup for the given countries.
    ///
    /// Countries whose code is outside the table are skipped. If two
    /// countries share a code the later one wins.
    pub fn build(bridge: &IdentifierBridge, countries: &[Country]) -> Self {
        let mut by_feature = BTreeMap::new();
        let mut unmapped = 0;
        for country in countries {
            match bridge.resolve(&country.iso_code) {
                Some(numeric) => {
                    by_feature.insert(numeric.to_string(), Arc::new(country.clone()));
                }
                None => unmapped += 1,
            }
        }

        tracing::debug!(
            mapped = by_feature.len(),
            unmapped = unmapped,
            "Country lookup built"
        );

        Self { by_feature, unmapped }
    }

    /// The country drawn by a feature, if any.
    pub fn get(&self, feature_id: &str) -> Option<&Arc<Country>> {
        self.by_feature.get(feature_id)
    }

    /// Whether a feature resolves to a country.
    pub fn contains(&self, feature_id: &str) -> bool {
        self.by_feature.contains_key(feature_id)
    }

    /// Number of reachable countries.
    pub fn len(&self) -> usize {
        self.by_feature.len()
    }

    /// Whether no country is reachable.
    pub fn is_empty(&self) -> bool {
        self.by_feature.is_empty()
    }

    /// Number of countries whose code is outside the table.
    pub fn unmapped_count(&self) -> usize {
        self.unmapped
    }

    /// Iterate `(feature id, country)` pairs in feature id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<Country>)> {
        self.by_feature.iter().map(|(k, v)| (k.as_str(), v))
    }
}

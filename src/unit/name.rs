use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Naming convention shared by the unit table and adjacency records.
///
/// Both sides of the join must be normalized the same way; a convention that
/// strips " County" on one side only leaves every unit without neighbors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NameConvention {
    /// Type suffixes removed from the end of a name, e.g. `["county"]`.
    pub suffixes: Vec<String>,
    /// Region qualifier to keep, e.g. `"WA"` for `"Adams County, WA"`.
    /// Qualified names from any other region are rejected.
    pub region: Option<String>,
}

impl NameConvention {
    /// Convention that strips a single type suffix, e.g. `"county"`.
    pub fn with_suffix(suffix: &str) -> Self {
        Self { suffixes: vec![suffix.to_string()], region: None }
    }

    /// Restrict qualified names to the given region.
    pub fn in_region(mut self, region: &str) -> Self {
        self.region = Some(region.to_string());
        self
    }

    /// Compile the convention into a reusable normalizer.
    pub fn compile(&self) -> Result<NameNormalizer> {
        let suffixes = self.suffixes.iter()
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| regex::escape(&s))
            .collect::<Vec<_>>();

        let suffix = (!suffixes.is_empty())
            .then(|| Regex::new(&format!(r"\s+(?:{})$", suffixes.join("|"))))
            .transpose()
            .context("[unit::name] Failed to compile suffix pattern")?;

        let region = self.region.as_deref()
            .map(|r| r.trim().to_lowercase())
            .filter(|r| !r.is_empty());

        Ok(NameNormalizer { suffix, region })
    }
}

/// Compiled form of a [`NameConvention`].
#[derive(Clone, Debug, Default)]
pub struct NameNormalizer {
    suffix: Option<Regex>,
    region: Option<String>,
}

impl NameNormalizer {
    /// Canonical key for `raw`, or `None` if the name is blank or is
    /// qualified with a region other than the configured one.
    pub fn normalize(&self, raw: &str) -> Option<String> {
        let (base, qualifier) = match raw.rsplit_once(',') {
            Some((base, qualifier)) => (base, Some(qualifier.trim().to_lowercase())),
            None => (raw, None),
        };

        if let (Some(region), Some(qualifier)) = (&self.region, &qualifier) {
            if region != qualifier { return None }
        }

        let key = base.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        let key = match &self.suffix {
            Some(re) => re.replace(&key, "").into_owned(),
            None => key,
        };

        (!key.is_empty()).then_some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_case_and_whitespace() {
        let names = NameConvention::default().compile().unwrap();
        assert_eq!(names.normalize("  Grays   Harbor County "), Some("grays harbor county".into()));
        assert_eq!(names.normalize("   "), None);
    }

    #[test]
    fn strips_suffix_and_qualifier() {
        let names = NameConvention::with_suffix("County").compile().unwrap();
        assert_eq!(names.normalize("Adams County, WA"), Some("adams".into()));
        assert_eq!(names.normalize("adams county"), Some("adams".into()));
        assert_eq!(names.normalize("Adams"), Some("adams".into()));
    }

    #[test]
    fn suffix_alone_is_not_stripped() {
        let names = NameConvention::with_suffix("county").compile().unwrap();
        assert_eq!(names.normalize("County"), Some("county".into()));
    }

    #[test]
    fn region_filter_rejects_other_regions() {
        let names = NameConvention::with_suffix("county").in_region("WA").compile().unwrap();
        assert_eq!(names.normalize("Adams County, WA"), Some("adams".into()));
        assert_eq!(names.normalize("Adams County, ID"), None);
        // Unqualified names are accepted as-is.
        assert_eq!(names.normalize("Adams County"), Some("adams".into()));
    }

    #[test]
    fn suffixes_are_matched_literally() {
        let names = NameConvention { suffixes: vec!["city.".into(), "parish".into()], region: None }
            .compile().unwrap();
        assert_eq!(names.normalize("Orleans Parish"), Some("orleans".into()));
        assert_eq!(names.normalize("Carson city."), Some("carson".into()));
        assert_eq!(names.normalize("Carson cityx"), Some("carson cityx".into()));
    }
}

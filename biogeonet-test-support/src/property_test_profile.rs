//! Property-test run profile parsing for local and CI overrides.
//!
//! Every property suite in the workspace reads its case count through this
//! module so one environment variable tunes them all.

use std::env;

/// Environment variable controlling proptest case counts.
pub const BIOGEONET_PROPTEST_CASES_ENV_KEY: &str = "BIOGEONET_PROPTEST_CASES";

/// Runtime profile for property-test execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
}

impl ProptestRunProfile {
    /// Load a profile from the environment, falling back to `default_cases`.
    ///
    /// # Examples
    ///
    /// ```
    /// use biogeonet_test_support::property_test_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32) -> Self {
        let cases = match env::var(BIOGEONET_PROPTEST_CASES_ENV_KEY) {
            Ok(raw) => parse_cases(&raw).unwrap_or_else(|reason| {
                tracing::warn!(
                    env = BIOGEONET_PROPTEST_CASES_ENV_KEY,
                    raw = %raw,
                    reason = %reason,
                    "invalid property-test profile override; using default",
                );
                default_cases
            }),
            Err(_) => default_cases,
        };
        Self { cases }
    }

    /// Number of cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    let parsed = raw
        .trim()
        .parse::<u32>()
        .map_err(|error| format!("parse error: {error}"))?;
    if parsed == 0 {
        return Err("cases must be > 0".to_string());
    }
    Ok(parsed)
}

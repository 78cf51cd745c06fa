//! Request-parameter validation
//!
//! A closed vocabulary of checks dispatched by explicit `match`.
//! Parameters arrive stringly from collaborators; a [`ParamSpec`]
//! resolves absence against its requirement, runs its checks in order,
//! and hands back the effective string for typed parsing.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::KnnConfig;
use crate::error::ServiceError;

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

/// A single validation check
pub enum Check {
    /// The whole value must match the pattern
    Pattern(&'static Regex),
    /// The value must be one of the listed literals
    OneOf(&'static [&'static str]),
    /// The value must satisfy the predicate
    Predicate {
        /// Requirement named in rejection messages
        describe: &'static str,
        /// The predicate itself
        test: Box<dyn Fn(&str) -> bool + Send + Sync>,
    },
}

impl Check {
    /// Build a predicate check
    pub fn predicate(
        describe: &'static str,
        test: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self::Predicate {
            describe,
            test: Box::new(test),
        }
    }
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::OneOf(options) => f.debug_tuple("OneOf").field(options).finish(),
            Self::Predicate { describe, .. } => {
                f.debug_struct("Predicate").field("describe", describe).finish()
            }
        }
    }
}

/// Whether a parameter may be absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// The parameter must be present
    Required,
    /// Absent values fall back to this rendering
    Default(String),
}

/// Declarative spec for one request parameter
#[derive(Debug)]
pub struct ParamSpec {
    name: &'static str,
    requirement: Requirement,
    checks: Vec<Check>,
}

impl ParamSpec {
    /// Start a spec for the named parameter
    #[must_use]
    pub fn new(name: &'static str, requirement: Requirement) -> Self {
        Self {
            name,
            requirement,
            checks: Vec::new(),
        }
    }

    /// Append a check; checks run in the order appended
    #[must_use]
    pub fn check(mut self, check: Check) -> Self {
        self.checks.push(check);
        self
    }

    /// Resolve and validate a raw value into its effective string
    ///
    /// # Errors
    /// `BadValue` when a required value is absent or a check rejects.
    pub fn validate(&self, value: Option<&str>) -> Result<String, ServiceError> {
        let value = match (value, &self.requirement) {
            (Some(v), _) => v.to_string(),
            (None, Requirement::Default(d)) => d.clone(),
            (None, Requirement::Required) => {
                return Err(ServiceError::invalid_param(self.name, "required"));
            }
        };
        for check in &self.checks {
            match check {
                Check::Pattern(re) => {
                    if !re.is_match(&value) {
                        return Err(ServiceError::invalid_param(
                            self.name,
                            format!("`{value}` does not match {}", re.as_str()),
                        ));
                    }
                }
                Check::OneOf(options) => {
                    if !options.contains(&value.as_str()) {
                        return Err(ServiceError::invalid_param(
                            self.name,
                            format!("`{value}` is not one of {options:?}"),
                        ));
                    }
                }
                Check::Predicate { describe, test } => {
                    if !test(&value) {
                        return Err(ServiceError::invalid_param(
                            self.name,
                            format!("`{value}` is not {describe}"),
                        ));
                    }
                }
            }
        }
        Ok(value)
    }
}

/// Spec for the stringly `k` query parameter
///
/// Digits only, within `1..=max_k`, defaulting to the configured k.
#[must_use]
pub fn k_param(config: &KnnConfig) -> ParamSpec {
    let max_k = config.max_k;
    ParamSpec::new("k", Requirement::Default(config.k.to_string()))
        .check(Check::Pattern(&DIGITS))
        .check(Check::predicate("a neighbor count within bounds", move |v| {
            v.parse::<usize>()
                .map(|k| (1..=max_k).contains(&k))
                .unwrap_or(false)
        }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use knn_features::ErrorKind;

    #[test]
    fn required_param_rejects_absence() {
        let spec = ParamSpec::new("id", Requirement::Required);
        let err = spec.validate(None).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadValue);
        assert!(err.to_string().contains("`id`"));
    }

    #[test]
    fn default_fills_absence_and_still_checks() {
        let spec = ParamSpec::new("k", Requirement::Default("3".into()))
            .check(Check::Pattern(&DIGITS));
        assert_eq!(spec.validate(None).unwrap(), "3");
        assert_eq!(spec.validate(Some("12")).unwrap(), "12");
        assert!(spec.validate(Some("x")).is_err());
    }

    #[test]
    fn one_of_accepts_only_listed_literals() {
        static FORMATS: &[&str] = &["text", "json"];
        let spec = ParamSpec::new("format", Requirement::Required).check(Check::OneOf(FORMATS));
        assert_eq!(spec.validate(Some("json")).unwrap(), "json");
        assert!(spec.validate(Some("yaml")).is_err());
    }

    #[test]
    fn checks_run_in_order() {
        let spec = ParamSpec::new("k", Requirement::Required)
            .check(Check::Pattern(&DIGITS))
            .check(Check::predicate("small", |v| v.len() < 2));
        // Fails the pattern before the predicate sees it
        let err = spec.validate(Some("ab")).unwrap_err();
        assert!(err.to_string().contains("does not match"));
    }

    #[test]
    fn k_param_accepts_in_range_digits() {
        let spec = k_param(&KnnConfig::new());
        assert_eq!(spec.validate(Some("1")).unwrap(), "1");
        assert_eq!(spec.validate(Some("32")).unwrap(), "32");
        assert_eq!(spec.validate(None).unwrap(), "3");
    }

    #[test]
    fn k_param_rejects_junk_and_bounds() {
        let spec = k_param(&KnnConfig::new());
        assert!(spec.validate(Some("abc")).is_err());
        assert!(spec.validate(Some("-1")).is_err());
        assert!(spec.validate(Some("0")).is_err());
        assert!(spec.validate(Some("33")).is_err());
        assert!(spec.validate(Some("99999999999999999999")).is_err());
    }

    #[test]
    fn k_param_tracks_configured_bounds() {
        let spec = k_param(&KnnConfig::new().with_k(5).with_max_k(8));
        assert_eq!(spec.validate(None).unwrap(), "5");
        assert!(spec.validate(Some("8")).is_ok());
        assert!(spec.validate(Some("9")).is_err());
    }
}

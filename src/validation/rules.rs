//! Reusable field rules

use super::FieldErrors;
use crate::schema::options::{is_listed, SelectOption};
use crate::state::Selection;

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Accumulates field errors for one payload
#[derive(Debug, Default)]
pub(crate) struct Rules {
    errors: FieldErrors,
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Non-empty after trimming
    pub fn text(&mut self, field: &str, value: &Option<String>, label: &str) -> &mut Self {
        if is_blank(value) {
            self.errors.insert(field, format!("{label} is required"));
        }
        self
    }

    /// Some option picked, from an open list
    pub fn selected(&mut self, field: &str, value: &Option<String>, label: &str) -> &mut Self {
        if is_blank(value) {
            self.errors.insert(field, format!("Please select {label}"));
        }
        self
    }

    /// One of a closed list of options
    pub fn choice(
        &mut self,
        field: &str,
        value: &Option<String>,
        options: &[SelectOption],
        label: &str,
    ) -> &mut Self {
        match value.as_deref().map(str::trim) {
            None | Some("") => self.errors.insert(field, format!("Please select {label}")),
            Some(v) if !is_listed(options, v) => {
                self.errors
                    .insert(field, format!("Please select a valid option for {label}"))
            }
            Some(_) => {}
        }
        self
    }

    /// Present, finite and strictly greater than zero
    pub fn positive(&mut self, field: &str, value: Option<f64>, label: &str) -> &mut Self {
        match value {
            Some(v) if v.is_finite() && v > 0.0 => {}
            _ => self
                .errors
                .insert(field, format!("{label} must be a positive number")),
        }
        self
    }

    /// Present and within `(0, 100]`
    pub fn percentage(&mut self, field: &str, value: Option<f64>, label: &str) -> &mut Self {
        match value {
            Some(v) if v > 0.0 && v <= 100.0 => {}
            _ => self
                .errors
                .insert(field, format!("{label} must be between 0 and 100")),
        }
        self
    }

    /// At least one element selected
    pub fn at_least_one(
        &mut self,
        field: &str,
        value: &Option<Selection>,
        label: &str,
    ) -> &mut Self {
        let empty = value
            .as_ref()
            .map_or(true, |set| set.iter().all(|v| v.trim().is_empty()));
        if empty {
            self.errors
                .insert(field, format!("Please select at least one {label}"));
        }
        self
    }

    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        self.errors.into_result(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::options::TIMELINES;

    fn errors_of(rules: Rules) -> FieldErrors {
        rules.finish(()).err().unwrap_or_default()
    }

    #[test]
    fn test_text_trims_whitespace() {
        let mut rules = Rules::new();
        rules.text("name", &Some("   ".into()), "Name");
        assert_eq!(errors_of(rules).get("name"), Some("Name is required"));
    }

    #[test]
    fn test_choice_distinguishes_missing_and_unlisted() {
        let mut rules = Rules::new();
        rules
            .choice("a", &None, TIMELINES, "a timeline")
            .choice("b", &Some("someday".into()), TIMELINES, "a timeline")
            .choice("c", &Some("2-5_years".into()), TIMELINES, "a timeline");
        let errors = errors_of(rules);
        assert_eq!(errors.get("a"), Some("Please select a timeline"));
        assert_eq!(
            errors.get("b"),
            Some("Please select a valid option for a timeline")
        );
        assert!(!errors.contains("c"));
    }

    #[test]
    fn test_positive_rejects_zero_negative_and_missing() {
        for value in [None, Some(0.0), Some(-3.5), Some(f64::INFINITY)] {
            let mut rules = Rules::new();
            rules.positive("n", value, "N");
            assert!(errors_of(rules).contains("n"), "{value:?}");
        }
        let mut rules = Rules::new();
        rules.positive("n", Some(0.25), "N");
        assert!(rules.finish(()).is_ok());
    }

    #[test]
    fn test_at_least_one_ignores_blank_entries() {
        let mut rules = Rules::new();
        rules.at_least_one("s", &Some([" ".to_string()].into()), "method");
        assert!(errors_of(rules).contains("s"));
    }
}

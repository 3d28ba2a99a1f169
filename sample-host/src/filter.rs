//! Test filtering and selection.
//!
//! Selects registered gameplay tests by tag, `class:name` pattern or exact name.

use crate::gametest::{DEFAULT_SUITE, GameTestRegistration, GameTestRegistry};

/// Criteria for selecting tests to run.
#[derive(Debug, Clone, Default)]
pub struct TestFilter {
    /// Run only tests with these tags (empty = no tag filter)
    pub tags: Vec<String>,
    /// Run only tests whose `class:name` matches one of these globs (`*`, `?`)
    pub name_patterns: Vec<String>,
    /// Run only this test, by `class:name` or bare test name
    pub exact_name: Option<String>,
}

impl TestFilter {
    /// Create a filter that matches all tests.
    pub fn all() -> Self {
        Self::default()
    }

    /// Tests that run when no selection is given: everything but tagged suites.
    pub fn default_suite() -> Self {
        Self::by_tags([DEFAULT_SUITE])
    }

    pub fn by_tags(tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            exact_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn by_patterns(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name_patterns: patterns.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_patterns(mut self, patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.name_patterns.extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Check if a registration matches this filter.
    pub fn matches(&self, test: &GameTestRegistration) -> bool {
        let full_name = test.full_name();

        if let Some(exact) = &self.exact_name
            && *exact != full_name
            && *exact != test.test_name
        {
            return false;
        }

        if !self.name_patterns.is_empty()
            && !self
                .name_patterns
                .iter()
                .any(|pattern| glob_match(pattern, &full_name))
        {
            return false;
        }

        // Any one shared tag is enough
        if !self.tags.is_empty() {
            let tags = test.effective_tags();
            if !self.tags.iter().any(|wanted| tags.contains(wanted)) {
                return false;
            }
        }

        true
    }

    /// Returns true if no filters are set (matches everything).
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.name_patterns.is_empty() && self.exact_name.is_none()
    }
}

impl GameTestRegistry {
    pub fn select(&self, filter: &TestFilter) -> Vec<&GameTestRegistration> {
        self.tests().iter().filter(|t| filter.matches(t)).collect()
    }

    /// Sorted `class:name` of every registered test.
    pub fn list_test_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tests().iter().map(|t| t.full_name()).collect();
        names.sort();
        names
    }

    /// Sorted, de-duplicated effective tags.
    pub fn list_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .tests()
            .iter()
            .flat_map(|t| t.effective_tags())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }
}

/// Glob matching supporting `*` (any run of chars) and `?` (one char).
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('*', rest)) => (0..=text.len()).any(|skip| glob_match_chars(rest, &text[skip..])),
        Some(('?', rest)) => !text.is_empty() && glob_match_chars(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && glob_match_chars(rest, &text[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tags are whitespace separated.
    fn registry_with(tests: &[(&str, &str, &str)]) -> GameTestRegistry {
        let mut registry = GameTestRegistry::new();
        for &(class, name, tags) in tests {
            let mut builder = registry.register(class, name, |_| Ok(()));
            for tag in tags.split_whitespace() {
                builder = builder.tag(tag);
            }
        }
        registry
    }

    fn selected(registry: &GameTestRegistry, filter: &TestFilter) -> Vec<String> {
        registry.select(filter).iter().map(|t| t.full_name()).collect()
    }

    // ==========================================================================
    // TestFilter Tests
    // ==========================================================================

    #[test]
    fn test_filter_all_matches_everything() {
        let registry = registry_with(&[("A", "one", "x"), ("B", "two", "suite:broken")]);
        assert_eq!(selected(&registry, &TestFilter::all()), vec!["A:one", "B:two"]);
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(TestFilter::all().is_empty());
        assert!(!TestFilter::by_tags(["foo"]).is_empty());
        assert!(!TestFilter::by_name("test").is_empty());
        assert!(!TestFilter::by_patterns(["*"]).is_empty());
    }

    #[test]
    fn test_filter_default_suite_skips_broken() {
        let registry = registry_with(&[
            ("StarterTests", "simpleMobTest", ""),
            ("MobBehaviorTests", "phantoms_should_fly_from_cats", "suite:broken"),
            ("ChallengeTests", "minibiomes", "suite:default ride"),
        ]);

        assert_eq!(
            selected(&registry, &TestFilter::default_suite()),
            vec!["StarterTests:simpleMobTest", "ChallengeTests:minibiomes"]
        );
    }

    #[test]
    fn test_filter_by_exact_name() {
        let registry = registry_with(&[
            ("ChallengeTests", "minibiomes", ""),
            ("A", "minibiomes2", ""),
        ]);

        assert_eq!(
            selected(&registry, &TestFilter::by_name("ChallengeTests:minibiomes")),
            vec!["ChallengeTests:minibiomes"]
        );
        assert_eq!(
            selected(&registry, &TestFilter::by_name("minibiomes")),
            vec!["ChallengeTests:minibiomes"]
        );
    }

    #[test]
    fn test_filter_by_tags_any() {
        let registry = registry_with(&[
            ("A", "one", "redstone"),
            ("A", "two", "copper"),
            ("A", "three", "iron"),
        ]);
        let filter = TestFilter::by_tags(["redstone", "copper"]);
        assert_eq!(selected(&registry, &filter), vec!["A:one", "A:two"]);
    }

    #[test]
    fn test_filter_by_pattern_over_full_name() {
        let registry = registry_with(&[
            ("MobBehaviorTests", "phantoms", ""),
            ("MobBehaviorTests", "cats", ""),
            ("ChallengeTests", "minibiomes", ""),
        ]);

        assert_eq!(
            selected(&registry, &TestFilter::by_patterns(["MobBehavior*"])),
            vec!["MobBehaviorTests:phantoms", "MobBehaviorTests:cats"]
        );
        assert_eq!(
            selected(&registry, &TestFilter::by_patterns(["*:c?ts"])),
            vec!["MobBehaviorTests:cats"]
        );
    }

    #[test]
    fn test_filter_combined_tags_and_patterns() {
        let registry = registry_with(&[
            ("A", "repeater_test", "redstone"),
            ("B", "repeater_test", "copper"),
            ("C", "repeater", "redstone"),
        ]);
        let filter = TestFilter::all()
            .with_tags(["redstone"])
            .with_patterns(["*_test"]);

        assert_eq!(selected(&registry, &filter), vec!["A:repeater_test"]);
    }

    #[test]
    fn test_registry_listings() {
        let registry = registry_with(&[("B", "two", "mobs"), ("A", "one", "suite:broken mobs")]);

        assert_eq!(registry.list_test_names(), vec!["A:one", "B:two"]);
        assert_eq!(registry.list_tags(), vec!["mobs", "suite:broken", "suite:default"]);
    }

    // ==========================================================================
    // Glob Matching Tests
    // ==========================================================================

    #[test]
    fn test_glob_exact_match() {
        assert!(glob_match("hello", "hello"));
        assert!(!glob_match("hello", "world"));
        assert!(!glob_match("hello", "hello_world"));
    }

    #[test]
    fn test_glob_star() {
        assert!(glob_match("hello*", "hello"));
        assert!(glob_match("*world", "hello_world"));
        assert!(glob_match("hello*world", "hello_big_world"));
        assert!(!glob_match("hello*world", "hello_worlds"));
        assert!(glob_match("*a*b*", "xaxbx"));
        assert!(!glob_match("*a*b*", "ba"));
    }

    #[test]
    fn test_glob_question_mark() {
        assert!(glob_match("h?llo", "hello"));
        assert!(!glob_match("h?llo", "hllo"));
        assert!(!glob_match("h?llo", "heello"));
    }

    #[test]
    fn test_glob_empty() {
        assert!(glob_match("", ""));
        assert!(glob_match("*", ""));
        assert!(glob_match("*", "anything"));
        assert!(!glob_match("?", ""));
    }
}

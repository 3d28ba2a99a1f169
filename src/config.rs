//! Environment configuration.
//!
//! Values come from the process environment after `.env` has been loaded.
//! Gameplay-test selection follows the priority
//! `GAMETEST_TEST` > `GAMETEST_PATTERN` > `GAMETEST_TAGS` > default suite.

use std::env;

use anyhow::{Context, Result, bail};
use sample_host::{DispatcherConfig, TestFilter};

pub const DISPATCH_INTERVAL_VAR: &str = "HOWTO_DISPATCH_INTERVAL";
pub const TEST_VAR: &str = "GAMETEST_TEST";
pub const PATTERN_VAR: &str = "GAMETEST_PATTERN";
pub const TAGS_VAR: &str = "GAMETEST_TAGS";

/// Which gameplay tests a run picks up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestSelection {
    Name(String),
    Pattern(String),
    Tags(Vec<String>),
    DefaultSuite,
}

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    pub dispatch_interval: u64,
    pub test_selection: TestSelection,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            dispatch_interval: DispatcherConfig::default().dispatch_interval,
            test_selection: TestSelection::DefaultSuite,
        }
    }
}

impl GalleryConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(DISPATCH_INTERVAL_VAR) {
            let interval: u64 = raw
                .trim()
                .parse()
                .with_context(|| {
                    format!("{DISPATCH_INTERVAL_VAR} must be a tick count, got '{raw}'")
                })?;
            if interval == 0 {
                bail!("{DISPATCH_INTERVAL_VAR} must be at least 1");
            }
            config.dispatch_interval = interval;
        }

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        config.test_selection = if let Some(name) = non_empty(TEST_VAR) {
            TestSelection::Name(name.trim().to_string())
        } else if let Some(pattern) = non_empty(PATTERN_VAR) {
            TestSelection::Pattern(pattern.trim().to_string())
        } else if let Some(tags) = non_empty(TAGS_VAR) {
            TestSelection::Tags(
                tags.split(',')
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect(),
            )
        } else {
            TestSelection::DefaultSuite
        };

        Ok(config)
    }

    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig {
            dispatch_interval: self.dispatch_interval,
            ..Default::default()
        }
    }

    pub fn test_filter(&self) -> TestFilter {
        match &self.test_selection {
            TestSelection::Name(name) => TestFilter::by_name(name.as_str()),
            TestSelection::Pattern(pattern) => TestFilter::by_patterns([pattern.as_str()]),
            TestSelection::Tags(tags) => TestFilter::by_tags(tags.iter().cloned()),
            TestSelection::DefaultSuite => TestFilter::default_suite(),
        }
    }
}

//! Gameplay-test execution engine.
//!
//! The `TestRunner` gives every test a fresh world from the host adapter, runs
//! its setup once and then polls its success conditions tick by tick.

use std::fmt::{Display, Formatter};
use std::time::Instant;

use serde::Serialize;

use crate::filter::TestFilter;
use crate::gametest::{GameTest, GameTestError, GameTestRegistration, GameTestRegistry};
use crate::traits::{BlockLocation, HostAdapter};

/// Configuration for test execution
#[derive(Debug, Clone, Default)]
pub struct TestRunConfig {
    /// World position test-relative coordinates are measured from
    pub origin: BlockLocation,
}

/// Outcome of one gameplay test
#[derive(Debug, Clone, Serialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    /// Tick the test finished on
    pub total_ticks: u64,
    pub execution_time_ms: u64,
    pub structure_name: Option<String>,
    pub message: Option<String>,
}

impl TestResult {
    fn new(registration: &GameTestRegistration) -> Self {
        Self {
            name: registration.full_name(),
            success: false,
            total_ticks: 0,
            execution_time_ms: 0,
            structure_name: registration.structure_name.clone(),
            message: None,
        }
    }

    fn finish(mut self, tick: u64, start: Instant, outcome: Result<(), GameTestError>) -> Self {
        self.total_ticks = tick;
        self.execution_time_ms = start.elapsed().as_millis() as u64;
        match outcome {
            Ok(()) => self.success = true,
            Err(err) => self.message = Some(err.to_string()),
        }
        self
    }
}

/// Aggregate of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct TestSummary {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub results: Vec<TestResult>,
}

impl TestSummary {
    pub fn from_results(results: Vec<TestResult>) -> Self {
        let passed_tests = results.iter().filter(|r| r.success).count();
        Self {
            total_tests: results.len(),
            passed_tests,
            failed_tests: results.len() - passed_tests,
            results,
        }
    }
}

impl Display for TestSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for result in &self.results {
            if result.success {
                writeln!(f, "PASS {} (tick {})", result.name, result.total_ticks)?;
            } else {
                writeln!(
                    f,
                    "FAIL {} (tick {}): {}",
                    result.name,
                    result.total_ticks,
                    result.message.as_deref().unwrap_or("unknown failure")
                )?;
            }
        }
        write!(f, "Passed: {}/{}", self.passed_tests, self.total_tests)
    }
}

/// Test execution engine
pub struct TestRunner<'a, A: HostAdapter> {
    adapter: &'a A,
    config: TestRunConfig,
}

impl<'a, A: HostAdapter> TestRunner<'a, A> {
    pub fn new(adapter: &'a A, config: TestRunConfig) -> Self {
        Self { adapter, config }
    }

    /// Run a single test
    pub fn run_test(&self, registration: &GameTestRegistration) -> TestResult {
        let start_time = Instant::now();
        let result = TestResult::new(registration);
        let world = self.adapter.create_test_world();
        let mut test = GameTest::new(world, self.config.origin);

        tracing::debug!(
            test = %result.name,
            structure = ?registration.structure_name,
            "starting gametest"
        );

        if let Err(err) = registration.set_up(&mut test) {
            return result.finish(0, start_time, Err(err));
        }

        let max_ticks = u64::from(registration.max_ticks);
        let mut last_failure = None;
        for tick in 0..=max_ticks {
            match test.check_conditions() {
                Some(Ok(())) => return result.finish(tick, start_time, Ok(())),
                Some(Err(err)) => last_failure = Some(err),
                None => {}
            }
            test.do_tick();
        }

        let err = match last_failure {
            Some(err) => GameTestError::Timeout {
                max_ticks: registration.max_ticks,
                last_failure: err.to_string(),
            },
            None => GameTestError::NoSuccessCondition,
        };
        result.finish(max_ticks, start_time, Err(err))
    }

    /// Run multiple tests
    pub fn run_tests<'r>(
        &self,
        registrations: impl IntoIterator<Item = &'r GameTestRegistration>,
    ) -> TestSummary {
        let results: Vec<TestResult> = registrations
            .into_iter()
            .map(|registration| {
                let result = self.run_test(registration);
                if result.success {
                    tracing::info!(
                        test = %result.name,
                        tick = result.total_ticks,
                        "gametest passed"
                    );
                } else {
                    tracing::info!(
                        test = %result.name,
                        message = ?result.message,
                        "gametest failed"
                    );
                }
                result
            })
            .collect();
        TestSummary::from_results(results)
    }

    /// Run every registered test the filter selects
    pub fn run_registry(&self, registry: &GameTestRegistry, filter: &TestFilter) -> TestSummary {
        tracing::info!(
            version = %self.adapter.server_info().minecraft_version,
            "running gametests"
        );
        self.run_tests(registry.tests().iter().filter(|t| filter.matches(t)))
    }
}

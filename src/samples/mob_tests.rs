//! Gameplay-test samples: mob behaviour and rideable entities.

use sample_host::{GameTest, GameTestError, GameTestRegistry, Location, SampleContext, Status};

/// The fox should attack the chicken.
fn simple_mob(test: &mut GameTest) -> Result<(), GameTestError> {
    let attacker = "fox";
    let victim = "chicken";

    test.spawn(attacker, [5, 2, 5]);
    test.spawn(victim, [2, 2, 2]);

    test.assert_entity_present_in_area(victim, true)?;

    test.succeed_when(move |test| test.assert_entity_present_in_area(victim, false));
    Ok(())
}

pub fn register_simple_mob_test(registry: &mut GameTestRegistry) {
    registry
        .register("StarterTests", "simpleMobTest", simple_mob)
        .max_ticks(400)
        .structure_name("gametests:mediumglass");
}

/// Sample step: makes `StarterTests:simpleMobTest` available to the test runner.
pub fn simple_mob_test(ctx: &mut SampleContext<'_>, _target: Location) {
    let registered = match ctx.gametests() {
        Some(mut registry) => {
            register_simple_mob_test(&mut registry);
            true
        }
        None => false,
    };

    if registered {
        ctx.log("Registered gametest StarterTests:simpleMobTest");
    } else {
        ctx.log_status("No gametest runner is attached", Status::Failure);
    }
}

/// Phantoms should fly away from cats, but get "captured" by them.
fn phantoms_should_fly_from_cats(test: &mut GameTest) -> Result<(), GameTestError> {
    let cat = "cat";
    let phantom = "phantom";

    test.spawn(cat, [4, 3, 3]);
    test.spawn(phantom, [4, 3, 3]);

    test.succeed_when_entity_present(phantom, [4, 6, 3], true);
    Ok(())
}

/// Roller coaster obstacle course: a pig rides a minecart to the exit.
fn minibiomes(test: &mut GameTest) -> Result<(), GameTestError> {
    let minecart = test.spawn("minecart", [9, 7, 7]);
    let pig = test.spawn("pig", [9, 7, 7]);

    test.set_block_type("minecraft:cobblestone", [10, 7, 7]);
    test.add_rider(minecart, pig)?;

    test.succeed_when_entity_present("pig", [8, 3, 1], true);
    Ok(())
}

/// Tests registered at startup, independent of chat commands.
pub fn register_gametests(registry: &mut GameTestRegistry) {
    registry
        .register(
            "MobBehaviorTests",
            "phantoms_should_fly_from_cats",
            phantoms_should_fly_from_cats,
        )
        .structure_name("gametests:glass_cells")
        .tag("suite:broken");

    registry
        .register("ChallengeTests", "minibiomes", minibiomes)
        .structure_name("gametests:minibiomes")
        .max_ticks(160);
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use sample_host::{MockAdapter, MockWorld, TestFilter, TestRunConfig, TestRunner};

    fn run(registry: &GameTestRegistry, name: &str) -> sample_host::TestResult {
        let adapter = MockAdapter::new();
        let runner = TestRunner::new(&adapter, TestRunConfig::default());
        runner.run_test(registry.get(name).unwrap())
    }

    #[test]
    fn test_startup_registrations() {
        let mut registry = GameTestRegistry::new();
        register_gametests(&mut registry);

        let phantoms = registry
            .get("MobBehaviorTests:phantoms_should_fly_from_cats")
            .unwrap();
        assert_eq!(phantoms.structure_name.as_deref(), Some("gametests:glass_cells"));
        assert_eq!(phantoms.tags, vec!["suite:broken"]);

        let minibiomes = registry.get("ChallengeTests:minibiomes").unwrap();
        assert_eq!(minibiomes.max_ticks, 160);
        assert_eq!(minibiomes.structure_name.as_deref(), Some("gametests:minibiomes"));

        // The broken phantom test stays out of the default run
        let names: Vec<_> = registry
            .select(&TestFilter::default_suite())
            .iter()
            .map(|t| t.full_name())
            .collect();
        assert_eq!(names, vec!["ChallengeTests:minibiomes"]);
    }

    #[test]
    fn test_simple_mob_step_registers_with_runner() {
        let registry = Rc::new(RefCell::new(GameTestRegistry::new()));
        let mut world = MockWorld::new();

        let mut ctx = SampleContext::new(&mut world, "simpleMobTest0")
            .with_gametests(Some(Rc::clone(&registry)));
        simple_mob_test(&mut ctx, Location::default());
        drop(ctx);

        let registry = registry.borrow();
        let test = registry.get("StarterTests:simpleMobTest").unwrap();
        assert_eq!(test.max_ticks, 400);
        assert_eq!(test.structure_name.as_deref(), Some("gametests:mediumglass"));
        assert_eq!(world.chat_log(), ["Registered gametest StarterTests:simpleMobTest"]);
    }

    #[test]
    fn test_simple_mob_step_without_runner_fails() {
        let mut world = MockWorld::new();
        simple_mob_test(
            &mut SampleContext::new(&mut world, "simpleMobTest0"),
            Location::default(),
        );
        assert_eq!(world.chat_log(), ["FAIL: No gametest runner is attached"]);
    }

    #[test]
    fn test_simple_mob_times_out_while_chicken_lives() {
        let mut registry = GameTestRegistry::new();
        register_simple_mob_test(&mut registry);

        let result = run(&registry, "StarterTests:simpleMobTest");
        assert!(!result.success);
        assert_eq!(result.total_ticks, 400);
        assert_eq!(
            result.message.as_deref(),
            Some("timed out after 400 ticks: expected 'chicken' to be absent from the test area")
        );
    }

    #[test]
    fn test_minibiomes_mounts_pig_then_waits_for_exit() {
        let mut registry = GameTestRegistry::new();
        register_gametests(&mut registry);

        let result = run(&registry, "ChallengeTests:minibiomes");
        assert!(!result.success);
        assert_eq!(
            result.message.as_deref(),
            Some("timed out after 160 ticks: expected 'pig' to be present at [8, 3, 1]")
        );
    }

    #[test]
    fn test_phantoms_setup_spawns_both_mobs() {
        let mut test = GameTest::new(Box::new(MockWorld::new()), [0, 0, 0]);
        phantoms_should_fly_from_cats(&mut test).unwrap();

        assert!(test.assert_entity_present("cat", [4, 3, 3], true).is_ok());
        assert!(test.assert_entity_present("phantom", [4, 3, 3], true).is_ok());
    }

    #[test]
    fn test_minibiomes_setup_places_obstacle_and_rider() {
        let mut test = GameTest::new(Box::new(MockWorld::new()), [0, 0, 0]);
        minibiomes(&mut test).unwrap();

        assert_eq!(test.world().get_block([10, 7, 7]).id, "minecraft:cobblestone");
        let cart = test
            .world()
            .entities()
            .into_iter()
            .find(|e| e.is_type("minecart"))
            .unwrap();
        assert_eq!(cart.riders.len(), 1);
    }
}

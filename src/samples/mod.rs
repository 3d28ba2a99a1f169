//! The how-to samples shipped with the gallery.

mod mob_tests;
mod spawn_item;

pub use mob_tests::{register_gametests, register_simple_mob_test, simple_mob_test};
pub use spawn_item::{spawn_item, test_that_entity_is_feather_item};

use sample_host::{SampleStep, step};

/// Chat-triggerable samples, in listing order.
pub fn catalog() -> Vec<(&'static str, Vec<SampleStep>)> {
    vec![
        (
            "spawnItem",
            vec![step(spawn_item), step(test_that_entity_is_feather_item)],
        ),
        ("simpleMobTest", vec![step(simple_mob_test)]),
    ]
}

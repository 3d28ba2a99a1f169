//! Item samples: drop a feather, then look for it.

use sample_host::{ItemStack, Location, SampleContext, Status};

/// Radius searched by [`test_that_entity_is_feather_item`]
const SEARCH_RADIUS: f64 = 20.0;

/// Creates a free-floating feather item at the target location.
pub fn spawn_item(ctx: &mut SampleContext<'_>, target: Location) {
    let feather = ItemStack::new("minecraft:feather");

    ctx.world().spawn_item(&feather, target);
    ctx.log(&format!("New feather created at {target}!"));
}

/// Reports success for every feather item entity near the target.
pub fn test_that_entity_is_feather_item(ctx: &mut SampleContext<'_>, target: Location) {
    let nearby = ctx.world().entities_near(target, SEARCH_RADIUS);

    for entity in nearby {
        if let Some(item) = &entity.item
            && item.id.ends_with("feather")
        {
            ctx.log_status("Success! Found a feather", Status::Success);
        }
    }
}

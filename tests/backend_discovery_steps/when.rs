//! When steps for backend discovery BDD scenarios.

use super::world::{BareManager, DiscoveryWorld, TaggedManager};
use eyre::WrapErr;
use inferlink::backend_manager::domain::BackendName;
use rstest_bdd_macros::when;

#[when(r#"a manager tagged "{tag}" is registered as "{name}" with enum name "{enum_name}""#)]
fn register_tagged(
    world: &mut DiscoveryWorld,
    tag: String,
    name: String,
    enum_name: String,
) -> Result<(), eyre::Report> {
    let tag = BackendName::new(tag)?;
    world
        .registry
        .register(&name, Some(&enum_name))?
        .install(TaggedManager { tag })
        .wrap_err("install tagged manager")?;
    Ok(())
}

#[when(r#"a bare manager is registered as "{name}""#)]
fn register_bare(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    world
        .registry
        .register(&name, None)?
        .install(BareManager)
        .wrap_err("install bare manager")?;
    Ok(())
}

#[when(r#""{name}" is looked up"#)]
fn look_up(world: &mut DiscoveryWorld, name: String) {
    world.last_lookup = Some(world.registry.find(&name));
}

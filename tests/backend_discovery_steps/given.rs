//! Given steps for backend discovery BDD scenarios.

use super::world::{DiscoveryWorld, TaggedManager};
use inferlink::backend_manager::{
    adapters::catalog::PluginInitError, domain::BackendName, services::ManagerRegistry,
};
use rstest_bdd_macros::given;

fn register_lazy(registry: &ManagerRegistry) -> Result<(), PluginInitError> {
    let tag = BackendName::new("lazy")?;
    registry.register("lazy", None)?.install(TaggedManager { tag })?;
    Ok(())
}

fn fail_to_initialise(_registry: &ManagerRegistry) -> Result<(), PluginInitError> {
    Err("native runtime missing".into())
}

#[given("an empty backend registry")]
fn empty_registry(world: &mut DiscoveryWorld) {
    *world = DiscoveryWorld::new();
}

#[given(r#"a published plugin that registers "lazy""#)]
fn published_lazy_plugin(world: &mut DiscoveryWorld) -> Result<(), eyre::Report> {
    let name = BackendName::new("lazy")?;
    let module_path = world.registry.module_path(&name);
    world.catalog.publish(module_path, register_lazy);
    Ok(())
}

#[given(r#"a published plugin for "{name}" that fails to initialise"#)]
fn published_failing_plugin(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let backend = BackendName::new(name)?;
    let module_path = world.registry.module_path(&backend);
    world.catalog.publish(module_path, fail_to_initialise);
    Ok(())
}

//! Then steps for backend discovery BDD scenarios.

use super::world::DiscoveryWorld;
use inferlink::backend_manager::{
    domain::{BackendName, BuildWrapperRequest},
    ports::ManagerError,
    services::RegistryError,
};
use rstest_bdd_macros::then;

#[then(r#"the enumeration member "{enum_name}" stands for "{name}""#)]
fn member_stands_for(
    world: &mut DiscoveryWorld,
    enum_name: String,
    name: String,
) -> Result<(), eyre::Report> {
    let variant = world
        .registry
        .variant(&enum_name)
        .ok_or_else(|| eyre::eyre!("no enumeration member {enum_name}"))?;
    if variant.value().as_str() != name {
        return Err(eyre::eyre!("{enum_name} stands for {}", variant.value()));
    }
    Ok(())
}

#[then(r#"finding "{name}" returns a manager"#)]
fn finding_returns_manager(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    if world.registry.find(&name).is_none() {
        return Err(eyre::eyre!("expected a manager for '{name}'"));
    }
    Ok(())
}

#[then(r#"finding "{name}" returns nothing"#)]
fn finding_returns_nothing(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    if world.registry.find(&name).is_some() {
        return Err(eyre::eyre!("expected no manager for '{name}'"));
    }
    if matches!(world.last_lookup, Some(Some(_))) {
        return Err(eyre::eyre!("the earlier lookup of '{name}' found a manager"));
    }
    Ok(())
}

#[then(r#"a wrapper built by "{name}" for input "{input}" and output "{output}" reports those names"#)]
fn wrapper_reports_names(
    world: &mut DiscoveryWorld,
    name: String,
    input: String,
    output: String,
) -> Result<(), eyre::Report> {
    let manager = world
        .registry
        .find(&name)
        .ok_or_else(|| eyre::eyre!("no manager for '{name}'"))?;
    let request = BuildWrapperRequest::new(["model.bin"])
        .with_input_names([input.as_str()])
        .with_output_names([output.as_str()]);
    let wrapper = manager.build_wrapper(request)?;
    if wrapper.input_names() != [input] || wrapper.output_names() != [output] {
        return Err(eyre::eyre!(
            "wrapper reports {:?} -> {:?}",
            wrapper.input_names(),
            wrapper.output_names()
        ));
    }
    Ok(())
}

#[then(r#"wrappers built by "{name}" come from "{tag}""#)]
fn wrappers_come_from(
    world: &mut DiscoveryWorld,
    name: String,
    tag: String,
) -> Result<(), eyre::Report> {
    let wrapper = world
        .registry
        .build_wrapper(&name, BuildWrapperRequest::new(["model.bin"]))?;
    let expected = BackendName::new(tag)?;
    if wrapper.backend() != &expected {
        return Err(eyre::eyre!("wrapper came from {}", wrapper.backend()));
    }
    Ok(())
}

#[then("the registry enumerates {count:usize} backends")]
fn registry_enumerates(world: &mut DiscoveryWorld, count: usize) -> Result<(), eyre::Report> {
    let variants = world.registry.variants();
    if variants.len() != count || world.registry.len() != count {
        return Err(eyre::eyre!(
            "expected {count} backends, found {} members and {} managers",
            variants.len(),
            world.registry.len()
        ));
    }
    Ok(())
}

#[then(r#"the plugin for "{name}" is loaded"#)]
fn plugin_loaded(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let module_path = world.registry.module_path(&BackendName::new(name)?);
    if !world.catalog.is_loaded(&module_path) {
        return Err(eyre::eyre!("expected {module_path} to be loaded"));
    }
    Ok(())
}

#[then(r#"the plugin for "{name}" is not loaded"#)]
fn plugin_not_loaded(world: &mut DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    let module_path = world.registry.module_path(&BackendName::new(name)?);
    if world.catalog.is_loaded(&module_path) {
        return Err(eyre::eyre!("expected {module_path} to stay pending"));
    }
    Ok(())
}

#[then(r#"building a wrapper with "{name}" fails as not implemented"#)]
fn build_not_implemented(world: &DiscoveryWorld, name: String) -> Result<(), eyre::Report> {
    match world
        .registry
        .build_wrapper(&name, BuildWrapperRequest::new(["model.bin"]))
    {
        Ok(_) => Err(eyre::eyre!("expected '{name}' to refuse building a wrapper")),
        Err(RegistryError::Manager(ManagerError::NotImplemented { .. })) => Ok(()),
        Err(other) => Err(eyre::eyre!("unexpected error: {other}")),
    }
}

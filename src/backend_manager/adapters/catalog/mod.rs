//! Discovery adapter over a table of linked-in backend plugins.

mod plugin;

pub use plugin::{PluginCatalog, PluginInit, PluginInitError};

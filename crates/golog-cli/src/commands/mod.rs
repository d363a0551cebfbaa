pub mod plan;
pub mod run;

use golog_actions::{ActionRegistry, register_builtins};
use golog_kernel::Engine;

use crate::opts::EngineOpts;

/// Engine with the built-in and logistics actions registered.
pub fn create_engine(opts: &EngineOpts) -> Engine {
    let builtins = opts.builtin_config();
    let mut registry = ActionRegistry::new();
    register_builtins(&mut registry, &builtins);
    golog_logistics::register(&mut registry, &builtins);
    Engine::new(registry, opts.engine_config())
}

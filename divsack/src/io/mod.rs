mod export;
mod import;

/// External (serializable) representations of items, parameters and selections.
pub mod ext_repr;

/// Exports a selection out of the library.
pub use export::export;

/// Imports an instance into the library.
pub use import::import_instance;

/// Imports a set of parameters into the library.
pub use import::import_parameters;

#![doc = document_features::document_features!()]
//! `divsack` selects a value-maximizing group of items under weight and volume capacities,
//! a minimum-value floor and limits on how much of the selected value may be concentrated in a
//! single item, manufacturer or product type.

/// Entities to model the selection problem: items, groups and parameters
pub mod entities;

/// Validity scoring of groups against parameters
pub mod eval;

/// Greedy admission heuristics
pub mod greedy;

/// Formulation of the selection problem as an abstract 0/1 integer linear program
pub mod model;

/// Solver capability interface and the shipped backends
pub mod solver;

/// Mapping solver outcomes back onto groups
pub mod assemble;

/// Strategy dispatch: the single entry point of the library
pub mod select;

/// Importing instances into and exporting selections out of this library
pub mod io;

/// Helper functions and configuration which do not belong to any specific module
pub mod util;

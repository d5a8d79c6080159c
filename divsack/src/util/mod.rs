/// Set of functions used throughout to assure the correctness of the library.
pub mod assertions;

mod config;
mod fixed_point;

#[doc(inline)]
pub use config::LinearizationMode;
#[doc(inline)]
pub use config::SelectionConfig;
#[doc(inline)]
pub use config::SelectionStrategy;
#[doc(inline)]
pub use fixed_point::FixedPoint;

mod validity;

#[doc(inline)]
pub use validity::ValidationResult;

#[doc(inline)]
pub use validity::exceeds_share;

#[doc(inline)]
pub use validity::share;

#[doc(inline)]
pub use validity::Violation;

#[doc(inline)]
pub use validity::score;

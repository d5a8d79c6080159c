mod group;
mod instance;
mod item;
mod parameters;

#[doc(inline)]
pub use item::Item;

#[doc(inline)]
pub use instance::Instance;

#[doc(inline)]
pub use group::Group;

#[doc(inline)]
pub use parameters::Parameters;

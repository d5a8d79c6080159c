mod selector;

#[doc(inline)]
pub use selector::GreedySelector;

#[doc(inline)]
pub use selector::GreedyVariant;

#[doc(inline)]
pub use selector::greedy_order;

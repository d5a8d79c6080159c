mod formulator;
mod program;

#[doc(inline)]
pub use formulator::Formulation;
#[doc(inline)]
pub use formulator::Formulator;

#[doc(inline)]
pub use program::Comparison;
#[doc(inline)]
pub use program::ConstraintKind;
#[doc(inline)]
pub use program::LinearConstraint;
#[doc(inline)]
pub use program::LinearExpr;
#[doc(inline)]
pub use program::MaxEquality;
#[doc(inline)]
pub use program::Program;
#[doc(inline)]
pub use program::VarId;
#[doc(inline)]
pub use program::VarKind;
#[doc(inline)]
pub use program::Variable;

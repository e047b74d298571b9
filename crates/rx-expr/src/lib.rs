//! rx-expr: biblioteca de árboles de expresión citados (quotations).
//!
//! Un `Expr` representa un cómputo como dato inmutable en lugar de su
//! resultado ejecutado. El resto del workspace (modelo de artifacts,
//! provider, binder) construye y reescribe estos árboles; esta crate no
//! conoce nada de recursos remotos ni de suscripciones.

pub mod expr;
pub mod types;
pub mod visit;

pub use expr::{Expr, IntrinsicOp, ParamDecl};
pub use types::TypeRef;
pub use visit::{substitute_params, try_rewrite_free_params};

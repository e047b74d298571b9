//! Descriptores estructurales de tipo en runtime.
//!
//! Los nodos del árbol se comparan por forma (`kind`) y por el `TypeRef`
//! que declaran. No hay reflexión: la selección genérica del binder se
//! resuelve inspeccionando estas formas con `match`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tipo estructural de un nodo de expresión.
///
/// `Json` es el escalar/registro neutro (payloads serde sin semántica),
/// igual que el payload neutro de un artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Unit,
    Json,
    /// Tipo nominal opaco (para contratos que este núcleo no interpreta).
    Named(String),
    Observable(Box<TypeRef>),
    Observer(Box<TypeRef>),
    Subject { input: Box<TypeRef>, output: Box<TypeRef> },
    Subscription,
    Func { args: Vec<TypeRef>, ret: Box<TypeRef> },
    Tuple(Vec<TypeRef>),
    /// El contexto vivo de ejecución; sólo aparece como parámetro del
    /// lambda producido por el binder, nunca dentro de un artifact.
    Context,
    CancellationToken,
    Metadata,
}

impl TypeRef {
    pub fn observable(element: TypeRef) -> Self {
        TypeRef::Observable(Box::new(element))
    }

    pub fn observer(element: TypeRef) -> Self {
        TypeRef::Observer(Box::new(element))
    }

    pub fn subject(input: TypeRef, output: TypeRef) -> Self {
        TypeRef::Subject { input: Box::new(input), output: Box::new(output) }
    }

    pub fn func(args: Vec<TypeRef>, ret: TypeRef) -> Self {
        TypeRef::Func { args, ret: Box::new(ret) }
    }

    /// Tipo de elemento para Observable/Observer.
    pub fn element(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Observable(t) | TypeRef::Observer(t) => Some(t),
            _ => None,
        }
    }

    /// Descompone un tipo función en (argumentos, retorno).
    pub fn func_shape(&self) -> Option<(&[TypeRef], &TypeRef)> {
        match self {
            TypeRef::Func { args, ret } => Some((args.as_slice(), ret)),
            _ => None,
        }
    }

    /// Aridad declarada: número de argumentos si es función, 0 si no.
    pub fn arity(&self) -> usize {
        match self {
            TypeRef::Func { args, .. } => args.len(),
            _ => 0,
        }
    }

    pub fn is_func(&self) -> bool {
        matches!(self, TypeRef::Func { .. })
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Unit => write!(f, "()"),
            TypeRef::Json => write!(f, "json"),
            TypeRef::Named(n) => write!(f, "{}", n),
            TypeRef::Observable(t) => write!(f, "observable<{}>", t),
            TypeRef::Observer(t) => write!(f, "observer<{}>", t),
            TypeRef::Subject { input, output } => write!(f, "subject<{}, {}>", input, output),
            TypeRef::Subscription => write!(f, "subscription"),
            TypeRef::Func { args, ret } => {
                write!(f, "fn(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ") -> {}", ret)
            }
            TypeRef::Tuple(items) => {
                write!(f, "(")?;
                for (i, t) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", t)?;
                }
                write!(f, ")")
            }
            TypeRef::Context => write!(f, "context"),
            TypeRef::CancellationToken => write!(f, "cancellation"),
            TypeRef::Metadata => write!(f, "metadata"),
        }
    }
}

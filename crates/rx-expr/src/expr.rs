//! Nodos del árbol de expresión.
//!
//! Los nodos son valores inmutables (`Clone`/`PartialEq`/serde); toda
//! "modificación" produce un árbol nuevo. `Expr::ty()` es total: nunca
//! falla, reporta el tipo declarado incluso para aplicaciones mal
//! formadas (validar formas es trabajo del binder, no del árbol).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::types::TypeRef;

/// Operaciones intrínsecas del árbol. Son etiquetas de nodo fijadas en
/// construcción, de modo que el despacho del binder nunca compara nombres
/// controlados por el usuario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntrinsicOp {
    /// Suscripción directa observable × observer.
    Subscribe,
}

/// Declaración de parámetro de un lambda.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeRef,
}

/// Árbol de expresión citado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Constant { value: Value, ty: TypeRef },
    Parameter { name: String, ty: TypeRef },
    Invoke { callee: Box<Expr>, args: Vec<Expr> },
    Lambda { params: Vec<ParamDecl>, body: Box<Expr> },
    Call { target: Box<Expr>, method: String, type_args: Vec<TypeRef>, args: Vec<Expr>, ret: TypeRef },
    TupleNew { items: Vec<Expr> },
    Intrinsic { op: IntrinsicOp },
}

impl Expr {
    pub fn constant(value: Value, ty: TypeRef) -> Self {
        Expr::Constant { value, ty }
    }

    pub fn parameter(name: impl Into<String>, ty: TypeRef) -> Self {
        Expr::Parameter { name: name.into(), ty }
    }

    pub fn invoke(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Invoke { callee: Box::new(callee), args }
    }

    pub fn lambda(params: Vec<ParamDecl>, body: Expr) -> Self {
        Expr::Lambda { params, body: Box::new(body) }
    }

    pub fn call(target: Expr, method: impl Into<String>, type_args: Vec<TypeRef>, args: Vec<Expr>, ret: TypeRef) -> Self {
        Expr::Call { target: Box::new(target),
                     method: method.into(),
                     type_args,
                     args,
                     ret }
    }

    pub fn tuple(items: Vec<Expr>) -> Self {
        Expr::TupleNew { items }
    }

    pub fn subscribe_intrinsic() -> Self {
        Expr::Intrinsic { op: IntrinsicOp::Subscribe }
    }

    /// Tipo del nodo (el tipo de elemento al que evalúa).
    ///
    /// - `Invoke` sobre un tipo función devuelve el retorno declarado.
    /// - `Invoke` sin argumentos sobre un no-función es el envoltorio de
    ///   "instanciación" de una quotation: conserva el tipo del callee.
    pub fn ty(&self) -> TypeRef {
        match self {
            Expr::Constant { ty, .. } => ty.clone(),
            Expr::Parameter { ty, .. } => ty.clone(),
            Expr::Invoke { callee, .. } => match callee.ty() {
                TypeRef::Func { ret, .. } => *ret,
                other => other,
            },
            Expr::Lambda { params, body } => {
                TypeRef::func(params.iter().map(|p| p.ty.clone()).collect(), body.ty())
            }
            Expr::Call { ret, .. } => ret.clone(),
            Expr::TupleNew { items } => TypeRef::Tuple(items.iter().map(|e| e.ty()).collect()),
            // El intrínseco no tiene tipo función: acepta operandos
            // directos o en tupla, así que su tipo es una etiqueta nominal
            // opaca (el despacho es siempre por nodo, nunca por tipo).
            Expr::Intrinsic { op: IntrinsicOp::Subscribe } => TypeRef::Named("@subscribe".into()),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Constant { value, .. } => write!(f, "{}", value),
            Expr::Parameter { name, .. } => write!(f, "{}", name),
            Expr::Invoke { callee, args } => {
                write!(f, "{}(", callee)?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::Lambda { params, body } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p.name)?;
                }
                write!(f, ") => {}", body)
            }
            Expr::Call { target, method, type_args, args, .. } => {
                write!(f, "{}.{}", target, method)?;
                if !type_args.is_empty() {
                    write!(f, "<")?;
                    for (i, t) in type_args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", t)?;
                    }
                    write!(f, ">")?;
                }
                write!(f, "(")?;
                join(f, args)?;
                write!(f, ")")
            }
            Expr::TupleNew { items } => {
                write!(f, "(")?;
                join(f, items)?;
                write!(f, ")")
            }
            Expr::Intrinsic { op: IntrinsicOp::Subscribe } => write!(f, "@subscribe"),
        }
    }
}

fn join(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, e) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", e)?;
    }
    Ok(())
}

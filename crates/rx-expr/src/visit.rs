//! Reescritura estructural de árboles.
//!
//! Dos operaciones cubren lo que el resto del workspace necesita:
//! sustitución de parámetros (beta-reducción en la normalización) y
//! reescritura fallible de parámetros libres (el binder resuelve
//! placeholders con nombre contra el contexto vivo). Ambas respetan el
//! shadowing: un parámetro ligado por un `Lambda` interior nunca se toca.

use std::collections::HashMap;

use crate::expr::Expr;
use crate::types::TypeRef;

/// Sustituye parámetros libres por las expresiones del mapa.
pub fn substitute_params(expr: &Expr, bindings: &HashMap<String, Expr>) -> Expr {
    let mut bound: Vec<String> = Vec::new();
    subst(expr, bindings, &mut bound)
}

fn subst(expr: &Expr, bindings: &HashMap<String, Expr>, bound: &mut Vec<String>) -> Expr {
    match expr {
        Expr::Parameter { name, .. } => {
            if !bound.iter().any(|b| b == name) {
                if let Some(replacement) = bindings.get(name) {
                    return replacement.clone();
                }
            }
            expr.clone()
        }
        Expr::Lambda { params, body } => {
            let depth = bound.len();
            bound.extend(params.iter().map(|p| p.name.clone()));
            let new_body = subst(body, bindings, bound);
            bound.truncate(depth);
            Expr::Lambda { params: params.clone(), body: Box::new(new_body) }
        }
        Expr::Invoke { callee, args } => {
            Expr::Invoke { callee: Box::new(subst(callee, bindings, bound)),
                           args: args.iter().map(|a| subst(a, bindings, bound)).collect() }
        }
        Expr::Call { target, method, type_args, args, ret } => {
            Expr::Call { target: Box::new(subst(target, bindings, bound)),
                         method: method.clone(),
                         type_args: type_args.clone(),
                         args: args.iter().map(|a| subst(a, bindings, bound)).collect(),
                         ret: ret.clone() }
        }
        Expr::TupleNew { items } => {
            Expr::TupleNew { items: items.iter().map(|i| subst(i, bindings, bound)).collect() }
        }
        Expr::Constant { .. } | Expr::Intrinsic { .. } => expr.clone(),
    }
}

/// Reescribe cada `Parameter` libre mediante `f`. `Ok(None)` deja el nodo
/// tal cual; `Ok(Some(e))` lo reemplaza; `Err` aborta la reescritura.
pub fn try_rewrite_free_params<F, E>(expr: &Expr, f: &mut F) -> Result<Expr, E>
    where F: FnMut(&str, &TypeRef) -> Result<Option<Expr>, E>
{
    let mut bound: Vec<String> = Vec::new();
    rewrite(expr, f, &mut bound)
}

fn rewrite<F, E>(expr: &Expr, f: &mut F, bound: &mut Vec<String>) -> Result<Expr, E>
    where F: FnMut(&str, &TypeRef) -> Result<Option<Expr>, E>
{
    match expr {
        Expr::Parameter { name, ty } => {
            if bound.iter().any(|b| b == name) {
                return Ok(expr.clone());
            }
            match f(name, ty)? {
                Some(replacement) => Ok(replacement),
                None => Ok(expr.clone()),
            }
        }
        Expr::Lambda { params, body } => {
            let depth = bound.len();
            bound.extend(params.iter().map(|p| p.name.clone()));
            let new_body = rewrite(body, f, bound)?;
            bound.truncate(depth);
            Ok(Expr::Lambda { params: params.clone(), body: Box::new(new_body) })
        }
        Expr::Invoke { callee, args } => {
            let new_callee = rewrite(callee, f, bound)?;
            let mut new_args = Vec::with_capacity(args.len());
            for a in args {
                new_args.push(rewrite(a, f, bound)?);
            }
            Ok(Expr::Invoke { callee: Box::new(new_callee), args: new_args })
        }
        Expr::Call { target, method, type_args, args, ret } => {
            let new_target = rewrite(target, f, bound)?;
            let mut new_args = Vec::with_capacity(args.len());
            for a in args {
                new_args.push(rewrite(a, f, bound)?);
            }
            Ok(Expr::Call { target: Box::new(new_target),
                            method: method.clone(),
                            type_args: type_args.clone(),
                            args: new_args,
                            ret: ret.clone() })
        }
        Expr::TupleNew { items } => {
            let mut new_items = Vec::with_capacity(items.len());
            for i in items {
                new_items.push(rewrite(i, f, bound)?);
            }
            Ok(Expr::TupleNew { items: new_items })
        }
        Expr::Constant { .. } | Expr::Intrinsic { .. } => Ok(expr.clone()),
    }
}

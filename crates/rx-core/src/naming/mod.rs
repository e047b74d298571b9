//! Servicio de nombres: normalización canónica y resolución de
//! referencias a recursos.
//!
//! Es una dependencia inyectada (trait), nunca un servicio global: el
//! provider y el binder se prueban con fakes sin tocar esta
//! implementación. Todas las operaciones son referencialmente
//! transparentes y seguras para lectura concurrente.

use std::collections::HashMap;

use dashmap::DashMap;
use rx_expr::{substitute_params, Expr, TypeRef};
use uuid::Uuid;

use crate::model::ResourceId;

/// Token opaco que identifica un builder parametrizado registrado.
///
/// En el sistema original el registro se indexa por identidad del objeto
/// callable; aquí cada builder recibe un token fresco en construcción.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderToken(Uuid);

impl BuilderToken {
    pub fn fresh() -> Self {
        BuilderToken(Uuid::new_v4())
    }
}

/// Contrato del servicio de nombres.
pub trait NamingService: Send + Sync {
    /// Forma canónica de una expresión. Debe ser idempotente.
    fn normalize(&self, expr: Expr) -> Expr;

    /// `Some(id)` sii la expresión es una referencia pura a un recurso
    /// con nombre. Función total: nunca falla.
    fn try_get_name(&self, expr: &Expr) -> Option<ResourceId>;

    /// Placeholder canónico para un recurso conocido, etiquetado con el
    /// tipo genérico exacto del artifact.
    fn named_expression(&self, ty: &TypeRef, id: &ResourceId) -> Expr {
        Expr::parameter(id.as_str(), ty.clone())
    }

    /// Registra la expresión parametrizada original de un builder.
    fn register_builder(&self, token: BuilderToken, expr: Expr);

    /// Recupera el árbol originario de un builder (si fue registrado).
    fn builder_expression(&self, token: BuilderToken) -> Option<Expr>;
}

/// Implementación en memoria. El registro de builders usa `DashMap` para
/// soportar lecturas concurrentes sin lock externo.
#[derive(Debug, Default)]
pub struct InMemoryNamingService {
    builders: DashMap<BuilderToken, Expr>,
}

impl InMemoryNamingService {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NamingService for InMemoryNamingService {
    fn normalize(&self, expr: Expr) -> Expr {
        normalize_expr(&expr)
    }

    fn try_get_name(&self, expr: &Expr) -> Option<ResourceId> {
        match expr {
            Expr::Parameter { name, .. } => ResourceId::try_parse(name),
            // Un envoltorio de instanciación sin argumentos sigue siendo
            // una referencia pura.
            Expr::Invoke { callee, args } if args.is_empty() => self.try_get_name(callee),
            _ => None,
        }
    }

    fn register_builder(&self, token: BuilderToken, expr: Expr) {
        self.builders.insert(token, expr);
    }

    fn builder_expression(&self, token: BuilderToken) -> Option<Expr> {
        self.builders.get(&token).map(|e| e.value().clone())
    }
}

/// Normalización estructural bottom-up:
/// - beta-reduce aplicaciones directas `Invoke(Lambda, args)` con aridad
///   exacta;
/// - aplana tuplas de un solo elemento.
///
/// Reescrituras más profundas pertenecen a la biblioteca de árboles, no a
/// este núcleo.
fn normalize_expr(expr: &Expr) -> Expr {
    match expr {
        Expr::Invoke { callee, args } => {
            let callee = normalize_expr(callee);
            let args: Vec<Expr> = args.iter().map(normalize_expr).collect();
            if let Expr::Lambda { params, body } = &callee {
                if params.len() == args.len() && !params.is_empty() {
                    let bindings: HashMap<String, Expr> =
                        params.iter().map(|p| p.name.clone()).zip(args.iter().cloned()).collect();
                    return normalize_expr(&substitute_params(body, &bindings));
                }
            }
            Expr::Invoke { callee: Box::new(callee), args }
        }
        Expr::Lambda { params, body } => {
            Expr::Lambda { params: params.clone(), body: Box::new(normalize_expr(body)) }
        }
        Expr::Call { target, method, type_args, args, ret } => {
            Expr::Call { target: Box::new(normalize_expr(target)),
                         method: method.clone(),
                         type_args: type_args.clone(),
                         args: args.iter().map(normalize_expr).collect(),
                         ret: ret.clone() }
        }
        Expr::TupleNew { items } => {
            let items: Vec<Expr> = items.iter().map(normalize_expr).collect();
            if items.len() == 1 {
                return items.into_iter().next().unwrap();
            }
            Expr::TupleNew { items }
        }
        Expr::Constant { .. } | Expr::Parameter { .. } | Expr::Intrinsic { .. } => expr.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_expr::ParamDecl;
    use serde_json::json;

    #[test]
    fn try_get_name_accepts_pure_references() {
        let svc = InMemoryNamingService::new();
        let ty = TypeRef::observable(TypeRef::Json);
        let id = ResourceId::new("rx://obs/xs").unwrap();

        let direct = svc.named_expression(&ty, &id);
        assert_eq!(svc.try_get_name(&direct), Some(id.clone()));

        let wrapped = Expr::invoke(direct, vec![]);
        assert_eq!(svc.try_get_name(&wrapped), Some(id));
    }

    #[test]
    fn try_get_name_rejects_composite_trees() {
        let svc = InMemoryNamingService::new();
        let composite = Expr::invoke(Expr::parameter("rx://f/1",
                                                     TypeRef::func(vec![TypeRef::Json], TypeRef::Subscription)),
                                     vec![Expr::constant(json!(1), TypeRef::Json)]);
        assert_eq!(svc.try_get_name(&composite), None);
        assert_eq!(svc.try_get_name(&Expr::constant(json!(2), TypeRef::Json)), None);
    }

    #[test]
    fn normalize_beta_reduces_direct_application() {
        let svc = InMemoryNamingService::new();
        let lam = Expr::lambda(vec![ParamDecl { name: "x".into(), ty: TypeRef::Json }],
                               Expr::tuple(vec![Expr::parameter("x", TypeRef::Json),
                                                Expr::parameter("x", TypeRef::Json)]));
        let applied = Expr::invoke(lam, vec![Expr::constant(json!(3), TypeRef::Json)]);
        let out = svc.normalize(applied);
        assert_eq!(out,
                   Expr::tuple(vec![Expr::constant(json!(3), TypeRef::Json),
                                    Expr::constant(json!(3), TypeRef::Json)]));
    }

    #[test]
    fn normalize_is_idempotent() {
        let svc = InMemoryNamingService::new();
        let e = Expr::invoke(Expr::parameter("rx://f/1",
                                             TypeRef::func(vec![TypeRef::Json], TypeRef::Subscription)),
                             vec![Expr::constant(json!(42), TypeRef::Json)]);
        let once = svc.normalize(e.clone());
        let twice = svc.normalize(once.clone());
        assert_eq!(once, twice);
        // Una aplicación sobre un placeholder no se reduce.
        assert_eq!(once, e);
    }

    #[test]
    fn builder_registry_round_trip() {
        let svc = InMemoryNamingService::new();
        let token = BuilderToken::fresh();
        let original = Expr::lambda(vec![ParamDecl { name: "n".into(), ty: TypeRef::Json }],
                                    Expr::parameter("n", TypeRef::Json));
        svc.register_builder(token, original.clone());
        assert_eq!(svc.builder_expression(token), Some(original));
        assert_eq!(svc.builder_expression(BuilderToken::fresh()), None);
    }
}

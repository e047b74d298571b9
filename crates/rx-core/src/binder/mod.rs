//! Binder URI → contexto.
//!
//! Toma una definición citada (con placeholders con nombre) y la
//! reescribe como un lambda de un solo parámetro que, dado el contexto
//! vivo, ejecuta la operación correcta (subscribe, create, define). El
//! contexto es siempre un argumento explícito enhebrado por cada helper;
//! no existe estado ambiente.
//!
//! La ranura de cancelación en los cuerpos emitidos es el parámetro de
//! entorno reservado `@ct`; el evaluador la provee al invocar. El lambda
//! producido conserva un único parámetro (`@ctx`).

pub mod lookup;

use std::sync::Arc;

use log::debug;
use serde_json::Value;

use rx_expr::{try_rewrite_free_params, Expr, IntrinsicOp, ParamDecl, TypeRef};

use crate::errors::RxClientError;
use crate::model::ResourceId;
use crate::naming::NamingService;

use lookup::{ops, shape_of, DEFINE_TABLE, LOOKUP_TABLE};

/// Hook para formas de artifact no reconocidas durante el lookup. Por
/// defecto falla con `ContractViolation` reportando id y tipo.
pub type UnknownArtifactHandler =
    Box<dyn Fn(&ResourceId, &TypeRef) -> Result<Expr, RxClientError> + Send + Sync>;

pub struct ContextBinder {
    naming: Arc<dyn NamingService>,
    unknown: Option<UnknownArtifactHandler>,
}

impl ContextBinder {
    pub fn new(naming: Arc<dyn NamingService>) -> Self {
        Self { naming, unknown: None }
    }

    /// Reemplaza el manejo por defecto de formas desconocidas.
    pub fn with_unknown_handler(mut self, handler: UnknownArtifactHandler) -> Self {
        self.unknown = Some(handler);
        self
    }

    /// Liga una definición citada contra el contexto vivo.
    ///
    /// Devuelve `Lambda(["@ctx": context], cuerpo)`. Cualquier forma no
    /// reconocida, aridad fuera de rango o tipo incompatible es
    /// `ContractViolation` con el fragmento ofensor; nunca se reintenta.
    pub fn bind(&self,
                expr: &Expr,
                id: &ResourceId,
                metadata: Option<&Value>)
                -> Result<Expr, RxClientError> {
        let normalized = self.naming.normalize(expr.clone());
        let ctx = Expr::parameter(ops::CONTEXT_PARAM, TypeRef::Context);
        let body = self.bind_body(&ctx, &normalized, id, metadata)?;
        debug!("bound {} => {}", id, body);
        Ok(Expr::lambda(vec![ParamDecl { name: ops::CONTEXT_PARAM.to_string(), ty: TypeRef::Context }],
                        body))
    }

    fn bind_body(&self,
                 ctx: &Expr,
                 expr: &Expr,
                 id: &ResourceId,
                 metadata: Option<&Value>)
                 -> Result<Expr, RxClientError> {
        if let Expr::Invoke { callee, args } = expr {
            match callee.as_ref() {
                Expr::Intrinsic { op: IntrinsicOp::Subscribe } => {
                    return self.bind_subscribe(ctx, args, id, metadata);
                }
                Expr::Parameter { name, ty } => {
                    // Invocación de un placeholder con nombre cuyo
                    // resultado es subscription o subject: forma factory.
                    let result_ty = expr.ty();
                    if matches!(result_ty, TypeRef::Subscription | TypeRef::Subject { .. }) {
                        return self.bind_factory(ctx, name, ty, args, result_ty, id, metadata);
                    }
                }
                _ => {}
            }
        }
        self.bind_definition(ctx, expr, id, metadata)
    }

    /// Forma observable-subscribe: operandos directos o empaquetados en
    /// una 2-tupla. Ambas variantes producen el mismo cuerpo ligado.
    fn bind_subscribe(&self,
                      ctx: &Expr,
                      args: &[Expr],
                      id: &ResourceId,
                      metadata: Option<&Value>)
                      -> Result<Expr, RxClientError> {
        let (observable, observer) = match args {
            [Expr::TupleNew { items }] if items.len() == 2 => (items[0].clone(), items[1].clone()),
            [single] => {
                return Err(RxClientError::ContractViolation(format!(
                    "subscribe expects a 2-tuple operand, got {single}"
                )))
            }
            [o, v] => (o.clone(), v.clone()),
            other => {
                return Err(RxClientError::ContractViolation(format!(
                    "subscribe expects 1 or 2 operands, got {}", other.len()
                )))
            }
        };

        let observable = peel_instantiation(observable);
        let observer = peel_instantiation(observer);

        let element = match (observable.ty(), observer.ty()) {
            (TypeRef::Observable(o), TypeRef::Observer(v)) if o == v => *o,
            (o, v) => {
                return Err(RxClientError::ContractViolation(format!(
                    "subscribe operands have incompatible types: {o} × {v}"
                )))
            }
        };

        let observable = self.resolve_refs(ctx, &observable)?;
        let observer = self.resolve_refs(ctx, &observer)?;

        Ok(Expr::call(observable,
                      ops::SUBSCRIBE,
                      vec![element],
                      vec![observer, uri_arg(id), metadata_arg(metadata), ct_arg()],
                      TypeRef::Subscription))
    }

    /// Formas factory-subscription y stream-factory: 0 o 1 argumentos,
    /// resultado subscription o subject.
    #[allow(clippy::too_many_arguments)]
    fn bind_factory(&self,
                    ctx: &Expr,
                    name: &str,
                    callee_ty: &TypeRef,
                    args: &[Expr],
                    result_ty: TypeRef,
                    id: &ResourceId,
                    metadata: Option<&Value>)
                    -> Result<Expr, RxClientError> {
        if args.len() > 1 {
            return Err(RxClientError::ContractViolation(format!(
                "factory invocation of {name} expects 0 or 1 arguments, got {}", args.len()
            )));
        }
        // La invocación debe calzar exactamente con el tipo declarado del
        // callee: ni sub-aplicación silenciosa ni coerción de argumentos.
        if let Some((fargs, _)) = callee_ty.func_shape() {
            if args.len() != fargs.len() {
                return Err(RxClientError::ContractViolation(format!(
                    "factory {name} declares arity {}, invoked with {} arguments",
                    fargs.len(),
                    args.len()
                )));
            }
            for (i, (arg, expected)) in args.iter().zip(fargs.iter()).enumerate() {
                let actual = arg.ty();
                if &actual != expected {
                    return Err(RxClientError::ContractViolation(format!(
                        "factory {name} argument {i} has type {actual}, expected {expected}"
                    )));
                }
            }
        } else if !args.is_empty() {
            return Err(RxClientError::ContractViolation(format!(
                "{name} is not parameterized but was invoked with {} arguments", args.len()
            )));
        }
        let rid = ResourceId::try_parse(name).ok_or_else(|| {
            RxClientError::ContractViolation(format!(
                "unbound placeholder {name:?} is not a canonical resource id"
            ))
        })?;

        let factory = self.lookup(ctx, &rid, callee_ty)?;

        let mut call_args = vec![uri_arg(id)];
        for a in args {
            call_args.push(self.resolve_refs(ctx, a)?);
        }
        call_args.push(metadata_arg(metadata));
        call_args.push(ct_arg());

        Ok(Expr::call(factory, ops::CREATE, vec![], call_args, result_ty))
    }

    /// Forma definición: el tipo de la expresión es observable/observer,
    /// posiblemente bajo un tipo función de aridad 0 o 1. La operación se
    /// selecciona por (forma, aridad) en la tabla estática.
    fn bind_definition(&self,
                       ctx: &Expr,
                       expr: &Expr,
                       id: &ResourceId,
                       metadata: Option<&Value>)
                       -> Result<Expr, RxClientError> {
        let ty = expr.ty();
        let (shape, arity, type_args) = match &ty {
            TypeRef::Func { args, ret } => match shape_of(ret) {
                Some(shape) => {
                    let strat = LOOKUP_TABLE.get(&shape);
                    let mut targs = args.clone();
                    if let Some(s) = strat {
                        targs.extend((s.element_types)(ret));
                    }
                    (shape, args.len(), targs)
                }
                None => {
                    return Err(RxClientError::ContractViolation(format!(
                        "expression does not match any recognized shape: {expr} : {ty}"
                    )))
                }
            },
            other => match shape_of(other) {
                Some(shape) => {
                    let targs = LOOKUP_TABLE.get(&shape)
                                            .map(|s| (s.element_types)(other))
                                            .unwrap_or_default();
                    (shape, 0, targs)
                }
                None => {
                    return Err(RxClientError::ContractViolation(format!(
                        "expression does not match any recognized shape: {expr} : {ty}"
                    )))
                }
            },
        };

        let method = DEFINE_TABLE.get(&(shape, arity)).ok_or_else(|| {
            RxClientError::ContractViolation(format!(
                "no definition operation for {ty} with arity {arity}"
            ))
        })?;

        let definition = self.resolve_refs(ctx, expr)?;
        Ok(Expr::call(ctx.clone(),
                      *method,
                      type_args,
                      vec![uri_arg(id), definition, metadata_arg(metadata), ct_arg()],
                      TypeRef::Unit))
    }

    /// Reescribe cada placeholder libre con nombre canónico mediante el
    /// lookup contra el contexto. Los nombres locales y los parámetros de
    /// entorno (`@…`) quedan intactos.
    fn resolve_refs(&self, ctx: &Expr, expr: &Expr) -> Result<Expr, RxClientError> {
        try_rewrite_free_params(expr, &mut |name, ty| match ResourceId::try_parse(name) {
            Some(id) => self.lookup(ctx, &id, ty).map(Some),
            None => Ok(None),
        })
    }

    /// Resuelve un placeholder con nombre en una llamada concreta
    /// `get_*` sobre el contexto vivo. Un tipo función selecciona la
    /// variante factory; los tipos de elemento salen de la forma del
    /// tipo. La selección es total sobre (forma, aridad).
    pub fn lookup(&self, ctx: &Expr, id: &ResourceId, ty: &TypeRef) -> Result<Expr, RxClientError> {
        if let Some((fargs, ret)) = ty.func_shape() {
            if let Some(shape) = shape_of(ret) {
                if let Some(strat) = LOOKUP_TABLE.get(&shape) {
                    let mut type_args: Vec<TypeRef> = fargs.to_vec();
                    type_args.extend((strat.element_types)(ret));
                    return Ok(Expr::call(ctx.clone(),
                                         strat.factory_getter,
                                         type_args,
                                         vec![uri_arg(id)],
                                         ty.clone()));
                }
            }
        } else if let Some(shape) = shape_of(ty) {
            if let Some(strat) = LOOKUP_TABLE.get(&shape) {
                return Ok(Expr::call(ctx.clone(),
                                     strat.getter,
                                     (strat.element_types)(ty),
                                     vec![uri_arg(id)],
                                     ty.clone()));
            }
        }
        match &self.unknown {
            Some(handler) => handler(id, ty),
            None => Err(RxClientError::ContractViolation(format!(
                "unknown artifact shape for {id}: {ty}"
            ))),
        }
    }
}

/// Quita el envoltorio de instanciación sin argumentos que el provider
/// añade a los artifacts anónimos.
fn peel_instantiation(expr: Expr) -> Expr {
    match expr {
        Expr::Invoke { callee, args } if args.is_empty() => *callee,
        other => other,
    }
}

fn uri_arg(id: &ResourceId) -> Expr {
    Expr::constant(Value::String(id.as_str().to_string()), TypeRef::Json)
}

fn metadata_arg(metadata: Option<&Value>) -> Expr {
    Expr::constant(metadata.cloned().unwrap_or(Value::Null), TypeRef::Metadata)
}

fn ct_arg() -> Expr {
    Expr::parameter(ops::CANCELLATION_PARAM, TypeRef::CancellationToken)
}

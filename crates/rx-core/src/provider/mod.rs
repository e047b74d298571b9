//! Query provider: construye artifacts citados a partir de expresiones
//! crudas y ejecuta el protocolo create/delete contra los hooks del
//! backend.
//!
//! Los constructores son puros (sin I/O). El protocolo asíncrono respeta
//! la señal de cancelación: si ya fue solicitada antes de invocar el hook,
//! el I/O no se emite.

pub mod builders;

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use rx_expr::{Expr, TypeRef};

use crate::errors::RxClientError;
use crate::model::{ArtifactKind, QuotedArtifact, ResourceId};
use crate::naming::NamingService;
use crate::service::ServiceHooks;

pub use builders::ParamBuilder;

/// Origen de una suscripción a crear.
#[derive(Debug, Clone)]
pub enum SubscriptionSource {
    /// Aplicación de un factory con argumentos concretos.
    Factory { factory: QuotedArtifact, args: Vec<Value> },
    /// Suscripción directa observable × observer.
    Subscribe { observable: QuotedArtifact, observer: QuotedArtifact },
}

/// Provider de quotations. Inmutable y compartible (`Arc`); cada llamada
/// produce valores frescos e independientes.
pub struct QueryProvider {
    naming: Arc<dyn NamingService>,
    hooks: Arc<dyn ServiceHooks>,
}

impl QueryProvider {
    pub fn new(naming: Arc<dyn NamingService>, hooks: Arc<dyn ServiceHooks>) -> Self {
        Self { naming, hooks }
    }

    pub fn naming(&self) -> &Arc<dyn NamingService> {
        &self.naming
    }

    // ---- Constructores (§ modelo de artifacts; puros) ----

    pub fn observable(&self, element: TypeRef, expr: Expr) -> QuotedArtifact {
        quote(self.naming.as_ref(), ArtifactKind::Observable { element }, expr)
    }

    pub fn observer(&self, element: TypeRef, expr: Expr) -> QuotedArtifact {
        quote(self.naming.as_ref(), ArtifactKind::Observer { element }, expr)
    }

    pub fn subject(&self, input: TypeRef, output: TypeRef, expr: Expr) -> QuotedArtifact {
        quote(self.naming.as_ref(), ArtifactKind::Subject { input, output }, expr)
    }

    pub fn subscription(&self, expr: Expr) -> QuotedArtifact {
        quote(self.naming.as_ref(), ArtifactKind::Subscription, expr)
    }

    pub fn subscription_factory(&self, args: Vec<TypeRef>, expr: Expr) -> Result<QuotedArtifact, RxClientError> {
        check_declared_arity(&expr, args.len())?;
        Ok(quote(self.naming.as_ref(), ArtifactKind::SubscriptionFactory { args }, expr))
    }

    pub fn subject_factory(&self,
                           input: TypeRef,
                           output: TypeRef,
                           args: Vec<TypeRef>,
                           expr: Expr)
                           -> Result<QuotedArtifact, RxClientError> {
        check_declared_arity(&expr, args.len())?;
        Ok(quote(self.naming.as_ref(), ArtifactKind::SubjectFactory { input, output, args }, expr))
    }

    /// Builder parametrizado de observables: un solo algoritmo para toda
    /// aridad (la lista ordenada de tipos es la aridad; nada fija un
    /// máximo).
    pub fn parameterized_observable(&self,
                                    element: TypeRef,
                                    arg_types: Vec<TypeRef>,
                                    expr: Expr)
                                    -> Result<ParamBuilder, RxClientError> {
        ParamBuilder::new(Arc::clone(&self.naming), ArtifactKind::Observable { element }, arg_types, expr)
    }

    pub fn parameterized_observer(&self,
                                  element: TypeRef,
                                  arg_types: Vec<TypeRef>,
                                  expr: Expr)
                                  -> Result<ParamBuilder, RxClientError> {
        ParamBuilder::new(Arc::clone(&self.naming), ArtifactKind::Observer { element }, arg_types, expr)
    }

    // ---- Protocolo create/delete (§ provider; asíncrono) ----

    /// Crea una suscripción remota. Cinco pasos: construir la invocación,
    /// normalizar, ligar al id, invocar el hook y devolver una referencia
    /// ligera (placeholder puro, sin el árbol de definición).
    pub async fn create_subscription(&self,
                                     source: SubscriptionSource,
                                     id: ResourceId,
                                     metadata: Option<Value>,
                                     ct: &CancellationToken)
                                     -> Result<QuotedArtifact, RxClientError> {
        let expr = match source {
            SubscriptionSource::Factory { factory, args } => {
                let arg_types = match factory.kind() {
                    ArtifactKind::SubscriptionFactory { args } => args.clone(),
                    other => {
                        return Err(RxClientError::ContractViolation(format!(
                            "artifact is not a subscription factory: {other:?}"
                        )))
                    }
                };
                apply_factory(factory, &args, &arg_types)?
            }
            SubscriptionSource::Subscribe { observable, observer } => {
                let (oe, ve) = match (observable.kind(), observer.kind()) {
                    (ArtifactKind::Observable { element: oe }, ArtifactKind::Observer { element: ve }) => (oe, ve),
                    (o, v) => {
                        return Err(RxClientError::ContractViolation(format!(
                            "subscribe expects observable × observer, got {o:?} × {v:?}"
                        )))
                    }
                };
                if oe != ve {
                    return Err(RxClientError::ContractViolation(format!(
                        "subscribe element mismatch: {oe} vs {ve}"
                    )));
                }
                Expr::invoke(Expr::subscribe_intrinsic(),
                             vec![observable.into_expr(), observer.into_expr()])
            }
        };

        let normalized = self.naming.normalize(expr);
        debug!("create_subscription {}: {}", id, normalized);
        let known = QuotedArtifact::known(ArtifactKind::Subscription, normalized, id.clone());

        self.guard_cancel(ct, "create_subscription", &id)?;
        self.hooks.create_subscription(&known, metadata.as_ref(), ct).await?;

        // Referencia ligera: el caller no vuelve a enviar la definición.
        Ok(self.known_reference(ArtifactKind::Subscription, id))
    }

    /// Crea un stream (subject) remoto; protocolo idéntico al de
    /// suscripciones.
    pub async fn create_stream(&self,
                               factory: QuotedArtifact,
                               args: Vec<Value>,
                               id: ResourceId,
                               metadata: Option<Value>,
                               ct: &CancellationToken)
                               -> Result<QuotedArtifact, RxClientError> {
        let (input, output, arg_types) = match factory.kind() {
            ArtifactKind::SubjectFactory { input, output, args } => {
                (input.clone(), output.clone(), args.clone())
            }
            other => {
                return Err(RxClientError::ContractViolation(format!(
                    "artifact is not a stream factory: {other:?}"
                )))
            }
        };
        let expr = apply_factory(factory, &args, &arg_types)?;

        let normalized = self.naming.normalize(expr);
        debug!("create_stream {}: {}", id, normalized);
        let kind = ArtifactKind::Subject { input, output };
        let known = QuotedArtifact::known(kind.clone(), normalized, id.clone());

        self.guard_cancel(ct, "create_stream", &id)?;
        self.hooks.create_stream(&known, metadata.as_ref(), ct).await?;

        Ok(self.known_reference(kind, id))
    }

    /// Borra una suscripción remota. Sin reescritura ni normalización: el
    /// hook recibe el artifact tal cual.
    pub async fn delete_subscription(&self,
                                     artifact: &QuotedArtifact,
                                     ct: &CancellationToken)
                                     -> Result<(), RxClientError> {
        if !matches!(artifact.kind(), ArtifactKind::Subscription) {
            return Err(RxClientError::ContractViolation(format!(
                "artifact is not a subscription: {:?}", artifact.kind()
            )));
        }
        self.guard_cancel_opt(ct, "delete_subscription", artifact.resource_id())?;
        Ok(self.hooks.delete_subscription(artifact, ct).await?)
    }

    /// Borra un stream remoto; mismo contrato de forward puro.
    pub async fn delete_stream(&self,
                               artifact: &QuotedArtifact,
                               ct: &CancellationToken)
                               -> Result<(), RxClientError> {
        if !matches!(artifact.kind(), ArtifactKind::Subject { .. }) {
            return Err(RxClientError::ContractViolation(format!(
                "artifact is not a stream: {:?}", artifact.kind()
            )));
        }
        self.guard_cancel_opt(ct, "delete_stream", artifact.resource_id())?;
        Ok(self.hooks.delete_stream(artifact, ct).await?)
    }

    fn known_reference(&self, kind: ArtifactKind, id: ResourceId) -> QuotedArtifact {
        let placeholder = self.naming.named_expression(&kind.type_ref(), &id);
        QuotedArtifact::known(kind, placeholder, id)
    }

    fn guard_cancel(&self, ct: &CancellationToken, op: &str, id: &ResourceId) -> Result<(), RxClientError> {
        if ct.is_cancelled() {
            warn!("{} {} cancelled before issuing I/O", op, id);
            return Err(RxClientError::Cancelled);
        }
        Ok(())
    }

    fn guard_cancel_opt(&self, ct: &CancellationToken, op: &str, id: Option<&ResourceId>) -> Result<(), RxClientError> {
        if ct.is_cancelled() {
            match id {
                Some(id) => warn!("{} {} cancelled before issuing I/O", op, id),
                None => warn!("{} cancelled before issuing I/O", op),
            }
            return Err(RxClientError::Cancelled);
        }
        Ok(())
    }
}

/// Aplica un factory a argumentos concretos: `Invoke` con una `Constant`
/// por argumento, en orden declarado.
fn apply_factory(factory: QuotedArtifact, args: &[Value], arg_types: &[TypeRef]) -> Result<Expr, RxClientError> {
    if args.len() != arg_types.len() {
        return Err(RxClientError::InvalidArgument(format!(
            "factory expects {} arguments, got {}", arg_types.len(), args.len()
        )));
    }
    let constants = args.iter()
                        .zip(arg_types.iter())
                        .map(|(v, t)| Expr::constant(v.clone(), t.clone()))
                        .collect();
    Ok(Expr::invoke(factory.into_expr(), constants))
}

/// Regla de quoting compartida por constructores y builders: una
/// referencia con nombre produce la variante `Known` con placeholder
/// canónico fresco; cualquier otro árbol queda `Anonymous` en forma de
/// invocación (envoltura idempotente).
pub(crate) fn quote(naming: &dyn NamingService, kind: ArtifactKind, expr: Expr) -> QuotedArtifact {
    if let Some(id) = naming.try_get_name(&expr) {
        let placeholder = naming.named_expression(&kind.type_ref(), &id);
        return QuotedArtifact::known(kind, placeholder, id);
    }
    QuotedArtifact::anonymous(kind, into_invocation_form(expr))
}

fn into_invocation_form(expr: Expr) -> Expr {
    match expr {
        e @ Expr::Invoke { .. } => e,
        other => Expr::invoke(other, vec![]),
    }
}

fn check_declared_arity(expr: &Expr, expected: usize) -> Result<(), RxClientError> {
    match expr.ty() {
        TypeRef::Func { args, .. } => {
            if args.len() != expected {
                return Err(RxClientError::InvalidArgument(format!(
                    "declared arity {} does not match expected {}", args.len(), expected
                )));
            }
            Ok(())
        }
        // Una expresión no funcional solo puede respaldar un factory sin
        // parámetros.
        other if expected > 0 => Err(RxClientError::InvalidArgument(format!(
            "expression of type {other} cannot back a factory of arity {expected}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rx_expr::ParamDecl;
    use serde_json::json;

    #[test]
    fn non_function_expression_cannot_back_parameterized_factory() {
        let plain = Expr::constant(json!({"op": "timer"}), TypeRef::Json);
        assert!(matches!(check_declared_arity(&plain, 1),
                         Err(RxClientError::InvalidArgument(_))));
        assert!(check_declared_arity(&plain, 0).is_ok());
    }

    #[test]
    fn function_expression_must_match_declared_arity() {
        let unary = Expr::lambda(vec![ParamDecl { name: "n".into(), ty: TypeRef::Json }],
                                 Expr::parameter("n", TypeRef::Json));
        assert!(check_declared_arity(&unary, 1).is_ok());
        assert!(matches!(check_declared_arity(&unary, 2),
                         Err(RxClientError::InvalidArgument(_))));
    }
}

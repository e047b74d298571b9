//! rx-core: modelo de artifacts citados, provider y binder.
//!
//! Núcleo del lado cliente de la plataforma reactiva distribuida: las
//! definiciones se representan como árboles citados (`rx-expr`), se
//! nombran mediante identificadores de recurso y se ligan a un contexto
//! vivo recién en el bind. El transporte real vive detrás de los hooks
//! (`service::ServiceHooks`).

pub mod binder;
pub mod errors;
pub mod model;
pub mod naming;
pub mod provider;
pub mod service;

pub use binder::{lookup::ops, ContextBinder, UnknownArtifactHandler};
pub use errors::RxClientError;
pub use model::{ArtifactKind, Identity, QuotedArtifact, ResourceId};
pub use naming::{BuilderToken, InMemoryNamingService, NamingService};
pub use provider::{ParamBuilder, QueryProvider, SubscriptionSource};
pub use service::{LiveObserver, RemoteError, ServiceHooks};

#[cfg(test)]
mod tests {
    use super::*;
    use rx_expr::{Expr, TypeRef};
    use serde_json::json;
    use std::sync::Arc;

    fn naming() -> Arc<dyn NamingService> {
        Arc::new(InMemoryNamingService::new())
    }

    // Propiedad: envolver una expresión anónima es idempotente
    // (extraer y re-citar no añade envoltorios).
    #[test]
    fn anonymous_quoting_is_idempotent() {
        let svc = naming();
        let raw = Expr::constant(json!({"op": "range", "n": 10}),
                                 TypeRef::observable(TypeRef::Json));
        let first = provider::quote(svc.as_ref(),
                                    ArtifactKind::Observable { element: TypeRef::Json },
                                    raw.clone());
        assert!(!first.is_known());
        assert_eq!(first.expr(), &Expr::invoke(raw, vec![]));

        let second = provider::quote(svc.as_ref(),
                                     ArtifactKind::Observable { element: TypeRef::Json },
                                     first.expr().clone());
        assert_eq!(second.expr(), first.expr());
    }

    // Propiedad: una referencia a un recurso nombrado produce la variante
    // Known con el id exacto y placeholder canónico fresco.
    #[test]
    fn named_reference_becomes_known() {
        let svc = naming();
        let id = ResourceId::new("rx://observable/xs").unwrap();
        let ty = TypeRef::observable(TypeRef::Json);
        let reference = svc.named_expression(&ty, &id);

        let artifact = provider::quote(svc.as_ref(),
                                       ArtifactKind::Observable { element: TypeRef::Json },
                                       reference);
        assert_eq!(artifact.resource_id(), Some(&id));
        assert_eq!(artifact.expr(), &Expr::parameter("rx://observable/xs", ty));
    }

    #[test]
    fn artifact_kind_type_refs() {
        let k = ArtifactKind::SubjectFactory { input: TypeRef::Json,
                                               output: TypeRef::Json,
                                               args: vec![TypeRef::Json] };
        assert_eq!(k.type_ref(),
                   TypeRef::func(vec![TypeRef::Json],
                                 TypeRef::subject(TypeRef::Json, TypeRef::Json)));
        assert_eq!(k.arity(), 1);
        assert_eq!(ArtifactKind::Subscription.type_ref(), TypeRef::Subscription);
    }
}

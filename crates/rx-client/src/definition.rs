//! Proxy de definiciones: define/undefine de artifacts durables.

use std::sync::Arc;

use log::debug;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use rx_core::{QueryProvider, ResourceId, RxClientError, ServiceHooks};
use rx_expr::{Expr, TypeRef};

/// Fachada de definición. Cada entrada valida, normaliza la definición y
/// delega en el hook correspondiente; la forma producida (artifact con
/// expresión en forma de invocación) es exactamente la que el binder
/// reconoce después.
pub struct DefinitionProxy {
    provider: Arc<QueryProvider>,
    hooks: Arc<dyn ServiceHooks>,
}

impl DefinitionProxy {
    pub fn new(provider: Arc<QueryProvider>, hooks: Arc<dyn ServiceHooks>) -> Self {
        Self { provider, hooks }
    }

    pub async fn define_observable(&self,
                                   id: &str,
                                   element: TypeRef,
                                   expr: Expr,
                                   metadata: Option<Value>,
                                   ct: &CancellationToken)
                                   -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        let normalized = self.provider.naming().normalize(expr);
        let artifact = self.provider.observable(element, normalized);
        debug!("define_observable {}: {}", id, artifact.expr());
        Ok(self.hooks.define_observable(&id, &artifact, metadata.as_ref(), ct).await?)
    }

    pub async fn undefine_observable(&self, id: &str, ct: &CancellationToken) -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        Ok(self.hooks.undefine_observable(&id, ct).await?)
    }

    pub async fn define_observer(&self,
                                 id: &str,
                                 element: TypeRef,
                                 expr: Expr,
                                 metadata: Option<Value>,
                                 ct: &CancellationToken)
                                 -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        let normalized = self.provider.naming().normalize(expr);
        let artifact = self.provider.observer(element, normalized);
        debug!("define_observer {}: {}", id, artifact.expr());
        Ok(self.hooks.define_observer(&id, &artifact, metadata.as_ref(), ct).await?)
    }

    pub async fn undefine_observer(&self, id: &str, ct: &CancellationToken) -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        Ok(self.hooks.undefine_observer(&id, ct).await?)
    }

    pub async fn define_subscription_factory(&self,
                                             id: &str,
                                             args: Vec<TypeRef>,
                                             expr: Expr,
                                             metadata: Option<Value>,
                                             ct: &CancellationToken)
                                             -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        let normalized = self.provider.naming().normalize(expr);
        let artifact = self.provider.subscription_factory(args, normalized)?;
        debug!("define_subscription_factory {}: {}", id, artifact.expr());
        Ok(self.hooks
               .define_subscription_factory(&id, &artifact, metadata.as_ref(), ct)
               .await?)
    }

    pub async fn undefine_subscription_factory(&self, id: &str, ct: &CancellationToken) -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        Ok(self.hooks.undefine_subscription_factory(&id, ct).await?)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn define_stream_factory(&self,
                                       id: &str,
                                       input: TypeRef,
                                       output: TypeRef,
                                       args: Vec<TypeRef>,
                                       expr: Expr,
                                       metadata: Option<Value>,
                                       ct: &CancellationToken)
                                       -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        let normalized = self.provider.naming().normalize(expr);
        let artifact = self.provider.subject_factory(input, output, args, normalized)?;
        debug!("define_stream_factory {}: {}", id, artifact.expr());
        Ok(self.hooks.define_stream_factory(&id, &artifact, metadata.as_ref(), ct).await?)
    }

    pub async fn undefine_stream_factory(&self, id: &str, ct: &CancellationToken) -> Result<(), RxClientError> {
        let id = ResourceId::new(id)?;
        Ok(self.hooks.undefine_stream_factory(&id, ct).await?)
    }
}

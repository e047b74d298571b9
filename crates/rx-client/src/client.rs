//! Proxy de cliente: creación y borrado de suscripciones y streams.

use std::sync::Arc;

use serde_json::Value;
use tokio_util::sync::CancellationToken;

use rx_core::{QueryProvider, QuotedArtifact, ResourceId, RxClientError, SubscriptionSource};

/// Fachada de cliente. Contrato por operación: validar → construir
/// expresión → normalizar → delegar (la normalización ocurre dentro del
/// protocolo del provider).
pub struct ClientProxy {
    provider: Arc<QueryProvider>,
}

impl ClientProxy {
    pub fn new(provider: Arc<QueryProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<QueryProvider> {
        &self.provider
    }

    /// Suscripción directa observable × observer bajo el id dado.
    pub async fn subscribe(&self,
                           observable: QuotedArtifact,
                           observer: QuotedArtifact,
                           id: &str,
                           metadata: Option<Value>,
                           ct: &CancellationToken)
                           -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        self.provider
            .create_subscription(SubscriptionSource::Subscribe { observable, observer },
                                 id,
                                 metadata,
                                 ct)
            .await
    }

    /// Suscripción vía factory con argumentos concretos.
    pub async fn create_subscription(&self,
                                     factory: QuotedArtifact,
                                     args: Vec<Value>,
                                     id: &str,
                                     metadata: Option<Value>,
                                     ct: &CancellationToken)
                                     -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        self.provider
            .create_subscription(SubscriptionSource::Factory { factory, args }, id, metadata, ct)
            .await
    }

    /// Stream (subject) vía factory.
    pub async fn create_stream(&self,
                               factory: QuotedArtifact,
                               args: Vec<Value>,
                               id: &str,
                               metadata: Option<Value>,
                               ct: &CancellationToken)
                               -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        self.provider.create_stream(factory, args, id, metadata, ct).await
    }

    pub async fn delete_subscription(&self,
                                     subscription: &QuotedArtifact,
                                     ct: &CancellationToken)
                                     -> Result<(), RxClientError> {
        self.provider.delete_subscription(subscription, ct).await
    }

    pub async fn delete_stream(&self,
                               stream: &QuotedArtifact,
                               ct: &CancellationToken)
                               -> Result<(), RxClientError> {
        self.provider.delete_stream(stream, ct).await
    }
}

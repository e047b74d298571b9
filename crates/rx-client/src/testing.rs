//! Hooks de grabación para tests: un `ServiceHooks` en memoria que
//! registra cada llamada y puede simular fallos remotos.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use rx_core::{LiveObserver, QuotedArtifact, RemoteError, ResourceId, ServiceHooks};

/// Llamada observada por el fake.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub op: &'static str,
    pub artifact: Option<QuotedArtifact>,
    pub id: Option<ResourceId>,
    pub metadata: Option<Value>,
    pub cancelled: bool,
}

/// Backend falso: graba y responde Ok, salvo que se haya programado un
/// fallo con `fail_next`.
#[derive(Debug, Default)]
pub struct RecordingHooks {
    calls: Mutex<Vec<RecordedCall>>,
    fail_next: Mutex<Option<RemoteError>>,
}

impl RecordingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Programa un fallo para la próxima llamada.
    pub fn fail_next(&self, error: RemoteError) {
        *self.fail_next.lock().unwrap() = Some(error);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self,
              op: &'static str,
              artifact: Option<&QuotedArtifact>,
              id: Option<&ResourceId>,
              metadata: Option<&Value>,
              ct: &CancellationToken)
              -> Result<(), RemoteError> {
        self.calls.lock().unwrap().push(RecordedCall { op,
                                                       artifact: artifact.cloned(),
                                                       id: id.cloned(),
                                                       metadata: metadata.cloned(),
                                                       cancelled: ct.is_cancelled() });
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl ServiceHooks for RecordingHooks {
    async fn create_subscription(&self,
                                 artifact: &QuotedArtifact,
                                 metadata: Option<&Value>,
                                 ct: &CancellationToken)
                                 -> Result<(), RemoteError> {
        self.record("create_subscription", Some(artifact), None, metadata, ct)
    }

    async fn delete_subscription(&self,
                                 artifact: &QuotedArtifact,
                                 ct: &CancellationToken)
                                 -> Result<(), RemoteError> {
        self.record("delete_subscription", Some(artifact), None, None, ct)
    }

    async fn create_stream(&self,
                           artifact: &QuotedArtifact,
                           metadata: Option<&Value>,
                           ct: &CancellationToken)
                           -> Result<(), RemoteError> {
        self.record("create_stream", Some(artifact), None, metadata, ct)
    }

    async fn delete_stream(&self,
                           artifact: &QuotedArtifact,
                           ct: &CancellationToken)
                           -> Result<(), RemoteError> {
        self.record("delete_stream", Some(artifact), None, None, ct)
    }

    async fn get_observer(&self,
                          observer: &QuotedArtifact,
                          ct: &CancellationToken)
                          -> Result<LiveObserver, RemoteError> {
        self.record("get_observer", Some(observer), None, None, ct)?;
        let id = observer.resource_id()
                         .cloned()
                         .ok_or_else(|| RemoteError::Rejected("observer has no identity".into()))?;
        Ok(LiveObserver { id })
    }

    async fn define_observable(&self,
                               id: &ResourceId,
                               definition: &QuotedArtifact,
                               metadata: Option<&Value>,
                               ct: &CancellationToken)
                               -> Result<(), RemoteError> {
        self.record("define_observable", Some(definition), Some(id), metadata, ct)
    }

    async fn undefine_observable(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError> {
        self.record("undefine_observable", None, Some(id), None, ct)
    }

    async fn define_observer(&self,
                             id: &ResourceId,
                             definition: &QuotedArtifact,
                             metadata: Option<&Value>,
                             ct: &CancellationToken)
                             -> Result<(), RemoteError> {
        self.record("define_observer", Some(definition), Some(id), metadata, ct)
    }

    async fn undefine_observer(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError> {
        self.record("undefine_observer", None, Some(id), None, ct)
    }

    async fn define_subscription_factory(&self,
                                         id: &ResourceId,
                                         definition: &QuotedArtifact,
                                         metadata: Option<&Value>,
                                         ct: &CancellationToken)
                                         -> Result<(), RemoteError> {
        self.record("define_subscription_factory", Some(definition), Some(id), metadata, ct)
    }

    async fn undefine_subscription_factory(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError> {
        self.record("undefine_subscription_factory", None, Some(id), None, ct)
    }

    async fn define_stream_factory(&self,
                                   id: &ResourceId,
                                   definition: &QuotedArtifact,
                                   metadata: Option<&Value>,
                                   ct: &CancellationToken)
                                   -> Result<(), RemoteError> {
        self.record("define_stream_factory", Some(definition), Some(id), metadata, ct)
    }

    async fn undefine_stream_factory(&self, id: &ResourceId, ct: &CancellationToken) -> Result<(), RemoteError> {
        self.record("undefine_stream_factory", None, Some(id), None, ct)
    }
}

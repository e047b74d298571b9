//! Proxy de metadata: lookups sincrónicos de artifacts conocidos.
//!
//! No hay I/O: manufactura artifacts `Known` cuyo árbol es el placeholder
//! canónico del recurso. El binder los resuelve después contra el
//! contexto vivo.

use std::sync::Arc;

use rx_core::{QueryProvider, QuotedArtifact, ResourceId, RxClientError};
use rx_expr::TypeRef;

pub struct MetadataProxy {
    provider: Arc<QueryProvider>,
}

impl MetadataProxy {
    pub fn new(provider: Arc<QueryProvider>) -> Self {
        Self { provider }
    }

    pub fn observable(&self, element: TypeRef, id: &str) -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let reference = self.provider
                            .naming()
                            .named_expression(&TypeRef::observable(element.clone()), &id);
        Ok(self.provider.observable(element, reference))
    }

    pub fn observer(&self, element: TypeRef, id: &str) -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let reference = self.provider
                            .naming()
                            .named_expression(&TypeRef::observer(element.clone()), &id);
        Ok(self.provider.observer(element, reference))
    }

    pub fn stream(&self, input: TypeRef, output: TypeRef, id: &str) -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let ty = TypeRef::subject(input.clone(), output.clone());
        let reference = self.provider.naming().named_expression(&ty, &id);
        Ok(self.provider.subject(input, output, reference))
    }

    pub fn subscription(&self, id: &str) -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let reference = self.provider.naming().named_expression(&TypeRef::Subscription, &id);
        Ok(self.provider.subscription(reference))
    }

    pub fn subscription_factory(&self, args: Vec<TypeRef>, id: &str) -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let ty = TypeRef::func(args.clone(), TypeRef::Subscription);
        let reference = self.provider.naming().named_expression(&ty, &id);
        self.provider.subscription_factory(args, reference)
    }

    pub fn stream_factory(&self,
                          input: TypeRef,
                          output: TypeRef,
                          args: Vec<TypeRef>,
                          id: &str)
                          -> Result<QuotedArtifact, RxClientError> {
        let id = ResourceId::new(id)?;
        let ty = TypeRef::func(args.clone(), TypeRef::subject(input.clone(), output.clone()));
        let reference = self.provider.naming().named_expression(&ty, &id);
        self.provider.subject_factory(input, output, args, reference)
    }
}

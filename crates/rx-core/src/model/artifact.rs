//! Modelo de artifacts citados.
//!
//! Un `QuotedArtifact` envuelve una expresión más una identidad: `Known`
//! (ligado a un recurso durable) o `Anonymous` (definido sólo por su
//! árbol). Es inmutable tras la construcción; lo crea el provider y lo
//! consumen el binder o las llamadas remotas de creación.

use serde::{Deserialize, Serialize};

use rx_expr::{Expr, TypeRef};

use super::resource_id::ResourceId;

/// Clase del artifact citado. Los factories llevan la lista ordenada de
/// tipos de argumento; su longitud es la aridad (sin tope estructural).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Observable { element: TypeRef },
    Observer { element: TypeRef },
    Subject { input: TypeRef, output: TypeRef },
    Subscription,
    SubscriptionFactory { args: Vec<TypeRef> },
    SubjectFactory { input: TypeRef, output: TypeRef, args: Vec<TypeRef> },
}

impl ArtifactKind {
    /// Tipo genérico exacto del artifact: es el tipo con que se etiqueta
    /// el placeholder canónico de la variante `Known`.
    pub fn type_ref(&self) -> TypeRef {
        match self {
            ArtifactKind::Observable { element } => TypeRef::observable(element.clone()),
            ArtifactKind::Observer { element } => TypeRef::observer(element.clone()),
            ArtifactKind::Subject { input, output } => TypeRef::subject(input.clone(), output.clone()),
            ArtifactKind::Subscription => TypeRef::Subscription,
            ArtifactKind::SubscriptionFactory { args } => {
                TypeRef::func(args.clone(), TypeRef::Subscription)
            }
            ArtifactKind::SubjectFactory { input, output, args } => {
                TypeRef::func(args.clone(), TypeRef::subject(input.clone(), output.clone()))
            }
        }
    }

    /// Aridad declarada del artifact (0 para los no parametrizados).
    pub fn arity(&self) -> usize {
        match self {
            ArtifactKind::SubscriptionFactory { args } => args.len(),
            ArtifactKind::SubjectFactory { args, .. } => args.len(),
            _ => 0,
        }
    }
}

/// Identidad de un artifact citado.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    Known(ResourceId),
    Anonymous,
}

/// Artifact citado: expresión + identidad + clase.
///
/// Invariante (construcción vía provider): si `identity` es `Known(id)`,
/// `expr` es el placeholder canónico `Parameter(id, kind.type_ref())`.
/// El artifact posee su expresión en exclusiva (no hay sub-árboles
/// compartidos entre artifacts).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuotedArtifact {
    kind: ArtifactKind,
    expr: Expr,
    identity: Identity,
}

impl QuotedArtifact {
    pub(crate) fn known(kind: ArtifactKind, expr: Expr, id: ResourceId) -> Self {
        Self { kind, expr, identity: Identity::Known(id) }
    }

    pub(crate) fn anonymous(kind: ArtifactKind, expr: Expr) -> Self {
        Self { kind, expr, identity: Identity::Anonymous }
    }

    pub fn kind(&self) -> &ArtifactKind {
        &self.kind
    }

    pub fn expr(&self) -> &Expr {
        &self.expr
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_known(&self) -> bool {
        matches!(self.identity, Identity::Known(_))
    }

    pub fn resource_id(&self) -> Option<&ResourceId> {
        match &self.identity {
            Identity::Known(id) => Some(id),
            Identity::Anonymous => None,
        }
    }

    /// Extrae la expresión, consumiendo el artifact.
    pub fn into_expr(self) -> Expr {
        self.expr
    }
}

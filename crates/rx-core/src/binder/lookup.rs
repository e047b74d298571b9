//! Tabla estática de estrategias de resolución.
//!
//! Reemplaza la selección de métodos genéricos por reflexión del sistema
//! original: un mapa `(forma de tipo) -> estrategia` construido una sola
//! vez al arranque. Las estrategias consumen la lista completa de tipos
//! de argumento, así que la selección es total sobre (forma, aridad):
//! ninguna aridad queda sin manejar.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use rx_expr::TypeRef;

/// Nombres de las operaciones del contexto vivo emitidas por el binder.
pub mod ops {
    pub const SUBSCRIBE: &str = "subscribe";
    pub const CREATE: &str = "create";
    pub const GET_OBSERVABLE: &str = "get_observable";
    pub const GET_OBSERVABLE_FACTORY: &str = "get_observable_factory";
    pub const GET_OBSERVER: &str = "get_observer";
    pub const GET_OBSERVER_FACTORY: &str = "get_observer_factory";
    pub const GET_STREAM: &str = "get_stream";
    pub const GET_STREAM_FACTORY: &str = "get_stream_factory";
    pub const GET_SUBSCRIPTION: &str = "get_subscription";
    pub const GET_SUBSCRIPTION_FACTORY: &str = "get_subscription_factory";
    pub const DEFINE_OBSERVABLE: &str = "define_observable";
    pub const DEFINE_PARAMETERIZED_OBSERVABLE: &str = "define_parameterized_observable";
    pub const DEFINE_OBSERVER: &str = "define_observer";
    pub const DEFINE_PARAMETERIZED_OBSERVER: &str = "define_parameterized_observer";

    /// Nombres reservados de entorno (no son ids de recurso válidos).
    pub const CONTEXT_PARAM: &str = "@ctx";
    pub const CANCELLATION_PARAM: &str = "@ct";
}

/// Forma de tipo reconocida por el lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ShapeKey {
    Observable,
    Observer,
    Subject,
    Subscription,
}

/// Estrategia de resolución para una forma: getter simple, getter de
/// factory (variante parametrizada) y extracción de tipos de elemento.
pub(crate) struct LookupStrategy {
    pub getter: &'static str,
    pub factory_getter: &'static str,
    pub element_types: fn(&TypeRef) -> Vec<TypeRef>,
}

pub(crate) fn shape_of(ty: &TypeRef) -> Option<ShapeKey> {
    match ty {
        TypeRef::Observable(_) => Some(ShapeKey::Observable),
        TypeRef::Observer(_) => Some(ShapeKey::Observer),
        TypeRef::Subject { .. } => Some(ShapeKey::Subject),
        TypeRef::Subscription => Some(ShapeKey::Subscription),
        _ => None,
    }
}

fn one_element(ty: &TypeRef) -> Vec<TypeRef> {
    ty.element().cloned().into_iter().collect()
}

fn subject_elements(ty: &TypeRef) -> Vec<TypeRef> {
    match ty {
        TypeRef::Subject { input, output } => vec![(**input).clone(), (**output).clone()],
        _ => vec![],
    }
}

fn no_elements(_: &TypeRef) -> Vec<TypeRef> {
    vec![]
}

pub(crate) static LOOKUP_TABLE: Lazy<HashMap<ShapeKey, LookupStrategy>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(ShapeKey::Observable,
             LookupStrategy { getter: ops::GET_OBSERVABLE,
                              factory_getter: ops::GET_OBSERVABLE_FACTORY,
                              element_types: one_element });
    m.insert(ShapeKey::Observer,
             LookupStrategy { getter: ops::GET_OBSERVER,
                              factory_getter: ops::GET_OBSERVER_FACTORY,
                              element_types: one_element });
    m.insert(ShapeKey::Subject,
             LookupStrategy { getter: ops::GET_STREAM,
                              factory_getter: ops::GET_STREAM_FACTORY,
                              element_types: subject_elements });
    m.insert(ShapeKey::Subscription,
             LookupStrategy { getter: ops::GET_SUBSCRIPTION,
                              factory_getter: ops::GET_SUBSCRIPTION_FACTORY,
                              element_types: no_elements });
    m
});

/// Tabla de operaciones de definición, seleccionada por (forma, aridad).
/// Las definiciones admiten aridad 0 o 1; toda otra aridad es violación
/// de contrato (nunca truncamiento silencioso).
pub(crate) static DEFINE_TABLE: Lazy<HashMap<(ShapeKey, usize), &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert((ShapeKey::Observable, 0), ops::DEFINE_OBSERVABLE);
    m.insert((ShapeKey::Observable, 1), ops::DEFINE_PARAMETERIZED_OBSERVABLE);
    m.insert((ShapeKey::Observer, 0), ops::DEFINE_OBSERVER);
    m.insert((ShapeKey::Observer, 1), ops::DEFINE_PARAMETERIZED_OBSERVER);
    m
});

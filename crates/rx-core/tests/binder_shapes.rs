//! Formas reconocidas por el binder y sus violaciones de contrato.

use std::sync::Arc;

use rx_core::{ops, ContextBinder, InMemoryNamingService, NamingService, ResourceId, RxClientError};
use rx_expr::{Expr, TypeRef};
use serde_json::{json, Value};

fn binder() -> (ContextBinder, Arc<dyn NamingService>) {
    let naming: Arc<dyn NamingService> = Arc::new(InMemoryNamingService::new());
    (ContextBinder::new(Arc::clone(&naming)), naming)
}

fn rid(s: &str) -> ResourceId {
    ResourceId::new(s).unwrap()
}

fn obs_ref(name: &str) -> Expr {
    Expr::parameter(name, TypeRef::observable(TypeRef::Json))
}

fn obv_ref(name: &str) -> Expr {
    Expr::parameter(name, TypeRef::observer(TypeRef::Json))
}

fn lambda_body(bound: &Expr) -> &Expr {
    match bound {
        Expr::Lambda { params, body } => {
            assert_eq!(params.len(), 1, "bound lambda must keep a single context parameter");
            assert_eq!(params[0].ty, TypeRef::Context);
            &**body
        }
        other => panic!("expected lambda, got {other}"),
    }
}

#[test]
fn direct_and_tuple_subscribe_bind_identically() {
    let (binder, _) = binder();
    let sub_id = rid("rx://sub/1");

    let direct = Expr::invoke(Expr::subscribe_intrinsic(),
                              vec![obs_ref("rx://obs/xs"), obv_ref("rx://obv/v")]);
    let tupled = Expr::invoke(Expr::subscribe_intrinsic(),
                              vec![Expr::tuple(vec![obs_ref("rx://obs/xs"), obv_ref("rx://obv/v")])]);

    let a = binder.bind(&direct, &sub_id, None).unwrap();
    let b = binder.bind(&tupled, &sub_id, None).unwrap();
    assert_eq!(a, b, "tuple and direct forms must produce the same bound lambda");

    // El cuerpo es subscribe sobre el observable resuelto contra el contexto.
    match lambda_body(&a) {
        Expr::Call { target, method, type_args, args, .. } => {
            assert_eq!(method, ops::SUBSCRIBE);
            assert_eq!(type_args, &vec![TypeRef::Json]);
            // target: @ctx.get_observable<json>("rx://obs/xs")
            match target.as_ref() {
                Expr::Call { method, args, .. } => {
                    assert_eq!(method, ops::GET_OBSERVABLE);
                    assert_eq!(args[0], Expr::constant(json!("rx://obs/xs"), TypeRef::Json));
                }
                other => panic!("expected lookup call, got {other}"),
            }
            // argumentos: observer, uri, metadata, @ct en ese orden
            assert_eq!(args.len(), 4);
            assert_eq!(args[1], Expr::constant(json!("rx://sub/1"), TypeRef::Json));
            assert_eq!(args[3], Expr::parameter(ops::CANCELLATION_PARAM, TypeRef::CancellationToken));
        }
        other => panic!("expected subscribe call, got {other}"),
    }
}

#[test]
fn subscribe_with_wrong_operand_count_is_contract_violation() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");

    let none = Expr::invoke(Expr::subscribe_intrinsic(), vec![]);
    let three = Expr::invoke(Expr::subscribe_intrinsic(),
                             vec![obs_ref("rx://obs/a"), obv_ref("rx://obv/b"), obv_ref("rx://obv/c")]);

    assert!(matches!(binder.bind(&none, &id, None), Err(RxClientError::ContractViolation(_))));
    assert!(matches!(binder.bind(&three, &id, None), Err(RxClientError::ContractViolation(_))));
}

#[test]
fn subscribe_with_mismatched_elements_is_contract_violation() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");
    let bad = Expr::invoke(Expr::subscribe_intrinsic(),
                           vec![Expr::parameter("rx://obs/xs", TypeRef::observable(TypeRef::Json)),
                                Expr::parameter("rx://obv/v",
                                                TypeRef::observer(TypeRef::Named("other".into())))]);
    let err = binder.bind(&bad, &id, None).unwrap_err();
    assert!(matches!(err, RxClientError::ContractViolation(_)));
}

#[test]
fn factory_invocation_binds_to_create_call() {
    let (binder, _) = binder();
    let id = rid("rx://sub/42");
    let factory_ty = TypeRef::func(vec![TypeRef::Json], TypeRef::Subscription);
    let expr = Expr::invoke(Expr::parameter("rx://factory/f", factory_ty.clone()),
                            vec![Expr::constant(json!(42), TypeRef::Json)]);

    let bound = binder.bind(&expr, &id, Some(&json!({"owner": "test"}))).unwrap();
    match lambda_body(&bound) {
        Expr::Call { target, method, args, ret, .. } => {
            assert_eq!(method, ops::CREATE);
            assert_eq!(ret, &TypeRef::Subscription);
            match target.as_ref() {
                Expr::Call { method, type_args, args, .. } => {
                    assert_eq!(method, ops::GET_SUBSCRIPTION_FACTORY);
                    assert_eq!(type_args, &vec![TypeRef::Json]);
                    assert_eq!(args[0], Expr::constant(json!("rx://factory/f"), TypeRef::Json));
                }
                other => panic!("expected factory lookup, got {other}"),
            }
            // uri, argumento, metadata, @ct
            assert_eq!(args.len(), 4);
            assert_eq!(args[0], Expr::constant(json!("rx://sub/42"), TypeRef::Json));
            assert_eq!(args[1], Expr::constant(json!(42), TypeRef::Json));
            assert_eq!(args[2],
                       Expr::constant(json!({"owner": "test"}), TypeRef::Metadata));
        }
        other => panic!("expected create call, got {other}"),
    }
}

#[test]
fn stream_factory_invocation_binds_to_stream_create() {
    let (binder, _) = binder();
    let id = rid("rx://stream/s1");
    let subject_ty = TypeRef::subject(TypeRef::Json, TypeRef::Json);
    let factory_ty = TypeRef::func(vec![], subject_ty.clone());
    let expr = Expr::invoke(Expr::parameter("rx://factory/stream", factory_ty), vec![]);

    let bound = binder.bind(&expr, &id, None).unwrap();
    match lambda_body(&bound) {
        Expr::Call { target, method, ret, .. } => {
            assert_eq!(method, ops::CREATE);
            assert_eq!(ret, &subject_ty);
            match target.as_ref() {
                Expr::Call { method, type_args, .. } => {
                    assert_eq!(method, ops::GET_STREAM_FACTORY);
                    assert_eq!(type_args, &vec![TypeRef::Json, TypeRef::Json]);
                }
                other => panic!("expected stream factory lookup, got {other}"),
            }
        }
        other => panic!("expected create call, got {other}"),
    }
}

#[test]
fn factory_with_two_arguments_is_contract_violation_not_truncation() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");
    let factory_ty = TypeRef::func(vec![TypeRef::Json, TypeRef::Json], TypeRef::Subscription);
    let expr = Expr::invoke(Expr::parameter("rx://factory/f", factory_ty),
                            vec![Expr::constant(json!(1), TypeRef::Json),
                                 Expr::constant(json!(2), TypeRef::Json)]);
    let err = binder.bind(&expr, &id, None).unwrap_err();
    match err {
        RxClientError::ContractViolation(msg) => assert!(msg.contains("0 or 1")),
        other => panic!("expected contract violation, got {other:?}"),
    }
}

#[test]
fn factory_under_application_is_contract_violation() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");
    // Factory binario aplicado a un solo argumento: no hay aplicación
    // parcial silenciosa.
    let factory_ty = TypeRef::func(vec![TypeRef::Json, TypeRef::Json], TypeRef::Subscription);
    let expr = Expr::invoke(Expr::parameter("rx://factory/bin", factory_ty),
                            vec![Expr::constant(json!(1), TypeRef::Json)]);
    let err = binder.bind(&expr, &id, None).unwrap_err();
    match err {
        RxClientError::ContractViolation(msg) => {
            assert!(msg.contains("arity 2"), "message should name the declared arity: {msg}");
        }
        other => panic!("expected contract violation, got {other:?}"),
    }
}

#[test]
fn factory_argument_type_mismatch_is_contract_violation() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");
    let factory_ty = TypeRef::func(vec![TypeRef::observable(TypeRef::Json)], TypeRef::Subscription);
    let expr = Expr::invoke(Expr::parameter("rx://factory/hof", factory_ty),
                            vec![Expr::constant(json!(7), TypeRef::Json)]);
    let err = binder.bind(&expr, &id, None).unwrap_err();
    match err {
        RxClientError::ContractViolation(msg) => {
            assert!(msg.contains("observable<json>"),
                    "message should name the expected type: {msg}");
        }
        other => panic!("expected contract violation, got {other:?}"),
    }

    // Una referencia no parametrizada tampoco acepta argumentos.
    let plain = Expr::invoke(Expr::parameter("rx://sub/ref", TypeRef::Subscription),
                             vec![Expr::constant(json!(1), TypeRef::Json)]);
    assert!(matches!(binder.bind(&plain, &id, None),
                     Err(RxClientError::ContractViolation(_))));
}

#[test]
fn observable_definition_selects_define_by_arity() {
    let (binder, _) = binder();
    let id = rid("rx://def/obs");

    // aridad 0: definición directa de un observable
    let plain = Expr::invoke(obs_ref("rx://obs/xs"), vec![]);
    let bound = binder.bind(&plain, &id, None).unwrap();
    match lambda_body(&bound) {
        Expr::Call { target, method, type_args, .. } => {
            assert_eq!(method, ops::DEFINE_OBSERVABLE);
            assert_eq!(type_args, &vec![TypeRef::Json]);
            assert_eq!(target.as_ref(), &Expr::parameter(ops::CONTEXT_PARAM, TypeRef::Context));
        }
        other => panic!("expected define call, got {other}"),
    }

    // aridad 1: definición parametrizada
    let param_ty = TypeRef::func(vec![TypeRef::Json], TypeRef::observable(TypeRef::Json));
    let parameterized = Expr::parameter("rx://def/param-obs", param_ty);
    let bound = binder.bind(&parameterized, &id, None).unwrap();
    match lambda_body(&bound) {
        Expr::Call { method, type_args, .. } => {
            assert_eq!(method, ops::DEFINE_PARAMETERIZED_OBSERVABLE);
            assert_eq!(type_args, &vec![TypeRef::Json, TypeRef::Json]);
        }
        other => panic!("expected parameterized define, got {other}"),
    }
}

#[test]
fn definition_with_unsupported_arity_is_contract_violation() {
    let (binder, _) = binder();
    let id = rid("rx://def/obs");
    let ty = TypeRef::func(vec![TypeRef::Json, TypeRef::Json],
                           TypeRef::observable(TypeRef::Json));
    let expr = Expr::parameter("rx://def/binary", ty);
    let err = binder.bind(&expr, &id, None).unwrap_err();
    assert!(matches!(err, RxClientError::ContractViolation(_)));
}

#[test]
fn unknown_shape_uses_overridable_handler() {
    let naming: Arc<dyn NamingService> = Arc::new(InMemoryNamingService::new());
    let ctx = Expr::parameter(ops::CONTEXT_PARAM, TypeRef::Context);

    // Por defecto: violación de contrato con id y tipo.
    let default_binder = ContextBinder::new(Arc::clone(&naming));
    let err = default_binder.lookup(&ctx, &rid("rx://odd/x"), &TypeRef::Json).unwrap_err();
    match err {
        RxClientError::ContractViolation(msg) => {
            assert!(msg.contains("rx://odd/x"));
            assert!(msg.contains("json"));
        }
        other => panic!("expected contract violation, got {other:?}"),
    }

    // Con handler propio: resolución alternativa.
    let custom = ContextBinder::new(naming).with_unknown_handler(Box::new(|id, _ty| {
        Ok(Expr::constant(Value::String(id.to_string()), TypeRef::Json))
    }));
    let out = custom.lookup(&ctx, &rid("rx://odd/x"), &TypeRef::Json).unwrap();
    assert_eq!(out, Expr::constant(json!("rx://odd/x"), TypeRef::Json));
}

#[test]
fn unrecognized_expression_reports_offending_fragment() {
    let (binder, _) = binder();
    let id = rid("rx://sub/1");
    let stray = Expr::constant(json!(3.14), TypeRef::Json);
    let err = binder.bind(&stray, &id, None).unwrap_err();
    match err {
        RxClientError::ContractViolation(msg) => assert!(msg.contains("3.14")),
        other => panic!("expected contract violation, got {other:?}"),
    }
}

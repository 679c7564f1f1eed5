use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};
use webhooks::{
    DispatchError, Handler, HandlerSpec, LazyHandler, MethodTable, Namespace, Publisher,
    PublisherConfig, Receiver, Registry, StackError, StatusCode, Subscriber, WebhooksResult,
};

type Log = Arc<Mutex<Vec<(String, Value)>>>;

fn recording(
    log: &Log,
    tag: &str,
) -> impl Fn(&Value) -> WebhooksResult<()> + Send + Sync + 'static {
    let log = log.clone();
    let tag = tag.to_string();
    move |payload| {
        log.lock().push((tag.clone(), payload.clone()));
        Ok(())
    }
}

fn payouts() -> Publisher {
    Publisher::new(&PublisherConfig::new("payout")).unwrap()
}

/// Тест проверяет основной сценарий: подписка на лист и на всё
/// пространство, публикация в подписанную и неподписанную темы.
#[test]
fn test_payout_scenario() {
    let publisher = payouts();
    let log: Log = Arc::default();

    publisher.subscribe_fn("created", recording(&log, "h1")).unwrap();
    publisher.all_fn(recording(&log, "h2")).unwrap();

    assert_eq!(publisher.publish("created", &json!({"amount": 100})).unwrap(), 2);
    assert_eq!(publisher.publish("refunded", &json!({"amount": 50})).unwrap(), 1);

    assert_eq!(
        *log.lock(),
        vec![
            ("h1".to_string(), json!({"amount": 100})),
            ("h2".to_string(), json!({"amount": 100})),
            ("h2".to_string(), json!({"amount": 50})),
        ]
    );
}

/// Тест проверяет, что один и тот же обработчик, подписанный дважды,
/// вызывается один раз.
#[test]
fn test_same_handler_twice_is_one_subscription() {
    let publisher = payouts();
    let table: Arc<MethodTable<Value>> = Arc::new(MethodTable::new("Payouts"));
    let hits = Arc::new(Mutex::new(0));
    let h = hits.clone();
    table.define("created", move |_: &Value| {
        *h.lock() += 1;
        Ok(())
    });

    publisher
        .subscribe("created", LazyHandler::new(table.clone(), "created"))
        .unwrap();
    publisher
        .subscribe("created", LazyHandler::new(table.clone(), "created"))
        .unwrap();

    let total: usize = publisher.subscribers().values().map(Vec::len).sum();
    assert_eq!(total, 1);
    publisher.publish("created", &json!({})).unwrap();
    assert_eq!(*hits.lock(), 1);
}

/// Тест проверяет, что один обработчик на разных листьях даёт разные
/// подписки.
#[test]
fn test_same_handler_on_two_topics() {
    let publisher = payouts();
    let log: Log = Arc::default();
    let handler = Handler::from_fn(recording(&log, "h"));

    publisher.subscribe("created", handler.clone()).unwrap();
    publisher.subscribe("refunded", handler).unwrap();

    assert_eq!(publisher.subscribers().len(), 2);
    assert_eq!(publisher.publish("created", &json!(1)).unwrap(), 1);
    assert_eq!(publisher.publish("refunded", &json!(2)).unwrap(), 1);
}

#[test]
fn test_unsubscribe_stops_listening() {
    let publisher = payouts();
    let log: Log = Arc::default();
    publisher.subscribe_fn("created", recording(&log, "h")).unwrap();
    assert!(publisher.listening("created"));

    assert_eq!(publisher.unsubscribe("created"), 1);
    assert!(!publisher.listening("created"));
    assert_eq!(publisher.publish("created", &json!({})).unwrap(), 0);
    assert!(log.lock().is_empty());
}

/// Тест проверяет префиксное сопоставление: подписка на `created` получает
/// `created_late`, а отписка от `created` не трогает подписку на
/// `created_late`.
#[test]
fn test_literal_prefix_semantics() {
    let publisher = payouts();
    let log: Log = Arc::default();
    publisher.subscribe_fn("created", recording(&log, "short")).unwrap();
    publisher
        .subscribe_fn("created_late", recording(&log, "long"))
        .unwrap();

    assert_eq!(publisher.publish("created_late", &json!(1)).unwrap(), 2);
    assert_eq!(publisher.unsubscribe("created"), 1);
    assert!(publisher.listening("created_late"));
}

/// Тест проверяет, что метасимволы регулярных выражений в именах не имеют
/// особого смысла.
#[test]
fn test_regex_metacharacters_are_literal() {
    let publisher: Publisher = Publisher::from_namespace(Namespace::new("pay.out", "*"));
    let log: Log = Arc::default();
    publisher.subscribe_fn("a+b", recording(&log, "h")).unwrap();

    assert_eq!(publisher.topic("a+b"), "pay.out*a+b");
    assert!(publisher.listening("a+b"));
    assert!(!publisher.listening("aab"));
    assert_eq!(publisher.publish("aab", &json!(0)).unwrap(), 0);
}

/// Тест проверяет, что ленивый обработчик падает с `HandlerUnresolved`, пока
/// метод не определён, и начинает работать после определения.
#[test]
fn test_lazy_handler_before_method_exists() {
    let publisher = payouts();
    let table: Arc<MethodTable<Value>> = Arc::new(MethodTable::new("LatePayouts"));
    let receiver: Arc<dyn Receiver<Value>> = table.clone();
    publisher
        .subscribe("created", LazyHandler::on(receiver, "on_created"))
        .unwrap();

    let err = publisher.publish("created", &json!({})).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::HandlerUnresolved);
    assert_eq!(
        err.downcast_ref::<DispatchError>(),
        Some(&DispatchError::HandlerUnresolved {
            receiver: "LatePayouts".to_string(),
            method: "on_created".to_string(),
        })
    );

    let log: Log = Arc::default();
    table.define("on_created", recording(&log, "late"));
    assert_eq!(publisher.publish("created", &json!({"amount": 1})).unwrap(), 1);
    assert_eq!(log.lock().len(), 1);
}

/// Тест проверяет политику ошибок: первая ошибка прерывает рассылку и
/// возвращается с контекстом темы.
#[test]
fn test_handler_failure_aborts_and_propagates() {
    let publisher = payouts();
    let log: Log = Arc::default();
    publisher.subscribe_fn("created", recording(&log, "first")).unwrap();
    publisher
        .subscribe_fn("created", |payload: &Value| {
            webhooks::ensure!(
                payload["amount"].is_number(),
                StatusCode::InvalidData,
                "payout without amount"
            );
            Ok(())
        })
        .unwrap();
    publisher.subscribe_fn("created", recording(&log, "third")).unwrap();

    let err = publisher.publish("created", &json!({})).unwrap_err();
    assert_eq!(err.status_code(), StatusCode::InvalidData);
    assert!(err.to_string().starts_with("publish 'payout.created'"));
    assert!(err.to_string().ends_with("payout without amount"));
    assert_eq!(log.lock().len(), 1);

    // После ошибки реестр продолжает работать.
    assert_eq!(publisher.publish("created", &json!({"amount": 1})).unwrap(), 3);
}

/// Тест проверяет маршрутизацию "ALL" и декларативные подписки.
#[test]
fn test_declarative_subscriber() {
    let publisher = payouts();
    let table: Arc<MethodTable<Value>> = Arc::new(MethodTable::new("Audit"));
    let log: Log = Arc::default();
    table.define("call", recording(&log, "call"));
    table.define("on_refund", recording(&log, "refund"));

    let subscriber = Subscriber::new(publisher.clone(), table.clone());
    subscriber.subscribe_to("ALL", HandlerSpec::Default).unwrap();
    subscriber.subscribe_to("refunded", "on_refund").unwrap();

    assert!(publisher.subscribers().contains_key(&None));
    assert_eq!(publisher.publish("refunded", &json!(5)).unwrap(), 2);
    assert_eq!(publisher.publish("created", &json!(6)).unwrap(), 1);

    let tags: Vec<String> = log.lock().iter().map(|(t, _)| t.clone()).collect();
    assert_eq!(tags, vec!["call", "refund", "call"]);
}

#[test]
fn test_unknown_handler_spec() {
    let err: StackError = HandlerSpec::<Value>::parse(Some(" "))
        .unwrap_err()
        .into();
    assert_eq!(err.status_code(), StatusCode::InvalidHandlerSpec);
}

/// Тест проверяет, что издатели на общем реестре изолированы по
/// пространствам имён.
#[test]
fn test_shared_registry_isolation() {
    let registry = Arc::new(Registry::new());
    let payouts =
        Publisher::with_registry(&PublisherConfig::new("payout"), registry.clone()).unwrap();
    let refunds =
        Publisher::with_registry(&PublisherConfig::new("refund"), registry.clone()).unwrap();
    let log: Log = Arc::default();

    payouts.all_fn(recording(&log, "payout")).unwrap();
    refunds.all_fn(recording(&log, "refund")).unwrap();

    assert_eq!(payouts.publish("created", &json!(1)).unwrap(), 1);
    assert_eq!(payouts.subscribers().len(), 1);
    assert_eq!(refunds.subscribers()[&None].len(), 1);
    assert_eq!(registry.len(), 2);
}

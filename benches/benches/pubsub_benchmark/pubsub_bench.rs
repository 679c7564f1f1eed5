use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use webhooks::{Handler, LazyHandler, MethodTable, Namespace, Publisher, Receiver};

fn publisher() -> Publisher<Value> {
    Publisher::from_namespace(Namespace::new("payout", "."))
}

fn bench_subscribe_same_handler(c: &mut Criterion) {
    let publisher = publisher();
    let handler: Handler<Value> = Handler::from_fn(|_| Ok(()));
    c.bench_function("subscribe_dedup", |b| {
        b.iter(|| {
            // одна и та же идентичность: реестр не растёт
            black_box(publisher.subscribe("created", handler.clone()).unwrap());
        })
    });
}

fn bench_publish_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_fanout");
    let payload = json!({"amount": 100});

    for subscribers in [1usize, 10, 100] {
        let publisher = publisher();
        let table: Arc<MethodTable<Value>> = Arc::new(MethodTable::new("bench"));
        let receiver: Arc<dyn Receiver<Value>> = table.clone();
        for i in 0..subscribers {
            let method = format!("m{i}");
            table.define(method.as_str(), |_: &Value| Ok(()));
            publisher
                .subscribe("created", LazyHandler::on(receiver.clone(), method))
                .unwrap();
        }

        group.throughput(Throughput::Elements(subscribers as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| black_box(publisher.publish("created", &payload).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_publish_closures(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish_closures");
    let payload = json!({"amount": 50});

    for subscribers in [1usize, 10, 100] {
        let publisher = publisher();
        for i in 0..subscribers {
            let leaf = format!("created.{i}");
            publisher.subscribe_fn(&leaf, |_| Ok(())).unwrap();
        }
        publisher.all_fn(|_| Ok(())).unwrap();

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| black_box(publisher.publish("created.0", &payload).unwrap()));
            },
        );
    }
    group.finish();
}

fn bench_listening(c: &mut Criterion) {
    let publisher = publisher();
    for i in 0..100 {
        publisher
            .subscribe_fn(&format!("leaf{i}"), |_| Ok(()))
            .unwrap();
    }
    c.bench_function("listening_miss", |b| {
        b.iter(|| black_box(publisher.listening("absent")));
    });
}

criterion_group!(
    benches,
    bench_subscribe_same_handler,
    bench_publish_fanout,
    bench_publish_closures,
    bench_listening
);
criterion_main!(benches);

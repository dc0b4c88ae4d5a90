//! # Traversal Benchmarks
//!
//! Emission over synthetic follow graphs.
//!
//! Run with: `cargo bench -p gitlod-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gitlod_core::{
    Format, MemorySource, Mode, Person, RepoRecord, SharedSource, Traversal, Triple, UserRecord,
};
use std::hint::black_box;
use std::sync::Arc;

/// `size` users in a ring of mutual follows, each owning one repository.
fn create_ring(size: usize) -> SharedSource {
    let memory = MemorySource::new();
    let login = |i: usize| format!("user{}", i);

    for i in 0..size {
        let record = UserRecord {
            login: login(i),
            name: Some(format!("User {}", i)),
            email: Some(format!("user{}@example.org", i)),
            populated: true,
            ..UserRecord::default()
        };
        memory.insert_user(record.clone()).expect("insert");
        memory
            .insert_repo(RepoRecord {
                owner: record,
                name: format!("repo{}", i),
                url: Some(format!("https://github.com/{}/repo{}", login(i), i)),
                has_wiki: true,
                populated: true,
                ..RepoRecord::default()
            })
            .expect("insert");

        let next = login((i + 1) % size);
        let prev = login((i + size - 1) % size);
        memory
            .set_followings(&login(i), vec![next.clone(), prev.clone()])
            .expect("set");
        memory
            .set_followers(&login(i), vec![prev, next])
            .expect("set");
    }

    Arc::new(memory)
}

/// `size` users all following one hub.
fn create_star(size: usize) -> SharedSource {
    let memory = MemorySource::new();
    let hub = UserRecord {
        login: "hub".to_string(),
        name: Some("Hub".to_string()),
        populated: true,
        ..UserRecord::default()
    };
    memory.insert_user(hub).expect("insert");

    let spokes: Vec<String> = (0..size).map(|i| format!("spoke{}", i)).collect();
    for spoke in &spokes {
        memory
            .insert_user(UserRecord {
                login: spoke.clone(),
                name: Some(spoke.to_uppercase()),
                populated: true,
                ..UserRecord::default()
            })
            .expect("insert");
    }
    memory.set_followers("hub", spokes).expect("set");

    Arc::new(memory)
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_full_emission(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_emission_star");

    for size in [10, 100, 1000] {
        let source = create_star(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut hub = Person::get(source.clone(), "hub").expect("get");
                let mut triples: Vec<Triple> = Vec::new();
                Traversal::new()
                    .emit(&mut hub, Mode::Full, &mut triples)
                    .expect("emit");
                black_box(triples)
            });
        });
    }

    group.finish();
}

fn bench_warm_cache(c: &mut Criterion) {
    let source = create_star(1000);
    let mut hub = Person::get(source, "hub").expect("get");
    Traversal::new().warm(&mut hub).expect("warm");

    c.bench_function("full_emission_warm_1000", |b| {
        b.iter(|| {
            let mut triples: Vec<Triple> = Vec::new();
            Traversal::new()
                .emit(&mut hub, Mode::Full, &mut triples)
                .expect("emit");
            black_box(triples)
        });
    });
}

fn bench_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("ring_serialization");
    let source = create_ring(200);

    for format in [Format::NTriples, Format::Turtle] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format),
            &format,
            |b, &format| {
                b.iter(|| {
                    let mut writer = format.writer(Vec::new());
                    for i in 0..200 {
                        let mut person =
                            Person::get(source.clone(), &format!("user{}", i)).expect("get");
                        Traversal::new()
                            .emit(&mut person, Mode::Full, &mut writer)
                            .expect("emit");
                    }
                    black_box(writer.finish().expect("finish"))
                });
            },
        );
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let source = create_ring(1);
    let mut person = Person::get(source, "user0").expect("get");

    c.bench_function("summary_emission", |b| {
        b.iter(|| {
            let mut sink: Vec<Triple> = Vec::new();
            Traversal::new()
                .emit(&mut person, Mode::Summary, &mut sink)
                .expect("emit");
            black_box(sink.len())
        });
    });
}

criterion_group!(
    benches,
    bench_full_emission,
    bench_warm_cache,
    bench_serialization,
    bench_summary
);
criterion_main!(benches);

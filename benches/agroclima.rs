use agroclima::{classify, CanonicalEntity, EntityResolver, ResolverTables, SeasonalRow};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn oni_rows() -> Vec<SeasonalRow> {
    (1950..2025)
        .map(|year| {
            let phase = (year % 7) as f64 / 3.0 - 1.0;
            SeasonalRow::from_values(year, std::array::from_fn(|i| phase + i as f64 * 0.05))
        })
        .collect()
}

fn registry() -> Vec<CanonicalEntity> {
    (0..5570)
        .map(|i| CanonicalEntity::new(1_100_000 + i, format!("Município Número {}", i)))
        .chain([
            CanonicalEntity::new(3304557, "Rio de Janeiro"),
            CanonicalEntity::new(3550308, "São Paulo"),
        ])
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let rows = oni_rows();
    c.bench_function("classify_oni_table", |b| {
        b.iter(|| classify(black_box(&rows)).filter(Result::is_ok).count())
    });
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = EntityResolver::new(&registry(), ResolverTables::inmet());
    c.bench_function("resolve_exact_match", |b| {
        b.iter(|| resolver.resolve(black_box("SAO PAULO")))
    });
    c.bench_function("resolve_station_alias", |b| {
        b.iter(|| resolver.resolve_station(black_box("FORTE DE COPACABANA (A) - RJ")))
    });
    c.bench_function("resolve_unresolved", |b| {
        b.iter(|| resolver.resolve_station(black_box("ATLANTIS (A) - XX")))
    });
}

criterion_group!(benches, bench_classify, bench_resolve);
criterion_main!(benches);

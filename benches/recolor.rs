//! Performance benchmarks for layer recoloring and projection.
//!
//! Run with: `cargo bench --bench recolor`
//!
//! ## Performance Targets
//!
//! | Operation | Target | Notes |
//! |-----------|--------|-------|
//! | Layer recolor | <1ms for 180 features | No reprojection |
//! | Index build | <100µs | Memoized on unchanged input |
//! | Scene projection | <10ms for 180 features | Only on load or resize |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

use geo::{polygon, MultiPolygon};
use geolayer_kernel::{
    Alliance, Conflict, Country, FeatureCollection, GeometryFeature, IdentifierBridge, IndexCache,
    LayerConfig, LayerEncoder, LayerKind, Scene, SceneFit, SceneStyle, ViewportSize,
};
use geolayer_kernel::encoder::{IndexCacheConfig, LayerIndex};

/// Synthetic world: one square per feature on a grid. The first features
/// take real table ids so lookups resolve; the rest stay unmapped.
fn make_collection(bridge: &IdentifierBridge, count: usize) -> (FeatureCollection, Vec<Country>) {
    let mut table = bridge.iter();
    let mut features = Vec::with_capacity(count);
    let mut countries = Vec::new();
    for i in 0..count {
        let lon = -170.0 + (i % 30) as f64 * 11.0;
        let lat = -60.0 + (i / 30) as f64 * 12.0;
        let square = polygon![
            (x: lon, y: lat),
            (x: lon + 10.0, y: lat),
            (x: lon + 10.0, y: lat + 10.0),
            (x: lon, y: lat + 10.0),
            (x: lon, y: lat),
        ];
        let id = match table.next() {
            Some((iso, numeric)) => {
                countries.push(
                    Country::new(iso.to_lowercase(), iso, iso, (i % 5) as i32 + 1)
                        .with_alliances([format!("a{}", i % 7)]),
                );
                numeric.to_string()
            }
            None => format!("x{i}"),
        };
        features.push(GeometryFeature::new(id, MultiPolygon(vec![square])));
    }
    (FeatureCollection::new(features), countries)
}

fn make_alliances(countries: &[Country]) -> Vec<Alliance> {
    (0..7)
        .map(|k| {
            let members: Vec<String> = countries
                .iter()
                .filter(|c| c.alliances.iter().any(|a| a == &format!("a{k}")))
                .map(|c| c.id.clone())
                .collect();
            Alliance::new(format!("a{k}"), format!("Alliance {k}"), format!("#{:02x}3366", k * 30), members)
        })
        .collect()
}

fn make_conflicts(countries: &[Country]) -> Vec<Conflict> {
    countries
        .chunks(6)
        .enumerate()
        .map(|(i, chunk)| {
            Conflict::new(format!("c{i}"), format!("Conflict {i}"), chunk.iter().take(2).map(|c| c.id.clone()))
                .with_supporters("backers", chunk.iter().skip(2).take(1).map(|c| c.id.clone()))
        })
        .collect()
}

fn power_tiers() -> LayerConfig {
    (1..=5).fold(LayerConfig::new("power-tiers", "Power Tiers", "powerTier"), |config, tier| {
        config.with_color(tier.to_string(), format!("#{tier}{tier}{tier}"))
    })
}

/// Benchmark recoloring an already projected scene.
fn bench_recolor(c: &mut Criterion) {
    let bridge = IdentifierBridge::new();
    let mut group = c.benchmark_group("recolor");

    for count in [60, 180, 360] {
        let (collection, countries) = make_collection(&bridge, count);
        let alliances = make_alliances(&countries);
        let conflicts = make_conflicts(&countries);
        let encoder = LayerEncoder::build(
            &bridge,
            &IndexCache::default(),
            &countries,
            &alliances,
            &conflicts,
            power_tiers(),
        );
        let mut scene = Scene::project(
            &collection,
            ViewportSize::default(),
            &SceneFit::World,
            SceneStyle::world(),
        );

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("features", count), &count, |b, _| {
            let mut layers = LayerKind::ALL.into_iter().cycle();
            b.iter(|| {
                let layer = layers.next().unwrap_or_default();
                scene.recolor(&encoder.for_layer(layer), Duration::from_millis(400));
                scene.advance(Duration::from_millis(400));
                black_box(scene.target_fills().len())
            })
        });
    }

    group.finish();
}

/// Benchmark cold index builds vs memoized lookups.
fn bench_index(c: &mut Criterion) {
    let bridge = IdentifierBridge::new();
    let (_, countries) = make_collection(&bridge, 180);
    let alliances = make_alliances(&countries);
    let conflicts = make_conflicts(&countries);

    let mut group = c.benchmark_group("layer_index");

    group.bench_function("cold_build", |b| {
        b.iter(|| black_box(LayerIndex::build(black_box(&alliances), black_box(&conflicts))))
    });

    let cache = IndexCache::new(IndexCacheConfig { max_entries: 16 });
    cache.get_or_build(&alliances, &conflicts);
    group.bench_function("memoized", |b| {
        b.iter(|| black_box(cache.get_or_build(black_box(&alliances), black_box(&conflicts))))
    });

    group.finish();
}

/// Benchmark full projection passes.
fn bench_projection(c: &mut Criterion) {
    let bridge = IdentifierBridge::new();
    let mut group = c.benchmark_group("projection");

    for count in [60, 180, 360] {
        let (collection, _) = make_collection(&bridge, count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("world_fit", count), &collection, |b, collection| {
            b.iter(|| {
                black_box(Scene::project(
                    collection,
                    ViewportSize::default(),
                    &SceneFit::World,
                    SceneStyle::world(),
                ))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recolor, bench_index, bench_projection);
criterion_main!(benches);

use chrono::{NaiveDate, NaiveTime};
use criterion::{criterion_group, criterion_main, Criterion};
use once_cell::sync::Lazy;
use std::hint::black_box;
use sunroute_lib::{
    assign_coldness, compute_tables, plan_warm_route, select_route, solar_position, Bearing,
    ColdnessPolicy, GeoCoordinate, ModelConfig, SearchLimits, SpatialIndex, StreetGraph,
    WarmRouteRequest, WeightedView,
};

const SIDE: i64 = 60;
const ORIGIN_LAT: f64 = 33.58;
const ORIGIN_LON: f64 = 130.39;
const STEP_LAT: f64 = 0.0009;
const STEP_LON: f64 = 0.0011;

fn node_id(row: i64, col: i64) -> i64 {
    row * SIDE + col + 1
}

/// Square street grid of `SIDE * SIDE` intersections with a few diagonals.
fn synthetic_grid() -> StreetGraph {
    let mut builder = StreetGraph::builder();
    for row in 0..SIDE {
        for col in 0..SIDE {
            let coordinate = GeoCoordinate::new(
                ORIGIN_LAT + STEP_LAT * row as f64,
                ORIGIN_LON + STEP_LON * col as f64,
            )
            .expect("grid stays on the globe");
            builder.intersection(node_id(row, col), coordinate);
        }
    }

    let east = Bearing::new(90).expect("valid bearing");
    let north = Bearing::new(0).expect("valid bearing");
    let diagonal = Bearing::new(45).expect("valid bearing");
    for row in 0..SIDE {
        for col in 0..SIDE {
            if col + 1 < SIDE {
                builder
                    .segment(node_id(row, col), node_id(row, col + 1), 101.7, east, false)
                    .expect("valid segment");
            }
            if row + 1 < SIDE {
                builder
                    .segment(node_id(row, col), node_id(row + 1, col), 100.1, north, false)
                    .expect("valid segment");
            }
            if row + 1 < SIDE && col + 1 < SIDE && (row + col) % 7 == 0 {
                builder
                    .segment(
                        node_id(row, col),
                        node_id(row + 1, col + 1),
                        142.7,
                        diagonal,
                        false,
                    )
                    .expect("valid segment");
            }
        }
    }
    builder.build()
}

static GRAPH: Lazy<StreetGraph> = Lazy::new(synthetic_grid);
static INDEX: Lazy<SpatialIndex> = Lazy::new(|| SpatialIndex::build(&GRAPH));
static REQUEST: Lazy<WarmRouteRequest> = Lazy::new(|| WarmRouteRequest {
    date: NaiveDate::from_ymd_opt(2023, 12, 21).expect("valid date"),
    time: NaiveTime::from_hms_opt(12, 0, 0).expect("valid time"),
    origin: GeoCoordinate::new(ORIGIN_LAT, ORIGIN_LON).expect("valid origin"),
    destination: GeoCoordinate::new(
        ORIGIN_LAT + STEP_LAT * (SIDE - 1) as f64,
        ORIGIN_LON + STEP_LON * (SIDE - 1) as f64,
    )
    .expect("valid destination"),
});

fn benchmark_warm_route(c: &mut Criterion) {
    let graph = &*GRAPH;
    let index = &*INDEX;
    let request = &*REQUEST;
    let config = ModelConfig::default();

    c.bench_function("bearing_tables_noon", |b| {
        let sun = solar_position(request.date, request.time, &request.origin)
            .expect("valid input")
            .daylight()
            .expect("sun up at noon");
        b.iter(|| black_box(compute_tables(request.date, &sun, &config)));
    });

    c.bench_function("dijkstra_corner_to_corner", |b| {
        let sun = solar_position(request.date, request.time, &request.origin)
            .expect("valid input")
            .daylight()
            .expect("sun up at noon");
        let (exposure, insolation) = compute_tables(request.date, &sun, &config);
        let overlay = assign_coldness(graph, &exposure, &insolation, &ColdnessPolicy::default())
            .expect("weights are finite");
        let view = WeightedView::new(graph, &overlay).expect("overlay matches graph");
        let (origin, destination) = (node_id(0, 0), node_id(SIDE - 1, SIDE - 1));
        b.iter(|| {
            let route = select_route(&view, origin, destination, &SearchLimits::default())
                .expect("route exists");
            black_box(route.hop_count())
        });
    });

    c.bench_function("plan_warm_route_end_to_end", |b| {
        b.iter(|| {
            let outcome =
                plan_warm_route(graph, index, request, &config, None).expect("route exists");
            black_box(outcome.plan().map(|plan| plan.route.total_coldness))
        });
    });
}

criterion_group!(benches, benchmark_warm_route);
criterion_main!(benches);

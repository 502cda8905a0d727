use blockwire::config::Config;
use blockwire::ir::{Diagram, Port, PortRef, PortSide, Shape, ShapeType, Wire};
use blockwire::render::render_svg;
use blockwire::routing::route_all;
use blockwire::Editor;
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

const SCENARIO: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/scenario.json"));

/// `cols` x `rows` blocks; every block feeds the block two columns to its
/// right, so each wire has to get past the block in between.
fn grid_diagram(cols: usize, rows: usize) -> Diagram {
    let mut diagram = Diagram::new();
    for row in 0..rows {
        for col in 0..cols {
            let id = format!("mod-{row}-{col}");
            let port = |suffix: &str, side: PortSide| Port {
                id: format!("{id}-{suffix}"),
                name: suffix.to_uppercase(),
                side,
                offset: 0.5,
                clock: false,
            };
            diagram.shapes.push(Shape {
                id: id.clone(),
                kind: ShapeType::Combo,
                name: id.clone(),
                x: col as f32 * 180.0,
                y: row as f32 * 140.0,
                width: 100.0,
                height: 60.0,
                ports: vec![port("in", PortSide::Left), port("out", PortSide::Right)],
                stroke_width: Some(2.0),
                stroke_color: None,
                fill: None,
            });
        }
    }
    for row in 0..rows {
        for col in 0..cols.saturating_sub(2) {
            let from = format!("mod-{row}-{col}");
            let to = format!("mod-{row}-{}", col + 2);
            let mut wire = Wire::new(
                format!("wire-{row}-{col}"),
                PortRef::new(&from, format!("{from}-out")),
                PortRef::new(&to, format!("{to}-in")),
            );
            wire.bend = col as f32 * 180.0 + 230.0;
            diagram.wires.push(wire);
        }
    }
    diagram
}

fn bench_route_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("route_all");
    let config = Config::default();
    for (cols, rows) in [(6usize, 4usize), (12, 8), (24, 12)] {
        let diagram = grid_diagram(cols, rows);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{cols}x{rows}")), &diagram, |b, diagram| {
            b.iter(|| {
                let routes = route_all(black_box(diagram), &config);
                black_box(routes.len());
            });
        });
    }
    group.finish();
}

fn bench_smart_routing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smart_routing");
    for (cols, rows) in [(6usize, 4usize), (12, 8), (24, 12)] {
        let diagram = grid_diagram(cols, rows);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{cols}x{rows}")), &diagram, |b, diagram| {
            b.iter(|| {
                let mut editor = Editor::new(diagram.clone(), Config::default());
                black_box(editor.recompute_all_smart_routes());
            });
        });
    }
    group.finish();
}

fn bench_handle_drag(c: &mut Criterion) {
    let mut editor = Editor::from_json(SCENARIO, Config::default()).expect("scenario parse failed");
    editor.recompute_smart_route("wire-6").expect("scenario wire");
    let handle = editor.route("wire-6").expect("scenario route").handles[1];
    c.bench_function("handle_drag", |b| {
        b.iter(|| {
            editor
                .begin_wire_drag("wire-6", 1, handle.position)
                .expect("drag start");
            for step in 0..32 {
                let mut pointer = handle.position;
                pointer.y -= step as f32;
                black_box(editor.drag_wire_to(pointer));
            }
            editor.drag_wire_to(handle.position);
            editor.end_wire_drag();
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let config = Config::default();
    let diagram = grid_diagram(12, 8);
    c.bench_function("render_svg_12x8", |b| {
        b.iter(|| {
            let svg = render_svg(black_box(&diagram), &config);
            black_box(svg.len());
        });
    });
}

criterion_group!(
    benches,
    bench_route_all,
    bench_smart_routing,
    bench_handle_drag,
    bench_render
);
criterion_main!(benches);

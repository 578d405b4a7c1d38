//! Criterion benchmarks for the sync pass
//!
//! Run with: cargo bench -p bitscape-sync

use bitscape_patch::{Patch, PatchAction, Point};
use bitscape_sync::{EngineSync, RecordingEngine, diff_patches, full_sync};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

fn dense_patch() -> Patch {
    let edges = [(1, 0), (3, 2), (2, 0), (2, 1), (3, 1)];
    let mut patch = Patch::initial();
    for (src, dst) in edges {
        patch = patch.apply(&PatchAction::AddConnection { src, dst });
    }
    for op in 0..4 {
        patch = patch.apply(&PatchAction::SetSelfLoop {
            op_index: op,
            radius: 30.0 + op as f32 * 10.0,
        });
    }
    patch
}

// ============================================================================
// Diff benchmarks
// ============================================================================

fn bench_full_pass(c: &mut Criterion) {
    let patch = dense_patch();
    c.bench_function("full_sync", |b| b.iter(|| black_box(full_sync(&patch))));
}

fn bench_single_edit_diff(c: &mut Criterion) {
    let mut group = c.benchmark_group("Diff");
    let base = dense_patch();

    let edits = [
        ("volume", PatchAction::SetMasterVolume { value: 10.0 }),
        (
            "move",
            PatchAction::MoveOperator {
                op_index: 2,
                position: Point::new(420.0, 610.0),
            },
        ),
        ("connect", PatchAction::AddConnection { src: 0, dst: 3 }),
    ];

    for (name, edit) in &edits {
        let next = base.apply(edit);
        group.bench_with_input(BenchmarkId::new("edit", name), &next, |b, next| {
            b.iter(|| black_box(diff_patches(Some(&base), next)))
        });
    }

    group.finish();
}

// ============================================================================
// Drag simulation
// ============================================================================

fn bench_drag_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("Drag");

    for &steps in &[16usize, 64, 256] {
        group.bench_with_input(BenchmarkId::new("move_steps", steps), &steps, |b, &n| {
            b.iter(|| {
                let mut sync = EngineSync::new();
                let mut engine = RecordingEngine::new();
                let mut patch = dense_patch();
                sync.sync(&patch, &mut engine);
                for i in 0..n {
                    patch = patch.apply(&PatchAction::MoveOperator {
                        op_index: 1,
                        position: Point::new(500.0, 300.0 + i as f32),
                    });
                    sync.sync(&patch, &mut engine);
                }
                black_box(engine.calls().len())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_pass,
    bench_single_edit_diff,
    bench_drag_stream
);
criterion_main!(benches);

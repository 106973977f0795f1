use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use patchdrift_core::options::GeneratorOptions;
use patchdrift_engine::{GeneratorPanel, GeneratorRegistry, Patch};

fn bench_registry_second(c: &mut Criterion) {
    c.bench_function("registry_one_second_at_25ms", |b| {
        b.iter(|| {
            let mut params = Patch::poly_default().into_param_map();
            let mut reg = GeneratorRegistry::seeded(7);
            reg.start(&mut params, false, GeneratorOptions::new(0.02, 0.1, 25));
            black_box(reg.advance_to(Duration::from_secs(1), &mut params))
        })
    });
}

fn bench_panel_update_churn(c: &mut Criterion) {
    let mut panel = GeneratorPanel::seeded(Patch::poly_default().into_param_map(), 11);
    panel.set_enabled(true);
    let mut t = 25.0f32;
    c.bench_function("panel_dial_and_pump", |b| {
        b.iter(|| {
            t = if t >= 250.0 { 25.0 } else { t + 5.0 };
            panel.set_timeout_ms(t);
            black_box(panel.advance_by(Duration::from_millis(250)))
        })
    });
}

criterion_group!(benches, bench_registry_second, bench_panel_update_churn);
criterion_main!(benches);

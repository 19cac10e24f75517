use criterion::{black_box, criterion_group, criterion_main, Criterion};
use drill_core::{InputEvent, Pattern, Symbol};
use drill_engine::{evaluate, longest_prefix_suffix, SequenceMatcher};

fn bench_evaluate(c: &mut Criterion) {
    let target = [
        Symbol::Hp,
        Symbol::Hk,
        Symbol::Down,
        Symbol::DownRight,
        Symbol::Right,
        Symbol::Down,
        Symbol::DownRight,
        Symbol::Right,
        Symbol::Hp,
    ];
    let partial = &target[..7];

    c.bench_function("evaluate_complete", |b| {
        b.iter(|| evaluate(black_box(&target), black_box(&target)))
    });

    c.bench_function("longest_prefix_suffix_partial", |b| {
        b.iter(|| longest_prefix_suffix(black_box(&target), black_box(partial)))
    });
}

fn bench_on_input(c: &mut Criterion) {
    let pattern = Pattern::parse("down down_right right down down_right right hp")
        .expect("valid pattern");
    let inputs: Vec<Symbol> = pattern.symbols().to_vec();

    c.bench_function("matcher_full_attempt", |b| {
        b.iter(|| {
            let mut matcher = SequenceMatcher::default();
            matcher.begin(pattern.clone(), 0, 2000);
            for (t, symbol) in inputs.iter().enumerate() {
                black_box(matcher.on_input(InputEvent::new(*symbol, t as u64 * 16)));
            }
        })
    });

    c.bench_function("matcher_idle_poll", |b| {
        let mut matcher = SequenceMatcher::default();
        matcher.begin(pattern.clone(), 0, u64::MAX / 2);
        b.iter(|| black_box(matcher.on_tick(black_box(1000))))
    });
}

criterion_group!(benches, bench_evaluate, bench_on_input);
criterion_main!(benches);

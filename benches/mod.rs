use criterion::{criterion_group, criterion_main};

mod cli;

criterion_group!(
    benches,
    cli::parser::bench_count_parameters,
    cli::parser::bench_get_parameter,
    cli::dispatch::bench_dispatch_get,
    cli::dispatch::bench_dispatch_structured,
    cli::dispatch::bench_help_listing
);
criterion_main!(benches);

use criterion::{Criterion, Throughput};
use libcli::cli::{Cli, RESPONSE_BUFFER_SIZE, Response};
use std::hint::black_box;

fn setup_cli() -> Cli {
    let mut cli: Cli = Cli::with_builtins().unwrap();
    cli.process(
        "set sensor.rate 100",
        &mut Response::new(&mut [0u8; RESPONSE_BUFFER_SIZE]),
    );
    cli
}

pub fn bench_dispatch_get(c: &mut Criterion) {
    let mut cli = setup_cli();
    let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
    let line = "get sensor.rate";

    let mut group = c.benchmark_group("dispatch");
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("get", |b| {
        b.iter(|| {
            let mut response = Response::new(&mut buf);
            black_box(cli.process(black_box(line), &mut response))
        })
    });
    group.bench_function("not_found", |b| {
        b.iter(|| {
            let mut response = Response::new(&mut buf);
            black_box(cli.process(black_box("reboot now"), &mut response))
        })
    });
    group.finish();
}

pub fn bench_dispatch_structured(c: &mut Criterion) {
    let mut cli = setup_cli();
    let mut buf = [0u8; RESPONSE_BUFFER_SIZE];
    let text = r#"{"command":"set","params":["sensor.rate","250"]}"#;

    let mut group = c.benchmark_group("dispatch_structured");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("set", |b| {
        b.iter(|| {
            let mut response = Response::new(&mut buf);
            black_box(cli.process_structured(black_box(text), &mut response))
        })
    });
    group.finish();
}

pub fn bench_help_listing(c: &mut Criterion) {
    let mut cli = setup_cli();
    let mut buf = [0u8; RESPONSE_BUFFER_SIZE];

    c.bench_function("help", |b| {
        b.iter(|| {
            let mut response = Response::new(&mut buf);
            black_box(cli.process("help", &mut response))
        })
    });
}

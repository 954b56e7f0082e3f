use criterion::{Criterion, Throughput};
use libcli::cli::parser::{count_parameters, get_parameter};
use std::hint::black_box;

const LINE: &str = "config  set   network.ssid   lab-net  retries 3\r\n";

pub fn bench_count_parameters(c: &mut Criterion) {
    let mut group = c.benchmark_group("count_parameters");
    group.throughput(Throughput::Bytes(LINE.len() as u64));
    group.bench_function("count_parameters", |b| {
        b.iter(|| count_parameters(black_box(LINE)))
    });
    group.finish();
}

pub fn bench_get_parameter(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_parameter");
    group.throughput(Throughput::Bytes(LINE.len() as u64));
    group.bench_function("get_parameter_last", |b| {
        b.iter(|| get_parameter(black_box(LINE), black_box(5)))
    });
    group.bench_function("get_parameter_all", |b| {
        b.iter(|| (1..=6).filter_map(|i| get_parameter(black_box(LINE), i)).count())
    });
    group.finish();
}

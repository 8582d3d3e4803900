use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segycube::{GatherIndex, GatherSelection, LabelRange, MemoryIo, SegyConfig, SegyFile, Sorting};
use std::hint::black_box;
use std::sync::Arc;

const SAMPLES: usize = 256;

/// Square cube sizes: lines per dimension
const CUBE_SIZES: &[i32] = &[16, 48];

fn create_cube(size: i32, sorting: Sorting) -> SegyFile {
    let labels: Vec<i32> = (0..size).collect();
    let io = MemoryIo::cube(&labels, &labels, &[0], sorting, SAMPLES).unwrap();
    SegyFile::from_io(Arc::new(io), SegyConfig::default()).unwrap()
}

fn bench_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("Line streaming");

    for &size in CUBE_SIZES {
        for sorting in [Sorting::Inline, Sorting::Crossline] {
            let file = create_cube(size, sorting);
            let iline = file.iline().unwrap();

            group.throughput(Throughput::Bytes((size * size) as u64 * SAMPLES as u64 * 4));
            group.bench_with_input(
                BenchmarkId::new(format!("{:?} sorted", sorting), size),
                &size,
                |bencher, &_| {
                    bencher.iter(|| {
                        let mut lines = iline.range(.., ..).unwrap();
                        while let Some(line) = lines.step() {
                            black_box(line.unwrap());
                        }
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_gathers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gather range vs scalar reads");

    for &size in CUBE_SIZES {
        let file = create_cube(size, Sorting::Crossline);
        let gather = file.gather().unwrap();

        group.bench_with_input(BenchmarkId::new("range", size), &size, |bencher, &_| {
            bencher.iter(|| {
                let index = GatherIndex::new(LabelRange::full(), LabelRange::full());
                if let GatherSelection::Traces(mut traces) = gather.select(index).unwrap() {
                    while let Some(trace) = traces.step() {
                        black_box(trace.unwrap());
                    }
                }
            })
        });

        group.bench_with_input(BenchmarkId::new("scalar", size), &size, |bencher, &size| {
            bencher.iter(|| {
                for il in 0..size {
                    for xl in 0..size {
                        black_box(gather.get(il, xl, None).unwrap());
                    }
                }
            })
        });
    }

    group.finish();
}

fn bench_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("Depth slice");

    for &size in CUBE_SIZES {
        let file = create_cube(size, Sorting::Inline);
        let depth = file.depth_slice();

        group.bench_with_input(BenchmarkId::new("get", size), &size, |bencher, &_| {
            bencher.iter(|| black_box(depth.get(SAMPLES / 2).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lines, bench_gathers, bench_depth);
criterion_main!(benches);

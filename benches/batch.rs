//! Benchmarks for batched BGZF throughput across thread counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use blockgz::{deflate_batch, inflate_batch, Deflater, DEFLATE_BUFFER_SIZE};

/// Generate random (incompressible) data
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Generate DNA-like data (4 character alphabet)
fn generate_dna_data(size: usize, seed: u64) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push(bases[(state % 4) as usize]);
    }
    data
}

fn deflate_to_stream(data: &[u8], num_threads: usize) -> Vec<u8> {
    let mut deflater = Deflater::new(num_threads);
    let mut out = Vec::new();
    let mut rest = data;
    while !rest.is_empty() {
        let (consumed, blocks) = deflater.deflate(rest).unwrap();
        for b in blocks {
            out.extend_from_slice(b);
        }
        rest = &rest[consumed..];
    }
    out
}

fn bench_deflate(c: &mut Criterion) {
    let size = 16 * 1024 * 1024;
    let data = generate_dna_data(size, 0x5eed);

    let mut group = c.benchmark_group("deflate_batch");
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    for threads in [1usize, 2, 4, 8] {
        let mut bufs: Vec<Vec<u8>> = (0..300).map(|_| vec![0u8; DEFLATE_BUFFER_SIZE]).collect();
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let mut rest = data.as_slice();
                while !rest.is_empty() {
                    let result = deflate_batch(rest, &mut bufs, threads).unwrap();
                    rest = &rest[result.bytes_consumed..];
                }
            });
        });
    }
    group.finish();
}

fn bench_inflate(c: &mut Criterion) {
    let size = 16 * 1024 * 1024;
    let data = generate_random_data(size, 0xfeed);
    let stream = deflate_to_stream(&data, 4);

    let mut group = c.benchmark_group("inflate_batch");
    group.throughput(Throughput::Bytes(size as u64));
    group.sample_size(10);

    for threads in [1usize, 2, 4, 8] {
        let mut dst = vec![0u8; size + 1024];
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let mut rest = stream.as_slice();
                while !rest.is_empty() {
                    let info = inflate_batch(&[rest], &mut dst, threads, false).unwrap();
                    rest = &rest[info.bytes_read..];
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_deflate, bench_inflate);
criterion_main!(benches);

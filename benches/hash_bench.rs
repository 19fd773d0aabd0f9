//! Benchmarks for hash calculation and disk imaging throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId, Throughput};
use forensilock::acquisition::disk::copy_in_chunks;
use forensilock::utils::hash::{calculate_sha256, calculate_sha256_with_block_size};
use std::fs;
use tempfile::TempDir;

/// Benchmark SHA256 calculation for different file sizes
fn bench_sha256_file_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha256_file_sizes");
    let temp_dir = TempDir::new().unwrap();

    let sizes = vec![
        (1024, "1KB"),
        (100 * 1024, "100KB"),
        (1024 * 1024, "1MB"),
        (10 * 1024 * 1024, "10MB"),
    ];

    for (size, name) in sizes {
        let file_path = temp_dir.path().join(format!("test_{}.bin", name));
        fs::write(&file_path, vec![0u8; size]).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(
            BenchmarkId::new("calculate_sha256", name),
            &file_path,
            |b, path| {
                b.iter(|| calculate_sha256(black_box(path)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark SHA256 calculation with different read block sizes
fn bench_sha256_block_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("sha256_block_sizes");
    let temp_dir = TempDir::new().unwrap();

    let file_path = temp_dir.path().join("test_8mb.bin");
    fs::write(&file_path, vec![0u8; 8 * 1024 * 1024]).unwrap();
    group.throughput(Throughput::Bytes(8 * 1024 * 1024));

    for block_size in [4 * 1024, 64 * 1024, 1024 * 1024, 4 * 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("block", block_size),
            &block_size,
            |b, &block_size| {
                b.iter(|| calculate_sha256_with_block_size(black_box(&file_path), block_size).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the chunked bit-stream copy used for disk imaging
fn bench_chunked_copy(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunked_copy");
    let temp_dir = TempDir::new().unwrap();

    let source = temp_dir.path().join("suspect_drive.img");
    let destination = temp_dir.path().join("evidence_disk.img");
    fs::write(&source, vec![0u8; 8 * 1024 * 1024]).unwrap();
    group.throughput(Throughput::Bytes(8 * 1024 * 1024));

    for chunk_size in [64 * 1024, 1024 * 1024, 4 * 1024 * 1024] {
        group.bench_with_input(
            BenchmarkId::new("chunk", chunk_size),
            &chunk_size,
            |b, &chunk_size| {
                b.iter(|| copy_in_chunks(black_box(&source), &destination, chunk_size).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_sha256_file_sizes, bench_sha256_block_sizes, bench_chunked_copy);
criterion_main!(benches);

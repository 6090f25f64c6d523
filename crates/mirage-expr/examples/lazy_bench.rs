//! Benchmark: fused lazy evaluation vs materializing every intermediate.

use std::time::Instant;

use mirage_expr::prelude::*;

fn bench_eager(a: &Tensor, b: &Tensor, c: &Tensor, iters: usize) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        // One buffer per intermediate, like a naive elementwise pipeline.
        let prod = (a * b).to_tensor().unwrap();
        let sum = (&prod + c).to_tensor().unwrap();
        let _ = sum.as_expr().relu().to_tensor().unwrap();
    }
    start.elapsed().as_secs_f64() / iters as f64
}

fn bench_lazy(a: &Tensor, b: &Tensor, c: &Tensor, iters: usize) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        let _ = ((a * b) + c).relu().to_tensor().unwrap();
    }
    start.elapsed().as_secs_f64() / iters as f64
}

fn bench_lazy_par(a: &Tensor, b: &Tensor, c: &Tensor, iters: usize) -> f64 {
    let start = Instant::now();
    for _ in 0..iters {
        let _ = ((a * b) + c).relu().to_tensor_par().unwrap();
    }
    start.elapsed().as_secs_f64() / iters as f64
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== Mirage Elementwise Benchmark ===");
    println!("expression: relu(a * b + c), b broadcast across rows\n");

    let sizes: &[(usize, usize)] = &[
        (64, 64),
        (256, 256),
        (1024, 256),
        (1024, 1024),
        (4096, 1024),
    ];

    println!(
        "{:<14} {:>12} {:>12} {:>12} {:>10}",
        "shape", "eager (ms)", "lazy (ms)", "lazy par", "speedup"
    );

    for &(rows, cols) in sizes {
        let a = Tensor::randn(&[rows, cols]);
        let b = Tensor::rand_uniform(&[cols], 0.5, 1.5);
        let c = Tensor::randn(&[rows, cols]);

        let iters = (8_000_000 / (rows * cols)).clamp(3, 200);
        tracing::info!(rows, cols, iters, "benchmarking");

        let eager = bench_eager(&a, &b, &c, iters);
        let lazy = bench_lazy(&a, &b, &c, iters);
        let lazy_par = bench_lazy_par(&a, &b, &c, iters);

        println!(
            "{:<14} {:>12.3} {:>12.3} {:>12.3} {:>9.2}x",
            format!("[{rows}, {cols}]"),
            eager * 1e3,
            lazy * 1e3,
            lazy_par * 1e3,
            eager / lazy
        );
    }
}

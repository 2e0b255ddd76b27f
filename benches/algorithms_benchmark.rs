// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use playground::algorithms::{
    binary_search, dynamic_programming as dp, graph::count_islands, sliding_window, sorting,
    Graph, PriorityQueue,
};

/// 线性同余生成器，保证每次运行的输入相同
fn pseudo_random(len: usize, seed: u64) -> Vec<i64> {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((state >> 33) % 10_000) as i64
        })
        .collect()
}

fn sorting_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sorting");

    type Sorter = fn(&[i64]) -> Vec<i64>;
    let fast: [(&str, Sorter); 3] = [
        ("quick", sorting::quick_sort),
        ("merge", sorting::merge_sort),
        ("heap", sorting::heap_sort),
    ];
    let slow: [(&str, Sorter); 3] = [
        ("bubble", sorting::bubble_sort),
        ("insertion", sorting::insertion_sort),
        ("selection", sorting::selection_sort),
    ];

    for size in [100, 1000].iter() {
        let data = pseudo_random(*size, 42);
        for (name, sort) in fast.iter().chain(slow.iter()) {
            group.bench_with_input(BenchmarkId::new(*name, size), &data, |b, data| {
                b.iter(|| sort(black_box(data.as_slice())));
            });
        }
    }

    let data = pseudo_random(10_000, 7);
    for (name, sort) in fast.iter() {
        group.bench_with_input(BenchmarkId::new(*name, 10_000), &data, |b, data| {
            b.iter(|| sort(black_box(data.as_slice())));
        });
    }
    let counts: Vec<usize> = data.iter().map(|&n| n as usize).collect();
    group.bench_function(BenchmarkId::new("counting", 10_000), |b| {
        b.iter(|| sorting::counting_sort(black_box(&counts)));
    });

    group.finish();
}

fn binary_search_benchmark(c: &mut Criterion) {
    let sorted: Vec<i64> = (0..1_000_000).map(|n| n * 2).collect();
    c.bench_function("binary_search_hit", |b| {
        b.iter(|| binary_search::binary_search(black_box(sorted.as_slice()), black_box(&777_776)))
    });
    c.bench_function("lower_bound_miss", |b| {
        b.iter(|| binary_search::lower_bound(black_box(sorted.as_slice()), black_box(&777_777)))
    });
}

fn dynamic_programming_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dynamic_programming");

    group.bench_function("fibonacci_optimized_90", |b| {
        b.iter(|| dp::fibonacci_optimized(black_box(90)))
    });
    group.bench_function("fibonacci_table_90", |b| b.iter(|| dp::fibonacci(black_box(90))));
    let coins = [1usize, 5, 10, 25];
    group.bench_function("coin_change", |b| {
        b.iter(|| dp::coin_change(black_box(&coins[..]), black_box(9_999)))
    });

    let a = "kitten sitting on the mitten while knitting".repeat(4);
    let b_text = "sitting kitten on a mitten while sitting still".repeat(4);
    group.bench_function("edit_distance", |b| {
        b.iter(|| dp::edit_distance(black_box(&a), black_box(&b_text)))
    });
    group.bench_function("longest_common_subsequence", |b| {
        b.iter(|| dp::longest_common_subsequence(black_box(&a), black_box(&b_text)))
    });

    let nums = pseudo_random(2_000, 3);
    group.bench_function("longest_increasing_subsequence", |b| {
        b.iter(|| dp::longest_increasing_subsequence(black_box(&nums)))
    });

    group.finish();
}

fn graph_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph");

    // 100x100 的网格图
    let side = 100;
    let mut graph = Graph::new(side * side);
    for r in 0..side {
        for col in 0..side {
            let v = r * side + col;
            if col + 1 < side {
                graph.add_edge(v, v + 1);
            }
            if r + 1 < side {
                graph.add_edge(v, v + side);
            }
        }
    }
    group.bench_function("bfs_shortest_path", |b| {
        b.iter(|| graph.bfs_shortest_path(black_box(0), black_box(side * side - 1)))
    });
    group.bench_function("dfs_iterative", |b| b.iter(|| graph.dfs_iterative(black_box(0))));
    group.bench_function("is_bipartite", |b| b.iter(|| graph.is_bipartite()));

    let grid: Vec<Vec<u8>> = pseudo_random(side * side, 11)
        .chunks(side)
        .map(|row| row.iter().map(|&n| u8::from(n % 3 == 0)).collect())
        .collect();
    group.bench_function("count_islands", |b| b.iter(|| count_islands(black_box(&grid))));

    group.finish();
}

fn sliding_window_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("sliding_window");
    let nums = pseudo_random(100_000, 5);

    for k in [3, 100, 1000].iter() {
        group.bench_with_input(BenchmarkId::new("maximum", k), k, |b, &k| {
            b.iter(|| sliding_window::sliding_window_maximum(black_box(nums.as_slice()), k))
        });
    }

    let text: String = pseudo_random(10_000, 9)
        .iter()
        .map(|&n| (b'a' + (n % 26) as u8) as char)
        .collect();
    group.bench_function("length_of_longest_substring", |b| {
        b.iter(|| sliding_window::length_of_longest_substring(black_box(&text)))
    });
    group.bench_function("min_window_substring", |b| {
        b.iter(|| sliding_window::min_window_substring(black_box(&text), black_box("xyzzy")))
    });

    group.finish();
}

fn priority_queue_benchmark(c: &mut Criterion) {
    let data = pseudo_random(10_000, 13);
    c.bench_function("priority_queue_push_pop", |b| {
        b.iter(|| {
            let mut queue: PriorityQueue<i64> = PriorityQueue::new();
            for &n in &data {
                queue.push(n);
            }
            while let Some(n) = queue.pop() {
                black_box(n);
            }
        })
    });
}

criterion_group!(
    benches,
    sorting_benchmark,
    binary_search_benchmark,
    dynamic_programming_benchmark,
    graph_benchmark,
    sliding_window_benchmark,
    priority_queue_benchmark
);
criterion_main!(benches);

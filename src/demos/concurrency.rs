// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 异步并发
//!
//! 用 Tokio 演示：顺序执行与并发任务、一次性通道、有界通道、`JoinSet` 等待一组任务，
//! 以及用 `select!` 同时等待多个通道。

use super::Transcript;

use log::{debug, warn};
use tokio::{
    sync::{mpsc, oneshot},
    task::JoinSet,
    time::{sleep, Duration},
};

/// 每行之间间隔 100ms
pub async fn print_message(t: &Transcript, msg: &str, count: usize) {
    for i in 1..=count {
        t.line(format!("  {} ({})", msg, i));
        sleep(Duration::from_millis(100)).await;
    }
}

pub async fn run(t: &Transcript) {
    debug!("演示：异步并发");
    tasks(t).await;
    oneshot_channel(t).await;
    bounded_channel(t).await;
    join_set(t).await;
    select(t).await;
}

async fn tasks(t: &Transcript) {
    t.line("Tasks:");
    t.line("  Sequential:");
    print_message(t, "Hello", 2).await;
    print_message(t, "World", 2).await;

    t.line("  Concurrent:");
    let handles: Vec<_> = ["Task 1", "Task 2"]
        .into_iter()
        .map(|name| {
            let t = t.clone();
            tokio::spawn(async move { print_message(&t, name, 2).await })
        })
        .collect();
    for handle in handles {
        if let Err(e) = handle.await {
            warn!("演示任务异常退出：{}", e);
        }
    }
}

async fn oneshot_channel(t: &Transcript) {
    t.line("Channels:");
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let _ = tx.send("Hello from channel!");
    });
    match rx.await {
        Ok(msg) => t.line(format!("  Received: {}", msg)),
        Err(_) => t.line("  Sender dropped"),
    }
}

async fn bounded_channel(t: &Transcript) {
    t.line("Bounded Channels:");
    let (tx, mut rx) = mpsc::channel::<i32>(2);
    // 容量为 2，两次发送都不会等待
    for n in [1, 2] {
        if tx.try_send(n).is_err() {
            t.line(format!("  Channel full, dropped {}", n));
        }
    }
    drop(tx);
    while let Some(n) = rx.recv().await {
        t.line(format!("  Received: {}", n));
    }
}

async fn join_set(t: &Transcript) {
    t.line("JoinSet (wait for multiple tasks):");
    let mut set = JoinSet::new();
    for id in 1..=3 {
        let t = t.clone();
        set.spawn(async move {
            t.line(format!("  Worker {} starting", id));
            sleep(Duration::from_millis(200)).await;
            t.line(format!("  Worker {} done", id));
        });
    }
    while let Some(result) = set.join_next().await {
        if let Err(e) = result {
            warn!("工作任务异常退出：{}", e);
        }
    }
    t.line("  All workers done!");
}

async fn select(t: &Transcript) {
    t.line("Select (multiplexing channels):");
    let (tx1, mut rx1) = mpsc::channel::<&'static str>(1);
    let (tx2, mut rx2) = mpsc::channel::<&'static str>(1);

    tokio::spawn(async move {
        sleep(Duration::from_millis(100)).await;
        let _ = tx1.send("Message from channel 1").await;
    });
    tokio::spawn(async move {
        sleep(Duration::from_millis(200)).await;
        let _ = tx2.send("Message from channel 2").await;
    });

    for _ in 0..2 {
        tokio::select! {
            Some(msg) = rx1.recv() => t.line(format!("  {}", msg)),
            Some(msg) = rx2.recv() => t.line(format!("  {}", msg)),
            else => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(lines: &[String], needle: &str) -> usize {
        lines.iter().position(|l| l.contains(needle)).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequential_messages_are_ordered() {
        let t = Transcript::new();
        print_message(&t, "Hello", 3).await;
        assert_eq!(t.lines(), vec!["  Hello (1)", "  Hello (2)", "  Hello (3)"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_output() {
        let t = Transcript::new();
        run(&t).await;
        let lines = t.lines();

        assert_eq!(t.count("Task 1 ("), 2);
        assert_eq!(t.count("Task 2 ("), 2);
        assert!(t.contains("Received: Hello from channel!"));
        assert!(position(&lines, "Received: 1") < position(&lines, "Received: 2"));

        for id in 1..=3 {
            let start = position(&lines, &format!("Worker {} starting", id));
            let done = position(&lines, &format!("Worker {} done", id));
            assert!(start < done);
            assert!(done < position(&lines, "All workers done!"));
        }

        assert!(position(&lines, "Message from channel 1") < position(&lines, "Message from channel 2"));
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 语言特性演示
//!
//! 每个演示把输出逐行写入 [`Transcript`]，而不是直接打印，这样测试可以检查内容，
//! 二进制程序则用 [`Transcript::echo`] 同时输出到终端。

pub mod basics;
pub mod concurrency;
pub mod interfaces;
pub mod structs;

use crate::{
    client::Client,
    config::Config,
    exception::Exception,
    server::Server,
    services::{books, users},
};

use log::{debug, info};

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

/// 线程安全的行收集器，克隆后共享同一份内容
#[derive(Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
    echo: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入的同时打印到标准输出
    pub fn echo() -> Self {
        Self {
            lines: Arc::default(),
            echo: true,
        }
    }

    pub fn line(&self, text: impl Into<String>) {
        let text = text.into();
        if self.echo {
            println!("{}", text);
        }
        self.lines.lock().unwrap_or_else(|p| p.into_inner()).push(text);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// 是否有某一行包含 `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.count(needle) > 0
    }

    /// 包含 `needle` 的行数
    pub fn count(&self, needle: &str) -> usize {
        self.lines
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .iter()
            .filter(|l| l.contains(needle))
            .count()
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

/// 依次运行全部演示
pub async fn run_all(t: &Transcript) {
    t.line("=== Welcome to the Rust playground! ===");
    t.line("");

    t.line("--- 1. Basics ---");
    basics::run(t);

    t.line("");
    t.line("--- 2. Structs ---");
    structs::run(t);

    t.line("");
    t.line("--- 3. Interfaces ---");
    interfaces::run(t);

    t.line("");
    t.line("--- 4. Concurrency ---");
    concurrency::run(t).await;

    t.line("");
    t.line("--- 5. Users service ---");
    users_overview(t);

    t.line("");
    t.line("--- 6. Books service ---");
    books_overview(t);

    t.line("");
    t.line("=== All examples completed! ===");
}

pub fn users_overview(t: &Transcript) {
    debug!("演示：用户服务概览");
    let store = Arc::new(users::UserStore::new());
    store.seed_samples();
    let router = users::router(Arc::clone(&store));

    t.line("Hand-rolled HTTP/1.1 on tokio::net::TcpListener");
    t.line("1. Handler functions: Fn(&mut Context) -> Response");
    t.line("2. JSON API with serde_json");
    t.line("3. Middleware chain: recovery -> logging -> cors");
    t.line(format!("4. Routes registered: {}", router.route_count()));
    t.line(format!("5. Sample users loaded: {} users", store.len()));
    t.line("Available endpoints (default port 8080):");
    for endpoint in users::ENDPOINTS {
        t.line(format!("  {}", endpoint));
    }
}

pub fn books_overview(t: &Transcript) {
    debug!("演示：图书服务概览");
    let store = Arc::new(books::BookStore::new());
    store.seed_samples();
    let router = books::router(Arc::clone(&store));

    t.line("Key Features:");
    t.line("1. Route groups with shared prefixes and group middleware");
    t.line("2. Path parameters (:id) and query parameters");
    t.line("3. JSON binding with field validation");
    t.line(format!("4. Sample books loaded: {} books", store.len()));
    t.line(format!("5. Routes registered: {}", router.route_count()));
    t.line("Available endpoints (default port 8081):");
    for endpoint in books::ENDPOINTS {
        t.line(format!("  {}", endpoint));
    }
}

/// 在临时端口上启动用户服务，用内置客户端取回用户列表，然后停机。
pub async fn client_demo(t: &Transcript, config: Arc<Config>) -> Result<(), Exception> {
    t.line("HTTP client:");
    let store = Arc::new(users::UserStore::new());
    store.seed_samples();

    let addr: SocketAddr = ([127, 0, 0, 1], 0).into();
    let server = Server::bind(addr, users::router(store), config, "users-demo").await?;
    let local = server.local_addr()?;
    let handle = server.handle();
    let task = tokio::spawn(server.run());

    let result = fetch_users(t, local).await;

    handle.shutdown();
    match task.await {
        Ok(run) => run?,
        Err(e) => return Err(Exception::Io(e.to_string())),
    }
    info!("演示服务器已停止");
    result
}

async fn fetch_users(t: &Transcript, addr: SocketAddr) -> Result<(), Exception> {
    let response = Client::new(addr).get("/api/users").await?;
    t.line(format!(
        "  GET http://{}/api/users -> {} {}",
        addr,
        response.status(),
        response.reason()
    ));
    let list: Vec<users::User> = response.json()?;
    t.line(format!("  Fetched {} users", list.len()));
    for user in list {
        t.line(format!("    #{} {} <{}>", user.id, user.name, user.email));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_is_shared_between_clones() {
        let t = Transcript::new();
        let other = t.clone();
        other.line("hello world");
        t.line("hello again");
        assert_eq!(t.lines().len(), 2);
        assert!(t.contains("world"));
        assert_eq!(t.count("hello"), 2);
        assert_eq!(t.render(), "hello world\nhello again");
    }

    #[test]
    fn test_overviews() {
        let t = Transcript::new();
        users_overview(&t);
        books_overview(&t);
        assert!(t.contains("5. Sample users loaded: 2 users"));
        assert!(t.contains("4. Sample books loaded: 3 books"));
        assert!(t.contains("GET  /           - Hello World"));
    }

    #[tokio::test]
    async fn test_client_demo_fetches_seeded_users() {
        let t = Transcript::new();
        client_demo(&t, Arc::new(Config::new())).await.unwrap();
        assert!(t.contains("-> 200 OK"));
        assert!(t.contains("Fetched 2 users"));
        assert!(t.contains("#1 Alice <alice@example.com>"));
    }
}

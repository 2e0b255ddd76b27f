// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # playground
//!
//! 命令行入口：`playground [demo|users|books|serve] [config.toml]`，缺省为 `serve`。
//! - `demo`：依次运行全部演示，再用内置客户端访问一个临时启动的用户服务；
//! - `users` / `books`：只启动对应的服务；
//! - `serve`：同时启动两个服务。
//!
//! 服务模式下提供一个读取标准输入的管理控制台（`stop` / `status` / `help`）。

use playground::{
    demos::{self, Transcript},
    services::{books, users},
    Config, Exception, Server, ServerHandle,
};

use log::{error, info, warn, LevelFilter};
use log4rs::{
    append::console::ConsoleAppender,
    config::{Appender, Config as LogConfig, Root},
    encode::pattern::PatternEncoder,
};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    runtime::Builder,
};

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    process::ExitCode,
    sync::Arc,
};

const DEFAULT_CONFIG: &str = "config/development.toml";
const USAGE: &str = "用法：playground [demo|users|books|serve] [config.toml]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Demo,
    Users,
    Books,
    Serve,
}

impl Mode {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "demo" => Some(Mode::Demo),
            "users" => Some(Mode::Users),
            "books" => Some(Mode::Books),
            "serve" => Some(Mode::Serve),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = match args.first().map(String::as_str) {
        None => Mode::Serve,
        Some(raw) => match Mode::parse(raw) {
            Some(mode) => mode,
            None => {
                eprintln!("未知的模式：{}\n{}", raw, USAGE);
                return ExitCode::from(2);
            }
        },
    };
    let config_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_CONFIG);

    // 1. 配置：文件缺失时使用默认值，日志系统初始化之后再提示
    let (config, config_error) = match Config::from_toml(config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::new(), Some(e)),
    };

    // 2. 日志
    init_logging(config.log_config());
    match config_error {
        Some(e) => warn!("{}，使用默认配置", e),
        None => info!("配置文件已载入：{}", config_path),
    }

    // 3. 运行时
    let runtime = match Builder::new_multi_thread()
        .worker_threads(config.worker_threads())
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("无法创建Tokio运行时：{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!("工作线程数：{}", config.worker_threads());

    match runtime.block_on(run(mode, Arc::new(config))) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("运行失败：{}", e);
            ExitCode::FAILURE
        }
    }
}

/// 优先使用 YAML 日志配置，加载失败时退回到仅输出到控制台的默认配置
fn init_logging(path: &str) {
    let err = match log4rs::init_file(path, Default::default()) {
        Ok(()) => return,
        Err(e) => e,
    };
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} {h({l})} {t} - {m}{n}",
        )))
        .build();
    let fallback = LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info));
    match fallback {
        Ok(config) => {
            if let Err(e) = log4rs::init_config(config) {
                eprintln!("无法初始化日志系统：{}", e);
                return;
            }
            warn!("无法加载日志配置{}：{}，日志仅输出到控制台", path, err);
        }
        Err(e) => eprintln!("无法构建默认日志配置：{}", e),
    }
}

async fn run(mode: Mode, config: Arc<Config>) -> Result<(), Exception> {
    if mode == Mode::Demo {
        let transcript = Transcript::echo();
        demos::run_all(&transcript).await;
        println!();
        return demos::client_demo(&transcript, config).await;
    }

    let ip = match config.local() {
        true => IpAddr::V4(Ipv4Addr::LOCALHOST),
        false => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
    };

    let mut servers = Vec::new();
    if matches!(mode, Mode::Users | Mode::Serve) {
        let store = Arc::new(users::UserStore::new());
        if config.seed_sample_data() {
            store.seed_samples();
            info!("[users]载入示例用户：{}个", store.len());
        }
        let addr = SocketAddr::new(ip, config.users_port());
        servers.push(Server::bind(addr, users::router(store), Arc::clone(&config), "users").await?);
        for endpoint in users::ENDPOINTS {
            info!("[users]  {}", endpoint);
        }
    }
    if matches!(mode, Mode::Books | Mode::Serve) {
        let store = Arc::new(books::BookStore::new());
        if config.seed_sample_data() {
            store.seed_samples();
            info!("[books]载入示例图书：{}本", store.len());
        }
        let addr = SocketAddr::new(ip, config.books_port());
        servers.push(Server::bind(addr, books::router(store), Arc::clone(&config), "books").await?);
        for endpoint in books::ENDPOINTS {
            info!("[books]  {}", endpoint);
        }
    }

    let handles: Vec<(String, ServerHandle)> = servers
        .iter()
        .map(|s| {
            let name = match s.local_addr() {
                Ok(addr) => addr.to_string(),
                Err(_) => "unknown".to_string(),
            };
            (name, s.handle())
        })
        .collect();
    tokio::spawn(admin_console(handles.clone()));
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("收到Ctrl-C，正在停机...");
            for (_, handle) in &handles {
                handle.shutdown();
            }
        }
    });

    let tasks: Vec<_> = servers.into_iter().map(|s| tokio::spawn(s.run())).collect();
    for task in tasks {
        match task.await {
            Ok(result) => result?,
            Err(e) => error!("服务器任务异常退出：{}", e),
        }
    }
    Ok(())
}

/// # 管理控制台
///
/// 在后台读取标准输入，不阻塞监听循环。标准输入关闭时控制台退出，服务器继续运行。
async fn admin_console(handles: Vec<(String, ServerHandle)>) {
    let mut reader = BufReader::new(tokio::io::stdin());
    let mut input = String::new();
    loop {
        input.clear();
        match reader.read_line(&mut input).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        match input.trim() {
            "stop" => {
                for (_, handle) in &handles {
                    handle.shutdown();
                }
                println!("停机指令已激活，服务器将在处理完进行中的请求后关闭...");
                break;
            }
            "status" => {
                println!("== Playground 状态 ==");
                for (addr, handle) in &handles {
                    println!("{} 当前活跃连接数: {}", addr, handle.active_connections());
                }
                println!("====================");
            }
            "help" => {
                println!("== Playground 帮助 ==");
                println!("stop   - 发出停机信号");
                println!("status - 查看当前服务器运行状态");
                println!("help   - 显示此帮助信息");
                println!("====================");
            }
            "" => {}
            cmd => println!("无效的命令：{}", cmd),
        }
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 连接服务器
//!
//! 基于 Tokio 的 `TcpListener` 接收连接，每个连接在独立的任务中处理：
//! - 读取头部（超过 `max_header_size` 返回 `431`）与 `Content-Length` 正文（超过 `max_body_size` 返回 `413`）；
//! - 单个请求的读取期限（`408`）与 keep-alive 空闲期限；
//! - 交给 [`Router`] 分发，收尾后在写超时内发出；
//! - 同一连接上流水线发来的多余字节保留给下一个请求。
//!
//! 停机信号通过 `watch` 通道广播：监听循环停止接收新连接，进行中的请求照常完成并以
//! `Connection: close` 应答。

use crate::{
    config::Config,
    exception::Exception,
    param::*,
    request::{find_subsequence, Request},
    response::Response,
    router::Router,
};

use bytes::BytesMut;
use log::{debug, error, info, warn};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::watch,
    time::{sleep, timeout, timeout_at, Instant},
};

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    config: Arc<Config>,
    name: String,
    shutdown: Arc<watch::Sender<bool>>,
    active_connection: Arc<Mutex<u32>>,
}

/// 运行中服务器的控制句柄，可以在其他任务中克隆使用。
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<watch::Sender<bool>>,
    active_connection: Arc<Mutex<u32>>,
}

impl ServerHandle {
    /// 发出停机信号
    pub fn shutdown(&self) {
        self.shutdown.send_replace(true);
    }

    pub fn is_shutdown(&self) -> bool {
        *self.shutdown.borrow()
    }

    pub fn active_connections(&self) -> u32 {
        read_count(&self.active_connection)
    }
}

impl Server {
    pub async fn bind(
        addr: SocketAddr,
        router: Router,
        config: Arc<Config>,
        name: &str,
    ) -> Result<Self, Exception> {
        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("[{}]无法绑定地址：{}，错误：{}", name, addr, e);
                return Err(e.into());
            }
        };
        info!("[{}]服务端将在{}上监听Socket连接", name, listener.local_addr()?);
        let (shutdown, _) = watch::channel(false);
        Ok(Self {
            listener,
            router: Arc::new(router),
            config,
            name: name.to_string(),
            shutdown: Arc::new(shutdown),
            active_connection: Arc::new(Mutex::new(0u32)),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Exception> {
        Ok(self.listener.local_addr()?)
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: Arc::clone(&self.shutdown),
            active_connection: Arc::clone(&self.active_connection),
        }
    }

    /// 主事件循环，收到停机信号后返回。
    pub async fn run(self) -> Result<(), Exception> {
        let mut shutdown_rx = self.shutdown.subscribe();
        let mut id: u128 = 0;

        loop {
            if *shutdown_rx.borrow() {
                info!("[{}]主循环接收到停机指令，正在退出...", self.name);
                break;
            }

            let accepted = tokio::select! {
                _ = shutdown_rx.changed() => continue,
                accepted = self.listener.accept() => accepted,
            };
            let (stream, addr) = match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("[{}]接收连接失败：{}", self.name, e);
                    continue;
                }
            };
            debug!("[ID{}]TCP连接已建立：{}", id, addr);

            let router = Arc::clone(&self.router);
            let config = Arc::clone(&self.config);
            let shutdown = self.shutdown.subscribe();
            let guard = ConnectionGuard::new(Arc::clone(&self.active_connection));
            tokio::spawn(async move {
                handle_connection(stream, addr, id, router, config, shutdown).await;
                drop(guard);
            });
            id += 1;
        }

        // 等待进行中的连接收尾
        let deadline = Instant::now() + self.config.read_timeout();
        while read_count(&self.active_connection) > 0 && Instant::now() < deadline {
            sleep(Duration::from_millis(20)).await;
        }
        info!("[{}]服务器已停止", self.name);
        Ok(())
    }
}

/// 连接计数：创建时加一，析构时减一（任务 panic 时同样生效）。
struct ConnectionGuard(Arc<Mutex<u32>>);

impl ConnectionGuard {
    fn new(counter: Arc<Mutex<u32>>) -> Self {
        {
            let mut lock = counter.lock().unwrap_or_else(|p| p.into_inner());
            *lock += 1;
        }
        Self(counter)
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let mut lock = self.0.lock().unwrap_or_else(|p| p.into_inner());
        *lock = lock.saturating_sub(1);
    }
}

fn read_count(counter: &Mutex<u32>) -> u32 {
    *counter.lock().unwrap_or_else(|p| p.into_inner())
}

/// # 连接处理器
///
/// 负责单个 TCP 流的生命周期：循环读取请求、分发、写回应答，直到对端关闭、
/// 出现错误、请求不再保持连接或服务器停机。
async fn handle_connection(
    mut stream: TcpStream,
    addr: SocketAddr,
    id: u128,
    router: Arc<Router>,
    config: Arc<Config>,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut buffer = BytesMut::with_capacity(1024);
    let mut served: u32 = 0;

    loop {
        let wait = match served {
            0 => config.read_timeout(),
            _ => config.idle_timeout(),
        };
        let mut request = match read_request(&mut stream, &mut buffer, &config, wait, &mut shutdown, id).await {
            Ok(Some(r)) => r,
            Ok(None) => {
                debug!("[ID{}]连接空闲或已被对端关闭", id);
                break;
            }
            Err(e) => {
                reject(&mut stream, &e, &config, id).await;
                break;
            }
        };
        debug!("[ID{}]成功解析HTTP请求", id);
        request.set_remote_addr(addr);

        let keep_alive =
            request.keep_alive() && !config.idle_timeout().is_zero() && !*shutdown.borrow();

        let mut response = router.handle(request.clone(), id);
        response.finalize(&request, config.compression_min_size(), id);
        response.set_header("Connection", if keep_alive { "keep-alive" } else { "close" });

        let response_bytes = response.as_bytes();
        debug!("[ID{}]发送全量响应，长度: {}", id, response_bytes.len());
        if let Err(e) = write_all(&mut stream, &response_bytes, config.write_timeout()).await {
            error!("[ID{}]发送响应失败: {}", id, e);
            break;
        }
        served += 1;

        if !keep_alive {
            break;
        }
    }
    let _ = stream.shutdown().await;
    debug!("[ID{}]连接关闭，共处理{}个请求", id, served);
}

/// 从连接中读取一个完整请求。
///
/// 缓冲区为空时对端关闭、等待超时或收到停机信号均返回 `Ok(None)`；
/// 请求读到一半时超时返回 `ReadTimeout`。
async fn read_request(
    stream: &mut TcpStream,
    buffer: &mut BytesMut,
    config: &Config,
    wait: Duration,
    shutdown: &mut watch::Receiver<bool>,
    id: u128,
) -> Result<Option<Request>, Exception> {
    let mut deadline = Instant::now() + wait;
    let mut started = !buffer.is_empty();
    if started {
        deadline = Instant::now() + config.read_timeout();
    }

    // 1. 头部
    let head_end = loop {
        if let Some(pos) = find_subsequence(buffer, HEADER_TERMINATOR) {
            break pos + HEADER_TERMINATOR.len();
        }
        if buffer.len() > config.max_header_size() {
            return Err(Exception::HeaderTooLarge);
        }
        let n = tokio::select! {
            read = timeout_at(deadline, stream.read_buf(buffer)) => match read {
                Ok(result) => result?,
                Err(_) if started => return Err(Exception::ReadTimeout),
                Err(_) => return Ok(None),
            },
            _ = shutdown.changed(), if !started => return Ok(None),
        };
        if n == 0 {
            return match started {
                true => Err(Exception::ConnectionClosed),
                false => Ok(None),
            };
        }
        if !started {
            started = true;
            deadline = Instant::now() + config.read_timeout();
        }
    };
    if head_end > config.max_header_size() {
        return Err(Exception::HeaderTooLarge);
    }

    let mut request = Request::try_from(&buffer[..head_end], id)?;

    // 2. 正文
    let body_len = request.content_length()?.unwrap_or(0);
    if body_len > config.max_body_size() {
        warn!("[ID{}]请求体长度{}超过上限{}", id, body_len, config.max_body_size());
        return Err(Exception::BodyTooLarge);
    }
    while buffer.len() < head_end + body_len {
        let n = match timeout_at(deadline, stream.read_buf(buffer)).await {
            Ok(result) => result?,
            Err(_) => return Err(Exception::ReadTimeout),
        };
        if n == 0 {
            return Err(Exception::ConnectionClosed);
        }
    }

    let frame = buffer.split_to(head_end + body_len).freeze();
    request.set_body(frame.slice(head_end..));
    Ok(Some(request))
}

/// 对无法处理的请求给出错误应答并关闭连接；连接层面的错误直接关闭。
async fn reject(stream: &mut TcpStream, e: &Exception, config: &Config, id: u128) {
    match e {
        Exception::ConnectionClosed | Exception::Io(_) => {
            debug!("[ID{}]连接中断：{}", id, e);
            return;
        }
        _ => warn!("[ID{}]拒绝请求：{}", id, e),
    }
    let code = e.status_code();
    let reason = reason_phrase(code).unwrap_or("Error");
    let mut response = Response::text(code, format!("{} {}", code, reason));
    response.set_header("Connection", "close");
    if let Err(err) = write_all(stream, &response.as_bytes(), config.write_timeout()).await {
        debug!("[ID{}]发送错误应答失败：{}", id, err);
    }
}

async fn write_all(stream: &mut TcpStream, bytes: &[u8], limit: Duration) -> Result<(), Exception> {
    match timeout(limit, async {
        stream.write_all(bytes).await?;
        stream.flush().await
    })
    .await
    {
        Ok(result) => Ok(result?),
        Err(_) => Err(Exception::WriteTimeout),
    }
}

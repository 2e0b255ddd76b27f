// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 一个最小的 HTTP/1.1 客户端，每个请求使用一条短连接。
//!
//! 用于演示模式下访问本地服务，以及集成测试。

use crate::{exception::Exception, param::*, request::find_subsequence, request::Request};

use bytes::Bytes;
use flate2::read::{DeflateDecoder, GzDecoder};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde::de::DeserializeOwned;
use tokio::{
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::timeout,
};

use std::{io::Read, net::SocketAddr, time::Duration};

lazy_static! {
    static ref STATUS_LINE: Regex = Regex::new(r"^HTTP/(\d\.\d) (\d{3})(?: (.*))?$").unwrap();
}

#[derive(Debug, Clone)]
pub struct Client {
    addr: SocketAddr,
    timeout: Duration,
}

impl Client {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 发送请求并读取应答。未指定时自动补上 `Host` 与 `Connection: close`。
    pub async fn send(&self, request: Request) -> Result<ClientResponse, Exception> {
        match timeout(self.timeout, self.exchange(request)).await {
            Ok(result) => result,
            Err(_) => Err(Exception::ReadTimeout),
        }
    }

    async fn exchange(&self, mut request: Request) -> Result<ClientResponse, Exception> {
        if request.host().is_none() {
            request = request.with_header("Host", &self.addr.to_string());
        }
        if request.header("connection").is_none() {
            request = request.with_header("Connection", "close");
        }
        debug!("客户端请求：{} {} -> {}", request.method(), request.target(), self.addr);

        let mut stream = TcpStream::connect(self.addr).await?;
        stream.write_all(&request.to_bytes()).await?;
        stream.flush().await?;
        read_response(&mut stream, request.method() == HttpRequestMethod::Head).await
    }

    pub async fn get(&self, target: &str) -> Result<ClientResponse, Exception> {
        self.send(Request::new(HttpRequestMethod::Get, target)).await
    }

    pub async fn post_json(
        &self,
        target: &str,
        body: &serde_json::Value,
    ) -> Result<ClientResponse, Exception> {
        self.send(Request::new(HttpRequestMethod::Post, target).with_json(body))
            .await
    }

    pub async fn put_json(
        &self,
        target: &str,
        body: &serde_json::Value,
    ) -> Result<ClientResponse, Exception> {
        self.send(Request::new(HttpRequestMethod::Put, target).with_json(body))
            .await
    }

    pub async fn delete(&self, target: &str) -> Result<ClientResponse, Exception> {
        self.send(Request::new(HttpRequestMethod::Delete, target)).await
    }
}

/// 已解码的应答。`Content-Encoding` 头保留原样，正文是解压后的内容。
#[derive(Debug, Clone)]
pub struct ClientResponse {
    version: String,
    status: u16,
    reason: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ClientResponse {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Exception> {
        serde_json::from_slice(&self.body).map_err(|e| Exception::InvalidJson(e.to_string()))
    }
}

/// 从流中读取一个应答：状态行、头部，以及按 `Content-Length`（缺省时读到 EOF）界定的正文。
pub async fn read_response<R>(reader: &mut R, head_only: bool) -> Result<ClientResponse, Exception>
where
    R: AsyncRead + Unpin,
{
    let mut buffer: Vec<u8> = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    let head_end = loop {
        if let Some(pos) = find_subsequence(&buffer, HEADER_TERMINATOR) {
            break pos + HEADER_TERMINATOR.len();
        }
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Err(Exception::MalformedResponse(
                "connection closed before end of headers".to_string(),
            ));
        }
        buffer.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buffer[..head_end - HEADER_TERMINATOR.len()])
        .map_err(|_| Exception::MalformedResponse("header is not UTF-8".to_string()))?;
    let mut lines = head.split(CRLF);
    let status_line = lines.next().unwrap_or("");
    let captures = STATUS_LINE
        .captures(status_line)
        .ok_or_else(|| Exception::MalformedResponse(format!("bad status line: {}", status_line)))?;
    let version = captures[1].to_string();
    let status: u16 = captures[2]
        .parse()
        .map_err(|_| Exception::MalformedResponse(format!("bad status code: {}", &captures[2])))?;
    let reason = captures.get(3).map_or("", |m| m.as_str()).to_string();

    let mut headers = Vec::new();
    for line in lines.filter(|l| !l.is_empty()) {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| Exception::MalformedResponse(format!("bad header: {}", line)))?;
        headers.push((name.trim().to_string(), value.trim().to_string()));
    }

    let mut response = ClientResponse {
        version,
        status,
        reason,
        headers,
        body: Bytes::new(),
    };

    let no_body = head_only || (100..200).contains(&status) || status == 204 || status == 304;
    let mut body = buffer.split_off(head_end);
    if !no_body {
        match response.header("content-length") {
            Some(len) => {
                let len: usize = len
                    .parse()
                    .map_err(|_| Exception::MalformedResponse(format!("bad Content-Length: {}", len)))?;
                while body.len() < len {
                    let n = reader.read(&mut chunk).await?;
                    if n == 0 {
                        return Err(Exception::ConnectionClosed);
                    }
                    body.extend_from_slice(&chunk[..n]);
                }
                body.truncate(len);
            }
            None => {
                reader.read_to_end(&mut body).await?;
            }
        }
        response.body = decode_body(body, response.header("content-encoding"))?;
    }
    Ok(response)
}

fn decode_body(body: Vec<u8>, encoding: Option<&str>) -> Result<Bytes, Exception> {
    let encoding = match encoding.and_then(HttpEncoding::parse) {
        Some(e) => e,
        None => return Ok(Bytes::from(body)),
    };
    let mut decoded = Vec::new();
    let result = match encoding {
        HttpEncoding::Gzip => GzDecoder::new(&body[..]).read_to_end(&mut decoded),
        HttpEncoding::Deflate => DeflateDecoder::new(&body[..]).read_to_end(&mut decoded),
        HttpEncoding::Br => brotli::Decompressor::new(&body[..], 4096).read_to_end(&mut decoded),
    };
    result.map_err(|e| Exception::MalformedResponse(format!("{} body: {}", encoding, e)))?;
    Ok(Bytes::from(decoded))
}

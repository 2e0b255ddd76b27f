// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # HTTP 请求处理模块
//!
//! 该模块负责将 TCP 流中读取的原始字节解析为强类型的 `Request` 结构体，涵盖：
//! 1. 请求行（Request-Line）的解析（方法、目标、版本）。
//! 2. 头部字段的保存与大小写不敏感的查找。
//! 3. 请求目标拆分为路径与查询字符串。
//! 4. 由 `Content-Length` 界定的请求体。
//!
//! 同时提供构造器接口，客户端与测试代码可以直接拼装请求再通过 [`Request::to_bytes`] 序列化。

use crate::{
    exception::Exception,
    param::*,
    util::{parse_query, percent_decode},
};

use bytes::Bytes;
use lazy_static::lazy_static;
use log::error;
use regex::Regex;

use std::net::SocketAddr;

lazy_static! {
    /// 请求行：方法、目标、版本。目标部分允许包含空格（不规范但常见的客户端行为）。
    static ref REQUEST_LINE: Regex = Regex::new(r"^(\S+) (.+) (\S+)$").unwrap();
}

/// 一个完整的 HTTP 请求。
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP 请求方法
    method: HttpRequestMethod,
    /// 原始请求目标（包含查询字符串）
    target: String,
    /// 百分号解码后的路径部分
    path: String,
    /// 未解码的查询字符串（不含 `?`）
    query: Option<String>,
    /// HTTP 协议版本
    version: HttpVersion,
    /// 按出现顺序保存的头部字段
    headers: Vec<(String, String)>,
    /// 客户端支持的压缩编码列表（按出现顺序排列）
    accept_encoding: Vec<HttpEncoding>,
    /// 请求体
    body: Bytes,
    /// 对端地址，由服务器在接收连接后填入
    remote_addr: Option<SocketAddr>,
}

impl Request {
    /// 从原始字节缓冲区尝试构建 `Request` 实例。
    ///
    /// # 逻辑步骤
    /// 1. 以空行切分头部与正文，头部必须是合法的 UTF-8。
    /// 2. 用正则解析请求行，识别方法与协议版本。
    /// 3. 逐行解析头部字段，拒绝畸形行。
    /// 4. 按 `Content-Length` 截取正文；没有该字段时正文为空。
    ///
    /// # 参数
    /// * `buffer` - 从网络 Socket 读取的原始数据。
    /// * `id` - 请求 ID，用于在多任务环境下追踪日志。
    pub fn try_from(buffer: &[u8], id: u128) -> Result<Self, Exception> {
        let (head, rest) = match find_subsequence(buffer, HEADER_TERMINATOR) {
            Some(pos) => (&buffer[..pos], &buffer[pos + HEADER_TERMINATOR.len()..]),
            None => (buffer, &buffer[buffer.len()..]),
        };

        // 1. 头部必须是 UTF-8
        let head = match std::str::from_utf8(head) {
            Ok(s) => s,
            Err(_) => {
                error!("[ID{}]无法解析HTTP请求", id);
                return Err(Exception::RequestIsNotUtf8);
            }
        };
        let mut lines = head.split(CRLF);

        // 2. 解析请求行 (e.g., "GET /index.html HTTP/1.1")
        let request_line = lines.next().unwrap_or("");
        let captures = match REQUEST_LINE.captures(request_line) {
            Some(c) => c,
            None => {
                error!("[ID{}]HTTP请求行格式不正确：{}", id, request_line);
                return Err(Exception::MalformedRequestLine);
            }
        };

        let method = match HttpRequestMethod::parse(&captures[1]) {
            Some(m) => m,
            None => {
                error!("[ID{}]不支持的HTTP请求方法：{}", id, &captures[1]);
                return Err(Exception::UnSupportedRequestMethod);
            }
        };

        let version = match HttpVersion::parse(&captures[3]) {
            Some(v) => v,
            None => {
                error!("[ID{}]不支持的HTTP协议版本：{}", id, &captures[3]);
                return Err(Exception::UnsupportedHttpVersion);
            }
        };

        let target = normalize_target(&captures[2]).ok_or_else(|| {
            error!("[ID{}]无法识别的请求目标：{}", id, &captures[2]);
            Exception::MalformedRequestLine
        })?;

        // 3. 迭代各行解析 Headers
        let mut headers = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            // 不接受折行（obs-fold）
            if line.starts_with(' ') || line.starts_with('\t') {
                error!("[ID{}]头部包含折行：{:?}", id, line);
                return Err(Exception::InvalidHeader);
            }
            let (name, value) = match line.split_once(':') {
                Some(pair) => pair,
                None => {
                    error!("[ID{}]头部缺少冒号：{:?}", id, line);
                    return Err(Exception::InvalidHeader);
                }
            };
            if name.is_empty() || name.contains(|c: char| c.is_whitespace()) {
                error!("[ID{}]非法的头部字段名：{:?}", id, name);
                return Err(Exception::InvalidHeader);
            }
            headers.push((name.to_string(), value.trim().to_string()));
        }

        let mut request = Self::assemble(method, target, version, headers);

        if let Some(te) = request.header("transfer-encoding") {
            if !te.eq_ignore_ascii_case("identity") {
                error!("[ID{}]不支持的Transfer-Encoding：{}", id, te);
                return Err(Exception::UnsupportedTransferEncoding);
            }
        }

        // 4. 正文
        if let Some(len) = request.content_length()? {
            let len = len.min(rest.len());
            request.body = Bytes::copy_from_slice(&rest[..len]);
        }

        Ok(request)
    }

    /// 以方法和请求目标构造一个 HTTP/1.1 请求，常用于客户端与测试。
    pub fn new(method: HttpRequestMethod, target: &str) -> Self {
        let target = normalize_target(target).unwrap_or_else(|| format!("/{}", target));
        Self::assemble(method, target, HttpVersion::V1_1, Vec::new())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        if name.eq_ignore_ascii_case("accept-encoding") {
            self.accept_encoding = parse_accept_encoding(value);
        }
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// 以 JSON 作为请求体，并补上 `Content-Type`。
    pub fn with_json(self, value: &serde_json::Value) -> Self {
        self.with_header("Content-Type", MIME_JSON_PLAIN)
            .with_body(value.to_string())
    }

    pub fn with_version(mut self, version: HttpVersion) -> Self {
        self.version = version;
        self
    }

    fn assemble(
        method: HttpRequestMethod,
        target: String,
        version: HttpVersion,
        headers: Vec<(String, String)>,
    ) -> Self {
        let (raw_path, query) = match target.split_once('?') {
            Some((p, q)) => (p.to_string(), Some(q.to_string())),
            None => (target.clone(), None),
        };
        let path = percent_decode(&raw_path);
        let accept_encoding = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("accept-encoding"))
            .map(|(_, v)| parse_accept_encoding(v))
            .unwrap_or_default();
        Self {
            method,
            target,
            path,
            query,
            version,
            headers,
            accept_encoding,
            body: Bytes::new(),
            remote_addr: None,
        }
    }

    /// 把请求序列化为报文。正文非空且没有显式 `Content-Length` 时自动补上。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("{} {} {}{}", self.method, self.target, self.version, CRLF);
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}{}", name, value, CRLF));
        }
        if !self.body.is_empty() && self.header("content-length").is_none() {
            head.push_str(&format!("Content-Length: {}{}", self.body.len(), CRLF));
        }
        head.push_str(CRLF);
        [head.as_bytes(), &self.body[..]].concat()
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    pub fn set_remote_addr(&mut self, addr: SocketAddr) {
        self.remote_addr = Some(addr);
    }
}

// --- Getter 访问器实现 ---

impl Request {
    /// 获取 HTTP 协议版本
    pub fn version(&self) -> HttpVersion {
        self.version
    }

    /// 获取请求方法
    pub fn method(&self) -> HttpRequestMethod {
        self.method
    }

    /// 原始请求目标（含查询字符串）
    pub fn target(&self) -> &str {
        &self.target
    }

    /// 解码后的路径，不含查询字符串
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        parse_query(self.query.as_deref().unwrap_or(""))
    }

    /// 取查询参数的第一个值
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// 大小写不敏感地查找头部，重复出现时返回第一个
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// 获取用户代理字符串
    pub fn user_agent(&self) -> &str {
        self.header("user-agent").unwrap_or("")
    }

    pub fn host(&self) -> Option<&str> {
        self.header("host")
    }

    /// 获取客户端支持的压缩算法列表
    pub fn accept_encoding(&self) -> &[HttpEncoding] {
        &self.accept_encoding
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn remote_addr(&self) -> Option<SocketAddr> {
        self.remote_addr
    }

    /// 解析 `Content-Length`。多个取值不一致或不是整数时视为非法请求。
    pub fn content_length(&self) -> Result<Option<usize>, Exception> {
        let mut length = None;
        for (name, value) in &self.headers {
            if !name.eq_ignore_ascii_case("content-length") {
                continue;
            }
            let parsed = value
                .parse::<usize>()
                .map_err(|_| Exception::InvalidContentLength)?;
            match length {
                Some(prev) if prev != parsed => return Err(Exception::InvalidContentLength),
                _ => length = Some(parsed),
            }
        }
        Ok(length)
    }

    /// 根据协议版本与 `Connection` 头判断连接是否保持。
    pub fn keep_alive(&self) -> bool {
        let connection = self.header("connection").map(|v| v.to_lowercase());
        match self.version {
            HttpVersion::V1_1 => !connection.is_some_and(|v| v.contains("close")),
            HttpVersion::V1_0 => connection.is_some_and(|v| v.contains("keep-alive")),
        }
    }
}

/// 接受 origin-form（`/path`）、`*` 与 absolute-form（`http://host/path`），统一成 origin-form。
fn normalize_target(raw: &str) -> Option<String> {
    if raw.starts_with('/') || raw == "*" {
        return Some(raw.to_string());
    }
    let lower = raw.to_lowercase();
    let rest = if lower.starts_with("http://") {
        &raw[7..]
    } else if lower.starts_with("https://") {
        &raw[8..]
    } else {
        return None;
    };
    match rest.find(|c| c == '/' || c == '?') {
        Some(idx) if rest[idx..].starts_with('/') => Some(rest[idx..].to_string()),
        Some(idx) => Some(format!("/{}", &rest[idx..])),
        None => Some("/".to_string()),
    }
}

/// 解析 `Accept-Encoding`，`q=0` 的编码视为明确拒绝。
fn parse_accept_encoding(value: &str) -> Vec<HttpEncoding> {
    let mut encodings = Vec::new();
    for item in value.split(',') {
        let mut parts = item.split(';');
        let name = parts.next().unwrap_or("");
        let rejected = parts.any(|p| {
            p.trim()
                .strip_prefix("q=")
                .and_then(|q| q.trim().parse::<f32>().ok())
                .is_some_and(|q| q <= 0.0)
        });
        if rejected {
            continue;
        }
        if let Some(encoding) = HttpEncoding::parse(name) {
            if !encodings.contains(&encoding) {
                encodings.push(encoding);
            }
        }
    }
    encodings
}

pub(crate) fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use crate::{
    exception::Exception,
    param::*,
    request::Request,
    util::{http_date, to_xml},
};

use brotli::enc::{self, backward_references::BrotliEncoderParams};
use bytes::Bytes;
use chrono::prelude::*;
use flate2::{
    write::{DeflateEncoder, GzEncoder},
    Compression,
};
use log::{debug, error};
use serde::Serialize;

use std::io::{self, Write};

#[derive(Debug, Clone)]
pub struct Response {
    version: HttpVersion,
    status_code: u16,
    information: String,
    content_type: Option<String>,
    content_encoding: Option<HttpEncoding>,
    date: DateTime<Utc>,
    server_name: String,
    allow: Option<Vec<HttpRequestMethod>>,
    headers: Vec<(String, String)>,
    content: Bytes,
    /// HEAD 请求的应答只发送头部，`Content-Length` 仍报告正文长度
    head_only: bool,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    pub fn new() -> Self {
        Self {
            version: HttpVersion::V1_1,
            status_code: 200,
            information: "OK".to_string(),
            content_type: None,
            content_encoding: None,
            date: Utc::now(),
            server_name: SERVER_NAME.to_string(),
            allow: None,
            headers: Vec::new(),
            content: Bytes::new(),
            head_only: false,
        }
    }

    /// 没有正文的应答
    pub fn with_status(code: u16) -> Self {
        let mut response = Self::new();
        response.set_code(code);
        response
    }

    pub fn empty(code: u16) -> Self {
        Self::with_status(code)
    }

    pub fn text(code: u16, body: impl Into<String>) -> Self {
        let mut response = Self::with_status(code);
        response.content_type = Some(MIME_TEXT.to_string());
        response.content = Bytes::from(body.into());
        response
    }

    /// 序列化失败时退化为 500 应答。
    pub fn json<T: Serialize + ?Sized>(code: u16, value: &T) -> Self {
        match encode_json(value) {
            Ok(bytes) => {
                let mut response = Self::with_status(code);
                response.content_type = Some(MIME_JSON.to_string());
                response.content = Bytes::from(bytes);
                response
            }
            Err(e) => Self::serialize_failure(&e),
        }
    }

    pub fn xml(code: u16, root: &str, value: &serde_json::Value) -> Self {
        let mut response = Self::with_status(code);
        response.content_type = Some(MIME_XML.to_string());
        response.content = Bytes::from(to_xml(root, value));
        response
    }

    pub fn yaml<T: Serialize + ?Sized>(code: u16, value: &T) -> Self {
        match encode_yaml(value) {
            Ok(text) => {
                let mut response = Self::with_status(code);
                response.content_type = Some(MIME_YAML.to_string());
                response.content = Bytes::from(text);
                response
            }
            Err(e) => Self::serialize_failure(&e),
        }
    }

    fn serialize_failure(e: &Exception) -> Self {
        error!("{}", e);
        let code = e.status_code();
        Self::text(code, reason_phrase(code).unwrap_or("Internal Server Error"))
    }

    /// `{"error": message}` 形式的 JSON 错误应答
    pub fn error(code: u16, message: &str) -> Self {
        Self::json(code, &serde_json::json!({ "error": message }))
    }

    /// 设置状态码与原因短语。未登记的状态码记录错误并使用 `Unknown`。
    pub fn set_code(&mut self, code: u16) -> &mut Self {
        self.status_code = code;
        self.information = match reason_phrase(code) {
            Some(info) => info.to_string(),
            None => {
                error!("非法的状态码：{}。这条错误说明代码编写出现了错误。", code);
                "Unknown".to_string()
            }
        };
        self
    }

    /// 追加一个头部字段（构造器风格）
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// 设置头部字段，已存在的同名字段会被替换
    pub fn set_header(&mut self, name: &str, value: &str) -> &mut Self {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// 大小写不敏感地读取头部，`Content-Type` 也可以通过此方法读取
    pub fn header_value(&self, name: &str) -> Option<&str> {
        if name.eq_ignore_ascii_case("content-type") {
            return self.content_type.as_deref();
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_content_type(&mut self, content_type: &str) -> &mut Self {
        self.content_type = Some(content_type.to_string());
        self
    }

    pub fn set_allow(&mut self, methods: Vec<HttpRequestMethod>) -> &mut Self {
        self.allow = Some(methods);
        self
    }

    pub fn set_body(&mut self, body: impl Into<Bytes>) -> &mut Self {
        self.content = body.into();
        self
    }

    fn set_date(&mut self) -> &mut Self {
        self.date = Utc::now();
        self
    }

    /// 发送前的收尾工作：协商压缩、对齐协议版本、处理 HEAD。
    ///
    /// 小于 `min_size` 的正文不压缩；HEAD 应答不压缩，只报告正文长度。
    pub fn finalize(&mut self, request: &Request, min_size: usize, id: u128) -> &mut Self {
        self.version = request.version();
        self.set_date();

        if request.method() == HttpRequestMethod::Head {
            debug!("[ID{}]请求方法为HEAD，只发送头部", id);
            self.head_only = true;
            return self;
        }
        if self.content_encoding.is_some()
            || self.content.is_empty()
            || self.content.len() < min_size
            || !has_body(self.status_code)
        {
            debug!("[ID{}]不进行压缩", id);
            return self;
        }

        let encoding = decide_encoding(request.accept_encoding());
        match encoding {
            Some(HttpEncoding::Gzip) => debug!("[ID{}]使用Gzip压缩编码", id),
            Some(HttpEncoding::Br) => debug!("[ID{}]使用Brotli压缩编码", id),
            Some(HttpEncoding::Deflate) => debug!("[ID{}]使用Deflate压缩编码", id),
            None => {
                debug!("[ID{}]不进行压缩", id);
                return self;
            }
        };
        match compress(self.content.to_vec(), encoding) {
            Ok(compressed) => {
                self.content = Bytes::from(compressed);
                self.content_encoding = encoding;
                self.set_header("Vary", "Accept-Encoding");
            }
            Err(e) => error!("[ID{}]压缩正文失败: {}，返回未压缩内容", id, e),
        }
        self
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut header = format!(
            "{} {} {}{}",
            self.version, self.status_code, self.information, CRLF
        );
        if let Some(t) = &self.content_type {
            header.push_str(&["Content-Type: ", t, CRLF].concat());
        }
        if let Some(e) = self.content_encoding {
            header.push_str(&format!("Content-Encoding: {}{}", e, CRLF));
        }
        if has_body(self.status_code) {
            header.push_str(&format!("Content-Length: {}{}", self.content.len(), CRLF));
        }
        header.push_str(&["Date: ", &http_date(&self.date), CRLF].concat());
        header.push_str(&["Server: ", &self.server_name, CRLF].concat());
        if let Some(methods) = &self.allow {
            let allow: Vec<&str> = methods.iter().map(|m| m.as_str()).collect();
            header.push_str(&["Allow: ", &allow.join(", "), CRLF].concat());
        }
        for (name, value) in &self.headers {
            header.push_str(&format!("{}: {}{}", name, value, CRLF));
        }
        header.push_str(CRLF);

        let body: &[u8] = if self.head_only || !has_body(self.status_code) {
            b""
        } else {
            &self.content
        };
        [header.as_bytes(), body].concat()
    }
}

impl Response {
    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn information(&self) -> &str {
        &self.information
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn content_encoding(&self) -> Option<HttpEncoding> {
        self.content_encoding
    }

    pub fn allow(&self) -> Option<&[HttpRequestMethod]> {
        self.allow.as_deref()
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn body(&self) -> &Bytes {
        &self.content
    }

    /// 正文按 UTF-8 有损解码，便于断言与日志
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }

    pub fn get_content_length(&self) -> usize {
        self.content.len()
    }
}

/// 1xx、204、304 应答不携带正文
fn has_body(code: u16) -> bool {
    !(100..200).contains(&code) && code != 204 && code != 304
}

pub(crate) fn compress(data: Vec<u8>, mode: Option<HttpEncoding>) -> io::Result<Vec<u8>> {
    let original_size = data.len();
    let result = match mode {
        Some(HttpEncoding::Gzip) => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data)?;
            encoder.finish()
        }
        Some(HttpEncoding::Deflate) => {
            let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&data)?;
            encoder.finish()
        }
        Some(HttpEncoding::Br) => {
            let params = BrotliEncoderParams::default();
            let mut output = Vec::new();
            enc::BrotliCompress(&mut io::Cursor::new(data), &mut output, &params)?;
            Ok(output)
        }
        None => Ok(data),
    };

    if let Ok(ref compressed) = result {
        let compressed_size = compressed.len();
        let ratio = if original_size > 0 {
            ((original_size as i64 - compressed_size as i64) as f64 / original_size as f64) * 100.0
        } else {
            0.0
        };
        debug!(
            "压缩完成: {:?}, 原始大小: {} bytes, 压缩后: {} bytes, 压缩率: {:.1}%",
            mode, original_size, compressed_size, ratio
        );
    }

    result
}

/// 优先级：gzip > deflate > br
fn decide_encoding(accept_encoding: &[HttpEncoding]) -> Option<HttpEncoding> {
    [HttpEncoding::Gzip, HttpEncoding::Deflate, HttpEncoding::Br]
        .into_iter()
        .find(|e| accept_encoding.contains(e))
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Exception> {
    serde_json::to_vec(value).map_err(|e| Exception::Serialize(format!("JSON: {}", e)))
}

fn encode_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String, Exception> {
    serde_yaml::to_string(value).map_err(|e| Exception::Serialize(format!("YAML: {}", e)))
}

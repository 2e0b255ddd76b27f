// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Exception 模块
//!
//! 该模块定义了 HTTP 层、配置加载以及示例服务在运行过程中可能出现的各类异常。
//!
//! ## 设计意图
//! - **错误分类**：涵盖报文解析、连接 I/O、配置文件以及请求负载（JSON、字段校验）几类错误。
//! - **语义映射**：解析类错误通过 [`Exception::status_code`] 转化为服务器应答的 HTTP 状态码。
//! - **可记录**：实现了 `Display` 与 `std::error::Error`，可以直接写入日志或返回给客户端。

use std::fmt;
use std::io;

/// 服务器、客户端与示例服务共用的异常类型。
///
/// 该枚举通常作为 `Result` 的 `Err` 部分返回，携带的字符串用于说明失败细节。
#[derive(Debug, Clone, PartialEq)]
pub enum Exception {
    /// 请求头部无法解析为合法的 UTF-8 字符串。
    RequestIsNotUtf8,
    /// 请求行不是 `METHOD TARGET VERSION` 的形式。
    MalformedRequestLine,
    /// 客户端使用了服务器不认识的 HTTP 方法。
    UnSupportedRequestMethod,
    /// 客户端使用了服务器不支持的 HTTP 协议版本（例如 HTTP/2.0）。
    UnsupportedHttpVersion,
    /// 某一行头部缺少 `:` 分隔符或字段名为空。
    InvalidHeader,
    /// `Content-Length` 不是合法的非负整数，或出现了相互矛盾的多个取值。
    InvalidContentLength,
    /// 头部区域超过了配置的上限，对应 `431`。
    HeaderTooLarge,
    /// 请求体超过了配置的上限，对应 `413`。
    BodyTooLarge,
    /// 使用了尚未实现的 `Transfer-Encoding`（例如 chunked），对应 `501`。
    UnsupportedTransferEncoding,
    /// 对端在报文完整之前关闭了连接。
    ConnectionClosed,
    /// 在限定时间内没有收到完整的请求，对应 `408`。
    ReadTimeout,
    /// 写出响应超时。
    WriteTimeout,
    /// 其他底层 I/O 错误。
    Io(String),
    /// 配置文件不存在或无法读取。
    ConfigRead(String),
    /// 配置文件内容无法解析。
    ConfigParse(String),
    /// 请求体不是合法的 JSON，或与目标结构不匹配。
    InvalidJson(String),
    /// 字段校验失败，携带校验器风格的描述文本。
    Validation(String),
    /// 响应数据序列化失败。
    Serialize(String),
    /// 客户端收到的响应报文格式不正确。
    MalformedResponse(String),
}

use Exception::*;

impl Exception {
    /// 将异常映射为服务器应答时使用的状态码。
    ///
    /// 负载类错误（JSON、字段校验）由各个服务自行决定应答内容，这里统一归为 `400`。
    pub fn status_code(&self) -> u16 {
        match self {
            RequestIsNotUtf8 | MalformedRequestLine | UnSupportedRequestMethod | InvalidHeader
            | InvalidContentLength | InvalidJson(_) | Validation(_) => 400,
            UnsupportedHttpVersion => 505,
            HeaderTooLarge => 431,
            BodyTooLarge => 413,
            UnsupportedTransferEncoding => 501,
            ReadTimeout => 408,
            ConnectionClosed | WriteTimeout | Io(_) | ConfigRead(_) | ConfigParse(_)
            | Serialize(_) | MalformedResponse(_) => 500,
        }
    }
}

impl fmt::Display for Exception {
    /// 根据错误类型写入人类可读的描述文本。
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestIsNotUtf8 => write!(f, "Request bytes can't be parsed in UTF-8"),
            MalformedRequestLine => write!(f, "Malformed request line"),
            UnSupportedRequestMethod => write!(f, "Unsupported request method"),
            UnsupportedHttpVersion => write!(f, "Unsupported HTTP version"),
            InvalidHeader => write!(f, "Malformed header line"),
            InvalidContentLength => write!(f, "Invalid Content-Length"),
            HeaderTooLarge => write!(f, "Request header fields too large"),
            BodyTooLarge => write!(f, "Request body too large"),
            UnsupportedTransferEncoding => write!(f, "Unsupported transfer encoding"),
            ConnectionClosed => write!(f, "Connection closed by peer"),
            ReadTimeout => write!(f, "Timed out while reading request"),
            WriteTimeout => write!(f, "Timed out while writing response"),
            Io(e) => write!(f, "I/O error: {}", e),
            ConfigRead(e) => write!(f, "Couldn't read config file: {}", e),
            ConfigParse(e) => write!(f, "Couldn't parse config file: {}", e),
            InvalidJson(e) => write!(f, "Invalid JSON: {}", e),
            Validation(e) => write!(f, "{}", e),
            Serialize(e) => write!(f, "Couldn't serialize response: {}", e),
            MalformedResponse(e) => write!(f, "Malformed response: {}", e),
        }
    }
}

impl std::error::Error for Exception {}

impl From<io::Error> for Exception {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::UnexpectedEof
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe => ConnectionClosed,
            _ => Io(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(MalformedRequestLine.status_code(), 400);
        assert_eq!(UnsupportedHttpVersion.status_code(), 505);
        assert_eq!(HeaderTooLarge.status_code(), 431);
        assert_eq!(BodyTooLarge.status_code(), 413);
        assert_eq!(ReadTimeout.status_code(), 408);
        assert_eq!(UnsupportedTransferEncoding.status_code(), 501);
        assert_eq!(Io("boom".to_string()).status_code(), 500);
    }

    #[test]
    fn test_display_keeps_detail() {
        assert_eq!(
            InvalidJson("EOF while parsing a value".to_string()).to_string(),
            "Invalid JSON: EOF while parsing a value"
        );
        assert_eq!(Validation("Key: 'X' failed".to_string()).to_string(), "Key: 'X' failed");
    }

    #[test]
    fn test_from_io_error() {
        let reset = io::Error::new(io::ErrorKind::ConnectionReset, "reset");
        assert_eq!(Exception::from(reset), ConnectionClosed);
        let other = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(Exception::from(other), Io(_)));
    }
}

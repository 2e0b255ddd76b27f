// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

#[cfg(test)]
mod security_tests {
    //! # 安全回归测试套件
    //!
    //! 通过模拟常见的攻击向量来验证服务器的防御能力。每个用例都在随机端口上启动
    //! 自己的图书服务，不依赖外部进程。
    //! 覆盖范围包括：
    //! - 路径遍历与特殊字符
    //! - 超大请求行、超大头部、超大正文
    //! - CRLF 注入与空字节
    //! - 慢速连接攻击 (Slowloris)
    //! - 半途断开的请求与并发洪泛

    use playground::services::books;
    use playground::{Config, Server, ServerHandle};

    use std::net::SocketAddr;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn spawn_server() -> (SocketAddr, ServerHandle) {
        let config = Config::from_toml_str(
            "read_timeout_secs = 1\nidle_timeout_secs = 2\nmax_header_size = 1024\nmax_body_size = 4096\n",
        );
        let store = Arc::new(books::BookStore::new());
        store.seed_samples();
        let server = Server::bind(
            "127.0.0.1:0".parse().unwrap(),
            books::router(store),
            Arc::new(config),
            "security",
        )
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();
        let handle = server.handle();
        tokio::spawn(server.run());
        (addr, handle)
    }

    /// # 异步请求发送器
    ///
    /// 发送原始报文后一直读到连接关闭。服务器拒绝请求时可能在读完数据前关闭连接，
    /// 此时返回已经收到的内容。
    async fn send_request(addr: SocketAddr, request: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let _ = stream.write_all(request).await;

        let mut received = Vec::new();
        let mut buffer = [0u8; 4096];
        loop {
            // 设置硬超时限制，防止测试用例因服务器挂起而永久阻塞
            match tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buffer)).await {
                Ok(Ok(0)) | Ok(Err(_)) => break,
                Ok(Ok(n)) => received.extend_from_slice(&buffer[..n]),
                Err(_) => panic!("服务器没有在5秒内关闭连接"),
            }
        }
        String::from_utf8_lossy(&received).into_owned()
    }

    /// 从原始响应字符串中提取 HTTP 状态码
    fn extract_status_code(response: &str) -> u16 {
        response
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .unwrap_or(0)
    }

    /// 提取头部区域（不含正文）
    fn head_of(response: &str) -> &str {
        response.split("\r\n\r\n").next().unwrap_or("")
    }

    /// ## 攻击向量：路径遍历
    /// 服务不读取文件系统，`..` 只是普通的路径段，不会匹配任何路由。
    #[tokio::test]
    async fn test_path_traversal() {
        let (addr, _) = spawn_server().await;
        let attacks: [&[u8]; 4] = [
            b"GET /../etc/passwd HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            b"GET /../../../etc/passwd HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            b"GET /%2e%2e/%2e%2e/etc/passwd HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            b"GET /api/v1/../../etc/passwd HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        ];

        for attack in attacks {
            let response = send_request(addr, attack).await;
            assert_eq!(extract_status_code(&response), 404, "{}", response);
            assert!(!response.contains("root:"));
        }
    }

    /// ## 攻击向量：空字节注入
    #[tokio::test]
    async fn test_null_byte_injection() {
        let (addr, _) = spawn_server().await;
        let response = send_request(
            addr,
            b"GET /api/v1/books/1%00.json HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert_eq!(extract_status_code(&response), 400);
        assert!(response.contains("Invalid book ID"));
    }

    /// ## 攻击向量：超长请求行
    /// 请求行属于头部区域，超过上限后返回 431 并断开。
    #[tokio::test]
    async fn test_oversized_request_line() {
        let (addr, _) = spawn_server().await;
        let request = format!("GET /{} HTTP/1.1\r\nHost: localhost\r\n\r\n", "a".repeat(3000));
        let response = send_request(addr, request.as_bytes()).await;
        assert_eq!(extract_status_code(&response), 431);
    }

    /// ## 攻击向量：大量头部字段
    #[tokio::test]
    async fn test_many_headers() {
        let (addr, _) = spawn_server().await;
        let mut request = String::from("GET / HTTP/1.1\r\nHost: localhost\r\n");
        for i in 0..200 {
            request.push_str(&format!("X-Header-{}: value\r\n", i));
        }
        request.push_str("\r\n");
        let response = send_request(addr, request.as_bytes()).await;
        assert_eq!(extract_status_code(&response), 431);
    }

    /// ## 攻击向量：超大正文
    /// 声明的长度超过上限时不读取正文，直接返回 413。
    #[tokio::test]
    async fn test_oversized_body_is_rejected_before_reading() {
        let (addr, _) = spawn_server().await;
        let response = send_request(
            addr,
            b"POST /api/v1/books HTTP/1.1\r\nHost: localhost\r\nContent-Length: 999999999\r\n\r\n",
        )
        .await;
        assert_eq!(extract_status_code(&response), 413);
    }

    /// ## 攻击向量：Content-Length 走私
    /// 多个取值不一致、负数或非数字的 `Content-Length` 一律视为非法请求。
    #[tokio::test]
    async fn test_ambiguous_content_length() {
        let (addr, _) = spawn_server().await;
        let attacks: [&[u8]; 3] = [
            b"POST /api/v1/books HTTP/1.1\r\nHost: localhost\r\nContent-Length: 5\r\nContent-Length: 50\r\n\r\nhello",
            b"POST /api/v1/books HTTP/1.1\r\nHost: localhost\r\nContent-Length: -1\r\n\r\n",
            b"POST /api/v1/books HTTP/1.1\r\nHost: localhost\r\nContent-Length: 1e3\r\n\r\n",
        ];
        for attack in attacks {
            let response = send_request(addr, attack).await;
            assert_eq!(extract_status_code(&response), 400, "{}", response);
        }
    }

    /// ## 攻击向量：头部折行与畸形头部
    #[tokio::test]
    async fn test_malformed_headers() {
        let (addr, _) = spawn_server().await;
        let attacks: [&[u8]; 3] = [
            b"GET / HTTP/1.1\r\nHost: localhost\r\n folded: value\r\n\r\n",
            b"GET / HTTP/1.1\r\nBad Name: value\r\n\r\n",
            b"GET / HTTP/1.1\r\n: empty-name\r\n\r\n",
        ];
        for attack in attacks {
            let response = send_request(addr, attack).await;
            assert_eq!(extract_status_code(&response), 400, "{}", response);
        }
    }

    /// ## 攻击向量：CRLF 注入
    /// 查询参数中编码过的换行不能出现在应答头部中。
    #[tokio::test]
    async fn test_crlf_injection() {
        let (addr, _) = spawn_server().await;
        let response = send_request(
            addr,
            b"GET /api/v1/formats?format=%0d%0aSet-Cookie:%20evil=1 HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert_eq!(extract_status_code(&response), 200);
        assert!(!head_of(&response).contains("Set-Cookie"));
    }

    /// ## 安全扫描：URI 特殊字符处理
    #[tokio::test]
    async fn test_special_characters_in_path() {
        let (addr, _) = spawn_server().await;
        let special_paths: [&[u8]; 3] = [
            b"GET /api/v1/books/<script>alert('xss')</script> HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            b"GET /api/v1/books/';DROP%20TABLE%20books-- HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
            b"GET /api/v1/books/${{7*7}} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        ];

        for request in special_paths {
            let response = send_request(addr, request).await;
            let status = extract_status_code(&response);
            // 含 `/` 的载荷拆成多个路径段，落到 404
            assert!(matches!(status, 400 | 404), "{}", response);
            assert!(!response.contains("<script>"));
        }
    }

    /// ## 攻击向量：慢速连接 (Slowloris)
    /// 读取期限从收到第一个字节开始计算，持续缓慢发送头部也无法无限占用连接。
    #[tokio::test]
    async fn test_slowloris_single() {
        let (addr, handle) = spawn_server().await;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let _ = stream.write_all(b"GET / HTTP/1.1\r\n").await;

        let started = std::time::Instant::now();
        for i in 0..10 {
            tokio::time::sleep(Duration::from_millis(300)).await;
            if stream.write_all(format!("X-Slow-{}: 1\r\n", i).as_bytes()).await.is_err() {
                break;
            }
        }

        let mut received = Vec::new();
        let mut buffer = [0u8; 1024];
        loop {
            match tokio::time::timeout(Duration::from_secs(5), stream.read(&mut buffer)).await {
                Ok(Ok(0)) | Ok(Err(_)) | Err(_) => break,
                Ok(Ok(n)) => received.extend_from_slice(&buffer[..n]),
            }
        }
        let response = String::from_utf8_lossy(&received);
        assert_eq!(extract_status_code(&response), 408, "{}", response);
        assert!(started.elapsed() < Duration::from_secs(8));

        // 连接被回收
        let mut waited = 0;
        while handle.active_connections() > 0 && waited < 100 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            waited += 1;
        }
        assert_eq!(handle.active_connections(), 0);
    }

    /// ## 协议健壮性：正文发送到一半断开
    /// 服务器放弃该连接，不影响后续请求。
    #[tokio::test]
    async fn test_truncated_body_does_not_affect_server() {
        let (addr, _) = spawn_server().await;
        {
            let mut stream = TcpStream::connect(addr).await.unwrap();
            stream
                .write_all(b"POST /api/v1/books HTTP/1.1\r\nHost: localhost\r\nContent-Length: 100\r\n\r\n{\"title\":")
                .await
                .unwrap();
        }

        let response = send_request(
            addr,
            b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
        )
        .await;
        assert_eq!(extract_status_code(&response), 200);
    }

    /// ## 协议健壮性：缺少 Host 头
    /// 不强制要求 `Host`，请求照常处理。
    #[tokio::test]
    async fn test_missing_host_header() {
        let (addr, _) = spawn_server().await;
        let response = send_request(addr, b"GET /health HTTP/1.1\r\nConnection: close\r\n\r\n").await;
        assert_eq!(extract_status_code(&response), 200);
    }

    /// ## 拒绝服务：并发连接洪泛
    #[tokio::test]
    async fn test_concurrent_connections() {
        let (addr, _) = spawn_server().await;
        let tasks: Vec<_> = (0..50)
            .map(|_| {
                tokio::spawn(async move {
                    send_request(
                        addr,
                        b"GET /api/v1/books HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
                    )
                    .await
                })
            })
            .collect();
        for task in tasks {
            let response = task.await.unwrap();
            assert_eq!(extract_status_code(&response), 200);
        }
    }
}

#[cfg(test)]
mod unit_security_tests {
    //! # 解析器单元测试
    //!
    //! 直接对 `Request::try_from` 输入畸形报文，验证错误分类。

    use playground::{Exception, Request};

    /// 解析失败时返回的异常决定了服务器的应答状态码。
    #[test]
    fn test_parser_error_classification() {
        let cases: [(&[u8], Exception); 7] = [
            (&b"\xff\xfe / HTTP/1.1\r\n\r\n"[..], Exception::RequestIsNotUtf8),
            (&b"GET\r\n\r\n"[..], Exception::MalformedRequestLine),
            (&b"BREW /pot HTTP/1.1\r\n\r\n"[..], Exception::UnSupportedRequestMethod),
            (&b"GET / HTTP/3\r\n\r\n"[..], Exception::UnsupportedHttpVersion),
            (&b"GET / HTTP/1.1\r\nNoColon\r\n\r\n"[..], Exception::InvalidHeader),
            (&b"GET / HTTP/1.1\r\nContent-Length: abc\r\n\r\n"[..], Exception::InvalidContentLength),
            (
                &b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip, chunked\r\n\r\n"[..],
                Exception::UnsupportedTransferEncoding,
            ),
        ];
        for (raw, expected) in cases {
            assert_eq!(Request::try_from(raw, 0).unwrap_err(), expected);
        }
    }

    /// 百分号编码的路径在解析时解码，查询串保持原样。
    #[test]
    fn test_encoded_path_is_decoded_once() {
        let request = Request::try_from(b"GET /%252e%252e/x?q=%2e HTTP/1.1\r\n\r\n", 0).unwrap();
        assert_eq!(request.path(), "/%2e%2e/x");
        assert_eq!(request.query(), Some("q=%2e"));
        assert_eq!(request.query_param("q").as_deref(), Some("."));
    }

    /// 重复但取值一致的 `Content-Length` 可以接受。
    #[test]
    fn test_identical_content_length_is_accepted() {
        let request = Request::try_from(
            b"POST / HTTP/1.1\r\nContent-Length: 2\r\ncontent-length: 2\r\n\r\nok",
            0,
        )
        .unwrap();
        assert_eq!(&request.body()[..], b"ok");
    }
}

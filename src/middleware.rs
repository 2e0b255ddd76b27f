// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 两个示例服务共用的中间件。

use crate::{
    param::HttpRequestMethod,
    response::Response,
    router::{middleware, Middleware},
    util::{format_duration, unix_nanos},
};

use log::{error, info};

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

/// 每个请求一行访问日志：版本、路径、方法、状态码、原因短语、UA、耗时。
pub fn logging() -> Middleware {
    middleware(|ctx, next| {
        let start = Instant::now();
        let version = ctx.request().version();
        let path = ctx.request().path().to_string();
        let method = ctx.request().method();
        let user_agent = ctx.request().user_agent().to_string();
        let id = ctx.id();

        let response = next.run(ctx);

        info!(
            "[ID{}] {}, {}, {}, {}, {}, {}, {}",
            id,
            version,
            path,
            method,
            response.status_code(),
            response.information(),
            user_agent,
            format_duration(start.elapsed()),
        );
        response
    })
}

/// 捕获处理函数中的 panic 并转换为 500 应答，连接任务不受影响。
pub fn recovery() -> Middleware {
    middleware(|ctx, next| {
        let id = ctx.id();
        match catch_unwind(AssertUnwindSafe(|| next.run(ctx))) {
            Ok(response) => response,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("[ID{}]处理请求时发生panic：{}", id, message);
                Response::text(500, "Internal Server Error")
            }
        }
    })
}

pub fn cors() -> Middleware {
    middleware(|ctx, next| {
        let mut response = if ctx.request().method() == HttpRequestMethod::Options {
            Response::with_status(200)
        } else {
            next.run(ctx)
        };
        response
            .set_header("Access-Control-Allow-Origin", "*")
            .set_header(
                "Access-Control-Allow-Methods",
                "GET, POST, PUT, DELETE, OPTIONS",
            )
            .set_header("Access-Control-Allow-Headers", "Content-Type, Authorization");
        response
    })
}

/// 以 Unix 纳秒时间戳作为请求 ID，写入上下文的 `request_id` 与 `X-Request-ID` 头。
pub fn request_id() -> Middleware {
    middleware(|ctx, next| {
        let request_id = unix_nanos().to_string();
        ctx.set("request_id", request_id.clone());
        let mut response = next.run(ctx);
        response.set_header("X-Request-ID", &request_id);
        response
    })
}

pub fn timing() -> Middleware {
    middleware(|ctx, next| {
        let start = Instant::now();
        let mut response = next.run(ctx);
        response.set_header("X-Response-Time", &format_duration(start.elapsed()));
        response
    })
}

/// 处理函数把错误压入上下文后，统一以 500 `{"error": 最后一个错误}` 应答。
pub fn error_handler() -> Middleware {
    middleware(|ctx, next| {
        let response = next.run(ctx);
        match ctx.errors().last() {
            Some(last) => {
                error!("[ID{}]请求处理失败：{}", ctx.id(), last);
                Response::error(500, last)
            }
            None => response,
        }
    })
}

/// 演示用的令牌检查：只要求 `Authorization` 以 `Bearer ` 开头。
pub fn auth() -> Middleware {
    middleware(|ctx, next| {
        let token = ctx.request().header("authorization").unwrap_or("");
        if token.is_empty() {
            return Response::error(401, "Authorization header required");
        }
        if !token.starts_with("Bearer ") {
            return Response::error(401, "Invalid token format");
        }
        ctx.set("user", "demo_user");
        next.run(ctx)
    })
}

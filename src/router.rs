// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 路由模块
//!
//! 把请求分发到处理函数。路由模式由 `/` 分隔的片段组成：
//! - 字面片段，例如 `books`；
//! - 路径参数，例如 `:id`；
//! - 末尾的通配符 `*`，匹配剩余的全部片段。
//!
//! 多个路由同时匹配时，字面片段更多的路由优先（`/books/search` 先于 `/books/:id`），
//! 数量相同则按注册顺序。路径匹配但方法不匹配时返回 `405`，并附带 `Allow` 头。
//!
//! 中间件的形式是 `Fn(&mut Context, Next) -> Response`：调用 `next.run(ctx)` 继续执行，
//! 直接返回则中止后续链路。

use crate::{exception::Exception, param::*, request::Request, response::Response};

use log::debug;
use serde::de::DeserializeOwned;

use std::collections::HashMap;
use std::sync::Arc;

pub type HandlerFn = Arc<dyn Fn(&mut Context) -> Response + Send + Sync>;
pub type Middleware = Arc<dyn Fn(&mut Context, Next<'_>) -> Response + Send + Sync>;

/// 把闭包包装为中间件，便于闭包推导出正确的生命周期签名。
pub fn middleware<F>(f: F) -> Middleware
where
    F: Fn(&mut Context, Next<'_>) -> Response + Send + Sync + 'static,
{
    Arc::new(f)
}

pub fn handler<F>(f: F) -> HandlerFn
where
    F: Fn(&mut Context) -> Response + Send + Sync + 'static,
{
    Arc::new(f)
}

/// 单次请求的上下文：请求本身、路径参数、中间件之间传递的键值与错误列表。
pub struct Context {
    request: Request,
    params: HashMap<String, String>,
    values: HashMap<String, String>,
    errors: Vec<String>,
    id: u128,
}

impl Context {
    pub fn new(request: Request, id: u128) -> Self {
        Self {
            request,
            params: HashMap::new(),
            values: HashMap::new(),
            errors: Vec::new(),
            id,
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn id(&self) -> u128 {
        self.id
    }

    /// 路径参数，例如 `/books/:id` 中的 `id`
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    pub fn query(&self, name: &str) -> Option<String> {
        self.request.query_param(name)
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// 把请求体解析为 JSON 结构
    pub fn bind_json<T: DeserializeOwned>(&self) -> Result<T, Exception> {
        serde_json::from_slice(self.request.body()).map_err(|e| Exception::InvalidJson(e.to_string()))
    }
}

/// 中间件链中剩余的部分
pub struct Next<'a> {
    chain: &'a [Middleware],
    handler: &'a HandlerFn,
}

impl<'a> Next<'a> {
    pub fn run(self, ctx: &mut Context) -> Response {
        match self.chain.split_first() {
            Some((first, rest)) => first(
                ctx,
                Next {
                    chain: rest,
                    handler: self.handler,
                },
            ),
            None => (self.handler)(ctx),
        }
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
    Wildcard,
}

#[derive(Debug, Clone)]
struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    fn parse(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(param) = s.strip_prefix(':') {
                    Segment::Param(param.to_string())
                } else if s == "*" {
                    Segment::Wildcard
                } else {
                    Segment::Literal(s.to_string())
                }
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    fn literal_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let has_wildcard = matches!(self.segments.last(), Some(Segment::Wildcard));
        if has_wildcard {
            if path_segments.len() < self.segments.len() - 1 {
                return None;
            }
        } else if path_segments.len() != self.segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Literal(lit) => {
                    if path_segments.get(i) != Some(&lit.as_str()) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    let value = path_segments.get(i)?;
                    params.insert(name.clone(), value.to_string());
                }
                Segment::Wildcard => {
                    params.insert("*".to_string(), path_segments[i..].join("/"));
                    return Some(params);
                }
            }
        }
        Some(params)
    }
}

struct Route {
    /// `None` 表示接受任意方法
    method: Option<HttpRequestMethod>,
    pattern: RoutePattern,
    /// 全局中间件之后、处理函数之前执行的分组中间件
    middleware: Vec<Middleware>,
    handler: HandlerFn,
}

impl Route {
    fn accepts(&self, method: HttpRequestMethod) -> bool {
        match self.method {
            None => true,
            Some(m) if m == method => true,
            // HEAD 借用 GET 路由
            Some(HttpRequestMethod::Get) => method == HttpRequestMethod::Head,
            Some(_) => false,
        }
    }
}

pub struct Router {
    routes: Vec<Route>,
    middleware: Vec<Middleware>,
    not_found: HandlerFn,
    method_not_allowed: HandlerFn,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            middleware: Vec::new(),
            not_found: handler(|_| Response::text(404, "404 page not found")),
            method_not_allowed: handler(|_| Response::text(405, "405 method not allowed")),
        }
    }

    /// 全局中间件，对匹配、404 与 405 三种结果都生效
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    pub fn not_found<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.not_found = Arc::new(f);
        self
    }

    pub fn method_not_allowed<F>(&mut self, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.method_not_allowed = Arc::new(f);
        self
    }

    fn add(
        &mut self,
        method: Option<HttpRequestMethod>,
        pattern: &str,
        middleware: Vec<Middleware>,
        handler: HandlerFn,
    ) {
        debug!("注册路由：{} {}", method.map_or("*", |m| m.as_str()), pattern);
        self.routes.push(Route {
            method,
            pattern: RoutePattern::parse(pattern),
            middleware,
            handler,
        });
    }

    pub fn route<F>(&mut self, method: HttpRequestMethod, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(method), pattern, Vec::new(), Arc::new(f));
        self
    }

    pub fn get<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Get, pattern, f)
    }

    pub fn post<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Post, pattern, f)
    }

    pub fn put<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Put, pattern, f)
    }

    pub fn delete<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Delete, pattern, f)
    }

    pub fn patch<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Patch, pattern, f)
    }

    pub fn options<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.route(HttpRequestMethod::Options, pattern, f)
    }

    /// 接受任意方法的路由
    pub fn any<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(None, pattern, Vec::new(), Arc::new(f));
        self
    }

    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group {
            router: self,
            prefix: join_paths("", prefix),
            middleware: Vec::new(),
        }
    }

    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// 分发一个请求并返回应答。应答尚未经过 [`Response::finalize`]。
    pub fn handle(&self, request: Request, id: u128) -> Response {
        let method = request.method();
        let path = request.path().to_string();
        let mut ctx = Context::new(request, id);

        let mut best: Option<(&Route, HashMap<String, String>)> = None;
        let mut allowed: Vec<HttpRequestMethod> = Vec::new();
        for route in &self.routes {
            let params = match route.pattern.matches(&path) {
                Some(p) => p,
                None => continue,
            };
            if route.accepts(method) {
                let better = match &best {
                    Some((current, _)) => {
                        route.pattern.literal_count() > current.pattern.literal_count()
                    }
                    None => true,
                };
                if better {
                    best = Some((route, params));
                }
            } else if let Some(m) = route.method {
                if !allowed.contains(&m) {
                    allowed.push(m);
                }
            }
        }

        match best {
            Some((route, params)) => {
                debug!("[ID{}]匹配路由：{}", id, route.pattern.raw);
                ctx.params = params;
                let chain: Vec<Middleware> = self
                    .middleware
                    .iter()
                    .chain(route.middleware.iter())
                    .cloned()
                    .collect();
                Next {
                    chain: &chain,
                    handler: &route.handler,
                }
                .run(&mut ctx)
            }
            None if !allowed.is_empty() => {
                debug!("[ID{}]路径{}存在，但不接受{}方法", id, path, method);
                if allowed.contains(&HttpRequestMethod::Get) && !allowed.contains(&HttpRequestMethod::Head)
                {
                    allowed.push(HttpRequestMethod::Head);
                }
                let mut response = Next {
                    chain: &self.middleware,
                    handler: &self.method_not_allowed,
                }
                .run(&mut ctx);
                if response.status_code() == 405 {
                    response.set_allow(allowed);
                }
                response
            }
            None => {
                debug!("[ID{}]没有匹配{}的路由", id, path);
                Next {
                    chain: &self.middleware,
                    handler: &self.not_found,
                }
                .run(&mut ctx)
            }
        }
    }
}

/// 带前缀的路由分组。分组中间件只作用于该分组（及其子分组）内注册的路由。
pub struct Group<'r> {
    router: &'r mut Router,
    prefix: String,
    middleware: Vec<Middleware>,
}

impl<'r> Group<'r> {
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.middleware.push(middleware);
        self
    }

    pub fn group(&mut self, prefix: &str) -> Group<'_> {
        Group {
            prefix: join_paths(&self.prefix, prefix),
            middleware: self.middleware.clone(),
            router: &mut *self.router,
        }
    }

    fn add<F>(&mut self, method: Option<HttpRequestMethod>, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        let full = join_paths(&self.prefix, pattern);
        self.router
            .add(method, &full, self.middleware.clone(), Arc::new(f));
        self
    }

    pub fn get<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(HttpRequestMethod::Get), pattern, f)
    }

    pub fn post<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(HttpRequestMethod::Post), pattern, f)
    }

    pub fn put<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(HttpRequestMethod::Put), pattern, f)
    }

    pub fn delete<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(HttpRequestMethod::Delete), pattern, f)
    }

    pub fn patch<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(Some(HttpRequestMethod::Patch), pattern, f)
    }

    pub fn any<F>(&mut self, pattern: &str, f: F) -> &mut Self
    where
        F: Fn(&mut Context) -> Response + Send + Sync + 'static,
    {
        self.add(None, pattern, f)
    }
}

fn join_paths(prefix: &str, path: &str) -> String {
    let joined = format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    if joined.len() > 1 {
        joined.trim_end_matches('/').to_string()
    } else {
        joined
    }
}

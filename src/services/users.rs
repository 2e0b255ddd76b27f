// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 用户服务（默认端口 8080）：几个纯文本接口和一个 JSON 用户集合。

use crate::{
    middleware::{cors, logging, recovery},
    param::*,
    response::Response,
    router::{Context, Router},
    util::{format_multi_map, rfc1123},
};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde_derive::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Debug, Default)]
struct CreateUserInput {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

struct Users {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

/// 线程安全的内存用户表，ID 从 1 开始递增
pub struct UserStore {
    inner: RwLock<Users>,
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Users {
                users: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Users> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("用户表读锁被污染，恢复并继续");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Users> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("用户表写锁被污染，恢复并继续");
            poisoned.into_inner()
        })
    }

    /// 按 ID 升序返回全部用户
    pub fn list(&self) -> Vec<User> {
        self.read().users.values().cloned().collect()
    }

    pub fn create(&self, name: &str, email: &str) -> User {
        let mut inner = self.write();
        let user = User {
            id: inner.next_id,
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        inner.next_id += 1;
        debug!("创建用户：{} <{}>，ID {}", user.name, user.email, user.id);
        user
    }

    pub fn len(&self) -> usize {
        self.read().users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seed_samples(&self) {
        self.create("Alice", "alice@example.com");
        self.create("Bob", "bob@example.com");
    }
}

/// 服务说明，演示模式与启动日志使用
pub const ENDPOINTS: &[&str] = &[
    "GET  /           - Hello World",
    "GET  /time       - Current server time",
    "GET  /info       - Request information",
    "GET  /query      - Query params demo (?name=John&age=30)",
    "GET  /api/users  - List all users (JSON)",
    "POST /api/users  - Create user (JSON body: {\"name\":\"...\",\"email\":\"...\"})",
];

fn json(code: u16, value: &impl serde::Serialize) -> Response {
    let mut response = Response::json(code, value);
    if response.status_code() == code {
        response.set_content_type(MIME_JSON_PLAIN);
    }
    response
}

fn json_error(code: u16, message: &str) -> Response {
    json(code, &serde_json::json!({ "error": message }))
}

fn hello(_: &mut Context) -> Response {
    Response::text(200, "Hello, World!\n")
}

fn time(_: &mut Context) -> Response {
    Response::text(200, format!("Current server time: {}\n", rfc1123(&Utc::now())))
}

fn request_info(ctx: &mut Context) -> Response {
    let request = ctx.request();
    let headers: Vec<(String, String)> = request
        .headers()
        .iter()
        .filter(|(k, _)| !k.eq_ignore_ascii_case("host"))
        .cloned()
        .collect();
    let info = format!(
        "Request Information:\n  Method:     {}\n  URL:        {}\n  Path:       {}\n  Host:       {}\n  RemoteAddr: {}\n  User-Agent: {}\n  Headers:    {}\n",
        request.method(),
        request.target(),
        request.path(),
        request.host().unwrap_or(""),
        request.remote_addr().map(|a| a.to_string()).unwrap_or_default(),
        request.user_agent(),
        format_multi_map(&headers),
    );
    let mut response = Response::text(200, info);
    response.set_content_type(MIME_PLAIN);
    response
}

fn query_params(ctx: &mut Context) -> Response {
    let name = ctx.query("name").unwrap_or_default();
    let age = ctx.query("age").unwrap_or_default();
    let all = format_multi_map(&ctx.request().query_pairs());
    Response::text(
        200,
        format!(
            "Query Parameters:\n  name: {}\n  age:  {}\n  All params: {}\n\nTry: /query?name=John&age=30\n",
            name, age, all
        ),
    )
}

/// 构建用户服务的路由。中间件顺序：recovery、logging、cors。
pub fn router(store: Arc<UserStore>) -> Router {
    let mut router = Router::new();
    router
        .use_middleware(recovery())
        .use_middleware(logging())
        .use_middleware(cors());

    router
        .any("/", hello)
        .any("/time", time)
        .any("/info", request_info)
        .any("/query", query_params);

    let list_store = Arc::clone(&store);
    router.get("/api/users", move |_| json(200, &list_store.list()));

    let create_store = Arc::clone(&store);
    router.post("/api/users", move |ctx| {
        let input: CreateUserInput = match ctx.bind_json() {
            Ok(input) => input,
            Err(e) => return json_error(400, &e.to_string()),
        };
        if input.name.is_empty() || input.email.is_empty() {
            return json_error(400, "Name and email are required");
        }
        json(201, &create_store.create(&input.name, &input.email))
    });

    // 未注册的路径一律由根处理函数应答
    router
        .not_found(hello)
        .method_not_allowed(|_| json_error(405, "Method not allowed"));
    router
}

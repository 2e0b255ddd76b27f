// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 图书服务（默认端口 8081）
//!
//! 版本化的 JSON CRUD 接口：
//! - `/api/v1/books` 增删改查与按作者、年份检索；
//! - `/api/v1/formats` 演示 JSON、XML、YAML 三种应答格式；
//! - `/api/v1/admin/stats` 需要 `Authorization: Bearer <token>`。
//!
//! 输入校验失败时的错误文本沿用 `Key: 'Struct.Field' Error:...` 的校验器格式，多条以换行分隔。

use crate::{
    exception::Exception,
    middleware::{auth, error_handler, logging, recovery, request_id, timing},
    response::Response,
    router::{Context, Router},
};

use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, warn};
use serde_derive::{Deserialize, Serialize};

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Book {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub year: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub isbn: String,
    pub created_at: DateTime<Utc>,
}

/// 创建图书的输入。缺省的字段按零值处理，交给校验规则判断。
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateBookInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub year: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub isbn: String,
}

/// 更新图书的输入，只修改出现的字段
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateBookInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

/// 检索条件，序列化后回显在应答的 `filter` 字段中
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct SearchFilter {
    pub author: String,
    pub year: i64,
    pub limit: i64,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            author: String::new(),
            year: 0,
            limit: 10,
        }
    }
}

const TITLE_MAX_CHARS: usize = 200;
const YEAR_MIN: i64 = 1000;
const YEAR_MAX: i64 = 2100;

fn violation(structure: &str, field: &str, tag: &str) -> String {
    format!(
        "Key: '{}.{}' Error:Field validation for '{}' failed on the '{}' tag",
        structure, field, field, tag
    )
}

fn finish(violations: Vec<String>) -> Result<(), Exception> {
    match violations.is_empty() {
        true => Ok(()),
        false => Err(Exception::Validation(violations.join("\n"))),
    }
}

fn check_year(structure: &str, year: i64, violations: &mut Vec<String>) {
    if year < YEAR_MIN {
        violations.push(violation(structure, "Year", "gte"));
    } else if year > YEAR_MAX {
        violations.push(violation(structure, "Year", "lte"));
    }
}

fn check_title(structure: &str, title: &str, violations: &mut Vec<String>) {
    if title.is_empty() {
        violations.push(violation(structure, "Title", "min"));
    } else if title.chars().count() > TITLE_MAX_CHARS {
        violations.push(violation(structure, "Title", "max"));
    }
}

impl CreateBookInput {
    pub fn validate(&self) -> Result<(), Exception> {
        let mut violations = Vec::new();
        if self.title.is_empty() {
            violations.push(violation("CreateBookInput", "Title", "required"));
        } else {
            check_title("CreateBookInput", &self.title, &mut violations);
        }
        if self.author.is_empty() {
            violations.push(violation("CreateBookInput", "Author", "required"));
        }
        if self.year == 0 {
            violations.push(violation("CreateBookInput", "Year", "required"));
        } else {
            check_year("CreateBookInput", self.year, &mut violations);
        }
        finish(violations)
    }
}

impl UpdateBookInput {
    pub fn validate(&self) -> Result<(), Exception> {
        let mut violations = Vec::new();
        if let Some(title) = &self.title {
            check_title("UpdateBookInput", title, &mut violations);
        }
        if let Some(year) = self.year {
            check_year("UpdateBookInput", year, &mut violations);
        }
        finish(violations)
    }
}

struct Books {
    books: BTreeMap<u64, Book>,
    next_id: u64,
}

pub struct BookStore {
    inner: RwLock<Books>,
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Books {
                books: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Books> {
        self.inner.read().unwrap_or_else(|poisoned| {
            warn!("图书表读锁被污染，恢复并继续");
            poisoned.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Books> {
        self.inner.write().unwrap_or_else(|poisoned| {
            warn!("图书表写锁被污染，恢复并继续");
            poisoned.into_inner()
        })
    }

    pub fn list(&self) -> Vec<Book> {
        self.read().books.values().cloned().collect()
    }

    pub fn get(&self, id: u64) -> Option<Book> {
        self.read().books.get(&id).cloned()
    }

    /// 输入应已通过校验
    pub fn create(&self, input: CreateBookInput) -> Book {
        let mut inner = self.write();
        let book = Book {
            id: inner.next_id,
            title: input.title,
            author: input.author,
            year: input.year,
            isbn: input.isbn,
            created_at: Utc::now(),
        };
        inner.books.insert(book.id, book.clone());
        inner.next_id += 1;
        debug!("创建图书：《{}》，ID {}", book.title, book.id);
        book
    }

    pub fn update(&self, id: u64, input: UpdateBookInput) -> Option<Book> {
        let mut inner = self.write();
        let book = inner.books.get_mut(&id)?;
        if let Some(title) = input.title {
            book.title = title;
        }
        if let Some(author) = input.author {
            book.author = author;
        }
        if let Some(year) = input.year {
            book.year = year;
        }
        if let Some(isbn) = input.isbn {
            book.isbn = isbn;
        }
        Some(book.clone())
    }

    pub fn delete(&self, id: u64) -> bool {
        self.write().books.remove(&id).is_some()
    }

    /// 按 ID 顺序检索，匹配数达到 `limit` 后停止
    pub fn search(&self, filter: &SearchFilter) -> Vec<Book> {
        let inner = self.read();
        let mut results = Vec::new();
        for book in inner.books.values() {
            if results.len() as i64 >= filter.limit {
                break;
            }
            let match_author = filter.author.is_empty() || book.author == filter.author;
            let match_year = filter.year == 0 || book.year == filter.year;
            if match_author && match_year {
                results.push(book.clone());
            }
        }
        results
    }

    pub fn len(&self) -> usize {
        self.read().books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn seed_samples(&self) {
        for (title, author, year) in [
            ("The Go Programming Language", "Donovan & Kernighan", 2015),
            ("Learning Go", "Jon Bodner", 2021),
            ("Concurrency in Go", "Katherine Cox-Buday", 2017),
        ] {
            self.create(CreateBookInput {
                title: title.to_string(),
                author: author.to_string(),
                year,
                isbn: String::new(),
            });
        }
    }
}

pub const ENDPOINTS: &[&str] = &[
    "GET  /                     - Welcome message",
    "GET  /health               - Health check",
    "GET  /api/v1/formats       - Response formats (?format=json|xml|yaml)",
    "GET  /api/v1/books         - List all books",
    "GET  /api/v1/books/:id     - Get book by ID",
    "GET  /api/v1/books/search  - Search (?author=...&year=...&limit=10)",
    "POST /api/v1/books         - Create book (JSON body)",
    "PUT  /api/v1/books/:id     - Update book (JSON body)",
    "DELETE /api/v1/books/:id   - Delete book",
    "GET  /api/v1/admin/stats   - Stats (requires: Authorization: Bearer <token>)",
];

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn book_id(ctx: &Context) -> Option<u64> {
    ctx.param("id")
        .and_then(|raw| raw.parse::<u64>().ok())
        .filter(|id| *id >= 1)
}

/// 查询参数中的整数，缺省时使用默认值
fn int_query(ctx: &Context, name: &str, default: i64) -> Result<i64, String> {
    match ctx.query(name) {
        None => Ok(default),
        Some(raw) if raw.is_empty() => Ok(default),
        Some(raw) => raw
            .parse::<i64>()
            .map_err(|_| format!("strconv.ParseInt: parsing \"{}\": invalid syntax", raw)),
    }
}

fn welcome(_: &mut Context) -> Response {
    Response::json(
        200,
        &serde_json::json!({
            "message": "Welcome to the Gin Learning API!",
            "version": "1.0.0",
            "docs": "/api/v1",
        }),
    )
}

fn health(_: &mut Context) -> Response {
    Response::json(200, &serde_json::json!({ "status": "ok", "timestamp": timestamp() }))
}

fn formats(ctx: &mut Context) -> Response {
    let data = serde_json::json!({
        "message": "Hello from Gin!",
        "formats": ["json", "xml", "yaml"],
    });
    match ctx.query("format").as_deref() {
        Some("xml") => Response::xml(200, "map", &data),
        Some("yaml") => Response::yaml(200, &data),
        _ => Response::json(200, &data),
    }
}

/// 构建图书服务的路由。全局中间件：recovery、logging、request_id、timing、error_handler。
pub fn router(store: Arc<BookStore>) -> Router {
    let mut router = Router::new();
    router
        .use_middleware(recovery())
        .use_middleware(logging())
        .use_middleware(request_id())
        .use_middleware(timing())
        .use_middleware(error_handler());

    router.get("/", welcome).get("/health", health);

    let mut v1 = router.group("/api/v1");
    v1.get("/formats", formats);

    {
        let mut books = v1.group("/books");

        let s = Arc::clone(&store);
        books.get("", move |_| {
            let data = s.list();
            let count = data.len();
            Response::json(200, &serde_json::json!({ "data": data, "count": count }))
        });

        let s = Arc::clone(&store);
        books.get("/:id", move |ctx| {
            let id = match book_id(ctx) {
                Some(id) => id,
                None => return Response::error(400, "Invalid book ID"),
            };
            match s.get(id) {
                Some(book) => Response::json(200, &serde_json::json!({ "data": book })),
                None => Response::error(404, "Book not found"),
            }
        });

        let s = Arc::clone(&store);
        books.get("/search", move |ctx| {
            let year = match int_query(ctx, "year", 0) {
                Ok(v) => v,
                Err(e) => return Response::error(400, &e),
            };
            let limit = match int_query(ctx, "limit", 10) {
                Ok(v) => v,
                Err(e) => return Response::error(400, &e),
            };
            let filter = SearchFilter {
                author: ctx.query("author").unwrap_or_default(),
                year,
                limit,
            };
            let data = s.search(&filter);
            let count = data.len();
            Response::json(
                200,
                &serde_json::json!({ "data": data, "count": count, "filter": filter }),
            )
        });

        let s = Arc::clone(&store);
        books.post("", move |ctx| {
            let input: CreateBookInput = match ctx.bind_json() {
                Ok(input) => input,
                Err(Exception::InvalidJson(e)) => return Response::error(400, &e),
                Err(e) => return Response::error(400, &e.to_string()),
            };
            if let Err(e) = input.validate() {
                return Response::error(400, &e.to_string());
            }
            let book = s.create(input);
            Response::json(201, &serde_json::json!({ "data": book }))
        });

        let s = Arc::clone(&store);
        books.put("/:id", move |ctx| {
            let id = match book_id(ctx) {
                Some(id) => id,
                None => return Response::error(400, "Invalid book ID"),
            };
            let input: UpdateBookInput = match ctx.bind_json() {
                Ok(input) => input,
                Err(Exception::InvalidJson(e)) => return Response::error(400, &e),
                Err(e) => return Response::error(400, &e.to_string()),
            };
            if let Err(e) = input.validate() {
                return Response::error(400, &e.to_string());
            }
            match s.update(id, input) {
                Some(book) => Response::json(200, &serde_json::json!({ "data": book })),
                None => Response::error(404, "Book not found"),
            }
        });

        let s = Arc::clone(&store);
        books.delete("/:id", move |ctx| {
            let id = match book_id(ctx) {
                Some(id) => id,
                None => return Response::error(400, "Invalid book ID"),
            };
            match s.delete(id) {
                true => Response::json(
                    200,
                    &serde_json::json!({ "message": "Book deleted successfully" }),
                ),
                false => Response::error(404, "Book not found"),
            }
        });
    }

    {
        let mut admin = v1.group("/admin");
        admin.use_middleware(auth());
        let s = Arc::clone(&store);
        admin.get("/stats", move |ctx| {
            Response::json(
                200,
                &serde_json::json!({
                    "user": ctx.get("user").unwrap_or(""),
                    "total_books": s.len(),
                    "timestamp": timestamp(),
                }),
            )
        });
    }

    router
        .not_found(|_| Response::error(404, "Not found"))
        .method_not_allowed(|_| Response::error(405, "Method not allowed"));
    router
}

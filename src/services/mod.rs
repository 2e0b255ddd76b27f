// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 建立在 [`Router`](crate::router::Router) 之上的两个示例服务。
//! 数据都保存在内存中，由 `Arc` 句柄共享给各个处理函数。

pub mod books;
pub mod users;

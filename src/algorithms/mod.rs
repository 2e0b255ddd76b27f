// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 教科书式的算法与抽象数据类型，每个子模块自成一体，互不依赖。

pub mod binary_search;
pub mod dynamic_programming;
pub mod graph;
pub mod linked_list;
pub mod queue;
pub mod sliding_window;
pub mod sorting;
pub mod stack;
pub mod two_pointers;

pub use graph::Graph;
pub use linked_list::ListArena;
pub use queue::{CircularQueue, Deque, MaxPriorityQueue, PriorityQueue, Queue};
pub use stack::{MinStack, RpnError, Stack};

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 图的遍历
//!
//! 邻接表表示的图，邻居按加边顺序保存。深度优先与广度优先两组算法都在 [`Graph`] 上实现，
//! 另外提供两个网格上的例子：岛屿计数（DFS 泛洪）与网格最短路（BFS）。
//!
//! 起点越界时遍历返回空结果，判定类函数返回 `false`。

use log::warn;

use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    vertices: usize,
    adj: Vec<Vec<usize>>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    Visiting,
    Visited,
}

impl Graph {
    pub fn new(vertices: usize) -> Self {
        Self {
            vertices,
            adj: vec![Vec::new(); vertices],
        }
    }

    fn contains(&self, v: usize) -> bool {
        v < self.vertices
    }

    /// 无向边
    pub fn add_edge(&mut self, u: usize, v: usize) {
        if !self.contains(u) || !self.contains(v) {
            warn!("忽略越界的边：{} - {}（顶点数 {}）", u, v, self.vertices);
            return;
        }
        self.adj[u].push(v);
        self.adj[v].push(u);
    }

    pub fn add_directed_edge(&mut self, u: usize, v: usize) {
        if !self.contains(u) || !self.contains(v) {
            warn!("忽略越界的边：{} -> {}（顶点数 {}）", u, v, self.vertices);
            return;
        }
        self.adj[u].push(v);
    }

    pub fn vertices(&self) -> usize {
        self.vertices
    }

    pub fn neighbors(&self, u: usize) -> &[usize] {
        self.adj.get(u).map_or(&[], |n| n.as_slice())
    }

    pub fn dfs_recursive(&self, start: usize) -> Vec<usize> {
        fn visit(g: &Graph, u: usize, visited: &mut [bool], order: &mut Vec<usize>) {
            visited[u] = true;
            order.push(u);
            for &v in &g.adj[u] {
                if !visited[v] {
                    visit(g, v, visited, order);
                }
            }
        }

        let mut order = Vec::new();
        if self.contains(start) {
            let mut visited = vec![false; self.vertices];
            visit(self, start, &mut visited, &mut order);
        }
        order
    }

    /// 邻居逆序入栈，访问顺序与递归版本一致
    pub fn dfs_iterative(&self, start: usize) -> Vec<usize> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }
        let mut visited = vec![false; self.vertices];
        let mut stack = vec![start];
        while let Some(u) = stack.pop() {
            if visited[u] {
                continue;
            }
            visited[u] = true;
            order.push(u);
            for &v in self.adj[u].iter().rev() {
                if !visited[v] {
                    stack.push(v);
                }
            }
        }
        order
    }

    pub fn has_path_dfs(&self, src: usize, dst: usize) -> bool {
        if !self.contains(src) || !self.contains(dst) {
            return false;
        }
        let mut visited = vec![false; self.vertices];
        let mut stack = vec![src];
        while let Some(u) = stack.pop() {
            if u == dst {
                return true;
            }
            if visited[u] {
                continue;
            }
            visited[u] = true;
            stack.extend(self.adj[u].iter().copied().filter(|&v| !visited[v]));
        }
        false
    }

    /// 三色标记：在“访问中”的顶点上再次到达即存在环
    pub fn detect_cycle_directed(&self) -> bool {
        fn visit(g: &Graph, u: usize, color: &mut [Color]) -> bool {
            color[u] = Color::Visiting;
            for &v in &g.adj[u] {
                let state = color[v];
                match state {
                    Color::Visiting => return true,
                    Color::Unvisited if visit(g, v, color) => return true,
                    _ => {}
                }
            }
            color[u] = Color::Visited;
            false
        }

        let mut color = vec![Color::Unvisited; self.vertices];
        (0..self.vertices).any(|u| color[u] == Color::Unvisited && visit(self, u, &mut color))
    }

    pub fn bfs_traversal(&self, start: usize) -> Vec<usize> {
        self.bfs_level_order(start).into_iter().flatten().collect()
    }

    /// 返回路径与边数；`src == dst` 时为 `([src], 0)`
    pub fn bfs_shortest_path(&self, src: usize, dst: usize) -> Option<(Vec<usize>, usize)> {
        if !self.contains(src) || !self.contains(dst) {
            return None;
        }
        let mut parent: Vec<Option<usize>> = vec![None; self.vertices];
        let mut visited = vec![false; self.vertices];
        let mut queue = VecDeque::from([src]);
        visited[src] = true;

        while let Some(u) = queue.pop_front() {
            if u == dst {
                let mut path = vec![dst];
                let mut cur = dst;
                while let Some(p) = parent[cur] {
                    path.push(p);
                    cur = p;
                }
                path.reverse();
                let edges = path.len() - 1;
                return Some((path, edges));
            }
            for &v in &self.adj[u] {
                if !visited[v] {
                    visited[v] = true;
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
        None
    }

    pub fn bfs_level_order(&self, start: usize) -> Vec<Vec<usize>> {
        let mut levels = Vec::new();
        if !self.contains(start) {
            return levels;
        }
        let mut visited = vec![false; self.vertices];
        let mut frontier = vec![start];
        visited[start] = true;
        while !frontier.is_empty() {
            let mut next = Vec::new();
            for &u in &frontier {
                for &v in &self.adj[u] {
                    if !visited[v] {
                        visited[v] = true;
                        next.push(v);
                    }
                }
            }
            levels.push(frontier);
            frontier = next;
        }
        levels
    }

    pub fn has_path_bfs(&self, src: usize, dst: usize) -> bool {
        self.bfs_shortest_path(src, dst).is_some()
    }

    /// 逐个连通分量做二染色
    pub fn is_bipartite(&self) -> bool {
        let mut color: Vec<Option<bool>> = vec![None; self.vertices];
        for start in 0..self.vertices {
            if color[start].is_some() {
                continue;
            }
            color[start] = Some(true);
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                let side = color[u] == Some(true);
                for &v in &self.adj[u] {
                    match color[v] {
                        None => {
                            color[v] = Some(!side);
                            queue.push_back(v);
                        }
                        Some(c) if c == side => return false,
                        Some(_) => {}
                    }
                }
            }
        }
        true
    }
}

const DIRECTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

fn step(grid: &[Vec<u8>], (r, c): (usize, usize), (dr, dc): (isize, isize)) -> Option<(usize, usize)> {
    let r = r.checked_add_signed(dr)?;
    let c = c.checked_add_signed(dc)?;
    let row = grid.get(r)?;
    (c < row.len()).then_some((r, c))
}

fn open(grid: &[Vec<u8>], (r, c): (usize, usize)) -> bool {
    grid.get(r).and_then(|row| row.get(c)).is_some_and(|&cell| cell == 1)
}

/// 四连通的陆地块数，`1` 为陆地
pub fn count_islands(grid: &[Vec<u8>]) -> usize {
    let mut visited: Vec<Vec<bool>> = grid.iter().map(|row| vec![false; row.len()]).collect();
    let mut islands = 0;
    for r in 0..grid.len() {
        for c in 0..grid[r].len() {
            if grid[r][c] != 1 || visited[r][c] {
                continue;
            }
            islands += 1;
            let mut stack = vec![(r, c)];
            visited[r][c] = true;
            while let Some(cell) = stack.pop() {
                for dir in DIRECTIONS {
                    if let Some(next) = step(grid, cell, dir) {
                        if open(grid, next) && !visited[next.0][next.1] {
                            visited[next.0][next.1] = true;
                            stack.push(next);
                        }
                    }
                }
            }
        }
    }
    islands
}

/// 网格上从 `start` 到 `end` 的最少步数，起点或终点被阻塞时为 `None`
pub fn bfs_matrix(grid: &[Vec<u8>], start: (usize, usize), end: (usize, usize)) -> Option<usize> {
    if !open(grid, start) || !open(grid, end) {
        return None;
    }
    let mut visited: Vec<Vec<bool>> = grid.iter().map(|row| vec![false; row.len()]).collect();
    let mut queue = VecDeque::from([(start, 0usize)]);
    visited[start.0][start.1] = true;
    while let Some((cell, dist)) = queue.pop_front() {
        if cell == end {
            return Some(dist);
        }
        for dir in DIRECTIONS {
            if let Some(next) = step(grid, cell, dir) {
                if open(grid, next) && !visited[next.0][next.1] {
                    visited[next.0][next.1] = true;
                    queue.push_back((next, dist + 1));
                }
            }
        }
    }
    None
}

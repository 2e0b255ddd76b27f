// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 基于下标的单链表。节点存放在 `Vec` 中，`next` 是另一个节点的下标，
//! 因此可以安全地构造出带环的链表，用来演示快慢指针。

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListNode<T> {
    pub value: T,
    pub next: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ListArena<T> {
    nodes: Vec<ListNode<T>>,
}

impl<T> ListArena<T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// 新增一个孤立节点，返回其下标
    pub fn push(&mut self, value: T) -> usize {
        self.nodes.push(ListNode { value, next: None });
        self.nodes.len() - 1
    }

    /// 令 `from.next = to`。下标越界时不做任何事
    pub fn link(&mut self, from: usize, to: usize) {
        if to < self.nodes.len() {
            if let Some(node) = self.nodes.get_mut(from) {
                node.next = Some(to);
            }
        }
    }

    /// 依次连接的链表，返回表头
    pub fn from_values<I: IntoIterator<Item = T>>(values: I) -> (Self, Option<usize>) {
        let mut arena = Self::new();
        let mut prev: Option<usize> = None;
        let mut head = None;
        for value in values {
            let id = arena.push(value);
            match prev {
                Some(p) => arena.link(p, id),
                None => head = Some(id),
            }
            prev = Some(id);
        }
        (arena, head)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: usize) -> Option<&ListNode<T>> {
        self.nodes.get(id)
    }

    fn next(&self, id: usize) -> Option<usize> {
        self.nodes.get(id).and_then(|n| n.next)
    }

    /// Floyd 判环：快指针每次两步，慢指针每次一步，相遇即有环
    pub fn has_cycle(&self, head: Option<usize>) -> bool {
        let (mut slow, mut fast) = (head, head);
        while let Some(f) = fast {
            fast = match self.next(f) {
                Some(n) => self.next(n),
                None => return false,
            };
            slow = slow.and_then(|s| self.next(s));
            if fast.is_some() && fast == slow {
                return true;
            }
        }
        false
    }

    /// 偶数长度时返回第二个中间节点；带环链表没有中点，返回 `None`
    pub fn find_middle(&self, head: Option<usize>) -> Option<usize> {
        if self.has_cycle(head) {
            return None;
        }
        let (mut slow, mut fast) = (head?, head);
        while let Some(n) = fast.and_then(|f| self.next(f)) {
            slow = self.next(slow)?;
            fast = self.next(n);
        }
        Some(slow)
    }
}

impl<T: Clone> ListArena<T> {
    /// 从 `head` 开始收集值，最多走 `len()` 步，带环链表也会终止
    pub fn values_from(&self, head: Option<usize>) -> Vec<T> {
        let mut values = Vec::new();
        let mut cur = head;
        while let Some(id) = cur {
            if values.len() >= self.nodes.len() {
                break;
            }
            match self.nodes.get(id) {
                Some(node) => {
                    values.push(node.value.clone());
                    cur = node.next;
                }
                None => break,
            }
        }
        values
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 队列
//!
//! - [`Queue`]：先进先出队列；
//! - [`CircularQueue`]：定长环形缓冲区，满时拒绝入队并把值交还调用方；
//! - [`Deque`]：双端队列；
//! - [`PriorityQueue`] / [`MaxPriorityQueue`]：二叉堆优先队列，共用同一份堆实现，
//!   只是比较方向不同。
//!
//! 堆以数组存储：下标 `i` 的父节点为 `(i - 1) / 2`，子节点为 `2i + 1` 和 `2i + 2`。
//! 对每个 `i > 0`，父节点在队列顺序上都不晚于 `i`。

use std::cmp::Ordering;
use std::collections::VecDeque;
use std::marker::PhantomData;

#[derive(Debug, Clone, Default)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, value: T) {
        self.items.push_back(value);
    }

    pub fn dequeue(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn back(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[derive(Debug, Clone)]
pub struct CircularQueue<T> {
    slots: Vec<Option<T>>,
    head: usize,
    len: usize,
}

impl<T> CircularQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: std::iter::repeat_with(|| None).take(capacity).collect(),
            head: 0,
            len: 0,
        }
    }

    /// 队列已满时返回 `Err(value)`
    pub fn enqueue(&mut self, value: T) -> Result<(), T> {
        if self.is_full() {
            return Err(value);
        }
        let tail = (self.head + self.len) % self.slots.len();
        self.slots[tail] = Some(value);
        self.len += 1;
        Ok(())
    }

    pub fn dequeue(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let value = self.slots[self.head].take();
        self.head = (self.head + 1) % self.slots.len();
        self.len -= 1;
        value
    }

    pub fn front(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        self.slots[self.head].as_ref()
    }

    pub fn rear(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let tail = (self.head + self.len - 1) % self.slots.len();
        self.slots[tail].as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Deque<T> {
    items: VecDeque<T>,
}

impl<T> Deque<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn push_front(&mut self, value: T) {
        self.items.push_front(value);
    }

    pub fn push_back(&mut self, value: T) {
        self.items.push_back(value);
    }

    pub fn pop_front(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<T> {
        self.items.pop_back()
    }

    pub fn peek_front(&self) -> Option<&T> {
        self.items.front()
    }

    pub fn peek_back(&self) -> Option<&T> {
        self.items.back()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// 决定堆顶元素的比较方向
pub trait HeapOrder {
    /// `a` 是否应排在 `b` 之前（更靠近堆顶）
    fn before<T: Ord>(a: &T, b: &T) -> bool;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinFirst;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxFirst;

impl HeapOrder for MinFirst {
    fn before<T: Ord>(a: &T, b: &T) -> bool {
        a.cmp(b) == Ordering::Less
    }
}

impl HeapOrder for MaxFirst {
    fn before<T: Ord>(a: &T, b: &T) -> bool {
        a.cmp(b) == Ordering::Greater
    }
}

#[derive(Debug, Clone)]
pub struct BinaryHeapQueue<T, O> {
    items: Vec<T>,
    order: PhantomData<O>,
}

/// 小顶堆
pub type PriorityQueue<T> = BinaryHeapQueue<T, MinFirst>;
/// 大顶堆
pub type MaxPriorityQueue<T> = BinaryHeapQueue<T, MaxFirst>;

impl<T: Ord, O: HeapOrder> Default for BinaryHeapQueue<T, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord, O: HeapOrder> BinaryHeapQueue<T, O> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            order: PhantomData,
        }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.sift_up(self.items.len() - 1);
    }

    /// 堆顶与末尾交换后移除，再从根开始下沉
    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let top = self.items.pop();
        self.sift_down(0);
        top
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 按出队顺序返回全部元素
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Some(v) = self.pop() {
            out.push(v);
        }
        out
    }

    /// 堆序性质是否成立
    pub fn is_valid_heap(&self) -> bool {
        (1..self.items.len()).all(|i| !O::before(&self.items[i], &self.items[(i - 1) / 2]))
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if !O::before(&self.items[idx], &self.items[parent]) {
                break;
            }
            self.items.swap(idx, parent);
            idx = parent;
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut first = idx;
            if left < len && O::before(&self.items[left], &self.items[first]) {
                first = left;
            }
            if right < len && O::before(&self.items[right], &self.items[first]) {
                first = right;
            }
            if first == idx {
                return;
            }
            self.items.swap(idx, first);
            idx = first;
        }
    }
}

impl<T: Ord, O: HeapOrder> FromIterator<T> for BinaryHeapQueue<T, O> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        for v in iter {
            heap.push(v);
        }
        heap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_queue_fifo() {
        let mut q = Queue::new();
        q.enqueue("a");
        q.enqueue("b");
        assert_eq!(q.front(), Some(&"a"));
        assert_eq!(q.back(), Some(&"b"));
        assert_eq!(q.dequeue(), Some("a"));
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
        assert_eq!(q.dequeue(), None);
    }

    #[test]
    fn test_circular_queue_wraps() {
        let mut q = CircularQueue::new(3);
        assert_eq!(q.capacity(), 3);
        assert!(q.enqueue(1).is_ok());
        assert!(q.enqueue(2).is_ok());
        assert!(q.enqueue(3).is_ok());
        assert!(q.is_full());
        assert_eq!(q.enqueue(4), Err(4));
        assert_eq!(q.rear(), Some(&3));
        assert_eq!(q.dequeue(), Some(1));
        assert!(q.enqueue(4).is_ok());
        assert_eq!(q.front(), Some(&2));
        assert_eq!(q.rear(), Some(&4));
        assert_eq!(q.len(), 3);

        let mut zero: CircularQueue<u8> = CircularQueue::new(0);
        assert!(zero.is_full());
        assert_eq!(zero.enqueue(1), Err(1));
        assert_eq!(zero.dequeue(), None);
    }

    #[test]
    fn test_deque() {
        let mut d = Deque::new();
        d.push_back(2);
        d.push_front(1);
        d.push_back(3);
        assert_eq!(d.peek_front(), Some(&1));
        assert_eq!(d.peek_back(), Some(&3));
        assert_eq!(d.pop_back(), Some(3));
        assert_eq!(d.pop_front(), Some(1));
        assert_eq!(d.len(), 1);
        assert!(!d.is_empty());
    }

    #[test]
    fn test_priority_queues() {
        let mut min = PriorityQueue::new();
        let mut max = MaxPriorityQueue::new();
        for v in [5, 3, 8, 1, 9, 2] {
            min.push(v);
            max.push(v);
        }
        assert_eq!(min.peek(), Some(&1));
        assert_eq!(max.peek(), Some(&9));
        assert_eq!(min.pop(), Some(1));
        assert_eq!(max.pop(), Some(9));
        assert_eq!(min.into_sorted_vec(), vec![2, 3, 5, 8, 9]);
        assert_eq!(max.into_sorted_vec(), vec![8, 5, 3, 2, 1]);
        assert_eq!(PriorityQueue::<i32>::new().pop(), None);
    }

    proptest! {
        #[test]
        fn prop_heap_order_holds(values in prop::collection::vec(any::<i16>(), 0..80), pops in 0usize..40) {
            let mut min: PriorityQueue<i16> = values.iter().copied().collect();
            let mut max: MaxPriorityQueue<i16> = values.iter().copied().collect();
            prop_assert!(min.is_valid_heap());
            prop_assert!(max.is_valid_heap());
            for _ in 0..pops {
                min.pop();
                max.pop();
                prop_assert!(min.is_valid_heap());
                prop_assert!(max.is_valid_heap());
            }

            let mut expected = values.clone();
            expected.sort();
            let drained = min.len();
            prop_assert_eq!(min.into_sorted_vec(), expected[values.len() - drained..].to_vec());
            let mut descending = values;
            descending.sort_by(|a, b| b.cmp(a));
            let remaining = max.len();
            prop_assert_eq!(max.into_sorted_vec(), descending[descending.len() - remaining..].to_vec());
        }
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 栈
//!
//! [`Stack`] 是对 `Vec` 的薄封装，[`MinStack`] 额外维护一个最小值辅助栈。
//! 后半部分是栈的几个典型应用：括号匹配、逆波兰表达式求值，以及单调栈
//! （每日温度、下一个更大元素、柱状图最大矩形）。

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.last()
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

/// 常数时间取最小值的栈。新值不大于当前最小值时同时压入辅助栈，重复的最小值也会压入。
#[derive(Debug, Clone, Default)]
pub struct MinStack<T> {
    items: Vec<T>,
    mins: Vec<T>,
}

impl<T: Ord + Clone> MinStack<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            mins: Vec::new(),
        }
    }

    pub fn push(&mut self, value: T) {
        if self.mins.last().map_or(true, |min| value <= *min) {
            self.mins.push(value.clone());
        }
        self.items.push(value);
    }

    pub fn pop(&mut self) -> Option<T> {
        let value = self.items.pop()?;
        if self.mins.last() == Some(&value) {
            self.mins.pop();
        }
        Some(value)
    }

    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    pub fn min(&self) -> Option<&T> {
        self.mins.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// 只检查 `()[]{}`，其他字符忽略
pub fn is_valid_parentheses(s: &str) -> bool {
    let mut stack = Stack::new();
    for c in s.chars() {
        match c {
            '(' | '[' | '{' => stack.push(c),
            ')' | ']' | '}' => {
                let expected = match c {
                    ')' => '(',
                    ']' => '[',
                    _ => '{',
                };
                if stack.pop() != Some(expected) {
                    return false;
                }
            }
            _ => {}
        }
    }
    stack.is_empty()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpnError {
    Empty,
    StackUnderflow,
    DivisionByZero,
    /// 运算结果超出 `i64`
    Overflow(String),
    InvalidToken(String),
    LeftoverOperands(usize),
}

impl fmt::Display for RpnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpnError::Empty => write!(f, "empty expression"),
            RpnError::StackUnderflow => write!(f, "operator is missing operands"),
            RpnError::DivisionByZero => write!(f, "division by zero"),
            RpnError::Overflow(expr) => write!(f, "integer overflow: {}", expr),
            RpnError::InvalidToken(t) => write!(f, "invalid token: {}", t),
            RpnError::LeftoverOperands(n) => write!(f, "{} operands left on the stack", n),
        }
    }
}

impl std::error::Error for RpnError {}

/// 逆波兰表达式求值，除法向零取整
pub fn evaluate_rpn(tokens: &[&str]) -> Result<i64, RpnError> {
    if tokens.is_empty() {
        return Err(RpnError::Empty);
    }
    let mut stack: Stack<i64> = Stack::new();
    for &token in tokens {
        match token {
            "+" | "-" | "*" | "/" => {
                let b = stack.pop().ok_or(RpnError::StackUnderflow)?;
                let a = stack.pop().ok_or(RpnError::StackUnderflow)?;
                if token == "/" && b == 0 {
                    return Err(RpnError::DivisionByZero);
                }
                let value = match token {
                    "+" => a.checked_add(b),
                    "-" => a.checked_sub(b),
                    "*" => a.checked_mul(b),
                    _ => a.checked_div(b),
                };
                let value =
                    value.ok_or_else(|| RpnError::Overflow(format!("{} {} {}", a, token, b)))?;
                stack.push(value);
            }
            _ => {
                let n = token
                    .parse::<i64>()
                    .map_err(|_| RpnError::InvalidToken(token.to_string()))?;
                stack.push(n);
            }
        }
    }
    match stack.len() {
        1 => stack.pop().ok_or(RpnError::Empty),
        n => Err(RpnError::LeftoverOperands(n)),
    }
}

/// 每一天要再等几天才会更暖，之后不再升温则为 0
pub fn daily_temperatures(temps: &[i32]) -> Vec<usize> {
    let mut answer = vec![0; temps.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, &t) in temps.iter().enumerate() {
        while let Some(&top) = stack.last() {
            if temps[top] >= t {
                break;
            }
            answer[top] = i - top;
            stack.pop();
        }
        stack.push(i);
    }
    answer
}

/// 右侧第一个严格更大的元素
pub fn next_greater_element<T: Ord + Clone>(nums: &[T]) -> Vec<Option<T>> {
    let mut answer = vec![None; nums.len()];
    let mut stack: Vec<usize> = Vec::new();
    for (i, n) in nums.iter().enumerate() {
        while let Some(&top) = stack.last() {
            if nums[top] >= *n {
                break;
            }
            answer[top] = Some(n.clone());
            stack.pop();
        }
        stack.push(i);
    }
    answer
}

/// 单调递增栈，末尾补一个高度 0 的哨兵把栈清空
pub fn largest_rectangle_in_histogram(heights: &[u64]) -> u64 {
    let mut stack: Vec<usize> = Vec::new();
    let mut best = 0;
    for i in 0..=heights.len() {
        let h = heights.get(i).copied().unwrap_or(0);
        while let Some(&top) = stack.last() {
            if heights[top] <= h {
                break;
            }
            stack.pop();
            let width = match stack.last() {
                Some(&left) => i - left - 1,
                None => i,
            };
            best = best.max(heights[top] * width as u64);
        }
        stack.push(i);
    }
    best
}

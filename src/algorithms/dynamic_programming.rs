// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 经典动态规划题目。字符串按 `char` 比较，多字节字符算作一个位置。

use std::collections::{HashMap, HashSet};

/// `u64` 能容纳的最大斐波那契下标，F(93) = 12200160415121876738
pub const MAX_FIBONACCI_INDEX: usize = 93;

/// 自底向上填表；超出 `u64` 时为 `None`
pub fn fibonacci(n: usize) -> Option<u64> {
    if n <= 1 {
        return Some(n as u64);
    }
    if n > MAX_FIBONACCI_INDEX {
        return None;
    }
    let mut dp = vec![0u64; n + 1];
    dp[1] = 1;
    for i in 2..=n {
        dp[i] = dp[i - 1].checked_add(dp[i - 2])?;
    }
    Some(dp[n])
}

/// 只保留前两项，O(1) 空间
pub fn fibonacci_optimized(n: usize) -> Option<u64> {
    if n <= 1 {
        return Some(n as u64);
    }
    let (mut prev2, mut prev1) = (0u64, 1u64);
    for _ in 2..=n {
        let cur = prev1.checked_add(prev2)?;
        prev2 = prev1;
        prev1 = cur;
    }
    Some(prev1)
}

/// 自顶向下，结果缓存在调用方提供的表里
pub fn fibonacci_memo(n: usize, memo: &mut HashMap<usize, u64>) -> Option<u64> {
    if n <= 1 {
        return Some(n as u64);
    }
    if n > MAX_FIBONACCI_INDEX {
        return None;
    }
    if let Some(&v) = memo.get(&n) {
        return Some(v);
    }
    let v = fibonacci_memo(n - 1, memo)?.checked_add(fibonacci_memo(n - 2, memo)?)?;
    memo.insert(n, v);
    Some(v)
}

/// 每次走一级或两级
pub fn climbing_stairs(n: usize) -> Option<u64> {
    if n <= 2 {
        return Some(n as u64);
    }
    let (mut prev2, mut prev1) = (1u64, 2u64);
    for _ in 3..=n {
        let cur = prev1.checked_add(prev2)?;
        prev2 = prev1;
        prev1 = cur;
    }
    Some(prev1)
}

/// 凑出 `amount` 所需的最少硬币数，凑不出时为 `None`
pub fn coin_change(coins: &[usize], amount: usize) -> Option<usize> {
    let mut dp: Vec<Option<usize>> = vec![None; amount + 1];
    dp[0] = Some(0);
    for a in 1..=amount {
        dp[a] = coins
            .iter()
            .filter(|&&c| c > 0 && c <= a)
            .filter_map(|&c| dp[a - c])
            .min()
            .map(|n| n + 1);
    }
    dp[amount]
}

/// 严格递增子序列的最大长度
pub fn longest_increasing_subsequence(nums: &[i64]) -> usize {
    let mut dp = vec![1usize; nums.len()];
    for i in 1..nums.len() {
        for j in 0..i {
            if nums[j] < nums[i] {
                dp[i] = dp[i].max(dp[j] + 1);
            }
        }
    }
    dp.into_iter().max().unwrap_or(0)
}

pub fn longest_common_subsequence(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }
    dp[a.len()][b.len()]
}

/// 插入、删除、替换各计一步
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut dp = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        dp[0][j] = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            dp[i][j] = if a[i - 1] == b[j - 1] {
                dp[i - 1][j - 1]
            } else {
                1 + dp[i - 1][j].min(dp[i][j - 1]).min(dp[i - 1][j - 1])
            };
        }
    }
    dp[a.len()][b.len()]
}

/// 0-1 背包。`weights` 与 `values` 按较短者对齐
pub fn knapsack_01(weights: &[usize], values: &[u64], capacity: usize) -> u64 {
    let mut dp = vec![0u64; capacity + 1];
    for (&w, &v) in weights.iter().zip(values) {
        for c in (w..=capacity).rev() {
            dp[c] = dp[c].max(dp[c - w] + v);
        }
    }
    dp[capacity]
}

/// m×n 网格从左上到右下、只向右或向下的路径数
pub fn unique_paths(m: usize, n: usize) -> Option<u64> {
    if m == 0 || n == 0 {
        return Some(0);
    }
    // 路径数对称，按较短的一边开行
    let (rows, cols) = (m.max(n), m.min(n));
    if cols == 1 {
        return Some(1);
    }
    let mut row = vec![1u64; cols];
    for _ in 1..rows {
        for j in 1..cols {
            row[j] = row[j].checked_add(row[j - 1])?;
        }
    }
    Some(row[cols - 1])
}

/// 不能同时取相邻两项时的最大和
pub fn house_robber(nums: &[u64]) -> u64 {
    let (mut skip, mut take) = (0u64, 0u64);
    for &n in nums {
        let next_take = skip + n;
        skip = skip.max(take);
        take = next_take;
    }
    skip.max(take)
}

/// Kadane 算法，空输入为 `None`
pub fn max_sub_array(nums: &[i64]) -> Option<i64> {
    let (&first, rest) = nums.split_first()?;
    let (mut cur, mut best) = (first, first);
    for &n in rest {
        cur = n.max(cur + n);
        best = best.max(cur);
    }
    Some(best)
}

pub fn word_break(s: &str, words: &[&str]) -> bool {
    let dict: HashSet<&str> = words.iter().copied().collect();
    // 只在字符边界上切分
    let bounds: Vec<usize> = s
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(s.len()))
        .collect();
    let mut dp = vec![false; bounds.len()];
    dp[0] = true;
    for i in 1..bounds.len() {
        dp[i] = (0..i).any(|j| dp[j] && dict.contains(&s[bounds[j]..bounds[i]]));
    }
    dp[bounds.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fibonacci_variants() {
        let expected = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55];
        let mut memo = HashMap::new();
        for (n, &want) in expected.iter().enumerate() {
            assert_eq!(fibonacci(n), Some(want));
            assert_eq!(fibonacci_optimized(n), Some(want));
            assert_eq!(fibonacci_memo(n, &mut memo), Some(want));
        }
        assert_eq!(fibonacci_optimized(90), Some(2_880_067_194_370_816_120));
    }

    #[test]
    fn test_fibonacci_u64_boundary() {
        let largest = Some(12_200_160_415_121_876_738);
        let mut memo = HashMap::new();
        assert_eq!(fibonacci(MAX_FIBONACCI_INDEX), largest);
        assert_eq!(fibonacci_optimized(MAX_FIBONACCI_INDEX), largest);
        assert_eq!(fibonacci_memo(MAX_FIBONACCI_INDEX, &mut memo), largest);

        assert_eq!(fibonacci(94), None);
        assert_eq!(fibonacci_optimized(94), None);
        assert_eq!(fibonacci_memo(94, &mut memo), None);
        assert_eq!(fibonacci(usize::MAX), None);
        assert_eq!(fibonacci_optimized(usize::MAX), None);
    }

    #[test]
    fn test_climbing_stairs() {
        assert_eq!(climbing_stairs(0), Some(0));
        assert_eq!(climbing_stairs(1), Some(1));
        assert_eq!(climbing_stairs(2), Some(2));
        assert_eq!(climbing_stairs(5), Some(8));
        // climbing_stairs(n) == F(n + 1)
        assert_eq!(climbing_stairs(92), fibonacci(93));
        assert_eq!(climbing_stairs(93), None);
    }

    #[test]
    fn test_coin_change() {
        assert_eq!(coin_change(&[1, 2, 5], 11), Some(3));
        assert_eq!(coin_change(&[2], 3), None);
        assert_eq!(coin_change(&[1], 0), Some(0));
        assert_eq!(coin_change(&[], 7), None);
    }

    #[test]
    fn test_subsequences() {
        assert_eq!(longest_increasing_subsequence(&[10, 9, 2, 5, 3, 7, 101, 18]), 4);
        assert_eq!(longest_increasing_subsequence(&[7, 7, 7]), 1);
        assert_eq!(longest_increasing_subsequence(&[]), 0);
        assert_eq!(longest_common_subsequence("abcde", "ace"), 3);
        assert_eq!(longest_common_subsequence("abc", "def"), 0);
        assert_eq!(longest_common_subsequence("算法学习", "学习算法"), 2);
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("horse", "ros"), 3);
        assert_eq!(edit_distance("intention", "execution"), 5);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("café", "cafe"), 1);
    }

    #[test]
    fn test_knapsack_and_paths() {
        assert_eq!(knapsack_01(&[1, 3, 4, 5], &[1, 4, 5, 7], 7), 9);
        assert_eq!(knapsack_01(&[10], &[100], 5), 0);
        assert_eq!(unique_paths(3, 7), Some(28));
        assert_eq!(unique_paths(7, 3), Some(28));
        assert_eq!(unique_paths(1, 1), Some(1));
        assert_eq!(unique_paths(0, 4), Some(0));
        assert_eq!(unique_paths(1, usize::MAX), Some(1));
        // C(66, 33) 仍在 u64 内，C(68, 34) 超出
        assert_eq!(unique_paths(34, 34), Some(7_219_428_434_016_265_740));
        assert_eq!(unique_paths(35, 35), None);
    }

    #[test]
    fn test_house_robber_and_kadane() {
        assert_eq!(house_robber(&[2, 7, 9, 3, 1]), 12);
        assert_eq!(house_robber(&[]), 0);
        assert_eq!(max_sub_array(&[-2, 1, -3, 4, -1, 2, 1, -5, 4]), Some(6));
        assert_eq!(max_sub_array(&[-3, -1, -2]), Some(-1));
        assert_eq!(max_sub_array(&[]), None);
    }

    #[test]
    fn test_word_break() {
        assert!(word_break("leetcode", &["leet", "code"]));
        assert!(word_break("applepenapple", &["apple", "pen"]));
        assert!(!word_break("catsandog", &["cats", "dog", "sand", "and", "cat"]));
        assert!(word_break("", &[]));
        assert!(word_break("你好世界", &["你好", "世界"]));
    }
}

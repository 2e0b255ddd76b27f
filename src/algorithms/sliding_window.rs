// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 滑动窗口
//!
//! 固定窗口与可变窗口两类题目。字符串题目都先转成 `Vec<char>`，返回的下标和长度都以字符计。

use std::collections::{HashMap, VecDeque};

/// 长度为 `k` 的子数组的最大和，`k` 为 0 或大于长度时为 `None`
pub fn max_sum_subarray(nums: &[i64], k: usize) -> Option<i64> {
    if k == 0 || k > nums.len() {
        return None;
    }
    let mut sum: i64 = nums[..k].iter().sum();
    let mut best = sum;
    for i in k..nums.len() {
        sum += nums[i] - nums[i - k];
        best = best.max(sum);
    }
    Some(best)
}

/// 和不小于 `target` 的最短子数组长度，不存在时为 0。元素应为正数
pub fn min_subarray_len(target: u64, nums: &[u64]) -> usize {
    let (mut left, mut sum, mut best) = (0, 0u64, usize::MAX);
    for (right, &n) in nums.iter().enumerate() {
        sum += n;
        while sum >= target && left <= right {
            best = best.min(right - left + 1);
            sum -= nums[left];
            left += 1;
        }
    }
    if best == usize::MAX {
        0
    } else {
        best
    }
}

pub fn length_of_longest_substring(s: &str) -> usize {
    let mut last_seen: HashMap<char, usize> = HashMap::new();
    let (mut left, mut best) = (0, 0);
    for (right, c) in s.chars().enumerate() {
        if let Some(&prev) = last_seen.get(&c) {
            if prev >= left {
                left = prev + 1;
            }
        }
        last_seen.insert(c, right);
        best = best.max(right - left + 1);
    }
    best
}

/// 最多把 `k` 个 0 翻成 1 后最长的连续 1
pub fn max_consecutive_ones(nums: &[u8], k: usize) -> usize {
    let (mut left, mut zeros, mut best) = (0, 0, 0);
    for right in 0..nums.len() {
        if nums[right] == 0 {
            zeros += 1;
        }
        while zeros > k {
            if nums[left] == 0 {
                zeros -= 1;
            }
            left += 1;
        }
        best = best.max(right - left + 1);
    }
    best
}

/// 最多替换 `k` 个字符后，由同一字符构成的最长子串
pub fn character_replacement(s: &str, k: usize) -> usize {
    let chars: Vec<char> = s.chars().collect();
    let mut counts: HashMap<char, usize> = HashMap::new();
    let (mut left, mut max_count, mut best) = (0, 0, 0);
    for right in 0..chars.len() {
        let count = counts.entry(chars[right]).or_insert(0);
        *count += 1;
        max_count = max_count.max(*count);
        // 窗口只平移不收缩，max_count 无需回退
        if right - left + 1 - max_count > k {
            if let Some(c) = counts.get_mut(&chars[left]) {
                *c -= 1;
            }
            left += 1;
        }
        best = best.max(right - left + 1);
    }
    best
}

/// `p` 的所有异位词在 `s` 中的起始下标
pub fn find_anagrams(s: &str, p: &str) -> Vec<usize> {
    let s: Vec<char> = s.chars().collect();
    let p: Vec<char> = p.chars().collect();
    let mut result = Vec::new();
    if p.is_empty() || s.len() < p.len() {
        return result;
    }

    let mut need: HashMap<char, i64> = HashMap::new();
    for &c in &p {
        *need.entry(c).or_insert(0) += 1;
    }
    let mut window: HashMap<char, i64> = HashMap::new();
    for (i, &c) in s.iter().enumerate() {
        *window.entry(c).or_insert(0) += 1;
        if i >= p.len() {
            let out = s[i - p.len()];
            if let Some(n) = window.get_mut(&out) {
                *n -= 1;
                if *n == 0 {
                    window.remove(&out);
                }
            }
        }
        if i + 1 >= p.len() && window == need {
            result.push(i + 1 - p.len());
        }
    }
    result
}

/// `s` 中包含 `t` 全部字符（计重数）的最短子串，不存在时为空串
pub fn min_window_substring(s: &str, t: &str) -> String {
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();
    if s.is_empty() || t.is_empty() || s.len() < t.len() {
        return String::new();
    }

    let mut need: HashMap<char, usize> = HashMap::new();
    for &c in &t {
        *need.entry(c).or_insert(0) += 1;
    }
    let required = need.len();
    let mut have: HashMap<char, usize> = HashMap::new();
    let (mut formed, mut left) = (0, 0);
    let mut best: Option<(usize, usize)> = None;

    for right in 0..s.len() {
        let c = s[right];
        let count = have.entry(c).or_insert(0);
        *count += 1;
        if need.get(&c) == Some(&*count) {
            formed += 1;
        }
        while formed == required {
            if best.map_or(true, |(_, len)| right - left + 1 < len) {
                best = Some((left, right - left + 1));
            }
            let out = s[left];
            if let Some(n) = have.get_mut(&out) {
                *n -= 1;
                if need.get(&out).is_some_and(|want| *n < *want) {
                    formed -= 1;
                }
            }
            left += 1;
        }
    }
    best.map(|(start, len)| s[start..start + len].iter().collect())
        .unwrap_or_default()
}

/// 单调双端队列：队内下标都在当前窗口中，对应的值从队首到队尾严格递减
pub fn sliding_window_maximum<T: Ord + Clone>(nums: &[T], k: usize) -> Vec<T> {
    let mut result = Vec::new();
    if k == 0 || k > nums.len() {
        return result;
    }
    let mut deque: VecDeque<usize> = VecDeque::with_capacity(k);
    for i in 0..nums.len() {
        while deque.front().is_some_and(|&front| front + k <= i) {
            deque.pop_front();
        }
        while deque.back().is_some_and(|&back| nums[back] <= nums[i]) {
            deque.pop_back();
        }
        deque.push_back(i);
        if i + 1 >= k {
            if let Some(&front) = deque.front() {
                result.push(nums[front].clone());
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fixed_window_sum() {
        assert_eq!(max_sum_subarray(&[2, 1, 5, 1, 3, 2], 3), Some(9));
        assert_eq!(max_sum_subarray(&[-1, -2], 1), Some(-1));
        assert_eq!(max_sum_subarray(&[1, 2], 0), None);
        assert_eq!(max_sum_subarray(&[1, 2], 3), None);
    }

    #[test]
    fn test_min_subarray_len() {
        assert_eq!(min_subarray_len(7, &[2, 3, 1, 2, 4, 3]), 2);
        assert_eq!(min_subarray_len(100, &[1, 2, 3]), 0);
        assert_eq!(min_subarray_len(4, &[1, 4, 4]), 1);
    }

    #[test]
    fn test_longest_substring() {
        assert_eq!(length_of_longest_substring("abcabcbb"), 3);
        assert_eq!(length_of_longest_substring("bbbbb"), 1);
        assert_eq!(length_of_longest_substring("pwwkew"), 3);
        assert_eq!(length_of_longest_substring(""), 0);
        assert_eq!(length_of_longest_substring("abba"), 2);
    }

    #[test]
    fn test_flips_and_replacements() {
        assert_eq!(max_consecutive_ones(&[1, 1, 1, 0, 0, 0, 1, 1, 1, 1, 0], 2), 6);
        assert_eq!(max_consecutive_ones(&[0, 0], 0), 0);
        assert_eq!(character_replacement("ABAB", 2), 4);
        assert_eq!(character_replacement("AABABBA", 1), 4);
        assert_eq!(character_replacement("aab!", 0), 2);
    }

    #[test]
    fn test_find_anagrams() {
        assert_eq!(find_anagrams("cbaebabacd", "abc"), vec![0, 6]);
        assert_eq!(find_anagrams("abab", "ab"), vec![0, 1, 2]);
        assert!(find_anagrams("a", "ab").is_empty());
        assert!(find_anagrams("abc", "").is_empty());
    }

    #[test]
    fn test_min_window_substring() {
        assert_eq!(min_window_substring("ADOBECODEBANC", "ABC"), "BANC");
        assert_eq!(min_window_substring("a", "a"), "a");
        assert_eq!(min_window_substring("a", "aa"), "");
        assert_eq!(min_window_substring("aa", "aa"), "aa");
    }

    #[test]
    fn test_sliding_window_maximum() {
        assert_eq!(
            sliding_window_maximum(&[1, 3, -1, -3, 5, 3, 6, 7], 3),
            vec![3, 3, 5, 5, 6, 7]
        );
        assert_eq!(sliding_window_maximum(&[4, 4, 4], 2), vec![4, 4]);
        assert!(sliding_window_maximum::<i32>(&[], 3).is_empty());
        assert!(sliding_window_maximum(&[1, 2], 0).is_empty());
        assert!(sliding_window_maximum(&[1, 2], 3).is_empty());
    }

    proptest! {
        #[test]
        fn prop_window_maximum_matches_naive(
            nums in prop::collection::vec(-100i32..100, 0..60),
            k in 0usize..10,
        ) {
            let expected: Vec<i32> = if k == 0 || k > nums.len() {
                Vec::new()
            } else {
                nums.windows(k).map(|w| *w.iter().max().unwrap()).collect()
            };
            prop_assert_eq!(sliding_window_maximum(&nums, k), expected);
        }
    }
}

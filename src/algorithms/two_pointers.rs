// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 双指针：对撞指针（有序数组、回文）与快慢指针（原地去重、移动零）。

use std::cmp::Ordering;

/// 有序数组中和为 `target` 的两个下标，求和在 `i128` 中进行
pub fn two_sum_sorted(nums: &[i64], target: i64) -> Option<(usize, usize)> {
    if nums.len() < 2 {
        return None;
    }
    let target = i128::from(target);
    let (mut left, mut right) = (0, nums.len() - 1);
    while left < right {
        match (i128::from(nums[left]) + i128::from(nums[right])).cmp(&target) {
            Ordering::Equal => return Some((left, right)),
            Ordering::Less => left += 1,
            Ordering::Greater => right -= 1,
        }
    }
    None
}

/// 和为 0 的不重复三元组，每组升序，整体按字典序
pub fn three_sum(nums: &[i64]) -> Vec<[i64; 3]> {
    let mut sorted = nums.to_vec();
    sorted.sort_unstable();
    let mut result = Vec::new();
    let n = sorted.len();
    for i in 0..n.saturating_sub(2) {
        if i > 0 && sorted[i] == sorted[i - 1] {
            continue;
        }
        let (mut left, mut right) = (i + 1, n - 1);
        while left < right {
            let sum = i128::from(sorted[i]) + i128::from(sorted[left]) + i128::from(sorted[right]);
            match sum.cmp(&0) {
                Ordering::Less => left += 1,
                Ordering::Greater => right -= 1,
                Ordering::Equal => {
                    result.push([sorted[i], sorted[left], sorted[right]]);
                    while left < right && sorted[left] == sorted[left + 1] {
                        left += 1;
                    }
                    while left < right && sorted[right] == sorted[right - 1] {
                        right -= 1;
                    }
                    left += 1;
                    right -= 1;
                }
            }
        }
    }
    result
}

/// 面积用 `u128` 表示，`u64` 高度乘以宽度不会溢出
pub fn container_with_most_water(heights: &[u64]) -> u128 {
    if heights.len() < 2 {
        return 0;
    }
    let (mut left, mut right) = (0, heights.len() - 1);
    let mut best = 0;
    while left < right {
        let area = u128::from(heights[left].min(heights[right])) * (right - left) as u128;
        best = best.max(area);
        if heights[left] < heights[right] {
            left += 1;
        } else {
            right -= 1;
        }
    }
    best
}

/// 有序向量原地去重，截断后返回剩余长度
pub fn remove_duplicates<T: PartialEq>(nums: &mut Vec<T>) -> usize {
    if nums.is_empty() {
        return 0;
    }
    let mut slow = 0;
    for fast in 1..nums.len() {
        if nums[fast] != nums[slow] {
            slow += 1;
            nums.swap(slow, fast);
        }
    }
    nums.truncate(slow + 1);
    slow + 1
}

/// 把 0 移到末尾，其余元素相对顺序不变
pub fn move_zeroes(nums: &mut [i64]) {
    let mut slow = 0;
    for fast in 0..nums.len() {
        if nums[fast] != 0 {
            nums.swap(slow, fast);
            slow += 1;
        }
    }
}

/// 只看字母和数字，忽略大小写
pub fn is_palindrome(s: &str) -> bool {
    let chars: Vec<char> = s
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect();
    chars.iter().eq(chars.iter().rev())
}

pub fn reverse_in_place<T>(items: &mut [T]) {
    if items.is_empty() {
        return;
    }
    let (mut left, mut right) = (0, items.len() - 1);
    while left < right {
        items.swap(left, right);
        left += 1;
        right -= 1;
    }
}

/// 荷兰国旗问题。0、1 以外的值都当作 2
pub fn sort_colors(nums: &mut [u8]) {
    let (mut low, mut mid, mut high) = (0, 0, nums.len());
    while mid < high {
        match nums[mid] {
            0 => {
                nums.swap(low, mid);
                low += 1;
                mid += 1;
            }
            1 => mid += 1,
            _ => {
                high -= 1;
                nums.swap(mid, high);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_sum_sorted() {
        assert_eq!(two_sum_sorted(&[2, 7, 11, 15], 9), Some((0, 1)));
        assert_eq!(two_sum_sorted(&[1, 2, 3, 4, 6], 10), Some((3, 4)));
        assert_eq!(two_sum_sorted(&[1, 2], 10), None);
        assert_eq!(two_sum_sorted(&[5], 5), None);
    }

    #[test]
    fn test_sums_near_i64_limits() {
        assert_eq!(two_sum_sorted(&[i64::MAX - 1, i64::MAX], 0), None);
        assert_eq!(two_sum_sorted(&[i64::MIN, i64::MIN + 1], 0), None);
        assert_eq!(two_sum_sorted(&[i64::MIN, 0, i64::MAX], -1), Some((0, 2)));
        assert_eq!(
            three_sum(&[i64::MAX, i64::MAX, i64::MIN, i64::MIN, 1]),
            vec![[i64::MIN, 1, i64::MAX]]
        );
        assert!(three_sum(&[i64::MAX, i64::MAX, i64::MAX]).is_empty());
    }

    #[test]
    fn test_three_sum() {
        assert_eq!(three_sum(&[-1, 0, 1, 2, -1, -4]), vec![[-1, -1, 2], [-1, 0, 1]]);
        assert_eq!(three_sum(&[0, 0, 0, 0]), vec![[0, 0, 0]]);
        assert!(three_sum(&[1, 2]).is_empty());
    }

    #[test]
    fn test_container_with_most_water() {
        assert_eq!(container_with_most_water(&[1, 8, 6, 2, 5, 4, 8, 3, 7]), 49);
        assert_eq!(container_with_most_water(&[1]), 0);
        assert_eq!(
            container_with_most_water(&[u64::MAX, 0, u64::MAX]),
            u128::from(u64::MAX) * 2
        );
    }

    #[test]
    fn test_in_place_rewrites() {
        let mut nums = vec![0, 0, 1, 1, 1, 2, 2, 3, 3, 4];
        assert_eq!(remove_duplicates(&mut nums), 5);
        assert_eq!(nums, vec![0, 1, 2, 3, 4]);

        let mut zeros = [0, 1, 0, 3, 12];
        move_zeroes(&mut zeros);
        assert_eq!(zeros, [1, 3, 12, 0, 0]);

        let mut word: Vec<char> = "hello".chars().collect();
        reverse_in_place(&mut word);
        assert_eq!(word.into_iter().collect::<String>(), "olleh");

        let mut colors = [2, 0, 2, 1, 1, 0, 7];
        sort_colors(&mut colors);
        assert_eq!(colors, [0, 0, 1, 1, 2, 7, 2]);
    }

    #[test]
    fn test_is_palindrome() {
        assert!(is_palindrome("A man, a plan, a canal: Panama"));
        assert!(!is_palindrome("race a car"));
        assert!(is_palindrome(""));
        assert!(is_palindrome("上海自来水来自海上"));
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 有序切片上的二分查找。所有区间均为左闭右开，`mid = lo + (hi - lo) / 2` 不会溢出。

use std::cmp::Ordering;

pub fn binary_search<T: Ord>(nums: &[T], target: &T) -> Option<usize> {
    let (mut lo, mut hi) = (0, nums.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match nums[mid].cmp(target) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => lo = mid + 1,
            Ordering::Greater => hi = mid,
        }
    }
    None
}

pub fn binary_search_recursive<T: Ord>(nums: &[T], target: &T) -> Option<usize> {
    fn helper<T: Ord>(nums: &[T], target: &T, lo: usize, hi: usize) -> Option<usize> {
        if lo >= hi {
            return None;
        }
        let mid = lo + (hi - lo) / 2;
        match nums[mid].cmp(target) {
            Ordering::Equal => Some(mid),
            Ordering::Less => helper(nums, target, mid + 1, hi),
            Ordering::Greater => helper(nums, target, lo, mid),
        }
    }
    helper(nums, target, 0, nums.len())
}

/// 第一个满足 `nums[i] >= target` 的下标，不存在时为 `nums.len()`
pub fn lower_bound<T: Ord>(nums: &[T], target: &T) -> usize {
    let (mut lo, mut hi) = (0, nums.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if nums[mid] < *target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

/// 第一个满足 `nums[i] > target` 的下标
pub fn upper_bound<T: Ord>(nums: &[T], target: &T) -> usize {
    let (mut lo, mut hi) = (0, nums.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if nums[mid] <= *target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    lo
}

pub fn first_occurrence<T: Ord>(nums: &[T], target: &T) -> Option<usize> {
    let i = lower_bound(nums, target);
    (i < nums.len() && nums[i] == *target).then_some(i)
}

pub fn last_occurrence<T: Ord>(nums: &[T], target: &T) -> Option<usize> {
    let i = upper_bound(nums, target);
    (i > 0 && nums[i - 1] == *target).then(|| i - 1)
}

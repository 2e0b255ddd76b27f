// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # 排序
//!
//! 每个函数都复制输入并返回新的升序 `Vec`，原切片保持不变。
//!
//! | 算法 | 时间复杂度 | 稳定 |
//! |------|-----------|------|
//! | 快速排序 | 平均 O(n log n) | 否 |
//! | 归并排序 | O(n log n) | 是 |
//! | 堆排序 | O(n log n) | 否 |
//! | 冒泡/插入/选择 | O(n²) | 冒泡、插入稳定 |
//! | 计数排序 | O(n + k) | 是 |

pub fn quick_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    let mut out = nums.to_vec();
    if out.len() > 1 {
        let hi = out.len() - 1;
        quick_sort_range(&mut out, 0, hi);
    }
    out
}

fn quick_sort_range<T: Ord>(nums: &mut [T], lo: usize, hi: usize) {
    if lo >= hi {
        return;
    }
    let p = partition(nums, lo, hi);
    if p > lo {
        quick_sort_range(nums, lo, p - 1);
    }
    quick_sort_range(nums, p + 1, hi);
}

/// Lomuto 划分，以最后一个元素为枢轴
fn partition<T: Ord>(nums: &mut [T], lo: usize, hi: usize) -> usize {
    let mut i = lo;
    for j in lo..hi {
        if nums[j] <= nums[hi] {
            nums.swap(i, j);
            i += 1;
        }
    }
    nums.swap(i, hi);
    i
}

pub fn merge_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    if nums.len() <= 1 {
        return nums.to_vec();
    }
    let mid = nums.len() / 2;
    merge(&merge_sort(&nums[..mid]), &merge_sort(&nums[mid..]))
}

fn merge<T: Ord + Clone>(left: &[T], right: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        // 相等时取左侧，保持稳定
        if left[i] <= right[j] {
            out.push(left[i].clone());
            i += 1;
        } else {
            out.push(right[j].clone());
            j += 1;
        }
    }
    out.extend_from_slice(&left[i..]);
    out.extend_from_slice(&right[j..]);
    out
}

pub fn heap_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    let mut out = nums.to_vec();
    let n = out.len();
    for i in (0..n / 2).rev() {
        sift_down(&mut out, i, n);
    }
    for end in (1..n).rev() {
        out.swap(0, end);
        sift_down(&mut out, 0, end);
    }
    out
}

/// 在 `nums[..len]` 上维护大顶堆
fn sift_down<T: Ord>(nums: &mut [T], mut root: usize, len: usize) {
    loop {
        let left = 2 * root + 1;
        let right = left + 1;
        let mut largest = root;
        if left < len && nums[left] > nums[largest] {
            largest = left;
        }
        if right < len && nums[right] > nums[largest] {
            largest = right;
        }
        if largest == root {
            return;
        }
        nums.swap(root, largest);
        root = largest;
    }
}

pub fn bubble_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    let mut out = nums.to_vec();
    let n = out.len();
    for pass in 0..n {
        let mut swapped = false;
        for j in 0..n - 1 - pass {
            if out[j] > out[j + 1] {
                out.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            break;
        }
    }
    out
}

pub fn insertion_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    let mut out = nums.to_vec();
    for i in 1..out.len() {
        let mut j = i;
        while j > 0 && out[j - 1] > out[j] {
            out.swap(j - 1, j);
            j -= 1;
        }
    }
    out
}

pub fn selection_sort<T: Ord + Clone>(nums: &[T]) -> Vec<T> {
    let mut out = nums.to_vec();
    for i in 0..out.len() {
        let mut min = i;
        for j in i + 1..out.len() {
            if out[j] < out[min] {
                min = j;
            }
        }
        out.swap(i, min);
    }
    out
}

/// 计数数组长度为最大值加一，适合取值范围较小的输入
pub fn counting_sort(nums: &[usize]) -> Vec<usize> {
    let max = match nums.iter().max() {
        Some(&max) => max,
        None => return Vec::new(),
    };
    let mut counts = vec![0usize; max + 1];
    for &n in nums {
        counts[n] += 1;
    }
    counts
        .iter()
        .enumerate()
        .flat_map(|(value, &count)| std::iter::repeat(value).take(count))
        .collect()
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 变量、控制流、函数与集合。

use super::Transcript;

use log::debug;

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

pub fn describe_day(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "Start of the work week",
        Weekday::Friday => "Almost weekend!",
        _ => "Another day",
    }
}

/// 同时返回和与积
pub fn calculate(a: i64, b: i64) -> (i64, i64) {
    (a + b, a * b)
}

pub fn double(x: i64) -> i64 {
    x * 2
}

pub fn run(t: &Transcript) {
    debug!("演示：基础语法");
    variables(t);
    control_flow(t);
    functions(t);
    collections(t);
}

fn variables(t: &Transcript) {
    t.line("Variables and Types:");
    let name: &str = "Rust";
    let edition = 2021;
    let is_awesome: bool = true;
    let pi = std::f64::consts::PI;
    t.line(format!(
        "  Language: {}, Edition: {}, Awesome: {}, Pi: {:.2}",
        name, edition, is_awesome, pi
    ));
}

fn control_flow(t: &Transcript) {
    t.line("Control Flow:");
    let x = 10;
    if x > 5 {
        t.line("  x is greater than 5");
    }

    let counting: Vec<String> = (1..=5).map(|i| i.to_string()).collect();
    t.line(format!("  Counting: {}", counting.join(" ")));

    t.line(format!("  {}", describe_day(Weekday::Monday)));
}

fn functions(t: &Transcript) {
    t.line("Functions:");
    let (sum, product) = calculate(4, 5);
    t.line(format!("  Sum: {}, Product: {}", sum, product));
    t.line(format!("  Doubled: {}", double(10)));
}

fn collections(t: &Transcript) {
    t.line("Collections:");
    let mut numbers = vec![1, 2, 3, 4, 5];
    numbers.push(6);
    t.line(format!("  Vec: {:?}", numbers));

    let person: BTreeMap<&str, &str> = [("name", "Alice"), ("city", "NYC")].into_iter().collect();
    t.line(format!("  Map: {:?}", person));
    t.line(format!(
        "  Name from map: {}",
        person.get("name").copied().unwrap_or("<missing>")
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions() {
        assert_eq!(calculate(4, 5), (9, 20));
        assert_eq!(double(10), 20);
        assert_eq!(describe_day(Weekday::Friday), "Almost weekend!");
        assert_eq!(describe_day(Weekday::Sunday), "Another day");
    }

    #[test]
    fn test_run_output() {
        let t = Transcript::new();
        run(&t);
        assert!(t.contains("Sum: 9, Product: 20"));
        assert!(t.contains("Counting: 1 2 3 4 5"));
        assert!(t.contains("Start of the work week"));
        assert!(t.contains("Vec: [1, 2, 3, 4, 5, 6]"));
        assert!(t.contains(r#"Map: {"city": "NYC", "name": "Alice"}"#));
        assert!(t.contains("Pi: 3.14"));
    }
}

// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! 结构体、方法、组合与可变借用。

use super::Transcript;

use log::debug;

use std::ops::{Deref, DerefMut};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
    pub city: String,
}

impl Person {
    pub fn new(name: &str, age: u32, city: &str) -> Self {
        Self {
            name: name.to_string(),
            age,
            city: city.to_string(),
        }
    }

    pub fn greet(&self) -> String {
        format!("Hi, I'm {} from {}", self.name, self.city)
    }

    pub fn have_birthday(&mut self) {
        self.age += 1;
    }
}

/// 通过 `Deref` 直接暴露内部 `Person` 的字段和方法
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub person: Person,
    pub job_title: String,
    pub salary: f64,
}

impl Deref for Employee {
    type Target = Person;

    fn deref(&self) -> &Person {
        &self.person
    }
}

impl DerefMut for Employee {
    fn deref_mut(&mut self) -> &mut Person {
        &mut self.person
    }
}

pub fn relocate(person: &mut Person, age: u32, city: &str) {
    person.age = age;
    person.city = city.to_string();
}

pub fn run(t: &Transcript) {
    debug!("演示：结构体");

    t.line("Basic Structs:");
    let alice = Person::new("Alice", 30, "NYC");
    let bob = Person {
        name: "Bob".to_string(),
        age: 25,
        city: "LA".to_string(),
    };
    let mut charlie = Person::default();
    charlie.name = "Charlie".to_string();
    charlie.age = 35;
    charlie.city = "Chicago".to_string();
    for p in [&alice, &bob, &charlie] {
        t.line(format!("  {:?}", p));
    }

    t.line("Struct Methods:");
    let mut david = Person::new("David", 28, "Boston");
    t.line(format!("  {}", david.greet()));
    david.have_birthday();
    t.line(format!("  After birthday: Age = {}", david.age));

    t.line("Struct Composition:");
    let eve = Employee {
        person: Person::new("Eve", 32, "Seattle"),
        job_title: "Software Engineer".to_string(),
        salary: 95000.50,
    };
    t.line(format!("  Employee: {}, Job: {}", eve.name, eve.job_title));
    t.line(format!("  {}", eve.greet()));

    t.line("Mutable References:");
    let mut frank = Person::new("Frank", 40, "Austin");
    t.line(format!("  Before: {:?}", frank));
    relocate(&mut frank, 41, "Dallas");
    t.line(format!("  After:  {:?}", frank));
}

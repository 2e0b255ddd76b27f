// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

//! # Trait 与多态
//!
//! - `Shape`：静态分发（泛型）与动态分发（`Box<dyn Shape>`）；
//! - `Writer`：同一接口的多个实现，演示中写入 [`Transcript`]；
//! - `Any`：运行时类型信息与向下转型。

use super::Transcript;
use crate::exception::Exception;

use log::debug;

use std::any::{type_name, Any};
use std::f64::consts::PI;

pub trait Shape {
    fn area(&self) -> f64;
    fn perimeter(&self) -> f64;
    fn name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        PI * self.radius * self.radius
    }

    fn perimeter(&self) -> f64 {
        2.0 * PI * self.radius
    }

    fn name(&self) -> &'static str {
        "Circle"
    }
}

impl Shape for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }

    fn perimeter(&self) -> f64 {
        2.0 * (self.width + self.height)
    }

    fn name(&self) -> &'static str {
        "Rectangle"
    }
}

pub fn describe_shape(shape: &dyn Shape) -> String {
    format!("Area: {:.2}, Perimeter: {:.2}", shape.area(), shape.perimeter())
}

#[cfg_attr(test, mockall::automock)]
pub trait Writer {
    fn write(&self, data: &str) -> Result<(), Exception>;
}

pub struct ConsoleWriter {
    transcript: Transcript,
}

impl ConsoleWriter {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

impl Writer for ConsoleWriter {
    fn write(&self, data: &str) -> Result<(), Exception> {
        self.transcript.line(format!("  Writing to console: {}", data));
        Ok(())
    }
}

/// 只记录“写入文件”这一动作，不访问文件系统
pub struct FileWriter {
    pub filename: String,
    transcript: Transcript,
}

impl FileWriter {
    pub fn new(filename: &str, transcript: Transcript) -> Self {
        Self {
            filename: filename.to_string(),
            transcript,
        }
    }
}

impl Writer for FileWriter {
    fn write(&self, data: &str) -> Result<(), Exception> {
        if self.filename.is_empty() {
            return Err(Exception::Io("empty filename".to_string()));
        }
        self.transcript
            .line(format!("  Writing to file '{}': {}", self.filename, data));
        Ok(())
    }
}

/// 依次写给每个 writer，遇到第一个错误即返回；成功时返回写入次数
pub fn broadcast(writers: &[Box<dyn Writer>], data: &str) -> Result<usize, Exception> {
    for writer in writers {
        writer.write(data)?;
    }
    Ok(writers.len())
}

/// 尝试把动态值向下转型为已知类型，输出值与类型名
pub fn describe_any(value: &dyn Any) -> String {
    if let Some(n) = value.downcast_ref::<i32>() {
        format!("Int: {} (type: {})", n, type_name::<i32>())
    } else if let Some(s) = value.downcast_ref::<&str>() {
        format!("String: {} (type: {})", s, type_name::<&str>())
    } else if let Some(s) = value.downcast_ref::<String>() {
        format!("String: {} (type: {})", s, type_name::<String>())
    } else if let Some(c) = value.downcast_ref::<Circle>() {
        format!("Circle: {:?} (type: {})", c, type_name::<Circle>())
    } else {
        "Unknown type".to_string()
    }
}

pub fn run(t: &Transcript) {
    debug!("演示：trait 与多态");

    t.line("Polymorphism with Traits:");
    let circle = Circle { radius: 5.0 };
    let rectangle = Rectangle {
        width: 4.0,
        height: 6.0,
    };
    t.line("  Circle:");
    t.line(format!("  {}", describe_shape(&circle)));
    t.line("  Rectangle:");
    t.line(format!("  {}", describe_shape(&rectangle)));

    let shapes: Vec<Box<dyn Shape>> = vec![Box::new(circle), Box::new(rectangle)];
    t.line("  All shapes:");
    for (i, shape) in shapes.iter().enumerate() {
        t.line(format!("    Shape {} ({}): {}", i + 1, shape.name(), describe_shape(shape.as_ref())));
    }

    t.line("Multiple Trait Implementations:");
    let writers: Vec<Box<dyn Writer>> = vec![
        Box::new(ConsoleWriter::new(t.clone())),
        Box::new(FileWriter::new("output.txt", t.clone())),
    ];
    if let Err(e) = broadcast(&writers, "Hello, Rust!") {
        t.line(format!("  Write failed: {}", e));
    }

    t.line("Dynamic Values (dyn Any):");
    let values: Vec<Box<dyn Any>> = vec![Box::new(42i32), Box::new("Hello"), Box::new(Circle { radius: 3.0 })];
    for value in &values {
        t.line(format!("  {}", describe_any(value.as_ref())));
    }
    if let Some(c) = values.last().and_then(|v| v.downcast_ref::<Circle>()) {
        t.line(format!("  Downcast successful! Radius: {:.1}", c.radius));
    }
}

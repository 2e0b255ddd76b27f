// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

use crate::exception::Exception;

use log::{error, warn};
use serde_derive::{Deserialize, Serialize};

use std::fs::File;
use std::io::prelude::*;
use std::time::Duration;

/// 运行参数。所有字段都有默认值，配置文件只需写出需要覆盖的项。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_users_port")]
    users_port: u16,
    #[serde(default = "default_books_port")]
    books_port: u16,
    #[serde(default = "default_local")]
    local: bool,
    #[serde(default)]
    worker_threads: usize,
    #[serde(default = "default_timeout_secs")]
    read_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    write_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    idle_timeout_secs: u64,
    #[serde(default = "default_max_header_size")]
    max_header_size: usize,
    #[serde(default = "default_max_body_size")]
    max_body_size: usize,
    #[serde(default = "default_compression_min_size")]
    compression_min_size: usize,
    #[serde(default = "default_seed_sample_data")]
    seed_sample_data: bool,
    #[serde(default = "default_log_config")]
    log_config: String,
}

fn default_users_port() -> u16 {
    8080
}

fn default_books_port() -> u16 {
    8081
}

fn default_local() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_idle_timeout_secs() -> u64 {
    60
}

fn default_max_header_size() -> usize {
    8192 // 8KB
}

fn default_max_body_size() -> usize {
    1048576 // 1MB
}

fn default_compression_min_size() -> usize {
    1024
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_log_config() -> String {
    "config/log4rs.yaml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            users_port: default_users_port(),
            books_port: default_books_port(),
            local: default_local(),
            worker_threads: num_cpus::get(),
            read_timeout_secs: default_timeout_secs(),
            write_timeout_secs: default_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_header_size: default_max_header_size(),
            max_body_size: default_max_body_size(),
            compression_min_size: default_compression_min_size(),
            seed_sample_data: default_seed_sample_data(),
            log_config: default_log_config(),
        }
    }

    /// 从 TOML 文件加载配置。
    ///
    /// 文件不存在或无法读取时返回 `ConfigRead`；内容无法解析时记录错误并退回默认配置。
    pub fn from_toml(filename: &str) -> Result<Self, Exception> {
        let mut file = File::open(filename)
            .map_err(|e| Exception::ConfigRead(format!("{}: {}", filename, e)))?;
        let mut str_val = String::new();
        file.read_to_string(&mut str_val)
            .map_err(|e| Exception::ConfigRead(format!("{}: {}", filename, e)))?;
        Ok(Self::from_toml_str(&str_val))
    }

    pub fn from_toml_str(content: &str) -> Self {
        let raw_config = match Self::parse(content) {
            Ok(c) => c,
            Err(e) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置：{}", e);
                Config::new()
            }
        };
        raw_config.normalized()
    }

    /// 严格解析，不做默认值回退。
    pub fn parse(content: &str) -> Result<Self, Exception> {
        let config: Config =
            toml::from_str(content).map_err(|e| Exception::ConfigParse(e.to_string()))?;
        Ok(config.normalized())
    }

    fn normalized(mut self) -> Self {
        if self.worker_threads == 0 {
            self.worker_threads = num_cpus::get();
        }
        if self.max_header_size < 256 {
            warn!("max_header_size被设置为{}，过小的值会拒绝所有请求，该值将被改为256。", self.max_header_size);
            self.max_header_size = 256;
        }
        if self.read_timeout_secs == 0 {
            warn!("read_timeout_secs不能为0，该值将被改为{}。", default_timeout_secs());
            self.read_timeout_secs = default_timeout_secs();
        }
        if self.write_timeout_secs == 0 {
            warn!("write_timeout_secs不能为0，该值将被改为{}。", default_timeout_secs());
            self.write_timeout_secs = default_timeout_secs();
        }
        self
    }

    /// 以下 `with_*` 方法用于在代码中覆盖个别参数（测试与命令行场景）。
    pub fn with_ports(mut self, users_port: u16, books_port: u16) -> Self {
        self.users_port = users_port;
        self.books_port = books_port;
        self
    }

    pub fn with_limits(mut self, max_header_size: usize, max_body_size: usize) -> Self {
        self.max_header_size = max_header_size;
        self.max_body_size = max_body_size;
        self
    }

    pub fn with_timeouts(mut self, read: Duration, idle: Duration) -> Self {
        self.read_timeout_secs = read.as_secs().max(1);
        self.idle_timeout_secs = idle.as_secs();
        self
    }

    pub fn with_seed_sample_data(mut self, seed: bool) -> Self {
        self.seed_sample_data = seed;
        self
    }
}

impl Config {
    pub fn users_port(&self) -> u16 {
        self.users_port
    }

    pub fn books_port(&self) -> u16 {
        self.books_port
    }

    pub fn local(&self) -> bool {
        self.local
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }

    /// 两次 keep-alive 请求之间允许的空闲时间，为 0 表示不保持连接。
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_header_size(&self) -> usize {
        self.max_header_size
    }

    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    pub fn compression_min_size(&self) -> usize {
        self.compression_min_size
    }

    pub fn seed_sample_data(&self) -> bool {
        self.seed_sample_data
    }

    pub fn log_config(&self) -> &str {
        &self.log_config
    }
}

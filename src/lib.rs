// Copyright (c) 2026 shaneyale (shaneyale86@gmail.com)
// All rights reserved.

pub mod algorithms;
pub mod client;
pub mod config;
pub mod demos;
pub mod exception;
pub mod middleware;
pub mod param;
pub mod request;
pub mod response;
pub mod router;
pub mod server;
pub mod services;
pub mod util;

pub use client::{Client, ClientResponse};
pub use config::Config;
pub use demos::Transcript;
pub use exception::Exception;
pub use param::{HttpEncoding, HttpRequestMethod, HttpVersion};
pub use request::Request;
pub use response::Response;
pub use router::{Context, Router};
pub use server::{Server, ServerHandle};

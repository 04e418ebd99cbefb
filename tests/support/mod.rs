#![allow(dead_code)]

pub mod memory_host;
pub mod mock_http;

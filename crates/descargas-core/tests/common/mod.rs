#![allow(dead_code)]

pub mod task_server;

#![allow(dead_code)]

pub mod db;
pub mod helpers;
pub mod memory;

#![cfg_attr(doc, doc = include_str!("../README.md"))]

pub mod context;
pub mod error;
pub mod logger;
pub mod message;
pub mod ws;

use crate::error::Error;

pub type Result<T> = std::result::Result<T, Error>;

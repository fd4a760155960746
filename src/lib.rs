pub mod ambient;
pub mod color;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod pointer;
pub mod scheduler;
pub mod surface;
pub mod util;
pub mod web;

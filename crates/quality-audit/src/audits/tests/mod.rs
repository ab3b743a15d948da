mod common;
mod service;
mod stats;

// Copyright @yucwang 2026

pub mod backdrop;
pub mod pipelined;
pub mod renderer;

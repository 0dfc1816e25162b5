// Copyright @yucwang 2021

pub mod accumulator;
pub mod camera_loader;
pub mod error;
pub mod lens;
pub mod lens_tracer;
pub mod parallel;
pub mod pipeline;
pub mod records;
pub mod rng;
pub mod sampler;
pub mod sensor;

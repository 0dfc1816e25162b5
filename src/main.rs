// Copyright 2020 TwoCookingMice

use tablelens::core::camera_loader::load_camera_document;
use tablelens::core::error::CameraError;
use tablelens::core::pipeline::PipelineConfig;
use tablelens::core::sampler::HaltonSource;
use tablelens::core::sensor::{Sensor, SensorKind};
use tablelens::io::{ExrImageWriter, ImageWriter, LdrImageWriter};
use tablelens::math::bitmap::Bitmap;
use tablelens::math::constants::{Float, Matrix4f, PI};
use tablelens::renderers::backdrop::BackdropRenderer;
use tablelens::renderers::pipelined::{PipelinedRenderer, Renderer};

use std::env;

struct Options {
    camera_path: String,
    output_path: String,
    kind: SensorKind,
    width: u32,
    height: u32,
    passes: u32,
    block_size: usize,
    depth: usize,
    latency: usize,
    seed: u64,
    fov_deg: Float,
    hdr_path: Option<String>,
}

fn parse_options(args: &[String]) -> Options {
    let mut options = Options {
        camera_path: args[1].clone(),
        output_path: args[2].clone(),
        kind: SensorKind::TableLens,
        width: 512,
        height: 512,
        passes: 16,
        block_size: 512 * 512,
        depth: 4,
        latency: 2,
        seed: 0,
        fov_deg: 45.0,
        hdr_path: None,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--kind" => {
                i += 1;
                match args.get(i).and_then(|v| SensorKind::from_name(v)) {
                    Some(kind) => options.kind = kind,
                    None => log::warn!("Unknown camera kind, keeping {:?}.", options.kind),
                }
            }
            "--width" => {
                i += 1;
                options.width = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(options.width);
            }
            "--height" => {
                i += 1;
                options.height = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(options.height);
            }
            "--passes" => {
                i += 1;
                options.passes = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(options.passes);
            }
            "--block" => {
                i += 1;
                options.block_size = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(options.block_size);
            }
            "--depth" => {
                i += 1;
                options.depth = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(options.depth);
            }
            "--latency" => {
                i += 1;
                options.latency = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(options.latency);
            }
            "--seed" => {
                i += 1;
                options.seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
            }
            "--fov" => {
                i += 1;
                options.fov_deg = args.get(i).and_then(|v| v.parse::<Float>().ok()).unwrap_or(options.fov_deg);
            }
            "--hdr" => {
                i += 1;
                options.hdr_path = args.get(i).cloned();
            }
            _ => {}
        }
        i += 1;
    }
    options
}

fn projection_inverse(width: u32, height: u32, fov_deg: Float) -> [Float; 16] {
    let aspect = width as Float / height as Float;
    let projection = Matrix4f::new_perspective(aspect, fov_deg * PI / 180.0, 0.01, 1000.0);
    let inverse = projection.try_inverse().unwrap_or_else(Matrix4f::identity);
    let mut row_major = [0.0; 16];
    for r in 0..4 {
        for c in 0..4 {
            row_major[r * 4 + c] = inverse[(r, c)];
        }
    }
    row_major
}

fn run(options: &Options) -> Result<(), CameraError> {
    let document = load_camera_document(&options.camera_path)?;
    let pipeline = PipelineConfig::new(options.depth, options.latency)?;
    let mut sensor = Sensor::configure(
        options.kind,
        options.width,
        options.height,
        &projection_inverse(options.width, options.height, options.fov_deg),
        &document,
        pipeline,
        Box::new(HaltonSource::new(options.seed)),
    )?;

    let mut framebuffer = Bitmap::new(options.width as usize, options.height as usize);
    let renderer = PipelinedRenderer::new(
        Box::new(BackdropRenderer::default()),
        pipeline,
        options.passes,
        options.block_size,
    );
    renderer.render(&mut sensor, &mut framebuffer);

    if let Some(hdr_path) = &options.hdr_path {
        ExrImageWriter::new(hdr_path).write(&sensor.normalized(&framebuffer)?)?;
    }
    sensor.finish_rendering(&framebuffer, &mut LdrImageWriter::new(&options.output_path))
}

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!(
            "Usage: {} <camera.xml> <output.bmp> [--kind table_lens|thin_lens] [--width N] [--height N] \
             [--passes N] [--block N] [--depth N (4)] [--latency N (2)] [--seed N] [--fov DEG] [--hdr out.exr]",
            args[0]
        );
        std::process::exit(1);
    }

    let options = parse_options(&args);
    if let Err(e) = run(&options) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

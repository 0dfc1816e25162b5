use console::style;
use std::env;
use tablelens::core::camera_loader::load_camera_document;
use tablelens::core::lens_tracer::HitRecorder;
use tablelens::math::constants::{Float, Vector3f};
use tablelens::math::ray::Ray3f;

fn main() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <camera.xml> <film_x> <film_y> [--target-x X] [--target-y Y]", args[0]);
        std::process::exit(1);
    }

    let camera_path = &args[1];
    let film_x: Float = args[2].parse().unwrap_or(0.0);
    let film_y: Float = args[3].parse().unwrap_or(0.0);
    let mut target_x: Float = 0.0;
    let mut target_y: Float = 0.0;

    let mut i = 4;
    while i < args.len() {
        match args[i].as_str() {
            "--target-x" => {
                i += 1;
                target_x = args.get(i).and_then(|v| v.parse::<Float>().ok()).unwrap_or(target_x);
            }
            "--target-y" => {
                i += 1;
                target_y = args.get(i).and_then(|v| v.parse::<Float>().ok()).unwrap_or(target_y);
            }
            _ => {}
        }
        i += 1;
    }

    let document = match load_camera_document(camera_path) {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{} {}", style("error:").red().bold(), e);
            std::process::exit(1);
        }
    };
    let system = document.optical_system_or_empty();
    let stack = &system.stack;
    println!("{}", stack.describe());

    let origin = Vector3f::new(film_x, film_y, 0.0);
    let target = Vector3f::new(target_x, target_y, stack.rear_z());
    let ray = Ray3f::new(origin, (target - origin).normalize());
    println!("Film ray: origin = {:?}, dir = {:?}", origin, ray.dir());

    let mut recorder = HitRecorder::default();
    let result = stack.trace_from_film_with(&ray, &mut recorder);
    for (element, p) in recorder.hits.iter() {
        let e = &stack.interfaces()[*element];
        let r = (p.x * p.x + p.y * p.y).sqrt();
        let line = format!("[{}] hit = ({:.6}, {:.6}, {:.6}) r = {:.6} / {:.6}", element, p.x, p.y, p.z, r, e.aperture_radius);
        if r > e.aperture_radius {
            println!("{}", style(line).red());
        } else {
            println!("{}", style(line).green());
        }
    }

    match result {
        Ok(exit) => println!(
            "{} origin = {:?}, dir = {:?}",
            style("exit:").green().bold(),
            exit.origin(),
            exit.dir().normalize()
        ),
        Err(failure) => println!("{} {:?}", style("failed:").red().bold(), failure),
    }
}

//! Render a JSON scene headlessly into a PPM image.
//!
//! Run: cargo run --bin scene-dump -- scenes/corridor.json --size 960x720 -o corridor.ppm

use std::fs::File;
use std::io::BufWriter;

use log::{debug, info};

use lumigrid_core::Rgba;
use lumigrid_demos::SceneFile;

struct Args {
    scene: String,
    width: u32,
    height: u32,
    output: String,
}

fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (w, h) = s.split_once('x')?;
    Some((w.parse().ok()?, h.parse().ok()?))
}

fn parse_args() -> Result<Args, String> {
    let mut scene = None;
    let mut size = (480, 360);
    let mut output = "scene.ppm".to_string();

    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--size" => {
                let v = it.next().ok_or("--size needs WxH")?;
                size = parse_size(&v).ok_or_else(|| format!("bad size {v:?}"))?;
            }
            "-o" | "--output" => output = it.next().ok_or("-o needs a path")?,
            _ if scene.is_none() => scene = Some(arg),
            _ => return Err(format!("unexpected argument {arg:?}")),
        }
    }

    Ok(Args {
        scene: scene.ok_or("usage: scene-dump <scene.json> [--size WxH] [-o out.ppm]")?,
        width: size.0,
        height: size.1,
        output,
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;
    let text = std::fs::read_to_string(&args.scene)?;
    let scene = SceneFile::from_json(&text)?;
    for (key, cell) in scene.build().iter() {
        debug!(
            "{key:?} at {} res {} lum {:.3}",
            cell.position,
            cell.resolution,
            cell.luminance()
        );
    }
    let surface = scene.render(args.width, args.height);
    surface.write_ppm(BufWriter::new(File::create(&args.output)?), Rgba::BLACK)?;
    info!(
        "wrote {} ({}x{}, {} cells)",
        args.output,
        surface.width(),
        surface.height(),
        scene.cells.len()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

extern crate clap;
extern crate env_logger;
extern crate image;
#[macro_use]
extern crate log;
extern crate mandeltiles;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use mandeltiles::{Coordinator, PixelBuffer, RenderConfig, RenderError, MAX_TILES};
use std::fs::File;
use std::path::Path;
use std::str::FromStr;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn validate_pair<T: FromStr + Ord + Default>(
    s: &str,
    separator: char,
    err: &str,
) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some((l, r)) if l > T::default() && r > T::default() => Ok(()),
        _ => Err(err.to_string()),
    }
}

fn validate_tiles(s: &str) -> Result<(), String> {
    validate_pair::<u16>(s, 'x', "Could not parse tile grid")?;
    match parse_pair::<usize>(s, 'x') {
        Some((columns, rows)) if columns * rows <= MAX_TILES => Ok(()),
        _ => Err(format!("Tile grid must have at most {} tiles", MAX_TILES)),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const SIZE: &str = "size";
const TILES: &str = "tiles";
const ITERATIONS: &str = "iterations";

fn args<'a>(default_tiles: &'a str) -> ArgMatches<'a> {
    App::new("mandel")
        .version("0.1.0")
        .about("Tiled Mandelbrot renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output file (binary PGM)"),
        )
        .arg(
            Arg::with_name(SIZE)
                .required(false)
                .long(SIZE)
                .short("s")
                .takes_value(true)
                .default_value("1200x700")
                .validator(|s| validate_pair::<u16>(&s, 'x', "Could not parse output image size"))
                .help("Size of output image"),
        )
        .arg(
            Arg::with_name(TILES)
                .required(false)
                .long(TILES)
                .short("t")
                .takes_value(true)
                .default_value(default_tiles)
                .validator(|s| validate_tiles(&s))
                .help("Columns and rows of tiles, one thread per tile"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .get_matches()
}

fn config(matches: &ArgMatches) -> RenderConfig {
    let size: (usize, usize) =
        parse_pair(matches.value_of(SIZE).unwrap(), 'x').expect("Error parsing image dimensions");
    let tiles: (usize, usize) =
        parse_pair(matches.value_of(TILES).unwrap(), 'x').expect("Error parsing tile grid");
    let max_iterations = usize::from_str(matches.value_of(ITERATIONS).unwrap())
        .expect("Could not parse iteration count.");
    RenderConfig {
        width: size.0,
        height: size.1,
        max_iterations,
        tiles_x: tiles.0,
        tiles_y: tiles.1,
    }
}

fn write_image(outfile: &str, buffer: &PixelBuffer) -> Result<(), RenderError> {
    let path = Path::new(outfile);
    let pixels = buffer.to_row_major();
    let output = File::create(&path)?;
    let mut encoder =
        PNMEncoder::new(output).with_subtype(PNMSubtype::Graymap(SampleEncoding::Binary));
    encoder.encode(
        &pixels[..],
        buffer.width() as u32,
        buffer.height() as u32,
        ColorType::Gray(8),
    )?;
    Ok(())
}

fn run(config: &RenderConfig, outfile: &str) -> Result<(), RenderError> {
    let coordinator = Coordinator::new(config)?;
    let buffer = coordinator.render(&config.partition()?)?;
    write_image(outfile, &buffer)?;
    info!("Wrote {}", outfile);
    Ok(())
}

fn main() {
    env_logger::init();
    let default_tiles = format!("{}x1", num_cpus::get());
    let matches = args(&default_tiles);

    let config = config(&matches);

    if let Err(e) = run(&config, matches.value_of(OUTPUT).unwrap()) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}

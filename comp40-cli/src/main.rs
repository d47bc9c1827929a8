use argh::FromArgs;
use comp40::{diff::rms_difference, Pixmap};
use image::{
    codecs::pnm::{PnmEncoder, PnmSubtype, SampleEncoding},
    ColorType, DynamicImage, ImageEncoder, ImageFormat,
};
use log::info;
use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
};

/// COMP40 image compressor.
#[derive(FromArgs)]
struct Cli {
    /// log progress to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,

    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Compress(Compress),
    Decompress(Decompress),
    Diff(Diff),
}

/// Compresses a PPM image.
#[derive(FromArgs)]
#[argh(subcommand, name = "compress")]
struct Compress {
    /// the output file, stdout if omitted
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// the input PPM, stdin if omitted
    #[argh(positional)]
    input: Option<String>,
}

/// Decompresses a COMP40 stream into a binary PPM.
#[derive(FromArgs)]
#[argh(subcommand, name = "decompress")]
struct Decompress {
    /// the output file, stdout if omitted
    #[argh(option, short = 'o')]
    output: Option<String>,

    /// the compressed input, stdin if omitted
    #[argh(positional)]
    input: Option<String>,
}

/// Prints the root-mean-square difference of two PPM images.
#[derive(FromArgs)]
#[argh(subcommand, name = "diff")]
struct Diff {
    /// the first image, `-` for stdin
    #[argh(positional)]
    a: String,
    /// the second image, `-` for stdin
    #[argh(positional)]
    b: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Cli { verbose, command } = argh::from_env();

    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match command {
        Command::Compress(options) => compress(options),
        Command::Decompress(options) => decompress(options),
        Command::Diff(options) => diff(options),
    }
}

fn compress(options: Compress) -> Result<(), Box<dyn std::error::Error>> {
    let Compress { output, input } = options;

    let image = read_ppm(&read_input(input.as_deref())?)?;
    info!(
        "Compressing {}x{} image with denominator {}",
        image.width(),
        image.height(),
        image.denominator()
    );

    let header = comp40::compress(&image, open_output(output.as_deref())?)?;
    info!(
        "Written {}x{} compressed image to {}",
        header.width,
        header.height,
        output.as_deref().unwrap_or("stdout")
    );

    Ok(())
}

fn decompress(options: Decompress) -> Result<(), Box<dyn std::error::Error>> {
    let Decompress { output, input } = options;

    info!("Decompressing {}", input.as_deref().unwrap_or("stdin"));
    let image = comp40::decompress(&read_input(input.as_deref())?)?;

    let width = u32::try_from(image.width())?;
    let height = u32::try_from(image.height())?;
    let mut w = open_output(output.as_deref())?;
    PnmEncoder::new(&mut w)
        .with_subtype(PnmSubtype::Pixmap(SampleEncoding::Binary))
        .write_image(&image.to_rgb8(), width, height, ColorType::Rgb8)?;
    w.flush()?;

    info!(
        "Written {width}x{height} image to {}",
        output.as_deref().unwrap_or("stdout")
    );

    Ok(())
}

fn diff(options: Diff) -> Result<(), Box<dyn std::error::Error>> {
    let Diff { a, b } = options;
    if a == "-" && b == "-" {
        return Err("only one image can be read from stdin".into());
    }

    let path = |p: &str| (p != "-").then(|| p.to_owned());
    let a = read_ppm(&read_input(path(&a).as_deref())?)?;
    let b = read_ppm(&read_input(path(&b).as_deref())?)?;

    println!("{:.4}", rms_difference(&a, &b)?);

    Ok(())
}

/// Reads a whole file, or stdin when `path` is `None`.
fn read_input(path: Option<&str>) -> io::Result<Vec<u8>> {
    let mut data = Vec::with_capacity(1024 * 1024);
    match path {
        Some(path) => File::open(path)?.read_to_end(&mut data)?,
        None => io::stdin().lock().read_to_end(&mut data)?,
    };

    Ok(data)
}

fn open_output(path: Option<&str>) -> io::Result<BufWriter<Box<dyn Write>>> {
    let w: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };

    Ok(BufWriter::new(w))
}

fn read_ppm(data: &[u8]) -> Result<Pixmap, Box<dyn std::error::Error>> {
    let image = image::load_from_memory_with_format(data, ImageFormat::Pnm)?;
    let width = image.width() as usize;
    let height = image.height() as usize;

    let pixmap = match image {
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            Pixmap::from_rgb16(width, height, image.into_rgb16().as_raw(), u16::MAX)?
        }
        _ => Pixmap::from_rgb8(width, height, image.into_rgb8().as_raw())?,
    };

    Ok(pixmap)
}

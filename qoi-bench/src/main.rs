use std::fs::{self, File};
use std::hint::black_box;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, ensure, Context, Result};
use png::{ColorType, Transformations};
use structopt::StructOpt;
use walkdir::{DirEntry, WalkDir};

fn timeit<T>(func: impl Fn() -> T) -> (T, Duration) {
    let t0 = Instant::now();
    let out = func();
    let t1 = Instant::now();
    (black_box(out), t1 - t0)
}

fn mean(v: &[f64]) -> f64 {
    v.iter().sum::<f64>() / v.len() as f64
}

fn find_pngs(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let is_png_file = |path: &PathBuf| {
        path.is_file()
            && path.extension().unwrap_or_default().to_string_lossy().to_ascii_lowercase() == "png"
    };

    let mut out = vec![];
    for path in paths {
        if is_png_file(path) {
            out.push(path.clone());
        } else if path.is_dir() {
            out.extend(
                WalkDir::new(path)
                    .follow_links(true)
                    .into_iter()
                    .filter_map(Result::ok)
                    .map(DirEntry::into_path)
                    .filter(is_png_file),
            );
        } else {
            bail!("path doesn't exist: {}", path.to_string_lossy());
        }
    }
    out.sort();
    Ok(out)
}

struct Image {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl Image {
    pub const fn n_pixels(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Pixels as the decoder hands them back: RGBA, opaque if the source has no alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        if self.channels == 4 {
            return self.data.clone();
        }
        self.data.chunks_exact(3).flat_map(|px| [px[0], px[1], px[2], 0xff]).collect()
    }
}

fn read_png(filename: &Path) -> Result<Image> {
    let mut decoder = png::Decoder::new(File::open(filename)?);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    let bytes = &buf[..info.buffer_size()];
    let (channels, data) = match info.color_type {
        ColorType::Rgb => (3, bytes.to_vec()),
        ColorType::Rgba => (4, bytes.to_vec()),
        ColorType::Grayscale => (3, bytes.iter().flat_map(|&v| [v, v, v]).collect()),
        ColorType::GrayscaleAlpha => {
            (4, bytes.chunks_exact(2).flat_map(|p| [p[0], p[0], p[0], p[1]]).collect())
        }
        ColorType::Indexed => bail!("palette wasn't expanded"),
    };
    Ok(Image { width: info.width, height: info.height, channels, data })
}

trait Codec {
    fn name() -> &'static str;

    fn encode(img: &Image) -> Result<Vec<u8>>;

    fn decode(data: &[u8]) -> Result<Vec<u8>>;
}

/// Allocates a fresh output vector on every call.
struct CodecVec;

impl Codec for CodecVec {
    fn name() -> &'static str {
        "qoi(vec)"
    }

    fn encode(img: &Image) -> Result<Vec<u8>> {
        Ok(qoi::encode_to_vec(&img.data, img.width, img.height, img.channels)?)
    }

    fn decode(data: &[u8]) -> Result<Vec<u8>> {
        Ok(qoi::decode_to_vec(data)?.1)
    }
}

/// Sizes the output from the header first and then fills it in place.
struct CodecBuf;

impl Codec for CodecBuf {
    fn name() -> &'static str {
        "qoi(buf)"
    }

    fn encode(img: &Image) -> Result<Vec<u8>> {
        let encoder = qoi::Encoder::new(&img.data, img.width, img.height, img.channels)?;
        let mut out = vec![0; encoder.required_buf_len()];
        let size = encoder.encode_to_buf(&mut out)?;
        out.truncate(size);
        Ok(out)
    }

    fn decode(data: &[u8]) -> Result<Vec<u8>> {
        let header = qoi::decode_header(data)?;
        let mut out = vec![0; header.n_bytes()];
        qoi::decode_to_buf(&mut out, data)?;
        Ok(out)
    }
}

struct BenchResult {
    pub codec: String,
    pub encode_sec: Vec<f64>,
    pub decode_sec: Vec<f64>,
    pub size_encoded: usize,
}

impl BenchResult {
    pub fn timings(&self, use_median: bool) -> (f64, f64) {
        if use_median {
            (self.decode_sec[self.decode_sec.len() / 2], self.encode_sec[self.encode_sec.len() / 2])
        } else {
            (mean(&self.decode_sec), mean(&self.encode_sec))
        }
    }
}

struct ImageBench {
    img: Image,
    rgba: Vec<u8>,
    sec_allowed: f64,
    results: Vec<BenchResult>,
}

impl ImageBench {
    pub fn new(img: Image, sec_allowed: f64) -> Self {
        let rgba = img.to_rgba();
        Self { img, rgba, sec_allowed, results: vec![] }
    }

    pub fn run<C: Codec>(&mut self) -> Result<()> {
        let (encoded, t_encode) = timeit(|| C::encode(&self.img));
        let encoded = encoded?;
        let (decoded, t_decode) = timeit(|| C::decode(&encoded));
        let decoded = decoded?;
        ensure!(decoded == self.rgba, "decoded data doesn't roundtrip");

        let n_encode = (self.sec_allowed / 2. / t_encode.as_secs_f64()).max(2.).ceil() as usize;
        let mut encode_tm = Vec::with_capacity(n_encode);
        for _ in 0..n_encode {
            encode_tm.push(timeit(|| C::encode(&self.img)).1);
        }
        encode_tm.sort_unstable();
        let encode_sec = encode_tm.iter().map(Duration::as_secs_f64).collect();

        let n_decode = (self.sec_allowed / 2. / t_decode.as_secs_f64()).max(2.).ceil() as usize;
        let mut decode_tm = Vec::with_capacity(n_decode);
        for _ in 0..n_decode {
            decode_tm.push(timeit(|| C::decode(&encoded)).1);
        }
        decode_tm.sort_unstable();
        let decode_sec = decode_tm.iter().map(Duration::as_secs_f64).collect();

        self.results.push(BenchResult {
            codec: C::name().to_owned(),
            encode_sec,
            decode_sec,
            size_encoded: encoded.len(),
        });
        Ok(())
    }

    pub fn report(&self, use_median: bool) {
        let (w_name, w_col) = (11, 13);
        print!("{:<w$}", "codec", w = w_name);
        print!("{:>w$}", "decode:ms", w = w_col);
        print!("{:>w$}", "encode:ms", w = w_col);
        print!("{:>w$}", "decode:mp/s", w = w_col);
        print!("{:>w$}", "encode:mp/s", w = w_col);
        print!("{:>w$}", "compression", w = w_col);
        print!("{:>w$}", "output:kb", w = w_col);
        println!();
        for r in &self.results {
            let (decode_sec, encode_sec) = r.timings(use_median);
            let mpixels = self.img.n_pixels() as f64 / 1e6;
            let (decode_mpps, encode_mpps) = (mpixels / decode_sec, mpixels / encode_sec);
            let comp_ratio_pct = r.size_encoded as f64 / self.img.data.len() as f64 * 1e2;
            let size_kb = r.size_encoded as f64 / 1024.;

            print!("{:<w$}", r.codec, w = w_name);
            print!("{:>w$.2}", decode_sec * 1e3, w = w_col);
            print!("{:>w$.2}", encode_sec * 1e3, w = w_col);
            print!("{:>w$.1}", decode_mpps, w = w_col);
            print!("{:>w$.1}", encode_mpps, w = w_col);
            print!("{:>w$.2}%", comp_ratio_pct, w = w_col - 1);
            print!("{:>w$.1}", size_kb, w = w_col);
            println!();
        }
    }
}

fn bench_png(filename: &Path, seconds: f64, use_median: bool) -> Result<()> {
    let f = filename.to_string_lossy();
    let img = read_png(filename).with_context(|| format!("error reading PNG file: {f}"))?;
    let size_kb = fs::metadata(filename)?.len() / 1024;
    let mpixels = img.n_pixels() as f64 / 1e6;
    println!(
        "{} ({}x{}:{}, {} KB, {:.1}MP)",
        f, img.width, img.height, img.channels, size_kb, mpixels
    );
    let mut bench = ImageBench::new(img, seconds);
    bench.run::<CodecVec>().with_context(|| format!("{} failed on {f}", CodecVec::name()))?;
    bench.run::<CodecBuf>().with_context(|| format!("{} failed on {f}", CodecBuf::name()))?;
    bench.report(use_median);
    Ok(())
}

#[derive(Debug, StructOpt)]
struct Args {
    /// PNG files or directories to search for them
    #[structopt(parse(from_os_str))]
    paths: Vec<PathBuf>,
    /// Time budget per image and codec, in seconds
    #[structopt(short, long, default_value = "5")]
    seconds: f64,
    /// Report mean timings instead of the median
    #[structopt(long)]
    mean: bool,
}

fn main() -> Result<()> {
    let args = <Args as StructOpt>::from_args();
    ensure!(!args.paths.is_empty(), "no input paths given");
    ensure!(args.seconds > 0., "time budget must be positive");
    let files = find_pngs(&args.paths)?;
    ensure!(!files.is_empty(), "no PNG files found in given paths");
    for file in &files {
        bench_png(file, args.seconds, !args.mean)?;
    }
    Ok(())
}

//! Parse .img file utility
//! Loads an IC-F1010 .img file and displays the decoded channels

use anyhow::{bail, Context};
use chirp_icf1010::core::{validation, Memory};
use chirp_icf1010::drivers::{
    CloneModeRadio, ICF1010Radio, IcomCloneModeRadio, Radio, RadioError,
};
use chirp_icf1010::formats::load_img;
use std::env;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

/// Which channels to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    All,
    One(u32),
    Range(u32, u32),
}

impl Selection {
    fn parse(arg: Option<&str>) -> anyhow::Result<Self> {
        let Some(arg) = arg else {
            return Ok(Selection::All);
        };

        match arg.split_once('-') {
            Some((start, end)) => {
                let start: u32 = start.parse().context("bad range start")?;
                let end: u32 = end.parse().context("bad range end")?;
                if start > end {
                    bail!("range {}-{} is backwards", start, end);
                }
                Ok(Selection::Range(start, end))
            }
            None => Ok(Selection::One(
                arg.parse().with_context(|| format!("bad memory number {:?}", arg))?,
            )),
        }
    }

    fn numbers(self, bounds: (u32, u32)) -> Vec<u32> {
        match self {
            Selection::All => (bounds.0..=bounds.1).collect(),
            Selection::One(n) => vec![n],
            Selection::Range(start, end) => (start..=end).collect(),
        }
    }
}

/// Result of decoding a set of channels. A channel that fails to decode is
/// recorded and the rest are still read.
#[derive(Default)]
struct Listing {
    memories: Vec<Memory>,
    empty: Vec<u32>,
    failed: Vec<(u32, RadioError)>,
}

fn read_channels(radio: &mut impl Radio, numbers: &[u32]) -> Listing {
    let mut listing = Listing::default();

    for &num in numbers {
        match radio.get_memory(num) {
            Ok(Some(mem)) => listing.memories.push(mem),
            Ok(None) => listing.empty.push(num),
            Err(e) => {
                tracing::error!("Memory #{}: {}", num, e);
                listing.failed.push((num, e));
            }
        }
    }

    listing
}

/// Keep channels that receive or transmit on `freq` (Hz)
fn on_frequency(memories: Vec<Memory>, freq: u64) -> Vec<Memory> {
    memories
        .into_iter()
        .filter(|m| m.freq == freq || (m.duplex == "split" && m.offset == freq))
        .collect()
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <file.img> [N | A-B] [--raw] [--json] [--freq=MHz]",
        program
    );
    eprintln!("\nExamples:");
    eprintln!("  {} radio.img                # Show all non-empty memories", program);
    eprintln!("  {} radio.img 4              # Show only memory #4", program);
    eprintln!("  {} radio.img 0-9 --raw      # Hex dump memories 0-9", program);
    eprintln!("  {} radio.img --json         # Memories as JSON", program);
    eprintln!("  {} radio.img --freq=146.52  # Memories using 146.52 MHz", program);
    std::process::exit(1);
}

fn main() -> anyhow::Result<()> {
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::NONE)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("parse-img");

    let (flags, positional): (Vec<&str>, Vec<&str>) = args
        .iter()
        .skip(1)
        .map(String::as_str)
        .partition(|a| a.starts_with("--"));

    let mut raw = false;
    let mut json = false;
    let mut freq = None;
    for flag in flags {
        match flag {
            "--raw" => raw = true,
            "--json" => json = true,
            _ => match flag.strip_prefix("--freq=") {
                Some(value) => freq = Some(Memory::parse_freq(value)?),
                None => {
                    eprintln!("Unknown option {}", flag);
                    usage(program);
                }
            },
        }
    }

    let Some(img_file) = positional.first().copied() else {
        usage(program);
    };
    let selection = Selection::parse(positional.get(1).copied())?;

    let (mmap, metadata) =
        load_img(img_file).with_context(|| format!("failed to load {}", img_file))?;

    let mut radio = ICF1010Radio::new();
    if !metadata.matches(radio.vendor(), radio.model()) {
        tracing::warn!(
            "Image was saved for {} {}, decoding as {}",
            metadata.vendor,
            metadata.model,
            radio.get_name()
        );
    }
    if !ICF1010Radio::match_model(mmap.get_packed(), img_file) {
        tracing::warn!(
            "Image is {} bytes, expected {}",
            mmap.len(),
            radio.get_memsize()
        );
    }
    radio.process_mmap(&mmap)?;

    let features = radio.get_features();
    let numbers = selection.numbers(features.memory_bounds);

    if raw {
        for num in numbers {
            println!("Memory #{}:", num);
            print!("{}", radio.get_raw_memory(num)?);
            println!();
        }
        return Ok(());
    }

    let mut listing = read_channels(&mut radio, &numbers);
    if let Some(freq) = freq {
        listing.memories = on_frequency(listing.memories, freq);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&listing.memories)?);
    } else {
        println!("Loaded: {}", img_file);
        println!("Radio: {}", radio.get_name());
        if !metadata.chirp_version.is_empty() {
            println!("Saved by: {}", metadata.chirp_version);
        }
        println!("Image size: {} bytes", mmap.len());
        println!("Bands: {}", features.concise_bands());
        println!(
            "Clone: model {:02X?}, {} blocks, end frame {:?}\n",
            radio.model_code(),
            radio.clone_block_count(),
            String::from_utf8_lossy(radio.endframe())
        );
    }

    let mut invalid = 0;
    for mem in &listing.memories {
        let msgs = validation::validate_memory(&features, mem);
        if validation::has_errors(&msgs) {
            invalid += 1;
        }
        if json {
            continue;
        }

        print_memory(mem);
        for error in validation::errors_only(&msgs) {
            println!("  error:   {}", error);
        }
        for warning in validation::warnings_only(&msgs) {
            println!("  warning: {}", warning);
        }
        println!();
    }

    if !json {
        if selection != Selection::All && freq.is_none() {
            for num in &listing.empty {
                println!("Memory #{}: <empty>\n", num);
            }
        }
        for (num, err) in &listing.failed {
            println!("Memory #{}: could not decode: {}\n", num, err);
        }
        println!("{} non-empty memories", listing.memories.len());
    }

    if !listing.failed.is_empty() || invalid > 0 {
        bail!(
            "{} memories could not be decoded, {} failed validation",
            listing.failed.len(),
            invalid
        );
    }

    Ok(())
}

fn print_memory(mem: &Memory) {
    println!("Memory #{}: \"{}\"", mem.number, mem.name);
    println!("  RX Frequency: {} MHz", mem.freq_str());
    println!("  TX Frequency: {} MHz", Memory::format_freq(mem.offset));
    println!(
        "  Tone Mode:    {}",
        if mem.tmode.is_empty() {
            "none"
        } else {
            &mem.tmode
        }
    );
    println!("  CTCSS TX:     {:.1} Hz", mem.rtone);
    println!("  CTCSS RX:     {:.1} Hz", mem.ctone);
    println!(
        "  Skip:         {}",
        if mem.skip.is_empty() {
            "none"
        } else {
            &mem.skip
        }
    );
}

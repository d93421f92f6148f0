//! File obfuscation front end: trains a model on a shared-key corpus and
//! pipes a payload file through zlib and the codec.

use std::error::Error;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use markov_obfuscate::markov::{
    BinaryFormatter, BookFormatter, Formatter, LyricsFormatter, Model,
};

#[derive(Debug, Parser)]
#[command(about = "Obfuscate data as text plausible under a shared-corpus Markov model")]
struct Args {
    /// How the corpus is tokenized and the output shaped.
    #[arg(short, long, value_enum, default_value = "book")]
    format: Shape,

    /// Alphabet size; both sides must agree.
    #[arg(short, long, default_value_t = 64)]
    base: u16,

    /// Deobfuscate instead of obfuscate.
    #[arg(short, long)]
    deobfuscate: bool,

    /// The shared-key corpus to train on.
    corpus: PathBuf,

    /// The file to obfuscate (or deobfuscate).
    data: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Shape {
    Book,
    Lyrics,
    Binary,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let outcome = match args.format {
        Shape::Book => run(&args, BookFormatter),
        Shape::Lyrics => run(&args, LyricsFormatter),
        Shape::Binary => run(&args, BinaryFormatter),
    };
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("obfuscate: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run<F: Formatter>(args: &Args, format: F) -> Result<(), Box<dyn Error>> {
    let corpus = fs::read_to_string(&args.corpus)?;
    let mut model = Model::with_formatter(args.base, format)?;
    model.learn_book(&corpus);

    let stdout = std::io::stdout();
    if args.deobfuscate {
        let encoded = fs::read_to_string(&args.data)?;
        let compressed = model.deobfuscate(&encoded)?;
        let mut payload = Vec::new();
        ZlibDecoder::new(compressed.as_slice()).read_to_end(&mut payload)?;
        stdout.lock().write_all(&payload)?;
    } else {
        let payload = fs::read(&args.data)?;
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::new(9));
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;
        let encoded = model.obfuscate(&compressed)?;
        stdout.lock().write_all(encoded.as_bytes())?;
    }
    Ok(())
}

use std::path::Path;

use lexfst_core::converter::Converter;
use lexfst_core::decoder::Decoder;
use lexfst_core::fst::Fst;
use lexfst_core::segmenter::Segmenter;

use super::{load_fst, TextSymbols};

fn open(fst_file: &str, symbols: Option<TextSymbols<'_>>) -> Fst {
    die!(load_fst(Path::new(fst_file), symbols), "Error: {}")
}

fn decoder(fst: &Fst, beam: Option<usize>) -> Decoder<'_> {
    match beam {
        Some(n) => Decoder::with_beam_size(fst, n),
        None => Decoder::new(fst),
    }
}

/// Decode whitespace-separated input symbols; prints output symbols
/// separated by spaces.
pub fn decode_cmd(fst_file: &str, symbols: Option<TextSymbols<'_>>, input: &[String], beam: Option<usize>) {
    let fst = open(fst_file, symbols);
    let output = die!(decoder(&fst, beam).decode(input), "Error decoding: {}");
    println!("{}", output.join(" "));
}

pub fn segment_cmd(fst_file: &str, symbols: Option<TextSymbols<'_>>, text: &str, beam: Option<usize>) {
    let fst = open(fst_file, symbols);
    let segmenter = Segmenter::new(decoder(&fst, beam));
    let segments = die!(segmenter.segment(text), "Error segmenting: {}");
    println!("{}", segments.join(" | "));
}

pub fn convert_cmd(fst_file: &str, symbols: Option<TextSymbols<'_>>, text: &str, beam: Option<usize>) {
    let fst = open(fst_file, symbols);
    let converter = Converter::new(decoder(&fst, beam));
    let converted = die!(converter.convert(text), "Error converting: {}");
    println!("{converted}");
}

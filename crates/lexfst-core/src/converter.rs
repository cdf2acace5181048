//! Script conversion: decode characters and concatenate the output.

use crate::decoder::{DecodeError, Decoder};

pub struct Converter<'a> {
    decoder: Decoder<'a>,
}

impl<'a> Converter<'a> {
    pub fn new(decoder: Decoder<'a>) -> Self {
        Self { decoder }
    }

    /// Concatenated output symbols; empty when decoding fails.
    pub fn convert(&self, text: &str) -> Result<String, DecodeError> {
        Ok(self.decoder.decode_str(text)?.concat())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fst::FstBuilder;
    use crate::lexicon::{add_ilabel_selfloops, LexiconCompiler, LexiconEntry, UnknownPolicy};

    fn entry(word: &str, symbols: &[&str]) -> LexiconEntry {
        LexiconEntry::from_labels(word, symbols, 0.0).unwrap()
    }

    #[test]
    fn convert_traditional_to_simplified() {
        let lexicon = vec![
            entry("头发", &["頭", "髮"]),
            entry("发展", &["發", "展"]),
            entry("发", &["發"]),
        ];
        // in-vocabulary characters that only occur inside words pass through
        let lexicon = add_ilabel_selfloops(&lexicon, 0.1);
        let mut builder = FstBuilder::new();
        LexiconCompiler::new(UnknownPolicy::Output)
            .compile(&lexicon, &mut builder)
            .unwrap();
        let fst = builder.build().without_disambig();
        let converter = Converter::new(Decoder::with_beam_size(&fst, 16));

        assert_eq!(converter.convert("頭髮發展").unwrap(), "头发发展");
        assert_eq!(converter.convert("展頭").unwrap(), "展頭");
        assert_eq!(converter.convert("我發").unwrap(), "我发");
    }

    #[test]
    fn heavy_words_beat_identity_entries() {
        let lexicon = vec![LexiconEntry::from_labels("头发", &["頭", "髮"], 6.0).unwrap()];
        let lexicon = add_ilabel_selfloops(&lexicon, 0.1);
        let mut builder = FstBuilder::new();
        LexiconCompiler::new(UnknownPolicy::Output)
            .compile(&lexicon, &mut builder)
            .unwrap();
        let fst = builder.build().without_disambig();
        let decoder = Decoder::with_beam_size(&fst, 16);

        assert_eq!(decoder.decode_str("頭髮").unwrap(), vec!["头发"]);
        assert_eq!(decoder.decode_str("髮頭").unwrap(), vec!["髮", "頭"]);
    }
}

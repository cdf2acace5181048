//! Word segmentation on top of a decoder whose FST emits `<break>` at
//! word boundaries.

use crate::decoder::{DecodeError, Decoder};
use crate::symbol::BRK_SYM;

pub struct Segmenter<'a> {
    decoder: Decoder<'a>,
}

impl<'a> Segmenter<'a> {
    pub fn new(decoder: Decoder<'a>) -> Self {
        Self { decoder }
    }

    /// Decode `text` character by character and split the output on
    /// `<break>`. Empty segments are dropped.
    pub fn segment(&self, text: &str) -> Result<Vec<String>, DecodeError> {
        let output = self.decoder.decode_str(text)?;
        let mut segments = Vec::new();
        let mut current = String::new();
        for symbol in output {
            if symbol == BRK_SYM {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            } else {
                current.push_str(&symbol);
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }
        Ok(segments)
    }
}

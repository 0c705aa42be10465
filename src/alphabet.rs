//! The encoded working alphabet of a compiled machine.
//!
//! Every cell of the compiled tape holds one symbol standing for a pair of source symbols
//! (one per track) together with a marker telling which logical heads sit on that cell.

use crate::ident::IdentGenerator;
use crate::types::{CompileError, Symbol};
use std::collections::HashMap;

/// The logical content of one cell: the top and bottom track symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackPair {
    pub top: Symbol,
    pub bottom: Symbol,
}

impl TrackPair {
    pub fn new(top: &str, bottom: &str) -> Self {
        Self {
            top: top.to_string(),
            bottom: bottom.to_string(),
        }
    }
}

/// Which logical heads occupy a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    None,
    Top,
    Bottom,
    Both,
}

/// The four encoded symbols of one [`TrackPair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetterEncoding {
    pub no_head: Symbol,
    pub top_head: Symbol,
    pub bottom_head: Symbol,
    pub both_heads: Symbol,
}

impl LetterEncoding {
    /// Returns the symbol carrying `marker`.
    pub fn symbol(&self, marker: Marker) -> &Symbol {
        match marker {
            Marker::None => &self.no_head,
            Marker::Top => &self.top_head,
            Marker::Bottom => &self.bottom_head,
            Marker::Both => &self.both_heads,
        }
    }

    /// All four variants, no-head first.
    pub fn variants(&self) -> [(Marker, &Symbol); 4] {
        [
            (Marker::None, &self.no_head),
            (Marker::Top, &self.top_head),
            (Marker::Bottom, &self.bottom_head),
            (Marker::Both, &self.both_heads),
        ]
    }
}

/// Global symbols delimiting the encoded part of the tape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinels {
    /// Written on cell 0; sweeps turn around on it.
    pub tape_start: Symbol,
    /// Reserved right delimiter. No emitted transition reads or writes it: the encoded part
    /// of the tape is delimited on the right by the native blank and grows lazily.
    pub word_end: Symbol,
}

/// Every [`LetterEncoding`] of a source working alphabet, plus the sentinels.
#[derive(Debug, Clone)]
pub struct EncodedAlphabet {
    letters: Vec<Symbol>,
    blank: Symbol,
    pairs: Vec<(TrackPair, LetterEncoding)>,
    index: HashMap<TrackPair, usize>,
    decode: HashMap<Symbol, (usize, Marker)>,
    sentinels: Sentinels,
}

impl EncodedAlphabet {
    /// Allocates the encodings of every ordered pair over `letters` and both sentinels.
    ///
    /// `letters` is the source working alphabet and must contain `blank`.
    pub fn build(letters: &[Symbol], blank: &str, names: &mut IdentGenerator) -> Self {
        let mut pairs = Vec::with_capacity(letters.len() * letters.len());
        let mut index = HashMap::new();
        let mut decode = HashMap::new();

        for top in letters {
            for bottom in letters {
                let encoding = LetterEncoding {
                    no_head: names.fresh_hinted(&format!("{top}-{bottom}")),
                    top_head: names.fresh_hinted(&format!("{top}_H-{bottom}")),
                    bottom_head: names.fresh_hinted(&format!("{top}-{bottom}_H")),
                    both_heads: names.fresh_hinted(&format!("{top}_H-{bottom}_H")),
                };

                let position = pairs.len();
                for (marker, symbol) in encoding.variants() {
                    decode.insert(symbol.clone(), (position, marker));
                }
                let pair = TrackPair::new(top, bottom);
                index.insert(pair.clone(), position);
                pairs.push((pair, encoding));
            }
        }

        let sentinels = Sentinels {
            tape_start: names.fresh_hinted("tape-start"),
            word_end: names.fresh_hinted("word-end"),
        };

        Self {
            letters: letters.to_vec(),
            blank: blank.to_string(),
            pairs,
            index,
            decode,
            sentinels,
        }
    }

    /// Looks up the encoding of `(top, bottom)`.
    pub fn encoding(&self, top: &str, bottom: &str) -> Result<&LetterEncoding, CompileError> {
        self.get(&TrackPair::new(top, bottom))
    }

    /// Looks up the encoding of `pair`.
    pub fn get(&self, pair: &TrackPair) -> Result<&LetterEncoding, CompileError> {
        self.index
            .get(pair)
            .map(|&i| &self.pairs[i].1)
            .ok_or_else(|| CompileError::MissingLookup {
                table: "letter encoding",
                key: format!("({}, {})", pair.top, pair.bottom),
            })
    }

    /// Every pair with its encoding, top-major in source alphabet order.
    pub fn pairs(&self) -> impl Iterator<Item = (&TrackPair, &LetterEncoding)> {
        self.pairs.iter().map(|(pair, encoding)| (pair, encoding))
    }

    /// Resolves an encoded symbol back to its pair and marker.
    pub fn decode(&self, symbol: &str) -> Option<(&TrackPair, Marker)> {
        self.decode
            .get(symbol)
            .map(|&(i, marker)| (&self.pairs[i].0, marker))
    }

    /// The source working alphabet the encodings were built from.
    pub fn letters(&self) -> &[Symbol] {
        &self.letters
    }

    /// The source blank symbol, also the native blank of the compiled tape.
    pub fn blank(&self) -> &Symbol {
        &self.blank
    }

    /// The encoding of `(blank, blank)`, written whenever the encoded tape grows.
    pub fn blank_cell(&self) -> Result<&LetterEncoding, CompileError> {
        self.encoding(&self.blank, &self.blank)
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    /// All encoded symbols: four per pair, then the two sentinels.
    pub fn symbols(&self) -> Vec<Symbol> {
        self.pairs
            .iter()
            .flat_map(|(_, encoding)| encoding.variants().map(|(_, s)| s.clone()))
            .chain([
                self.sentinels.tape_start.clone(),
                self.sentinels.word_end.clone(),
            ])
            .collect()
    }

    /// Number of encoded symbols, `4 * |letters|^2 + 2`.
    pub fn size(&self) -> usize {
        4 * self.pairs.len() + 2
    }
}

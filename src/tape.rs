//! Conversions between dual-track configurations and the tape of a compiled machine.
//!
//! A compiled tape holds the tape-start sentinel on cell 0, followed by one encoded symbol per
//! source cell. Cells past the encoded part are native blanks and stand for blank pairs.

use crate::alphabet::{EncodedAlphabet, Marker};
use crate::types::{Symbol, TuringMachineError};

/// Both tracks of a dual-track configuration together with the two head positions.
///
/// Trailing blanks are trimmed from both tracks so that views of equal configurations compare
/// equal whatever part of the tape was visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackView {
    pub top: Vec<Symbol>,
    pub bottom: Vec<Symbol>,
    pub top_head: usize,
    pub bottom_head: usize,
}

impl TrackView {
    pub fn new(
        top: &[Symbol],
        bottom: &[Symbol],
        top_head: usize,
        bottom_head: usize,
        blank: &str,
    ) -> Self {
        Self {
            top: trimmed(top, blank),
            bottom: trimmed(bottom, blank),
            top_head,
            bottom_head,
        }
    }
}

fn trimmed(track: &[Symbol], blank: &str) -> Vec<Symbol> {
    let end = track
        .iter()
        .rposition(|symbol| symbol != blank)
        .map_or(0, |i| i + 1);
    track[..end].to_vec()
}

/// Encodes `word` as the compiled tape the setup protocol leaves behind: the sentinel, then the
/// word on the top track over a blank bottom track, with both head markers on the first cell.
///
/// # Returns
///
/// * `Ok(Vec<Symbol>)` with the encoded tape.
/// * `Err(TuringMachineError::TapeError)` if `word` uses a symbol outside the alphabet.
pub fn encode_word(
    alphabet: &EncodedAlphabet,
    word: &[Symbol],
) -> Result<Vec<Symbol>, TuringMachineError> {
    let blank = alphabet.blank();
    let mut tape = Vec::with_capacity(word.len() + 1);
    tape.push(alphabet.sentinels().tape_start.clone());

    if word.is_empty() {
        tape.push(alphabet.blank_cell()?.both_heads.clone());
        return Ok(tape);
    }

    for (i, symbol) in word.iter().enumerate() {
        let encoding = alphabet
            .encoding(symbol, blank)
            .map_err(|_| TuringMachineError::TapeError(format!("Unknown input symbol {symbol}")))?;
        let marker = if i == 0 { Marker::Both } else { Marker::None };
        tape.push(encoding.symbol(marker).clone());
    }

    Ok(tape)
}

/// Decodes a compiled tape back into both tracks and both head positions.
///
/// Positions are source cells: compiled cell `i + 1` holds source cell `i`.
///
/// # Returns
///
/// * `Ok(TrackView)` if the tape holds a well-formed encoding.
/// * `Err(TuringMachineError::TapeError)` if the sentinel is missing, a cell holds a foreign
///   symbol, or a head marker is missing or duplicated.
pub fn decode_tape(
    alphabet: &EncodedAlphabet,
    tape: &[Symbol],
) -> Result<TrackView, TuringMachineError> {
    let blank = alphabet.blank();
    match tape.first() {
        Some(first) if *first == alphabet.sentinels().tape_start => {}
        _ => {
            return Err(TuringMachineError::TapeError(
                "Expected the tape-start sentinel on cell 0".to_string(),
            ))
        }
    }

    let mut top = Vec::with_capacity(tape.len());
    let mut bottom = Vec::with_capacity(tape.len());
    let mut top_head = None;
    let mut bottom_head = None;

    for (position, symbol) in tape[1..].iter().enumerate() {
        if symbol == blank {
            top.push(blank.clone());
            bottom.push(blank.clone());
            continue;
        }

        let (pair, marker) = alphabet.decode(symbol).ok_or_else(|| {
            TuringMachineError::TapeError(format!(
                "Unexpected symbol {symbol} on cell {}",
                position + 1
            ))
        })?;
        top.push(pair.top.clone());
        bottom.push(pair.bottom.clone());

        if matches!(marker, Marker::Top | Marker::Both) {
            place_head(&mut top_head, position, "top")?;
        }
        if matches!(marker, Marker::Bottom | Marker::Both) {
            place_head(&mut bottom_head, position, "bottom")?;
        }
    }

    let missing = |role: &str| TuringMachineError::TapeError(format!("No {role} head marker"));
    Ok(TrackView::new(
        &top,
        &bottom,
        top_head.ok_or_else(|| missing("top"))?,
        bottom_head.ok_or_else(|| missing("bottom"))?,
        blank,
    ))
}

fn place_head(
    head: &mut Option<usize>,
    position: usize,
    role: &str,
) -> Result<(), TuringMachineError> {
    match head.replace(position) {
        Some(previous) => Err(TuringMachineError::TapeError(format!(
            "Duplicate {role} head marker on cells {} and {}",
            previous + 1,
            position + 1
        ))),
        None => Ok(()),
    }
}

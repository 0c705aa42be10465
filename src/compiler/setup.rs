use super::Compiler;
use crate::types::{CompileError, Direction};
use tracing::{debug, info};

impl Compiler<'_> {
    /// Turns the raw input word into the initial encoded configuration.
    ///
    /// The word is shifted one cell to the right behind the tape-start sentinel and encoded
    /// on the top track, the bottom track left blank. Both head markers land on the first
    /// cell. The head is then walked back to the sentinel so that scanning starts from the
    /// initial state's entry point.
    pub(super) fn program_setup(&mut self) -> Result<(), CompileError> {
        let source = self.source;
        let start = &source.initial_state;
        let blank = &source.blank;

        if source.is_terminal(start) {
            debug!(state = %start, "Initial state is terminal, no setup emitted");
            return Ok(());
        }

        let entry = self.aliases.get(start)?.clone();
        let sentinel = self.alphabet.sentinels().tape_start.clone();

        // Empty input: the head starts over a blank.
        let first_blank = self.names.fresh_hinted("move-first-blank");
        let both_blank = self.alphabet.blank_cell()?.both_heads.clone();
        self.table
            .insert(start, blank, &first_blank, &sentinel, Direction::Right)?;
        self.table
            .insert(&first_blank, blank, &first_blank, &both_blank, Direction::Left)?;
        self.table
            .pass(&first_blank, &sentinel, &entry.scan_entry, Direction::Right)?;

        // The first symbol is carried in its own state so it gets both head markers.
        let mut carry_first = Vec::with_capacity(source.input_alphabet.len());
        for symbol in &source.input_alphabet {
            let state = self
                .names
                .fresh_hinted(&format!("setup-move-1st-{symbol}"));
            self.table
                .insert(start, symbol, &state, &sentinel, Direction::Right)?;
            carry_first.push((symbol, state));
        }

        let carry: Vec<_> = source
            .input_alphabet
            .iter()
            .map(|symbol| (symbol, self.names.fresh_hinted(&format!("setup-move-{symbol}"))))
            .collect();

        for (carried, state) in &carry_first {
            let cell = self.alphabet.encoding(carried, blank)?.both_heads.clone();
            for (next, next_state) in &carry {
                self.table
                    .insert(state, next, next_state, &cell, Direction::Right)?;
            }
            self.table
                .insert(state, blank, &entry.return_sweep, &cell, Direction::Left)?;
        }

        for (carried, state) in &carry {
            let cell = self.alphabet.encoding(carried, blank)?.no_head.clone();
            for (next, next_state) in &carry {
                self.table
                    .insert(state, next, next_state, &cell, Direction::Right)?;
            }
            self.table
                .insert(state, blank, &entry.return_sweep, &cell, Direction::Left)?;
        }

        info!(transitions = self.table.len(), "Setup protocol emitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::compile;
    use crate::types::{Direction, Machine};

    fn machine() -> Machine {
        Machine::new("Setup", 2, "_")
            .with_input(&["0", "1"])
            .rule(
                "start",
                &["0", "_"],
                &["0", "_"],
                &[Direction::Stay, Direction::Stay],
                "accept",
            )
    }

    #[test]
    fn test_empty_input_plants_both_markers_on_blank_pair() {
        let compilation = compile(&machine()).unwrap();
        let machine = &compilation.machine;
        let sentinel = &compilation.alphabet.sentinels().tape_start;
        let both_blank = &compilation.alphabet.blank_cell().unwrap().both_heads;

        let first = machine.transition("start", &["_".to_string()]).unwrap();
        assert_eq!(&first.write[0], sentinel);
        assert_eq!(first.directions[0], Direction::Right);

        let planted = machine
            .transition(&first.next_state, &["_".to_string()])
            .unwrap();
        assert_eq!(&planted.write[0], both_blank);
        assert_eq!(planted.directions[0], Direction::Left);

        let back = machine
            .transition(&first.next_state, &[sentinel.clone()])
            .unwrap();
        assert_eq!(
            back.next_state,
            compilation.aliases.get("start").unwrap().scan_entry
        );
    }

    #[test]
    fn test_first_cell_carries_both_markers() {
        let compilation = compile(&machine()).unwrap();
        let machine = &compilation.machine;
        let encoding = compilation.alphabet.encoding("1", "_").unwrap();
        let going_back = &compilation.aliases.get("start").unwrap().return_sweep;

        let first = machine.transition("start", &["1".to_string()]).unwrap();
        assert_eq!(first.next_state, "(setup-move-1st-1)");

        // Single-symbol word: the first cell is also the last one.
        let last = machine
            .transition(&first.next_state, &["_".to_string()])
            .unwrap();
        assert_eq!(last.write[0], encoding.both_heads);
        assert_eq!(&last.next_state, going_back);

        let shifted = machine
            .transition(&first.next_state, &["0".to_string()])
            .unwrap();
        assert_eq!(shifted.write[0], encoding.both_heads);
        assert_eq!(shifted.next_state, "(setup-move-0)");

        let tail = machine
            .transition("(setup-move-0)", &["_".to_string()])
            .unwrap();
        assert_eq!(
            tail.write[0],
            compilation.alphabet.encoding("0", "_").unwrap().no_head
        );
        assert_eq!(tail.directions[0], Direction::Left);
    }
}

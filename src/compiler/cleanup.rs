use super::Compiler;
use crate::types::{CompileError, Direction};
use tracing::info;

impl Compiler<'_> {
    /// Emits the return sweeps closing every macro-step.
    ///
    /// Each sweep walks left over the encoded cells whatever their markers, then steps off
    /// the tape-start sentinel into the scanning state of the same source state.
    pub(super) fn program_cleanup(&mut self) -> Result<(), CompileError> {
        let sentinel = &self.alphabet.sentinels().tape_start;

        for (_, alias) in self.aliases.iter() {
            for (_, cell) in self.alphabet.pairs() {
                for (_, symbol) in cell.variants() {
                    self.table
                        .pass(&alias.return_sweep, symbol, &alias.return_sweep, Direction::Left)?;
                }
            }
            self.table
                .pass(&alias.return_sweep, sentinel, &alias.scan_entry, Direction::Right)?;
        }

        info!(
            sweeps = self.aliases.len(),
            transitions = self.table.len(),
            "Return sweeps emitted"
        );
        Ok(())
    }
}

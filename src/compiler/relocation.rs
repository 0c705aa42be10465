use super::scanner::{SimulatedState, SimulatedStates};
use super::Compiler;
use crate::alphabet::Marker;
use crate::role::{Bottom, HeadRole, Top};
use crate::types::{CompileError, Direction, State, Symbol, Transition};
use std::collections::HashMap;
use tracing::{debug, info};

/// A source transition decoded into its effect on both tracks.
///
/// The relocation machinery depends on nothing else, so every simulated state whose
/// transition decodes to the same value shares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulatedTransition {
    pub target: State,
    pub top: Symbol,
    pub bottom: Symbol,
    pub top_move: Direction,
    pub bottom_move: Direction,
}

impl SimulatedTransition {
    fn decode(transition: &Transition) -> Result<Self, CompileError> {
        match (transition.write.as_slice(), transition.directions.as_slice()) {
            ([top, bottom], [top_move, bottom_move]) => Ok(Self {
                target: transition.next_state.clone(),
                top: top.clone(),
                bottom: bottom.clone(),
                top_move: *top_move,
                bottom_move: *bottom_move,
            }),
            _ => Err(CompileError::MissingLookup {
                table: "dual-track transition",
                key: format!("{transition:?}"),
            }),
        }
    }
}

/// The states a simulated state hands control to, depending on the marker under the head.
#[derive(Debug, Clone)]
struct EntryPoints {
    top_first: State,
    bottom_first: State,
    together: Option<State>,
}

impl EntryPoints {
    /// The entry used when both heads share the cell under the physical head.
    ///
    /// Equal moves relocate both markers at once. Otherwise the head moving further right
    /// goes first, which leaves the other one at or left of the physical head for the seek.
    fn colocated(&self, key: &SimulatedTransition) -> &State {
        match &self.together {
            Some(together) => together,
            None if key.top_move.reach() > key.bottom_move.reach() => &self.top_first,
            None => &self.bottom_first,
        }
    }

    fn for_marker(&self, marker: Marker, key: &SimulatedTransition) -> &State {
        match marker {
            Marker::Top => &self.top_first,
            Marker::Bottom => &self.bottom_first,
            Marker::Both | Marker::None => self.colocated(key),
        }
    }
}

impl Compiler<'_> {
    /// Emits what every simulated state does once both symbols under the heads are known.
    ///
    /// Returns the number of distinct relocation machineries built.
    pub(super) fn program_transitions(
        &mut self,
        simulated: &SimulatedStates,
    ) -> Result<usize, CompileError> {
        let source = self.source;
        let mut relocations: HashMap<SimulatedTransition, EntryPoints> = HashMap::new();

        for (key, alias) in simulated.iter() {
            let read = [key.top.clone(), key.bottom.clone()];
            let Some(transition) = source.transition(&key.state, &read) else {
                debug!(state = %key.state, top = %key.top, bottom = %key.bottom, "No source transition");
                continue;
            };

            if source.is_terminal(&transition.next_state) {
                self.program_halt(key, alias, &transition.next_state)?;
                continue;
            }

            let decoded = SimulatedTransition::decode(transition)?;
            let entries = match relocations.get(&decoded) {
                Some(entries) => entries.clone(),
                None => {
                    let entries = self.program_relocation(&decoded)?;
                    relocations.insert(decoded.clone(), entries.clone());
                    entries
                }
            };

            for (marker, symbol) in self.cells_under_head(key)? {
                self.table.pass(
                    alias,
                    &symbol,
                    entries.for_marker(marker, &decoded),
                    Direction::Stay,
                )?;
            }
        }

        info!(
            relocations = relocations.len(),
            transitions = self.table.len(),
            "Transition compiler emitted"
        );
        Ok(relocations.len())
    }

    /// The symbols a simulated state can find under the head: the marker of whichever head
    /// the scan found last, or the shared marker of both.
    fn cells_under_head(&self, key: &SimulatedState) -> Result<Vec<(Marker, Symbol)>, CompileError> {
        let mut cells = Vec::with_capacity(2 * self.alphabet.letters().len() + 1);
        for letter in self.alphabet.letters() {
            let top = self.alphabet.encoding(&key.top, letter)?;
            cells.push((Marker::Top, top.top_head.clone()));
            let bottom = self.alphabet.encoding(letter, &key.bottom)?;
            cells.push((Marker::Bottom, bottom.bottom_head.clone()));
        }
        let both = self.alphabet.encoding(&key.top, &key.bottom)?;
        cells.push((Marker::Both, both.both_heads.clone()));
        Ok(cells)
    }

    /// Jumps straight to an accepting or rejecting state, erasing the cell under the head.
    fn program_halt(
        &mut self,
        key: &SimulatedState,
        alias: &str,
        target: &str,
    ) -> Result<(), CompileError> {
        let blank = self.source.blank.clone();
        for (_, symbol) in self.cells_under_head(key)? {
            self.table
                .insert(alias, &symbol, target, &blank, Direction::Stay)?;
        }
        Ok(())
    }

    fn program_relocation(&mut self, key: &SimulatedTransition) -> Result<EntryPoints, CompileError> {
        let out = self.aliases.get(&key.target)?.return_sweep.clone();

        let top_first = self.program_relocation_from::<Top>(key, &out)?;
        let bottom_first = self.program_relocation_from::<Bottom>(key, &out)?;
        let together = if key.top_move == key.bottom_move {
            Some(self.program_relocation_together(key, &out)?)
        } else {
            None
        };

        debug!(next_state = %key.target, top = %key.top, bottom = %key.bottom, top_first = %top_first, "Relocation built");
        Ok(EntryPoints {
            top_first,
            bottom_first,
            together,
        })
    }

    /// Relocates `H` from the cell under the head, finds the other head to the left and
    /// relocates it as well, ending in `out`.
    fn program_relocation_from<H: HeadRole>(
        &mut self,
        key: &SimulatedTransition,
        out: &str,
    ) -> Result<State, CompileError> {
        let other = <H::Other as HeadRole>::NAME;
        let entry = self
            .names
            .fresh_hinted(&format!("{}-move-{}-first", key.target, H::NAME));
        let seek = self
            .names
            .fresh_hinted(&format!("{}-seek-{other}", key.target));
        let second = self
            .names
            .fresh_hinted(&format!("{}-move-{other}-second", key.target));

        self.program_move::<H>(
            H::pick(&key.top, &key.bottom),
            *H::pick(&key.top_move, &key.bottom_move),
            &entry,
            &seek,
        )?;
        self.program_look_for::<H::Other>(&seek, &second)?;
        self.program_move::<H::Other>(
            <H::Other as HeadRole>::pick(&key.top, &key.bottom),
            *<H::Other as HeadRole>::pick(&key.top_move, &key.bottom_move),
            &second,
            out,
        )?;

        Ok(entry)
    }

    /// Rewrites `H`'s symbol on the cell under the head to `letter` and moves `H`'s marker.
    ///
    /// The marker is lifted from the cell (leaving the other head's marker if it shares the
    /// cell), the head moves, and a mark state plants the marker on the new cell.
    fn program_move<H: HeadRole>(
        &mut self,
        letter: &str,
        direction: Direction,
        entry: &str,
        out: &str,
    ) -> Result<(), CompileError> {
        let mark = match direction {
            Direction::Stay => None,
            _ => Some(self.names.fresh_hinted(&format!("mark-{}", H::NAME))),
        };

        for (pair, current) in self.alphabet.pairs() {
            let updated = self.alphabet.get(&H::pair(letter, H::other_of(pair)))?;
            match &mark {
                None => {
                    self.table.insert(
                        entry,
                        H::this_marker(current),
                        out,
                        H::this_marker(updated),
                        Direction::Stay,
                    )?;
                    self.table.insert(
                        entry,
                        &current.both_heads,
                        out,
                        &updated.both_heads,
                        Direction::Stay,
                    )?;
                }
                Some(mark) => {
                    self.table.insert(
                        entry,
                        H::this_marker(current),
                        mark,
                        &updated.no_head,
                        direction,
                    )?;
                    self.table.insert(
                        entry,
                        &current.both_heads,
                        mark,
                        H::other_marker(updated),
                        direction,
                    )?;
                }
            }
        }

        if let Some(mark) = mark {
            self.program_mark::<H>(&mark, out)?;
        }
        Ok(())
    }

    /// Plants `H`'s marker on the cell under the head.
    ///
    /// A native blank means the head walked off the encoded part of the tape, which grows by
    /// one blank pair. The tape-start sentinel means a left move from the first cell; the
    /// head steps back and the marker lands where it was.
    fn program_mark<H: HeadRole>(&mut self, mark: &str, out: &str) -> Result<(), CompileError> {
        for (_, cell) in self.alphabet.pairs() {
            self.table
                .insert(mark, &cell.no_head, out, H::this_marker(cell), Direction::Stay)?;
            self.table.insert(
                mark,
                H::other_marker(cell),
                out,
                &cell.both_heads,
                Direction::Stay,
            )?;
        }

        let blank_cell = self.alphabet.blank_cell()?;
        self.table.insert(
            mark,
            self.alphabet.blank(),
            out,
            H::this_marker(blank_cell),
            Direction::Stay,
        )?;
        self.table.pass(
            mark,
            &self.alphabet.sentinels().tape_start,
            mark,
            Direction::Right,
        )?;
        Ok(())
    }

    /// Walks left until `H`'s marker, alone or shared, is under the head.
    fn program_look_for<H: HeadRole>(&mut self, seek: &str, found: &str) -> Result<(), CompileError> {
        for (_, cell) in self.alphabet.pairs() {
            self.table
                .pass(seek, H::this_marker(cell), found, Direction::Stay)?;
            self.table
                .pass(seek, &cell.both_heads, found, Direction::Stay)?;
            self.table
                .pass(seek, &cell.no_head, seek, Direction::Left)?;
            self.table
                .pass(seek, H::other_marker(cell), seek, Direction::Left)?;
        }
        Ok(())
    }

    /// Relocates two co-located heads that move the same way in a single pass.
    fn program_relocation_together(
        &mut self,
        key: &SimulatedTransition,
        out: &str,
    ) -> Result<State, CompileError> {
        let entry = self
            .names
            .fresh_hinted(&format!("{}-move-both", key.target));
        let updated = self.alphabet.encoding(&key.top, &key.bottom)?.clone();
        let direction = key.top_move;

        if direction == Direction::Stay {
            for (_, current) in self.alphabet.pairs() {
                self.table.insert(
                    &entry,
                    &current.both_heads,
                    out,
                    &updated.both_heads,
                    Direction::Stay,
                )?;
            }
            return Ok(entry);
        }

        let mark = self.names.fresh_hinted("mark-both");
        for (_, current) in self.alphabet.pairs() {
            self.table
                .insert(&entry, &current.both_heads, &mark, &updated.no_head, direction)?;
            self.table
                .insert(&mark, &current.no_head, out, &current.both_heads, Direction::Stay)?;
        }

        let blank_cell = self.alphabet.blank_cell()?;
        self.table.insert(
            &mark,
            self.alphabet.blank(),
            out,
            &blank_cell.both_heads,
            Direction::Stay,
        )?;
        self.table.pass(
            &mark,
            &self.alphabet.sentinels().tape_start,
            &mark,
            Direction::Right,
        )?;

        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::super::compile;
    use super::*;
    use crate::types::Direction::{Left, Right, Stay};
    use crate::types::Machine;

    fn decoded(top_move: Direction, bottom_move: Direction) -> SimulatedTransition {
        SimulatedTransition {
            target: "q".to_string(),
            top: "a".to_string(),
            bottom: "b".to_string(),
            top_move,
            bottom_move,
        }
    }

    fn entry_points(together: Option<&str>) -> EntryPoints {
        EntryPoints {
            top_first: "top".to_string(),
            bottom_first: "bottom".to_string(),
            together: together.map(str::to_string),
        }
    }

    #[test]
    fn test_decode_dual_track_transition() {
        let transition = Transition {
            read: vec!["a".to_string(), "_".to_string()],
            write: vec!["b".to_string(), "c".to_string()],
            directions: vec![Right, Left],
            next_state: "q".to_string(),
        };

        let decoded = SimulatedTransition::decode(&transition).unwrap();
        assert_eq!(decoded.target, "q");
        assert_eq!(decoded.top, "b");
        assert_eq!(decoded.bottom, "c");
        assert_eq!(decoded.top_move, Right);
        assert_eq!(decoded.bottom_move, Left);
    }

    #[test]
    fn test_decode_rejects_wrong_arity() {
        let transition = Transition {
            read: vec!["a".to_string()],
            write: vec!["b".to_string()],
            directions: vec![Right],
            next_state: "q".to_string(),
        };

        assert!(matches!(
            SimulatedTransition::decode(&transition),
            Err(CompileError::MissingLookup { .. })
        ));
    }

    #[test]
    fn test_colocated_entry_prefers_rightmost_mover() {
        let entries = entry_points(None);

        assert_eq!(entries.colocated(&decoded(Right, Left)), "top");
        assert_eq!(entries.colocated(&decoded(Stay, Left)), "top");
        assert_eq!(entries.colocated(&decoded(Left, Stay)), "bottom");
        assert_eq!(entries.colocated(&decoded(Stay, Right)), "bottom");

        let entries = entry_points(Some("both"));
        assert_eq!(entries.colocated(&decoded(Left, Left)), "both");
        assert_eq!(entries.for_marker(Marker::Top, &decoded(Left, Left)), "top");
        assert_eq!(
            entries.for_marker(Marker::Bottom, &decoded(Left, Left)),
            "bottom"
        );
    }

    #[test]
    fn test_accept_shortcut_builds_no_relocation() {
        let machine = Machine::new("Accept Zero", 2, "_")
            .with_input(&["0"])
            .with_states("I", "Accept", "Reject")
            .rule("I", &["0", "_"], &["0", "_"], &[Stay, Stay], "Accept");

        let compilation = compile(&machine).unwrap();
        assert_eq!(compilation.relocations, 0);

        let alias = compilation.simulated.get("I", "0", "_").unwrap();
        let both = &compilation.alphabet.encoding("0", "_").unwrap().both_heads;
        let halt = compilation
            .machine
            .transition(alias, &[both.clone()])
            .unwrap();
        assert_eq!(halt.next_state, "Accept");
        assert_eq!(halt.write, vec!["_"]);
        assert_eq!(halt.directions, vec![Stay]);

        // Top-only markers for 0 and bottom-only markers for _ are covered as well.
        let rules = &compilation.machine.rules[alias];
        assert_eq!(rules.len(), 2 * 2 + 1);
        assert!(rules.iter().all(|t| t.next_state == "Accept"));
    }

    #[test]
    fn test_shared_relocation_is_built_once() {
        let machine = Machine::new("Shared", 2, "_")
            .with_input(&["a", "b"])
            .rule("start", &["a", "_"], &["b", "b"], &[Right, Right], "next")
            .rule("start", &["b", "_"], &["b", "b"], &[Right, Right], "next")
            .rule("next", &["_", "_"], &["_", "_"], &[Stay, Stay], "accept");

        let compilation = compile(&machine).unwrap();
        assert_eq!(compilation.relocations, 1);

        let machine = &compilation.machine;
        let enter = |top: &str| {
            let alias = compilation.simulated.get("start", top, "_").unwrap();
            let both = &compilation.alphabet.encoding(top, "_").unwrap().both_heads;
            machine
                .transition(alias, &[both.clone()])
                .unwrap()
                .next_state
                .clone()
        };
        assert_eq!(enter("a"), enter("b"));
    }

    #[test]
    fn test_distinct_moves_build_distinct_relocations() {
        let machine = Machine::new("Distinct", 2, "_")
            .with_input(&["a", "b"])
            .rule("start", &["a", "_"], &["a", "_"], &[Right, Stay], "start")
            .rule("start", &["b", "_"], &["b", "_"], &[Stay, Right], "start");

        let compilation = compile(&machine).unwrap();
        assert_eq!(compilation.relocations, 2);
    }

    #[test]
    fn test_mark_state_extends_tape_and_bounces_off_sentinel() {
        let machine = Machine::new("Mark", 2, "_")
            .with_input(&["a"])
            .rule("start", &["a", "_"], &["a", "_"], &[Right, Left], "start");

        let compilation = compile(&machine).unwrap();
        let machine = &compilation.machine;
        let sentinel = &compilation.alphabet.sentinels().tape_start;
        let blank_cell = compilation.alphabet.blank_cell().unwrap();

        let top_mark = "(mark-top)";
        let extend = machine.transition(top_mark, &["_".to_string()]).unwrap();
        assert_eq!(extend.write[0], blank_cell.top_head);
        assert_eq!(extend.directions[0], Stay);

        let bounce = machine.transition(top_mark, &[sentinel.clone()]).unwrap();
        assert_eq!(bounce.next_state, top_mark);
        assert_eq!(&bounce.write[0], sentinel);
        assert_eq!(bounce.directions[0], Right);

        let merge = machine
            .transition(top_mark, &[blank_cell.bottom_head.clone()])
            .unwrap();
        assert_eq!(merge.write[0], blank_cell.both_heads);
    }
}

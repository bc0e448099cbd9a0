/*!
(The representation of) an atom, aka. a 'variable'.

Each atom is a u32, and atoms are allocated in sequence.
The atom `0` is never handed out: each engine reserves it internally, and so the first atom available to a caller is `1`.

Atoms appear in three numberings:
- The *shared* numbering, which is the numbering seen by a caller of a [portfolio](crate::portfolio) and used for every fact placed in a [pool](crate::sync::SharedClausePool).
  As every atom the caller asks for is allocated in every instance, in the same order, the shared numbering is identical across instances.
- The *outer* numbering of an engine, which is stable for the life of the engine and includes any auxiliary atoms the engine introduces for itself.
- The *inner* numbering of an engine, which is the numbering used during search, and which may be permuted from time to time.

```rust
# use raft_sat::structures::atom::{Atom, TOP_ATOM};
let atoms = (TOP_ATOM + 1..=3).collect::<Vec<Atom>>();
assert_eq!(atoms, vec![1, 2, 3]);
```
*/

/// An atom, aka. a 'variable'.
pub type Atom = u32;

/// The atom `0` is reserved in every numbering.
pub const TOP_ATOM: Atom = 0;

/// The maximum instance of an atom.
pub const ATOM_MAX: Atom = i32::MAX.unsigned_abs();

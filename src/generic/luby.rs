/*!
An iterator over the luby sequence, used to schedule restarts.

See <https://oeis.org/A182105> for details on the luby sequence.

```rust
# use raft_sat::generic::luby::Luby;
let mut luby = Luby::default();
assert_eq!(luby.current(), 1);
assert_eq!(luby.next(), Some(1));
assert_eq!(luby.next(), Some(2));
```
*/

/// Representation used for numbers in a luby sequence.
pub type LubyRepresentation = u32;

/// The state of the sequence, as a position and the element at that position.
pub struct Luby {
    position: LubyRepresentation,
    element: LubyRepresentation,
}

// The default is on the first element of the sequence.
impl Default for Luby {
    fn default() -> Self {
        let mut luby = Luby {
            position: 0,
            element: 0,
        };
        luby.next();
        luby
    }
}

impl Iterator for Luby {
    type Item = LubyRepresentation;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position & self.position.wrapping_neg() == self.element {
            self.position = self.position.checked_add(1)?;
            self.element = 1;
        } else {
            self.element = self.element.checked_add(self.element)?;
        }

        Some(self.element)
    }
}

impl Luby {
    /// The current element of the sequence.
    pub fn current(&self) -> LubyRepresentation {
        self.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // https://oeis.org/A182105
    const LUBY_PREFIX: &[LubyRepresentation] = &[
        1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8, 1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8,
        16, 1, 1, 2,
    ];

    #[test]
    fn prefix() {
        let mut luby = Luby {
            position: 0,
            element: 0,
        };
        for known_value in LUBY_PREFIX {
            assert_eq!(luby.next(), Some(*known_value))
        }
    }
}

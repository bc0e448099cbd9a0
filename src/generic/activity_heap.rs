/*!
A max-heap of atoms, ordered by activity.

The heap holds indicies into an external slice of activities, and tracks the position of each index so an index may be bumped or removed in place.
Activities are passed to each call, rather than stored, as the activity of an atom lives with the rest of the atom.

```rust
# use raft_sat::generic::activity_heap::ActivityHeap;
let activity = vec![0.0, 3.0, 1.0, 2.0];
let mut heap = ActivityHeap::default();
for index in 1..4 {
    heap.insert(index, &activity);
}

assert_eq!(heap.pop_max(&activity), Some(1));
assert_eq!(heap.pop_max(&activity), Some(3));
assert!(heap.contains(2));
```
*/

/// The heap.
#[derive(Default)]
pub struct ActivityHeap {
    heap: Vec<usize>,
    position: Vec<Option<usize>>,
}

impl ActivityHeap {
    pub fn contains(&self, index: usize) -> bool {
        self.position.get(index).is_some_and(|p| p.is_some())
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Inserts `index`, if not already present.
    pub fn insert(&mut self, index: usize, activity: &[f64]) {
        if self.position.len() <= index {
            self.position.resize(index + 1, None);
        }
        if self.position[index].is_some() {
            return;
        }
        self.position[index] = Some(self.heap.len());
        self.heap.push(index);
        self.sift_up(self.heap.len() - 1, activity);
    }

    /// Restores the heap after the activity of `index` has increased.
    pub fn bumped(&mut self, index: usize, activity: &[f64]) {
        if let Some(Some(at)) = self.position.get(index) {
            self.sift_up(*at, activity);
        }
    }

    /// Removes and returns the index with the greatest activity.
    pub fn pop_max(&mut self, activity: &[f64]) -> Option<usize> {
        let last = self.heap.pop()?;
        self.position[last] = None;
        if self.heap.is_empty() {
            return Some(last);
        }

        let top = self.heap[0];
        self.position[top] = None;
        self.heap[0] = last;
        self.position[last] = Some(0);
        self.sift_down(0, activity);
        Some(top)
    }

    /// Empties the heap, keeping capacity.
    pub fn clear(&mut self) {
        for index in self.heap.drain(..) {
            self.position[index] = None;
        }
    }

    fn sift_up(&mut self, mut at: usize, activity: &[f64]) {
        let index = self.heap[at];
        while at > 0 {
            let parent = (at - 1) / 2;
            if activity[self.heap[parent]] >= activity[index] {
                break;
            }
            self.heap[at] = self.heap[parent];
            self.position[self.heap[at]] = Some(at);
            at = parent;
        }
        self.heap[at] = index;
        self.position[index] = Some(at);
    }

    fn sift_down(&mut self, mut at: usize, activity: &[f64]) {
        let index = self.heap[at];
        loop {
            let left = 2 * at + 1;
            if left >= self.heap.len() {
                break;
            }
            let right = left + 1;
            let child = match right < self.heap.len()
                && activity[self.heap[right]] > activity[self.heap[left]]
            {
                true => right,
                false => left,
            };
            if activity[self.heap[child]] <= activity[index] {
                break;
            }
            self.heap[at] = self.heap[child];
            self.position[self.heap[at]] = Some(at);
            at = child;
        }
        self.heap[at] = index;
        self.position[index] = Some(at);
    }
}

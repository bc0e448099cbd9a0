/*!
The finish board of a solve.

Each worker registers on the board when its engine returns.
The first to register is the decider, and while holding the lock of the board the decider sets the interrupt flag of every peer which has not yet finished.
The decider then waits until every worker has registered.

As interrupts are set under the lock, no peer can register between the election of the decider and the interrupt broadcast.
*/

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Condvar, Mutex, MutexGuard,
};

use crate::misc::log::targets::{self};

/// Where a solve of a portfolio is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SolveState {
    /// No solve has been made.
    Idle,

    /// Every instance is searching.
    Running,

    /// Some instance has finished, and is interrupting its peers.
    Deciding,

    /// The decider is waiting for its peers to finish.
    Draining,

    /// Every instance has finished, and the result of the decider has been taken.
    Done,
}

struct BoardState {
    finished: Vec<bool>,
    decider: Option<usize>,
    state: SolveState,
}

pub(super) struct FinishBoard {
    board: Mutex<BoardState>,
    all_finished: Condvar,
}

impl FinishBoard {
    pub fn new(width: usize) -> Self {
        FinishBoard {
            board: Mutex::new(BoardState {
                finished: vec![false; width],
                decider: None,
                state: SolveState::Running,
            }),
            all_finished: Condvar::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BoardState> {
        self.board
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers `index` as finished, returning true if `index` is the decider.
    ///
    /// # Panics
    /// If, after the interrupt broadcast, some unfinished peer does not hold a set interrupt flag.
    pub fn finish(&self, index: usize, interrupts: &[Arc<AtomicBool>]) -> bool {
        let mut board = self.lock();
        board.finished[index] = true;

        let is_decider = board.decider.is_none();
        if is_decider {
            board.decider = Some(index);
            board.state = SolveState::Deciding;
            log::info!(target: targets::PORTFOLIO, "Instance {index} decides");

            for (peer, flag) in interrupts.iter().enumerate() {
                if peer != index && !board.finished[peer] && !flag.swap(true, Ordering::SeqCst) {
                    log::trace!(target: targets::PORTFOLIO, "Interrupted instance {peer}");
                }
            }

            for (peer, flag) in interrupts.iter().enumerate() {
                if !board.finished[peer] && !flag.load(Ordering::SeqCst) {
                    panic!("! Instance {peer} left running after instance {index} decided");
                }
            }

            board.state = SolveState::Draining;
        }

        if board.finished.iter().all(|finished| *finished) {
            board.state = SolveState::Done;
        }
        drop(board);

        self.all_finished.notify_all();
        is_decider
    }

    /// Blocks until every worker has finished.
    pub fn wait_for_all(&self) {
        let board = self.lock();
        let waited = self
            .all_finished
            .wait_while(board, |board| board.finished.iter().any(|finished| !finished));
        if waited.is_err() {
            log::warn!(target: targets::PORTFOLIO, "Finish board poisoned while draining");
        }
    }

    pub fn decider(&self) -> Option<usize> {
        self.lock().decider
    }

    pub fn state(&self) -> SolveState {
        self.lock().state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(width: usize) -> Vec<Arc<AtomicBool>> {
        (0..width).map(|_| Arc::new(AtomicBool::new(false))).collect()
    }

    #[test]
    fn first_to_finish_decides() {
        let board = FinishBoard::new(3);
        let interrupts = flags(3);

        assert!(board.finish(1, &interrupts));
        assert_eq!(board.state(), SolveState::Draining);
        assert!(interrupts[0].load(Ordering::SeqCst));
        assert!(!interrupts[1].load(Ordering::SeqCst));
        assert!(interrupts[2].load(Ordering::SeqCst));

        assert!(!board.finish(0, &interrupts));
        assert!(!board.finish(2, &interrupts));
        assert_eq!(board.decider(), Some(1));
        assert_eq!(board.state(), SolveState::Done);

        board.wait_for_all();
    }

    #[test]
    fn decider_waits_for_peers() {
        let board = Arc::new(FinishBoard::new(2));
        let interrupts = flags(2);

        assert!(board.finish(0, &interrupts));

        let peer = {
            let board = board.clone();
            let interrupts = interrupts.clone();
            std::thread::spawn(move || {
                while !interrupts[1].load(Ordering::SeqCst) {
                    std::thread::yield_now();
                }
                board.finish(1, &interrupts)
            })
        };

        board.wait_for_all();
        assert_eq!(board.state(), SolveState::Done);
        assert_eq!(peer.join().ok(), Some(false));
    }

    #[test]
    fn single_instance_is_done_at_once() {
        let board = FinishBoard::new(1);
        assert!(board.finish(0, &flags(1)));
        assert_eq!(board.state(), SolveState::Done);
        board.wait_for_all();
    }
}

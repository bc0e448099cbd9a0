//! A portfolio of conflict-driven clause-learning solvers, racing on one formula while sharing what they derive.
//!
//! raft_sat runs several diversified instances of a sequential search [engine] against the same formula.
//! Instances differ in when they simplify, how they choose a polarity, and their seed, and so tend to explore different parts of the search space.
//! The first instance to reach a verdict decides the solve, and every other instance is interrupted.
//!
//! While searching, instances exchange cheap facts which hold in every model of the formula:
//! - Units, i.e. literals forced on the top level.
//! - Binary clauses, learnt or found by strengthening a longer clause.
//!
//! # Orientation
//!
//! - The [portfolio] module contains the [coordinator](portfolio::PortfolioCoordinator), which owns each instance, broadcasts changes to the formula, and adjudicates the race.
//! - The [sync] module contains the [channel](sync::ClauseSyncChannel) held by each instance and the [pool](sync::SharedClausePool) shared by every channel.
//! - The [transport] module contains optional backends which extend the pool beyond the process, or to an external search device.
//! - The [solver] module contains the reference [engine], a compact CDCL solver.
//! - The [configuration](crate::config) lists every option of an instance.
//!
//! # Numbering
//!
//! Atoms are numbered from 1, in the order of allocation through the coordinator, and this shared numbering is identical in every instance.
//! An instance may have further atoms for its own use, and these never leave the instance (see [atom](structures::atom)).
//!
//! # Example
//!
//! Three pigeons do not fit in two holes.
//!
//! ```rust
//! # use raft_sat::config::Config;
//! # use raft_sat::portfolio::PortfolioCoordinator;
//! # use raft_sat::reports::Report;
//! # use raft_sat::structures::literal::CLiteral;
//! let mut portfolio: PortfolioCoordinator = PortfolioCoordinator::new(2, Config::default()).unwrap();
//!
//! let mut in_hole = Vec::new();
//! for _pigeon in 0..3 {
//!     let holes = (0..2)
//!         .map(|_| portfolio.new_var(true).unwrap() as i32)
//!         .collect::<Vec<_>>();
//!     in_hole.push(holes);
//! }
//!
//! for holes in &in_hole {
//!     portfolio.add_clause(holes.iter().map(|atom| CLiteral::from(*atom)).collect());
//! }
//! for hole in 0..2 {
//!     for p in 0..3 {
//!         for q in (p + 1)..3 {
//!             portfolio.add_clause(vec![CLiteral::from(-in_hole[p][hole]), CLiteral::from(-in_hole[q][hole])]);
//!         }
//!     }
//! }
//!
//! assert_eq!(portfolio.solve(), Ok(Report::Unsatisfiable));
//! ```

#![allow(clippy::single_match)]
#![allow(clippy::collapsible_else_if)]

pub mod config;
pub mod engine;
pub mod portfolio;
pub mod reports;
pub mod solver;
pub mod structures;
pub mod sync;
pub mod types;

pub mod generic;
pub mod transport;

pub mod misc;

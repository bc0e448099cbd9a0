mod common;

use std::sync::Arc;

use raft_sat::{
    config::Config,
    engine::Engine,
    reports::Report,
    solver::Solver,
    structures::{
        clause::Clause,
        literal::{CLiteral, Literal},
    },
    sync::{ClauseSyncChannel, SharedClausePool},
};

use common::{entails, init_logging, literals, model_satisfies, models, random_formula};

/// `count` solvers on one pool, each holding atoms 1..=`atoms`.
fn solvers_on(pool: &Arc<SharedClausePool>, count: usize, atoms: u32, config: &Config) -> Vec<Solver> {
    (0..count)
        .map(|index| {
            let mut config = config.clone();
            config.seed.value = index as u64;
            let mut solver = Solver::from_config(config, ClauseSyncChannel::new(pool.clone()));
            for _ in 0..atoms {
                assert!(solver.fresh_atom(true).is_ok());
            }
            solver
        })
        .collect()
}

/// Checks every fact in the pool follows from `formula`, and mentions only atoms 1..=`atoms`.
fn pool_is_entailed(pool: &SharedClausePool, atoms: u32, formula: &[Vec<i32>]) {
    let (units, binaries) = pool.snapshot();

    for unit in units {
        assert!(unit.atom >= 1 && unit.atom <= atoms, "unit on atom {}", unit.atom);
        assert!(entails(atoms, formula, &[unit.literal()]), "unit {}", unit.literal());
    }

    for binary in binaries {
        let pair = binary.literals();
        assert!(pair.iter().all(|literal| literal.atom() >= 1 && literal.atom() <= atoms));
        assert!(entails(atoms, formula, &pair), "binary {} {}", pair[0], pair[1]);
    }
}

mod exchange {
    use super::*;

    #[test]
    fn learnt_unit_reaches_peer() {
        init_logging();
        let pool = Arc::new(SharedClausePool::default());
        let mut solvers = solvers_on(&pool, 2, 2, &Config::default());

        for solver in solvers.iter_mut() {
            assert!(solver.add_clause(&Clause::original(literals(&[1, 2]))));
            assert!(solver.add_clause(&Clause::original(literals(&[1, -2]))));
        }
        assert!(solvers[0].add_clause(&Clause::learnt(literals(&[1]), 1, 0.0)));

        assert_eq!(solvers[0].solve(&[]), Ok(Report::Satisfiable));
        assert_eq!(solvers[0].sync_stats().sent_units, 1);

        assert_eq!(
            solvers[1].solve(&[CLiteral::from(-1)]),
            Ok(Report::Unsatisfiable)
        );
        assert_eq!(solvers[1].sync_stats().recv_units, 1);
        assert_eq!(solvers[1].conflict(), &[CLiteral::from(1)]);
    }

    #[test]
    fn strengthened_binary_reaches_peer() {
        let pool = Arc::new(SharedClausePool::default());
        let mut simplifying = Config::default();
        simplifying.pre_simplify.value = true;
        let mut direct = Config::default();
        direct.pre_simplify.value = false;

        let mut first = solvers_on(&pool, 1, 5, &simplifying).remove(0);
        let mut second = solvers_on(&pool, 1, 5, &direct).remove(0);

        for solver in [&mut first, &mut second] {
            assert!(solver.add_clause(&Clause::original(literals(&[5, 3, 4]))));
            assert!(solver.add_clause(&Clause::original(literals(&[-5]))));
        }

        assert_eq!(first.solve(&[]), Ok(Report::Satisfiable));
        assert_eq!(first.sync_stats().sent_binaries, 1);

        assert_eq!(second.solve(&[]), Ok(Report::Satisfiable));
        assert_eq!(second.sync_stats().recv_binaries, 1);
        assert_eq!(second.sync_stats().sent_binaries, 0);
    }

    #[test]
    fn contradiction_through_pool() {
        let pool = Arc::new(SharedClausePool::default());
        let mut solvers = solvers_on(&pool, 2, 2, &Config::default());

        // Each holds half of an unsatisfiable formula, as learnt facts.
        assert!(solvers[0].add_clause(&Clause::learnt(literals(&[1]), 1, 0.0)));
        assert!(solvers[1].add_clause(&Clause::learnt(literals(&[-1]), 1, 0.0)));

        assert_eq!(solvers[0].solve(&[]), Ok(Report::Satisfiable));
        assert_eq!(solvers[1].solve(&[]), Ok(Report::Unsatisfiable));
    }

    #[test]
    fn quiet_sync_changes_nothing() {
        let pool = Arc::new(SharedClausePool::default());
        let mut solvers = solvers_on(&pool, 2, 3, &Config::default());
        for solver in solvers.iter_mut() {
            assert!(solver.add_clause(&Clause::original(literals(&[1]))));
            assert!(solver.add_clause(&Clause::original(literals(&[-1, 2]))));
        }

        for solver in solvers.iter_mut() {
            assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
        }
        let before = solvers.iter().map(|s| s.sync_stats()).collect::<Vec<_>>();

        for solver in solvers.iter_mut() {
            assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
        }
        let after = solvers.iter().map(|s| s.sync_stats()).collect::<Vec<_>>();

        assert_eq!(before, after);
    }
}

mod soundness {
    use super::*;

    #[test]
    fn shared_facts_are_entailed() {
        init_logging();
        let mut config = Config::default();
        config.sync_every.value = 1;
        config.luby_u.value = 2;
        config.simplify_burst.value = 2;
        config.simplify_start.value = 4.0;

        for seed in 0..16 {
            let formula = random_formula(seed, 12, 50, 3);
            let pool = Arc::new(SharedClausePool::default());
            let mut solvers = solvers_on(&pool, 3, 12, &config);

            for solver in solvers.iter_mut() {
                for clause in &formula {
                    solver.add_clause(&Clause::original(literals(clause)));
                }
            }

            let satisfiable = !models(12, &formula).is_empty();
            for solver in solvers.iter_mut() {
                let report = solver.solve(&[]);
                match satisfiable {
                    true => {
                        assert_eq!(report, Ok(Report::Satisfiable), "seed {seed}");
                        assert!(model_satisfies(solver.model(), &formula), "seed {seed}");
                    }
                    false => assert_eq!(report, Ok(Report::Unsatisfiable), "seed {seed}"),
                }
            }

            if satisfiable {
                pool_is_entailed(&pool, 12, &formula);
            }
        }
    }

    #[test]
    fn auxiliary_atoms_stay_private() {
        let mut config = Config::default();
        config.xor_cut.value = 3;
        config.sync_every.value = 1;

        let pool = Arc::new(SharedClausePool::default());
        let mut solvers = solvers_on(&pool, 2, 9, &config);

        for solver in solvers.iter_mut() {
            assert!(solver.add_clause(&Clause::xor(literals(&[1, 2, 3, 4, 5, 6, 7, 8, 9]), true)));
            assert!(solver.add_clause(&Clause::original(literals(&[1]))));
            assert!(solver.add_clause(&Clause::original(literals(&[-2, 3]))));
            assert!(solver.atom_count() > solver.external_atom_count());
        }

        for solver in solvers.iter_mut() {
            assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
            assert_eq!(solver.model().len(), 10);
        }

        let (units, binaries) = pool.snapshot();
        assert!(units.iter().all(|unit| unit.atom <= 9));
        assert!(binaries
            .iter()
            .all(|binary| binary.literals().iter().all(|literal| literal.atom() <= 9)));
    }

    #[test]
    fn renumbering_keeps_facts_in_place() {
        let mut config = Config::default();
        config.pre_simplify.value = true;
        config.sync_every.value = 1;

        let formula = vec![
            vec![3],
            vec![-3, 5],
            vec![1, 2, 4],
            vec![-1, -2],
            vec![-4, 6, 1],
            vec![-6, 2],
        ];

        let pool = Arc::new(SharedClausePool::default());
        let mut solvers = solvers_on(&pool, 2, 6, &config);
        for solver in solvers.iter_mut() {
            for clause in &formula {
                assert!(solver.add_clause(&Clause::original(literals(clause))));
            }
        }

        // The first simplification places atoms 3 and 5 last.
        for solver in solvers.iter_mut() {
            assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));
            assert!(model_satisfies(solver.model(), &formula));
            assert!(solver.counters().simplifications >= 1);
        }

        let (units, _) = pool.snapshot();
        let mut unit_literals = units.iter().map(|unit| unit.literal()).collect::<Vec<_>>();
        unit_literals.sort();
        assert_eq!(unit_literals, vec![CLiteral::from(3), CLiteral::from(5)]);
        pool_is_entailed(&pool, 6, &formula);

        for solver in solvers.iter_mut() {
            assert_eq!(
                solver.solve(&[CLiteral::from(-5)]),
                Ok(Report::Unsatisfiable)
            );
            assert_eq!(solver.solve(&[CLiteral::from(1)]), Ok(Report::Satisfiable));
            assert_eq!(solver.model()[2], Some(false));
        }
    }
}

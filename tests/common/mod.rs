#![allow(dead_code)]

use rand_core::{RngCore, SeedableRng};

use raft_sat::{
    generic::random::MinimalPCG32,
    structures::literal::{CLiteral, Literal},
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn literals(clause: &[i32]) -> Vec<CLiteral> {
    clause.iter().map(|literal| CLiteral::from(*literal)).collect()
}

/// The formula that `pigeons` pigeons each sit in one of `holes` holes, no two to a hole.
///
/// Pigeon p sits in hole h when atom p·`holes` + h + 1 is true.
pub fn pigeonhole(pigeons: i32, holes: i32) -> Vec<Vec<i32>> {
    let atom = |pigeon: i32, hole: i32| pigeon * holes + hole + 1;
    let mut formula = Vec::default();

    for pigeon in 0..pigeons {
        formula.push((0..holes).map(|hole| atom(pigeon, hole)).collect());
    }

    for hole in 0..holes {
        for first in 0..pigeons {
            for second in first + 1..pigeons {
                formula.push(vec![-atom(first, hole), -atom(second, hole)]);
            }
        }
    }

    formula
}

/// A random formula of `clauses` clauses of `width` distinct atoms, over atoms 1..=`atoms`.
pub fn random_formula(seed: u64, atoms: u32, clauses: usize, width: usize) -> Vec<Vec<i32>> {
    let mut rng = MinimalPCG32::seed_from_u64(seed);
    let mut formula = Vec::with_capacity(clauses);

    while formula.len() < clauses {
        let mut clause: Vec<i32> = Vec::with_capacity(width);
        while clause.len() < width {
            let atom = (rng.next_u32() % atoms + 1) as i32;
            if clause.iter().any(|literal| literal.abs() == atom) {
                continue;
            }
            match rng.next_u32() % 2 {
                0 => clause.push(atom),
                _ => clause.push(-atom),
            }
        }
        formula.push(clause);
    }

    formula
}

fn satisfies(valuation: u64, clause: &[i32]) -> bool {
    clause.iter().any(|literal| {
        let value = (valuation >> (literal.unsigned_abs() - 1)) & 1 == 1;
        value == literal.is_positive()
    })
}

/// Each model of `formula` over atoms 1..=`atoms`, as a bit set with atom n at bit n - 1.
pub fn models(atoms: u32, formula: &[Vec<i32>]) -> Vec<u64> {
    (0..(1_u64 << atoms))
        .filter(|valuation| formula.iter().all(|clause| satisfies(*valuation, clause)))
        .collect()
}

/// Whether every model of `formula` satisfies `clause`.
pub fn entails(atoms: u32, formula: &[Vec<i32>], clause: &[CLiteral]) -> bool {
    let clause = clause
        .iter()
        .map(|literal| literal.as_int() as i32)
        .collect::<Vec<_>>();
    models(atoms, formula)
        .iter()
        .all(|valuation| satisfies(*valuation, &clause))
}

/// Whether `model` (indexed by atom) satisfies every clause of `formula`.
pub fn model_satisfies(model: &[Option<bool>], formula: &[Vec<i32>]) -> bool {
    formula.iter().all(|clause| {
        clause
            .iter()
            .any(|literal| model[literal.unsigned_abs() as usize] == Some(literal.is_positive()))
    })
}

//! Statistics and dumps of a solver.
//!
//! Dumps are written in the shared numbering, and so a clause containing an auxiliary atom is never written.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use crate::{
    solver::Solver,
    structures::{clause::dimacs_line, literal::CLiteral},
    types::err::{self},
};

impl Solver {
    /// The literals of a clause in the shared numbering, if each atom has a shared id.
    fn externalise(&self, literals: &[CLiteral]) -> Option<Vec<CLiteral>> {
        literals
            .iter()
            .map(|literal| self.to_external(*literal))
            .collect()
    }

    pub(super) fn write_stats(&self, peer_count: usize) {
        let sync = self.channel.stats();

        println!("c Conflicts:         {}", self.counters.total_conflicts);
        println!("c Decisions:         {}", self.counters.total_decisions);
        println!("c Propagations:      {}", self.counters.total_propagations);
        println!("c Restarts:          {}", self.counters.restarts);
        println!("c Reductions:        {}", self.counters.reductions);
        println!("c Simplifications:   {}", self.counters.simplifications);
        println!("c Solves:            {}", self.counters.solves);
        println!("c Time:              {:.2?}", self.counters.time);
        println!("c Atoms:             {} ({} auxiliary)", self.atom_count(), self.atom_count() - self.external_atom_count());
        println!("c Peers:             {peer_count}");
        println!("c Units sent:        {}", sync.sent_units);
        println!("c Units received:    {}", sync.recv_units);
        println!("c Binaries sent:     {}", sync.sent_binaries);
        println!("c Binaries received: {}", sync.recv_binaries);
        println!("c External clauses:  {}", sync.recv_external);
    }

    pub(super) fn write_sorted_learnts(
        &self,
        path: &Path,
        max_size: usize,
    ) -> Result<(), err::ErrorKind> {
        let top_end = match self.trail_lim.first() {
            Some(end) => *end,
            None => self.trail.len(),
        };

        let mut learnts: Vec<Vec<CLiteral>> = Vec::default();

        if max_size >= 1 {
            for literal in &self.trail[..top_end] {
                if let Some(external) = self.to_external(*literal) {
                    learnts.push(vec![external]);
                }
            }
        }

        for clause in self.clauses.iter() {
            if clause.removed || clause.learnt.is_none() || clause.literals.len() > max_size {
                continue;
            }
            if let Some(literals) = self.externalise(&clause.literals) {
                learnts.push(literals);
            }
        }

        learnts.sort_by_key(|literals| literals.len());

        let mut writer = BufWriter::new(File::create(path)?);
        for literals in &learnts {
            writeln!(writer, "{}", dimacs_line(literals))?;
        }
        writer.flush()?;

        log::info!("Wrote {} learnt clauses to {}", learnts.len(), path.display());
        Ok(())
    }

    pub(super) fn write_original_clauses(
        &self,
        path: &Path,
        also_learnt_binaries: bool,
    ) -> Result<(), err::ErrorKind> {
        let mut binaries: Vec<Vec<CLiteral>> = Vec::default();
        if also_learnt_binaries {
            for clause in self.clauses.iter() {
                if clause.removed || clause.learnt.is_none() || clause.literals.len() != 2 {
                    continue;
                }
                if let Some(mut literals) = self.externalise(&clause.literals) {
                    literals.sort_unstable();
                    binaries.push(literals);
                }
            }
            binaries.sort_unstable();
            binaries.dedup();
        }

        let mut writer = BufWriter::new(File::create(path)?);

        writeln!(
            writer,
            "p cnf {} {}",
            self.external_atom_count(),
            self.formula.len() + binaries.len()
        )?;

        for external in 1..self.external_to_outer.len() {
            if let Some(name) = self.atom_name(external as u32) {
                writeln!(writer, "c {external} {name}")?;
            }
        }

        for clause in &self.formula {
            writeln!(writer, "{}", clause.as_dimacs())?;
        }
        for literals in &binaries {
            writeln!(writer, "{}", dimacs_line(literals))?;
        }
        writer.flush()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::Config,
        engine::Engine,
        reports::Report,
        structures::clause::Clause,
        sync::ClauseSyncChannel,
    };

    use super::*;

    fn scratch(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("raft_sat_output_{}_{name}", std::process::id()))
    }

    #[test]
    fn original_dump_has_header_and_names() {
        let mut solver = Solver::from_config(Config::default(), ClauseSyncChannel::default());
        for _ in 0..3 {
            let _ = solver.fresh_atom(true);
        }
        solver.set_atom_name(2, "q");
        assert!(solver.add_clause(&Clause::original(vec![CLiteral::from(1), CLiteral::from(-2)])));
        assert!(solver.add_clause(&Clause::xor(vec![CLiteral::from(2), CLiteral::from(3)], false)));

        let path = scratch("original.cnf");
        assert_eq!(solver.dump_original_clauses(&path, false), Ok(()));
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let lines = written.lines().collect::<Vec<_>>();
        assert_eq!(lines, vec!["p cnf 3 2", "c 2 q", "1 -2 0", "x-2 3 0"]);
    }

    #[test]
    fn learnt_dump_includes_top_level_units() {
        let mut solver = Solver::from_config(Config::default(), ClauseSyncChannel::default());
        for _ in 0..2 {
            let _ = solver.fresh_atom(true);
        }
        assert!(solver.add_clause(&Clause::original(vec![CLiteral::from(1)])));
        assert!(solver.add_clause(&Clause::original(vec![CLiteral::from(-1), CLiteral::from(2)])));
        assert_eq!(solver.solve(&[]), Ok(Report::Satisfiable));

        let path = scratch("learnts.cnf");
        assert_eq!(solver.dump_sorted_learnts(&path, 1), Ok(()));
        let written = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        let mut lines = written.lines().collect::<Vec<_>>();
        lines.sort();
        assert_eq!(lines, vec!["1 0", "2 0"]);
    }
}

//! End-to-end scenario tests

mod contract_reporting;
mod dark_mutations;
mod fringe_chain;

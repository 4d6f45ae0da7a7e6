//! Parsers for kernel-provided text files under `/proc`.

pub mod cmdline;
pub mod mountinfo;

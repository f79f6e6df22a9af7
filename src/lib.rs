//! Desktop FASTQ inspector: pick a file, load it, read its summary
//! statistics, and draw per-position quality-control plots.

pub mod core;
pub mod gui;
pub mod model;
pub mod shell;

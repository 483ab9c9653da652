#[macro_use]
mod par;

pub mod error;
pub mod io;
pub mod metrics;
pub mod phylo;
pub mod seq;
pub mod topology;

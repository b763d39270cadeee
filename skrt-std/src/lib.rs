pub mod discovery;
pub mod mergers;
pub mod splitters;
pub mod subjobs;

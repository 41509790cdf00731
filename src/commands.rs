pub mod launch;
pub mod probe;

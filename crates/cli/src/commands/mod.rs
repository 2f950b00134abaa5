pub mod plan;
pub mod run;

pub use plan::plan_command;
pub use run::run_command;

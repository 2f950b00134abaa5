pub mod plan;

pub use plan::{format_plan, print_plan};

// Handlers module

pub mod generate_flowchart;
pub mod root;

pub use generate_flowchart::generate_flowchart_handler;
pub use root::root_handler;

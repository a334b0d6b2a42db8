pub mod action_form;
pub mod flow_table;
pub mod search_form;
pub mod statistics_bar;

pub use flow_table::FlowTable;

pub mod category_form;
pub mod category_table;

pub use category_table::CategoryTable;

pub mod payee_form;
pub mod payee_table;

pub use payee_table::PayeeTable;

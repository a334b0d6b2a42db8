pub mod template_table;

pub use template_table::TemplateTable;

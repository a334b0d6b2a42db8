//! Types and pure logic shared by the admin frontend: the backend wire model,
//! the balance flow form engine and the table query mapping.

pub mod error;
pub mod flow_form;
pub mod model;
pub mod query;
pub mod reference;
pub mod submission;
pub mod summary;

pub use error::{AmountParseError, SubmissionError};
pub use flow_form::{
    currency_conversion, delete_prompt, field_visibility, initial_values, row_actions, CategoryLine,
    CurrencyConversion, DraftBody, DraftEdit, FieldVisibility, FormAction, FormContext, RowActions, TagSelection,
    TransactionDraft, TransferLeg,
};
pub use model::*;
pub use query::{listing_params, toggle_id, FlowFilter, FlowSortColumn, Paging, SortField, SortOrder};
pub use reference::{build_tree, FetchTicket, OptionNode, ReferenceQuery, ReferenceSlot, Resource};
pub use submission::{
    parse_amount, parse_optional_amount, prepare_submission, BalanceFlowPayload, FieldErrors, Submission, SubmitTarget,
};
pub use summary::{summary_lines, AlertLevel, SummaryLine};

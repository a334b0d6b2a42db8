pub mod use_ai_summary;
pub mod use_balance_flows;
pub mod use_notification;
pub mod use_paged_list;
pub mod use_reference_list;

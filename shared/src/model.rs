use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a balance flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowType {
    Expense,
    Income,
    Transfer,
    /// Balance adjustment, edited from the account screens rather than the flow form
    Adjust,
}

impl FlowType {
    /// Types offered as tabs when adding a new flow
    pub const ENTRY_TYPES: [FlowType; 3] = [FlowType::Expense, FlowType::Income, FlowType::Transfer];

    /// Wire name used in query parameters
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowType::Expense => "EXPENSE",
            FlowType::Income => "INCOME",
            FlowType::Transfer => "TRANSFER",
            FlowType::Adjust => "ADJUST",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlowType::Expense => "Expense",
            FlowType::Income => "Income",
            FlowType::Transfer => "Transfer",
            FlowType::Adjust => "Change Balance",
        }
    }

    /// Expense and income flows carry category lines
    pub fn is_split(&self) -> bool {
        matches!(self, FlowType::Expense | FlowType::Income)
    }

    pub fn parse(value: &str) -> Option<FlowType> {
        match value {
            "EXPENSE" => Some(FlowType::Expense),
            "INCOME" => Some(FlowType::Income),
            "TRANSFER" => Some(FlowType::Transfer),
            "ADJUST" => Some(FlowType::Adjust),
            _ => None,
        }
    }
}

impl fmt::Display for FlowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account as returned by the accounts endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: i64,
    pub name: String,
    pub currency_code: String,
    #[serde(default)]
    pub can_expense: bool,
    #[serde(default)]
    pub can_income: bool,
    #[serde(default)]
    pub can_transfer_from: bool,
    #[serde(default)]
    pub can_transfer_to: bool,
    #[serde(default = "default_true", alias = "enable")]
    pub enabled: bool,
}

/// Lightweight category reference, as embedded in books and flow records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRef {
    pub id: i64,
    pub name: String,
}

/// A ledger grouping accounts, categories and flows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub name: String,
    pub default_currency_code: String,
    #[serde(default)]
    pub default_expense_account: Option<Account>,
    #[serde(default)]
    pub default_income_account: Option<Account>,
    #[serde(default)]
    pub default_transfer_from_account: Option<Account>,
    #[serde(default)]
    pub default_transfer_to_account: Option<Account>,
    #[serde(default)]
    pub default_expense_category: Option<CategoryRef>,
    #[serde(default)]
    pub default_income_category: Option<CategoryRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(rename = "type")]
    pub category_type: FlowType,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "default_true", alias = "enable")]
    pub enabled: bool,
}

impl Category {
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub can_expense: bool,
    #[serde(default)]
    pub can_income: bool,
    #[serde(default)]
    pub can_transfer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payee {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub can_expense: bool,
    #[serde(default)]
    pub can_income: bool,
    #[serde(default = "default_true", alias = "enable")]
    pub enabled: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub sort: Option<i32>,
}

/// Category share of an expense or income record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRelation {
    pub category: CategoryRef,
    pub amount: f64,
    #[serde(default)]
    pub converted_amount: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagRelation {
    pub tag: TagRef,
    #[serde(default)]
    pub amount: Option<f64>,
}

/// One transaction record as listed by the balance-flows endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceFlow {
    pub id: i64,
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub book: Book,
    #[serde(default)]
    pub title: Option<String>,
    /// Epoch milliseconds
    pub create_time: i64,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub to: Option<Account>,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default)]
    pub converted_amount: Option<f64>,
    #[serde(default)]
    pub categories: Vec<CategoryRelation>,
    #[serde(default)]
    pub tags: Vec<TagRelation>,
    #[serde(default)]
    pub payee: Option<Payee>,
    pub confirm: bool,
    pub include: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub account_name: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub need_convert: bool,
    #[serde(default)]
    pub convert_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookTemplate {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Envelope wrapping every backend response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

/// One page of a table listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: u64,
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
            current: 1,
            page_size: 0,
        }
    }

    /// Number of pages at the size the client asked for. The backend does
    /// not always echo `pageSize`, so its value is not used here.
    pub fn page_count(&self, page_size: u32) -> u32 {
        if page_size == 0 {
            return 1;
        }
        (self.total.div_ceil(page_size as u64)).max(1) as u32
    }
}

/// Totals for the current flow filter, sent by the backend as
/// `[totalExpense, totalIncome, surplus]`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 3]", into = "[f64; 3]")]
pub struct FlowStatistics {
    pub total_expense: f64,
    pub total_income: f64,
    pub surplus: f64,
}

impl From<[f64; 3]> for FlowStatistics {
    fn from([total_expense, total_income, surplus]: [f64; 3]) -> Self {
        Self {
            total_expense,
            total_income,
            surplus,
        }
    }
}

impl From<FlowStatistics> for [f64; 3] {
    fn from(stats: FlowStatistics) -> Self {
        [stats.total_expense, stats.total_income, stats.surplus]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSummaryRequest {
    pub id: i64,
}

/// Raw AI summary reply; the backend fills either `data` or `message`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiSummaryResponse {
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AiSummaryResponse {
    pub fn into_text(self) -> String {
        self.data.or(self.message).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyTemplateRequest {
    pub template_id: i64,
    pub book_name: String,
}

/// Create/update body for categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<i64>,
    #[serde(rename = "type")]
    pub category_type: FlowType,
    pub book_id: i64,
}

/// Create/update body for payees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayeeForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub can_expense: bool,
    pub can_income: bool,
    pub book_id: i64,
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_type_wire_names() {
        assert_eq!(serde_json::to_string(&FlowType::Transfer).unwrap(), "\"TRANSFER\"");
        let parsed: FlowType = serde_json::from_str("\"ADJUST\"").unwrap();
        assert_eq!(parsed, FlowType::Adjust);
        assert_eq!(FlowType::parse("INCOME"), Some(FlowType::Income));
        assert_eq!(FlowType::parse("income"), None);
    }

    #[test]
    fn test_statistics_decode_from_array() {
        let stats: FlowStatistics = serde_json::from_str("[120.5, 300, 179.5]").unwrap();
        assert_eq!(stats.total_expense, 120.5);
        assert_eq!(stats.total_income, 300.0);
        assert_eq!(stats.surplus, 179.5);
    }

    #[test]
    fn test_balance_flow_decodes_backend_record() {
        let json = r#"{
            "id": 11,
            "type": "EXPENSE",
            "book": {"id": 7, "name": "Home", "defaultCurrencyCode": "CNY"},
            "createTime": 1700000000000,
            "account": {"id": 3, "name": "Wallet", "currencyCode": "CNY", "enable": true},
            "categories": [{"category": {"id": 1, "name": "Food"}, "amount": 12.5}],
            "tags": [{"tag": {"id": 4, "name": "Trip"}, "amount": 12.5}],
            "confirm": true,
            "include": false,
            "needConvert": false
        }"#;
        let flow: BalanceFlow = serde_json::from_str(json).unwrap();
        assert_eq!(flow.flow_type, FlowType::Expense);
        assert_eq!(flow.book.default_expense_account, None);
        assert_eq!(flow.categories[0].converted_amount, None);
        assert_eq!(flow.tags[0].tag.name, "Trip");
        assert!(!flow.include);
    }

    #[test]
    fn test_ai_summary_prefers_data_over_message() {
        let both = AiSummaryResponse {
            data: Some("report".to_string()),
            message: Some("ignored".to_string()),
        };
        assert_eq!(both.into_text(), "report");

        let message_only = AiSummaryResponse {
            data: None,
            message: Some("quota exceeded".to_string()),
        };
        assert_eq!(message_only.into_text(), "quota exceeded");
        assert_eq!(AiSummaryResponse::default().into_text(), "");
    }

    #[test]
    fn test_page_count() {
        let page: Page<i64> = Page {
            data: vec![],
            total: 41,
            current: 1,
            page_size: 20,
        };
        assert_eq!(page.page_count(20), 3);
        assert_eq!(Page::<i64>::empty().page_count(20), 1);
        assert_eq!(page.page_count(0), 1);
    }

    #[test]
    fn test_page_count_without_echoed_page_size() {
        let page: Page<i64> = serde_json::from_str(r#"{"data":[],"total":41}"#).unwrap();
        assert_eq!(page.page_size, 0);
        assert_eq!(page.page_count(20), 3);
        assert_eq!(page.page_count(50), 1);
    }
}

//! Table listing parameters: filters, sorting and paging mapped to the query
//! string the backend expects.

use crate::model::FlowType;
use chrono::{Local, NaiveDate, TimeZone};

/// Column sort direction as reported by the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascend,
    Descend,
}

impl SortOrder {
    fn as_param(&self) -> &'static str {
        match self {
            SortOrder::Ascend => "asc",
            SortOrder::Descend => "desc",
        }
    }

    /// Next state when a column header is clicked: ascend, descend, unsorted
    pub fn cycle(current: Option<SortOrder>) -> Option<SortOrder> {
        match current {
            None => Some(SortOrder::Ascend),
            Some(SortOrder::Ascend) => Some(SortOrder::Descend),
            Some(SortOrder::Descend) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub order: SortOrder,
}

impl SortField {
    pub fn new(field: &str, order: SortOrder) -> Self {
        Self {
            field: field.to_string(),
            order,
        }
    }
}

/// Sortable columns of the balance flow table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSortColumn {
    Title,
    Type,
    Amount,
    CreateTime,
    Account,
    Payee,
    Confirm,
    Include,
}

impl FlowSortColumn {
    pub const ALL: [FlowSortColumn; 8] = [
        FlowSortColumn::Title,
        FlowSortColumn::Type,
        FlowSortColumn::Amount,
        FlowSortColumn::CreateTime,
        FlowSortColumn::Account,
        FlowSortColumn::Payee,
        FlowSortColumn::Confirm,
        FlowSortColumn::Include,
    ];

    /// Backend field name used in `sort=`
    pub fn field(&self) -> &'static str {
        match self {
            FlowSortColumn::Title => "title",
            FlowSortColumn::Type => "type",
            FlowSortColumn::Amount => "amount",
            FlowSortColumn::CreateTime => "createTime",
            FlowSortColumn::Account => "account",
            FlowSortColumn::Payee => "payee",
            FlowSortColumn::Confirm => "confirm",
            FlowSortColumn::Include => "include",
        }
    }
}

/// `sort=field,asc|desc` value, or none when the table is unsorted
pub fn sort_param(sort: Option<&SortField>) -> Option<String> {
    sort.map(|s| format!("{},{}", s.field, s.order.as_param()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub current: u32,
    pub page_size: u32,
}

impl Paging {
    pub fn first(page_size: u32) -> Self {
        Self {
            current: 1,
            page_size,
        }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        vec![
            ("current".to_string(), self.current.to_string()),
            ("pageSize".to_string(), self.page_size.to_string()),
        ]
    }
}

/// Search form of the balance flow table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowFilter {
    pub book_id: Option<i64>,
    pub title: Option<String>,
    pub flow_type: Option<FlowType>,
    pub min_amount: Option<f64>,
    pub max_amount: Option<f64>,
    /// Inclusive date range; expanded to the start and end of each day
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub account_id: Option<i64>,
    pub categories: Vec<i64>,
    pub tags: Vec<i64>,
    pub payees: Vec<i64>,
    pub confirm: Option<bool>,
    pub include: Option<bool>,
    pub notes: Option<String>,
}

impl FlowFilter {
    pub fn for_book(book_id: i64) -> Self {
        Self {
            book_id: Some(book_id),
            ..Self::default()
        }
    }

    /// Filter parameters shared by the listing and the statistics call.
    /// Empty inputs are left out.
    pub fn pairs(&self) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        let mut push = |key: &str, value: String| out.push((key.to_string(), value));

        if let Some(book) = self.book_id {
            push("book", book.to_string());
        }
        if let Some(title) = non_blank(&self.title) {
            push("title", title);
        }
        if let Some(flow_type) = self.flow_type {
            push("type", flow_type.to_string());
        }
        if let Some(min) = self.min_amount {
            push("minAmount", min.to_string());
        }
        if let Some(max) = self.max_amount {
            push("maxAmount", max.to_string());
        }
        if let Some(start) = self.start_date.and_then(start_of_day_millis) {
            push("minTime", start.to_string());
        }
        if let Some(end) = self.end_date.and_then(end_of_day_millis) {
            push("maxTime", end.to_string());
        }
        if let Some(account) = self.account_id {
            push("account", account.to_string());
        }
        if !self.categories.is_empty() {
            push("categories", join_ids(&self.categories));
        }
        if !self.tags.is_empty() {
            push("tags", join_ids(&self.tags));
        }
        if !self.payees.is_empty() {
            push("payees", join_ids(&self.payees));
        }
        if let Some(confirm) = self.confirm {
            push("confirm", confirm.to_string());
        }
        if let Some(include) = self.include {
            push("include", include.to_string());
        }
        if let Some(notes) = non_blank(&self.notes) {
            push("notes", notes);
        }
        out
    }
}

/// Add `id` to a multi-select filter, or remove it when already picked
pub fn toggle_id(ids: &mut Vec<i64>, id: i64) {
    if let Some(pos) = ids.iter().position(|&picked| picked == id) {
        ids.remove(pos);
    } else {
        ids.push(id);
    }
}

/// Full parameter list for a paged, sorted listing
pub fn listing_params(filter: &[(String, String)], paging: Paging, sort: Option<&SortField>) -> Vec<(String, String)> {
    let mut params = filter.to_vec();
    params.extend(paging.pairs());
    if let Some(sort) = sort_param(sort) {
        params.push(("sort".to_string(), sort));
    }
    params
}

fn start_of_day_millis(date: NaiveDate) -> Option<i64> {
    let start = date.and_hms_opt(0, 0, 0)?;
    Local.from_local_datetime(&start).earliest().map(|dt| dt.timestamp_millis())
}

fn end_of_day_millis(date: NaiveDate) -> Option<i64> {
    let end = date.and_hms_milli_opt(23, 59, 59, 999)?;
    Local.from_local_datetime(&end).latest().map(|dt| dt.timestamp_millis())
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter().map(i64::to_string).collect::<Vec<_>>().join(",")
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_sort_param_mapping() {
        let sort = SortField::new("createTime", SortOrder::Descend);
        assert_eq!(sort_param(Some(&sort)).as_deref(), Some("createTime,desc"));
        assert_eq!(
            sort_param(Some(&SortField::new("amount", SortOrder::Ascend))).as_deref(),
            Some("amount,asc")
        );
        assert_eq!(sort_param(None), None);
    }

    #[test]
    fn test_every_flow_column_maps_to_sort_param() {
        let params: Vec<String> = FlowSortColumn::ALL
            .iter()
            .filter_map(|column| sort_param(Some(&SortField::new(column.field(), SortOrder::Ascend))))
            .collect();
        assert_eq!(
            params,
            vec![
                "title,asc",
                "type,asc",
                "amount,asc",
                "createTime,asc",
                "account,asc",
                "payee,asc",
                "confirm,asc",
                "include,asc"
            ]
        );
    }

    #[test]
    fn test_sort_cycle() {
        assert_eq!(SortOrder::cycle(None), Some(SortOrder::Ascend));
        assert_eq!(SortOrder::cycle(Some(SortOrder::Ascend)), Some(SortOrder::Descend));
        assert_eq!(SortOrder::cycle(Some(SortOrder::Descend)), None);
    }

    #[test]
    fn test_empty_filter_sends_nothing() {
        let filter = FlowFilter {
            title: Some("   ".to_string()),
            ..FlowFilter::default()
        };
        assert!(filter.pairs().is_empty());
    }

    #[test]
    fn test_filter_pairs() {
        let filter = FlowFilter {
            book_id: Some(7),
            flow_type: Some(FlowType::Expense),
            min_amount: Some(10.0),
            max_amount: Some(99.5),
            categories: vec![1, 2],
            confirm: Some(false),
            ..FlowFilter::default()
        };
        let pairs = filter.pairs();
        assert_eq!(get(&pairs, "book"), Some("7"));
        assert_eq!(get(&pairs, "type"), Some("EXPENSE"));
        assert_eq!(get(&pairs, "minAmount"), Some("10"));
        assert_eq!(get(&pairs, "maxAmount"), Some("99.5"));
        assert_eq!(get(&pairs, "categories"), Some("1,2"));
        assert_eq!(get(&pairs, "confirm"), Some("false"));
        assert_eq!(get(&pairs, "tags"), None);
    }

    #[test]
    fn test_multi_select_filters_keep_every_pick() {
        let mut filter = FlowFilter::for_book(7);
        toggle_id(&mut filter.categories, 1);
        toggle_id(&mut filter.categories, 4);
        toggle_id(&mut filter.payees, 9);
        toggle_id(&mut filter.payees, 12);
        toggle_id(&mut filter.payees, 9);

        let pairs = filter.pairs();
        assert_eq!(get(&pairs, "categories"), Some("1,4"));
        assert_eq!(get(&pairs, "payees"), Some("12"));

        toggle_id(&mut filter.payees, 12);
        assert_eq!(get(&filter.pairs(), "payees"), None);
    }

    #[test]
    fn test_date_range_covers_whole_days() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let filter = FlowFilter {
            start_date: Some(day),
            end_date: Some(day),
            ..FlowFilter::default()
        };
        let pairs = filter.pairs();
        let min: i64 = get(&pairs, "minTime").unwrap().parse().unwrap();
        let max: i64 = get(&pairs, "maxTime").unwrap().parse().unwrap();
        assert_eq!(max - min, 24 * 60 * 60 * 1000 - 1);
    }

    #[test]
    fn test_listing_params_append_paging_and_sort() {
        let filter = FlowFilter::for_book(7).pairs();
        let sort = SortField::new("createTime", SortOrder::Descend);
        let params = listing_params(&filter, Paging { current: 2, page_size: 20 }, Some(&sort));
        assert_eq!(get(&params, "book"), Some("7"));
        assert_eq!(get(&params, "current"), Some("2"));
        assert_eq!(get(&params, "pageSize"), Some("20"));
        assert_eq!(get(&params, "sort"), Some("createTime,desc"));
    }
}

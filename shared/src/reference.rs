//! Lazily loaded selector options.
//!
//! Each selector in the flow form owns a [`ReferenceSlot`]. The slot is asked
//! for a fetch when the selector gains focus; it hands out a [`FetchTicket`]
//! only when its cached list is missing or was loaded for a different filter.
//! Responses are applied only if their ticket still matches the slot, so a
//! list requested for the previous flow type never lands in the current view.

use crate::model::{Category, FlowType, Tag};
use std::collections::BTreeMap;
use std::fmt;

/// Backend collections the admin screens talk to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Accounts,
    Books,
    Categories,
    Tags,
    Payees,
    BalanceFlows,
    BookTemplates,
}

impl Resource {
    pub fn path(&self) -> &'static str {
        match self {
            Resource::Accounts => "accounts",
            Resource::Books => "books",
            Resource::Categories => "categories",
            Resource::Tags => "tags",
            Resource::Payees => "payees",
            Resource::BalanceFlows => "balance-flows",
            Resource::BookTemplates => "book-templates",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// An unpaged lookup: which collection, filtered how
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceQuery {
    pub resource: Resource,
    pub params: BTreeMap<String, String>,
}

impl ReferenceQuery {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: &str, value: impl ToString) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    /// Add `key=true` only when `enabled`; unset flags are left out entirely
    pub fn flag(self, key: &str, enabled: bool) -> Self {
        if enabled {
            self.param(key, true)
        } else {
            self
        }
    }

    /// Add `key=value` only when a value is given
    pub fn param_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.param(key, value),
            None => self,
        }
    }

    pub fn pairs(&self) -> Vec<(String, String)> {
        self.params.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
    }

    /// Source accounts usable for `flow_type`
    pub fn accounts_for(flow_type: FlowType) -> Self {
        ReferenceQuery::new(Resource::Accounts)
            .flag("canExpense", flow_type == FlowType::Expense)
            .flag("canIncome", flow_type == FlowType::Income)
            .flag("canTransferFrom", flow_type == FlowType::Transfer)
    }

    /// Destination accounts for transfers
    pub fn to_accounts_for(flow_type: FlowType) -> Self {
        ReferenceQuery::new(Resource::Accounts).flag("canTransferTo", flow_type == FlowType::Transfer)
    }

    pub fn categories_for(book_id: i64, flow_type: FlowType) -> Self {
        ReferenceQuery::new(Resource::Categories)
            .param("bookId", book_id)
            .param("type", flow_type)
    }

    pub fn tags_for(book_id: i64, flow_type: FlowType) -> Self {
        ReferenceQuery::new(Resource::Tags)
            .param("bookId", book_id)
            .flag("canExpense", flow_type == FlowType::Expense)
            .flag("canIncome", flow_type == FlowType::Income)
            .flag("canTransfer", flow_type == FlowType::Transfer)
    }

    pub fn payees_for(book_id: i64, flow_type: FlowType) -> Self {
        ReferenceQuery::new(Resource::Payees)
            .param("bookId", book_id)
            .flag("canExpense", flow_type == FlowType::Expense)
            .flag("canIncome", flow_type == FlowType::Income)
    }

    /// Category options of the table search form; unset book or type
    /// widen the list instead of filtering
    pub fn search_categories(book_id: Option<i64>, flow_type: Option<FlowType>) -> Self {
        ReferenceQuery::new(Resource::Categories)
            .param_opt("bookId", book_id)
            .param_opt("type", flow_type)
    }

    pub fn search_tags(book_id: Option<i64>, flow_type: Option<FlowType>) -> Self {
        ReferenceQuery::new(Resource::Tags)
            .param_opt("bookId", book_id)
            .flag("canExpense", flow_type == Some(FlowType::Expense))
            .flag("canIncome", flow_type == Some(FlowType::Income))
            .flag("canTransfer", flow_type == Some(FlowType::Transfer))
    }

    pub fn search_payees(book_id: Option<i64>, flow_type: Option<FlowType>) -> Self {
        ReferenceQuery::new(Resource::Payees)
            .param_opt("bookId", book_id)
            .flag("canExpense", flow_type == Some(FlowType::Expense))
            .flag("canIncome", flow_type == Some(FlowType::Income))
    }

    pub fn books() -> Self {
        ReferenceQuery::new(Resource::Books)
    }
}

/// Proof that a fetch was started for a given generation and filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    query: ReferenceQuery,
}

impl FetchTicket {
    pub fn query(&self) -> &ReferenceQuery {
        &self.query
    }
}

/// Cached option list for one selector
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSlot<T> {
    items: Vec<T>,
    loaded_for: Option<ReferenceQuery>,
    pending: Option<ReferenceQuery>,
    generation: u64,
}

impl<T> Default for ReferenceSlot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loaded_for: None,
            pending: None,
            generation: 0,
        }
    }
}

impl<T> ReferenceSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start a fetch for `query` unless the list for it is cached or already
    /// on its way.
    pub fn request(&mut self, query: ReferenceQuery) -> Option<FetchTicket> {
        if self.loaded_for.as_ref() == Some(&query) || self.pending.as_ref() == Some(&query) {
            return None;
        }
        if self.loaded_for.as_ref().is_some_and(|loaded| loaded != &query) {
            // options for another filter must not stay selectable
            self.items.clear();
            self.loaded_for = None;
        }
        self.generation += 1;
        self.pending = Some(query.clone());
        log::trace!("fetching {} (generation {})", query.resource, self.generation);
        Some(FetchTicket {
            generation: self.generation,
            query,
        })
    }

    /// Apply a finished fetch. Returns false when the response is stale and
    /// was dropped.
    pub fn resolve<E: fmt::Display>(&mut self, ticket: FetchTicket, result: Result<Vec<T>, E>) -> bool {
        if ticket.generation != self.generation || self.pending.as_ref() != Some(&ticket.query) {
            log::debug!(
                "dropping stale {} response (generation {}, current {})",
                ticket.query.resource,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.pending = None;
        match result {
            Ok(items) => {
                self.items = items;
                self.loaded_for = Some(ticket.query);
            }
            Err(e) => {
                log::warn!("failed to load {}: {}", ticket.query.resource, e);
                self.items.clear();
                self.loaded_for = None;
            }
        }
        true
    }

    /// Forget the cached list and any fetch in flight
    pub fn invalidate(&mut self) {
        self.items.clear();
        self.loaded_for = None;
        self.pending = None;
        self.generation += 1;
    }

    /// Drop the cache if it (or the fetch in flight) belongs to another
    /// filter. Returns whether anything was dropped.
    pub fn retarget(&mut self, query: &ReferenceQuery) -> bool {
        let stale_cache = self.loaded_for.as_ref().is_some_and(|q| q != query);
        let stale_pending = self.pending.as_ref().is_some_and(|q| q != query);
        if stale_cache || stale_pending {
            self.invalidate();
            return true;
        }
        false
    }
}

/// Node of a tree select. Branches are the parents of other options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionNode {
    Leaf {
        id: i64,
        label: String,
        selectable: bool,
    },
    Branch {
        id: i64,
        label: String,
        selectable: bool,
        children: Vec<OptionNode>,
    },
}

impl OptionNode {
    pub fn id(&self) -> i64 {
        match self {
            OptionNode::Leaf { id, .. } | OptionNode::Branch { id, .. } => *id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OptionNode::Leaf { label, .. } | OptionNode::Branch { label, .. } => label,
        }
    }

    pub fn selectable(&self) -> bool {
        match self {
            OptionNode::Leaf { selectable, .. } | OptionNode::Branch { selectable, .. } => *selectable,
        }
    }

    pub fn children(&self) -> &[OptionNode] {
        match self {
            OptionNode::Leaf { .. } => &[],
            OptionNode::Branch { children, .. } => children,
        }
    }

    /// Depth-first (depth, node) pairs, for rendering indented option lists
    pub fn flatten(nodes: &[OptionNode]) -> Vec<(usize, &OptionNode)> {
        fn walk<'a>(nodes: &'a [OptionNode], depth: usize, out: &mut Vec<(usize, &'a OptionNode)>) {
            for node in nodes {
                out.push((depth, node));
                walk(node.children(), depth + 1, out);
            }
        }
        let mut out = Vec::new();
        walk(nodes, 0, &mut out);
        out
    }

    pub fn find(nodes: &[OptionNode], id: i64) -> Option<&OptionNode> {
        nodes
            .iter()
            .find_map(|node| if node.id() == id { Some(node) } else { OptionNode::find(node.children(), id) })
    }
}

/// Flat item that knows its parent, as categories and tags do
pub trait TreeItem {
    fn id(&self) -> i64;
    fn parent_id(&self) -> Option<i64>;
    fn label(&self) -> &str;
    fn selectable(&self) -> bool {
        true
    }
}

impl TreeItem for Category {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn label(&self) -> &str {
        &self.name
    }
    fn selectable(&self) -> bool {
        self.enabled
    }
}

impl TreeItem for Tag {
    fn id(&self) -> i64 {
        self.id
    }
    fn parent_id(&self) -> Option<i64> {
        self.parent_id
    }
    fn label(&self) -> &str {
        &self.name
    }
}

/// Build the option tree from a flat list. Items whose parent is missing from
/// the list become roots; input order is kept among siblings.
pub fn build_tree<T: TreeItem>(items: &[T]) -> Vec<OptionNode> {
    let known: std::collections::HashSet<i64> = items.iter().map(TreeItem::id).collect();
    let mut children: BTreeMap<i64, Vec<&T>> = BTreeMap::new();
    let mut roots = Vec::new();
    for item in items {
        match item.parent_id() {
            Some(parent) if known.contains(&parent) && parent != item.id() => {
                children.entry(parent).or_default().push(item)
            }
            _ => roots.push(item),
        }
    }

    fn node<T: TreeItem>(item: &T, children: &BTreeMap<i64, Vec<&T>>, depth: usize) -> OptionNode {
        let kids = match children.get(&item.id()) {
            // guard against parent cycles in bad data
            Some(kids) if depth < 32 => kids.iter().map(|k| node(*k, children, depth + 1)).collect(),
            _ => Vec::new(),
        };
        if kids.is_empty() {
            OptionNode::Leaf {
                id: item.id(),
                label: item.label().to_string(),
                selectable: item.selectable(),
            }
        } else {
            OptionNode::Branch {
                id: item.id(),
                label: item.label().to_string(),
                selectable: item.selectable(),
                children: kids,
            }
        }
    }

    roots.into_iter().map(|item| node(item, &children, 0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: Option<i64>, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
            parent_id,
            category_type: FlowType::Expense,
            notes: None,
            enabled: true,
        }
    }

    #[test]
    fn test_queries_omit_flags_for_other_types() {
        let expense = ReferenceQuery::accounts_for(FlowType::Expense);
        assert_eq!(expense.pairs(), vec![("canExpense".to_string(), "true".to_string())]);

        let transfer_to = ReferenceQuery::to_accounts_for(FlowType::Expense);
        assert!(transfer_to.params.is_empty());

        let tags = ReferenceQuery::tags_for(7, FlowType::Transfer);
        assert_eq!(tags.params.get("bookId").map(String::as_str), Some("7"));
        assert_eq!(tags.params.get("canTransfer").map(String::as_str), Some("true"));
        assert!(!tags.params.contains_key("canExpense"));

        let categories = ReferenceQuery::categories_for(7, FlowType::Income);
        assert_eq!(categories.params.get("type").map(String::as_str), Some("INCOME"));
    }

    #[test]
    fn test_search_queries_follow_selected_type() {
        let all = ReferenceQuery::search_categories(Some(7), None);
        assert_eq!(all.pairs(), vec![("bookId".to_string(), "7".to_string())]);

        let income = ReferenceQuery::search_categories(Some(7), Some(FlowType::Income));
        assert_eq!(income.params.get("type").map(String::as_str), Some("INCOME"));
        assert_ne!(income, all);

        let payees = ReferenceQuery::search_payees(None, Some(FlowType::Expense));
        assert_eq!(payees.pairs(), vec![("canExpense".to_string(), "true".to_string())]);

        let tags = ReferenceQuery::search_tags(Some(7), Some(FlowType::Transfer));
        assert_eq!(tags.params.get("canTransfer").map(String::as_str), Some("true"));
        assert!(ReferenceQuery::search_tags(None, None).params.is_empty());
    }

    #[test]
    fn test_slot_fetches_once_per_filter() {
        let mut slot: ReferenceSlot<i64> = ReferenceSlot::new();
        let query = ReferenceQuery::books();

        let ticket = slot.request(query.clone()).expect("first focus fetches");
        assert!(slot.is_loading());
        assert!(slot.request(query.clone()).is_none(), "no second fetch while loading");

        assert!(slot.resolve::<String>(ticket, Ok(vec![1, 2])));
        assert_eq!(slot.items(), &[1, 2]);
        assert!(!slot.is_loading());
        assert!(slot.request(query).is_none(), "cached after load");
    }

    #[test]
    fn test_stale_category_response_is_dropped_after_type_switch() {
        let mut slot: ReferenceSlot<&str> = ReferenceSlot::new();
        let expense = ReferenceQuery::categories_for(7, FlowType::Expense);
        let transfer = ReferenceQuery::categories_for(7, FlowType::Transfer);

        let expense_ticket = slot.request(expense).unwrap();
        assert!(slot.retarget(&transfer));
        let transfer_ticket = slot.request(transfer.clone()).unwrap();

        assert!(!slot.resolve::<String>(expense_ticket, Ok(vec!["Food"])));
        assert!(slot.items().is_empty());
        assert!(slot.is_loading());

        assert!(slot.resolve::<String>(transfer_ticket, Ok(vec!["Fees"])));
        assert_eq!(slot.items(), &["Fees"]);
    }

    #[test]
    fn test_request_for_new_filter_supersedes_pending_fetch() {
        let mut slot: ReferenceSlot<&str> = ReferenceSlot::new();
        let first = slot.request(ReferenceQuery::accounts_for(FlowType::Expense)).unwrap();
        let second = slot.request(ReferenceQuery::accounts_for(FlowType::Income)).unwrap();

        assert!(!slot.resolve::<String>(first, Ok(vec!["Wallet"])));
        assert!(slot.resolve::<String>(second, Ok(vec!["Salary card"])));
        assert_eq!(slot.items(), &["Salary card"]);
    }

    #[test]
    fn test_changing_filter_clears_cached_options() {
        let mut slot: ReferenceSlot<&str> = ReferenceSlot::new();
        let ticket = slot.request(ReferenceQuery::tags_for(7, FlowType::Expense)).unwrap();
        slot.resolve::<String>(ticket, Ok(vec!["Trip"]));

        assert!(!slot.retarget(&ReferenceQuery::tags_for(7, FlowType::Expense)));
        assert!(slot.retarget(&ReferenceQuery::tags_for(7, FlowType::Income)));
        assert!(slot.items().is_empty());
        assert!(slot.request(ReferenceQuery::tags_for(7, FlowType::Income)).is_some());
    }

    #[test]
    fn test_failed_fetch_resets_loading_and_allows_retry() {
        let mut slot: ReferenceSlot<&str> = ReferenceSlot::new();
        let ticket = slot.request(ReferenceQuery::books()).unwrap();
        assert!(slot.resolve(ticket, Err("connection refused")));
        assert!(!slot.is_loading());
        assert!(slot.items().is_empty());
        assert!(slot.request(ReferenceQuery::books()).is_some());
    }

    #[test]
    fn test_invalidate_drops_in_flight_response() {
        let mut slot: ReferenceSlot<&str> = ReferenceSlot::new();
        let ticket = slot.request(ReferenceQuery::books()).unwrap();
        slot.invalidate();
        assert!(!slot.resolve::<String>(ticket, Ok(vec!["Home"])));
        assert!(slot.items().is_empty());
    }

    #[test]
    fn test_build_tree_nests_children() {
        let items = vec![
            category(1, None, "Food"),
            category(2, Some(1), "Groceries"),
            category(3, Some(1), "Restaurants"),
            category(4, None, "Rent"),
            category(5, Some(99), "Orphan"),
        ];
        let tree = build_tree(&items);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree[0].children().len(), 2);
        assert_eq!(tree[0].children()[1].label(), "Restaurants");
        assert!(matches!(tree[1], OptionNode::Leaf { id: 4, .. }));
        assert_eq!(tree[2].label(), "Orphan");

        let flat: Vec<(usize, i64)> = OptionNode::flatten(&tree).into_iter().map(|(d, n)| (d, n.id())).collect();
        assert_eq!(flat, vec![(0, 1), (1, 2), (1, 3), (0, 4), (0, 5)]);
        assert_eq!(OptionNode::find(&tree, 3).map(|n| n.label()), Some("Restaurants"));
    }

    #[test]
    fn test_disabled_categories_are_not_selectable() {
        let mut disabled = category(2, Some(1), "Old");
        disabled.enabled = false;
        let tree = build_tree(&[category(1, None, "Food"), disabled]);
        assert!(tree[0].selectable());
        assert!(!tree[0].children()[0].selectable());
    }
}

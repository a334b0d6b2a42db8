//! Working state of the balance flow entry form.
//!
//! Everything here is a pure function of its inputs: the form component hands
//! in a [`FormContext`] (what the user asked to do, on which record) and gets
//! back a [`TransactionDraft`] plus whatever it needs to decide which inputs to
//! render. No I/O happens in this module.

use crate::model::{Account, BalanceFlow, Book, CategoryRef, FlowType, Payee};
use serde::{Deserialize, Serialize};

/// What the form was opened for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormAction {
    Create,
    Update,
    Copy,
    Refund,
}

impl FormAction {
    pub fn label(&self) -> &'static str {
        match self {
            FormAction::Create => "Add",
            FormAction::Update => "Update",
            FormAction::Copy => "Copy",
            FormAction::Refund => "Refund",
        }
    }

    /// Title of the form, e.g. "Refund Expense"
    pub fn title(&self, flow_type: FlowType) -> String {
        format!("{} {}", self.label(), flow_type.label())
    }

    /// Only updates write back to the record they were opened from
    pub fn targets_existing(&self) -> bool {
        matches!(self, FormAction::Update)
    }
}

/// Everything the form needs to know about why it is open.
///
/// Passed explicitly to the form component by whichever table opened it.
#[derive(Debug, Clone, PartialEq)]
pub struct FormContext {
    pub action: FormAction,
    pub flow_type: FlowType,
    pub book: Book,
    /// Record being updated, copied or refunded
    pub current_row: Option<BalanceFlow>,
    /// Epoch milliseconds used for fresh `create_time` values
    pub now: i64,
}

impl FormContext {
    pub fn create(flow_type: FlowType, book: Book, now: i64) -> Self {
        Self {
            action: FormAction::Create,
            flow_type,
            book,
            current_row: None,
            now,
        }
    }

    /// Context for acting on an existing record; type and book come from the record
    pub fn for_record(action: FormAction, record: BalanceFlow, now: i64) -> Self {
        Self {
            action,
            flow_type: record.flow_type,
            book: record.book.clone(),
            current_row: Some(record),
            now,
        }
    }

    /// Switch tab or book while adding. Other actions keep their record's
    /// type and book, so they come back unchanged.
    pub fn retarget(&self, flow_type: FlowType, book: Book) -> FormContext {
        if self.action != FormAction::Create {
            log::debug!("ignoring retarget for {:?} form", self.action);
            return self.clone();
        }
        FormContext {
            flow_type,
            book,
            ..self.clone()
        }
    }

    pub fn record_id(&self) -> Option<i64> {
        self.current_row.as_ref().map(|row| row.id)
    }
}

/// One category share of an expense or income draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryLine {
    pub category: Option<CategoryRef>,
    pub amount: Option<f64>,
    pub converted_amount: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransferLeg {
    pub to: Option<Account>,
    pub amount: Option<f64>,
    pub converted_amount: Option<f64>,
}

/// Type-dependent part of the draft. Expense and income carry category lines,
/// transfers carry a destination and a single amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DraftBody {
    Split(Vec<CategoryLine>),
    Transfer(TransferLeg),
    Adjust,
}

impl DraftBody {
    fn negate(&mut self) {
        match self {
            DraftBody::Split(lines) => {
                for line in lines.iter_mut() {
                    line.amount = negate(line.amount);
                    line.converted_amount = negate(line.converted_amount);
                }
            }
            DraftBody::Transfer(leg) => {
                leg.amount = negate(leg.amount);
                leg.converted_amount = negate(leg.converted_amount);
            }
            DraftBody::Adjust => {}
        }
    }
}

/// A tag picked in the tag tree. Picks made in the UI carry their label
/// along; picks restored from a record may be bare ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagSelection {
    Id(i64),
    Labeled { value: i64, label: String },
}

impl TagSelection {
    pub fn id(&self) -> i64 {
        match self {
            TagSelection::Id(id) => *id,
            TagSelection::Labeled { value, .. } => *value,
        }
    }
}

/// The form's working state
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub flow_type: FlowType,
    pub book: Book,
    pub title: Option<String>,
    pub create_time: i64,
    pub account: Option<Account>,
    pub body: DraftBody,
    pub tags: Vec<TagSelection>,
    pub payee: Option<Payee>,
    pub confirm: bool,
    pub include: bool,
    pub update_balance: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyConversion {
    pub need_convert: bool,
    pub convert_code: Option<String>,
}

impl CurrencyConversion {
    fn none() -> Self {
        Self::default()
    }

    /// Label for the converted amount input, e.g. "Convert USD"
    pub fn label(&self) -> Option<String> {
        match (&self.convert_code, self.need_convert) {
            (Some(code), true) => Some(format!("Convert {}", code)),
            _ => None,
        }
    }
}

/// Which inputs the form renders and which of them are editable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVisibility {
    pub type_tabs: bool,
    pub book_editable: bool,
    pub account_required: bool,
    pub to_account: bool,
    pub transfer_amount: bool,
    pub category_lines: bool,
    pub payee: bool,
    pub converted_amount: bool,
    pub confirm_editable: bool,
}

/// Build the draft the form opens with
pub fn initial_values(ctx: &FormContext) -> TransactionDraft {
    let record = match ctx.current_row.as_ref() {
        Some(record) if ctx.action != FormAction::Create => record,
        _ => {
            if ctx.action != FormAction::Create {
                log::warn!("{:?} form opened without a record, seeding a new draft", ctx.action);
            }
            return seed_create(ctx);
        }
    };

    match ctx.action {
        FormAction::Create => seed_create(ctx),
        FormAction::Update => copy_for_update(record),
        FormAction::Copy => copy_for_duplicate(record, ctx.now),
        FormAction::Refund => copy_for_refund(record, ctx.now),
    }
}

/// New draft seeded from the book's per-type defaults
pub fn seed_create(ctx: &FormContext) -> TransactionDraft {
    let book = &ctx.book;
    let (account, body) = match ctx.flow_type {
        FlowType::Expense => (
            book.default_expense_account.clone(),
            split_with_default(book.default_expense_category.clone()),
        ),
        FlowType::Income => (
            book.default_income_account.clone(),
            split_with_default(book.default_income_category.clone()),
        ),
        FlowType::Transfer => (
            book.default_transfer_from_account.clone(),
            DraftBody::Transfer(TransferLeg {
                to: book.default_transfer_to_account.clone(),
                ..TransferLeg::default()
            }),
        ),
        FlowType::Adjust => (None, DraftBody::Adjust),
    };
    log::debug!(
        "seeded {} draft for book {} (account: {:?})",
        ctx.flow_type,
        book.id,
        account.as_ref().map(|a| a.id)
    );

    TransactionDraft {
        flow_type: ctx.flow_type,
        book: book.clone(),
        title: None,
        create_time: ctx.now,
        account,
        body,
        tags: Vec::new(),
        payee: None,
        confirm: true,
        include: true,
        update_balance: true,
        notes: None,
    }
}

/// Draft editing `record` in place: notes, time and confirm state are kept
pub fn copy_for_update(record: &BalanceFlow) -> TransactionDraft {
    draft_from_record(record)
}

/// Draft for a new record duplicating `record`
pub fn copy_for_duplicate(record: &BalanceFlow, now: i64) -> TransactionDraft {
    let mut draft = draft_from_record(record);
    draft.notes = None;
    draft.create_time = now;
    draft.confirm = true;
    draft.include = true;
    draft
}

/// Duplicate of `record` with every amount negated
pub fn copy_for_refund(record: &BalanceFlow, now: i64) -> TransactionDraft {
    let mut draft = copy_for_duplicate(record, now);
    draft.body.negate();
    draft
}

fn draft_from_record(record: &BalanceFlow) -> TransactionDraft {
    let body = match record.flow_type {
        FlowType::Expense | FlowType::Income => DraftBody::Split(
            record
                .categories
                .iter()
                .map(|relation| CategoryLine {
                    category: Some(relation.category.clone()),
                    amount: Some(relation.amount),
                    converted_amount: relation.converted_amount,
                })
                .collect(),
        ),
        FlowType::Transfer => DraftBody::Transfer(TransferLeg {
            to: record.to.clone(),
            amount: record.amount,
            converted_amount: record.converted_amount,
        }),
        FlowType::Adjust => DraftBody::Adjust,
    };

    TransactionDraft {
        flow_type: record.flow_type,
        book: record.book.clone(),
        title: record.title.clone(),
        create_time: record.create_time,
        account: record.account.clone(),
        body,
        tags: record
            .tags
            .iter()
            .map(|relation| TagSelection::Labeled {
                value: relation.tag.id,
                label: relation.tag.name.clone(),
            })
            .collect(),
        payee: record.payee.clone(),
        confirm: record.confirm,
        include: record.include,
        update_balance: true,
        notes: record.notes.clone(),
    }
}

/// Whether amounts must also be entered in a second currency
pub fn currency_conversion(
    flow_type: FlowType,
    book: &Book,
    account: Option<&Account>,
    to: Option<&Account>,
) -> CurrencyConversion {
    let Some(account) = account else {
        return CurrencyConversion::none();
    };
    match flow_type {
        FlowType::Expense | FlowType::Income => CurrencyConversion {
            need_convert: account.currency_code != book.default_currency_code,
            convert_code: Some(book.default_currency_code.clone()),
        },
        FlowType::Transfer => match to {
            Some(to) => CurrencyConversion {
                need_convert: account.currency_code != to.currency_code,
                convert_code: Some(to.currency_code.clone()),
            },
            None => CurrencyConversion::none(),
        },
        FlowType::Adjust => CurrencyConversion::none(),
    }
}

/// Which inputs to show for `flow_type` under `action`
pub fn field_visibility(action: FormAction, flow_type: FlowType, conversion: &CurrencyConversion) -> FieldVisibility {
    let transfer = flow_type == FlowType::Transfer;
    FieldVisibility {
        type_tabs: action == FormAction::Create,
        book_editable: action == FormAction::Create,
        account_required: transfer,
        to_account: transfer,
        transfer_amount: transfer,
        category_lines: flow_type.is_split(),
        payee: flow_type.is_split(),
        converted_amount: conversion.need_convert,
        confirm_editable: action != FormAction::Update,
    }
}

impl TransactionDraft {
    pub fn conversion(&self) -> CurrencyConversion {
        currency_conversion(self.flow_type, &self.book, self.account.as_ref(), self.to_account())
    }

    pub fn to_account(&self) -> Option<&Account> {
        match &self.body {
            DraftBody::Transfer(leg) => leg.to.as_ref(),
            _ => None,
        }
    }

    pub fn set_to_account(&mut self, to: Option<Account>) {
        if let DraftBody::Transfer(leg) = &mut self.body {
            leg.to = to;
        }
    }

    pub fn lines(&self) -> &[CategoryLine] {
        match &self.body {
            DraftBody::Split(lines) => lines,
            _ => &[],
        }
    }

    /// Mutable access to one category line, if the draft has it
    pub fn line_mut(&mut self, index: usize) -> Option<&mut CategoryLine> {
        match &mut self.body {
            DraftBody::Split(lines) => lines.get_mut(index),
            _ => None,
        }
    }

    pub fn transfer_leg(&self) -> Option<&TransferLeg> {
        match &self.body {
            DraftBody::Transfer(leg) => Some(leg),
            _ => None,
        }
    }

    pub fn transfer_mut(&mut self) -> Option<&mut TransferLeg> {
        match &mut self.body {
            DraftBody::Transfer(leg) => Some(leg),
            _ => None,
        }
    }

    pub fn add_line(&mut self) {
        if let DraftBody::Split(lines) = &mut self.body {
            lines.push(CategoryLine::default());
        }
    }

    /// Remove a category line. The last remaining line stays.
    pub fn remove_line(&mut self, index: usize) -> bool {
        match &mut self.body {
            DraftBody::Split(lines) if lines.len() > 1 && index < lines.len() => {
                lines.remove(index);
                true
            }
            _ => false,
        }
    }

    pub fn toggle_tag(&mut self, selection: TagSelection) {
        let id = selection.id();
        if let Some(pos) = self.tags.iter().position(|t| t.id() == id) {
            self.tags.remove(pos);
        } else {
            self.tags.push(selection);
        }
    }
}

/// One user edit to the draft, as dispatched by the form's inputs
#[derive(Debug, Clone, PartialEq)]
pub enum DraftEdit {
    Title(String),
    CreateTime(i64),
    Account(Option<Account>),
    ToAccount(Option<Account>),
    TransferAmount(Option<f64>),
    TransferConvertedAmount(Option<f64>),
    LineCategory(usize, Option<CategoryRef>),
    LineAmount(usize, Option<f64>),
    LineConvertedAmount(usize, Option<f64>),
    AddLine,
    RemoveLine(usize),
    ToggleTag(TagSelection),
    Payee(Option<Payee>),
    Confirm(bool),
    Include(bool),
    UpdateBalance(bool),
    Notes(String),
}

impl TransactionDraft {
    /// Apply an edit. Edits that don't fit the body (a line edit on a
    /// transfer, say) are ignored.
    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::Title(title) => self.title = Some(title),
            DraftEdit::CreateTime(millis) => self.create_time = millis,
            DraftEdit::Account(account) => self.account = account,
            DraftEdit::ToAccount(to) => self.set_to_account(to),
            DraftEdit::TransferAmount(amount) => {
                if let Some(leg) = self.transfer_mut() {
                    leg.amount = amount;
                }
            }
            DraftEdit::TransferConvertedAmount(amount) => {
                if let Some(leg) = self.transfer_mut() {
                    leg.converted_amount = amount;
                }
            }
            DraftEdit::LineCategory(index, category) => {
                if let Some(line) = self.line_mut(index) {
                    line.category = category;
                }
            }
            DraftEdit::LineAmount(index, amount) => {
                if let Some(line) = self.line_mut(index) {
                    line.amount = amount;
                }
            }
            DraftEdit::LineConvertedAmount(index, amount) => {
                if let Some(line) = self.line_mut(index) {
                    line.converted_amount = amount;
                }
            }
            DraftEdit::AddLine => self.add_line(),
            DraftEdit::RemoveLine(index) => {
                self.remove_line(index);
            }
            DraftEdit::ToggleTag(tag) => self.toggle_tag(tag),
            DraftEdit::Payee(payee) => self.payee = payee,
            DraftEdit::Confirm(confirm) => self.confirm = confirm,
            DraftEdit::Include(include) => self.include = include,
            DraftEdit::UpdateBalance(update) => self.update_balance = update,
            DraftEdit::Notes(notes) => self.notes = Some(notes),
        }
    }
}

/// Row operations the flow table offers for a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowActions {
    pub copy: bool,
    pub update: bool,
    pub refund: bool,
    pub confirm: bool,
}

/// Balance adjustments are read-only in the flow table
pub fn row_actions(record: &BalanceFlow) -> RowActions {
    let editable = record.flow_type != FlowType::Adjust;
    RowActions {
        copy: editable,
        update: editable,
        refund: editable,
        confirm: editable && !record.confirm,
    }
}

/// Prompt shown before deleting `record`
pub fn delete_prompt(record: &BalanceFlow) -> &'static str {
    if record.confirm {
        "Delete this record? It is confirmed, so the account balance will change."
    } else {
        "Delete this record?"
    }
}

fn split_with_default(category: Option<CategoryRef>) -> DraftBody {
    DraftBody::Split(vec![CategoryLine {
        category,
        ..CategoryLine::default()
    }])
}

fn negate(value: Option<f64>) -> Option<f64> {
    // keep zero unsigned so it serializes as 0
    value.map(|v| if v == 0.0 { 0.0 } else { -v })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::model::{CategoryRelation, TagRef, TagRelation};

    pub fn account(id: i64, currency: &str) -> Account {
        Account {
            id,
            name: format!("Account {}", id),
            currency_code: currency.to_string(),
            can_expense: true,
            can_income: true,
            can_transfer_from: true,
            can_transfer_to: true,
            enabled: true,
        }
    }

    pub fn category(id: i64) -> CategoryRef {
        CategoryRef {
            id,
            name: format!("Category {}", id),
        }
    }

    pub fn book() -> Book {
        Book {
            id: 7,
            name: "Household".to_string(),
            default_currency_code: "CNY".to_string(),
            default_expense_account: Some(account(3, "CNY")),
            default_income_account: Some(account(4, "CNY")),
            default_transfer_from_account: Some(account(3, "CNY")),
            default_transfer_to_account: Some(account(5, "USD")),
            default_expense_category: Some(category(1)),
            default_income_category: None,
        }
    }

    pub fn expense_record() -> BalanceFlow {
        BalanceFlow {
            id: 42,
            flow_type: FlowType::Expense,
            book: book(),
            title: Some("Groceries".to_string()),
            create_time: 1_600_000_000_000,
            account: Some(account(3, "CNY")),
            to: None,
            amount: Some(70.0),
            converted_amount: None,
            categories: vec![
                CategoryRelation {
                    category: category(1),
                    amount: 100.0,
                    converted_amount: Some(14.0),
                },
                CategoryRelation {
                    category: category(2),
                    amount: -30.0,
                    converted_amount: None,
                },
            ],
            tags: vec![TagRelation {
                tag: TagRef {
                    id: 9,
                    name: "Weekly".to_string(),
                },
                amount: Some(70.0),
            }],
            payee: None,
            confirm: false,
            include: false,
            notes: Some("split with roommate".to_string()),
            type_name: None,
            account_name: None,
            category_name: None,
            need_convert: false,
            convert_code: None,
        }
    }

    pub fn transfer_record() -> BalanceFlow {
        BalanceFlow {
            id: 43,
            flow_type: FlowType::Transfer,
            to: Some(account(5, "USD")),
            amount: Some(700.0),
            converted_amount: Some(100.0),
            categories: vec![],
            tags: vec![],
            ..expense_record()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_create_expense_seeds_book_defaults() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let draft = initial_values(&ctx);

        assert_eq!(draft.account, book().default_expense_account);
        assert_eq!(draft.lines().len(), 1);
        assert_eq!(draft.lines()[0].category, Some(category(1)));
        assert!(draft.confirm);
        assert!(draft.include);
        assert_eq!(draft.create_time, NOW);
    }

    #[test]
    fn test_create_income_without_default_category_has_empty_line() {
        let ctx = FormContext::create(FlowType::Income, book(), NOW);
        let draft = initial_values(&ctx);

        assert_eq!(draft.account.as_ref().map(|a| a.id), Some(4));
        assert_eq!(draft.lines(), &[CategoryLine::default()]);
    }

    #[test]
    fn test_create_transfer_seeds_both_accounts() {
        let ctx = FormContext::create(FlowType::Transfer, book(), NOW);
        let draft = initial_values(&ctx);

        assert_eq!(draft.account.as_ref().map(|a| a.id), Some(3));
        assert_eq!(draft.to_account().map(|a| a.id), Some(5));
        assert!(draft.lines().is_empty());
    }

    #[test]
    fn test_update_keeps_notes_and_confirm_state() {
        let record = expense_record();
        let ctx = FormContext::for_record(FormAction::Update, record.clone(), NOW);
        let draft = initial_values(&ctx);

        assert_eq!(draft.notes, record.notes);
        assert!(!draft.confirm);
        assert!(!draft.include);
        assert_eq!(draft.create_time, record.create_time);
        assert_eq!(draft.lines()[1].amount, Some(-30.0));
    }

    #[test]
    fn test_copy_strips_notes_and_refreshes_flags() {
        let ctx = FormContext::for_record(FormAction::Copy, expense_record(), NOW);
        let draft = initial_values(&ctx);

        assert_eq!(draft.notes, None);
        assert!(draft.confirm);
        assert!(draft.include);
        assert_eq!(draft.create_time, NOW);
        assert_eq!(draft.lines()[0].amount, Some(100.0));
        assert_eq!(
            draft.tags,
            vec![TagSelection::Labeled {
                value: 9,
                label: "Weekly".to_string()
            }]
        );
    }

    #[test]
    fn test_refund_negates_every_category_line() {
        let ctx = FormContext::for_record(FormAction::Refund, expense_record(), NOW);
        let draft = initial_values(&ctx);

        let amounts: Vec<_> = draft.lines().iter().map(|l| l.amount).collect();
        assert_eq!(amounts, vec![Some(-100.0), Some(30.0)]);
        // a stray converted amount is negated, not dropped
        assert_eq!(draft.lines()[0].converted_amount, Some(-14.0));
        assert_eq!(draft.lines()[1].converted_amount, None);
        assert_eq!(draft.notes, None);
    }

    #[test]
    fn test_refund_transfer_negates_single_pair() {
        let ctx = FormContext::for_record(FormAction::Refund, transfer_record(), NOW);
        let draft = initial_values(&ctx);

        let DraftBody::Transfer(leg) = &draft.body else {
            panic!("transfer record must produce a transfer body");
        };
        assert_eq!(leg.amount, Some(-700.0));
        assert_eq!(leg.converted_amount, Some(-100.0));
        assert_eq!(leg.to.as_ref().map(|a| a.id), Some(5));
    }

    #[test]
    fn test_refund_keeps_zero_unsigned() {
        let mut record = expense_record();
        record.categories[0].amount = 0.0;
        let draft = copy_for_refund(&record, NOW);
        let amount = draft.lines()[0].amount.unwrap();
        assert!(amount == 0.0 && amount.is_sign_positive());
    }

    #[test]
    fn test_mutating_draft_leaves_record_untouched() {
        let record = expense_record();
        let snapshot = record.clone();
        let ctx = FormContext::for_record(FormAction::Update, record, NOW);

        let mut draft = initial_values(&ctx);
        draft.line_mut(0).unwrap().amount = Some(1.0);
        draft.account.as_mut().unwrap().currency_code = "EUR".to_string();
        draft.book.name = "Changed".to_string();
        draft.notes = None;

        assert_eq!(ctx.current_row, Some(snapshot));
    }

    #[test]
    fn test_split_conversion_compares_with_book_currency() {
        let usd = account(8, "USD");
        let conv = currency_conversion(FlowType::Expense, &book(), Some(&usd), None);
        assert!(conv.need_convert);
        assert_eq!(conv.convert_code.as_deref(), Some("CNY"));
        assert_eq!(conv.label().as_deref(), Some("Convert CNY"));

        let cny = account(3, "CNY");
        assert!(!currency_conversion(FlowType::Income, &book(), Some(&cny), None).need_convert);
    }

    #[test]
    fn test_transfer_conversion_depends_on_destination() {
        let cny = account(3, "CNY");
        let usd = account(5, "USD");
        let other_cny = account(6, "CNY");

        let conv = currency_conversion(FlowType::Transfer, &book(), Some(&cny), Some(&usd));
        assert!(conv.need_convert);
        assert_eq!(conv.convert_code.as_deref(), Some("USD"));

        assert!(!currency_conversion(FlowType::Transfer, &book(), Some(&cny), Some(&other_cny)).need_convert);
        assert!(!currency_conversion(FlowType::Transfer, &book(), Some(&usd), None).need_convert);
    }

    #[test]
    fn test_no_conversion_without_account_or_for_adjust() {
        assert_eq!(
            currency_conversion(FlowType::Expense, &book(), None, None),
            CurrencyConversion::default()
        );
        let usd = account(5, "USD");
        assert!(!currency_conversion(FlowType::Adjust, &book(), Some(&usd), None).need_convert);
    }

    #[test]
    fn test_draft_conversion_tracks_account_changes() {
        let ctx = FormContext::create(FlowType::Transfer, book(), NOW);
        let mut draft = initial_values(&ctx);
        assert!(draft.conversion().need_convert);

        draft.set_to_account(Some(account(6, "CNY")));
        assert!(!draft.conversion().need_convert);

        draft.set_to_account(None);
        assert!(!draft.conversion().need_convert);
    }

    #[test]
    fn test_field_visibility_by_type_and_action() {
        let conv = CurrencyConversion::default();
        let transfer = field_visibility(FormAction::Create, FlowType::Transfer, &conv);
        assert!(transfer.to_account && transfer.transfer_amount && transfer.account_required);
        assert!(!transfer.category_lines && !transfer.payee);
        assert!(transfer.type_tabs && transfer.book_editable);

        let update = field_visibility(FormAction::Update, FlowType::Expense, &conv);
        assert!(update.category_lines && update.payee);
        assert!(!update.confirm_editable && !update.book_editable && !update.type_tabs);
        assert!(!update.converted_amount);
    }

    #[test]
    fn test_retarget_only_applies_to_create() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let switched = ctx.retarget(FlowType::Transfer, book());
        assert_eq!(switched.flow_type, FlowType::Transfer);
        assert!(matches!(initial_values(&switched).body, DraftBody::Transfer(_)));

        let update = FormContext::for_record(FormAction::Update, expense_record(), NOW);
        assert_eq!(update.retarget(FlowType::Income, book()), update);
    }

    #[test]
    fn test_last_category_line_cannot_be_removed() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let mut draft = initial_values(&ctx);
        assert!(!draft.remove_line(0));

        draft.add_line();
        assert_eq!(draft.lines().len(), 2);
        assert!(draft.remove_line(0));
        assert_eq!(draft.lines(), &[CategoryLine::default()]);
    }

    #[test]
    fn test_toggle_tag_adds_and_removes_by_id() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let mut draft = initial_values(&ctx);
        draft.toggle_tag(TagSelection::Id(9));
        assert_eq!(draft.tags.len(), 1);
        draft.toggle_tag(TagSelection::Labeled {
            value: 9,
            label: "Weekly".to_string(),
        });
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_titles() {
        assert_eq!(FormAction::Refund.title(FlowType::Expense), "Refund Expense");
        assert_eq!(FormAction::Create.title(FlowType::Transfer), "Add Transfer");
    }

    #[test]
    fn test_edits_apply_to_matching_body_only() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let mut draft = initial_values(&ctx);
        draft.apply(DraftEdit::LineAmount(0, Some(12.5)));
        draft.apply(DraftEdit::AddLine);
        draft.apply(DraftEdit::LineCategory(1, Some(category(2))));
        draft.apply(DraftEdit::TransferAmount(Some(99.0)));
        draft.apply(DraftEdit::Confirm(false));

        assert_eq!(draft.lines()[0].amount, Some(12.5));
        assert_eq!(draft.lines()[1].category, Some(category(2)));
        assert!(matches!(draft.body, DraftBody::Split(_)));
        assert!(!draft.confirm);

        // out of range line edits are dropped
        draft.apply(DraftEdit::LineAmount(5, Some(1.0)));
        assert_eq!(draft.lines().len(), 2);
    }

    #[test]
    fn test_changing_account_flips_conversion() {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let mut draft = initial_values(&ctx);
        assert!(!draft.conversion().need_convert);
        draft.apply(DraftEdit::Account(Some(account(8, "USD"))));
        assert!(draft.conversion().need_convert);
    }

    #[test]
    fn test_adjust_rows_are_read_only() {
        let adjust = BalanceFlow {
            flow_type: FlowType::Adjust,
            ..expense_record()
        };
        let actions = row_actions(&adjust);
        assert!(!actions.copy && !actions.update && !actions.refund && !actions.confirm);

        let open = row_actions(&expense_record());
        assert!(open.copy && open.update && open.refund && open.confirm);

        let confirmed = BalanceFlow {
            confirm: true,
            ..expense_record()
        };
        assert!(!row_actions(&confirmed).confirm);
        assert!(delete_prompt(&confirmed).contains("balance"));
        assert_eq!(delete_prompt(&expense_record()), "Delete this record?");
    }
}

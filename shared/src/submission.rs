//! Turns the form's working state into the balance-flows write payload.

use crate::error::{AmountParseError, SubmissionError};
use crate::flow_form::{DraftBody, FormContext, TransactionDraft};
use crate::model::FlowType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where the payload goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(i64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryLinePayload {
    pub category_id: i64,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_amount: Option<f64>,
}

/// Normalized write body: selections are replaced by their ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceFlowPayload {
    #[serde(rename = "type")]
    pub flow_type: FlowType,
    pub book_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub create_time: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_amount: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<CategoryLinePayload>,
    pub tags: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payee_id: Option<i64>,
    pub confirm: bool,
    pub include: bool,
    pub update_balance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub target: SubmitTarget,
    pub payload: BalanceFlowPayload,
}

/// Validate `draft` and build the request the form should send.
///
/// Updates always target the record the form was opened from.
pub fn prepare_submission(ctx: &FormContext, draft: &TransactionDraft) -> Result<Submission, SubmissionError> {
    let target = if ctx.action.targets_existing() {
        SubmitTarget::Update(ctx.record_id().ok_or(SubmissionError::MissingRecordId)?)
    } else {
        SubmitTarget::Create
    };
    let payload = to_payload(draft)?;
    log::debug!("prepared {:?} for {} flow in book {}", target, payload.flow_type, payload.book_id);
    Ok(Submission { target, payload })
}

pub fn to_payload(draft: &TransactionDraft) -> Result<BalanceFlowPayload, SubmissionError> {
    let conversion = draft.conversion();
    let required_converted = |value: Option<f64>| -> Result<Option<f64>, SubmissionError> {
        if !conversion.need_convert {
            return Ok(None);
        }
        match value {
            Some(v) => Ok(Some(v)),
            None => Err(SubmissionError::MissingConvertedAmount {
                code: conversion.convert_code.clone().unwrap_or_default(),
            }),
        }
    };

    let mut payload = BalanceFlowPayload {
        flow_type: draft.flow_type,
        book_id: draft.book.id,
        title: non_blank(draft.title.as_deref()),
        create_time: draft.create_time,
        account_id: draft.account.as_ref().map(|a| a.id),
        to_id: None,
        amount: None,
        converted_amount: None,
        categories: Vec::new(),
        tags: draft.tags.iter().map(|t| t.id()).collect(),
        payee_id: None,
        confirm: draft.confirm,
        include: draft.include,
        update_balance: draft.update_balance,
        notes: non_blank(draft.notes.as_deref()),
    };

    match &draft.body {
        DraftBody::Split(lines) => {
            if lines.is_empty() {
                return Err(SubmissionError::NoCategoryLines);
            }
            payload.categories = lines
                .iter()
                .enumerate()
                .map(|(i, line)| -> Result<CategoryLinePayload, SubmissionError> {
                    let line_no = i + 1;
                    let category = line
                        .category
                        .as_ref()
                        .ok_or(SubmissionError::MissingCategory { line: line_no })?;
                    let amount = line.amount.ok_or(SubmissionError::MissingAmount { line: line_no })?;
                    Ok(CategoryLinePayload {
                        category_id: category.id,
                        amount,
                        converted_amount: required_converted(line.converted_amount)?,
                    })
                })
                .collect::<Result<Vec<_>, SubmissionError>>()?;
            payload.payee_id = draft.payee.as_ref().map(|p| p.id);
        }
        DraftBody::Transfer(leg) => {
            if payload.account_id.is_none() {
                return Err(SubmissionError::MissingField("transfer from account"));
            }
            let to = leg
                .to
                .as_ref()
                .ok_or(SubmissionError::MissingField("transfer to account"))?;
            payload.to_id = Some(to.id);
            payload.amount = Some(leg.amount.ok_or(SubmissionError::MissingField("amount"))?);
            payload.converted_amount = required_converted(leg.converted_amount)?;
        }
        DraftBody::Adjust => return Err(SubmissionError::UnsupportedType),
    }

    Ok(payload)
}

/// Parse an amount typed into the form. Negative numbers are refunds.
pub fn parse_amount(input: &str) -> Result<f64, AmountParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AmountParseError::Empty);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AmountParseError::NotANumber(trimmed.to_string())),
    }
}

/// Like [`parse_amount`], but an empty input clears the value
pub fn parse_optional_amount(input: &str) -> Result<Option<f64>, AmountParseError> {
    match parse_amount(input) {
        Ok(value) => Ok(Some(value)),
        Err(AmountParseError::Empty) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Rejected inputs of the form's amount fields, keyed by field id.
///
/// A field's message stays until that field gets a value that parses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Parse what was typed into `field`. Returns the value to store, or
    /// `None` when the input was rejected and the draft keeps its old value.
    pub fn parse_amount(&mut self, field: &str, input: &str) -> Option<Option<f64>> {
        match parse_optional_amount(input) {
            Ok(amount) => {
                self.errors.remove(field);
                Some(amount)
            }
            Err(e) => {
                self.errors.insert(field.to_string(), e.to_string());
                None
            }
        }
    }

    /// Forget a field, e.g. a removed category line
    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.errors.values().next().map(String::as_str)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow_form::fixtures::*;
    use crate::flow_form::{initial_values, CategoryLine, FormAction, TagSelection};
    use crate::model::Payee;

    const NOW: i64 = 1_700_000_000_000;

    fn two_line_draft() -> (FormContext, TransactionDraft) {
        let ctx = FormContext::create(FlowType::Expense, book(), NOW);
        let mut draft = initial_values(&ctx);
        draft.body = DraftBody::Split(vec![
            CategoryLine {
                category: Some(category(1)),
                amount: Some(20.0),
                converted_amount: None,
            },
            CategoryLine {
                category: Some(category(2)),
                amount: Some(5.5),
                converted_amount: None,
            },
        ]);
        (ctx, draft)
    }

    #[test]
    fn test_payload_replaces_selections_with_ids() {
        let (ctx, mut draft) = two_line_draft();
        draft.tags = vec![
            TagSelection::Id(4),
            TagSelection::Labeled {
                value: 9,
                label: "Weekly".to_string(),
            },
        ];
        draft.payee = Some(Payee {
            id: 12,
            name: "Market".to_string(),
            can_expense: true,
            can_income: false,
            enabled: true,
            notes: None,
            sort: None,
        });

        let submission = prepare_submission(&ctx, &draft).unwrap();
        assert_eq!(submission.target, SubmitTarget::Create);

        let json = serde_json::to_value(&submission.payload).unwrap();
        assert_eq!(json["bookId"], 7);
        assert_eq!(json["accountId"], 3);
        assert_eq!(json["payeeId"], 12);
        assert_eq!(json["tags"], serde_json::json!([4, 9]));
        assert_eq!(
            json["categories"],
            serde_json::json!([
                {"categoryId": 1, "amount": 20.0},
                {"categoryId": 2, "amount": 5.5}
            ])
        );
        for nested in ["book", "account", "to", "payee", "toId"] {
            assert!(json.get(nested).is_none(), "{} must not be sent", nested);
        }
    }

    #[test]
    fn test_update_targets_original_record() {
        let record = expense_record();
        let ctx = FormContext::for_record(FormAction::Update, record, NOW);
        let draft = initial_values(&ctx);

        let submission = prepare_submission(&ctx, &draft).unwrap();
        assert_eq!(submission.target, SubmitTarget::Update(42));
        assert_eq!(submission.payload.notes.as_deref(), Some("split with roommate"));
    }

    #[test]
    fn test_copy_and_refund_create_new_records() {
        for action in [FormAction::Copy, FormAction::Refund] {
            let ctx = FormContext::for_record(action, expense_record(), NOW);
            let draft = initial_values(&ctx);
            let submission = prepare_submission(&ctx, &draft).unwrap();
            assert_eq!(submission.target, SubmitTarget::Create);
        }
    }

    #[test]
    fn test_refund_payload_carries_negated_lines() {
        let ctx = FormContext::for_record(FormAction::Refund, expense_record(), NOW);
        let draft = initial_values(&ctx);
        let payload = to_payload(&draft).unwrap();
        let amounts: Vec<f64> = payload.categories.iter().map(|c| c.amount).collect();
        assert_eq!(amounts, vec![-100.0, 30.0]);
    }

    #[test]
    fn test_update_without_record_is_rejected() {
        let (mut ctx, draft) = two_line_draft();
        ctx.action = FormAction::Update;
        assert_eq!(prepare_submission(&ctx, &draft), Err(SubmissionError::MissingRecordId));
    }

    #[test]
    fn test_missing_line_fields_are_reported_by_line() {
        let (_, mut draft) = two_line_draft();
        draft.line_mut(1).unwrap().category = None;
        assert_eq!(to_payload(&draft), Err(SubmissionError::MissingCategory { line: 2 }));

        let (_, mut draft) = two_line_draft();
        draft.line_mut(0).unwrap().amount = None;
        assert_eq!(to_payload(&draft), Err(SubmissionError::MissingAmount { line: 1 }));
    }

    #[test]
    fn test_converted_amount_required_only_when_converting() {
        let (_, mut draft) = two_line_draft();
        draft.line_mut(0).unwrap().converted_amount = Some(3.0);
        let payload = to_payload(&draft).unwrap();
        assert_eq!(payload.categories[0].converted_amount, None);

        draft.account = Some(account(8, "USD"));
        assert_eq!(
            to_payload(&draft),
            Err(SubmissionError::MissingConvertedAmount {
                code: "CNY".to_string()
            })
        );
        draft.line_mut(1).unwrap().converted_amount = Some(0.8);
        let payload = to_payload(&draft).unwrap();
        assert_eq!(payload.categories[0].converted_amount, Some(3.0));
    }

    #[test]
    fn test_transfer_payload() {
        let ctx = FormContext::create(FlowType::Transfer, book(), NOW);
        let mut draft = initial_values(&ctx);
        assert_eq!(to_payload(&draft), Err(SubmissionError::MissingField("amount")));

        let leg = draft.transfer_mut().unwrap();
        leg.amount = Some(700.0);
        leg.converted_amount = Some(100.0);
        let json = serde_json::to_value(to_payload(&draft).unwrap()).unwrap();
        assert_eq!(json["toId"], 5);
        assert_eq!(json["amount"], 700.0);
        assert_eq!(json["convertedAmount"], 100.0);
        assert!(json.get("categories").is_none());

        draft.set_to_account(None);
        assert_eq!(
            to_payload(&draft),
            Err(SubmissionError::MissingField("transfer to account"))
        );
    }

    #[test]
    fn test_blank_notes_and_title_are_dropped() {
        let (_, mut draft) = two_line_draft();
        draft.notes = Some("   ".to_string());
        draft.title = Some(" Lunch ".to_string());
        let payload = to_payload(&draft).unwrap();
        assert_eq!(payload.notes, None);
        assert_eq!(payload.title.as_deref(), Some("Lunch"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(" -12.50 "), Ok(-12.5));
        assert_eq!(parse_amount(""), Err(AmountParseError::Empty));
        assert_eq!(parse_amount("abc"), Err(AmountParseError::NotANumber("abc".to_string())));
        assert!(parse_amount("inf").is_err());
        assert_eq!(parse_optional_amount("  "), Ok(None));
        assert_eq!(parse_optional_amount("3"), Ok(Some(3.0)));
    }

    #[test]
    fn test_valid_entry_clears_only_its_own_field_error() {
        let mut errors = FieldErrors::default();
        assert_eq!(errors.parse_amount("line-amount-0", "12x"), None);
        assert_eq!(errors.parse_amount("line-amount-1", "abc"), None);
        assert_eq!(errors.first(), Some("'12x' is not a number"));

        assert_eq!(errors.parse_amount("line-amount-0", "12"), Some(Some(12.0)));
        assert_eq!(errors.first(), Some("'abc' is not a number"));

        // clearing the input is a valid entry
        assert_eq!(errors.parse_amount("line-amount-1", ""), Some(None));
        assert!(errors.is_empty());

        errors.parse_amount("flow-converted", "?");
        errors.clear("flow-converted");
        assert!(errors.is_empty());
    }
}

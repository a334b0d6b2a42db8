//! Modal form for adding, updating, copying and refunding balance flows.
//!
//! ## Responsibilities
//! - Hold the draft and apply the user's edits to it
//! - Load selector options lazily, filtered by the draft's type and book
//! - Validate and submit through [`prepare_submission`]; failures stay in the form

use std::rc::Rc;

use shared::{
    build_tree, field_visibility, initial_values, prepare_submission, Account, Book, Category, CategoryRef, DraftEdit,
    FieldErrors, FlowType, FormContext, Payee, ReferenceQuery, Tag, TagSelection, TransactionDraft,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::tree_select::{leaves, TreeSelect};
use crate::hooks::use_notification::Notice;
use crate::hooks::use_reference_list::use_reference_list;
use crate::services::api::ApiClient;
use crate::services::time;

struct DraftState(TransactionDraft);

enum DraftMsg {
    Reset(TransactionDraft),
    Edit(DraftEdit),
}

impl Reducible for DraftState {
    type Action = DraftMsg;

    fn reduce(self: Rc<Self>, action: DraftMsg) -> Rc<Self> {
        match action {
            DraftMsg::Reset(draft) => Rc::new(DraftState(draft)),
            DraftMsg::Edit(edit) => {
                let mut draft = self.0.clone();
                draft.apply(edit);
                Rc::new(DraftState(draft))
            }
        }
    }
}

fn account_label(account: &Account) -> String {
    format!("{} ({})", account.name, account.currency_code)
}

/// Resolve a select choice back to the full item. Re-picking the current
/// value works before its list has loaded.
fn pick<T: Clone>(items: &[T], choice: Option<(i64, String)>, current: Option<&T>, id_of: fn(&T) -> i64) -> Option<T> {
    let (id, _) = choice?;
    items
        .iter()
        .find(|item| id_of(item) == id)
        .or_else(|| current.filter(|item| id_of(item) == id))
        .cloned()
}

#[derive(Properties, PartialEq)]
pub struct ActionFormProps {
    pub api_client: ApiClient,
    pub context: FormContext,
    pub notify: Callback<Notice>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

#[function_component(ActionForm)]
pub fn action_form(props: &ActionFormProps) -> Html {
    let context = use_state(|| props.context.clone());
    let draft = use_reducer(|| DraftState(initial_values(&props.context)));
    let submitting = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let input_errors = use_mut_ref(FieldErrors::default);
    let update = use_force_update();

    let current = &draft.0;
    let flow_type = current.flow_type;
    let book_id = current.book.id;
    let api = &props.api_client;

    let accounts = use_reference_list::<Account>(api, ReferenceQuery::accounts_for(flow_type));
    let to_accounts = use_reference_list::<Account>(api, ReferenceQuery::to_accounts_for(flow_type));
    let categories = use_reference_list::<Category>(api, ReferenceQuery::categories_for(book_id, flow_type));
    let tags = use_reference_list::<Tag>(api, ReferenceQuery::tags_for(book_id, flow_type));
    let payees = use_reference_list::<Payee>(api, ReferenceQuery::payees_for(book_id, flow_type));
    let books = use_reference_list::<Book>(api, ReferenceQuery::books());

    let conversion = current.conversion();
    let visibility = field_visibility(context.action, flow_type, &conversion);
    let convert_label = conversion.label().unwrap_or_else(|| "Converted amount".to_string());

    let edit = {
        let draft = draft.dispatcher();
        Callback::from(move |edit: DraftEdit| draft.dispatch(DraftMsg::Edit(edit)))
    };

    // a rejected amount keeps the draft's value and is reported until the field is fixed
    let check_amount = {
        let input_errors = input_errors.clone();
        let update = update.clone();
        Callback::from(move |(field, input): (AttrValue, String)| {
            let parsed = input_errors.borrow_mut().parse_amount(&field, &input);
            update.force_update();
            parsed
        })
    };

    let retarget = {
        let context = context.clone();
        let draft = draft.dispatcher();
        let error = error.clone();
        let input_errors = input_errors.clone();
        Callback::from(move |(flow_type, book): (FlowType, Book)| {
            let next = context.retarget(flow_type, book);
            draft.dispatch(DraftMsg::Reset(initial_values(&next)));
            context.set(next);
            error.set(None);
            *input_errors.borrow_mut() = FieldErrors::default();
        })
    };

    let on_book = {
        let retarget = retarget.clone();
        let items = books.items.clone();
        let current_book = current.book.clone();
        Callback::from(move |choice: Option<(i64, String)>| {
            if let Some(book) = pick(&items, choice, Some(&current_book), |b| b.id) {
                retarget.emit((flow_type, book));
            }
        })
    };

    let onsubmit = {
        let api_client = props.api_client.clone();
        let context = (*context).clone();
        let snapshot = current.clone();
        let submitting = submitting.clone();
        let error = error.clone();
        let input_errors = input_errors.clone();
        let notify = props.notify.clone();
        let on_saved = props.on_saved.clone();
        let on_close = props.on_close.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *submitting || !input_errors.borrow().is_empty() {
                return;
            }
            let submission = match prepare_submission(&context, &snapshot) {
                Ok(submission) => submission,
                Err(e) => {
                    error.set(Some(e.to_string()));
                    return;
                }
            };
            submitting.set(true);
            error.set(None);

            let api_client = api_client.clone();
            let submitting = submitting.clone();
            let error = error.clone();
            let notify = notify.clone();
            let on_saved = on_saved.clone();
            let on_close = on_close.clone();
            let label = context.action.label();
            spawn_local(async move {
                match api_client.submit_flow(&submission).await {
                    Ok(()) => {
                        notify.emit(Notice::success(format!("{} succeeded", label)));
                        on_saved.emit(());
                        on_close.emit(());
                    }
                    Err(e) => {
                        log::error!("Failed to save balance flow: {}", e);
                        error.set(Some(e.to_string()));
                        submitting.set(false);
                    }
                }
            });
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let type_tabs = if visibility.type_tabs {
        html! {
            <div class="type-tabs">
                { for FlowType::ENTRY_TYPES.into_iter().map(|tab| {
                    let retarget = retarget.clone();
                    let book = current.book.clone();
                    html! {
                        <button
                            type="button"
                            class={classes!("tab", (tab == flow_type).then_some("active"))}
                            onclick={Callback::from(move |_: MouseEvent| retarget.emit((tab, book.clone())))}
                        >
                            {tab.label()}
                        </button>
                    }
                })}
            </div>
        }
    } else {
        html! {}
    };

    let account_select = {
        let items = accounts.items.clone();
        let selected = current.account.clone();
        let on_change = {
            let edit = edit.clone();
            Callback::from(move |choice: Option<(i64, String)>| {
                edit.emit(DraftEdit::Account(pick(&items, choice, selected.as_ref(), |a| a.id)))
            })
        };
        html! {
            <div class="form-group">
                <label for="flow-account">{ if visibility.to_account { "From account" } else { "Account" } }</label>
                <TreeSelect
                    id="flow-account"
                    nodes={leaves(&accounts.items, |a| (a.id, account_label(a), a.enabled))}
                    selected={current.account.as_ref().map(|a| (a.id, account_label(a)))}
                    loading={accounts.loading}
                    required={visibility.account_required}
                    on_focus={accounts.load.clone()}
                    {on_change}
                />
            </div>
        }
    };

    let transfer_fields = if visibility.to_account {
        let items = to_accounts.items.clone();
        let selected = current.to_account().cloned();
        let leg = current.transfer_leg();
        let on_to = {
            let edit = edit.clone();
            Callback::from(move |choice: Option<(i64, String)>| {
                edit.emit(DraftEdit::ToAccount(pick(&items, choice, selected.as_ref(), |a| a.id)))
            })
        };
        let on_amount = edit.reform(DraftEdit::TransferAmount);
        let on_converted = edit.reform(DraftEdit::TransferConvertedAmount);
        html! {
            <>
                <div class="form-group">
                    <label for="flow-to">{"To account"}</label>
                    <TreeSelect
                        id="flow-to"
                        nodes={leaves(&to_accounts.items, |a| (a.id, account_label(a), a.enabled))}
                        selected={current.to_account().map(|a| (a.id, account_label(a)))}
                        loading={to_accounts.loading}
                        required=true
                        on_focus={to_accounts.load.clone()}
                        on_change={on_to}
                    />
                </div>
                <div class="form-group">
                    <label for="flow-amount">{"Amount"}</label>
                    <AmountInput id="flow-amount" value={leg.and_then(|l| l.amount)} on_change={on_amount} check={check_amount.clone()} />
                </div>
                { if visibility.converted_amount { html! {
                    <div class="form-group">
                        <label for="flow-converted">{convert_label.clone()}</label>
                        <AmountInput id="flow-converted" value={leg.and_then(|l| l.converted_amount)} on_change={on_converted} check={check_amount.clone()} />
                    </div>
                }} else { html! {} }}
            </>
        }
    } else {
        html! {}
    };

    let category_lines = if visibility.category_lines {
        let nodes = build_tree(&categories.items);
        let removable = current.lines().len() > 1;
        html! {
            <fieldset class="category-lines">
                <legend>{"Categories"}</legend>
                <p class="hint">{"Negative number is refund"}</p>
                { for current.lines().iter().enumerate().map(|(index, line)| {
                    let on_category = edit.reform(move |choice: Option<(i64, String)>| {
                        DraftEdit::LineCategory(index, choice.map(|(id, name)| CategoryRef { id, name }))
                    });
                    let on_amount = edit.reform(move |amount| DraftEdit::LineAmount(index, amount));
                    let on_converted = edit.reform(move |amount| DraftEdit::LineConvertedAmount(index, amount));
                    let on_remove = {
                        let edit = edit.clone();
                        let input_errors = input_errors.clone();
                        Callback::from(move |_: MouseEvent| {
                            {
                                let mut errors = input_errors.borrow_mut();
                                errors.clear(&format!("line-amount-{}", index));
                                errors.clear(&format!("line-converted-{}", index));
                            }
                            edit.emit(DraftEdit::RemoveLine(index));
                        })
                    };
                    html! {
                        <div class="category-line" key={index}>
                            <TreeSelect
                                id={format!("line-category-{}", index)}
                                nodes={nodes.clone()}
                                selected={line.category.as_ref().map(|c| (c.id, c.name.clone()))}
                                loading={categories.loading}
                                required=true
                                on_focus={categories.load.clone()}
                                on_change={on_category}
                            />
                            <AmountInput id={format!("line-amount-{}", index)} value={line.amount} on_change={on_amount} check={check_amount.clone()} />
                            { if visibility.converted_amount { html! {
                                <AmountInput
                                    id={format!("line-converted-{}", index)}
                                    value={line.converted_amount}
                                    placeholder={convert_label.clone()}
                                    on_change={on_converted}
                                    check={check_amount.clone()}
                                />
                            }} else { html! {} }}
                            <button type="button" class="line-remove" disabled={!removable} onclick={on_remove}>{"−"}</button>
                        </div>
                    }
                })}
                <button type="button" class="line-add" onclick={edit.reform(|_: MouseEvent| DraftEdit::AddLine)}>{"+ Add category"}</button>
            </fieldset>
        }
    } else {
        html! {}
    };

    let payee_select = if visibility.payee {
        let items = payees.items.clone();
        let selected = current.payee.clone();
        let on_change = {
            let edit = edit.clone();
            Callback::from(move |choice: Option<(i64, String)>| {
                edit.emit(DraftEdit::Payee(pick(&items, choice, selected.as_ref(), |p| p.id)))
            })
        };
        html! {
            <div class="form-group">
                <label for="flow-payee">{"Payee"}</label>
                <TreeSelect
                    id="flow-payee"
                    nodes={leaves(&payees.items, |p| (p.id, p.name.clone(), p.enabled))}
                    selected={current.payee.as_ref().map(|p| (p.id, p.name.clone()))}
                    loading={payees.loading}
                    placeholder="No payee"
                    on_focus={payees.load.clone()}
                    {on_change}
                />
            </div>
        }
    } else {
        html! {}
    };

    let tag_picker = {
        let on_pick = {
            // clearing the picker is not an edit
            let edit = edit.clone();
            Callback::from(move |choice: Option<(i64, String)>| {
                if let Some((value, label)) = choice {
                    edit.emit(DraftEdit::ToggleTag(TagSelection::Labeled { value, label }));
                }
            })
        };
        html! {
            <div class="form-group">
                <label for="flow-tags">{"Tags"}</label>
                <div class="tag-chips">
                    { for current.tags.iter().map(|tag| {
                        let id = tag.id();
                        let label = match tag {
                            TagSelection::Labeled { label, .. } => label.clone(),
                            TagSelection::Id(_) => tags
                                .items
                                .iter()
                                .find(|t| t.id == id)
                                .map(|t| t.name.clone())
                                .unwrap_or_else(|| format!("#{}", id)),
                        };
                        let on_remove = edit.reform(move |_: MouseEvent| DraftEdit::ToggleTag(TagSelection::Id(id)));
                        html! {
                            <span class="chip" key={id}>{label}<button type="button" onclick={on_remove}>{"×"}</button></span>
                        }
                    })}
                </div>
                <TreeSelect
                    id="flow-tags"
                    nodes={build_tree(&tags.items)}
                    loading={tags.loading}
                    placeholder="Add tag"
                    on_focus={tags.load.clone()}
                    on_change={on_pick}
                />
            </div>
        }
    };

    let checkbox = |id: &'static str, label: &'static str, checked: bool, disabled: bool, to_edit: fn(bool) -> DraftEdit| {
        let onchange = {
            let edit = edit.clone();
            Callback::from(move |e: Event| edit.emit(to_edit(e.target_unchecked_into::<HtmlInputElement>().checked())))
        };
        html! {
            <label class="checkbox" for={id}>
                <input type="checkbox" {id} {checked} {disabled} {onchange} />
                {label}
            </label>
        }
    };

    let on_title = {
        let edit = edit.clone();
        Callback::from(move |e: Event| edit.emit(DraftEdit::Title(e.target_unchecked_into::<HtmlInputElement>().value())))
    };
    let on_time = {
        let edit = edit.clone();
        Callback::from(move |e: Event| {
            if let Some(millis) = time::from_input_value(&e.target_unchecked_into::<HtmlInputElement>().value()) {
                edit.emit(DraftEdit::CreateTime(millis));
            }
        })
    };
    let on_notes = {
        let edit = edit.clone();
        Callback::from(move |e: Event| edit.emit(DraftEdit::Notes(e.target_unchecked_into::<HtmlTextAreaElement>().value())))
    };

    let adjust = flow_type == FlowType::Adjust;
    let banner = (*error)
        .clone()
        .or_else(|| input_errors.borrow().first().map(str::to_string));

    html! {
        <div class="modal-backdrop">
            <div class="modal action-form">
                <header class="modal-header">
                    <h2>{context.action.title(flow_type)}</h2>
                    <button type="button" class="modal-close" onclick={on_cancel.clone()}>{"×"}</button>
                </header>

                {if let Some(message) = banner {
                    html! { <div class="form-message error">{message}</div> }
                } else { html! {} }}

                {type_tabs}

                { if adjust {
                    html! { <p class="form-message info">{"Balance adjustments are edited from the account screen."}</p> }
                } else { html! {
                    <form {onsubmit}>
                        <div class="form-group">
                            <label for="flow-book">{"Book"}</label>
                            <TreeSelect
                                id="flow-book"
                                nodes={leaves(&books.items, |b| (b.id, b.name.clone(), true))}
                                selected={Some((current.book.id, current.book.name.clone()))}
                                loading={books.loading}
                                disabled={!visibility.book_editable}
                                on_focus={books.load.clone()}
                                on_change={on_book}
                            />
                        </div>
                        <div class="form-group">
                            <label for="flow-title">{"Title"}</label>
                            <input id="flow-title" type="text" value={current.title.clone().unwrap_or_default()} onchange={on_title} />
                        </div>
                        <div class="form-group">
                            <label for="flow-time">{"Time"}</label>
                            <input id="flow-time" type="datetime-local" required=true
                                value={time::to_input_value(current.create_time)} onchange={on_time} />
                        </div>
                        {account_select}
                        {transfer_fields}
                        {category_lines}
                        {payee_select}
                        {tag_picker}
                        <div class="form-group switches">
                            {checkbox("flow-confirm", "Confirm", current.confirm, !visibility.confirm_editable, DraftEdit::Confirm)}
                            {checkbox("flow-include", "Include in statistics", current.include, false, DraftEdit::Include)}
                            { if current.confirm {
                                checkbox("flow-update-balance", "Update account balance", current.update_balance, false, DraftEdit::UpdateBalance)
                            } else { html! {} }}
                        </div>
                        <div class="form-group">
                            <label for="flow-notes">{"Notes"}</label>
                            <textarea id="flow-notes" value={current.notes.clone().unwrap_or_default()} onchange={on_notes} />
                        </div>
                        <footer class="modal-footer">
                            <button type="button" onclick={on_cancel}>{"Cancel"}</button>
                            <button type="submit" class="primary" disabled={*submitting}>
                                { if *submitting { "Saving..." } else { "Submit" } }
                            </button>
                        </footer>
                    </form>
                }}}
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
struct AmountInputProps {
    id: AttrValue,
    value: Option<f64>,
    #[prop_or(AttrValue::from("Amount"))]
    placeholder: AttrValue,
    on_change: Callback<Option<f64>>,
    /// Parses the input for this field; `None` when it was rejected
    check: Callback<(AttrValue, String), Option<Option<f64>>>,
}

/// Text input for a signed amount; bad input is reported, not applied
#[function_component(AmountInput)]
fn amount_input(props: &AmountInputProps) -> Html {
    let onchange = {
        let id = props.id.clone();
        let on_change = props.on_change.clone();
        let check = props.check.clone();
        Callback::from(move |e: Event| {
            let input = e.target_unchecked_into::<HtmlInputElement>().value();
            if let Some(amount) = check.emit((id.clone(), input)) {
                on_change.emit(amount);
            }
        })
    };

    html! {
        <input
            id={props.id.clone()}
            class="amount-input"
            type="text"
            inputmode="decimal"
            placeholder={props.placeholder.clone()}
            value={props.value.map(|v| v.to_string()).unwrap_or_default()}
            {onchange}
        />
    }
}

use shared::{delete_prompt, row_actions, BalanceFlow, Book, FlowSortColumn, FlowType, FormAction, FormContext};
use yew::prelude::*;

use super::action_form::ActionForm;
use super::search_form::FlowSearchForm;
use super::statistics_bar::StatisticsBar;
use crate::components::table::{Pagination, SortHeader};
use crate::hooks::use_balance_flows::use_balance_flows;
use crate::hooks::use_notification::Notice;
use crate::services::api::ApiClient;
use crate::services::time;

#[derive(Properties, PartialEq)]
pub struct FlowTableProps {
    pub api_client: ApiClient,
    pub book: Option<Book>,
    pub page_size: u32,
    pub notify: Callback<Notice>,
}

fn categories_cell(record: &BalanceFlow) -> String {
    if let Some(name) = record.category_name.as_ref() {
        return name.clone();
    }
    record
        .categories
        .iter()
        .map(|relation| relation.category.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn amount_cell(amount: Option<f64>) -> String {
    amount.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

#[function_component(FlowTable)]
pub fn flow_table(props: &FlowTableProps) -> Html {
    let flows = use_balance_flows(
        &props.api_client,
        props.book.as_ref().map(|b| b.id),
        props.page_size,
        props.notify.clone(),
    );
    let open_form = use_state(|| Option::<FormContext>::None);
    let expanded = use_state(|| Option::<i64>::None);

    let state = &flows.state;
    let actions = &flows.actions;

    let open = {
        let open_form = open_form.clone();
        Callback::from(move |ctx: FormContext| open_form.set(Some(ctx)))
    };

    let on_add = {
        let open = open.clone();
        let book = props.book.clone();
        Callback::from(move |_: MouseEvent| {
            if let Some(book) = book.clone() {
                open.emit(FormContext::create(FlowType::Expense, book, time::now_millis()));
            }
        })
    };

    let on_close = {
        let open_form = open_form.clone();
        Callback::from(move |_: ()| open_form.set(None))
    };

    let row = |record: &BalanceFlow| {
        let id = record.id;
        let allowed = row_actions(record);
        let for_action = |action: FormAction| {
            let open = open.clone();
            let record = record.clone();
            Callback::from(move |_: MouseEvent| {
                open.emit(FormContext::for_record(action, record.clone(), time::now_millis()));
            })
        };
        let on_confirm = actions.confirm.reform(move |_: MouseEvent| id);
        let on_delete = {
            let remove = actions.remove.clone();
            let prompt = delete_prompt(record);
            Callback::from(move |_: MouseEvent| {
                if gloo::dialogs::confirm(prompt) {
                    remove.emit(id);
                }
            })
        };
        let is_expanded = *expanded == Some(id);
        let on_expand = {
            let expanded = expanded.clone();
            Callback::from(move |_: MouseEvent| expanded.set(if is_expanded { None } else { Some(id) }))
        };

        html! {
            <>
                <tr class={classes!(record.confirm.then_some("confirmed"))}>
                    <td><button class="expand" onclick={on_expand}>{ if is_expanded { "−" } else { "+" } }</button></td>
                    <td>{time::format_millis(record.create_time)}</td>
                    <td>{record.type_name.clone().unwrap_or_else(|| record.flow_type.label().to_string())}</td>
                    <td>{record.title.clone().unwrap_or_default()}</td>
                    <td>{record.account_name.clone().or_else(|| record.account.as_ref().map(|a| a.name.clone())).unwrap_or_default()}</td>
                    <td class="amount">{amount_cell(record.amount)}</td>
                    <td>{categories_cell(record)}</td>
                    <td>{record.tags.iter().map(|t| t.tag.name.as_str()).collect::<Vec<_>>().join(", ")}</td>
                    <td>{record.payee.as_ref().map(|p| p.name.clone()).unwrap_or_default()}</td>
                    <td>{ if record.confirm { "✓" } else { "" } }</td>
                    <td>{ if record.include { "✓" } else { "" } }</td>
                    <td class="row-actions">
                        <button disabled={!allowed.copy} onclick={for_action(FormAction::Copy)}>{"Copy"}</button>
                        <button disabled={!allowed.update} onclick={for_action(FormAction::Update)}>{"Update"}</button>
                        <button disabled={!allowed.refund} onclick={for_action(FormAction::Refund)}>{"Refund"}</button>
                        <button disabled={!allowed.confirm} onclick={on_confirm}>{"Confirm"}</button>
                        <button class="danger" onclick={on_delete}>{"Delete"}</button>
                    </td>
                </tr>
                { if is_expanded { html! {
                    <tr class="expanded-row">
                        <td colspan="12">
                            { if record.need_convert { html! {
                                <p>{format!(
                                    "Convert {}: {}",
                                    record.convert_code.clone().unwrap_or_default(),
                                    amount_cell(record.converted_amount)
                                )}</p>
                            }} else { html! {} }}
                            <p>{record.notes.clone().unwrap_or_default()}</p>
                        </td>
                    </tr>
                }} else { html! {} }}
            </>
        }
    };

    let sort_header = |label: &'static str, column: FlowSortColumn| {
        html! {
            <SortHeader
                {label}
                field={column.field()}
                sort={state.sort.clone()}
                on_sort={actions.sort_by.clone()}
            />
        }
    };

    html! {
        <section class="flow-table">
            <FlowSearchForm
                api_client={props.api_client.clone()}
                filter={state.filter.clone()}
                on_search={actions.search.clone()}
            />
            <div class="table-toolbar">
                <StatisticsBar statistics={state.statistics} loading={state.loading} />
                <button class="primary" disabled={props.book.is_none()} onclick={on_add}>{"Add"}</button>
            </div>

            {if let Some(message) = state.error.as_ref() {
                html! { <div class="form-message error">{message.clone()}</div> }
            } else { html! {} }}

            <table class={classes!("data-table", state.loading.then_some("loading"))}>
                <thead>
                    <tr>
                        <th></th>
                        {sort_header("Time", FlowSortColumn::CreateTime)}
                        {sort_header("Type", FlowSortColumn::Type)}
                        {sort_header("Title", FlowSortColumn::Title)}
                        {sort_header("Account", FlowSortColumn::Account)}
                        {sort_header("Amount", FlowSortColumn::Amount)}
                        <th>{"Categories"}</th>
                        <th>{"Tags"}</th>
                        {sort_header("Payee", FlowSortColumn::Payee)}
                        {sort_header("Confirmed", FlowSortColumn::Confirm)}
                        {sort_header("Included", FlowSortColumn::Include)}
                        <th>{"Actions"}</th>
                    </tr>
                </thead>
                <tbody>
                    { if state.page.data.is_empty() && !state.loading {
                        html! { <tr><td colspan="12" class="empty">{"No records"}</td></tr> }
                    } else {
                        html! { for state.page.data.iter().map(row) }
                    }}
                </tbody>
            </table>

            <Pagination
                current={state.paging.current}
                page_count={state.page.page_count(state.paging.page_size)}
                total={state.page.total}
                on_change={actions.go_to_page.clone()}
            />

            { if let Some(ctx) = (*open_form).clone() { html! {
                <ActionForm
                    api_client={props.api_client.clone()}
                    context={ctx}
                    notify={props.notify.clone()}
                    on_close={on_close}
                    on_saved={actions.reload.clone()}
                />
            }} else { html! {} }}
        </section>
    }
}

use shared::{Payee, Resource};
use yew::prelude::*;

use super::payee_form::PayeeFormModal;
use crate::components::spawn_mutation;
use crate::components::table::{Pagination, SortHeader};
use crate::hooks::use_notification::Notice;
use crate::hooks::use_paged_list::use_paged_list;
use crate::services::api::{ApiClient, Toggle};

#[derive(Properties, PartialEq)]
pub struct PayeeTableProps {
    pub api_client: ApiClient,
    pub book_id: i64,
    pub page_size: u32,
    pub notify: Callback<Notice>,
}

/// What the payee modal is open for
#[derive(Clone, PartialEq)]
enum Editing {
    New,
    Existing(Payee),
}

#[function_component(PayeeTable)]
pub fn payee_table(props: &PayeeTableProps) -> Html {
    let payees = use_paged_list::<Payee>(
        &props.api_client,
        Resource::Payees,
        vec![("bookId".to_string(), props.book_id.to_string())],
        props.page_size,
    );
    let editing = use_state(|| Option::<Editing>::None);

    let state = &payees.state;
    let actions = &payees.actions;

    let toggle = |id: i64, field: Toggle| {
        let api_client = props.api_client.clone();
        let notify = props.notify.clone();
        let reload = actions.reload.clone();
        Callback::from(move |_: Event| {
            let api_client = api_client.clone();
            spawn_mutation(
                async move { api_client.toggle(Resource::Payees, id, field).await },
                "Updated",
                notify.clone(),
                reload.clone(),
            );
        })
    };

    let row = |payee: &Payee| {
        let id = payee.id;
        let on_update = {
            let editing = editing.clone();
            let payee = payee.clone();
            Callback::from(move |_: MouseEvent| editing.set(Some(Editing::Existing(payee.clone()))))
        };
        let on_delete = {
            let api_client = props.api_client.clone();
            let notify = props.notify.clone();
            let reload = actions.reload.clone();
            let name = payee.name.clone();
            Callback::from(move |_: MouseEvent| {
                if !gloo::dialogs::confirm(&format!("Delete payee \"{}\"?", name)) {
                    return;
                }
                let api_client = api_client.clone();
                spawn_mutation(
                    async move { api_client.remove(Resource::Payees, id).await },
                    "Deleted",
                    notify.clone(),
                    reload.clone(),
                );
            })
        };

        html! {
            <tr key={id}>
                <td>{payee.name.clone()}</td>
                <td><input type="checkbox" checked={payee.can_expense} onchange={toggle(id, Toggle::CanExpense)} /></td>
                <td><input type="checkbox" checked={payee.can_income} onchange={toggle(id, Toggle::CanIncome)} /></td>
                <td><input type="checkbox" checked={payee.enabled} onchange={toggle(id, Toggle::Enable)} /></td>
                <td>{payee.notes.clone().unwrap_or_default()}</td>
                <td class="row-actions">
                    <button onclick={on_update}>{"Update"}</button>
                    <button class="danger" onclick={on_delete}>{"Delete"}</button>
                </td>
            </tr>
        }
    };

    let on_add = {
        let editing = editing.clone();
        Callback::from(move |_: MouseEvent| editing.set(Some(Editing::New)))
    };
    let on_close = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    html! {
        <section class="payee-table">
            <div class="table-toolbar">
                <button class="primary" onclick={on_add}>{"Add"}</button>
            </div>
            <table class={classes!("data-table", state.loading.then_some("loading"))}>
                <thead>
                    <tr>
                        <SortHeader label="Name" field="name" sort={state.sort.clone()} on_sort={actions.sort_by.clone()} />
                        <th>{"Expense"}</th>
                        <th>{"Income"}</th>
                        <th>{"Enabled"}</th>
                        <th>{"Notes"}</th>
                        <th>{"Actions"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for state.page.data.iter().map(row) }
                </tbody>
            </table>
            <Pagination
                current={state.paging.current}
                page_count={state.page.page_count(state.paging.page_size)}
                total={state.page.total}
                on_change={actions.go_to_page.clone()}
            />

            { if let Some(target) = (*editing).clone() { html! {
                <PayeeFormModal
                    api_client={props.api_client.clone()}
                    book_id={props.book_id}
                    payee={match target { Editing::Existing(payee) => Some(payee), Editing::New => None }}
                    notify={props.notify.clone()}
                    {on_close}
                    on_saved={actions.reload.clone()}
                />
            }} else { html! {} }}
        </section>
    }
}

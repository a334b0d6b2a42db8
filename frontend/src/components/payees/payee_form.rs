use shared::{Payee, PayeeForm, Resource};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::spawn_mutation;
use crate::hooks::use_notification::Notice;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct PayeeFormModalProps {
    pub api_client: ApiClient,
    pub book_id: i64,
    /// Payee being updated; a new one is added when unset
    #[prop_or_default]
    pub payee: Option<Payee>,
    pub notify: Callback<Notice>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

#[function_component(PayeeFormModal)]
pub fn payee_form_modal(props: &PayeeFormModalProps) -> Html {
    let form = use_state(|| match &props.payee {
        Some(payee) => PayeeForm {
            name: payee.name.clone(),
            notes: payee.notes.clone(),
            can_expense: payee.can_expense,
            can_income: payee.can_income,
            book_id: props.book_id,
        },
        None => PayeeForm {
            name: String::new(),
            notes: None,
            can_expense: true,
            can_income: true,
            book_id: props.book_id,
        },
    });
    let error = use_state(|| Option::<String>::None);

    let update = |apply: fn(&mut PayeeForm, &Event)| {
        let form = form.clone();
        Callback::from(move |e: Event| {
            let mut next = (*form).clone();
            apply(&mut next, &e);
            form.set(next);
        })
    };

    let onsubmit = {
        let api_client = props.api_client.clone();
        let payee_id = props.payee.as_ref().map(|p| p.id);
        let form = form.clone();
        let error = error.clone();
        let notify = props.notify.clone();
        let on_done = {
            let on_saved = props.on_saved.clone();
            let on_close = props.on_close.clone();
            Callback::from(move |_: ()| {
                on_saved.emit(());
                on_close.emit(());
            })
        };

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let mut body = (*form).clone();
            body.name = body.name.trim().to_string();
            body.notes = body.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
            if body.name.is_empty() {
                error.set(Some("Name is required".to_string()));
                return;
            }
            let api_client = api_client.clone();
            match payee_id {
                Some(id) => spawn_mutation(
                    async move { api_client.update(Resource::Payees, id, &body).await },
                    "Payee updated",
                    notify.clone(),
                    on_done.clone(),
                ),
                None => spawn_mutation(
                    async move { api_client.create(Resource::Payees, &body).await },
                    "Payee added",
                    notify.clone(),
                    on_done.clone(),
                ),
            }
        })
    };

    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <header class="modal-header">
                    <h2>{ if props.payee.is_some() { "Update payee" } else { "Add payee" } }</h2>
                </header>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message.clone()}</div> }
                } else { html! {} }}
                <form {onsubmit}>
                    <div class="form-group">
                        <label for="payee-name">{"Name"}</label>
                        <input id="payee-name" type="text" required=true value={form.name.clone()}
                            onchange={update(|f, e| f.name = e.target_unchecked_into::<HtmlInputElement>().value())} />
                    </div>
                    <label class="checkbox">
                        <input type="checkbox" checked={form.can_expense}
                            onchange={update(|f, e| f.can_expense = e.target_unchecked_into::<HtmlInputElement>().checked())} />
                        {"Can expense"}
                    </label>
                    <label class="checkbox">
                        <input type="checkbox" checked={form.can_income}
                            onchange={update(|f, e| f.can_income = e.target_unchecked_into::<HtmlInputElement>().checked())} />
                        {"Can income"}
                    </label>
                    <div class="form-group">
                        <label for="payee-notes">{"Notes"}</label>
                        <textarea id="payee-notes" value={form.notes.clone().unwrap_or_default()}
                            onchange={update(|f, e| f.notes = Some(e.target_unchecked_into::<HtmlTextAreaElement>().value()))} />
                    </div>
                    <footer class="modal-footer">
                        <button type="button" onclick={on_cancel}>{"Cancel"}</button>
                        <button type="submit" class="primary">{"Submit"}</button>
                    </footer>
                </form>
            </div>
        </div>
    }
}

use shared::{Category, CategoryForm, FlowType, Resource};
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;

use crate::components::spawn_mutation;
use crate::hooks::use_notification::Notice;
use crate::services::api::ApiClient;

/// What the category form edits
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryTarget {
    /// New category, under `parent` when set
    New { parent: Option<Category> },
    Existing(Category),
}

#[derive(Properties, PartialEq)]
pub struct CategoryFormModalProps {
    pub api_client: ApiClient,
    pub book_id: i64,
    pub category_type: FlowType,
    pub target: CategoryTarget,
    pub notify: Callback<Notice>,
    pub on_close: Callback<()>,
    pub on_saved: Callback<()>,
}

#[function_component(CategoryFormModal)]
pub fn category_form_modal(props: &CategoryFormModalProps) -> Html {
    let (initial_name, initial_notes) = match &props.target {
        CategoryTarget::Existing(category) => (category.name.clone(), category.notes.clone().unwrap_or_default()),
        CategoryTarget::New { .. } => (String::new(), String::new()),
    };
    let name = use_state(|| initial_name);
    let notes = use_state(|| initial_notes);
    let error = use_state(|| Option::<String>::None);

    let title = match &props.target {
        CategoryTarget::New { parent: Some(parent) } => format!("Add category under {}", parent.name),
        CategoryTarget::New { parent: None } => "Add category".to_string(),
        CategoryTarget::Existing(category) => format!("Update {}", category.name),
    };

    let onsubmit = {
        let api_client = props.api_client.clone();
        let target = props.target.clone();
        let book_id = props.book_id;
        let category_type = props.category_type;
        let name = name.clone();
        let notes = notes.clone();
        let error = error.clone();
        let notify = props.notify.clone();
        let on_close = props.on_close.clone();
        let on_saved = props.on_saved.clone();

        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let trimmed = name.trim().to_string();
            if trimmed.is_empty() {
                error.set(Some("Name is required".to_string()));
                return;
            }
            let body = CategoryForm {
                name: trimmed,
                notes: Some(notes.trim().to_string()).filter(|n| !n.is_empty()),
                pid: match &target {
                    CategoryTarget::New { parent } => parent.as_ref().map(|p| p.id),
                    CategoryTarget::Existing(category) => category.parent_id,
                },
                category_type,
                book_id,
            };
            let api_client = api_client.clone();
            let on_done = {
                let on_saved = on_saved.clone();
                let on_close = on_close.clone();
                Callback::from(move |_: ()| {
                    on_saved.emit(());
                    on_close.emit(());
                })
            };
            match &target {
                CategoryTarget::New { .. } => spawn_mutation(
                    async move { api_client.create(Resource::Categories, &body).await },
                    "Category added",
                    notify.clone(),
                    on_done,
                ),
                CategoryTarget::Existing(category) => {
                    let id = category.id;
                    spawn_mutation(
                        async move { api_client.update(Resource::Categories, id, &body).await },
                        "Category updated",
                        notify.clone(),
                        on_done,
                    )
                }
            }
        })
    };

    let on_name = {
        let name = name.clone();
        Callback::from(move |e: InputEvent| name.set(e.target_unchecked_into::<HtmlInputElement>().value()))
    };
    let on_notes = {
        let notes = notes.clone();
        Callback::from(move |e: InputEvent| notes.set(e.target_unchecked_into::<HtmlTextAreaElement>().value()))
    };
    let on_cancel = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    html! {
        <div class="modal-backdrop">
            <div class="modal">
                <header class="modal-header"><h2>{title}</h2></header>
                {if let Some(message) = error.as_ref() {
                    html! { <div class="form-message error">{message.clone()}</div> }
                } else { html! {} }}
                <form {onsubmit}>
                    <div class="form-group">
                        <label for="category-name">{"Name"}</label>
                        <input id="category-name" type="text" required=true value={(*name).clone()} oninput={on_name} />
                    </div>
                    <div class="form-group">
                        <label for="category-notes">{"Notes"}</label>
                        <textarea id="category-notes" value={(*notes).clone()} oninput={on_notes} />
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

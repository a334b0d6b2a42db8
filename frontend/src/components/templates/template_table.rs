use shared::{BookTemplate, CopyTemplateRequest, ReferenceQuery, Resource};
use yew::prelude::*;

use crate::components::spawn_mutation;
use crate::hooks::use_notification::Notice;
use crate::hooks::use_reference_list::use_reference_list;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct TemplateTableProps {
    pub api_client: ApiClient,
    pub notify: Callback<Notice>,
    /// Called after a book was created from a template
    pub on_book_created: Callback<()>,
}

#[function_component(TemplateTable)]
pub fn template_table(props: &TemplateTableProps) -> Html {
    let templates = use_reference_list::<BookTemplate>(&props.api_client, ReferenceQuery::new(Resource::BookTemplates));

    {
        let load = templates.load.clone();
        use_effect_with(load, |load| {
            load.emit(());
            || ()
        });
    }

    let row = |template: &BookTemplate| {
        let on_copy = {
            let api_client = props.api_client.clone();
            let notify = props.notify.clone();
            let on_book_created = props.on_book_created.clone();
            let template_id = template.id;
            let default_name = template.name.clone();
            Callback::from(move |_: MouseEvent| {
                let Some(book_name) = gloo::dialogs::prompt("Name of the new book", Some(default_name.as_str())) else {
                    return;
                };
                let book_name = book_name.trim().to_string();
                if book_name.is_empty() {
                    notify.emit(Notice::error("Book name is required"));
                    return;
                }
                let api_client = api_client.clone();
                let request = CopyTemplateRequest { template_id, book_name };
                spawn_mutation(
                    async move { api_client.copy_template(&request).await },
                    "Book created",
                    notify.clone(),
                    on_book_created.clone(),
                );
            })
        };

        html! {
            <tr key={template.id}>
                <td>{template.name.clone()}</td>
                <td>
                    { match template.preview_url.as_ref() {
                        Some(url) => html! { <a href={url.clone()} target="_blank" rel="noopener">{"Preview"}</a> },
                        None => html! {},
                    }}
                </td>
                <td>{template.notes.clone().unwrap_or_default()}</td>
                <td class="row-actions"><button onclick={on_copy}>{"Copy"}</button></td>
            </tr>
        }
    };

    html! {
        <section class="template-table">
            <table class={classes!("data-table", templates.loading.then_some("loading"))}>
                <thead>
                    <tr>
                        <th>{"Name"}</th>
                        <th>{"Preview"}</th>
                        <th>{"Notes"}</th>
                        <th>{"Actions"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for templates.items.iter().map(row) }
                </tbody>
            </table>
        </section>
    }
}

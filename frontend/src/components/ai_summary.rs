use shared::{summary_lines, Book, ReferenceQuery};
use yew::prelude::*;

use crate::components::tree_select::{leaves, TreeSelect};
use crate::hooks::use_ai_summary::use_ai_summary;
use crate::hooks::use_notification::Notice;
use crate::hooks::use_reference_list::use_reference_list;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct AiSummaryViewProps {
    pub api_client: ApiClient,
    pub timeout_ms: u32,
    pub notify: Callback<Notice>,
}

#[function_component(AiSummaryView)]
pub fn ai_summary_view(props: &AiSummaryViewProps) -> Html {
    let books = use_reference_list::<Book>(&props.api_client, ReferenceQuery::books());
    let selected = use_state(|| Option::<(i64, String)>::None);
    let summary = use_ai_summary(&props.api_client, props.timeout_ms, props.notify.clone());

    let on_book = {
        let selected = selected.clone();
        Callback::from(move |choice: Option<(i64, String)>| selected.set(choice))
    };

    let on_generate = {
        let generate = summary.generate.clone();
        let book_id = selected.as_ref().map(|(id, _)| *id);
        Callback::from(move |_: MouseEvent| {
            if let Some(book_id) = book_id {
                generate.emit(book_id);
            }
        })
    };

    let body = match (&summary.state.text, summary.state.loading) {
        (_, true) => html! { <p class="summary-loading">{"Analysing..."}</p> },
        (Some(text), false) => html! {
            <div class="summary-text">
                { for summary_lines(text).into_iter().map(|line| {
                    let class = classes!("summary-line", line.alert.map(|level| level.css_class()));
                    html! { <p {class}>{line.text}</p> }
                })}
            </div>
        },
        (None, false) => html! {
            <p class="summary-empty">{"Pick a book and start the analysis to get a summary of its finances."}</p>
        },
    };

    html! {
        <section class="ai-summary">
            <div class="table-toolbar">
                <TreeSelect
                    id="summary-book"
                    nodes={leaves(&books.items, |b| (b.id, b.name.clone(), true))}
                    selected={(*selected).clone()}
                    loading={books.loading}
                    placeholder="Select a book"
                    on_focus={books.load.clone()}
                    on_change={on_book}
                />
                <button
                    class="primary"
                    disabled={selected.is_none() || summary.state.loading}
                    onclick={on_generate}
                >
                    {"Analyse"}
                </button>
            </div>
            {body}
        </section>
    }
}

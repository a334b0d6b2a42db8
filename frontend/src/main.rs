use shared::{Book, ReferenceQuery};
use yew::prelude::*;

mod components;
mod hooks;
mod services;

use components::ai_summary::AiSummaryView;
use components::categories::CategoryTable;
use components::flows::FlowTable;
use components::notification::NotificationBar;
use components::payees::PayeeTable;
use components::templates::TemplateTable;
use components::tree_select::{leaves, TreeSelect};
use hooks::use_notification::use_notification;
use hooks::use_reference_list::use_reference_list;
use services::api::ApiClient;
use services::config::AppConfig;
use services::logging::ConsoleLogger;

const NOTICE_DURATION_MS: u32 = 3_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Flows,
    Categories,
    Payees,
    Templates,
    AiSummary,
}

impl Tab {
    const ALL: [Tab; 5] = [Tab::Flows, Tab::Categories, Tab::Payees, Tab::Templates, Tab::AiSummary];

    fn label(&self) -> &'static str {
        match self {
            Tab::Flows => "Balance Flows",
            Tab::Categories => "Categories",
            Tab::Payees => "Payees",
            Tab::Templates => "Book Templates",
            Tab::AiSummary => "AI Summary",
        }
    }
}

#[derive(Properties, PartialEq)]
struct AppProps {
    config: AppConfig,
}

#[function_component(App)]
fn app(props: &AppProps) -> Html {
    let config = &props.config;
    let api_client = use_memo(config.clone(), ApiClient::from_config);
    let api_client = (*api_client).clone();

    let notification = use_notification(NOTICE_DURATION_MS);
    let notify = notification.notify.clone();
    let tab = use_state(|| Tab::Flows);
    let books = use_reference_list::<Book>(&api_client, ReferenceQuery::books());
    let current_book = use_state(|| Option::<Book>::None);

    // Books drive every screen, so load them up front
    {
        let load = books.load.clone();
        use_effect_with((), move |_| {
            load.emit(());
            || ()
        });
    }

    // Default to the first book once the list arrives
    {
        let current_book = current_book.clone();
        use_effect_with(books.items.clone(), move |items| {
            let still_listed = current_book
                .as_ref()
                .is_some_and(|book| items.iter().any(|b| b.id == book.id));
            if !still_listed {
                current_book.set(items.first().cloned());
            }
            || ()
        });
    }

    let on_book = {
        let current_book = current_book.clone();
        let items = books.items.clone();
        Callback::from(move |choice: Option<(i64, String)>| {
            let book = choice.and_then(|(id, _)| items.iter().find(|b| b.id == id).cloned());
            if book.is_some() {
                current_book.set(book);
            }
        })
    };

    let content = match (*tab, (*current_book).clone()) {
        (Tab::Flows, book) => html! {
            <FlowTable
                api_client={api_client.clone()}
                book={book}
                page_size={config.page_size}
                notify={notify.clone()}
            />
        },
        (Tab::Categories, Some(book)) => html! {
            <CategoryTable key={book.id} api_client={api_client.clone()} book_id={book.id} notify={notify.clone()} />
        },
        (Tab::Payees, Some(book)) => html! {
            <PayeeTable
                key={book.id}
                api_client={api_client.clone()}
                book_id={book.id}
                page_size={config.page_size}
                notify={notify.clone()}
            />
        },
        (Tab::Categories | Tab::Payees, None) => html! {
            <p class="empty">{"Create a book first, e.g. from a template."}</p>
        },
        (Tab::Templates, _) => html! {
            <TemplateTable api_client={api_client.clone()} notify={notify.clone()} on_book_created={books.reload.clone()} />
        },
        (Tab::AiSummary, _) => html! {
            <AiSummaryView api_client={api_client.clone()} timeout_ms={config.ai_summary_timeout_ms} notify={notify.clone()} />
        },
    };

    html! {
        <div class="app">
            <NotificationBar notice={notification.current.clone()} on_dismiss={notification.dismiss.clone()} />
            <header class="app-header">
                <h1>{"MoneyWhere Admin"}</h1>
                <TreeSelect
                    id="current-book"
                    nodes={leaves(&books.items, |b| (b.id, b.name.clone(), true))}
                    selected={current_book.as_ref().map(|b| (b.id, b.name.clone()))}
                    loading={books.loading}
                    placeholder="No book"
                    on_focus={books.load.clone()}
                    on_change={on_book}
                />
            </header>
            <nav class="tabs">
                { for Tab::ALL.into_iter().map(|item| {
                    let tab = tab.clone();
                    let active = *tab == item;
                    html! {
                        <button
                            class={classes!("tab", active.then_some("active"))}
                            onclick={Callback::from(move |_: MouseEvent| tab.set(item))}
                        >
                            {item.label()}
                        </button>
                    }
                })}
            </nav>
            <main>{content}</main>
        </div>
    }
}

fn main() {
    let config = AppConfig::load();
    if let Err(e) = ConsoleLogger::init(config.level_filter()) {
        gloo::console::error!(format!("Logger already installed: {}", e));
    }
    log::info!("Starting admin frontend against {}", config.api_base_url);
    yew::Renderer::<App>::with_props(AppProps { config }).render();
}

use chrono::NaiveDate;
use shared::{build_tree, toggle_id, Account, Category, FlowFilter, FlowType, Payee, ReferenceQuery, Resource, Tag};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::tree_select::{leaves, TreeSelect};
use crate::hooks::use_reference_list::use_reference_list;
use crate::services::api::ApiClient;

#[derive(Properties, PartialEq)]
pub struct FlowSearchFormProps {
    pub api_client: ApiClient,
    pub filter: FlowFilter,
    pub on_search: Callback<FlowFilter>,
}

/// Chips for the picked ids of a multi-select filter, labelled from the
/// loaded options when possible
fn id_chips<T>(ids: &[i64], items: &[T], describe: fn(&T) -> (i64, String), on_toggle: &Callback<i64>) -> Html {
    html! {
        <span class="tag-chips">
            { for ids.iter().map(|&id| {
                let label = items
                    .iter()
                    .map(describe)
                    .find(|(item_id, _)| *item_id == id)
                    .map(|(_, label)| label)
                    .unwrap_or_else(|| format!("#{}", id));
                let on_remove = on_toggle.reform(move |_: MouseEvent| id);
                html! {
                    <span class="chip" key={id}>{label}<button type="button" onclick={on_remove}>{"×"}</button></span>
                }
            })}
        </span>
    }
}

/// Search inputs above the flow table. Edits are kept locally until the
/// user presses Search.
#[function_component(FlowSearchForm)]
pub fn flow_search_form(props: &FlowSearchFormProps) -> Html {
    let draft = use_state(|| props.filter.clone());
    let accounts = use_reference_list::<Account>(&props.api_client, ReferenceQuery::new(Resource::Accounts));
    // option lists follow the book and the type picked in the form
    let book_id = props.filter.book_id;
    let flow_type = draft.flow_type;
    let categories =
        use_reference_list::<Category>(&props.api_client, ReferenceQuery::search_categories(book_id, flow_type));
    let tags = use_reference_list::<Tag>(&props.api_client, ReferenceQuery::search_tags(book_id, flow_type));
    let payees = use_reference_list::<Payee>(&props.api_client, ReferenceQuery::search_payees(book_id, flow_type));

    let edit = |apply: fn(&mut FlowFilter, String)| {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        })
    };

    let select = |apply: fn(&mut FlowFilter, String)| {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let mut next = (*draft).clone();
            apply(&mut next, value);
            draft.set(next);
        })
    };

    let on_account = {
        let draft = draft.clone();
        Callback::from(move |choice: Option<(i64, String)>| {
            draft.set(FlowFilter {
                account_id: choice.map(|(id, _)| id),
                ..(*draft).clone()
            });
        })
    };

    let toggler = |ids_of: fn(&mut FlowFilter) -> &mut Vec<i64>| {
        let draft = draft.clone();
        Callback::from(move |id: i64| {
            let mut next = (*draft).clone();
            toggle_id(ids_of(&mut next), id);
            draft.set(next);
        })
    };
    let toggle_category = toggler(|f| &mut f.categories);
    let toggle_tag = toggler(|f| &mut f.tags);
    let toggle_payee = toggler(|f| &mut f.payees);

    // the select only adds; picked values are shown and removed as chips
    let adder = |toggle: &Callback<i64>| {
        let toggle = toggle.clone();
        Callback::from(move |choice: Option<(i64, String)>| {
            if let Some((id, _)) = choice {
                toggle.emit(id);
            }
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let on_search = props.on_search.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            on_search.emit((*draft).clone());
        })
    };

    let onreset = {
        let draft = draft.clone();
        let on_search = props.on_search.clone();
        Callback::from(move |e: Event| {
            e.prevent_default();
            draft.set(FlowFilter::default());
            on_search.emit(FlowFilter::default());
        })
    };

    let selected_account = draft.account_id.map(|id| {
        let label = accounts
            .items
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.name.clone())
            .unwrap_or_default();
        (id, label)
    });

    let type_options = [FlowType::Expense, FlowType::Income, FlowType::Transfer, FlowType::Adjust];

    html! {
        <form class="search-form" {onsubmit} {onreset}>
            <input type="text" placeholder="Title" value={draft.title.clone().unwrap_or_default()}
                onchange={edit(|f, v| f.title = Some(v))} />
            <select onchange={select(|f, v| f.flow_type = FlowType::parse(&v))}>
                <option value="" selected={draft.flow_type.is_none()}>{"All types"}</option>
                { for type_options.into_iter().map(|t| html! {
                    <option value={t.as_str()} selected={draft.flow_type == Some(t)}>{t.label()}</option>
                })}
            </select>
            <input type="number" step="any" placeholder="Min amount"
                value={draft.min_amount.map(|v| v.to_string()).unwrap_or_default()}
                onchange={edit(|f, v| f.min_amount = v.trim().parse().ok())} />
            <input type="number" step="any" placeholder="Max amount"
                value={draft.max_amount.map(|v| v.to_string()).unwrap_or_default()}
                onchange={edit(|f, v| f.max_amount = v.trim().parse().ok())} />
            <input type="date" value={draft.start_date.map(|d| d.to_string()).unwrap_or_default()}
                onchange={edit(|f, v| f.start_date = NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())} />
            <input type="date" value={draft.end_date.map(|d| d.to_string()).unwrap_or_default()}
                onchange={edit(|f, v| f.end_date = NaiveDate::parse_from_str(&v, "%Y-%m-%d").ok())} />
            <TreeSelect
                id="search-account"
                nodes={leaves(&accounts.items, |a| (a.id, a.name.clone(), true))}
                selected={selected_account}
                loading={accounts.loading}
                placeholder="All accounts"
                on_focus={accounts.load.clone()}
                on_change={on_account}
            />
            <span class="multi-filter">
                {id_chips(&draft.categories, &categories.items, |c| (c.id, c.name.clone()), &toggle_category)}
                <TreeSelect
                    id="search-category"
                    nodes={build_tree(&categories.items)}
                    loading={categories.loading}
                    placeholder={if draft.categories.is_empty() { "All categories" } else { "Add category" }}
                    on_focus={categories.load.clone()}
                    on_change={adder(&toggle_category)}
                />
            </span>
            <span class="multi-filter">
                {id_chips(&draft.tags, &tags.items, |t| (t.id, t.name.clone()), &toggle_tag)}
                <TreeSelect
                    id="search-tag"
                    nodes={build_tree(&tags.items)}
                    loading={tags.loading}
                    placeholder={if draft.tags.is_empty() { "All tags" } else { "Add tag" }}
                    on_focus={tags.load.clone()}
                    on_change={adder(&toggle_tag)}
                />
            </span>
            <span class="multi-filter">
                {id_chips(&draft.payees, &payees.items, |p| (p.id, p.name.clone()), &toggle_payee)}
                <TreeSelect
                    id="search-payee"
                    nodes={leaves(&payees.items, |p| (p.id, p.name.clone(), true))}
                    loading={payees.loading}
                    placeholder={if draft.payees.is_empty() { "All payees" } else { "Add payee" }}
                    on_focus={payees.load.clone()}
                    on_change={adder(&toggle_payee)}
                />
            </span>
            <select onchange={select(|f, v| f.confirm = v.parse().ok())}>
                <option value="" selected={draft.confirm.is_none()}>{"Confirmed?"}</option>
                <option value="true" selected={draft.confirm == Some(true)}>{"Confirmed"}</option>
                <option value="false" selected={draft.confirm == Some(false)}>{"Unconfirmed"}</option>
            </select>
            <select onchange={select(|f, v| f.include = v.parse().ok())}>
                <option value="" selected={draft.include.is_none()}>{"Included?"}</option>
                <option value="true" selected={draft.include == Some(true)}>{"Included"}</option>
                <option value="false" selected={draft.include == Some(false)}>{"Excluded"}</option>
            </select>
            <input type="text" placeholder="Notes" value={draft.notes.clone().unwrap_or_default()}
                onchange={edit(|f, v| f.notes = Some(v))} />
            <button type="submit">{"Search"}</button>
            <button type="reset">{"Reset"}</button>
        </form>
    }
}

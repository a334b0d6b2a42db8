use shared::{build_tree, Category, FlowType, OptionNode, ReferenceQuery, Resource};
use yew::prelude::*;

use super::category_form::{CategoryFormModal, CategoryTarget};
use crate::components::spawn_mutation;
use crate::hooks::use_notification::Notice;
use crate::hooks::use_reference_list::use_reference_list;
use crate::services::api::{ApiClient, Toggle};

#[derive(Properties, PartialEq)]
pub struct CategoryTableProps {
    pub api_client: ApiClient,
    pub book_id: i64,
    pub notify: Callback<Notice>,
}

/// Expense or income categories of one book, shown as an indented tree
#[function_component(CategoryTable)]
pub fn category_table(props: &CategoryTableProps) -> Html {
    let category_type = use_state(|| FlowType::Expense);
    let editing = use_state(|| Option::<CategoryTarget>::None);
    let categories = use_reference_list::<Category>(
        &props.api_client,
        ReferenceQuery::categories_for(props.book_id, *category_type),
    );

    // the table shows its list right away instead of waiting for focus
    {
        let load = categories.load.clone();
        use_effect_with(load, |load| {
            load.emit(());
            || ()
        });
    }

    let tree = build_tree(&categories.items);
    let rows = OptionNode::flatten(&tree);

    let open = {
        let editing = editing.clone();
        Callback::from(move |target: CategoryTarget| editing.set(Some(target)))
    };

    let row = |(depth, node): (usize, &OptionNode)| {
        let Some(category) = categories.items.iter().find(|c| c.id == node.id()).cloned() else {
            return html! {};
        };
        let id = category.id;
        let on_add_child = open.reform({
            let category = category.clone();
            move |_: MouseEvent| CategoryTarget::New {
                parent: Some(category.clone()),
            }
        });
        let on_update = open.reform({
            let category = category.clone();
            move |_: MouseEvent| CategoryTarget::Existing(category.clone())
        });
        let on_toggle = {
            let api_client = props.api_client.clone();
            let notify = props.notify.clone();
            let reload = categories.reload.clone();
            Callback::from(move |_: Event| {
                let api_client = api_client.clone();
                spawn_mutation(
                    async move { api_client.toggle(Resource::Categories, id, Toggle::Enable).await },
                    "Updated",
                    notify.clone(),
                    reload.clone(),
                );
            })
        };
        let on_delete = {
            let api_client = props.api_client.clone();
            let notify = props.notify.clone();
            let reload = categories.reload.clone();
            let name = category.name.clone();
            Callback::from(move |_: MouseEvent| {
                if !gloo::dialogs::confirm(&format!("Delete category \"{}\"?", name)) {
                    return;
                }
                let api_client = api_client.clone();
                spawn_mutation(
                    async move { api_client.remove(Resource::Categories, id).await },
                    "Deleted",
                    notify.clone(),
                    reload.clone(),
                );
            })
        };

        html! {
            <tr key={id}>
                <td style={format!("padding-left: {}em", depth * 2)}>{category.name.clone()}</td>
                <td>
                    <input type="checkbox" checked={category.enabled} onchange={on_toggle} />
                </td>
                <td>{category.notes.clone().unwrap_or_default()}</td>
                <td class="row-actions">
                    <button onclick={on_add_child}>{"Add child"}</button>
                    <button onclick={on_update}>{"Update"}</button>
                    <button class="danger" onclick={on_delete}>{"Delete"}</button>
                </td>
            </tr>
        }
    };

    let tab = |flow_type: FlowType| {
        let category_type = category_type.clone();
        let active = *category_type == flow_type;
        html! {
            <button
                class={classes!("tab", active.then_some("active"))}
                onclick={Callback::from(move |_: MouseEvent| category_type.set(flow_type))}
            >
                {flow_type.label()}
            </button>
        }
    };

    let on_add_root = open.reform(|_: MouseEvent| CategoryTarget::New { parent: None });
    let on_close = {
        let editing = editing.clone();
        Callback::from(move |_: ()| editing.set(None))
    };

    html! {
        <section class="category-table">
            <div class="table-toolbar">
                <div class="type-tabs">
                    {tab(FlowType::Expense)}
                    {tab(FlowType::Income)}
                </div>
                <button class="primary" onclick={on_add_root}>{"Add"}</button>
            </div>
            <table class={classes!("data-table", categories.loading.then_some("loading"))}>
                <thead>
                    <tr>
                        <th>{"Name"}</th>
                        <th>{"Enabled"}</th>
                        <th>{"Notes"}</th>
                        <th>{"Actions"}</th>
                    </tr>
                </thead>
                <tbody>
                    { for rows.into_iter().map(row) }
                </tbody>
            </table>

            { if let Some(target) = (*editing).clone() { html! {
                <CategoryFormModal
                    api_client={props.api_client.clone()}
                    book_id={props.book_id}
                    category_type={*category_type}
                    {target}
                    notify={props.notify.clone()}
                    {on_close}
                    on_saved={categories.reload.clone()}
                />
            }} else { html! {} }}
        </section>
    }
}

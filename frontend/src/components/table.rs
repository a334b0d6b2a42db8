use shared::{SortField, SortOrder};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
    pub current: u32,
    pub page_count: u32,
    pub total: u64,
    pub on_change: Callback<u32>,
}

#[function_component(Pagination)]
pub fn pagination(props: &PaginationProps) -> Html {
    let go = |page: u32| {
        let on_change = props.on_change.clone();
        Callback::from(move |_: MouseEvent| on_change.emit(page))
    };

    html! {
        <div class="pagination">
            <span class="pagination-total">{format!("{} records", props.total)}</span>
            <button disabled={props.current <= 1} onclick={go(props.current.saturating_sub(1))}>{"‹"}</button>
            <span>{format!("{} / {}", props.current, props.page_count)}</span>
            <button disabled={props.current >= props.page_count} onclick={go(props.current + 1)}>{"›"}</button>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct SortHeaderProps {
    pub label: AttrValue,
    pub field: &'static str,
    pub sort: Option<SortField>,
    pub on_sort: Callback<&'static str>,
}

/// Column header that cycles ascending, descending, unsorted
#[function_component(SortHeader)]
pub fn sort_header(props: &SortHeaderProps) -> Html {
    let marker = match props.sort.as_ref().filter(|s| s.field == props.field).map(|s| s.order) {
        Some(SortOrder::Ascend) => " ▲",
        Some(SortOrder::Descend) => " ▼",
        None => "",
    };
    let onclick = {
        let on_sort = props.on_sort.clone();
        let field = props.field;
        Callback::from(move |_: MouseEvent| on_sort.emit(field))
    };

    html! {
        <th class="sortable" {onclick}>{format!("{}{}", props.label, marker)}</th>
    }
}

use serde::de::DeserializeOwned;
use shared::{listing_params, Page, Paging, Resource, SortField, SortOrder};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

#[derive(Clone, PartialEq)]
pub struct PagedListState<T: Clone + PartialEq> {
    pub page: Page<T>,
    pub loading: bool,
    pub paging: Paging,
    pub sort: Option<SortField>,
}

#[derive(Clone, PartialEq)]
pub struct UsePagedListActions {
    pub reload: Callback<()>,
    pub go_to_page: Callback<u32>,
    pub sort_by: Callback<&'static str>,
}

pub struct UsePagedListResult<T: Clone + PartialEq> {
    pub state: PagedListState<T>,
    pub actions: UsePagedListActions,
}

/// Paged, sortable listing of one resource under fixed filter params
#[hook]
pub fn use_paged_list<T>(
    api_client: &ApiClient,
    resource: Resource,
    filter: Vec<(String, String)>,
    page_size: u32,
) -> UsePagedListResult<T>
where
    T: DeserializeOwned + Clone + PartialEq + 'static,
{
    let page = use_state(Page::<T>::empty);
    let loading = use_state(|| false);
    let paging = use_state(|| Paging::first(page_size));
    let sort = use_state(|| Option::<SortField>::None);
    let reloads = use_mut_ref(|| 0u32);
    let latest_request = use_mut_ref(|| 0u64);
    let update = use_force_update();

    {
        let api_client = api_client.clone();
        let page = page.clone();
        let loading = loading.clone();
        let latest_request = latest_request.clone();

        use_effect_with(
            (filter, *paging, (*sort).clone(), *reloads.borrow()),
            move |(filter, paging, sort, _)| {
                let params = listing_params(filter, *paging, sort.as_ref());
                let request = {
                    let mut latest = latest_request.borrow_mut();
                    *latest += 1;
                    *latest
                };
                loading.set(true);

                spawn_local(async move {
                    let result = api_client.query_page::<T>(resource, &params).await;
                    if *latest_request.borrow() != request {
                        return;
                    }
                    match result {
                        Ok(listing) => page.set(listing),
                        Err(e) => log::error!("Failed to load {}: {}", resource, e),
                    }
                    loading.set(false);
                });
                || ()
            },
        );
    }

    let reload = {
        let reloads = reloads.clone();
        use_callback((), move |_: (), _| {
            *reloads.borrow_mut() += 1;
            update.force_update();
        })
    };

    let go_to_page = {
        let paging = paging.clone();
        use_callback((), move |current: u32, _| {
            paging.set(Paging {
                current: current.max(1),
                page_size: paging.page_size,
            });
        })
    };

    let sort_by = {
        let sort = sort.clone();
        use_callback((*sort).clone(), move |field: &'static str, current| {
            let order = current.as_ref().filter(|s| s.field == field).map(|s| s.order);
            sort.set(SortOrder::cycle(order).map(|order| SortField::new(field, order)));
        })
    };

    UsePagedListResult {
        state: PagedListState {
            page: (*page).clone(),
            loading: *loading,
            paging: *paging,
            sort: (*sort).clone(),
        },
        actions: UsePagedListActions {
            reload,
            go_to_page,
            sort_by,
        },
    }
}

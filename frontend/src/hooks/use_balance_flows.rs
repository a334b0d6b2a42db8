use futures::future::join;
use shared::{
    listing_params, BalanceFlow, FlowFilter, FlowStatistics, Page, Paging, Resource, SortField, SortOrder,
};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_notification::Notice;
use crate::services::api::ApiClient;

#[derive(Clone, PartialEq)]
pub struct BalanceFlowsState {
    pub page: Page<BalanceFlow>,
    pub statistics: FlowStatistics,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: FlowFilter,
    pub paging: Paging,
    pub sort: Option<SortField>,
}

pub struct UseBalanceFlowsResult {
    pub state: BalanceFlowsState,
    pub actions: UseBalanceFlowsActions,
}

#[derive(Clone, PartialEq)]
pub struct UseBalanceFlowsActions {
    pub reload: Callback<()>,
    pub search: Callback<FlowFilter>,
    pub go_to_page: Callback<u32>,
    pub sort_by: Callback<&'static str>,
    pub confirm: Callback<i64>,
    pub remove: Callback<i64>,
}

#[hook]
pub fn use_balance_flows(
    api_client: &ApiClient,
    book_id: Option<i64>,
    page_size: u32,
    notify: Callback<Notice>,
) -> UseBalanceFlowsResult {
    let page = use_state(Page::<BalanceFlow>::empty);
    let statistics = use_state(FlowStatistics::default);
    let loading = use_state(|| false);
    let error = use_state(|| Option::<String>::None);
    let filter = use_state(|| FlowFilter {
        book_id,
        ..FlowFilter::default()
    });
    let paging = use_state(|| Paging::first(page_size));
    let sort = use_state(|| Some(SortField::new("createTime", SortOrder::Descend)));
    let reloads = use_mut_ref(|| 0u32);
    let latest_request = use_mut_ref(|| 0u64);
    let update = use_force_update();

    // Switching books starts over from the first page
    {
        let filter = filter.clone();
        let paging = paging.clone();
        use_effect_with(book_id, move |book_id| {
            if filter.book_id != *book_id {
                filter.set(FlowFilter {
                    book_id: *book_id,
                    ..(*filter).clone()
                });
                paging.set(Paging::first(paging.page_size));
            }
            || ()
        });
    }

    // Fetch the page and the totals whenever the query changes
    {
        let api_client = api_client.clone();
        let page = page.clone();
        let statistics = statistics.clone();
        let loading = loading.clone();
        let error = error.clone();
        let latest_request = latest_request.clone();

        use_effect_with(
            ((*filter).clone(), *paging, (*sort).clone(), *reloads.borrow()),
            move |(filter, paging, sort, _)| {
                let filter_params = filter.pairs();
                let params = listing_params(&filter_params, *paging, sort.as_ref());
                let request = {
                    let mut latest = latest_request.borrow_mut();
                    *latest += 1;
                    *latest
                };
                loading.set(true);

                spawn_local(async move {
                    let (listing, totals) = join(
                        api_client.query_page::<BalanceFlow>(Resource::BalanceFlows, &params),
                        api_client.flow_statistics(&filter_params),
                    )
                    .await;

                    if *latest_request.borrow() != request {
                        log::debug!("dropping balance flow listing {} (latest is {})", request, *latest_request.borrow());
                        return;
                    }
                    match listing {
                        Ok(listing) => {
                            page.set(listing);
                            error.set(None);
                        }
                        Err(e) => {
                            log::error!("Failed to load balance flows: {}", e);
                            error.set(Some(e.to_string()));
                        }
                    }
                    match totals {
                        Ok(totals) => statistics.set(totals),
                        Err(e) => log::warn!("Failed to load flow statistics: {}", e),
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

    let search = {
        let filter = filter.clone();
        let paging = paging.clone();
        use_callback(book_id, move |next: FlowFilter, book_id| {
            filter.set(FlowFilter {
                book_id: *book_id,
                ..next
            });
            paging.set(Paging::first(paging.page_size));
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

    let confirm = {
        let api_client = api_client.clone();
        let reload = reload.clone();
        use_callback(notify.clone(), move |id: i64, notify| {
            let api_client = api_client.clone();
            let reload = reload.clone();
            let notify = notify.clone();
            spawn_local(async move {
                match api_client.confirm_flow(id).await {
                    Ok(()) => {
                        notify.emit(Notice::success("Confirmed"));
                        reload.emit(());
                    }
                    Err(e) => notify.emit(Notice::error(format!("Failed to confirm: {}", e))),
                }
            });
        })
    };

    let remove = {
        let api_client = api_client.clone();
        let reload = reload.clone();
        use_callback(notify, move |id: i64, notify| {
            let api_client = api_client.clone();
            let reload = reload.clone();
            let notify = notify.clone();
            spawn_local(async move {
                match api_client.remove(Resource::BalanceFlows, id).await {
                    Ok(()) => {
                        notify.emit(Notice::success("Deleted"));
                        reload.emit(());
                    }
                    Err(e) => notify.emit(Notice::error(format!("Failed to delete: {}", e))),
                }
            });
        })
    };

    let state = BalanceFlowsState {
        page: (*page).clone(),
        statistics: *statistics,
        loading: *loading,
        error: (*error).clone(),
        filter: (*filter).clone(),
        paging: *paging,
        sort: (*sort).clone(),
    };

    let actions = UseBalanceFlowsActions {
        reload,
        search,
        go_to_page,
        sort_by,
        confirm,
        remove,
    };

    UseBalanceFlowsResult { state, actions }
}

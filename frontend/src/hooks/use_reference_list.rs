use serde::de::DeserializeOwned;
use shared::{ReferenceQuery, ReferenceSlot};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::services::api::ApiClient;

pub struct ReferenceList<T> {
    pub items: Vec<T>,
    pub loading: bool,
    /// Fetch unless the list for the current query is cached or in flight
    pub load: Callback<()>,
    /// Drop the cache and fetch again, e.g. after an edit
    pub reload: Callback<()>,
}

/// Options for one selector or small table, cached per query.
///
/// The slot lives in a `RefCell` so that responses arriving after a re-render
/// are checked against the slot's current state, not the one captured when
/// the fetch started.
#[hook]
pub fn use_reference_list<T>(api_client: &ApiClient, query: ReferenceQuery) -> ReferenceList<T>
where
    T: DeserializeOwned + Clone + 'static,
{
    let slot = use_mut_ref(ReferenceSlot::<T>::new);
    let update = use_force_update();

    // A changed filter invalidates whatever is cached or on its way
    {
        let slot = slot.clone();
        let update = update.clone();
        use_effect_with(query.clone(), move |query| {
            if slot.borrow_mut().retarget(query) {
                update.force_update();
            }
            || ()
        });
    }

    let load = {
        let api_client = api_client.clone();
        let slot = slot.clone();
        let update = update.clone();

        use_callback(query, move |_: (), query| {
            let Some(ticket) = slot.borrow_mut().request(query.clone()) else {
                return;
            };
            update.force_update();

            let api_client = api_client.clone();
            let slot = slot.clone();
            let update = update.clone();
            spawn_local(async move {
                let result = api_client.query_all::<T>(ticket.query()).await;
                if slot.borrow_mut().resolve(ticket, result) {
                    update.force_update();
                }
            });
        })
    };

    let reload = {
        let slot = slot.clone();
        let load = load.clone();
        use_callback(load, move |_: (), load| {
            slot.borrow_mut().invalidate();
            load.emit(());
        })
    };

    let slot = slot.borrow();
    ReferenceList {
        items: slot.items().to_vec(),
        loading: slot.is_loading(),
        load,
        reload,
    }
}

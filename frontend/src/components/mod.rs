use std::future::Future;

use wasm_bindgen_futures::spawn_local;
use yew::Callback;

use crate::hooks::use_notification::Notice;
use crate::services::api::ApiError;

pub mod ai_summary;
pub mod categories;
pub mod flows;
pub mod notification;
pub mod payees;
pub mod table;
pub mod templates;
pub mod tree_select;

/// Run a write request, report the outcome and refresh the listing on success
pub(crate) fn spawn_mutation<F>(request: F, success: &'static str, notify: Callback<Notice>, on_done: Callback<()>)
where
    F: Future<Output = Result<(), ApiError>> + 'static,
{
    spawn_local(async move {
        match request.await {
            Ok(()) => {
                notify.emit(Notice::success(success));
                on_done.emit(());
            }
            Err(e) => notify.emit(Notice::error(e.to_string())),
        }
    });
}

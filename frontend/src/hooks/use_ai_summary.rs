use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_notification::Notice;
use crate::services::api::ApiClient;

#[derive(Clone, PartialEq)]
pub struct AiSummaryState {
    pub text: Option<String>,
    pub loading: bool,
}

pub struct UseAiSummaryResult {
    pub state: AiSummaryState,
    pub generate: Callback<i64>,
}

#[hook]
pub fn use_ai_summary(api_client: &ApiClient, timeout_ms: u32, notify: Callback<Notice>) -> UseAiSummaryResult {
    let text = use_state(|| Option::<String>::None);
    let loading = use_state(|| false);

    let generate = {
        let api_client = api_client.clone();
        let text = text.clone();
        let loading = loading.clone();

        use_callback((timeout_ms, notify), move |book_id: i64, (timeout_ms, notify)| {
            let api_client = api_client.clone();
            let text = text.clone();
            let loading = loading.clone();
            let notify = notify.clone();
            let timeout_ms = *timeout_ms;

            spawn_local(async move {
                loading.set(true);
                match api_client.ai_summary(book_id, timeout_ms).await {
                    Ok(summary) => {
                        text.set(Some(summary));
                        notify.emit(Notice::success("Summary updated"));
                    }
                    Err(e) => {
                        // the failure replaces the summary so the panel says what happened
                        text.set(Some(e.to_string()));
                        notify.emit(Notice::error(format!("Could not generate summary: {}", e)));
                    }
                }
                loading.set(false);
            });
        })
    };

    UseAiSummaryResult {
        state: AiSummaryState {
            text: (*text).clone(),
            loading: *loading,
        },
        generate,
    }
}

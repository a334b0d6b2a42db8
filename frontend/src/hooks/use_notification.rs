use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// A transient message shown at the top of the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice success",
            NoticeKind::Error => "notice error",
        }
    }
}

pub struct UseNotificationResult {
    pub current: Option<Notice>,
    pub notify: Callback<Notice>,
    pub dismiss: Callback<()>,
}

#[hook]
pub fn use_notification(duration_ms: u32) -> UseNotificationResult {
    let current = use_state(|| Option::<Notice>::None);
    // Each notice gets a number so an older timer can't clear a newer notice
    let shown = use_mut_ref(|| 0u64);

    let notify = {
        let current = current.clone();
        let shown = shown.clone();

        use_callback(duration_ms, move |notice: Notice, duration_ms| {
            match notice.kind {
                NoticeKind::Success => log::info!("{}", notice.text),
                NoticeKind::Error => log::warn!("{}", notice.text),
            }
            let mine = {
                let mut shown = shown.borrow_mut();
                *shown += 1;
                *shown
            };
            current.set(Some(notice));

            let current = current.clone();
            let shown = shown.clone();
            let duration_ms = *duration_ms;
            spawn_local(async move {
                TimeoutFuture::new(duration_ms).await;
                if *shown.borrow() == mine {
                    current.set(None);
                }
            });
        })
    };

    let dismiss = {
        let current = current.clone();
        use_callback((), move |_: (), _| current.set(None))
    };

    UseNotificationResult {
        current: (*current).clone(),
        notify,
        dismiss,
    }
}

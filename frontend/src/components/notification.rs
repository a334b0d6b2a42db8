use yew::prelude::*;

use crate::hooks::use_notification::Notice;

#[derive(Properties, PartialEq)]
pub struct NotificationBarProps {
    pub notice: Option<Notice>,
    pub on_dismiss: Callback<()>,
}

#[function_component(NotificationBar)]
pub fn notification_bar(props: &NotificationBarProps) -> Html {
    let Some(notice) = props.notice.as_ref() else {
        return html! {};
    };
    let on_dismiss = props.on_dismiss.clone();

    html! {
        <div class={notice.css_class()} role="status">
            <span>{&notice.text}</span>
            <button class="notice-close" onclick={Callback::from(move |_| on_dismiss.emit(()))}>{"×"}</button>
        </div>
    }
}

//! Single-choice select over an [`OptionNode`] tree.
//!
//! Flat lists (accounts, payees, books) are passed in as leaves. The options
//! are fetched lazily, so the current value is passed with its label and
//! rendered even when it isn't among the loaded options yet.

use shared::OptionNode;
use web_sys::HtmlSelectElement;
use yew::prelude::*;

const INDENT: &str = "\u{00a0}\u{00a0}\u{00a0}";

/// Leaf options from a flat list
pub fn leaves<T>(items: &[T], describe: impl Fn(&T) -> (i64, String, bool)) -> Vec<OptionNode> {
    items
        .iter()
        .map(|item| {
            let (id, label, selectable) = describe(item);
            OptionNode::Leaf { id, label, selectable }
        })
        .collect()
}

#[derive(Properties, PartialEq)]
pub struct TreeSelectProps {
    pub id: AttrValue,
    pub nodes: Vec<OptionNode>,
    /// Current value and its label
    #[prop_or_default]
    pub selected: Option<(i64, String)>,
    #[prop_or_default]
    pub loading: bool,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub required: bool,
    #[prop_or(AttrValue::from("Select..."))]
    pub placeholder: AttrValue,
    pub on_focus: Callback<()>,
    pub on_change: Callback<Option<(i64, String)>>,
}

#[function_component(TreeSelect)]
pub fn tree_select(props: &TreeSelectProps) -> Html {
    let selected_id = props.selected.as_ref().map(|(id, _)| *id);
    let flat = OptionNode::flatten(&props.nodes);
    let selected_missing = selected_id.is_some_and(|id| OptionNode::find(&props.nodes, id).is_none());

    let onfocus = {
        let on_focus = props.on_focus.clone();
        Callback::from(move |_: FocusEvent| on_focus.emit(()))
    };

    let onchange = {
        let on_change = props.on_change.clone();
        let nodes = props.nodes.clone();
        let selected = props.selected.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            let Ok(id) = value.parse::<i64>() else {
                on_change.emit(None);
                return;
            };
            let label = OptionNode::find(&nodes, id)
                .map(|node| node.label().to_string())
                .or_else(|| selected.as_ref().filter(|(sid, _)| *sid == id).map(|(_, l)| l.clone()))
                .unwrap_or_default();
            on_change.emit(Some((id, label)));
        })
    };

    html! {
        <select
            id={props.id.clone()}
            class={classes!("tree-select", props.loading.then_some("loading"))}
            disabled={props.disabled}
            required={props.required}
            {onfocus}
            {onchange}
        >
            <option value="" selected={selected_id.is_none()}>
                { if props.loading { "Loading..." } else { props.placeholder.as_str() } }
            </option>
            { if selected_missing {
                let (id, label) = props.selected.clone().unwrap_or_default();
                html! { <option value={id.to_string()} selected=true>{label}</option> }
            } else { html! {} }}
            { for flat.into_iter().map(|(depth, node)| html! {
                <option
                    value={node.id().to_string()}
                    disabled={!node.selectable()}
                    selected={Some(node.id()) == selected_id}
                >
                    {format!("{}{}", INDENT.repeat(depth), node.label())}
                </option>
            })}
        </select>
    }
}

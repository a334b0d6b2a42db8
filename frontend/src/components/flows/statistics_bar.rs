use shared::FlowStatistics;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct StatisticsBarProps {
    pub statistics: FlowStatistics,
    pub loading: bool,
}

#[function_component(StatisticsBar)]
pub fn statistics_bar(props: &StatisticsBarProps) -> Html {
    let stats = props.statistics;
    html! {
        <div class={classes!("statistics-bar", props.loading.then_some("loading"))}>
            <span class="stat expense">{format!("Total Expense: {:.2}", stats.total_expense)}</span>
            <span class="stat income">{format!("Total Income: {:.2}", stats.total_income)}</span>
            <span class="stat surplus">{format!("Surplus: {:.2}", stats.surplus)}</span>
        </div>
    }
}

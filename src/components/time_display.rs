use crate::util::format_clock;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct TimeDisplayProps {
    pub time_left: u32,
    pub level_name: AttrValue,
}

#[function_component(TimeDisplay)]
pub fn time_display(props: &TimeDisplayProps) -> Html {
    // last ten seconds in red
    let color = if props.time_left <= 10 { "#f85149" } else { "#e6edf3" };
    html! {<div style="display:flex; flex-direction:column; align-items:center; gap:2px;">
        <div style="font-size:12px; opacity:0.75;">{ props.level_name.clone() }</div>
        <div style={format!("font-size:24px; font-weight:600; font-variant-numeric:tabular-nums; color:{color};")}>{ format_clock(props.time_left) }</div>
    </div>}
}

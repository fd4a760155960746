use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ScoreDisplayProps {
    /// `0..=100`
    pub score: f64,
}

#[function_component]
pub fn ScoreDisplay(props: &ScoreDisplayProps) -> Html {
    let pct = props.score.clamp(0.0, 100.0);
    let value_style =
        "min-width:56px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600; color:#3fb950;";
    html! {
        <div style="display:flex; align-items:center; gap:8px; background:rgba(22,27,34,0.9); border:1px solid #30363d; border-radius:8px; padding:8px 12px; min-width:230px; font-size:14px;">
            <span style="font-weight:500;">{"Clean"}</span>
            <div style="flex:1; height:8px; background:#30363d; border-radius:4px; overflow:hidden;">
                <div style={format!("width:{pct:.1}%; height:100%; background:#3fb950;")}></div>
            </div>
            <span style={value_style}>{ format!("{pct:.0}%") }</span>
        </div>
    }
}

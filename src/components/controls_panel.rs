use crate::model::GameState;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct ControlsPanelProps {
    pub state: GameState,
    pub on_start: Callback<()>,
}

#[function_component]
pub fn ControlsPanel(props: &ControlsPanelProps) -> Html {
    let start_cb = {
        let cb = props.on_start.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let label = match props.state {
        GameState::Idle => "Start",
        GameState::Playing => "Restart",
        // the overlay offers the follow-up action
        GameState::Won | GameState::Lost | GameState::GameOver => return html! {},
    };
    html! {<div style="display:flex; gap:6px;">
        <button onclick={start_cb} style="padding:6px 14px;">{ label }</button>
    </div>}
}

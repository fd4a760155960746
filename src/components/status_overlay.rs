use crate::model::GameState;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatusOverlayProps {
    pub state: GameState,
    pub score: f64,
    pub level_name: AttrValue,
    pub on_retry: Callback<()>,
    pub on_next: Callback<()>,
    pub on_play_again: Callback<()>,
}

#[function_component]
pub fn StatusOverlay(props: &StatusOverlayProps) -> Html {
    let (title, color, action, label) = match props.state {
        GameState::Won => ("Sparkling clean!", "#3fb950", props.on_next.clone(), "Next level"),
        GameState::Lost => ("Time's up", "#f85149", props.on_retry.clone(), "Try again"),
        GameState::GameOver => ("Every level cleaned", "#d4af37", props.on_play_again.clone(), "Play again"),
        GameState::Idle | GameState::Playing => return html! {},
    };
    let action_btn = Callback::from(move |_| action.emit(()));
    html! {
        <div style={format!("position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); background:rgba(0,0,0,0.85); border:2px solid {color}; padding:24px 32px; border-radius:12px; text-align:center; min-width:280px; z-index:10;")}>
            <h2 style={format!("margin:0 0 12px 0; color:{color};")}>{ title }</h2>
            <p style="margin:4px 0;">{ props.level_name.clone() }</p>
            <p style="margin:4px 0;">{ format!("Cleaned: {:.0}%", props.score.clamp(0.0, 100.0)) }</p>
            <div style="margin-top:16px; display:flex; gap:12px; justify-content:center;">
                <button onclick={action_btn}>{ label }</button>
            </div>
        </div>
    }
}

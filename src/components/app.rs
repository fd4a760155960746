use super::{
    controls_panel::ControlsPanel, game_area::GameArea, score_display::ScoreDisplay,
    status_overlay::StatusOverlay, time_display::TimeDisplay,
};
use crate::model::{GameState, Session, SessionAction};
use crate::web::page_config;
use gloo::timers::callback::Interval;
use yew::prelude::*;

const CLEAN_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='800' height='600'%3E%3Cdefs%3E%3ClinearGradient id='g' x1='0' y1='0' x2='1' y2='1'%3E%3Cstop offset='0' stop-color='%23e0f7fa'/%3E%3Cstop offset='1' stop-color='%2380deea'/%3E%3C/linearGradient%3E%3C/defs%3E%3Crect width='800' height='600' fill='url(%23g)'/%3E%3C/svg%3E";
const SPONGE_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='100' height='100'%3E%3Crect x='10' y='25' width='80' height='50' rx='12' fill='%23f2c94c' stroke='%23b7950b' stroke-width='4'/%3E%3C/svg%3E";

#[function_component(App)]
pub fn app() -> Html {
    let session = use_reducer(Session::default);
    // read once from the host page
    let config = use_memo((), |_| page_config("clean-sweep-config"));
    let playing = session.state == GameState::Playing;

    // One tick per second while a round runs; dropping the Interval stops it.
    {
        let session = session.clone();
        use_effect_with(playing, move |&playing| {
            let interval = playing.then(|| {
                let session = session.clone();
                Interval::new(1_000, move || session.dispatch(SessionAction::Tick))
            });
            move || drop(interval)
        });
    }

    let dispatcher = |action: fn() -> SessionAction| {
        let session = session.clone();
        Callback::from(move |_: ()| session.dispatch(action()))
    };
    let on_start = dispatcher(|| SessionAction::Start);
    let on_next = dispatcher(|| SessionAction::NextLevel);
    let on_play_again = dispatcher(|| SessionAction::PlayAgain);
    let on_complete = dispatcher(|| SessionAction::Complete);
    let on_progress = {
        let session = session.clone();
        Callback::from(move |p: f64| session.dispatch(SessionAction::Progress(p)))
    };

    let level = session.current_level();
    html! {
        <div style="min-height:100vh; background:#0d1117; color:#e6edf3; font-family:sans-serif; display:flex; flex-direction:column; align-items:center; gap:12px; padding:16px; box-sizing:border-box;">
            <h1 style="margin:0; font-size:26px;">{"Clean Sweep"}</h1>
            <div style="display:flex; align-items:center; gap:16px; flex-wrap:wrap; justify-content:center;">
                <TimeDisplay time_left={session.time_left} level_name={level.name} />
                <ScoreDisplay score={session.score} />
                <ControlsPanel state={session.state} on_start={on_start.clone()} />
            </div>
            <div style="position:relative; width:100%; max-width:800px;">
                <GameArea
                    on_progress_update={on_progress}
                    on_cleaning_complete={on_complete}
                    clean_image_src={CLEAN_IMAGE}
                    sponge_image_src={SPONGE_IMAGE}
                    is_game_active={playing}
                    is_idle={session.state == GameState::Idle}
                    reset_key={session.reset_key}
                    dirt_color={Some(AttrValue::from(level.dirt_color))}
                    config={(*config).clone()}
                />
                <StatusOverlay
                    state={session.state}
                    score={session.score}
                    level_name={level.name}
                    on_retry={on_start}
                    on_next={on_next}
                    on_play_again={on_play_again}
                />
            </div>
            <p style="margin:0; font-size:12px; opacity:0.7;">{"Hold the mouse button (or drag a finger) to scrub the dirt away before the timer runs out."}</p>
        </div>
    }
}

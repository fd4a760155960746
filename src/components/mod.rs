pub mod app;
pub mod controls_panel;
pub mod game_area;
pub mod score_display;
pub mod status_overlay;
pub mod time_display;

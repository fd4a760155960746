use clean_sweep::components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}

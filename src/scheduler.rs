// Seams for the next display frame and dirt image loads; tickets mark superseded work

/// Identifies one animation-frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameTicket(pub u64);

/// Identifies the reset generation an image load was issued for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub u64);

/// One-shot frame scheduling (requestAnimationFrame semantics): each request
/// yields at most one callback into `Engine::on_animation_frame(ticket)`.
pub trait FrameScheduler {
    type Handle;

    fn request_frame(&mut self, ticket: FrameTicket) -> Self::Handle;
    /// Must guarantee the callback for `handle` never fires afterwards.
    fn cancel_frame(&mut self, handle: Self::Handle);
}

/// Starts loading `src`; completion is reported back through
/// `Engine::on_image_loaded` / `Engine::on_image_failed` with the same ticket.
pub trait ImageLoader {
    fn load(&mut self, src: &str, ticket: LoadTicket);
}

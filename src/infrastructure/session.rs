use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use log::{error, warn};

use crate::{Carousel, CarouselSurface, CarouselView, Navigation, RepositoryProvider};

/// A command typed by the user during an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Navigate the carousel.
    Navigate(Navigation),
    /// Open the center repository.
    Open,
    /// End the session.
    Quit,
}

impl SessionCommand {
    /// Parses a line of input: `n`, `p`, `r`, `o`, `q` or a 1-based position.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "n" | "next" => Some(Self::Navigate(Navigation::Next)),
            "p" | "prev" => Some(Self::Navigate(Navigation::Previous)),
            "r" | "resize" => Some(Self::Navigate(Navigation::Resize)),
            "o" | "open" => Some(Self::Open),
            "q" | "quit" => Some(Self::Quit),
            other => other
                .parse::<usize>()
                .ok()
                .and_then(|position| position.checked_sub(1))
                .map(|index| Self::Navigate(Navigation::Jump(index))),
        }
    }
}

/// Drives a carousel on a surface.
///
/// Surface failures are logged and the render is abandoned.
pub struct CarouselSession<S: CarouselSurface> {
    carousel: Carousel,
    surface: S,
}

impl<S: CarouselSurface> CarouselSession<S> {
    /// Creates a new `CarouselSession`.
    pub fn new(carousel: Carousel, surface: S) -> Self {
        Self { carousel, surface }
    }

    /// Retrieves the repositories and starts a session on `surface`.
    ///
    /// When no repository can be showcased, the surface shows the unavailable
    /// panel linking to `profile_url` and no session is started.
    pub async fn load(
        provider: Arc<dyn RepositoryProvider>,
        mut surface: S,
        profile_url: &str,
        transition_duration: Duration,
    ) -> Option<Self> {
        let carousel = match provider.fetch_repositories().await {
            Ok(repositories) => Carousel::try_new(repositories, transition_duration),
            Err(e) => Err(e),
        };
        match carousel {
            Ok(carousel) => {
                let mut session = Self::new(carousel, surface);
                session.start();

                Some(session)
            }
            Err(e) => {
                warn!("{e}");
                if let Err(e) = surface.show_unavailable(profile_url) {
                    error!("Failed to display the unavailable panel: {e}");
                }

                None
            }
        }
    }

    /// Retrieves the carousel.
    pub fn carousel(&self) -> &Carousel {
        &self.carousel
    }

    /// Draws the initial view.
    pub fn start(&mut self) {
        match self.carousel.current_view() {
            Ok(view) => self.present(&view),
            Err(e) => error!("Failed to render carousel: {e}"),
        }
    }

    /// Handles a navigation request at `now`.
    ///
    /// Returns the link to open when the command activates the center card.
    pub fn handle(&mut self, command: SessionCommand, now: Instant) -> Option<String> {
        match command {
            SessionCommand::Navigate(navigation) => {
                match self.carousel.navigate(navigation, now) {
                    Ok(Some(view)) => self.present(&view),
                    Ok(None) => {}
                    Err(e) => error!("Failed to render carousel: {e}"),
                }
                None
            }
            SessionCommand::Open => Some(self.carousel.center().url().to_string()),
            SessionCommand::Quit => None,
        }
    }

    fn present(&mut self, view: &CarouselView) {
        if let Err(e) = self.surface.apply(view, self.carousel.repositories()) {
            warn!("Abandoned carousel render: {e}");
        }
    }
}

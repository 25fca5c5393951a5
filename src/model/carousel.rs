//! Carousel state machine and view description.
//!
//! The carousel shows three cards at a time (left, center, right) around a
//! wrapping center index. Rendering is a pure function of the repositories and
//! the state: surfaces only apply the resulting [`CarouselView`].

use std::time::{Duration, Instant};

use log::debug;

use super::{Repository, ShowcaseError, StdResult};

/// Scale of the side cards, in percent of the center card.
pub const SIDE_CARD_SCALE_PERCENT: u8 = 85;

/// A navigation request on the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Move to the next repository.
    Next,
    /// Move to the previous repository.
    Previous,
    /// Move to the repository at the given position.
    Jump(usize),
    /// Re-render the current repository (layout refresh).
    Resize,
}

/// The animation applied when a view is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The new center slides in from the right.
    SlideFromRight,
    /// The new center slides in from the left.
    SlideFromLeft,
    /// Non-directional fade.
    Fade,
    /// No animation.
    Refresh,
}

impl Transition {
    /// Whether the transition is animated (and therefore guarded).
    pub fn is_animated(&self) -> bool {
        !matches!(self, Transition::Refresh)
    }
}

/// The position of a card in the carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardSlot {
    /// The previous repository, dimmed.
    Left,
    /// The focused repository.
    Center,
    /// The next repository, dimmed.
    Right,
}

/// A card to draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Where the card is drawn.
    pub slot: CardSlot,
    /// Index of the repository shown by the card.
    pub index: usize,
    /// Scale of the card, in percent.
    pub scale_percent: u8,
    /// Whether the card is dimmed.
    pub dimmed: bool,
    /// The link opened when the card is activated, only set on the center card.
    pub link: Option<String>,
}

impl CardView {
    /// Whether the card reacts to activation.
    pub fn is_interactive(&self) -> bool {
        self.link.is_some()
    }
}

/// A position marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorView {
    /// Index of the repository the marker stands for.
    pub index: usize,
    /// Whether the repository is at the center.
    pub is_current: bool,
}

/// A complete description of what a surface must draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselView {
    /// Left, center and right cards, in this order.
    pub cards: [CardView; 3],
    /// One indicator per repository.
    pub indicators: Vec<IndicatorView>,
    /// Animation used to present the view.
    pub transition: Transition,
}

impl CarouselView {
    /// Computes the view of `repositories` centered on the state index.
    pub fn render(
        repositories: &[Repository],
        state: &CarouselState,
        transition: Transition,
    ) -> StdResult<Self> {
        if repositories.is_empty() || repositories.len() != state.len() {
            return Err(ShowcaseError::EmptyCarousel.into());
        }
        let (left, center, right) = state.visible_indexes();
        let side_card = |slot, index| CardView {
            slot,
            index,
            scale_percent: SIDE_CARD_SCALE_PERCENT,
            dimmed: true,
            link: None,
        };

        Ok(Self {
            cards: [
                side_card(CardSlot::Left, left),
                CardView {
                    slot: CardSlot::Center,
                    index: center,
                    scale_percent: 100,
                    dimmed: false,
                    link: Some(repositories[center].url().to_string()),
                },
                side_card(CardSlot::Right, right),
            ],
            indicators: (0..repositories.len())
                .map(|index| IndicatorView {
                    index,
                    is_current: index == center,
                })
                .collect(),
            transition,
        })
    }

    /// Retrieves the center card.
    pub fn center(&self) -> &CardView {
        &self.cards[1]
    }
}

/// The position of the carousel over a non-empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselState {
    current_center_index: usize,
    len: usize,
}

impl CarouselState {
    /// Creates a state centered on the first of `len` items.
    pub fn try_new(len: usize) -> StdResult<Self> {
        if len == 0 {
            return Err(ShowcaseError::EmptyCarousel.into());
        }

        Ok(Self {
            current_center_index: 0,
            len,
        })
    }

    /// Retrieves the current center index.
    pub fn current_center_index(&self) -> usize {
        self.current_center_index
    }

    /// Retrieves the number of items.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false, a state is never empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Moves the center forward, wrapping around.
    pub fn next(&mut self) {
        self.current_center_index = (self.current_center_index + 1) % self.len;
    }

    /// Moves the center backward, wrapping around.
    pub fn previous(&mut self) {
        self.current_center_index = (self.current_center_index + self.len - 1) % self.len;
    }

    /// Moves the center to `index`, returns whether the state changed.
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.len || index == self.current_center_index {
            return false;
        }
        self.current_center_index = index;

        true
    }

    /// Indexes of the left, center and right cards.
    pub fn visible_indexes(&self) -> (usize, usize, usize) {
        let center = self.current_center_index;

        (
            (center + self.len - 1) % self.len,
            center,
            (center + 1) % self.len,
        )
    }
}

/// A carousel over a fixed list of repositories.
///
/// Navigation requests received while a transition is in flight are dropped.
#[derive(Debug)]
pub struct Carousel {
    repositories: Vec<Repository>,
    state: CarouselState,
    transition_duration: Duration,
    in_flight_until: Option<Instant>,
}

impl Carousel {
    /// Creates a carousel centered on the first repository.
    pub fn try_new(
        repositories: Vec<Repository>,
        transition_duration: Duration,
    ) -> StdResult<Self> {
        let state = CarouselState::try_new(repositories.len())?;

        Ok(Self {
            repositories,
            state,
            transition_duration,
            in_flight_until: None,
        })
    }

    /// Retrieves the repositories.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Retrieves the state.
    pub fn state(&self) -> &CarouselState {
        &self.state
    }

    /// Retrieves the repository at the center.
    pub fn center(&self) -> &Repository {
        &self.repositories[self.state.current_center_index()]
    }

    /// Whether a transition is still running at `now`.
    pub fn is_transitioning(&self, now: Instant) -> bool {
        self.in_flight_until
            .is_some_and(|in_flight_until| now < in_flight_until)
    }

    /// Renders the current state without animation.
    pub fn current_view(&self) -> StdResult<CarouselView> {
        CarouselView::render(&self.repositories, &self.state, Transition::Refresh)
    }

    /// Applies a navigation request received at `now`.
    ///
    /// Returns the view to present, or `None` when the request was dropped or
    /// did not change anything.
    pub fn navigate(
        &mut self,
        navigation: Navigation,
        now: Instant,
    ) -> StdResult<Option<CarouselView>> {
        if navigation != Navigation::Resize && self.is_transitioning(now) {
            debug!("Dropped {navigation:?}: transition in flight");
            return Ok(None);
        }
        let transition = match navigation {
            Navigation::Next => {
                self.state.next();
                Transition::SlideFromRight
            }
            Navigation::Previous => {
                self.state.previous();
                Transition::SlideFromLeft
            }
            Navigation::Jump(index) => {
                if !self.state.jump(index) {
                    debug!("Ignored jump to {index}");
                    return Ok(None);
                }
                Transition::Fade
            }
            Navigation::Resize => Transition::Refresh,
        };
        if transition.is_animated() {
            self.in_flight_until = Some(now + self.transition_duration);
        }

        CarouselView::render(&self.repositories, &self.state, transition).map(Some)
    }
}

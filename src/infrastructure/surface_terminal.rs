use std::io::Write;

use anyhow::Context;
use log::debug;

use crate::{
    CardSlot, CardView, CarouselSurface, CarouselView, Repository, ShowcaseError, StdResult,
    Transition,
};

const UNAVAILABLE_TITLE: &str = "Repositories Currently Unavailable";

/// Draws the carousel as text on a writer (usually the standard output).
pub struct TerminalSurface<W: Write> {
    writer: W,
}

impl<W: Write> TerminalSurface<W> {
    /// Creates a new `TerminalSurface` writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the surface and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn card_lines(card: &CardView, repository: &Repository) -> Vec<String> {
        let pin = if repository.is_pinned() { "* " } else { "" };
        match card.slot {
            CardSlot::Center => vec![
                format!("[ {pin}{} ]", repository.name()),
                format!("  {}", repository.description()),
                format!(
                    "  {} | stars {} | forks {} | by {}",
                    repository.language(),
                    repository.stars(),
                    repository.forks(),
                    repository.author()
                ),
                format!("  {}", card.link.as_deref().unwrap_or_default()),
            ],
            CardSlot::Left => vec![format!(
                "  < {pin}{} ({})",
                repository.name(),
                repository.language()
            )],
            CardSlot::Right => vec![format!(
                "  > {pin}{} ({})",
                repository.name(),
                repository.language()
            )],
        }
    }

    fn indicator_line(view: &CarouselView) -> String {
        view.indicators
            .iter()
            .map(|indicator| if indicator.is_current { "(*)" } else { "( )" })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl<W: Write> CarouselSurface for TerminalSurface<W> {
    fn apply(&mut self, view: &CarouselView, repositories: &[Repository]) -> StdResult<()> {
        if view.transition != Transition::Refresh {
            debug!("Presenting view with {:?}", view.transition);
        }
        let mut lines = vec![];
        for card in &view.cards {
            let repository = repositories
                .get(card.index)
                .ok_or(ShowcaseError::EmptyCarousel)?;
            lines.extend(Self::card_lines(card, repository));
        }
        lines.push(Self::indicator_line(view));

        writeln!(self.writer)?;
        for line in lines {
            writeln!(self.writer, "{line}")?;
        }
        self.writer
            .flush()
            .with_context(|| "Failed to flush the carousel output")
    }

    fn show_unavailable(&mut self, profile_url: &str) -> StdResult<()> {
        writeln!(self.writer, "{UNAVAILABLE_TITLE}")?;
        writeln!(
            self.writer,
            "Projects could not be loaded right now. Browse them on GitHub: {profile_url}"
        )?;
        self.writer
            .flush()
            .with_context(|| "Failed to flush the fallback output")
    }
}

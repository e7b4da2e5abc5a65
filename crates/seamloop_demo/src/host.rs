// SPDX-License-Identifier: MIT OR Apache-2.0
//! Headless stand-in for a rendering surface.
//!
//! Cards are measured from their settings instead of a real layout pass,
//! and host registrations (resize, visibility, focus) are recorded so the
//! demo can show them being released on teardown.

use crate::settings::{CardEntry, DemoSettings};
use seamloop_engine::{ItemMeasurement, LoopEngine, MeasureError, MeasurementProvider, Subscription};
use std::cell::RefCell;
use std::rc::Rc;

/// A card shown on the strip
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Display title
    pub title: String,
    entry: CardEntry,
}

impl Card {
    /// Create a card from its settings entry
    pub fn from_entry(entry: &CardEntry) -> Self {
        Self {
            title: entry.title.clone(),
            entry: entry.clone(),
        }
    }
}

/// Simulated host that measures cards and owns the viewport
#[derive(Debug)]
pub struct SimulatedHost {
    viewport_width: f64,
    gap: f64,
    registrations: Rc<RefCell<Vec<&'static str>>>,
}

impl SimulatedHost {
    /// Host for the given settings
    pub fn new(settings: &DemoSettings) -> Self {
        Self {
            viewport_width: settings.viewport_width,
            gap: settings.gap,
            registrations: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Cards described by the settings
    pub fn cards(settings: &DemoSettings) -> Vec<Card> {
        settings.cards.iter().map(Card::from_entry).collect()
    }

    /// Change the viewport width
    pub fn resize(&mut self, viewport_width: f64) {
        tracing::info!(from = self.viewport_width, to = viewport_width, "viewport resized");
        self.viewport_width = viewport_width;
    }

    /// Registrations still held by the host
    pub fn active_registrations(&self) -> Vec<&'static str> {
        self.registrations.borrow().clone()
    }

    /// Register resize, visibility and focus observers with the engine
    pub fn observe(&self, engine: &mut LoopEngine<Card>) {
        for label in ["resize", "visibility", "focus"] {
            self.registrations.borrow_mut().push(label);
            let registrations = Rc::clone(&self.registrations);
            engine.attach(Subscription::new(label, move || {
                registrations.borrow_mut().retain(|l| *l != label);
                tracing::debug!(observer = label, "host observer removed");
            }));
        }
    }

    /// Describe where every card sits relative to the viewport
    pub fn render(&self, engine: &LoopEngine<Card>) -> String {
        let layout = engine.layout();
        engine
            .items()
            .iter()
            .enumerate()
            .filter_map(|(index, card)| {
                let x = layout.offsets()[index] + engine.translation_of(index)?;
                let visible = x + layout.widths()[index] > 0.0 && x < self.viewport_width;
                visible.then(|| format!("{}@{x:.0}", card.title))
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MeasurementProvider<Card> for SimulatedHost {
    fn measure(&self, index: usize, card: &Card) -> Result<ItemMeasurement, MeasureError> {
        if !card.entry.width.is_finite() {
            return Err(MeasureError::new(format!("card {index} ({}) has no layout", card.title)));
        }
        let gap = self.gap;
        Ok(ItemMeasurement::new(card.entry.width, gap).with_scale(card.entry.scale_x))
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}
